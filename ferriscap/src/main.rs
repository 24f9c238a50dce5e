//! Ferriscap command line entry point.
//!
//! ```bash
//! ferriscap pe1.txt                      # writes ./output/parsed_pe1.json
//! ferriscap --dir captures/ --base out/  # every .txt/.log/.cfg under captures/
//! ferriscap pe1.txt --stdout -v
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use ferriscap::batch;
use ferriscap::output::{output_paths, write_json};
use ferriscap::{Analysis, Analyzer};

#[derive(Parser, Debug)]
#[command(name = "ferriscap")]
#[command(about = "Turn router CLI captures into structured JSON device records")]
#[command(version)]
struct Args {
    /// Capture file to parse
    #[arg(default_value = "capture.txt")]
    file: PathBuf,

    /// Parse every capture file under this directory instead
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// File extensions picked up in directory mode
    #[arg(long, value_delimiter = ',', default_value = "txt,log,cfg")]
    ext: Vec<String>,

    /// Output base directory (JSON goes to <base>/output/)
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Literal section delimiter used by the capture script
    #[arg(long)]
    delimiter: Option<String>,

    /// Dialect name
    #[arg(long, default_value = "huawei_vrp")]
    dialect: String,

    /// Process chunks strictly in capture order
    #[arg(long)]
    no_config_prepass: bool,

    /// Print JSON to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when every target failed.
fn run(args: &Args) -> Result<bool, ferriscap::Error> {
    let mut builder = Analyzer::builder()
        .dialect(args.dialect.as_str())
        .config_prepass(!args.no_config_prepass);
    if let Some(delimiter) = &args.delimiter {
        builder = builder.section_delimiter(delimiter.as_str());
    }
    let analyzer = builder.build()?;

    let (targets, default_base) = match &args.dir {
        Some(dir) => (batch::discover(dir, &args.ext)?, dir.clone()),
        None => {
            let parent = args
                .file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (vec![args.file.clone()], parent)
        }
    };
    let base = args.base.clone().unwrap_or(default_base);

    if targets.is_empty() {
        info!("no capture files found");
        return Ok(true);
    }

    let report = analyzer.analyze_batch(&targets);
    let sources: Vec<&Path> = report.successes.iter().map(|a| a.source.as_path()).collect();
    let paths = output_paths(&base, &sources);

    let mut written = 0usize;
    for (analysis, path) in report.successes.iter().zip(&paths) {
        match emit(analysis, path, args.stdout) {
            Ok(()) => written += 1,
            Err(err) => error!("{}: {err}", analysis.source.display()),
        }
    }
    for (path, err) in &report.failures {
        error!("{}: {err}", path.display());
    }

    Ok(written > 0)
}

fn emit(analysis: &Analysis, path: &Path, stdout: bool) -> Result<(), ferriscap::Error> {
    if stdout {
        let json = analysis
            .to_json()
            .map_err(ferriscap::error::OutputError::from)?;
        println!("{json}");
        return Ok(());
    }
    write_json(analysis, path)?;
    Ok(())
}
