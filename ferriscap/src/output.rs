//! JSON output files.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::analyzer::Analysis;
use crate::error::OutputError;

/// Output file for a capture: `<base>/output/parsed_<stem>.json`.
pub fn output_path(base: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string());
    base.join("output").join(format!("parsed_{stem}.json"))
}

/// Output files for a batch of inputs, one distinct path per input.
///
/// Inputs whose stems collide (`site-a/pe1.txt`, `site-b/pe1.txt`,
/// `pe1.log`) keep their extension in the name (`parsed_pe1.log.json`).
/// Anything still clashing after that gets a numeric suffix.
pub fn output_paths<P: AsRef<Path>>(base: &Path, inputs: &[P]) -> Vec<PathBuf> {
    let mut per_stem: HashMap<PathBuf, usize> = HashMap::new();
    for input in inputs {
        *per_stem.entry(output_path(base, input.as_ref())).or_default() += 1;
    }

    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let input = input.as_ref();
            let mut path = output_path(base, input);
            if per_stem[&path] > 1 {
                let name = input
                    .file_name()
                    .map_or_else(|| "capture".to_string(), |n| n.to_string_lossy().into_owned());
                path = base.join("output").join(format!("parsed_{name}.json"));
            }

            let first_choice = path.clone();
            let mut suffix = 2;
            while !taken.insert(path.clone()) {
                let stem = first_choice
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                path = first_choice.with_file_name(format!("{stem}-{suffix}.json"));
                suffix += 1;
            }
            if path != output_path(base, input) {
                warn!(
                    "{}: output name shared with another input, writing {}",
                    input.display(),
                    path.display()
                );
            }
            path
        })
        .collect()
}

/// Write an analysis as pretty-printed JSON, creating parent directories.
pub fn write_json(analysis: &Analysis, path: &Path) -> Result<(), OutputError> {
    let json = analysis.to_json()?;
    let write_err = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;
    info!("{}: wrote {}", analysis.display_name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/data"), Path::new("/captures/pe1.log"));
        assert_eq!(path, PathBuf::from("/data/output/parsed_pe1.json"));
    }

    #[test]
    fn test_output_paths_never_collide() {
        let inputs = [
            PathBuf::from("/captures/site-a/pe1.txt"),
            PathBuf::from("/captures/site-b/pe1.txt"),
            PathBuf::from("/captures/pe1.log"),
            PathBuf::from("/captures/pe2.txt"),
        ];
        let paths = output_paths(Path::new("/o"), &inputs);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/o/output/parsed_pe1.txt.json"),
                PathBuf::from("/o/output/parsed_pe1.txt-2.json"),
                PathBuf::from("/o/output/parsed_pe1.log.json"),
                PathBuf::from("/o/output/parsed_pe2.json"),
            ]
        );
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = Model::new();
        model.identity.hostname = Some("PE1".into());
        let analysis = Analysis::new(model, dir.path().join("pe1.txt"));

        let path = output_path(dir.path(), &analysis.source);
        write_json(&analysis, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["identity"]["hostname"], "PE1");
        assert!(written["interfaces"].as_array().unwrap().is_empty());
    }
}
