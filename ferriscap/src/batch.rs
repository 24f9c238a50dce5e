//! Capture file discovery and loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::InputError;

/// Default capture file extensions for directory mode.
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "log", "cfg"];

/// Read a capture file as UTF-8 text.
pub fn read_capture(path: &Path) -> Result<String, InputError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => InputError::NotFound {
            path: path.to_path_buf(),
        },
        _ => InputError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    String::from_utf8(bytes).map_err(|_| InputError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Find capture files under `dir`, recursively, in sorted path order.
///
/// Extensions match case-insensitively; an empty list accepts every file.
pub fn discover<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>, InputError> {
    if !dir.is_dir() {
        return Err(InputError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    let mut found = Vec::new();
    walk(dir, extensions, &mut found)?;
    debug!("discovered {} capture files under {}", found.len(), dir.display());
    Ok(found)
}

fn walk<S: AsRef<str>>(
    dir: &Path,
    extensions: &[S],
    found: &mut Vec<PathBuf>,
) -> Result<(), InputError> {
    let read_err = |source| InputError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(read_err)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, extensions, found)?;
        } else if has_extension(&path, extensions) {
            found.push(path);
        }
    }
    Ok(())
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|want| want.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("site-b")).unwrap();
        fs::write(dir.path().join("site-b/pe2.log"), "x").unwrap();
        fs::write(dir.path().join("b.txt"), "x").unwrap();
        fs::write(dir.path().join("a.TXT"), "x").unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();

        let found = discover(dir.path(), DEFAULT_EXTENSIONS).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.TXT"),
                PathBuf::from("b.txt"),
                PathBuf::from("site-b/pe2.log"),
            ]
        );
    }

    #[test]
    fn test_discover_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("capture.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            discover(&file, DEFAULT_EXTENSIONS),
            Err(InputError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_read_capture_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_capture(&dir.path().join("missing.txt")),
            Err(InputError::NotFound { .. })
        ));

        let binary = dir.path().join("binary.txt");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(matches!(
            read_capture(&binary),
            Err(InputError::Encoding { .. })
        ));
    }
}
