//! The documents a provisioning run starts from: the administrator credentials and the
//! desired state of the realm. Both are JSON files read once at start-up.

pub mod credentials;
pub mod desired_state;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reading `{}`: `{source}`", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing `{}`: `{source}`", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads and deserializes a JSON document. No validation is performed beyond the shape of
/// the document itself.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;
    use serde::Deserialize;
    use tempfile::NamedTempFile;

    use super::*;

    /// Writes `content` to a temporary file that lives as long as the returned handle.
    pub(crate) fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[derive(Debug, Deserialize)]
    struct Doc {
        name: String,
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_json::<Doc>(&path).unwrap_err();

        assert_matches!(err, LoadError::Io { path: p, .. } => assert_eq!(p, path));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = json_file(r#"{"name": "#);

        let err = load_json::<Doc>(file.path()).unwrap_err();

        assert_matches!(err, LoadError::Parse { .. });
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn well_formed_file_is_loaded() {
        let file = json_file(r#"{"name": "acme"}"#);

        let doc = load_json::<Doc>(file.path()).unwrap();

        assert_eq!(doc.name, "acme");
    }
}
