//! Persistent run state for change detection: the last-processed date and a
//! content hash per generated file. The state is loaded once at the start of
//! a run, mutated in memory as files are processed, and flushed back to disk
//! as the final action of a successful run. A crash mid-run therefore loses
//! the whole run's state updates, which is consistent with no durable
//! per-file record having been made either.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The persisted run state. Field names match the on-disk JSON produced by
/// earlier generations of this tool, so existing state files keep working.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct State {
    /// The `date` field of the final record of the last successful run.
    #[serde(rename = "lastDate")]
    pub last_date: Option<String>,

    /// Hex content digest per generated file name. A `BTreeMap` keeps the
    /// serialized form stable across runs.
    #[serde(default)]
    pub hashes: BTreeMap<String, String>,
}

impl State {
    /// Loads state from `path`. An absent file yields the default empty
    /// state (a first run); a file that exists but fails to parse is a
    /// [`Error::Corrupt`] error. Silently resetting corrupt state would
    /// trigger a full rewrite of every post without warning, so we refuse.
    pub fn load(path: &Path) -> Result<State> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(State::default())
            }
            Err(err) => {
                return Err(Error::Io {
                    path: path.to_owned(),
                    err,
                })
            }
        };
        serde_json::from_str(&text).map_err(|err| Error::Corrupt {
            path: path.to_owned(),
            err,
        })
    }

    /// Serializes the state to `path`, fully overwriting prior content.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Pretty-printing keeps the file diffable; it is rewritten whole
        // every run regardless.
        let text = serde_json::to_string_pretty(self).map_err(|err| Error::Serialize {
            path: path.to_owned(),
            err,
        })?;
        std::fs::write(path, text).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })
    }
}

/// Hex SHA-256 digest of a rendered document. Collision resistance is not
/// security-critical here; the digest only gates rewrites.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The result of a fallible state operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or saving run state.
#[derive(Debug)]
pub enum Error {
    /// Returned when the state file exists but is not valid state JSON.
    Corrupt {
        path: PathBuf,
        err: serde_json::Error,
    },

    /// Returned when in-memory state fails to serialize.
    Serialize {
        path: PathBuf,
        err: serde_json::Error,
    },

    /// Returned for I/O problems reading or writing the state file.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Corrupt { path, err } => {
                write!(f, "Corrupt state file '{}': {}", path.display(), err)
            }
            Error::Serialize { path, err } => {
                write!(f, "Serializing state for '{}': {}", path.display(), err)
            }
            Error::Io { path, err } => {
                write!(f, "State file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Corrupt { path: _, err } => Some(err),
            Error::Serialize { path: _, err } => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_absent_file_yields_default() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let state = State::load(&dir.path().join("lastProcessed.json"))?;
        assert_eq!(state, State::default());
        Ok(())
    }

    #[test]
    fn test_save_and_load_round_trip() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastProcessed.json");
        let mut state = State::default();
        state.last_date = Some("2025-01-03".to_owned());
        state
            .hashes
            .insert("2025-01-03.html".to_owned(), content_hash("<html/>"));
        state.save(&path)?;
        assert_eq!(State::load(&path)?, state);
        Ok(())
    }

    #[test]
    fn test_field_names_match_legacy_json() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastProcessed.json");
        std::fs::write(
            &path,
            r#"{"lastDate":"2025-01-02","hashes":{"2025-01-02.html":"abc123"}}"#,
        )
        .unwrap();
        let state = State::load(&path)?;
        assert_eq!(state.last_date.as_deref(), Some("2025-01-02"));
        assert_eq!(
            state.hashes.get("2025-01-02.html").map(String::as_str),
            Some("abc123")
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_state_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastProcessed.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            State::load(&path),
            Err(Error::Corrupt { path: _, err: _ })
        ));
    }

    #[test]
    fn test_content_hash_detects_change() {
        assert_eq!(content_hash("a"), content_hash("a"));
        assert_ne!(content_hash("a"), content_hash("b"));
        // 32 bytes, lowercase hex
        assert_eq!(content_hash("a").len(), 64);
    }
}
