use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use common::model::history::History;
use derive_more::{Display, Error};
use tracing::debug;

#[derive(Debug, Display, Error)]
pub enum SinkError {
    #[display("could not resolve output path {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("could not serialize history: {source}")]
    Serialize { source: serde_json::Error },
    #[display("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Writes a finished history to a single JSON file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Relative paths are taken from the current working directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|source| SinkError::Resolve {
                    path: path.to_path_buf(),
                    source,
                })?
                .join(path)
        };
        Ok(JsonFileSink { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, history: &History) -> Result<(), SinkError> {
        let bytes =
            serde_json::to_vec(history).map_err(|source| SinkError::Serialize { source })?;
        let write_error = |source| SinkError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(write_error)?;
        file.write_all(&bytes).map_err(write_error)?;
        file.sync_all().map_err(write_error)?;
        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<History, SinkError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SinkError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SinkError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Two-space indented JSON, for display.
pub fn pretty(history: &History) -> Result<String, SinkError> {
    serde_json::to_string_pretty(history).map_err(|source| SinkError::Serialize { source })
}
