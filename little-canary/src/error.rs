// ABOUTME: classifies execution failures of canary actions into distinct error kinds.
// ABOUTME: none of these are recorded in the audit log; the caller treats them as fatal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanaryError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve {destination}: {source}")]
    Resolve {
        destination: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect to {destination}: {source}")]
    Connect {
        destination: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to append audit record to {}: {source}", .path.display())]
    Audit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CanaryError>;
