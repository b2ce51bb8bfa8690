//! Error types for a compression run.
//!
//! Every leaf (storage, ffmpeg, broker) has its own enum. [`JobError`] is what
//! the orchestrator hands back to its caller: it keeps the failing leaf error
//! as its source and records which task raised it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::modules::compressor::model::ArtifactKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("storage request failed: {0}")]
    Request(String),

    #[error("local file error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// A missing object stays missing, everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StorageError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("transcoder binary {0} not found")]
    ToolNotFound(String),

    #[error("transcoder exited with {exit_code:?}: {stderr}")]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("transcoder timed out after {0:?}")]
    Timeout(Duration),

    #[error("transcoder produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("failed to run transcoder: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("broker connection failed: {0}")]
    Connection(String),

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("publish failed: {0}")]
    Publish(String),
}

/// Failure inside one derive-and-upload task.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("derivation failed: {0}")]
    Derivation(#[source] DeriveError),

    #[error("upload of {key} failed: {source}")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("task aborted: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("failed to download {bucket}/{key}: {source}")]
    Download {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("{task} task failed: {source}")]
    Task {
        task: ArtifactKind,
        #[source]
        source: TaskError,
    },

    #[error("failed to publish completion event: {0}")]
    Publish(#[from] PublishError),

    #[error("working directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`JobError`], used in logs and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Download,
    Derivation,
    Upload,
    Publish,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Download => "download",
            ErrorKind::Derivation => "derivation",
            ErrorKind::Upload => "upload",
            ErrorKind::Publish => "publish",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JobError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::Configuration(_) => ErrorKind::Configuration,
            // the run directory is only created to receive the download
            JobError::Download { .. } | JobError::Io(_) => ErrorKind::Download,
            JobError::Task { source, .. } => match source {
                TaskError::Derivation(_) | TaskError::Panicked(_) => ErrorKind::Derivation,
                TaskError::Upload { .. } => ErrorKind::Upload,
            },
            JobError::Publish(_) => ErrorKind::Publish,
        }
    }

    /// The task that raised the error, if it came from one.
    pub fn task(&self) -> Option<ArtifactKind> {
        match self {
            JobError::Task { task, .. } => Some(*task),
            _ => None,
        }
    }
}
