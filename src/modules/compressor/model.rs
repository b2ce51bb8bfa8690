use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::settings::JobDefaults;

/// One source object to process end-to-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub source_object_key: String,
    pub source_bucket: String,
    pub destination_bucket: String,
}

impl Job {
    pub fn new(
        source_object_key: impl Into<String>,
        source_bucket: impl Into<String>,
        destination_bucket: impl Into<String>,
    ) -> Self {
        Self {
            source_object_key: source_object_key.into(),
            source_bucket: source_bucket.into(),
            destination_bucket: destination_bucket.into(),
        }
    }
}

impl From<&JobDefaults> for Job {
    fn from(defaults: &JobDefaults) -> Self {
        Self::new(
            defaults.source_object_key.clone(),
            defaults.source_bucket.clone(),
            defaults.destination_bucket.clone(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Video,
    Thumbnail,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Video => f.write_str("video"),
            ArtifactKind::Thumbnail => f.write_str("thumbnail"),
        }
    }
}

/// A file produced from the source, and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifact {
    pub kind: ArtifactKind,
    pub local_path: PathBuf,
    pub remote_key: String,
}
