use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use super::deriver::ArtifactDeriver;
use super::model::{ArtifactKind, DerivedArtifact};
use super::naming;
use crate::common::retry::{RetryPolicy, with_retry};
use crate::error::TaskError;
use crate::infrastructure::storage::ObjectStore;

/// Where an artifact of `kind` for `source_key` is written and uploaded.
pub fn plan_artifact(kind: ArtifactKind, source_key: &str, run_dir: &Path) -> DerivedArtifact {
    let remote_key = match kind {
        ArtifactKind::Video => naming::full_hd_name(source_key),
        ArtifactKind::Thumbnail => naming::thumbnail_name(source_key),
    };
    let local_path = run_dir.join(naming::file_name(&remote_key));

    DerivedArtifact {
        kind,
        local_path,
        remote_key,
    }
}

/// One unit of concurrent work: derive an artifact, then upload it.
pub struct ArtifactTask {
    pub store: Arc<dyn ObjectStore>,
    pub deriver: Arc<dyn ArtifactDeriver>,
    pub retry: RetryPolicy,
    pub source: PathBuf,
    pub artifact: DerivedArtifact,
    pub bucket: String,
}

impl ArtifactTask {
    /// Returns the remote key the artifact was uploaded under.
    #[instrument(skip(self), fields(kind = %self.artifact.kind, key = %self.artifact.remote_key))]
    pub async fn run(self) -> Result<String, TaskError> {
        let ArtifactTask {
            store,
            deriver,
            retry,
            source,
            artifact,
            bucket,
        } = self;

        deriver
            .derive(artifact.kind, &source, &artifact.local_path)
            .await
            .map_err(TaskError::Derivation)?;

        let operation = format!("upload {}", artifact.kind);
        with_retry(retry, &operation, || {
            store.upload(&artifact.local_path, &bucket, &artifact.remote_key)
        })
        .await
        .map_err(|source| TaskError::Upload {
            key: artifact.remote_key.clone(),
            source,
        })?;

        info!(bucket = %bucket, "✅ {} uploaded", artifact.kind);
        Ok(artifact.remote_key)
    }
}
