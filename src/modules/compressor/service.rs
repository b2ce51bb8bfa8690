use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::deriver::ArtifactDeriver;
use super::events::CompletionEvent;
use super::model::{ArtifactKind, Job};
use super::naming;
use super::task::{ArtifactTask, plan_artifact};
use crate::common::response::StatusMessage;
use crate::common::retry::{RetryPolicy, with_retry};
use crate::config::settings::AppConfig;
use crate::error::{JobError, TaskError};
use crate::infrastructure::queue::EventPublisher;
use crate::infrastructure::storage::ObjectStore;

pub const COMPLETED_BODY: &str = "video compressed";

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub work_dir: PathBuf,
    pub retry: RetryPolicy,
    pub cleanup_on_failure: bool,
}

impl From<&AppConfig> for RunOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            retry: config.retry,
            cleanup_on_failure: config.cleanup_on_failure,
        }
    }
}

/// Runs compression jobs: download, derive both artifacts concurrently,
/// upload them and announce the result.
pub struct CompressorService {
    store: Arc<dyn ObjectStore>,
    deriver: Arc<dyn ArtifactDeriver>,
    publisher: Arc<dyn EventPublisher>,
    options: RunOptions,
}

impl CompressorService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        deriver: Arc<dyn ArtifactDeriver>,
        publisher: Arc<dyn EventPublisher>,
        options: RunOptions,
    ) -> Self {
        Self {
            store,
            deriver,
            publisher,
            options,
        }
    }

    /// Processes one job. Nothing is published unless both artifacts were
    /// uploaded. The per-run working directory is removed before returning.
    pub async fn run(&self, job: &Job) -> Result<StatusMessage, JobError> {
        let run_dir = self.options.work_dir.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&run_dir).await?;

        let result = self.run_in(job, &run_dir).await;

        if let Err(e) = fs::remove_dir_all(&run_dir).await {
            warn!(dir = %run_dir.display(), "Failed to remove working directory: {}", e);
        }

        match &result {
            Ok(_) => info!(key = %job.source_object_key, "✅ Job completed"),
            Err(e) => error!(
                key = %job.source_object_key,
                kind = %e.kind(),
                task = ?e.task(),
                "❌ Job failed: {}",
                e
            ),
        }
        result
    }

    async fn run_in(&self, job: &Job, run_dir: &Path) -> Result<StatusMessage, JobError> {
        info!(
            key = %job.source_object_key,
            source = %job.source_bucket,
            destination = %job.destination_bucket,
            "Processing job"
        );

        let dest = run_dir.join(naming::file_name(&job.source_object_key));
        let source = with_retry(self.options.retry, "download", || {
            self.store
                .download(&job.source_bucket, &job.source_object_key, &dest)
        })
        .await
        .map_err(|source| JobError::Download {
            bucket: job.source_bucket.clone(),
            key: job.source_object_key.clone(),
            source,
        })?;

        let video = self.spawn(ArtifactKind::Video, job, &source, run_dir);
        let thumbnail = self.spawn(ArtifactKind::Thumbnail, job, &source, run_dir);

        // Both handles are awaited before deciding anything, so a failing
        // task never leaves its sibling running unobserved.
        let (video, thumbnail) = tokio::join!(video, thumbnail);
        let video = settle(ArtifactKind::Video, video);
        let thumbnail = settle(ArtifactKind::Thumbnail, thumbnail);

        let (video_key, thumbnail_key) = match (video, thumbnail) {
            (Ok(video_key), Ok(thumbnail_key)) => (video_key, thumbnail_key),
            (Ok(uploaded), Err(e)) | (Err(e), Ok(uploaded)) => {
                self.discard(job, &uploaded).await;
                return Err(e);
            }
            (Err(e), Err(other)) => {
                warn!("thumbnail task also failed: {}", other);
                return Err(e);
            }
        };

        let event = CompletionEvent {
            compressed_file_name: video_key,
            thumbnail_name: thumbnail_key,
            original_file_name: job.source_object_key.clone(),
        };
        self.publisher.publish(&event).await?;

        Ok(StatusMessage::success(COMPLETED_BODY))
    }

    fn spawn(
        &self,
        kind: ArtifactKind,
        job: &Job,
        source: &Path,
        run_dir: &Path,
    ) -> JoinHandle<Result<String, TaskError>> {
        let task = ArtifactTask {
            store: Arc::clone(&self.store),
            deriver: Arc::clone(&self.deriver),
            retry: self.options.retry,
            source: source.to_path_buf(),
            artifact: plan_artifact(kind, &job.source_object_key, run_dir),
            bucket: job.destination_bucket.clone(),
        };
        tokio::spawn(task.run())
    }

    /// Removes an artifact whose sibling failed, so the destination never
    /// holds half a pair.
    async fn discard(&self, job: &Job, key: &str) {
        if !self.options.cleanup_on_failure {
            return;
        }
        match self.store.delete(&job.destination_bucket, key).await {
            Ok(()) => info!(bucket = %job.destination_bucket, key, "🧹 Removed orphaned artifact"),
            Err(e) => warn!(key, "Failed to remove orphaned artifact: {}", e),
        }
    }
}

fn settle(
    kind: ArtifactKind,
    joined: Result<Result<String, TaskError>, JoinError>,
) -> Result<String, JobError> {
    joined
        .unwrap_or_else(|e| Err(TaskError::Panicked(e.to_string())))
        .map_err(|source| JobError::Task { task: kind, source })
}
