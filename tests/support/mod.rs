//! In-memory stand-ins for S3, ffmpeg and the broker.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};

use video_compressor::common::retry::RetryPolicy;
use video_compressor::error::{DeriveError, PublishError, StorageError};
use video_compressor::infrastructure::queue::EventPublisher;
use video_compressor::infrastructure::storage::ObjectStore;
use video_compressor::modules::compressor::deriver::ArtifactDeriver;
use video_compressor::modules::compressor::events::CompletionEvent;
use video_compressor::modules::compressor::service::{CompressorService, RunOptions};

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    uploads: Mutex<Vec<(String, String)>>,
    deletes: Mutex<Vec<(String, String)>>,
    failing_uploads: Mutex<HashMap<String, u32>>,
    download_calls: Mutex<u32>,
}

impl MemoryStore {
    pub async fn put(&self, bucket: &str, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .await
            .insert((bucket.to_string(), key.to_string()), data.to_vec());
    }

    /// Makes the next `times` uploads of `key` fail.
    pub async fn fail_uploads(&self, key: &str, times: u32) {
        self.failing_uploads
            .lock()
            .await
            .insert(key.to_string(), times);
    }

    pub async fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().await.clone()
    }

    pub async fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().await.clone()
    }

    pub async fn download_calls(&self) -> u32 {
        *self.download_calls.lock().await
    }

    pub async fn keys_in(&self, bucket: &str) -> HashSet<String> {
        self.objects
            .lock()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        dest: &Path,
    ) -> Result<PathBuf, StorageError> {
        *self.download_calls.lock().await += 1;
        let data = self
            .objects
            .lock()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, data).await?;
        Ok(dest.to_path_buf())
    }

    async fn upload(&self, local: &Path, bucket: &str, key: &str) -> Result<(), StorageError> {
        {
            let mut failing = self.failing_uploads.lock().await;
            if let Some(remaining) = failing.get_mut(key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(StorageError::Request(format!("injected failure for {key}")));
                }
            }
        }

        let data = tokio::fs::read(local).await?;
        self.objects
            .lock()
            .await
            .insert((bucket.to_string(), key.to_string()), data);
        self.uploads
            .lock()
            .await
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .await
            .remove(&(bucket.to_string(), key.to_string()));
        self.deletes
            .lock()
            .await
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    Fail,
    Panic,
}

/// Writes a marker file instead of running ffmpeg.
pub struct FakeDeriver {
    video: Fault,
    thumbnail: Fault,
    thumbnail_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeDeriver {
    pub fn ok() -> Self {
        Self::with_faults(Fault::None, Fault::None)
    }

    pub fn with_faults(video: Fault, thumbnail: Fault) -> Self {
        Self {
            video,
            thumbnail,
            thumbnail_gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Thumbnail derivation blocks until the returned sender fires.
    pub fn gated() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let deriver = Self::ok();
        deriver.thumbnail_gate.try_lock().unwrap().replace(rx);
        (deriver, tx)
    }

    pub async fn calls(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn produce(&self, fault: Fault, input: &Path, output: &Path) -> Result<(), DeriveError> {
        self.calls.lock().await.push(output.to_path_buf());
        assert!(input.exists(), "source must be downloaded before deriving");
        match fault {
            Fault::Fail => Err(DeriveError::Failed {
                exit_code: Some(1),
                stderr: "moov atom not found".into(),
            }),
            Fault::Panic => panic!("transcoder crashed"),
            Fault::None => {
                tokio::fs::write(output, b"derived").await?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ArtifactDeriver for FakeDeriver {
    async fn derive_video(&self, input: &Path, output: &Path) -> Result<(), DeriveError> {
        self.produce(self.video, input, output).await
    }

    async fn derive_thumbnail(&self, input: &Path, output: &Path) -> Result<(), DeriveError> {
        let gate = self.thumbnail_gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.produce(self.thumbnail, input, output).await
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<CompletionEvent>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn events(&self) -> Vec<CompletionEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &CompletionEvent) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Connection("broker unreachable".into()));
        }
        // round-trip through the wire format
        let decoded: CompletionEvent = serde_json::from_slice(&event.to_payload()?)?;
        self.events.lock().await.push(decoded);
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub deriver: Arc<FakeDeriver>,
    pub publisher: Arc<RecordingPublisher>,
    pub service: Arc<CompressorService>,
    pub work_dir: tempfile::TempDir,
}

pub fn options(work_dir: &Path) -> RunOptions {
    RunOptions {
        work_dir: work_dir.to_path_buf(),
        retry: RetryPolicy::new(3, Duration::ZERO),
        cleanup_on_failure: true,
    }
}

impl Harness {
    pub fn new(deriver: FakeDeriver, publisher: RecordingPublisher) -> Self {
        Self::with_options(deriver, publisher, |_| {})
    }

    pub fn with_options(
        deriver: FakeDeriver,
        publisher: RecordingPublisher,
        tweak: impl FnOnce(&mut RunOptions),
    ) -> Self {
        let work_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let deriver = Arc::new(deriver);
        let publisher = Arc::new(publisher);

        let mut opts = options(work_dir.path());
        tweak(&mut opts);

        let service = Arc::new(CompressorService::new(
            store.clone(),
            deriver.clone(),
            publisher.clone(),
            opts,
        ));

        Self {
            store,
            deriver,
            publisher,
            service,
            work_dir,
        }
    }

    /// Number of leftover entries in the work directory.
    pub fn leftover_runs(&self) -> usize {
        std::fs::read_dir(self.work_dir.path()).unwrap().count()
    }
}

pub fn header_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
