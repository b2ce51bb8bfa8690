use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StorageError;

pub mod s3;

/// Bucket/key addressed object storage, shared by both artifact tasks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Streams `bucket/key` into `dest`, replacing any existing file.
    async fn download(&self, bucket: &str, key: &str, dest: &Path)
    -> Result<PathBuf, StorageError>;

    /// Streams `local` to `bucket/key`, creating or overwriting the object.
    async fn upload(&self, local: &Path, bucket: &str, key: &str) -> Result<(), StorageError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}
