use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::ObjectStore;
use crate::config::settings::StorageSettings;
use crate::error::StorageError;

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "static",
        );

        let timeouts = TimeoutConfig::builder()
            .operation_timeout(settings.operation_timeout)
            .build();

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(&settings.endpoint)
            .credentials_provider(credentials)
            .force_path_style(settings.force_path_style)
            .timeout_config(timeouts)
            .build();

        let client = Client::from_conf(config);

        info!(endpoint = %settings.endpoint, region = %settings.region, "✅ S3 client ready");

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        dest: &Path,
    ) -> Result<PathBuf, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Request(format!("GetObject {}/{}: {}", bucket, key, DisplayErrorContext(&e)))
                }
            })?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        // File::create truncates, so a stale local copy is overwritten
        let mut file = File::create(dest).await?;
        let body = resp.body.into_async_read();
        tokio::pin!(body);
        let written = tokio::io::copy(&mut body, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;

        debug!(bucket, key, bytes = written, "⬇️ Downloaded object");
        Ok(dest.to_path_buf())
    }

    async fn upload(&self, local: &Path, bucket: &str, key: &str) -> Result<(), StorageError> {
        let body = ByteStream::from_path(local)
            .await
            .map_err(|e| StorageError::Request(format!("Failed to open {}: {}", local.display(), e)))?;
        let content_type = mime_guess::from_path(local)
            .first_or_octet_stream()
            .to_string();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("PutObject {}/{}: {}", bucket, key, DisplayErrorContext(&e))))?;

        debug!(bucket, key, "⬆️ Uploaded object");
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("DeleteObject {}/{}: {}", bucket, key, DisplayErrorContext(&e))))?;

        Ok(())
    }
}
