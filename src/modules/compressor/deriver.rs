use std::path::Path;

use async_trait::async_trait;

use super::model::ArtifactKind;
use crate::error::DeriveError;

/// Produces artifacts from a local source file.
#[async_trait]
pub trait ArtifactDeriver: Send + Sync {
    /// Rescales `input` to the configured target resolution.
    async fn derive_video(&self, input: &Path, output: &Path) -> Result<(), DeriveError>;

    /// Extracts a single frame at the configured offset.
    async fn derive_thumbnail(&self, input: &Path, output: &Path) -> Result<(), DeriveError>;

    async fn derive(
        &self,
        kind: ArtifactKind,
        input: &Path,
        output: &Path,
    ) -> Result<(), DeriveError> {
        match kind {
            ArtifactKind::Video => self.derive_video(input, output).await,
            ArtifactKind::Thumbnail => self.derive_thumbnail(input, output).await,
        }
    }
}
