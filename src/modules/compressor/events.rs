use serde::{Deserialize, Serialize};

use crate::error::PublishError;

/// Published once both artifacts of a job are uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub compressed_file_name: String,
    pub thumbnail_name: String,
    pub original_file_name: String,
}

impl CompletionEvent {
    pub fn to_payload(&self) -> Result<Vec<u8>, PublishError> {
        Ok(serde_json::to_vec(self)?)
    }
}
