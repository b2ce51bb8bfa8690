use axum::{body::Bytes, extract::State, http::StatusCode};
use tracing::warn;

use super::dto::CompressRequest;
use crate::common::response::StatusMessage;
use crate::error::{JobError, StorageError};
use crate::state::AppState;

pub async fn compress(State(state): State<AppState>, body: Bytes) -> StatusMessage {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CompressRequest::default()
    } else {
        match serde_json::from_slice::<CompressRequest>(&body) {
            Ok(req) => req,
            Err(e) => {
                warn!("Rejected invocation arguments: {}", e);
                return StatusMessage::error(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid arguments: {}", e),
                );
            }
        }
    };

    let job = request.into_job(&state.config.job);
    match state.compressor.run(&job).await {
        Ok(status) => status,
        Err(e) => error_status(&e),
    }
}

pub fn error_status(e: &JobError) -> StatusMessage {
    let status = match e {
        JobError::Download {
            source: StorageError::NotFound { .. },
            ..
        } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = StatusMessage::error(status, &e.to_string())
        .with_header("X-Error-Kind", e.kind().as_str());
    match e.task() {
        Some(task) => message.with_header("X-Error-Task", &task.to_string()),
        None => message,
    }
}
