use std::collections::BTreeMap;

use axum::{
    Json,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Function-style status payload returned by every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

fn is_zero(code: &u16) -> bool {
    *code == 0
}

impl StatusMessage {
    pub fn success(body: &str) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            headers: BTreeMap::new(),
            body: body.to_string(),
        }
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: BTreeMap::new(),
            body: message.to_string(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

impl IntoResponse for StatusMessage {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut extra = Vec::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                extra.push((name, value));
            }
        }

        let mut response = (status, Json(self)).into_response();
        response.headers_mut().extend(extra);
        response
    }
}
