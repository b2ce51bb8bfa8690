use serde::Deserialize;

use super::model::Job;
use crate::config::settings::JobDefaults;

/// Invocation arguments. Anything left out falls back to the configured
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressRequest {
    pub name: Option<String>,
    pub source_bucket: Option<String>,
    pub destination_bucket: Option<String>,
}

impl CompressRequest {
    pub fn into_job(self, defaults: &JobDefaults) -> Job {
        Job::new(
            non_empty(self.name).unwrap_or_else(|| defaults.source_object_key.clone()),
            non_empty(self.source_bucket).unwrap_or_else(|| defaults.source_bucket.clone()),
            non_empty(self.destination_bucket)
                .unwrap_or_else(|| defaults.destination_bucket.clone()),
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
