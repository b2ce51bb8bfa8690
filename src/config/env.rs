use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    S3Endpoint,
    S3Region,
    S3ForcePathStyle,
    AccessKeyId,
    LegacyAccessKey,
    SecretAccessKey,
    SourceBucket,
    DestinationBucket,
    SourceObjectKey,
    WorkDir,
    FfmpegPath,
    TargetWidth,
    TargetHeight,
    ThumbnailOffsetSecs,
    FfmpegTimeoutSecs,
    NetworkTimeoutSecs,
    RetryMaxAttempts,
    RetryBaseDelayMs,
    AmqpUrl,
    EventTopic,
    EventProducer,
    EventHeaders,
    CleanupOnFailure,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::S3ForcePathStyle => "S3_FORCE_PATH_STYLE",
            EnvKey::AccessKeyId => "AWS_ACCESS_KEY_ID",
            EnvKey::LegacyAccessKey => "AWS_ACCESS_KEY",
            EnvKey::SecretAccessKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::SourceBucket => "SOURCE_BUCKET",
            EnvKey::DestinationBucket => "DESTINATION_BUCKET",
            EnvKey::SourceObjectKey => "SOURCE_OBJECT_KEY",
            EnvKey::WorkDir => "WORK_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TargetWidth => "TARGET_WIDTH",
            EnvKey::TargetHeight => "TARGET_HEIGHT",
            EnvKey::ThumbnailOffsetSecs => "THUMBNAIL_OFFSET_SECS",
            EnvKey::FfmpegTimeoutSecs => "FFMPEG_TIMEOUT_SECS",
            EnvKey::NetworkTimeoutSecs => "NETWORK_TIMEOUT_SECS",
            EnvKey::RetryMaxAttempts => "RETRY_MAX_ATTEMPTS",
            EnvKey::RetryBaseDelayMs => "RETRY_BASE_DELAY_MS",
            EnvKey::AmqpUrl => "AMQP_URL",
            EnvKey::EventTopic => "EVENT_TOPIC",
            EnvKey::EventProducer => "EVENT_PRODUCER",
            EnvKey::EventHeaders => "EVENT_HEADERS",
            EnvKey::CleanupOnFailure => "CLEANUP_ON_FAILURE",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
