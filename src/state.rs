use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::queue::rabbitmq::RabbitMqPublisher;
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::compressor::service::{CompressorService, RunOptions};
use crate::workers::transcoder::FfmpegDeriver;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub compressor: Arc<CompressorService>,
}

impl AppState {
    pub fn new(config: AppConfig, compressor: Arc<CompressorService>) -> Self {
        Self { config, compressor }
    }

    /// Wires the S3, ffmpeg and RabbitMQ implementations from configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let storage = StorageService::new(&config.storage);
        let deriver = FfmpegDeriver::new(config.ffmpeg.clone());
        let publisher = RabbitMqPublisher::new(config.events.clone());

        let compressor = CompressorService::new(
            Arc::new(storage),
            Arc::new(deriver),
            Arc::new(publisher),
            RunOptions::from(&config),
        );

        Self::new(config, Arc::new(compressor))
    }
}
