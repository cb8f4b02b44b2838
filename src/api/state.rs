use std::sync::Arc;

use crate::config::Config;
use crate::downloader::Downloader;
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub downloader: Arc<Downloader>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, downloader: Downloader) -> Self {
        Self {
            config: Arc::new(config),
            downloader: Arc::new(downloader),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
