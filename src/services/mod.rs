use crate::config::Config;
use crate::store::Store;

pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        Self { config, store }
    }
}

pub mod anticheat_service;
pub mod content_service;
pub mod paper_service;
pub mod reporting_service;
pub mod roster_service;
pub mod scoring;
pub mod session_service;
