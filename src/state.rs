use crate::config::Config;
use reqwest::Client;
use std::sync::Arc;

/// Shared by every handler. Holds no log data: each request loads its own snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            client: Client::new(),
        }
    }
}
