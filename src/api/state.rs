use std::sync::Arc;

use crate::config::AppConfig;
use crate::cosmetics::CosmeticsClient;
use crate::decode::ReplayDecoder;
use crate::session::SessionRegistry;

/// Shared handler context; replaces any process-wide session map.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub decoder: Arc<dyn ReplayDecoder>,
    pub cosmetics: Option<Arc<CosmeticsClient>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, decoder: Arc<dyn ReplayDecoder>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(config.server.max_sessions)),
            decoder,
            cosmetics: None,
            config: Arc::new(config),
        }
    }

    /// Builder method to enable cosmetic name lookups.
    pub fn with_cosmetics(mut self, client: CosmeticsClient) -> Self {
        self.cosmetics = Some(Arc::new(client));
        self
    }
}
