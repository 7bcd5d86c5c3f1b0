use std::sync::Arc;

use crate::auth::AdminGate;
use crate::config::Config;
use crate::db::EventStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub config: Config,
    pub gate: AdminGate,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, config: Config) -> Self {
        let gate = AdminGate::new(config.admin.clone());
        Self {
            store,
            config,
            gate,
        }
    }
}
