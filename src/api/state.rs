use std::sync::Arc;

use crate::analytics::AnalyticsEngine;
use crate::auth::AccessControl;
use crate::storage::StoreHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub engine: AnalyticsEngine,
    pub access: Arc<AccessControl>,
}

impl AppState {
    /// Wire the analytics engine to read from the same store.
    pub fn new(store: StoreHandle, access: AccessControl) -> Self {
        let engine = AnalyticsEngine::new(Arc::new(store.clone()));
        Self {
            store,
            engine,
            access: Arc::new(access),
        }
    }

    pub fn with_engine(mut self, engine: AnalyticsEngine) -> Self {
        self.engine = engine;
        self
    }
}
