//! Application state passed to all handlers.

use std::sync::Arc;

use crate::srs::Reviewer;
use crate::store::SqliteStore;

#[derive(Clone)]
pub struct AppState {
    /// Shared store; backs both collaborator traits
    pub store: Arc<SqliteStore>,

    /// Review core with its storage handles injected
    pub reviewer: Arc<Reviewer>,
}

impl AppState {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        let reviewer = Arc::new(Reviewer::new(store.clone(), store.clone()));
        Self { store, reviewer }
    }
}
