use std::sync::Arc;

use crate::db::AnalyticsStore;

/// Shared application state
///
/// The store is held behind a trait object so the binary can wire the
/// Postgres/Redis implementation while tests run against the in-memory one.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalyticsStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }
}
