use std::sync::Arc;
use std::time::Duration;

use dtrack_core::extraction::ExtractionSlot;
use dtrack_core::filter_state::FilterState;
use dtrack_core::store::DiscountStore;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The in-memory discount store.
    pub store: Arc<RwLock<DiscountStore>>,
    /// Dashboard filter selections.
    pub filters: Arc<RwLock<FilterState>>,
    /// Single-slot simulated extraction runner.
    pub extraction: Arc<ExtractionSlot>,
}

impl AppState {
    /// Build state around an existing store.
    pub fn new(config: ServerConfig, store: DiscountStore) -> Self {
        let extraction =
            ExtractionSlot::simulated(Duration::from_millis(config.extraction_delay_ms));

        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            filters: Arc::new(RwLock::new(FilterState::new())),
            extraction: Arc::new(extraction),
        }
    }
}
