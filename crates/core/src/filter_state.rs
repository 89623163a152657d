//! Mutable filter selections with toggle semantics.
//!
//! [`FilterState`] owns a [`FilterConfig`] and exposes the mutations the
//! dashboard performs on it. The engine only ever sees the read-only
//! snapshot returned by [`FilterState::config`].

use crate::discount::{Category, OfferType};
use crate::filter::FilterConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    config: FilterConfig,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Add `category` if absent, remove it if present.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.config.categories.remove(&category) {
            self.config.categories.insert(category);
        }
    }

    /// Add `offer_type` if absent, remove it if present.
    pub fn toggle_type(&mut self, offer_type: OfferType) {
        if !self.config.types.remove(&offer_type) {
            self.config.types.insert(offer_type);
        }
    }

    pub fn toggle_expiring_soon(&mut self) {
        self.config.expiring_soon = !self.config.expiring_soon;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.config.query = query.into();
    }

    /// Reset categories, types, the expiring flag, and the query.
    pub fn clear_all(&mut self) {
        self.config = FilterConfig::default();
    }

    /// Number of active category, type, and expiry selections.
    ///
    /// The text query is not counted; this number only feeds the filter badge.
    pub fn active_filter_count(&self) -> usize {
        self.config.categories.len()
            + self.config.types.len()
            + usize::from(self.config.expiring_soon)
    }
}
