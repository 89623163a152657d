//! In-memory discount store.
//!
//! An ordered `Vec` of records rebuilt from the seed on every start. Order
//! is insertion order and is what the filter engine preserves.

use std::collections::BTreeSet;

use serde::Serialize;
use validator::Validate;

use crate::clipboard::{self, CopyError, CopyReceipt, TieredClipboard};
use crate::discount::{
    Category, CreateDiscount, Discount, PublicOffer, UpdateDiscount, KNOWN_CATEGORIES,
};
use crate::error::CoreError;
use crate::filter::{self, FilterConfig};
use crate::seed;
use crate::types::{DiscountId, Timestamp};

const ENTITY: &str = "Discount";

/// Aggregate numbers for the profile and dashboard headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountStats {
    pub total: usize,
    pub public: usize,
    pub expiring_soon: usize,
    pub total_copies: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DiscountStore {
    records: Vec<Discount>,
}

impl DiscountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the demo seed, with expiry dates relative to `now`.
    pub fn from_seed(now: Timestamp) -> Self {
        Self {
            records: seed::seed_discounts(now),
        }
    }

    pub fn list(&self) -> &[Discount] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: DiscountId) -> Result<&Discount, CoreError> {
        self.records
            .iter()
            .find(|d| d.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    fn get_mut(&mut self, id: DiscountId) -> Result<&mut Discount, CoreError> {
        self.records
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Validate `input`, assign a fresh id, and append the new record.
    pub fn create(&mut self, input: CreateDiscount) -> Result<&Discount, CoreError> {
        input.validate()?;
        let discount = Discount::from_create(uuid::Uuid::now_v7(), input);
        self.insert(discount)
    }

    /// Append a fully formed record. Fails on a duplicate id.
    pub fn insert(&mut self, discount: Discount) -> Result<&Discount, CoreError> {
        if self.records.iter().any(|d| d.id == discount.id) {
            return Err(CoreError::Conflict(format!(
                "Discount with id {} already exists",
                discount.id
            )));
        }
        self.records.push(discount);
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    pub fn update(&mut self, id: DiscountId, input: UpdateDiscount) -> Result<&Discount, CoreError> {
        input.validate()?;
        let discount = self.get_mut(id)?;
        discount.apply_update(input);
        Ok(&*discount)
    }

    /// Remove and return a record.
    pub fn delete(&mut self, id: DiscountId) -> Result<Discount, CoreError> {
        let index = self
            .records
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        Ok(self.records.remove(index))
    }

    /// Record a copy performed outside this process, e.g. by a browser.
    pub fn record_copy(&mut self, id: DiscountId, at: Timestamp) -> Result<&Discount, CoreError> {
        let discount = self.get_mut(id)?;
        discount.record_copy(at);
        Ok(&*discount)
    }

    /// Copy a record's code through `clipboard` and record the copy on success.
    pub fn copy_code(
        &mut self,
        id: DiscountId,
        clipboard: &TieredClipboard,
        now: Timestamp,
    ) -> Result<CopyReceipt, CopyError> {
        let discount = self.get_mut(id)?;
        Ok(clipboard::copy_code(discount, clipboard, now)?)
    }

    pub fn filtered(&self, config: &FilterConfig, now: Timestamp) -> Vec<&Discount> {
        filter::filter_discounts(&self.records, config, now)
    }

    /// Public records matching `query`, with codes masked.
    pub fn public_offers(&self, query: &str, now: Timestamp) -> Vec<PublicOffer> {
        let config = FilterConfig {
            query: query.to_string(),
            ..Default::default()
        };
        self.records
            .iter()
            .filter(|d| d.is_public && filter::matches(d, &config, now))
            .map(PublicOffer::from)
            .collect()
    }

    /// The known taxonomy in display order, then any other labels in use,
    /// sorted.
    pub fn categories(&self) -> Vec<Category> {
        let custom: BTreeSet<&Category> = self
            .records
            .iter()
            .filter_map(|d| d.category.as_ref())
            .filter(|c| !c.is_known())
            .collect();

        KNOWN_CATEGORIES
            .iter()
            .map(|label| Category::from(*label))
            .chain(custom.into_iter().cloned())
            .collect()
    }

    pub fn stats(&self, now: Timestamp) -> DiscountStats {
        DiscountStats {
            total: self.records.len(),
            public: self.records.iter().filter(|d| d.is_public).count(),
            expiring_soon: self
                .records
                .iter()
                .filter(|d| d.is_expiring_soon(now))
                .count(),
            total_copies: self.records.iter().map(|d| d.copied_count).sum(),
        }
    }
}
