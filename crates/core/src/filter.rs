//! Filter predicate engine for the discount list.
//!
//! Every function here is pure: the caller supplies the records, the filter
//! configuration, and the evaluation instant. Results keep store order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::discount::{Category, Discount, OfferType};
use crate::types::Timestamp;

/// A snapshot of the user's search and filter selections.
///
/// The default value imposes no constraint at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Free-text query. Empty means no text constraint.
    #[serde(default)]
    pub query: String,
    /// Selected categories. Empty means no category constraint.
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    /// Selected offer types. Empty means no type constraint.
    #[serde(default)]
    pub types: BTreeSet<OfferType>,
    /// Only keep discounts expiring within seven days (or already expired).
    #[serde(default)]
    pub expiring_soon: bool,
}

impl FilterConfig {
    /// Whether this configuration lets every record through.
    pub fn is_unconstrained(&self) -> bool {
        self.query.is_empty()
            && self.categories.is_empty()
            && self.types.is_empty()
            && !self.expiring_soon
    }
}

/// Decide whether `record` passes every active constraint in `config`.
pub fn matches(record: &Discount, config: &FilterConfig, now: Timestamp) -> bool {
    matches_query(record, &config.query)
        && matches_category(record, &config.categories)
        && matches_type(record, &config.types)
        && (!config.expiring_soon || record.is_expiring_soon(now))
}

/// Keep the records that match `config`, preserving their relative order.
pub fn filter_discounts<'a>(
    records: &'a [Discount],
    config: &FilterConfig,
    now: Timestamp,
) -> Vec<&'a Discount> {
    records
        .iter()
        .filter(|record| matches(record, config, now))
        .collect()
}

/// Case-insensitive substring match against brand, code, type label,
/// description, and category.
pub fn matches_query(record: &Discount, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(record.brand.as_str())
        || contains(record.code.as_str())
        || contains(record.offer_type.label())
        || record.description.as_deref().is_some_and(contains)
        || record
            .category
            .as_ref()
            .is_some_and(|category| contains(category.as_str()))
}

/// A non-empty selection requires the record to carry one of the selected
/// categories. Uncategorized records fail any non-empty selection.
pub fn matches_category(record: &Discount, selected: &BTreeSet<Category>) -> bool {
    if selected.is_empty() {
        return true;
    }

    record
        .category
        .as_ref()
        .is_some_and(|category| selected.contains(category))
}

pub fn matches_type(record: &Discount, selected: &BTreeSet<OfferType>) -> bool {
    selected.is_empty() || selected.contains(&record.offer_type)
}
