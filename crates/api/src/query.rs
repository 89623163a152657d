//! Shared query parameter types for API handlers.

use std::collections::BTreeSet;

use dtrack_core::discount::{Category, OfferType};
use dtrack_core::error::CoreError;
use dtrack_core::filter::FilterConfig;
use serde::Deserialize;

/// Query parameters for `GET /discounts`.
///
/// `categories` and `types` are comma-separated lists, e.g.
/// `?categories=Fashion,Travel&types=coupon,deal&expiringSoon=true`.
/// `expiring_soon` is accepted as an alias.
#[derive(Debug, Default, Deserialize)]
pub struct DiscountFilterParams {
    pub q: Option<String>,
    pub categories: Option<String>,
    pub types: Option<String>,
    #[serde(default, rename = "expiringSoon", alias = "expiring_soon")]
    pub expiring_soon: bool,
}

impl DiscountFilterParams {
    /// Convert into a filter snapshot. Unknown offer types are rejected;
    /// category labels are taken as given.
    pub fn into_config(self) -> Result<FilterConfig, CoreError> {
        let categories: BTreeSet<Category> = split_list(self.categories.as_deref())
            .map(Category::from)
            .collect();

        let types = split_list(self.types.as_deref())
            .map(str::parse::<OfferType>)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(FilterConfig {
            query: self.q.unwrap_or_default(),
            categories,
            types,
            expiring_soon: self.expiring_soon,
        })
    }
}

/// Query parameters for `GET /public-offers`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_params_give_unconstrained_config() {
        let config = DiscountFilterParams::default().into_config().unwrap();
        assert!(config.is_unconstrained());
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let params = DiscountFilterParams {
            q: Some("nike".to_string()),
            categories: Some("Fashion, Food & Dining,".to_string()),
            types: Some("coupon,Deal".to_string()),
            expiring_soon: true,
        };
        let config = params.into_config().unwrap();

        assert_eq!(config.query, "nike");
        assert!(config.categories.contains(&Category::from("Food & Dining")));
        assert_eq!(config.categories.len(), 2);
        assert_eq!(
            config.types,
            [OfferType::Coupon, OfferType::Deal].into_iter().collect()
        );
        assert!(config.expiring_soon);
    }

    #[test]
    fn expiring_soon_reads_camel_case_and_alias() {
        for json in [
            serde_json::json!({ "expiringSoon": true }),
            serde_json::json!({ "expiring_soon": true }),
        ] {
            let params: DiscountFilterParams = serde_json::from_value(json).unwrap();
            assert!(params.expiring_soon);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let params = DiscountFilterParams {
            types: Some("voucher".to_string()),
            ..Default::default()
        };
        assert_matches!(params.into_config(), Err(CoreError::Validation(_)));
    }
}
