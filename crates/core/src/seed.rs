//! Demo records loaded into a fresh store.

use chrono::Duration;

use crate::discount::{
    Category, Discount, OfferType, CATEGORY_ELECTRONICS, CATEGORY_ENTERTAINMENT, CATEGORY_FASHION,
    CATEGORY_FOOD_AND_DINING, CATEGORY_SHOPPING, CATEGORY_TRAVEL,
};
use crate::types::Timestamp;

struct SeedRow {
    brand: &'static str,
    offer_type: OfferType,
    code: &'static str,
    expires_in_days: i64,
    description: &'static str,
    url: &'static str,
    category: &'static str,
    is_public: bool,
    copied_count: u64,
}

const SEED_ROWS: &[SeedRow] = &[
    SeedRow {
        brand: "Nike",
        offer_type: OfferType::Coupon,
        code: "SUMMER25",
        expires_in_days: 3,
        description: "25% off summer collection",
        url: "https://www.nike.com",
        category: CATEGORY_FASHION,
        is_public: true,
        copied_count: 5,
    },
    SeedRow {
        brand: "Amazon",
        offer_type: OfferType::Cashback,
        code: "AMZCASH10",
        expires_in_days: 30,
        description: "10% cashback on electronics",
        url: "https://www.amazon.com",
        category: CATEGORY_SHOPPING,
        is_public: false,
        copied_count: 2,
    },
    SeedRow {
        brand: "Uber Eats",
        offer_type: OfferType::Referral,
        code: "EATS-JANE15",
        expires_in_days: 14,
        description: "$15 off your first order",
        url: "https://www.ubereats.com",
        category: CATEGORY_FOOD_AND_DINING,
        is_public: true,
        copied_count: 0,
    },
    SeedRow {
        brand: "Airbnb",
        offer_type: OfferType::Deal,
        code: "STAYLONGER",
        expires_in_days: 60,
        description: "Weekly stay discount",
        url: "https://www.airbnb.com",
        category: CATEGORY_TRAVEL,
        is_public: false,
        copied_count: 1,
    },
    SeedRow {
        brand: "Best Buy",
        offer_type: OfferType::Coupon,
        code: "TECH50",
        expires_in_days: 6,
        description: "$50 off orders over $500",
        url: "https://www.bestbuy.com",
        category: CATEGORY_ELECTRONICS,
        is_public: true,
        copied_count: 8,
    },
    SeedRow {
        brand: "Spotify",
        offer_type: OfferType::Deal,
        code: "PREMIUM3FREE",
        expires_in_days: -2,
        description: "3 months of Premium free",
        url: "https://www.spotify.com",
        category: CATEGORY_ENTERTAINMENT,
        is_public: false,
        copied_count: 3,
    },
];

/// Build the demo records with expiry dates relative to `now`.
pub fn seed_discounts(now: Timestamp) -> Vec<Discount> {
    SEED_ROWS
        .iter()
        .map(|row| Discount {
            id: uuid::Uuid::now_v7(),
            brand: row.brand.to_string(),
            offer_type: row.offer_type,
            code: row.code.to_string(),
            expiry_date: (now + Duration::days(row.expires_in_days))
                .format("%Y-%m-%d")
                .to_string(),
            description: Some(row.description.to_string()),
            url: Some(row.url.to_string()),
            logo: None,
            category: Some(Category::from(row.category)),
            is_public: row.is_public,
            copied_count: row.copied_count,
            last_copied: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn seed_ids_are_unique() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let records = seed_discounts(now);
        let ids: HashSet<_> = records.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn seed_dates_parse_and_categories_are_known() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        for record in seed_discounts(now) {
            assert!(record.days_until_expiry(now).is_some(), "{}", record.brand);
            assert!(record.category.as_ref().is_some_and(Category::is_known));
        }
    }
}
