//! Discount record model, payloads, and the public projection.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

use crate::error::CoreError;
use crate::expiry;
use crate::types::{DiscountId, Timestamp};

// ---------------------------------------------------------------------------
// Offer type
// ---------------------------------------------------------------------------

/// Kind of offer a discount represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OfferType {
    Coupon,
    Cashback,
    Referral,
    Deal,
}

impl OfferType {
    pub const ALL: [OfferType; 4] = [
        OfferType::Coupon,
        OfferType::Cashback,
        OfferType::Referral,
        OfferType::Deal,
    ];

    /// Display label, also used for free-text search.
    pub fn label(self) -> &'static str {
        match self {
            OfferType::Coupon => "Coupon",
            OfferType::Cashback => "Cashback",
            OfferType::Referral => "Referral",
            OfferType::Deal => "Deal",
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OfferType {
    type Err = CoreError;

    /// Case-insensitive parse of an offer type label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OfferType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid offer type '{s}'. Must be one of: Coupon, Cashback, Referral, Deal"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

pub const CATEGORY_FOOD_AND_DINING: &str = "Food & Dining";
pub const CATEGORY_SHOPPING: &str = "Shopping";
pub const CATEGORY_TRAVEL: &str = "Travel";
pub const CATEGORY_ENTERTAINMENT: &str = "Entertainment";
pub const CATEGORY_ELECTRONICS: &str = "Electronics";
pub const CATEGORY_FASHION: &str = "Fashion";
pub const CATEGORY_HEALTH_AND_BEAUTY: &str = "Health & Beauty";
pub const CATEGORY_HOME_AND_GARDEN: &str = "Home & Garden";
pub const CATEGORY_OTHER: &str = "Other";

/// Category labels offered by the UI. The set is open: records may carry
/// any other non-empty label.
pub const KNOWN_CATEGORIES: &[&str] = &[
    CATEGORY_FOOD_AND_DINING,
    CATEGORY_SHOPPING,
    CATEGORY_TRAVEL,
    CATEGORY_ENTERTAINMENT,
    CATEGORY_ELECTRONICS,
    CATEGORY_FASHION,
    CATEGORY_HEALTH_AND_BEAUTY,
    CATEGORY_HOME_AND_GARDEN,
    CATEGORY_OTHER,
];

/// An opaque category label. Compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label is one of [`KNOWN_CATEGORIES`].
    pub fn is_known(&self) -> bool {
        KNOWN_CATEGORIES.contains(&self.0.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

// ---------------------------------------------------------------------------
// Discount record
// ---------------------------------------------------------------------------

/// A single trackable offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: DiscountId,
    pub brand: String,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub code: String,
    /// ISO 8601 text. Kept raw so malformed values survive a round trip.
    pub expiry_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub copied_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_copied: Option<Timestamp>,
}

impl Discount {
    /// Build a new record from a validated create payload.
    pub fn from_create(id: DiscountId, input: CreateDiscount) -> Self {
        Self {
            id,
            brand: input.brand,
            offer_type: input.offer_type,
            code: input.code,
            expiry_date: input.expiry_date,
            description: input.description,
            url: input.url,
            logo: input.logo,
            category: input.category,
            is_public: input.is_public,
            copied_count: 0,
            last_copied: None,
        }
    }

    /// Apply the provided fields of an update. Copy statistics are untouched.
    ///
    /// Optional fields sent as `null` or as blank text are cleared.
    pub fn apply_update(&mut self, input: UpdateDiscount) {
        if let Some(brand) = input.brand {
            self.brand = brand;
        }
        if let Some(offer_type) = input.offer_type {
            self.offer_type = offer_type;
        }
        if let Some(code) = input.code {
            self.code = code;
        }
        if let Some(expiry_date) = input.expiry_date {
            self.expiry_date = expiry_date;
        }
        if let Some(description) = input.description {
            self.description = non_blank(description);
        }
        if let Some(url) = input.url {
            self.url = non_blank(url);
        }
        if let Some(logo) = input.logo {
            self.logo = non_blank(logo);
        }
        if let Some(category) = input.category {
            self.category = category.filter(|c| !c.as_str().trim().is_empty());
        }
        if let Some(is_public) = input.is_public {
            self.is_public = is_public;
        }
    }

    /// Whole days until expiry (ceiling), or `None` for an unparseable date.
    pub fn days_until_expiry(&self, now: Timestamp) -> Option<i64> {
        expiry::days_until_raw(&self.expiry_date, now)
    }

    pub fn is_expiring_soon(&self, now: Timestamp) -> bool {
        expiry::is_expiring_soon(&self.expiry_date, now)
    }

    /// Count a successful copy. The counter never decreases.
    pub fn record_copy(&mut self, at: Timestamp) {
        self.copied_count = self.copied_count.saturating_add(1);
        self.last_copied = Some(at);
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload for creating a discount.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscount {
    #[validate(custom(function = "validate_not_blank"))]
    pub brand: String,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    #[validate(custom(function = "validate_not_blank"))]
    pub code: String,
    #[validate(custom(function = "validate_expiry_date"))]
    pub expiry_date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(url(message = "url must be a valid URL"))]
    pub url: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_category"))]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_public: bool,
}

/// Payload for editing a discount.
///
/// Absent fields are left unchanged. The optional fields distinguish an
/// absent key (`None`) from an explicit `null` (`Some(None)`), which clears
/// the value on the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_optionals"))]
pub struct UpdateDiscount {
    #[validate(custom(function = "validate_not_blank"))]
    pub brand: Option<String>,
    #[serde(rename = "type")]
    pub offer_type: Option<OfferType>,
    #[validate(custom(function = "validate_not_blank"))]
    pub code: Option<String>,
    #[validate(custom(function = "validate_expiry_date"))]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub category: Option<Option<Category>>,
    pub is_public: Option<bool>,
}

/// Read a present key as `Some`, so `null` becomes `Some(None)`. Absent keys
/// fall back to `None` through `#[serde(default)]`.
fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Blank values clear the field, so only non-blank URLs are checked.
fn validate_update_optionals(input: &UpdateDiscount) -> Result<(), ValidationError> {
    match input.url.as_ref().and_then(Option::as_deref) {
        Some(url) if !url.trim().is_empty() && !url.validate_url() => Err(ValidationError::new(
            "url",
        )
        .with_message(Cow::from("url must be a valid URL"))),
        _ => Ok(()),
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(Cow::from("must not be blank")))
    } else {
        Ok(())
    }
}

fn validate_expiry_date(raw: &str) -> Result<(), ValidationError> {
    if expiry::parse_expiry(raw).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("expiry_date")
            .with_message(Cow::from("expiryDate must be an ISO 8601 date")))
    }
}

fn validate_category(category: &Category) -> Result<(), ValidationError> {
    if category.as_str().trim().is_empty() {
        Err(ValidationError::new("category").with_message(Cow::from("category must not be blank")))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public projection
// ---------------------------------------------------------------------------

/// Placeholder shown instead of the code until the viewer signs in.
pub const CODE_MASK: &str = "••••••••";

/// A public discount as shown to signed-out viewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOffer {
    pub id: DiscountId,
    pub brand: String,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub expiry_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Always [`CODE_MASK`]; the real code never leaves the store.
    pub code: &'static str,
}

impl From<&Discount> for PublicOffer {
    fn from(discount: &Discount) -> Self {
        Self {
            id: discount.id,
            brand: discount.brand.clone(),
            offer_type: discount.offer_type,
            expiry_date: discount.expiry_date.clone(),
            description: discount.description.clone(),
            logo: discount.logo.clone(),
            category: discount.category.clone(),
            code: CODE_MASK,
        }
    }
}
