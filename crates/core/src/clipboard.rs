//! Copy-to-clipboard action for discount codes.
//!
//! The clipboard is write-only and has two tiers: a primary mechanism and a
//! legacy fallback used when the primary is unavailable. Copy statistics on
//! the record change only after a write succeeds.

use crate::discount::Discount;
use crate::error::CoreError;
use crate::types::Timestamp;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("No clipboard mechanism is available")]
    Unavailable,

    #[error("{tier} clipboard write failed: {reason}")]
    WriteFailed { tier: ClipboardTier, reason: String },
}

/// Failure of a store-level copy: either the record is missing or the
/// clipboard refused the write.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Which clipboard tier performed a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardTier {
    Primary,
    Legacy,
}

impl std::fmt::Display for ClipboardTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardTier::Primary => f.write_str("primary"),
            ClipboardTier::Legacy => f.write_str("legacy"),
        }
    }
}

/// A single clipboard mechanism.
pub trait ClipboardBackend: Send + Sync {
    /// Whether the mechanism exists in the current environment.
    fn is_available(&self) -> bool;

    /// Write `text`. Errors carry a human-readable reason.
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Primary clipboard with a legacy fallback.
pub struct TieredClipboard {
    primary: Box<dyn ClipboardBackend>,
    legacy: Box<dyn ClipboardBackend>,
}

impl TieredClipboard {
    pub fn new(primary: Box<dyn ClipboardBackend>, legacy: Box<dyn ClipboardBackend>) -> Self {
        Self { primary, legacy }
    }

    /// Write through the primary tier, or the legacy tier when the primary
    /// is unavailable. A primary that is available but fails is reported as
    /// a failure; the legacy tier is not retried in that case.
    pub fn write_text(&self, text: &str) -> Result<ClipboardTier, ClipboardError> {
        let (tier, backend) = if self.primary.is_available() {
            (ClipboardTier::Primary, &self.primary)
        } else if self.legacy.is_available() {
            (ClipboardTier::Legacy, &self.legacy)
        } else {
            return Err(ClipboardError::Unavailable);
        };

        backend
            .write_text(text)
            .map(|()| tier)
            .map_err(|reason| ClipboardError::WriteFailed { tier, reason })
    }
}

/// Outcome of a successful copy.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyReceipt {
    pub tier: ClipboardTier,
    pub copied_count: u64,
    pub last_copied: Timestamp,
}

/// Copy a discount code to the clipboard and record the copy on success.
///
/// On failure the record is left untouched and the error is logged as a
/// warning before being returned.
pub fn copy_code(
    discount: &mut Discount,
    clipboard: &TieredClipboard,
    now: Timestamp,
) -> Result<CopyReceipt, ClipboardError> {
    match clipboard.write_text(&discount.code) {
        Ok(tier) => {
            discount.record_copy(now);
            tracing::debug!(
                discount_id = %discount.id,
                %tier,
                copied_count = discount.copied_count,
                "Discount code copied",
            );
            Ok(CopyReceipt {
                tier,
                copied_count: discount.copied_count,
                last_copied: now,
            })
        }
        Err(e) => {
            tracing::warn!(discount_id = %discount.id, error = %e, "Failed to copy discount code");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::discount::OfferType;

    /// Records writes into a shared buffer so tests can inspect them.
    #[derive(Clone)]
    struct FakeBackend {
        available: bool,
        fail: bool,
        written: Arc<Mutex<Vec<String>>>,
    }

    impl FakeBackend {
        fn working() -> Self {
            Self {
                available: true,
                fail: false,
                written: Arc::default(),
            }
        }

        fn missing() -> Self {
            Self {
                available: false,
                ..Self::working()
            }
        }

        fn broken() -> Self {
            Self {
                fail: true,
                ..Self::working()
            }
        }

        fn writes(&self) -> Vec<String> {
            self.written.lock().unwrap().clone()
        }
    }

    impl ClipboardBackend for FakeBackend {
        fn is_available(&self) -> bool {
            self.available
        }

        fn write_text(&self, text: &str) -> Result<(), String> {
            if self.fail {
                return Err("permission denied".to_string());
            }
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
    }

    fn discount_with_count(copied_count: u64) -> Discount {
        Discount {
            id: uuid::Uuid::now_v7(),
            brand: "Starbucks".to_string(),
            offer_type: OfferType::Deal,
            code: "COFFEE2".to_string(),
            expiry_date: "2025-02-01".to_string(),
            description: None,
            url: None,
            logo: None,
            category: None,
            is_public: false,
            copied_count,
            last_copied: None,
        }
    }

    #[test]
    fn primary_write_increments_count() {
        let primary = FakeBackend::working();
        let clipboard = TieredClipboard::new(Box::new(primary.clone()), Box::new(FakeBackend::working()));
        let mut discount = discount_with_count(2);

        let receipt = copy_code(&mut discount, &clipboard, now()).unwrap();

        assert_eq!(receipt.tier, ClipboardTier::Primary);
        assert_eq!(discount.copied_count, 3);
        assert_eq!(discount.last_copied, Some(now()));
        assert_eq!(primary.writes(), ["COFFEE2"]);
    }

    #[test]
    fn repeated_copies_keep_counting() {
        let clipboard =
            TieredClipboard::new(Box::new(FakeBackend::working()), Box::new(FakeBackend::working()));
        let mut discount = discount_with_count(2);

        copy_code(&mut discount, &clipboard, now()).unwrap();
        let later = now() + Duration::milliseconds(5);
        copy_code(&mut discount, &clipboard, later).unwrap();

        assert_eq!(discount.copied_count, 4);
        assert_eq!(discount.last_copied, Some(later));
    }

    #[test]
    fn falls_back_to_legacy_when_primary_missing() {
        let legacy = FakeBackend::working();
        let clipboard = TieredClipboard::new(Box::new(FakeBackend::missing()), Box::new(legacy.clone()));
        let mut discount = discount_with_count(0);

        let receipt = copy_code(&mut discount, &clipboard, now()).unwrap();

        assert_eq!(receipt.tier, ClipboardTier::Legacy);
        assert_eq!(discount.copied_count, 1);
        assert_eq!(legacy.writes(), ["COFFEE2"]);
    }

    #[test]
    fn no_mechanism_leaves_record_unchanged() {
        let clipboard =
            TieredClipboard::new(Box::new(FakeBackend::missing()), Box::new(FakeBackend::missing()));
        let mut discount = discount_with_count(5);
        let before = discount.clone();

        let result = copy_code(&mut discount, &clipboard, now());

        assert_matches!(result, Err(ClipboardError::Unavailable));
        assert_eq!(discount, before);
    }

    #[test]
    fn failed_primary_write_leaves_record_unchanged() {
        let legacy = FakeBackend::working();
        let clipboard = TieredClipboard::new(Box::new(FakeBackend::broken()), Box::new(legacy.clone()));
        let mut discount = discount_with_count(1);

        let result = copy_code(&mut discount, &clipboard, now());

        assert_matches!(
            result,
            Err(ClipboardError::WriteFailed { tier: ClipboardTier::Primary, .. })
        );
        assert_eq!(discount.copied_count, 1);
        assert_eq!(discount.last_copied, None);
        assert!(legacy.writes().is_empty());
    }
}
