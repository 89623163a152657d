//! Simulated offer extraction from uploaded images.
//!
//! [`ExtractionSlot`] runs at most one extraction at a time. Starting a new
//! upload cancels the pending one before the new task is spawned, and a task
//! only publishes its result while its upload is still the current one, so a
//! superseded upload can never overwrite newer state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::discount::{CreateDiscount, OfferType};
use crate::error::CoreError;

/// Delay before a simulated extraction completes.
pub const DEFAULT_EXTRACTION_DELAY: Duration = Duration::from_millis(2000);

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Upload and result types
// ---------------------------------------------------------------------------

/// An image handed to the extractor.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Reject empty, oversized, and non-image uploads.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.bytes.is_empty() {
            return Err(CoreError::Validation("Upload is empty".to_string()));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(CoreError::Validation(format!(
                "Upload is {} bytes, limit is {MAX_UPLOAD_BYTES}",
                self.bytes.len()
            )));
        }
        if !self.content_type.starts_with("image/") {
            return Err(CoreError::Validation(format!(
                "Unsupported content type '{}', expected an image",
                self.content_type
            )));
        }
        Ok(())
    }
}

/// Offer fields read from an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedOffer {
    pub brand: String,
    pub code: String,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub description: String,
}

impl ExtractedOffer {
    /// Prefill a create payload. The caller still chooses the expiry date.
    pub fn into_create(self, expiry_date: String) -> CreateDiscount {
        CreateDiscount {
            brand: self.brand,
            offer_type: self.offer_type,
            code: self.code,
            expiry_date,
            description: Some(self.description),
            url: None,
            logo: None,
            category: None,
            is_public: false,
        }
    }
}

/// Reads offer fields from an uploaded image.
pub trait OfferExtractor: Send + Sync + 'static {
    fn extract(&self, upload: &ImageUpload) -> ExtractedOffer;
}

/// Stand-in extractor that always reports the same offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedExtractor;

impl OfferExtractor for SimulatedExtractor {
    fn extract(&self, _upload: &ImageUpload) -> ExtractedOffer {
        ExtractedOffer {
            brand: "Nike".to_string(),
            code: "SUMMER25".to_string(),
            offer_type: OfferType::Coupon,
            description: "25% off summer collection".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// State of the extraction slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExtractionStatus {
    Idle,
    Processing { upload_id: Uuid },
    Ready { upload_id: Uuid, offer: ExtractedOffer },
}

struct ActiveExtraction {
    upload_id: Uuid,
    cancel: CancellationToken,
}

/// Single-slot runner for extractions with cancel-on-supersede.
pub struct ExtractionSlot {
    extractor: Arc<dyn OfferExtractor>,
    delay: Duration,
    status_tx: Arc<watch::Sender<ExtractionStatus>>,
    active: Mutex<Option<ActiveExtraction>>,
}

impl ExtractionSlot {
    pub fn new(extractor: Arc<dyn OfferExtractor>, delay: Duration) -> Self {
        let (status_tx, _) = watch::channel(ExtractionStatus::Idle);
        Self {
            extractor,
            delay,
            status_tx: Arc::new(status_tx),
            active: Mutex::new(None),
        }
    }

    /// A slot backed by [`SimulatedExtractor`].
    pub fn simulated(delay: Duration) -> Self {
        Self::new(Arc::new(SimulatedExtractor), delay)
    }

    pub fn status(&self) -> ExtractionStatus {
        self.status_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExtractionStatus> {
        self.status_tx.subscribe()
    }

    /// Start extracting `upload`, cancelling any pending extraction first.
    ///
    /// Returns the id assigned to this upload. Must be called from within a
    /// Tokio runtime.
    pub async fn start(&self, upload: ImageUpload) -> Result<Uuid, CoreError> {
        upload.validate()?;

        let upload_id = Uuid::new_v4();
        let cancel = CancellationToken::new();

        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
            tracing::info!(
                superseded = %previous.upload_id,
                upload_id = %upload_id,
                "Superseding pending extraction",
            );
        }
        self.status_tx
            .send_replace(ExtractionStatus::Processing { upload_id });
        *active = Some(ActiveExtraction {
            upload_id,
            cancel: cancel.clone(),
        });
        drop(active);

        tracing::info!(
            upload_id = %upload_id,
            file_name = %upload.file_name,
            bytes = upload.bytes.len(),
            "Extraction started",
        );

        let extractor = Arc::clone(&self.extractor);
        let status_tx = Arc::clone(&self.status_tx);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(upload_id = %upload_id, "Extraction cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let offer = extractor.extract(&upload);
                    let applied = status_tx.send_if_modified(|status| {
                        let is_current = matches!(
                            status,
                            ExtractionStatus::Processing { upload_id: current } if *current == upload_id
                        );
                        if !is_current || cancel.is_cancelled() {
                            return false;
                        }
                        *status = ExtractionStatus::Ready { upload_id, offer };
                        true
                    });
                    if applied {
                        tracing::info!(upload_id = %upload_id, "Extraction ready");
                    } else {
                        tracing::debug!(upload_id = %upload_id, "Dropping stale extraction result");
                    }
                }
            }
        });

        Ok(upload_id)
    }

    /// Reset a ready result for `upload_id` to idle once it has been saved.
    ///
    /// Returns `false` if the slot has since moved on to another upload.
    pub fn clear_ready(&self, upload_id: Uuid) -> bool {
        self.status_tx.send_if_modified(|status| {
            let is_ready = matches!(
                status,
                ExtractionStatus::Ready { upload_id: current, .. } if *current == upload_id
            );
            if is_ready {
                *status = ExtractionStatus::Idle;
            }
            is_ready
        })
    }

    /// Cancel the pending extraction, if any, and reset the slot to idle.
    ///
    /// Returns `true` if an extraction was still processing.
    pub async fn cancel(&self) -> bool {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
        }
        let previous = self.status_tx.send_replace(ExtractionStatus::Idle);
        let was_processing = matches!(previous, ExtractionStatus::Processing { .. });
        if was_processing {
            tracing::info!("Pending extraction cancelled");
        }
        was_processing
    }
}

impl Drop for ExtractionSlot {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Reports the file name as the brand so tests can tell uploads apart.
    struct EchoExtractor;

    impl OfferExtractor for EchoExtractor {
        fn extract(&self, upload: &ImageUpload) -> ExtractedOffer {
            ExtractedOffer {
                brand: upload.file_name.clone(),
                code: "ECHO".to_string(),
                offer_type: OfferType::Deal,
                description: String::new(),
            }
        }
    }

    fn upload(file_name: &str) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn echo_slot() -> ExtractionSlot {
        ExtractionSlot::new(Arc::new(EchoExtractor), DEFAULT_EXTRACTION_DELAY)
    }

    // -- validation ---------------------------------------------------------

    #[test]
    fn upload_validation() {
        assert!(upload("a.png").validate().is_ok());

        let mut empty = upload("a.png");
        empty.bytes.clear();
        assert_matches!(empty.validate(), Err(CoreError::Validation(_)));

        let mut text = upload("a.txt");
        text.content_type = "text/plain".to_string();
        assert_matches!(text.validate(), Err(CoreError::Validation(_)));

        let mut huge = upload("a.png");
        huge.bytes = vec![0; MAX_UPLOAD_BYTES + 1];
        assert_matches!(huge.validate(), Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_upload_leaves_slot_idle() {
        let slot = echo_slot();
        let mut text = upload("notes.txt");
        text.content_type = "text/plain".to_string();

        assert!(slot.start(text).await.is_err());
        assert_eq!(slot.status(), ExtractionStatus::Idle);
    }

    // -- lifecycle ----------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn extraction_completes_after_delay() {
        let slot = ExtractionSlot::simulated(DEFAULT_EXTRACTION_DELAY);
        let upload_id = slot.start(upload("receipt.jpg")).await.unwrap();

        assert_eq!(slot.status(), ExtractionStatus::Processing { upload_id });

        tokio::time::sleep(DEFAULT_EXTRACTION_DELAY + Duration::from_millis(1)).await;

        assert_matches!(
            slot.status(),
            ExtractionStatus::Ready { upload_id: id, offer }
                if id == upload_id && offer.code == "SUMMER25" && offer.brand == "Nike"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_upload_never_applies() {
        let slot = echo_slot();

        slot.start(upload("a.png")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let b = slot.start(upload("b.png")).await.unwrap();

        // A's deadline passes while B is still processing.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(slot.status(), ExtractionStatus::Processing { upload_id: b });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_matches!(
            slot.status(),
            ExtractionStatus::Ready { upload_id, offer } if upload_id == b && offer.brand == "b.png"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_sees_only_latest_result() {
        let slot = echo_slot();
        let mut rx = slot.subscribe();

        slot.start(upload("a.png")).await.unwrap();
        let b = slot.start(upload("b.png")).await.unwrap();

        loop {
            rx.changed().await.unwrap();
            let status = rx.borrow_and_update().clone();
            if let ExtractionStatus::Ready { upload_id, offer } = status {
                assert_eq!(upload_id, b);
                assert_eq!(offer.brand, "b.png");
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_resets_to_idle() {
        let slot = echo_slot();
        slot.start(upload("a.png")).await.unwrap();

        assert!(slot.cancel().await);
        tokio::time::sleep(DEFAULT_EXTRACTION_DELAY * 2).await;

        assert_eq!(slot.status(), ExtractionStatus::Idle);
        assert!(!slot.cancel().await);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_ready_only_resets_matching_result() {
        let slot = echo_slot();
        let a = slot.start(upload("a.png")).await.unwrap();
        assert!(!slot.clear_ready(a));

        tokio::time::sleep(DEFAULT_EXTRACTION_DELAY * 2).await;
        assert!(!slot.clear_ready(Uuid::new_v4()));
        assert!(slot.clear_ready(a));
        assert_eq!(slot.status(), ExtractionStatus::Idle);
    }

    #[test]
    fn extracted_offer_prefills_create_payload() {
        let offer = SimulatedExtractor.extract(&upload("x.png"));
        let create = offer.into_create("2025-12-31".to_string());

        assert_eq!(create.brand, "Nike");
        assert_eq!(create.code, "SUMMER25");
        assert_eq!(create.description.as_deref(), Some("25% off summer collection"));
        assert!(!create.is_public);
    }

    #[test]
    fn status_serializes_with_tag() {
        let upload_id = Uuid::nil();
        let json = serde_json::to_value(ExtractionStatus::Processing { upload_id }).unwrap();
        assert_eq!(json["status"], "processing");
        assert_eq!(json["uploadId"], upload_id.to_string());
    }
}
