//! Scanned-invoice intake: batch extraction with retries, then purchase
//! vouchers built from whatever the extractor recognized

use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::books::Registry;
use crate::tax::gst::{self, RateFallback, TaxScope};
use crate::traits::{ExtractedInvoice, InvoiceExtractor};
use crate::types::*;

/// Retry schedule for extraction calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up
    pub max_retries: u32,
    /// Wait before the second attempt; doubles after every failure
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Call the extractor until it succeeds or the retry budget runs out.
///
/// Each failure is logged and followed by a sleep that doubles in length.
/// Exhausting the budget yields a single terminal error regardless of what
/// the individual attempts reported.
pub async fn extract_with_retry(
    extractor: &dyn InvoiceExtractor,
    bytes: &[u8],
    mime_type: &str,
    policy: &RetryPolicy,
) -> BooksResult<ExtractedInvoice> {
    let mut attempt = 0u32;
    let mut delay = policy.initial_delay;

    loop {
        match extractor.extract_invoice(bytes, mime_type).await {
            Ok(extraction) => return Ok(extraction),
            Err(err) => {
                attempt += 1;
                warn!(attempt, error = %err, "invoice extraction attempt failed");
                if attempt >= policy.max_retries {
                    return Err(BooksError::Extraction(
                        "Failed to extract invoice data after multiple retries.".to_string(),
                    ));
                }
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}

/// Lifecycle of one uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Pending,
    Processing,
    Success,
    Error(String),
}

/// One file queued for extraction
#[derive(Debug, Clone)]
pub struct InvoiceUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub status: UploadStatus,
    pub extraction: Option<ExtractedInvoice>,
}

/// A mass-upload batch, processed one file at a time
#[derive(Debug, Default)]
pub struct InvoiceBatch {
    uploads: Vec<InvoiceUpload>,
    policy: RetryPolicy,
}

impl InvoiceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            uploads: Vec::new(),
            policy,
        }
    }

    /// Queue a file for extraction
    pub fn add_file(
        &mut self,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) {
        self.uploads.push(InvoiceUpload {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            status: UploadStatus::Pending,
            extraction: None,
        });
    }

    pub fn uploads(&self) -> &[InvoiceUpload] {
        &self.uploads
    }

    /// Files extracted successfully so far
    pub fn success_count(&self) -> usize {
        self.uploads
            .iter()
            .filter(|u| u.status == UploadStatus::Success)
            .count()
    }

    /// Run extraction over every pending file, strictly in sequence.
    ///
    /// Files already processed keep their status; a failed file records the
    /// terminal error message and does not stop the rest of the batch.
    pub async fn process(&mut self, extractor: &dyn InvoiceExtractor) {
        for upload in &mut self.uploads {
            if upload.status != UploadStatus::Pending {
                continue;
            }
            upload.status = UploadStatus::Processing;
            debug!(file = %upload.file_name, "extracting invoice");
            match extract_with_retry(extractor, &upload.bytes, &upload.mime_type, &self.policy)
                .await
            {
                Ok(extraction) => {
                    upload.extraction = Some(extraction);
                    upload.status = UploadStatus::Success;
                }
                Err(err) => {
                    warn!(file = %upload.file_name, error = %err, "giving up on file");
                    upload.status = UploadStatus::Error(err.to_string());
                }
            }
        }
    }

    /// Build a purchase voucher from every successful extraction, in upload
    /// order
    pub fn build_vouchers(&self, registry: &Registry) -> Vec<Voucher> {
        self.uploads
            .iter()
            .filter(|u| u.status == UploadStatus::Success)
            .filter_map(|u| u.extraction.as_ref().map(|e| (e, &u.file_name)))
            .map(|(extraction, file_name)| purchase_from_extraction(registry, extraction, file_name))
            .collect()
    }
}

/// Build a purchase voucher from one extraction.
///
/// The seller is matched against party ledgers case-insensitively; the supply
/// scope compares that ledger's state with the company state, and an unknown
/// seller or a missing state on either side means intra-state. Line items the
/// registry does not know are assumed to sit in the standard 18% slab. An
/// invoice date that does not parse as `YYYY-MM-DD` falls back to today.
pub fn purchase_from_extraction(
    registry: &Registry,
    extraction: &ExtractedInvoice,
    source_name: &str,
) -> Voucher {
    let party_state = registry
        .match_ledger(&extraction.seller_name)
        .and_then(|l| l.state.as_deref());
    let scope = TaxScope::between(party_state, &registry.company().state);

    let items = extraction
        .line_items
        .iter()
        .map(|line| {
            let rate = gst::resolve_item_rate(
                registry,
                &line.item_description,
                RateFallback::AssumeStandard,
            );
            gst::price_line(
                line.item_description.clone(),
                line.quantity.clone(),
                line.rate.clone(),
                &rate,
                scope,
            )
        })
        .collect();

    let date = NaiveDate::parse_from_str(&extraction.invoice_date, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let due_date = extraction
        .due_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    let mut voucher = TradeVoucher {
        id: String::new(),
        date,
        is_inter_state: scope.is_inter_state(),
        invoice_no: extraction.invoice_number.clone(),
        due_date,
        party: extraction.seller_name.clone(),
        items,
        total_taxable_amount: BigDecimal::from(0),
        total_cgst: BigDecimal::from(0),
        total_sgst: BigDecimal::from(0),
        total_igst: BigDecimal::from(0),
        total: BigDecimal::from(0),
        narration: Some(format!("Auto-imported from {}", source_name)),
    };
    voucher.recompute_totals();
    Voucher::Purchase(voucher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ExtractedLine;
    use crate::types::{Company, Ledger, RegistrationType, StockItem};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn registry() -> Registry {
        let mut registry = Registry::standard(Company::new("Test Co", "Karnataka"));
        registry
            .add_ledger(Ledger::party(
                "Acme Traders",
                "Sundry Creditors",
                Some("27BBBBB0000B1Z5".to_string()),
                Some(RegistrationType::Registered),
                Some("Maharashtra".to_string()),
            ))
            .unwrap();
        let mut item = StockItem::new("Widget", "Primary", "Nos");
        item.gst_rate = Some(BigDecimal::from(12));
        registry.add_stock_item(item).unwrap();
        registry
    }

    fn extraction() -> ExtractedInvoice {
        ExtractedInvoice {
            seller_name: "acme traders".to_string(),
            invoice_number: "INV-0042".to_string(),
            invoice_date: "2024-06-15".to_string(),
            due_date: Some("2024-07-15".to_string()),
            subtotal: BigDecimal::from(2000),
            cgst_amount: BigDecimal::from(0),
            sgst_amount: BigDecimal::from(0),
            total_amount: BigDecimal::from(2240),
            line_items: vec![
                ExtractedLine {
                    item_description: "widget".to_string(),
                    hsn_code: "8471".to_string(),
                    quantity: BigDecimal::from(2),
                    rate: BigDecimal::from(1000),
                },
                ExtractedLine {
                    item_description: "Installation Service".to_string(),
                    hsn_code: "9983".to_string(),
                    quantity: BigDecimal::from(1),
                    rate: BigDecimal::from(500),
                },
            ],
        }
    }

    struct FlakyExtractor {
        fail_first: u32,
        attempts: AtomicU32,
    }

    impl FlakyExtractor {
        fn new(fail_first: u32) -> Self {
            Self {
                fail_first,
                attempts: AtomicU32::new(0),
            }
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InvoiceExtractor for FlakyExtractor {
        async fn extract_invoice(
            &self,
            _bytes: &[u8],
            _mime_type: &str,
        ) -> BooksResult<ExtractedInvoice> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_first {
                Err(BooksError::Extraction("backend unavailable".to_string()))
            } else {
                Ok(extraction())
            }
        }
    }

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failures() {
        let extractor = FlakyExtractor::new(2);
        let result =
            extract_with_retry(&extractor, b"pdf bytes", "application/pdf", &quick_policy()).await;

        assert!(result.is_ok());
        assert_eq!(extractor.attempts(), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_is_terminal() {
        let extractor = FlakyExtractor::new(10);
        let result =
            extract_with_retry(&extractor, b"pdf bytes", "application/pdf", &quick_policy()).await;

        match result {
            Err(BooksError::Extraction(message)) => {
                assert_eq!(
                    message,
                    "Failed to extract invoice data after multiple retries."
                );
            }
            other => panic!("expected extraction error, got {:?}", other),
        }
        assert_eq!(extractor.attempts(), 3);
    }

    #[tokio::test]
    async fn test_batch_marks_failures_and_keeps_going() {
        let mut batch = InvoiceBatch::with_policy(RetryPolicy {
            max_retries: 1,
            initial_delay: Duration::from_millis(1),
        });
        batch.add_file("bad.pdf", "application/pdf", vec![1]);
        batch.add_file("good.pdf", "application/pdf", vec![2]);

        // Fails the first call only; with a single-attempt budget the first
        // file dies and the second succeeds.
        let extractor = FlakyExtractor::new(1);
        batch.process(&extractor).await;

        assert!(matches!(batch.uploads()[0].status, UploadStatus::Error(_)));
        assert_eq!(batch.uploads()[1].status, UploadStatus::Success);
        assert_eq!(batch.success_count(), 1);

        let vouchers = batch.build_vouchers(&registry());
        assert_eq!(vouchers.len(), 1);
    }

    #[tokio::test]
    async fn test_processing_skips_already_settled_files() {
        let mut batch = InvoiceBatch::with_policy(quick_policy());
        batch.add_file("first.pdf", "application/pdf", vec![1]);

        let extractor = FlakyExtractor::new(0);
        batch.process(&extractor).await;
        assert_eq!(extractor.attempts(), 1);

        batch.process(&extractor).await;
        assert_eq!(extractor.attempts(), 1);
    }

    #[test]
    fn test_purchase_uses_inter_state_scope_from_matched_seller() {
        let registry = registry();
        let voucher = purchase_from_extraction(&registry, &extraction(), "scan-001.pdf");

        let trade = match &voucher {
            Voucher::Purchase(trade) => trade,
            other => panic!("expected purchase, got {:?}", other),
        };
        assert!(trade.is_inter_state);
        assert_eq!(trade.party, "acme traders");
        assert_eq!(trade.invoice_no, "INV-0042");
        assert_eq!(
            trade.date,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        assert_eq!(
            trade.due_date,
            NaiveDate::from_ymd_opt(2024, 7, 15)
        );
        assert_eq!(
            trade.narration.as_deref(),
            Some("Auto-imported from scan-001.pdf")
        );

        // Widget resolves to its 12% registry rate, the unknown service line
        // falls back to 18%. Inter-state, so everything lands in IGST.
        assert_eq!(trade.total_taxable_amount, BigDecimal::from(2500));
        assert_eq!(trade.total_igst, BigDecimal::from(330));
        assert_eq!(trade.total_cgst, BigDecimal::from(0));
        assert_eq!(trade.total_sgst, BigDecimal::from(0));
        assert_eq!(trade.total, BigDecimal::from(2830));
    }

    #[test]
    fn test_unknown_seller_defaults_to_intra_state() {
        let registry = registry();
        let mut data = extraction();
        data.seller_name = "Mystery Vendor".to_string();
        data.invoice_date = "15/06/2024".to_string();

        let voucher = purchase_from_extraction(&registry, &data, "scan-002.pdf");
        let trade = match &voucher {
            Voucher::Purchase(trade) => trade,
            other => panic!("expected purchase, got {:?}", other),
        };
        assert!(!trade.is_inter_state);
        assert!(trade.total_cgst > BigDecimal::from(0));
        assert_eq!(trade.total_cgst, trade.total_sgst);
        assert_eq!(trade.total_igst, BigDecimal::from(0));
        // Unparseable date falls back to today.
        assert_eq!(trade.date, Utc::now().date_naive());
    }
}
