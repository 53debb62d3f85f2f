//! HSN code validation against a built-in directory

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::traits::{HsnStatus, HsnValidation, HsnValidator};

/// Directory of HSN codes and their official GST rates
///
/// A stand-in for the master HSN database; real deployments would answer
/// these lookups from a government or third-party API.
const HSN_DIRECTORY: &[(&str, u32)] = &[
    ("8471", 18),
    ("8473", 28),
    ("8528", 28),
    ("8479", 18),
    ("8461", 18),
    ("847130", 18),
    ("847160", 18),
    ("847170", 18),
    ("847330", 28),
    ("852380", 18),
    ("852852", 28),
    // IT services
    ("9983", 18),
];

/// HSN validator backed by the built-in directory
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHsnDirectory;

impl StaticHsnDirectory {
    pub fn new() -> Self {
        Self
    }

    fn lookup(code: &str) -> Option<u32> {
        HSN_DIRECTORY
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, rate)| *rate)
    }
}

#[async_trait]
impl HsnValidator for StaticHsnDirectory {
    async fn validate_hsn(&self, code: &str, declared_rate: &BigDecimal) -> HsnValidation {
        let code = code.trim();
        match Self::lookup(code) {
            Some(rate) => {
                let correct_rate = BigDecimal::from(rate);
                if &correct_rate == declared_rate {
                    HsnValidation {
                        status: HsnStatus::Valid,
                        message: format!("HSN is valid. Correct GST Rate: {}%", rate),
                        correct_rate: Some(correct_rate),
                    }
                } else {
                    HsnValidation {
                        status: HsnStatus::Mismatch,
                        message: format!("Rate Mismatch! Official rate for {} is {}%.", code, rate),
                        correct_rate: Some(correct_rate),
                    }
                }
            }
            None => HsnValidation {
                status: HsnStatus::Invalid,
                message: format!("HSN code {} not found or is invalid.", code),
                correct_rate: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_code_with_matching_rate_is_valid() {
        let directory = StaticHsnDirectory::new();
        let result = directory.validate_hsn("8471", &BigDecimal::from(18)).await;

        assert_eq!(result.status, HsnStatus::Valid);
        assert_eq!(result.correct_rate, Some(BigDecimal::from(18)));
        assert!(result.acceptable());
    }

    #[tokio::test]
    async fn test_rate_mismatch_reports_directory_rate() {
        let directory = StaticHsnDirectory::new();
        let result = directory.validate_hsn(" 8473 ", &BigDecimal::from(18)).await;

        assert_eq!(result.status, HsnStatus::Mismatch);
        assert_eq!(result.correct_rate, Some(BigDecimal::from(28)));
        assert_eq!(result.message, "Rate Mismatch! Official rate for 8473 is 28%.");
        assert!(result.acceptable());
    }

    #[tokio::test]
    async fn test_unknown_code_is_invalid() {
        let directory = StaticHsnDirectory::new();
        let result = directory.validate_hsn("0000", &BigDecimal::from(18)).await;

        assert_eq!(result.status, HsnStatus::Invalid);
        assert_eq!(result.correct_rate, None);
        assert!(!result.acceptable());
    }
}
