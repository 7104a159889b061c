//! Application settings for invoice numbering and totals.
//!
//! ```toml
//! invoice_prefix = "FSN"
//! vat_percentage = "11.00"
//! currency_word = "Rupiah"
//!
//! [sequencer]
//! max_attempts = 32
//! initial_backoff_ms = 10
//! max_backoff_ms = 100
//! deadline_ms = 5000
//! jitter = 0.5
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{
    DEFAULT_PREFIX, DEFAULT_VAT_PERCENTAGE, InvoiceBuilder, InvoiceError, is_valid_prefix,
    validate_vat_percentage,
};
use crate::sequence::{InvoiceNumberSequencer, RetryPolicy, SequenceStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix of newly issued invoice numbers.
    pub invoice_prefix: String,
    /// PPN percentage for new invoices.
    pub vat_percentage: Decimal,
    /// Currency word printed after the amount in words.
    pub currency_word: String,
    /// Retry behaviour of the invoice number sequencer.
    pub sequencer: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            invoice_prefix: DEFAULT_PREFIX.to_string(),
            vat_percentage: DEFAULT_VAT_PERCENTAGE,
            currency_word: "Rupiah".to_string(),
            sequencer: RetryPolicy::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, InvoiceError> {
        let settings: Self =
            toml::from_str(text).map_err(|e| InvoiceError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InvoiceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| InvoiceError::Config(format!("{}: {e}", path.display())))?;
        let settings = Self::from_toml_str(&text)?;
        info!(path = %path.display(), prefix = %settings.invoice_prefix, "settings loaded");
        Ok(settings)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), InvoiceError> {
        if !is_valid_prefix(&self.invoice_prefix) {
            return Err(InvoiceError::Config(format!(
                "invoice_prefix '{}' must be 2-5 uppercase letters",
                self.invoice_prefix
            )));
        }
        validate_vat_percentage(self.vat_percentage)
            .map_err(|e| InvoiceError::Config(format!("vat_percentage: {e}")))?;
        if self.currency_word.trim().is_empty() {
            return Err(InvoiceError::Config("currency_word must not be empty".into()));
        }
        if self.sequencer.max_attempts == 0 {
            return Err(InvoiceError::Config(
                "sequencer.max_attempts must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sequencer.jitter) {
            return Err(InvoiceError::Config(
                "sequencer.jitter must be between 0 and 1".into(),
            ));
        }
        if self.sequencer.initial_backoff_ms > self.sequencer.max_backoff_ms {
            return Err(InvoiceError::Config(
                "sequencer.initial_backoff_ms must not exceed max_backoff_ms".into(),
            ));
        }
        Ok(())
    }

    /// A sequencer over `store` using these retry settings.
    pub fn build_sequencer(&self, store: Arc<dyn SequenceStore>) -> InvoiceNumberSequencer {
        InvoiceNumberSequencer::new(store).with_policy(self.sequencer.clone())
    }

    /// A draft builder preset with the configured prefix and PPN.
    pub fn invoice_builder(&self, invoice_date: NaiveDate) -> InvoiceBuilder {
        InvoiceBuilder::new(invoice_date)
            .prefix(self.invoice_prefix.clone())
            .vat_percentage(self.vat_percentage)
    }

    /// Amount in words with the configured currency word.
    #[cfg(feature = "terbilang")]
    pub fn amount_in_words(&self, amount: Decimal) -> Result<String, InvoiceError> {
        crate::terbilang::to_words_with_unit(amount, &self.currency_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_text_gives_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.invoice_prefix, "FSN");
        assert_eq!(s.vat_percentage, dec!(11));
        assert_eq!(s.sequencer.max_attempts, 32);
    }

    #[test]
    fn partial_override() {
        let s = Settings::from_toml_str(
            r#"
            invoice_prefix = "TKA"
            vat_percentage = "12"

            [sequencer]
            max_attempts = 8
            "#,
        )
        .unwrap();
        assert_eq!(s.invoice_prefix, "TKA");
        assert_eq!(s.vat_percentage, dec!(12));
        assert_eq!(s.sequencer.max_attempts, 8);
        assert_eq!(s.sequencer.deadline_ms, 5_000);
        assert_eq!(s.sequencer.jitter, 0.5);
    }

    #[test]
    fn invalid_values_rejected() {
        for text in [
            r#"invoice_prefix = "fsn""#,
            r#"vat_percentage = "120""#,
            r#"currency_word = " ""#,
            "[sequencer]\nmax_attempts = 0",
            "[sequencer]\njitter = 1.5",
            "[sequencer]\ninitial_backoff_ms = 500\nmax_backoff_ms = 100",
            "invoice_prefix = 5",
        ] {
            assert!(
                matches!(Settings::from_toml_str(text), Err(InvoiceError::Config(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_file_is_config_error() {
        assert!(matches!(
            Settings::load("/nonexistent/tagihan.toml"),
            Err(InvoiceError::Config(_))
        ));
    }

    #[test]
    fn builder_uses_configured_defaults() {
        let s = Settings {
            invoice_prefix: "TKA".into(),
            vat_percentage: dec!(12),
            ..Settings::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let builder = s.invoice_builder(date);
        assert_eq!(builder.prefix_str(), "TKA");
        let inv = builder.build_with_number("TKA/24/01/001").unwrap();
        assert_eq!(inv.vat_percentage, dec!(12));
    }
}
