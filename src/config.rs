use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMAIL_DOMAIN: &str = "@tufts.edu";
pub const DEFAULT_GOOD_THRESHOLD: f64 = 90.0;
pub const DEFAULT_WARNING_THRESHOLD: f64 = 70.0;

/// Tunable rules for the ledger: which email suffix students must use and where
/// the attendance bands start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    email_domain: String,
    good_threshold: f64,
    warning_threshold: f64,
}

impl LedgerConfig {
    pub fn new(
        email_domain: impl Into<String>,
        good_threshold: f64,
        warning_threshold: f64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            email_domain: email_domain.into(),
            good_threshold,
            warning_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let domain = self.email_domain.as_str();
        if domain.trim() != domain {
            return Err(ValidationError::new(format!(
                "email domain '{domain}' must not have surrounding whitespace"
            )));
        }
        if !domain.starts_with('@') || domain.len() < 2 {
            return Err(ValidationError::new(format!(
                "email domain '{}' must look like '@example.edu'",
                self.email_domain
            )));
        }
        for (label, value) in [
            ("good_threshold", self.good_threshold),
            ("warning_threshold", self.warning_threshold),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::new(format!(
                    "{label} must be between 0 and 100 (got {value})"
                )));
            }
        }
        if self.warning_threshold > self.good_threshold {
            return Err(ValidationError::new(format!(
                "warning_threshold {} must not exceed good_threshold {}",
                self.warning_threshold, self.good_threshold
            )));
        }
        Ok(())
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    pub fn good_threshold(&self) -> f64 {
        self.good_threshold
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            good_threshold: DEFAULT_GOOD_THRESHOLD,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
        }
    }
}
