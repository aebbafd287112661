//! The pattern catalog — built-in and custom sensitive-data patterns.
//!
//! Every expression is compiled exactly once, at catalog construction.
//! A custom pattern that fails to compile is a load-time error naming the
//! pattern; nothing is deferred to scan time.

use ironsieve_config::DlpPatternsConfig;
use ironsieve_core::{DlpError, Severity};
use regex_lite::Regex;
use tracing::debug;

/// A secondary check run on a syntactic match to reject false positives.
pub type Validator = fn(&str) -> bool;

/// A compiled sensitive-data pattern.
#[derive(Debug)]
pub struct Pattern {
    pub name: String,
    pub regex: Regex,
    pub severity: Severity,
    /// Runs only after a syntactic match; a failed check discards the
    /// match silently.
    pub validator: Option<Validator>,
    pub description: String,
}

/// Luhn checksum for credit card numbers.
///
/// Digit length must be 13–19. Sum right-to-left, doubling every second
/// digit and subtracting 9 when the doubled value exceeds 9; valid iff
/// the total is divisible by 10.
pub fn luhn_check(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let mut sum = 0;
    let mut double = false;
    for &digit in digits.iter().rev() {
        let mut value = digit;
        if double {
            value *= 2;
            if value > 9 {
                value -= 9;
            }
        }
        sum += value;
        double = !double;
    }

    sum % 10 == 0
}

/// SSN validity check (no 000/666/9xx area, no all-zero group or serial).
pub fn ssn_check(ssn: &str) -> bool {
    let digits: Vec<u32> = ssn.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 9 {
        return false;
    }

    let area = digits[0] * 100 + digits[1] * 10 + digits[2];
    let group = digits[3] * 10 + digits[4];
    let serial = digits[5] * 1000 + digits[6] * 100 + digits[7] * 10 + digits[8];

    if area == 0 || area == 666 || area >= 900 {
        return false;
    }
    if group == 0 || serial == 0 {
        return false;
    }

    true
}

/// The immutable set of patterns a scanner runs against.
///
/// Built once at startup from the built-in catalog plus any custom
/// patterns in the configuration; never mutated afterwards. A hot reload
/// builds a whole new catalog and swaps it atomically.
#[derive(Debug)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
}

impl PatternCatalog {
    /// Build the catalog from the configured pattern flags and custom list.
    pub fn from_config(config: &DlpPatternsConfig) -> Result<Self, DlpError> {
        let mut patterns = Vec::new();

        if config.credit_cards {
            patterns.push(builtin(
                "credit_card",
                r"\b\d{4}[\s\-]?\d{4}[\s\-]?\d{4}[\s\-]?\d{1,7}\b",
                Severity::High,
                Some(luhn_check as Validator),
                "Credit card number (Luhn-validated)",
            )?);
        }

        if config.ssn {
            patterns.push(builtin(
                "ssn",
                r"\b\d{3}[\s\-]?\d{2}[\s\-]?\d{4}\b",
                Severity::High,
                Some(ssn_check as Validator),
                "Social Security Number",
            )?);
        }

        if config.api_keys {
            patterns.push(builtin(
                "aws_access_key",
                r"\b(AKIA|ASIA)[0-9A-Z]{16}\b",
                Severity::Critical,
                None,
                "AWS Access Key ID",
            )?);
            patterns.push(builtin(
                "aws_secret_key",
                r"(?:aws|AWS)[\s\S]{0,50}[A-Za-z0-9/+=]{40}\b",
                Severity::Critical,
                None,
                "AWS Secret Access Key",
            )?);
            patterns.push(builtin(
                "github_token",
                r"\b(ghp|gho|ghu|ghs|ghr)_[A-Za-z0-9]{36,}\b",
                Severity::Critical,
                None,
                "GitHub Token",
            )?);
            patterns.push(builtin(
                "slack_token",
                r"\b(xoxb|xoxp|xoxs|xoxa|xoxr)-[A-Za-z0-9\-]+",
                Severity::Critical,
                None,
                "Slack Token",
            )?);
            patterns.push(builtin(
                "google_api_key",
                r"\bAIza[0-9A-Za-z\-_]{35}\b",
                Severity::Critical,
                None,
                "Google API Key",
            )?);
            patterns.push(builtin(
                "generic_api_key",
                r"(?i)(?:key|token|secret|password|pwd|pass)[\s:=]+[A-Za-z0-9]{32,}",
                Severity::Medium,
                None,
                "Generic API key or secret",
            )?);
            patterns.push(builtin(
                "private_key",
                r"-----BEGIN\s+(RSA|EC|OPENSSH)?\s*PRIVATE KEY-----",
                Severity::Critical,
                None,
                "Private key (RSA, EC, OpenSSH)",
            )?);
            patterns.push(builtin(
                "connection_string",
                r#"(?i)(jdbc|mongodb(\+srv)?|postgres(ql)?|mysql)://[^:]+:[^@]+@[^\s"']+"#,
                Severity::High,
                None,
                "Database connection string with credentials",
            )?);
        }

        if config.emails {
            patterns.push(builtin(
                "email",
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                Severity::Low,
                None,
                "Email address",
            )?);
        }

        for custom in &config.custom {
            let regex = Regex::new(&custom.pattern).map_err(|e| DlpError::InvalidPattern {
                name: custom.name.clone(),
                reason: e.to_string(),
            })?;
            patterns.push(Pattern {
                name: custom.name.clone(),
                regex,
                severity: custom.severity,
                validator: None,
                description: "Custom pattern".into(),
            });
        }

        debug!("Compiled {} DLP patterns", patterns.len());
        Ok(Self { patterns })
    }

    /// Build the default catalog (all built-in groups at their default
    /// enablement, no custom patterns).
    pub fn default_catalog() -> Result<Self, DlpError> {
        Self::from_config(&DlpPatternsConfig::default())
    }

    /// Patterns in catalog order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn builtin(
    name: &str,
    expression: &str,
    severity: Severity,
    validator: Option<Validator>,
    description: &str,
) -> Result<Pattern, DlpError> {
    let regex = Regex::new(expression).map_err(|e| DlpError::InvalidPattern {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Pattern {
        name: name.to_string(),
        regex,
        severity,
        validator,
        description: description.to_string(),
    })
}
