//! PayID validation: a local syntax check followed by one lookup against a
//! [`PayIdResolver`].

use std::{future::Future, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{PayIdKind, ResolverError, format::digits};

// Patterns are literals; `None` only if the regex engine rejects them, in
// which case every PayID of that kind is reported malformed.
static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static MOBILE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^0\d{9}$").ok());
static ABN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{11}$").ok());

/// Registration status of a PayID at the resolution service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayIdStatus {
    Active,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Owner details returned when a PayID is found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPayee {
    #[serde(rename = "payid")]
    pub pay_id: String,
    #[serde(rename = "payidType")]
    pub kind: PayIdKind,
    pub owner_name: String,
    pub status: PayIdStatus,
    pub npp_reachable: bool,
}

/// Answer of a resolution service to a single lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedPayee),
    NotFound,
    /// The service considers the PayID malformed.
    Rejected { expected_format: Option<String> },
    /// Any other non-success answer.
    Failed { status: u16 },
}

/// External PayID existence/status lookup.
pub trait PayIdResolver: Send + Sync {
    /// Look up an already normalized PayID. Only a missing answer is an error.
    fn resolve(
        &self,
        pay_id: &str,
        kind: PayIdKind,
    ) -> impl Future<Output = Result<Resolution, ResolverError>> + Send;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid PayID format")]
    InvalidFormat,
    #[error("PayID not found")]
    NotFound,
    #[error("PayID is inactive")]
    Inactive,
    #[error("PayID is unreachable")]
    Unreachable,
    #[error("Network error occurred")]
    Network,
    #[error("API error occurred")]
    Api,
}

/// Result of validating one PayID. Lives for a single form interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub payee: Option<ResolvedPayee>,
    pub error: Option<ValidationError>,
    /// Human readable hint on what a well-formed PayID looks like.
    pub expected_format: Option<String>,
    message: Option<String>,
}

impl ValidationOutcome {
    fn valid(payee: ResolvedPayee) -> Self {
        Self {
            is_valid: true,
            payee: Some(payee),
            error: None,
            expected_format: None,
            message: None,
        }
    }

    fn invalid(error: ValidationError, payee: Option<ResolvedPayee>) -> Self {
        Self {
            is_valid: false,
            payee,
            error: Some(error),
            expected_format: None,
            message: None,
        }
    }

    fn malformed(message: Option<String>, expected_format: Option<String>) -> Self {
        Self {
            is_valid: false,
            payee: None,
            error: Some(ValidationError::InvalidFormat),
            expected_format,
            message,
        }
    }

    /// Message to show next to the PayID field, `None` when valid.
    pub fn message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        match self.error? {
            ValidationError::InvalidFormat => Some(
                format!("Invalid format. {}", self.expected_format.as_deref().unwrap_or(""))
                    .trim_end()
                    .to_string(),
            ),
            other => Some(other.to_string()),
        }
    }
}

/// A PayID that failed the local syntax check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatError {
    pub message: &'static str,
    pub expected_format: &'static str,
}

/// Canonical form sent to a resolver: trimmed email, mobile digits only,
/// ABN without whitespace.
pub fn normalize_pay_id(pay_id: &str, kind: PayIdKind) -> String {
    match kind {
        PayIdKind::Email => pay_id.trim().to_string(),
        PayIdKind::Mobile => digits(pay_id),
        PayIdKind::Abn => pay_id.chars().filter(|ch| !ch.is_whitespace()).collect(),
    }
}

/// Local syntax check of a PayID against its kind.
pub fn check_format(pay_id: &str, kind: PayIdKind) -> Result<(), FormatError> {
    let normalized = normalize_pay_id(pay_id, kind);
    let (re, message, expected_format) = match kind {
        PayIdKind::Email => (
            Option::as_ref(&EMAIL_RE),
            "Please enter a valid email address",
            "Email address, e.g. name@example.com",
        ),
        PayIdKind::Mobile => (
            Option::as_ref(&MOBILE_RE),
            "Please enter a valid Australian mobile number",
            "10 digits starting with 0, e.g. 0412 345 678",
        ),
        PayIdKind::Abn => (
            Option::as_ref(&ABN_RE),
            "Please enter a valid 11-digit ABN",
            "11 digits, e.g. 51 824 753 556",
        ),
    };
    if re.is_some_and(|re| re.is_match(&normalized)) {
        Ok(())
    } else {
        Err(FormatError {
            message,
            expected_format,
        })
    }
}

/// Validate a PayID: syntax first, then a single lookup with no retry.
pub async fn validate_pay_id<R: PayIdResolver>(
    resolver: &R,
    pay_id: &str,
    kind: PayIdKind,
) -> ValidationOutcome {
    if let Err(err) = check_format(pay_id, kind) {
        return ValidationOutcome::malformed(
            Some(err.message.to_string()),
            Some(err.expected_format.to_string()),
        );
    }

    let normalized = normalize_pay_id(pay_id, kind);
    match resolver.resolve(&normalized, kind).await {
        Ok(Resolution::Found(payee)) => {
            if payee.status != PayIdStatus::Active {
                ValidationOutcome::invalid(ValidationError::Inactive, Some(payee))
            } else if !payee.npp_reachable {
                ValidationOutcome::invalid(ValidationError::Unreachable, Some(payee))
            } else {
                ValidationOutcome::valid(payee)
            }
        }
        Ok(Resolution::NotFound) => ValidationOutcome::invalid(ValidationError::NotFound, None),
        Ok(Resolution::Rejected { expected_format }) => {
            ValidationOutcome::malformed(None, expected_format)
        }
        Ok(Resolution::Failed { status }) => {
            tracing::warn!("PayID resolution answered with status {status}");
            ValidationOutcome::invalid(ValidationError::Api, None)
        }
        Err(err) => {
            tracing::warn!("PayID validation network error: {err}");
            ValidationOutcome::invalid(ValidationError::Network, None)
        }
    }
}
