//! The module contains the errors the engine can throw.
//!
//! Backend failures are reported by stores as [`StoreError`] and collapsed by
//! [`PayeeBook`] into one of the generic load/search/add errors, keeping the
//! original cause as the error source.
//!
//!  [`PayeeBook`]: super::PayeeBook
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Failed to load payees")]
    LoadFailed(#[source] StoreError),
    #[error("Failed to search payees")]
    SearchFailed(#[source] StoreError),
    #[error("Failed to add payee")]
    AddFailed(#[source] StoreError),
    #[error("{0}")]
    InvalidSearchTerm(String),
    #[error("Invalid payee: {0}")]
    InvalidPayee(String),
}

/// Failures raised by a payee store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("Invalid API response format: {0}")]
    InvalidResponse(String),
    #[error("HTTP {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("\"{0}\" already present!")]
    DuplicateId(String),
}

/// Failure of a PayID lookup that produced no answer at all.
///
/// Answers such as "not found" are not errors, see [`Resolution`].
///
///  [`Resolution`]: super::Resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("network error: {0}")]
    Transport(String),
}
