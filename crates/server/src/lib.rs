use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::StoreError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod payees;
mod payids;
mod server;

pub mod types {
    pub mod payee {
        pub use api_types::payee::{
            Payee, PayIdType, PayeeListResponse, PayeeSearch, PayeeSearchResponse,
        };
    }

    pub mod payid {
        pub use api_types::payid::{ResolveRejected, ResolveRequest, ResolvedPayId};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Store(StoreError),
    InvalidPayId { expected_format: String },
    PayIdNotFound,
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_store_error(err: &StoreError) -> StatusCode {
    match err {
        StoreError::DuplicateId(_) => StatusCode::CONFLICT,
        StoreError::Transport(_) | StoreError::InvalidResponse(_) | StoreError::Backend { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_store_error(err: StoreError) -> String {
    match err {
        StoreError::DuplicateId(_) => err.to_string(),
        other => {
            tracing::error!("store error: {other}");
            "internal server error".to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Store(err) => (status_for_store_error(&err), message_for_store_error(err)),
            ServerError::InvalidPayId { expected_format } => {
                let body = api_types::payid::ResolveRejected {
                    error: api_types::payid::INVALID_PAYID_FORMAT.to_string(),
                    expected_format: Some(expected_format),
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ServerError::PayIdNotFound => (
                StatusCode::NOT_FOUND,
                api_types::payid::PAYID_NOT_FOUND.to_string(),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
