//! Payee API endpoints.

use api_types::payee::{Payee, PayeeListResponse, PayeeSearch, PayeeSearchResponse};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{PayeeStore, search::sanitize_query};

use crate::{ServerError, server::ServerState};

/// Handle requests for listing every payee
pub async fn list(State(state): State<ServerState>) -> Result<Json<PayeeListResponse>, ServerError> {
    let payees = state
        .store
        .list_all()
        .await?
        .into_iter()
        .map(Payee::from)
        .collect();
    Ok(Json(PayeeListResponse { payees }))
}

pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<PayeeSearch>,
) -> Result<Json<PayeeSearchResponse>, ServerError> {
    let query = sanitize_query(&params.q);
    if query.is_empty() {
        return Ok(Json(PayeeSearchResponse::default()));
    }

    let results = state
        .store
        .search(&query)
        .await?
        .into_iter()
        .map(Payee::from)
        .collect();
    Ok(Json(PayeeSearchResponse { results }))
}

/// Handle requests for storing a new payee
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<Payee>,
) -> Result<(StatusCode, Json<Payee>), ServerError> {
    if payload.id.trim().is_empty() {
        return Err(ServerError::Generic("id required".to_string()));
    }
    if payload.name.trim().is_empty() {
        return Err(ServerError::Generic("name required".to_string()));
    }

    let stored = state.store.add(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(Payee::from(stored))))
}
