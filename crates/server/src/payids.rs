//! PayID resolution endpoint.

use api_types::payid::{PayIdType, ResolveRequest, ResolvedPayId};
use axum::{Json, extract::State};
use engine::{PayIdKind, validation};

use crate::{ServerError, server::ServerState};

/// Resolve a PayID against the directory.
///
/// Malformed PayIDs answer `400` with the expected format, unknown ones `404`.
pub async fn resolve(
    State(state): State<ServerState>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<ResolvedPayId>, ServerError> {
    if payload.pay_id_type == PayIdType::Unknown {
        return Err(ServerError::Generic("unsupported payIdType".to_string()));
    }
    let kind = PayIdKind::from(payload.pay_id_type);

    validation::check_format(&payload.pay_id, kind).map_err(|err| ServerError::InvalidPayId {
        expected_format: err.expected_format.to_string(),
    })?;

    let entry = state
        .directory
        .lookup(&payload.pay_id, kind)
        .ok_or(ServerError::PayIdNotFound)?;

    Ok(Json(ResolvedPayId::from(entry.clone())))
}
