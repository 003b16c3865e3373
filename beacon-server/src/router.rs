use crate::signaling::{SignalingService, ws_handler};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use beacon_core::AccountId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceStatus {
    pub account_id: AccountId,
    pub online: bool,
}

/// HTTP surface of the signaling core: the WebSocket gateway plus read-only
/// presence and liveness endpoints.
pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/api/presence/{account_id}", get(presence))
        .with_state(service)
}

async fn health() -> &'static str {
    "ok"
}

async fn presence(
    Path(account_id): Path<String>,
    State(service): State<SignalingService>,
) -> Result<Json<PresenceStatus>, StatusCode> {
    let account_id = AccountId::new(account_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let online = service.registry().is_online(&account_id);

    Ok(Json(PresenceStatus { account_id, online }))
}
