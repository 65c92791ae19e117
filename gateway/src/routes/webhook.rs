use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use crate::verify::{verify, ConfigurationError, VerifyError, WebhookRequest};
use crate::AppState;

/// POST /api/webhook
///
/// Recomputes the HMAC over the raw body and compares it against the
/// signature header before anything touches the payload. The body arrives
/// here as the exact bytes from the wire; nothing upstream parses it.
pub async fn receive(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = WebhookRequest {
        headers: &headers,
        body: &body,
        client_ip: addr.ip(),
    };

    match verify(&request, &state.secret, &state.verify) {
        Ok(()) => {
            info!(bytes = body.len(), "webhook accepted");
            (StatusCode::OK, Json(json!({ "status": "accepted" })))
        }
        Err(VerifyError::Authentication(err)) => {
            // Audit detail goes to the log; the sender only learns it failed
            warn!("{err}");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid signature" })),
            )
        }
        Err(VerifyError::Configuration(err @ ConfigurationError::MalformedBody { .. })) => {
            warn!("{err}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "malformed body" })),
            )
        }
        Err(VerifyError::Configuration(err)) => {
            warn!("webhook verification misconfigured: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "verification unavailable" })),
            )
        }
    }
}
