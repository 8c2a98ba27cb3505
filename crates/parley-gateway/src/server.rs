use crate::orchestrator::{ConverseReply, Orchestrator};
use crate::request::ConverseRequest;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parley_core::ParleyError;
use parley_persona::PersonaCatalog;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared application state.
pub struct AppState {
    /// The conversation orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// The persona catalog, for diagnostics.
    pub catalog: Arc<PersonaCatalog>,
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Builds the router. CORS is permissive: the service fronts a
    /// browser client served from a different origin.
    pub fn build(orchestrator: Arc<Orchestrator>, catalog: Arc<PersonaCatalog>) -> Router {
        let state = Arc::new(AppState {
            orchestrator,
            catalog,
        });

        Router::new()
            .route("/converse", post(converse_handler))
            .route("/health", get(health_handler))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "parley",
        "personas": state.catalog.names(),
    }))
}

async fn converse_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConverseRequest>,
) -> Response {
    match state.orchestrator.handle(&request).await {
        Ok(ConverseReply::Text(text)) => Json(serde_json::json!({ "text": text })).into_response(),
        Ok(ConverseReply::Audio(bytes)) => {
            ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Maps the error taxonomy onto HTTP statuses. Caller errors carry their
/// message; collaborator and internal failures get a generic body with
/// the detail kept to the logs.
fn error_response(err: &ParleyError) -> Response {
    let (status, message) = match err {
        ParleyError::InvalidRequest(_)
        | ParleyError::UnknownPersona(_)
        | ParleyError::PersonaConflict { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ParleyError::Transcription(_) => {
            error!(error = %err, "Transcription collaborator failed");
            (StatusCode::BAD_GATEWAY, "transcription failed".to_string())
        }
        ParleyError::Engine(_) => {
            error!(error = %err, "Dialogue engine failed");
            (StatusCode::BAD_GATEWAY, "dialogue engine failed".to_string())
        }
        ParleyError::Synthesis(_) => {
            error!(error = %err, "Synthesis collaborator failed");
            (StatusCode::BAD_GATEWAY, "speech synthesis failed".to_string())
        }
        ParleyError::UnknownSession(_) => {
            // Orchestrator and store disagree on state; nothing the
            // caller can do about it.
            error!(error = %err, "Session store consistency violation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
        _ => {
            error!(error = %err, "Unhandled internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };

    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_map_to_400_with_detail() {
        let resp = error_response(&ParleyError::InvalidRequest("missing conversation id".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn collaborator_errors_map_to_502() {
        for err in [
            ParleyError::Transcription("boom".into()),
            ParleyError::Engine("boom".into()),
            ParleyError::Synthesis("boom".into()),
        ] {
            assert_eq!(error_response(&err).status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn unknown_session_maps_to_500() {
        let resp = error_response(&ParleyError::UnknownSession("c1".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
