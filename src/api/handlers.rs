//! Ladder HTTP handlers
//!
//! Every handler records its route and response status class before
//! returning. Errors are rendered as `{"error": <message>, "kind": <kind>}`.

use crate::error::{ladder_error, LadderError};
use crate::service::app::AppState;
use crate::types::{MatchRequest, NewPlayerRequest};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Error wrapper that knows how to become an HTTP response
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        match ladder_error(&self.0) {
            Some(LadderError::Validation { .. }) => StatusCode::BAD_REQUEST,
            Some(LadderError::Conflict { .. }) => StatusCode::CONFLICT,
            Some(LadderError::PlayerNotFound { .. }) => StatusCode::NOT_FOUND,
            Some(LadderError::Persistence { .. })
            | Some(LadderError::MutationFailed { .. })
            | Some(LadderError::Configuration { .. })
            | Some(LadderError::Internal { .. })
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        ladder_error(&self.0)
            .map(LadderError::kind)
            .unwrap_or("internal")
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<LadderError> for ApiError {
    fn from(err: LadderError) -> Self {
        Self(err.into())
    }
}

/// Malformed or mistyped bodies are validation errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        LadderError::validation(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }

        let body = json!({
            "error": self.0.to_string(),
            "kind": self.kind(),
        });
        (status, Json(body)).into_response()
    }
}

fn finish(state: &AppState, route: &str, response: Response) -> Response {
    state
        .metrics()
        .record_http_request(route, response.status().as_u16());
    response
}

/// GET `/` and `/players`
pub async fn list_players(State(state): State<Arc<AppState>>) -> Response {
    let response = match state.ladder().list_players().await {
        Ok(players) => Json(players).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    };
    finish(&state, "list_players", response)
}

/// GET `/players/{name}`
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let response = match state.ladder().get_player(&name).await {
        Ok(player) => Json(player).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    };
    finish(&state, "get_player", response)
}

/// POST `/players`
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewPlayerRequest>, JsonRejection>,
) -> Response {
    let response = match payload {
        Err(rejection) => ApiError::from(rejection).into_response(),
        Ok(Json(request)) => match state.ladder().create_player(request).await {
            Ok(player) => (StatusCode::CREATED, Json(player)).into_response(),
            Err(e) => ApiError::from(e).into_response(),
        },
    };
    finish(&state, "create_player", response)
}

/// POST `/game`
pub async fn resolve_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Response {
    let response = match payload {
        Err(rejection) => ApiError::from(rejection).into_response(),
        Ok(Json(request)) => match state.ladder().resolve_match(request).await {
            Ok(result) => Json(result).into_response(),
            Err(e) => ApiError::from(e).into_response(),
        },
    };
    finish(&state, "resolve_match", response)
}
