use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use warrant_core::{Actor, AppError};

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the acting identity from the gateway-provided header.
pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let subject = request
        .headers()
        .get(&state.actor_header)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let actor = Actor::new(subject).map_err(|_| {
        AppError::Unauthenticated(format!(
            "request is missing the '{}' identity header",
            state.actor_header
        ))
    })?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}
