use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use chirp_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;

/// The authenticated caller, inserted as a request extension by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract the bearer token and resolve it through the store's session map.
/// A missing header, missing prefix, unknown token, or dangling user id all
/// reject with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(ApiError::Unauthorized)?;

    let user = state
        .store
        .read(|db| db.user_by_token(token).cloned())
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
