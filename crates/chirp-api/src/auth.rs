use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use rand::RngCore;
use uuid::Uuid;

use chirp_store::Store;
use chirp_types::api::{AuthResponse, LoginRequest, SignupRequest, UserView};
use chirp_types::models::User;

use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::middleware::CurrentUser;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
}

pub async fn signup(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Usernames are stored trimmed and lowercased, which makes the
    // uniqueness check case-insensitive.
    let username = req.username.trim().to_lowercase();
    let password = req.password;
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Invalid);
    }

    let (token, user) = state.store.mutate(|db| {
        if db.user_by_username(&username).is_some() {
            return Err(ApiError::Exists);
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.clone(),
            password: password.clone(),
        };
        db.insert_user(user.clone());
        let token = issue_token();
        db.insert_session(token.clone(), user.id.clone());
        Ok((token, user))
    })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserView::from(&user),
        }),
    ))
}

/// Unknown username and wrong password are indistinguishable: both reject
/// with the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_lowercase();
    let password = req.password;

    let (token, user) = state.store.mutate(|db| {
        let user = db
            .user_by_username(&username)
            .filter(|u| u.password == password)
            .cloned()
            .ok_or(ApiError::Unauthorized)?;
        let token = issue_token();
        db.insert_session(token.clone(), user.id.clone());
        Ok((token, user))
    })?;

    Ok(Json(AuthResponse {
        token,
        user: UserView::from(&user),
    }))
}

pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserView> {
    Json(UserView::from(&user))
}

/// Fresh opaque session token: 24 random bytes, hex-encoded. Sessions never
/// expire and a user may hold any number of them.
fn issue_token() -> String {
    let mut bytes = [0u8; 24];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
