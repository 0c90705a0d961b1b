pub mod auth;
pub mod comments;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod posts;
pub mod reactions;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};

pub use auth::{AppState, AppStateInner};

/// The `/api` route table. Protected routes sit behind a single bearer-token
/// middleware layer; unmatched `/api` paths get a plain-text 404.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/me", get(auth::me))
        .route("/feed", get(posts::feed))
        .route("/post", post(posts::create_post))
        .route("/post/{id}", delete(posts::delete_post))
        .route("/comment", post(comments::create_comment))
        .route("/comment/{id}", delete(comments::delete_comment))
        .route("/comments/{post_id}", get(comments::list_comments))
        .route("/like", post(reactions::like))
        .route("/vote", post(reactions::vote))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    let api = Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found);

    Router::new().nest("/api", api)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
