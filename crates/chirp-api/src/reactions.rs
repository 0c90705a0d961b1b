use axum::extract::State;
use axum::{Extension, Json};

use chirp_types::api::{LikeRequest, LikeResponse, VoteRequest, VoteResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::middleware::CurrentUser;

/// One like per user per post; a repeat like conflicts and reports the
/// unchanged count. There is no unlike.
pub async fn like(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    LenientJson(req): LenientJson<LikeRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    let likes = state.store.mutate(|db| {
        let post = db.post_mut(&req.post_id).ok_or(ApiError::NotFound)?;
        if post.liked_by_user(&user.username) {
            return Err(ApiError::AlreadyLiked { likes: post.likes });
        }
        post.liked_by.push(user.username.clone());
        post.likes += 1;
        Ok(post.likes)
    })?;

    Ok(Json(LikeResponse { likes, liked: true }))
}

/// Sign-only voting: magnitude is ignored, and anything that is not a number
/// strictly greater than zero counts as a downvote. Users may vote any number
/// of times.
pub async fn vote(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    LenientJson(req): LenientJson<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let step = if req.delta.as_f64().is_some_and(|d| d > 0.0) {
        1
    } else {
        -1
    };

    let score = state.store.mutate(|db| {
        let post = db.post_mut(&req.post_id).ok_or(ApiError::NotFound)?;
        post.score += step;
        Ok::<_, ApiError>(post.score)
    })?;

    Ok(Json(VoteResponse { score }))
}
