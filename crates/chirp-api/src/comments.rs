use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use chirp_types::api::CreateCommentRequest;
use chirp_types::models::Comment;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::middleware::CurrentUser;

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    LenientJson(req): LenientJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.content.trim().to_string();

    let comment = state.store.mutate(|db| {
        // The post id arrives in the body, so a missing post is invalid
        // input rather than a 404.
        if db.post(&req.post_id).is_none() || content.is_empty() {
            return Err(ApiError::Invalid);
        }
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author: user.username.clone(),
            content: content.clone(),
            created_at: Utc::now(),
        };
        db.append_comment(&req.post_id, comment.clone());
        Ok(comment)
    })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(_user): Extension<CurrentUser>,
) -> Json<Vec<Comment>> {
    Json(state.store.read(|db| db.comments_oldest_first(&post_id)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteCommentQuery {
    /// Id of the owning post.
    pub post: String,
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Query(query): Query<DeleteCommentQuery>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.mutate(|db| {
        let list = db.comments_mut(&query.post).ok_or(ApiError::NotFound)?;
        let idx = list
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(ApiError::NotFound)?;
        if list[idx].author != user.username {
            return Err(ApiError::Forbidden);
        }
        list.remove(idx);
        Ok(())
    })?;

    Ok(Json(json!({ "ok": true })))
}
