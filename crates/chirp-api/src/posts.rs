use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use chirp_types::api::{CreatePostRequest, PostView};
use chirp_types::models::{Post, PostKind};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::middleware::CurrentUser;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    LenientJson(req): LenientJson<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.content.trim().to_string();
    // A chirp discards any supplied title; a thread requires one.
    let title = match req.kind {
        PostKind::Thread => req.title.trim().to_string(),
        PostKind::Chirp => String::new(),
    };
    if content.is_empty() || (req.kind == PostKind::Thread && title.is_empty()) {
        return Err(ApiError::Invalid);
    }

    let post = Post {
        id: Uuid::new_v4().to_string(),
        author: user.username,
        kind: req.kind,
        title,
        content,
        likes: 0,
        score: 0,
        created_at: Utc::now(),
        liked_by: vec![],
    };

    let post = state.store.mutate(move |db| {
        db.insert_post(post.clone());
        Ok::<_, ApiError>(post)
    })?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn feed(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<PostView>> {
    let views = state.store.read(|db| {
        db.feed()
            .into_iter()
            .map(|p| PostView {
                id: p.id.clone(),
                author: p.author.clone(),
                kind: p.kind,
                title: p.title.clone(),
                content: p.content.clone(),
                likes: p.likes,
                score: p.score,
                created_at: p.created_at,
                comments: db.comment_count(&p.id),
                liked: p.liked_by_user(&user.username),
            })
            .collect()
    });
    Json(views)
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.mutate(|db| {
        let post = db.post(&post_id).ok_or(ApiError::NotFound)?;
        if post.author != user.username {
            return Err(ApiError::Forbidden);
        }
        db.remove_post(&post_id);
        Ok(())
    })?;

    Ok(Json(json!({ "ok": true })))
}
