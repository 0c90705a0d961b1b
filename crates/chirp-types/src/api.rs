use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PostKind, User};

// Request bodies default field-by-field: a missing or malformed body is
// treated as an empty object and rejected by handler validation, not by the
// deserializer.

// -- Auth --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user. The stored password is never serialized.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

// -- Posts --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub kind: PostKind,
    pub title: String,
    pub content: String,
}

/// Feed entry: a post plus the requester-derived `liked` flag and the
/// comment count. The raw `likedBy` set is not exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub author: String,
    pub kind: PostKind,
    pub title: String,
    pub content: String,
    pub likes: u64,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub comments: usize,
    pub liked: bool,
}

// -- Comments --

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub content: String,
}

// -- Reactions --

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: String,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: u64,
    pub liked: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoteRequest {
    pub post_id: String,
    /// Accepts any JSON value; only a number strictly greater than zero
    /// counts as an upvote.
    pub delta: Value,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub score: i64,
}
