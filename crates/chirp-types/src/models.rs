use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entities as they live in the persisted store document. Ids are opaque
/// strings; serialized field names match the on-disk and wire layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
}

/// A thread is a titled long-form post; a chirp is short and untitled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Thread,
    /// Unknown kinds downgrade to chirp instead of erroring.
    #[default]
    #[serde(other)]
    Chirp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: String,
    pub kind: PostKind,
    /// Non-empty iff `kind` is `Thread`.
    pub title: String,
    pub content: String,
    pub likes: u64,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    /// Usernames that have liked this post. `likes` always equals its length.
    #[serde(default)]
    pub liked_by: Vec<String>,
}

impl Post {
    pub fn liked_by_user(&self, username: &str) -> bool {
        self.liked_by.iter().any(|u| u == username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_falls_back_to_chirp() {
        assert_eq!(
            serde_json::from_str::<PostKind>("\"thread\"").unwrap(),
            PostKind::Thread
        );
        assert_eq!(
            serde_json::from_str::<PostKind>("\"chirp\"").unwrap(),
            PostKind::Chirp
        );
        assert_eq!(
            serde_json::from_str::<PostKind>("\"poll\"").unwrap(),
            PostKind::Chirp
        );
    }

    #[test]
    fn post_serializes_camel_case() {
        let post = Post {
            id: "p1".into(),
            author: "ada".into(),
            kind: PostKind::Chirp,
            title: String::new(),
            content: "hello".into(),
            likes: 0,
            score: 0,
            created_at: Utc::now(),
            liked_by: vec![],
        };
        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("likedBy").is_some());
        assert_eq!(value["kind"], "chirp");
    }
}
