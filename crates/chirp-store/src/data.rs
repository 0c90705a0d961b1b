use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use chirp_types::models::{Comment, Post, User};

/// The persisted document: four top-level collections. Each field is
/// defaulted individually when missing or malformed, so one bad collection
/// does not discard the rest of the file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    #[serde(deserialize_with = "or_default")]
    pub users: Vec<User>,
    /// token -> user id
    #[serde(deserialize_with = "or_default")]
    pub sessions: HashMap<String, String>,
    #[serde(deserialize_with = "or_default")]
    pub posts: Vec<Post>,
    /// post id -> comments, in append order
    #[serde(deserialize_with = "or_default")]
    pub comments: HashMap<String, Vec<Comment>>,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl StoreData {
    // -- Users --

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn user_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.push(user);
    }

    // -- Sessions --

    pub fn insert_session(&mut self, token: String, user_id: String) {
        self.sessions.insert(token, user_id);
    }

    /// Resolve a bearer token to its user. Returns None for unknown tokens
    /// and for sessions whose user id no longer resolves.
    pub fn user_by_token(&self, token: &str) -> Option<&User> {
        let user_id = self.sessions.get(token)?;
        self.user_by_id(user_id)
    }

    // -- Posts --

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn post_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    /// Insert a post and initialize its empty comment list.
    pub fn insert_post(&mut self, post: Post) {
        self.comments.insert(post.id.clone(), Vec::new());
        self.posts.push(post);
    }

    /// Remove a post together with its entire comment list.
    pub fn remove_post(&mut self, id: &str) -> Option<Post> {
        let idx = self.posts.iter().position(|p| p.id == id)?;
        let post = self.posts.remove(idx);
        self.comments.remove(id);
        Some(post)
    }

    /// Posts newest first; ties keep insertion order.
    pub fn feed(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    // -- Comments --

    /// Comments for a post, oldest first. Unknown ids yield an empty list.
    pub fn comments_oldest_first(&self, post_id: &str) -> Vec<Comment> {
        let mut list = self.comments.get(post_id).cloned().unwrap_or_default();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        list
    }

    pub fn comment_count(&self, post_id: &str) -> usize {
        self.comments.get(post_id).map_or(0, |list| list.len())
    }

    pub fn comments_mut(&mut self, post_id: &str) -> Option<&mut Vec<Comment>> {
        self.comments.get_mut(post_id)
    }

    pub fn append_comment(&mut self, post_id: &str, comment: Comment) {
        self.comments
            .entry(post_id.to_string())
            .or_default()
            .push(comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chirp_types::models::PostKind;
    use chrono::{Duration, Utc};

    fn post_at(id: &str, offset_secs: i64) -> Post {
        Post {
            id: id.into(),
            author: "ada".into(),
            kind: PostKind::Chirp,
            title: String::new(),
            content: "hi".into(),
            likes: 0,
            score: 0,
            created_at: Utc::now() + Duration::seconds(offset_secs),
            liked_by: vec![],
        }
    }

    fn comment_at(id: &str, offset_secs: i64) -> Comment {
        Comment {
            id: id.into(),
            author: "ada".into(),
            content: "hi".into(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn feed_is_newest_first() {
        let mut db = StoreData::default();
        db.insert_post(post_at("p1", 0));
        db.insert_post(post_at("p2", 10));
        db.insert_post(post_at("p3", 20));

        let ids: Vec<&str> = db.feed().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p2", "p1"]);
    }

    #[test]
    fn comments_are_oldest_first() {
        let mut db = StoreData::default();
        db.insert_post(post_at("p1", 0));
        db.append_comment("p1", comment_at("c2", 10));
        db.append_comment("p1", comment_at("c1", 5));

        let ids: Vec<String> = db
            .comments_oldest_first("p1")
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, ["c1", "c2"]);
    }

    #[test]
    fn removing_a_post_drops_its_comments() {
        let mut db = StoreData::default();
        db.insert_post(post_at("p1", 0));
        db.append_comment("p1", comment_at("c1", 1));

        assert!(db.remove_post("p1").is_some());
        assert!(db.post("p1").is_none());
        assert_eq!(db.comment_count("p1"), 0);
        assert!(db.comments_oldest_first("p1").is_empty());
    }

    #[test]
    fn dangling_session_resolves_to_no_user() {
        let mut db = StoreData::default();
        db.insert_session("tok".into(), "ghost".into());
        assert!(db.user_by_token("tok").is_none());
    }
}
