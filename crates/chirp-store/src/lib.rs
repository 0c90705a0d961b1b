pub mod data;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{info, warn};

pub use data::StoreData;

/// All service state behind one lock, persisted as a single JSON document.
///
/// Handlers run their whole read-modify-persist section under the lock, so
/// every request observes and leaves a consistent store even though the
/// runtime schedules them across threads.
pub struct Store {
    path: PathBuf,
    state: Mutex<StoreData>,
}

impl Store {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// or unparseable file is discarded and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoreData>(&raw) {
                Ok(data) => data,
                Err(e) => {
                    warn!("discarding unparseable store file {}: {}", path.display(), e);
                    StoreData::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreData::default(),
            Err(e) => {
                warn!("failed to read store file {}: {}", path.display(), e);
                StoreData::default()
            }
        };
        info!("store opened at {}", path.display());
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    /// Run a read-only closure against the store.
    pub fn read<T>(&self, f: impl FnOnce(&StoreData) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    /// Run a mutating closure. On `Ok` the whole document is written out
    /// before the lock is released, so a success response implies the
    /// mutation reached the file. On `Err` nothing is written.
    pub fn mutate<T, E>(&self, f: impl FnOnce(&mut StoreData) -> Result<T, E>) -> Result<T, E> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let out = f(&mut state)?;
        self.save(&state);
        Ok(out)
    }

    /// Best-effort whole-document overwrite. Failures are logged and
    /// swallowed, never surfaced to the caller.
    fn save(&self, state: &StoreData) {
        let payload = match serde_json::to_string_pretty(state) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to serialize store: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, payload) {
            warn!("failed to persist store to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chirp_types::models::{Post, PostKind, User};
    use chrono::Utc;

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.into(),
            username: username.into(),
            password: "pw".into(),
        }
    }

    fn post(id: &str, author: &str) -> Post {
        Post {
            id: id.into(),
            author: author.into(),
            kind: PostKind::Chirp,
            title: String::new(),
            content: "hello".into(),
            likes: 0,
            score: 0,
            created_at: Utc::now(),
            liked_by: vec![],
        }
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data.json"));
        assert_eq!(store.read(|db| db.users.len()), 0);
        assert_eq!(store.read(|db| db.posts.len()), 0);
    }

    #[test]
    fn open_garbage_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();
        let store = Store::open(&path);
        assert_eq!(store.read(|db| db.users.len()), 0);
    }

    #[test]
    fn malformed_field_is_defaulted_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{
                "users": [{"id": "u1", "username": "ada", "password": "pw"}],
                "sessions": "oops",
                "posts": 42,
                "comments": {}
            }"#,
        )
        .unwrap();
        let store = Store::open(&path);
        store.read(|db| {
            assert_eq!(db.users.len(), 1);
            assert!(db.sessions.is_empty());
            assert!(db.posts.is_empty());
        });
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let store = Store::open(&path);
        store
            .mutate(|db| {
                db.insert_user(user("u1", "ada"));
                db.insert_session("tok".into(), "u1".into());
                db.insert_post(post("p1", "ada"));
                Ok::<_, ()>(())
            })
            .unwrap();
        drop(store);

        let reopened = Store::open(&path);
        reopened.read(|db| {
            assert_eq!(db.user_by_token("tok").unwrap().username, "ada");
            assert!(db.post("p1").is_some());
            assert_eq!(db.comment_count("p1"), 0);
        });
    }

    #[test]
    fn failed_mutation_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let store = Store::open(&path);
        let result = store.mutate(|db| {
            db.insert_user(user("u1", "ada"));
            Err::<(), &str>("rejected")
        });
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
