use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::users::repo_types::User;

/// File-backed user store: the whole collection lives in one JSON array and
/// every mutation rewrites the file. O(n) per write, fine for the small
/// deployments this targets.
///
/// All read-modify-write cycles run under `write_lock`, so within one process
/// two concurrent mutations cannot lose each other's update.
pub struct UserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UserStore {
    /// Open the store, creating an empty collection if the file is absent.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if !path.exists() {
            write_atomic(&path, &[]).await?;
            debug!(path = %path.display(), "created empty user store");
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Read the full persisted collection.
    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        read_users(&self.path).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.list_all().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.list_all().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    /// Insert a new user, failing if the email is already taken. The
    /// uniqueness check and the write happen under the same lock.
    pub async fn create(&self, user: User) -> Result<User, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut users = read_users(&self.path).await?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailTaken);
        }
        users.push(user.clone());
        write_atomic(&self.path, &users).await?;
        Ok(user)
    }

    /// Apply `mutate` to the user with the given id and persist the result.
    /// Returns the updated record, or `None` if the id is unknown.
    pub async fn update<F>(&self, id: Uuid, mutate: F) -> Result<Option<User>, AppError>
    where
        F: FnOnce(&mut User),
    {
        let _guard = self.write_lock.lock().await;
        let mut users = read_users(&self.path).await?;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        mutate(user);
        let updated = user.clone();
        write_atomic(&self.path, &users).await?;
        Ok(Some(updated))
    }
}

async fn read_users(path: &Path) -> Result<Vec<User>, AppError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read user store {}", path.display()))
        .map_err(AppError::Storage)?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parse user store {}", path.display()))
        .map_err(AppError::Storage)
}

/// Full rewrite via temp file + rename so a concurrent reader never sees a
/// half-written collection.
async fn write_atomic(path: &Path, users: &[User]) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(users)
        .context("serialize user store")
        .map_err(AppError::Storage)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("write user store {}", tmp.display()))
        .map_err(AppError::Storage)?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("replace user store {}", path.display()))
        .map_err(AppError::Storage)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store(dir: &tempfile::TempDir) -> UserStore {
        UserStore::open(dir.path().join("users.json"))
            .await
            .expect("open store")
    }

    fn make_user(email: &str) -> User {
        User::new(email.into(), "hash".into(), "Test".into())
    }

    #[tokio::test]
    async fn open_creates_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let user = {
            let store = UserStore::open(&path).await.unwrap();
            store.create(make_user("a@b.test")).await.unwrap()
        };
        let store = UserStore::open(&path).await.unwrap();
        let found = store.find_by_id(user.id).await.unwrap().expect("user kept");
        assert_eq!(found.email, "a@b.test");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(make_user("a@b.test")).await.unwrap();
        let err = store.create(make_user("a@b.test")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailTaken));
        // Still exactly one record for that email.
        let users = store.list_all().await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(make_user("a@b.test")).await.unwrap();
        assert!(store.find_by_email("A@B.test").await.unwrap().is_none());
        assert!(store.find_by_email("a@b.test").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let out = store.update(Uuid::new_v4(), |_| {}).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn malformed_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "not json at all").unwrap();
        let store = UserStore::open(&path).await.unwrap();
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
