use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Maximum number of entries kept in a user's watch history.
pub const HISTORY_CAP: usize = 20;

/// User record as persisted in the store file. The hash stays inside the
/// store; API responses use `PublicUser` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// Watched catalog IDs, most recent first. Never longer than
    /// `HISTORY_CAP`, never contains duplicates.
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            history: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Record one watch event. If the ID is already anywhere in the list the
    /// call is a no-op (it does not bubble to the front); otherwise it is
    /// inserted at the head and the tail truncated to `HISTORY_CAP`.
    pub fn record_view(&mut self, movie_id: &str) {
        if self.history.iter().any(|id| id == movie_id) {
            return;
        }
        self.history.insert(0, movie_id.to_string());
        self.history.truncate(HISTORY_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> User {
        User::new("a@b.test".into(), "hash".into(), "A".into())
    }

    #[test]
    fn record_view_prepends_newest() {
        let mut user = make_user();
        user.record_view("m1");
        user.record_view("m2");
        assert_eq!(user.history, vec!["m2", "m1"]);
    }

    #[test]
    fn record_view_is_idempotent_for_known_id() {
        let mut user = make_user();
        user.record_view("m1");
        user.record_view("m1");
        assert_eq!(user.history, vec!["m1"]);
    }

    #[test]
    fn record_view_does_not_reorder_existing_id() {
        let mut user = make_user();
        user.record_view("m1");
        user.record_view("m2");
        user.record_view("m1");
        // m1 is already present, so it stays where it was.
        assert_eq!(user.history, vec!["m2", "m1"]);
    }

    #[test]
    fn history_is_capped_at_twenty_with_oldest_evicted() {
        let mut user = make_user();
        for i in 0..25 {
            user.record_view(&format!("m{i}"));
        }
        assert_eq!(user.history.len(), HISTORY_CAP);
        let expected: Vec<String> = (5..25).rev().map(|i| format!("m{i}")).collect();
        assert_eq!(user.history, expected);
    }
}
