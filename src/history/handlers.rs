use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    history::{
        dto::{HistoryResponse, RecordViewRequest, RecordViewResponse},
        services::hydrate_history,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/history", post(record_view))
        .route("/user/history", get(get_history))
}

#[instrument(skip(state, payload))]
pub async fn record_view(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecordViewRequest>,
) -> Result<Json<RecordViewResponse>, AppError> {
    let updated = state
        .users
        .update(user_id, |user| user.record_view(&payload.movie_id))
        .await?
        .ok_or(AppError::UserNotFound)?;

    info!(user_id = %user_id, movie_id = %payload.movie_id, history_len = updated.history.len(), "view recorded");
    Ok(Json(RecordViewResponse { success: true }))
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<HistoryResponse>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let search = hydrate_history(state.catalog.clone(), &user.history).await;
    Ok(Json(HistoryResponse { search }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{fake_state, FakeCatalog};
    use crate::users::User;
    use uuid::Uuid;

    async fn seed_user(state: &crate::state::AppState) -> User {
        state
            .users
            .create(User::new("a@b.test".into(), "hash".into(), "A".into()))
            .await
            .expect("seed user")
    }

    fn view(movie_id: &str) -> Json<RecordViewRequest> {
        Json(RecordViewRequest {
            movie_id: movie_id.into(),
        })
    }

    #[tokio::test]
    async fn record_then_fetch_yields_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let state = fake_state(dir.path(), FakeCatalog::with_entries(&["m1", "m2"])).await;
        let user = seed_user(&state).await;

        record_view(State(state.clone()), AuthUser(user.id), view("m1"))
            .await
            .expect("record m1");
        record_view(State(state.clone()), AuthUser(user.id), view("m2"))
            .await
            .expect("record m2");

        let Json(history) = get_history(State(state), AuthUser(user.id))
            .await
            .expect("get history");
        let ids: Vec<&str> = history
            .search
            .iter()
            .map(|e| e["imdbID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["m2", "m1"]);
    }

    #[tokio::test]
    async fn recording_same_id_twice_keeps_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let state = fake_state(dir.path(), FakeCatalog::with_entries(&["m1"])).await;
        let user = seed_user(&state).await;

        record_view(State(state.clone()), AuthUser(user.id), view("m1"))
            .await
            .unwrap();
        record_view(State(state.clone()), AuthUser(user.id), view("m1"))
            .await
            .unwrap();

        let stored = state.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.history, vec!["m1"]);
    }

    #[tokio::test]
    async fn twenty_five_views_keep_the_twenty_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let state = fake_state(dir.path(), FakeCatalog::default()).await;
        let user = seed_user(&state).await;

        for i in 0..25 {
            record_view(State(state.clone()), AuthUser(user.id), view(&format!("m{i}")))
                .await
                .unwrap();
        }

        let stored = state.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.history.len(), 20);
        let expected: Vec<String> = (5..25).rev().map(|i| format!("m{i}")).collect();
        assert_eq!(stored.history, expected);
    }

    #[tokio::test]
    async fn unresolvable_entry_is_omitted_from_history() {
        let dir = tempfile::tempdir().unwrap();
        let state = fake_state(
            dir.path(),
            FakeCatalog::with_entries(&["m1", "m2", "m3"]).failing_for("m2"),
        )
        .await;
        let user = seed_user(&state).await;

        for id in ["m1", "m2", "m3"] {
            record_view(State(state.clone()), AuthUser(user.id), view(id))
                .await
                .unwrap();
        }

        let Json(history) = get_history(State(state), AuthUser(user.id))
            .await
            .expect("partial catalog failure must not fail the call");
        let ids: Vec<&str> = history
            .search
            .iter()
            .map(|e| e["imdbID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["m3", "m1"]);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found_and_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = fake_state(dir.path(), FakeCatalog::default()).await;
        seed_user(&state).await;

        let err = record_view(State(state.clone()), AuthUser(Uuid::new_v4()), view("m1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));

        let users = state.users.list_all().await.unwrap();
        assert!(users.iter().all(|u| u.history.is_empty()));
    }
}
