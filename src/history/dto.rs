use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for recording a watch event.
#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    #[serde(rename = "movieId")]
    pub movie_id: String,
}

#[derive(Debug, Serialize)]
pub struct RecordViewResponse {
    pub success: bool,
}

/// Hydrated history, keyed `Search` to match the catalog's own list shape so
/// the frontend renders both with the same component.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    #[serde(rename = "Search")]
    pub search: Vec<Value>,
}
