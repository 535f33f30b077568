use std::sync::Arc;

use futures::{stream, StreamExt};
use serde_json::Value;
use tracing::warn;

use crate::movies::client::CatalogClient;

/// Cap on simultaneous outstanding catalog lookups while hydrating a
/// history. Keeps a 20-entry history from slamming the catalog all at once.
const MAX_CONCURRENT_LOOKUPS: usize = 5;

/// Resolve history IDs into catalog entries, most-recent-first. Lookups run
/// concurrently but `buffered` keeps completion in submission order. An
/// entry whose lookup fails is dropped, the rest survive, and the call as a
/// whole never fails because of the catalog.
pub async fn hydrate_history(catalog: Arc<dyn CatalogClient>, ids: &[String]) -> Vec<Value> {
    stream::iter(ids.iter().cloned())
        .map(|id| {
            let catalog = catalog.clone();
            async move {
                match catalog.fetch_by_id(&id).await {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(movie_id = %id, error = %e, "history lookup failed, dropping entry");
                        None
                    }
                }
            }
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}
