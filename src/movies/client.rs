use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::OmdbConfig;

/// HTTP request timeout. A catalog that never answers must not hang the
/// handler forever.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// External movie catalog. Responses are the catalog's native JSON, passed
/// through to callers largely unmodified. Behind a trait so tests can
/// substitute a fake.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text title search.
    async fn search(&self, query: &str) -> anyhow::Result<Value>;

    /// Title search restricted to movies, used for the category shelves.
    async fn search_movies(&self, term: &str) -> anyhow::Result<Value>;

    /// Fetch one catalog entry by its opaque ID.
    async fn fetch_by_id(&self, id: &str) -> anyhow::Result<Value>;
}

/// OMDb-backed catalog client. Clone is cheap, `reqwest::Client` pools
/// connections behind an Arc.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> anyhow::Result<Value> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

#[async_trait]
impl CatalogClient for OmdbClient {
    async fn search(&self, query: &str) -> anyhow::Result<Value> {
        debug!(%query, "catalog search");
        self.get(&[("s", query)]).await
    }

    async fn search_movies(&self, term: &str) -> anyhow::Result<Value> {
        debug!(%term, "catalog movie search");
        self.get(&[("s", term), ("type", "movie")]).await
    }

    async fn fetch_by_id(&self, id: &str) -> anyhow::Result<Value> {
        debug!(%id, "catalog lookup");
        self.get(&[("i", id)]).await
    }
}
