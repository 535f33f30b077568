use std::sync::Arc;

use crate::config::AppConfig;
use crate::movies::client::{CatalogClient, OmdbClient};
use crate::users::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub catalog: Arc<dyn CatalogClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let users = Arc::new(UserStore::open(&config.users_file).await?);
        let catalog = Arc::new(OmdbClient::new(&config.omdb)?) as Arc<dyn CatalogClient>;
        Ok(Self {
            users,
            catalog,
            config,
        })
    }
}
