use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub users_file: PathBuf,
    pub jwt: JwtConfig,
    pub omdb: OmdbConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let users_file = std::env::var("USERS_FILE")
            .unwrap_or_else(|_| "users.json".into())
            .into();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
        };
        let omdb = OmdbConfig {
            api_key: std::env::var("OMDB_API_KEY")?,
            base_url: std::env::var("OMDB_BASE_URL")
                .unwrap_or_else(|_| "http://www.omdbapi.com/".into()),
        };
        Ok(Self {
            users_file,
            jwt,
            omdb,
        })
    }
}
