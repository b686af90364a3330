use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Base of the remote cultural classes API, including the `/api` prefix.
    pub api_base_url: Url,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_API_BASE_URL, APP_PORT, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("api_base_url", "http://localhost:8080/api")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 3000)?
            .build()?;

        config.try_deserialize()
    }
}
