use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Fallback API origin used when nothing overrides it
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the API origin
pub const BASE_URL_ENV: &str = "RECIPE_API_URL";

/// Client configuration, resolved once at startup
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    /// Origin every API path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Unset means requests may wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. `RECIPE_API_URL` for the base URL
    /// 2. Environment variables with RECIPE__ prefix
    /// 3. recipe-client.toml file in current directory
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        load_config(std::env::var(BASE_URL_ENV).ok())
    }
}

/// Build the configuration with an explicit base URL override.
///
/// Environment variable format: RECIPE__TIMEOUT_SECS
pub fn load_config(base_url_override: Option<String>) -> Result<ClientConfig, ConfigError> {
    let base_url_override = base_url_override.filter(|url| !url.trim().is_empty());

    let settings = Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-client").required(false))
        .add_source(
            Environment::with_prefix("RECIPE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("base_url", base_url_override)?
        .build()?;

    settings.try_deserialize()
}
