use axum::http::HeaderName;
use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;

/// Header the upstream authentication proxy uses to pass the caller's account id.
pub const DEFAULT_OWNER_HEADER: &str = "x-authenticated-user";
pub const DEFAULT_MAX_CLIENT_ID_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    /// Request header carrying the authenticated owner id.
    #[serde(default = "default_owner_header")]
    pub owner_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            owner_header: default_owner_header(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationsConfig {
    /// How many freshly generated client ids to try before giving up on a create.
    #[serde(default = "default_max_client_id_attempts")]
    pub max_client_id_attempts: u32,
}

impl Default for ApplicationsConfig {
    fn default() -> Self {
        Self {
            max_client_id_attempts: default_max_client_id_attempts(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub applications: ApplicationsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database_url must not be empty".into(),
            ));
        }
        if self.applications.max_client_id_attempts == 0 {
            return Err(ConfigError::Validation(
                "applications.max_client_id_attempts must be >= 1".into(),
            ));
        }
        if HeaderName::from_bytes(self.auth.owner_header.as_bytes()).is_err() {
            return Err(ConfigError::Validation(format!(
                "auth.owner_header '{}' is not a valid header name",
                self.auth.owner_header
            )));
        }
        Ok(())
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_owner_header() -> String {
    DEFAULT_OWNER_HEADER.to_string()
}

fn default_max_client_id_attempts() -> u32 {
    DEFAULT_MAX_CLIENT_ID_ATTEMPTS
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Any environment variable matching the key path separated by double underscores
/// (e.g. `APPLICATIONS__MAX_CLIENT_ID_ATTEMPTS`) overrides the file value.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from("config.yaml")
}

/// Same as [`load_config`] but reading the given file (extension optional).
pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;

    Ok(app)
}
