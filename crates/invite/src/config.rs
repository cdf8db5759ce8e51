//! Configuration management for invite.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::Backend;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "invite";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "rsvps.db";

/// Default JSON store file name.
const FILE_STORE_NAME: &str = "rsvps.json";

/// Default client fallback file name.
const FALLBACK_FILE_NAME: &str = "rsvp-fallback.json";

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; the client may fall back to local storage.
    #[default]
    Development,
    /// Live deployment; the client never falls back.
    Production,
}

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `SUPABASE_URL` / `SUPABASE_SERVICE_ROLE_KEY`
/// 2. Environment variables prefixed with `INVITE_`, `__` separating
///    sections (e.g. `INVITE_STORAGE__BACKEND=sqlite`)
/// 3. TOML config file at `~/.config/invite/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment environment.
    pub environment: Environment,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Notification configuration.
    pub notify: NotifyConfig,
    /// Client wrapper configuration.
    pub client: ClientConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the endpoint listens on.
    pub bind_addr: String,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend holds the RSVPs.
    pub backend: Backend,
    /// Path to the JSON file used by the `file` backend.
    /// Defaults to `~/.local/share/invite/rsvps.json`
    pub file_path: Option<PathBuf>,
    /// Path to the database used by the `sqlite` backend.
    /// Defaults to `~/.local/share/invite/rsvps.db`
    pub database_path: Option<PathBuf>,
    /// Settings for the `supabase` backend.
    pub supabase: SupabaseConfig,
}

/// Hosted Postgres (Supabase) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: Option<String>,
    /// Service role key.
    pub service_key: Option<String>,
    /// Table holding the RSVPs.
    pub table: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Prepare a notification for every new RSVP.
    pub enabled: bool,
    /// Address the notification is meant for.
    pub recipient: String,
    /// Event name used in the notification footer.
    pub event_name: String,
}

/// Client wrapper settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the endpoint host, without the resource path.
    pub base_url: String,
    /// Fall back to a local file when the endpoint is unreachable.
    /// Ignored in production.
    pub offline_fallback: bool,
    /// Path to the fallback file.
    /// Defaults to `~/.local/share/invite/rsvp-fallback.json`
    pub fallback_path: Option<PathBuf>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: "rsvps".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recipient: "host@example.com".to_string(),
            event_name: "40th Birthday".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            offline_fallback: true,
            fallback_path: None,
            timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config: Config = Self::figment(config_path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(config_path: Option<PathBuf>) -> Figment {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("INVITE_").split("__"))
            .merge(
                Env::raw()
                    .only(&["SUPABASE_URL"])
                    .map(|_| "storage.supabase.url".into()),
            )
            .merge(
                Env::raw()
                    .only(&["SUPABASE_SERVICE_ROLE_KEY"])
                    .map(|_| "storage.supabase.service_key".into()),
            )
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// A `supabase` backend without credentials is rejected here so the
    /// server refuses to start instead of failing every request.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.storage.backend == Backend::Supabase {
            let supabase = &self.storage.supabase;
            if supabase.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                return Err(Error::backend_configuration(
                    "supabase backend selected but SUPABASE_URL is not set",
                ));
            }
            if supabase
                .service_key
                .as_deref()
                .map_or(true, |k| k.trim().is_empty())
            {
                return Err(Error::backend_configuration(
                    "supabase backend selected but SUPABASE_SERVICE_ROLE_KEY is not set",
                ));
            }
            if supabase.table.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.supabase.table must not be empty".to_string(),
                });
            }
        }

        if self.storage.supabase.timeout_ms == 0 || self.client.timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.client.base_url.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "client.base_url must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Parse the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .map_err(|e| Error::ConfigValidation {
                message: format!("invalid bind_addr '{}': {e}", self.server.bind_addr),
            })
    }

    /// Get the JSON store path, resolving defaults if not set.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.storage
            .file_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FILE_STORE_NAME))
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the client fallback path, resolving defaults if not set.
    #[must_use]
    pub fn fallback_path(&self) -> PathBuf {
        self.client
            .fallback_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FALLBACK_FILE_NAME))
    }

    /// Whether the client may use its offline fallback.
    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        self.client.offline_fallback && self.environment != Environment::Production
    }

    /// Get the client request timeout as a Duration.
    #[must_use]
    pub fn client_timeout(&self) -> Duration {
        Duration::from_millis(self.client.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supabase_config() -> Config {
        let mut config = Config::default();
        config.storage.backend = Backend::Supabase;
        config.storage.supabase.url = Some("https://example.supabase.co".to_string());
        config.storage.supabase.service_key = Some("key".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.storage.backend, Backend::Memory);
        assert!(config.notify.enabled);
        assert!(config.client.offline_fallback);
    }

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_default_supabase_config() {
        let supabase = SupabaseConfig::default();

        assert!(supabase.url.is_none());
        assert!(supabase.service_key.is_none());
        assert_eq!(supabase.table, "rsvps");
        assert_eq!(supabase.timeout_ms, 10_000);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
        assert!(supabase_config().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "not an address".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("bind_addr"));
    }

    #[test]
    fn test_validate_supabase_without_url() {
        let mut config = supabase_config();
        config.storage.supabase.url = None;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::BackendConfiguration { .. }));
        assert!(err.to_string().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_validate_supabase_without_key() {
        let mut config = supabase_config();
        config.storage.supabase.service_key = Some(String::new());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_SERVICE_ROLE_KEY"));
    }

    #[test]
    fn test_validate_missing_credentials_ignored_for_other_backends() {
        let mut config = Config::default();
        config.storage.backend = Backend::Sqlite;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.client.timeout_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_ms"));
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_paths_default() {
        let config = Config::default();
        assert!(config.file_path().to_string_lossy().contains("rsvps.json"));
        assert!(config.database_path().to_string_lossy().contains("rsvps.db"));
        assert!(config
            .fallback_path()
            .to_string_lossy()
            .contains("rsvp-fallback.json"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_fallback_disabled_in_production() {
        let mut config = Config::default();
        assert!(config.fallback_enabled());

        config.environment = Environment::Production;
        assert!(!config.fallback_enabled());

        config.environment = Environment::Development;
        config.client.offline_fallback = false;
        assert!(!config.fallback_enabled());
    }

    #[test]
    fn test_client_timeout() {
        let config = Config::default();
        assert_eq!(config.client_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("invite"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
environment = "production"

[server]
bind_addr = "0.0.0.0:8080"

[storage]
backend = "sqlite"
database_path = "/srv/invite/rsvps.db"

[notify]
recipient = "john@fairfax-ball.com"
"#,
        )
        .unwrap();

        let config: Config = Config::figment(Some(path)).extract().unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/invite/rsvps.db")
        );
        assert_eq!(config.notify.recipient, "john@fairfax-ball.com");
        assert_eq!(config.notify.event_name, "40th Birthday");
    }

    #[test]
    fn test_load_from_applies_file_sections() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[server]
bind_addr = "0.0.0.0:8080"

[storage]
backend = "sqlite"

[client]
offline_fallback = false
"#,
            )?;
            let path = jail.directory().join("config.toml");

            let config = Config::load_from(Some(path)).map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.storage.backend, Backend::Sqlite);
            assert!(!config.client.offline_fallback);
            assert_eq!(config.storage.supabase.table, "rsvps");
            Ok(())
        });
    }

    #[test]
    fn test_environment_beats_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "invite.toml",
                r#"
[storage]
backend = "sqlite"
"#,
            )?;
            jail.set_env("INVITE_STORAGE__BACKEND", "file");

            let config: Config = Config::figment(Some(PathBuf::from("invite.toml"))).extract()?;
            assert_eq!(config.storage.backend, Backend::File);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("INVITE_STORAGE__BACKEND", "file");
            jail.set_env("INVITE_SERVER__BIND_ADDR", "127.0.0.1:4000");
            jail.set_env("SUPABASE_URL", "https://example.supabase.co");
            jail.set_env("SUPABASE_SERVICE_ROLE_KEY", "secret");

            let config: Config = Config::figment(Some(PathBuf::from("absent.toml"))).extract()?;
            assert_eq!(config.storage.backend, Backend::File);
            assert_eq!(config.server.bind_addr, "127.0.0.1:4000");
            assert_eq!(
                config.storage.supabase.url.as_deref(),
                Some("https://example.supabase.co")
            );
            assert_eq!(config.storage.supabase.service_key.as_deref(), Some("secret"));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let config = supabase_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_storage_config_deserialize_partial() {
        let json = r#"{"backend": "file"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.backend, Backend::File);
        assert_eq!(storage.supabase.table, "rsvps");
    }
}
