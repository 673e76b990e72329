use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_OWNER_HEADER, FALLBACK_TIMEZONE};
use crate::model::OwnerId;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SingleUser,
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub proxy: Option<ProxyAuthConfig>,
    pub single_user: Option<SingleUserAuthConfig>,
}

/// The gateway in front of the server has already verified the caller and
/// forwards the owner id in `header`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyAuthConfig {
    #[serde(default = "default_owner_header")]
    pub header: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserAuthConfig {
    pub owner_id: OwnerId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the address the server binds to, as "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            format!("http://{}", self.bind_addr())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone used for owners whose profile carries no zone.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

fn default_owner_header() -> String {
    DEFAULT_OWNER_HEADER.to_string()
}

fn default_timezone() -> String {
    FALLBACK_TIMEZONE.to_string()
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `config.toml` into a `Settings`.
    ///
    /// Environment variables use the `KALENDS_` prefix and `__` between
    /// nesting levels, e.g. `KALENDS_DATABASE__MAX_CONNECTIONS`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("auth.method", "proxy")?
            .set_default("auth.proxy.header", DEFAULT_OWNER_HEADER)?
            .set_default("calendar.default_timezone", FALLBACK_TIMEZONE)?
            // Env file
            .add_source(
                config::Environment::with_prefix("KALENDS")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_origin_defaults_to_bind_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8698,
            serve_origin: None,
        };

        assert_eq!(server.bind_addr(), "127.0.0.1:8698");
        assert_eq!(server.origin(), "http://127.0.0.1:8698");
    }

    #[test]
    fn test_server_origin_prefers_configured_origin() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8698,
            serve_origin: Some("https://calendar.example.com".to_string()),
        };

        assert_eq!(server.origin(), "https://calendar.example.com");
    }

    #[test_log::test]
    fn test_calendar_config_defaults_timezone() {
        let calendar: CalendarConfig = serde_json::from_str("{}").expect("valid json");
        assert_eq!(calendar.default_timezone, FALLBACK_TIMEZONE);
    }

    #[test]
    fn test_proxy_config_defaults_header() {
        let proxy: ProxyAuthConfig = serde_json::from_str("{}").expect("valid json");
        assert_eq!(proxy.header, DEFAULT_OWNER_HEADER);
    }

    #[test]
    fn test_auth_method_deserializes_snake_case() {
        let method: AuthMethod = serde_json::from_str("\"single_user\"").expect("valid json");
        assert!(matches!(method, AuthMethod::SingleUser));

        let method: AuthMethod = serde_json::from_str("\"proxy\"").expect("valid json");
        assert!(matches!(method, AuthMethod::Proxy));
    }
}
