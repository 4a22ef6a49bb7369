//! Application configuration.
//!
//! Every value comes from the process environment. A `.env` file in the
//! working directory is read first; variables already present in the
//! environment take precedence over it.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name used in logs and the service info payload.
    pub service_name: String,
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Target database.
    pub database: DatabaseConfig,
}

/// Connection parameters for the target Postgres database.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection string; when set it wins over the discrete fields.
    pub url: Option<String>,
    pub user: String,
    pub host: String,
    pub name: String,
    pub password: String,
    pub port: u16,
    /// Upper bound handed to the pool.
    pub max_connections: u32,
    /// How long a request waits to acquire a pooled connection.
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("host", &self.host)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: "postgres".to_string(),
            host: "localhost".to_string(),
            name: "monaco_db".to_string(),
            password: String::new(),
            port: 5432,
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    /// Reads `DATABASE_URL` / `DB_*` through `lookup`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            name: lookup("DB_NAME").unwrap_or(defaults.name),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            port: parse_or(lookup("DB_PORT"), defaults.port),
            max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), defaults.max_connections),
            connect_timeout_secs: parse_or(
                lookup("DB_CONNECT_TIMEOUT_SECS"),
                defaults.connect_timeout_secs,
            ),
        }
    }

    /// Builds sqlx connect options.
    ///
    /// # Errors
    /// Returns `AppError::Config` if `DATABASE_URL` is set but cannot be parsed.
    pub fn connect_options(&self) -> crate::errors::AppResult<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| crate::errors::AppError::Config(format!("invalid DATABASE_URL: {}", e)));
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AppConfig {
    /// Loads configuration for the named service.
    pub fn load_with_service(service_name: &str) -> Self {
        load_dotenv();
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Built-in defaults only; neither the environment nor `.env` is read.
    pub fn with_defaults(service_name: &str) -> Self {
        Self::from_lookup(service_name, |_| None)
    }

    fn from_lookup(service_name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service_name: service_name.to_string(),
            host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(lookup("SERVER_PORT"), DEFAULT_PORT),
            database: DatabaseConfig::from_lookup(&lookup),
        }
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Load .env file from the working directory (best-effort, no error if missing).
fn load_dotenv() {
    let env_path = std::path::Path::new(".env");
    let Ok(content) = std::fs::read_to_string(env_path) else {
        return;
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            // Only set if not already set by the environment
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup("schema-gateway", lookup_from(&[]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.name, "monaco_db");
        assert_eq!(config.database.port, 5432);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_with_defaults_uses_builtin_values() {
        let config = AppConfig::with_defaults("schema-gateway");
        assert_eq!(config.service_name, "schema-gateway");
        assert_eq!(config.database.name, "monaco_db");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = AppConfig::from_lookup(
            "schema-gateway",
            lookup_from(&[
                ("SERVER_PORT", "8088"),
                ("DB_NAME", "shop"),
                ("DB_PORT", "not-a-port"),
                ("DB_MAX_CONNECTIONS", "4"),
            ]),
        );
        assert_eq!(config.port, 8088);
        assert_eq!(config.bind_address(), "0.0.0.0:8088");
        assert_eq!(config.database.name, "shop");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 4);
    }

    #[test]
    fn test_connect_options_from_parts() {
        let db = DatabaseConfig {
            password: "p3@123".to_string(),
            ..DatabaseConfig::default()
        };
        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("monaco_db"));
    }

    #[test]
    fn test_invalid_database_url_is_config_error() {
        let db = DatabaseConfig {
            url: Some("not a url".to_string()),
            ..DatabaseConfig::default()
        };
        assert!(db.connect_options().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let db = DatabaseConfig {
            password: "secret".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(!format!("{:?}", db).contains("secret"));
    }
}
