use crate::{env_or_default, env_required, parse_value, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Path prefix used when `DEFAULT_API_PREFIX` is not set.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Normalised API prefix: leading slash, no trailing slash.
    /// An empty string mounts the API at the root.
    pub api_prefix: String,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = normalize_prefix(prefix);
        self
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads:
    /// - PORT: required
    /// - HOST: defaults to 0.0.0.0
    /// - DEFAULT_API_PREFIX: defaults to /api/v1
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = parse_value("PORT", &env_required("PORT")?)?;
        let api_prefix = normalize_prefix(&env_or_default("DEFAULT_API_PREFIX", DEFAULT_API_PREFIX));

        Ok(Self {
            host,
            port,
            api_prefix,
        })
    }
}

/// "api/v2/" -> "/api/v2", "/" -> ""
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_requires_port() {
        temp_env::with_var_unset("PORT", || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "PORT"));
        });
    }

    #[test]
    fn test_server_config_from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("HOST", None::<&str>),
                ("PORT", Some("3000")),
                ("DEFAULT_API_PREFIX", None),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.host, "0.0.0.0");
                assert_eq!(config.port, 3000);
                assert_eq!(config.api_prefix, "/api/v1");
                assert_eq!(config.address(), "0.0.0.0:3000");
            },
        );
    }

    #[test]
    fn test_server_config_custom_prefix_is_normalised() {
        temp_env::with_vars(
            [
                ("HOST", Some("127.0.0.1")),
                ("PORT", Some("8081")),
                ("DEFAULT_API_PREFIX", Some("api/v2/")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "127.0.0.1:8081");
                assert_eq!(config.api_prefix, "/api/v2");
            },
        );
    }

    #[test]
    fn test_server_config_from_env_invalid_port() {
        temp_env::with_var("PORT", Some("not_a_number"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_server_config_from_env_port_out_of_range() {
        temp_env::with_var("PORT", Some("99999"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/items/"), "/items");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn test_server_config_new_uses_default_prefix() {
        let config = ServerConfig::new("localhost".to_string(), 8080).with_api_prefix("v3");
        assert_eq!(config.address(), "localhost:8080");
        assert_eq!(config.api_prefix, "/v3");
    }
}
