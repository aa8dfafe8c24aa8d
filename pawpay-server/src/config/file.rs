//! TOML file configuration structures.
//!
//! These structs directly map to the `pawpay-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub gateway: GatewayConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default address")
}

/// Admin configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin secret. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// Simulated gateway configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Secret key for HMAC-signing payment ids.
    pub secret: String,
    /// Probability that an authorization attempt succeeds, in `0.0..=1.0`.
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,
    /// Simulated processing delay in milliseconds before the outcome draw.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
    /// Seconds a checkout session may sit idle before it is swept.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_success_rate() -> f64 {
    0.9
}

fn default_processing_delay_ms() -> u64 {
    2000
}

fn default_session_idle_secs() -> u64 {
    900
}

impl FileConfig {
    /// Check if the admin secret is already hashed (argon2 format).
    pub fn is_admin_secret_hashed(&self) -> bool {
        self.admin.secret.starts_with("$argon2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[admin]
secret = "test-secret"

[gateway]
secret = "sign-me"
success_rate = 0.75
processing_delay_ms = 100
session_idle_secs = 300
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.gateway.secret, "sign-me");
        assert_eq!(config.gateway.success_rate, 0.75);
        assert_eq!(config.gateway.processing_delay_ms, 100);
        assert_eq!(config.gateway.session_idle_secs, 300);
        assert!(!config.is_admin_secret_hashed());
    }

    #[test]
    fn test_gateway_defaults_applied() {
        let toml_str = r#"
[server]

[admin]
secret = "test-secret"

[gateway]
secret = "sign-me"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.gateway.success_rate, 0.9);
        assert_eq!(config.gateway.processing_delay_ms, 2000);
        assert_eq!(config.gateway.session_idle_secs, 900);
    }

    #[test]
    fn test_hashed_secret_detection() {
        let config = FileConfig {
            server: ServerConfig {
                listen: default_listen_addr(),
            },
            admin: AdminConfig {
                secret: "$argon2id$v=19$m=19456,t=2,p=1$abc123".to_string(),
            },
            gateway: GatewayConfig {
                secret: "sign-me".to_string(),
                success_rate: default_success_rate(),
                processing_delay_ms: default_processing_delay_ms(),
                session_idle_secs: default_session_idle_secs(),
            },
        };
        assert!(config.is_admin_secret_hashed());
    }
}
