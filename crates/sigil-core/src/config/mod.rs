//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SIGIL_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIGIL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path of the model artifact the server loads at startup (and the
    /// training entry point writes). Default: `./model.sgla`.
    pub artifact_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            artifact_path: PathBuf::from("./model.sgla"),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SIGIL_PORT";
    const ENV_BIND_ADDR: &'static str = "SIGIL_BIND_ADDR";
    const ENV_ARTIFACT_PATH: &'static str = "SIGIL_ARTIFACT_PATH";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let artifact_path =
            Self::parse_path_from_env(Self::ENV_ARTIFACT_PATH, defaults.artifact_path);

        Ok(Self {
            port,
            bind_addr,
            artifact_path,
        })
    }

    /// Validates basic invariants (does not require the artifact to exist;
    /// the training entry point creates it).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_path.exists() && !self.artifact_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.artifact_path.clone(),
            });
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }
}
