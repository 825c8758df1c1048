//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CLAIMCHECK_*` environment variables.
//! Server settings live here; each collaborator carries its own `config.rs` with a
//! matching `from_env` constructor, bundled by [`ServiceConfig`](crate::pipeline::ServiceConfig).

pub(crate) mod env;
pub mod error;


pub use error::ConfigError;

use std::net::IpAddr;

/// HTTP server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CLAIMCHECK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        }
    }
}

impl Config {
    pub(crate) const ENV_PORT: &'static str = "CLAIMCHECK_PORT";
    const ENV_BIND_ADDR: &'static str = "CLAIMCHECK_BIND_ADDR";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;

        Ok(Self { port, bind_addr })
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match std::env::var(Self::ENV_PORT) {
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
        match std::env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }
}
