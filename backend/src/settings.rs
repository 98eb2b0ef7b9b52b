//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `COURSE_LISTS_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Runtime settings for the course lists service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURSE_LISTS")]
pub struct ServiceSettings {
    /// HTTP listening port.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Address the HTTP listener binds to.
    pub bind_host: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Course catalogue host name.
    pub catalogue_host: Option<String>,
    /// Course catalogue port.
    pub catalogue_port: Option<u16>,
    /// Per-call timeout for catalogue requests, in seconds.
    #[ortho_config(default = 10)]
    pub catalogue_timeout_secs: u64,
    /// Apply embedded migrations before serving; on unless set to `false`.
    pub run_migrations: Option<bool>,
}

const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// A setting is absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("setting `{name}` has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Where the course catalogue listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEndpoint {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ServiceSettings {
    /// Configured bind host, falling back to all interfaces.
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Whether embedded migrations run at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Socket address for the HTTP listener.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Invalid`] when `bind_host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.bind_host();
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::Invalid {
            name: "bind_host",
            value: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::Missing("database_url"))
    }

    pub fn catalogue_endpoint(&self) -> Result<CatalogueEndpoint, SettingsError> {
        let host = self
            .catalogue_host
            .clone()
            .filter(|host| !host.trim().is_empty())
            .ok_or(SettingsError::Missing("catalogue_host"))?;
        let port = self
            .catalogue_port
            .ok_or(SettingsError::Missing("catalogue_port"))?;
        Ok(CatalogueEndpoint {
            host,
            port,
            timeout: Duration::from_secs(self.catalogue_timeout_secs),
        })
    }
}
