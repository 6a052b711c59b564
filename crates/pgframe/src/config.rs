//! Connection configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FrameError, Result};

/// PostgreSQL connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Database host (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port (default: 5432).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name (default: "postgres").
    #[serde(default = "default_database")]
    pub database: String,

    /// Username.
    pub user: String,

    /// Password. Never serialized.
    #[serde(skip_serializing)]
    pub password: String,
}

impl ConnectConfig {
    /// Create a configuration with default host, port, and database.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ConnectConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(FrameError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(FrameError::Config("port must not be zero".to_string()));
        }
        if self.database.is_empty() {
            return Err(FrameError::Config(
                "database must not be empty".to_string(),
            ));
        }
        if self.user.is_empty() {
            return Err(FrameError::Config("user must not be empty".to_string()));
        }
        Ok(())
    }
}

// Default value functions for serde

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".to_string()
}
