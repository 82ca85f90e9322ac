//! Configuration types and structures.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default listen address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    /// Developer machine. Human-readable logs (default)
    #[default]
    Local,
    Dev,
    Nonprod,
    Prod,
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(AppEnv::Local),
            "dev" => Ok(AppEnv::Dev),
            "nonprod" => Ok(AppEnv::Nonprod),
            "prod" => Ok(AppEnv::Prod),
            other => Err(anyhow!("unknown app environment: {}", other)),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Local => write!(f, "local"),
            AppEnv::Dev => write!(f, "dev"),
            AppEnv::Nonprod => write!(f, "nonprod"),
            AppEnv::Prod => write!(f, "prod"),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0).
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default: 8080).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Wall-clock limit for a single request in seconds (default: 60).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Log verbosity: a global level plus per-module overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 0 = info, 1 = debug, 2 or more = trace.
    #[serde(default)]
    pub global_verbosity: u8,

    /// Module name to verbosity. Overrides `global_verbosity` for that module.
    #[serde(default)]
    pub modules: BTreeMap<String, u8>,
}

impl LoggingConfig {
    /// Verbosity for `module`, falling back to the global value.
    pub fn verbosity(&self, module: &str) -> u8 {
        self.modules
            .get(module)
            .copied()
            .unwrap_or(self.global_verbosity)
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app_env: AppEnv,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
