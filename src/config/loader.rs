//! Configuration loader with tier-based merging.

use super::merge::deep_merge_all;
use super::types::{AppEnv, Config};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_PATH_VAR: &str = "DALIL_CONFIG_PATH";
const APP_ENV_VAR: &str = "APP_ENV";
const APP_HOST_VAR: &str = "APP_HOST";
const APP_PORT_VAR: &str = "APP_PORT";
const APP_REQUEST_TIMEOUT_VAR: &str = "APP_REQUEST_TIMEOUT_SECS";
const LOGGING_GLOBAL_VAR: &str = "APP_LOGGING_VERBOSITY_GLOBAL";
const LOGGING_MODULES_VAR: &str = "APP_LOGGING_VERBOSITY_MODULES";

/// Configuration loader that handles tier-based merging.
///
/// Loading happens before logging is set up, so problems that do not abort
/// loading are kept in `warnings` for the caller to report.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    config_path: Option<PathBuf>,
    warnings: Vec<String>,
}

impl ConfigLoader {
    /// Load from defaults, the optional config file and the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(explicit_path, |key| std::env::var(key).ok())
    }

    /// Load with an explicit environment lookup.
    pub fn load_with_env(
        explicit_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config_path = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_VAR).map(PathBuf::from));

        // Tier 1: Defaults
        let mut layers = vec![serde_json::to_value(Config::default())?];

        // Tier 2: Config file. Naming a file that is missing is an error.
        if let Some(ref path) = config_path {
            layers.push(read_yaml(path)?);
        }

        let merged = deep_merge_all(layers);
        let mut config: Config =
            serde_json::from_value(merged).context("invalid configuration values")?;

        // Tier 3: Environment variable overrides
        let mut warnings = Vec::new();
        apply_env_overrides(&mut config, &env, &mut warnings);

        Ok(Self {
            config,
            config_path,
            warnings,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Path of the config file that was merged, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Ignored environment values.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
}

fn apply_env_overrides(
    config: &mut Config,
    env: &impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
) {
    if let Some(value) = env(APP_ENV_VAR) {
        match AppEnv::from_str(&value) {
            Ok(app_env) => config.app_env = app_env,
            Err(e) => warnings.push(format!("{}: {}", APP_ENV_VAR, e)),
        }
    }

    if let Some(host) = env(APP_HOST_VAR).filter(|h| !h.trim().is_empty()) {
        config.server.host = host.trim().to_string();
    }

    if let Some(port) = parse_var(env, APP_PORT_VAR, warnings) {
        config.server.port = port;
    }

    if let Some(timeout) = parse_var(env, APP_REQUEST_TIMEOUT_VAR, warnings) {
        config.server.request_timeout_secs = timeout;
    }

    if let Some(verbosity) = parse_var(env, LOGGING_GLOBAL_VAR, warnings) {
        config.logging.global_verbosity = verbosity;
    }

    if let Some(value) = env(LOGGING_MODULES_VAR) {
        let modules = parse_module_verbosity(&value);
        if modules.is_empty() {
            warnings.push(format!("{}: no valid name=level pairs in {:?}", LOGGING_MODULES_VAR, value));
        }
        config.logging.modules = modules;
    }
}

fn parse_var<T: FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let value = env(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warnings.push(format!("{}: ignoring unparsable value {:?}", key, value));
            None
        }
    }
}

/// Parse `name=level,name=level`. Malformed pairs are skipped.
pub fn parse_module_verbosity(value: &str) -> BTreeMap<String, u8> {
    value
        .split(',')
        .filter_map(|pair| {
            let (name, level) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() || level.contains('=') {
                return None;
            }
            let level = level.trim().parse().ok()?;
            Some((name.to_string(), level))
        })
        .collect()
}
