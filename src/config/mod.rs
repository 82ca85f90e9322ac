//! Configuration.
//!
//! Three tiers, merged field-by-field, later tiers winning:
//! 1. **Defaults** - `Config::default()`
//! 2. **File** - YAML from `--config` or `DALIL_CONFIG_PATH`
//! 3. **Environment** - variables below (a `.env` file is read by the binary first)
//!
//! ## Environment Variables
//! - `DALIL_CONFIG_PATH` - Config file path
//! - `APP_ENV` - `local`, `dev`, `nonprod` or `prod`
//! - `APP_HOST` - Listen address
//! - `APP_PORT` - Listen port
//! - `APP_REQUEST_TIMEOUT_SECS` - Per-request timeout
//! - `APP_LOGGING_VERBOSITY_GLOBAL` - Global log verbosity (0 = info, 1 = debug, 2+ = trace)
//! - `APP_LOGGING_VERBOSITY_MODULES` - Per-module verbosity, `name=level,name=level`

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, parse_module_verbosity};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
