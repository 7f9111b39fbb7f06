//! Service config loader (strict parsing).
//!
//! Without a config file every setting has a default; the `PORT` environment
//! variable always wins over the configured port.

pub mod schema;

use std::{env, fs};

use notekeeper_core::error::{NotesError, Result};

pub use schema::{LoggingSection, ServerSection, ServiceConfig};

/// Path of an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "NOTEKEEPER_CONFIG";
/// Listening port override.
pub const PORT_ENV: &str = "PORT";

/// Resolve the effective config from the environment.
pub fn load() -> Result<ServiceConfig> {
    let mut cfg = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) => ServiceConfig::default(),
    };
    apply_port_override(&mut cfg, env::var(PORT_ENV).ok().as_deref())?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| NotesError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| NotesError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply a `PORT` value. Unset or blank leaves the config untouched.
pub fn apply_port_override(cfg: &mut ServiceConfig, value: Option<&str>) -> Result<()> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    cfg.server.port = raw
        .parse()
        .map_err(|_| NotesError::BadRequest(format!("{PORT_ENV} must be a port number, got {raw:?}")))?;
    Ok(())
}
