//! Gateway config loader (strict parsing).

pub mod schema;

use std::{fs, io, path::Path};

use tally_core::error::{Result, TallyError};

pub use schema::{CorsSection, GatewayConfig, ServerSection};

/// Environment variable that overrides the config path.
pub const CONFIG_ENV: &str = "TALLY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "tally.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TallyError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Load `path`, or defaults when the file does not exist.
pub fn load_or_default(path: &str) -> Result<GatewayConfig> {
    match fs::read_to_string(Path::new(path)) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(%path, "config file not found; using defaults");
            let cfg = GatewayConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(TallyError::Internal(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| TallyError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
