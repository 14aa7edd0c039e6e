// src/config/service.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::warn;

use crate::dataset::DEFAULT_DATASET_PATH;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SERVICE_CONFIG_PATH: &str = "config/service.toml";

pub const ENV_SERVICE_CONFIG_PATH: &str = "SERVICE_CONFIG_PATH";
pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";
pub const ENV_DATASET_PATH: &str = "DATASET_PATH";
pub const ENV_STRICT_DATASET: &str = "STRICT_DATASET";
pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_dataset_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_PATH)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Abort startup on the first invalid listing instead of skipping it.
    #[serde(default)]
    pub strict_dataset: bool,
    /// Expose `/metrics`.
    #[serde(default)]
    pub debug_routes: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            dataset_path: default_dataset_path(),
            strict_dataset: false,
            debug_routes: false,
        }
    }
}

impl ServiceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading service config from {}", path.display()))?;
        let cfg: ServiceConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    /// Resolve configuration:
    /// 1) $SERVICE_CONFIG_PATH (must exist if set)
    /// 2) config/service.toml if present
    /// 3) built-in defaults
    ///
    /// then apply env overrides (PORT, HOST, DATASET_PATH, STRICT_DATASET, DEBUG_ROUTES).
    pub fn from_env() -> Result<Self> {
        let mut cfg = match env::var(ENV_SERVICE_CONFIG_PATH) {
            Ok(p) => Self::load_from_file(&p)?,
            Err(_) => {
                let p = Path::new(DEFAULT_SERVICE_CONFIG_PATH);
                if p.exists() {
                    Self::load_from_file(p)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(raw) = env_nonempty(ENV_PORT) {
            match raw.parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => warn!(value = %raw, fallback = self.port, "ignoring unparsable PORT"),
            }
        }
        if let Some(raw) = env_nonempty(ENV_HOST) {
            match raw.parse::<IpAddr>() {
                Ok(h) => self.host = h,
                Err(_) => warn!(value = %raw, "ignoring unparsable HOST"),
            }
        }
        if let Some(raw) = env_nonempty(ENV_DATASET_PATH) {
            self.dataset_path = PathBuf::from(raw);
        }
        if let Some(b) = env_flag(ENV_STRICT_DATASET) {
            self.strict_dataset = b;
        }
        if let Some(b) = env_flag(ENV_DEBUG_ROUTES) {
            self.debug_routes = b;
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> Option<bool> {
    match env_nonempty(key)?.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
