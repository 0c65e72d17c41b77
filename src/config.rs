//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::Level;

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where notifications are posted.
    pub host: HostCfg,
    /// Where inbound host messages are received.
    pub bridge: BridgeCfg,
    /// File logging; optional in older config files.
    #[serde(default)]
    pub log: LogCfg,
}

/// Outbound host endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCfg {
    /// Base URL; the event name is appended as the last path segment.
    pub endpoint: String,
    /// Capacity of the outbound notification queue.
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    /// Upper bound for a single POST, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Inbound message bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCfg {
    /// TCP address accepting one JSON message per line.
    pub listen_addr: String,
}

/// File logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogCfg {
    /// Log file written next to the working directory.
    pub file: String,
    /// Maximum level: error, warn, info, debug or trace.
    pub level: String,
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            file: "overlay_menu.log".into(),
            level: "info".into(),
        }
    }
}

impl LogCfg {
    /// Parsed level; unknown names fall back to info.
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

fn default_queue_size() -> usize {
    64
}

fn default_request_timeout_ms() -> u64 {
    3000
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

impl Default for Config {
    /// Defaults target a host running on the same machine.
    fn default() -> Self {
        Self {
            host: HostCfg {
                endpoint: "http://127.0.0.1:30120/overlay_menu".into(),
                queue_size: default_queue_size(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            bridge: BridgeCfg {
                listen_addr: "127.0.0.1:30121".into(),
            },
            log: LogCfg::default(),
        }
    }
}
