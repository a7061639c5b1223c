//! Ledger configuration via `agriledger.toml`
//!
//! A default `agriledger.toml` can be written next to the caller's data; to
//! change settings, edit the file and reopen the ledger.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use agri_core::TxTimestamp;

use crate::error::{LedgerError, LedgerResult};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "agriledger.toml";

/// Reference ledger configuration loaded from `agriledger.toml`.
///
/// # Example
///
/// ```toml
/// channel = "agrichannel"
/// genesis_time = "2024-01-01T00:00:00Z"
/// block_interval_ms = 2000
/// history_enabled = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Channel name, mixed into every transaction id
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Timestamp of the first transaction (RFC 3339)
    #[serde(default = "default_genesis_time")]
    pub genesis_time: String,
    /// Clock advance between consecutive transactions
    #[serde(default = "default_block_interval_ms")]
    pub block_interval_ms: u64,
    /// Keep per-key commit history
    #[serde(default = "default_history_enabled")]
    pub history_enabled: bool,
}

fn default_channel() -> String {
    "agrichannel".to_string()
}

fn default_genesis_time() -> String {
    "2024-01-01T00:00:00Z".to_string()
}

fn default_block_interval_ms() -> u64 {
    2000
}

fn default_history_enabled() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            genesis_time: default_genesis_time(),
            block_interval_ms: default_block_interval_ms(),
            history_enabled: default_history_enabled(),
        }
    }
}

impl LedgerConfig {
    /// Parse `genesis_time`.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not an RFC 3339 instant.
    pub fn genesis(&self) -> LedgerResult<TxTimestamp> {
        TxTimestamp::parse_rfc3339(&self.genesis_time).map_err(|e| LedgerError::Config {
            reason: format!("invalid genesis_time in {}: {}", CONFIG_FILE_NAME, e),
        })
    }

    /// Clock advance between transactions
    pub fn block_interval(&self) -> Duration {
        Duration::from_millis(self.block_interval_ms)
    }

    /// Check every field eagerly.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.channel.trim().is_empty() {
            return Err(LedgerError::Config {
                reason: format!("channel must not be empty in {}", CONFIG_FILE_NAME),
            });
        }
        if self.block_interval_ms == 0 {
            return Err(LedgerError::Config {
                reason: "block_interval_ms must be positive; transaction timestamps would collide"
                    .to_string(),
            });
        }
        self.genesis()?;
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# AgriLedger reference ledger configuration
#
# Channel name; part of every transaction id.
channel = "agrichannel"

# Timestamp assigned to the first transaction (RFC 3339).
genesis_time = "2024-01-01T00:00:00Z"

# Clock advance between consecutive transactions, in milliseconds.
block_interval_ms = 2000

# Keep per-key commit history (disable to mimic a peer without a history database).
history_enabled = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LedgerError::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        let config: LedgerConfig = toml::from_str(&content).map_err(|e| LedgerError::Config {
            reason: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> LedgerResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| LedgerError::Config {
                reason: format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> LedgerResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| LedgerError::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| LedgerError::Config {
            reason: format!("Failed to write config file '{}': {}", path.display(), e),
        })
    }
}
