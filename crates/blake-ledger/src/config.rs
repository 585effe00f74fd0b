//! Ledger configuration.

use blake_ledger_core::GENESIS_PAYLOAD;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Configuration for a [`Ledger`](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Payload of the genesis block.
    pub genesis_payload: String,
    /// Refuse appends that carry no signature.
    pub reject_unsigned: bool,
    /// Capacity of the snapshot broadcast channel.
    pub broadcast_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_payload: GENESIS_PAYLOAD.to_string(),
            reject_unsigned: false,
            broadcast_capacity: 64,
        }
    }
}

impl LedgerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))?;
        if config.broadcast_capacity == 0 {
            return Err(LedgerError::Config(
                "broadcast_capacity must be greater than zero".into(),
            ));
        }
        Ok(config)
    }

    /// Builder-style toggle for `reject_unsigned`.
    pub fn reject_unsigned(mut self, reject: bool) -> Self {
        self.reject_unsigned = reject;
        self
    }
}
