//! Driver settings.

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, DriverResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Tick rate for real-time runs.
    pub ticks_per_second: f64,
    /// Emit the per-tick log lines every N ticks.
    pub log_interval: u64,
    /// Record every N-th snapshot (decimation).
    pub record_every: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 20.0,
            log_interval: 1,
            record_every: 1,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> DriverResult<()> {
        if !(self.ticks_per_second.is_finite() && self.ticks_per_second > 0.0) {
            return Err(DriverError::InvalidConfig {
                what: "ticks_per_second must be positive",
            });
        }
        if self.log_interval == 0 {
            return Err(DriverError::InvalidConfig {
                what: "log_interval must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(DriverError::InvalidConfig {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}
