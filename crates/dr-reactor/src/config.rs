//! Reactor tuning knobs.

use dr_core::ensure_non_negative;
use serde::{Deserialize, Serialize};

use crate::error::ReactorResult;

/// Tuning multipliers and the explosion policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Scales the maximum energy generation per tick.
    pub output_multiplier: f64,
    /// Scales the fuel conversion rate.
    pub fuel_usage_multiplier: f64,
    /// Use the short, fixed-window detonation countdown instead of the full
    /// large-explosion delay.
    pub disable_large_reactor_boom: bool,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            output_multiplier: 1.0,
            fuel_usage_multiplier: 1.0,
            disable_large_reactor_boom: true,
        }
    }
}

impl ReactorConfig {
    pub fn with_output_multiplier(mut self, multiplier: f64) -> Self {
        self.output_multiplier = multiplier;
        self
    }

    pub fn with_fuel_usage_multiplier(mut self, multiplier: f64) -> Self {
        self.fuel_usage_multiplier = multiplier;
        self
    }

    pub fn with_large_boom(mut self, enabled: bool) -> Self {
        self.disable_large_reactor_boom = !enabled;
        self
    }

    pub fn validate(&self) -> ReactorResult<()> {
        ensure_non_negative(self.output_multiplier, "output_multiplier")?;
        ensure_non_negative(self.fuel_usage_multiplier, "fuel_usage_multiplier")?;
        Ok(())
    }
}
