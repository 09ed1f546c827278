//! Constants and pure per-tick formulas.
//!
//! Nothing in here touches reactor state; [`crate::ReactorCore`] feeds values
//! in and applies the results in a fixed order.

use dr_core::{INT32_MAX, Real, ratio_or, trunc_u64};
use serde::{Deserialize, Serialize};

pub const MAX_TEMPERATURE: Real = 10_000.0;

/// Minimum total fuel before the core accepts a charge command.
pub const MIN_CHARGE_FUEL: Real = 144.0;

/// Capacity per unit of fuel. Shield capacity is 100x, saturation 1000x.
pub const CAPACITY_PER_FUEL: Real = 96.450_617_283_950_62;

pub const ACTIVATION_TEMPERATURE: Real = 2000.0;
/// STOPPING hands over to COOLING at or below this inside the physics update.
pub const COOLDOWN_HANDOVER_TEMPERATURE: Real = 2001.0;
pub const WARMUP_TEMPERATURE_CAP: Real = 2500.0;
pub const FAIL_SAFE_TEMPERATURE: Real = 2500.0;
pub const FAIL_SAFE_SATURATION: Real = 0.99;
pub const COLD_TEMPERATURE: Real = 100.0;
pub const AMBIENT_TEMPERATURE: Real = 20.0;
/// Per-tick temperature drop while offline.
pub const OFFLINE_COOLING_RATE: Real = 0.5;

/// Where the temperature settles at 100% saturation.
const TEMP_OFFSET: Real = 444.7;
/// Smaller value means stronger field drain.
const FIELD_DRAIN_DIVISOR: Real = 10.923_556;
const BASE_FUEL_USAGE: Real = 0.001;

/// Shield absorption starts to fade above this temperature...
pub const SHIELD_THROTTLE_START: Real = 15_000.0;
/// ...and is gone entirely this far past the start.
pub const SHIELD_THROTTLE_SPAN: Real = 10_000.0;

/// Per-tick decay fractions while offline, scaled by a uniform random draw.
pub const OFFLINE_SHIELD_DECAY: Real = 0.0005;
pub const OFFLINE_SATURATION_DECAY: Real = 0.000_002;

/// Rates derived during the most recent tick.
///
/// These are outputs, not state: every online tick overwrites them and every
/// other tick resets them to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickRates {
    pub temp_drain_factor: Real,
    pub generation_rate: Real,
    pub field_drain: u64,
    /// Energy per tick needed to hold the shield steady. Infinite when the
    /// shield is already full and draining.
    pub field_input_rate: Real,
    pub fuel_use_rate: Real,
}

/// Shield capacity for a fuel load.
pub fn max_shield_for(total_fuel: Real) -> Real {
    total_fuel * CAPACITY_PER_FUEL * 100.0
}

/// Saturation capacity for a fuel load.
pub fn max_saturation_for(total_fuel: Real) -> u64 {
    trunc_u64(total_fuel * CAPACITY_PER_FUEL * 1000.0)
}

/// Conversion level in `[-0.3, 1.0]`. Zero total fuel counts as nothing converted.
pub fn conversion_level(converted: Real, total: Real) -> Real {
    ratio_or(converted, total, 0.0) * 1.3 - 0.3
}

/// Temperature change per tick, before the x10 scale applied by the caller.
pub fn temperature_rise(core_sat: Real, temperature: Real, conversion: Real) -> Real {
    let neg_csat = (1.0 - core_sat) * 99.0;
    let temp50 = ((temperature / MAX_TEMPERATURE) * 50.0).min(99.0);

    let rise_expo = neg_csat.powi(3) / (100.0 - neg_csat) + TEMP_OFFSET;
    let rise_resist = temp50.powi(4) / (100.0 - temp50);

    (rise_expo - rise_resist * (1.0 - conversion) + conversion * 1000.0) / 10_000.0
}

/// Base maximum generation per tick, before the conversion boost.
pub fn base_max_rft(max_saturation: u64, output_multiplier: Real) -> u64 {
    trunc_u64((max_saturation as Real / 1000.0) * output_multiplier * 1.5)
}

/// Maximum generation per tick including the conversion boost.
pub fn max_rft(base_max_rft: u64, conversion: Real) -> u64 {
    trunc_u64(base_max_rft as Real * (1.0 + conversion * 2.0))
}

/// Shield drain multiplier, piecewise in temperature.
pub fn temp_drain_factor(temperature: Real) -> Real {
    if temperature > 8000.0 {
        1.0 + (temperature - 8000.0).powi(2) * 0.000_002_5
    } else if temperature > 2000.0 {
        1.0
    } else if temperature > 1000.0 {
        (temperature - 1000.0) / 1000.0
    } else {
        0.0
    }
}

/// Shield drain this tick, clamped to the 32-bit integer range.
pub fn field_drain(drain_factor: Real, core_sat: Real, base_max_rft: u64) -> u64 {
    let scale = base_max_rft as Real / FIELD_DRAIN_DIVISOR;
    let raw = drain_factor * (1.0 - core_sat).max(0.01) * scale;
    trunc_u64(raw.min(INT32_MAX))
}

/// Input needed to hold the shield level against `drain`.
pub fn field_input_rate(drain: u64, shield: Real, max_shield: Real) -> Real {
    let neg_percent = 1.0 - ratio_or(shield, max_shield, 1.0);
    if neg_percent > 0.0 {
        drain as Real / neg_percent
    } else if drain == 0 {
        0.0
    } else {
        Real::INFINITY
    }
}

pub fn fuel_use_rate(drain_factor: Real, core_sat: Real, fuel_usage_multiplier: Real) -> Real {
    drain_factor * (1.0 - core_sat) * (BASE_FUEL_USAGE * fuel_usage_multiplier)
}

/// Fraction of an injection the shield may absorb at this temperature.
pub fn shield_throttle(temperature: Real) -> Real {
    if temperature > SHIELD_THROTTLE_START {
        1.0 - ((temperature - SHIELD_THROTTLE_START) / SHIELD_THROTTLE_SPAN).min(1.0)
    } else {
        1.0
    }
}

/// Visual core diameter. Grows with fuel and with temperature.
pub fn core_diameter(total_fuel: Real, temperature: Real) -> Real {
    let volume = total_fuel / 1296.0 * (1.0 + (temperature / MAX_TEMPERATURE) * 10.0);
    let sphere = 4.0 / 3.0 * std::f64::consts::PI;
    ((volume / sphere).cbrt() * 2.0).max(0.5)
}
