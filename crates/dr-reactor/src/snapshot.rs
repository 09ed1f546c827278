//! Read-only view of the reactor for observers and drivers.

use serde::{Deserialize, Serialize};

use crate::state::ReactorState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorSnapshot {
    pub tick: u64,
    pub temperature: f64,
    pub shield_charge: f64,
    pub max_shield_charge: f64,
    pub saturation: u64,
    pub max_saturation: u64,
    pub converted_fuel: f64,
    /// Converted plus reactable fuel.
    pub total_fuel: f64,
    pub generation_rate: f64,
    pub field_drain: u64,
    pub fuel_use_rate: f64,
    /// Serialized as the numeric status code; `state_name` carries the name.
    #[serde(with = "status_code")]
    pub state: ReactorState,
    pub state_name: String,
    pub fail_safe: bool,
}

impl ReactorSnapshot {
    /// Saturation as a fraction of capacity, 0 before capacities exist.
    pub fn saturation_fraction(&self) -> f64 {
        if self.max_saturation == 0 {
            0.0
        } else {
            self.saturation as f64 / self.max_saturation as f64
        }
    }

    /// Shield charge as a fraction of capacity, 0 before capacities exist.
    pub fn shield_fraction(&self) -> f64 {
        if self.max_shield_charge <= 0.0 {
            0.0
        } else {
            self.shield_charge / self.max_shield_charge
        }
    }

    pub fn fuel_conversion_fraction(&self) -> f64 {
        if self.total_fuel <= 0.0 {
            0.0
        } else {
            self.converted_fuel / self.total_fuel
        }
    }
}

mod status_code {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::state::ReactorState;

    pub fn serialize<S: Serializer>(state: &ReactorState, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(state.code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ReactorState, D::Error> {
        let code = u8::deserialize(d)?;
        ReactorState::from_code(code)
            .ok_or_else(|| D::Error::custom(format!("unknown status code {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: ReactorState) -> ReactorSnapshot {
        ReactorSnapshot {
            tick: 12,
            temperature: 2100.0,
            shield_charge: 500.0,
            max_shield_charge: 1000.0,
            saturation: 250,
            max_saturation: 1000,
            converted_fuel: 30.0,
            total_fuel: 300.0,
            generation_rate: 0.0,
            field_drain: 0,
            fuel_use_rate: 0.0,
            state,
            state_name: state.name().to_string(),
            fail_safe: false,
        }
    }

    #[test]
    fn state_serializes_as_code_beside_name() {
        let json = serde_json::to_value(snapshot(ReactorState::Running)).unwrap();
        assert_eq!(json["state"], 3);
        assert_eq!(json["state_name"], "RUNNING");

        let back: ReactorSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.state, ReactorState::Running);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let mut json = serde_json::to_value(snapshot(ReactorState::Cold)).unwrap();
        json["state"] = serde_json::json!(42);
        assert!(serde_json::from_value::<ReactorSnapshot>(json).is_err());
    }

    #[test]
    fn fractions() {
        let s = snapshot(ReactorState::Running);
        assert_eq!(s.saturation_fraction(), 0.25);
        assert_eq!(s.shield_fraction(), 0.5);
        assert_eq!(s.fuel_conversion_fraction(), 0.1);

        let empty = ReactorSnapshot {
            max_saturation: 0,
            max_shield_charge: 0.0,
            total_fuel: 0.0,
            ..s
        };
        assert_eq!(empty.saturation_fraction(), 0.0);
        assert_eq!(empty.shield_fraction(), 0.0);
        assert_eq!(empty.fuel_conversion_fraction(), 0.0);
    }
}
