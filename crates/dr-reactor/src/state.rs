//! Operational states of the reactor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReactorError;

/// Operational mode of the reactor core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactorState {
    Invalid,
    #[default]
    Cold,
    WarmingUp,
    Running,
    Stopping,
    Cooling,
    BeyondHope,
    /// Terminal. Nothing happens after detonation.
    Exploded,
}

impl ReactorState {
    pub const ALL: [ReactorState; 8] = [
        ReactorState::Invalid,
        ReactorState::Cold,
        ReactorState::WarmingUp,
        ReactorState::Running,
        ReactorState::Stopping,
        ReactorState::Cooling,
        ReactorState::BeyondHope,
        ReactorState::Exploded,
    ];

    /// Upper-case display name, e.g. `WARMING_UP`.
    pub fn name(self) -> &'static str {
        match self {
            ReactorState::Invalid => "INVALID",
            ReactorState::Cold => "COLD",
            ReactorState::WarmingUp => "WARMING_UP",
            ReactorState::Running => "RUNNING",
            ReactorState::Stopping => "STOPPING",
            ReactorState::Cooling => "COOLING",
            ReactorState::BeyondHope => "BEYOND_HOPE",
            ReactorState::Exploded => "EXPLODED",
        }
    }

    /// Stable numeric status code.
    pub fn code(self) -> u8 {
        match self {
            ReactorState::Invalid => 0,
            ReactorState::Cold => 1,
            ReactorState::WarmingUp => 2,
            ReactorState::Running => 3,
            ReactorState::Stopping => 4,
            ReactorState::Cooling => 5,
            ReactorState::BeyondHope => 6,
            ReactorState::Exploded => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Running or stopping: the states that run the full physics update.
    pub fn is_online(self) -> bool {
        matches!(self, ReactorState::Running | ReactorState::Stopping)
    }

    pub fn is_terminal(self) -> bool {
        self == ReactorState::Exploded
    }
}

impl fmt::Display for ReactorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReactorState {
    type Err = ReactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ReactorState::ALL
            .into_iter()
            .find(|state| state.name() == wanted)
            .ok_or_else(|| ReactorError::UnknownState { name: s.to_string() })
    }
}
