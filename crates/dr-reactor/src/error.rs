//! Error types for reactor construction.
//!
//! Ticks, commands and energy transfers never fail; only configuration does.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactorError {
    #[error("Invalid reactor configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Unknown reactor state: {name}")]
    UnknownState { name: String },
}

pub type ReactorResult<T> = Result<T, ReactorError>;

impl From<dr_core::DrError> for ReactorError {
    fn from(e: dr_core::DrError) -> Self {
        ReactorError::InvalidConfig {
            what: e.to_string(),
        }
    }
}
