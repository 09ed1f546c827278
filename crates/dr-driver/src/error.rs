//! Error types for the driver layer.

use std::path::PathBuf;

use dr_reactor::ReactorError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Invalid driver configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Invalid scenario: {what}")]
    InvalidScenario { what: String },

    #[error("Failed to read scenario file: {path}")]
    ScenarioRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Reactor error: {0}")]
    Reactor(#[from] ReactorError),

    #[error("Driver thread failed: {what}")]
    Thread { what: &'static str },
}

pub type DriverResult<T> = Result<T, DriverError>;

impl From<dr_core::DrError> for DriverError {
    fn from(e: dr_core::DrError) -> Self {
        DriverError::InvalidScenario {
            what: e.to_string(),
        }
    }
}
