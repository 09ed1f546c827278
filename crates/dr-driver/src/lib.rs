//! Drivers for the reactor core.
//!
//! This crate sits between a [`dr_reactor::ReactorCore`] and whoever is
//! operating it. It owns the tick loop and the standing energy rates, and it
//! can replay scripted scenarios from YAML.
//!
//! # Architecture
//!
//! - [`Emulator`] wraps one core: inject, tick, extract, report
//! - [`RealtimeDriver`] paces an emulator on a background thread
//! - [`Scenario`] files schedule operator actions against triggers
//! - [`Recorder`] keeps a decimated history of snapshots

pub mod clock;
pub mod config;
pub mod emulator;
pub mod error;
pub mod realtime;
pub mod recorder;
pub mod scenario;

pub use clock::{TickClock, TickRate};
pub use config::DriverConfig;
pub use emulator::{Emulator, StepReport};
pub use error::{DriverError, DriverResult};
pub use realtime::RealtimeDriver;
pub use recorder::Recorder;
pub use scenario::{
    Action, Scenario, ScenarioOutcome, ScheduledAction, Trigger, load_scenario, parse_scenario,
    run_scenario, validate_scenario,
};
