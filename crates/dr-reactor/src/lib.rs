//! Reactor core simulation engine.
//!
//! Provides:
//! - the operational state machine (cold, warm-up, running, shutdown, failure)
//! - the per-tick physics update (temperature, shield, saturation, fuel)
//! - the inject/extract energy contract used by drivers between ticks
//! - an observer hook for transitions and rejected commands
//!
//! The engine is single threaded and never blocks. Callers that share a core
//! across threads must serialize access themselves.

pub mod config;
pub mod error;
pub mod events;
pub mod physics;
pub mod reactor;
pub mod snapshot;
pub mod state;

pub use config::ReactorConfig;
pub use error::{ReactorError, ReactorResult};
pub use events::{Command, ReactorEvent, ReactorObserver, TracingObserver, TransitionCause};
pub use physics::TickRates;
pub use reactor::ReactorCore;
pub use snapshot::ReactorSnapshot;
pub use state::ReactorState;
