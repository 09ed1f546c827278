//! dr-core: shared foundation for the reactor simulator.
//!
//! Contains:
//! - numeric (Real + tolerances + guarded float helpers)
//! - rng (injectable random source + seeded implementation)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod rng;

pub use error::{DrError, DrResult};
pub use numeric::*;
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
