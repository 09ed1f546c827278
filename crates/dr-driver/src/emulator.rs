//! Tick-by-tick operation of a single reactor.

use dr_core::{RandomSource, SeededRandom};
use dr_reactor::{ReactorCore, ReactorSnapshot};

use crate::config::DriverConfig;
use crate::error::DriverResult;

/// Result of one [`Emulator::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Energy the core accepted from the standing input rate.
    pub accepted: u64,
    /// Energy actually withdrawn by the standing output rate.
    pub extracted: u64,
    pub snapshot: ReactorSnapshot,
}

/// Drives one reactor core with standing input and output energy rates.
///
/// Each step injects the input rate, advances the core one tick, then
/// extracts the output rate.
#[derive(Debug)]
pub struct Emulator<R: RandomSource = SeededRandom> {
    core: ReactorCore<R>,
    config: DriverConfig,
    input_rate: u64,
    output_rate: u64,
}

impl<R: RandomSource> Emulator<R> {
    pub fn new(core: ReactorCore<R>, config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;
        Ok(Self {
            core,
            config,
            input_rate: 0,
            output_rate: 0,
        })
    }

    pub fn core(&self) -> &ReactorCore<R> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ReactorCore<R> {
        &mut self.core
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ReactorSnapshot {
        self.core.snapshot()
    }

    pub fn input_rate(&self) -> u64 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u64 {
        self.output_rate
    }

    /// Energy offered to the core before every tick.
    pub fn set_input_energy(&mut self, per_tick: u64) {
        self.input_rate = per_tick;
    }

    /// Energy requested from the core after every tick.
    pub fn set_output_energy(&mut self, per_tick: u64) {
        self.output_rate = per_tick;
    }

    pub fn add_fuel(&mut self, amount: f64) -> bool {
        self.core.add_fuel(amount)
    }

    pub fn charge_reactor(&mut self) -> bool {
        self.core.charge_reactor()
    }

    pub fn activate_reactor(&mut self) -> bool {
        self.core.activate_reactor()
    }

    pub fn shutdown_reactor(&mut self) -> bool {
        self.core.shutdown_reactor()
    }

    pub fn toggle_fail_safe(&mut self) {
        self.core.toggle_fail_safe()
    }

    /// Reset the core and zero both energy rates.
    pub fn reset(&mut self) {
        self.core.reset();
        self.input_rate = 0;
        self.output_rate = 0;
    }

    pub fn step(&mut self) -> StepReport {
        let tick = self.core.tick();
        let log = tick % self.config.log_interval == 0;

        if log {
            tracing::debug!(tick, requested = self.input_rate, "injecting energy");
        }
        let accepted = self.core.inject_energy(self.input_rate);
        if log {
            tracing::debug!(tick, accepted, "energy injected");
        }

        self.core.advance_one_tick();

        let before = self.core.saturation();
        self.core.extract_energy(self.output_rate);
        let extracted = before - self.core.saturation();
        if log {
            tracing::debug!(tick, requested = self.output_rate, extracted, "energy extracted");
        }

        let snapshot = self.core.snapshot();
        if log {
            tracing::info!(
                tick = snapshot.tick,
                state = %snapshot.state,
                temperature = snapshot.temperature,
                shield = snapshot.shield_charge,
                saturation = snapshot.saturation,
                generation = snapshot.generation_rate,
                field_drain = snapshot.field_drain,
                "reactor state"
            );
        }

        StepReport {
            accepted,
            extracted,
            snapshot,
        }
    }

    /// Run `ticks` steps and return the last report, if any ran.
    pub fn run_for(&mut self, ticks: u64) -> Option<StepReport> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step());
        }
        last
    }

    /// Step until `done` holds, checking before each step. Returns the number
    /// of steps taken, or `None` if `max_ticks` ran out first.
    pub fn run_until<F>(&mut self, mut done: F, max_ticks: u64) -> Option<u64>
    where
        F: FnMut(&ReactorCore<R>) -> bool,
    {
        for taken in 0..=max_ticks {
            if done(&self.core) {
                return Some(taken);
            }
            if taken < max_ticks {
                self.step();
            }
        }
        None
    }
}
