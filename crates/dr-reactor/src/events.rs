//! Transition and diagnostic events emitted by the engine.
//!
//! The engine does no logging of its own. It reports what happened to an
//! optional [`ReactorObserver`]; [`TracingObserver`] forwards to `tracing`.

use std::fmt;

use crate::state::ReactorState;

/// Operator commands accepted by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Charge,
    Activate,
    Shutdown,
    AddFuel,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Command::Charge => "charge",
            Command::Activate => "activate",
            Command::Shutdown => "shutdown",
            Command::AddFuel => "add fuel",
        };
        f.write_str(s)
    }
}

/// Why a state change happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionCause {
    Command(Command),
    FailSafe,
    /// Temperature crossed a cooldown threshold.
    CooledDown,
    ContainmentFailure,
    Detonation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReactorEvent {
    Transition {
        tick: u64,
        from: ReactorState,
        to: ReactorState,
        cause: TransitionCause,
    },
    CommandRejected {
        tick: u64,
        command: Command,
        state: ReactorState,
    },
    FailSafeToggled {
        tick: u64,
        enabled: bool,
    },
    FuelAdded {
        tick: u64,
        amount: f64,
        reactable_fuel: f64,
    },
}

/// Receives engine events. Called synchronously from inside engine methods.
pub trait ReactorObserver {
    fn on_event(&mut self, event: &ReactorEvent);
}

impl<F> ReactorObserver for F
where
    F: FnMut(&ReactorEvent),
{
    fn on_event(&mut self, event: &ReactorEvent) {
        self(event)
    }
}

/// Forwards events to `tracing` under the `reactor` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ReactorObserver for TracingObserver {
    fn on_event(&mut self, event: &ReactorEvent) {
        match event {
            ReactorEvent::Transition {
                tick,
                from,
                to: ReactorState::Exploded,
                ..
            } => {
                tracing::error!(target: "reactor", tick, %from, "reactor detonated");
            }
            ReactorEvent::Transition {
                tick,
                from,
                to: ReactorState::BeyondHope,
                ..
            } => {
                tracing::error!(target: "reactor", tick, %from, "containment field failed");
            }
            ReactorEvent::Transition {
                tick,
                from,
                to,
                cause,
            } => {
                tracing::info!(target: "reactor", tick, %from, %to, ?cause, "state transition");
            }
            ReactorEvent::CommandRejected {
                tick,
                command,
                state,
            } => {
                tracing::warn!(target: "reactor", tick, %state, "cannot {command}");
            }
            ReactorEvent::FailSafeToggled { tick, enabled } => {
                tracing::info!(target: "reactor", tick, enabled, "fail-safe toggled");
            }
            ReactorEvent::FuelAdded {
                tick,
                amount,
                reactable_fuel,
            } => {
                tracing::info!(target: "reactor", tick, amount, reactable_fuel, "fuel added");
            }
        }
    }
}
