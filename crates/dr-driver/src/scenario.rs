//! Scripted operator sessions.
//!
//! A scenario fuels a reactor, then fires actions when their triggers first
//! hold. Each action fires at most once. Triggers are checked before every
//! step in file order, against the live core, so an action can enable the
//! trigger of the next one within the same tick.

use std::path::Path;

use dr_core::{SeededRandom, ensure_finite, ensure_non_negative};
use dr_reactor::{ReactorConfig, ReactorCore, ReactorSnapshot, ReactorState, TracingObserver};
use serde::{Deserialize, Serialize};

use crate::config::DriverConfig;
use crate::emulator::Emulator;
use crate::error::{DriverError, DriverResult};
use crate::recorder::Recorder;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,
    /// Random seed. Omitted means a fresh seed from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Tick budget.
    pub ticks: u64,
    /// Fuel loaded before the first tick.
    #[serde(default)]
    pub fuel: f64,
    #[serde(default)]
    pub reactor: ReactorConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub actions: Vec<ScheduledAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledAction {
    pub when: Trigger,
    #[serde(rename = "do")]
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    AtTick { tick: u64 },
    CanActivate,
    StateIs { state: ReactorState },
    TemperatureAtLeast { value: f64 },
}

impl Trigger {
    pub fn is_met<R: dr_core::RandomSource>(&self, core: &ReactorCore<R>) -> bool {
        match self {
            Trigger::AtTick { tick } => core.tick() >= *tick,
            Trigger::CanActivate => core.can_activate(),
            Trigger::StateIs { state } => core.state() == *state,
            Trigger::TemperatureAtLeast { value } => core.temperature() >= *value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    AddFuel { amount: f64 },
    Charge,
    Activate,
    Shutdown,
    ToggleFailSafe,
    SetInput { rate: u64 },
    SetOutput { rate: u64 },
    /// End the run before the next step.
    Stop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOutcome {
    pub name: String,
    pub ticks_run: u64,
    pub exploded: bool,
    pub stopped_early: bool,
    pub final_snapshot: ReactorSnapshot,
    pub records: Vec<ReactorSnapshot>,
}

pub fn parse_scenario(yaml: &str) -> DriverResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(yaml)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn load_scenario(path: &Path) -> DriverResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| DriverError::ScenarioRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_scenario(&content)
}

pub fn validate_scenario(scenario: &Scenario) -> DriverResult<()> {
    if scenario.name.trim().is_empty() {
        return Err(DriverError::InvalidScenario {
            what: "name must not be empty".to_string(),
        });
    }
    if scenario.ticks == 0 {
        return Err(DriverError::InvalidScenario {
            what: "ticks must be positive".to_string(),
        });
    }
    ensure_non_negative(scenario.fuel, "fuel")?;
    scenario.reactor.validate()?;
    scenario.driver.validate()?;

    for (i, scheduled) in scenario.actions.iter().enumerate() {
        if let Trigger::TemperatureAtLeast { value } = scheduled.when {
            ensure_finite(value, "temperature trigger")?;
        }
        if let Action::AddFuel { amount } = scheduled.action {
            ensure_non_negative(amount, "add_fuel amount").map_err(|e| {
                DriverError::InvalidScenario {
                    what: format!("action {i}: {e}"),
                }
            })?;
        }
    }
    Ok(())
}

/// Run a scenario to completion with a fresh core.
pub fn run_scenario(scenario: &Scenario) -> DriverResult<ScenarioOutcome> {
    validate_scenario(scenario)?;

    let rng = match scenario.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    let core = ReactorCore::new(scenario.reactor.clone(), rng)?.with_observer(TracingObserver);
    let mut emu = Emulator::new(core, scenario.driver.clone())?;

    tracing::info!(scenario = %scenario.name, ticks = scenario.ticks, "running scenario");
    if scenario.fuel > 0.0 {
        emu.add_fuel(scenario.fuel);
    }

    let mut fired = vec![false; scenario.actions.len()];
    let mut recorder = Recorder::new(scenario.driver.record_every, emu.snapshot());
    let mut stopped_early = false;

    while emu.core().tick() < scenario.ticks {
        for (scheduled, done) in scenario.actions.iter().zip(fired.iter_mut()) {
            if *done || !scheduled.when.is_met(emu.core()) {
                continue;
            }
            *done = true;
            stopped_early |= apply(&mut emu, &scheduled.action);
        }
        if stopped_early {
            break;
        }

        let report = emu.step();
        recorder.push(report.snapshot);
        if emu.core().state().is_terminal() {
            break;
        }
    }

    let final_snapshot = emu.snapshot();
    let exploded = final_snapshot.state == ReactorState::Exploded;
    tracing::info!(
        scenario = %scenario.name,
        ticks = final_snapshot.tick,
        state = %final_snapshot.state,
        "scenario finished"
    );

    Ok(ScenarioOutcome {
        name: scenario.name.clone(),
        ticks_run: final_snapshot.tick,
        exploded,
        stopped_early,
        records: recorder.finish(final_snapshot.clone()),
        final_snapshot,
    })
}

/// Returns true when the action ends the run.
fn apply<R: dr_core::RandomSource>(emu: &mut Emulator<R>, action: &Action) -> bool {
    match action {
        Action::AddFuel { amount } => {
            emu.add_fuel(*amount);
        }
        Action::Charge => {
            emu.charge_reactor();
        }
        Action::Activate => {
            emu.activate_reactor();
        }
        Action::Shutdown => {
            emu.shutdown_reactor();
        }
        Action::ToggleFailSafe => emu.toggle_fail_safe(),
        Action::SetInput { rate } => emu.set_input_energy(*rate),
        Action::SetOutput { rate } => emu.set_output_energy(*rate),
        Action::Stop => return true,
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: minimal
seed: 1
ticks: 10
"#;

    #[test]
    fn minimal_scenario_uses_defaults() {
        let scenario = parse_scenario(MINIMAL).unwrap();
        assert_eq!(scenario.fuel, 0.0);
        assert_eq!(scenario.reactor, ReactorConfig::default());
        assert_eq!(scenario.driver, DriverConfig::default());
        assert!(scenario.actions.is_empty());
    }

    #[test]
    fn actions_parse_with_tags() {
        let yaml = r#"
name: tagged
ticks: 5
actions:
  - when: { type: at_tick, tick: 0 }
    do: { type: set_input, rate: 1000 }
  - when: { type: state_is, state: WARMING_UP }
    do: { type: shutdown }
  - when: { type: temperature_at_least, value: 1500.0 }
    do: { type: stop }
"#;
        let scenario = parse_scenario(yaml).unwrap();
        assert_eq!(
            scenario.actions[0].action,
            Action::SetInput { rate: 1000 }
        );
        assert_eq!(
            scenario.actions[1].when,
            Trigger::StateIs {
                state: ReactorState::WarmingUp
            }
        );
        assert_eq!(scenario.actions[2].action, Action::Stop);
    }

    #[test]
    fn rejects_bad_scenarios() {
        assert!(parse_scenario("name: x\nticks: 0\n").is_err());
        assert!(parse_scenario("name: ''\nticks: 3\n").is_err());
        assert!(parse_scenario("name: x\nticks: 3\nfuel: -1\n").is_err());
        assert!(parse_scenario("name: x\nticks: 3\nreactor: { output_multiplier: -1 }\n").is_err());
        assert!(matches!(
            parse_scenario("name: x\nticks: [1]\n"),
            Err(DriverError::Yaml(_))
        ));
        let bad_fuel = r#"
name: x
ticks: 3
actions:
  - when: { type: at_tick, tick: 1 }
    do: { type: add_fuel, amount: -5 }
"#;
        assert!(matches!(
            parse_scenario(bad_fuel),
            Err(DriverError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn stop_action_ends_run() {
        let yaml = r#"
name: stopper
seed: 3
ticks: 100
actions:
  - when: { type: at_tick, tick: 4 }
    do: { type: stop }
"#;
        let outcome = run_scenario(&parse_scenario(yaml).unwrap()).unwrap();
        assert!(outcome.stopped_early);
        assert_eq!(outcome.ticks_run, 4);
        assert!(!outcome.exploded);
    }
}
