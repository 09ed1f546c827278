//! The reactor core: state machine, per-tick physics and energy contract.

use std::fmt;

use dr_core::{RandomSource, SeededRandom, ratio_or, trunc_u64};

use crate::config::ReactorConfig;
use crate::error::ReactorResult;
use crate::events::{Command, ReactorEvent, ReactorObserver, TransitionCause};
use crate::physics::{
    self, ACTIVATION_TEMPERATURE, AMBIENT_TEMPERATURE, COLD_TEMPERATURE,
    COOLDOWN_HANDOVER_TEMPERATURE, FAIL_SAFE_SATURATION, FAIL_SAFE_TEMPERATURE, MIN_CHARGE_FUEL,
    OFFLINE_COOLING_RATE, OFFLINE_SATURATION_DECAY, OFFLINE_SHIELD_DECAY, TickRates,
    WARMUP_TEMPERATURE_CAP,
};
use crate::snapshot::ReactorSnapshot;
use crate::state::ReactorState;

/// Base detonation delay in ticks once the countdown is armed.
const EXPLOSION_DELAY: i64 = 1200;
/// Upper bound of the random extra delay.
const EXPLOSION_JITTER: i64 = 2400;

/// Everything that `reset` returns to its initial value.
#[derive(Clone, Debug, Default)]
struct CoreVars {
    tick: u64,
    state: ReactorState,
    reactable_fuel: f64,
    converted_fuel: f64,
    temperature: f64,
    shield_charge: f64,
    max_shield_charge: f64,
    saturation: u64,
    max_saturation: u64,
    rates: TickRates,
    startup_initialized: bool,
    fail_safe: bool,
    explosion_countdown: Option<i64>,
    min_explosion_delay: i64,
}

/// A single simulated reactor.
///
/// Driven one tick at a time through [`ReactorCore::advance_one_tick`]. Energy
/// is exchanged between ticks with [`ReactorCore::inject_energy`] and
/// [`ReactorCore::extract_energy`]. Commands that are not allowed in the
/// current state are ignored and reported to the observer.
pub struct ReactorCore<R: RandomSource = SeededRandom> {
    config: ReactorConfig,
    rng: R,
    observer: Option<Box<dyn ReactorObserver + Send>>,
    v: CoreVars,
}

impl ReactorCore<SeededRandom> {
    /// Core backed by a [`SeededRandom`].
    pub fn seeded(config: ReactorConfig, seed: u64) -> ReactorResult<Self> {
        Self::new(config, SeededRandom::new(seed))
    }
}

impl<R: RandomSource> ReactorCore<R> {
    pub fn new(config: ReactorConfig, rng: R) -> ReactorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            observer: None,
            v: CoreVars::default(),
        })
    }

    pub fn with_observer(mut self, observer: impl ReactorObserver + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn ReactorObserver + Send>>) {
        self.observer = observer;
    }

    // ---- accessors ----

    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.v.tick
    }

    pub fn state(&self) -> ReactorState {
        self.v.state
    }

    pub fn temperature(&self) -> f64 {
        self.v.temperature
    }

    pub fn shield_charge(&self) -> f64 {
        self.v.shield_charge
    }

    pub fn max_shield_charge(&self) -> f64 {
        self.v.max_shield_charge
    }

    pub fn saturation(&self) -> u64 {
        self.v.saturation
    }

    pub fn max_saturation(&self) -> u64 {
        self.v.max_saturation
    }

    pub fn reactable_fuel(&self) -> f64 {
        self.v.reactable_fuel
    }

    pub fn converted_fuel(&self) -> f64 {
        self.v.converted_fuel
    }

    pub fn total_fuel(&self) -> f64 {
        self.v.converted_fuel + self.v.reactable_fuel
    }

    pub fn is_startup_initialized(&self) -> bool {
        self.v.startup_initialized
    }

    pub fn fail_safe_enabled(&self) -> bool {
        self.v.fail_safe
    }

    /// Ticks left before detonation, once armed.
    pub fn explosion_countdown(&self) -> Option<i64> {
        self.v.explosion_countdown
    }

    /// Rates produced by the most recent tick.
    pub fn last_rates(&self) -> TickRates {
        self.v.rates
    }

    pub fn core_diameter(&self) -> f64 {
        physics::core_diameter(self.total_fuel(), self.v.temperature)
    }

    pub fn snapshot(&self) -> ReactorSnapshot {
        ReactorSnapshot {
            tick: self.v.tick,
            temperature: self.v.temperature,
            shield_charge: self.v.shield_charge,
            max_shield_charge: self.v.max_shield_charge,
            saturation: self.v.saturation,
            max_saturation: self.v.max_saturation,
            converted_fuel: self.v.converted_fuel,
            total_fuel: self.total_fuel(),
            generation_rate: self.v.rates.generation_rate,
            field_drain: self.v.rates.field_drain,
            fuel_use_rate: self.v.rates.fuel_use_rate,
            state: self.v.state,
            state_name: self.v.state.name().to_string(),
            fail_safe: self.v.fail_safe,
        }
    }

    // ---- guards ----

    pub fn can_charge(&self) -> bool {
        matches!(self.v.state, ReactorState::Cold | ReactorState::Cooling)
            && self.total_fuel() >= MIN_CHARGE_FUEL
    }

    pub fn can_activate(&self) -> bool {
        let state = self.v.state;
        if !matches!(state, ReactorState::WarmingUp | ReactorState::Stopping) {
            return false;
        }
        if self.v.temperature < ACTIVATION_TEMPERATURE {
            return false;
        }
        state == ReactorState::Stopping
            || (self.v.saturation >= self.v.max_saturation / 2
                && self.v.shield_charge >= (self.v.max_shield_charge / 2.0).floor())
    }

    pub fn can_stop(&self) -> bool {
        matches!(self.v.state, ReactorState::Running | ReactorState::WarmingUp)
    }

    // ---- commands ----

    /// COLD/COOLING to WARMING_UP. Returns whether the command was accepted.
    pub fn charge_reactor(&mut self) -> bool {
        self.guarded(Command::Charge, Self::can_charge, ReactorState::WarmingUp)
    }

    /// WARMING_UP/STOPPING to RUNNING.
    pub fn activate_reactor(&mut self) -> bool {
        self.guarded(Command::Activate, Self::can_activate, ReactorState::Running)
    }

    /// RUNNING/WARMING_UP to STOPPING.
    pub fn shutdown_reactor(&mut self) -> bool {
        self.guarded(Command::Shutdown, Self::can_stop, ReactorState::Stopping)
    }

    pub fn toggle_fail_safe(&mut self) {
        self.v.fail_safe = !self.v.fail_safe;
        self.emit(ReactorEvent::FailSafeToggled {
            tick: self.v.tick,
            enabled: self.v.fail_safe,
        });
    }

    /// Add reactable fuel. Only allowed before capacities are fixed.
    pub fn add_fuel(&mut self, amount: f64) -> bool {
        if self.v.startup_initialized || !amount.is_finite() || amount < 0.0 {
            self.reject(Command::AddFuel);
            return false;
        }
        self.v.reactable_fuel += amount;
        self.emit(ReactorEvent::FuelAdded {
            tick: self.v.tick,
            amount,
            reactable_fuel: self.v.reactable_fuel,
        });
        true
    }

    /// Back to a freshly built cold core. Config and observer are kept; the
    /// random source is reseeded.
    pub fn reset(&mut self) {
        self.v = CoreVars::default();
        self.rng.reseed();
    }

    // ---- energy contract ----

    /// Offer `amount` energy to the core and return how much it accepted.
    ///
    /// During warm-up a single call feeds exactly one bucket: the shield up to
    /// half, then saturation up to half, then temperature. While online the
    /// shield absorbs a share of the input but the whole amount is reported
    /// as accepted.
    pub fn inject_energy(&mut self, amount: u64) -> u64 {
        match self.v.state {
            ReactorState::WarmingUp => self.inject_warmup(amount),
            ReactorState::Running | ReactorState::Stopping => {
                self.inject_online(amount);
                amount
            }
            _ => 0,
        }
    }

    /// Withdraw up to `amount` stored energy. Only works while running.
    pub fn extract_energy(&mut self, amount: u64) {
        if self.v.state == ReactorState::Running {
            let sent = amount.min(self.v.saturation);
            self.v.saturation -= sent;
        }
    }

    // ---- tick ----

    /// Run the state machine once. The tick counter always advances, even
    /// after detonation.
    pub fn advance_one_tick(&mut self) {
        self.v.rates = TickRates::default();

        match self.v.state {
            ReactorState::Invalid | ReactorState::Cold => self.update_offline(),
            ReactorState::WarmingUp => self.initialize_startup(),
            ReactorState::Running => {
                self.update_online();
                if self.v.state == ReactorState::Running && self.fail_safe_tripped() {
                    self.transition(ReactorState::Stopping, TransitionCause::FailSafe);
                }
            }
            ReactorState::Stopping => {
                self.update_online();
                if self.v.state == ReactorState::Stopping
                    && self.v.temperature <= ACTIVATION_TEMPERATURE
                {
                    self.transition(ReactorState::Cooling, TransitionCause::CooledDown);
                }
            }
            ReactorState::Cooling => {
                self.update_offline();
                if self.v.temperature <= COLD_TEMPERATURE {
                    self.transition(ReactorState::Cold, TransitionCause::CooledDown);
                }
            }
            ReactorState::BeyondHope => self.update_critical(),
            ReactorState::Exploded => {}
        }

        self.v.tick += 1;
    }

    /// Saturation fraction; an uninitialized core counts as full.
    fn core_saturation(&self) -> f64 {
        ratio_or(
            self.v.saturation as f64,
            self.v.max_saturation as f64,
            1.0,
        )
    }

    fn fail_safe_tripped(&self) -> bool {
        self.v.fail_safe
            && self.v.temperature < FAIL_SAFE_TEMPERATURE
            && self.core_saturation() >= FAIL_SAFE_SATURATION
    }

    /// Drift back to ambient and bleed off what is left in the shield and core.
    fn update_offline(&mut self) {
        if self.v.temperature > AMBIENT_TEMPERATURE {
            self.v.temperature -= OFFLINE_COOLING_RATE;
        }

        if self.v.shield_charge > 0.0 {
            let decay = self.v.max_shield_charge * OFFLINE_SHIELD_DECAY * self.rng.uniform_unit();
            self.v.shield_charge = (self.v.shield_charge - decay).max(0.0);
        } else {
            self.v.shield_charge = 0.0;
        }

        if self.v.saturation > 0 {
            let decay = trunc_u64(
                self.v.max_saturation as f64 * OFFLINE_SATURATION_DECAY * self.rng.uniform_unit(),
            );
            self.v.saturation = self.v.saturation.saturating_sub(decay);
        }
    }

    /// Fix capacities from the fuel load. Runs once per warm-up.
    fn initialize_startup(&mut self) {
        if self.v.startup_initialized {
            return;
        }
        let total = self.total_fuel();
        self.v.max_shield_charge = physics::max_shield_for(total);
        self.v.max_saturation = physics::max_saturation_for(total);
        self.v.saturation = self.v.saturation.min(self.v.max_saturation);
        self.v.shield_charge = self.v.shield_charge.min(self.v.max_shield_charge);
        self.v.startup_initialized = true;
    }

    /// Full physics update for RUNNING and STOPPING. Stage order matters:
    /// each stage reads what the previous one wrote.
    fn update_online(&mut self) {
        let core_sat = self.core_saturation();
        let conversion = physics::conversion_level(self.v.converted_fuel, self.total_fuel());

        // temperature
        let rise = physics::temperature_rise(core_sat, self.v.temperature, conversion);
        if self.v.state == ReactorState::Stopping && conversion < 1.0 {
            if self.v.temperature <= COOLDOWN_HANDOVER_TEMPERATURE {
                self.v.startup_initialized = false;
                self.transition(ReactorState::Cooling, TransitionCause::CooledDown);
                return;
            }
            if self.v.saturation as f64 >= self.v.max_saturation as f64 * 0.99
                && self.v.reactable_fuel > 0.0
            {
                self.v.temperature -= 1.0 - conversion;
            } else {
                self.v.temperature += rise * 10.0;
            }
        } else {
            self.v.temperature += rise * 10.0;
        }
        self.v.temperature = self.v.temperature.max(0.0);

        // energy
        let base_max_rft =
            physics::base_max_rft(self.v.max_saturation, self.config.output_multiplier);
        let max_rft = physics::max_rft(base_max_rft, conversion);
        let generation_rate = (1.0 - core_sat) * max_rft as f64;
        self.v.saturation = self
            .v
            .saturation
            .saturating_add(trunc_u64(generation_rate))
            .min(self.v.max_saturation);

        // shield
        let drain_factor = physics::temp_drain_factor(self.v.temperature);
        let field_drain = physics::field_drain(drain_factor, core_sat, base_max_rft);
        let field_input_rate =
            physics::field_input_rate(field_drain, self.v.shield_charge, self.v.max_shield_charge);
        self.v.shield_charge -= (field_drain as f64).min(self.v.shield_charge);

        // fuel
        let fuel_use_rate =
            physics::fuel_use_rate(drain_factor, core_sat, self.config.fuel_usage_multiplier);
        if self.v.reactable_fuel > 0.0 {
            self.v.converted_fuel += fuel_use_rate;
            self.v.reactable_fuel -= fuel_use_rate;
        }

        self.v.rates = TickRates {
            temp_drain_factor: drain_factor,
            generation_rate,
            field_drain,
            field_input_rate,
            fuel_use_rate,
        };

        if self.v.shield_charge <= 0.0
            && self.v.temperature > ACTIVATION_TEMPERATURE
            && self.v.state != ReactorState::BeyondHope
        {
            self.transition(ReactorState::BeyondHope, TransitionCause::ContainmentFailure);
        }
    }

    /// Containment is gone. Flicker the shield and count down to detonation.
    fn update_critical(&mut self) {
        let flicker_max = ((self.v.max_shield_charge * 0.01) as i64).max(1);
        self.v.shield_charge = self.rng.uniform_int(0, flicker_max) as f64;

        if !self.config.disable_large_reactor_boom {
            self.v.min_explosion_delay -= 1;
        }

        // The arming tick counts as the first tick of the countdown.
        let remaining = match self.v.explosion_countdown {
            Some(remaining) => remaining,
            None => self.arm_countdown(),
        } - 1;
        self.v.explosion_countdown = Some(remaining);
        if remaining <= 0 {
            self.transition(ReactorState::Exploded, TransitionCause::Detonation);
        }
    }

    fn arm_countdown(&mut self) -> i64 {
        if self.config.disable_large_reactor_boom {
            EXPLOSION_DELAY + self.rng.uniform_int(0, EXPLOSION_JITTER)
        } else {
            self.v.min_explosion_delay =
                EXPLOSION_DELAY - 1 + self.rng.uniform_int(0, EXPLOSION_JITTER);
            EXPLOSION_DELAY + self.v.min_explosion_delay.max(0)
        }
    }

    fn inject_warmup(&mut self, amount: u64) -> u64 {
        if !self.v.startup_initialized {
            return 0;
        }
        let shield_target = (self.v.max_shield_charge / 2.0).floor();
        let saturation_target = self.v.max_saturation / 2;

        if self.v.shield_charge < shield_target {
            // One extra unit so truncation cannot leave the shield just short.
            let headroom =
                (trunc_u64(shield_target) + 1).saturating_sub(trunc_u64(self.v.shield_charge));
            let received = amount.min(headroom);
            self.v.shield_charge = (self.v.shield_charge + received as f64).min(shield_target);
            received
        } else if self.v.saturation < saturation_target {
            let received = amount.min(saturation_target - self.v.saturation);
            self.v.saturation += received;
            received
        } else if self.v.temperature < ACTIVATION_TEMPERATURE {
            let heat = amount as f64 / (1000.0 + self.v.reactable_fuel * 10.0);
            self.v.temperature = (self.v.temperature + heat).min(WARMUP_TEMPERATURE_CAP);
            amount
        } else {
            0
        }
    }

    fn inject_online(&mut self, amount: u64) {
        let fill = ratio_or(self.v.shield_charge, self.v.max_shield_charge, 1.0);
        let headroom = (self.v.max_shield_charge - self.v.shield_charge).max(0.0);
        let throttle = physics::shield_throttle(self.v.temperature);
        let absorbed = (amount as f64 * (1.0 - fill)).min(headroom) * throttle;
        self.v.shield_charge = (self.v.shield_charge + absorbed).min(self.v.max_shield_charge);
    }

    fn guarded(&mut self, command: Command, allowed: fn(&Self) -> bool, to: ReactorState) -> bool {
        if allowed(self) {
            self.transition(to, TransitionCause::Command(command));
            true
        } else {
            self.reject(command);
            false
        }
    }

    fn transition(&mut self, to: ReactorState, cause: TransitionCause) {
        let from = self.v.state;
        self.v.state = to;
        self.emit(ReactorEvent::Transition {
            tick: self.v.tick,
            from,
            to,
            cause,
        });
    }

    fn reject(&mut self, command: Command) {
        self.emit(ReactorEvent::CommandRejected {
            tick: self.v.tick,
            command,
            state: self.v.state,
        });
    }

    fn emit(&mut self, event: ReactorEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }
}

impl<R: RandomSource> fmt::Debug for ReactorCore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactorCore")
            .field("config", &self.config)
            .field("tick", &self.v.tick)
            .field("state", &self.v.state)
            .field("temperature", &self.v.temperature)
            .field("shield_charge", &self.v.shield_charge)
            .field("saturation", &self.v.saturation)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
