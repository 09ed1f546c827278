//! Real-time pacing on a background thread.
//!
//! The emulator lives behind a mutex. The tick thread holds the lock for the
//! duration of one step, so commands issued through [`RealtimeDriver::with`]
//! always land between ticks and a tick never overlaps another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use dr_core::RandomSource;
use dr_reactor::ReactorSnapshot;

use crate::clock::{TickClock, TickRate};
use crate::emulator::Emulator;
use crate::error::{DriverError, DriverResult};

/// Longest single sleep, so a stop request is noticed promptly.
const MAX_NAP: Duration = Duration::from_millis(20);

type Shared<R> = Arc<Mutex<Emulator<R>>>;

pub struct RealtimeDriver<R: RandomSource + Send + 'static> {
    shared: Option<Shared<R>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<R: RandomSource + Send + 'static> RealtimeDriver<R> {
    /// Start ticking `emulator` at its configured rate.
    pub fn start(emulator: Emulator<R>) -> DriverResult<Self> {
        let rate = TickRate::from_tps(emulator.config().ticks_per_second)?;
        let shared = Arc::new(Mutex::new(emulator));
        let stop = Arc::new(AtomicBool::new(false));

        tracing::info!(tps = rate.tps(), "starting emulator");
        let handle = thread::Builder::new()
            .name("reactor-tick".to_string())
            .spawn({
                let shared = Arc::clone(&shared);
                let stop = Arc::clone(&stop);
                move || tick_loop(shared, stop, rate)
            })
            .map_err(|_| DriverError::Thread {
                what: "could not spawn tick thread",
            })?;

        Ok(Self {
            shared: Some(shared),
            stop,
            handle: Some(handle),
        })
    }

    /// Run `f` against the emulator between ticks.
    pub fn with<T>(&self, f: impl FnOnce(&mut Emulator<R>) -> T) -> DriverResult<T> {
        let shared = self.shared.as_ref().ok_or(DriverError::Thread {
            what: "driver already stopped",
        })?;
        let mut guard = shared.lock().map_err(|_| DriverError::Thread {
            what: "emulator lock poisoned",
        })?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self) -> DriverResult<ReactorSnapshot> {
        self.with(|emu| emu.snapshot())
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the tick thread and hand the emulator back.
    pub fn stop(mut self) -> DriverResult<Emulator<R>> {
        self.halt()?;
        let shared = self.shared.take().ok_or(DriverError::Thread {
            what: "driver already stopped",
        })?;
        let mutex = Arc::try_unwrap(shared).map_err(|_| DriverError::Thread {
            what: "emulator still shared",
        })?;
        mutex.into_inner().map_err(|_| DriverError::Thread {
            what: "emulator lock poisoned",
        })
    }

    fn halt(&mut self) -> DriverResult<()> {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            tracing::info!("stopping emulator");
            handle.join().map_err(|_| DriverError::Thread {
                what: "tick thread panicked",
            })?;
        }
        Ok(())
    }
}

impl<R: RandomSource + Send + 'static> Drop for RealtimeDriver<R> {
    fn drop(&mut self) {
        if let Err(e) = self.halt() {
            tracing::error!(error = %e, "tick thread did not shut down cleanly");
        }
    }
}

fn tick_loop<R: RandomSource>(shared: Shared<R>, stop: Arc<AtomicBool>, rate: TickRate) {
    let mut clock = TickClock::new(rate, Instant::now());
    while !stop.load(Ordering::Acquire) {
        let now = Instant::now();
        if !clock.should_tick(now) {
            thread::sleep(clock.time_until_tick(now).min(MAX_NAP));
            continue;
        }
        clock.advance(now);

        let Ok(mut emu) = shared.lock() else {
            tracing::error!("emulator lock poisoned, tick thread exiting");
            return;
        };
        emu.step();
    }
}
