use std::thread;
use std::time::Duration;

use dr_driver::{DriverConfig, Emulator, RealtimeDriver};
use dr_reactor::{ReactorConfig, ReactorCore, ReactorState};

fn fast_emulator() -> Emulator {
    let core = ReactorCore::seeded(ReactorConfig::default(), 11).unwrap();
    let config = DriverConfig {
        ticks_per_second: 1000.0,
        ..DriverConfig::default()
    };
    Emulator::new(core, config).unwrap()
}

#[test]
fn ticks_in_background_and_returns_emulator() {
    let driver = RealtimeDriver::start(fast_emulator()).unwrap();
    assert!(driver.is_running());
    thread::sleep(Duration::from_millis(100));

    let mid = driver.snapshot().unwrap().tick;
    assert!(mid > 0);

    let emu = driver.stop().unwrap();
    assert!(emu.core().tick() >= mid);
}

#[test]
fn commands_land_between_ticks() {
    let driver = RealtimeDriver::start(fast_emulator()).unwrap();
    let charged = driver
        .with(|emu| {
            emu.add_fuel(300.0);
            emu.set_input_energy(1_000_000);
            emu.charge_reactor()
        })
        .unwrap();
    assert!(charged);

    thread::sleep(Duration::from_millis(150));
    let emu = driver.stop().unwrap();
    assert_ne!(emu.core().state(), ReactorState::Cold);
    assert_eq!(emu.input_rate(), 1_000_000);
}

#[test]
fn drop_stops_thread() {
    let driver = RealtimeDriver::start(fast_emulator()).unwrap();
    thread::sleep(Duration::from_millis(10));
    drop(driver);
}
