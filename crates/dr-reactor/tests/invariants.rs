//! Property tests: random operator sessions never break the core's bounds.

use dr_reactor::{ReactorConfig, ReactorCore};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddFuel(f64),
    Charge,
    Activate,
    Shutdown,
    ToggleFailSafe,
    Inject(u64),
    Extract(u64),
    Ticks(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0_f64..400.0).prop_map(Op::AddFuel),
        Just(Op::Charge),
        Just(Op::Activate),
        Just(Op::Shutdown),
        Just(Op::ToggleFailSafe),
        (0_u64..5_000_000).prop_map(Op::Inject),
        (0_u64..5_000_000).prop_map(Op::Extract),
        (1_u32..400).prop_map(Op::Ticks),
    ]
}

fn check_bounds(core: &ReactorCore) -> Result<(), TestCaseError> {
    prop_assert!(core.temperature().is_finite());
    prop_assert!(core.shield_charge() >= 0.0);
    if core.is_startup_initialized() {
        prop_assert!(core.saturation() <= core.max_saturation());
        prop_assert!(core.shield_charge() <= core.max_shield_charge());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_sessions_respect_bounds(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..60)) {
        let mut core = ReactorCore::seeded(ReactorConfig::default(), seed).unwrap();

        for op in ops {
            let before = core.snapshot();
            let before_tick = before.tick;
            match op {
                Op::AddFuel(amount) => {
                    core.add_fuel(amount);
                }
                Op::Charge => {
                    if !core.charge_reactor() {
                        prop_assert_eq!(core.snapshot(), before);
                    }
                }
                Op::Activate => {
                    if !core.activate_reactor() {
                        prop_assert_eq!(core.snapshot(), before);
                    }
                }
                Op::Shutdown => {
                    if !core.shutdown_reactor() {
                        prop_assert_eq!(core.snapshot(), before);
                    }
                }
                Op::ToggleFailSafe => core.toggle_fail_safe(),
                Op::Inject(amount) => {
                    core.inject_energy(amount);
                }
                Op::Extract(amount) => core.extract_energy(amount),
                Op::Ticks(n) => {
                    for i in 0..n {
                        core.advance_one_tick();
                        prop_assert_eq!(core.tick(), before_tick + u64::from(i) + 1);
                        check_bounds(&core)?;
                    }
                }
            }
            check_bounds(&core)?;
            prop_assert!(core.tick() >= before_tick);
        }
    }

    #[test]
    fn reset_always_matches_fresh(seed in any::<u64>(), fuel in 144.0_f64..1000.0, ticks in 0_u32..50) {
        let fresh = ReactorCore::seeded(ReactorConfig::default(), seed).unwrap().snapshot();
        let mut core = ReactorCore::seeded(ReactorConfig::default(), seed).unwrap();
        core.add_fuel(fuel);
        core.charge_reactor();
        for _ in 0..ticks {
            core.inject_energy(2_000_000);
            core.advance_one_tick();
        }
        core.reset();
        prop_assert_eq!(core.snapshot(), fresh);
    }
}
