use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dr_core::SeededRandom;
use dr_driver::{
    DriverConfig, DriverError, Emulator, RealtimeDriver, load_scenario, run_scenario,
    validate_scenario,
};
use dr_reactor::{ReactorConfig, ReactorCore, ReactorError, ReactorSnapshot, TracingObserver};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Reactor(#[from] ReactorError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dr-cli")]
#[command(about = "Draconic reactor simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file
    Run {
        /// Path to the scenario YAML file
        scenario: PathBuf,
        /// Override the scenario's tick budget
        #[arg(long)]
        ticks: Option<u64>,
        /// Write the outcome as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Check a scenario file without running it
    Validate {
        /// Path to the scenario YAML file
        scenario: PathBuf,
    },
    /// Fuel, charge and activate a reactor, then let it run
    Demo {
        /// Reactable fuel to load
        #[arg(long, default_value_t = 300.0)]
        fuel: f64,
        /// Energy injected every tick
        #[arg(long, default_value_t = 1_000_000)]
        input: u64,
        /// Energy extracted every tick once running
        #[arg(long, default_value_t = 0)]
        output: u64,
        /// Random seed (fresh from the OS if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Total ticks to run
        #[arg(long, default_value_t = 1000)]
        ticks: u64,
        /// Pace ticks in wall-clock time
        #[arg(long)]
        realtime: bool,
        /// Ticks per second when pacing
        #[arg(long, default_value_t = 20.0)]
        tps: f64,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            json,
        } => cmd_run(&scenario, ticks, json.as_deref()),
        Commands::Validate { scenario } => cmd_validate(&scenario),
        Commands::Demo {
            fuel,
            input,
            output,
            seed,
            ticks,
            realtime,
            tps,
        } => cmd_demo(DemoArgs {
            fuel,
            input,
            output,
            seed,
            ticks,
            realtime,
            tps,
        }),
    }
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", path.display());
    let scenario = load_scenario(path)?;
    validate_scenario(&scenario)?;
    println!(
        "✓ Scenario '{}' is valid ({} actions, {} ticks)",
        scenario.name,
        scenario.actions.len(),
        scenario.ticks
    );
    Ok(())
}

fn cmd_run(path: &Path, ticks: Option<u64>, json: Option<&Path>) -> CliResult<()> {
    let mut scenario = load_scenario(path)?;
    if let Some(ticks) = ticks {
        scenario.ticks = ticks;
    }
    println!("Running scenario: {}", scenario.name);

    let outcome = run_scenario(&scenario)?;
    if outcome.exploded {
        println!("✗ Reactor exploded at tick {}", outcome.ticks_run);
    } else if outcome.stopped_early {
        println!("✓ Stopped at tick {}", outcome.ticks_run);
    } else {
        println!("✓ Completed {} ticks", outcome.ticks_run);
    }
    print_summary(&outcome.final_snapshot);
    println!("  Records: {}", outcome.records.len());

    if let Some(out) = json {
        let text = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(out, text).map_err(|e| CliError::Write {
            path: out.to_path_buf(),
            source: e,
        })?;
        println!("  Wrote {}", out.display());
    }
    Ok(())
}

struct DemoArgs {
    fuel: f64,
    input: u64,
    output: u64,
    seed: Option<u64>,
    ticks: u64,
    realtime: bool,
    tps: f64,
}

fn cmd_demo(args: DemoArgs) -> CliResult<()> {
    let rng = match args.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    println!("Demo reactor, seed {}", rng.seed());

    let core = ReactorCore::new(ReactorConfig::default(), rng)?.with_observer(TracingObserver);
    let config = DriverConfig {
        ticks_per_second: args.tps,
        log_interval: if args.realtime { 1 } else { 100 },
        ..DriverConfig::default()
    };
    let mut emu = Emulator::new(core, config)?;

    emu.add_fuel(args.fuel);
    emu.charge_reactor();
    emu.set_input_energy(args.input);

    // Warm-up is short, so it always runs unpaced.
    match emu.run_until(|core| core.can_activate(), args.ticks) {
        Some(taken) => {
            println!("  Ready to activate after {taken} ticks");
            emu.activate_reactor();
            emu.set_output_energy(args.output);
        }
        None => println!("  Not ready after {} ticks", args.ticks),
    }

    let remaining = args.ticks.saturating_sub(emu.core().tick());
    let emu = if args.realtime && remaining > 0 {
        let driver = RealtimeDriver::start(emu)?;
        let wall =
            Duration::try_from_secs_f64(remaining as f64 / args.tps).unwrap_or(Duration::MAX);
        tracing::info!(remaining, "pacing remaining ticks");
        thread::sleep(wall);
        driver.stop()?
    } else {
        emu.run_for(remaining);
        emu
    };

    print_summary(&emu.snapshot());
    Ok(())
}

fn print_summary(s: &ReactorSnapshot) {
    println!("  Tick:        {}", s.tick);
    println!("  State:       {}", s.state);
    println!("  Temperature: {:.1}", s.temperature);
    println!(
        "  Shield:      {:.0} / {:.0} ({:.1}%)",
        s.shield_charge,
        s.max_shield_charge,
        s.shield_fraction() * 100.0
    );
    println!(
        "  Saturation:  {} / {} ({:.1}%)",
        s.saturation,
        s.max_saturation,
        s.saturation_fraction() * 100.0
    );
    println!(
        "  Fuel:        {:.2} converted of {:.2} ({:.1}%)",
        s.converted_fuel,
        s.total_fuel,
        s.fuel_conversion_fraction() * 100.0
    );
    println!("  Generation:  {:.0} /tick", s.generation_rate);
}
