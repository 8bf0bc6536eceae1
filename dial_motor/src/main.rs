//! # Dial Motor Runner
//!
//! Runs the phase scheduler on simulation decoders with a thread-backed
//! tick, for bench checks of cadence and start/stop behaviour.
//!
//! # Usage
//!
//! ```bash
//! # Spin motors 0 and 3 until Ctrl-C
//! dial_motor --motor 0 --motor 3
//!
//! # Two seconds on a custom config, verbose
//! dial_motor --config bench.toml --motor 1 --duration-ms 2000 -v
//!
//! # JSON logs
//! dial_motor --json --motor 8
//! ```

#![deny(warnings)]

use clap::Parser;
use dial_common::config::LogLevel;
use dial_common::consts::DEFAULT_CONFIG_PATH;
use dial_common::dial::DIALS;
use dial_common::hal::sensor::PhotoSensor;
use dial_common::hal::types::MotorId;
use dial_motor::drivers::simulation::energized_slot;
use dial_motor::{RunnerConfig, SimulationRig};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Handle for swapping the log filter once the configuration is known.
type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Interval between status lines while running.
const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Foreground polling period.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Dial Motor - multiplexed stepper phase scheduler
#[derive(Parser, Debug)]
#[command(name = "dial_motor")]
#[command(version)]
#[command(about = "Timer-driven phase scheduler for multiplexed dial stepper motors")]
#[command(long_about = None)]
struct Args {
    /// Path to the runner configuration (defaults are used if it is missing)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Start this motor (can be specified multiple times)
    #[arg(short, long = "motor", action = clap::ArgAction::Append)]
    motors: Vec<i64>,

    /// Stop after this many milliseconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    duration_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Before anything that can fail.
    let filter = setup_tracing(&args);

    if let Err(e) = run(&args, &filter) {
        error!("dial_motor failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, filter: &FilterHandle) -> Result<(), Box<dyn std::error::Error>> {
    let config = RunnerConfig::load_or_default(&args.config)?;
    apply_log_level(args, filter, config.shared.log_level);

    info!(
        "Dial Motor v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    let mut rig = SimulationRig::new(&config)?;
    let motor_count = rig.scheduler.motor_count();

    for &raw in &args.motors {
        let motor = MotorId::checked(raw, motor_count)?;
        rig.scheduler.start(motor)?;
        info!("Motor {} running (dial '{}')", motor, DIALS[motor].name);
    }

    let deadline = args.duration_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
    let mut next_status = Instant::now() + STATUS_INTERVAL;

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if deadline.is_some_and(|d| now >= d) {
            info!("Run duration elapsed");
            break;
        }
        if now >= next_status {
            let stats = rig.scheduler.stats();
            let slots: Vec<Option<usize>> = rig
                .scheduler
                .running_mask()
                .motor_ids()
                .map(|motor| energized_slot(&rig.probes, motor))
                .collect();
            info!(
                "phase={} running={:?} ticks={} overlapped={} avg={}ns max={}ns sensor={:#04x}",
                rig.scheduler.phase(),
                rig.scheduler.running_mask(),
                stats.ticks,
                stats.overlapped_ticks,
                stats.avg_tick_ns,
                stats.max_tick_ns,
                rig.sensor.read()
            );
            debug!("energized slots: {:?}", slots);
            next_status = now + STATUS_INTERVAL;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    rig.scheduler.stop_all();
    let timer = rig.scheduler.timer().stats();
    let ticks = rig.scheduler.stats();
    info!(
        "Tick summary: {} ticks, {} overlapped, avg={}ns, max={}ns; timer: {} misses, max latency={}us",
        ticks.ticks,
        ticks.overlapped_ticks,
        ticks.avg_tick_ns,
        ticks.max_tick_ns,
        timer.deadline_misses,
        timer.max_latency_ns / 1000
    );

    drop(rig);
    info!("Dial Motor shutdown complete");
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and `RUST_LOG`.
///
/// Defaults to `info` until the configuration has been read.
fn setup_tracing(args: &Args) -> FilterHandle {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let (filter, handle) = reload::Layer::new(filter);
    let registry = tracing_subscriber::registry().with(filter);

    if args.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
    handle
}

/// Switch to the configured `log_level` unless `-v` or `RUST_LOG` decided it.
fn apply_log_level(args: &Args, filter: &FilterHandle, level: LogLevel) {
    if args.verbose || std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return;
    }
    if let Err(e) = filter.reload(EnvFilter::new(level.as_directive())) {
        warn!("Could not apply log_level '{}': {}", level.as_directive(), e);
    }
}
