//! # Pipe Controller
//!
//! Runs the pipe-driven virtual controllers against a fixed-rate frame loop.
//!
//! Each frame the loop marks input as needed, polls every pipe device, and
//! optionally records the resulting pad reports.

use anyhow::{Context, Result};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use pipe_controller::config::{Config, LoggingConfig};
use pipe_controller::error::PipeError;
use pipe_controller::interface::ControllerInterface;
use pipe_controller::pipes::{Button, PadReport};
use pipe_controller::recorder::ReportRecorder;

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "pipe-controller.log";

/// Main entry point for Pipe Controller
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (falls back to defaults if the file is missing)
///    - Set up logging
///    - Discover pipes and register one device per channel
///
/// 2. **Frame Loop**
///    - Request input, poll every device, record reports
///    - Log a status line every `log_interval_frames` frames
///
/// 3. **Shutdown** on Ctrl+C
///
/// # Examples
///
/// ```bash
/// mkdir -p Pipes && mkfifo Pipes/pipe1
/// cargo run --release -- config/default.toml
/// echo "PRESS A" > Pipes/pipe1
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let (config, missing_config) = match Config::load(&config_path) {
        Ok(config) => (config, false),
        Err(PipeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            (Config::default(), true)
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to load {}", config_path)),
    };

    let _log_guard = init_logging(&config.logging);

    info!("Pipe Controller v{} starting...", env!("CARGO_PKG_VERSION"));
    if missing_config {
        warn!("Config file {} not found, using defaults", config_path);
    }

    let mut interface = ControllerInterface::new(config.pipes.blocking);
    interface
        .populate(&config.pipes)
        .context("Failed to discover pipes")?;

    if interface.is_empty() {
        warn!("No pipe devices found in {}", config.pipes.directory);
    }

    let mut recorder = if config.recorder.enabled {
        Some(ReportRecorder::open(&config.recorder.path)?)
    } else {
        None
    };

    let period = frame_period(config.frame.rate_hz);
    let mut frame_interval = interval(period);
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Starting frame loop at {}Hz ({} device(s), blocking: {})",
        config.frame.rate_hz,
        interface.len(),
        interface.is_blocking()
    );
    info!("Press Ctrl+C to exit");

    let mut frame: u64 = 0;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                interface.request_input();
                // Blocking mode may park this thread until every writer sends FLUSH.
                tokio::task::block_in_place(|| interface.update_input());
                frame += 1;

                if let Some(recorder) = recorder.as_mut() {
                    if let Err(e) = recorder.record_frame(frame, interface.pad_reports()) {
                        warn!("Failed to record frame {}: {}", frame, e);
                    }
                }

                if frame % config.frame.log_interval_frames == 0 {
                    info!(
                        "Frame {}: {} device(s), {} closed",
                        frame,
                        interface.len(),
                        interface.closed_count()
                    );
                    for (name, report) in interface.pad_reports() {
                        debug!("{}: [{}] {}", name, report, describe_report(&report));
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total frames: {}", frame);
                break;
            }
        }
    }

    if let Some(mut recorder) = recorder {
        recorder.flush()?;
        info!("Recorded {} report(s)", recorder.records());
    }

    Ok(())
}

/// Install console logging plus an optional daily rolling log file.
///
/// `RUST_LOG` overrides the configured level. The returned guard must live
/// until shutdown so buffered file output is flushed.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Duration of one frame at `rate_hz`.
fn frame_period(rate_hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1)))
}

/// Human-readable summary of a report, e.g. `A Z main=(127,0) c=(0,0) l=0 r=255`.
fn describe_report(report: &PadReport) -> String {
    let mut parts: Vec<String> = Button::ALL
        .iter()
        .filter(|&&button| report.is_pressed(button))
        .map(|button| button.token().to_string())
        .collect();

    let (main_x, main_y) = report.main_stick();
    let (c_x, c_y) = report.c_stick();
    let (l, r) = report.triggers();
    parts.push(format!("main=({},{})", main_x, main_y));
    parts.push(format!("c=({},{})", c_x, c_y));
    parts.push(format!("l={} r={}", l, r));
    parts.join(" ")
}
