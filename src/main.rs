//! # Motion Remote
//!
//! Stream motion and button state from an MPU-6050 controller to a PC.
//!
//! This application reads the sensor at a fixed period, converts and encodes
//! each sample, and sends it as one UDP datagram (or prints it to a console).

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use motion_remote::config::{Config, TransportMode};
use motion_remote::input::led::{Heartbeat, SysfsLed};
use motion_remote::input::pins::SysfsPins;
use motion_remote::input::InputSampler;
use motion_remote::logging;
use motion_remote::pipeline::Pipeline;
use motion_remote::sensor::bus::I2cRegisterBus;
use motion_remote::sensor::calibration::Calibrator;
use motion_remote::sensor::convert::SampleConverter;
use motion_remote::sensor::ImuSensor;
use motion_remote::transport::build_sink;
use motion_remote::transport::network::{associate_with_retry, NmcliLink};

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for Motion Remote
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration and set up logging
///    - Associate with the configured network (UDP mode only)
///    - Wake the sensor and calibrate the gyroscope bias
///    - Open the configured transport
///
/// 2. **Main Loop**
///    - One pipeline step per period
///    - Log status every `log_interval_frames` frames
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if:
/// - The configuration cannot be loaded
/// - The network stays unavailable after every association attempt
/// - The sensor cannot be opened, woken or calibrated
/// - The transport cannot be opened
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO motion_remote: Motion Remote v0.1.0 starting...
/// INFO motion_remote::sensor::calibration: Calibrating gyroscope over 500 samples, ...
/// INFO motion_remote::transport: Streaming frames to udp://192.168.1.100:5005
/// INFO motion_remote: Sent 1000 frames (0 skipped, 0 dropped)
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _log_guard = logging::init(&config.logging);

    info!("Motion Remote v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from {}", config_path);

    if config.transport.mode == TransportMode::Udp {
        let mut link = NmcliLink::new();
        associate_with_retry(&mut link, &config.network).await?;
    }

    // Sensor bring-up
    let bus = I2cRegisterBus::open_linux(&config.sensor.i2c_device)?;
    let mut sensor = ImuSensor::new(
        bus,
        config.sensor.address,
        config.sensor.accel_range()?,
        config.sensor.gyro_range()?,
    );
    sensor.init()?;

    let calibrator = Calibrator::new(
        config.sensor.calibration_samples,
        Duration::from_millis(config.sensor.calibration_delay_ms),
    );
    let bias = calibrator.calibrate(&mut sensor).await?;

    let converter = SampleConverter::new(
        sensor.accel_range(),
        sensor.gyro_range(),
        config.sensor.gyro_deadzone,
    );

    let pins = SysfsPins::new(&config.input.gpio_root, &config.input.adc_root);
    let inputs = InputSampler::new(pins, &config.input);
    info!(
        "Sampling {} button(s) and {} axis/axes",
        inputs.button_count(),
        inputs.axis_count()
    );

    let layout = config.packet.resolve()?;
    info!("Packet layout '{}' ({} bytes)", layout.name(), layout.size());

    let sink = build_sink(&config.transport).await?;
    let mut pipeline = Pipeline::new(sensor, converter, bias, inputs, layout, sink);
    if let Some(pin) = config.control.status_led_pin {
        let led = SysfsLed::new(&config.input.gpio_root, pin);
        pipeline = pipeline.with_heartbeat(Heartbeat::new(Box::new(led)));
        info!("Heartbeat LED on GPIO {}", pin);
    }

    let period = Duration::from_millis(config.control.period_ms);
    let mut ticker = (!period.is_zero()).then(|| {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    info!("Starting control loop with {:?} period", period);
    info!("Press Ctrl+C to exit");

    let log_interval = config.control.log_interval_frames.max(1);
    let mut last_log_count: u64 = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    // Main control loop
    loop {
        tokio::select! {
            _ = wait_for_period(ticker.as_mut()) => {
                if let Err(e) = pipeline.step().await {
                    error!("Control loop stopped: {}", e);
                    return Err(e.into());
                }

                let counters = pipeline.counters();
                if counters.total() - last_log_count >= log_interval {
                    info!("Sent {} frames ({} skipped, {} dropped)",
                        counters.sent, counters.skipped, counters.dropped);
                    last_log_count = counters.total();
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = &mut shutdown => {
                let counters = pipeline.counters();
                info!("Received Ctrl+C, shutting down...");
                info!("Total frames sent: {} ({} skipped, {} dropped)",
                    counters.sent, counters.skipped, counters.dropped);
                break;
            }
        }
    }

    Ok(())
}

/// Wait for the next tick, or just yield when the loop runs unthrottled
async fn wait_for_period(ticker: Option<&mut tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}
