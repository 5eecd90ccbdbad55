//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{MotionRemoteError, Result};
use crate::input::{ActiveLevel, AdcResolution, MAX_AXES, MAX_BUTTONS};
use crate::packet::layout::{Field, PacketLayout, PRESET_NAMES};
use crate::sensor::registers::{AccelRange, GyroRange, MPU6050_ADDRESS, MPU6050_ADDRESS_ALT};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub packet: PacketConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub receiver: ReceiverConfig,
}

/// Wi-Fi association configuration
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Empty means the board is already on the network
    #[serde(default)]
    pub ssid: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

/// Where frames go
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Binary packets over UDP
    #[default]
    Udp,
    /// Human-readable lines on a console
    Console,
}

/// Transport configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default)]
    pub mode: TransportMode,

    #[serde(default = "default_dest_host")]
    pub dest_host: String,

    #[serde(default = "default_dest_port")]
    pub dest_port: u16,

    /// Serial device for console output; empty means stdout
    #[serde(default)]
    pub console_device: String,

    #[serde(default = "default_console_baud_rate")]
    pub console_baud_rate: u32,
}

/// Inertial sensor configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    #[serde(default = "default_i2c_device")]
    pub i2c_device: String,

    #[serde(default = "default_address")]
    pub address: u8,

    #[serde(default = "default_accel_range_g")]
    pub accel_range_g: u8,

    #[serde(default = "default_gyro_range_dps")]
    pub gyro_range_dps: u16,

    #[serde(default = "default_calibration_samples")]
    pub calibration_samples: u32,

    #[serde(default = "default_calibration_delay_ms")]
    pub calibration_delay_ms: u64,

    #[serde(default = "default_gyro_deadzone")]
    pub gyro_deadzone: f32,
}

/// One digital button
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ButtonConfig {
    pub name: String,
    pub pin: u32,
    /// Bit position in the mask (0-7)
    pub bit: u8,
    /// No default: polarity depends on how the controller is wired
    pub active_level: ActiveLevel,
}

/// One analog joystick axis
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AxisConfig {
    pub name: String,
    pub pin: u32,
}

/// GPIO and ADC configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_adc_bits")]
    pub adc_bits: AdcResolution,

    #[serde(default = "default_gpio_root")]
    pub gpio_root: String,

    #[serde(default = "default_adc_root")]
    pub adc_root: String,

    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,

    #[serde(default)]
    pub axes: Vec<AxisConfig>,
}

/// Packet layout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PacketConfig {
    /// Preset name, or "custom" to use `fields`
    #[serde(default = "default_layout")]
    pub layout: String,

    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Control loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    /// Loop period; 0 runs as fast as the bus allows
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    #[serde(default = "default_log_interval_frames")]
    pub log_interval_frames: u64,

    /// GPIO toggled once per iteration under `[input] gpio_root`; unset disables it
    #[serde(default)]
    pub status_led_pin: Option<u32>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for daily log files; empty logs to stderr
    #[serde(default)]
    pub dir: String,
}

/// PC-side receiver configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReceiverConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

// Default value functions
fn default_max_attempts() -> u32 { 20 }
fn default_initial_backoff_ms() -> u64 { 500 }
fn default_max_backoff_ms() -> u64 { 8000 }

fn default_dest_host() -> String { "192.168.1.100".to_string() }
fn default_dest_port() -> u16 { 5005 }
fn default_console_baud_rate() -> u32 { 115200 }

fn default_i2c_device() -> String { "/dev/i2c-1".to_string() }
fn default_address() -> u8 { MPU6050_ADDRESS }
fn default_accel_range_g() -> u8 { 2 }
fn default_gyro_range_dps() -> u16 { 250 }
fn default_calibration_samples() -> u32 { 500 }
fn default_calibration_delay_ms() -> u64 { 2 }
fn default_gyro_deadzone() -> f32 { 0.2 }

fn default_adc_bits() -> AdcResolution { AdcResolution::Bits12 }
fn default_gpio_root() -> String { "/sys/class/gpio".to_string() }
fn default_adc_root() -> String { "/sys/bus/iio/devices/iio:device0".to_string() }

fn default_layout() -> String { "imu".to_string() }

fn default_period_ms() -> u64 { 10 }
fn default_log_interval_frames() -> u64 { 1000 }

fn default_bind_addr() -> String { "0.0.0.0:5005".to_string() }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::default(),
            dest_host: default_dest_host(),
            dest_port: default_dest_port(),
            console_device: String::new(),
            console_baud_rate: default_console_baud_rate(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            i2c_device: default_i2c_device(),
            address: default_address(),
            accel_range_g: default_accel_range_g(),
            gyro_range_dps: default_gyro_range_dps(),
            calibration_samples: default_calibration_samples(),
            calibration_delay_ms: default_calibration_delay_ms(),
            gyro_deadzone: default_gyro_deadzone(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            adc_bits: default_adc_bits(),
            gpio_root: default_gpio_root(),
            adc_root: default_adc_root(),
            buttons: Vec::new(),
            axes: Vec::new(),
        }
    }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            fields: Vec::new(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
            log_interval_frames: default_log_interval_frames(),
            status_led_pin: None,
        }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn invalid(msg: impl std::fmt::Display) -> MotionRemoteError {
    MotionRemoteError::Config(toml::de::Error::custom(msg))
}

impl SensorConfig {
    /// Accelerometer range for `accel_range_g`
    pub fn accel_range(&self) -> Result<AccelRange> {
        AccelRange::from_g(self.accel_range_g)
            .ok_or_else(|| invalid("accel_range_g must be one of: 2, 4, 8, 16"))
    }

    /// Gyroscope range for `gyro_range_dps`
    pub fn gyro_range(&self) -> Result<GyroRange> {
        GyroRange::from_dps(self.gyro_range_dps)
            .ok_or_else(|| invalid("gyro_range_dps must be one of: 250, 500, 1000, 2000"))
    }
}

impl PacketConfig {
    /// Resolve the configured packet layout
    ///
    /// # Errors
    ///
    /// Returns error if the preset name is unknown or the custom field list is invalid
    pub fn resolve(&self) -> Result<PacketLayout> {
        if self.layout == "custom" {
            return PacketLayout::custom(self.fields.clone()).map_err(|e| invalid(e));
        }
        PacketLayout::preset(&self.layout).ok_or_else(|| {
            invalid(format!(
                "packet layout '{}' must be one of: {}, custom",
                self.layout,
                PRESET_NAMES.join(", ")
            ))
        })
    }
}

impl ReceiverConfig {
    /// Parsed bind address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().map_err(|e| {
            invalid(format!("receiver bind_addr '{}' is invalid: {}", self.bind_addr, e))
        })
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use motion_remote::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Network association only runs when an SSID is set
        if !self.network.ssid.is_empty() {
            if self.network.max_attempts == 0 || self.network.max_attempts > 100 {
                return Err(invalid("max_attempts must be between 1 and 100"));
            }

            if self.network.initial_backoff_ms == 0 || self.network.initial_backoff_ms > 60000 {
                return Err(invalid("initial_backoff_ms must be between 1 and 60000"));
            }

            if self.network.max_backoff_ms < self.network.initial_backoff_ms
                || self.network.max_backoff_ms > 300000
            {
                return Err(invalid(
                    "max_backoff_ms must be between initial_backoff_ms and 300000",
                ));
            }
        }

        // Transport
        if self.transport.mode == TransportMode::Udp {
            if self.transport.dest_host.is_empty() {
                return Err(invalid("dest_host cannot be empty in udp mode"));
            }

            if self.transport.dest_port == 0 {
                return Err(invalid("dest_port must be greater than 0"));
            }
        }

        const BAUD_RATES: [u32; 6] = [9600, 57600, 115200, 230400, 460800, 921600];
        if !BAUD_RATES.contains(&self.transport.console_baud_rate) {
            return Err(invalid(
                "console_baud_rate must be one of: 9600, 57600, 115200, 230400, 460800, 921600",
            ));
        }

        // Sensor
        if self.sensor.i2c_device.is_empty() {
            return Err(invalid("i2c_device cannot be empty"));
        }

        if ![MPU6050_ADDRESS, MPU6050_ADDRESS_ALT].contains(&self.sensor.address) {
            return Err(invalid("sensor address must be 0x68 or 0x69"));
        }

        self.sensor.accel_range()?;
        self.sensor.gyro_range()?;

        if self.sensor.calibration_samples == 0 || self.sensor.calibration_samples > 10000 {
            return Err(invalid("calibration_samples must be between 1 and 10000"));
        }

        if self.sensor.calibration_delay_ms > 1000 {
            return Err(invalid("calibration_delay_ms must be between 0 and 1000"));
        }

        if !(0.0..=10.0).contains(&self.sensor.gyro_deadzone) {
            return Err(invalid("gyro_deadzone must be between 0.0 and 10.0"));
        }

        // Inputs
        if self.input.buttons.len() > MAX_BUTTONS {
            return Err(invalid(format!("at most {} buttons can be configured", MAX_BUTTONS)));
        }

        let mut used_bits = 0u8;
        for button in &self.input.buttons {
            if button.name.is_empty() {
                return Err(invalid("button name cannot be empty"));
            }

            if button.bit as usize >= MAX_BUTTONS {
                return Err(invalid(format!(
                    "button '{}' bit {} is out of bounds (must be 0-7)",
                    button.name, button.bit
                )));
            }

            if used_bits & (1 << button.bit) != 0 {
                return Err(invalid(format!(
                    "button '{}' reuses bit {}",
                    button.name, button.bit
                )));
            }
            used_bits |= 1 << button.bit;
        }

        if self.input.axes.len() > MAX_AXES {
            return Err(invalid(format!("at most {} axes can be configured", MAX_AXES)));
        }

        if self.input.axes.iter().any(|a| a.name.is_empty()) {
            return Err(invalid("axis name cannot be empty"));
        }

        // Packet layout
        self.packet.resolve()?;

        // Control loop
        if self.control.period_ms > 1000 {
            return Err(invalid("period_ms must be between 0 and 1000"));
        }

        if self.control.log_interval_frames == 0 {
            return Err(invalid("log_interval_frames must be greater than 0"));
        }

        if let Some(pin) = self.control.status_led_pin {
            if self.input.buttons.iter().any(|b| b.pin == pin) {
                return Err(invalid(format!("status_led_pin {} is also a button pin", pin)));
            }
        }

        // Receiver
        self.receiver.bind_addr()?;

        Ok(())
    }
}
