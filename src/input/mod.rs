//! # Input Module
//!
//! Buttons and analog joystick axes wired to the board's GPIO and ADC.
//!
//! ## Buttons
//!
//! Each configured button owns one bit of an 8-bit mask. Whether a button is
//! pressed at logic-high (pull-down wiring) or logic-low (pull-up wiring) depends
//! on how that particular controller was built, so every button states its own
//! [`ActiveLevel`].
//!
//! ## Axes
//!
//! Up to two ADC channels are normalized to -1.0..=1.0 with the ADC midpoint
//! (512 for 10-bit, 2048 for 12-bit) mapping to exactly 0.0.

pub mod led;
pub mod pins;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AxisConfig, ButtonConfig, InputConfig};
use pins::InputPins;

/// Maximum number of buttons (one bit each in the mask byte)
pub const MAX_BUTTONS: usize = 8;

/// Maximum number of joystick axes
pub const MAX_AXES: usize = 2;

/// Logic level at which a button counts as pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveLevel {
    /// Pressed reads high (pull-down wiring)
    High,
    /// Pressed reads low (pull-up wiring)
    Low,
}

impl ActiveLevel {
    /// Whether a pin reading `is_high` means "pressed" for this polarity.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_remote::input::ActiveLevel;
    ///
    /// assert!(ActiveLevel::High.is_active(true));
    /// assert!(ActiveLevel::Low.is_active(false));
    /// assert!(!ActiveLevel::Low.is_active(true));
    /// ```
    #[must_use]
    pub fn is_active(self, is_high: bool) -> bool {
        match self {
            ActiveLevel::High => is_high,
            ActiveLevel::Low => !is_high,
        }
    }
}

/// Button mask and joystick axes for one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InputState {
    /// One bit per configured button
    pub buttons: u8,
    /// Normalized axes in configuration order; unconfigured axes stay 0.0
    pub joystick: [f32; MAX_AXES],
}

impl InputState {
    /// Whether the button on `bit` is pressed.
    #[must_use]
    pub fn is_pressed(&self, bit: u8) -> bool {
        bit < 8 && self.buttons & (1 << bit) != 0
    }
}

/// Resolution of the ADC feeding the joystick axes
///
/// Configured as `adc_bits = 10` or `adc_bits = 12`; any other width is
/// rejected when the configuration is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum AdcResolution {
    Bits10,
    #[default]
    Bits12,
}

impl AdcResolution {
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            AdcResolution::Bits10 => 10,
            AdcResolution::Bits12 => 12,
        }
    }

    /// Largest raw reading (1023 or 4095)
    #[must_use]
    pub const fn full_scale(self) -> u16 {
        (1 << self.bits()) - 1
    }

    /// Raw reading of a centered axis (512 or 2048)
    #[must_use]
    pub const fn midpoint(self) -> u16 {
        1 << (self.bits() - 1)
    }
}

impl TryFrom<u8> for AdcResolution {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            10 => Ok(AdcResolution::Bits10),
            12 => Ok(AdcResolution::Bits12),
            other => Err(format!("adc_bits must be 10 or 12, got {}", other)),
        }
    }
}

/// Normalizes a raw ADC reading to -1.0..=1.0.
///
/// Readings below the midpoint are divided by the midpoint; readings above it
/// by the remaining span up to full scale, so both ends of travel reach
/// exactly ±1.0.
///
/// # Examples
///
/// ```
/// use motion_remote::input::{normalize_axis, AdcResolution};
///
/// assert_eq!(normalize_axis(2048, AdcResolution::Bits12), 0.0);
/// assert_eq!(normalize_axis(4095, AdcResolution::Bits12), 1.0);
/// assert_eq!(normalize_axis(0, AdcResolution::Bits12), -1.0);
/// assert_eq!(normalize_axis(512, AdcResolution::Bits10), 0.0);
/// ```
#[must_use]
pub fn normalize_axis(raw: u16, resolution: AdcResolution) -> f32 {
    let midpoint = f32::from(resolution.midpoint());
    let offset = f32::from(raw) - midpoint;
    let span = if offset < 0.0 {
        midpoint
    } else {
        f32::from(resolution.full_scale()) - midpoint
    };

    (offset / span).clamp(-1.0, 1.0)
}

/// Samples the configured buttons and axes
#[derive(Debug)]
pub struct InputSampler<P> {
    pins: P,
    buttons: Vec<ButtonConfig>,
    axes: Vec<AxisConfig>,
    resolution: AdcResolution,
}

impl<P: InputPins> InputSampler<P> {
    /// Creates a sampler for a validated input configuration.
    ///
    /// Buttons beyond the 8-bit mask and axes beyond [`MAX_AXES`] are ignored.
    pub fn new(pins: P, config: &InputConfig) -> Self {
        Self {
            pins,
            buttons: config
                .buttons
                .iter()
                .filter(|b| (b.bit as usize) < MAX_BUTTONS)
                .cloned()
                .collect(),
            axes: config.axes.iter().take(MAX_AXES).cloned().collect(),
            resolution: config.adc_bits,
        }
    }

    /// Reads every configured button and axis.
    ///
    /// A pin that cannot be read counts as released (buttons) or centered (axes).
    pub fn sample(&mut self) -> InputState {
        let mut state = InputState::default();

        for button in &self.buttons {
            match self.pins.digital_read(button.pin) {
                Ok(is_high) => {
                    if button.active_level.is_active(is_high) {
                        state.buttons |= 1 << button.bit;
                    }
                }
                Err(e) => debug!("Button '{}' unreadable: {}", button.name, e),
            }
        }

        for (slot, axis) in self.axes.iter().enumerate() {
            match self.pins.analog_read(axis.pin) {
                Ok(raw) => state.joystick[slot] = normalize_axis(raw, self.resolution),
                Err(e) => debug!("Axis '{}' unreadable: {}", axis.name, e),
            }
        }

        state
    }

    /// Number of configured buttons.
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Number of configured axes.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::pins::MockInputPins;
    use super::*;
    use crate::error::MotionRemoteError;
    use mockall::predicate::eq;

    fn button(name: &str, pin: u32, bit: u8, active_level: ActiveLevel) -> ButtonConfig {
        ButtonConfig {
            name: name.to_string(),
            pin,
            bit,
            active_level,
        }
    }

    fn axis(name: &str, pin: u32) -> AxisConfig {
        AxisConfig {
            name: name.to_string(),
            pin,
        }
    }

    fn input_config(buttons: Vec<ButtonConfig>, axes: Vec<AxisConfig>) -> InputConfig {
        InputConfig {
            adc_bits: AdcResolution::Bits12,
            buttons,
            axes,
            ..InputConfig::default()
        }
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_12_bit_endpoints() {
        assert_eq!(normalize_axis(2048, AdcResolution::Bits12), 0.0);
        assert_eq!(normalize_axis(4095, AdcResolution::Bits12), 1.0);
        assert_eq!(normalize_axis(0, AdcResolution::Bits12), -1.0);
    }

    #[test]
    fn test_normalize_10_bit_endpoints() {
        assert_eq!(normalize_axis(512, AdcResolution::Bits10), 0.0);
        assert_eq!(normalize_axis(1023, AdcResolution::Bits10), 1.0);
        assert_eq!(normalize_axis(0, AdcResolution::Bits10), -1.0);
    }

    #[test]
    fn test_normalize_lower_half_uses_midpoint() {
        assert_eq!(normalize_axis(1024, AdcResolution::Bits12), -0.5);
        assert_eq!(normalize_axis(256, AdcResolution::Bits10), -0.5);
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        // A 12-bit reading fed to a 10-bit configuration
        assert_eq!(normalize_axis(4095, AdcResolution::Bits10), 1.0);
        assert_eq!(normalize_axis(u16::MAX, AdcResolution::Bits12), 1.0);
    }

    #[test]
    fn test_resolution_from_bits() {
        assert_eq!(AdcResolution::try_from(10), Ok(AdcResolution::Bits10));
        assert_eq!(AdcResolution::try_from(12), Ok(AdcResolution::Bits12));
        assert!(AdcResolution::try_from(0).is_err());
        assert!(AdcResolution::try_from(32).is_err());
        assert_eq!(AdcResolution::Bits10.midpoint(), 512);
        assert_eq!(AdcResolution::Bits12.full_scale(), 4095);
    }

    #[test]
    fn test_normalize_is_finite_for_every_reading() {
        for resolution in [AdcResolution::Bits10, AdcResolution::Bits12] {
            for raw in [0, 1, resolution.midpoint(), resolution.full_scale(), u16::MAX] {
                let value = normalize_axis(raw, resolution);
                assert!(value.is_finite(), "{:?} raw {} gave {}", resolution, raw, value);
            }
        }
    }

    #[test]
    fn test_normalize_is_monotonic() {
        let mut previous = -1.0f32;
        for raw in 0..=4095u16 {
            let value = normalize_axis(raw, AdcResolution::Bits12);
            assert!(value >= previous, "raw {} went backwards", raw);
            assert!((-1.0..=1.0).contains(&value));
            previous = value;
        }
    }

    // ==================== Button Tests ====================

    #[test]
    fn test_mixed_polarity_buttons_mask() {
        let mut pins = MockInputPins::new();
        pins.expect_digital_read().with(eq(5)).returning(|_| Ok(true)); // R, active high
        pins.expect_digital_read().with(eq(6)).returning(|_| Ok(true)); // FIRE, released
        pins.expect_digital_read().with(eq(12)).returning(|_| Ok(false)); // SWITCH, active low

        let config = input_config(
            vec![
                button("R", 5, 0, ActiveLevel::High),
                button("FIRE", 6, 1, ActiveLevel::Low),
                button("SWITCH", 12, 3, ActiveLevel::Low),
            ],
            vec![],
        );

        let state = InputSampler::new(pins, &config).sample();
        assert_eq!(state.buttons, 0b0000_1001);
        assert!(state.is_pressed(0));
        assert!(!state.is_pressed(1));
        assert!(state.is_pressed(3));
    }

    #[test]
    fn test_same_wiring_opposite_polarity() {
        for (level, expected) in [(ActiveLevel::High, 0b1), (ActiveLevel::Low, 0b0)] {
            let mut pins = MockInputPins::new();
            pins.expect_digital_read().returning(|_| Ok(true));

            let config = input_config(vec![button("A", 2, 0, level)], vec![]);
            assert_eq!(InputSampler::new(pins, &config).sample().buttons, expected);
        }
    }

    #[test]
    fn test_unreadable_button_counts_as_released() {
        let mut pins = MockInputPins::new();
        pins.expect_digital_read()
            .returning(|_| Err(MotionRemoteError::Input("gone".to_string())));

        let config = input_config(vec![button("A", 2, 7, ActiveLevel::Low)], vec![]);
        assert_eq!(InputSampler::new(pins, &config).sample().buttons, 0);
    }

    #[test]
    fn test_bit_seven_is_usable() {
        let mut pins = MockInputPins::new();
        pins.expect_digital_read().returning(|_| Ok(true));

        let config = input_config(vec![button("TOP", 3, 7, ActiveLevel::High)], vec![]);
        assert_eq!(InputSampler::new(pins, &config).sample().buttons, 0b1000_0000);
    }

    // ==================== Axis Tests ====================

    #[test]
    fn test_axes_fill_in_order() {
        let mut pins = MockInputPins::new();
        pins.expect_analog_read().with(eq(0)).returning(|_| Ok(4095));
        pins.expect_analog_read().with(eq(3)).returning(|_| Ok(1024));

        let config = input_config(vec![], vec![axis("x", 0), axis("y", 3)]);
        let state = InputSampler::new(pins, &config).sample();
        assert_eq!(state.joystick, [1.0, -0.5]);
    }

    #[test]
    fn test_single_axis_leaves_second_centered() {
        let mut pins = MockInputPins::new();
        pins.expect_analog_read().returning(|_| Ok(0));

        let config = input_config(vec![], vec![axis("x", 0)]);
        let mut sampler = InputSampler::new(pins, &config);
        assert_eq!(sampler.axis_count(), 1);
        assert_eq!(sampler.sample().joystick, [-1.0, 0.0]);
    }

    #[test]
    fn test_unreadable_axis_is_centered() {
        let mut pins = MockInputPins::new();
        pins.expect_analog_read()
            .returning(|_| Err(MotionRemoteError::Input("no adc".to_string())));

        let config = input_config(vec![], vec![axis("x", 0), axis("y", 1)]);
        assert_eq!(InputSampler::new(pins, &config).sample().joystick, [0.0, 0.0]);
    }

    #[test]
    fn test_default_resolution_axis_is_finite() {
        let mut pins = MockInputPins::new();
        pins.expect_analog_read().returning(|_| Ok(1));

        let config = InputConfig {
            axes: vec![axis("x", 0)],
            ..InputConfig::default()
        };
        let state = InputSampler::new(pins, &config).sample();
        assert!(state.joystick[0].is_finite());
        assert!(state.joystick[0] < -0.99);
    }

    #[test]
    fn test_no_inputs_configured() {
        let pins = MockInputPins::new();
        let config = input_config(vec![], vec![]);
        let mut sampler = InputSampler::new(pins, &config);

        assert_eq!(sampler.button_count(), 0);
        assert_eq!(sampler.sample(), InputState::default());
    }
}
