#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Dimmer`**: the mode state machine; one [`Dimmer::poll`] per control-loop pass
//! - **`Mode`**: the six operating modes (off, on, blinking, transmitting)
//! - **`SharedPwm`** / **`PwmState`**: the duty-cycle record shared between the control loop and the tick handlers
//! - **`PwmGenerator`**: renders the duty cycle onto the LED from the high-frequency tick
//! - **`BlinkTick`**: toggles the blink phase from the 500 ms tick
//! - **`ButtonBank`** / **`WakeFlag`**: release-edge detection and the interrupt-to-loop wake signal
//! - **Traits in [`hal`]**: the seams to implement for your pins, ADC, UART, delay and timers
//!
//! Duty cycles are integers in `0..=period`; the rendered LED intensity is
//! `active_duty / period`. Sensor samples are 10-bit (`0..=1023`).

pub mod blink;
pub mod button;
pub mod dimmer;
pub mod hal;
pub mod pwm;

pub use blink::BlinkTick;
pub use button::{Button, ButtonBank, WakeFlag};
pub use dimmer::{Dimmer, Mode};
pub use hal::{AnalogSensor, ButtonPins, DelayMs, LedPin, SerialTx, TickTimer};
pub use pwm::{ConfigError, PwmConfig, PwmGenerator, PwmState, SharedPwm};

/// Full-scale value of the 10-bit analog sensor.
pub const ADC_MAX: u16 = 1023;

/// Blink half-cycle length: the blink timer fires every 500 ms.
pub const BLINK_INTERVAL_MS: u16 = 500;

/// Settle delay taken on every pass through [`Mode::Off`].
pub const OFF_SETTLE_DELAY_MS: u16 = 20;
