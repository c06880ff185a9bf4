//! Hardware abstraction traits for platform integration.
//!
//! The dimmer core never touches registers directly. Implement these traits
//! for your platform's pins, ADC, UART and timers, then hand the
//! implementations to [`Dimmer`](crate::Dimmer) and
//! [`PwmGenerator`](crate::PwmGenerator).

/// Trait for abstracting the LED output line.
///
/// Implement this for your LED hardware (GPIO output, open-drain driver,
/// inverted logic, etc.). Handle any hardware errors internally - this
/// method cannot fail.
///
/// Both the PWM generator and the dimmer controller need to drive the same
/// physical pin, so platforms typically implement this on a cheap shared
/// handle (a pin wrapped in a critical-section cell, or a clonable proxy).
pub trait LedPin {
    /// Drives the LED line. `true` turns the LED on.
    fn set_level(&mut self, on: bool);
}

/// Trait for reading the three push-button input lines.
///
/// Buttons are wired active-low with pull-ups: `true` means the line is
/// electrically high, i.e. the button is released.
pub trait ButtonPins {
    /// Returns the current level of each button line, `[PB1, PB2, PB3]`.
    fn read_levels(&mut self) -> [bool; 3];
}

/// Trait for the analog brightness sensor.
pub trait AnalogSensor {
    /// Acquires one 10-bit sample in `0..=1023`.
    ///
    /// May block until the conversion completes; the core treats this as a
    /// bounded-latency synchronous call.
    fn read(&mut self) -> u16;
}

/// Trait for the serial telemetry transmitter.
///
/// Only [`write_char`](SerialTx::write_char) must be provided; the string
/// and fixed-width decimal forms have default implementations on top of it.
/// Each write may block until transmit buffer space is available.
pub trait SerialTx {
    /// Transmits a single character.
    fn write_char(&mut self, c: char);

    /// Transmits a string, character by character.
    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
        }
    }

    /// Transmits `value` as a zero-padded decimal field of `width` digits.
    ///
    /// Values wider than the field are truncated to their least significant
    /// `width` digits.
    fn write_decimal(&mut self, value: u16, width: u8) {
        let mut divisor: u16 = 1;
        for _ in 1..width {
            divisor = divisor.saturating_mul(10);
        }

        loop {
            let digit = ((value / divisor) % 10) as u8;
            self.write_char((b'0' + digit) as char);
            divisor /= 10;
            if divisor == 0 {
                break;
            }
        }
    }
}

/// Trait for the one-shot blocking millisecond delay service.
pub trait DelayMs {
    /// Blocks for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u16);
}

/// Trait for a periodic hardware tick that can be started and stopped.
///
/// The platform wires one instance to the high-frequency PWM tick (calling
/// [`PwmGenerator::tick`](crate::PwmGenerator::tick)) and another to the
/// blink tick (calling [`BlinkTick::tick`](crate::BlinkTick::tick) every
/// [`BLINK_INTERVAL_MS`](crate::BLINK_INTERVAL_MS) milliseconds).
///
/// Both operations must be idempotent: the controller restarts the PWM tick
/// on every brightness update and stops both ticks on every pass through the
/// off state.
pub trait TickTimer {
    /// Starts (or restarts) the periodic tick.
    fn start(&mut self);

    /// Stops the periodic tick.
    fn stop(&mut self);
}
