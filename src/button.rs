//! Push-button sampling and release-edge detection.
//!
//! Buttons are active-low with pull-ups, so the "press event" is the release
//! edge: a sampled transition from electrically low back to high. Detection
//! is a single-sample edge check with no debounce filtering, matching the
//! hardware this core was written for; platforms with bouncy inputs should
//! filter in their [`ButtonPins`] implementation.

use crate::hal::ButtonPins;
use core::sync::atomic::{AtomicBool, Ordering};

/// Identifies one of the three push buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// On/off toggle button.
    Pb1,
    /// Blink enable/disable button.
    Pb2,
    /// Telemetry trigger button.
    Pb3,
}

impl Button {
    const fn index(self) -> usize {
        match self {
            Button::Pb1 => 0,
            Button::Pb2 => 1,
            Button::Pb3 => 2,
        }
    }
}

/// Edge-detection record for a single button line.
#[derive(Debug, Clone, Copy)]
struct ButtonState {
    /// One-shot press flag, set on a release edge and held until cleared.
    pressed: bool,
    /// Level read by the most recent sample. `true` = released.
    level: bool,
    /// Level read by the previous sample.
    prev_level: bool,
}

impl ButtonState {
    const RELEASED: Self = Self {
        pressed: false,
        level: true,
        prev_level: true,
    };
}

/// Samples the three button lines and exposes one-shot press flags.
///
/// The flags are leveled, not queued: several release edges between two
/// state-machine passes collapse into a single press. Flags are consumed by
/// the mode state machine and cleared once per control-loop pass via
/// [`clear_pressed`](ButtonBank::clear_pressed).
pub struct ButtonBank<P: ButtonPins> {
    pins: P,
    buttons: [ButtonState; 3],
}

impl<P: ButtonPins> ButtonBank<P> {
    /// Creates a bank with all buttons released and no pending presses.
    pub fn new(pins: P) -> Self {
        Self {
            pins,
            buttons: [ButtonState::RELEASED; 3],
        }
    }

    /// Reads all three lines and latches a press flag for each line that
    /// transitioned from pressed (low) to released (high) since the last
    /// sample. The previous level is always updated afterwards.
    pub fn sample(&mut self) {
        let levels = self.pins.read_levels();

        for (button, level) in self.buttons.iter_mut().zip(levels) {
            button.level = level;
            if button.level != button.prev_level && !button.prev_level && button.level {
                button.pressed = true;
            }
            button.prev_level = button.level;
        }
    }

    /// Returns the one-shot press flag for `button` without consuming it.
    pub fn pressed(&self, button: Button) -> bool {
        self.buttons[button.index()].pressed
    }

    /// Clears all three press flags. Idempotent.
    pub fn clear_pressed(&mut self) {
        for button in &mut self.buttons {
            button.pressed = false;
        }
    }
}

/// Wake notification shared between the button-change interrupt and the
/// control loop.
///
/// The interrupt handler calls [`signal`](WakeFlag::signal); the control
/// loop calls [`take`](WakeFlag::take) once per pass and samples the buttons
/// when it returns `true`. A signal is never lost, but signals arriving
/// between two passes coalesce into one.
pub struct WakeFlag(AtomicBool);

impl WakeFlag {
    /// Creates an unsignaled flag. Usable in statics.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Marks the flag signaled. Safe to call from interrupt context.
    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consumes the flag, returning whether it was signaled.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Default for WakeFlag {
    fn default() -> Self {
        Self::new()
    }
}
