//! Blink modulation tick handler.

use crate::pwm::SharedPwm;

/// Advances the blink phase from the periodic blink timer.
///
/// The platform calls [`tick`](BlinkTick::tick) every
/// [`BLINK_INTERVAL_MS`](crate::BLINK_INTERVAL_MS) milliseconds while the
/// blink timer runs. Arming and disarming happen on the controller side
/// ([`Dimmer`](crate::Dimmer)); a tick while disarmed is a no-op.
pub struct BlinkTick<'a> {
    shared: &'a SharedPwm,
}

impl<'a> BlinkTick<'a> {
    /// Creates a tick handler over the shared PWM record.
    pub const fn new(shared: &'a SharedPwm) -> Self {
        Self { shared }
    }

    /// Toggles the blink phase and updates the active duty accordingly:
    /// the blink brightness during the illuminated half, zero during the
    /// dark half.
    pub fn tick(&mut self) {
        self.shared.with(|state| state.blink_tick());
    }
}
