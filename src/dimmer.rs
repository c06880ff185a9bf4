//! The mode state machine driving the dimmer.
//!
//! [`Dimmer`] is the control-loop side of the system: it consumes button
//! press flags, arms and disarms blink modulation, refreshes the brightness
//! from the sensor and emits telemetry, advancing its [`Mode`] by at most
//! one transition per pass.

use crate::OFF_SETTLE_DELAY_MS;
use crate::button::{Button, ButtonBank, WakeFlag};
use crate::hal::{AnalogSensor, ButtonPins, DelayMs, LedPin, SerialTx, TickTimer};
use crate::pwm::SharedPwm;

/// The operating mode of the dimmer.
///
/// Transitions are keyed by one-shot button press flags: PB1 toggles the
/// system on and off, PB2 toggles blink modulation, PB3 toggles telemetry.
/// The system always boots into [`Off`](Mode::Off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// LED dark, blink disarmed, both tick timers stopped.
    #[default]
    Off,
    /// LED blinking at maximum brightness while the system is otherwise off.
    OffBlink,
    /// LED steady at sensor-driven brightness.
    On,
    /// LED blinking at sensor-driven brightness.
    OnBlink,
    /// As [`On`](Mode::On), plus one telemetry line per pass.
    TransmitOn,
    /// As [`OnBlink`](Mode::OnBlink), plus one telemetry line per pass.
    TransmitBlink,
}

/// The top-level dimmer controller.
///
/// Owns the control-loop side of the system: the button bank, the sensor,
/// the serial transmitter, the settle-delay service and the two tick timers.
/// The shared PWM record and the wake flag are borrowed, since the tick
/// handlers and the button interrupt reach them too.
///
/// Drive it by calling [`poll`](Dimmer::poll) from the main loop, once per
/// control-loop pass. Each pass runs the current mode's actions, takes at
/// most one transition, and clears the consumed press flags.
pub struct Dimmer<'a, P, L, S, TX, D, TP, TB>
where
    P: ButtonPins,
    L: LedPin,
    S: AnalogSensor,
    TX: SerialTx,
    D: DelayMs,
    TP: TickTimer,
    TB: TickTimer,
{
    shared: &'a SharedPwm,
    wake: &'a WakeFlag,
    buttons: ButtonBank<P>,
    led: L,
    sensor: S,
    serial: TX,
    delay: D,
    pwm_timer: TP,
    blink_timer: TB,
    mode: Mode,
}

impl<'a, P, L, S, TX, D, TP, TB> Dimmer<'a, P, L, S, TX, D, TP, TB>
where
    P: ButtonPins,
    L: LedPin,
    S: AnalogSensor,
    TX: SerialTx,
    D: DelayMs,
    TP: TickTimer,
    TB: TickTimer,
{
    /// Creates a controller in [`Mode::Off`].
    ///
    /// `pwm_timer` must be wired to drive
    /// [`PwmGenerator::tick`](crate::PwmGenerator::tick) and `blink_timer`
    /// to drive [`BlinkTick::tick`](crate::BlinkTick::tick).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shared: &'a SharedPwm,
        wake: &'a WakeFlag,
        pins: P,
        led: L,
        sensor: S,
        serial: TX,
        delay: D,
        pwm_timer: TP,
        blink_timer: TB,
    ) -> Self {
        Self {
            shared,
            wake,
            buttons: ButtonBank::new(pins),
            led,
            sensor,
            serial,
            delay,
            pwm_timer,
            blink_timer,
            mode: Mode::Off,
        }
    }

    /// Runs one control-loop pass.
    ///
    /// Samples the buttons if the wake flag fired since the last pass, runs
    /// the current mode's actions and transition checks, then clears the
    /// press flags. Press flags are leveled: several release edges between
    /// two passes collapse into a single transition.
    pub fn poll(&mut self) {
        if self.wake.take() {
            self.buttons.sample();
        }

        self.step();
        self.buttons.clear_pressed();
    }

    /// Returns the current operating mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn step(&mut self) {
        match self.mode {
            Mode::Off => {
                self.delay.delay_ms(OFF_SETTLE_DELAY_MS);
                self.led.set_level(false);
                self.stop_blink();
                self.pwm_timer.stop();
                self.blink_timer.stop();

                if self.buttons.pressed(Button::Pb1) {
                    self.mode = Mode::On;
                } else if self.buttons.pressed(Button::Pb2) {
                    self.mode = Mode::OffBlink;
                }
            }

            Mode::OffBlink => {
                self.start_blink();
                let max_duty = self.shared.with(|state| state.period());
                self.update_brightness(Some(max_duty));

                if self.buttons.pressed(Button::Pb2) {
                    self.mode = Mode::Off;
                    self.stop_blink();
                }
            }

            Mode::On => {
                self.update_brightness(None);

                if self.buttons.pressed(Button::Pb1) {
                    self.mode = Mode::Off;
                } else if self.buttons.pressed(Button::Pb2) {
                    self.mode = Mode::OnBlink;
                } else if self.buttons.pressed(Button::Pb3) {
                    self.mode = Mode::TransmitOn;
                }
            }

            Mode::OnBlink => {
                self.start_blink();
                self.update_brightness(None);

                if self.buttons.pressed(Button::Pb2) {
                    self.mode = Mode::On;
                    self.stop_blink();
                } else if self.buttons.pressed(Button::Pb3) {
                    self.mode = Mode::TransmitBlink;
                }
            }

            Mode::TransmitOn => {
                self.update_brightness(None);
                self.transmit_telemetry();

                if self.buttons.pressed(Button::Pb1) {
                    self.mode = Mode::Off;
                } else if self.buttons.pressed(Button::Pb2) {
                    self.mode = Mode::TransmitBlink;
                } else if self.buttons.pressed(Button::Pb3) {
                    self.mode = Mode::On;
                }
            }

            Mode::TransmitBlink => {
                self.start_blink();
                self.update_brightness(None);
                self.transmit_telemetry();

                if self.buttons.pressed(Button::Pb2) {
                    self.mode = Mode::TransmitOn;
                    self.stop_blink();
                } else if self.buttons.pressed(Button::Pb3) {
                    self.mode = Mode::OnBlink;
                }
            }
        }
    }

    /// Arms blink modulation and (re)starts the blink timer.
    fn start_blink(&mut self) {
        self.shared.with(|state| state.set_blink_enabled(true));
        self.blink_timer.start();
    }

    /// Disarms blink modulation and stops the blink timer.
    fn stop_blink(&mut self) {
        self.shared.with(|state| state.set_blink_enabled(false));
        self.blink_timer.stop();
    }

    /// Acquires a fresh sensor sample and recomputes the duty cycles.
    ///
    /// Restarts the PWM timer first, so the frame tick is running whenever
    /// a brightness is in effect. `override_duty` bypasses the sensor
    /// scaling; the off-blink mode uses it to force maximum brightness.
    fn update_brightness(&mut self, override_duty: Option<u8>) {
        self.pwm_timer.start();
        let sample = self.sensor.read();
        self.shared
            .with(|state| state.apply_sample(sample, override_duty));
    }

    /// Emits one telemetry line: the active duty as a percentage of the
    /// period (three digits), a space, the raw sensor sample (four digits),
    /// and a newline.
    fn transmit_telemetry(&mut self) {
        let (duty_percent, sample) = self.shared.with(|state| {
            let percent =
                u32::from(state.active_duty()) * 100 / u32::from(state.period());
            (percent as u16, state.last_sample())
        });

        self.serial.write_decimal(duty_percent, 3);
        self.serial.write_char(' ');
        self.serial.write_decimal(sample, 4);
        self.serial.write_char('\n');
    }
}
