//! Software PWM: shared duty-cycle state and the tick-side generator.
//!
//! The PWM signal is rendered entirely in software: a high-frequency timer
//! tick advances a wrapping frame counter and drives the LED line high while
//! the counter is below the active duty cycle. The duty-cycle record is
//! shared between the control loop and the preemptive tick handlers, so all
//! access goes through [`SharedPwm`], a critical-section guarded cell.

use crate::ADC_MAX;
use crate::hal::LedPin;
use core::cell::RefCell;
use core::num::NonZeroU8;
use critical_section::Mutex;

/// Validated PWM configuration.
///
/// The frame length is a [`NonZeroU8`], so the duty-percentage division can
/// never be a divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    period: NonZeroU8,
}

impl PwmConfig {
    /// Default configuration: 50 ticks per PWM frame.
    pub const DEFAULT: Self = match NonZeroU8::new(50) {
        Some(period) => Self { period },
        None => unreachable!(),
    };

    /// Creates a configuration with the given frame length.
    pub const fn new(period: NonZeroU8) -> Self {
        Self { period }
    }

    /// Creates a configuration from a raw tick count.
    ///
    /// # Errors
    /// * `ZeroPeriod` - `period` is zero
    pub const fn from_ticks(period: u8) -> Result<Self, ConfigError> {
        match NonZeroU8::new(period) {
            Some(period) => Ok(Self { period }),
            None => Err(ConfigError::ZeroPeriod),
        }
    }

    /// Returns the frame length in ticks.
    pub const fn period(&self) -> u8 {
        self.period.get()
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The PWM frame length must be at least one tick.
    ZeroPeriod,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPeriod => {
                write!(f, "PWM period must be at least one tick")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// The complete duty-cycle state of the dimmer.
///
/// Written by the control loop (brightness updates, blink arm/disarm) and by
/// the blink tick (phase toggles), read by the PWM tick every frame tick.
/// All duty fields stay within `0..=period`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmState {
    config: PwmConfig,
    /// Brightness derived from the latest sensor sample or an override.
    base_duty: u8,
    /// Snapshot of `base_duty` used for the illuminated half of a blink.
    blink_duty: u8,
    /// The duty cycle the PWM tick actually renders this frame.
    active_duty: u8,
    blink_enabled: bool,
    /// `true` while the blink is in its illuminated half-cycle.
    blink_phase: bool,
    /// Most recent 10-bit sensor reading.
    last_sample: u16,
}

impl PwmState {
    /// Creates the boot state: everything off, blink disarmed.
    pub const fn new(config: PwmConfig) -> Self {
        Self {
            config,
            base_duty: 0,
            blink_duty: 0,
            active_duty: 0,
            blink_enabled: false,
            blink_phase: false,
            last_sample: 0,
        }
    }

    /// Returns the PWM frame length in ticks.
    pub const fn period(&self) -> u8 {
        self.config.period()
    }

    /// Returns the sensor-derived (or overridden) brightness.
    pub const fn base_duty(&self) -> u8 {
        self.base_duty
    }

    /// Returns the brightness used during the illuminated blink half.
    pub const fn blink_duty(&self) -> u8 {
        self.blink_duty
    }

    /// Returns the duty cycle currently being rendered.
    pub const fn active_duty(&self) -> u8 {
        self.active_duty
    }

    /// Returns whether blink modulation is armed.
    pub const fn blink_enabled(&self) -> bool {
        self.blink_enabled
    }

    /// Returns whether the blink is in its illuminated half-cycle.
    pub const fn blink_phase(&self) -> bool {
        self.blink_phase
    }

    /// Returns the most recent sensor sample.
    pub const fn last_sample(&self) -> u16 {
        self.last_sample
    }

    /// Scales a 10-bit sample onto the frame length: `sample * period / 1023`.
    ///
    /// Full scale (1023) maps to the full period; the result is always within
    /// `0..=period`.
    pub fn scale_sample(&self, sample: u16) -> u8 {
        let sample = sample.min(ADC_MAX);
        ((u32::from(sample) * u32::from(self.period())) / u32::from(ADC_MAX)) as u8
    }

    /// Records a fresh sensor sample and recomputes the duty cycles.
    ///
    /// Without an override the base duty is scaled from the sample; an
    /// override bypasses the sensor scaling (clamped to the period). While
    /// blink is armed the illuminated-half brightness is refreshed to the new
    /// base duty so blinking tracks the live reading, and the active duty is
    /// reconciled with the current blink phase.
    pub fn apply_sample(&mut self, sample: u16, override_duty: Option<u8>) {
        self.last_sample = sample;
        self.base_duty = match override_duty {
            Some(duty) => duty.min(self.period()),
            None => self.scale_sample(sample),
        };

        if self.blink_enabled {
            self.blink_duty = self.base_duty;
            self.active_duty = if self.blink_phase { self.blink_duty } else { 0 };
        } else {
            self.active_duty = self.base_duty;
        }
    }

    /// Arms or disarms blink modulation.
    pub fn set_blink_enabled(&mut self, enabled: bool) {
        self.blink_enabled = enabled;
    }

    /// Advances the blink by one half-cycle.
    ///
    /// Toggles the phase and switches the active duty between the blink
    /// brightness and zero. Does nothing while blink is disarmed.
    pub fn blink_tick(&mut self) {
        if self.blink_enabled {
            self.blink_phase = !self.blink_phase;
            self.active_duty = if self.blink_phase { self.blink_duty } else { 0 };
        }
    }

    /// Resolves the duty cycle to render this PWM tick.
    ///
    /// While blink is disarmed the active duty follows the base duty; while
    /// armed it is whatever the blink tick last wrote.
    pub fn resolve_active_duty(&mut self) -> u8 {
        if !self.blink_enabled {
            self.active_duty = self.base_duty;
        }
        self.active_duty
    }
}

/// [`PwmState`] behind a critical section, shared between the control loop
/// and the tick handlers.
///
/// Tick handlers preempt the control loop arbitrarily, so every multi-field
/// update must happen inside [`with`](SharedPwm::with); a preempting handler
/// then never observes a partially-updated record. `new` is `const`, so the
/// cell can live in a `static` for interrupt handlers to reach.
pub struct SharedPwm {
    inner: Mutex<RefCell<PwmState>>,
}

impl SharedPwm {
    /// Creates the shared record in its boot state.
    pub const fn new(config: PwmConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(PwmState::new(config))),
        }
    }

    /// Runs `f` on the state inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut PwmState) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.inner.borrow(cs).borrow_mut()))
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> PwmState {
        self.with(|state| *state)
    }
}

/// Renders the shared duty cycle onto the LED line, one frame tick at a time.
///
/// Call [`tick`](PwmGenerator::tick) from the high-frequency timer handler.
/// Each tick advances the frame counter modulo the period and drives the LED
/// high while the counter is below the active duty, producing an intensity
/// proportional to `active_duty / period`.
pub struct PwmGenerator<'a, L: LedPin> {
    shared: &'a SharedPwm,
    led: L,
    counter: u8,
}

impl<'a, L: LedPin> PwmGenerator<'a, L> {
    /// Creates a generator with the LED driven low.
    pub fn new(shared: &'a SharedPwm, mut led: L) -> Self {
        led.set_level(false);
        Self {
            shared,
            led,
            counter: 0,
        }
    }

    /// Renders one PWM frame tick.
    pub fn tick(&mut self) {
        let (period, active_duty) = self
            .shared
            .with(|state| (state.period(), state.resolve_active_duty()));

        self.counter = (self.counter + 1) % period;
        self.led.set_level(self.counter < active_duty);
    }

    /// Returns the current position within the PWM frame.
    pub fn counter(&self) -> u8 {
        self.counter
    }
}
