//! Shared test infrastructure for pwm-dimmer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use pwm_dimmer::hal::{AnalogSensor, ButtonPins, DelayMs, LedPin, SerialTx, TickTimer};
use pwm_dimmer::{Dimmer, SharedPwm, WakeFlag};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ============================================================================
// Mock LED pin
// ============================================================================

/// Mock LED line. Clonable so the PWM generator and the dimmer controller
/// can hold handles to the same pin, like a real shared output.
#[derive(Clone, Default)]
pub struct SharedPin(Rc<Cell<bool>>);

impl SharedPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

impl LedPin for SharedPin {
    fn set_level(&mut self, on: bool) {
        self.0.set(on);
    }
}

// ============================================================================
// Mock button lines
// ============================================================================

/// Mock button lines with controllable levels. `true` = high = released.
#[derive(Clone)]
pub struct TestButtons(Rc<Cell<[bool; 3]>>);

impl TestButtons {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new([true; 3])))
    }

    /// Pulls button `idx` low (pressed).
    pub fn hold(&self, idx: usize) {
        let mut levels = self.0.get();
        levels[idx] = false;
        self.0.set(levels);
    }

    /// Lets button `idx` float high (released).
    pub fn release(&self, idx: usize) {
        let mut levels = self.0.get();
        levels[idx] = true;
        self.0.set(levels);
    }
}

impl ButtonPins for TestButtons {
    fn read_levels(&mut self) -> [bool; 3] {
        self.0.get()
    }
}

// ============================================================================
// Mock analog sensor
// ============================================================================

/// Mock sensor with a settable sample value and a read counter.
#[derive(Clone)]
pub struct TestSensor {
    value: Rc<Cell<u16>>,
    reads: Rc<Cell<u32>>,
}

impl TestSensor {
    pub fn new(value: u16) -> Self {
        Self {
            value: Rc::new(Cell::new(value)),
            reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn set(&self, value: u16) {
        self.value.set(value);
    }

    pub fn read_count(&self) -> u32 {
        self.reads.get()
    }
}

impl AnalogSensor for TestSensor {
    fn read(&mut self) -> u16 {
        self.reads.set(self.reads.get() + 1);
        self.value.get()
    }
}

// ============================================================================
// Mock serial transmitter
// ============================================================================

/// Mock serial transmitter that captures everything written to it.
#[derive(Clone, Default)]
pub struct SerialCapture(Rc<RefCell<heapless::String<256>>>);

impl SerialCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0.borrow().as_str().into()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn line_count(&self) -> usize {
        self.0.borrow().chars().filter(|&c| c == '\n').count()
    }
}

impl SerialTx for SerialCapture {
    fn write_char(&mut self, c: char) {
        let _ = self.0.borrow_mut().push(c);
    }
}

// ============================================================================
// Mock tick timer
// ============================================================================

/// Mock tick timer recording its running state and start/stop call counts.
#[derive(Clone, Default)]
pub struct TestTimer {
    running: Rc<Cell<bool>>,
    starts: Rc<Cell<u32>>,
    stops: Rc<Cell<u32>>,
}

impl TestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn start_count(&self) -> u32 {
        self.starts.get()
    }

    pub fn stop_count(&self) -> u32 {
        self.stops.get()
    }
}

impl TickTimer for TestTimer {
    fn start(&mut self) {
        self.running.set(true);
        self.starts.set(self.starts.get() + 1);
    }

    fn stop(&mut self) {
        self.running.set(false);
        self.stops.set(self.stops.get() + 1);
    }
}

// ============================================================================
// Mock delay service
// ============================================================================

/// Mock delay service recording every requested delay.
#[derive(Clone, Default)]
pub struct TestDelay(Rc<RefCell<heapless::Vec<u16, 64>>>);

impl TestDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<u16> {
        self.0.borrow().iter().copied().collect()
    }

    pub fn call_count(&self) -> usize {
        self.0.borrow().len()
    }
}

impl DelayMs for TestDelay {
    fn delay_ms(&mut self, ms: u16) {
        let _ = self.0.borrow_mut().push(ms);
    }
}

// ============================================================================
// Test rig
// ============================================================================

/// One set of mock peripherals. Handles are clonable, so the rig keeps a
/// view onto everything the dimmer owns.
pub struct Rig {
    pub pin: SharedPin,
    pub buttons: TestButtons,
    pub sensor: TestSensor,
    pub serial: SerialCapture,
    pub delay: TestDelay,
    pub pwm_timer: TestTimer,
    pub blink_timer: TestTimer,
}

impl Rig {
    pub fn new(sample: u16) -> Self {
        Self {
            pin: SharedPin::new(),
            buttons: TestButtons::new(),
            sensor: TestSensor::new(sample),
            serial: SerialCapture::new(),
            delay: TestDelay::new(),
            pwm_timer: TestTimer::new(),
            blink_timer: TestTimer::new(),
        }
    }
}

pub type TestDimmer<'a> =
    Dimmer<'a, TestButtons, SharedPin, TestSensor, SerialCapture, TestDelay, TestTimer, TestTimer>;

pub fn build_dimmer<'a>(shared: &'a SharedPwm, wake: &'a WakeFlag, rig: &Rig) -> TestDimmer<'a> {
    Dimmer::new(
        shared,
        wake,
        rig.buttons.clone(),
        rig.pin.clone(),
        rig.sensor.clone(),
        rig.serial.clone(),
        rig.delay.clone(),
        rig.pwm_timer.clone(),
        rig.blink_timer.clone(),
    )
}

/// Simulates a full press-and-release of button `idx` the way the hardware
/// delivers it: each edge signals the wake flag and the main loop polls.
/// After this returns the release edge has been consumed and any transition
/// taken; the new mode's actions run on the caller's next poll.
pub fn click(dimmer: &mut TestDimmer<'_>, rig: &Rig, wake: &WakeFlag, idx: usize) {
    rig.buttons.hold(idx);
    wake.signal();
    dimmer.poll();

    rig.buttons.release(idx);
    wake.signal();
    dimmer.poll();
}
