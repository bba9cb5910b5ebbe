//! Fake-Hardware für die Host-Tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{self, InputPin};
use embedded_hal::pwm::{self, ErrorKind, SetDutyCycle};

// ============================================================================
// PWM-Kanal
// ============================================================================

/// Protokolliert jeden Duty-Schreibzugriff; Klone teilen das Protokoll
#[derive(Clone, Default)]
pub struct FakeChannel {
    writes: Rc<RefCell<Vec<u16>>>,
    fail: Rc<Cell<bool>>,
}

impl FakeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<u16> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn last(&self) -> Option<u16> {
        self.writes.borrow().last().copied()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl pwm::ErrorType for FakeChannel {
    type Error = ErrorKind;
}

impl SetDutyCycle for FakeChannel {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.fail.get() {
            return Err(ErrorKind::Other);
        }
        self.writes.borrow_mut().push(duty);
        Ok(())
    }
}

// ============================================================================
// Taster
// ============================================================================

/// Active-low Leitung, vom Test umschaltbar
#[derive(Clone, Default)]
pub struct FakeLine {
    low: Rc<Cell<bool>>,
}

impl FakeLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.low.set(true);
    }

    pub fn release(&self) {
        self.low.set(false);
    }
}

impl digital::ErrorType for FakeLine {
    type Error = core::convert::Infallible;
}

impl InputPin for FakeLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.low.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.low.get())
    }
}

// ============================================================================
// Projektor-Rig
// ============================================================================

/// Alle sechs Kanäle, als Klone für Assertions nach dem Einbau
#[derive(Clone, Default)]
pub struct Channels {
    pub red: FakeChannel,
    pub green: FakeChannel,
    pub blue: FakeChannel,
    pub white: FakeChannel,
    pub projector: FakeChannel,
    pub motor: FakeChannel,
}

impl Channels {
    pub fn rig(&self) -> galaxy_core::Rig<FakeChannel> {
        galaxy_core::Rig::new(
            galaxy_core::RgbwOutput::new(
                self.red.clone(),
                self.green.clone(),
                self.blue.clone(),
                self.white.clone(),
            ),
            galaxy_core::PwmOutput::new(self.projector.clone()),
            galaxy_core::PwmOutput::new(self.motor.clone()),
        )
    }

    pub fn total_writes(&self) -> usize {
        [
            &self.red,
            &self.green,
            &self.blue,
            &self.white,
            &self.projector,
            &self.motor,
        ]
        .iter()
        .map(|c| c.write_count())
        .sum()
    }
}
