//! Entprellter Taster, gebunden an genau ein Ziel
//!
//! ## Hardware
//!
//! Active-low Taster mit Pull-up. Kein Interrupt: `update()` wird vom
//! Input-Task in jedem Tick aufgerufen und liest den Pin-Pegel.
//!
//! ## Entprellung (asymmetrisch)
//!
//! | Flanke   | Verhalten                                                    |
//! |----------|--------------------------------------------------------------|
//! | Drücken  | sofort genau ein Ereignis, danach nichts solange gedrückt   |
//! | Loslassen| erst nach `release_quiet_ms` ununterbrochen High wieder frei |
//!
//! Die Ruhezeit zählt ab dem Loslassen, nicht ab dem Drücken. Jeder
//! Low-Pegel während der Ruhezeit (Prellen) startet sie neu.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;

use crate::error::{Error, InputError};
use crate::fsm::GenericFsm;

/// Ruhezeit nach dem Loslassen
pub const DEFAULT_RELEASE_QUIET_MS: u64 = 100;

/// Ziel eines Tastendrucks
pub trait PressHandler {
    fn on_press(&mut self) -> Result<(), Error>;
}

/// Standard-Bindung: ein Druck schaltet die FSM weiter
impl<C> PressHandler for &mut GenericFsm<C> {
    fn on_press(&mut self) -> Result<(), Error> {
        self.next_state()?;
        Ok(())
    }
}

/// Eigene Übergangsfunktion statt "weiter"
impl<F> PressHandler for F
where
    F: FnMut() -> Result<(), Error>,
{
    fn on_press(&mut self) -> Result<(), Error> {
        self()
    }
}

pub struct DebouncedSwitch<P, H> {
    pin: P,
    handler: H,
    pressed: bool,
    released_at: Option<u64>,
    release_quiet_ms: u64,
}

impl<P: InputPin, H: PressHandler> DebouncedSwitch<P, H> {
    pub fn new(pin: P, handler: H) -> Self {
        Self {
            pin,
            handler,
            pressed: false,
            released_at: None,
            release_quiet_ms: DEFAULT_RELEASE_QUIET_MS,
        }
    }

    pub fn with_release_quiet_ms(mut self, ms: u64) -> Self {
        self.release_quiet_ms = ms;
        self
    }

    /// Liest den Pin und löst bei neuer Druck-Flanke genau einmal aus
    ///
    /// Gibt `Ok(true)` zurück, wenn in diesem Aufruf eine Druck-Flanke
    /// erkannt und an den Handler gegeben wurde. Ob der Handler daraufhin
    /// etwas tut (z.B. `Gated` bei ausgeschaltetem Gerät), sieht der
    /// Taster nicht.
    pub fn update(&mut self, now_ms: u64) -> Result<bool, Error> {
        let low = self.pin.is_low().map_err(|_| InputError::ReadFailed)?;

        if low {
            // Ruhezeit ohne High-Abtastung abgelaufen: neuer Druck
            if self.quiet_elapsed(now_ms) {
                self.pressed = false;
            }
            // Prellen während der Ruhezeit: Timer neu starten
            self.released_at = None;
            if !self.pressed {
                self.pressed = true;
                self.handler.on_press()?;
                return Ok(true);
            }
            return Ok(false);
        }

        if self.pressed {
            if self.released_at.is_none() {
                self.released_at = Some(now_ms);
            } else if self.quiet_elapsed(now_ms) {
                self.pressed = false;
                self.released_at = None;
            }
        }
        Ok(false)
    }

    fn quiet_elapsed(&self, now_ms: u64) -> bool {
        self.pressed
            && self
                .released_at
                .is_some_and(|since| now_ms.saturating_sub(since) > self.release_quiet_ms)
    }

    /// Entprellter logischer Zustand
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

/// Single-writer Flag "Gerät ist an"
///
/// Der Output-Task schreibt nach jedem Kommando, die Schalter-Handler im
/// Input-Task lesen. Solange aus, werden alle Taster außer Power verworfen.
pub struct PowerGate {
    on: AtomicBool,
}

impl PowerGate {
    pub const fn new() -> Self {
        Self {
            on: AtomicBool::new(false),
        }
    }

    pub fn set(&self, on: bool) {
        self.on.store(on, Ordering::Release);
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }
}

impl Default for PowerGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Verwirft Drücke solange das Gerät aus ist
///
/// Ein verworfener Druck ist kein Fehler: `update()` meldet die Flanke
/// trotzdem mit `Ok(true)`.
pub struct Gated<'a, H> {
    gate: &'a PowerGate,
    inner: H,
}

impl<'a, H: PressHandler> Gated<'a, H> {
    pub fn new(gate: &'a PowerGate, inner: H) -> Self {
        Self { gate, inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: PressHandler> PressHandler for Gated<'_, H> {
    fn on_press(&mut self) -> Result<(), Error> {
        if !self.gate.is_on() {
            return Ok(());
        }
        self.inner.on_press()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct Line {
        low: bool,
    }

    impl ErrorType for Line {
        type Error = Infallible;
    }

    impl InputPin for Line {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low)
        }
    }

    fn three_states() -> GenericFsm<()> {
        let mut fsm = GenericFsm::new("Test");
        fsm.add_state(State::new("A")).unwrap();
        fsm.add_state(State::new("B")).unwrap();
        fsm.add_state(State::new("C")).unwrap();
        fsm
    }

    #[test]
    fn test_press_fires_once_while_held() {
        let mut fsm = three_states();
        let mut sw = DebouncedSwitch::new(Line { low: false }, &mut fsm);

        sw.pin_mut().low = true;
        assert_eq!(sw.update(0), Ok(true));
        assert_eq!(sw.update(10), Ok(false));
        assert_eq!(sw.update(500), Ok(false));
        assert!(sw.is_pressed());

        drop(sw);
        assert_eq!(fsm.current_state_index(), Some(1));
    }

    #[test]
    fn test_release_needs_quiet_period() {
        let mut fsm = three_states();
        let mut sw = DebouncedSwitch::new(Line { low: true }, &mut fsm);
        sw.update(0).unwrap();

        sw.pin_mut().low = false;
        sw.update(20).unwrap(); // Loslassen erkannt
        sw.update(100).unwrap();
        assert!(sw.is_pressed());
        sw.update(121).unwrap();
        assert!(!sw.is_pressed());
    }

    #[test]
    fn test_press_right_after_quiet_period_counts() {
        let mut fsm = three_states();
        let mut sw = DebouncedSwitch::new(Line { low: true }, &mut fsm);
        sw.update(0).unwrap();

        sw.pin_mut().low = false;
        sw.update(10).unwrap();
        sw.update(100).unwrap();
        // nächste Abtastung ist schon wieder Low
        sw.pin_mut().low = true;
        assert_eq!(sw.update(111), Ok(true));

        drop(sw);
        assert_eq!(fsm.current_state_index(), Some(2));
    }

    #[test]
    fn test_power_gate_default_off() {
        let gate = PowerGate::default();
        assert!(!gate.is_on());
        gate.set(true);
        assert!(gate.is_on());
    }
}
