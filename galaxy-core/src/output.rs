//! PWM-Ausgänge
//!
//! `PwmOutput` kapselt einen einzelnen Hardware-Kanal (LED oder Motor) und
//! merkt sich den zuletzt geschriebenen Wert. Der Output-Task ruft die
//! Zustands-Aktionen in einer engen Schleife auf und die meisten Aktionen
//! schreiben jeden Frame denselben Wert; solche Schreibzugriffe werden
//! unterdrückt.
//!
//! # Implementierungen von `SetDutyCycle`
//! - **Production:** LEDC-Kanal des ESP32-C6
//! - **Testing:** zählender Fake-Kanal

use embedded_hal::pwm::SetDutyCycle;
use rgb::RGB8;

use crate::error::OutputError;
use crate::types::RgbwColor;

/// Maximaler Intensitätswert (8 bit)
pub const MAX_LEVEL: u8 = u8::MAX;

pub struct PwmOutput<P> {
    channel: P,
    level: u8,
}

impl<P: SetDutyCycle> PwmOutput<P> {
    /// Der Kanal startet mit Duty 0 (so konfiguriert die Firmware LEDC)
    pub fn new(channel: P) -> Self {
        Self { channel, level: 0 }
    }

    /// Setzt die Intensität, schreibt aber nur bei Änderung
    ///
    /// Schlägt der Hardware-Zugriff fehl, bleibt der gemerkte Wert
    /// unverändert, damit der nächste Frame es erneut versucht.
    pub fn set(&mut self, value: u8) -> Result<(), OutputError> {
        if value == self.level {
            return Ok(());
        }

        self.channel
            .set_duty_cycle_fraction(u16::from(value), u16::from(MAX_LEVEL))
            .map_err(|_| OutputError::WriteFailed)?;
        self.level = value;
        Ok(())
    }

    /// Wie `set`, aber für berechnete Werte: außerhalb 0..=255 wird abgelehnt
    pub fn set_level(&mut self, value: i32) -> Result<(), OutputError> {
        let value = u8::try_from(value).map_err(|_| OutputError::OutOfRange(value))?;
        self.set(value)
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn channel(&self) -> &P {
        &self.channel
    }
}

/// Vier PWM-Kanäle als eine RGBW-Gruppe
///
/// Keine Atomarität über die Kanäle: jeder Kanal wird einzeln gesetzt.
pub struct RgbwOutput<P> {
    red: PwmOutput<P>,
    green: PwmOutput<P>,
    blue: PwmOutput<P>,
    white: PwmOutput<P>,
}

impl<P: SetDutyCycle> RgbwOutput<P> {
    pub fn new(red: P, green: P, blue: P, white: P) -> Self {
        Self {
            red: PwmOutput::new(red),
            green: PwmOutput::new(green),
            blue: PwmOutput::new(blue),
            white: PwmOutput::new(white),
        }
    }

    pub fn set(&mut self, red: u8, green: u8, blue: u8, white: u8) -> Result<(), OutputError> {
        self.red.set(red)?;
        self.green.set(green)?;
        self.blue.set(blue)?;
        self.white.set(white)
    }

    pub fn set_color(&mut self, color: RgbwColor) -> Result<(), OutputError> {
        self.set(color.rgb.r, color.rgb.g, color.rgb.b, color.w)
    }

    /// Berechnete Kanalwerte, jeweils mit Bereichsprüfung
    pub fn set_levels(&mut self, red: i32, green: i32, blue: i32, white: i32) -> Result<(), OutputError> {
        self.red.set_level(red)?;
        self.green.set_level(green)?;
        self.blue.set_level(blue)?;
        self.white.set_level(white)
    }

    pub fn color(&self) -> RgbwColor {
        RgbwColor {
            rgb: RGB8 {
                r: self.red.level(),
                g: self.green.level(),
                b: self.blue.level(),
            },
            w: self.white.level(),
        }
    }

    pub fn off(&mut self) -> Result<(), OutputError> {
        self.set(0, 0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    #[derive(Default)]
    struct CountingChannel {
        writes: usize,
        duty: u16,
    }

    impl ErrorType for CountingChannel {
        type Error = Infallible;
    }

    impl SetDutyCycle for CountingChannel {
        fn max_duty_cycle(&self) -> u16 {
            255
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.writes += 1;
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_set_writes_once_for_same_value() {
        let mut out = PwmOutput::new(CountingChannel::default());
        out.set(200).unwrap();
        out.set(200).unwrap();
        out.set(0).unwrap();
        assert_eq!(out.channel().writes, 2);
        assert_eq!(out.channel().duty, 0);
        assert_eq!(out.level(), 0);
    }

    #[test]
    fn test_initial_zero_is_not_written() {
        let mut out = PwmOutput::new(CountingChannel::default());
        out.set(0).unwrap();
        assert_eq!(out.channel().writes, 0);
    }

    #[test]
    fn test_set_level_range() {
        let mut out = PwmOutput::new(CountingChannel::default());
        assert_eq!(out.set_level(256), Err(OutputError::OutOfRange(256)));
        assert_eq!(out.set_level(-1), Err(OutputError::OutOfRange(-1)));
        assert_eq!(out.channel().writes, 0);
        out.set_level(255).unwrap();
        assert_eq!(out.channel().duty, 255);
    }

    #[test]
    fn test_rgbw_forwards_to_each_channel() {
        let mut rgbw = RgbwOutput::new(
            CountingChannel::default(),
            CountingChannel::default(),
            CountingChannel::default(),
            CountingChannel::default(),
        );
        rgbw.set(10, 0, 30, 0).unwrap();
        rgbw.set(10, 0, 30, 0).unwrap();
        assert_eq!(rgbw.red.channel().writes, 1);
        assert_eq!(rgbw.green.channel().writes, 0);
        assert_eq!(rgbw.blue.channel().writes, 1);
        assert_eq!(rgbw.color().rgb, RGB8 { r: 10, g: 0, b: 30 });
    }
}
