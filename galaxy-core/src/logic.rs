//! Pure Business Logic Functions
//!
//! Intensitäts-Berechnungen ohne Hardware-Dependencies (testbar!)

use crate::types::RgbwColor;

/// Periode der Farb-Welle in ms (entspricht sin(t / 1000 s))
pub const WAVE_PERIOD_MS: u64 = 6283;

/// Skaliert einen Kanalwert mit der Helligkeit: `value * brightness / 255`
pub fn scale(value: u8, brightness: u8) -> u8 {
    ((u16::from(value) * u16::from(brightness)) / 255) as u8
}

/// Skaliert alle vier Kanäle einer Farbe
pub fn scale_color(color: RgbwColor, brightness: u8) -> RgbwColor {
    RgbwColor::new(
        scale(color.rgb.r, brightness),
        scale(color.rgb.g, brightness),
        scale(color.rgb.b, brightness),
        scale(color.w, brightness),
    )
}

/// Sinus-ähnliche Welle ohne libm
///
/// Dreieck 0 → 255 → 0 über `WAVE_PERIOD_MS`. `phase_ms` verschiebt die
/// Welle (ein Drittel der Periode = 120°).
pub fn wave(now_ms: u64, phase_ms: u64) -> u8 {
    let pos = (now_ms + phase_ms) % WAVE_PERIOD_MS;
    let half = WAVE_PERIOD_MS / 2;
    let ramp = if pos < half { pos } else { WAVE_PERIOD_MS - pos };
    ((ramp * 255) / half).min(255) as u8
}

/// Drei um je 120° versetzte Wellen für den "Cycle"-Effekt (R, G, B)
pub fn cycle_levels(now_ms: u64, brightness: u8) -> [i32; 3] {
    let third = WAVE_PERIOD_MS / 3;
    [0, third, 2 * third].map(|phase| i32::from(scale(wave(now_ms, phase), brightness)))
}

/// Eine gemeinsame Welle für den "Pulse"-Effekt
pub fn pulse_level(now_ms: u64, brightness: u8) -> i32 {
    i32::from(scale(wave(now_ms, 0), brightness))
}
