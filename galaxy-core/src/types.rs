//! Core Types für die Projektor-Steuerung
//!
//! Kommandos (Schalter/WebSocket → Output-Task) und Snapshots
//! (Output-Task → WebSocket-Clients), ohne Hardware-Dependencies.

use rgb::RGB8;

use crate::error::CommandError;

/// Die vier unabhängig schaltbaren Modi des Projektors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelId {
    Power,
    Brightness,
    Colour,
    Motor,
}

impl ChannelId {
    /// Reihenfolge, in der der Output-Task die FSMs ausführt
    pub const ALL: [ChannelId; 4] = [
        ChannelId::Power,
        ChannelId::Brightness,
        ChannelId::Colour,
        ChannelId::Motor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelId::Power => "Power",
            ChannelId::Brightness => "Brightness",
            ChannelId::Colour => "Colour",
            ChannelId::Motor => "Motor",
        }
    }
}

impl TryFrom<&str> for ChannelId {
    type Error = CommandError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name {
            "Power" => Ok(Self::Power),
            "Brightness" => Ok(Self::Brightness),
            "Colour" => Ok(Self::Colour),
            "Motor" => Ok(Self::Motor),
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

/// RGBW-Farbe: RGB-Anteil plus separater Weiß-Kanal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbwColor {
    pub rgb: RGB8,
    pub w: u8,
}

impl RgbwColor {
    pub const OFF: RgbwColor = RgbwColor::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self {
            rgb: RGB8 { r, g, b },
            w,
        }
    }

    /// Dekodiert `0xRRGGBBWW`
    pub const fn from_packed(value: u32) -> Self {
        let [r, g, b, w] = value.to_be_bytes();
        Self::new(r, g, b, w)
    }

    pub const fn to_packed(self) -> u32 {
        u32::from_be_bytes([self.rgb.r, self.rgb.g, self.rgb.b, self.w])
    }
}

/// Nutzlast eines Custom-States
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomValue {
    /// Beliebige Farbe für die RGBW-Gruppe
    Colour(RgbwColor),
    /// Helligkeit oder Motor-Geschwindigkeit
    Level(u8),
}

impl CustomValue {
    /// Kompakte Darstellung für den Snapshot
    pub fn packed(self) -> u32 {
        match self {
            CustomValue::Colour(c) => c.to_packed(),
            CustomValue::Level(l) => u32::from(l),
        }
    }
}

/// Kommando an den Output-Task
///
/// Ein Schalter-Druck und eine Web-Nachricht für denselben Kanal erzeugen
/// dasselbe Kommando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// FSM des Kanals einen Schritt weiter
    Advance(ChannelId),
    /// Custom-Wert setzen und Custom-State aktivieren
    Custom(ChannelId, CustomValue),
    /// Snapshot an alle Clients senden, ohne Zustandsänderung
    Refresh,
}

impl Command {
    /// Dekodiert den `{id, mode, value}` Umschlag
    ///
    /// - `mode = 0`: weiterschalten (`value` wird ignoriert)
    /// - `mode = 1`: Custom-State mit `value` (Farbe als `0xRRGGBBWW`,
    ///   sonst Level 0..=255)
    pub fn from_envelope(id: ChannelId, mode: u8, value: Option<u32>) -> Result<Self, CommandError> {
        match mode {
            0 => Ok(Command::Advance(id)),
            1 => {
                let value = value.ok_or(CommandError::MissingValue)?;
                let payload = match id {
                    ChannelId::Power => return Err(CommandError::NoCustomState),
                    ChannelId::Colour => CustomValue::Colour(RgbwColor::from_packed(value)),
                    ChannelId::Brightness | ChannelId::Motor => CustomValue::Level(
                        u8::try_from(value).map_err(|_| CommandError::OutOfRange(value))?,
                    ),
                };
                Ok(Command::Custom(id, payload))
            }
            other => Err(CommandError::UnknownMode(other)),
        }
    }
}

/// JSON-Umschlag eines Web-Kommandos: `{"id":"Colour","mode":1,"value":...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Envelope {
    pub id: ChannelId,
    pub mode: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<u32>,
}

impl TryFrom<Envelope> for Command {
    type Error = CommandError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        Command::from_envelope(envelope.id, envelope.mode, envelope.value)
    }
}

/// Text-Protokoll der Weboberfläche: Button-ID oder "getStates"
impl TryFrom<&str> for Command {
    type Error = CommandError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        match text {
            "getStates" => Ok(Command::Refresh),
            other => ChannelId::try_from(other).map(Command::Advance),
        }
    }
}

/// Zustand eines Kanals zum Zeitpunkt der Änderung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelSnapshot {
    pub custom: bool,
    /// Index im Zyklus (nur wenn nicht custom)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub index: Option<u8>,
    /// Custom-Nutzlast (nur wenn custom)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub value: Option<u32>,
}

/// Konsistenter Schnappschuss aller vier FSMs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    #[cfg_attr(feature = "serde", serde(rename = "Power"))]
    pub power: ChannelSnapshot,
    #[cfg_attr(feature = "serde", serde(rename = "Brightness"))]
    pub brightness: ChannelSnapshot,
    #[cfg_attr(feature = "serde", serde(rename = "Colour"))]
    pub colour: ChannelSnapshot,
    #[cfg_attr(feature = "serde", serde(rename = "Motor"))]
    pub motor: ChannelSnapshot,
}

impl Snapshot {
    pub fn channel(&self, id: ChannelId) -> &ChannelSnapshot {
        match id {
            ChannelId::Power => &self.power,
            ChannelId::Brightness => &self.brightness,
            ChannelId::Colour => &self.colour,
            ChannelId::Motor => &self.motor,
        }
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> &mut ChannelSnapshot {
        match id {
            ChannelId::Power => &mut self.power,
            ChannelId::Brightness => &mut self.brightness,
            ChannelId::Colour => &mut self.colour,
            ChannelId::Motor => &mut self.motor,
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RgbwColor {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "rgbw({}, {}, {}, {})",
            self.rgb.r,
            self.rgb.g,
            self.rgb.b,
            self.w
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CustomValue {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CustomValue::Colour(c) => defmt::write!(fmt, "Colour {}", c),
            CustomValue::Level(l) => defmt::write!(fmt, "Level {}", l),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::Advance(id) => defmt::write!(fmt, "Advance {{ {} }}", id),
            Command::Custom(id, value) => defmt::write!(fmt, "Custom {{ {}: {} }}", id, value),
            Command::Refresh => defmt::write!(fmt, "Refresh"),
        }
    }
}
