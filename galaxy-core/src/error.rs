//! Fehler-Typen für FSM, Ausgänge, Eingänge und Kommandos
//!
//! Alle Varianten sind `Copy`, damit sie ohne Allokation durch die Tasks
//! gereicht und dort geloggt werden können. Kein Fehler ist fatal: der
//! Aufrufer loggt und das Gerät rendert den letzten gültigen Zustand weiter.

use core::fmt;

/// Sammel-Fehler für alle Core-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Fsm(FsmError),
    Output(OutputError),
    Input(InputError),
    Command(CommandError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fsm(e) => write!(f, "fsm: {e}"),
            Self::Output(e) => write!(f, "output: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
        }
    }
}

// ============================================================================
// FSM
// ============================================================================

/// Fehler bei Zustandsübergängen und beim Aufbau einer FSM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmError {
    /// Noch kein Zustand registriert
    Empty,
    /// Zustandstabelle voll (siehe `MAX_STATES`)
    Full,
    /// Zustand mit diesem Namen existiert bereits
    DuplicateState,
    /// Zustand ist nicht in der Tabelle registriert
    UnknownState,
    /// Custom-State ohne Aktion installiert
    CustomStateWithoutAction,
    /// `use_custom_state()` ohne installierten Custom-State
    NoCustomState,
}

impl fmt::Display for FsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no states registered"),
            Self::Full => write!(f, "state table full"),
            Self::DuplicateState => write!(f, "duplicate state name"),
            Self::UnknownState => write!(f, "unknown state"),
            Self::CustomStateWithoutAction => write!(f, "custom state must have an action"),
            Self::NoCustomState => write!(f, "custom state must be installed before use"),
        }
    }
}

impl From<FsmError> for Error {
    fn from(e: FsmError) -> Self {
        Self::Fsm(e)
    }
}

// ============================================================================
// Ausgänge
// ============================================================================

/// Fehler beim Schreiben eines PWM-Kanals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// Wert außerhalb 0..=255
    OutOfRange(i32),
    /// Hardware hat den Duty-Cycle nicht übernommen
    WriteFailed,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(v) => write!(f, "value {v} outside 0..=255"),
            Self::WriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

// ============================================================================
// Eingänge
// ============================================================================

/// Fehler beim Lesen eines Schalter-Pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    ReadFailed,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ============================================================================
// Kommandos
// ============================================================================

/// Fehler beim Dekodieren eingehender Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Unbekannter Kanal- oder Kommando-Name
    UnknownCommand,
    /// `mode` ist weder 0 (weiter) noch 1 (custom)
    UnknownMode(u8),
    /// `mode = 1` ohne `value`
    MissingValue,
    /// Level-Wert größer als 255
    OutOfRange(u32),
    /// Der Kanal kennt keinen Custom-State
    NoCustomState,
    /// Nutzlast passt nicht zum Kanal (z.B. Level für Colour)
    ValueMismatch,
    /// Nachricht ist weder Text-Kommando noch gültiger JSON-Umschlag
    Malformed,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::UnknownMode(m) => write!(f, "unknown mode {m}"),
            Self::MissingValue => write!(f, "custom mode requires a value"),
            Self::OutOfRange(v) => write!(f, "level {v} outside 0..=255"),
            Self::NoCustomState => write!(f, "channel has no custom state"),
            Self::ValueMismatch => write!(f, "value does not fit channel"),
            Self::Malformed => write!(f, "malformed message"),
        }
    }
}

impl CommandError {
    /// Kurzer Text für Fehlermeldungen an Web-Clients
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::UnknownMode(_) => "unknown mode",
            Self::MissingValue => "custom mode requires a value",
            Self::OutOfRange(_) => "level outside 0..=255",
            Self::NoCustomState => "channel has no custom state",
            Self::ValueMismatch => "value does not fit channel",
            Self::Malformed => "malformed message",
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Fsm(e) => defmt::write!(fmt, "fsm: {}", e),
            Error::Output(e) => defmt::write!(fmt, "output: {}", e),
            Error::Input(e) => defmt::write!(fmt, "input: {}", e),
            Error::Command(e) => defmt::write!(fmt, "command: {}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FsmError {
    fn format(&self, fmt: defmt::Formatter) {
        let msg = match self {
            FsmError::Empty => "no states registered",
            FsmError::Full => "state table full",
            FsmError::DuplicateState => "duplicate state name",
            FsmError::UnknownState => "unknown state",
            FsmError::CustomStateWithoutAction => "custom state must have an action",
            FsmError::NoCustomState => "custom state must be installed before use",
        };
        defmt::write!(fmt, "{}", msg)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OutputError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            OutputError::OutOfRange(v) => defmt::write!(fmt, "value {} outside 0..=255", v),
            OutputError::WriteFailed => defmt::write!(fmt, "PWM write failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InputError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "GPIO read failed")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CommandError::UnknownCommand => defmt::write!(fmt, "unknown command"),
            CommandError::UnknownMode(m) => defmt::write!(fmt, "unknown mode {}", m),
            CommandError::MissingValue => defmt::write!(fmt, "custom mode requires a value"),
            CommandError::OutOfRange(v) => defmt::write!(fmt, "level {} outside 0..=255", v),
            CommandError::NoCustomState => defmt::write!(fmt, "channel has no custom state"),
            CommandError::ValueMismatch => defmt::write!(fmt, "value does not fit channel"),
            CommandError::Malformed => defmt::write!(fmt, "malformed message"),
        }
    }
}
