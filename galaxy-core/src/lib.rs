//! Galaxy Core - Plattformunabhängige Projektor-Logik
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Ausgänge und Taster laufen über die `embedded-hal` Traits, damit die
//! gesamte Zustandslogik auf dem Host getestet werden kann.

#![no_std]

pub mod error;
pub mod fsm;
pub mod logic;
pub mod output;
pub mod projector;
pub mod state;
pub mod switch;
pub mod types;

// Re-exports für einfachen Zugriff
pub use error::{CommandError, Error, FsmError, InputError, OutputError};
pub use fsm::{ChangeHook, GenericFsm, MAX_STATES};
pub use output::{PwmOutput, RgbwOutput};
pub use projector::{Channels, CustomPayload, POWER_OFF, Projector, Rig};
pub use state::{Action, State};
pub use switch::{DebouncedSwitch, Gated, PowerGate, PressHandler};
pub use types::{ChannelId, ChannelSnapshot, Command, CustomValue, Envelope, RgbwColor, Snapshot};
