// WebSocket-Protokoll: eingehende Kommandos, ausgehende Fehlermeldungen
//
// Eingehend gibt es zwei Formen:
// - Text: Button-ID ("Power", "Brightness", "Colour", "Motor") oder "getStates"
// - JSON: {"id":"Colour","mode":1,"value":4278190335}
// Ausgehend gehen Snapshots (galaxy_core::Snapshot) und Fehler.

use serde::Serialize;

use galaxy_core::{Command, CommandError, Envelope};

/// Server → Client Fehlermeldung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    #[serde(rename = "error")]
    Error { message: &'static str },
}

/// Dekodiert eine Text-Nachricht des Browsers
pub fn decode(text: &str) -> Result<Command, CommandError> {
    let text = text.trim();
    if !text.starts_with('{') {
        return Command::try_from(text);
    }

    let (envelope, _) =
        serde_json_core::from_str::<Envelope>(text).map_err(|_| CommandError::Malformed)?;
    Command::try_from(envelope)
}
