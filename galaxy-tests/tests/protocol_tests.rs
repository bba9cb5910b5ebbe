//! Integration Tests für das Web-Protokoll
//!
//! Text-Kommandos der Weboberfläche und der JSON-Umschlag, so wie der
//! WebSocket-Handler sie dekodiert.

use galaxy_core::{ChannelId, Command, CommandError, CustomValue, Envelope, RgbwColor};

fn envelope(json: &str) -> Result<Command, CommandError> {
    let (envelope, _) =
        serde_json_core::from_str::<Envelope>(json).map_err(|_| CommandError::Malformed)?;
    Command::try_from(envelope)
}

#[test]
fn test_button_texts() {
    for id in ChannelId::ALL {
        assert_eq!(Command::try_from(id.as_str()), Ok(Command::Advance(id)));
    }
    assert_eq!(Command::try_from("getStates"), Ok(Command::Refresh));
    assert_eq!(Command::try_from("power"), Err(CommandError::UnknownCommand));
    assert_eq!(Command::try_from(""), Err(CommandError::UnknownCommand));
}

#[test]
fn test_envelope_advance_ignores_value() {
    assert_eq!(
        envelope(r#"{"id":"Motor","mode":0}"#),
        Ok(Command::Advance(ChannelId::Motor))
    );
    assert_eq!(
        envelope(r#"{"id":"Motor","mode":0,"value":999}"#),
        Ok(Command::Advance(ChannelId::Motor))
    );
}

#[test]
fn test_envelope_custom_colour() {
    assert_eq!(
        envelope(r#"{"id":"Colour","mode":1,"value":4278190335}"#),
        Ok(Command::Custom(
            ChannelId::Colour,
            CustomValue::Colour(RgbwColor::new(0xFF, 0x00, 0x00, 0xFF))
        ))
    );
}

#[test]
fn test_envelope_custom_level() {
    assert_eq!(
        envelope(r#"{"id":"Brightness","mode":1,"value":255}"#),
        Ok(Command::Custom(ChannelId::Brightness, CustomValue::Level(255)))
    );
    assert_eq!(
        envelope(r#"{"id":"Brightness","mode":1,"value":256}"#),
        Err(CommandError::OutOfRange(256))
    );
}

#[test]
fn test_envelope_errors() {
    assert_eq!(
        envelope(r#"{"id":"Colour","mode":1}"#),
        Err(CommandError::MissingValue)
    );
    assert_eq!(
        envelope(r#"{"id":"Colour","mode":7,"value":1}"#),
        Err(CommandError::UnknownMode(7))
    );
    assert_eq!(
        envelope(r#"{"id":"Power","mode":1,"value":1}"#),
        Err(CommandError::NoCustomState)
    );
    assert_eq!(envelope(r#"{"id":"Spin","mode":0}"#), Err(CommandError::Malformed));
    assert_eq!(envelope("{"), Err(CommandError::Malformed));
}
