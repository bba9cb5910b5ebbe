// Input Task - Pollt die vier Taster und erzeugt Kommandos
use defmt::{info, warn};
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::InputPin;

use galaxy_core::{ChannelId, Command, DebouncedSwitch, Error, Gated, PressHandler};

use crate::config::{INPUT_POLL_MS, RELEASE_QUIET_MS};
use crate::hal::SwitchPins;
use crate::{CommandSender, POWER_GATE};

/// Ein Druck wird zu `Command::Advance` für den eigenen Kanal
///
/// Die Taster verändern keine FSM direkt; der Output-Task ist der einzige
/// Besitzer. Ist die Queue voll, geht der Druck verloren.
pub struct CommandPress {
    channel: ChannelId,
    sender: CommandSender,
}

impl CommandPress {
    pub fn new(channel: ChannelId, sender: CommandSender) -> Self {
        Self { channel, sender }
    }
}

impl PressHandler for CommandPress {
    fn on_press(&mut self) -> Result<(), Error> {
        info!("Input: {} pressed", self.channel);
        if self.sender.try_send(Command::Advance(self.channel)).is_err() {
            warn!("Input: command queue full, {} press dropped", self.channel);
        }
        Ok(())
    }
}

fn poll<P: InputPin, H: PressHandler>(switch: &mut DebouncedSwitch<P, H>, now_ms: u64) {
    if let Err(e) = switch.update(now_ms) {
        warn!("Input: {}", e);
    }
}

/// Input Task
///
/// Power ist nie gesperrt. Brightness, Colour und Motor werden verworfen
/// solange das Gerät aus ist (siehe `POWER_GATE`).
#[embassy_executor::task]
pub async fn input_task(pins: SwitchPins, command_sender: CommandSender) {
    let press = |channel| CommandPress::new(channel, command_sender);

    let mut power = DebouncedSwitch::new(pins.power, press(ChannelId::Power))
        .with_release_quiet_ms(RELEASE_QUIET_MS);
    let mut gated = [
        (pins.brightness, ChannelId::Brightness),
        (pins.colour, ChannelId::Colour),
        (pins.motor, ChannelId::Motor),
    ]
    .map(|(pin, channel)| {
        DebouncedSwitch::new(pin, Gated::new(&POWER_GATE, press(channel)))
            .with_release_quiet_ms(RELEASE_QUIET_MS)
    });

    info!("Input: polling switches every {} ms", INPUT_POLL_MS);

    loop {
        let now = Instant::now().as_millis();
        poll(&mut power, now);
        for switch in gated.iter_mut() {
            poll(switch, now);
        }
        Timer::after(Duration::from_millis(INPUT_POLL_MS)).await;
    }
}
