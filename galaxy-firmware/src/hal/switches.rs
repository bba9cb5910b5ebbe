// GPIO-Anbindung der vier Taster (active-low, interner Pull-up)

use esp_hal::gpio::{AnyPin, Input, InputConfig, Pull};

/// Eingänge in Kanal-Reihenfolge
pub struct SwitchPins {
    pub power: Input<'static>,
    pub brightness: Input<'static>,
    pub colour: Input<'static>,
    pub motor: Input<'static>,
}

fn pull_up(pin: AnyPin<'static>) -> Input<'static> {
    Input::new(pin, InputConfig::default().with_pull(Pull::Up))
}

impl SwitchPins {
    pub fn new(
        power: AnyPin<'static>,
        brightness: AnyPin<'static>,
        colour: AnyPin<'static>,
        motor: AnyPin<'static>,
    ) -> Self {
        Self {
            power: pull_up(power),
            brightness: pull_up(brightness),
            colour: pull_up(colour),
            motor: pull_up(motor),
        }
    }
}
