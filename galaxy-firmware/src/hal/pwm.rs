// LEDC-Anbindung: sechs PWM-Kanäle für RGBW, Projektor und Motor
//
// Alle Kanäle teilen sich einen Low-Speed-Timer mit 8 bit Auflösung,
// Duty 0..=255 entspricht damit direkt den Intensitätswerten der FSMs.

use esp_hal::gpio::{AnyPin, DriveMode};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use static_cell::StaticCell;

use galaxy_core::{PwmOutput, RgbwOutput, Rig};

use crate::config::PWM_FREQUENCY_KHZ;

/// LEDC-Kanal; erfüllt `embedded_hal::pwm::SetDutyCycle`
pub type PwmChannel = channel::Channel<'static, LowSpeed>;

/// Ausgangs-Pins in Kanal-Reihenfolge
pub struct PwmPins {
    pub red: AnyPin<'static>,
    pub green: AnyPin<'static>,
    pub blue: AnyPin<'static>,
    pub white: AnyPin<'static>,
    pub projector: AnyPin<'static>,
    pub motor: AnyPin<'static>,
}

static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
static TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

/// Konfiguriert LEDC und baut den Ausgabe-Kontext der FSMs
///
/// Alle Kanäle starten mit Duty 0. Schlägt die Konfiguration fehl, kann
/// das Gerät nichts Sinnvolles tun: Panic beim Booten.
pub fn init_pwm(peripheral: esp_hal::peripherals::LEDC<'static>, pins: PwmPins) -> Rig<PwmChannel> {
    let ledc = LEDC.init(Ledc::new(peripheral));
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let timer = TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
        })
        .expect("LEDC timer config failed");
    let timer: &'static timer::Timer<'static, LowSpeed> = timer;

    let channel = |number: channel::Number, pin: AnyPin<'static>| {
        let mut ch = ledc.channel(number, pin);
        ch.configure(channel::config::Config {
            timer,
            duty_pct: 0,
            drive_mode: DriveMode::PushPull,
        })
        .expect("LEDC channel config failed");
        ch
    };

    let rgbw = RgbwOutput::new(
        channel(channel::Number::Channel0, pins.red),
        channel(channel::Number::Channel1, pins.green),
        channel(channel::Number::Channel2, pins.blue),
        channel(channel::Number::Channel3, pins.white),
    );
    let projector = PwmOutput::new(channel(channel::Number::Channel4, pins.projector));
    let motor = PwmOutput::new(channel(channel::Number::Channel5, pins.motor));

    Rig::new(rgbw, projector, motor)
}
