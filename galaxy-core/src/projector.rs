//! Galaxy-Projektor: vier FSMs, ihre Presets und der Ausgabe-Frame
//!
//! - `Rig` ist der Kontext aller Zustands-Aktionen: RGBW-Gruppe,
//!   Projektor-LED, Motor, aktuelle Helligkeit und die Custom-Puffer.
//! - `Channels` hält die vier FSMs und kennt die Frame-Reihenfolge
//!   (Power → Brightness → Colour → Motor) sowie das Power-Gating.
//! - `Projector` verbindet beides mit den Presets der Hardware.
//!
//! Helligkeit wird jeden Frame von der Brightness-FSM in den `Rig`
//! geschrieben, bevor Colour und Motor sie lesen.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::{CommandError, Error, FsmError, OutputError};
use crate::fsm::{ChangeHook, GenericFsm};
use crate::logic::{cycle_levels, pulse_level, scale_color};
use crate::output::{PwmOutput, RgbwOutput};
use crate::state::State;
use crate::types::{ChannelId, ChannelSnapshot, Command, CustomValue, RgbwColor, Snapshot};

/// Zustand der Power-FSM, in dem alle anderen FSMs übersprungen werden
pub const POWER_OFF: &str = "Power Off";
pub const POWER_ON: &str = "Power On";
pub const PROJECT: &str = "Project";

pub const CUSTOM_BRIGHTNESS: &str = "Custom Brightness";
pub const CUSTOM_COLOUR: &str = "Custom Colour";
pub const CUSTOM_SPEED: &str = "Custom Speed";

// Kanal-Bits für die Farb-Presets
const R: u8 = 0b0001;
const G: u8 = 0b0010;
const B: u8 = 0b0100;
const W: u8 = 0b1000;

/// Zugriff auf die Custom-Puffer eines Ausgabe-Kontexts
pub trait CustomPayload {
    fn store_custom(&mut self, channel: ChannelId, value: CustomValue) -> Result<(), CommandError>;
    fn custom_value(&self, channel: ChannelId) -> Option<CustomValue>;
}

// ============================================================================
// Channels: die vier FSMs
// ============================================================================

pub struct Channels<C> {
    pub power: GenericFsm<C>,
    pub brightness: GenericFsm<C>,
    pub colour: GenericFsm<C>,
    pub motor: GenericFsm<C>,
    power_off: &'static str,
}

impl<C> Channels<C> {
    pub fn new(
        power: GenericFsm<C>,
        brightness: GenericFsm<C>,
        colour: GenericFsm<C>,
        motor: GenericFsm<C>,
        power_off: &'static str,
    ) -> Self {
        Self {
            power,
            brightness,
            colour,
            motor,
            power_off,
        }
    }

    pub fn fsm(&self, id: ChannelId) -> &GenericFsm<C> {
        match id {
            ChannelId::Power => &self.power,
            ChannelId::Brightness => &self.brightness,
            ChannelId::Colour => &self.colour,
            ChannelId::Motor => &self.motor,
        }
    }

    pub fn fsm_mut(&mut self, id: ChannelId) -> &mut GenericFsm<C> {
        match id {
            ChannelId::Power => &mut self.power,
            ChannelId::Brightness => &mut self.brightness,
            ChannelId::Colour => &mut self.colour,
            ChannelId::Motor => &mut self.motor,
        }
    }

    pub fn set_change_hook(&mut self, hook: Option<ChangeHook>) {
        for id in ChannelId::ALL {
            self.fsm_mut(id).set_change_hook(hook);
        }
    }

    pub fn is_powered(&self) -> bool {
        !self.power.is_in(self.power_off)
    }

    /// Ein Frame des Output-Tasks
    ///
    /// Power läuft immer. Ist das Gerät aus, werden die übrigen FSMs nicht
    /// ausgeführt. Gibt zurück, ob das Gerät an ist.
    pub fn render(&self, ctx: &mut C) -> bool {
        self.power.perform_state_action(ctx);
        if !self.is_powered() {
            return false;
        }

        self.brightness.perform_state_action(ctx);
        self.colour.perform_state_action(ctx);
        self.motor.perform_state_action(ctx);
        true
    }
}

impl<C: CustomPayload> Channels<C> {
    /// Wendet ein Kommando an; ungültige Kommandos ändern nichts
    pub fn apply(&mut self, command: Command, ctx: &mut C) -> Result<(), Error> {
        match command {
            Command::Advance(id) => self.fsm_mut(id).next_state()?,
            Command::Custom(id, value) => {
                let fsm = self.fsm_mut(id);
                if fsm.custom_state().is_none() {
                    return Err(FsmError::NoCustomState.into());
                }

                let was_custom = fsm.is_custom();
                ctx.store_custom(id, value)?;
                fsm.use_custom_state()?;
                if was_custom {
                    // neue Nutzlast, kein Übergang: Clients trotzdem informieren
                    fsm.announce();
                }
            }
            Command::Refresh => {}
        }
        Ok(())
    }

    pub fn snapshot(&self, ctx: &C) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for id in ChannelId::ALL {
            let fsm = self.fsm(id);
            *snapshot.channel_mut(id) = if fsm.is_custom() {
                ChannelSnapshot {
                    custom: true,
                    index: None,
                    value: ctx.custom_value(id).map(CustomValue::packed),
                }
            } else {
                ChannelSnapshot {
                    custom: false,
                    index: fsm.current_state_index().and_then(|i| u8::try_from(i).ok()),
                    value: None,
                }
            };
        }
        snapshot
    }
}

// ============================================================================
// Rig: Ausgabe-Kontext
// ============================================================================

/// Helligkeit, von der Brightness-FSM geschrieben
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Brightness {
    pub rgbw: u8,
    pub projector: u8,
}

pub struct Rig<P> {
    rgbw: RgbwOutput<P>,
    projector: PwmOutput<P>,
    motor: PwmOutput<P>,
    brightness: Brightness,
    custom_brightness: u8,
    custom_colour: RgbwColor,
    custom_speed: u8,
    now_ms: u64,
    fault: Option<OutputError>,
}

impl<P: SetDutyCycle> Rig<P> {
    pub fn new(rgbw: RgbwOutput<P>, projector: PwmOutput<P>, motor: PwmOutput<P>) -> Self {
        Self {
            rgbw,
            projector,
            motor,
            brightness: Brightness::default(),
            custom_brightness: 0,
            custom_colour: RgbwColor::OFF,
            custom_speed: 0,
            now_ms: 0,
            fault: None,
        }
    }

    pub fn rgbw(&self) -> &RgbwOutput<P> {
        &self.rgbw
    }

    pub fn projector(&self) -> &PwmOutput<P> {
        &self.projector
    }

    pub fn motor(&self) -> &PwmOutput<P> {
        &self.motor
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = Brightness {
            rgbw: level,
            projector: level,
        };
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Letzter Schreibfehler seit dem vorigen Aufruf
    pub fn take_fault(&mut self) -> Option<OutputError> {
        self.fault.take()
    }

    fn report(&mut self, result: Result<(), OutputError>) {
        if let Err(e) = result {
            self.fault = Some(e);
        }
    }
}

impl<P: SetDutyCycle> CustomPayload for Rig<P> {
    fn store_custom(&mut self, channel: ChannelId, value: CustomValue) -> Result<(), CommandError> {
        match (channel, value) {
            (ChannelId::Colour, CustomValue::Colour(c)) => self.custom_colour = c,
            (ChannelId::Brightness, CustomValue::Level(l)) => self.custom_brightness = l,
            (ChannelId::Motor, CustomValue::Level(l)) => self.custom_speed = l,
            (ChannelId::Power, _) => return Err(CommandError::NoCustomState),
            _ => return Err(CommandError::ValueMismatch),
        }
        Ok(())
    }

    fn custom_value(&self, channel: ChannelId) -> Option<CustomValue> {
        match channel {
            ChannelId::Power => None,
            ChannelId::Brightness => Some(CustomValue::Level(self.custom_brightness)),
            ChannelId::Colour => Some(CustomValue::Colour(self.custom_colour)),
            ChannelId::Motor => Some(CustomValue::Level(self.custom_speed)),
        }
    }
}

// ============================================================================
// Zustands-Aktionen
// ============================================================================

fn power_off<P: SetDutyCycle>(rig: &mut Rig<P>) {
    let result = rig.rgbw.off();
    rig.report(result);
    let result = rig.projector.set(0);
    rig.report(result);
    let result = rig.motor.set(0);
    rig.report(result);
}

fn project<P: SetDutyCycle>(rig: &mut Rig<P>) {
    let result = rig.projector.set(rig.brightness.projector);
    rig.report(result);
}

fn brightness_level<P: SetDutyCycle, const LEVEL: u8>(rig: &mut Rig<P>) {
    rig.set_brightness(LEVEL);
}

fn custom_brightness<P: SetDutyCycle>(rig: &mut Rig<P>) {
    rig.set_brightness(rig.custom_brightness);
}

/// Feste Farbe: jeder Kanal in `MASK` bekommt die RGBW-Helligkeit
fn solid<P: SetDutyCycle, const MASK: u8>(rig: &mut Rig<P>) {
    let level = rig.brightness.rgbw;
    let on = |bit: u8| if MASK & bit != 0 { level } else { 0 };
    let result = rig.rgbw.set(on(R), on(G), on(B), on(W));
    rig.report(result);
}

fn cycle<P: SetDutyCycle>(rig: &mut Rig<P>) {
    let [r, g, b] = cycle_levels(rig.now_ms, rig.brightness.rgbw);
    let result = rig.rgbw.set_levels(r, g, b, 0);
    rig.report(result);
}

fn pulse<P: SetDutyCycle>(rig: &mut Rig<P>) {
    let level = pulse_level(rig.now_ms, rig.brightness.rgbw);
    let result = rig.rgbw.set_levels(level, level, level, level);
    rig.report(result);
}

fn custom_colour<P: SetDutyCycle>(rig: &mut Rig<P>) {
    let color = scale_color(rig.custom_colour, rig.brightness.rgbw);
    let result = rig.rgbw.set_color(color);
    rig.report(result);
}

fn motor_speed<P: SetDutyCycle, const SPEED: u8>(rig: &mut Rig<P>) {
    let result = rig.motor.set(SPEED);
    rig.report(result);
}

fn custom_speed<P: SetDutyCycle>(rig: &mut Rig<P>) {
    let result = rig.motor.set(rig.custom_speed);
    rig.report(result);
}

// ============================================================================
// Presets
// ============================================================================

fn power_fsm<P: SetDutyCycle>() -> Result<GenericFsm<Rig<P>>, FsmError> {
    let mut fsm = GenericFsm::new("Power");
    fsm.add_state(State::with_action(POWER_OFF, power_off::<P>))?;
    // reiner Marker: Gerät an, Projektor-LED aus
    fsm.add_state(State::new(POWER_ON))?;
    fsm.add_state(State::with_action(PROJECT, project::<P>))?;
    Ok(fsm)
}

fn brightness_fsm<P: SetDutyCycle>() -> Result<GenericFsm<Rig<P>>, FsmError> {
    let mut fsm = GenericFsm::new("Brightness");
    fsm.add_state(State::with_action("Extra Low", brightness_level::<P, 20>))?;
    fsm.add_state(State::with_action("Low", brightness_level::<P, 50>))?;
    fsm.add_state(State::with_action("Medium", brightness_level::<P, 150>))?;
    fsm.add_state(State::with_action("High", brightness_level::<P, 255>))?;
    fsm.set_custom_state(State::with_action(CUSTOM_BRIGHTNESS, custom_brightness::<P>))?;
    Ok(fsm)
}

fn colour_fsm<P: SetDutyCycle>() -> Result<GenericFsm<Rig<P>>, FsmError> {
    let mut fsm = GenericFsm::new("Colour");
    fsm.add_state(State::with_action("Blue", solid::<P, B>))?;
    fsm.add_state(State::with_action("Red", solid::<P, R>))?;
    fsm.add_state(State::with_action("Green", solid::<P, G>))?;
    fsm.add_state(State::with_action("White", solid::<P, W>))?;
    fsm.add_state(State::with_action("Blue Red", solid::<P, { B | R }>))?;
    fsm.add_state(State::with_action("Blue Green", solid::<P, { B | G }>))?;
    fsm.add_state(State::with_action("Red Green", solid::<P, { R | G }>))?;
    fsm.add_state(State::with_action("Red White", solid::<P, { R | W }>))?;
    fsm.add_state(State::with_action("Green White", solid::<P, { G | W }>))?;
    fsm.add_state(State::with_action("Red Green Blue", solid::<P, { R | G | B }>))?;
    fsm.add_state(State::with_action("Blue Green White", solid::<P, { B | G | W }>))?;
    fsm.add_state(State::with_action("Blue Red Green White", solid::<P, { R | G | B | W }>))?;
    fsm.add_state(State::with_action("Cycle", cycle::<P>))?;
    fsm.add_state(State::with_action("Pulse", pulse::<P>))?;
    fsm.set_custom_state(State::with_action(CUSTOM_COLOUR, custom_colour::<P>))?;
    Ok(fsm)
}

fn motor_fsm<P: SetDutyCycle>() -> Result<GenericFsm<Rig<P>>, FsmError> {
    let mut fsm = GenericFsm::new("Motor");
    fsm.add_state(State::with_action("Motor Off", motor_speed::<P, 0>))?;
    fsm.add_state(State::with_action("Motor Fast", motor_speed::<P, 255>))?;
    fsm.add_state(State::with_action("Motor Slow", motor_speed::<P, 100>))?;
    fsm.set_custom_state(State::with_action(CUSTOM_SPEED, custom_speed::<P>))?;
    Ok(fsm)
}

// ============================================================================
// Projector
// ============================================================================

pub struct Projector<P> {
    channels: Channels<Rig<P>>,
    rig: Rig<P>,
}

impl<P: SetDutyCycle> Projector<P> {
    /// Baut die vier FSMs mit ihren Presets; Start: aus, niedrigste Stufen
    pub fn new(rig: Rig<P>, hook: Option<ChangeHook>) -> Result<Self, FsmError> {
        let mut channels = Channels::new(
            power_fsm()?,
            brightness_fsm()?,
            colour_fsm()?,
            motor_fsm()?,
            POWER_OFF,
        );
        channels.set_change_hook(hook);
        Ok(Self { channels, rig })
    }

    pub fn apply(&mut self, command: Command) -> Result<(), Error> {
        self.channels.apply(command, &mut self.rig)
    }

    /// Führt einen Frame aus; `now_ms` treibt die animierten Presets
    pub fn render(&mut self, now_ms: u64) -> bool {
        self.rig.now_ms = now_ms;
        self.channels.render(&mut self.rig)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.channels.snapshot(&self.rig)
    }

    pub fn is_powered(&self) -> bool {
        self.channels.is_powered()
    }

    pub fn take_fault(&mut self) -> Option<OutputError> {
        self.rig.take_fault()
    }

    pub fn channels(&self) -> &Channels<Rig<P>> {
        &self.channels
    }

    pub fn rig(&self) -> &Rig<P> {
        &self.rig
    }
}
