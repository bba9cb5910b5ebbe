//! Integration Tests für den kompletten Projektor
//!
//! Vier FSMs + Rig auf Fake-Kanälen, so wie der Output-Task sie betreibt.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{Channels, FakeChannel};
use galaxy_core::logic::cycle_levels;
use galaxy_core::{
    ChannelId, Command, CommandError, CustomValue, Error, FsmError, GenericFsm, OutputError,
    POWER_OFF, Projector, RgbwColor, State,
};

fn projector(hw: &Channels) -> Projector<FakeChannel> {
    Projector::new(hw.rig(), None).unwrap()
}

fn advance(p: &mut Projector<FakeChannel>, id: ChannelId, times: usize) {
    for _ in 0..times {
        p.apply(Command::Advance(id)).unwrap();
    }
}

// ============================================================================
// Frame-Reihenfolge und Power-Gating (Spy-Kontext)
// ============================================================================

/// Protokolliert, welche FSM-Aktion in welcher Reihenfolge lief
#[derive(Default)]
struct Trace {
    calls: Vec<&'static str>,
}

fn spy_fsm(
    label: &'static str,
    names: &[&'static str],
    action: fn(&mut Trace),
) -> GenericFsm<Trace> {
    let mut fsm = GenericFsm::new(label);
    for &name in names {
        fsm.add_state(State::with_action(name, action)).unwrap();
    }
    fsm
}

fn spy_channels() -> galaxy_core::Channels<Trace> {
    galaxy_core::Channels::new(
        spy_fsm("Power", &[POWER_OFF, "Power On"], |t| t.calls.push("Power")),
        spy_fsm("Brightness", &["Low", "High"], |t| t.calls.push("Brightness")),
        spy_fsm("Colour", &["Blue", "Red"], |t| t.calls.push("Colour")),
        spy_fsm("Motor", &["Motor Off", "Motor Fast"], |t| t.calls.push("Motor")),
        POWER_OFF,
    )
}

#[test]
fn test_powered_off_frame_runs_only_power() {
    let channels = spy_channels();
    let mut trace = Trace::default();

    for _ in 0..3 {
        assert!(!channels.render(&mut trace));
    }
    assert_eq!(trace.calls, ["Power", "Power", "Power"]);
}

#[test]
fn test_powered_frame_order() {
    let mut channels = spy_channels();
    let mut trace = Trace::default();

    channels.power.next_state().unwrap();
    assert!(channels.render(&mut trace));
    assert_eq!(trace.calls, ["Power", "Brightness", "Colour", "Motor"]);

    // zurück auf aus: die übrigen FSMs laufen nicht mehr
    trace.calls.clear();
    channels.power.next_state().unwrap();
    assert!(!channels.render(&mut trace));
    assert_eq!(trace.calls, ["Power"]);
}

// ============================================================================
// Power
// ============================================================================

#[test]
fn test_starts_powered_off_and_silent() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    assert!(p.channels().power.is_in(POWER_OFF));
    assert!(!p.render(0));
    assert!(!p.is_powered());
    assert_eq!(hw.total_writes(), 0);
}

#[test]
fn test_power_on_renders_lowest_presets() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    advance(&mut p, ChannelId::Power, 1);
    assert!(p.render(0));

    // Extra Low + Blue + Motor Off
    assert_eq!(hw.blue.writes(), [20]);
    assert_eq!(p.rig().rgbw().color(), RgbwColor::new(0, 0, 20, 0));
    assert_eq!(hw.motor.write_count(), 0);
    assert_eq!(hw.projector.write_count(), 0);
}

#[test]
fn test_project_and_power_off() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    advance(&mut p, ChannelId::Power, 1);
    p.render(0);
    advance(&mut p, ChannelId::Power, 1);
    assert!(p.channels().power.is_in("Project"));
    p.render(5);
    assert_eq!(hw.projector.writes(), [20]);

    advance(&mut p, ChannelId::Power, 1);
    assert!(!p.render(10));
    assert_eq!(hw.projector.writes(), [20, 0]);
    assert_eq!(hw.blue.writes(), [20, 0]);
    assert_eq!(p.rig().rgbw().color(), RgbwColor::OFF);
}

#[test]
fn test_steady_state_writes_nothing() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    advance(&mut p, ChannelId::Power, 1);
    p.render(0);
    let after_first = hw.total_writes();
    for t in 1..50 {
        p.render(t * 5);
    }
    assert_eq!(hw.total_writes(), after_first);
}

#[test]
fn test_web_commands_apply_while_off_but_do_not_render() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    advance(&mut p, ChannelId::Colour, 1);
    assert!(!p.render(0));
    assert_eq!(p.snapshot().colour.index, Some(1));
    assert_eq!(hw.total_writes(), 0);

    advance(&mut p, ChannelId::Power, 1);
    p.render(5);
    assert_eq!(hw.red.writes(), [20]);
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_brightness_scales_colour() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);

    for expected in [20, 50, 150, 255] {
        p.render(0);
        assert_eq!(p.rig().rgbw().color().rgb.b, expected);
        assert_eq!(p.rig().brightness().projector, expected);
        advance(&mut p, ChannelId::Brightness, 1);
    }
}

#[test]
fn test_mixed_colour_preset() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);
    advance(&mut p, ChannelId::Brightness, 3);
    // Blue, Red, Green, White, Blue Red
    advance(&mut p, ChannelId::Colour, 4);

    p.render(0);
    assert!(p.channels().colour.is_in("Blue Red"));
    assert_eq!(p.rig().rgbw().color(), RgbwColor::new(255, 0, 255, 0));
}

#[test]
fn test_cycle_follows_time() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);
    advance(&mut p, ChannelId::Colour, 12);
    assert!(p.channels().colour.is_in("Cycle"));

    for t in [0, 700, 2500, 6000] {
        p.render(t);
        let [r, g, b] = cycle_levels(t, 20);
        let rgb = p.rig().rgbw().color().rgb;
        assert_eq!([rgb.r, rgb.g, rgb.b].map(i32::from), [r, g, b]);
    }
}

#[test]
fn test_motor_presets() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);

    advance(&mut p, ChannelId::Motor, 1);
    p.render(0);
    advance(&mut p, ChannelId::Motor, 1);
    p.render(5);
    advance(&mut p, ChannelId::Motor, 1);
    p.render(10);

    assert_eq!(hw.motor.writes(), [255, 100, 0]);
}

#[test]
fn test_output_fault_is_reported() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);

    hw.blue.set_failing(true);
    p.render(0);
    assert_eq!(p.take_fault(), Some(OutputError::WriteFailed));
    assert_eq!(p.take_fault(), None);

    hw.blue.set_failing(false);
    p.render(5);
    assert_eq!(p.take_fault(), None);
    assert_eq!(hw.blue.writes(), [20]);
}

// ============================================================================
// Custom-States
// ============================================================================

#[test]
fn test_custom_colour_and_speed() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);
    advance(&mut p, ChannelId::Brightness, 3);

    p.apply(Command::from_envelope(ChannelId::Colour, 1, Some(0xFF_00_00_80)).unwrap())
        .unwrap();
    p.apply(Command::Custom(ChannelId::Motor, CustomValue::Level(42)))
        .unwrap();
    p.render(0);

    assert_eq!(p.rig().rgbw().color(), RgbwColor::new(255, 0, 0, 128));
    assert_eq!(hw.motor.writes(), [42]);
    assert!(p.channels().colour.is_custom());
}

#[test]
fn test_custom_brightness() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);

    p.apply(Command::Custom(ChannelId::Brightness, CustomValue::Level(200)))
        .unwrap();
    p.render(0);
    assert_eq!(hw.blue.writes(), [200]);

    // "weiter" verlässt Custom und setzt nach Extra Low fort
    advance(&mut p, ChannelId::Brightness, 1);
    p.render(5);
    assert_eq!(hw.blue.writes(), [200, 50]);
}

#[test]
fn test_power_has_no_custom_state() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    assert_eq!(
        p.apply(Command::Custom(ChannelId::Power, CustomValue::Level(1))),
        Err(Error::Fsm(FsmError::NoCustomState))
    );
    assert_eq!(
        Command::from_envelope(ChannelId::Power, 1, Some(1)),
        Err(CommandError::NoCustomState)
    );
}

#[test]
fn test_mismatched_value_changes_nothing() {
    let hw = Channels::default();
    let mut p = projector(&hw);

    assert_eq!(
        p.apply(Command::Custom(ChannelId::Colour, CustomValue::Level(3))),
        Err(Error::Command(CommandError::ValueMismatch))
    );
    assert!(!p.channels().colour.is_custom());
}

#[test]
fn test_change_hook_fires_for_new_custom_payload() {
    static CHANGES: AtomicUsize = AtomicUsize::new(0);
    fn on_change(label: &'static str) {
        assert_eq!(label, "Colour");
        CHANGES.fetch_add(1, Ordering::SeqCst);
    }

    let hw = Channels::default();
    let mut p = Projector::new(hw.rig(), Some(on_change)).unwrap();
    let red = Command::Custom(ChannelId::Colour, CustomValue::Colour(RgbwColor::new(255, 0, 0, 0)));
    let green = Command::Custom(ChannelId::Colour, CustomValue::Colour(RgbwColor::new(0, 255, 0, 0)));

    p.apply(red).unwrap();
    assert_eq!(CHANGES.load(Ordering::SeqCst), 1);
    p.apply(green).unwrap();
    assert_eq!(CHANGES.load(Ordering::SeqCst), 2);
    p.apply(Command::Refresh).unwrap();
    assert_eq!(CHANGES.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Snapshot
// ============================================================================

#[test]
fn test_initial_snapshot_json() {
    let hw = Channels::default();
    let p = projector(&hw);

    let mut buf = [0u8; 256];
    let len = serde_json_core::to_slice(&p.snapshot(), &mut buf).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..len]).unwrap(),
        r#"{"Power":{"custom":false,"index":0},"Brightness":{"custom":false,"index":0},"Colour":{"custom":false,"index":0},"Motor":{"custom":false,"index":0}}"#
    );
}

#[test]
fn test_custom_snapshot_json() {
    let hw = Channels::default();
    let mut p = projector(&hw);
    advance(&mut p, ChannelId::Power, 1);
    advance(&mut p, ChannelId::Brightness, 3);
    p.apply(Command::Custom(
        ChannelId::Colour,
        CustomValue::Colour(RgbwColor::from_packed(0xFF_00_00_80)),
    ))
    .unwrap();

    let snapshot = p.snapshot();
    assert_eq!(snapshot.channel(ChannelId::Colour).value, Some(0xFF_00_00_80));
    assert_eq!(snapshot.channel(ChannelId::Colour).index, None);

    let mut buf = [0u8; 256];
    let len = serde_json_core::to_slice(&snapshot, &mut buf).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..len]).unwrap(),
        r#"{"Power":{"custom":false,"index":1},"Brightness":{"custom":false,"index":3},"Colour":{"custom":true,"value":4278190208},"Motor":{"custom":false,"index":0}}"#
    );
}
