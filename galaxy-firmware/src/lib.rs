// Library-Root: Tasks, Hardware-Anbindung und Kanäle der Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

use defmt::info;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
use embassy_sync::signal::Signal;

use galaxy_core::{Command, PowerGate, Snapshot};

use crate::config::{COMMAND_QUEUE_SIZE, MAX_SNAPSHOT_SUBSCRIBERS};

// ============================================================================
// Globale Flags
// ============================================================================

/// "Gerät ist an": Output-Task schreibt, Taster-Handler lesen
pub static POWER_GATE: PowerGate = PowerGate::new();

/// Wird vom Change-Hook gesetzt, vom Output-Task abgeholt
pub static STATE_CHANGED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Change-Hook aller vier FSMs
///
/// Läuft im Output-Task (einziger Besitzer der FSMs), darf also nicht blockieren.
pub fn on_state_change(label: &'static str) {
    info!("FSM: {} changed", label);
    STATE_CHANGED.signal(());
}

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Publisher<'static, NoopRawMutex, Snapshot, 2, 8, 1>
// Nutze:  SnapshotPublisher

/// PubSubChannel für Snapshots (Output-Task → WebSocket-Clients)
/// - 2: Nachrichten-Kapazität im Queue
/// - MAX_SNAPSHOT_SUBSCRIBERS: ein Subscriber pro WebSocket
/// - 1: nur der Output-Task published
pub type SnapshotChannel = PubSubChannel<NoopRawMutex, Snapshot, 2, MAX_SNAPSHOT_SUBSCRIBERS, 1>;

pub type SnapshotPublisher =
    Publisher<'static, NoopRawMutex, Snapshot, 2, MAX_SNAPSHOT_SUBSCRIBERS, 1>;

pub type SnapshotSubscriber =
    Subscriber<'static, NoopRawMutex, Snapshot, 2, MAX_SNAPSHOT_SUBSCRIBERS, 1>;

/// Kommando-Queue (Taster + WebSockets → Output-Task)
pub type CommandChannel = Channel<NoopRawMutex, Command, COMMAND_QUEUE_SIZE>;

pub type CommandSender = Sender<'static, NoopRawMutex, Command, COMMAND_QUEUE_SIZE>;

pub type CommandReceiver = Receiver<'static, NoopRawMutex, Command, COMMAND_QUEUE_SIZE>;
