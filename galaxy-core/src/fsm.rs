//! Generische Finite State Machine
//!
//! Eine FSM zykliert durch eine geordnete Liste benannter Zustände
//! (Einfüge-Reihenfolge = Zyklus-Reihenfolge). Zusätzlich kann ein
//! Custom-State außerhalb des Zyklus installiert werden, z.B. "zeige die
//! zuletzt vom Browser gesendete Farbe".
//!
//! ```text
//!            next            next            next
//!   [s0] ─────────► [s1] ─────────► ... ─────────► [s0]
//!     ▲
//!     │ next / set (verlässt Custom)
//!     │
//!   [custom] ◄──── use_custom_state()
//! ```
//!
//! Jeder echte Übergang ruft den Change-Hook auf.

use heapless::Vec;

use crate::error::FsmError;
use crate::state::{Action, State};

/// Maximale Anzahl Zustände pro FSM (Farb-FSM hat 14)
pub const MAX_STATES: usize = 16;

/// Callback bei jedem Zustandswechsel, bekommt das Label der FSM
pub type ChangeHook = fn(&'static str);

pub struct GenericFsm<C> {
    label: &'static str,
    states: Vec<State<C>, MAX_STATES>,
    /// Index in `states`; `None` solange die Tabelle leer ist
    current: Option<usize>,
    /// Gewünschter Startzustand (sonst der erste registrierte)
    initial: Option<&'static str>,
    custom: Option<State<C>>,
    custom_active: bool,
    on_change: Option<ChangeHook>,
}

impl<C> GenericFsm<C> {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            states: Vec::new(),
            current: None,
            initial: None,
            custom: None,
            custom_active: false,
            on_change: None,
        }
    }

    /// Startzustand explizit festlegen. Greift sobald ein Zustand dieses
    /// Namens registriert wird.
    pub fn with_initial(mut self, name: &'static str) -> Self {
        self.initial = Some(name);
        if let Some(index) = self.index_of(name) {
            self.current = Some(index);
        }
        self
    }

    pub fn with_change_hook(mut self, hook: ChangeHook) -> Self {
        self.on_change = Some(hook);
        self
    }

    pub fn set_change_hook(&mut self, hook: Option<ChangeHook>) {
        self.on_change = hook;
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &State<C>> {
        self.states.iter()
    }

    /// Hängt einen Zustand an den Zyklus an
    ///
    /// Der erste Zustand wird aktuell, außer ein expliziter Startzustand
    /// wurde gesetzt. Doppelte Namen werden abgelehnt, sonst wäre die
    /// Suche über Namens-Gleichheit mehrdeutig.
    pub fn add_state(&mut self, state: State<C>) -> Result<(), FsmError> {
        if self.index_of(state.name()).is_some() {
            return Err(FsmError::DuplicateState);
        }

        let name = state.name();
        self.states.push(state).map_err(|_| FsmError::Full)?;
        let index = self.states.len() - 1;

        if self.current.is_none() || self.initial == Some(name) {
            self.current = Some(index);
        }
        Ok(())
    }

    /// Nächster Zustand im Zyklus (wrap-around), verlässt immer den Custom-State
    pub fn next_state(&mut self) -> Result<(), FsmError> {
        let index = self.current.ok_or(FsmError::Empty)?;

        self.custom_active = false;
        self.current = Some((index + 1) % self.states.len());
        self.notify();
        Ok(())
    }

    /// Springt direkt zu einem registrierten Zustand
    ///
    /// Ist der Zustand bereits aktuell (und kein Custom aktiv), passiert
    /// nichts. Unbekannte Namen lassen die FSM unverändert.
    pub fn set_state(&mut self, name: &str) -> Result<(), FsmError> {
        let index = self.index_of(name).ok_or(FsmError::UnknownState)?;

        if self.current == Some(index) && !self.custom_active {
            return Ok(());
        }

        self.custom_active = false;
        self.current = Some(index);
        self.notify();
        Ok(())
    }

    /// Aktueller Zustand des Zyklus (auch wenn gerade Custom aktiv ist)
    pub fn current_state(&self) -> Option<&State<C>> {
        self.current.and_then(|i| self.states.get(i))
    }

    pub fn current_state_index(&self) -> Option<usize> {
        self.current
    }

    /// Zustand, dessen Aktion gerade ausgeführt wird
    pub fn active_state(&self) -> Option<&State<C>> {
        if self.custom_active {
            self.custom.as_ref()
        } else {
            self.current_state()
        }
    }

    /// Bindet die Aktion eines registrierten Zustands neu
    pub fn set_state_action(&mut self, name: &str, action: Action<C>) -> Result<(), FsmError> {
        let index = self.index_of(name).ok_or(FsmError::UnknownState)?;
        self.states[index].set_action(action);
        Ok(())
    }

    pub fn perform_state_action(&self, ctx: &mut C) {
        if let Some(state) = self.active_state() {
            state.perform_action(ctx);
        }
    }

    /// Installiert (oder ersetzt) den Custom-State
    ///
    /// Ein Custom-State ohne Aktion ergibt keinen Sinn und wird abgelehnt.
    pub fn set_custom_state(&mut self, state: State<C>) -> Result<(), FsmError> {
        if !state.has_action() {
            return Err(FsmError::CustomStateWithoutAction);
        }
        self.custom = Some(state);
        Ok(())
    }

    pub fn custom_state(&self) -> Option<&State<C>> {
        self.custom.as_ref()
    }

    /// Aktiviert den Custom-State; idempotent wenn er schon aktiv ist
    pub fn use_custom_state(&mut self) -> Result<(), FsmError> {
        if self.custom.is_none() {
            return Err(FsmError::NoCustomState);
        }
        if self.custom_active {
            return Ok(());
        }
        self.custom_active = true;
        self.notify();
        Ok(())
    }

    pub fn is_custom(&self) -> bool {
        self.custom_active
    }

    /// true wenn der aktuelle Zyklus-Zustand `name` heißt
    pub fn is_in(&self, name: &str) -> bool {
        self.current_state().is_some_and(|s| s.name() == name)
    }

    /// Ruft den Change-Hook ohne Übergang auf, z.B. wenn sich die
    /// Nutzlast eines bereits aktiven Custom-States geändert hat
    pub fn announce(&self) {
        self.notify();
    }

    fn notify(&self) {
        if let Some(hook) = self.on_change {
            hook(self.label);
        }
    }

    // Lineare Suche: Tabellen haben < 16 Einträge
    fn index_of(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name() == name)
    }
}
