//! Benannter Zustand mit optionaler Aktion
//!
//! Ein `State` ist ein Label plus eine Funktion, die der Output-Task bei
//! jedem Frame ausführt. Die Aktion bekommt den Ausgabe-Kontext `C`
//! explizit übergeben (Ausgänge, Helligkeit, Custom-Werte) statt globale
//! Variablen zu lesen.

use core::fmt;

/// Aktion eines Zustands
///
/// Plain function pointer: `Copy`, kein Heap, und jede nicht-capturende
/// Closure lässt sich darauf coercen.
pub type Action<C> = fn(&mut C);

pub struct State<C> {
    name: &'static str,
    action: Option<Action<C>>,
}

impl<C> State<C> {
    /// Zustand ohne Aktion (reiner Marker, z.B. "Power On")
    pub const fn new(name: &'static str) -> Self {
        Self { name, action: None }
    }

    pub const fn with_action(name: &'static str, action: Action<C>) -> Self {
        Self {
            name,
            action: Some(action),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Führt die gebundene Aktion aus. Fehlende Aktion ist kein Fehler.
    pub fn perform_action(&self, ctx: &mut C) {
        if let Some(action) = self.action {
            action(ctx);
        }
    }

    /// Ersetzt die gebundene Aktion
    pub fn set_action(&mut self, action: Action<C>) {
        self.action = Some(action);
    }

    pub fn clear_action(&mut self) {
        self.action = None;
    }

    pub fn action(&self) -> Option<Action<C>> {
        self.action
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

// Manuelle Impls: derive würde `C: Clone` bzw. `C: PartialEq` verlangen,
// obwohl `C` nur im Funktionszeiger vorkommt.

impl<C> Clone for State<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for State<C> {}

/// Gleichheit ausschließlich über den Namen
impl<C> PartialEq for State<C> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<C> Eq for State<C> {}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<C> defmt::Format for State<C> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "State {{ name: {}, action: {} }}", self.name, self.action.is_some())
    }
}
