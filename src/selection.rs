use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected,
}

/// Latches once a blink lands while the pointer is inside a zone.
///
/// There is no transition out of `Selected`; the latch holds for the rest of
/// the session.
#[derive(Debug, Clone, Default)]
pub struct SelectionStateMachine {
    state: SelectionState,
    zone: Option<String>,
    latched_at: Option<u64>,
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selected(&self) -> bool {
        self.state == SelectionState::Selected
    }

    /// Zone id that triggered the latch.
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Tick index at which the latch fired.
    pub fn latched_at(&self) -> Option<u64> {
        self.latched_at
    }

    /// Returns `true` only on the tick that performs `Idle -> Selected`.
    pub fn update(&mut self, tick: u64, blink: bool, hit_zone: Option<&str>) -> bool {
        match (self.state, blink, hit_zone) {
            (SelectionState::Idle, true, Some(zone)) => {
                self.state = SelectionState::Selected;
                self.zone = Some(zone.to_string());
                self.latched_at = Some(tick);
                info!(zone, tick, "Selection latched");
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let sm = SelectionStateMachine::new();
        assert_eq!(sm.state(), SelectionState::Idle);
        assert!(!sm.is_selected());
        assert_eq!(sm.zone(), None);
    }

    #[test]
    fn needs_blink_and_zone_together() {
        let mut sm = SelectionStateMachine::new();
        assert!(!sm.update(0, true, None));
        assert!(!sm.update(1, false, Some("left")));
        assert!(!sm.is_selected());
        assert!(sm.update(2, true, Some("left")));
        assert!(sm.is_selected());
        assert_eq!(sm.zone(), Some("left"));
        assert_eq!(sm.latched_at(), Some(2));
    }

    #[test]
    fn selected_is_sticky() {
        let mut sm = SelectionStateMachine::new();
        sm.update(0, true, Some("up"));
        let inputs = [(false, None), (true, None), (false, Some("down")), (true, Some("down"))];
        for (i, (blink, zone)) in inputs.into_iter().enumerate() {
            assert!(!sm.update(i as u64 + 1, blink, zone));
            assert!(sm.is_selected());
            assert_eq!(sm.zone(), Some("up"));
        }
    }
}
