// Session gate - authentication flag and derived edit mode
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct GateState {
    authenticated: bool,
    edit_mode: bool,
}

/// Tracks whether the current caller is authenticated and whether edit mode
/// is active. Edit mode can only be true while authenticated; both flags
/// live behind one mutex so transitions are observed atomically.
#[derive(Clone, Default)]
pub struct SessionGate {
    state: Arc<Mutex<GateState>>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setting false forces edit mode off in the same transition.
    pub fn set_authenticated(&self, authenticated: bool) {
        let mut state = self.state.lock().unwrap();
        state.authenticated = authenticated;
        if !authenticated {
            state.edit_mode = false;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().authenticated
    }

    /// Succeeds only while authenticated. Failing to enter edit mode is an
    /// expected, recoverable condition, so the result is a bool rather than
    /// an error.
    pub fn try_enable_edit_mode(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.authenticated {
            state.edit_mode = true;
        }
        state.edit_mode
    }

    pub fn disable_edit_mode(&self) {
        self.state.lock().unwrap().edit_mode = false;
    }

    pub fn is_edit_mode(&self) -> bool {
        self.state.lock().unwrap().edit_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_mode_requires_authentication() {
        let gate = SessionGate::new();
        assert!(!gate.try_enable_edit_mode());
        assert!(!gate.is_edit_mode());

        gate.set_authenticated(true);
        assert!(gate.try_enable_edit_mode());
        assert!(gate.is_edit_mode());
    }

    #[test]
    fn test_deauthentication_forces_edit_mode_off() {
        let gate = SessionGate::new();
        gate.set_authenticated(true);
        assert!(gate.try_enable_edit_mode());

        gate.set_authenticated(false);
        assert!(!gate.is_edit_mode());
        assert!(!gate.try_enable_edit_mode());
    }

    #[test]
    fn test_disable_always_succeeds() {
        let gate = SessionGate::new();
        gate.disable_edit_mode();
        assert!(!gate.is_edit_mode());

        gate.set_authenticated(true);
        gate.try_enable_edit_mode();
        gate.disable_edit_mode();
        assert!(!gate.is_edit_mode());
        // Still authenticated, edit mode can come back.
        assert!(gate.try_enable_edit_mode());
    }
}
