//! Keyboard state fed into the per-frame update.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Keys currently held plus the pending pause toggle
///
/// Filled by the window event handler and consumed by [`crate::scene::Scene::update`].
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pause_toggled: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down event
    ///
    /// OS auto-repeat re-sends presses for held keys; those are ignored so
    /// Space toggles pause once per physical press.
    pub fn press(&mut self, key: KeyCode) {
        let newly_pressed = self.held.insert(key);
        if newly_pressed && key == KeyCode::Space {
            self.pause_toggled = !self.pause_toggled;
        }
    }

    /// Record a key-up event
    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Whether pause should flip this frame (clears the flag)
    pub fn take_pause_toggle(&mut self) -> bool {
        std::mem::take(&mut self.pause_toggled)
    }

    /// Forget every held key, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
        self.pause_toggled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        assert!(input.is_down(KeyCode::KeyW));
        input.release(KeyCode::KeyW);
        assert!(!input.is_down(KeyCode::KeyW));
    }

    #[test]
    fn test_space_toggles_pause_once_per_press() {
        let mut input = InputState::new();
        input.press(KeyCode::Space);
        // Auto-repeat
        input.press(KeyCode::Space);
        input.press(KeyCode::Space);
        assert!(input.take_pause_toggle());
        assert!(!input.take_pause_toggle());
        assert!(input.is_down(KeyCode::Space));

        input.release(KeyCode::Space);
        input.press(KeyCode::Space);
        assert!(input.take_pause_toggle());
    }

    #[test]
    fn test_two_presses_in_one_frame_cancel() {
        let mut input = InputState::new();
        input.press(KeyCode::Space);
        input.release(KeyCode::Space);
        input.press(KeyCode::Space);
        assert!(!input.take_pause_toggle());
    }
}
