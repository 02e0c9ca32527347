//! Input state tracking

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels per scroll "line" for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Tracks keyboard, mouse and scroll input for one frame.
///
/// Edges (`is_key_just_pressed`) and deltas are cleared by `end_frame`.
pub struct InputState {
    keys_pressed: HashSet<KeyCode>,
    keys_just_pressed: HashSet<KeyCode>,
    keys_just_released: HashSet<KeyCode>,
    /// Mouse movement delta for the current frame
    mouse_delta: (f32, f32),
    /// Raw motion gathered while the cursor is grabbed
    mouse_delta_accumulated: (f32, f32),
    mouse_position: Option<(f32, f32)>,
    /// Vertical scroll in lines, positive away from the user
    scroll_delta: f32,
    mouse_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            keys_just_released: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            mouse_delta_accumulated: (0.0, 0.0),
            mouse_position: None,
            scroll_delta: 0.0,
            mouse_captured: false,
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => match state {
                ElementState::Pressed => self.press_key(*key_code),
                ElementState::Released => self.release_key(*key_code),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                // The first sample only seeds the position so the view does not jump
                if let Some(last) = self.mouse_position
                    && !self.mouse_captured
                {
                    self.mouse_delta.0 += new_pos.0 - last.0;
                    self.mouse_delta.1 += new_pos.1 - last.1;
                }
                self.mouse_position = Some(new_pos);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.add_scroll(lines);
            }
            _ => {}
        }
    }

    /// Process device event for raw mouse motion (when cursor is grabbed)
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta_accumulated.0 += delta.0 as f32;
        self.mouse_delta_accumulated.1 += delta.1 as f32;
        if self.mouse_captured {
            self.mouse_delta = self.mouse_delta_accumulated;
        }
    }

    /// Register a key press. Repeats of a held key produce no new edge.
    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_pressed.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        if self.keys_pressed.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    pub fn add_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
        self.mouse_delta = (0.0, 0.0);
        self.mouse_delta_accumulated = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if key was pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Mouse delta for this frame, x right and y down
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Set mouse captured state
    pub fn set_mouse_captured(&mut self, captured: bool) {
        self.mouse_captured = captured;
        self.mouse_delta = (0.0, 0.0);
        self.mouse_delta_accumulated = (0.0, 0.0);
    }

    pub fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press() {
        let mut input = InputState::new();

        assert!(!input.is_key_pressed(KeyCode::KeyW));

        input.press_key(KeyCode::KeyW);

        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_just_pressed(KeyCode::KeyW));

        input.end_frame();

        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_held_key_has_single_edge() {
        let mut input = InputState::new();
        input.press_key(KeyCode::KeyR);
        input.end_frame();
        // OS key repeat
        input.press_key(KeyCode::KeyR);
        assert!(!input.is_key_just_pressed(KeyCode::KeyR));

        input.release_key(KeyCode::KeyR);
        assert!(input.is_key_just_released(KeyCode::KeyR));
        input.end_frame();
        input.press_key(KeyCode::KeyR);
        assert!(input.is_key_just_pressed(KeyCode::KeyR));
    }

    #[test]
    fn test_raw_motion_when_captured() {
        let mut input = InputState::new();
        input.set_mouse_captured(true);
        input.process_mouse_motion((3.0, -2.0));
        input.process_mouse_motion((1.0, 0.5));
        assert_eq!(input.mouse_delta(), (4.0, -1.5));

        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_scroll_resets_each_frame() {
        let mut input = InputState::new();
        input.add_scroll(1.0);
        input.add_scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.end_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
