//! Keyboard and mouse driven camera control

use crate::core::camera::{Camera, Movement};
use crate::core::input::InputState;
use winit::keyboard::KeyCode;

/// Fixed movement step applied every frame a movement key is held
pub const MOVEMENT_STEP: f32 = 0.2;

const BINDINGS: [(KeyCode, Movement); 6] = [
    (KeyCode::KeyW, Movement::Forward),
    (KeyCode::KeyS, Movement::Backward),
    (KeyCode::KeyA, Movement::Left),
    (KeyCode::KeyD, Movement::Right),
    (KeyCode::ArrowUp, Movement::Up),
    (KeyCode::ArrowDown, Movement::Down),
];

/// Fly-camera controller: WASD plus arrow keys for height, mouse look, scroll zoom.
///
/// Movement is frame-stepped, so speed scales with frame rate.
pub struct FlyCameraController {
    pub step: f32,
    /// When false mouse motion is ignored (overlay interaction)
    pub mouse_update: bool,
}

impl FlyCameraController {
    pub fn new() -> Self {
        Self {
            step: MOVEMENT_STEP,
            mouse_update: true,
        }
    }

    /// Update camera based on input
    pub fn update(&self, camera: &mut Camera, input: &InputState) {
        for (key, movement) in BINDINGS {
            if input.is_key_pressed(key) {
                camera.process_movement(movement, self.step);
            }
        }

        if self.mouse_update {
            let (dx, dy) = input.mouse_delta();
            if dx != 0.0 || dy != 0.0 {
                // Window y grows downward
                camera.process_mouse(dx, -dy);
            }
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            camera.process_scroll(scroll);
        }
    }
}

impl Default for FlyCameraController {
    fn default() -> Self {
        Self::new()
    }
}
