//! Free-fly camera

use crate::core::types::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const ZOOM_RANGE: (f32, f32) = (1.0, 45.0);

/// Direction of a camera move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Euler-angle camera. Angles are stored in degrees, the basis vectors are
/// derived from them whenever they change.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            near: 0.1,
            far: 1000.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Point the camera along `front`, re-deriving yaw and pitch from it.
    /// A zero vector leaves the orientation unchanged.
    pub fn set_front(&mut self, front: Vec3) {
        let Some(dir) = front.try_normalize() else {
            return;
        };
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.update_vectors();
        // Keep the exact stored direction when it was reachable
        if dir.y.abs() < PITCH_LIMIT.to_radians().sin() {
            self.front = dir;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// View matrix with the translation removed, for the skybox
    pub fn rotation_only_view(&self) -> Mat4 {
        let mut view = self.view_matrix();
        view.w_axis = glam::Vec4::W;
        view
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, self.near, self.far)
    }

    /// Move by `movement_speed * step` along the given direction
    pub fn process_movement(&mut self, direction: Movement, step: f32) {
        let velocity = self.movement_speed * step;
        let offset = match direction {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Left => -self.right,
            Movement::Right => self.right,
            Movement::Up => self.up,
            Movement::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// Mouse offsets follow the convention x right, y up
    pub fn process_mouse(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_faces_negative_z() {
        let camera = Camera::default();
        assert!((camera.front() - Vec3::NEG_Z).length() < 1e-5);
        assert!((camera.right() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_set_front_derives_angles() {
        let mut camera = Camera::default();
        let dir = Vec3::new(1.0, 0.5, 1.0).normalize();
        camera.set_front(dir);
        assert!((camera.front() - dir).length() < 1e-5);

        // A zero mouse move must not snap back to the default facing
        camera.process_mouse(0.0, 0.0);
        assert!((camera.front() - dir).length() < 1e-4);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);
    }

    #[test]
    fn test_zoom_range() {
        let mut camera = Camera::default();
        camera.process_scroll(100.0);
        assert_eq!(camera.zoom, 1.0);
        camera.process_scroll(-100.0);
        assert_eq!(camera.zoom, 45.0);
    }

    #[test]
    fn test_movement_step() {
        let mut camera = Camera::default();
        camera.process_movement(Movement::Forward, 0.2);
        assert!((camera.position - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
        camera.process_movement(Movement::Up, 0.2);
        assert!((camera.position.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_only_view_drops_translation() {
        let camera = Camera::new(Vec3::new(10.0, 20.0, 30.0));
        let view = camera.rotation_only_view();
        assert_eq!(view.w_axis, glam::Vec4::W);
    }
}
