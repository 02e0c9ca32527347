//! Airplane flight and crash

use crate::core::types::{Mat4, Vec3};

/// Point the orbit circles, relative to the base position
pub const ORBIT_PIVOT: Vec3 = Vec3::new(30.0, 10.0, 10.0);
/// Per-frame displacement while falling
pub const FALL_STEP: Vec3 = Vec3::new(0.4, -0.6, 0.06);
/// Tumble per frame, degrees
pub const TUMBLE_STEP_DEGREES: f32 = 40.0;
/// Falling stops once the plane reaches this height
pub const CRASH_FLOOR: f32 = -95.0;

#[derive(Debug, Clone, PartialEq)]
enum FlightMode {
    Orbiting,
    Falling(Fall),
}

#[derive(Debug, Clone, PartialEq)]
struct Fall {
    position: Vec3,
    /// Orbit rotation frozen at the moment of the crash
    rotation: Mat4,
    tumble_degrees: f32,
    /// Flip about z so the plane does not fall upside down
    corrected: bool,
}

/// Airplane transform source.
///
/// Orbiting is a pure function of elapsed time. Falling starts from the orbit
/// state at the crash time and accumulates position and tumble per frame.
#[derive(Debug, Clone)]
pub struct FlightController {
    mode: FlightMode,
}

impl FlightController {
    pub fn new() -> Self {
        Self {
            mode: FlightMode::Orbiting,
        }
    }

    pub fn is_crashed(&self) -> bool {
        matches!(self.mode, FlightMode::Falling(_))
    }

    /// Flip between orbiting and falling at elapsed time `t` (seconds)
    pub fn toggle_crash(&mut self, base: Vec3, t: f32) {
        self.mode = match self.mode {
            FlightMode::Orbiting => {
                let rotation = orbit_rotation(t);
                let corrected = needs_correction(&rotation);
                log::info!("airplane crashing at t={:.2}s (corrected: {})", t, corrected);
                FlightMode::Falling(Fall {
                    position: base,
                    rotation,
                    tumble_degrees: 0.0,
                    corrected,
                })
            }
            FlightMode::Falling(_) => {
                log::info!("airplane back in the air");
                FlightMode::Orbiting
            }
        };
    }

    /// Produce this frame's model matrix and advance a fall by one frame.
    ///
    /// `base` and `scale` are the overlay-editable placement; `base` only
    /// matters while orbiting since a fall freezes its start position.
    pub fn advance(&mut self, base: Vec3, scale: f32, t: f32) -> Mat4 {
        let s = Mat4::from_scale(Vec3::splat(scale));
        match &mut self.mode {
            FlightMode::Orbiting => Mat4::from_translation(base) * orbit_rotation(t) * s,
            FlightMode::Falling(fall) => {
                let flip = if fall.corrected {
                    Mat4::from_rotation_z(180f32.to_radians())
                } else {
                    Mat4::IDENTITY
                };
                let model = Mat4::from_translation(fall.position)
                    * s
                    * Mat4::from_rotation_x(fall.tumble_degrees.to_radians())
                    * flip
                    * fall.rotation;

                if fall.position.y > CRASH_FLOOR {
                    fall.position += FALL_STEP;
                    fall.tumble_degrees += TUMBLE_STEP_DEGREES;
                }
                model
            }
        }
    }

    /// Current position: the orbit base while flying, the fall position after a crash
    pub fn position(&self, base: Vec3) -> Vec3 {
        match &self.mode {
            FlightMode::Orbiting => base,
            FlightMode::Falling(fall) => fall.position,
        }
    }
}

impl Default for FlightController {
    fn default() -> Self {
        Self::new()
    }
}

/// `translate(pivot) * rotate_y(t) * translate(-pivot)`, with `t` in radians
fn orbit_rotation(t: f32) -> Mat4 {
    Mat4::from_translation(ORBIT_PIVOT) * Mat4::from_rotation_y(t) * Mat4::from_translation(-ORBIT_PIVOT)
}

/// The heading at crash time decides whether the plane needs flipping: it
/// does when exactly one of the first two diagonal terms is negative.
fn needs_correction(rotation: &Mat4) -> bool {
    (rotation.x_axis.x < 0.0) != (rotation.y_axis.y < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Vec3 = Vec3::new(200.0, 150.0, 30.0);
    const SCALE: f32 = 3.5;

    #[test]
    fn test_orbit_is_stateless() {
        let mut flight = FlightController::new();
        let a = flight.advance(BASE, SCALE, 1.25);
        let b = flight.advance(BASE, SCALE, 1.25);
        assert_eq!(a, b);

        let expected = Mat4::from_translation(BASE)
            * Mat4::from_translation(ORBIT_PIVOT)
            * Mat4::from_rotation_y(1.25)
            * Mat4::from_translation(-ORBIT_PIVOT)
            * Mat4::from_scale(Vec3::splat(SCALE));
        assert!(a.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_fall_then_rest() {
        let mut flight = FlightController::new();
        flight.toggle_crash(BASE, 2.0);
        assert!(flight.is_crashed());

        // The base moving after the crash must not matter
        let moved = BASE + Vec3::splat(50.0);
        let mut frames = 0;
        while flight.position(moved).y > CRASH_FLOOR {
            let before = flight.position(moved);
            flight.advance(moved, SCALE, 2.0 + frames as f32);
            assert!(flight.position(moved).y < before.y);
            frames += 1;
            assert!(frames < 1000);
        }

        // (150 + 95) / 0.6 rounds up to 409 steps
        assert_eq!(frames, 409);
        let rest = flight.position(moved);
        let a = flight.advance(moved, SCALE, 0.0);
        let b = flight.advance(moved, SCALE, 99.0);
        assert_eq!(a, b);
        assert_eq!(flight.position(moved), rest);
        assert!(rest.y <= CRASH_FLOOR);
    }

    #[test]
    fn test_first_fall_frame_uses_frozen_state() {
        let mut flight = FlightController::new();
        flight.toggle_crash(BASE, 0.0);
        let m = flight.advance(BASE, SCALE, 10.0);
        // rotation(0) is identity and no tumble yet
        assert!(m.abs_diff_eq(Mat4::from_translation(BASE) * Mat4::from_scale(Vec3::splat(SCALE)), 1e-4));
        assert_eq!(flight.position(BASE), BASE + FALL_STEP);
    }

    #[test]
    fn test_uncrash_restores_orbit() {
        let mut flight = FlightController::new();
        flight.toggle_crash(BASE, 1.0);
        for _ in 0..10 {
            flight.advance(BASE, SCALE, 1.0);
        }
        flight.toggle_crash(BASE, 3.0);
        assert!(!flight.is_crashed());

        let mut fresh = FlightController::new();
        assert_eq!(flight.advance(BASE, SCALE, 3.0), fresh.advance(BASE, SCALE, 3.0));
    }

    #[test]
    fn test_correction_quadrants() {
        // cos(t) on x, y diagonal is always 1 for a pure y rotation
        assert!(!needs_correction(&orbit_rotation(0.5)));
        assert!(needs_correction(&orbit_rotation(2.5)));
        assert!(needs_correction(&orbit_rotation(-2.0)));
        assert!(!needs_correction(&orbit_rotation(6.0)));
    }
}
