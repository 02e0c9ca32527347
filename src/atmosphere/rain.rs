//! Rain particle pool.
//!
//! A fixed pool of billboard drops that fall by a constant amount each frame
//! and wrap from the bottom of the band back to the top.

use rand::Rng;

use crate::core::types::{Mat4, Vec3};

pub const RAIN_PARTICLE_COUNT: usize = 30_000;
/// Fall distance per frame
pub const RAIN_FALL_STEP: f32 = 0.1;
pub const RAIN_TOP: f32 = 50.0;
pub const RAIN_BOTTOM: f32 = -50.0;

/// One rain drop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainParticle {
    pub position: Vec3,
    /// Rotation about the vertical axis, in degrees
    pub rotation_degrees: f32,
}

/// Pool of rain drops, allocated once
pub struct RainField {
    particles: Vec<RainParticle>,
    fall_step: f32,
}

impl RainField {
    /// Spawn the full pool.
    ///
    /// x and z are whole numbers in `[-100, 100]`. y is a whole number in
    /// `[-200, 200]`, so the first advances pull stragglers into the band.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_count(rng, RAIN_PARTICLE_COUNT)
    }

    pub fn with_count<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let particles = (0..count)
            .map(|i| RainParticle {
                position: Vec3::new(
                    rng.gen_range(-100..=100) as f32,
                    rng.gen_range(-200..=200) as f32,
                    rng.gen_range(-100..=100) as f32,
                ),
                rotation_degrees: (i % 180) as f32,
            })
            .collect();
        Self {
            particles,
            fall_step: RAIN_FALL_STEP,
        }
    }

    /// Override the per-frame fall distance
    pub fn with_fall_step(mut self, step: f32) -> Self {
        self.fall_step = step;
        self
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[RainParticle] {
        &self.particles
    }

    /// Advance every drop by one frame
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.position.y -= self.fall_step;
            if p.position.y < RAIN_BOTTOM {
                p.position.y = RAIN_TOP;
            }
        }
    }

    /// Per-instance model matrices for the blending pass
    pub fn instance_matrices(&self, scale: f32) -> Vec<Mat4> {
        let mut out = Vec::with_capacity(self.particles.len());
        self.write_instance_matrices(scale, &mut out);
        out
    }

    /// Same as [`instance_matrices`](Self::instance_matrices) but reusing `out`
    pub fn write_instance_matrices(&self, scale: f32, out: &mut Vec<Mat4>) {
        out.clear();
        let s = Mat4::from_scale(Vec3::splat(scale));
        out.extend(self.particles.iter().map(|p| {
            s * Mat4::from_translation(p.position) * Mat4::from_rotation_y(p.rotation_degrees.to_radians())
        }));
    }
}
