//! Storm lightning.
//!
//! A frame counter fires one flash at the start of every cycle; each cycle
//! lasts a random number of frames drawn when the previous one ends.

use rand::Rng;

use crate::core::types::{Mat4, Vec3};

/// Minimum cycle length in frames
pub const LIGHTNING_MIN_FRAMES: u32 = 60;
/// Random extra frames, exclusive upper bound
pub const LIGHTNING_JITTER_FRAMES: u32 = 50;

/// Where bolts are anchored
pub const FLASH_ORIGIN: Vec3 = Vec3::new(0.0, 0.0, -300.0);

/// One flash quad for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningFlash {
    pub height: f32,
    pub width: f32,
    pub offset_x: f32,
    pub offset_z: f32,
}

impl LightningFlash {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let height = rng.gen_range(600.0..800.0f32);
        Self {
            height,
            width: height / 4.0,
            offset_x: rng.gen_range(-2.5..2.5f32),
            offset_z: rng.gen_range(-2.5..2.5f32),
        }
    }

    /// Model matrix of the vertical billboard
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(FLASH_ORIGIN)
            * Mat4::from_scale(Vec3::new(self.width, self.height, self.width))
            * Mat4::from_translation(Vec3::new(self.offset_x, 0.0, self.offset_z))
    }
}

/// Frame-counted flash generator
#[derive(Debug, Clone)]
pub struct LightningTrigger {
    counter: u32,
    threshold: u32,
}

impl LightningTrigger {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            counter: 0,
            threshold: draw_threshold(rng),
        }
    }

    /// Advance one storm frame. Returns the flash to draw if this frame is lit.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<LightningFlash> {
        let flash = (self.counter == 0).then(|| LightningFlash::random(rng));
        self.counter += 1;
        if self.counter > self.threshold {
            self.counter = 0;
            self.threshold = draw_threshold(rng);
            log::trace!("lightning cycle reset, next threshold {}", self.threshold);
        }
        flash
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

fn draw_threshold<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    LIGHTNING_MIN_FRAMES + rng.gen_range(0..LIGHTNING_JITTER_FRAMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_first_frame_flashes() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut trigger = LightningTrigger::new(&mut rng);
        assert!(trigger.advance(&mut rng).is_some());
        assert!(trigger.advance(&mut rng).is_none());
    }

    #[test]
    fn test_threshold_range_and_spacing() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut trigger = LightningTrigger::new(&mut rng);
        let frames = 200_000;
        let mut flashes = 0;
        let mut last_lit = false;
        for _ in 0..frames {
            assert!((60..110).contains(&trigger.threshold()));
            let lit = trigger.advance(&mut rng).is_some();
            assert!(!(lit && last_lit), "two consecutive flash frames");
            flashes += lit as u32;
            last_lit = lit;
        }
        // Mean cycle is threshold + 1 frames, about 85.5
        let fraction = flashes as f64 / frames as f64;
        assert!((fraction - 1.0 / 85.5).abs() < 0.001, "fraction {fraction}");
    }

    #[test]
    fn test_flash_dimensions() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let flash = LightningFlash::random(&mut rng);
            assert!((600.0..800.0).contains(&flash.height));
            assert_eq!(flash.width, flash.height / 4.0);
            assert!((-2.5..2.5).contains(&flash.offset_x));
            assert!((-2.5..2.5).contains(&flash.offset_z));
        }
    }

    #[test]
    fn test_flash_transform() {
        let flash = LightningFlash { height: 800.0, width: 200.0, offset_x: 1.0, offset_z: -1.0 };
        let base = flash.model_matrix().transform_point3(Vec3::ZERO);
        assert!((base - Vec3::new(200.0, 0.0, -500.0)).length() < 1e-3);
    }
}
