//! Light parameters derived from weather and lamp toggles

use serde::{Deserialize, Serialize};

use crate::atmosphere::weather::Weather;
use crate::core::types::Vec3;

/// Directional "sun" light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// Attenuated point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    /// Street lamp on the island
    pub fn outdoor() -> Self {
        Self {
            position: Vec3::new(-10.8, -59.0, -9.56),
            ambient: OUTDOOR_AMBIENT,
            diffuse: Vec3::splat(0.6),
            specular: Vec3::ONE,
            constant: 14.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }

    /// Lamp hanging above the table
    pub fn indoor() -> Self {
        Self {
            position: Vec3::new(5.0, -78.0, 12.0),
            ambient: Vec3::ZERO,
            diffuse: Vec3::new(0.8, 0.8, 0.4),
            specular: Vec3::ONE,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Sun direction, constant across presets
pub const SUN_DIRECTION: Vec3 = Vec3::new(0.0, -30.0, -42.0);
const OUTDOOR_AMBIENT: Vec3 = Vec3::splat(8.0);
const INDOOR_AMBIENT: Vec3 = Vec3::new(2.5, 2.5, 0.0);

/// Manual lamp toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LampState {
    pub outdoor_on: bool,
    pub indoor_on: bool,
}

impl Default for LampState {
    fn default() -> Self {
        Self {
            outdoor_on: true,
            indoor_on: false,
        }
    }
}

/// Holds the three scene lights and recomputes their varying terms each frame.
///
/// Only the directional light and the point light ambients change; positions
/// and attenuation stay as configured (the overlay may edit the outdoor terms).
#[derive(Debug, Clone)]
pub struct LightingModel {
    pub dir_light: DirLight,
    pub outdoor: PointLight,
    pub indoor: PointLight,
}

impl LightingModel {
    pub fn new() -> Self {
        Self {
            dir_light: sun_for(Weather::Sunny, false),
            outdoor: PointLight::outdoor(),
            indoor: PointLight::indoor(),
        }
    }

    /// Recompute for this frame. `flash` is the lightning state and only
    /// matters during a storm.
    pub fn update(&mut self, weather: Weather, flash: bool, lamps: LampState) {
        self.dir_light = sun_for(weather, flash);
        self.outdoor.ambient = if lamps.outdoor_on { OUTDOOR_AMBIENT } else { Vec3::ZERO };
        self.indoor.ambient = if lamps.indoor_on { INDOOR_AMBIENT } else { Vec3::ZERO };
    }
}

impl Default for LightingModel {
    fn default() -> Self {
        Self::new()
    }
}

fn sun_for(weather: Weather, flash: bool) -> DirLight {
    let (ambient, diffuse, specular) = match weather {
        Weather::Sunny => (0.3, 0.3, 0.3),
        Weather::Rainy => (0.25, 0.25, 0.25),
        Weather::Storm if flash => (0.1, 0.2, 0.2),
        Weather::Storm => (0.0, 0.2, 0.2),
    };
    DirLight {
        direction: SUN_DIRECTION,
        ambient: Vec3::splat(ambient),
        diffuse: Vec3::splat(diffuse),
        specular: Vec3::splat(specular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_light_table() {
        let mut model = LightingModel::new();
        let lamps = LampState::default();
        let cases = [
            (Weather::Sunny, false, 0.3, 0.3),
            (Weather::Sunny, true, 0.3, 0.3),
            (Weather::Rainy, false, 0.25, 0.25),
            (Weather::Storm, true, 0.1, 0.2),
            (Weather::Storm, false, 0.0, 0.2),
        ];
        for (weather, flash, ambient, diffuse) in cases {
            model.update(weather, flash, lamps);
            assert_eq!(model.dir_light.ambient, Vec3::splat(ambient), "{weather} flash={flash}");
            assert_eq!(model.dir_light.diffuse, Vec3::splat(diffuse), "{weather} flash={flash}");
            assert_eq!(model.dir_light.specular, Vec3::splat(diffuse), "{weather} flash={flash}");
            assert_eq!(model.dir_light.direction, SUN_DIRECTION);
        }
    }

    #[test]
    fn test_lamp_ambient_all_toggles() {
        let mut model = LightingModel::new();
        for weather in [Weather::Sunny, Weather::Rainy, Weather::Storm] {
            for outdoor_on in [false, true] {
                for indoor_on in [false, true] {
                    model.update(weather, false, LampState { outdoor_on, indoor_on });
                    let expect_out = if outdoor_on { Vec3::splat(8.0) } else { Vec3::ZERO };
                    let expect_in = if indoor_on { Vec3::new(2.5, 2.5, 0.0) } else { Vec3::ZERO };
                    assert_eq!(model.outdoor.ambient, expect_out);
                    assert_eq!(model.indoor.ambient, expect_in);
                }
            }
        }
    }

    #[test]
    fn test_update_keeps_attenuation_edits() {
        let mut model = LightingModel::new();
        model.outdoor.linear = 0.5;
        model.update(Weather::Rainy, false, LampState::default());
        assert_eq!(model.outdoor.linear, 0.5);
        assert_eq!(model.outdoor.constant, 14.0);
    }
}
