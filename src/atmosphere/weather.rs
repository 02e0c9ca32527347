//! Weather state.
//!
//! Three discrete presets cycled by a single toggle. Transitions are
//! instantaneous: lighting and skybox follow on the next frame.

use serde::{Deserialize, Serialize};

/// Active weather preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
    Storm,
}

/// Which cubemap the skybox pass samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyboxSet {
    Sun,
    Rain,
    Storm,
}

impl SkyboxSet {
    pub const ALL: [SkyboxSet; 3] = [SkyboxSet::Sun, SkyboxSet::Rain, SkyboxSet::Storm];

    /// Directory name under `resources/textures`
    pub fn dir_name(self) -> &'static str {
        match self {
            SkyboxSet::Sun => "skyboxSun",
            SkyboxSet::Rain => "skyboxRain",
            SkyboxSet::Storm => "skyboxStorm",
        }
    }
}

impl Weather {
    /// Next preset in the Sunny -> Rainy -> Storm -> Sunny cycle
    pub fn cycle(self) -> Self {
        match self {
            Weather::Sunny => Weather::Rainy,
            Weather::Rainy => Weather::Storm,
            Weather::Storm => Weather::Sunny,
        }
    }

    /// Rain falls in both wet presets
    pub fn is_raining(self) -> bool {
        matches!(self, Weather::Rainy | Weather::Storm)
    }

    pub fn is_storm(self) -> bool {
        self == Weather::Storm
    }

    pub fn skybox(self) -> SkyboxSet {
        match self {
            Weather::Sunny => SkyboxSet::Sun,
            Weather::Rainy => SkyboxSet::Rain,
            Weather::Storm => SkyboxSet::Storm,
        }
    }

    /// Uniform scale applied to rain instances, `None` when dry
    pub fn rain_scale(self) -> Option<f32> {
        match self {
            Weather::Sunny => None,
            Weather::Rainy => Some(1.5),
            Weather::Storm => Some(2.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Rainy => "rainy",
            Weather::Storm => "storm",
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
