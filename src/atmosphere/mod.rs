//! Weather and lighting.
//!
//! [`Weather`] selects the preset; [`LightingModel`] turns it into light
//! parameters every frame; [`RainField`] and [`LightningTrigger`] produce the
//! particle passes the wet presets draw.

pub mod lighting;
pub mod lightning;
pub mod rain;
pub mod weather;

pub use lighting::{DirLight, LampState, LightingModel, PointLight};
pub use lightning::{LightningFlash, LightningTrigger};
pub use rain::{RainField, RainParticle, RAIN_PARTICLE_COUNT};
pub use weather::{SkyboxSet, Weather};
