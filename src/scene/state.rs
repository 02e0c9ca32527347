//! Mutable scene state owned by the frame loop

use rand::Rng;

use crate::atmosphere::{LampState, LightingModel, LightningFlash, LightningTrigger, RainField, Weather};
use crate::core::camera::Camera;
use crate::core::camera_controller::FlyCameraController;
use crate::core::types::Vec3;
use crate::scene::composer::{SceneComposer, SceneObject};
use crate::scene::config::SceneConfig;
use crate::scene::flight::FlightController;
use crate::scene::settings::ProgramSettings;

/// Everything a frame reads or changes
pub struct SceneState {
    pub weather: Weather,
    pub lamps: LampState,
    pub lighting: LightingModel,
    pub rain: RainField,
    pub lightning: LightningTrigger,
    /// Flash drawn this frame, if any
    pub flash: Option<LightningFlash>,
    pub flight: FlightController,
    pub composer: SceneComposer,
    pub camera: Camera,
    pub controller: FlyCameraController,
    pub clear_color: Vec3,
    pub overlay_enabled: bool,
    pub config: SceneConfig,
}

impl SceneState {
    pub fn new<R: Rng + ?Sized>(config: SceneConfig, settings: &ProgramSettings, rng: &mut R) -> Self {
        let mut camera = Camera::new(settings.camera_position);
        camera.set_front(settings.camera_front);

        let mut controller = FlyCameraController::new();
        // The overlay starts with its cursor released, so mouse look starts off too
        controller.mouse_update = !settings.overlay_enabled;

        Self {
            weather: Weather::default(),
            lamps: LampState::default(),
            lighting: LightingModel::new(),
            rain: RainField::with_count(rng, config.rain_particles).with_fall_step(config.rain_fall_step),
            lightning: LightningTrigger::new(rng),
            flash: None,
            flight: FlightController::new(),
            composer: SceneComposer::new(config.height_scale, config.height_scale_step),
            camera,
            controller,
            clear_color: settings.clear_color,
            overlay_enabled: settings.overlay_enabled,
            config,
        }
    }

    /// The subset persisted at shutdown
    pub fn settings(&self) -> ProgramSettings {
        ProgramSettings {
            clear_color: self.clear_color,
            overlay_enabled: self.overlay_enabled,
            camera_position: self.camera.position,
            camera_front: self.camera.front(),
        }
    }

    /// Where the airplane currently is
    pub fn airplane_position(&self) -> Vec3 {
        self.flight.position(self.composer.placement(SceneObject::Airplane).position)
    }
}
