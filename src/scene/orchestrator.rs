//! Per-frame driver

use rand::rngs::StdRng;
use winit::keyboard::KeyCode;

use crate::core::input::InputState;
use crate::core::types::Mat4;
use crate::overlay::{Overlay, draw_panels};
use crate::render::backend::{DepthFunc, Geometry, Program, RenderBackend, TextureId};
use crate::scene::composer::SceneObject;
use crate::scene::state::SceneState;

/// Cursor handling the window should apply after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Grabbed,
    Released,
}

/// What the frame asks of the window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub exit: bool,
    pub cursor: Option<CursorMode>,
}

/// Owns the scene and turns one frame of input into one frame of draw calls
pub struct FrameOrchestrator {
    state: SceneState,
    rng: StdRng,
    aspect: f32,
    airplane_model: Mat4,
    rain_instances: Vec<Mat4>,
}

impl FrameOrchestrator {
    pub fn new(state: SceneState, rng: StdRng) -> Self {
        let capacity = state.rain.len();
        Self {
            state,
            rng,
            aspect: 800.0 / 600.0,
            airplane_model: Mat4::IDENTITY,
            rain_instances: Vec::with_capacity(capacity),
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Run one frame. `elapsed` is seconds since startup.
    pub fn frame(
        &mut self,
        elapsed: f32,
        input: &InputState,
        backend: &mut dyn RenderBackend,
        overlay: &mut dyn Overlay,
    ) -> FrameOutcome {
        let outcome = self.apply_input(elapsed, input);
        self.update(elapsed);
        self.render(backend, overlay);
        outcome
    }

    /// Key edges first, then continuous camera movement
    pub fn apply_input(&mut self, elapsed: f32, input: &InputState) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        let state = &mut self.state;

        if input.is_key_just_pressed(KeyCode::Escape) {
            outcome.exit = true;
        }

        if input.is_key_just_pressed(KeyCode::F1) {
            state.overlay_enabled = !state.overlay_enabled;
            if state.overlay_enabled {
                state.controller.mouse_update = false;
                outcome.cursor = Some(CursorMode::Released);
            } else {
                outcome.cursor = Some(CursorMode::Grabbed);
            }
            log::info!("overlay {}", if state.overlay_enabled { "shown" } else { "hidden" });
        }

        if input.is_key_just_pressed(KeyCode::KeyR) {
            state.weather = state.weather.cycle();
            log::info!("weather: {}", state.weather);
        }

        if input.is_key_just_pressed(KeyCode::KeyP) {
            state.lamps.outdoor_on = !state.lamps.outdoor_on;
            log::info!("outdoor lamp: {}", state.lamps.outdoor_on);
        }

        if input.is_key_just_pressed(KeyCode::KeyL) {
            state.lamps.indoor_on = !state.lamps.indoor_on;
            log::info!("indoor lamp: {}", state.lamps.indoor_on);
        }

        if input.is_key_just_pressed(KeyCode::KeyC) {
            let base = state.composer.placement(SceneObject::Airplane).position;
            state.flight.toggle_crash(base, elapsed);
        }

        if input.is_key_just_pressed(KeyCode::KeyM) {
            state.controller.mouse_update = !state.controller.mouse_update;
            log::info!("camera mouse update: {}", state.controller.mouse_update);
        }

        if input.is_key_just_pressed(KeyCode::KeyQ) {
            state.composer.step_height_scale(-1.0);
            log::debug!("height scale: {:.3}", state.composer.height_scale());
        }
        if input.is_key_just_pressed(KeyCode::KeyE) {
            state.composer.step_height_scale(1.0);
            log::debug!("height scale: {:.3}", state.composer.height_scale());
        }

        state.controller.update(&mut state.camera, input);
        outcome
    }

    /// Advance lights, airplane and particles by one frame
    pub fn update(&mut self, elapsed: f32) {
        let state = &mut self.state;

        // The flash is decided first so the sun dims on the same frame the bolt shows
        state.flash = if state.weather.is_storm() {
            state.lightning.advance(&mut self.rng)
        } else {
            None
        };
        state.lighting.update(state.weather, state.flash.is_some(), state.lamps);

        let airplane = *state.composer.placement(SceneObject::Airplane);
        self.airplane_model = state.flight.advance(airplane.position, airplane.scale, elapsed);

        match state.weather.rain_scale() {
            Some(scale) => {
                state.rain.advance();
                state.rain.write_instance_matrices(scale, &mut self.rain_instances);
            }
            None => self.rain_instances.clear(),
        }
        log::trace!("frame at {:.3}s, flash: {}", elapsed, state.flash.is_some());
    }

    /// Issue this frame's draw calls
    pub fn render(&mut self, backend: &mut dyn RenderBackend, overlay: &mut dyn Overlay) {
        let state = &mut self.state;
        let camera = &state.camera;
        let projection = camera.projection_matrix(self.aspect);
        let view = camera.view_matrix();

        backend.clear(state.clear_color);

        // Opaque models
        backend.use_program(Program::Model);
        backend.set_mat4("projection", projection);
        backend.set_mat4("view", view);
        backend.set_vec3("viewPosition", camera.position);
        backend.set_float("material.shininess", state.config.material_shininess);

        let lighting = &state.lighting;
        let sun = &lighting.dir_light;
        backend.set_vec3("dirLight.direction", sun.direction);
        backend.set_vec3("dirLight.ambient", sun.ambient);
        backend.set_vec3("dirLight.diffuse", sun.diffuse);
        backend.set_vec3("dirLight.specular", sun.specular);

        let outdoor = &lighting.outdoor;
        backend.set_vec3("pointLight.position", outdoor.position);
        backend.set_vec3("pointLight.ambient", outdoor.ambient);
        backend.set_vec3("pointLight.diffuse", outdoor.diffuse);
        backend.set_vec3("pointLight.specular", outdoor.specular);
        backend.set_float("pointLight.constant", outdoor.constant);
        backend.set_float("pointLight.linear", outdoor.linear);
        backend.set_float("pointLight.quadratic", outdoor.quadratic);

        let indoor = &lighting.indoor;
        backend.set_vec3("indoorLight.position", indoor.position);
        backend.set_vec3("indoorLight.ambient", indoor.ambient);
        backend.set_vec3("indoorLight.diffuse", indoor.diffuse);
        backend.set_vec3("indoorLight.specular", indoor.specular);
        backend.set_float("indoorLight.constant", indoor.constant);
        backend.set_float("indoorLight.linear", indoor.linear);
        backend.set_float("indoorLight.quadratic", indoor.quadratic);

        for object in SceneObject::MODELS {
            let model = match object {
                SceneObject::Airplane => self.airplane_model,
                other => state.composer.model_matrix(other),
            };
            backend.set_mat4("model", model);
            backend.draw(Geometry::Model(object));
        }

        // Parallax floor
        backend.use_program(Program::Parallax);
        backend.set_mat4("projection", projection);
        backend.set_mat4("view", view);
        backend.set_mat4("model", state.composer.model_matrix(SceneObject::ParallaxFloor));
        backend.set_vec3("viewPos", camera.position);
        backend.set_vec3("lightPos", indoor.position);
        backend.set_float("heightScale", state.composer.height_scale());
        backend.bind_texture(0, TextureId::FloorDiffuse);
        backend.bind_texture(1, TextureId::FloorNormal);
        backend.bind_texture(2, TextureId::FloorDepth);
        backend.draw(Geometry::FloorQuad);

        // Billboards are visible from both sides
        backend.set_face_culling(false);
        backend.use_program(Program::Blending);
        backend.set_mat4("projection", projection);
        backend.set_mat4("view", view);
        if !self.rain_instances.is_empty() {
            backend.bind_texture(0, TextureId::Rain);
            backend.draw_instanced(Geometry::BillboardQuad, &self.rain_instances);
        }
        if let Some(flash) = state.flash {
            backend.bind_texture(0, TextureId::Lightning);
            backend.draw_instanced(Geometry::BillboardQuad, &[flash.model_matrix()]);
        }
        backend.set_face_culling(true);

        // Skybox last, at the far plane
        backend.set_depth_func(DepthFunc::LessEqual);
        backend.use_program(Program::Skybox);
        backend.set_mat4("view", camera.rotation_only_view());
        backend.set_mat4("projection", projection);
        backend.bind_texture(0, TextureId::Skybox(state.weather.skybox()));
        backend.draw(Geometry::SkyboxCube);
        backend.set_depth_func(DepthFunc::Less);

        if state.overlay_enabled {
            draw_panels(state, overlay);
        }
    }
}
