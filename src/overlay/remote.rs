//! Overlay served over the tuning protocol.
//!
//! Panels drawn each frame are published to [`SharedDebugState`]; edits sent by
//! a client are queued there and applied the next time the matching control is
//! drawn. The frame loop touches the shared state once before and once after
//! drawing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use diorama_debug::{
    ControlError, ControlInfo, ControlKind, ControlValue, DebugCommand, DebugHandler, DebugResponse,
    FpsWindowInfo, PanelInfo, ResponseData,
};

use crate::core::time::{FpsStats, FpsWindow};
use crate::core::types::Vec3;
use crate::overlay::Overlay;
use crate::scene::state::SceneState;

/// Title-bar hint telling where the F1 panels can be reached
pub fn panel_hint(debug_server: bool, port: u16) -> String {
    if debug_server {
        format!("F1=panels on tcp 127.0.0.1:{}", port)
    } else {
        "F1=panels (tuning server off)".to_string()
    }
}

/// Scene values reported to clients
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    pub weather: String,
    pub outdoor_lamp: bool,
    pub indoor_lamp: bool,
    pub crashed: bool,
    pub height_scale: f32,
    pub airplane_position: [f32; 3],
    pub lightning_active: bool,
    pub camera_position: [f32; 3],
    pub camera_forward: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub zoom_degrees: f32,
}

impl SceneSnapshot {
    pub fn capture(state: &SceneState) -> Self {
        let camera = &state.camera;
        Self {
            weather: state.weather.to_string(),
            outdoor_lamp: state.lamps.outdoor_on,
            indoor_lamp: state.lamps.indoor_on,
            crashed: state.flight.is_crashed(),
            height_scale: state.composer.height_scale(),
            airplane_position: state.airplane_position().to_array(),
            lightning_active: state.flash.is_some(),
            camera_position: camera.position.to_array(),
            camera_forward: camera.front().to_array(),
            yaw_degrees: camera.yaw,
            pitch_degrees: camera.pitch,
            zoom_degrees: camera.zoom,
        }
    }
}

/// State shared between the frame loop and the tuning server
#[derive(Debug, Default)]
pub struct SharedDebugState {
    pub overlay_enabled: bool,
    /// Panels from the last frame the overlay was drawn
    pub panels: Vec<PanelInfo>,
    /// Edits waiting for their control, by label
    pub pending_edits: HashMap<String, ControlValue>,
    pub scene: SceneSnapshot,
    pub fps: FpsStats,
}

impl SharedDebugState {
    fn control(&self, label: &str) -> Option<&ControlInfo> {
        self.panels.iter().flat_map(|p| &p.controls).find(|c| c.label == label)
    }
}

pub fn lock_shared(shared: &Mutex<SharedDebugState>) -> MutexGuard<'_, SharedDebugState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`Overlay`] that publishes its panels to the tuning server
pub struct RemoteOverlay {
    shared: Arc<Mutex<SharedDebugState>>,
    pending: HashMap<String, ControlValue>,
    panels: Vec<PanelInfo>,
}

impl RemoteOverlay {
    pub fn new(shared: Arc<Mutex<SharedDebugState>>) -> Self {
        Self {
            shared,
            pending: HashMap::new(),
            panels: Vec::new(),
        }
    }

    /// Take queued edits before the frame draws
    pub fn begin_frame(&mut self) {
        let mut shared = lock_shared(&self.shared);
        self.pending = std::mem::take(&mut shared.pending_edits);
        self.panels.clear();
    }

    /// Publish this frame's panels and scene values. Edits whose control was
    /// not drawn stay queued.
    pub fn end_frame(&mut self, state: &SceneState, fps: FpsStats) {
        let mut shared = lock_shared(&self.shared);
        for (label, value) in self.pending.drain() {
            shared.pending_edits.entry(label).or_insert(value);
        }
        if !self.panels.is_empty() {
            shared.panels = std::mem::take(&mut self.panels);
        }
        shared.overlay_enabled = state.overlay_enabled;
        shared.scene = SceneSnapshot::capture(state);
        shared.fps = fps;
    }

    fn record(&mut self, label: &str, kind: ControlKind, value: Option<ControlValue>, range: Option<[f32; 2]>) {
        if let Some(panel) = self.panels.last_mut() {
            panel.controls.push(ControlInfo {
                label: label.to_string(),
                kind,
                value,
                range,
            });
        }
    }

    /// Pop the queued edit for `label`, converted by `read`
    fn take_edit<T>(
        &mut self,
        label: &str,
        read: impl FnOnce(&ControlValue, &str) -> Result<T, ControlError>,
    ) -> Option<T> {
        let value = self.pending.remove(label)?;
        match read(&value, label) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("dropping tuning edit: {}", e);
                None
            }
        }
    }

    fn vec3_control(&mut self, label: &str, kind: ControlKind, value: &mut Vec3) -> bool {
        let edited = match self.take_edit(label, ControlValue::as_vec3) {
            Some(v) => {
                *value = Vec3::from_array(v);
                true
            }
            None => false,
        };
        self.record(label, kind, Some(ControlValue::Vec3(value.to_array())), None);
        edited
    }
}

impl Overlay for RemoteOverlay {
    fn begin(&mut self, title: &str) {
        self.panels.push(PanelInfo {
            title: title.to_string(),
            controls: Vec::new(),
        });
    }

    fn text(&mut self, text: &str) {
        self.record(text, ControlKind::Text, None, None);
    }

    fn color_edit3(&mut self, label: &str, value: &mut Vec3) -> bool {
        let edited = self.vec3_control(label, ControlKind::ColorEdit, value);
        *value = value.clamp(Vec3::ZERO, Vec3::ONE);
        edited
    }

    fn drag_float3(&mut self, label: &str, value: &mut Vec3, _speed: f32) -> bool {
        self.vec3_control(label, ControlKind::DragFloat3, value)
    }

    fn drag_float(&mut self, label: &str, value: &mut f32, _speed: f32, min: f32, max: f32) -> bool {
        let edited = match self.take_edit(label, ControlValue::as_float) {
            Some(v) => {
                *value = v.clamp(min, max);
                true
            }
            None => false,
        };
        self.record(label, ControlKind::DragFloat, Some(ControlValue::Float(*value)), Some([min, max]));
        edited
    }

    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let edited = match self.take_edit(label, ControlValue::as_bool) {
            Some(v) => {
                *value = v;
                true
            }
            None => false,
        };
        self.record(label, ControlKind::Checkbox, Some(ControlValue::Bool(*value)), None);
        edited
    }

    fn end(&mut self) {}
}

/// Answers tuning commands from the shared state
pub struct AppDebugHandler {
    pub state: Arc<Mutex<SharedDebugState>>,
}

impl DebugHandler for AppDebugHandler {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse {
        let mut s = lock_shared(&self.state);
        match cmd {
            DebugCommand::Ping => DebugResponse::pong(),

            DebugCommand::GetPanels => DebugResponse::ok(ResponseData::Panels {
                overlay_enabled: s.overlay_enabled,
                panels: s.panels.clone(),
            }),

            DebugCommand::SetControl { label, value } => {
                let Some(control) = s.control(&label) else {
                    return DebugResponse::error(format!("no control labelled `{}`", label));
                };
                let checked = match control.kind {
                    ControlKind::Text => {
                        return DebugResponse::error(format!("`{}` is not editable", label));
                    }
                    ControlKind::ColorEdit | ControlKind::DragFloat3 => value.as_vec3(&label).map(|_| ()),
                    ControlKind::DragFloat => value.as_float(&label).map(|_| ()),
                    ControlKind::Checkbox => value.as_bool(&label).map(|_| ()),
                };
                if let Err(e) = checked {
                    return DebugResponse::error(e.to_string());
                }
                s.pending_edits.insert(label.clone(), value);
                DebugResponse::ok(ResponseData::ControlQueued {
                    label,
                    pending: s.pending_edits.len(),
                })
            }

            DebugCommand::GetSceneState => {
                let scene = &s.scene;
                DebugResponse::ok(ResponseData::SceneState {
                    weather: scene.weather.clone(),
                    outdoor_lamp: scene.outdoor_lamp,
                    indoor_lamp: scene.indoor_lamp,
                    crashed: scene.crashed,
                    height_scale: scene.height_scale,
                    airplane_position: scene.airplane_position,
                    lightning_active: scene.lightning_active,
                })
            }

            DebugCommand::CameraGetState => {
                let scene = &s.scene;
                DebugResponse::ok(ResponseData::CameraState {
                    position: scene.camera_position,
                    forward: scene.camera_forward,
                    yaw_degrees: scene.yaw_degrees,
                    pitch_degrees: scene.pitch_degrees,
                    zoom_degrees: scene.zoom_degrees,
                })
            }

            DebugCommand::GetFpsStats => {
                let fps = &s.fps;
                DebugResponse::ok(ResponseData::FpsStats {
                    current_fps: fps.current_fps,
                    frame_count: fps.frame_count,
                    one_sec: window_info(&fps.one_sec),
                    five_sec: window_info(&fps.five_sec),
                    fifteen_sec: window_info(&fps.fifteen_sec),
                })
            }
        }
    }
}

fn window_info(w: &FpsWindow) -> FpsWindowInfo {
    FpsWindowInfo {
        avg: w.avg,
        min: w.min,
        max: w.max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::draw_panels;
    use crate::scene::composer::SceneObject;
    use crate::scene::config::SceneConfig;
    use crate::scene::settings::ProgramSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_panel_hint_names_server_port() {
        assert_eq!(panel_hint(true, 9743), "F1=panels on tcp 127.0.0.1:9743");
        assert!(panel_hint(false, 9743).contains("off"));
    }

    fn scene() -> SceneState {
        let mut rng = StdRng::seed_from_u64(21);
        let config = SceneConfig { rain_particles: 4, ..SceneConfig::default() };
        SceneState::new(config, &ProgramSettings::default(), &mut rng)
    }

    fn draw_frame(overlay: &mut RemoteOverlay, state: &mut SceneState) {
        overlay.begin_frame();
        draw_panels(state, overlay);
        overlay.end_frame(state, FpsStats::default());
    }

    #[test]
    fn test_panels_published() {
        let shared = Arc::new(Mutex::new(SharedDebugState::default()));
        let mut overlay = RemoteOverlay::new(shared.clone());
        let mut state = scene();
        draw_frame(&mut overlay, &mut state);

        let s = lock_shared(&shared);
        assert_eq!(s.panels.len(), 2);
        let scale = s.control("Lamp scale").unwrap();
        assert_eq!(scale.value, Some(ControlValue::Float(10.0)));
        assert_eq!(scale.range, Some([0.1, 20.0]));
        assert_eq!(s.scene.weather, "sunny");
    }

    #[test]
    fn test_set_control_applies_next_draw() {
        let shared = Arc::new(Mutex::new(SharedDebugState::default()));
        let mut overlay = RemoteOverlay::new(shared.clone());
        let mut handler = AppDebugHandler { state: shared.clone() };
        let mut state = scene();
        draw_frame(&mut overlay, &mut state);

        let resp = handler.handle_command(DebugCommand::SetControl {
            label: "Airplane position".into(),
            value: ControlValue::Vec3([1.0, 2.0, 3.0]),
        });
        assert!(matches!(resp, DebugResponse::Ok { data: ResponseData::ControlQueued { pending: 1, .. } }));

        draw_frame(&mut overlay, &mut state);
        assert_eq!(state.composer.placement(SceneObject::Airplane).position, Vec3::new(1.0, 2.0, 3.0));
        assert!(lock_shared(&shared).pending_edits.is_empty());
    }

    #[test]
    fn test_edit_waits_while_overlay_hidden() {
        let shared = Arc::new(Mutex::new(SharedDebugState::default()));
        let mut overlay = RemoteOverlay::new(shared.clone());
        let mut handler = AppDebugHandler { state: shared.clone() };
        let mut state = scene();
        draw_frame(&mut overlay, &mut state);

        handler.handle_command(DebugCommand::SetControl {
            label: "Camera mouse update".into(),
            value: ControlValue::Bool(false),
        });

        // Frame without drawing panels
        overlay.begin_frame();
        overlay.end_frame(&state, FpsStats::default());
        assert_eq!(lock_shared(&shared).pending_edits.len(), 1);
        assert_eq!(lock_shared(&shared).panels.len(), 2);

        draw_frame(&mut overlay, &mut state);
        assert!(!state.controller.mouse_update);
    }

    #[test]
    fn test_set_control_rejects_bad_edits() {
        let shared = Arc::new(Mutex::new(SharedDebugState::default()));
        let mut overlay = RemoteOverlay::new(shared.clone());
        let mut handler = AppDebugHandler { state: shared.clone() };
        let mut state = scene();
        draw_frame(&mut overlay, &mut state);

        let unknown = handler.handle_command(DebugCommand::SetControl {
            label: "Nope".into(),
            value: ControlValue::Float(1.0),
        });
        assert!(matches!(unknown, DebugResponse::Error { .. }));

        let wrong_kind = handler.handle_command(DebugCommand::SetControl {
            label: "Lamp scale".into(),
            value: ControlValue::Bool(true),
        });
        match wrong_kind {
            DebugResponse::Error { message } => assert!(message.contains("expects a float")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(lock_shared(&shared).pending_edits.is_empty());
    }

    #[test]
    fn test_scene_state_command() {
        let shared = Arc::new(Mutex::new(SharedDebugState::default()));
        let mut overlay = RemoteOverlay::new(shared.clone());
        let mut handler = AppDebugHandler { state: shared };
        let mut state = scene();
        state.flight.toggle_crash(Vec3::new(200.0, 150.0, 30.0), 0.0);
        draw_frame(&mut overlay, &mut state);

        match handler.handle_command(DebugCommand::GetSceneState) {
            DebugResponse::Ok { data: ResponseData::SceneState { crashed, outdoor_lamp, height_scale, .. } } => {
                assert!(crashed);
                assert!(outdoor_lamp);
                assert!((height_scale - 0.1).abs() < 1e-6);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
