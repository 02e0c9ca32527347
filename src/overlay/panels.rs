//! Tuning panels

use crate::overlay::Overlay;
use crate::scene::composer::SceneObject;
use crate::scene::state::SceneState;

pub const SCENE_WINDOW: &str = "Scene";
pub const CAMERA_WINDOW: &str = "Camera info";

/// Draw both windows, writing any edits straight into `state`
pub fn draw_panels(state: &mut SceneState, overlay: &mut dyn Overlay) {
    scene_window(state, overlay);
    camera_window(state, overlay);
}

fn scene_window(state: &mut SceneState, overlay: &mut dyn Overlay) {
    overlay.begin(SCENE_WINDOW);
    overlay.text(&format!(
        "Weather: {}  Outdoor lamp: {}  Indoor lamp: {}",
        state.weather,
        on_off(state.lamps.outdoor_on),
        on_off(state.lamps.indoor_on),
    ));
    overlay.color_edit3("Background color", &mut state.clear_color);

    let placements = [
        (SceneObject::Airplane, "Airplane position", "Airplane scale", 4.0),
        (SceneObject::Island, "Island position", "Island scale", 4.0),
        (SceneObject::Lamp, "Lamp position", "Lamp scale", 20.0),
    ];
    for (object, position_label, scale_label, max_scale) in placements {
        let placement = state.composer.placement_mut(object);
        overlay.drag_float3(position_label, &mut placement.position, 1.0);
        overlay.drag_float(scale_label, &mut placement.scale, 0.05, 0.1, max_scale);
    }

    let light = &mut state.lighting.outdoor;
    overlay.drag_float("pointLight.constant", &mut light.constant, 0.05, 0.0, 20.0);
    overlay.drag_float("pointLight.linear", &mut light.linear, 0.05, 0.0, 1.0);
    overlay.drag_float("pointLight.quadratic", &mut light.quadratic, 0.05, 0.0, 1.0);
    overlay.end();
}

fn camera_window(state: &mut SceneState, overlay: &mut dyn Overlay) {
    let camera = &state.camera;
    let (p, f) = (camera.position, camera.front());
    overlay.begin(CAMERA_WINDOW);
    overlay.text(&format!("Camera position: ({:.6}, {:.6}, {:.6})", p.x, p.y, p.z));
    overlay.text(&format!("(Yaw, Pitch): ({:.6}, {:.6})", camera.yaw, camera.pitch));
    overlay.text(&format!("Camera front: ({:.6}, {:.6}, {:.6})", f.x, f.y, f.z));
    overlay.checkbox("Camera mouse update", &mut state.controller.mouse_update);
    overlay.end();
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::overlay::scripted::ScriptedOverlay;
    use crate::scene::config::SceneConfig;
    use crate::scene::settings::ProgramSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state() -> SceneState {
        let mut rng = StdRng::seed_from_u64(8);
        let config = SceneConfig { rain_particles: 4, ..SceneConfig::default() };
        SceneState::new(config, &ProgramSettings::default(), &mut rng)
    }

    #[test]
    fn test_edits_reach_scene() {
        let mut state = state();
        let mut overlay = ScriptedOverlay::default();
        overlay.vecs.insert("Background color".into(), Vec3::new(0.5, 0.1, 0.2));
        overlay.vecs.insert("Island position".into(), Vec3::new(1.0, -90.0, 2.0));
        overlay.floats.insert("Airplane scale".into(), 10.0);
        overlay.floats.insert("pointLight.linear".into(), 0.25);
        overlay.bools.insert("Camera mouse update".into(), false);

        draw_panels(&mut state, &mut overlay);

        assert_eq!(state.clear_color, Vec3::new(0.5, 0.1, 0.2));
        assert_eq!(state.composer.placement(SceneObject::Island).position, Vec3::new(1.0, -90.0, 2.0));
        // Clamped to the slider range
        assert_eq!(state.composer.placement(SceneObject::Airplane).scale, 4.0);
        assert_eq!(state.lighting.outdoor.linear, 0.25);
        assert!(!state.controller.mouse_update);
    }

    #[test]
    fn test_windows_and_camera_text() {
        let mut state = state();
        let mut overlay = ScriptedOverlay::default();
        draw_panels(&mut state, &mut overlay);

        assert_eq!(overlay.windows, vec![SCENE_WINDOW, CAMERA_WINDOW]);
        assert!(overlay.lines.iter().any(|l| l.starts_with("Weather: sunny")));
        assert!(overlay.lines.iter().any(|l| l.starts_with("(Yaw, Pitch): (")));
        assert!(overlay.labels.contains(&"pointLight.quadratic".to_string()));
    }
}
