//! Tuning protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands sent from a tuning client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum DebugCommand {
    /// Ping (health check)
    Ping,
    /// Get the overlay panels as last drawn
    GetPanels,
    /// Queue an edit for the control with the given label.
    /// Applied the next time the overlay draws that control.
    SetControl { label: String, value: ControlValue },
    /// Get weather, lamp and airplane state
    GetSceneState,
    /// Get current camera state
    CameraGetState,
    /// Get FPS statistics (1s/5s/15s averages with min/max)
    GetFpsStats,
}

/// Value carried by an editable control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Float(f32),
    Vec3([f32; 3]),
}

/// Raised when an edit does not fit the control it targets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("control `{label}` expects a {expected}")]
    WrongKind { label: String, expected: &'static str },
}

impl ControlValue {
    pub fn as_bool(&self, label: &str) -> Result<bool, ControlError> {
        match self {
            ControlValue::Bool(b) => Ok(*b),
            _ => Err(ControlError::WrongKind { label: label.to_string(), expected: "bool" }),
        }
    }

    pub fn as_float(&self, label: &str) -> Result<f32, ControlError> {
        match self {
            ControlValue::Float(f) => Ok(*f),
            _ => Err(ControlError::WrongKind { label: label.to_string(), expected: "float" }),
        }
    }

    pub fn as_vec3(&self, label: &str) -> Result<[f32; 3], ControlError> {
        match self {
            ControlValue::Vec3(v) => Ok(*v),
            _ => Err(ControlError::WrongKind { label: label.to_string(), expected: "vec3" }),
        }
    }
}

/// Widget kinds an overlay panel can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Text,
    ColorEdit,
    DragFloat,
    DragFloat3,
    Checkbox,
}

/// One control as drawn by the overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlInfo {
    pub label: String,
    pub kind: ControlKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ControlValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f32; 2]>,
}

/// A titled window of controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelInfo {
    pub title: String,
    pub controls: Vec<ControlInfo>,
}

/// Responses from the tuning server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DebugResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    Pong { message: String },
    Panels {
        overlay_enabled: bool,
        panels: Vec<PanelInfo>,
    },
    ControlQueued { label: String, pending: usize },
    SceneState {
        weather: String,
        outdoor_lamp: bool,
        indoor_lamp: bool,
        crashed: bool,
        height_scale: f32,
        airplane_position: [f32; 3],
        lightning_active: bool,
    },
    CameraState {
        position: [f32; 3],
        forward: [f32; 3],
        yaw_degrees: f32,
        pitch_degrees: f32,
        zoom_degrees: f32,
    },
    FpsStats {
        current_fps: f32,
        frame_count: u64,
        one_sec: FpsWindowInfo,
        five_sec: FpsWindowInfo,
        fifteen_sec: FpsWindowInfo,
    },
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FpsWindowInfo {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
}

impl DebugResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_control_parses() {
        let cmd: DebugCommand = serde_json::from_str(
            r#"{"cmd":"SetControl","params":{"label":"Background color","value":[0.1,0.2,0.3]}}"#,
        )
        .unwrap();
        match cmd {
            DebugCommand::SetControl { label, value } => {
                assert_eq!(label, "Background color");
                assert_eq!(value, ControlValue::Vec3([0.1, 0.2, 0.3]));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_control_value_kinds() {
        let b: ControlValue = serde_json::from_str("true").unwrap();
        let f: ControlValue = serde_json::from_str("0.5").unwrap();
        assert_eq!(b.as_bool("x"), Ok(true));
        assert_eq!(f.as_float("x"), Ok(0.5));
        assert!(f.as_vec3("x").is_err());
    }
}
