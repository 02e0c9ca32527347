//! Viewer and scene configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Startup configuration: window, resource locations, tuning server.
///
/// Loaded from JSON with `--config`, individual fields overridable on the
/// command line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Root of `objects/` and `textures/`
    pub resource_dir: PathBuf,
    /// Program state file read at startup and written at exit
    pub settings_path: PathBuf,
    pub debug_server: bool,
    pub debug_port: u16,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Diorama".to_string(),
            width: 800,
            height: 600,
            resource_dir: PathBuf::from("resources"),
            settings_path: PathBuf::from("resources/program_state.txt"),
            debug_server: true,
            debug_port: diorama_debug::DEFAULT_PORT,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Build from command line arguments (program name first).
    ///
    /// `--config` is applied before the other flags so they can override it.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = match find_arg(args, "--config") {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };

        if let Some(dir) = find_arg(args, "--resources") {
            config.resource_dir = PathBuf::from(dir);
        }
        if let Some(path) = find_arg(args, "--settings") {
            config.settings_path = PathBuf::from(path);
        }
        if args.iter().any(|a| a == "--no-debug-server") {
            config.debug_server = false;
        }
        Ok(config)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.resource_dir.join("objects")
    }

    pub fn textures_dir(&self) -> PathBuf {
        self.resource_dir.join("textures")
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Simulation constants
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub rain_particles: usize,
    /// Rain fall distance per frame
    pub rain_fall_step: f32,
    /// Parallax floor depth scale at startup
    pub height_scale: f32,
    /// Height scale change per key edge
    pub height_scale_step: f32,
    pub material_shininess: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rain_particles: crate::atmosphere::RAIN_PARTICLE_COUNT,
            rain_fall_step: crate::atmosphere::rain::RAIN_FALL_STEP,
            height_scale: 0.1,
            height_scale_step: 0.005,
            material_shininess: 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = ViewerConfig::from_args(&args(&["diorama"])).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.textures_dir(), PathBuf::from("resources/textures"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{ "title": "Test", "width": 1024, "resource_dir": "/data" }"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = ViewerConfig::from_args(&args(&[
            "diorama",
            "--config",
            &path_str,
            "--settings",
            "state.txt",
            "--no-debug-server",
        ]))
        .unwrap();

        assert_eq!(config.title, "Test");
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert_eq!(config.resource_dir, PathBuf::from("/data"));
        assert_eq!(config.settings_path, PathBuf::from("state.txt"));
        assert!(!config.debug_server);
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        let mut config = ViewerConfig::default();
        config.debug_port = 9800;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(ViewerConfig::load(&path), Err(Error::Config(_))));
    }
}
