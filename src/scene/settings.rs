//! Program state persisted between runs.
//!
//! Plain text of whitespace-separated values in this order: clear color r g b,
//! overlay enabled (0 or 1), camera position x y z, camera front x y z.
//! Saved files put one value per line.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::Result;
use crate::core::types::Vec3;

const VALUE_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramSettings {
    pub clear_color: Vec3,
    pub overlay_enabled: bool,
    pub camera_position: Vec3,
    pub camera_front: Vec3,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            overlay_enabled: false,
            camera_position: Vec3::ZERO,
            camera_front: Vec3::NEG_Z,
        }
    }
}

impl ProgramSettings {
    /// Read the state file. Anything missing or unparsable yields the defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("no program state at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Some(settings) => {
                log::info!("loaded program state from {}", path.display());
                settings
            }
            None => {
                log::debug!("program state at {} is malformed, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Parse the whole file or nothing
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let mut values = [0f32; VALUE_COUNT];
        for slot in &mut values {
            *slot = tokens.next()?.parse().ok()?;
        }
        let overlay_enabled = match values[3] {
            v if v == 0.0 => false,
            v if v == 1.0 => true,
            _ => return None,
        };
        Some(Self {
            clear_color: Vec3::new(values[0], values[1], values[2]),
            overlay_enabled,
            camera_position: Vec3::new(values[4], values[5], values[6]),
            camera_front: Vec3::new(values[7], values[8], values[9]),
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let c = self.clear_color;
        let p = self.camera_position;
        let f = self.camera_front;
        for v in [c.x, c.y, c.z] {
            let _ = writeln!(out, "{v}");
        }
        let _ = writeln!(out, "{}", u8::from(self.overlay_enabled));
        for v in [p.x, p.y, p.z, f.x, f.y, f.z] {
            let _ = writeln!(out, "{v}");
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_text())?;
        log::info!("saved program state to {}", path.display());
        Ok(())
    }
}
