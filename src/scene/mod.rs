//! Scene state and the per-frame driver

pub mod composer;
pub mod config;
pub mod flight;
pub mod orchestrator;
pub mod settings;
pub mod state;

pub use composer::{Placement, SceneComposer, SceneObject, TransformOrder};
pub use config::{SceneConfig, ViewerConfig};
pub use flight::FlightController;
pub use orchestrator::{CursorMode, FrameOrchestrator, FrameOutcome};
pub use settings::ProgramSettings;
pub use state::SceneState;
