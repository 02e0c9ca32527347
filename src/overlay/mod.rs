//! Debug overlay.
//!
//! The frame loop draws its tuning panels through the immediate-mode
//! [`Overlay`] trait: every control takes the live value by `&mut` and
//! returns whether it was edited this frame.

pub mod panels;
pub mod remote;

pub use panels::draw_panels;
pub use remote::{AppDebugHandler, RemoteOverlay, SharedDebugState, panel_hint};

use crate::core::types::Vec3;

pub trait Overlay {
    fn begin(&mut self, title: &str);
    fn text(&mut self, text: &str);
    fn color_edit3(&mut self, label: &str, value: &mut Vec3) -> bool;
    fn drag_float3(&mut self, label: &str, value: &mut Vec3, speed: f32) -> bool;
    /// Edits are clamped to `[min, max]`
    fn drag_float(&mut self, label: &str, value: &mut f32, speed: f32, min: f32, max: f32) -> bool;
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;
    fn end(&mut self);
}
