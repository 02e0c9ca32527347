//! Diorama - an island scene viewer with switchable weather

pub mod core;
pub mod atmosphere;
pub mod scene;
pub mod render;
pub mod overlay;
