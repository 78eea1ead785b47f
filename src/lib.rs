// src/lib.rs
//! Geodome
//!
//! Procedurally generated geodesic domes with hexagonal paneling over
//! sectored office interiors, rendered with wgpu and winit.
//!
//! The [`layout`] module is pure geometry and can be used without a GPU;
//! [`scene_builder`] turns a layout into renderable objects and [`app`] runs
//! the interactive viewer.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod layout;
pub mod prelude;
pub mod scene_builder;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GeodomeApp;
pub use error::{GeodomeError, Result};

/// Creates the viewer for the reference scene, honoring environment overrides
pub fn reference() -> Result<GeodomeApp> {
    GeodomeApp::new(config::SceneConfig::from_env())
}
