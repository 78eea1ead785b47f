//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the scene.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`scene_info_panel`] - Scene statistics and camera settings
//!
//! When the UI wants the mouse or keyboard, camera input is suppressed so
//! dragging a window does not also orbit the camera.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{camera_summary, scene_info_panel};
