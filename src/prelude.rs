//! # Geodome Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use geodome::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = SceneConfig::reference();
//!     let layouts = generate(&config.domes, &config.layout)?;
//!     println!("{} domes", layouts.len());
//!     GeodomeApp::new(config)?.run()
//! }
//! ```

// Application and configuration
pub use crate::app::GeodomeApp;
pub use crate::config::{LayoutConfig, SceneConfig};
pub use crate::error::{GeodomeError, Result};

// Layout generation
pub use crate::layout::{generate, DomeDescriptor, DomeLayout, HexPanel, InteriorLayout};

// Scene construction and graphics
pub use crate::gfx::camera::CameraManager;
pub use crate::gfx::scene::Scene;
pub use crate::scene_builder::{BuiltScene, DomeHandles, SceneBuilder};
