//! # Graphics Module
//!
//! Everything between the generated layout and pixels on screen.
//!
//! - **Camera System** ([`camera`]) - Orbit camera with damped controls
//! - **Geometry** ([`geometry`]) - Procedural boxes, spheres, cylinders, hex prisms and wireframes
//! - **Rendering Pipeline** ([`rendering`]) - Forward shading with alpha-blended shells
//! - **Scene Management** ([`scene`]) - Flat object list with named materials
//! - **Resource Management** ([`resources`]) - Materials, textures and global uniforms
//!
//! The render engine is created by [`GeodomeApp`](crate::app::GeodomeApp) once
//! the window exists:
//!
//! ```no_run
//! use geodome::gfx::{RenderEngine, scene::Scene};
//!
//! // let render_engine = pollster::block_on(RenderEngine::new(window, width, height))?;
//! // render_engine.prepare_scene(&mut scene);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
