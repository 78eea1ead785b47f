//! # Scene Management Module
//!
//! Flat list of objects, the materials they reference, scene lighting and the
//! orbit camera.
//!
//! ## Key Components
//!
//! - [`Scene`] - The scene container that manages objects, camera, and materials
//! - [`Object`] - A named mesh with a transform and a material reference
//! - [`Vertex3D`] - Vertex data with position, normal, and texture coordinates

pub mod object;
pub mod scene;
pub mod vertex;

pub use object::{DrawObject, Mesh, Object, ObjectId, Topology, TransformBindings};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
