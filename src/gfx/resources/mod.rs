//! GPU resource management
//!
//! Handles textures, uniform buffers and bind groups for rendering.

pub mod global_bindings;
pub mod material;
pub mod texture_loader;
pub mod texture_resource;

pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig};
pub use material::{BlendMode, Material, MaterialBindings, MaterialManager};
pub use texture_loader::{decode_image, DecodedImage, PendingTexture, TextureStatus};
pub use texture_resource::TextureResource;
