//! GPU-facing adapters for the drone demo: vertex layouts, terrain material
//! uniforms and asset decoding.

pub mod error;
pub mod material;
pub mod model;
pub mod texture;
pub mod vertex;

pub use error::*;
pub use material::*;
pub use model::*;
pub use texture::*;
pub use vertex::*;
