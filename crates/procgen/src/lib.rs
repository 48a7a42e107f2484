//! Procedural terrain: diamond-square heightfields, mesh derivation and height queries.

pub mod diamond_square;
pub mod error;
pub mod heightfield;
pub mod mesh_builder;
pub mod terrain;

pub use diamond_square::*;
pub use error::*;
pub use heightfield::*;
pub use mesh_builder::*;
pub use terrain::*;
