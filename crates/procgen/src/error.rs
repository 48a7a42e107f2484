//! Errors raised while producing terrain.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to generate or load a heightfield. The terrain keeps its previous state.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Procedural grids must be `2^k + 1` samples per side with `k >= 1`.
    #[error("invalid grid size {size}: expected 2^k + 1 with k >= 1")]
    InvalidGridSize { size: usize },

    #[error("heightfield of {width}x{depth} needs {expected} samples, got {actual}")]
    SampleCount {
        width: usize,
        depth: usize,
        expected: usize,
        actual: usize,
    },

    #[error("heightmap image has no pixels")]
    EmptyImage,

    #[error("failed to decode heightmap {path:?}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
