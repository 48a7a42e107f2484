//! Asset loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// A texture or model the scene depends on could not be loaded.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load texture {path:?}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to import model {path:?}")]
    Model {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model {path:?} has no mesh primitives")]
    EmptyModel { path: PathBuf },
}
