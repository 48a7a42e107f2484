//! Model-space bounds of imported glTF models.

use std::path::Path;

use glam::Vec3;

use crate::error::AssetError;

/// Min/max corner enclosing every mesh primitive of a glTF document.
///
/// Uses the accessor bounds stored in the document, so buffers are not read.
/// Node transforms are not applied; the result is in mesh space.
pub fn load_model_bounds(path: impl AsRef<Path>) -> Result<(Vec3, Vec3), AssetError> {
    let path = path.as_ref();
    let document = gltf::Gltf::open(path).map_err(|source| AssetError::Model {
        path: path.to_path_buf(),
        source,
    })?;

    let bounds = document
        .meshes()
        .flat_map(|mesh| mesh.primitives())
        .map(|primitive| {
            let bb = primitive.bounding_box();
            (Vec3::from(bb.min), Vec3::from(bb.max))
        })
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)));

    match bounds {
        Some((min, max)) => {
            log::debug!("Model {:?} bounds {:?}..{:?}", path, min, max);
            Ok((min, max))
        }
        None => Err(AssetError::EmptyModel {
            path: path.to_path_buf(),
        }),
    }
}
