//! Regular grids of normalised elevation samples and bilinear height lookup.

use std::path::Path;

use image::Rgb32FImage;

use crate::error::TerrainError;

/// Row-major grid of elevation samples in `[0, 1]`.
///
/// Sample `(x, z)` sits at local position `(x * world_scale, h * height_scale, z * world_scale)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heightfield {
    width: usize,
    depth: usize,
    samples: Vec<f32>,
    world_scale: f32,
    height_scale: f32,
}

impl Heightfield {
    /// Wrap an existing sample grid. Fails unless `samples.len() == width * depth`.
    pub fn from_samples(
        width: usize,
        depth: usize,
        samples: Vec<f32>,
        world_scale: f32,
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        let expected = width * depth;
        if samples.len() != expected {
            return Err(TerrainError::SampleCount {
                width,
                depth,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            depth,
            samples,
            world_scale,
            height_scale,
        })
    }

    /// Grayscale-inverted heightfield from a decoded RGB image: `1 - (r + g + b) / 3`.
    pub fn from_rgb_image(
        image: &Rgb32FImage,
        world_scale: f32,
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        let (width, depth) = (image.width() as usize, image.height() as usize);
        if width == 0 || depth == 0 {
            return Err(TerrainError::EmptyImage);
        }

        let samples = image
            .pixels()
            .map(|px| {
                let [r, g, b] = px.0;
                let gray = (r + g + b) / 3.0;
                1.0 - gray.clamp(0.0, 1.0)
            })
            .collect();

        Self::from_samples(width, depth, samples, world_scale, height_scale)
    }

    /// Decode a heightmap image file (PNG/JPEG) and convert it with [`Self::from_rgb_image`].
    pub fn load_image(
        path: impl AsRef<Path>,
        world_scale: f32,
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TerrainError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb32f();
        let field = Self::from_rgb_image(&image, world_scale, height_scale)?;
        log::info!(
            "Loaded heightmap {:?} ({}x{})",
            path,
            field.width,
            field.depth
        );
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn world_scale(&self) -> f32 {
        self.world_scale
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        x + z * self.width
    }

    /// Normalised sample at grid cell `(x, z)`.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.samples[self.index(x, z)]
    }

    /// Local-space extent `(width - 1, depth - 1) * world_scale` on X/Z.
    pub fn extent(&self) -> (f32, f32) {
        (
            self.width.saturating_sub(1) as f32 * self.world_scale,
            self.depth.saturating_sub(1) as f32 * self.world_scale,
        )
    }

    /// True when the grid is too small to interpolate over.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 1 || self.depth <= 1 || self.samples.is_empty()
    }

    /// Height (local Y) at local `(lx, lz)`, bilinearly interpolated.
    ///
    /// Coordinates outside the grid clamp to its border. Degenerate grids read as `0`.
    pub fn sample_local(&self, lx: f32, lz: f32) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }

        let gx = (lx / self.world_scale).clamp(0.0, (self.width - 1) as f32);
        let gz = (lz / self.world_scale).clamp(0.0, (self.depth - 1) as f32);

        let x0 = gx.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);

        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;

        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;
        (h0 * (1.0 - tz) + h1 * tz) * self.height_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn peak() -> Heightfield {
        #[rustfmt::skip]
        let samples = vec![
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        Heightfield::from_samples(3, 3, samples, 1.0, 10.0).unwrap()
    }

    #[test]
    fn center_peak_is_exact() {
        let field = peak();
        assert_eq!(field.sample_local(1.0, 1.0), 10.0);
    }

    #[test]
    fn half_cell_is_average_of_four_corners() {
        let field = peak();
        let expected = (0.0 + 0.0 + 0.0 + 1.0) / 4.0 * 10.0;
        assert!((field.sample_local(0.5, 0.5) - expected).abs() < 1e-6);
    }

    #[test]
    fn integer_grid_points_have_no_interpolation_error() {
        let samples: Vec<f32> = (0..20).map(|i| (i as f32 * 0.37).fract()).collect();
        let field = Heightfield::from_samples(5, 4, samples, 2.0, 3.0).unwrap();
        for z in 0..4 {
            for x in 0..5 {
                let lx = x as f32 * 2.0;
                let lz = z as f32 * 2.0;
                assert_eq!(field.sample_local(lx, lz), field.get(x, z) * 3.0);
            }
        }
    }

    #[test]
    fn outside_coordinates_clamp_to_border() {
        let field = peak();
        assert_eq!(field.sample_local(-5.0, 1.0), 0.0);
        assert_eq!(field.sample_local(1.0, 99.0), 0.0);
        assert_eq!(field.sample_local(-5.0, -5.0), field.get(0, 0) * 10.0);
    }

    #[test]
    fn degenerate_grids_read_zero() {
        assert_eq!(Heightfield::default().sample_local(0.0, 0.0), 0.0);
        let strip = Heightfield::from_samples(1, 3, vec![1.0; 3], 1.0, 5.0).unwrap();
        assert!(strip.is_degenerate());
        assert_eq!(strip.sample_local(0.0, 1.0), 0.0);
    }

    #[test]
    fn image_luminance_is_inverted() {
        let mut image = Rgb32FImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([0.0, 0.0, 0.0]));
        image.put_pixel(1, 0, Rgb([1.0, 0.5, 0.0]));
        let field = Heightfield::from_rgb_image(&image, 1.0, 1.0).unwrap();
        assert_eq!(field.width(), 2);
        assert_eq!(field.depth(), 1);
        assert_eq!(field.get(0, 0), 1.0);
        assert!((field.get(1, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mismatched_sample_count_is_rejected() {
        let result = Heightfield::from_samples(3, 3, vec![0.0; 8], 1.0, 1.0);
        assert!(matches!(
            result,
            Err(TerrainError::SampleCount {
                width: 3,
                depth: 3,
                expected: 9,
                actual: 8,
            })
        ));
        assert!(Heightfield::from_samples(0, 0, Vec::new(), 1.0, 1.0).is_ok());
    }

    #[test]
    fn empty_image_is_rejected() {
        let image = Rgb32FImage::new(0, 0);
        assert!(matches!(
            Heightfield::from_rgb_image(&image, 1.0, 1.0),
            Err(TerrainError::EmptyImage)
        ));
    }
}
