//! Diamond-square fractal heightfield synthesis.
//!
//! **Seed-based determinism:** every perturbation is a pure function of
//! `(x, z, seed)`, so identical parameters regenerate a bit-identical grid.
//! There is no random-number stream whose state could leak between calls.

use crate::error::TerrainError;
use crate::heightfield::Heightfield;

/// Hash seed of the square-step jitter. Fixed, so only the diamond step follows the caller's seed.
const SQUARE_STEP_SEED: u32 = 1337;

/// Parameters of one diamond-square generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondSquareParams {
    /// Samples per side; must be `2^k + 1` with `k >= 1`.
    pub size: usize,
    /// Amplitude decay per octave, clamped to `[0.01, 0.99]`.
    pub roughness: f32,
    pub seed: u32,
    /// Grid spacing on X/Z.
    pub world_scale: f32,
    /// Vertical multiplier applied to the normalised samples.
    pub height_scale: f32,
    /// Treat the grid as a torus when gathering neighbours.
    pub wrap_edges: bool,
}

impl Default for DiamondSquareParams {
    fn default() -> Self {
        Self {
            size: 513,
            roughness: 0.66,
            seed: 4242,
            world_scale: 1.5,
            height_scale: 60.0,
            wrap_edges: false,
        }
    }
}

/// True for `2^k + 1` with `k >= 1`.
pub fn is_valid_grid_size(size: usize) -> bool {
    size >= 3 && (size - 1).is_power_of_two()
}

/// 32-bit integer mix of `(x, z, seed)` normalised to `[0, 1)`.
#[inline]
pub fn hash_noise(x: i32, z: i32, seed: u32) -> f32 {
    let mut h = seed;
    h ^= 374_761_393_u32.wrapping_add((x as u32).wrapping_mul(668_265_263));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^= 2_246_822_519_u32.wrapping_add((z as u32).wrapping_mul(3_266_489_917));
    h = (h ^ (h >> 13)).wrapping_mul(2_246_822_519);
    h ^= h >> 16;
    (h & 0x00FF_FFFF) as f32 / 0x0100_0000 as f32
}

/// Generate a normalised heightfield. Fails without side effects on an invalid size.
pub fn generate(params: &DiamondSquareParams) -> Result<Heightfield, TerrainError> {
    let size = params.size;
    if !is_valid_grid_size(size) {
        return Err(TerrainError::InvalidGridSize { size });
    }

    let mut grid = Grid {
        h: vec![0.0; size * size],
        size,
        wrap: params.wrap_edges,
    };
    let n = size - 1;

    for (x, z) in [(0, 0), (n, 0), (0, n), (n, n)] {
        grid.set(x, z, 0.5);
    }

    let decay = params.roughness.clamp(0.01, 0.99);
    let mut step = n;
    let mut amplitude = 0.5_f32;

    while step > 1 {
        let half = step / 2;

        for z in (0..n).step_by(step) {
            for x in (0..n).step_by(step) {
                grid.diamond(x, z, step, amplitude, params.seed);
            }
        }

        for z in (0..=n).step_by(half) {
            let start_x = if (z / half) % 2 == 0 { half } else { 0 };
            for x in (start_x..=n).step_by(step) {
                grid.square(x, z, half, amplitude, SQUARE_STEP_SEED);
            }
        }

        step /= 2;
        amplitude *= decay;
    }

    let (min, max) = grid.normalize();
    log::debug!(
        "Diamond-square {}x{} seed={} raw range [{:.4}, {:.4}]",
        size,
        size,
        params.seed,
        min,
        max
    );

    Heightfield::from_samples(
        size,
        size,
        grid.h,
        params.world_scale,
        params.height_scale,
    )
}

struct Grid {
    h: Vec<f32>,
    size: usize,
    wrap: bool,
}

impl Grid {
    #[inline]
    fn idx(&self, x: usize, z: usize) -> usize {
        x + z * self.size
    }

    #[inline]
    fn get(&self, x: usize, z: usize) -> f32 {
        self.h[self.idx(x, z)]
    }

    #[inline]
    fn set(&mut self, x: usize, z: usize, v: f32) {
        let i = self.idx(x, z);
        self.h[i] = v;
    }

    /// Resolve a signed neighbour coordinate; `None` when it falls off a non-wrapping grid.
    #[inline]
    fn resolve(&self, c: isize) -> Option<usize> {
        let size = self.size as isize;
        if self.wrap {
            Some(c.rem_euclid(size) as usize)
        } else if (0..size).contains(&c) {
            Some(c as usize)
        } else {
            None
        }
    }

    /// Cell centre = mean of the four cell corners plus jitter.
    fn diamond(&mut self, x: usize, z: usize, step: usize, amplitude: f32, seed: u32) {
        let avg = 0.25
            * (self.get(x, z)
                + self.get(x + step, z)
                + self.get(x, z + step)
                + self.get(x + step, z + step));

        let half = step / 2;
        let (cx, cz) = if self.wrap {
            ((x + half) % self.size, (z + half) % self.size)
        } else {
            ((x + half).min(self.size - 1), (z + half).min(self.size - 1))
        };

        let jitter = hash_noise(cx as i32, cz as i32, seed) * 2.0 - 1.0;
        self.set(cx, cz, (avg + jitter * amplitude).clamp(0.0, 1.0));
    }

    /// Edge midpoint = mean of its existing axis neighbours at distance `reach` plus jitter.
    fn square(&mut self, x: usize, z: usize, reach: usize, amplitude: f32, seed: u32) {
        let (xi, zi, r) = (x as isize, z as isize, reach as isize);
        let neighbours = [(xi - r, zi), (xi + r, zi), (xi, zi - r), (xi, zi + r)];

        let mut sum = 0.0;
        let mut count = 0;
        for (nx, nz) in neighbours {
            if let (Some(nx), Some(nz)) = (self.resolve(nx), self.resolve(nz)) {
                sum += self.get(nx, nz);
                count += 1;
            }
        }
        if count == 0 {
            return;
        }

        let jitter = hash_noise(x as i32, z as i32, seed) * 2.0 - 1.0;
        let value = (sum / count as f32 + jitter * amplitude).clamp(0.0, 1.0);
        self.set(x, z, value);
    }

    /// Rescale so the observed min/max become exactly 0 and 1. Returns the raw range.
    fn normalize(&mut self) -> (f32, f32) {
        let (min, max) = self
            .h
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = if max > min { max - min } else { 1.0 };
        for v in &mut self.h {
            *v = (*v - min) / range;
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn params(size: usize, seed: u32) -> DiamondSquareParams {
        DiamondSquareParams {
            size,
            roughness: 0.5,
            seed,
            world_scale: 1.0,
            height_scale: 10.0,
            wrap_edges: false,
        }
    }

    #[test]
    fn accepts_every_power_of_two_plus_one() {
        for k in 1..=9 {
            let size = (1 << k) + 1;
            let field = generate(&params(size, 7)).expect("valid size");
            assert_eq!(field.width(), size);
            assert_eq!(field.depth(), size);
        }
    }

    #[test]
    fn rejects_other_sizes() {
        for size in [0, 1, 2, 4, 6, 100, 256, 514] {
            assert!(
                matches!(
                    generate(&params(size, 7)),
                    Err(TerrainError::InvalidGridSize { size: s }) if s == size
                ),
                "size {size} should be rejected"
            );
        }
    }

    /// Scenario: same arguments twice give the same 25 samples.
    #[test]
    fn regeneration_is_bit_identical() {
        let a = generate(&params(5, 1)).unwrap();
        let b = generate(&params(5, 1)).unwrap();
        assert_eq!(a.samples().len(), 25);
        assert_eq!(a.samples(), b.samples());
    }

    /// 5x5, roughness 0.5, seed 1, no wrapping.
    #[test]
    fn small_grid_matches_known_samples() {
        let field = generate(&params(5, 1)).unwrap();
        let samples = field.samples();
        let known = [
            (0, 0.467_468_68),
            (1, 0.040_822_01),
            (7, 0.406_354_84),
            (12, 0.699_482_5),
            (17, 0.987_627_8),
            (23, 0.501_518_37),
        ];
        for (i, expected) in known {
            assert!(
                (samples[i] - expected).abs() < 1e-6,
                "sample {i}: {} != {expected}",
                samples[i]
            );
        }
        assert_eq!(samples[10], 0.0);
        assert_eq!(samples[22], 1.0);
    }

    #[test]
    fn wrapped_square_step_reads_across_the_border() {
        let mut h = vec![0.0; 9];
        h[0] = 0.1; // (0, 0)
        h[2] = 0.2; // (2, 0)
        h[4] = 0.4; // (1, 1)
        h[7] = 0.9; // (1, 2), reached from (1, -1)
        let mut grid = Grid {
            h: h.clone(),
            size: 3,
            wrap: true,
        };

        grid.square(1, 0, 1, 0.0, SQUARE_STEP_SEED);
        assert!((grid.get(1, 0) - 0.4).abs() < 1e-6);

        grid.square(1, 0, 1, 0.1, SQUARE_STEP_SEED);
        let jitter = hash_noise(1, 0, SQUARE_STEP_SEED) * 2.0 - 1.0;
        let expected = (1.6_f32 / 4.0 + jitter * 0.1).clamp(0.0, 1.0);
        assert!((grid.get(1, 0) - expected).abs() < 1e-6);

        let mut clipped = Grid {
            h,
            size: 3,
            wrap: false,
        };
        clipped.square(1, 0, 1, 0.0, SQUARE_STEP_SEED);
        assert!((clipped.get(1, 0) - 0.7 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn wrapping_changes_the_terrain() {
        let open = generate(&params(5, 1)).unwrap();
        let wrapped = generate(&DiamondSquareParams {
            wrap_edges: true,
            ..params(5, 1)
        })
        .unwrap();
        assert_ne!(open.samples(), wrapped.samples());
        assert!((wrapped.samples()[1] - 0.025_441_66).abs() < 1e-6);
    }

    #[test]
    fn wrapped_regeneration_is_bit_identical() {
        let p = DiamondSquareParams {
            wrap_edges: true,
            ..params(65, 99)
        };
        assert_eq!(generate(&p).unwrap(), generate(&p).unwrap());
    }

    #[test]
    fn different_seeds_give_different_terrain() {
        let a = generate(&params(33, 11111)).unwrap();
        let b = generate(&params(33, 22222)).unwrap();
        assert_ne!(a.samples(), b.samples());
    }

    #[test]
    fn samples_span_exactly_zero_to_one() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xD1A);
        for _ in 0..8 {
            let p = DiamondSquareParams {
                roughness: rng.gen_range(0.0..1.2),
                seed: rng.gen(),
                wrap_edges: rng.gen(),
                ..params(33, 0)
            };
            let field = generate(&p).unwrap();
            let samples = field.samples();
            assert!(samples.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
            let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
            let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(min, 0.0);
            assert_eq!(max, 1.0);
        }
    }

    #[test]
    fn flat_grid_normalises_without_dividing_by_zero() {
        let mut grid = Grid {
            h: vec![0.5; 9],
            size: 3,
            wrap: false,
        };
        assert_eq!(grid.normalize(), (0.5, 0.5));
        assert!(grid.h.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn hash_is_pure_and_in_unit_range() {
        for x in -50..50 {
            for z in [-1000, -1, 0, 3, 77] {
                let a = hash_noise(x, z, 4242);
                assert_eq!(a, hash_noise(x, z, 4242));
                assert!((0.0..1.0).contains(&a));
            }
        }
        assert_ne!(hash_noise(3, 4, 1), hash_noise(3, 4, 2));
    }

    #[test]
    fn grid_scales_are_carried_through() {
        let p = DiamondSquareParams {
            world_scale: 1.5,
            height_scale: 60.0,
            ..params(9, 3)
        };
        let field = generate(&p).unwrap();
        assert_eq!(field.world_scale(), 1.5);
        assert_eq!(field.height_scale(), 60.0);
        assert_eq!(field.extent(), (12.0, 12.0));
    }
}
