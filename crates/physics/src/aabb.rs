//! Mutable axis-aligned bounding box.

use glam::{Mat4, Vec3};

use crate::collision::BoxKind;

/// Axis-aligned box given by its minimum and maximum corner.
///
/// `min <= max` per axis is only guaranteed after [`Aabb::verify_integrity`];
/// constructors take the corners as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
    pub kind: BoxKind,
    /// Set by collision passes while the box overlaps something.
    pub colliding: bool,
    /// Caller-owned scratch vector, e.g. the last separation applied.
    pub impulse: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            kind: BoxKind::Standard,
            colliding: false,
            impulse: Vec3::ZERO,
        }
    }

    /// Box centred on `center` with the given half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Tightest box around `points`; `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self::new(min, max))
    }

    pub fn with_kind(mut self, kind: BoxKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Centre of the bottom face.
    pub fn center_bottom(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) * 0.5,
            self.min.y,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// The eight corners, `min` first and `max` last.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Re-fit the box around all eight corners mapped through `matrix`.
    ///
    /// Stays conservative under rotation, where mapping only `min`/`max` would not.
    pub fn transform(&mut self, matrix: &Mat4) {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        self.min = min;
        self.max = max;
    }

    /// Rigid translation by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.min += delta;
        self.max += delta;
    }

    /// Swap any axis whose bounds are inverted. Idempotent.
    pub fn verify_integrity(&mut self) {
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        self.min = lo;
        self.max = hi;
    }

    /// Recentre on `center`, keeping [`Aabb::size`].
    pub fn move_to(&mut self, center: Vec3) {
        let half = self.size() * 0.5;
        self.min = center - half;
        self.max = center + half;
        self.verify_integrity();
    }

    /// Strict overlap on all three axes; touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Minimum horizontal push that moves `other` out of this box.
    ///
    /// X and Z are considered independently: per axis the push is either past this
    /// box's far edge (positive) or past its near edge (negative), whichever is
    /// shorter. The axis with the smaller push wins, Z on a tie, and the other
    /// component is zero. Only the XZ plane is considered; Y overlap is ignored.
    ///
    /// Returns zero when `other` is `None` or the boxes do not overlap in X and Z.
    pub fn separation_vector(&self, other: Option<&Aabb>) -> Vec3 {
        let Some(o) = other else {
            return Vec3::ZERO;
        };

        let move_x1 = self.max.x - o.min.x;
        let move_x2 = o.max.x - self.min.x;
        let move_z1 = self.max.z - o.min.z;
        let move_z2 = o.max.z - self.min.z;

        if move_x1 <= 0.0 || move_x2 <= 0.0 || move_z1 <= 0.0 || move_z2 <= 0.0 {
            return Vec3::ZERO;
        }

        let move_x = if move_x1 < move_x2 { move_x1 } else { -move_x2 };
        let move_z = if move_z1 < move_z2 { move_z1 } else { -move_z2 };

        if move_x.abs() < move_z.abs() {
            Vec3::new(move_x, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, move_z)
        }
    }
}
