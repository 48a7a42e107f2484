//! Box kind tags and resolving a moving box against static boxes.

use glam::Vec3;

use crate::aabb::Aabb;

/// Integer type tag carried by every [`Aabb`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BoxKind {
    /// Static scenery and anything without a dedicated tag.
    #[default]
    Standard = 0,
    /// The player-controlled hover drone.
    Drone = 3,
}

impl BoxKind {
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Unknown tags map to [`BoxKind::Standard`].
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            3 => Self::Drone,
            _ => Self::Standard,
        }
    }
}

/// Push `mover` out of every obstacle it penetrates, one obstacle at a time.
///
/// Each overlapping obstacle contributes its horizontal [`Aabb::separation_vector`]
/// against the mover's current position. Returns the accumulated displacement
/// (also stored in `mover.impulse`); `mover.colliding` reports whether any push
/// was applied.
pub fn resolve_against(mover: &mut Aabb, obstacles: &[Aabb]) -> Vec3 {
    let mut total = Vec3::ZERO;
    for obstacle in obstacles {
        if !obstacle.intersects(mover) {
            continue;
        }
        let push = obstacle.separation_vector(Some(mover));
        if push != Vec3::ZERO {
            log::debug!(
                "Separating {:?} box from obstacle at {:?} by {:?}",
                mover.kind,
                obstacle.center(),
                push
            );
            mover.translate(push);
            total += push;
        }
    }
    mover.colliding = total != Vec3::ZERO;
    mover.impulse = total;
    total
}
