//! Hover drone: a smoothing controller that flies a box over the terrain.

use std::f32::consts::TAU;

use engine_core::{height_or_zero, yaw_basis, HeightQuery, ProvidesWorldTransform, Transform};
use glam::{Mat4, Vec3};
use input::DroneInput;
use physics::{Aabb, BoxKind};

use crate::config::DroneConfig;

/// Largest altitude correction per second, whatever the follow speed asks for.
const MAX_CLIMB_RATE: f32 = 20.0;
/// Corrections smaller than this are skipped.
const MIN_CLIMB_STEP: f32 = 1e-5;
/// Low-pass rate for the yaw velocity feeding the bank angle.
const YAW_FILTER_RATE: f32 = 10.0;
/// Bank contribution per radian/second of filtered yaw velocity.
const YAW_BANK_FACTOR: f32 = 0.02;
/// Share of `max_tilt` used for strafing bank.
const STRAFE_BANK_FACTOR: f32 = 0.6;
const DIAGONAL_FACTOR: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Flight tuning constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneTuning {
    pub base_hover_height: f32,
    pub move_speed: f32,
    pub follow_speed: f32,
    pub boost_power: f32,
    pub boost_decay: f32,
    pub tilt_smoothing: f32,
    pub max_tilt: f32,
    pub mouse_sensitivity: f32,
    pub mouse_dead_zone: f32,
}

impl Default for DroneTuning {
    fn default() -> Self {
        Self::from(&DroneConfig::default())
    }
}

impl From<&DroneConfig> for DroneTuning {
    fn from(config: &DroneConfig) -> Self {
        Self {
            base_hover_height: config.base_hover_height,
            move_speed: config.move_speed,
            follow_speed: config.follow_speed,
            boost_power: config.boost_power,
            boost_decay: config.boost_decay,
            tilt_smoothing: config.tilt_smoothing,
            max_tilt: config.max_tilt,
            mouse_sensitivity: config.mouse_sensitivity,
            mouse_dead_zone: config.mouse_dead_zone,
        }
    }
}

/// The player's hover drone.
///
/// Its position is the centre of the world box. The world transform is derived from
/// `{centre, yaw, tilt, scale}` and cached; `dirty` marks the cache stale.
#[derive(Debug, Clone)]
pub struct Drone {
    local_aabb: Aabb,
    world_aabb: Aabb,
    scale: f32,

    yaw: f32,
    tilt_x: f32,
    tilt_z: f32,
    tilt_x_target: f32,
    tilt_z_target: f32,
    yaw_vel_filtered: f32,

    boost_offset: f32,
    boost_active: bool,

    tuning: DroneTuning,
    dirty: bool,
    transform: Mat4,
}

impl Drone {
    /// Drone whose model spans `model_min..model_max` in model units, scaled by `model_scale`.
    pub fn new(model_min: Vec3, model_max: Vec3, model_scale: f32, tuning: DroneTuning) -> Self {
        let mut local_aabb = Aabb::new(model_min, model_max);
        local_aabb.transform(&Mat4::from_scale(Vec3::splat(model_scale)));
        local_aabb.verify_integrity();
        let world_aabb = local_aabb.with_kind(BoxKind::Drone);

        log::info!("Drone box size after scale: {:?}", local_aabb.size());

        let mut drone = Self {
            local_aabb,
            world_aabb,
            scale: model_scale,
            yaw: 0.0,
            tilt_x: 0.0,
            tilt_z: 0.0,
            tilt_x_target: 0.0,
            tilt_z_target: 0.0,
            yaw_vel_filtered: 0.0,
            boost_offset: 0.0,
            boost_active: false,
            tuning,
            dirty: true,
            transform: Mat4::IDENTITY,
        };
        drone.refresh_transform();
        drone
    }

    pub fn position(&self) -> Vec3 {
        self.world_aabb.center()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current `(pitch, roll)` tilt in radians.
    pub fn tilt(&self) -> (f32, f32) {
        (self.tilt_x, self.tilt_z)
    }

    pub fn boost_offset(&self) -> f32 {
        self.boost_offset
    }

    pub fn is_boosting(&self) -> bool {
        self.boost_active
    }

    pub fn world_aabb(&self) -> &Aabb {
        &self.world_aabb
    }

    pub fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    pub fn tuning(&self) -> &DroneTuning {
        &self.tuning
    }

    pub fn needs_rebuild(&self) -> bool {
        self.dirty
    }

    /// Move the box centre to `position`.
    pub fn set_position(&mut self, position: Vec3) {
        let delta = position - self.world_aabb.center();
        self.world_aabb.translate(delta);
        self.dirty = true;
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.dirty = true;
    }

    pub fn set_base_hover_height(&mut self, height: f32) {
        self.tuning.base_hover_height = height;
    }

    /// Push the drone by an externally computed separation.
    pub fn apply_separation(&mut self, separation: Vec3) {
        self.world_aabb.translate(separation);
        self.dirty = true;
    }

    /// Teleport to `(x, z)` and snap the box bottom to hover height above the ground.
    ///
    /// All yaw, tilt and boost state returns to neutral.
    pub fn place_on_terrain(&mut self, terrain: Option<&dyn HeightQuery>, x: f32, z: f32) {
        let mut center = self.world_aabb.center();
        center.x = x;
        center.z = z;
        self.world_aabb.move_to(center);

        self.yaw = 0.0;
        self.tilt_x = 0.0;
        self.tilt_z = 0.0;
        self.tilt_x_target = 0.0;
        self.tilt_z_target = 0.0;
        self.yaw_vel_filtered = 0.0;
        self.boost_active = false;
        self.boost_offset = 0.0;

        let target_bottom = self.target_bottom_y(terrain);
        let current_bottom = self.world_aabb.center_bottom().y;
        let dy = target_bottom - current_bottom;
        log::debug!(
            "place_on_terrain: target bottom {} current bottom {} dy {}",
            target_bottom,
            current_bottom,
            dy
        );
        self.world_aabb.translate(Vec3::new(0.0, dy, 0.0));

        self.dirty = true;
        self.refresh_transform();
    }

    /// One frame of flight followed by a transform rebuild.
    pub fn update(&mut self, input: &DroneInput, dt: f32, terrain: Option<&dyn HeightQuery>) {
        self.simulate(input, dt, terrain);
        self.refresh_transform();
    }

    /// Yaw, horizontal motion, boost, altitude and tilt for one frame.
    /// The transform is only marked stale; see [`Drone::refresh_transform`].
    pub fn simulate(&mut self, input: &DroneInput, dt: f32, terrain: Option<&dyn HeightQuery>) {
        let dt = dt.max(0.0);
        let yaw_delta = self.steer(input.pointer_delta.x);
        self.fly(input.throttle(), input.strafe(), dt);
        self.update_boost(input.boost, dt);
        self.follow_ground(dt, terrain);
        self.update_tilt(input.throttle(), input.strafe(), yaw_delta, dt);
    }

    /// Rebuild the cached transform if anything moved since the last rebuild.
    pub fn refresh_transform(&mut self) {
        if self.dirty {
            self.transform = self.compose_transform();
            self.dirty = false;
        }
    }

    fn compose_transform(&self) -> Mat4 {
        Transform::from_yaw_tilt(
            self.world_aabb.center(),
            self.yaw,
            self.tilt_x,
            self.tilt_z,
            Vec3::splat(self.scale),
        )
        .to_matrix()
    }

    /// Returns the yaw change applied this frame.
    fn steer(&mut self, pointer_dx: f32) -> f32 {
        let dx = if pointer_dx.abs() < self.tuning.mouse_dead_zone {
            0.0
        } else {
            pointer_dx
        };
        let yaw_delta = -dx * self.tuning.mouse_sensitivity;
        if yaw_delta != 0.0 {
            self.yaw += yaw_delta;
            if self.yaw <= -TAU || self.yaw >= TAU {
                self.yaw %= TAU;
            }
            self.dirty = true;
        }
        yaw_delta
    }

    fn fly(&mut self, throttle: f32, strafe: f32, dt: f32) {
        let (forward, right) = yaw_basis(self.yaw);
        let norm = if throttle != 0.0 && strafe != 0.0 {
            DIAGONAL_FACTOR
        } else {
            1.0
        };
        let step = self.tuning.move_speed * norm * dt;
        let delta = forward * (throttle * step) + right * (strafe * step);
        if delta.length_squared() > 0.0 {
            self.world_aabb.translate(delta);
            self.dirty = true;
        }
    }

    fn update_boost(&mut self, trigger: bool, dt: f32) {
        if trigger && !self.boost_active {
            self.boost_active = true;
            self.boost_offset = self.tuning.boost_power;
        }
        if self.boost_active {
            self.boost_offset -= self.tuning.boost_decay * dt;
            if self.boost_offset <= 0.0 {
                self.boost_offset = 0.0;
                self.boost_active = false;
            }
        }
    }

    fn follow_ground(&mut self, dt: f32, terrain: Option<&dyn HeightQuery>) {
        let target_bottom = self.target_bottom_y(terrain);
        let current_bottom = self.world_aabb.center_bottom().y;
        let max_step = MAX_CLIMB_RATE * dt;
        let dy = ((target_bottom - current_bottom) * self.tuning.follow_speed * dt)
            .clamp(-max_step, max_step);
        if dy.abs() > MIN_CLIMB_STEP {
            self.world_aabb.translate(Vec3::new(0.0, dy, 0.0));
            self.dirty = true;
        }
    }

    fn update_tilt(&mut self, throttle: f32, strafe: f32, yaw_delta: f32, dt: f32) {
        let max_tilt = self.tuning.max_tilt;
        self.tilt_x_target = throttle * max_tilt;

        let yaw_vel = if dt > 0.0 { yaw_delta / dt } else { 0.0 };
        let alpha = 1.0 - (-dt * YAW_FILTER_RATE).exp();
        self.yaw_vel_filtered += (yaw_vel - self.yaw_vel_filtered) * alpha;

        let strafe_bank = -STRAFE_BANK_FACTOR * max_tilt * strafe;
        self.tilt_z_target =
            (-self.yaw_vel_filtered * YAW_BANK_FACTOR + strafe_bank).clamp(-max_tilt, max_tilt);

        let s = 1.0 - (-dt * self.tuning.tilt_smoothing).exp();
        let (old_x, old_z) = (self.tilt_x, self.tilt_z);
        self.tilt_x += (self.tilt_x_target - self.tilt_x) * s;
        self.tilt_z += (self.tilt_z_target - self.tilt_z) * s;
        if self.tilt_x != old_x || self.tilt_z != old_z {
            self.dirty = true;
        }
    }

    /// Ground under the box centre plus hover and boost.
    fn target_bottom_y(&self, terrain: Option<&dyn HeightQuery>) -> f32 {
        let center = self.world_aabb.center();
        height_or_zero(terrain, center.x, center.z)
            + self.tuning.base_hover_height
            + self.boost_offset
    }
}

impl ProvidesWorldTransform for Drone {
    /// Cached transform, or a freshly composed one while the cache is stale.
    fn world_transform(&self) -> Mat4 {
        if self.dirty {
            self.compose_transform()
        } else {
            self.transform
        }
    }
}
