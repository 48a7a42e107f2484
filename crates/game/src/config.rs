//! Demo configuration (terrain, assets, drone tuning, obstacles, run length).
//! Loaded from a RON file at startup.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use physics::Aabb;
use procgen::DiamondSquareParams;
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "drone_demo.ron";

/// Everything the demo needs to build and run its scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub terrain: TerrainConfig,
    pub assets: AssetConfig,
    pub drone: DroneConfig,
    pub obstacles: Vec<ObstacleConfig>,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Samples per side, `2^k + 1`.
    pub size: usize,
    pub roughness: f32,
    pub seed: u32,
    pub world_scale: f32,
    pub height_scale: f32,
    pub wrap_edges: bool,
    /// Shift the grid so its middle sits on the world origin.
    pub center_on_origin: bool,
    /// Load this image instead of synthesizing a heightfield.
    pub heightmap: Option<PathBuf>,
    /// Terrain scaling vector handed to the material.
    pub scaling: [f32; 3],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let params = DiamondSquareParams::default();
        Self {
            size: params.size,
            roughness: params.roughness,
            seed: params.seed,
            world_scale: params.world_scale,
            height_scale: params.height_scale,
            wrap_edges: params.wrap_edges,
            center_on_origin: true,
            heightmap: None,
            scaling: [1.0; 3],
        }
    }
}

impl TerrainConfig {
    pub fn params(&self) -> DiamondSquareParams {
        DiamondSquareParams {
            size: self.size,
            roughness: self.roughness,
            seed: self.seed,
            world_scale: self.world_scale,
            height_scale: self.height_scale,
            wrap_edges: self.wrap_edges,
        }
    }

    pub fn scaling(&self) -> Vec3 {
        Vec3::from(self.scaling)
    }
}

/// Asset file names, resolved against `directory`.
///
/// Without a directory nothing is loaded from disk: the terrain renders
/// untextured and the drone uses its fallback box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub directory: Option<PathBuf>,
    pub detail_maps: [String; 2],
    pub mix_map: Option<String>,
    /// glTF model whose bounds size the drone's box.
    pub model: Option<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: None,
            detail_maps: [
                "texture/mars_regolith_detail.png".to_string(),
                "texture/mars_rock_detail.png".to_string(),
            ],
            mix_map: Some("texture/mars_mix.png".to_string()),
            model: Some("models/drone.gltf".to_string()),
        }
    }
}

impl AssetConfig {
    pub fn detail_map_names(&self) -> [&str; 2] {
        [self.detail_maps[0].as_str(), self.detail_maps[1].as_str()]
    }

    /// Full model path, if both a directory and a model are configured.
    pub fn model_path(&self) -> Option<PathBuf> {
        let directory = self.directory.as_ref()?;
        self.model.as_ref().map(|name| directory.join(name))
    }
}

/// Flight tuning for the hover drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    /// Model units to metres.
    pub model_scale: f32,
    /// Model-space half extents used when no model is configured.
    pub fallback_half_extents: [f32; 3],
    /// Gap between the box bottom and the ground.
    pub base_hover_height: f32,
    pub move_speed: f32,
    /// Rate at which altitude closes on its target, per second.
    pub follow_speed: f32,
    /// Extra hover height granted by a boost.
    pub boost_power: f32,
    /// Boost height lost per second.
    pub boost_decay: f32,
    pub tilt_smoothing: f32,
    /// Radians.
    pub max_tilt: f32,
    /// Radians of yaw per pixel of pointer travel.
    pub mouse_sensitivity: f32,
    /// Pointer deltas below this many pixels are ignored.
    pub mouse_dead_zone: f32,
    pub spawn: [f32; 2],
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            model_scale: 0.01,
            fallback_half_extents: [60.0, 15.0, 60.0],
            base_hover_height: 1.0,
            move_speed: 20.0,
            follow_speed: 8.0,
            boost_power: 5.0,
            boost_decay: 3.0,
            tilt_smoothing: 10.0,
            max_tilt: 0.30,
            mouse_sensitivity: 0.0035,
            mouse_dead_zone: 0.2,
            spawn: [0.0, 0.0],
        }
    }
}

impl DroneConfig {
    pub fn spawn_xz(&self) -> Vec2 {
        Vec2::from(self.spawn)
    }

    pub fn fallback_bounds(&self) -> (Vec3, Vec3) {
        let half = Vec3::from(self.fallback_half_extents).abs();
        (-half, half)
    }
}

/// A static box the drone is pushed out of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl ObstacleConfig {
    pub fn to_aabb(&self) -> Aabb {
        let mut aabb = Aabb::new(Vec3::from(self.min), Vec3::from(self.max));
        aabb.verify_integrity();
        aabb
    }
}

/// Headless run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub frames: u64,
    /// Seconds per simulated frame.
    pub timestep: f64,
    pub autopilot_seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            timestep: 1.0 / 60.0,
            autopilot_seed: 7,
        }
    }
}

impl DemoConfig {
    /// Load from `path`, or [`DEFAULT_CONFIG_FILE`] in the working directory.
    /// A missing or invalid file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                log::info!("No config at {:?} ({}), using defaults", path, e);
                return Self::default();
            }
        };
        match Self::from_ron(&data) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn obstacle_boxes(&self) -> Vec<Aabb> {
        self.obstacles.iter().map(ObstacleConfig::to_aabb).collect()
    }
}

fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_demo_constants() {
        let config = DemoConfig::default();
        let params = config.terrain.params();
        assert_eq!(params.size, 513);
        assert_eq!(params.roughness, 0.66);
        assert_eq!(params.seed, 4242);
        assert_eq!(params.world_scale, 1.5);
        assert_eq!(params.height_scale, 60.0);
        assert!(!params.wrap_edges);
        assert!(config.terrain.center_on_origin);
        assert_eq!(config.drone.max_tilt, 0.30);
        assert_eq!(config.run.frames, 600);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = DemoConfig::from_ron(
            "(terrain: (size: 65, seed: 9), drone: (base_hover_height: 2.5), obstacles: [(min: (1.0, 0.0, 1.0), max: (0.0, 2.0, 3.0))])",
        )
        .unwrap();
        assert_eq!(config.terrain.size, 65);
        assert_eq!(config.terrain.seed, 9);
        assert_eq!(config.terrain.roughness, 0.66);
        assert_eq!(config.terrain.scaling(), Vec3::ONE);
        assert_eq!(config.drone.base_hover_height, 2.5);
        assert_eq!(config.drone.move_speed, 20.0);

        let boxes = config.obstacle_boxes();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].min, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(boxes[0].max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn ron_round_trip_keeps_every_section() {
        let mut config = DemoConfig::default();
        config.assets.directory = Some(PathBuf::from("assets"));
        config.obstacles.push(ObstacleConfig {
            min: [0.0; 3],
            max: [1.0; 3],
        });
        let text = config.to_ron().unwrap();
        assert_eq!(DemoConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn missing_or_invalid_file_falls_back_to_defaults() {
        let missing = std::env::temp_dir().join("drone-demo-no-such-config.ron");
        assert_eq!(DemoConfig::load(Some(&missing)), DemoConfig::default());

        let invalid = std::env::temp_dir().join(format!("drone-demo-bad-{}.ron", std::process::id()));
        std::fs::write(&invalid, "(terrain: [not a struct])").unwrap();
        assert_eq!(DemoConfig::load(Some(&invalid)), DemoConfig::default());
        std::fs::remove_file(invalid).ok();
    }

    #[test]
    fn model_path_needs_a_directory() {
        let mut assets = AssetConfig::default();
        assert_eq!(assets.model_path(), None);
        assets.directory = Some(PathBuf::from("assets"));
        assert_eq!(
            assets.model_path(),
            Some(PathBuf::from("assets").join("models/drone.gltf"))
        );
    }
}
