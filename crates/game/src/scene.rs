//! Scene construction from config and the per-frame update order.

use anyhow::{Context, Result};
use engine_core::{
    HeightQuery, Mat4, MeshBuffers, ProvidesMeshBuffers, ProvidesWorldTransform, Vec3,
};
use input::{DroneBindings, DroneInput, InputState};
use physics::{resolve_against, Aabb};
use procgen::Terrain;
use renderer::{load_model_bounds, TerrainMaterial, TerrainTextures};

use crate::config::DemoConfig;
use crate::drone::{Drone, DroneTuning};

/// One mesh to draw and where to draw it.
pub struct DrawItem<'a> {
    pub mesh: &'a MeshBuffers,
    pub transform: Mat4,
}

/// Draw item for anything offering both render capabilities; `None` until it has a mesh.
pub fn draw_item<T>(object: &T) -> Option<DrawItem<'_>>
where
    T: ProvidesMeshBuffers + ProvidesWorldTransform,
{
    object.mesh_buffers().map(|mesh| DrawItem {
        mesh,
        transform: object.world_transform(),
    })
}

/// Terrain, drone and static obstacles of the demo.
pub struct Scene {
    terrain: Terrain,
    material: TerrainMaterial,
    textures: Option<TerrainTextures>,
    drone: Drone,
    obstacles: Vec<Aabb>,
    bindings: DroneBindings,
}

impl Scene {
    /// Build the scene. Any terrain, texture or model failure aborts construction.
    pub fn from_config(config: &DemoConfig) -> Result<Self> {
        let terrain_cfg = &config.terrain;
        let mut terrain = Terrain::new();
        match &terrain_cfg.heightmap {
            Some(path) => terrain
                .load_heightmap(path, terrain_cfg.world_scale, terrain_cfg.height_scale)
                .with_context(|| format!("loading heightmap {:?}", path))?,
            None => terrain
                .generate(&terrain_cfg.params())
                .context("generating terrain")?,
        }
        if terrain_cfg.center_on_origin {
            terrain.center_on_origin();
        }
        terrain.set_size(terrain_cfg.scaling());

        let assets = &config.assets;
        let textures = match &assets.directory {
            Some(directory) => Some(
                TerrainTextures::load(
                    directory,
                    assets.detail_map_names(),
                    assets.mix_map.as_deref(),
                )
                .context("loading terrain textures")?,
            ),
            None => {
                log::info!("No asset directory configured, terrain stays untextured");
                None
            }
        };

        let mut material = TerrainMaterial::default();
        material.set_use_mix_texture(textures.as_ref().is_some_and(|t| t.mix.is_some()));
        material.set_triplanar(0.08, 4.0);
        material.set_rock(0.45, 0.12);
        material.set_tint(Vec3::new(1.06, 0.95, 0.90));
        material.set_fog(80.0, 300.0, Vec3::new(0.95, 0.95, 1.0));
        material.set_scaling(terrain.size());

        let (model_min, model_max) = match assets.model_path() {
            Some(path) => load_model_bounds(&path)
                .with_context(|| format!("loading drone model {:?}", path))?,
            None => config.drone.fallback_bounds(),
        };
        let mut drone = Drone::new(
            model_min,
            model_max,
            config.drone.model_scale,
            DroneTuning::from(&config.drone),
        );
        let spawn = config.drone.spawn_xz();
        drone.place_on_terrain(Some(&terrain), spawn.x, spawn.y);
        log::info!("Drone spawned at {:?}", drone.position());

        Ok(Self {
            terrain,
            material,
            textures,
            drone,
            obstacles: config.obstacle_boxes(),
            bindings: DroneBindings::default(),
        })
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn material(&self) -> &TerrainMaterial {
        &self.material
    }

    pub fn textures(&self) -> Option<&TerrainTextures> {
        self.textures.as_ref()
    }

    pub fn drone(&self) -> &Drone {
        &self.drone
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    /// Sample `input` and run one frame.
    pub fn frame(&mut self, input: &InputState, dt: f32) {
        let sample = input.drone_input(&self.bindings);
        self.step(&sample, dt);
    }

    /// Drone flight, then obstacle separation, then the transform rebuild.
    pub fn step(&mut self, input: &DroneInput, dt: f32) {
        let terrain: &dyn HeightQuery = &self.terrain;
        self.drone.simulate(input, dt, Some(terrain));

        let mut probe = *self.drone.world_aabb();
        let push = resolve_against(&mut probe, &self.obstacles);
        if probe.colliding {
            self.drone.apply_separation(push);
        }

        self.drone.refresh_transform();
    }

    /// Everything the renderer draws this frame.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        draw_item(&self.terrain).into_iter().collect()
    }
}
