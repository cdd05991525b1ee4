use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::geometry::{Fp, Ray, Vec3f};
use crate::octree::Octree;
use crate::sampling::{cosine_weighted_hemisphere, reflect, refract};
use crate::scene::Scene;

// Secondary rays start this far off the surface to avoid self-hits.
const SURFACE_OFFSET: Fp = 1e-4;

/// Classification of a stored photon by the path that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotonKind {
    /// First-bounce landing on a non-specular surface, straight from a
    /// light.
    Direct,
    /// Landed diffusely after at least one earlier diffuse bounce.
    Indirect,
    /// Landed diffusely after a purely specular/refractive prefix.
    Caustic,
    /// Marks where a direct photon would have landed had the path not
    /// been occluded.
    Shadow,
}

impl PhotonKind {
    pub const ALL: [PhotonKind; 4] = [
        PhotonKind::Direct,
        PhotonKind::Indirect,
        PhotonKind::Caustic,
        PhotonKind::Shadow,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug)]
pub struct Photon {
    pub position: Vec3f,
    pub incoming_direction: Vec3f,
    pub energy: Vec3f,
    /// Render group of the surface the photon landed on.
    pub group: usize,
    /// Primitive within that group.
    pub primitive: usize,
}

#[derive(Clone, Debug)]
pub struct PhotonMapConfig {
    pub photons_per_light_source: usize,
    pub max_photons_per_node: usize,
    pub min_node_box_dimension: Fp,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for PhotonMapConfig {
    fn default() -> Self {
        PhotonMapConfig {
            photons_per_light_source: 10_000,
            max_photons_per_node: 32,
            min_node_box_dimension: 0.05,
            max_depth: 5,
            seed: 0,
        }
    }
}

#[derive(Debug, Default)]
struct KindStore {
    photons: Vec<Photon>,
    positions: Vec<Vec3f>,
    tree: Option<Octree>,
}

impl KindStore {
    fn push(&mut self, photon: Photon) {
        self.positions.push(photon.position);
        self.photons.push(photon);
    }
}

/// A precomputed sample of the light distribution in a scene. Photons are
/// distributed from every emissive render group, classified by path
/// history, and indexed per kind in an octree. Immutable once built.
#[derive(Debug)]
pub struct PhotonMap {
    stores: [KindStore; 4],
}

impl PhotonMap {
    /// Emits `photons_per_light_source` photons from every emissive
    /// group, scatters them through the scene and builds the per-kind
    /// spatial indices. Deterministic for a given `config.seed`.
    pub fn build(scene: &Scene, config: &PhotonMapConfig) -> Self {
        let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
        let mut stores: [KindStore; 4] = Default::default();

        for &group_index in scene.emissive_groups() {
            let group = &scene.render_groups[group_index];
            let emission = scene.materials[group.material].emission_colour;
            let energy = emission / config.photons_per_light_source as Fp;
            for _ in 0..config.photons_per_light_source {
                let primitive_index = group.random_primitive(&mut rng);
                let primitive = &group.primitives[primitive_index];
                let origin = primitive.random_surface_point(&mut rng);
                let normal = primitive.normal_at(&origin);
                let direction = cosine_weighted_hemisphere(&normal, &mut rng);
                let ray = Ray::new(origin + normal * SURFACE_OFFSET, direction);
                trace_photon(scene, ray, energy, config.max_depth, &mut rng, &mut stores);
            }
        }

        for store in &mut stores {
            if !store.positions.is_empty() {
                store.tree = Some(Octree::build(
                    &store.positions,
                    config.max_photons_per_node,
                    config.min_node_box_dimension,
                ));
            }
        }

        let map = PhotonMap { stores };
        for kind in PhotonKind::ALL {
            debug!(
                "photon map: {:?} holds {} photons in {} octree nodes",
                kind,
                map.stored_photons(kind).len(),
                map.octree_node_count(kind),
            );
        }
        map
    }

    /// Every stored photon of `kind` within `radius` of `position`.
    pub fn photons_within_radius(
        &self,
        kind: PhotonKind,
        position: &Vec3f,
        radius: Fp,
    ) -> Vec<&Photon> {
        let store = &self.stores[kind.index()];
        let Some(tree) = &store.tree else {
            return Vec::new();
        };
        let mut indices = Vec::new();
        tree.query_radius(&store.positions, position, radius, &mut indices);
        indices.into_iter().map(|i| &store.photons[i]).collect()
    }

    pub fn stored_photons(&self, kind: PhotonKind) -> &[Photon] {
        &self.stores[kind.index()].photons
    }

    pub fn octree_node_count(&self, kind: PhotonKind) -> usize {
        self.stores[kind.index()]
            .tree
            .as_ref()
            .map_or(0, Octree::node_count)
    }
}

fn trace_photon<R: Rng + ?Sized>(
    scene: &Scene,
    initial_ray: Ray,
    initial_energy: Vec3f,
    max_depth: usize,
    rng: &mut R,
    stores: &mut [KindStore; 4],
) {
    let mut ray = initial_ray;
    let mut energy = initial_energy;
    let mut diffuse_bounces = 0usize;
    let mut specular_bounces = 0usize;

    for _ in 0..max_depth {
        let Some(hit) = scene.raycast(&ray, false) else {
            return;
        };
        let point = ray.point_at(hit.distance);
        let material = scene.material_of(hit.group);
        if material.is_emissive() {
            // Landed back on a light source; the path ends unstored.
            return;
        }
        let normal = scene.primitive(&hit).normal_at(&point);
        let oriented = if ray.direction.dot(&normal) > 0.0 {
            -normal
        } else {
            normal
        };

        if material.is_transparent() {
            specular_bounces += 1;
            let entering = ray.direction.dot(&normal) < 0.0;
            let eta = if entering {
                1.0 / material.refractive_index
            } else {
                material.refractive_index
            };
            match refract(&ray.direction, &oriented, eta) {
                Some(transmitted) => {
                    ray = Ray::new(point - oriented * SURFACE_OFFSET, transmitted);
                }
                None => {
                    // Total internal reflection.
                    let bounced = reflect(&ray.direction, &oriented);
                    ray = Ray::new(point + oriented * SURFACE_OFFSET, bounced);
                }
            }
        } else if material.is_reflective() {
            specular_bounces += 1;
            let bounced = reflect(&ray.direction, &oriented);
            ray = Ray::new(point + oriented * SURFACE_OFFSET, bounced);
        } else {
            let kind = if diffuse_bounces == 0 && specular_bounces == 0 {
                PhotonKind::Direct
            } else if diffuse_bounces == 0 {
                PhotonKind::Caustic
            } else {
                PhotonKind::Indirect
            };
            stores[kind.index()].push(Photon {
                position: point,
                incoming_direction: ray.direction,
                energy,
                group: hit.group,
                primitive: hit.primitive,
            });
            if kind == PhotonKind::Direct {
                record_shadow_photons(
                    scene,
                    &point,
                    &ray.direction,
                    energy,
                    max_depth,
                    &mut stores[PhotonKind::Shadow.index()],
                );
            }
            diffuse_bounces += 1;
            let bounced = cosine_weighted_hemisphere(&oriented, rng);
            ray = Ray::new(point + oriented * SURFACE_OFFSET, bounced);
        }

        // Russian roulette: continue with probability max(surface_colour),
        // re-weighting so that surviving energy never grows per channel.
        let p = material.surface_colour.max().clamp(0.0, 1.0);
        if p <= 0.0 || rng.gen_range(0.0..1.0) >= p {
            return;
        }
        energy = energy.component_mul(&material.surface_colour) / p;
    }
}

// Surfaces straight behind a direct landing are occluded from the light;
// mark them so direct visibility can be estimated from the map alone.
fn record_shadow_photons(
    scene: &Scene,
    from: &Vec3f,
    direction: &Vec3f,
    energy: Vec3f,
    max_depth: usize,
    store: &mut KindStore,
) {
    let mut ray = Ray::new(from + direction * SURFACE_OFFSET, *direction);
    for _ in 0..max_depth {
        let Some(hit) = scene.raycast(&ray, false) else {
            return;
        };
        let point = ray.point_at(hit.distance);
        if !scene.material_of(hit.group).is_emissive() {
            store.push(Photon {
                position: point,
                incoming_direction: *direction,
                energy,
                group: hit.group,
                primitive: hit.primitive,
            });
        }
        ray = Ray::new(point + direction * SURFACE_OFFSET, *direction);
    }
}
