use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::aabb::Aabb;
use crate::geometry::{Fp, Primitive, Ray, Vec3f, FP_INF};
use crate::material::Material;

/// A bundle of primitives sharing a single material. Render groups are
/// the unit of light-source identity: shadow rays test against the group
/// they were aimed at, not the individual primitive.
#[derive(Clone, Debug)]
pub struct RenderGroup {
    pub primitives: Vec<Primitive>,
    pub material: usize,
}

impl RenderGroup {
    pub fn new(material: usize) -> Self {
        RenderGroup {
            primitives: Vec::new(),
            material,
        }
    }

    pub fn with_primitives(material: usize, primitives: Vec<Primitive>) -> Self {
        RenderGroup {
            primitives,
            material,
        }
    }

    pub fn surface_area(&self) -> Fp {
        self.primitives.iter().map(Primitive::surface_area).sum()
    }

    /// Index of a random primitive, weighted by surface area.
    pub fn random_primitive<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.surface_area();
        if total <= 0.0 {
            return 0;
        }
        let mut remaining = rng.gen_range(0.0..total);
        for (index, primitive) in self.primitives.iter().enumerate() {
            remaining -= primitive.surface_area();
            if remaining <= 0.0 {
                return index;
            }
        }
        self.primitives.len() - 1
    }

    /// Uniform random point on the group surface: a primitive weighted by
    /// area, then a uniform point on it.
    pub fn random_surface_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3f {
        let index = self.random_primitive(rng);
        self.primitives[index].random_surface_point(rng)
    }
}

/// Nearest-hit result of a scene ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub group: usize,
    pub primitive: usize,
    pub distance: Fp,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("render group {group} references material {material}, but only {count} materials exist")]
    MissingMaterial {
        group: usize,
        material: usize,
        count: usize,
    },
    #[error("material {index} has refractive index {value}, expected at least 1")]
    BadRefractiveIndex { index: usize, value: Fp },
}

/// The scene graph: render groups, their materials, and the state derived
/// by [`Scene::initialize`]. After a successful `initialize` the scene is
/// logically immutable; integrators only read it.
#[derive(Debug, Default)]
pub struct Scene {
    pub render_groups: Vec<RenderGroup>,
    pub materials: Vec<Material>,
    emissive_groups: Vec<usize>,
    aabb: Aabb,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// Appends a material and returns its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Appends a render group and returns its index.
    pub fn add_render_group(&mut self, group: RenderGroup) -> usize {
        self.render_groups.push(group);
        self.render_groups.len() - 1
    }

    /// Validates materials, derives the emissive-group list and the scene
    /// bounding box. Idempotent: calling it again recomputes the same
    /// derived state.
    pub fn initialize(&mut self) -> Result<(), SceneError> {
        for (index, material) in self.materials.iter().enumerate() {
            if material.refractive_index < 1.0 {
                return Err(SceneError::BadRefractiveIndex {
                    index,
                    value: material.refractive_index,
                });
            }
        }
        for (index, group) in self.render_groups.iter().enumerate() {
            if group.material >= self.materials.len() {
                return Err(SceneError::MissingMaterial {
                    group: index,
                    material: group.material,
                    count: self.materials.len(),
                });
            }
        }

        self.emissive_groups.clear();
        for (index, group) in self.render_groups.iter().enumerate() {
            if self.materials[group.material].is_emissive() {
                self.emissive_groups.push(index);
            }
        }

        let mut aabb = Aabb::default();
        for group in &self.render_groups {
            for primitive in &group.primitives {
                aabb = aabb.extend_aabb(&primitive.aabb());
            }
        }
        self.aabb = aabb;

        debug!(
            "scene initialized: {} groups, {} materials, {} emissive",
            self.render_groups.len(),
            self.materials.len(),
            self.emissive_groups.len()
        );
        Ok(())
    }

    /// Indices of render groups whose material is emissive.
    pub fn emissive_groups(&self) -> &[usize] {
        &self.emissive_groups
    }

    /// Bounding box enclosing every primitive.
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn material_of(&self, group: usize) -> &Material {
        &self.materials[self.render_groups[group].material]
    }

    pub fn primitive(&self, hit: &Hit) -> &Primitive {
        &self.render_groups[hit.group].primitives[hit.primitive]
    }

    /// Nearest intersection over all primitives. Ties on exact distance
    /// resolve to the lowest (group, primitive) pair by iteration order.
    pub fn raycast(&self, ray: &Ray, cull_back_face: bool) -> Option<Hit> {
        let mut closest = FP_INF;
        let mut result = None;
        for (group_index, group) in self.render_groups.iter().enumerate() {
            for (primitive_index, primitive) in group.primitives.iter().enumerate() {
                if let Some(distance) = primitive.intersect(ray, cull_back_face) {
                    if distance < closest {
                        closest = distance;
                        result = Some(Hit {
                            group: group_index,
                            primitive: primitive_index,
                            distance,
                        });
                    }
                }
            }
        }
        result
    }

    /// Nearest intersection restricted to a single render group. Used by
    /// refraction to find the exit surface of a transparent object; back
    /// faces are never culled here.
    pub fn raycast_within_group(&self, ray: &Ray, group: usize) -> Option<Hit> {
        let mut closest = FP_INF;
        let mut result = None;
        for (primitive_index, primitive) in self.render_groups[group].primitives.iter().enumerate()
        {
            if let Some(distance) = primitive.intersect(ray, false) {
                if distance < closest {
                    closest = distance;
                    result = Some(Hit {
                        group,
                        primitive: primitive_index,
                        distance,
                    });
                }
            }
        }
        result
    }
}
