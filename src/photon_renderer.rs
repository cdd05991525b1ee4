use rand::{Rng, RngCore};

use crate::geometry::{Fp, Ray, Vec3f, EPS, FP_PI};
use crate::material::Material;
use crate::monte_carlo::direct_lighting;
use crate::photon::{Photon, PhotonKind, PhotonMap};
use crate::rendering::{clamp_finite, Renderer, RendererError};
use crate::sampling::{reflect, refract, schlick};
use crate::scene::Scene;

const RAY_NUDGE: Fp = 1e-3;
const REFRACTION_OFFSET: Fp = 1e-3;

// TODO: remove the damping once the photon gather is energy-balanced.
const OUTPUT_DAMPING: Fp = 0.95;

/// Tuning for the photon gather at every shading point.
#[derive(Clone, Debug)]
pub struct PhotonGatherConfig {
    pub search_radius: Fp,
    pub weight_factor: Fp,
    pub caustics_strength_multiplier: Fp,
    pub search_area: Fp,
}

impl Default for PhotonGatherConfig {
    fn default() -> Self {
        let search_radius = 0.5;
        PhotonGatherConfig {
            search_radius,
            weight_factor: 2.0,
            caustics_strength_multiplier: 50.0,
            search_area: FP_PI * search_radius * search_radius,
        }
    }
}

/// Path tracer backed by a photon map: the recursive indirect-diffuse
/// bounce of the pure Monte Carlo integrator is replaced by a gather of
/// indirect photons, and focused light shows up through a dedicated
/// caustic gather.
pub struct PhotonMapRenderer<'a> {
    scene: &'a Scene,
    photon_map: &'a PhotonMap,
    max_depth: usize,
    gather: PhotonGatherConfig,
}

impl<'a> PhotonMapRenderer<'a> {
    pub fn new(
        scene: &'a Scene,
        max_depth: usize,
        photon_map: &'a PhotonMap,
        gather: PhotonGatherConfig,
    ) -> Result<Self, RendererError> {
        if max_depth == 0 {
            return Err(RendererError::ZeroMaxDepth);
        }
        if scene.emissive_groups().is_empty() {
            return Err(RendererError::NoEmissiveGroups);
        }
        Ok(PhotonMapRenderer {
            scene,
            photon_map,
            max_depth,
            gather,
        })
    }

    fn trace<R: Rng + ?Sized>(&self, ray: &Ray, depth: usize, rng: &mut R) -> Vec3f {
        if depth == self.max_depth {
            return Vec3f::zeros();
        }

        let ray = Ray::new(ray.origin + ray.direction * RAY_NUDGE, ray.direction);
        let Some(hit) = self.scene.raycast(&ray, false) else {
            return Vec3f::zeros();
        };
        let point = ray.point_at(hit.distance);
        let normal = self.scene.primitive(&hit).normal_at(&point);

        let cos_view = (-ray.direction).dot(&normal);
        if cos_view < EPS {
            return Vec3f::zeros();
        }

        let material = self.scene.material_of(hit.group);
        if material.is_emissive() {
            let f = if depth >= 1 { cos_view } else { 1.0 };
            return material.emission_colour * f;
        }

        let mut colour = Vec3f::zeros();
        let rf = 1.0 - material.reflectivity;
        let tf = 1.0 - material.transparency;
        let diffuse_gate = rf * tf;

        colour += self.caustic_lighting(&ray, &point, &normal, material);

        if diffuse_gate > EPS {
            colour += direct_lighting(self.scene, &ray, &point, &normal, material, rng)
                * diffuse_gate;
        }

        if diffuse_gate > EPS {
            colour += self.indirect_lighting(&ray, &point, &normal, material) * diffuse_gate;
        }

        if material.is_transparent() {
            colour += self.refracted_lighting(&ray, &point, &normal, material, hit.group, depth, rng);
        }

        if material.is_reflective() {
            let reflected = Ray::new(point, reflect(&ray.direction, &normal));
            colour += self.trace(&reflected, depth + 1, rng) * material.reflectivity;
        }

        colour * OUTPUT_DAMPING
    }

    // Focused light: photons that reached this surface through a purely
    // specular or refractive prefix.
    fn caustic_lighting(
        &self,
        ray: &Ray,
        point: &Vec3f,
        normal: &Vec3f,
        material: &Material,
    ) -> Vec3f {
        let photons =
            self.photon_map
                .photons_within_radius(PhotonKind::Caustic, point, self.gather.search_radius);
        if photons.is_empty() {
            return Vec3f::zeros();
        }
        let mut accumulator = Vec3f::zeros();
        for photon in &photons {
            let photon_normal = self.photon_normal(photon);
            let energy = photon.energy * (self.photon_weight(photon, point, normal, &photon_normal));
            accumulator += material.diffuse_brdf(
                &photon.incoming_direction,
                &-ray.direction,
                &photon_normal,
                &energy,
            );
        }
        let scale = self.gather.caustics_strength_multiplier / self.gather.search_area;
        Vec3f::new(
            Fp::min(1.0, accumulator.x * scale),
            Fp::min(1.0, accumulator.y * scale),
            Fp::min(1.0, accumulator.z * scale),
        )
    }

    // Replaces the recursive indirect-diffuse estimate with a gather of
    // photons that arrived here after at least one diffuse bounce.
    fn indirect_lighting(
        &self,
        ray: &Ray,
        point: &Vec3f,
        normal: &Vec3f,
        material: &Material,
    ) -> Vec3f {
        let photons = self.photon_map.photons_within_radius(
            PhotonKind::Indirect,
            point,
            self.gather.search_radius,
        );
        if photons.is_empty() {
            return Vec3f::zeros();
        }
        let normalisation = 1.0 / photons.len() as Fp;
        let mut accumulator = Vec3f::zeros();
        for photon in &photons {
            let photon_normal = self.photon_normal(photon);
            let f = normalisation * self.photon_weight(photon, point, normal, &photon_normal);
            accumulator += material.diffuse_brdf(
                &photon.incoming_direction,
                &-ray.direction,
                normal,
                &(photon.energy * f),
            );
        }
        accumulator
    }

    fn photon_normal(&self, photon: &Photon) -> Vec3f {
        self.scene.render_groups[photon.group].primitives[photon.primitive]
            .normal_at(&photon.position)
    }

    // Distance falloff times the alignment of the photon's surface with
    // the gather surface.
    fn photon_weight(
        &self,
        photon: &Photon,
        point: &Vec3f,
        normal: &Vec3f,
        photon_normal: &Vec3f,
    ) -> Fp {
        let distance = (photon.position - point).norm();
        let weight = Fp::max(0.0, 1.0 - distance * self.gather.weight_factor);
        Fp::max(0.0, photon_normal.dot(normal)) * weight
    }

    #[allow(clippy::too_many_arguments)]
    fn refracted_lighting<R: Rng + ?Sized>(
        &self,
        ray: &Ray,
        point: &Vec3f,
        normal: &Vec3f,
        material: &Material,
        group: usize,
        depth: usize,
        rng: &mut R,
    ) -> Vec3f {
        let n1 = 1.0;
        let n2 = material.refractive_index;
        let schlick_entry = schlick(&ray.direction, normal, n1, n2);
        let mut colour = Vec3f::zeros();

        if let Some(transmitted) = refract(&ray.direction, normal, n1 / n2) {
            let inner_ray = Ray::new(point - normal * REFRACTION_OFFSET, transmitted);
            if let Some(exit) = self.scene.raycast_within_group(&inner_ray, group) {
                let exit_point = inner_ray.point_at(exit.distance);
                let exit_normal = self.scene.primitive(&exit).normal_at(&exit_point);
                let schlick_exit = schlick(&inner_ray.direction, &-exit_normal, n2, n1);
                if let Some(outgoing) = refract(&inner_ray.direction, &-exit_normal, n2 / n1) {
                    let out_ray = Ray::new(exit_point + exit_normal * REFRACTION_OFFSET, outgoing);
                    let incoming = self.trace(&out_ray, depth + 1, rng) * (1.0 - schlick_exit);
                    colour += material.diffuse_brdf(
                        &inner_ray.direction,
                        &-ray.direction,
                        normal,
                        &incoming,
                    ) * ((1.0 - schlick_entry) * material.transparency);
                }
            } else {
                colour += self.trace(&inner_ray, depth + 1, rng)
                    * ((1.0 - schlick_entry) * material.transparency);
            }
        }

        let specular_ray = Ray::new(*point, reflect(&ray.direction, normal));
        let incoming = self.trace(&specular_ray, depth + 1, rng);
        colour += material.specular_brdf(
            &-specular_ray.direction,
            &-ray.direction,
            normal,
            &incoming,
        ) * (schlick_entry * material.specularity);

        colour
    }
}

impl Renderer for PhotonMapRenderer<'_> {
    fn pixel_colour(&self, ray: &Ray, rng: &mut dyn RngCore) -> Vec3f {
        clamp_finite(self.trace(ray, 0, rng))
    }
}
