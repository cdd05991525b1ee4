use rand::{Rng, RngCore};

use crate::geometry::{Fp, Ray, Vec3f, EPS};
use crate::material::Material;
use crate::rendering::{clamp_finite, Renderer, RendererError};
use crate::sampling::{cosine_weighted_hemisphere, reflect, refract, schlick};
use crate::scene::Scene;

// Primary rays are nudged forward before casting; shadow and refraction
// rays are offset along the surface normal.
const RAY_NUDGE: Fp = 1e-3;
const SHADOW_OFFSET: Fp = 1e-4;
const REFRACTION_OFFSET: Fp = 1e-3;

/// Pure Monte Carlo path tracer. Estimates emission, direct and indirect
/// diffuse, specular, refracted and reflected radiance by recursive
/// sampling, terminating at a hard depth limit.
pub struct MonteCarloRenderer<'a> {
    scene: &'a Scene,
    max_depth: usize,
}

impl<'a> MonteCarloRenderer<'a> {
    pub fn new(scene: &'a Scene, max_depth: usize) -> Result<Self, RendererError> {
        if max_depth == 0 {
            return Err(RendererError::ZeroMaxDepth);
        }
        Ok(MonteCarloRenderer { scene, max_depth })
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
            // Back face.
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

        if diffuse_gate > EPS {
            colour += direct_lighting(self.scene, &ray, &point, &normal, material, rng)
                * diffuse_gate;
        }

        if diffuse_gate > EPS {
            let bounce_direction = cosine_weighted_hemisphere(&normal, rng);
            let bounce = Ray::new(point, bounce_direction);
            let incoming = self.trace(&bounce, depth + 1, rng);
            colour += material.diffuse_brdf(&-bounce_direction, &-ray.direction, &normal, &incoming)
                * diffuse_gate;
        }

        if material.is_transparent() {
            colour += self.refracted_lighting(&ray, &point, &normal, material, hit.group, depth, rng);
        }

        if material.is_reflective() {
            let reflected = Ray::new(point, reflect(&ray.direction, &normal));
            colour += self.trace(&reflected, depth + 1, rng) * material.reflectivity;
        }

        colour
    }

    // Double refraction through the hit object: Schlick at the entry
    // interface, a within-group cast to the exit surface, Schlick again
    // on the way out, plus a Fresnel-weighted specular reflection.
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
                    let incoming =
                        self.trace(&out_ray, depth + 1, rng) * (1.0 - schlick_exit);
                    colour += material.diffuse_brdf(
                        &inner_ray.direction,
                        &-ray.direction,
                        normal,
                        &incoming,
                    ) * ((1.0 - schlick_entry) * material.transparency);
                }
                // Total internal reflection at the exit contributes nothing.
            } else {
                // No exit surface within the group; trace the transmitted
                // ray as-is.
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

impl Renderer for MonteCarloRenderer<'_> {
    fn pixel_colour(&self, ray: &Ray, rng: &mut dyn RngCore) -> Vec3f {
        clamp_finite(self.trace(ray, 0, rng))
    }
}

/// Shadow-ray estimate of the radiance arriving from every emissive
/// group, averaged over the emissive set. Shared by both integrators.
pub(crate) fn direct_lighting<R: Rng + ?Sized>(
    scene: &Scene,
    ray: &Ray,
    point: &Vec3f,
    normal: &Vec3f,
    material: &Material,
    rng: &mut R,
) -> Vec3f {
    let mut colour = Vec3f::zeros();
    for &light_index in scene.emissive_groups() {
        let light = &scene.render_groups[light_index];
        let light_point = light.random_surface_point(rng);
        let shadow_direction = (light_point - point).normalize();
        if shadow_direction.dot(normal) < EPS {
            // The sampled light point is below the local horizon.
            continue;
        }
        let shadow_ray = Ray::new(point + normal * SHADOW_OFFSET, shadow_direction);
        let Some(shadow_hit) = scene.raycast(&shadow_ray, false) else {
            continue;
        };
        if shadow_hit.group != light_index {
            // Occluded.
            continue;
        }
        let light_normal = scene
            .primitive(&shadow_hit)
            .normal_at(&shadow_ray.point_at(shadow_hit.distance));
        let light_factor = (-shadow_direction).dot(&light_normal);
        if light_factor < EPS {
            continue;
        }
        let radiance = scene.material_of(light_index).emission_colour * light_factor;
        colour += material.diffuse_brdf(&-shadow_direction, &-ray.direction, normal, &radiance);
        if material.is_specular() {
            colour +=
                material.specular_brdf(&-shadow_direction, &-ray.direction, normal, &radiance);
        }
    }
    colour / Fp::max(1.0, scene.emissive_groups().len() as Fp)
}
