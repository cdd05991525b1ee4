use crate::geometry::{Fp, Vec3f, EPS};
use crate::sampling::reflect;

/// Surface description shared by every primitive of a render group.
///
/// All scalar attributes live in `[0, 1]` except `specular_exponent`
/// (any non-negative value) and `refractive_index` (at least 1).
/// `emission_colour` is HDR and may exceed 1 per channel.
#[derive(Clone, Debug)]
pub struct Material {
    pub surface_colour: Vec3f,
    pub emission_colour: Vec3f,
    pub reflectivity: Fp,
    pub transparency: Fp,
    pub specularity: Fp,
    pub specular_exponent: Fp,
    pub refractive_index: Fp,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            surface_colour: Vec3f::new(0.8, 0.8, 0.8),
            emission_colour: Vec3f::zeros(),
            reflectivity: 0.0,
            transparency: 0.0,
            specularity: 0.0,
            specular_exponent: 1.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    pub fn diffuse(surface_colour: Vec3f) -> Self {
        Material {
            surface_colour,
            ..Material::default()
        }
    }

    pub fn emissive(emission_colour: Vec3f) -> Self {
        Material {
            emission_colour,
            ..Material::default()
        }
    }

    pub fn mirror(reflectivity: Fp) -> Self {
        Material {
            surface_colour: Vec3f::new(1.0, 1.0, 1.0),
            reflectivity,
            ..Material::default()
        }
    }

    pub fn glass(refractive_index: Fp, transparency: Fp) -> Self {
        Material {
            surface_colour: Vec3f::new(1.0, 1.0, 1.0),
            transparency,
            specularity: 1.0,
            specular_exponent: 50.0,
            refractive_index,
            ..Material::default()
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.emission_colour.max() > EPS
    }

    pub fn is_reflective(&self) -> bool {
        self.reflectivity > EPS
    }

    pub fn is_transparent(&self) -> bool {
        self.transparency > EPS
    }

    pub fn is_specular(&self) -> bool {
        self.specularity > EPS
    }

    /// Lambertian reflection of `incoming_radiance` arriving along
    /// `in_direction` (pointing towards the surface).
    pub fn diffuse_brdf(
        &self,
        in_direction: &Vec3f,
        _out_direction: &Vec3f,
        normal: &Vec3f,
        incoming_radiance: &Vec3f,
    ) -> Vec3f {
        incoming_radiance.component_mul(&self.surface_colour)
            * Fp::max(0.0, (-in_direction).dot(normal))
    }

    /// Phong-style specular highlight.
    pub fn specular_brdf(
        &self,
        in_direction: &Vec3f,
        out_direction: &Vec3f,
        normal: &Vec3f,
        incoming_radiance: &Vec3f,
    ) -> Vec3f {
        let mirrored = reflect(in_direction, normal);
        incoming_radiance
            * (Fp::max(0.0, mirrored.dot(&-out_direction)).powf(self.specular_exponent)
                * self.specularity)
    }
}
