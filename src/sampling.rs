use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::geometry::{Fp, Vec3f};
use crate::utils::safe_sqrt;

/// Uniform random direction on the unit sphere.
pub fn uniform_sphere_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3f {
    let normal_distr = Normal::new(0.0, 1.0).unwrap();
    Vec3f::new(
        normal_distr.sample(rng),
        normal_distr.sample(rng),
        normal_distr.sample(rng),
    )
    .normalize()
}

/// Random direction about `normal` with density cos(theta) / pi.
pub fn cosine_weighted_hemisphere<R: Rng + ?Sized>(normal: &Vec3f, rng: &mut R) -> Vec3f {
    let candidate = uniform_sphere_direction(rng) + normal;
    let length = candidate.norm();
    if length < 1e-6 {
        // The uniform sample landed on the antipode of the normal.
        return *normal;
    }
    candidate / length
}

pub fn reflect(direction: &Vec3f, normal: &Vec3f) -> Vec3f {
    let projection = -direction.dot(normal);
    direction + normal * projection * 2.0
}

/// Snell refraction of `direction` at a surface with outward `normal`,
/// with `eta` the ratio of refractive indices (from / to). `None` on
/// total internal reflection.
pub fn refract(direction: &Vec3f, normal: &Vec3f, eta: Fp) -> Option<Vec3f> {
    let cos_incident = -direction.dot(normal);
    let sin2_transmitted = eta * eta * (1.0 - cos_incident * cos_incident);
    if sin2_transmitted > 1.0 {
        return None;
    }
    let cos_transmitted = safe_sqrt(1.0 - sin2_transmitted);
    Some(direction * eta + normal * (eta * cos_incident - cos_transmitted))
}

/// Schlick's approximation of the Fresnel reflectance for a ray crossing
/// an interface from refractive index `n1` into `n2`.
pub fn schlick(direction: &Vec3f, normal: &Vec3f, n1: Fp, n2: Fp) -> Fp {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    let alpha = normal.dot(&-direction).clamp(0.0, 1.0);
    r0 + (1.0 - r0) * (1.0 - alpha).powi(5)
}
