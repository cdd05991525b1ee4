use arrayvec::ArrayVec;
use na::Vector3;
use rand::Rng;

use crate::aabb::Aabb;
use crate::sampling::uniform_sphere_direction;

pub type Fp = f32;
pub const FP_PI: Fp = std::f32::consts::PI;
pub const FP_INF: Fp = f32::INFINITY;
pub const FP_NEG_INF: Fp = f32::NEG_INFINITY;
pub type Vec3f = Vector3<Fp>;

pub static EPS: Fp = 0.00001;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
}

impl Ray {
    pub fn new(origin: Vec3f, direction: Vec3f) -> Self {
        Ray { origin, direction }
    }

    pub fn point_at(&self, t: Fp) -> Vec3f {
        self.origin + self.direction * t
    }
}

/// A renderable surface. Triangles cache their face normal; it is
/// constant across the surface.
#[derive(Clone, Debug)]
pub enum Primitive {
    Triangle { vertices: [Vec3f; 3], normal: Vec3f },
    Sphere { centre: Vec3f, radius: Fp },
}

impl Primitive {
    /// Counter-clockwise winding; the face normal follows the right-hand
    /// rule.
    pub fn triangle(a: Vec3f, b: Vec3f, c: Vec3f) -> Self {
        let normal = (b - a).cross(&(c - a)).normalize();
        Primitive::Triangle {
            vertices: [a, b, c],
            normal,
        }
    }

    pub fn sphere(centre: Vec3f, radius: Fp) -> Self {
        Primitive::Sphere { centre, radius }
    }

    /// Distance to the nearest intersection in front of the ray origin,
    /// strictly greater than `EPS`. With `cull_back_face` set, hits whose
    /// outward normal points with the ray are dropped.
    pub fn intersect(&self, ray: &Ray, cull_back_face: bool) -> Option<Fp> {
        match self {
            Primitive::Triangle { vertices, normal } => {
                intersect_with_triangle(ray, vertices, normal, cull_back_face)
            }
            Primitive::Sphere { centre, radius } => {
                intersect_with_sphere(ray, centre, *radius, cull_back_face)
            }
        }
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: &Vec3f) -> Vec3f {
        match self {
            Primitive::Triangle { normal, .. } => *normal,
            Primitive::Sphere { centre, radius } => (point - centre) / *radius,
        }
    }

    /// Uniform random point on the surface.
    pub fn random_surface_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3f {
        match self {
            Primitive::Triangle {
                vertices: [a, b, c],
                ..
            } => {
                let (u, v) = (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
                let (u, v) = if u + v < 1.0 {
                    (u, v)
                } else {
                    (1.0 - u, 1.0 - v)
                };
                a + (b - a) * u + (c - a) * v
            }
            Primitive::Sphere { centre, radius } => {
                centre + uniform_sphere_direction(rng) * *radius
            }
        }
    }

    pub fn surface_area(&self) -> Fp {
        match self {
            Primitive::Triangle {
                vertices: [a, b, c],
                ..
            } => (b - a).cross(&(c - a)).norm() * 0.5,
            Primitive::Sphere { radius, .. } => 4.0 * FP_PI * radius * radius,
        }
    }

    pub fn aabb(&self) -> Aabb {
        let eps_vec = Vec3f::new(EPS, EPS, EPS);
        match self {
            Primitive::Triangle {
                vertices: [a, b, c],
                ..
            } => Aabb {
                min: a.inf(b).inf(c) - eps_vec,
                max: a.sup(b).sup(c) + eps_vec,
            },
            Primitive::Sphere { centre, radius } => {
                let r_vec = Vec3f::new(*radius, *radius, *radius);
                Aabb {
                    min: centre - r_vec - eps_vec,
                    max: centre + r_vec + eps_vec,
                }
            }
        }
    }
}

// Standard Moller-Trumbore test.
fn intersect_with_triangle(
    ray: &Ray,
    [a, b, c]: &[Vec3f; 3],
    normal: &Vec3f,
    cull_back_face: bool,
) -> Option<Fp> {
    if cull_back_face && ray.direction.dot(normal) > 0.0 {
        return None;
    }
    let e1 = b - a;
    let e2 = c - a;
    let h = ray.direction.cross(&e2);
    let det = e1.dot(&h);
    if det.abs() < EPS {
        // Ray parallel to the triangle plane.
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&e1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv_det * e2.dot(&q);
    if t > EPS {
        Some(t)
    } else {
        None
    }
}

fn intersect_with_sphere(
    ray: &Ray,
    centre: &Vec3f,
    radius: Fp,
    cull_back_face: bool,
) -> Option<Fp> {
    for t in sphere_intersections(ray, centre, radius) {
        if cull_back_face {
            let normal = (ray.point_at(t) - centre) / radius;
            if ray.direction.dot(&normal) > 0.0 {
                continue;
            }
        }
        return Some(t);
    }
    None
}

// Both roots of |o + t*d - c|^2 = r^2 above EPS, nearest first.
fn sphere_intersections(ray: &Ray, centre: &Vec3f, radius: Fp) -> ArrayVec<Fp, 2> {
    let oc = ray.origin - centre;
    let a = ray.direction.norm_squared();
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    let mut result = ArrayVec::<Fp, 2>::new();
    if discriminant < 0.0 {
        return result;
    }
    let sqrt_d = discriminant.sqrt();
    for t in [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)] {
        if t > EPS {
            result.push(t);
        }
    }
    result
}
