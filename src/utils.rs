use crate::geometry::{Fp, Vec3f, EPS};

pub fn safe_sqrt(x: Fp) -> Fp {
    Fp::max(0.0, x).sqrt()
}

#[allow(dead_code)]
pub fn almost_equal_floats(x: Fp, y: Fp) -> bool {
    (x - y).abs() < 10.0 * EPS
}

#[allow(dead_code)]
pub fn almost_equal_vecs(x: &Vec3f, y: &Vec3f) -> bool {
    (x - y).norm() < 10.0 * EPS
}
