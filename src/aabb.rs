use crate::geometry::{Fp, Vec3f, FP_INF, FP_NEG_INF};

#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb {
            min: Vec3f::new(FP_INF, FP_INF, FP_INF),
            max: Vec3f::new(FP_NEG_INF, FP_NEG_INF, FP_NEG_INF),
        }
    }
}

impl Aabb {
    pub fn new(min: Vec3f, max: Vec3f) -> Self {
        Aabb { min, max }
    }

    pub fn extend_point(&self, point: &Vec3f) -> Aabb {
        Aabb {
            min: self.min.inf(point),
            max: self.max.sup(point),
        }
    }

    pub fn extend_aabb(&self, aabb: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&aabb.min),
            max: self.max.sup(&aabb.max),
        }
    }

    pub fn contains_point(&self, point: &Vec3f) -> bool {
        for coord in 0..3 {
            if point[coord] < self.min[coord] || point[coord] > self.max[coord] {
                return false;
            }
        }
        true
    }

    pub fn contains(&self, aabb: &Aabb) -> bool {
        for coord in 0..3 {
            if aabb.min[coord] < self.min[coord] {
                return false;
            }
            if aabb.max[coord] > self.max[coord] {
                return false;
            }
        }
        true
    }

    pub fn dimensions(&self) -> Vec3f {
        self.max - self.min
    }

    pub fn centre(&self) -> Vec3f {
        (self.min + self.max) * 0.5
    }

    /// Squared distance from `point` to the closest point of the box;
    /// zero when the point lies inside.
    pub fn distance_squared(&self, point: &Vec3f) -> Fp {
        let clamped = Vec3f::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        );
        (point - clamped).norm_squared()
    }

    pub fn overlaps_sphere(&self, centre: &Vec3f, radius: Fp) -> bool {
        self.distance_squared(centre) <= radius * radius
    }
}
