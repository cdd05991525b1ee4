use crate::aabb::Aabb;
use crate::geometry::{Fp, Vec3f};

#[derive(Debug)]
struct OctreeNode {
    aabb: Aabb,
    children: Option<[usize; 8]>,
    point_indices: Vec<usize>,
}

/// Recursive eight-way subdivision over a fixed set of points. Leaves
/// split once they exceed `max_points_per_node`, unless the resulting
/// child extent would fall below `min_node_box_dimension`. The tree
/// stores indices into the point slice it was built from; callers pass
/// the same slice back in when querying.
#[derive(Debug)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    root: Option<usize>,
}

impl Octree {
    pub fn build(points: &[Vec3f], max_points_per_node: usize, min_node_box_dimension: Fp) -> Self {
        if points.is_empty() {
            return Octree {
                nodes: Vec::new(),
                root: None,
            };
        }
        let mut aabb = Aabb::default();
        for point in points {
            aabb = aabb.extend_point(point);
        }
        let mut nodes = Vec::new();
        let indices = (0..points.len()).collect();
        let root = create_octree_node(
            &mut nodes,
            points,
            indices,
            aabb,
            max_points_per_node.max(1),
            min_node_box_dimension,
        );
        Octree {
            nodes,
            root: Some(root),
        }
    }

    /// Appends the indices of all points within `radius` of `centre` to
    /// `result`. `points` must be the slice the tree was built from.
    pub fn query_radius(
        &self,
        points: &[Vec3f],
        centre: &Vec3f,
        radius: Fp,
        result: &mut Vec<usize>,
    ) {
        if let Some(root) = self.root {
            self.query_node(root, points, centre, radius, result);
        }
    }

    fn query_node(
        &self,
        node_index: usize,
        points: &[Vec3f],
        centre: &Vec3f,
        radius: Fp,
        result: &mut Vec<usize>,
    ) {
        let node = &self.nodes[node_index];
        if !node.aabb.overlaps_sphere(centre, radius) {
            return;
        }
        match node.children {
            Some(children) => {
                for child in children {
                    self.query_node(child, points, centre, radius, result);
                }
            }
            None => {
                let radius_squared = radius * radius;
                for &index in &node.point_indices {
                    if (points[index] - centre).norm_squared() <= radius_squared {
                        result.push(index);
                    }
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn create_octree_node(
    nodes: &mut Vec<OctreeNode>,
    points: &[Vec3f],
    indices: Vec<usize>,
    aabb: Aabb,
    max_points_per_node: usize,
    min_node_box_dimension: Fp,
) -> usize {
    let half = aabb.dimensions() * 0.5;
    let splittable = indices.len() > max_points_per_node
        && half.x >= min_node_box_dimension
        && half.y >= min_node_box_dimension
        && half.z >= min_node_box_dimension;
    if !splittable {
        nodes.push(OctreeNode {
            aabb,
            children: None,
            point_indices: indices,
        });
        return nodes.len() - 1;
    }

    let centre = aabb.centre();
    let mut buckets: [Vec<usize>; 8] = std::array::from_fn(|_| Vec::new());
    for index in indices {
        let point = &points[index];
        let octant = usize::from(point.x > centre.x)
            | usize::from(point.y > centre.y) << 1
            | usize::from(point.z > centre.z) << 2;
        buckets[octant].push(index);
    }

    let mut children = [0usize; 8];
    for (octant, bucket) in buckets.into_iter().enumerate() {
        let child_aabb = octant_aabb(&aabb, &centre, octant);
        children[octant] = create_octree_node(
            nodes,
            points,
            bucket,
            child_aabb,
            max_points_per_node,
            min_node_box_dimension,
        );
    }
    nodes.push(OctreeNode {
        aabb,
        children: Some(children),
        point_indices: Vec::new(),
    });
    nodes.len() - 1
}

fn octant_aabb(aabb: &Aabb, centre: &Vec3f, octant: usize) -> Aabb {
    let pick = |bit: usize, low: Fp, mid: Fp, high: Fp| -> (Fp, Fp) {
        if octant & bit == 0 {
            (low, mid)
        } else {
            (mid, high)
        }
    };
    let (min_x, max_x) = pick(1, aabb.min.x, centre.x, aabb.max.x);
    let (min_y, max_y) = pick(2, aabb.min.y, centre.y, aabb.max.y);
    let (min_z, max_z) = pick(4, aabb.min.z, centre.z, aabb.max.z);
    Aabb::new(
        Vec3f::new(min_x, min_y, min_z),
        Vec3f::new(max_x, max_y, max_z),
    )
}
