use crate::math::Point3;

use super::Ray;

/// Below this triangle count a node stays a leaf.
const LEAF_SIZE: usize = 4;

/// Barycentric margin so probes landing exactly on shared triangle edges
/// still register as hits.
const EDGE_EPSILON: f64 = 1e-9;

/// Minimum determinant for a ray/triangle pair to count as non-parallel.
const DET_EPSILON: f64 = 1e-14;

/// Axis-aligned bounding box for BVH nodes.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Creates an empty (inverted) bounding box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Creates a bounding box enclosing a triangle.
    #[must_use]
    pub fn from_triangle(v0: &Point3, v1: &Point3, v2: &Point3) -> Self {
        Self {
            min: Point3::new(
                v0.x.min(v1.x).min(v2.x),
                v0.y.min(v1.y).min(v2.y),
                v0.z.min(v1.z).min(v2.z),
            ),
            max: Point3::new(
                v0.x.max(v1.x).max(v2.x),
                v0.y.max(v1.y).max(v2.y),
                v0.z.max(v1.z).max(v2.z),
            ),
        }
    }

    /// Expands this bounding box to include another.
    pub fn expand(&mut self, other: &Self) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Returns the center of this bounding box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Returns the index of the longest axis (0 = X, 1 = Y, 2 = Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;

        if dx >= dy && dx >= dz {
            0
        } else if dy >= dz {
            1
        } else {
            2
        }
    }

    /// Slab test: does the ray intersect this box anywhere at `t >= 0`?
    ///
    /// Zero direction components are handled through the `1/0 = inf`
    /// convention of IEEE division.
    #[must_use]
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let inv_dir = 1.0 / ray.direction[axis];
            let mut t0 = (self.min[axis] - origin) * inv_dir;
            let mut t1 = (self.max[axis] - origin) * inv_dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN from 0 * inf means the origin sits on a slab plane of a
            // flat box; treat the axis as unconstrained.
            if !t0.is_nan() {
                t_min = t_min.max(t0);
            }
            if !t1.is_nan() {
                t_max = t_max.min(t1);
            }
            if t_min > t_max {
                return false;
            }
        }

        true
    }
}

/// Result of a successful ray cast against a [`TriangleBvh`].
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Ray parameter at the intersection point.
    pub t: f64,
    /// Index of the intersected triangle.
    pub triangle: usize,
}

#[derive(Debug)]
struct BvhNode {
    aabb: Aabb,
    /// Index of the right child; the left child always directly follows its
    /// parent in `nodes`. Unused for leaves.
    right: u32,
    /// Start of this leaf's range in `order`. Unused for internal nodes.
    start: u32,
    /// Number of triangles in this leaf; 0 marks an internal node.
    count: u32,
}

/// Bounding volume hierarchy over a triangle set, supporting ray casts.
///
/// Built once per medial-approximation call over the boundary mesh; the
/// triangle data is copied in so the structure is self-contained and
/// read-only after construction.
#[derive(Debug)]
pub struct TriangleBvh {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
    nodes: Vec<BvhNode>,
    order: Vec<u32>,
}

impl TriangleBvh {
    /// Builds a BVH over the given indexed triangle set using median splits
    /// along the longest centroid axis.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(vertices: &[Point3], triangles: &[[u32; 3]]) -> Self {
        let mut bvh = Self {
            vertices: vertices.to_vec(),
            triangles: triangles.to_vec(),
            nodes: Vec::new(),
            order: (0..triangles.len() as u32).collect(),
        };

        if triangles.is_empty() {
            return bvh;
        }

        let aabbs: Vec<Aabb> = triangles
            .iter()
            .map(|tri| {
                Aabb::from_triangle(
                    &vertices[tri[0] as usize],
                    &vertices[tri[1] as usize],
                    &vertices[tri[2] as usize],
                )
            })
            .collect();

        let mut order = std::mem::take(&mut bvh.order);
        bvh.build_node(&aabbs, &mut order, 0, triangles.len());
        bvh.order = order;
        bvh
    }

    /// Casts a ray against the triangle set, returning the nearest hit.
    ///
    /// Returns `None` when the ray misses every triangle.
    #[must_use]
    pub fn ray_cast(&self, ray: &Ray) -> Option<RayHit> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<RayHit> = None;
        let mut stack = vec![0_usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.aabb.intersects_ray(ray) {
                continue;
            }

            if node.count > 0 {
                let start = node.start as usize;
                let end = start + node.count as usize;
                for &tri_idx in &self.order[start..end] {
                    let tri = self.triangles[tri_idx as usize];
                    if let Some(t) = self.intersect_triangle(ray, tri) {
                        if best.is_none_or(|h| t < h.t) {
                            best = Some(RayHit {
                                t,
                                triangle: tri_idx as usize,
                            });
                        }
                    }
                }
            } else {
                stack.push(node_idx + 1);
                stack.push(node.right as usize);
            }
        }

        best
    }

    /// Recursively builds the node at the current end of `nodes` covering
    /// `order[start..start + count]`, returning its index.
    #[allow(clippy::cast_possible_truncation)]
    fn build_node(&mut self, aabbs: &[Aabb], order: &mut [u32], start: usize, count: usize) -> u32 {
        let mut aabb = Aabb::empty();
        for &tri_idx in &order[start..start + count] {
            aabb.expand(&aabbs[tri_idx as usize]);
        }

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            aabb,
            right: 0,
            start: start as u32,
            count: count as u32,
        });

        if count <= LEAF_SIZE {
            return node_idx;
        }

        let axis = aabb.longest_axis();
        let range = &mut order[start..start + count];
        range.sort_unstable_by(|&a, &b| {
            let ca = aabbs[a as usize].center()[axis];
            let cb = aabbs[b as usize].center()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let half = count / 2;
        self.build_node(aabbs, order, start, half);
        let right = self.build_node(aabbs, order, start + half, count - half);

        let node = &mut self.nodes[node_idx as usize];
        node.right = right;
        node.count = 0;
        node_idx
    }

    /// Möller–Trumbore ray/triangle intersection with an edge-tolerant
    /// barycentric margin. Returns the ray parameter on hit.
    fn intersect_triangle(&self, ray: &Ray, tri: [u32; 3]) -> Option<f64> {
        let v0 = self.vertices[tri[0] as usize];
        let v1 = self.vertices[tri[1] as usize];
        let v2 = self.vertices[tri[2] as usize];

        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let p = ray.direction.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() < DET_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - v0;
        let u = s.dot(&p) * inv_det;
        if !(-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&u) {
            return None;
        }

        let q = s.cross(&e1);
        let v = ray.direction.dot(&q) * inv_det;
        if v < -EDGE_EPSILON || u + v > 1.0 + EDGE_EPSILON {
            return None;
        }

        let t = e2.dot(&q) * inv_det;
        (t > 0.0).then_some(t)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Vector3, TOLERANCE};

    fn unit_square() -> (Vec<Point3>, Vec<[u32; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3]];
        (vertices, triangles)
    }

    fn down_ray(x: f64, y: f64) -> Ray {
        Ray::new(Point3::new(x, y, 1.0), Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn ray_hits_square_interior() {
        let (vertices, triangles) = unit_square();
        let bvh = TriangleBvh::build(&vertices, &triangles);
        let hit = bvh.ray_cast(&down_ray(0.25, 0.25)).unwrap();
        assert!((hit.t - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn ray_hits_shared_diagonal_edge() {
        let (vertices, triangles) = unit_square();
        let bvh = TriangleBvh::build(&vertices, &triangles);
        // Point on the diagonal shared by both triangles.
        assert!(bvh.ray_cast(&down_ray(0.5, 0.5)).is_some());
    }

    #[test]
    fn ray_misses_outside_square() {
        let (vertices, triangles) = unit_square();
        let bvh = TriangleBvh::build(&vertices, &triangles);
        assert!(bvh.ray_cast(&down_ray(1.5, 0.5)).is_none());
        assert!(bvh.ray_cast(&down_ray(-0.1, -0.1)).is_none());
    }

    #[test]
    fn ray_behind_surface_misses() {
        let (vertices, triangles) = unit_square();
        let bvh = TriangleBvh::build(&vertices, &triangles);
        // Cast away from the plane.
        let ray = Ray::new(Point3::new(0.5, 0.5, 1.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(bvh.ray_cast(&ray).is_none());
    }

    #[test]
    fn empty_bvh_never_hits() {
        let bvh = TriangleBvh::build(&[], &[]);
        assert!(bvh.ray_cast(&down_ray(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_hit_wins_with_stacked_triangles() {
        // Two parallel triangles at z = 0 and z = 0.5.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(0.0, 1.0, 0.5),
        ];
        let triangles = vec![[0, 1, 2], [3, 4, 5]];
        let bvh = TriangleBvh::build(&vertices, &triangles);
        let hit = bvh.ray_cast(&down_ray(0.2, 0.2)).unwrap();
        assert!((hit.t - 0.5).abs() < TOLERANCE);
        assert_eq!(hit.triangle, 1);
    }

    #[test]
    fn many_triangles_split_into_internal_nodes() {
        // A strip of triangles along X, enough to force splits.
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..32_u32 {
            let x = f64::from(i);
            let base = vertices.len() as u32;
            vertices.push(Point3::new(x, 0.0, 0.0));
            vertices.push(Point3::new(x + 1.0, 0.0, 0.0));
            vertices.push(Point3::new(x + 0.5, 1.0, 0.0));
            triangles.push([base, base + 1, base + 2]);
        }
        let bvh = TriangleBvh::build(&vertices, &triangles);
        for i in 0..32 {
            let x = f64::from(i) + 0.5;
            let hit = bvh.ray_cast(&down_ray(x, 0.3));
            assert!(hit.is_some(), "missed strip triangle at x={x}");
        }
        assert!(bvh.ray_cast(&down_ray(-1.0, 0.3)).is_none());
    }
}
