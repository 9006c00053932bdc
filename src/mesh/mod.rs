use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::FixedFaceHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{MeshError, Result};
use crate::math::{polygon_2d, Point3, Vector3};

/// A closed flat polygon triangulated into faces, with its shared planar
/// normal. Vertices are the boundary loop's points in loop order; triangles
/// index into them.
///
/// Built once per medial-approximation call and discarded after use.
#[derive(Debug, Clone)]
pub struct BoundaryMesh {
    /// Boundary vertices in loop order.
    pub vertices: Vec<Point3>,
    /// The polygon's planar normal, shared by all faces (winding-derived).
    pub normal: Vector3,
    /// Interior triangles as index triples into `vertices`.
    pub triangles: Vec<[u32; 3]>,
}

impl BoundaryMesh {
    /// Triangulates a closed loop of coplanar XY points into a boundary mesh.
    ///
    /// The loop points become the mesh vertices in order; no interior
    /// vertices are inserted. Triangulation is a constrained Delaunay
    /// triangulation with the loop edges as constraints; triangles outside
    /// the polygon (in the convex hull but not the shape) are discarded by
    /// odd-depth flood fill over constraint crossings.
    ///
    /// # Errors
    ///
    /// - [`MeshError::InvalidLoop`] for fewer than 3 points or a loop with
    ///   near-zero area (no winding normal).
    /// - [`MeshError::TriangulationFailed`] if CDT insertion fails.
    /// - [`MeshError::EmptyInterior`] if no interior triangle survives.
    pub fn from_loop(points: &[Point3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(MeshError::InvalidLoop(format!(
                "boundary loop needs at least 3 points, got {}",
                points.len()
            ))
            .into());
        }

        let normal = polygon_2d::winding_normal(points).ok_or_else(|| {
            MeshError::InvalidLoop("boundary loop has near-zero area".to_owned())
        })?;

        let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
        let mut handles = Vec::with_capacity(points.len());
        for p in points {
            let h = cdt.insert(SpadePoint2::new(p.x, p.y)).map_err(
                |e: InsertionError| MeshError::TriangulationFailed(format!("CDT insert: {e}")),
            )?;
            handles.push(h);
        }

        // Map CDT vertex handles back to loop indices. Coincident input
        // points collapse to one handle; the first loop index wins.
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();
        #[allow(clippy::cast_possible_truncation)]
        for (i, h) in handles.iter().enumerate() {
            vertex_map.entry(h.index()).or_insert(i as u32);
        }

        for i in 0..handles.len() {
            let from = handles[i];
            let to = handles[(i + 1) % handles.len()];
            if from != to {
                cdt.add_constraint(from, to);
            }
        }

        let interior = classify_interior_faces(&cdt);

        let mut triangles = Vec::with_capacity(cdt.num_inner_faces());
        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let verts = face.vertices();
            let mut tri = [0_u32; 3];
            for (slot, vh) in tri.iter_mut().zip(verts.iter()) {
                *slot = *vertex_map.get(&vh.fix().index()).ok_or_else(|| {
                    MeshError::TriangulationFailed(
                        "CDT produced a vertex outside the input loop".to_owned(),
                    )
                })?;
            }
            triangles.push(tri);
        }

        if triangles.is_empty() {
            return Err(MeshError::EmptyInterior.into());
        }

        Ok(Self {
            vertices: points.to_vec(),
            normal,
            triangles,
        })
    }

    /// Returns the inward offset vector at boundary vertex `i`: the sum over
    /// the two loop edges touching the vertex of
    /// `(edge_start - edge_end) × normal`.
    ///
    /// The result lies in the polygon's plane, points into its interior for
    /// either winding, and is deliberately unnormalized; its magnitude
    /// reflects the local edge lengths.
    #[must_use]
    pub fn inward_vector(&self, i: usize) -> Vector3 {
        let n = self.vertices.len();
        let prev = self.vertices[(i + n - 1) % n];
        let curr = self.vertices[i];
        let next = self.vertices[(i + 1) % n];

        // Edge (prev → curr) and edge (curr → next), each as start − end.
        (prev - curr).cross(&self.normal) + (curr - next).cross(&self.normal)
    }
}

/// Classifies which inner faces of the CDT are inside the polygon using
/// flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each
/// time a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(
    cdt: &ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    // Seed: find inner faces adjacent to the outer face via directed edges
    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            let rev_face = edge.rev().face();
            if let Some(inner) = rev_face.as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    // BFS flood-fill
    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let neighbor = edge.rev().face();
            if let Some(inner_neighbor) = neighbor.as_inner() {
                let n_idx = inner_neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((inner_neighbor.fix(), new_depth));
            }
        }
    }

    interior
}
