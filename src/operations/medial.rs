use kiddo::{KdTree, SquaredEuclidean};

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::mesh::BoundaryMesh;
use crate::spatial::{Ray, TriangleBvh};

/// Default convergence precision for the per-vertex radius search.
pub const DEFAULT_PRECISION: f64 = 0.001;

/// A maximal inscribed circle approximating one sample of the medial axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedialCircle {
    /// Circle center, co-planar with the input loop.
    pub center: Point3,
    /// Inscribed radius. Zero for degenerate boundary vertices.
    pub radius: f64,
}

/// Approximates the medial axis of a closed loop: one maximal inscribed
/// circle per boundary vertex.
///
/// The loop is triangulated into a [`BoundaryMesh`]; each vertex then walks
/// its inward offset vector with an exponential-growth / contraction search,
/// probing "am I still inside?" by casting a ray through the mesh and
/// scoring candidates by nearest-neighbor distance to the loop points.
///
/// The nearest-neighbor score is a deliberate approximation of the true
/// distance-to-boundary; for the typical densely resampled loops it feeds
/// on, the two agree to within the sample spacing.
#[derive(Debug)]
pub struct MedialApprox {
    points: Vec<Point3>,
    precision: f64,
}

impl MedialApprox {
    /// Creates a new medial-axis approximation over a closed loop,
    /// with the default precision.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self {
            points,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Overrides the search precision. Smaller values converge tighter at
    /// the cost of more probe evaluations per vertex.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Executes the approximation, returning one circle per boundary vertex
    /// in loop order.
    ///
    /// Vertices whose search never finds a positive radius yield a
    /// zero-radius circle rather than an error; callers may filter these.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive precision,
    /// or a [`MeshError`](crate::error::MeshError) if the loop cannot be
    /// triangulated (fewer than 3 points, zero area).
    pub fn execute(&self) -> Result<Vec<MedialCircle>> {
        if self.precision <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "precision must be positive, got {}",
                self.precision
            ))
            .into());
        }

        let mesh = BoundaryMesh::from_loop(&self.points)?;
        let bvh = TriangleBvh::build(&mesh.vertices, &mesh.triangles);

        let mut kd: KdTree<f64, 2> = KdTree::new();
        #[allow(clippy::cast_possible_truncation)]
        for (i, p) in self.points.iter().enumerate() {
            kd.add(&[p.x, p.y], i as u64);
        }

        let normal = mesh.normal;

        // Probe: a point is inside while the ray from just above it, cast
        // back through the plane, still pierces the polygon's triangles.
        // Its score is the distance to the nearest loop point, 0 outside.
        let radius = |pt: Point3| -> f64 {
            let ray = Ray::new(pt + normal, -normal);
            if bvh.ray_cast(&ray).is_some() {
                let nearest = kd.nearest_one::<SquaredEuclidean>(&[pt.x, pt.y]);
                nearest.distance.sqrt()
            } else {
                0.0
            }
        };

        let mut circles = Vec::with_capacity(mesh.vertices.len());

        for (i, &mid) in mesh.vertices.iter().enumerate() {
            let evec = mesh.inward_vector(i);

            let mut size = self.precision;
            let mut last_size = size;
            let mut incr = 2.0_f64;
            let mut score = radius(mid + evec * size);

            // Growth phase doubles the step while the inscribed radius keeps
            // increasing; once it shrinks or the probe exits the shape,
            // `incr` decays toward 1, which is the loop's fixed point.
            let cap = 1.0 + self.precision;
            while incr > cap {
                let pt = mid + evec * size * incr;
                let candidate = radius(pt);
                if candidate > score {
                    score = candidate;
                    last_size = size;
                    size *= incr;
                } else {
                    incr = (incr + 1.0) / 2.0;
                    size = last_size;
                    score = radius(mid + evec * size);
                }
            }

            circles.push(MedialCircle {
                center: mid + evec * size,
                radius: score,
            });
        }

        Ok(circles)
    }
}
