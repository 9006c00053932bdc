use crate::math::Point3;

/// Smooths an open polyline by replacing each interior point with the
/// midpoint of its two neighbors. Endpoints are preserved.
///
/// Interactive sketch tools apply this repeatedly to the tail of an
/// in-progress stroke to damp input jitter before the loop is closed and
/// resampled.
#[derive(Debug)]
pub struct SmoothPolyline {
    points: Vec<Point3>,
}

impl SmoothPolyline {
    /// Creates a new polyline smoothing operation.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Executes the smoothing pass.
    ///
    /// Inputs with fewer than 3 points have no interior and are returned
    /// unchanged.
    #[must_use]
    pub fn execute(&self) -> Vec<Point3> {
        let n = self.points.len();
        if n < 3 {
            return self.points.clone();
        }

        let mut out = Vec::with_capacity(n);
        out.push(self.points[0]);
        for i in 1..n - 1 {
            let mid = nalgebra::center(&self.points[i - 1], &self.points[i + 1]);
            out.push(mid);
        }
        out.push(self.points[n - 1]);
        out
    }
}
