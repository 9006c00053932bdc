use crate::error::{OperationError, Result};
use crate::math::{polygon_2d, Point3, TOLERANCE};

/// Resamples a closed polyline to an exact number of uniformly
/// arc-length-spaced points.
///
/// The loop's edges are walked in reverse traversal order, emitting a sample
/// every `perimeter / count` of accumulated length and interpolating within
/// the current edge. Output order therefore runs opposite to the input
/// order; callers must not assume they match.
#[derive(Debug)]
pub struct ResampleLoop {
    points: Vec<Point3>,
    count: usize,
}

impl ResampleLoop {
    /// Creates a new loop resampling operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, count: usize) -> Self {
        Self { points, count }
    }

    /// Executes the resampling, returning exactly `count` points.
    ///
    /// Consecutive (cyclic) output points are spaced `perimeter / count`
    /// apart along the loop, except possibly at the wrap-around seam.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if fewer than 3 points or a
    /// count below 3 is given, or if the loop's perimeter is near zero.
    pub fn execute(&self) -> Result<Vec<Point3>> {
        if self.points.len() < 3 {
            return Err(OperationError::InvalidInput(format!(
                "at least 3 points are required for loop resampling, got {}",
                self.points.len()
            ))
            .into());
        }
        if self.count < 3 {
            return Err(OperationError::InvalidInput(format!(
                "resample count must be at least 3, got {}",
                self.count
            ))
            .into());
        }

        let total = polygon_2d::perimeter(&self.points);
        if total < TOLERANCE {
            return Err(
                OperationError::InvalidInput("loop has near-zero perimeter".to_owned()).into(),
            );
        }

        #[allow(clippy::cast_precision_loss)]
        let step = total / self.count as f64;

        let mut out = Vec::with_capacity(self.count);
        let mut length_below = 0.0;
        let mut length_above = 0.0;
        let mut pos = 0.0;

        // Consume edges starting from the closing edge (last → first) and
        // walk backwards through the loop.
        for i in (0..self.points.len()).rev() {
            let start = self.points[i];
            let end = self.points[(i + 1) % self.points.len()];
            let edge_len = (end - start).norm();
            length_above += edge_len;

            while pos < length_above && out.len() < self.count {
                let t = (pos - length_below) / edge_len;
                out.push(polygon_2d::lerp_point(end, start, t));
                pos += step;
            }
            length_below = length_above;
        }

        // Floating-point stepping can leave the output one short of the
        // target when `pos` lands on the total length early; clamp the final
        // sample to the walk's end.
        while out.len() < self.count {
            out.push(self.points[0]);
        }

        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[allow(clippy::cast_precision_loss)]
    fn circle_loop(radius: f64, n: usize) -> Vec<Point3> {
        (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                Point3::new(radius * a.cos(), radius * a.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn exact_count_for_square() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        for count in [3, 4, 7, 40, 199] {
            let out = ResampleLoop::new(pts.clone(), count).execute().unwrap();
            assert_eq!(out.len(), count);
        }
    }

    #[test]
    fn uniform_spacing_except_seam() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        let count = 40;
        let out = ResampleLoop::new(pts.clone(), count).execute().unwrap();
        #[allow(clippy::cast_precision_loss)]
        let step = polygon_2d::perimeter(&pts) / count as f64;

        let mut off_by = 0;
        for i in 0..count {
            let d = (out[(i + 1) % count] - out[i]).norm();
            // Chord length can only fall below the arc step at corners, and
            // by a bounded amount; count gross outliers only at the seam.
            if (d - step).abs() > step * 0.5 {
                off_by += 1;
            }
        }
        assert!(off_by <= 1, "more than one irregular gap: {off_by}");
    }

    #[test]
    fn spacing_is_exact_on_circle() {
        let pts = circle_loop(100.0, 256);
        let count = 64;
        let out = ResampleLoop::new(pts.clone(), count).execute().unwrap();
        #[allow(clippy::cast_precision_loss)]
        let step = polygon_2d::perimeter(&pts) / count as f64;
        for i in 0..count {
            let d = (out[(i + 1) % count] - out[i]).norm();
            assert!(
                (d - step).abs() < step * 0.01,
                "gap {i}: {d} vs step {step}"
            );
        }
    }

    #[test]
    fn resample_is_idempotent_up_to_rotation() {
        let pts = circle_loop(50.0, 60);
        let out = ResampleLoop::new(pts.clone(), 60).execute().unwrap();
        assert_eq!(out.len(), 60);

        // Every output point must lie on the original polygon, within a
        // small tolerance: nearest input point at most half an edge away.
        let edge = (pts[1] - pts[0]).norm();
        for p in &out {
            let nearest = pts
                .iter()
                .map(|q| (q - p).norm())
                .fold(f64::INFINITY, f64::min);
            assert!(nearest <= edge * 0.5 + 1e-9, "point drifted: {nearest}");
        }
    }

    #[test]
    fn first_sample_is_first_input_point() {
        // The reverse walk starts on the closing edge at t = 0, which is the
        // first input point.
        let pts = circle_loop(10.0, 12);
        let out = ResampleLoop::new(pts.clone(), 12).execute().unwrap();
        assert!((out[0] - pts[0]).norm() < 1e-9);
    }

    #[test]
    fn rejects_too_few_points() {
        let pts = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(ResampleLoop::new(pts, 10).execute().is_err());
    }

    #[test]
    fn rejects_low_count() {
        let pts = circle_loop(1.0, 8);
        assert!(ResampleLoop::new(pts, 2).execute().is_err());
    }

    #[test]
    fn rejects_zero_perimeter() {
        let pts = vec![
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert!(ResampleLoop::new(pts, 10).execute().is_err());
    }
}
