use super::{Point3, Vector3, TOLERANCE};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the total perimeter of a closed polygon (cyclic edge lengths).
#[must_use]
pub fn perimeter(points: &[Point3]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    loop_segments(points).map(|(a, b)| (b - a).norm()).sum()
}

/// Returns the planar normal of a closed polygon in the XY plane,
/// derived from its winding: `+Z` for counter-clockwise, `-Z` for clockwise.
///
/// Returns `None` for degenerate polygons with near-zero area.
#[must_use]
pub fn winding_normal(points: &[Point3]) -> Option<Vector3> {
    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        return None;
    }
    Some(Vector3::new(0.0, 0.0, area.signum()))
}

/// Iterates the cyclic edges of a closed polygon as `(start, end)` pairs,
/// in loop order, including the wrap-around edge from the last point back
/// to the first.
pub fn loop_segments(points: &[Point3]) -> impl Iterator<Item = (Point3, Point3)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Linearly interpolates between two points: `a + (b - a) * t`.
#[must_use]
pub fn lerp_point(a: Point3, b: Point3, t: f64) -> Point3 {
    a + (b - a) * t
}
