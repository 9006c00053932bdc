use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::spatial::Aabb;

use super::MedialCircle;

/// A placed implicit-surface element: one metaball-style primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobElement {
    /// Element center, relative to the layout origin, in world units.
    pub center: Point3,
    /// Element radius in world units.
    pub radius: f64,
}

/// The computed layout of a blob: element placements plus the surface
/// resolution the host should evaluate the implicit field at.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Elements in the same order as the input circles.
    pub elements: Vec<BlobElement>,
    /// Axis-aligned bounds of the element cloud, inflated by each
    /// element's radius.
    pub bounds: Aabb,
    /// Suggested implicit-surface resolution: the smaller in-plane bounds
    /// extent divided by the density setting.
    pub resolution: f64,
}

/// Converts medial circles from the sketch's working frame into
/// implicit-surface element placements.
///
/// Centers are re-expressed relative to `origin` (the cursor position in
/// the working frame) and scaled by `scale` (world units per working-frame
/// unit); radii scale the same way. The host consumes the result to place
/// primitives and pick an evaluation resolution; scene mutation itself
/// stays on the host side.
#[derive(Debug)]
pub struct BlobLayout {
    circles: Vec<MedialCircle>,
    origin: Point3,
    scale: f64,
    density: f64,
}

impl BlobLayout {
    /// Creates a new blob layout operation.
    #[must_use]
    pub fn new(circles: Vec<MedialCircle>, origin: Point3, scale: f64, density: f64) -> Self {
        Self {
            circles,
            origin,
            scale,
            density,
        }
    }

    /// Executes the layout.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for an empty circle list, a
    /// non-positive scale, or a non-positive density.
    pub fn execute(&self) -> Result<Blob> {
        if self.circles.is_empty() {
            return Err(
                OperationError::InvalidInput("no circles to lay out".to_owned()).into(),
            );
        }
        if self.scale <= TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "scale must be positive, got {}",
                self.scale
            ))
            .into());
        }
        if self.density <= TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "density must be positive, got {}",
                self.density
            ))
            .into());
        }

        let mut elements = Vec::with_capacity(self.circles.len());
        let mut bounds = Aabb::empty();

        for circle in &self.circles {
            let center = Point3::from((circle.center - self.origin) * self.scale);
            let radius = circle.radius * self.scale;
            let inflate = Vector3::new(radius, radius, radius);
            bounds.expand(&Aabb {
                min: center - inflate,
                max: center + inflate,
            });
            elements.push(BlobElement { center, radius });
        }

        let extent_x = bounds.max.x - bounds.min.x;
        let extent_y = bounds.max.y - bounds.min.y;
        let resolution = extent_x.min(extent_y) / self.density;

        Ok(Blob {
            elements,
            bounds,
            resolution,
        })
    }
}
