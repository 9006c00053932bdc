mod bvh;
mod ray;

pub use bvh::{Aabb, RayHit, TriangleBvh};
pub use ray::Ray;
