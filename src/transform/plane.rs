//! Coordinate-plane changes.
//!
//! A plane is described by the matrix that maps it into the canvas plane
//! (for a group: its total matrix). Moving between planes is a change of basis
//! through the canvas plane.

use crate::foundation::core::{Affine, Point, Vec2};
use crate::transform::affine::transform_vector;

/// Matrix mapping coordinates expressed in plane `from` into plane `to`.
#[inline]
pub fn plane_change_matrix(from: Affine, to: Affine) -> Affine {
    to.inverse() * from
}

pub fn send_point_to_plane(p: Point, from: Affine, to: Affine) -> Point {
    plane_change_matrix(from, to) * p
}

pub fn send_vector_to_plane(v: Vec2, from: Affine, to: Affine) -> Vec2 {
    transform_vector(plane_change_matrix(from, to), v)
}

/// Re-express a node's own matrix, currently relative to plane `from`, relative
/// to plane `to` so the node keeps its absolute appearance.
pub fn send_matrix_to_plane(own: Affine, from: Affine, to: Affine) -> Affine {
    plane_change_matrix(from, to) * own
}

#[cfg(test)]
#[path = "../../tests/unit/transform/plane.rs"]
mod tests;
