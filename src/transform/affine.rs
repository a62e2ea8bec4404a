//! Affine transform helpers.
//!
//! Matrices follow the `kurbo` coefficient order `[a, b, c, d, e, f]`, mapping
//! `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`. Angles are in degrees.

use crate::foundation::core::{Affine, Point, Vec2};

/// Transform parts that compose into a node matrix.
///
/// Composition order is `T(translate) · R(angle) · S(scale, flip) · Kx · Ky`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParts {
    /// Translation (the node center in its parent plane).
    pub translate: Vec2,
    /// Rotation in degrees.
    pub angle_deg: f64,
    /// Scale factors, flips excluded.
    pub scale: Vec2,
    /// Horizontal skew in degrees.
    pub skew_x_deg: f64,
    /// Vertical skew in degrees.
    pub skew_y_deg: f64,
    /// Mirror along the x axis.
    pub flip_x: bool,
    /// Mirror along the y axis.
    pub flip_y: bool,
}

impl Default for TransformParts {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            angle_deg: 0.0,
            scale: Vec2::new(1.0, 1.0),
            skew_x_deg: 0.0,
            skew_y_deg: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

#[inline]
pub fn skew_x_matrix(deg: f64) -> Affine {
    Affine::new([1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0])
}

#[inline]
pub fn skew_y_matrix(deg: f64) -> Affine {
    Affine::new([1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0])
}

/// Scale, flip and skew part of a node matrix (no rotation, no translation).
pub fn dimensions_matrix(parts: &TransformParts) -> Affine {
    let sx = if parts.flip_x {
        -parts.scale.x
    } else {
        parts.scale.x
    };
    let sy = if parts.flip_y {
        -parts.scale.y
    } else {
        parts.scale.y
    };
    let mut m = Affine::scale_non_uniform(sx, sy);
    if parts.skew_x_deg != 0.0 {
        m = m * skew_x_matrix(parts.skew_x_deg);
    }
    if parts.skew_y_deg != 0.0 {
        m = m * skew_y_matrix(parts.skew_y_deg);
    }
    m
}

pub fn compose(parts: &TransformParts) -> Affine {
    let mut m = Affine::translate(parts.translate);
    if parts.angle_deg != 0.0 {
        m = m * Affine::rotate(parts.angle_deg.to_radians());
    }
    m * dimensions_matrix(parts)
}

/// QR-style decomposition of `m` into translate, angle, scale and horizontal skew.
///
/// The result never carries flips or vertical skew; a mirrored matrix shows up
/// as a negative `scale.y`. `compose(&decompose(m))` reproduces `m`.
pub fn decompose(m: Affine) -> TransformParts {
    let [a, b, c, d, e, f] = m.as_coeffs();
    let denom = a * a + b * b;
    if denom == 0.0 {
        return TransformParts {
            translate: Vec2::new(e, f),
            scale: Vec2::new(0.0, c.hypot(d)),
            ..TransformParts::default()
        };
    }
    let scale_x = denom.sqrt();
    TransformParts {
        translate: Vec2::new(e, f),
        angle_deg: b.atan2(a).to_degrees(),
        scale: Vec2::new(scale_x, (a * d - c * b) / scale_x),
        skew_x_deg: (a * c + b * d).atan2(denom).to_degrees(),
        skew_y_deg: 0.0,
        flip_x: false,
        flip_y: false,
    }
}

/// Apply only the linear part of `m` to `v`.
#[inline]
pub fn transform_vector(m: Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = m.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}

#[inline]
pub fn transform_point(m: Affine, p: Point) -> Point {
    m * p
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
