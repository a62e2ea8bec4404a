use crate::foundation::core::{Point, Vec2};

/// Tolerance used when comparing derived geometry.
pub(crate) const EPSILON: f64 = 1e-9;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

pub(crate) fn points_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// Half-extent of the axis-aligned box around a rectangle of half-size
/// `half` rotated by `angle_deg`.
pub(crate) fn rotated_half_extent(half: Vec2, angle_deg: f64) -> Vec2 {
    if angle_deg == 0.0 {
        return half;
    }
    let rad = angle_deg.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    Vec2::new(half.x * cos + half.y * sin, half.x * sin + half.y * cos)
}

/// Rotate `p` around `pivot` by `angle_deg`.
pub(crate) fn rotate_point(p: Point, pivot: Point, angle_deg: f64) -> Point {
    if angle_deg == 0.0 {
        return p;
    }
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let d = p - pivot;
    pivot + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Componentwise min/max accumulator used for bounding boxes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Extent {
    pub(crate) min: Point,
    pub(crate) max: Point,
}

impl Extent {
    pub(crate) fn around(center: Point, half: Vec2) -> Self {
        let a = center - half;
        let b = center + half;
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub(crate) fn union(self, other: Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub(crate) fn size(self) -> Vec2 {
        self.max - self.min
    }

    pub(crate) fn midpoint(self) -> Point {
        self.min.midpoint(self.max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
