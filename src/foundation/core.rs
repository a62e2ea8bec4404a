pub use kurbo::{Affine, Point, Rect, Vec2};

/// Fractional origin of a node, each axis in `[-0.5, 0.5]`.
///
/// `-0.5` is the left/top edge, `0.0` the center and `0.5` the right/bottom
/// edge. A node's `left`/`top` name the position of this point in the parent
/// plane.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Origin {
    /// Horizontal origin offset.
    pub x: f64,
    /// Vertical origin offset.
    pub y: f64,
}

impl Origin {
    /// Left/top corner (the default).
    pub const TOP_LEFT: Self = Self { x: -0.5, y: -0.5 };
    /// Geometric center.
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };
    /// Right/bottom corner.
    pub const BOTTOM_RIGHT: Self = Self { x: 0.5, y: 0.5 };

    /// Build an origin, clamping each axis into `[-0.5, 0.5]`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-0.5, 0.5),
            y: y.clamp(-0.5, 0.5),
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

/// Straight-alpha RGBA8 color as authored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn premultiplied(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// CSS `rgba()` notation used by the SVG writer.
    pub fn to_css(self) -> String {
        let alpha = f64::from(self.a) / 255.0;
        format!("rgba({},{},{},{})", self.r, self.g, self.b, fmt_num(alpha))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

/// Format a number for textual output, trimming float noise.
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 1e6).round() / 1e6;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
