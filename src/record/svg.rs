//! SVG markup for nodes.

use std::fmt::Write as _;

use crate::{
    foundation::core::{Affine, Rgba8, fmt_num},
    foundation::error::SceneResult,
    scene::id::NodeId,
    scene::node::{Node, Shape},
    scene::tree::Scene,
};

fn matrix_attr(m: Affine) -> String {
    let c = m.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_num(c[0]),
        fmt_num(c[1]),
        fmt_num(c[2]),
        fmt_num(c[3]),
        fmt_num(c[4]),
        fmt_num(c[5])
    )
}

fn fill_attr(fill: Option<Rgba8>) -> String {
    fill.map_or_else(|| "none".to_string(), Rgba8::to_css)
}

fn visibility_attr(node: &Node) -> &'static str {
    if node.props.visible {
        ""
    } else {
        " visibility=\"hidden\""
    }
}

impl Scene {
    /// SVG markup of `id` in its parent plane.
    ///
    /// Groups emit a `<g>` wrapper carrying their own matrix, an optional
    /// background rect and their children's markup; export-excluded children
    /// are skipped.
    pub fn to_svg(&self, id: NodeId) -> SceneResult<String> {
        let mut out = String::new();
        self.write_svg(id, &mut out, 0)?;
        Ok(out)
    }

    fn write_svg(&self, id: NodeId, out: &mut String, depth: usize) -> SceneResult<()> {
        let node = self.get(id)?;
        let g = &node.geometry;
        let indent = "  ".repeat(depth);
        let transform = matrix_attr(g.own_matrix());
        let (hw, hh) = (g.width / 2.0, g.height / 2.0);

        match node.shape() {
            Some(Shape::Rect) => {
                let _ = writeln!(
                    out,
                    "{indent}<rect transform=\"{transform}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"{}/>",
                    fmt_num(-hw),
                    fmt_num(-hh),
                    fmt_num(g.width),
                    fmt_num(g.height),
                    fill_attr(node.props.fill),
                    visibility_attr(node),
                );
            }
            Some(Shape::Ellipse) => {
                let _ = writeln!(
                    out,
                    "{indent}<ellipse transform=\"{transform}\" cx=\"0\" cy=\"0\" rx=\"{}\" ry=\"{}\" fill=\"{}\"{}/>",
                    fmt_num(hw),
                    fmt_num(hh),
                    fill_attr(node.props.fill),
                    visibility_attr(node),
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "{indent}<g transform=\"{transform}\"{}>",
                    visibility_attr(node)
                );
                if let Some(bg) = node.props.background {
                    let _ = writeln!(
                        out,
                        "{indent}  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                        fmt_num(-hw),
                        fmt_num(-hh),
                        fmt_num(g.width),
                        fmt_num(g.height),
                        bg.to_css(),
                    );
                }
                for &child in node.objects() {
                    if self.get(child)?.props.exclude_from_export {
                        continue;
                    }
                    self.write_svg(child, out, depth + 1)?;
                }
                let _ = writeln!(out, "{indent}</g>");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/svg.rs"]
mod tests;
