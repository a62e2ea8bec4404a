//! Plain serializable records of nodes and whole canvases.

use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::{Origin, Rgba8},
    foundation::error::{SceneError, SceneResult},
    group::{GroupOptions, LayoutMode},
    scene::id::NodeId,
    scene::node::{Geometry, NodeProps, Shape},
    scene::tree::Scene,
};

/// Fields shared by every node record. `None` fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BaseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skew_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skew_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgba8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_caching: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stateful_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_from_export: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_default_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_positioned: Option<bool>,
}

/// `Some(value)` unless defaults are omitted and `value` is the default.
fn field<T: PartialEq>(include_defaults: bool, value: T, default: T) -> Option<T> {
    (include_defaults || value != default).then_some(value)
}

impl BaseRecord {
    fn capture(geometry: &Geometry, props: &NodeProps, include_defaults: bool) -> Self {
        let g = Geometry::default();
        let p = NodeProps::default();
        let inc = include_defaults;
        Self {
            left: field(inc, geometry.left, g.left),
            top: field(inc, geometry.top, g.top),
            width: field(inc, geometry.width, g.width),
            height: field(inc, geometry.height, g.height),
            scale_x: field(inc, geometry.scale_x, g.scale_x),
            scale_y: field(inc, geometry.scale_y, g.scale_y),
            angle: field(inc, geometry.angle, g.angle),
            skew_x: field(inc, geometry.skew_x, g.skew_x),
            skew_y: field(inc, geometry.skew_y, g.skew_y),
            flip_x: field(inc, geometry.flip_x, g.flip_x),
            flip_y: field(inc, geometry.flip_y, g.flip_y),
            origin: field(inc, geometry.origin, g.origin),
            fill: props.fill,
            background: props.background,
            shadow: field(inc, props.shadow, p.shadow),
            visible: field(inc, props.visible, p.visible),
            object_caching: field(inc, props.object_caching, p.object_caching),
            stateful_cache: field(inc, props.stateful_cache, p.stateful_cache),
            exclude_from_export: field(inc, props.exclude_from_export, p.exclude_from_export),
            include_default_values: field(
                inc,
                props.include_default_values,
                p.include_default_values,
            ),
            absolute_positioned: field(inc, props.absolute_positioned, p.absolute_positioned),
        }
    }

    pub fn geometry(&self) -> Geometry {
        let d = Geometry::default();
        Geometry {
            left: self.left.unwrap_or(d.left),
            top: self.top.unwrap_or(d.top),
            width: self.width.unwrap_or(d.width),
            height: self.height.unwrap_or(d.height),
            scale_x: self.scale_x.unwrap_or(d.scale_x),
            scale_y: self.scale_y.unwrap_or(d.scale_y),
            angle: self.angle.unwrap_or(d.angle),
            skew_x: self.skew_x.unwrap_or(d.skew_x),
            skew_y: self.skew_y.unwrap_or(d.skew_y),
            flip_x: self.flip_x.unwrap_or(d.flip_x),
            flip_y: self.flip_y.unwrap_or(d.flip_y),
            origin: self.origin.map_or(d.origin, |o| Origin::new(o.x, o.y)),
        }
    }

    pub fn props(&self) -> NodeProps {
        let d = NodeProps::default();
        NodeProps {
            fill: self.fill,
            background: self.background,
            shadow: self.shadow.unwrap_or(d.shadow),
            visible: self.visible.unwrap_or(d.visible),
            object_caching: self.object_caching.unwrap_or(d.object_caching),
            stateful_cache: self.stateful_cache.unwrap_or(d.stateful_cache),
            exclude_from_export: self.exclude_from_export.unwrap_or(d.exclude_from_export),
            include_default_values: self
                .include_default_values
                .unwrap_or(d.include_default_values),
            absolute_positioned: self.absolute_positioned.unwrap_or(d.absolute_positioned),
        }
    }
}

/// Group record: base fields plus layout settings and ordered children.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupRecord {
    #[serde(flatten)]
    pub base: BaseRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_target_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    #[serde(default)]
    pub objects: Vec<NodeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<Box<NodeRecord>>,
}

/// Serialized node, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeRecord {
    Rect(BaseRecord),
    Ellipse(BaseRecord),
    Group(GroupRecord),
}

impl NodeRecord {
    pub fn base(&self) -> &BaseRecord {
        match self {
            Self::Rect(b) | Self::Ellipse(b) => b,
            Self::Group(g) => &g.base,
        }
    }
}

/// JSON document describing the root objects of a canvas.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub objects: Vec<NodeRecord>,
}

impl SceneDocument {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        serde_json::from_reader(r).map_err(|e| SceneError::serde(format!("parse scene JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> SceneResult<Self> {
        serde_json::from_str(s).map_err(|e| SceneError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SceneError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> SceneResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::serde(format!("write scene JSON: {e}")))
    }
}

impl Scene {
    /// Serialize a node using its own `include_default_values` setting.
    pub fn to_object(&self, id: NodeId) -> SceneResult<NodeRecord> {
        let include = self.get(id)?.props.include_default_values;
        self.to_object_with(id, include)
    }

    /// Serialize a node; group children inherit the group's
    /// `include_default_values` for their own record.
    fn to_object_with(&self, id: NodeId, include_defaults: bool) -> SceneResult<NodeRecord> {
        let node = self.get(id)?;
        let base = BaseRecord::capture(&node.geometry, &node.props, include_defaults);
        let Some(data) = node.group_data() else {
            return Ok(match node.shape() {
                Some(Shape::Ellipse) => NodeRecord::Ellipse(base),
                _ => NodeRecord::Rect(base),
            });
        };

        let mut objects = Vec::with_capacity(data.objects.len());
        for &child in &data.objects {
            if self.get(child)?.props.exclude_from_export {
                continue;
            }
            objects.push(self.to_object_with(child, include_defaults)?);
        }
        let clip_path = match node.clip_path {
            Some(clip) => Some(Box::new(self.to_object_with(clip, include_defaults)?)),
            None => None,
        };
        Ok(NodeRecord::Group(GroupRecord {
            base,
            layout: field(include_defaults, data.layout, LayoutMode::default()),
            sub_target_check: field(include_defaults, data.sub_target_check, false),
            interactive: field(include_defaults, data.interactive, false),
            objects,
            clip_path,
        }))
    }

    /// Build live nodes from a record. Group children keep their
    /// group-relative geometry; group box fields missing from the record are
    /// measured from the children.
    pub fn from_record(&mut self, record: &NodeRecord) -> SceneResult<NodeId> {
        match record {
            NodeRecord::Rect(base) => {
                Ok(self.create_shape(Shape::Rect, base.geometry(), base.props()))
            }
            NodeRecord::Ellipse(base) => {
                Ok(self.create_shape(Shape::Ellipse, base.geometry(), base.props()))
            }
            NodeRecord::Group(group) => {
                let objects = group
                    .objects
                    .iter()
                    .map(|child| self.from_record(child))
                    .collect::<SceneResult<Vec<_>>>()?;
                let clip_path = match &group.clip_path {
                    Some(clip) => Some(self.from_record(clip)?),
                    None => None,
                };
                let base = &group.base;
                let g = base.geometry();
                let options = GroupOptions {
                    left: base.left,
                    top: base.top,
                    width: base.width,
                    height: base.height,
                    angle: base.angle,
                    skew_x: base.skew_x,
                    skew_y: base.skew_y,
                    scale_x: base.scale_x,
                    scale_y: base.scale_y,
                    flip_x: g.flip_x,
                    flip_y: g.flip_y,
                    origin: g.origin,
                    layout: group.layout.unwrap_or_default(),
                    sub_target_check: group.sub_target_check.unwrap_or(false),
                    interactive: group.interactive.unwrap_or(false),
                    props: group.base.props(),
                    clip_path,
                };
                self.create_group(&objects, options, true)
            }
        }
    }

    /// Enliven every record of `doc` and append the results to the canvas.
    pub fn load_document(&mut self, doc: &SceneDocument) -> SceneResult<Vec<NodeId>> {
        let ids = doc
            .objects
            .iter()
            .map(|record| self.from_record(record))
            .collect::<SceneResult<Vec<_>>>()?;
        self.add_to_canvas(&ids);
        Ok(ids)
    }

    /// Records of the canvas root objects, export-excluded ones skipped.
    pub fn to_document(&self) -> SceneResult<SceneDocument> {
        let mut objects = Vec::with_capacity(self.canvas.objects.len());
        for &id in &self.canvas.objects {
            if self.get(id)?.props.exclude_from_export {
                continue;
            }
            objects.push(self.to_object(id)?);
        }
        Ok(SceneDocument { objects })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/object.rs"]
mod tests;
