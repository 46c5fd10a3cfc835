use cgmath::{Euler, Matrix4, Rad, Vector3};

use super::material::Material;
use crate::gfx::geometry::GeometryData;

/// Handle to a node inside a [`SceneGraph`](super::SceneGraph)
///
/// Node identity is the handle itself; two handles are the same node iff they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Cursor the host should show while hovering a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// The node can be grabbed
    Pointer,
}

/// Geometry plus material attached to a node
///
/// `revision` increases whenever the geometry is swapped, so GPU-side copies know when to
/// re-upload.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub geometry: GeometryData,
    pub material: Material,
    revision: u64,
}

impl Renderable {
    pub fn new(geometry: GeometryData, material: Material) -> Self {
        Self {
            geometry,
            material,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace_geometry(&mut self, geometry: GeometryData) {
        self.geometry = geometry;
        self.revision += 1;
    }
}

/// A node in the scene's transform hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub cursor: CursorHint,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) renderable: Option<Renderable>,
}

impl SceneNode {
    pub(crate) fn new(name: &str, renderable: Option<Renderable>) -> Self {
        Self {
            name: name.to_string(),
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            cursor: CursorHint::Default,
            parent: None,
            children: Vec::new(),
            renderable,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        self.renderable.as_ref()
    }

    pub fn has_geometry(&self) -> bool {
        self.renderable.is_some()
    }

    /// Translation * rotation * scale, relative to the parent
    pub fn local_matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from(Euler::new(
            Rad(self.rotation.x),
            Rad(self.rotation.y),
            Rad(self.rotation.z),
        ));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}
