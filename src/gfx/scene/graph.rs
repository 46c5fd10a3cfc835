use std::ops::{Index, IndexMut};

use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::{
    material::Material,
    node::{NodeId, Renderable, SceneNode},
};
use crate::gfx::geometry::GeometryData;

/// Arena-backed transform hierarchy
///
/// Nodes are never removed, so a [`NodeId`] handed out by a graph stays valid for the
/// graph's lifetime. Indexing with an id from another graph is a caller bug and panics.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("scene", None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Adds an empty grouping node under `parent`
    pub fn add_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.insert(parent, SceneNode::new(name, None))
    }

    /// Adds a renderable node under `parent`
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        geometry: GeometryData,
        material: Material,
    ) -> NodeId {
        self.insert(
            parent,
            SceneNode::new(name, Some(Renderable::new(geometry, material))),
        )
    }

    /// Creates a node that is not attached anywhere yet
    pub fn create_detached(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode::new(name, None));
        id
    }

    fn insert(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.attach(id, parent);
        id
    }

    /// Moves `child` under `parent`, detaching it from its previous parent first
    ///
    /// Attaching a node under itself or one of its descendants is ignored.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        if child == self.root || self.ancestors(parent).any(|id| id == child) {
            log::warn!(
                "Refusing to attach '{}' below itself",
                self.nodes[child.0].name
            );
            return;
        }

        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|&id| id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector3<f32>) {
        self[id].position = position;
    }

    /// Swaps the geometry of a renderable node; returns false for group nodes
    pub fn replace_geometry(&mut self, id: NodeId, geometry: GeometryData) -> bool {
        match self[id].renderable.as_mut() {
            Some(renderable) => {
                renderable.replace_geometry(geometry);
                true
            }
            None => false,
        }
    }

    /// Walks from `id` (inclusive) up through its parents to the root (inclusive)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// Depth-first pre-order walk over `id` and everything below it
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// True when the node is reachable from the root through parent links
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|ancestor| ancestor == self.root)
    }

    /// Composes local matrices from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        self.ancestors(id)
            .fold(Matrix4::identity(), |acc, ancestor| {
                self.nodes[ancestor.0].local_matrix() * acc
            })
    }

    /// World position of the node's origin
    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        self.world_matrix(id).w.truncate()
    }

    /// Finds the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// Every node carrying geometry that is attached to the root, with its world matrix
    pub fn renderables(&self) -> Vec<(NodeId, Matrix4<f32>)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Matrix4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_world * node.local_matrix();
            if node.renderable.is_some() {
                out.push((id, world));
            }
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for SceneGraph {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for SceneGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }
}

/// Iterator returned by [`SceneGraph::ancestors`]
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.get(current).and_then(|node| node.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;
    use crate::gfx::geometry::generate_box;

    fn sample_graph() -> (SceneGraph, NodeId, NodeId) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let group = scene.add_group(root, "sofa");
        let seat = scene.add_mesh(group, "seat", generate_box(1.0, 1.0, 1.0), Material::default());
        (scene, group, seat)
    }

    #[test]
    fn test_parent_child_links() {
        let (scene, group, seat) = sample_graph();
        assert_eq!(scene[seat].parent(), Some(group));
        assert_eq!(scene[group].children(), &[seat]);
        assert_eq!(scene[group].parent(), Some(scene.root()));
    }

    #[test]
    fn test_ancestors_inclusive_to_root() {
        let (scene, group, seat) = sample_graph();
        let chain: Vec<_> = scene.ancestors(seat).collect();
        assert_eq!(chain, vec![seat, group, scene.root()]);
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut scene, group, seat) = sample_graph();
        let back = scene.add_mesh(group, "back", generate_box(1.0, 1.0, 1.0), Material::default());
        assert_eq!(scene.descendants(group), vec![group, seat, back]);
    }

    #[test]
    fn test_reattach_moves_child() {
        let (mut scene, group, seat) = sample_graph();
        let other = scene.add_group(scene.root(), "other");
        scene.attach(seat, other);
        assert!(scene[group].children().is_empty());
        assert_eq!(scene[seat].parent(), Some(other));
    }

    #[test]
    fn test_attach_cycle_is_ignored() {
        let (mut scene, group, seat) = sample_graph();
        scene.attach(group, seat);
        assert_eq!(scene[group].parent(), Some(scene.root()));
    }

    #[test]
    fn test_detached_node() {
        let (mut scene, _, _) = sample_graph();
        let loose = scene.create_detached("loose");
        assert!(!scene.is_attached(loose));
        scene.attach(loose, scene.root());
        assert!(scene.is_attached(loose));
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let (mut scene, group, seat) = sample_graph();
        scene.set_position(group, Vector3::new(4.0, 0.25, 2.0));
        scene[group].rotation.y = std::f32::consts::FRAC_PI_2;
        scene.set_position(seat, Vector3::new(0.0, 0.0, -0.3));

        // Rotating +90 degrees about y maps local -z onto world -x
        let world = scene.world_position(seat);
        assert!((world - Vector3::new(3.7, 0.25, 2.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_replace_geometry_bumps_revision() {
        let (mut scene, group, seat) = sample_graph();
        assert!(!scene.replace_geometry(group, generate_box(1.0, 1.0, 1.0)));
        assert!(scene.replace_geometry(seat, generate_box(2.0, 1.0, 1.0)));
        assert_eq!(scene[seat].renderable().map(|r| r.revision()), Some(1));
    }

    #[test]
    fn test_renderables_only_attached_meshes() {
        let (mut scene, _, seat) = sample_graph();
        let loose = scene.create_detached("loose");
        let orphan = scene.add_mesh(loose, "orphan", generate_box(1.0, 1.0, 1.0), Material::default());

        let ids: Vec<_> = scene.renderables().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![seat]);
        assert!(!ids.contains(&orphan));
    }
}
