//! Set of scene nodes the user may reposition

use std::collections::HashSet;

use crate::gfx::scene::{CursorHint, NodeId, SceneGraph};

/// Marks top-level furniture nodes as movable
///
/// The registry only references nodes; it never owns or removes them. Membership is by
/// node identity, so marking a group makes the group movable, not its children.
#[derive(Debug, Default, Clone)]
pub struct DraggableRegistry {
    members: HashSet<NodeId>,
}

impl DraggableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` as draggable and flags every mesh below it with a pointer cursor
    ///
    /// Marking the same node again changes nothing. The node is expected to already be
    /// attached to the scene; a detached node is still registered but can never be hit.
    pub fn mark_draggable(&mut self, scene: &mut SceneGraph, node: NodeId) {
        if !scene.is_attached(node) {
            log::debug!(
                "Marking detached node '{}' as draggable",
                scene[node].name
            );
        }

        if self.members.insert(node) {
            log::debug!("Registered '{}' as draggable", scene[node].name);
        }

        for id in scene.descendants(node) {
            let child = &mut scene[id];
            if child.has_geometry() {
                child.cursor = CursorHint::Pointer;
            }
        }
    }

    pub fn is_draggable(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// First draggable node on the way from `hit` (inclusive) up to the scene root
    ///
    /// The root itself is never a drag target.
    pub fn find_draggable_ancestor(&self, scene: &SceneGraph, hit: NodeId) -> Option<NodeId> {
        scene
            .ancestors(hit)
            .take_while(|&id| id != scene.root())
            .find(|&id| self.is_draggable(id))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Registered nodes in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> {
        let mut members: Vec<_> = self.members.iter().copied().collect();
        members.sort();
        members.into_iter()
    }
}
