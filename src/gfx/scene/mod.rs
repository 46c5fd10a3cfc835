//! # Scene Management Module
//!
//! The room is held in a [`SceneGraph`]: an arena of [`SceneNode`]s linked by parent and
//! child handles. Grouping nodes (a sofa, a table) carry only a transform; leaf nodes
//! carry a [`Renderable`] with geometry and a [`Material`].
//!
//! ```rust
//! use room_planner::gfx::geometry::generate_box;
//! use room_planner::gfx::scene::{Material, SceneGraph};
//!
//! let mut scene = SceneGraph::new();
//! let sofa = scene.add_group(scene.root(), "sofa");
//! let seat = scene.add_mesh(sofa, "seat", generate_box(1.5, 0.5, 0.8), Material::default());
//! assert_eq!(scene.ancestors(seat).nth(1), Some(sofa));
//! ```

pub mod graph;
pub mod material;
pub mod node;
pub mod vertex;

pub use graph::SceneGraph;
pub use material::{Material, Side};
pub use node::{CursorHint, NodeId, Renderable, SceneNode};
pub use vertex::Vertex3D;
