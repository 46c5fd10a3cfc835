//! # Room Layout
//!
//! Builds the fixed room: a translucent floor disc under a grid, three walls, a ping-pong
//! table, a door, a window and a sofa. The table and the sofa are registered with the
//! [`DragController`] so they can be moved across the floor.
//!
//! ```rust
//! use room_planner::config::DragConfig;
//! use room_planner::gfx::{picking::Viewport, scene::SceneGraph};
//! use room_planner::interaction::DragController;
//! use room_planner::room::build_room_scene;
//!
//! let mut scene = SceneGraph::new();
//! let mut drag = DragController::new(DragConfig::default(), Viewport::new(1200.0, 800.0));
//! let layout = build_room_scene(&mut scene, &mut drag);
//! assert!(drag.is_draggable(layout.sofa));
//! ```

pub mod furniture;

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

pub use furniture::{
    create_door, create_floor, create_grid, create_ping_pong_table, create_sofa, create_walls,
    create_window, resize_window, Walls,
};

use crate::{
    gfx::scene::{NodeId, SceneGraph},
    interaction::DragController,
};

pub const DOOR_POSITION: Vector3<f32> = Vector3::new(-2.0, 1.1, -4.9);
pub const WINDOW_POSITION: Vector3<f32> = Vector3::new(4.0, 1.8, -4.9);
pub const WINDOW_SIZE: (f32, f32) = (2.0, 1.5);
pub const SOFA_POSITION: Vector3<f32> = Vector3::new(4.0, 0.25, 2.0);

/// Floor, grid and walls grouped under one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomShell {
    pub room: NodeId,
    pub floor: NodeId,
    pub grid: NodeId,
    pub walls: Walls,
}

/// Ids of every piece [`build_room_scene`] created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomLayout {
    pub shell: RoomShell,
    pub table: NodeId,
    pub door: NodeId,
    pub window: NodeId,
    pub window_pane: NodeId,
    pub sofa: NodeId,
}

impl RoomLayout {
    pub fn resize_window(&self, scene: &mut SceneGraph, width: f32, height: f32) -> bool {
        resize_window(scene, self.window_pane, width, height)
    }
}

pub fn create_room(scene: &mut SceneGraph, parent: NodeId) -> RoomShell {
    let room = scene.add_group(parent, "room");
    let floor = create_floor(scene, room);
    let grid = create_grid(scene, room);
    let walls = create_walls(scene, room);
    RoomShell {
        room,
        floor,
        grid,
        walls,
    }
}

/// Populates `scene` with the room and registers the movable furniture with `drag`
pub fn build_room_scene(scene: &mut SceneGraph, drag: &mut DragController) -> RoomLayout {
    let root = scene.root();
    let shell = create_room(scene, root);

    let table = create_ping_pong_table(scene, root);
    drag.mark_draggable(scene, table);

    let door = create_door(scene, root);
    scene.set_position(door, DOOR_POSITION);

    let (window, window_pane) = create_window(scene, root, WINDOW_SIZE.0, WINDOW_SIZE.1);
    scene.set_position(window, WINDOW_POSITION);

    let sofa = create_sofa(scene, root);
    scene.set_position(sofa, SOFA_POSITION);
    scene[sofa].rotation.y = FRAC_PI_2;
    drag.mark_draggable(scene, sofa);

    log::info!(
        "Room built: {} nodes, {} draggable",
        scene.len(),
        drag.registry().len()
    );

    RoomLayout {
        shell,
        table,
        door,
        window,
        window_pane,
        sofa,
    }
}
