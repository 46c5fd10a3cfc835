//! Builders for the individual room pieces
//!
//! Each builder adds a group node under `parent` with the piece's meshes as children, so
//! the group can be positioned (and dragged) as one unit. Builders leave the group at the
//! origin; placement is the caller's job.

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use crate::gfx::{
    geometry::{generate_box, generate_circle, generate_grid, generate_plane},
    scene::{Material, NodeId, SceneGraph},
};

pub const ROOM_SIZE: f32 = 10.0;
pub const WALL_HEIGHT: f32 = 4.0;
pub const FLOOR_RADIUS: f32 = 50.0;
pub const WINDOW_DEPTH: f32 = 0.1;
pub const GRID_SIZE: f32 = 100.0;
pub const GRID_DIVISIONS: u32 = 100;
/// Lifted off the floor to avoid z-fighting
pub const GRID_HEIGHT: f32 = 0.01;

/// Ids of the three walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub back: NodeId,
    pub left: NodeId,
    pub right: NodeId,
}

/// Large translucent disc lying in the XZ plane, facing up
pub fn create_floor(scene: &mut SceneGraph, parent: NodeId) -> NodeId {
    let material = Material::from_hex("floor", 0x808080)
        .with_roughness(0.8)
        .with_opacity(0.9);
    let floor = scene.add_mesh(parent, "floor", generate_circle(FLOOR_RADIUS, 64), material);
    scene[floor].rotation.x = -FRAC_PI_2;
    floor
}

/// Grey reference grid lying just above the floor
pub fn create_grid(scene: &mut SceneGraph, parent: NodeId) -> NodeId {
    let grid = scene.add_mesh(
        parent,
        "grid",
        generate_grid(GRID_SIZE, GRID_DIVISIONS, 0.02),
        Material::from_hex("grid", 0x888888),
    );
    scene.set_position(grid, Vector3::new(0.0, GRID_HEIGHT, 0.0));
    scene[grid].rotation.x = -FRAC_PI_2;
    grid
}

/// Back, left and right walls, all facing the room's interior
pub fn create_walls(scene: &mut SceneGraph, parent: NodeId) -> Walls {
    let half = ROOM_SIZE / 2.0;
    let y = WALL_HEIGHT / 2.0;
    let wall_material = || Material::from_hex("wall", 0x404040).with_roughness(0.7);

    let back = scene.add_mesh(
        parent,
        "back_wall",
        generate_plane(ROOM_SIZE, WALL_HEIGHT),
        wall_material(),
    );
    scene.set_position(back, Vector3::new(0.0, y, -half));

    let left = scene.add_mesh(
        parent,
        "left_wall",
        generate_plane(ROOM_SIZE, WALL_HEIGHT),
        wall_material(),
    );
    scene.set_position(left, Vector3::new(-half, y, 0.0));
    scene[left].rotation.y = FRAC_PI_2;

    let right = scene.add_mesh(
        parent,
        "right_wall",
        generate_plane(ROOM_SIZE, WALL_HEIGHT),
        wall_material(),
    );
    scene.set_position(right, Vector3::new(half, y, 0.0));
    scene[right].rotation.y = -FRAC_PI_2;

    Walls { back, left, right }
}

/// Green table top on four black legs with a thin net across the middle
pub fn create_ping_pong_table(scene: &mut SceneGraph, parent: NodeId) -> NodeId {
    let table = scene.add_group(parent, "table");

    let top = scene.add_mesh(
        table,
        "table_top",
        generate_box(3.0, 0.1, 1.8),
        Material::from_hex("table_top", 0x2e8b57),
    );
    scene.set_position(top, Vector3::new(0.0, 0.76, 0.0));

    for (i, (x, z)) in [(1.4, 0.8), (-1.4, 0.8), (1.4, -0.8), (-1.4, -0.8)]
        .into_iter()
        .enumerate()
    {
        let leg = scene.add_mesh(
            table,
            &format!("table_leg_{}", i),
            generate_box(0.1, 0.75, 0.1),
            Material::from_hex("table_leg", 0x000000),
        );
        scene.set_position(leg, Vector3::new(x, 0.375, z));
    }

    let net = scene.add_mesh(
        table,
        "table_net",
        generate_plane(0.01, 0.15),
        Material::from_hex("table_net", 0xffffff).double_sided(),
    );
    scene.set_position(net, Vector3::new(0.0, 0.86, 0.0));
    scene[net].rotation.y = FRAC_PI_2;

    table
}

pub fn create_door(scene: &mut SceneGraph, parent: NodeId) -> NodeId {
    let door = scene.add_group(parent, "door");
    scene.add_mesh(
        door,
        "door_panel",
        generate_box(1.2, 2.2, 0.1),
        Material::from_hex("door", 0xffffff),
    );
    door
}

/// Window group plus the id of its pane, which [`resize_window`] reshapes
pub fn create_window(
    scene: &mut SceneGraph,
    parent: NodeId,
    width: f32,
    height: f32,
) -> (NodeId, NodeId) {
    let window = scene.add_group(parent, "window");
    let material = Material::from_hex("window", 0x87a8c8)
        .with_roughness(0.2)
        .with_opacity(0.8);
    let pane = scene.add_mesh(
        window,
        "window_pane",
        generate_box(width, height, WINDOW_DEPTH),
        material,
    );
    (window, pane)
}

/// Replaces the pane's geometry with a `width` x `height` box
///
/// Returns false when `pane` carries no geometry.
pub fn resize_window(scene: &mut SceneGraph, pane: NodeId, width: f32, height: f32) -> bool {
    let resized = scene.replace_geometry(pane, generate_box(width, height, WINDOW_DEPTH));
    if resized {
        log::info!("Window resized to {}x{}", width, height);
    } else {
        log::warn!("'{}' has no geometry to resize", scene[pane].name);
    }
    resized
}

/// Seat with a backrest along its local -Z edge
pub fn create_sofa(scene: &mut SceneGraph, parent: NodeId) -> NodeId {
    let sofa = scene.add_group(parent, "sofa");
    let fabric = || Material::from_hex("sofa", 0x8b5a2b).with_roughness(0.8);

    scene.add_mesh(sofa, "sofa_seat", generate_box(1.5, 0.5, 0.8), fabric());

    let backrest = scene.add_mesh(sofa, "sofa_backrest", generate_box(1.5, 0.8, 0.2), fabric());
    scene.set_position(backrest, Vector3::new(0.0, 0.4, -0.3));

    sofa
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Matrix4, Vector4};

    fn world_normal(scene: &SceneGraph, id: NodeId) -> Vector3<f32> {
        let n = scene.world_matrix(id) * Vector4::new(0.0, 0.0, 1.0, 0.0);
        n.truncate().normalize()
    }

    #[test]
    fn test_floor_faces_up() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let floor = create_floor(&mut scene, root);
        let n = world_normal(&scene, floor);
        assert!((n - Vector3::unit_y()).magnitude() < 1e-5);
        assert!(scene[floor].renderable().unwrap().material.is_transparent());
    }

    #[test]
    fn test_grid_sits_above_floor() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let floor = create_floor(&mut scene, root);
        let grid = create_grid(&mut scene, root);

        assert!((world_normal(&scene, grid) - Vector3::unit_y()).magnitude() < 1e-5);
        assert!(scene.world_position(grid).y > scene.world_position(floor).y);
        assert!(!scene[grid].renderable().unwrap().material.is_transparent());
    }

    #[test]
    fn test_walls_face_inward() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let walls = create_walls(&mut scene, root);

        for id in [walls.back, walls.left, walls.right] {
            let inward = -scene.world_position(id);
            let n = world_normal(&scene, id);
            assert!(
                n.dot(Vector3::new(inward.x, 0.0, inward.z)) > 0.0,
                "{} faces outward",
                scene[id].name
            );
        }
        assert_eq!(scene.world_position(walls.back), Vector3::new(0.0, 2.0, -5.0));
    }

    #[test]
    fn test_table_parts() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let table = create_ping_pong_table(&mut scene, root);

        // top, four legs and the net
        assert_eq!(scene[table].children().len(), 6);
        assert!(!scene[table].has_geometry());

        let legs: Vec<_> = scene[table]
            .children()
            .iter()
            .filter(|&&id| scene[id].name.starts_with("table_leg"))
            .collect();
        assert_eq!(legs.len(), 4);
        for &&leg in &legs {
            assert_eq!(scene[leg].position.y, 0.375);
        }

        let net = scene.find_by_name("table_net").unwrap();
        assert_eq!(
            scene[net].renderable().unwrap().material.side,
            crate::gfx::scene::Side::Double
        );
    }

    #[test]
    fn test_resize_window_bumps_revision() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let (window, pane) = create_window(&mut scene, root, 2.0, 1.5);
        let before = scene[pane].renderable().unwrap().revision();

        assert!(resize_window(&mut scene, pane, 1.5, 1.2));

        let renderable = scene[pane].renderable().unwrap();
        assert_eq!(renderable.revision(), before + 1);
        let max_x = renderable
            .geometry
            .vertices
            .iter()
            .map(|v| v[0])
            .fold(f32::MIN, f32::max);
        let max_y = renderable
            .geometry
            .vertices
            .iter()
            .map(|v| v[1])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 0.75).abs() < 1e-6);
        assert!((max_y - 0.6).abs() < 1e-6);

        // The group has nothing to reshape
        assert!(!resize_window(&mut scene, window, 1.0, 1.0));
    }

    #[test]
    fn test_sofa_backrest_follows_rotation() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let sofa = create_sofa(&mut scene, root);
        scene.set_position(sofa, Vector3::new(4.0, 0.25, 2.0));
        scene[sofa].rotation.y = FRAC_PI_2;

        let backrest = scene.find_by_name("sofa_backrest").unwrap();
        let expected = Matrix4::from_translation(Vector3::new(3.7, 0.65, 2.0));
        let actual = scene.world_matrix(backrest);
        assert!((actual.w.truncate() - expected.w.truncate()).magnitude() < 1e-5);
    }
}
