//! Pointer-driven furniture dragging
//!
//! The controller is a two-state machine:
//!
//! - **Idle**: nothing selected, camera navigation enabled.
//! - **Dragging**: one registered node follows the pointer across the ground plane and
//!   camera navigation is disabled.
//!
//! Pointer-down picks the nearest surface under the pointer, walks up to the first
//! registered ancestor and records the offset between that node and the point where the
//! pointer ray meets the ground. Every pointer-move overwrites the node's position with
//! `ground point + offset`, clamped to the floor. Pointer-up or pointer-leave ends the
//! drag. Misses are not errors; they simply leave the controller where it was.

use cgmath::Vector3;

use super::registry::DraggableRegistry;
use crate::{
    config::DragConfig,
    gfx::{
        camera::{NavigationToggle, OrbitCamera},
        picking::{Plane, Ray, Raycaster, Viewport},
        scene::{CursorHint, NodeId, SceneGraph},
    },
};

/// The node being dragged and where it was grabbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub target: NodeId,
    /// `target.position - ground point` at pointer-down, constant for the whole drag
    pub grab_offset: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

pub struct DragController {
    registry: DraggableRegistry,
    state: DragState,
    ground: Plane,
    half_extent: f32,
    viewport: Viewport,
}

impl DragController {
    pub fn new(config: DragConfig, viewport: Viewport) -> Self {
        Self {
            registry: DraggableRegistry::new(),
            state: DragState::Idle,
            ground: Plane::horizontal(config.ground_height),
            half_extent: config.half_extent,
            viewport,
        }
    }

    pub fn registry(&self) -> &DraggableRegistry {
        &self.registry
    }

    pub fn mark_draggable(&mut self, scene: &mut SceneGraph, node: NodeId) {
        self.registry.mark_draggable(scene, node);
    }

    pub fn is_draggable(&self, node: NodeId) -> bool {
        self.registry.is_draggable(node)
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn target(&self) -> Option<NodeId> {
        self.session().map(|session| session.target)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Keeps pointer-to-NDC conversion in step with the surface size
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    fn pointer_ray(&self, x: f32, y: f32, camera: &OrbitCamera) -> Ray {
        Ray::from_camera(self.viewport.to_ndc(x, y), camera)
    }

    /// Starts a drag when the pointer is over a registered node
    ///
    /// Returns true when a drag started. A pointer-down while already dragging is ignored.
    pub fn on_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        scene: &SceneGraph,
        camera: &OrbitCamera,
        navigation: &mut impl NavigationToggle,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }

        let ray = self.pointer_ray(x, y, camera);
        let Some(hit) = Raycaster::for_camera(camera).pick(scene, &ray) else {
            return false;
        };
        let Some(target) = self.registry.find_draggable_ancestor(scene, hit.node) else {
            return false;
        };
        // Ray pointing away from the ground: nothing to anchor the drag to
        let Some(anchor) = self.ground.intersect_ray(&ray) else {
            log::debug!("Pointer ray misses the ground; not starting a drag");
            return false;
        };

        navigation.set_navigation_enabled(false);
        let grab_offset = scene[target].position - anchor;
        self.state = DragState::Dragging(DragSession {
            target,
            grab_offset,
        });

        log::debug!(
            "Started dragging '{}' with grab offset {:?}",
            scene[target].name,
            grab_offset
        );
        true
    }

    /// Moves the dragged node under the pointer; returns its new position
    pub fn on_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        scene: &mut SceneGraph,
        camera: &OrbitCamera,
    ) -> Option<Vector3<f32>> {
        let session = *self.session()?;

        let ray = self.pointer_ray(x, y, camera);
        let anchor = self.ground.intersect_ray(&ray)?;
        let position = clamp_to_floor(anchor + session.grab_offset, self.half_extent);

        scene.set_position(session.target, position);
        Some(position)
    }

    /// Ends any drag and hands control back to the camera
    pub fn on_pointer_up(&mut self, navigation: &mut impl NavigationToggle) {
        if let DragState::Dragging(session) = self.state {
            log::debug!("Released node {:?}", session.target);
        }
        self.state = DragState::Idle;
        navigation.set_navigation_enabled(true);
    }

    /// The pointer left the surface; treated exactly like a release
    pub fn on_pointer_leave(&mut self, navigation: &mut impl NavigationToggle) {
        self.on_pointer_up(navigation);
    }

    /// Cursor the host should show with the pointer at `(x, y)`
    pub fn hover_cursor(
        &self,
        x: f32,
        y: f32,
        scene: &SceneGraph,
        camera: &OrbitCamera,
    ) -> CursorHint {
        let ray = self.pointer_ray(x, y, camera);
        Raycaster::for_camera(camera)
            .pick(scene, &ray)
            .map(|hit| scene[hit.node].cursor)
            .unwrap_or_default()
    }
}

/// Clamps x and z into `[-half_extent, half_extent]`, leaving y untouched
pub fn clamp_to_floor(candidate: Vector3<f32>, half_extent: f32) -> Vector3<f32> {
    Vector3::new(
        candidate.x.clamp(-half_extent, half_extent),
        candidate.y,
        candidate.z.clamp(-half_extent, half_extent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::{generate_box, generate_plane},
        scene::Material,
    };
    use cgmath::{Deg, InnerSpace, Zero};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const WIDTH: f32 = 1200.0;
    const HEIGHT: f32 = 800.0;

    /// Stand-in for the camera controller
    struct Navigation {
        enabled: bool,
    }

    impl NavigationToggle for Navigation {
        fn set_navigation_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn navigation_enabled(&self) -> bool {
            self.enabled
        }
    }

    struct Fixture {
        scene: SceneGraph,
        camera: OrbitCamera,
        controller: DragController,
        nav: Navigation,
        sofa: NodeId,
        table: NodeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = SceneGraph::new();
            let root = scene.root();

            let sofa = scene.add_group(root, "sofa");
            scene.add_mesh(sofa, "seat", generate_box(1.5, 0.5, 0.8), Material::default());
            scene.set_position(sofa, Vector3::new(4.0, 0.25, 2.0));

            let table = scene.add_group(root, "table");
            let top = scene.add_mesh(table, "top", generate_box(3.0, 0.1, 1.8), Material::default());
            scene.set_position(top, Vector3::new(0.0, 0.76, 0.0));

            let camera = OrbitCamera::looking_at(
                Vector3::new(10.0, 8.0, 10.0),
                Vector3::zero(),
                WIDTH / HEIGHT,
                Deg(75.0).into(),
            );

            let mut controller =
                DragController::new(DragConfig::default(), Viewport::new(WIDTH, HEIGHT));
            controller.mark_draggable(&mut scene, sofa);
            controller.mark_draggable(&mut scene, table);

            Self {
                scene,
                camera,
                controller,
                nav: Navigation { enabled: true },
                sofa,
                table,
            }
        }

        fn screen_of(&self, world: Vector3<f32>) -> (f32, f32) {
            self.controller
                .viewport()
                .project(world, &self.camera)
                .expect("point in front of the camera")
        }

        fn ground_under(&self, x: f32, y: f32) -> Vector3<f32> {
            let ray = Ray::from_camera(self.controller.viewport().to_ndc(x, y), &self.camera);
            Plane::horizontal(0.0).intersect_ray(&ray).unwrap()
        }

        fn down(&mut self, pointer: (f32, f32)) -> bool {
            self.controller.on_pointer_down(
                pointer.0,
                pointer.1,
                &self.scene,
                &self.camera,
                &mut self.nav,
            )
        }

        fn move_to(&mut self, pointer: (f32, f32)) -> Option<Vector3<f32>> {
            self.controller
                .on_pointer_move(pointer.0, pointer.1, &mut self.scene, &self.camera)
        }

        fn up(&mut self) {
            self.controller.on_pointer_up(&mut self.nav);
        }

        fn grab_sofa(&mut self) -> (f32, f32) {
            let pointer = self.screen_of(Vector3::new(4.0, 0.25, 2.0));
            assert!(self.down(pointer));
            pointer
        }
    }

    fn near(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-3
    }

    #[test]
    fn test_clamp_bounds() {
        let clamped = clamp_to_floor(Vector3::new(10.0, 0.3, -10.0), 4.0);
        assert_eq!(clamped, Vector3::new(4.0, 0.3, -4.0));

        let clamped = clamp_to_floor(Vector3::new(-10.0, 0.0, 10.0), 4.0);
        assert_eq!(clamped, Vector3::new(-4.0, 0.0, 4.0));

        let inside = Vector3::new(1.5, 2.0, -3.25);
        assert_eq!(clamp_to_floor(inside, 4.0), inside);
    }

    #[test]
    fn test_pointer_down_on_sky_stays_idle() {
        let mut f = Fixture::new();
        assert!(!f.down((WIDTH * 0.5, 5.0)));
        assert_eq!(f.controller.state(), DragState::Idle);
        assert!(f.nav.enabled);
    }

    #[test]
    fn test_random_misses_never_start_a_drag() {
        let mut f = Fixture::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let pointer = (rng.random_range(0.0..WIDTH), rng.random_range(0.0..HEIGHT));
            let ray = Ray::from_camera(f.controller.viewport().to_ndc(pointer.0, pointer.1), &f.camera);
            if Raycaster::for_camera(&f.camera).pick(&f.scene, &ray).is_some() {
                continue;
            }

            assert!(!f.down(pointer));
            assert!(!f.controller.is_dragging());
            assert!(f.nav.enabled);
        }
    }

    #[test]
    fn test_draggable_hit_above_horizon_stays_idle() {
        let mut f = Fixture::new();
        // Low eye looking up at the underside of the table top
        f.camera = OrbitCamera::looking_at(
            Vector3::new(3.0, 0.3, 0.0),
            Vector3::new(0.2, 1.0, 0.1),
            WIDTH / HEIGHT,
            Deg(75.0).into(),
        );
        let center = (WIDTH * 0.5, HEIGHT * 0.5);

        let ray = Ray::from_camera(f.controller.viewport().to_ndc(center.0, center.1), &f.camera);
        let hit = Raycaster::for_camera(&f.camera).pick(&f.scene, &ray).unwrap();
        assert_eq!(hit.node, f.scene.find_by_name("top").unwrap());
        assert!(Plane::horizontal(0.0).intersect_ray(&ray).is_none());

        assert!(!f.down(center));
        assert_eq!(f.controller.state(), DragState::Idle);
        assert!(f.nav.enabled);
        assert_eq!(f.scene[f.table].position, Vector3::zero());
    }

    #[test]
    fn test_non_draggable_hit_stays_idle() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let shelf = f.scene.add_group(root, "shelf");
        let board = f.scene.add_mesh(shelf, "board", generate_box(1.0, 1.0, 1.0), Material::default());
        f.scene.set_position(shelf, Vector3::new(-2.0, 0.5, 2.0));

        let pointer = f.screen_of(Vector3::new(-2.0, 0.5, 2.0));
        assert!(!f.down(pointer));
        assert!(!f.controller.is_dragging());
        assert!(f.nav.enabled);
        assert_eq!(f.scene[board].cursor, CursorHint::Default);
    }

    #[test]
    fn test_occluding_wall_blocks_drag() {
        let mut f = Fixture::new();
        let root = f.scene.root();
        let screen = f.scene.add_mesh(
            root,
            "screen",
            generate_plane(20.0, 20.0),
            Material::default().double_sided(),
        );
        // Upright plane between the camera and the sofa
        f.scene.set_position(screen, Vector3::new(7.0, 0.0, 7.0));
        f.scene[screen].rotation.y = std::f32::consts::FRAC_PI_4;

        let pointer = f.screen_of(Vector3::new(4.0, 0.25, 2.0));
        assert!(!f.down(pointer));
        assert!(f.nav.enabled);
    }

    #[test]
    fn test_drag_start_records_grab_offset() {
        let mut f = Fixture::new();
        let pointer = f.grab_sofa();

        let session = *f.controller.session().unwrap();
        assert_eq!(session.target, f.sofa);
        assert!(!f.nav.enabled);

        let anchor = f.ground_under(pointer.0, pointer.1);
        assert!(near(session.grab_offset + anchor, Vector3::new(4.0, 0.25, 2.0)));
    }

    #[test]
    fn test_move_overwrites_position_with_offset() {
        let mut f = Fixture::new();
        f.grab_sofa();
        let offset = f.controller.session().unwrap().grab_offset;

        let pointer = f.screen_of(Vector3::new(1.0, 0.0, 1.0));
        let applied = f.move_to(pointer).unwrap();

        let expected = clamp_to_floor(Vector3::new(1.0, 0.0, 1.0) + offset, 4.0);
        assert!(near(applied, expected));
        assert!(near(f.scene[f.sofa].position, expected));

        f.up();
        assert!(f.nav.enabled);
        assert!(!f.controller.is_dragging());
        assert!(near(f.scene[f.sofa].position, expected));
    }

    #[test]
    fn test_repeated_moves_do_not_drift() {
        let mut f = Fixture::new();
        f.grab_sofa();

        let a = f.screen_of(Vector3::new(1.0, 0.0, 1.0));
        let b = f.screen_of(Vector3::new(-1.0, 0.0, 0.5));
        let first = f.move_to(a).unwrap();
        for _ in 0..20 {
            f.move_to(b);
            f.move_to(a);
        }
        assert!(near(f.scene[f.sofa].position, first));
    }

    #[test]
    fn test_move_clamps_to_room() {
        let mut f = Fixture::new();
        f.grab_sofa();
        let offset = f.controller.session().unwrap().grab_offset;

        let far_right = Vector3::new(10.0 - offset.x, 0.0, 1.0 - offset.z);
        let applied = f.move_to(f.screen_of(far_right)).unwrap();
        assert_eq!(applied.x, 4.0);
        assert!((applied.z - 1.0).abs() < 1e-3);

        let far_left = Vector3::new(-10.0 - offset.x, 0.0, -10.0 - offset.z);
        let applied = f.move_to(f.screen_of(far_left)).unwrap();
        assert_eq!(applied.x, -4.0);
        assert_eq!(applied.z, -4.0);
    }

    #[test]
    fn test_y_follows_offset_unclamped() {
        let mut f = Fixture::new();
        f.grab_sofa();
        let offset = f.controller.session().unwrap().grab_offset;

        let applied = f.move_to(f.screen_of(Vector3::new(0.0, 0.0, 0.0))).unwrap();
        assert!((applied.y - offset.y).abs() < 1e-4);
    }

    #[test]
    fn test_move_while_idle_is_noop() {
        let mut f = Fixture::new();
        let before = f.scene[f.sofa].position;
        assert!(f.move_to((WIDTH * 0.5, HEIGHT * 0.5)).is_none());
        assert_eq!(f.scene[f.sofa].position, before);
    }

    #[test]
    fn test_move_above_horizon_keeps_position() {
        let mut f = Fixture::new();
        f.grab_sofa();
        let before = f.scene[f.sofa].position;

        assert!(f.move_to((WIDTH * 0.5, -10_000.0)).is_none());
        assert_eq!(f.scene[f.sofa].position, before);
        assert!(f.controller.is_dragging());
    }

    #[test]
    fn test_pointer_up_when_idle_is_harmless() {
        let mut f = Fixture::new();
        f.up();
        f.up();
        assert_eq!(f.controller.state(), DragState::Idle);
        assert!(f.nav.enabled);
    }

    #[test]
    fn test_pointer_leave_ends_drag() {
        let mut f = Fixture::new();
        f.grab_sofa();
        f.controller.on_pointer_leave(&mut f.nav);
        assert!(!f.controller.is_dragging());
        assert!(f.nav.enabled);
    }

    #[test]
    fn test_two_draggables_are_independent() {
        let mut f = Fixture::new();
        let table_before = f.scene[f.table].position;

        f.grab_sofa();
        f.move_to(f.screen_of(Vector3::new(2.0, 0.0, -2.0)));
        f.up();
        let sofa_after = f.scene[f.sofa].position;
        assert_eq!(f.scene[f.table].position, table_before);

        let table_pointer = f.screen_of(Vector3::new(0.3, 0.76, 0.2));
        assert!(f.down(table_pointer));
        assert_eq!(f.controller.target(), Some(f.table));
        f.move_to(f.screen_of(Vector3::new(-2.0, 0.0, 1.0)));
        f.up();

        assert_eq!(f.scene[f.sofa].position, sofa_after);
        assert_ne!(f.scene[f.table].position, table_before);
    }

    #[test]
    fn test_second_pointer_down_keeps_current_target() {
        let mut f = Fixture::new();
        f.grab_sofa();
        let table_pointer = f.screen_of(Vector3::new(0.3, 0.76, 0.2));
        assert!(!f.down(table_pointer));
        assert_eq!(f.controller.target(), Some(f.sofa));
    }

    #[test]
    fn test_hover_cursor_reflects_hint() {
        let f = Fixture::new();
        let (x, y) = f.screen_of(Vector3::new(4.0, 0.25, 2.0));
        assert_eq!(f.controller.hover_cursor(x, y, &f.scene, &f.camera), CursorHint::Pointer);
        assert_eq!(
            f.controller.hover_cursor(WIDTH * 0.5, 5.0, &f.scene, &f.camera),
            CursorHint::Default
        );
    }

    #[test]
    fn test_viewport_resize_changes_ndc() {
        let mut f = Fixture::new();
        f.controller.set_viewport(600.0, 400.0);
        f.camera.resize_projection(600, 400);

        let pointer = f.screen_of(Vector3::new(4.0, 0.25, 2.0));
        assert!(pointer.0 < 600.0 && pointer.1 < 400.0);
        assert!(f.down(pointer));
        assert_eq!(f.controller.target(), Some(f.sofa));
    }
}
