use cgmath::Vector3;

use crate::{
    gfx::{
        camera::{NavigationToggle, OrbitCamera, OrbitPose},
        scene::SceneGraph,
    },
    interaction::DragController,
};

/// One movable piece of furniture as shown in the panel
#[derive(Debug, Clone, PartialEq)]
pub struct FurnitureRow {
    pub name: String,
    pub position: Vector3<f32>,
    pub dragging: bool,
}

/// Snapshot of everything the room panel displays
///
/// Taken before the UI frame so the panel never borrows the scene while it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPanelView {
    pub furniture: Vec<FurnitureRow>,
    pub navigation_enabled: bool,
    pub camera: OrbitPose,
}

impl RoomPanelView {
    pub fn capture(
        scene: &SceneGraph,
        drag: &DragController,
        navigation: &impl NavigationToggle,
        camera: &OrbitCamera,
    ) -> Self {
        let furniture = drag
            .registry()
            .iter()
            .map(|id| FurnitureRow {
                name: scene[id].name.clone(),
                position: scene[id].position,
                dragging: drag.target() == Some(id),
            })
            .collect();

        Self {
            furniture,
            navigation_enabled: navigation.navigation_enabled(),
            camera: camera.pose(),
        }
    }

    pub fn dragged_name(&self) -> Option<&str> {
        self.furniture
            .iter()
            .find(|row| row.dragging)
            .map(|row| row.name.as_str())
    }
}

/// Requests the panel hands back to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    ResetCamera,
}

pub fn format_position(position: Vector3<f32>) -> String {
    format!("({:.2}, {:.2}, {:.2})", position.x, position.y, position.z)
}

/// Draws the "Room" window; returns the action the user picked, if any
pub fn room_panel(ui: &imgui::Ui, view: &RoomPanelView) -> Option<PanelAction> {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return None;
    }

    let mut action = None;
    ui.window("Room")
        .size([320.0, 260.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            match view.dragged_name() {
                Some(name) => ui.text(format!("Dragging: {}", name)),
                None => ui.text("Dragging: none"),
            }
            ui.text(format!(
                "Camera navigation: {}",
                if view.navigation_enabled { "on" } else { "off" }
            ));

            ui.separator();
            ui.text("Furniture");
            for row in &view.furniture {
                let marker = if row.dragging { ">" } else { " " };
                ui.text(format!(
                    "{} {:<8} {}",
                    marker,
                    row.name,
                    format_position(row.position)
                ));
            }

            ui.separator();
            ui.text(format!(
                "Camera distance {:.1}, pitch {:.0} deg, yaw {:.0} deg",
                view.camera.distance,
                view.camera.pitch.to_degrees(),
                view.camera.yaw.to_degrees()
            ));
            if ui.button("Reset camera") {
                action = Some(PanelAction::ResetCamera);
            }
        });
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DragConfig,
        gfx::{camera::CameraController, geometry::generate_box, picking::Viewport, scene::Material},
    };
    use cgmath::{Deg, Zero};

    #[test]
    fn test_capture_lists_registered_furniture() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let sofa = scene.add_group(root, "sofa");
        scene.add_mesh(sofa, "seat", generate_box(1.5, 0.5, 0.8), Material::default());
        scene.set_position(sofa, Vector3::new(4.0, 0.25, 2.0));
        scene.add_mesh(root, "door", generate_box(1.2, 2.2, 0.1), Material::default());

        let mut drag = DragController::new(DragConfig::default(), Viewport::new(1200.0, 800.0));
        drag.mark_draggable(&mut scene, sofa);

        let camera = OrbitCamera::looking_at(
            Vector3::new(10.0, 8.0, 10.0),
            Vector3::zero(),
            1.5,
            Deg(75.0).into(),
        );
        let navigation = CameraController::new(0.005, 0.1);

        let view = RoomPanelView::capture(&scene, &drag, &navigation, &camera);
        assert_eq!(view.furniture.len(), 1);
        assert_eq!(view.furniture[0].name, "sofa");
        assert_eq!(view.furniture[0].position, Vector3::new(4.0, 0.25, 2.0));
        assert!(view.navigation_enabled);
        assert_eq!(view.dragged_name(), None);
    }

    #[test]
    fn test_format_position() {
        assert_eq!(
            format_position(Vector3::new(4.0, 0.25, -2.126)),
            "(4.00, 0.25, -2.13)"
        );
    }
}
