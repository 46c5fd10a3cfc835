use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Switch other input consumers use to take the camera out of the loop
pub trait NavigationToggle {
    fn set_navigation_enabled(&mut self, enabled: bool);
    fn navigation_enabled(&self) -> bool;
}

/// Mouse and keyboard orbit navigation
///
/// - Left drag: rotate around the focus point
/// - Shift + left drag: pan the focus point
/// - Wheel: zoom
/// - Shift + C: reset to the initial pose
///
/// While disabled, button and modifier state keep being tracked so a release that
/// happens during the disabled period is not missed, but the camera does not move.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    enabled: bool,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enabled: true,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.is_mouse_pressed = state == ElementState::Pressed;
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        if self.apply_device_event(event, camera) {
            window.request_redraw();
        }
    }

    /// Applies a raw device event to the camera; returns true when the camera moved
    pub fn apply_device_event(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        if !self.enabled {
            return false;
        }

        match event {
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                if self.is_shift_held {
                    camera.pan((
                        -delta.0 as f32 * self.pan_speed,
                        delta.1 as f32 * self.pan_speed,
                    ));
                } else {
                    camera.add_yaw(-delta.0 as f32 * self.rotate_speed);
                    camera.add_pitch(delta.1 as f32 * self.rotate_speed);
                }
                true
            }
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held && self.enabled {
                    log::info!("Resetting camera to default position");
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.enabled && self.is_mouse_pressed && !self.is_shift_held
    }
}

impl NavigationToggle for CameraController {
    fn set_navigation_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn navigation_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(8.0, 0.4, 0.2, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_drag_rotates_when_enabled() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = camera();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        let moved = controller.apply_device_event(
            &DeviceEvent::MouseMotion { delta: (10.0, 0.0) },
            &mut camera,
        );
        assert!(moved);
        assert!((camera.yaw - (0.2 - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_controller_ignores_motion() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = camera();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.set_navigation_enabled(false);

        let moved = controller.apply_device_event(
            &DeviceEvent::MouseMotion { delta: (10.0, 5.0) },
            &mut camera,
        );
        assert!(!moved);
        assert_eq!(camera.yaw, 0.2);
        assert!(!controller.is_rotating());
    }

    #[test]
    fn test_release_tracked_while_disabled() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = camera();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.set_navigation_enabled(false);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        controller.set_navigation_enabled(true);

        let moved = controller.apply_device_event(
            &DeviceEvent::MouseMotion { delta: (10.0, 5.0) },
            &mut camera,
        );
        assert!(!moved);
    }
}
