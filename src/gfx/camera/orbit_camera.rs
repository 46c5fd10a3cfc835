use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Spherical placement of the eye around the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

impl OrbitPose {
    /// Pose that puts the eye at `eye` while looking at `target`
    pub fn from_eye(eye: Vector3<f32>, target: Vector3<f32>) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        Self {
            distance,
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            yaw: offset.x.atan2(offset.z),
            target,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: OrbitPose,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let home = OrbitPose {
            distance,
            pitch,
            yaw,
            target,
        };
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
            home,
        };
        camera.update();
        camera
    }

    /// Camera whose eye sits at `eye` looking at `target`
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32, fovy: Rad<f32>) -> Self {
        let pose = OrbitPose::from_eye(eye, target);
        let mut camera = Self::new(pose.distance, pose.pitch, pose.yaw, target, aspect);
        camera.fovy = fovy;
        camera
    }

    /// Returns to the pose the camera was created with
    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;

        self.update();
    }

    pub fn pose(&self) -> OrbitPose {
        OrbitPose {
            distance: self.distance,
            pitch: self.pitch,
            yaw: self.yaw,
            target: self.target,
        }
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the focus point relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        self.target += (right * delta.0 + up * delta.1) * pan_scale;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(16.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_at_reproduces_eye() {
        let eye = Vector3::new(10.0, 8.0, 10.0);
        let camera = OrbitCamera::looking_at(eye, Vector3::zero(), 1.5, Deg(75.0).into());
        assert!((camera.eye - eye).magnitude() < 1e-4);
        assert!((camera.yaw - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_reset_returns_home() {
        let mut camera = OrbitCamera::new(8.0, 0.4, 0.2, Vector3::zero(), 1.0);
        camera.add_yaw(1.0);
        camera.pan((0.5, 0.5));
        camera.reset_to_default();

        assert_eq!(camera.yaw, 0.2);
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(8.0, 0.4, 0.2, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_distance_respects_bounds() {
        let mut camera = OrbitCamera::new(8.0, 0.4, 0.2, Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(2.0);
        camera.set_distance(100.0);
        assert_eq!(camera.distance, 16.0);
        camera.set_distance(0.5);
        assert_eq!(camera.distance, 2.0);
    }
}
