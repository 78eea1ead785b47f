use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Spherical placement of the eye around the target, kept for resets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

impl OrbitPose {
    /// Pose that places the eye at `eye` while looking at `target`
    pub fn looking_at(eye: Point3<f32>, target: Point3<f32>) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        Self {
            distance,
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            yaw: offset.x.atan2(offset.z),
            target: target.to_vec(),
        }
    }
}

/// Y-up perspective camera orbiting a target point
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
    pub fn new(pose: OrbitPose, aspect: f32, fovy: Rad<f32>, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            distance: pose.distance,
            pitch: pose.pitch,
            yaw: pose.yaw,
            eye: Vector3::zero(), // Will be auto-calculated in `update()` nevertheless.
            target: pose.target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy,
            znear,
            zfar,
            uniform: CameraUniform::default(),
            home: pose,
        };
        camera.update();
        camera.update_view_proj();
        camera
    }

    /// Camera whose eye starts exactly at `eye`, looking at `target`
    pub fn looking_at(
        eye: Point3<f32>,
        target: Point3<f32>,
        aspect: f32,
        fovy: impl Into<Rad<f32>>,
        znear: f32,
        zfar: f32,
    ) -> Self {
        Self::new(OrbitPose::looking_at(eye, target), aspect, fovy.into(), znear, zfar)
    }

    /// Returns to the pose the camera was created with
    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;
        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Zoom step scaled by the current distance so far views move faster
    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
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

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;
        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
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
            min_distance: Some(2.0),
            max_distance: Some(600.0),
            min_pitch: -std::f32::consts::PI / 2.0 + 0.01,
            max_pitch: std::f32::consts::PI / 2.0 - 0.01,
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

    fn reference_camera() -> OrbitCamera {
        OrbitCamera::looking_at(
            Point3::new(0.0, 50.0, 150.0),
            Point3::new(0.0, 0.0, 0.0),
            1.5,
            Deg(75.0),
            0.1,
            1000.0,
        )
    }

    #[test]
    fn test_eye_starts_where_configured() {
        let camera = reference_camera();
        assert!((camera.eye - Vector3::new(0.0, 50.0, 150.0)).magnitude() < 1e-3);
        assert_eq!(camera.up, Vector3::unit_y());
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut camera = reference_camera();
        let initial = camera.eye;
        camera.add_yaw(1.0);
        camera.add_pitch(-0.3);
        camera.pan((0.5, 0.5));
        camera.set_distance(50.0);
        camera.reset_to_default();
        assert!((camera.eye - initial).magnitude() < 1e-3);
    }

    #[test]
    fn test_pitch_is_bounded() {
        let mut camera = reference_camera();
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        let eye_dir = (camera.eye - camera.target).normalize();
        assert!(eye_dir.cross(camera.up).magnitude() > 0.0);
    }

    #[test]
    fn test_resize_projection_sets_aspect() {
        let mut camera = reference_camera();
        camera.resize_projection(1920, 1080);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
    }
}
