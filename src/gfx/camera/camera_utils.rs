use cgmath::{Matrix4, SquareMatrix};
use winit::{
    event::{DeviceEvent, KeyEvent},
    window::Window,
};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_event(&mut self, event: &DeviceEvent, window: &Window) {
        self.controller
            .process_events(event, window, &mut self.camera);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }

    /// Once per frame: advances damped motion and refreshes the uniform
    pub fn update(&mut self) {
        self.controller.update(&mut self.camera);
        self.camera.update_view_proj();
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

/// Drawable size of the window in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Brings the viewport and camera projection to a new window size
///
/// Returns `false` and leaves both untouched for a zero-sized window, which
/// happens while minimized; the surface must not be reconfigured then.
pub fn resize_view(viewport: &mut Viewport, camera: &mut OrbitCamera, width: u32, height: u32) -> bool {
    if width == 0 || height == 0 {
        log::debug!("Ignoring zero-sized viewport {}x{}", width, height);
        return false;
    }
    *viewport = Viewport::new(width, height);
    camera.resize_projection(width, height);
    true
}
