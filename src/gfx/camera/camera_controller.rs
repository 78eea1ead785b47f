use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Fraction of the remaining motion applied per frame when damping is on
pub const DEFAULT_DAMPING_FACTOR: f32 = 0.05;

/// Remaining motion below which the camera counts as settled
const SETTLE_EPSILON: f32 = 1e-5;

/// Orbit controls: drag rotates, shift+drag pans, wheel zooms
///
/// With damping on, drag input is accumulated as pending motion and released
/// a fraction per [`CameraController::update`], so the camera glides to a stop.
/// With damping off the same input is applied to the camera immediately.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping: bool,
    pub damping_factor: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: (f32, f32),
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: true,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: (0.0, 0.0),
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.handle_scroll(scroll_amount, camera);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.handle_drag(delta.0 as f32, delta.1 as f32, camera);
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    /// Applies one mouse drag of `(dx, dy)` pixels
    pub fn handle_drag(&mut self, dx: f32, dy: f32, camera: &mut OrbitCamera) {
        if self.is_shift_held {
            let pan = (-dx * self.pan_speed, dy * self.pan_speed);
            if self.damping {
                self.pending_pan.0 += pan.0;
                self.pending_pan.1 += pan.1;
            } else {
                camera.pan(pan);
            }
        } else {
            let (yaw, pitch) = (-dx * self.rotate_speed, dy * self.rotate_speed);
            if self.damping {
                self.pending_yaw += yaw;
                self.pending_pitch += pitch;
            } else {
                camera.add_yaw(yaw);
                camera.add_pitch(pitch);
            }
        }
    }

    pub fn handle_scroll(&mut self, amount: f32, camera: &mut OrbitCamera) {
        camera.add_distance(amount * self.zoom_speed);
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.set_shift_held(*state == ElementState::Pressed);
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                repeat: false,
                ..
            } if self.is_shift_held => {
                log::info!("Resetting camera to its initial pose");
                self.reset(camera);
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyD),
                state: ElementState::Pressed,
                repeat: false,
                ..
            } => {
                self.toggle_damping();
            }
            _ => (),
        }
    }

    pub fn set_shift_held(&mut self, held: bool) {
        if held != self.is_shift_held {
            log::trace!("Shift state changed: {}", held);
        }
        self.is_shift_held = held;
    }

    pub fn toggle_damping(&mut self) {
        self.set_damping(!self.damping);
        log::info!("Camera damping {}", if self.damping { "on" } else { "off" });
    }

    /// Switching damping off drops any motion still pending
    pub fn set_damping(&mut self, enabled: bool) {
        self.damping = enabled;
        if !enabled {
            self.stop();
        }
    }

    /// Puts the camera back at its initial pose and discards pending motion
    pub fn reset(&mut self, camera: &mut OrbitCamera) {
        self.stop();
        camera.reset_to_default();
    }

    fn stop(&mut self) {
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan = (0.0, 0.0);
    }

    /// Whether damped motion is still being released
    pub fn is_moving(&self) -> bool {
        self.pending_yaw.abs() > SETTLE_EPSILON
            || self.pending_pitch.abs() > SETTLE_EPSILON
            || self.pending_pan.0.abs() > SETTLE_EPSILON
            || self.pending_pan.1.abs() > SETTLE_EPSILON
    }

    /// Per-frame step; releases a `damping_factor` share of pending motion
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if !self.damping {
            return;
        }
        if !self.is_moving() {
            self.stop();
            return;
        }

        let f = self.damping_factor;
        camera.add_yaw(self.pending_yaw * f);
        camera.add_pitch(self.pending_pitch * f);
        if self.pending_pan != (0.0, 0.0) {
            camera.pan((self.pending_pan.0 * f, self.pending_pan.1 * f));
        }

        let keep = 1.0 - f;
        self.pending_yaw *= keep;
        self.pending_pitch *= keep;
        self.pending_pan.0 *= keep;
        self.pending_pan.1 *= keep;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace, Point3};

    fn camera() -> OrbitCamera {
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
    fn test_undamped_drag_applies_immediately() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.005, 1.0);
        controller.set_damping(false);

        let yaw = camera.yaw;
        controller.handle_drag(-100.0, 0.0, &mut camera);
        assert!((camera.yaw - (yaw + 0.5)).abs() < 1e-6);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_damped_drag_glides_to_same_rotation() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.005, 1.0);
        assert!(controller.damping);

        let yaw = camera.yaw;
        controller.handle_drag(-100.0, 0.0, &mut camera);
        assert_eq!(camera.yaw, yaw, "damped input must wait for update()");

        controller.update(&mut camera);
        let first_step = camera.yaw - yaw;
        assert!((first_step - 0.5 * DEFAULT_DAMPING_FACTOR).abs() < 1e-6);

        for _ in 0..1000 {
            controller.update(&mut camera);
        }
        assert!(!controller.is_moving());
        assert!((camera.yaw - (yaw + 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_disabling_damping_drops_pending_motion() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.005, 1.0);
        controller.handle_drag(50.0, 20.0, &mut camera);
        assert!(controller.is_moving());

        controller.toggle_damping();
        assert!(!controller.damping);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_shift_drag_pans_target() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.005, 1.0);
        controller.set_damping(false);
        controller.set_shift_held(true);

        let target = camera.target;
        controller.handle_drag(10.0, 0.0, &mut camera);
        assert!((camera.target - target).magnitude() > 0.0);
        // no button is held in this test, so it is a pan step but not a pan gesture
        assert!(!controller.is_panning());
    }

    #[test]
    fn test_reset_clears_motion() {
        let mut camera = camera();
        let initial = camera.eye;
        let mut controller = CameraController::new(0.005, 1.0);
        controller.handle_drag(80.0, 0.0, &mut camera);
        for _ in 0..10 {
            controller.update(&mut camera);
        }
        controller.reset(&mut camera);
        assert!(!controller.is_moving());
        assert!((camera.eye - initial).magnitude() < 1e-3);
    }
}
