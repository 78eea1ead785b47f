// src/ui/panel.rs
//! Scene info panel
//!
//! Read-only summary of the generated scene plus the few camera settings that
//! can be changed at runtime.

use crate::gfx::{camera::OrbitCamera, scene::Scene};

/// Scene statistics, camera state and the orbit damping toggle
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `scene` - Scene to summarize; only the camera controller is modified
/// * `floor_texture` - Human readable state of the floor texture
pub fn scene_info_panel(ui: &imgui::Ui, scene: &mut Scene, floor_texture: &str) {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("Scene")
        .size([340.0, 0.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .always_auto_resize(true)
        .build(|| {
            render_statistics(ui, scene, floor_texture);
            ui.separator();
            render_camera_controls(ui, scene);
        });
}

fn render_statistics(ui: &imgui::Ui, scene: &Scene, floor_texture: &str) {
    let stats = scene.get_statistics();
    ui.text(format!("Objects:   {}", stats.object_count));
    ui.text(format!("Materials: {}", stats.material_count));
    ui.text(format!("Triangles: {}", stats.total_triangles));
    ui.text(format!("Lines:     {}", stats.total_lines));
    ui.text(format!("Vertices:  {}", stats.total_vertices));
    ui.text(format!("Floor:     {}", floor_texture));
}

fn render_camera_controls(ui: &imgui::Ui, scene: &mut Scene) {
    let manager = &mut scene.camera_manager;
    ui.text(camera_summary(&manager.camera));
    let gesture = if manager.controller.is_panning() {
        "panning"
    } else if manager.controller.is_rotating() {
        "orbiting"
    } else if manager.controller.is_moving() {
        "settling"
    } else {
        "idle"
    };
    ui.text(format!("Camera: {}", gesture));

    let mut damping = manager.controller.damping;
    if ui.checkbox("Damping (D)", &mut damping) {
        manager.controller.set_damping(damping);
    }
    if ui.button("Reset view (Shift+C)") {
        manager.controller.reset(&mut manager.camera);
    }
    ui.text_disabled("Drag: orbit   Shift+drag: pan   Wheel: zoom");
}

/// One-line description of the orbit camera
pub fn camera_summary(camera: &OrbitCamera) -> String {
    format!(
        "distance {:.1}  pitch {:.1}°  yaw {:.1}°",
        camera.distance,
        camera.pitch.to_degrees(),
        camera.yaw.to_degrees()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Point3};

    #[test]
    fn test_camera_summary_reports_degrees() {
        let camera = OrbitCamera::looking_at(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            1.0,
            Deg(75.0),
            0.1,
            100.0,
        );
        assert_eq!(camera_summary(&camera), "distance 10.0  pitch 0.0°  yaw 0.0°");
    }
}
