//! ImGui overlay for the dome viewer
//!
//! Owns the imgui context and its wgpu renderer. Each frame the app builds the
//! scene info panel with [`UiManager::build_frame`] and draws it over the
//! finished scene with [`UiManager::render_overlay`].

use std::time::Instant;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE: f32 = 18.0;

/// Events the panel reacts to; resizes and redraws stay with the app
fn is_panel_input(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::Focused(_)
    )
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates the overlay for `window`, rendering into `surface_format`
    ///
    /// DPI is locked at 1.0 so panel sizes stay in logical pixels.
    pub fn new(device: &Device, queue: &Queue, surface_format: TextureFormat, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: surface_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Feeds pointer and keyboard events to the panel
    ///
    /// Returns true when the panel keeps the event from the orbit camera.
    pub fn handle_input(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        if !is_panel_input(event) {
            return false;
        }

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform.handle_event(self.context.io_mut(), window, &wrapped);
        self.wants_input()
    }

    /// Whether the pointer is over the panel; camera drags are ignored then
    pub fn wants_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    pub fn wants_keyboard(&self) -> bool {
        self.context.io().want_capture_keyboard
    }

    fn wants_input(&self) -> bool {
        self.wants_mouse() || self.wants_keyboard()
    }

    /// Starts an imgui frame and lays out the panel with `build`
    pub fn build_frame<F>(&mut self, window: &Window, build: F)
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare UI frame: {}", e);
        }

        let ui = self.context.frame();
        build(&ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(&ui, window);
        }
    }

    /// Draws the panel built by the last [`build_frame`](Self::build_frame)
    /// on top of the scene in `target`
    pub fn render_overlay(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
    ) {
        let draw_data = self.context.render();
        // Minimized window
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::warn!("Failed to render UI: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_only_pointer_keyboard_and_focus_reach_the_panel() {
        assert!(is_panel_input(&WindowEvent::Focused(true)));
        assert!(!is_panel_input(&WindowEvent::Resized(PhysicalSize::new(800, 600))));
        assert!(!is_panel_input(&WindowEvent::RedrawRequested));
        assert!(!is_panel_input(&WindowEvent::CloseRequested));
    }
}
