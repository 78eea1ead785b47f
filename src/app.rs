//! # Application
//!
//! Winit application handler around the built scene: creates the window and
//! render engine on `resumed`, routes input to the UI and the orbit camera,
//! applies pending resizes and swaps in the floor texture once it is decoded.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::SceneConfig,
    error::{GeodomeError, Result},
    gfx::{
        camera::{resize_view, Viewport},
        resources::{PendingTexture, TextureStatus},
        scene::Scene,
        RenderEngine,
    },
    scene_builder::{SceneBuilder, FLOOR_MATERIAL},
    ui::{scene_info_panel, UiManager},
};

/// State of the floor texture over the application's lifetime
pub enum FloorTexture {
    Loading(PendingTexture),
    Applied,
    /// Decoding failed; floors keep their untextured color
    Fallback,
}

impl FloorTexture {
    pub fn label(&self) -> &'static str {
        match self {
            FloorTexture::Loading(_) => "loading",
            FloorTexture::Applied => "wood texture",
            FloorTexture::Fallback => "untextured",
        }
    }

    /// Polls the decode worker and binds the texture once it arrives
    ///
    /// A failed load is logged and leaves the floor material untouched.
    pub fn poll(&mut self, render_engine: &RenderEngine, scene: &mut Scene) {
        let FloorTexture::Loading(pending) = self else {
            return;
        };

        match pending.poll() {
            TextureStatus::Loading => {}
            TextureStatus::Ready(image) => {
                let texture = render_engine.upload_texture(&image);
                let name = image.path.display().to_string();
                if scene
                    .material_manager
                    .apply_texture(FLOOR_MATERIAL, &name, texture)
                {
                    render_engine.sync_materials(scene);
                    log::info!(
                        "Floor texture {} ({}x{}) applied",
                        name,
                        image.width,
                        image.height
                    );
                    *self = FloorTexture::Applied;
                } else {
                    log::warn!("No '{}' material to receive the floor texture", FLOOR_MATERIAL);
                    *self = FloorTexture::Fallback;
                }
            }
            TextureStatus::Failed(e) => {
                log::warn!("{}; floors stay untextured", e);
                *self = FloorTexture::Fallback;
            }
        }
    }
}

type UiOverlay = fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView);

pub struct GeodomeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window_size: (u32, u32),
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    viewport: Viewport,
    pending_resize: Option<PhysicalSize<u32>>,
    floor_texture: FloorTexture,
    error: Option<GeodomeError>,
}

impl GeodomeApp {
    /// Builds the scene and starts decoding the floor texture
    ///
    /// # Errors
    /// Fails on invalid dome descriptors, infeasible interiors or when no
    /// event loop can be created.
    pub fn new(config: SceneConfig) -> Result<Self> {
        let built = SceneBuilder::new(&config).build()?;
        let event_loop = EventLoop::new()?;
        let floor_texture =
            FloorTexture::Loading(PendingTexture::spawn(config.floor_texture.clone()));

        let (width, height) = config.window_size;
        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window_size: config.window_size,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: built.scene,
                viewport: Viewport::new(width, height),
                pending_resize: None,
                floor_texture,
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    ///
    /// # Errors
    /// Returns the first fatal error raised while the loop was running.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GeodomeError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.window_size;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title("Geodesic Domes")
                    .with_inner_size(LogicalSize::new(width, height)),
            )?,
        );

        let size = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            size.width,
            size.height,
        ))?;
        renderer.prepare_scene(&mut self.scene);
        resize_view(
            &mut self.viewport,
            &mut self.scene.camera_manager.camera,
            size.width,
            size.height,
        );

        self.ui_manager = Some(UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        ));
        self.render_engine = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine)) =
            (self.window.as_ref(), self.render_engine.as_mut())
        else {
            return;
        };

        if let Some(size) = self.pending_resize.take() {
            if resize_view(
                &mut self.viewport,
                &mut self.scene.camera_manager.camera,
                size.width,
                size.height,
            ) {
                render_engine.resize(size.width, size.height);
            }
        }

        self.floor_texture.poll(render_engine, &mut self.scene);

        self.scene.update();
        render_engine.update(self.scene.camera_manager.camera.uniform, &self.scene.light);

        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let floor_label = self.floor_texture.label();
                ui_manager.build_frame(window, |ui| {
                    scene_info_panel(ui, &mut self.scene, floor_label);
                });
                render_engine.render_frame(
                    &self.scene,
                    Some(
                        |device: &wgpu::Device,
                         queue: &wgpu::Queue,
                         encoder: &mut wgpu::CommandEncoder,
                         view: &wgpu::TextureView| {
                            ui_manager.render_overlay(device, queue, encoder, view);
                        },
                    ),
                )
            }
            None => render_engine.render_frame(&self.scene, None::<UiOverlay>),
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, dropping frame");
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
            && event.state == ElementState::Pressed
        {
            event_loop.exit();
            return;
        }

        let ui_wants_keyboard = self
            .ui_manager
            .as_ref()
            .is_some_and(|ui| ui.wants_keyboard());
        if !ui_wants_keyboard {
            self.scene.camera_manager.process_keyboard_event(event);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                // Key releases still reach the camera so Shift cannot stick
                let is_key_release = matches!(
                    &event,
                    WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Released
                );
                if !is_key_release {
                    window.request_redraw();
                    return;
                }
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(size) => {
                // Applied at the start of the next redraw
                self.pending_resize = Some(size);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Check if UI wants to capture input before processing camera events
        if self.ui_manager.as_ref().is_some_and(|ui| ui.wants_mouse()) {
            return;
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
