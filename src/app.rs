//! Window, event loop and per-frame driver for one [`Demo`]

use cgmath::{Deg, Vector3};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    clock::FrameClock,
    config::AppConfig,
    error::AppError,
    gfx::{
        camera::{CameraManager, OrbitCamera},
        rendering::RenderEngine,
        scene::Scene,
    },
    performance::PerformanceMonitor,
    scenes::Demo,
    ui::UiManager,
};

/// Runs a demo in its own window
///
/// ```no_run
/// use cubist::{scenes::SpinnerDemo, AppConfig, CubistApp};
///
/// fn main() -> anyhow::Result<()> {
///     let mut app = CubistApp::new(AppConfig::new("Spinning Cube"))?;
///     app.attach_demo(SpinnerDemo::new());
///     app.run()?;
///     Ok(())
/// }
/// ```
pub struct CubistApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    demo: Option<Box<dyn Demo>>,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Option<Scene>,
    clock: FrameClock,
    performance: PerformanceMonitor,
    /// First fatal error; ends the event loop
    error: Option<AppError>,
}

impl CubistApp {
    /// Creates the event loop; the window opens when [`CubistApp::run`] starts it
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                demo: None,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: None,
                clock: FrameClock::new(),
                performance: PerformanceMonitor::new(),
                error: None,
            },
        })
    }

    /// Sets the demo to run, replacing any earlier one
    pub fn attach_demo<D: Demo + 'static>(&mut self, demo: D) {
        log::info!("Attached demo: {}", demo.name());
        self.app_state.demo = Some(Box::new(demo));
    }

    /// Runs until the window closes
    ///
    /// # Errors
    /// Returns [`AppError`] when the event loop fails or the window or
    /// renderer cannot be created.
    pub fn run(mut self) -> Result<(), AppError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn default_camera(aspect: f32) -> CameraManager {
        let camera = OrbitCamera::looking_at(
            Vector3::new(0.0, 0.0, 25.0),
            Vector3::new(0.0, 0.0, 0.0),
            aspect,
        )
        .with_fovy(Deg(45.0));
        CameraManager::fixed(camera)
    }

    fn set_focus(&mut self, focused: bool) {
        if focused {
            self.clock.start();
        } else {
            self.clock.stop();
            self.performance.pause();
        }
        log::debug!("Window focus: {}", focused);
    }

    fn redraw(&mut self) {
        let AppState {
            config,
            demo,
            window: Some(window),
            render_engine: Some(render_engine),
            ui_manager: Some(ui_manager),
            scene: Some(scene),
            clock,
            performance,
            ..
        } = self
        else {
            return;
        };

        let delta = clock.delta();
        if let Some(demo) = demo.as_mut() {
            demo.update(delta, scene);
        }
        scene.update();
        performance.update_render_stats(scene.get_statistics());

        let show_stats = config.show_stats;
        let monitor = &*performance;
        ui_manager.update_logic(window, |ui| {
            if let Some(demo) = demo.as_mut() {
                demo.render_ui(ui, scene);
            }
            if show_stats {
                monitor.render_overlay(ui);
            }
        });

        render_engine.render_frame(
            scene,
            Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui_manager.render_display_only(device, queue, encoder, view);
                },
            ),
        );

        performance.record_frame();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => return self.fail(event_loop, error.into()),
        };

        let PhysicalSize { width, height } = window.inner_size();
        let (width, height) = (width.max(1), height.max(1));

        let renderer = match pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
        )) {
            Ok(renderer) => renderer,
            Err(error) => return self.fail(event_loop, error.into()),
        };

        let aspect = width as f32 / height as f32;
        let camera_manager = match self.demo.as_ref() {
            Some(demo) => demo.camera(aspect),
            None => Self::default_camera(aspect),
        };
        let mut scene = Scene::new(camera_manager);
        scene.camera_manager.resize(width, height);
        if let Some(demo) = self.demo.as_mut() {
            demo.initialize(&mut scene);
        }

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        self.clock.start();
        self.scene = Some(scene);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let WindowEvent::Focused(focused) = event {
            self.set_focus(focused);
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event: key, .. } => {
                if let KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                } = key
                {
                    event_loop.exit();
                } else if let Some(scene) = self.scene.as_mut() {
                    scene.camera_manager.process_keyboard_event(&key);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera_manager.resize(width, height);
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let (Some(window), Some(scene)) = (self.window.as_ref(), self.scene.as_mut()) else {
            return;
        };

        // Camera stays still while the UI has the pointer
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }

        scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
