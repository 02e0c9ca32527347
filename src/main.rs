//! Diorama - island weather viewer

use std::sync::{Arc, Mutex as StdMutex};

use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use diorama::core::{input::InputState, logging, time::FrameTimer};
use diorama::overlay::{AppDebugHandler, RemoteOverlay, SharedDebugState, panel_hint};
use diorama::render::{GpuContext, SceneRenderer};
use diorama::scene::{CursorMode, FrameOrchestrator, ProgramSettings, SceneConfig, SceneState, ViewerConfig};

const EXIT_WINDOW: i32 = 1;
const EXIT_GPU: i32 = 2;

/// Report an initialization failure and stop without cleanup
fn fatal(code: i32, message: &str) -> ! {
    log::error!("{}", message);
    println!("{}", message);
    std::process::exit(code);
}

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<SceneRenderer>,
    orchestrator: FrameOrchestrator,
    overlay: RemoteOverlay,
    input: InputState,
    timer: FrameTimer,
}

impl App {
    fn new(config: ViewerConfig, debug_state: Arc<StdMutex<SharedDebugState>>) -> Self {
        let settings = ProgramSettings::load(&config.settings_path);
        let mut rng = StdRng::from_entropy();
        let state = SceneState::new(SceneConfig::default(), &settings, &mut rng);

        let mut orchestrator = FrameOrchestrator::new(state, rng);
        orchestrator.resize(config.width, config.height);

        Self {
            config,
            window: None,
            gpu: None,
            renderer: None,
            orchestrator,
            overlay: RemoteOverlay::new(debug_state),
            input: InputState::new(),
            timer: FrameTimer::new(),
        }
    }

    fn apply_cursor(&mut self, mode: CursorMode) {
        let Some(window) = &self.window else {
            return;
        };
        match mode {
            CursorMode::Grabbed => {
                window
                    .set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
                    .ok();
                window.set_cursor_visible(false);
            }
            CursorMode::Released => {
                window.set_cursor_grab(CursorGrabMode::None).ok();
                window.set_cursor_visible(true);
            }
        }
        self.input.set_mouse_captured(mode == CursorMode::Grabbed);
    }

    /// Cursor mode that matches the overlay: free while it is shown
    fn overlay_cursor(&self) -> CursorMode {
        if self.orchestrator.state().overlay_enabled {
            CursorMode::Released
        } else {
            CursorMode::Grabbed
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.timer.tick();
        let (Some(gpu), Some(renderer)) = (&mut self.gpu, &mut self.renderer) else {
            return;
        };

        self.overlay.begin_frame();
        renderer.begin_frame();
        let outcome = self
            .orchestrator
            .frame(self.timer.elapsed_secs(), &self.input, renderer, &mut self.overlay);

        if let Err(e) = renderer.present(gpu) {
            log::error!("Render failed: {}", e);
            event_loop.exit();
        }
        self.overlay.end_frame(self.orchestrator.state(), self.timer.fps_stats());

        if let Some(mode) = outcome.cursor {
            self.apply_cursor(mode);
        }
        if outcome.exit {
            event_loop.exit();
        }

        if let Some(window) = &self.window {
            let state = self.orchestrator.state();
            window.set_title(&format!(
                "{} - {:.1} FPS | {} | {}, R=weather, P/L=lamps, C=crash, Esc=quit",
                self.config.title,
                self.timer.fps(),
                state.weather,
                panel_hint(self.config.debug_server, self.config.debug_port),
            ));
        }

        self.input.end_frame();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => fatal(EXIT_WINDOW, &format!("Failed to create window: {}", e)),
        };

        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => fatal(EXIT_GPU, &format!("Failed to create GPU context: {}", e)),
        };

        let size = window.inner_size();
        self.orchestrator.resize(size.width, size.height);
        log::info!("Window created: {}x{}", size.width, size.height);

        let renderer = SceneRenderer::new(&gpu, &self.config);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.apply_cursor(self.overlay_cursor());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
                self.orchestrator.resize(size.width, size.height);
            }
            WindowEvent::Focused(true) => {
                self.apply_cursor(self.overlay_cursor());
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let settings = self.orchestrator.state().settings();
        match settings.save(&self.config.settings_path) {
            Ok(()) => log::info!("Saved settings to {}", self.config.settings_path.display()),
            Err(e) => log::error!("Failed to save settings: {}", e),
        }
    }
}

fn start_debug_server(state: Arc<StdMutex<SharedDebugState>>, port: u16) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Debug server disabled, no tokio runtime: {}", e);
                return;
            }
        };
        rt.block_on(async {
            let handler = Arc::new(tokio::sync::Mutex::new(AppDebugHandler { state }));
            let _server = diorama_debug::DebugServer::start(handler, port);
            log::info!("Debug server started on port {}", port);
            // Keep runtime alive forever
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
        });
    });
}

fn main() {
    logging::init();
    log::info!("Diorama starting...");

    let args: Vec<String> = std::env::args().collect();
    let config = ViewerConfig::from_args(&args).unwrap_or_else(|e| {
        log::error!("{}; using defaults", e);
        ViewerConfig::default()
    });
    log::info!("Resources from {}", config.resource_dir.display());

    let debug_state = Arc::new(StdMutex::new(SharedDebugState::default()));
    if config.debug_server {
        start_debug_server(debug_state.clone(), config.debug_port);
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => fatal(EXIT_WINDOW, &format!("Failed to create event loop: {}", e)),
    };
    let mut app = App::new(config, debug_state);

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(EXIT_WINDOW);
    }
}
