//! glow + Dear ImGui demo driving the frame-surface core.
//!
//! Creates an OpenGL 4.6 core-profile window (24-bit depth, 4x MSAA), seeds
//! the fixed scene geometry, and renders on a 20 ms timer: raw points and one
//! indirect indexed draw first, then the Dear ImGui overlay with the demo
//! window and a "Controls" panel holding the point-size slider.

use std::{num::NonZeroU32, path::Path, rc::Rc, sync::Arc, time::Instant};

use dear_imgui_glow::GlowRenderer;
use dear_imgui_rs::{Condition, Context};
use dear_imgui_winit::WinitPlatform;
use frame_surface::{
    FrameSurface, POINT_SIZE_MAX, POINT_SIZE_MIN, SceneGeometry, ShaderSources, SurfaceConfig,
};
use glow::HasContext;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, PossiblyCurrentGlContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface},
};
use raw_window_handle::HasWindowHandle;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 800;

struct ImguiState {
    context: Context,
    platform: WinitPlatform,
    renderer: GlowRenderer,
    demo_open: bool,
    last_frame: Instant,
}

struct AppWindow {
    window: Arc<Window>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: Rc<glow::Context>,
    frame_surface: FrameSurface,
    imgui: ImguiState,
}

struct App {
    config: SurfaceConfig,
    window: Option<AppWindow>,
    next_redraw: Instant,
}

impl App {
    fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            window: None,
            next_redraw: Instant::now(),
        }
    }
}

impl AppWindow {
    fn new(
        event_loop: &ActiveEventLoop,
        config: &SurfaceConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        // Create window with OpenGL context
        let window_attributes = winit::window::Window::default_attributes()
            .with_title("Frame surface (glow + Dear ImGui)")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64));

        let template = ConfigTemplateBuilder::new()
            .with_depth_size(config.depth_buffer_bits)
            .with_multisampling(config.multisample_count);

        let (window, cfg) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, |mut configs| configs.next().unwrap())?;

        let window = Arc::new(window.unwrap());

        let (major, minor) = config.gl_version;
        let context_attribs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(window.window_handle()?.as_raw()));
        let context = unsafe { cfg.display().create_context(&cfg, &context_attribs)? };

        let surface_attribs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.window_handle()?.as_raw(),
            NonZeroU32::new(WINDOW_WIDTH).unwrap(),
            NonZeroU32::new(WINDOW_HEIGHT).unwrap(),
        );
        let surface = unsafe {
            cfg.display()
                .create_window_surface(&cfg, &surface_attribs)?
        };

        let context = context.make_current(&surface)?;

        // Setup Dear ImGui
        let mut imgui_context = Context::create();
        imgui_context.set_ini_filename(None::<String>).unwrap();

        let mut platform = WinitPlatform::new(&mut imgui_context);
        platform.attach_window(
            &window,
            dear_imgui_winit::HiDpiMode::Default,
            &mut imgui_context,
        );

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| {
                context.display().get_proc_address(s).cast()
            })
        };

        let mut renderer = GlowRenderer::new(gl, &mut imgui_context)?;
        let gl = renderer
            .gl_context()
            .cloned()
            .ok_or("imgui renderer did not take ownership of the GL context")?;

        // Scene program and GPU resources; a shader compile failure is fatal.
        let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        let sources =
            ShaderSources::load(shader_dir.join("scene.vert"), shader_dir.join("scene.frag"))?;
        let frame_surface = FrameSurface::new(&gl, &sources, &SceneGeometry::default(), config)?;

        renderer.new_frame()?;

        let imgui = ImguiState {
            context: imgui_context,
            platform,
            renderer,
            demo_open: true,
            last_frame: Instant::now(),
        };

        Ok(Self {
            window,
            surface,
            context,
            gl,
            frame_surface,
            imgui,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface.resize(
                &self.context,
                NonZeroU32::new(new_size.width).unwrap(),
                NonZeroU32::new(new_size.height).unwrap(),
            );
            unsafe {
                self.gl
                    .viewport(0, 0, new_size.width as i32, new_size.height as i32);
            }
        }
    }

    fn render(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let now = Instant::now();
        let delta_time = now - self.imgui.last_frame;
        self.imgui
            .context
            .io_mut()
            .set_delta_time(delta_time.as_secs_f32());
        self.imgui.last_frame = now;

        self.imgui
            .platform
            .prepare_frame(&self.window, &mut self.imgui.context);

        // Raw geometry first; the UI pass below draws on top of it.
        self.frame_surface.render_scene(&self.gl)?;

        let ui = self.imgui.context.frame();

        if self.imgui.demo_open {
            ui.show_demo_window(&mut self.imgui.demo_open);
        }

        ui.window("Controls")
            .size([260.0, 80.0], Condition::FirstUseEver)
            .build(|| {
                let mut point_size = self.frame_surface.point_size() as i32;
                if ui.slider_i32(
                    "Point size",
                    &mut point_size,
                    POINT_SIZE_MIN as i32,
                    POINT_SIZE_MAX as i32,
                ) {
                    // Takes effect with the next frame's scene pass.
                    self.frame_surface.set_point_size(point_size as f32);
                }
            });

        self.imgui
            .platform
            .prepare_render_with_ui(&ui, &self.window);
        let draw_data = self.imgui.context.render();

        self.imgui.renderer.new_frame()?;
        self.imgui.renderer.render(&draw_data)?;

        self.frame_surface.finish_frame();
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    /// Releases the scene's GPU resources on the owning context. The imgui
    /// renderer frees its own objects when dropped.
    fn shutdown(&mut self) {
        if let Err(err) = self.context.make_current(&self.surface) {
            warn!("could not make the GL context current for teardown: {err}");
        }
        self.frame_surface.shutdown(&self.gl);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match AppWindow::new(event_loop, &self.config) {
                Ok(window) => {
                    // First paint happens right away; the timer takes over after.
                    window.window.request_redraw();
                    self.window = Some(window);
                    self.next_redraw = Instant::now() + self.config.redraw_interval;
                    info!("window created");
                }
                Err(err) => {
                    error!("failed to create window: {err}");
                    event_loop.exit();
                }
            }
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(window) = self.window.as_mut() {
                // The timer only requests a repaint; rendering happens when
                // the redraw event is delivered.
                if window.frame_surface.tick() {
                    window.window.request_redraw();
                }
            }
            self.next_redraw = Instant::now() + self.config.redraw_interval;
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let window = match self.window.as_mut() {
            Some(window) => window,
            None => return,
        };

        // Let ImGui see the event first
        let full_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        window
            .imgui
            .platform
            .handle_event(&mut window.imgui.context, &window.window, &full_event);

        match event {
            WindowEvent::Resized(physical_size) => {
                window.resize(physical_size);
                window.window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                window.shutdown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    window.shutdown();
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = window.render() {
                    error!("render error: {err}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_redraw));
    }
}

fn main() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "frame_surface=info,frame_surface_demo=info,warn".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let event_loop = EventLoop::new().unwrap();

    let mut app = App::new(SurfaceConfig::default());
    event_loop.run_app(&mut app).unwrap();
}
