//! Window management module
//!
//! Opens a winit window with a wgpu surface, translates input into
//! [`Event`]s and calls the frame callback once per display refresh.

pub mod event;
pub mod frame_io;
pub mod settings;

pub use event::{Event, MouseButton};
pub use frame_io::{FrameInput, FrameOutput};
pub use settings::WindowSettings;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::context::WgpuContext;
use crate::renderer::viewer::Viewport;
use crate::viewport::Resizable;

/// A window with GPU rendering context.
pub struct Window {
    settings: WindowSettings,
}

impl Window {
    /// Create a new window with the given settings.
    pub fn new(settings: WindowSettings) -> Self {
        Self { settings }
    }

    /// Run the render loop with a callback until the window closes or the
    /// callback asks to exit.
    ///
    /// The callback receives a `FrameInput` and should return a `FrameOutput`.
    pub fn render_loop<F, S>(self, state: S, callback: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput + 'static,
        S: 'static,
    {
        let event_loop = EventLoop::new()?;
        // Redraws are requested from about_to_wait; vsync paces them.
        event_loop.set_control_flow(ControlFlow::Wait);

        let now = Instant::now();
        let mut app = App {
            settings: self.settings,
            state,
            callback,
            graphics: None,
            init_error: None,
            events: Vec::new(),
            start_time: now,
            last_frame_time: now,
            mouse_position: (0.0, 0.0),
            render_scale: 1.0,
        };

        event_loop.run_app(&mut app)?;
        match app.init_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The window surface and its configuration.
struct WindowSurface {
    ctx: WgpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl WindowSurface {
    fn configure(&self) {
        self.surface.configure(&self.ctx.device, &self.config);
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }
}

impl Resizable for WindowSurface {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.configure();
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

struct Graphics {
    window: Arc<winit::window::Window>,
    surface: WindowSurface,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> anyhow::Result<Self> {
        let window_attrs = winit::window::WindowAttributes::default()
            .with_title(&settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(settings.size.0, settings.size.1))
            .with_resizable(settings.resizable);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let ctx = WgpuContext::new_blocking(&instance, Some(&surface))?;

        let size = window.inner_size();
        let (width, height) =
            settings.render_size((size.width, size.height), window.scale_factor());
        let caps = surface.get_capabilities(&ctx.adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: settings.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let surface = WindowSurface {
            ctx,
            surface,
            config,
        };
        surface.configure();
        tracing::info!(
            width = surface.config.width,
            height = surface.config.height,
            format = ?format,
            scale_factor = window.scale_factor(),
            "window surface ready"
        );

        Ok(Self { window, surface })
    }
}

struct App<S, F> {
    settings: WindowSettings,
    state: S,
    callback: F,
    graphics: Option<Graphics>,
    init_error: Option<anyhow::Error>,
    events: Vec<Event>,
    start_time: Instant,
    last_frame_time: Instant,
    mouse_position: (f32, f32),
    /// Render pixels per physical pixel; pointer positions are scaled by it.
    render_scale: f64,
}

impl<S, F> App<S, F>
where
    F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput + 'static,
    S: 'static,
{
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        let now = Instant::now();
        let elapsed_time = (now - self.start_time).as_secs_f64();
        let delta_time = (now - self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;

        let surface = &mut graphics.surface;
        let surface_texture = match surface.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure();
                return;
            }
            Err(e) => {
                tracing::error!(error = ?e, "surface error");
                return;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame_input = FrameInput {
            events: std::mem::take(&mut self.events),
            elapsed_time,
            delta_time,
            viewport: surface.viewport(),
            ctx: &surface.ctx,
            surface_view: &view,
            surface_format: surface.config.format,
        };

        let output = (self.callback)(&mut self.state, frame_input);

        surface_texture.present();

        if output.exit {
            event_loop.exit();
        }
    }

    fn push_button(&mut self, state: ElementState, button: winit::event::MouseButton) {
        let Some(button) = MouseButton::from_winit(button) else {
            return;
        };
        let position = self.mouse_position;
        self.events.push(match state {
            ElementState::Pressed => Event::MousePress {
                button,
                position,
                handled: false,
            },
            ElementState::Released => Event::MouseRelease {
                button,
                position,
                handled: false,
            },
        });
    }
}

impl<S, F> ApplicationHandler for App<S, F>
where
    F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput + 'static,
    S: 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match Graphics::new(event_loop, &self.settings) {
            Ok(graphics) => {
                self.render_scale = self.settings.render_scale(graphics.window.scale_factor());
                let (width, height) = graphics.surface.size();
                // The first frame sizes the camera and targets.
                self.events.push(Event::Resize { width, height });
                self.graphics = Some(graphics);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to initialise graphics");
                self.init_error = Some(err);
                event_loop.exit();
                return;
            }
        }

        self.start_time = Instant::now();
        self.last_frame_time = self.start_time;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let Some(graphics) = &mut self.graphics else {
                    return;
                };
                let scale_factor = graphics.window.scale_factor();
                self.render_scale = self.settings.render_scale(scale_factor);
                let (width, height) =
                    self.settings.render_size((size.width, size.height), scale_factor);
                graphics.surface.resize(width, height);
                self.events.push(Event::Resize { width, height });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // winit follows up with a Resized carrying the new size.
                self.render_scale = self.settings.render_scale(scale_factor);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let old_position = self.mouse_position;
                let scale = self.render_scale;
                self.mouse_position = ((position.x * scale) as f32, (position.y * scale) as f32);
                self.events.push(Event::MouseMotion {
                    delta: (
                        self.mouse_position.0 - old_position.0,
                        self.mouse_position.1 - old_position.1,
                    ),
                    position: self.mouse_position,
                    handled: false,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.push_button(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.events.push(Event::MouseWheel {
                    delta: event::wheel_delta(delta),
                    position: self.mouse_position,
                    handled: false,
                });
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}
