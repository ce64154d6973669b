// ============================================================================
// app.rs — Ping, Pong!
// Application state and the winit event-loop handler. Each redraw runs one
// Input → Update → Render frame.
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes},
};

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::input::{self, Binding, KeysHeld};
use crate::renderer::{SpriteRenderer, SpriteTextures};
use crate::texture::SpriteTexture;
use crate::world::WorldState;

// ======================== Application ========================

pub struct App {
    config: GameConfig,
    state: Option<AppState>,
    error: Option<String>,
}

struct AppState {
    // GPU
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: SpriteRenderer,

    // Window
    window: Arc<Window>,

    // Game
    world: WorldState,
    keys: KeysHeld,

    // Timing
    last_frame: Instant,
    fps: f32,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
            error: None,
        }
    }

    /// Outcome of the run once the event loop has returned.
    pub fn finish(self) -> Result<(), String> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }

        match init_state(event_loop, &self.config) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                self.error = Some(format!("Initialization failed: {err}"));
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        if state.world.is_running() {
            state.window.request_redraw();
        } else {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => state.world.request_quit(),

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(binding) = Binding::from_key_code(code) else {
                    return;
                };
                let pressed = event.state.is_pressed();
                if binding == Binding::Quit {
                    if pressed {
                        state.world.request_quit();
                    }
                } else {
                    state.keys.set(binding, pressed);
                }
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    state.surface_config.width = new_size.width;
                    state.surface_config.height = new_size.height;
                    state.surface.configure(&state.device, &state.surface_config);
                }
            }

            WindowEvent::RedrawRequested => {
                if state.world.is_running() {
                    redraw(state);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            match state.world.end() {
                Some(end) => log::info!(
                    "Game over after {} frames: {}",
                    state.world.frame,
                    end.describe()
                ),
                None => log::info!("Event loop closed after {} frames", state.world.frame),
            }
            log::info!("Shutting down (last fps {:.0})", state.fps);
            // GPU resources and the window are released here.
            drop(state);
        }
    }
}

// ======================== Initialization ========================

fn init_state(event_loop: &ActiveEventLoop, config: &GameConfig) -> Result<AppState, String> {
    let window_attrs = WindowAttributes::default()
        .with_title(config.window_title.as_str())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window_width,
            config.window_height,
        ))
        .with_resizable(false);

    let window = Arc::new(
        event_loop
            .create_window(window_attrs)
            .map_err(|e| format!("Failed to create window: {e}"))?,
    );

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let surface = instance
        .create_surface(window.clone())
        .map_err(|e| format!("Failed to create surface: {e}"))?;

    let (device, queue, surface_config) =
        pollster::block_on(init_gpu(&instance, &surface, &window))?;
    surface.configure(&device, &surface_config);

    let textures = load_textures(&device, &queue, config)?;
    let camera = Camera::orthographic(Vec2::from(config.field_half_extents));
    let renderer = SpriteRenderer::new(
        &device,
        surface_config.format,
        &camera,
        textures,
        config.clear_color,
    );

    log::info!(
        "Ping, Pong! initialized: {}x{} window, speed {:.1}",
        surface_config.width,
        surface_config.height,
        config.speed
    );

    Ok(AppState {
        device,
        queue,
        surface,
        surface_config,
        renderer,
        window,
        world: WorldState::new(config),
        keys: KeysHeld::default(),
        last_frame: Instant::now(),
        fps: 0.0,
    })
}

async fn init_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    window: &Window,
) -> Result<(wgpu::Device, wgpu::Queue, wgpu::SurfaceConfiguration), String> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| String::from("Failed to find a suitable GPU adapter"))?;

    log::info!("GPU: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ping_pong_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .map_err(|e| format!("Failed to create device: {e}"))?;

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .copied()
        .or_else(|| surface_caps.formats.first().copied())
        .ok_or_else(|| String::from("Surface reports no supported formats"))?;

    // Presenting waits for vsync.
    log::info!("Present mode: AutoVsync");

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    Ok((device, queue, surface_config))
}

/// Both paddles share the paddle image; each gets its own texture.
fn load_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    config: &GameConfig,
) -> Result<SpriteTextures, String> {
    let load = |path: &std::path::Path| {
        SpriteTexture::load(device, queue, path)
            .map_err(|e| format!("{e} (check the sprite path in the config)"))
    };

    Ok(SpriteTextures {
        right_paddle: load(config.paddle_texture.as_path())?,
        left_paddle: load(config.paddle_texture.as_path())?,
        ball: load(config.ball_texture.as_path())?,
    })
}

// ======================== Frame ========================

fn redraw(state: &mut AppState) {
    let now = Instant::now();
    let dt = now.duration_since(state.last_frame).as_secs_f32();
    state.last_frame = now;
    if dt > 0.0 {
        state.fps = state.fps * 0.95 + (1.0 / dt) * 0.05;
    }

    // ---- Input ----
    input::apply_keys(&mut state.world, &state.keys, dt);

    // ---- Update ----
    state.world.update(dt);

    // ---- Render ----
    state.renderer.prepare(&state.queue, &state.world);

    let output = match state.surface.get_current_texture() {
        Ok(t) => t,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            state.surface.configure(&state.device, &state.surface_config);
            return;
        }
        Err(e) => {
            log::error!("Surface error: {:?}", e);
            return;
        }
    };

    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = state
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });
    state.renderer.render(&mut encoder, &view);
    state.queue.submit(std::iter::once(encoder.finish()));

    state.window.pre_present_notify();
    output.present();
}
