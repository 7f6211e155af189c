use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use clap::Parser;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod config;
mod error;
mod math;
mod renderer;
mod ui;
mod video;

use config::Args;
use math::tessellate;
use renderer::{FrameInputs, RenderContext, Trackball, checkerboard};
use ui::{FpsCounter, FrameStats, UiActions, UiState, apply_theme, draw_help_overlay, draw_side_panel};
use video::{VideoFrame, VideoFrameSource};

struct App {
    window_size: PhysicalSize<u32>,
    surface_image: VideoFrame,

    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    trackball: Trackball,
    ui_state: UiState,
    video: Box<dyn VideoFrameSource>,

    fps: FpsCounter,
    stats: FrameStats,
    last_frame: Instant,
}

impl App {
    fn new(args: &Args, video: Box<dyn VideoFrameSource>, surface_image: VideoFrame) -> Self {
        let now = Instant::now();
        Self {
            window_size: PhysicalSize::new(args.width, args.height),
            surface_image,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            trackball: Trackball::default(),
            ui_state: UiState::from_args(args),
            video,

            fps: FpsCounter::new(now),
            stats: FrameStats::default(),
            last_frame: now,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> error::Result<()> {
        let gpu = pollster::block_on(RenderContext::new(
            window.clone(),
            &self.surface_image,
            self.ui_state.vsync_enabled,
        ))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn update(&mut self) {
        let now = Instant::now();
        self.stats.frame_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.stats.fps = self.fps.tick(now);
        self.last_frame = now;

        if self.ui_state.surface_needs_rebuild {
            self.rebuild_surface();
        }

        let Some(gpu) = &mut self.gpu else { return };
        let frame = self.video.current_frame();
        gpu.update_video(&frame);
        self.stats.video_size = (frame.width, frame.height);
        self.stats.video_live = !frame.is_placeholder();
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let stats = self.stats;
        let (yaw, pitch) = (self.trackball.yaw, self.trackball.pitch);
        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, &stats);
            draw_help_overlay(ctx, yaw, pitch);
        });

        self.handle_ui_actions(ui_actions);

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, shutting down");
                event_loop.exit();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface texture timed out, skipping frame");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let inputs = FrameInputs {
            rotation: self.trackball.rotation_matrix(),
            stereo: self.ui_state.stereo_config(gpu.aspect_ratio()),
        };

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render(&view, &mut encoder, &inputs);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if actions.reset_rotation {
            self.trackball.reset();
        }

        if actions.vsync_changed {
            if let Some(gpu) = &mut self.gpu {
                gpu.set_vsync(self.ui_state.vsync_enabled);
            }
        }

        if actions.rebuild_surface {
            self.rebuild_surface();
        }
    }

    fn rebuild_surface(&mut self) {
        let Some(gpu) = &mut self.gpu else { return };
        let geometry = tessellate(self.ui_state.max_r, self.ui_state.step);
        gpu.replace_surface(&geometry);
        self.stats.triangles = geometry.triangle_count();
        self.ui_state.surface_needs_rebuild = false;
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyR => self.trackball.reset(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Anaglyph Surface")
            .with_inner_size(self.window_size);

        let result = event_loop
            .create_window(window_attrs)
            .map_err(|e| error::Error::Window(e.to_string()))
            .and_then(|window| self.init_gpu(Arc::new(window)));

        if let Err(e) = result {
            log::error!("failed to initialise renderer: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::MouseInput {
            button: MouseButton::Left,
            state: ElementState::Released,
            ..
        } = event
        {
            self.trackball.release();
        }

        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(event_loop, key);
                    }
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if self.trackball.press(Instant::now()) {
                    log::debug!("rotation reset by double-click");
                }
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render(event_loop);
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.trackball
                .process_mouse_movement(Vec2::new(delta.0 as f32, delta.1 as f32));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    args.validate()?;
    log::info!(
        "max_r={} step={} eye_separation={} convergence={} fov={} near={}",
        args.max_r,
        args.step,
        args.eye_separation,
        args.convergence,
        args.fov,
        args.near
    );

    let video = video::open_source(&args).context("opening video source")?;

    let surface_image = match &args.texture {
        Some(path) => video::still::load_rgba(path, 1).context("loading surface texture")?,
        None => checkerboard(256, 8),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&args, video, surface_image);
    event_loop.run_app(&mut app)?;

    Ok(())
}
