use std::sync::Arc;

use crate::error::{Error, Result};
use crate::math::{GeometryBuffer, video_quad};
use crate::renderer::anaglyph::{FRAME_PASSES, FrameInputs, Layer, layer_uniform};
use crate::renderer::camera::DrawUniform;
use crate::renderer::mesh::{GpuMesh, position_layout, tex_coord_layout};
use crate::renderer::texture::{FrameTexture, linear_sampler, texture_bind_group_layout};
use crate::video::VideoFrame;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

struct PassResources {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    passes: [PassResources; 3],

    texture_layout: wgpu::BindGroupLayout,
    video_sampler: wgpu::Sampler,
    video_texture: FrameTexture,
    surface_texture: FrameTexture,

    video_mesh: GpuMesh,
    surface_mesh: GpuMesh,

    depth_texture: wgpu::TextureView,
}

impl RenderContext {
    pub async fn new(
        window: Arc<winit::window::Window>,
        surface_image: &VideoFrame,
        vsync: bool,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(Error::NoSurfaceFormat)?;
        log::info!("surface format {surface_format:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Anaglyph Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = texture_bind_group_layout(&device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Anaglyph Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let passes = FRAME_PASSES.map(|plan| {
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(plan.label),
                size: std::mem::size_of::<DrawUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(plan.label),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            let pipeline = create_pipeline(
                &device,
                &pipeline_layout,
                &shader,
                config.format,
                plan.label,
                plan.write_mask(),
            );

            PassResources {
                pipeline,
                uniform_buffer,
                uniform_bind_group,
            }
        });

        let video_sampler = linear_sampler(&device, "Video Sampler", wgpu::AddressMode::ClampToEdge);
        let surface_sampler = linear_sampler(&device, "Surface Sampler", wgpu::AddressMode::Repeat);

        let video_texture = FrameTexture::new(
            &device,
            &queue,
            &texture_layout,
            &video_sampler,
            "Video Texture",
            &VideoFrame::placeholder(),
        );
        let surface_texture = FrameTexture::new(
            &device,
            &queue,
            &texture_layout,
            &surface_sampler,
            "Surface Texture",
            surface_image,
        );

        let video_mesh = GpuMesh::from_geometry(&device, "Video Quad", &video_quad());
        let surface_mesh = GpuMesh::from_geometry(&device, "Surface", &GeometryBuffer::default());
        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            passes,
            texture_layout,
            video_sampler,
            video_texture,
            surface_texture,
            video_mesh,
            surface_mesh,
            depth_texture,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.present_mode = present_mode(enabled);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn replace_surface(&mut self, geometry: &GeometryBuffer) {
        self.surface_mesh = GpuMesh::from_geometry(&self.device, "Surface", geometry);
        log::debug!("surface mesh replaced: {} vertices", self.surface_mesh.vertex_count());
    }

    pub fn update_video(&mut self, frame: &VideoFrame) {
        self.video_texture.update(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.video_sampler,
            frame,
        );
    }

    pub fn render(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        inputs: &FrameInputs,
    ) {
        for (plan, pass) in FRAME_PASSES.iter().zip(&self.passes) {
            let uniform = layer_uniform(plan.layer, inputs);
            self.queue
                .write_buffer(&pass.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }

        for (plan, pass) in FRAME_PASSES.iter().zip(&self.passes) {
            let color_load = if plan.clear_color {
                wgpu::LoadOp::Clear(wgpu::Color::BLACK)
            } else {
                wgpu::LoadOp::Load
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(plan.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&pass.pipeline);
            render_pass.set_bind_group(0, &pass.uniform_bind_group, &[]);

            match plan.layer {
                Layer::Background => {
                    render_pass.set_bind_group(1, self.video_texture.bind_group(), &[]);
                    self.video_mesh.draw(&mut render_pass);
                }
                Layer::Surface(_) => {
                    render_pass.set_bind_group(1, self.surface_texture.bind_group(), &[]);
                    self.surface_mesh.draw(&mut render_pass);
                }
            }
        }
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    write_mask: wgpu::ColorWrites,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[position_layout(), tex_coord_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
