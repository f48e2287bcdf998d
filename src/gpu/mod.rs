//! wgpu renderer: surface, pipelines, cloud buffers and the egui overlay.

mod egui_integration;
mod shader;

use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use egui_integration::{EguiFrameOutput, EguiIntegration};

use crate::error::GpuError;
use crate::generator::GalaxyBuffers;
use crate::helpers::LineVertex;
use crate::scene::{BlendMode, PointsMaterial, Scene, SceneBackend, SceneGraph, SceneNode};
use crate::viewport::Viewport;
use shader::{Uniforms, SHADER_SOURCE};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// GPU side of a particle cloud: one position and one color buffer.
pub struct GpuCloud {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
    material: PointsMaterial,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    points_pipeline: wgpu::RenderPipeline,
    points_key: (BlendMode, bool),
    lines_pipeline: wgpu::RenderPipeline,
    line_buffer: Option<wgpu::Buffer>,
    line_vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    // surface pixels per drawing-buffer pixel
    pixel_scale: f32,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, viewport: &Viewport) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
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
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using GPU: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
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
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniforms = Uniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, [width as f32, height as f32]);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Galaxy Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let material = PointsMaterial::galaxy(0.01);
        let points_pipeline =
            create_points_pipeline(&device, &shader, &pipeline_layout, config.format, &material);
        let lines_pipeline = create_lines_pipeline(&device, &shader, &pipeline_layout, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            shader,
            pipeline_layout,
            points_pipeline,
            points_key: (material.blending, material.depth_write),
            lines_pipeline,
            line_buffer: None,
            line_vertex_count: 0,
            uniform_buffer,
            uniform_bind_group,
            depth_texture,
            pixel_scale: viewport.pixel_scale(height),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Upload the line geometry of every helper node in `graph`.
    ///
    /// Helpers are static, so this runs once after the scene is built.
    pub fn upload_helpers(&mut self, graph: &SceneGraph) {
        let vertices: Vec<LineVertex> = graph
            .iter()
            .flat_map(|(_, node)| match node {
                SceneNode::Axes(axes) => axes.vertices(),
                SceneNode::Grid(grid) => grid.vertices(),
                _ => Vec::new(),
            })
            .collect();

        if let Some(old) = self.line_buffer.take() {
            old.destroy();
        }
        self.line_vertex_count = vertices.len() as u32;
        if vertices.is_empty() {
            return;
        }
        self.line_buffer = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Helper Lines"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    /// Reconfigure the surface for a new physical window size.
    ///
    /// The surface always matches the window; `viewport` only decides how
    /// fixed point sizes map onto it.
    pub fn resize(&mut self, width: u32, height: u32, viewport: &Viewport) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
        self.pixel_scale = viewport.pixel_scale(self.config.height);
    }

    /// Configure the surface again with the current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn update_uniforms(&self, scene: &Scene<GpuState>) {
        let camera = scene.camera();
        let mut uniforms = Uniforms::new(
            camera.view_matrix(),
            camera.projection_matrix(),
            Mat4::IDENTITY,
            [self.config.width as f32, self.config.height as f32],
        );
        uniforms.pixel_scale = self.pixel_scale;

        if let Some((points, cloud)) = scene.live_points() {
            uniforms.model = Mat4::from_rotation_y(points.rotation_y).to_cols_array_2d();
            uniforms.point_size = cloud.material.size;
            uniforms.size_attenuation = cloud.material.size_attenuation as u32;
        }

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw the scene and, if given, the egui overlay.
    pub fn render(
        &self,
        scene: &Scene<GpuState>,
        mut overlay: Option<(&mut EguiIntegration, &EguiFrameOutput)>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let size = [self.config.width, self.config.height];
        let mut ui_commands = Vec::new();
        if let Some((egui, frame)) = overlay.as_mut() {
            let screen = frame.screen_descriptor(size);
            ui_commands = egui.prepare(&self.device, &self.queue, &mut encoder, *frame, &screen);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let Some(lines) = &self.line_buffer {
                render_pass.set_pipeline(&self.lines_pipeline);
                render_pass.set_vertex_buffer(0, lines.slice(..));
                render_pass.draw(0..self.line_vertex_count, 0..1);
            }

            if let Some((_, cloud)) = scene.live_points() {
                if cloud.count > 0 {
                    render_pass.set_pipeline(&self.points_pipeline);
                    render_pass.set_vertex_buffer(0, cloud.positions.slice(..));
                    render_pass.set_vertex_buffer(1, cloud.colors.slice(..));
                    render_pass.draw(0..6, 0..cloud.count);
                }
            }
        }

        if let Some((egui, frame)) = overlay.as_ref() {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("UI Pass"),
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
                })
                .forget_lifetime();
            egui.render(&mut render_pass, frame, &frame.screen_descriptor(size));
        }

        self.queue
            .submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }
}

impl SceneBackend for GpuState {
    type Cloud = GpuCloud;

    fn install(&mut self, buffers: &GalaxyBuffers, material: &PointsMaterial) -> GpuCloud {
        let key = (material.blending, material.depth_write);
        if key != self.points_key {
            self.points_pipeline = create_points_pipeline(
                &self.device,
                &self.shader,
                &self.pipeline_layout,
                self.config.format,
                material,
            );
            self.points_key = key;
        }

        let positions = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Positions"),
            contents: bytemuck::cast_slice(&buffers.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let colors = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Colors"),
            contents: bytemuck::cast_slice(&buffers.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        GpuCloud {
            positions,
            colors,
            count: buffers.len() as u32,
            material: *material,
        }
    }

    fn release(&mut self, cloud: GpuCloud) {
        cloud.positions.destroy();
        cloud.colors.destroy();
    }
}

fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

fn create_points_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    material: &PointsMaterial,
) -> wgpu::RenderPipeline {
    let instance_layout = |attributes: &'static [wgpu::VertexAttribute]| wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 3) as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Points Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_points"),
            buffers: &[
                instance_layout(&POSITION_ATTRIBUTES),
                instance_layout(&COLOR_ATTRIBUTES),
            ],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_points"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend_state(material.blending)),
                write_mask: wgpu::ColorWrites::ALL,
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
            depth_write_enabled: material.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_lines_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Helper Lines Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_lines"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: 12,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_lines"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
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

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
