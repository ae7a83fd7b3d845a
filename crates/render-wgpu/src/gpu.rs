use crate::shaders;
use bytemuck::{Pod, Zeroable};
use tricube_common::Rgb;
use tricube_render::{CubeBackend, CubeGeometry, CullFace, FrameUniforms, ObjectUniforms};
use wgpu::util::DeviceExt;

/// Errors from GPU setup and frame submission.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("surface has no supported formats on this adapter")]
    UnsupportedSurface,
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("shader program rejected: {0}")]
    Shader(String),
    #[error("no geometry uploaded for cube {0}")]
    UnknownCube(usize),
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct FrameBlock {
    projection: [[f32; 4]; 4],
    tint: [f32; 4],
    distortion: f32,
    distortion_speed: f32,
    light_intensity: f32,
    time: f32,
}

impl From<&FrameUniforms> for FrameBlock {
    fn from(u: &FrameUniforms) -> Self {
        let Rgb { r, g, b } = u.tint;
        Self {
            projection: u.projection.to_cols_array_2d(),
            tint: [r, g, b, 1.0],
            distortion: u.distortion,
            distortion_speed: u.distortion_speed,
            light_intensity: u.light_intensity,
            time: u.time,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct ObjectBlock {
    model_view: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
}

impl From<&ObjectUniforms> for ObjectBlock {
    fn from(u: &ObjectUniforms) -> Self {
        Self {
            model_view: u.model_view.to_cols_array_2d(),
            normal_matrix: u.normal_matrix.to_cols_array_2d(),
        }
    }
}

fn cull_mode(cull: CullFace) -> wgpu::Face {
    match cull {
        CullFace::Front => wgpu::Face::Front,
        CullFace::Back => wgpu::Face::Back,
    }
}

/// Straight-alpha "source over" for both color and alpha.
const SOURCE_OVER: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
};

/// GPU resources for one cube.
struct CubeBuffers {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    object_uniforms: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
}

/// wgpu cube renderer: one shader, two pipelines differing only in cull mode.
pub struct WgpuCubeRenderer {
    front_cull_pipeline: wgpu::RenderPipeline,
    back_cull_pipeline: wgpu::RenderPipeline,
    frame_uniforms: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    cubes: Vec<CubeBuffers>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuCubeRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        geometry: &[CubeGeometry],
    ) -> Result<Self, GpuError> {
        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
        });

        let frame_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameBlock::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniforms.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
        });
        let front_cull_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            CullFace::Front,
        );
        let back_cull_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            CullFace::Back,
        );
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            tracing::error!("cube shader failed validation: {err}");
            return Err(GpuError::Shader(err.to_string()));
        }

        let cubes = geometry
            .iter()
            .map(|g| Self::upload_cube(device, &object_layout, g))
            .collect();

        let depth_texture = Self::create_depth_texture(device, width, height);

        Ok(Self {
            front_cull_pipeline,
            back_cull_pipeline,
            frame_uniforms,
            frame_bind_group,
            cubes,
            depth_texture,
            surface_format,
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        cull: CullFace,
    ) -> wgpu::RenderPipeline {
        let label = match cull {
            CullFace::Front => "cube_front_cull_pipeline",
            CullFace::Back => "cube_back_cull_pipeline",
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 4]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![2 => Float32x4],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(SOURCE_OVER),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(cull_mode(cull)),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn upload_cube(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        geometry: &CubeGeometry,
    ) -> CubeBuffers {
        let vertex_buffer = |label: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let positions = vertex_buffer("cube_positions", bytemuck::cast_slice(&geometry.positions));
        let normals = vertex_buffer("cube_normals", bytemuck::cast_slice(&geometry.normals));
        let colors = vertex_buffer("cube_colors", bytemuck::cast_slice(&geometry.colors));

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let object_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object_uniforms"),
            contents: bytemuck::bytes_of(&ObjectBlock::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_uniforms.as_entire_binding(),
            }],
        });

        CubeBuffers {
            positions,
            normals,
            colors,
            indices,
            index_count: geometry.indices.len() as u32,
            object_uniforms,
            object_bind_group,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn cube_count(&self) -> usize {
        self.cubes.len()
    }

    /// Begin recording a frame that targets `view`.
    pub fn frame<'a>(
        &'a self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            view,
            clear: wgpu::Color::TRANSPARENT,
            draws: Vec::with_capacity(self.cubes.len() * CullFace::PASSES.len()),
            unknown_cube: None,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// One frame in flight. Uniform uploads go straight to the queue; draws are
/// collected and encoded into a single pass by `end_frame`.
pub struct WgpuFrame<'a> {
    renderer: &'a WgpuCubeRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
    clear: wgpu::Color,
    draws: Vec<(usize, CullFace)>,
    unknown_cube: Option<usize>,
}

impl CubeBackend for WgpuFrame<'_> {
    type Error = GpuError;

    fn begin_frame(&mut self, background: Rgb) {
        self.clear = wgpu::Color {
            r: background.r as f64,
            g: background.g as f64,
            b: background.b as f64,
            a: 1.0,
        };
        self.draws.clear();
    }

    fn upload_frame_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.queue.write_buffer(
            &self.renderer.frame_uniforms,
            0,
            bytemuck::bytes_of(&FrameBlock::from(uniforms)),
        );
    }

    fn upload_object_uniforms(&mut self, cube: usize, uniforms: &ObjectUniforms) {
        match self.renderer.cubes.get(cube) {
            Some(buffers) => self.queue.write_buffer(
                &buffers.object_uniforms,
                0,
                bytemuck::bytes_of(&ObjectBlock::from(uniforms)),
            ),
            None => self.unknown_cube = Some(cube),
        }
    }

    fn draw_cube(&mut self, cube: usize, cull: CullFace) {
        if cube < self.renderer.cubes.len() {
            self.draws.push((cube, cull));
        } else {
            self.unknown_cube = Some(cube);
        }
    }

    fn end_frame(&mut self) -> Result<(), GpuError> {
        if let Some(cube) = self.unknown_cube.take() {
            return Err(GpuError::UnknownCube(cube));
        }

        let renderer = self.renderer;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cube_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &renderer.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &renderer.frame_bind_group, &[]);
            for &(cube, cull) in &self.draws {
                let buffers = &renderer.cubes[cube];
                pass.set_pipeline(match cull {
                    CullFace::Front => &renderer.front_cull_pipeline,
                    CullFace::Back => &renderer.back_cull_pipeline,
                });
                pass.set_bind_group(1, &buffers.object_bind_group, &[]);
                pass.set_vertex_buffer(0, buffers.positions.slice(..));
                pass.set_vertex_buffer(1, buffers.normals.slice(..));
                pass.set_vertex_buffer(2, buffers.colors.slice(..));
                pass.set_index_buffer(buffers.indices.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.draws.clear();
        Ok(())
    }
}
