use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::assets::{Assets, MISSING_TEXTURE_SIZE};
use crate::geom::Color;
use crate::scene::{Primitive, Scene, Stroke};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    corner: [f32; 2],
}

impl Vertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        }
    }
}

const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { corner: [-0.5, -0.5] },
    Vertex { corner: [0.5, -0.5] },
    Vertex { corner: [0.5, 0.5] },
    Vertex { corner: [-0.5, 0.5] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

const PLACEHOLDER_COLOR: Color = Color::rgba(1.0, 0.0, 1.0, 1.0);

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Instance {
    center: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl Instance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 8,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 3,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

/// A run of instances sharing one texture; `None` is the white texture.
struct Batch {
    texture: Option<String>,
    instances: Range<u32>,
}

pub(crate) struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: wgpu::BindGroup,
    textures: HashMap<String, wgpu::BindGroup>,
    uploaded_generation: u64,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: Option<wgpu::Buffer>,
    batches: Vec<Batch>,
    linear_output: bool,
}

impl QuadRenderer {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("quad.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad-globals"),
            contents: bytemuck::bytes_of(&Globals {
                viewport: [1.0, 1.0],
                _pad: [0.0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad-globals-layout"),
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
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad-globals-bind-group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad-texture-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad-pipeline-layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            immediate_size: 0,
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), Instance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad-vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad-indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let white = create_texture_bind_group(
            device,
            queue,
            &texture_layout,
            &sampler,
            &[255, 255, 255, 255],
            1,
            1,
            "white-texture",
        );

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            sampler,
            white,
            textures: HashMap::new(),
            uploaded_generation: 0,
            vertex_buffer,
            index_buffer,
            instance_buffer: None,
            batches: Vec::new(),
            linear_output: format.is_srgb(),
        }
    }

    /// Builds this frame's instances from the scene, uploading textures the
    /// first time they are referenced.
    pub(crate) fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        let viewport = scene.viewport().max(Vec2::ONE);
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                viewport: viewport.to_array(),
                _pad: [0.0; 2],
            }),
        );

        let assets = scene.assets();
        if assets.generation() != self.uploaded_generation {
            self.textures.clear();
            self.uploaded_generation = assets.generation();
        }

        let mut instances: Vec<Instance> = Vec::new();
        self.batches.clear();
        for (_, visual) in scene.iter() {
            match &visual.primitive {
                Primitive::Rect { size, fill, stroke } => {
                    let size = *size * visual.scale;
                    self.push(&mut instances, None, visual.position, size, fill.with_alpha(fill.a * visual.alpha));
                    if let Some(stroke) = stroke {
                        self.push_stroke(&mut instances, visual.position, size, stroke, visual.alpha);
                    }
                }
                Primitive::Image { texture } => {
                    if self.ensure_texture(device, queue, assets, texture) {
                        let size = assets.size(texture).unwrap_or(MISSING_TEXTURE_SIZE) * visual.scale;
                        let tint = Color::WHITE.with_alpha(visual.alpha);
                        self.push(&mut instances, Some(texture.as_str()), visual.position, size, tint);
                    } else {
                        let size = MISSING_TEXTURE_SIZE * visual.scale;
                        let tint = PLACEHOLDER_COLOR.with_alpha(visual.alpha);
                        self.push(&mut instances, None, visual.position, size, tint);
                    }
                }
                Primitive::Text { .. } => {}
            }
        }

        self.instance_buffer = (!instances.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad-instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
    }

    pub(crate) fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(instance_buffer) = &self.instance_buffer else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        for batch in &self.batches {
            let bind_group = batch
                .texture
                .as_ref()
                .and_then(|name| self.textures.get(name))
                .unwrap_or(&self.white);
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, batch.instances.clone());
        }
    }

    fn ensure_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, assets: &Assets, name: &str) -> bool {
        if self.textures.contains_key(name) {
            return true;
        }
        let Some(image) = assets.get(name).filter(|image| image.width() > 0 && image.height() > 0) else {
            return false;
        };
        let bind_group = create_texture_bind_group(
            device,
            queue,
            &self.texture_layout,
            &self.sampler,
            image.as_raw(),
            image.width(),
            image.height(),
            name,
        );
        log::debug!("uploaded texture {name} ({}x{})", image.width(), image.height());
        self.textures.insert(name.to_owned(), bind_group);
        true
    }

    fn push(&mut self, instances: &mut Vec<Instance>, texture: Option<&str>, center: Vec2, size: Vec2, color: Color) {
        let color = if self.linear_output { color.to_linear() } else { color };
        let index = instances.len() as u32;
        instances.push(Instance {
            center: center.to_array(),
            size: size.to_array(),
            color: color.to_array(),
        });
        match self.batches.last_mut() {
            Some(batch) if batch.texture.as_deref() == texture => batch.instances.end = index + 1,
            _ => self.batches.push(Batch {
                texture: texture.map(str::to_owned),
                instances: index..index + 1,
            }),
        }
    }

    /// Four edge quads centred on the rectangle's outline.
    fn push_stroke(&mut self, instances: &mut Vec<Instance>, center: Vec2, size: Vec2, stroke: &Stroke, alpha: f32) {
        let color = stroke.color.with_alpha(stroke.color.a * alpha);
        let half = size * 0.5;
        let w = stroke.width;
        let horizontal = Vec2::new(size.x + w, w);
        let vertical = Vec2::new(w, size.y + w);
        self.push(instances, None, center - Vec2::new(0.0, half.y), horizontal, color);
        self.push(instances, None, center + Vec2::new(0.0, half.y), horizontal, color);
        self.push(instances, None, center - Vec2::new(half.x, 0.0), vertical, color);
        self.push(instances, None, center + Vec2::new(half.x, 0.0), vertical, color);
    }
}

#[allow(clippy::too_many_arguments)]
fn create_texture_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    pixels: &[u8],
    width: u32,
    height: u32,
    label: &str,
) -> wgpu::BindGroup {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
