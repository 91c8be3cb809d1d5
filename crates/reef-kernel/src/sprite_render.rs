//! Sprite rendering system.
//!
//! Draws textured quads stretched into a destination rectangle, rotated
//! around their own center. Each sprite occupies a texture slot; slots
//! whose texture failed to load are skipped when drawing.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use reef_common::AssetError;
use tracing::{debug, info};
use wgpu::util::DeviceExt;

use crate::texture::{load_texture_rgba, SpriteTexture};

/// One sprite to draw this frame, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    /// Texture slot the sprite samples from
    pub slot: usize,
    /// Center of the destination rectangle
    pub center: [f32; 2],
    /// Width and height of the destination rectangle
    pub size: [f32; 2],
    /// Clockwise rotation around the center, in degrees
    pub rotation_degrees: f32,
}

/// GPU instance data for sprite rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Center in canvas pixels
    pub center: [f32; 2],
    /// Destination size in canvas pixels
    pub size: [f32; 2],
    /// Rotation in radians
    pub rotation: f32,
    /// Padding to a 32-byte stride
    pub _padding: [f32; 3],
}

impl SpriteInstance {
    /// Builds instance data for `draw`. The whole texture is stretched over
    /// the destination rectangle.
    #[must_use]
    pub fn from_draw(draw: &SpriteDraw) -> Self {
        Self {
            center: draw.center,
            size: draw.size,
            rotation: draw.rotation_degrees.to_radians(),
            _padding: [0.0; 3],
        }
    }
}

/// Canvas uniform for sprite rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CanvasUniform {
    /// Canvas size in pixels
    size: [f32; 2],
    /// Padding to 16 bytes (matching WGSL struct layout)
    _padding: [f32; 2],
}

/// Sprite renderer using instanced quads, one instance per sprite.
pub struct SpriteRenderer {
    /// Render pipeline
    pipeline: wgpu::RenderPipeline,
    /// Bind group layout shared by every sprite texture
    texture_layout: wgpu::BindGroupLayout,
    /// Vertex buffer for quad
    vertex_buffer: wgpu::Buffer,
    /// Index buffer for quad
    index_buffer: wgpu::Buffer,
    /// Instance buffer
    instance_buffer: wgpu::Buffer,
    /// Number of instances the buffer can hold
    instance_capacity: usize,
    /// Canvas uniform buffer
    canvas_buffer: wgpu::Buffer,
    /// Canvas bind group
    canvas_bind_group: wgpu::BindGroup,
    /// Sampler shared by every sprite texture
    sampler: wgpu::Sampler,
    /// Loaded textures by slot
    textures: Vec<Option<SpriteTexture>>,
    /// Texture slot of each prepared instance, in draw order
    batches: Vec<usize>,
    /// Largest texture side the device accepts
    max_texture_dimension: u32,
}

impl SpriteRenderer {
    /// Creates a new sprite renderer with room for `capacity` sprites.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, capacity: usize) -> Self {
        info!("Creating sprite renderer (capacity {capacity})");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(SPRITE_SHADER.into()),
        });

        let canvas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Canvas Layout"),
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

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Texture Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&canvas_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    // Quad vertices (position, uv)
                    wgpu::VertexBufferLayout {
                        array_stride: 16,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 0,
                                shader_location: 0,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 8,
                                shader_location: 1,
                            },
                        ],
                    },
                    // Per-sprite instances
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<SpriteInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 0,
                                shader_location: 2,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32x2,
                                offset: 8,
                                shader_location: 3,
                            },
                            wgpu::VertexAttribute {
                                format: wgpu::VertexFormat::Float32,
                                offset: 16,
                                shader_location: 4,
                            },
                        ],
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
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
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Unit quad centered on the origin, y pointing down the canvas
        #[rustfmt::skip]
        let vertices: &[[f32; 4]] = &[
            [-0.5, -0.5, 0.0, 0.0], // Top-left
            [ 0.5, -0.5, 1.0, 0.0], // Top-right
            [ 0.5,  0.5, 1.0, 1.0], // Bottom-right
            [-0.5,  0.5, 0.0, 1.0], // Bottom-left
        ];
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices: &[u16] = &[0, 1, 2, 0, 2, 3];
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = capacity.max(1);
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        let canvas_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Canvas Buffer"),
            size: std::mem::size_of::<CanvasUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let canvas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Canvas Bind Group"),
            layout: &canvas_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: canvas_buffer.as_entire_binding(),
            }],
        });

        // Nearest neighbour, matching point-filtered 2D drawing
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            pipeline,
            texture_layout,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            instance_capacity,
            canvas_buffer,
            canvas_bind_group,
            sampler,
            textures: Vec::new(),
            batches: Vec::with_capacity(instance_capacity),
            max_texture_dimension: device.limits().max_texture_dimension_2d,
        }
    }

    /// Loads an image file into a texture slot, replacing any previous one.
    ///
    /// On failure the slot is left empty and the sprite will not be drawn.
    pub fn load_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: usize,
        path: &Path,
    ) -> Result<(), AssetError> {
        if self.textures.len() <= slot {
            self.textures.resize_with(slot + 1, || None);
        }
        self.textures[slot] = None;

        let image = load_texture_rgba(path, self.max_texture_dimension)?;
        let label = format!("Sprite Texture {}", path.display());
        let texture = SpriteTexture::upload(
            device,
            queue,
            &self.texture_layout,
            &self.sampler,
            &image,
            &label,
        );

        info!(
            "Loaded sprite texture {} ({}x{}) into slot {slot}",
            path.display(),
            image.width,
            image.height
        );
        self.textures[slot] = Some(texture);
        Ok(())
    }

    /// Updates the canvas size that sprite coordinates are expressed in.
    pub fn set_canvas_size(&self, queue: &wgpu::Queue, width: f32, height: f32) {
        let uniform = CanvasUniform {
            size: [width.max(1.0), height.max(1.0)],
            _padding: [0.0; 2],
        };
        queue.write_buffer(&self.canvas_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Uploads this frame's sprites. Returns how many will be drawn.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[SpriteDraw]) -> usize {
        self.batches.clear();

        let mut instances = Vec::with_capacity(draws.len());
        for draw in draws {
            if self.texture(draw.slot).is_some() {
                instances.push(SpriteInstance::from_draw(draw));
                self.batches.push(draw.slot);
            }
        }

        if instances.is_empty() {
            return 0;
        }

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            debug!("Grew sprite instance buffer to {}", self.instance_capacity);
        }

        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        instances.len()
    }

    /// Renders the sprites uploaded by the last [`SpriteRenderer::prepare`].
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.batches.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.canvas_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for (instance, slot) in (0u32..).zip(&self.batches) {
            if let Some(texture) = self.texture(*slot) {
                render_pass.set_bind_group(1, texture.bind_group(), &[]);
                render_pass.draw_indexed(0..6, 0, instance..instance + 1);
            }
        }
    }

    /// Returns the texture in `slot`, if it loaded.
    #[must_use]
    pub fn texture(&self, slot: usize) -> Option<&SpriteTexture> {
        self.textures.get(slot).and_then(Option::as_ref)
    }

    /// Returns the number of slots holding a texture.
    #[must_use]
    pub fn loaded_texture_count(&self) -> usize {
        self.textures.iter().flatten().count()
    }

    /// Drops every texture. Returns how many were released.
    pub fn release_textures(&mut self) -> usize {
        let released = self.loaded_texture_count();
        self.textures.clear();
        self.batches.clear();
        released
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Instance Buffer"),
        size: (std::mem::size_of::<SpriteInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// WGSL shader for sprite rendering
const SPRITE_SHADER: &str = r#"
struct CanvasUniform {
    size: vec2<f32>,
    _padding: vec2<f32>,
}

@group(0) @binding(0) var<uniform> canvas: CanvasUniform;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct InstanceInput {
    @location(2) center: vec2<f32>,
    @location(3) size: vec2<f32>,
    @location(4) rotation: f32,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    var out: VertexOutput;

    // Scale the unit quad, then rotate it around its center
    let local = vertex.position * instance.size;
    let c = cos(instance.rotation);
    let s = sin(instance.rotation);
    let rotated = vec2<f32>(local.x * c - local.y * s, local.x * s + local.y * c);

    // Canvas pixels (y down) to normalized device coordinates (y up)
    let canvas_pos = instance.center + rotated;
    let ndc = canvas_pos / canvas.size * 2.0 - vec2<f32>(1.0, 1.0);
    out.clip_position = vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);

    out.uv = vertex.uv;

    return out;
}

@group(1) @binding(0) var sprite_texture: texture_2d<f32>;
@group(1) @binding(1) var sprite_sampler: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sprite_texture, sprite_sampler, in.uv);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn draw() -> SpriteDraw {
        SpriteDraw {
            slot: 0,
            center: [640.0, 360.0],
            size: [200.0, 100.0],
            rotation_degrees: 90.0,
        }
    }

    #[test]
    fn test_instance_layout() {
        // Must match the stride and offsets declared in the pipeline
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 32);
        assert_eq!(std::mem::size_of::<CanvasUniform>(), 16);
    }

    #[test]
    fn test_instance_keeps_destination_rect() {
        let instance = SpriteInstance::from_draw(&draw());
        assert_eq!(instance.center, [640.0, 360.0]);
        assert_eq!(instance.size, [200.0, 100.0]);
    }

    #[test]
    fn test_rotation_in_radians() {
        let instance = SpriteInstance::from_draw(&draw());
        assert!((instance.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_shader_draws_texels_unmodified() {
        assert!(SPRITE_SHADER.contains("return textureSample(sprite_texture, sprite_sampler, in.uv);"));
        assert!(!SPRITE_SHADER.contains("discard"));
    }
}
