// ============================================================================
// renderer.rs — Ping, Pong!
// Sprite drawing: shared unit quad, per-sprite model uniform and texture,
// and the clear-then-draw pass for one frame.
// ============================================================================

use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::pipeline::{bg_buffer, bg_sampler, bg_texture, create_sprite_pipeline, SpritePipeline};
use crate::texture::SpriteTexture;
use crate::world::WorldState;

// ======================== Quad Geometry ========================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unit square centred at the origin, two triangles. Texture v runs
/// top-down, so the bottom edge samples v = 1.
pub const QUAD_VERTICES: [Vertex; 6] = [
    Vertex { position: [-0.5, -0.5], tex_coords: [0.0, 1.0] },
    Vertex { position: [0.5, -0.5], tex_coords: [1.0, 1.0] },
    Vertex { position: [0.5, 0.5], tex_coords: [1.0, 0.0] },
    Vertex { position: [-0.5, -0.5], tex_coords: [0.0, 1.0] },
    Vertex { position: [0.5, 0.5], tex_coords: [1.0, 0.0] },
    Vertex { position: [-0.5, 0.5], tex_coords: [0.0, 0.0] },
];

// ======================== Sprites ========================

/// Textures for the three drawables, in draw order.
pub struct SpriteTextures {
    pub right_paddle: SpriteTexture,
    pub left_paddle: SpriteTexture,
    pub ball: SpriteTexture,
}

struct Sprite {
    model_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Owns the view bound in `bind_group`.
    _texture: SpriteTexture,
}

pub struct SpriteRenderer {
    pipeline: SpritePipeline,
    vertex_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    // Uploaded once; kept alive for the bind group.
    _camera_buffer: wgpu::Buffer,
    sprites: [Sprite; 3],
    clear_color: wgpu::Color,
}

impl SpriteRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera: &Camera,
        textures: SpriteTextures,
        clear_color: [f64; 4],
    ) -> Self {
        let pipeline = create_sprite_pipeline(device, surface_format);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_uniforms"),
            contents: bytemuck::bytes_of(&camera.uniforms()),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &pipeline.camera_bgl,
            entries: &[bg_buffer(0, &camera_buffer)],
        });

        let SpriteTextures {
            right_paddle,
            left_paddle,
            ball,
        } = textures;
        let sprites = [
            create_sprite(device, &pipeline, "right_paddle", right_paddle),
            create_sprite(device, &pipeline, "left_paddle", left_paddle),
            create_sprite(device, &pipeline, "ball", ball),
        ];

        let [r, g, b, a] = clear_color;
        Self {
            pipeline,
            vertex_buffer,
            camera_bind_group,
            _camera_buffer: camera_buffer,
            sprites,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    /// Upload this frame's model matrices.
    pub fn prepare(&self, queue: &wgpu::Queue, world: &WorldState) {
        for (sprite, model) in self.sprites.iter().zip(world.model_matrices()) {
            queue.write_buffer(
                &sprite.model_buffer,
                0,
                bytemuck::cast_slice(&model.to_cols_array()),
            );
        }
    }

    /// Clear and draw every sprite into `view`: right paddle, left paddle,
    /// then ball on top.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline.render_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        for sprite in &self.sprites {
            pass.set_bind_group(1, &sprite.bind_group, &[]);
            pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }
    }
}

fn create_sprite(
    device: &wgpu::Device,
    pipeline: &SpritePipeline,
    name: &str,
    texture: SpriteTexture,
) -> Sprite {
    let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name}_model")),
        contents: bytemuck::cast_slice(&glam::Mat4::IDENTITY.to_cols_array()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{name}_bg")),
        layout: &pipeline.sprite_bgl,
        entries: &[
            bg_buffer(0, &model_buffer),
            bg_texture(1, &texture.view),
            bg_sampler(2, &pipeline.sampler),
        ],
    });

    Sprite {
        model_buffer,
        bind_group,
        _texture: texture,
    }
}
