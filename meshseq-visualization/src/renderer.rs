//! Window-backed mesh renderer
//!
//! [`MeshRenderer`] holds at most one mesh object, registered under a name,
//! and is the [`RenderSink`] the session talks to. Registering uploads fresh
//! vertex and index buffers; a position update rewrites the vertex buffer in
//! place and keeps the object (and its index buffer) alive.

use crate::{camera::Camera, config::MeshRenderConfig, device::GpuContext};
use bytemuck::{Pod, Zeroable};
use log::{debug, warn};
use meshseq_core::{Error, Face, Point3f, RenderSink, Result, Vector3f};
use std::path::Path;
use std::sync::Arc;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex data for mesh rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-frame uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub light_dir: [f32; 4],
    pub base_color: [f32; 4],
}

/// The registered mesh object
struct SceneMesh {
    name: String,
    faces: Vec<Face>,
    vertex_count: usize,
    index_count: u32,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    bounds: (Point3f, Point3f),
}

/// Mesh renderer presenting to a window surface
pub struct MeshRenderer {
    pub gpu: GpuContext,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub camera: Camera,
    pub config: MeshRenderConfig,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    mesh: Option<SceneMesh>,
}

impl MeshRenderer {
    /// Create a renderer for `window`
    pub async fn new(window: Arc<Window>, config: MeshRenderConfig, camera: Camera) -> Result<Self> {
        let size = window.inner_size();
        let (gpu, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Render("Surface reports no texture formats".to_string()))?;

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
        surface.configure(&gpu.device, &surface_config);

        let scene_buffer = gpu.create_buffer(
            "Scene Buffer",
            std::mem::size_of::<SceneUniform>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let bind_group_layout = gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("scene_bind_group_layout"),
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        let shader = gpu.create_shader_module("Mesh Shader", include_str!("shaders/mesh.wgsl"));
        let pipeline = Self::create_render_pipeline(
            &gpu.device,
            &bind_group_layout,
            &shader,
            surface_format,
            &config,
        );

        let depth_view = create_depth_view(&gpu.device, surface_config.width, surface_config.height);

        let mut camera = camera;
        camera.aspect_ratio = surface_config.width as f32 / surface_config.height as f32;

        Ok(Self {
            gpu,
            surface,
            surface_config,
            camera,
            config,
            pipeline,
            scene_buffer,
            bind_group,
            depth_view,
            mesh: None,
        })
    }

    /// Create the render pipeline for mesh rendering
    fn create_render_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        config: &MeshRenderConfig,
    ) -> wgpu::RenderPipeline {
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Render Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[MeshVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // frames are often open surfaces; the shader lights both sides
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: config.enable_depth_test,
                depth_compare: if config.enable_depth_test {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.gpu.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.gpu.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Resize renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu.device, &self.surface_config);
            self.depth_view = create_depth_view(&self.gpu.device, new_size.width, new_size.height);
            self.camera.aspect_ratio = new_size.width as f32 / new_size.height as f32;
        }
    }

    /// Point the camera at the registered mesh
    pub fn fit_camera(&mut self) {
        if let Some(mesh) = &self.mesh {
            let (min, max) = mesh.bounds;
            self.camera.fit(min, max);
        }
    }

    fn write_scene_uniform(&self) {
        let eye = self.camera.position();
        let [r, g, b] = self.config.mesh_color;
        let [lx, ly, lz] = self.config.light_direction;
        let uniform = SceneUniform {
            view_proj: self.camera.view_projection().into(),
            view_pos: [eye.x, eye.y, eye.z, 1.0],
            light_dir: [lx, ly, lz, 0.0],
            base_color: [r, g, b, 1.0],
        };
        self.gpu
            .queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the mesh pass into `encoder`, clearing `color` and `depth`
    fn draw_scene(&self, encoder: &mut wgpu::CommandEncoder, color: &wgpu::TextureView, depth: &wgpu::TextureView) {
        let [r, g, b, a] = self.config.background_color;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(mesh) = &self.mesh else {
            return;
        };
        if mesh.index_count == 0 || mesh.vertex_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    /// Draw the scene to the window, letting `overlay` add its own passes on
    /// top. Command buffers returned by `overlay` are submitted first.
    pub fn render_frame<F>(&mut self, overlay: F) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView) -> Vec<wgpu::CommandBuffer>,
    {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.gpu.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface texture timed out; skipping frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Render(format!("Failed to get surface texture: {}", e))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.write_scene_uniform();
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        self.draw_scene(&mut encoder, &view, &self.depth_view);

        let mut command_buffers = overlay(&self.gpu.device, &self.gpu.queue, &mut encoder, &view);
        command_buffers.push(encoder.finish());
        self.gpu.queue.submit(command_buffers);
        output.present();

        Ok(())
    }

    /// Render the scene off-screen at window size and save it as an image
    pub fn capture(&mut self, path: &Path) -> Result<()> {
        let (width, height) = self.size();
        let format = self.surface_config.format;
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Screenshot Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = create_depth_view(&self.gpu.device, width, height);

        let padded_row = padded_bytes_per_row(width);
        let readback = self.gpu.create_buffer(
            "Screenshot Readback Buffer",
            u64::from(padded_row) * u64::from(height),
            wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        );

        self.write_scene_uniform();
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Screenshot Encoder"),
        });
        self.draw_scene(&mut encoder, &view, &depth_view);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        self.gpu.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = readback.slice(..);
        let (sender, receiver) = flume::bounded(1);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.gpu.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| Error::Render("Failed to receive mapping result".to_string()))?
            .map_err(|e| Error::Render(format!("Failed to map screenshot buffer: {}", e)))?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            unpad_rows(&data, width, height, padded_row, is_bgra(format))
        };
        readback.unmap();

        let image = image::RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| Error::InvalidData("Screenshot buffer has the wrong size".to_string()))?;
        image
            .save(path)
            .map_err(|e| Error::InvalidData(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Saved screenshot {}", path.display());
        Ok(())
    }
}

impl RenderSink for MeshRenderer {
    fn register_mesh(&mut self, name: &str, vertices: &[Point3f], faces: &[Face]) -> Result<()> {
        let mesh_vertices = build_vertices(vertices, faces);
        let indices: Vec<u32> = faces
            .iter()
            .flat_map(|f| [f[0] as u32, f[1] as u32, f[2] as u32])
            .collect();

        let vertex_buffer = self.gpu.create_buffer_init(
            "Mesh Vertex Buffer",
            &mesh_vertices,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let index_buffer = self
            .gpu
            .create_buffer_init("Mesh Index Buffer", &indices, wgpu::BufferUsages::INDEX);

        self.mesh = Some(SceneMesh {
            name: name.to_string(),
            faces: faces.to_vec(),
            vertex_count: vertices.len(),
            index_count: indices.len() as u32,
            vertex_buffer,
            index_buffer,
            bounds: bounds(vertices),
        });

        debug!("Registered mesh '{}' with {} vertices and {} faces", name, vertices.len(), faces.len());
        Ok(())
    }

    fn update_vertex_positions(&mut self, name: &str, vertices: &[Point3f]) -> Result<()> {
        let mesh = self
            .mesh
            .as_mut()
            .filter(|m| m.name == name)
            .ok_or_else(|| Error::Render(format!("Mesh '{}' is not registered", name)))?;

        if mesh.vertex_count != vertices.len() {
            return Err(Error::Render(format!(
                "Mesh '{}' has {} vertices, update has {}",
                name,
                mesh.vertex_count,
                vertices.len()
            )));
        }

        let mesh_vertices = build_vertices(vertices, &mesh.faces);
        self.gpu
            .queue
            .write_buffer(&mesh.vertex_buffer, 0, bytemuck::cast_slice(&mesh_vertices));
        mesh.bounds = bounds(vertices);
        Ok(())
    }

    fn screenshot(&mut self, path: &Path) -> Result<()> {
        self.capture(path)
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
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

/// Area-weighted vertex normals; vertices on no face get a zero normal
pub fn compute_vertex_normals(vertices: &[Point3f], faces: &[Face]) -> Vec<Vector3f> {
    let mut normals = vec![Vector3f::zeros(); vertices.len()];
    for face in faces {
        let (Some(v0), Some(v1), Some(v2)) = (
            vertices.get(face[0]),
            vertices.get(face[1]),
            vertices.get(face[2]),
        ) else {
            continue;
        };
        let weighted = (v1 - v0).cross(&(v2 - v0));
        for &i in face {
            normals[i] += weighted;
        }
    }
    for n in &mut normals {
        let len = n.norm();
        if len > f32::EPSILON {
            *n /= len;
        }
    }
    normals
}

/// Interleave positions with their normals
pub fn build_vertices(vertices: &[Point3f], faces: &[Face]) -> Vec<MeshVertex> {
    compute_vertex_normals(vertices, faces)
        .iter()
        .zip(vertices)
        .map(|(n, p)| MeshVertex {
            position: [p.x, p.y, p.z],
            normal: [n.x, n.y, n.z],
        })
        .collect()
}

fn bounds(vertices: &[Point3f]) -> (Point3f, Point3f) {
    let Some(first) = vertices.first() else {
        return (Point3f::origin(), Point3f::origin());
    };
    vertices.iter().fold((*first, *first), |(min, max), v| {
        (min.inf(v), max.sup(v))
    })
}

/// Bytes per row rounded up to the copy alignment wgpu requires
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Strip row padding and convert to RGBA
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_row: u32, bgra: bool) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(padded_row as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_bytes]);
    }
    if bgra {
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }
    pixels
}
