use crate::constants::CLEAR_COLOR;
use protocol_core::shaders::QUAD_VERT;
use protocol_core::{InstanceId, ProgramInstance, ShaderProgram};
use std::collections::HashMap;
use web_sys as web;

mod helpers;

/// Pipeline for one library program; shared by all of its instances.
struct ProgramPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_size: u64,
}

/// Per-instance parameter block. Freed when the session releases the instance.
struct InstanceResources {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    vertex: wgpu::ShaderModule,
    pipelines: HashMap<&'static str, ProgramPipeline>,
    instances: HashMap<InstanceId, InstanceResources>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU/WebGL adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // WebGL2 fallback needs the downlevel limits
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let vertex = helpers::glsl_module(&device, "quad_vert", QUAD_VERT, wgpu::naga::ShaderStage::Vertex);
        let [r, g, b, a] = CLEAR_COLOR;
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            vertex,
            pipelines: HashMap::new(),
            instances: HashMap::new(),
            width,
            height,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Drop the parameter buffer of an instance that left its slot.
    pub fn release(&mut self, id: InstanceId) {
        if let Some(res) = self.instances.remove(&id) {
            res.uniform_buffer.destroy();
        }
    }

    /// Draw the instances back to front, alpha-blended over the clear color.
    pub fn render(&mut self, draw_list: &[&ProgramInstance]) -> Result<(), wgpu::SurfaceError> {
        for instance in draw_list {
            self.ensure_pipeline(instance.program());
            self.ensure_instance(instance);
            if let Some(res) = self.instances.get(&instance.id()) {
                self.queue
                    .write_buffer(&res.uniform_buffer, 0, &instance.params.packed_bytes());
            }
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("slots_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            for instance in draw_list {
                let (Some(program), Some(res)) = (
                    self.pipelines.get(instance.name()),
                    self.instances.get(&instance.id()),
                ) else {
                    continue;
                };
                rpass.set_pipeline(&program.pipeline);
                rpass.set_bind_group(0, &res.bind_group, &[]);
                rpass.draw(0..3, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl<'a> GpuState<'a> {
    fn ensure_pipeline(&mut self, program: &ShaderProgram) {
        if self.pipelines.contains_key(program.name) || program.uniform_size() == 0 {
            return;
        }
        let fragment = helpers::glsl_module(
            &self.device,
            program.name,
            program.fragment,
            wgpu::naga::ShaderStage::Fragment,
        );
        let layout = helpers::params_layout(&self.device, program.name, program.uniform_size());
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(program.name),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            });
        // Programs on the shared quad reuse one vertex module
        let custom_vertex = (program.vertex != QUAD_VERT).then(|| {
            helpers::glsl_module(
                &self.device,
                program.name,
                program.vertex,
                wgpu::naga::ShaderStage::Vertex,
            )
        });
        let pipeline = helpers::make_program_pipeline(
            &self.device,
            program.name,
            &pipeline_layout,
            custom_vertex.as_ref().unwrap_or(&self.vertex),
            &fragment,
            self.config.format,
        );
        log::debug!("[gpu] built pipeline {}", program.name);
        self.pipelines.insert(
            program.name,
            ProgramPipeline {
                pipeline,
                layout,
                uniform_size: program.uniform_size(),
            },
        );
    }

    fn ensure_instance(&mut self, instance: &ProgramInstance) {
        if self.instances.contains_key(&instance.id()) {
            return;
        }
        let Some(program) = self.pipelines.get(instance.name()) else {
            return;
        };
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(instance.name()),
            size: program.uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(instance.name()),
            layout: &program.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        self.instances.insert(
            instance.id(),
            InstanceResources {
                uniform_buffer,
                bind_group,
            },
        );
    }
}
