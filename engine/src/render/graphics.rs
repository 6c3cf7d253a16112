use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use super::quad::QuadRenderer;
use super::text::TextLayer;
use crate::error::{EngineError, Result};
use crate::geom::Color;
use crate::scene::Scene;

/// Delivered to the event loop once the asynchronous GPU setup finishes.
pub(crate) type GraphicsEvent = Result<Graphics>;

pub(crate) struct Graphics {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    quads: QuadRenderer,
    text: TextLayer,
    clear_color: wgpu::Color,
}

pub(crate) async fn create_graphics(window: Arc<Window>, proxy: EventLoopProxy<GraphicsEvent>, clear_color: Color) {
    let graphics = Graphics::new(window, clear_color).await;
    if proxy.send_event(graphics).is_err() {
        log::error!("event loop closed before graphics were ready");
    }
}

impl Graphics {
    async fn new(window: Arc<Window>, clear_color: Color) -> Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("engine-device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(EngineError::SurfaceConfig)?;
        let caps = surface.get_capabilities(&adapter);
        if let Some(format) = caps.formats.iter().copied().find(|format| format.is_srgb()) {
            config.format = format;
        }
        surface.configure(&device, &config);

        let linear = if config.format.is_srgb() {
            clear_color.to_linear()
        } else {
            clear_color
        };
        let quads = QuadRenderer::new(&device, &queue, config.format);
        let text = TextLayer::new(&device, &queue, config.format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            quads,
            text,
            clear_color: wgpu::Color {
                r: linear.r as f64,
                g: linear.g as f64,
                b: linear.b as f64,
                a: 1.0,
            },
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub(crate) fn draw(&mut self, scene: &Scene) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return;
            }
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.quads.prepare(&self.device, &self.queue, scene);
        self.text
            .prepare(&self.device, &self.queue, scene, self.config.width, self.config.height);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene-encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.quads.render(&mut pass);
            self.text.render(&mut pass);
        }
        self.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
        self.text.trim();
    }
}
