use std::collections::HashMap;

use glyphon::{
    Attrs, Buffer, Cache, Color as GlyphColor, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

use crate::scene::{Primitive, Scene, VisualId};

const LINE_HEIGHT_RATIO: f32 = 1.2;

struct TextEntry {
    buffer: Buffer,
    text: String,
    font_size: f32,
    width: f32,
    height: f32,
}

/// Draws the scene's text visuals, centred on their positions, with glyphon.
pub(crate) struct TextLayer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    renderer: TextRenderer,
    viewport: Viewport,
    entries: HashMap<VisualId, TextEntry>,
    prepared: bool,
}

impl TextLayer {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let viewport = Viewport::new(device, &cache);
        let renderer = TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        Self {
            font_system,
            swash_cache,
            atlas,
            renderer,
            viewport,
            entries: HashMap::new(),
            prepared: false,
        }
    }

    pub(crate) fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene, width: u32, height: u32) {
        let mut placed = Vec::new();
        for (id, visual) in scene.iter() {
            let Primitive::Text { text, font_size, color } = &visual.primitive else {
                continue;
            };
            let entry = self
                .entries
                .entry(id)
                .or_insert_with(|| TextEntry::new(&mut self.font_system, *font_size));
            entry.update(&mut self.font_system, text, *font_size);
            let left = visual.position.x - entry.width * visual.scale * 0.5;
            let top = visual.position.y - entry.height * visual.scale * 0.5;
            let [r, g, b, a] = color.with_alpha(color.a * visual.alpha).to_rgba8();
            placed.push((id, left, top, visual.scale, GlyphColor::rgba(r, g, b, a)));
        }
        self.entries.retain(|id, _| scene.contains(*id));

        self.viewport.update(queue, Resolution { width, height });
        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        let entries = &self.entries;
        let areas = placed.iter().filter_map(|(id, left, top, scale, color)| {
            entries.get(id).map(|entry| TextArea {
                buffer: &entry.buffer,
                left: *left,
                top: *top,
                scale: *scale,
                bounds,
                default_color: *color,
                custom_glyphs: &[],
            })
        });
        self.prepared = match self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        ) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("text prepare failed: {err:?}");
                false
            }
        };
    }

    pub(crate) fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if !self.prepared {
            return;
        }
        if let Err(err) = self.renderer.render(&self.atlas, &self.viewport, pass) {
            log::warn!("text render failed: {err:?}");
        }
    }

    pub(crate) fn trim(&mut self) {
        self.atlas.trim();
    }
}

impl TextEntry {
    fn new(font_system: &mut FontSystem, font_size: f32) -> Self {
        let mut buffer = Buffer::new(font_system, Metrics::new(font_size, font_size * LINE_HEIGHT_RATIO));
        buffer.set_size(font_system, None, None);
        Self {
            buffer,
            text: String::new(),
            font_size,
            width: 0.0,
            height: 0.0,
        }
    }

    fn update(&mut self, font_system: &mut FontSystem, text: &str, font_size: f32) {
        if self.text == text && self.font_size == font_size && !self.text.is_empty() {
            return;
        }
        let line_height = font_size * LINE_HEIGHT_RATIO;
        self.buffer.set_metrics(font_system, Metrics::new(font_size, line_height));
        let attrs = Attrs::new().family(Family::SansSerif);
        self.buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
        self.buffer.shape_until_scroll(font_system, false);
        let (width, lines) = self
            .buffer
            .layout_runs()
            .fold((0.0f32, 0usize), |(width, lines), run| (width.max(run.line_w), lines + 1));
        self.width = width;
        self.height = lines as f32 * line_height;
        text.clone_into(&mut self.text);
        self.font_size = font_size;
    }
}
