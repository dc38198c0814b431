//! The drawing collaborator used by widgets.
//!
//! Widgets never talk to a graphics API directly. They load textures, lay
//! out text, and queue draw calls through a [`Renderer`]; the application
//! flushes the batch once per frame.
//!
//! [`RecordingRenderer`] is a headless implementation that records every
//! call. It backs the test suites and any tooling that needs layout without
//! a window.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use trellis_core::logging::targets;

use crate::collision::Bounds;
use crate::error::{RenderError, RenderResult};
use crate::text::{Font, LayoutOptions, StyledRun, TextLayout};
use crate::types::{Color, HasIntrinsicSize, Size};

/// Statistics from a flushed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of draw calls submitted.
    pub draw_calls: u32,
    /// Number of vertices rendered.
    pub vertices: u32,
    /// Number of texture switches between consecutive calls.
    pub state_changes: u32,
}

/// A loaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    path: PathBuf,
    size: Size,
}

impl Texture {
    pub fn new(path: impl Into<PathBuf>, size: Size) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl HasIntrinsicSize for Texture {
    fn width(&self) -> f32 {
        self.size.width
    }

    fn height(&self) -> f32 {
        self.size.height
    }
}

/// A rectangle outline, used for debug bounding boxes and focus frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub bounds: Bounds,
    pub color: Color,
    pub thickness: f32,
}

impl Outline {
    pub fn new(bounds: Bounds, color: Color, thickness: f32) -> Self {
        Self {
            bounds,
            color,
            thickness,
        }
    }

    /// Move the outline so it is centered on `(x, y)`, keeping its size.
    pub fn recenter(&mut self, x: f32, y: f32) {
        let (width, height) = (self.bounds.width(), self.bounds.height());
        self.bounds = Bounds::from_center(&crate::Point::new(x, y), width, height);
    }
}

/// The drawing interface widgets are written against.
pub trait Renderer {
    /// Load a texture from disk.
    fn load_texture(&mut self, path: &Path) -> RenderResult<Texture>;

    /// Queue a texture stretched over `bounds`.
    fn draw_texture(&mut self, texture: &Texture, bounds: Bounds, alpha: f32);

    /// Queue a text layout inside `bounds`. Runs without an explicit color use `color`.
    fn draw_text(&mut self, layout: &TextLayout, bounds: Bounds, color: Color);

    /// Queue a rectangle outline.
    fn stroke_rect(&mut self, outline: &Outline);

    /// Measure styled runs.
    fn layout_text(&mut self, runs: &[StyledRun], font: &Font, options: &LayoutOptions) -> TextLayout;

    /// Submit everything queued since the last flush.
    fn flush_batch(&mut self) -> FrameStats;
}

/// A draw call captured by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Texture {
        path: PathBuf,
        bounds: Bounds,
        alpha: f32,
    },
    Text {
        text: String,
        bounds: Bounds,
        color: Color,
    },
    Outline(Outline),
}

/// A headless renderer that records draw calls.
///
/// Texture sizes come from [`register_texture`](Self::register_texture) or,
/// failing that, from the image file header on disk.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    textures: HashMap<PathBuf, Size>,
    pending: Vec<DrawCommand>,
    flushed: Vec<Vec<DrawCommand>>,
    loads: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`register_texture`](Self::register_texture).
    pub fn with_texture(mut self, path: impl Into<PathBuf>, width: f32, height: f32) -> Self {
        self.register_texture(path, width, height);
        self
    }

    /// Make `path` loadable with the given size without touching the disk.
    pub fn register_texture(&mut self, path: impl Into<PathBuf>, width: f32, height: f32) {
        self.textures.insert(path.into(), Size::new(width, height));
    }

    /// Calls queued since the last flush.
    pub fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    /// Every flushed batch, oldest first.
    pub fn batches(&self) -> &[Vec<DrawCommand>] {
        &self.flushed
    }

    /// The most recently flushed batch.
    pub fn last_batch(&self) -> Option<&[DrawCommand]> {
        self.flushed.last().map(Vec::as_slice)
    }

    /// Number of successful texture loads.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

impl Renderer for RecordingRenderer {
    fn load_texture(&mut self, path: &Path) -> RenderResult<Texture> {
        let size = match self.textures.get(path) {
            Some(size) => *size,
            None => {
                let (width, height) =
                    image::image_dimensions(path).map_err(|source| RenderError::TextureLoad {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Size::from((width, height))
            }
        };

        self.loads += 1;
        tracing::debug!(
            target: targets::RENDER,
            path = %path.display(),
            width = size.width,
            height = size.height,
            "texture loaded"
        );
        Ok(Texture::new(path, size))
    }

    fn draw_texture(&mut self, texture: &Texture, bounds: Bounds, alpha: f32) {
        self.pending.push(DrawCommand::Texture {
            path: texture.path().to_path_buf(),
            bounds,
            alpha,
        });
    }

    fn draw_text(&mut self, layout: &TextLayout, bounds: Bounds, color: Color) {
        self.pending.push(DrawCommand::Text {
            text: layout.text(),
            bounds,
            color,
        });
    }

    fn stroke_rect(&mut self, outline: &Outline) {
        self.pending.push(DrawCommand::Outline(*outline));
    }

    fn layout_text(&mut self, runs: &[StyledRun], font: &Font, options: &LayoutOptions) -> TextLayout {
        TextLayout::monospace(runs, font, options)
    }

    fn flush_batch(&mut self) -> FrameStats {
        let batch = std::mem::take(&mut self.pending);
        let mut stats = FrameStats {
            draw_calls: batch.len() as u32,
            vertices: batch.len() as u32 * 4,
            state_changes: 0,
        };

        let mut last_texture: Option<&Path> = None;
        for command in &batch {
            if let DrawCommand::Texture { path, .. } = command {
                if last_texture.is_some_and(|last| last != path.as_path()) {
                    stats.state_changes += 1;
                }
                last_texture = Some(path.as_path());
            }
        }

        tracing::trace!(
            target: targets::RENDER,
            draw_calls = stats.draw_calls,
            state_changes = stats.state_changes,
            "batch flushed"
        );
        self.flushed.push(batch);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn test_registered_texture_loads_without_disk() {
        let mut renderer = RecordingRenderer::new().with_texture("button.png", 120.0, 40.0);
        let texture = renderer.load_texture(Path::new("button.png")).unwrap();
        assert_eq!(texture.intrinsic_size(), Size::new(120.0, 40.0));
        assert_eq!(renderer.load_count(), 1);
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let mut renderer = RecordingRenderer::new();
        let result = renderer.load_texture(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(RenderError::TextureLoad { .. })));
        assert_eq!(renderer.load_count(), 0);
    }

    #[test]
    fn test_flush_moves_pending_into_batches() {
        let mut renderer = RecordingRenderer::new()
            .with_texture("a.png", 1.0, 1.0)
            .with_texture("b.png", 1.0, 1.0);
        let a = renderer.load_texture(Path::new("a.png")).unwrap();
        let b = renderer.load_texture(Path::new("b.png")).unwrap();
        let bounds = Bounds::from_center(&Point::ZERO, 1.0, 1.0);

        renderer.draw_texture(&a, bounds, 1.0);
        renderer.draw_texture(&b, bounds, 1.0);
        renderer.stroke_rect(&Outline::new(bounds, Color::RED, 1.0));

        let stats = renderer.flush_batch();
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.state_changes, 1);
        assert!(renderer.pending().is_empty());
        assert_eq!(renderer.last_batch().unwrap().len(), 3);
    }

    #[test]
    fn test_outline_recenter_keeps_size() {
        let mut outline = Outline::new(Bounds::new(0.0, 10.0, 4.0, 0.0), Color::BLACK, 1.0);
        outline.recenter(100.0, 50.0);
        assert_eq!(outline.bounds, Bounds::new(95.0, 105.0, 52.0, 48.0));
    }
}
