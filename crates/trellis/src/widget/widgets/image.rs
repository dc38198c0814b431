//! Textured sprite widget.

use std::path::{Path, PathBuf};

use trellis_render::{Bounds, HasIntrinsicSize, Point, Renderer, Size, Texture};

use crate::error::WidgetResult;
use crate::widget::{Widget, WidgetBase};

/// Where the sprite sits horizontally relative to the widget's `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAnchor {
    /// `x` is the sprite's left edge.
    Left,
    #[default]
    Center,
    /// `x` is the sprite's right edge.
    Right,
}

/// Where the sprite sits vertically relative to the widget's `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    /// `y` is the sprite's bottom edge.
    Bottom,
    #[default]
    Center,
    /// `y` is the sprite's top edge.
    Top,
}

/// A texture drawn at a position.
///
/// The texture is loaded when the image is created. Until then the image has
/// zero size unless an explicit size was given. The hit box is always
/// centered on the widget; the anchor only moves the drawn sprite.
#[derive(Debug)]
pub struct Image {
    base: WidgetBase,
    path: PathBuf,
    texture: Option<Texture>,
    anchor: (HorizontalAnchor, VerticalAnchor),
    scale: f32,
    alpha: u8,
    width: Option<f32>,
    height: Option<f32>,
}

impl Image {
    pub fn new(path: impl Into<PathBuf>, x: f32, y: f32) -> Self {
        Self {
            base: WidgetBase::new(x, y),
            path: path.into(),
            texture: None,
            anchor: (HorizontalAnchor::Center, VerticalAnchor::Center),
            scale: 1.0,
            alpha: u8::MAX,
            width: None,
            height: None,
        }
    }

    pub fn with_anchor(mut self, horizontal: HorizontalAnchor, vertical: VerticalAnchor) -> Self {
        self.anchor = (horizontal, vertical);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    /// Stretch the texture to a fixed width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Stretch the texture to a fixed height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Swap the displayed texture.
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    pub fn anchor(&self) -> (HorizontalAnchor, VerticalAnchor) {
        self.anchor
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn set_width(&mut self, width: Option<f32>) {
        self.width = width;
    }

    /// Where the sprite is drawn, after applying the anchor.
    pub fn sprite_bounds(&self) -> Bounds {
        let size = self.size();
        let Point { x, y, .. } = self.center();
        let left = match self.anchor.0 {
            HorizontalAnchor::Left => x,
            HorizontalAnchor::Center => x - size.width / 2.0,
            HorizontalAnchor::Right => x - size.width,
        };
        let bottom = match self.anchor.1 {
            VerticalAnchor::Bottom => y,
            VerticalAnchor::Center => y - size.height / 2.0,
            VerticalAnchor::Top => y - size.height,
        };
        Bounds::new(left, left + size.width, bottom + size.height, bottom)
    }
}

impl Widget for Image {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Image"
    }

    fn create(&mut self, renderer: &mut dyn Renderer) -> WidgetResult<()> {
        self.texture = Some(renderer.load_texture(&self.path)?);
        Ok(())
    }

    fn intrinsic_size(&self) -> Size {
        let scaled = self
            .texture
            .as_ref()
            .map_or(Size::ZERO, |texture| texture.intrinsic_size().scaled(self.scale));
        Size::new(
            self.width.unwrap_or(scaled.width),
            self.height.unwrap_or(scaled.height),
        )
    }

    fn draw(&mut self, renderer: &mut dyn Renderer) {
        if let Some(texture) = &self.texture {
            renderer.draw_texture(texture, self.sprite_bounds(), f32::from(self.alpha) / 255.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_render::{DrawCommand, RecordingRenderer};

    use super::*;

    fn renderer() -> RecordingRenderer {
        RecordingRenderer::new().with_texture("knob.png", 20.0, 10.0)
    }

    #[test]
    fn test_size_follows_texture_and_scale() {
        let mut image = Image::new("knob.png", 0.0, 0.0).with_scale(2.0);
        assert_eq!(image.size(), Size::ZERO);

        image.create(&mut renderer()).unwrap();
        assert_eq!(image.size(), Size::new(40.0, 20.0));

        image.set_scale(0.5);
        assert_eq!(image.width(), 10.0);
    }

    #[test]
    fn test_size_override() {
        let mut image = Image::new("knob.png", 0.0, 0.0).with_width(200.0);
        image.create(&mut renderer()).unwrap();
        assert_eq!(image.size(), Size::new(200.0, 10.0));
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let mut image = Image::new("does/not/exist.png", 0.0, 0.0);
        assert!(image.create(&mut RecordingRenderer::new()).is_err());
    }

    #[test]
    fn test_anchor_moves_sprite_only() {
        let mut image = Image::new("knob.png", 100.0, 50.0)
            .with_anchor(HorizontalAnchor::Left, VerticalAnchor::Top);
        image.create(&mut renderer()).unwrap();

        let sprite = image.sprite_bounds();
        assert_eq!((sprite.left, sprite.top), (100.0, 50.0));
        assert_eq!(image.left(), 90.0);
    }

    #[test]
    fn test_draw_uses_alpha() {
        let mut renderer = renderer();
        let mut image = Image::new("knob.png", 0.0, 0.0).with_alpha(51);
        image.create(&mut renderer).unwrap();
        image.draw(&mut renderer);

        match &renderer.pending()[0] {
            DrawCommand::Texture { alpha, .. } => assert!((alpha - 0.2).abs() < 1e-6),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
