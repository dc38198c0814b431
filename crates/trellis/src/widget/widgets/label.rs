//! Text widget with markup, state colors, and an optional command.

use trellis_render::{
    Bounds, Color, Font, HasIntrinsicSize, HorizontalAlign, LayoutOptions, MarkupDecoder, Outline,
    Point, Renderer, Size, StyledRun, TextLayout,
};

use super::Command;
use crate::error::{WidgetError, WidgetResult};
use crate::widget::{
    DispatchContext, InputEvent, Key, MouseButton, Widget, WidgetBase, WidgetEvent, dispatch_input,
};

/// Text colors for each interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelColors {
    pub normal: Color,
    /// Used while hovered or focused.
    pub hover: Color,
    pub press: Color,
    pub disable: Color,
}

impl Default for LabelColors {
    fn default() -> Self {
        Self {
            normal: Color::BLACK,
            hover: Color::COOL_BLACK,
            press: Color::DARK_SLATE_GRAY,
            disable: Color::DARK_GRAY,
        }
    }
}

/// A rectangle drawn around the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOutline {
    pub color: Color,
    /// Added to both dimensions of the text box.
    pub padding: f32,
    pub thickness: f32,
}

/// Builder for [`Label`]; validates justification and wrapping on `build`.
pub struct LabelBuilder {
    text: String,
    x: f32,
    y: f32,
    font: Font,
    colors: LabelColors,
    justify: String,
    width: Option<f32>,
    multiline: bool,
    outline: Option<LabelOutline>,
    command: Option<Command>,
}

impl LabelBuilder {
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn colors(mut self, colors: LabelColors) -> Self {
        self.colors = colors;
        self
    }

    /// `"left"`, `"center"`, or `"right"`.
    pub fn justify(mut self, justify: impl Into<String>) -> Self {
        self.justify = justify.into();
        self
    }

    /// Wrap width; required when multiline.
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn outline(mut self, outline: LabelOutline) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn command(mut self, command: impl FnMut() + 'static) -> Self {
        self.command = Some(Box::new(command));
        self
    }

    pub fn build(self) -> WidgetResult<Label> {
        let justify = HorizontalAlign::from_name(&self.justify).ok_or_else(|| {
            WidgetError::configuration(
                "Label",
                format!(
                    "unsupported justification `{}`; expected left, center, or right",
                    self.justify
                ),
            )
        })?;
        if self.multiline && !self.width.is_some_and(|width| width > 0.0) {
            return Err(WidgetError::configuration(
                "Label",
                "multiline labels need a width greater than zero",
            ));
        }

        let decoder = MarkupDecoder::new(self.font)?;
        let runs = decoder.decode(&self.text);
        Ok(Label {
            base: WidgetBase::new(self.x, self.y),
            text: self.text,
            runs,
            decoder,
            colors: self.colors,
            color: self.colors.normal,
            justify,
            width: self.width,
            multiline: self.multiline,
            outline: self.outline,
            command: self.command,
            bindings: Vec::new(),
            layout: None,
            layout_dirty: true,
        })
    }
}

/// A line (or block) of styled text.
///
/// The text is markup (see [`MarkupDecoder`]). Pressing the label with the
/// left button, or pressing one of its bound keys anywhere, runs its
/// command.
pub struct Label {
    base: WidgetBase,
    text: String,
    runs: Vec<StyledRun>,
    decoder: MarkupDecoder,
    colors: LabelColors,
    color: Color,
    justify: HorizontalAlign,
    width: Option<f32>,
    multiline: bool,
    outline: Option<LabelOutline>,
    command: Option<Command>,
    bindings: Vec<Key>,
    layout: Option<TextLayout>,
    layout_dirty: bool,
}

impl Label {
    /// A single-line, left-justified label with default colors.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> WidgetResult<Self> {
        Self::builder(text, x, y).build()
    }

    pub fn builder(text: impl Into<String>, x: f32, y: f32) -> LabelBuilder {
        LabelBuilder {
            text: text.into(),
            x,
            y,
            font: Font::default(),
            colors: LabelColors::default(),
            justify: HorizontalAlign::Left.name().to_string(),
            width: None,
            multiline: false,
            outline: None,
            command: None,
        }
    }

    /// The markup source.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text with markup stripped.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.runs = self.decoder.decode(&text);
        self.text = text;
        self.layout_dirty = true;
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn font(&self) -> &Font {
        self.decoder.font()
    }

    pub fn set_font(&mut self, font: Font) -> WidgetResult<()> {
        self.decoder = MarkupDecoder::new(font)?;
        self.runs = self.decoder.decode(&self.text);
        self.layout_dirty = true;
        Ok(())
    }

    pub fn colors(&self) -> LabelColors {
        self.colors
    }

    pub fn set_colors(&mut self, colors: LabelColors) {
        self.colors = colors;
    }

    /// The color the text is currently drawn with.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn justify(&self) -> HorizontalAlign {
        self.justify
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn layout(&self) -> Option<&TextLayout> {
        self.layout.as_ref()
    }

    pub fn set_command(&mut self, command: impl FnMut() + 'static) {
        self.command = Some(Box::new(command));
    }

    /// Replace the key bindings.
    pub fn bind(&mut self, keys: &[Key]) -> &[Key] {
        self.bindings = keys.to_vec();
        &self.bindings
    }

    /// Remove keys from the bindings.
    pub fn unbind(&mut self, keys: &[Key]) -> &[Key] {
        self.bindings.retain(|key| !keys.contains(key));
        &self.bindings
    }

    pub fn bindings(&self) -> &[Key] {
        &self.bindings
    }

    /// Run the command unless disabled. Returns whether it ran.
    pub fn invoke(&mut self) -> bool {
        if self.base.is_disabled() {
            return false;
        }
        let Some(command) = self.command.as_mut() else {
            return false;
        };
        self.base.set_pressed(true);
        command();
        true
    }

    fn state_color(&self) -> Color {
        let base = &self.base;
        if base.is_disabled() {
            self.colors.disable
        } else if base.is_pressed() {
            self.colors.press
        } else if base.is_hovered() || base.has_focus() {
            self.colors.hover
        } else {
            self.colors.normal
        }
    }

    fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            width: self.width,
            multiline: self.multiline,
            align: self.justify,
        }
    }

    fn relayout(&mut self, renderer: &mut dyn Renderer) {
        let options = self.layout_options();
        self.layout = Some(renderer.layout_text(&self.runs, self.decoder.font(), &options));
        self.layout_dirty = false;
    }
}

impl Widget for Label {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn create(&mut self, renderer: &mut dyn Renderer) -> WidgetResult<()> {
        self.relayout(renderer);
        Ok(())
    }

    fn intrinsic_size(&self) -> Size {
        self.layout
            .as_ref()
            .map_or(Size::ZERO, HasIntrinsicSize::intrinsic_size)
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        if let InputEvent::KeyPress { key, .. } = input
            && self.bindings.contains(key)
        {
            self.invoke();
        }
        dispatch_input(self, input, ctx)
    }

    fn event(&mut self, event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        match event {
            WidgetEvent::Press {
                button: MouseButton::Left,
                ..
            } => {
                self.invoke();
            }
            WidgetEvent::Update { .. } if !self.multiline => {
                self.color = self.state_color();
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, renderer: &mut dyn Renderer) {
        if self.layout_dirty {
            self.relayout(renderer);
        }
        let bounds = self.bounds();
        if let Some(outline) = self.outline {
            let Point { x, y, .. } = self.center();
            let padded = self.size().padded(outline.padding);
            renderer.stroke_rect(&Outline::new(
                Bounds::from_center(&Point::new(x, y), padded.width, padded.height),
                outline.color,
                outline.thickness,
            ));
        }
        if let Some(layout) = &self.layout
            && !layout.runs.is_empty()
        {
            renderer.draw_text(layout, bounds, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use trellis_render::{DrawCommand, RecordingRenderer};

    use super::*;

    #[test]
    fn test_rejects_unknown_justification() {
        let result = Label::builder("hi", 0.0, 0.0).justify("middle").build();
        assert!(matches!(
            result,
            Err(WidgetError::Configuration { widget: "Label", .. })
        ));
    }

    #[test]
    fn test_multiline_requires_width() {
        assert!(Label::builder("hi", 0.0, 0.0).multiline(true).build().is_err());
        assert!(
            Label::builder("hi", 0.0, 0.0)
                .multiline(true)
                .width(0.0)
                .build()
                .is_err()
        );
        assert!(
            Label::builder("hi", 0.0, 0.0)
                .multiline(true)
                .width(120.0)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_markup_is_decoded() {
        let mut label = Label::new("<b>Save</b> all", 0.0, 0.0).unwrap();
        assert_eq!(label.plain_text(), "Save all");
        assert!(label.runs()[0].style.bold);

        label.set_text("plain");
        assert_eq!(label.runs().len(), 1);
    }

    #[test]
    fn test_size_comes_from_layout() {
        let mut label = Label::new("abcd", 50.0, 50.0).unwrap();
        assert_eq!(label.size(), Size::ZERO);

        label.create(&mut RecordingRenderer::new()).unwrap();
        let expected = 4.0 * 12.0 * TextLayout::GLYPH_ADVANCE;
        assert!((label.width() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_invoke_needs_command_and_enabled() {
        let count = Rc::new(Cell::new(0));
        let mut label = Label::new("go", 0.0, 0.0).unwrap();
        assert!(!label.invoke());

        let counter = Rc::clone(&count);
        label.set_command(move || counter.set(counter.get() + 1));
        assert!(label.invoke());
        assert!(label.widget_base().is_pressed());

        label.widget_base_mut().set_disabled(true);
        assert!(!label.invoke());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_bind_and_unbind() {
        let mut label = Label::new("go", 0.0, 0.0).unwrap();
        assert_eq!(label.bind(&[Key::Enter, Key::Space]), &[Key::Enter, Key::Space]);
        assert_eq!(label.unbind(&[Key::Enter]), &[Key::Space]);
    }

    #[test]
    fn test_outline_and_text_drawn() {
        let mut renderer = RecordingRenderer::new();
        let mut label = Label::builder("ok", 0.0, 0.0)
            .outline(LabelOutline {
                color: Color::BLUE,
                padding: 4.0,
                thickness: 1.0,
            })
            .build()
            .unwrap();
        label.create(&mut renderer).unwrap();
        label.draw(&mut renderer);

        assert!(matches!(renderer.pending()[0], DrawCommand::Outline(_)));
        assert!(matches!(&renderer.pending()[1], DrawCommand::Text { text, .. } if text == "ok"));
    }
}
