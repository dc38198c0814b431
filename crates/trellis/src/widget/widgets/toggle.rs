//! Two-state switch with a sliding knob.

use std::path::PathBuf;

use trellis_core::Signal;
use trellis_render::{Font, Point, Renderer, Texture};

use super::{
    CallbackMode, Image, KNOB_HOVER_SCALE, KNOB_SCALE, Label, LabelColors, TOGGLE_FADE,
    TOGGLE_VELOCITY, assets,
};
use crate::error::WidgetResult;
use crate::widget::{DispatchContext, Key, MouseButton, Widget, WidgetBase, WidgetEvent};

/// Bar texture paths for each value and hover state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleTextures {
    pub on: PathBuf,
    pub off: PathBuf,
    pub hover_on: PathBuf,
    pub hover_off: PathBuf,
}

impl Default for ToggleTextures {
    fn default() -> Self {
        Self {
            on: assets::TOGGLE_TRUE.into(),
            off: assets::TOGGLE_FALSE.into(),
            hover_on: assets::TOGGLE_TRUE_HOVER.into(),
            hover_off: assets::TOGGLE_FALSE_HOVER.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedTextures {
    on: Texture,
    off: Texture,
    hover_on: Texture,
    hover_off: Texture,
}

impl LoadedTextures {
    fn pick(&self, value: bool, hover: bool) -> &Texture {
        match (value, hover) {
            (true, false) => &self.on,
            (false, false) => &self.off,
            (true, true) => &self.hover_on,
            (false, true) => &self.hover_off,
        }
    }
}

/// An on/off switch.
///
/// `true` keeps the knob against the bar's left edge. A left press (without
/// Control) or Space/Enter while focused starts a switch; the knob then
/// slides [`TOGGLE_VELOCITY`] pixels per update to the other side, fading
/// the bar out and back in, and [`toggled`](Self::toggled) fires with the
/// new value on arrival.
pub struct Toggle {
    base: WidgetBase,
    bar: Image,
    knob: Image,
    label: Label,
    textures: ToggleTextures,
    loaded: Option<LoadedTextures>,
    padding: f32,
    callback: CallbackMode,
    value: bool,
    switching: bool,
    /// Emitted with the new value when a switch completes.
    pub toggled: Signal<bool>,
}

impl Toggle {
    pub const DEFAULT_PADDING: f32 = 160.0;

    pub fn new(text: impl Into<String>, x: f32, y: f32) -> WidgetResult<Self> {
        let textures = ToggleTextures::default();
        Ok(Self {
            base: WidgetBase::new(x, y),
            bar: Image::new(textures.on.clone(), x, y),
            knob: Image::new(assets::KNOB, x, y).with_scale(KNOB_SCALE),
            label: Label::new(text, x, y)?,
            textures,
            loaded: None,
            padding: Self::DEFAULT_PADDING,
            callback: CallbackMode::Single,
            value: true,
            switching: false,
            toggled: Signal::new(),
        })
    }

    /// Starting value.
    pub fn with_default(mut self, value: bool) -> Self {
        self.value = value;
        let path = if value { &self.textures.on } else { &self.textures.off };
        self.bar = Image::new(path.clone(), self.x(), self.y());
        self
    }

    pub fn with_textures(mut self, textures: ToggleTextures) -> Self {
        let path = if self.value { &textures.on } else { &textures.off };
        self.bar = Image::new(path.clone(), self.x(), self.y());
        self.textures = textures;
        self
    }

    /// Gap between the bar's left edge and the label.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_callback(mut self, callback: CallbackMode) -> Self {
        self.callback = callback;
        self
    }

    /// Set the callback mode from its numeric code (1, 2, or 3).
    pub fn with_callback_code(self, code: u8) -> WidgetResult<Self> {
        let callback = CallbackMode::from_code("Toggle", code)?;
        Ok(self.with_callback(callback))
    }

    pub fn with_font(mut self, font: Font) -> WidgetResult<Self> {
        self.label.set_font(font)?;
        Ok(self)
    }

    pub fn with_colors(mut self, colors: LabelColors) -> Self {
        self.label.set_colors(colors);
        self
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn is_switching(&self) -> bool {
        self.switching
    }

    /// Start sliding to the other value.
    pub fn switch(&mut self) {
        self.switching = true;
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }

    pub fn bar(&self) -> &Image {
        &self.bar
    }

    pub fn knob(&self) -> &Image {
        &self.knob
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    fn rest_knob(&mut self) {
        if self.value {
            let left = self.bar.left();
            self.knob.set_left(left);
        } else {
            let right = self.bar.right();
            self.knob.set_right(right);
        }
    }

    fn slide(&mut self) {
        let hover = self.base.is_hovered();
        let middle = self.x();
        if self.value {
            if self.knob.right() < self.bar.right() - 3.0 {
                let x = self.knob.x() + TOGGLE_VELOCITY;
                self.knob.set_x(x);
            } else {
                self.finish(false);
            }
            self.fade(self.knob.x() < middle, self.knob.x() > middle, false, hover);
        } else {
            if self.knob.left() > self.bar.left() + 2.0 {
                let x = self.knob.x() - TOGGLE_VELOCITY;
                self.knob.set_x(x);
            } else {
                self.finish(true);
            }
            self.fade(self.knob.x() > middle, self.knob.x() < middle, true, hover);
        }
    }

    /// Fade the bar out before the middle and back in, showing `target`,
    /// after it.
    fn fade(&mut self, before: bool, after: bool, target: bool, hover: bool) {
        if before {
            self.bar.set_alpha(self.bar.alpha().saturating_sub(TOGGLE_FADE));
        } else if after {
            self.bar.set_alpha(self.bar.alpha().saturating_add(TOGGLE_FADE));
            if let Some(texture) = self.loaded.as_ref().map(|l| l.pick(target, hover).clone()) {
                self.bar.set_texture(texture);
            }
        }
    }

    fn finish(&mut self, value: bool) {
        self.value = value;
        self.switching = false;
        self.toggled.emit(value);
    }

    fn refresh(&mut self, ctx: &DispatchContext<'_>) {
        if self.callback == CallbackMode::Multiple && ctx.is_key_held(Key::Space) {
            self.switching = true;
        }
        let disabled = self.base.is_disabled();
        if self.switching && !disabled {
            self.slide();
        } else if let Some(loaded) = &self.loaded {
            let hover = self.base.is_hovered() && !disabled;
            let texture = loaded.pick(self.value, hover).clone();
            self.bar.set_texture(texture);
        }
        let scale = if self.knob.widget_base().is_hovered() {
            KNOB_HOVER_SCALE
        } else {
            KNOB_SCALE
        };
        self.knob.set_scale(scale);
    }
}

impl Widget for Toggle {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Toggle"
    }

    fn children(&self) -> Vec<&dyn Widget> {
        vec![&self.bar, &self.knob, &self.label]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Widget> {
        vec![&mut self.bar, &mut self.knob, &mut self.label]
    }

    fn create(&mut self, renderer: &mut dyn Renderer) -> WidgetResult<()> {
        for child in self.children_mut() {
            child.create(renderer)?;
            child.mount();
        }
        self.loaded = Some(LoadedTextures {
            on: renderer.load_texture(&self.textures.on)?,
            off: renderer.load_texture(&self.textures.off)?,
            hover_on: renderer.load_texture(&self.textures.hover_on)?,
            hover_off: renderer.load_texture(&self.textures.hover_off)?,
        });
        self.rest_knob();
        Ok(())
    }

    fn update_position(&mut self, center: Point) {
        let dx = center.x - self.bar.x();
        self.bar.set_center(center);
        let knob_x = self.knob.x() + dx;
        self.knob.set_center(Point::new(knob_x, center.y));
        let label_x = self.bar.left() - self.padding;
        self.label.set_center(Point::new(label_x, center.y));
    }

    fn event(&mut self, event: &WidgetEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        match event {
            WidgetEvent::Press {
                button: MouseButton::Left,
                modifiers,
                ..
            } if !modifiers.control => self.switch(),
            WidgetEvent::Key {
                key: Key::Space | Key::Enter,
                ..
            } => self.switch(),
            WidgetEvent::Update { .. } => self.refresh(ctx),
            _ => {}
        }
        Ok(())
    }
}
