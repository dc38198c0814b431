//! Push button: a state-textured image with a label on top.

use std::path::PathBuf;

use trellis_core::Signal;
use trellis_render::{Font, Point, Renderer, Texture};

use super::{CallbackMode, Command, Image, Label, LabelColors, assets};
use crate::error::WidgetResult;
use crate::widget::{
    DispatchContext, InputEvent, Key, MouseButton, Widget, WidgetBase, WidgetEvent, dispatch_input,
};

/// Texture paths for each button state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonTextures {
    pub normal: PathBuf,
    pub hover: PathBuf,
    pub press: PathBuf,
    pub disable: PathBuf,
}

impl ButtonTextures {
    /// The bundled textures of a color set, such as `"yellow"`.
    pub fn color_set(color: &str) -> Self {
        Self {
            normal: assets::button(color, "normal").into(),
            hover: assets::button(color, "hover").into(),
            press: assets::button(color, "press").into(),
            disable: assets::button(color, "disable").into(),
        }
    }
}

impl Default for ButtonTextures {
    fn default() -> Self {
        Self::color_set("yellow")
    }
}

#[derive(Debug, Clone)]
struct LoadedTextures {
    normal: Texture,
    hover: Texture,
    press: Texture,
    disable: Texture,
}

/// A clickable button.
///
/// Activated by a left press, by Space while focused, or by any bound key
/// regardless of focus. The [`CallbackMode`] decides whether a held
/// activation repeats on every update.
pub struct Button {
    base: WidgetBase,
    image: Image,
    label: Label,
    textures: ButtonTextures,
    loaded: Option<LoadedTextures>,
    callback: CallbackMode,
    command: Option<Command>,
    link: Option<String>,
    bindings: Vec<Key>,
    /// Emitted on every activation, before the command runs.
    pub pushed: Signal<()>,
    /// Emitted with the link after an activation, when one is set.
    pub link_opened: Signal<String>,
}

impl Button {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> WidgetResult<Self> {
        let textures = ButtonTextures::default();
        Ok(Self {
            base: WidgetBase::new(x, y),
            image: Image::new(textures.normal.clone(), x, y),
            label: Label::builder(text, x, y).justify("center").build()?,
            textures,
            loaded: None,
            callback: CallbackMode::Single,
            command: None,
            link: None,
            bindings: Vec::new(),
            pushed: Signal::new(),
            link_opened: Signal::new(),
        })
    }

    pub fn with_textures(mut self, textures: ButtonTextures) -> Self {
        self.image = Image::new(textures.normal.clone(), self.x(), self.y());
        self.textures = textures;
        self
    }

    pub fn with_callback(mut self, callback: CallbackMode) -> Self {
        self.callback = callback;
        self
    }

    /// Set the callback mode from its numeric code (1, 2, or 3).
    pub fn with_callback_code(self, code: u8) -> WidgetResult<Self> {
        let callback = CallbackMode::from_code("Button", code)?;
        Ok(self.with_callback(callback))
    }

    pub fn with_command(mut self, command: impl FnMut() + 'static) -> Self {
        self.command = Some(Box::new(command));
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_font(mut self, font: Font) -> WidgetResult<Self> {
        self.label.set_font(font)?;
        Ok(self)
    }

    pub fn with_colors(mut self, colors: LabelColors) -> Self {
        self.label.set_colors(colors);
        self
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn callback(&self) -> CallbackMode {
        self.callback
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
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

    /// Activate the button unless disabled or without a command.
    /// Returns whether it ran.
    pub fn invoke(&mut self) -> bool {
        if self.base.is_disabled() {
            return false;
        }
        let Some(command) = self.command.as_mut() else {
            return false;
        };
        self.base.set_pressed(true);
        self.pushed.emit(());
        command();
        if let Some(link) = &self.link {
            self.link_opened.emit(link.clone());
        }
        true
    }

    fn state_texture(&self) -> Option<&Texture> {
        let loaded = self.loaded.as_ref()?;
        let base = &self.base;
        Some(if base.is_disabled() {
            &loaded.disable
        } else if base.is_pressed() {
            &loaded.press
        } else if base.is_hovered() {
            &loaded.hover
        } else {
            &loaded.normal
        })
    }

    fn repeat(&mut self, ctx: &DispatchContext<'_>) {
        let bound_held = ctx.any_key_held(&self.bindings);
        let repeat = match self.callback {
            CallbackMode::Single => false,
            CallbackMode::Double => ctx.has_focus() && bound_held,
            CallbackMode::Multiple => self.base.is_pressed() || bound_held,
        };
        if repeat {
            self.invoke();
        }
    }
}

impl Widget for Button {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn children(&self) -> Vec<&dyn Widget> {
        vec![&self.image, &self.label]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Widget> {
        vec![&mut self.image, &mut self.label]
    }

    fn create(&mut self, renderer: &mut dyn Renderer) -> WidgetResult<()> {
        self.image.create(renderer)?;
        self.label.create(renderer)?;
        self.loaded = Some(LoadedTextures {
            normal: renderer.load_texture(&self.textures.normal)?,
            hover: renderer.load_texture(&self.textures.hover)?,
            press: renderer.load_texture(&self.textures.press)?,
            disable: renderer.load_texture(&self.textures.disable)?,
        });
        self.image.mount();
        self.label.mount();
        Ok(())
    }

    fn update_position(&mut self, center: Point) {
        self.image.set_center(center);
        self.label.set_center(center);
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        if let InputEvent::KeyPress { key, .. } = input
            && self.bindings.contains(key)
        {
            self.invoke();
        }
        dispatch_input(self, input, ctx)
    }

    fn event(&mut self, event: &WidgetEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        match event {
            WidgetEvent::Press {
                button: MouseButton::Left,
                ..
            } => {
                self.invoke();
            }
            WidgetEvent::Key { key: Key::Space, .. } => {
                self.invoke();
            }
            WidgetEvent::Update { .. } => {
                self.repeat(ctx);
                if let Some(texture) = self.state_texture().cloned() {
                    self.image.set_texture(texture);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
