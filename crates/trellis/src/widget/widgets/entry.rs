//! Single-line text input.
//!
//! The caret `index` and selection `mark` count grapheme clusters, so a
//! combining sequence or an emoji with modifiers moves and deletes as one
//! unit.

use std::path::PathBuf;

use regex::Regex;
use trellis_core::Signal;
use trellis_render::{
    Bounds, Color, Font, LayoutOptions, Outline, Point, Renderer, StyledRun, TextLayout, TextStyle,
    Texture,
};
use unicode_segmentation::UnicodeSegmentation;

use super::{ENTRY_BLINK_INTERVAL, Image, assets};
use crate::error::{WidgetError, WidgetResult};
use crate::widget::{
    DispatchContext, Key, MouseButton, TextMotion, Widget, WidgetBase, WidgetEvent,
};

/// Gap between the frame's left edge and the first glyph.
const TEXT_INSET: f32 = 5.0;
const CARET_THICKNESS: f32 = 1.0;

/// Frame texture paths for each state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTextures {
    pub normal: PathBuf,
    pub hover: PathBuf,
    pub focus: PathBuf,
}

impl Default for EntryTextures {
    fn default() -> Self {
        Self {
            normal: assets::ENTRY_NORMAL.into(),
            hover: assets::ENTRY_HOVER.into(),
            focus: assets::ENTRY_FOCUS.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedTextures {
    normal: Texture,
    hover: Texture,
    focus: Texture,
}

/// A selected span of an entry's text, in grapheme indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// An editable line of text inside a frame.
///
/// Typing and caret motion need focus. Pressing places the caret under the
/// pointer, Shift-press and dragging select, Ctrl-A selects everything,
/// and Alt-Left/Alt-Right walk back and forth through previous press
/// positions.
///
/// When a validator is set, an edit whose result does not match it is
/// rolled back.
pub struct Entry {
    base: WidgetBase,
    frame: Image,
    textures: EntryTextures,
    loaded: Option<LoadedTextures>,
    text: String,
    default_text: String,
    placeholder: Option<String>,
    font: Font,
    color: Color,
    index: usize,
    mark: Option<usize>,
    max_length: usize,
    validator: Option<Regex>,
    title_case: bool,
    history: Vec<usize>,
    history_index: usize,
    blink_elapsed: f32,
    caret_visible: bool,
    layout: Option<TextLayout>,
    layout_dirty: bool,
    /// Emitted with `(text, previous text)` after the text changes.
    pub text_edited: Signal<(String, String)>,
    /// Emitted with the caret index and the selected range after the caret
    /// or selection moves.
    pub text_interacted: Signal<(usize, Option<(usize, usize)>)>,
    /// Emitted with the caret visibility on every blink.
    pub blinked: Signal<bool>,
}

impl Entry {
    pub const DEFAULT_WIDTH: f32 = 200.0;
    pub const DEFAULT_HEIGHT: f32 = 80.0;

    /// Create an entry showing `text`. The text is cleared the first time
    /// the entry gains focus.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        let textures = EntryTextures::default();
        let text = text.into();
        Self {
            base: WidgetBase::new(x, y),
            frame: Image::new(textures.normal.clone(), x, y)
                .with_width(Self::DEFAULT_WIDTH)
                .with_height(Self::DEFAULT_HEIGHT),
            textures,
            loaded: None,
            default_text: text.clone(),
            text,
            placeholder: None,
            font: Font::default(),
            color: Color::BLACK,
            index: 0,
            mark: None,
            max_length: usize::MAX,
            validator: None,
            title_case: true,
            history: Vec::new(),
            history_index: 0,
            blink_elapsed: 0.0,
            caret_visible: false,
            layout: None,
            layout_dirty: true,
            text_edited: Signal::new(),
            text_interacted: Signal::new(),
            blinked: Signal::new(),
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.frame = Image::new(self.textures.normal.clone(), self.x(), self.y())
            .with_width(width)
            .with_height(height);
        self
    }

    pub fn with_textures(mut self, textures: EntryTextures) -> Self {
        let size = self.frame.size();
        self.frame = Image::new(textures.normal.clone(), self.x(), self.y())
            .with_width(size.width)
            .with_height(size.height);
        self.textures = textures;
        self
    }

    /// Text that is cleared when the entry is pressed.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Maximum number of graphemes.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Reject edits whose result does not match `pattern`.
    pub fn with_validator(mut self, pattern: &str) -> WidgetResult<Self> {
        let validator = Regex::new(pattern).map_err(|err| {
            WidgetError::configuration("Entry", format!("invalid validator {pattern:?}: {err}"))
        })?;
        self.validator = Some(validator);
        Ok(self)
    }

    /// Capitalize the first character typed into an empty entry.
    pub fn with_title_case(mut self, title_case: bool) -> Self {
        self.title_case = title_case;
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self.layout_dirty = true;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of graphemes.
    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn frame(&self) -> &Image {
        &self.frame
    }

    pub fn layout(&self) -> Option<&TextLayout> {
        self.layout.as_ref()
    }

    pub fn is_caret_visible(&self) -> bool {
        self.caret_visible
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the caret, clamped to the text.
    pub fn set_index(&mut self, index: usize) {
        let index = index.min(self.len());
        if index == self.index {
            return;
        }
        self.index = index;
        self.text_interacted.emit((index, self.selection_range()));
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    /// The selected span, if the mark and caret differ.
    pub fn selection(&self) -> Option<Selection> {
        let (start, end) = self.selection_range()?;
        let text = self.slice(start, end).to_string();
        Some(Selection { start, end, text })
    }

    /// Select all text and put the caret at the end.
    pub fn select_all(&mut self) {
        let len = self.len();
        self.mark = Some(0);
        self.index = len;
        self.text_interacted.emit((len, self.selection_range()));
    }

    /// Replace the whole text. The caret is clamped and the selection
    /// dropped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let before = std::mem::replace(&mut self.text, text.into());
        self.index = self.index.min(self.len());
        self.mark = None;
        self.edited(before);
    }

    /// Empty the text and reset the caret.
    pub fn clear(&mut self) {
        self.set_text(String::new());
        self.index = 0;
    }

    /// Insert `text` at grapheme `index`, advancing the caret past it when
    /// `change_index` is set.
    pub fn insert(&mut self, index: usize, text: &str, change_index: bool) {
        let before = self.text.clone();
        self.insert_raw(index, text);
        self.edited(before);
        if change_index {
            let advanced = self.index + text.graphemes(true).count();
            self.set_index(advanced);
        }
    }

    /// Remove graphemes `start..end` and return them. The caret shifts with
    /// the text and the selection is dropped.
    pub fn delete(&mut self, start: usize, end: usize) -> String {
        let before = self.text.clone();
        let removed = self.delete_raw(start, end);
        self.mark = None;
        self.edited(before);
        removed
    }

    fn selection_range(&self) -> Option<(usize, usize)> {
        let mark = self.mark?;
        (mark != self.index).then(|| (mark.min(self.index), mark.max(self.index)))
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn grapheme_at_byte(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .take_while(|(start, _)| *start < offset)
            .count()
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    fn insert_raw(&mut self, index: usize, text: &str) {
        let offset = self.byte_offset(index.min(self.len()));
        self.text.insert_str(offset, text);
        self.layout_dirty = true;
    }

    fn delete_raw(&mut self, start: usize, end: usize) -> String {
        let len = self.len();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        let range = self.byte_offset(start)..self.byte_offset(end);
        let removed: String = self.text.drain(range).collect();
        let count = end - start;
        if self.index >= end {
            self.index -= count;
        } else if self.index > start {
            self.index = start;
        }
        self.layout_dirty = true;
        removed
    }

    fn edited(&mut self, before: String) {
        if before != self.text {
            self.layout_dirty = true;
            self.text_edited.emit((self.text.clone(), before));
        }
    }

    fn interacted(&self) {
        self.text_interacted.emit((self.index, self.selection_range()));
    }

    fn type_text(&mut self, typed: &str) {
        let mut typed = typed.to_string();
        if self.title_case && self.text.is_empty() {
            typed = capitalize(&typed);
        }

        let before = self.text.clone();
        let (index, mark) = (self.index, self.mark);
        if let Some((start, end)) = self.selection_range() {
            self.delete_raw(start, end);
            self.mark = None;
        }

        let room = self.max_length.saturating_sub(self.len());
        let typed: String = typed.graphemes(true).take(room).collect();
        if typed.is_empty() {
            self.text = before;
            self.index = index;
            self.mark = mark;
            return;
        }
        self.insert_raw(self.index, &typed);
        self.index += typed.graphemes(true).count();

        if let Some(validator) = &self.validator
            && !validator.is_match(&self.text)
        {
            self.text = before;
            self.index = index;
            self.mark = mark;
            return;
        }
        self.edited(before);
    }

    fn word_left(&self) -> usize {
        self.text
            .split_word_bound_indices()
            .filter(|(_, word)| !word.trim().is_empty())
            .map(|(offset, _)| self.grapheme_at_byte(offset))
            .filter(|&start| start < self.index)
            .last()
            .unwrap_or(0)
    }

    fn word_right(&self) -> usize {
        self.text
            .split_word_bound_indices()
            .filter(|(_, word)| !word.trim().is_empty())
            .map(|(offset, word)| self.grapheme_at_byte(offset + word.len()))
            .find(|&end| end > self.index)
            .unwrap_or_else(|| self.len())
    }

    fn motion(&mut self, motion: TextMotion, select: bool) {
        match motion {
            TextMotion::Backspace | TextMotion::Delete => {
                let before = self.text.clone();
                if let Some((start, end)) = self.selection_range() {
                    self.delete_raw(start, end);
                } else if motion == TextMotion::Backspace && self.index > 0 {
                    self.delete_raw(self.index - 1, self.index);
                } else if motion == TextMotion::Delete && self.index < self.len() {
                    self.delete_raw(self.index, self.index + 1);
                }
                self.mark = None;
                self.edited(before);
                return;
            }
            _ => {}
        }

        let target = match motion {
            TextMotion::Left => self.index.saturating_sub(1),
            TextMotion::Right => (self.index + 1).min(self.len()),
            TextMotion::WordLeft => self.word_left(),
            TextMotion::WordRight => self.word_right(),
            TextMotion::LineStart | TextMotion::DocumentStart => 0,
            TextMotion::LineEnd | TextMotion::DocumentEnd => self.len(),
            TextMotion::Backspace | TextMotion::Delete => self.index,
        };
        if select {
            self.mark.get_or_insert(self.index);
        } else {
            self.mark = None;
        }
        self.index = target;
        self.interacted();
    }

    fn walk_history(&mut self, step: isize) {
        if self.history.is_empty() {
            return;
        }
        let last = self.history.len() as isize - 1;
        let position = (self.history_index as isize + step).clamp(0, last);
        self.history_index = position as usize;
        self.set_index(self.history[self.history_index]);
    }

    fn text_origin(&self) -> f32 {
        self.frame.left() + TEXT_INSET
    }

    fn advance(&self) -> f32 {
        self.font.size * TextLayout::GLYPH_ADVANCE
    }

    /// Caret index nearest to `x`.
    fn index_at(&self, x: f32) -> usize {
        let column = ((x - self.text_origin()) / self.advance()).round();
        (column.max(0.0) as usize).min(self.len())
    }

    fn press_at(&mut self, position: Point, shift: bool) {
        if self.placeholder.as_deref() == Some(self.text.as_str()) {
            self.clear();
        }
        let before = self.index;
        let after = self.index_at(position.x);
        self.mark = shift.then_some(before);
        if after != before {
            self.index = after;
            self.history.push(after);
            self.history_index = self.history.len() - 1;
        }
        self.interacted();
    }

    fn drag_to(&mut self, position: Point) {
        self.mark.get_or_insert(self.index);
        self.index = self.index_at(position.x);
        self.interacted();
    }

    fn refresh(&mut self, focused: bool, delta: f32) {
        let texture = self.loaded.as_ref().map(|loaded| {
            if focused {
                loaded.focus.clone()
            } else if self.base.is_hovered() && !self.base.is_disabled() {
                loaded.hover.clone()
            } else {
                loaded.normal.clone()
            }
        });
        if let Some(texture) = texture {
            self.frame.set_texture(texture);
        }

        if focused {
            self.blink_elapsed += delta;
            if self.blink_elapsed >= ENTRY_BLINK_INTERVAL {
                self.blink_elapsed = 0.0;
                self.caret_visible = !self.caret_visible;
                self.blinked.emit(self.caret_visible);
            }
        } else {
            self.index = 0;
            self.mark = None;
            self.caret_visible = false;
            self.blink_elapsed = 0.0;
        }
    }

    fn relayout(&mut self, renderer: &mut dyn Renderer) {
        let run = StyledRun {
            text: self.text.clone(),
            style: TextStyle {
                bold: self.font.bold,
                italic: self.font.italic,
                underline: false,
                color: None,
                size: self.font.size,
            },
        };
        let options = LayoutOptions::default();
        self.layout = Some(renderer.layout_text(&[run], &self.font, &options));
        self.layout_dirty = false;
    }

    fn caret_bounds(&self) -> Bounds {
        let x = self.text_origin() + self.index as f32 * self.advance();
        let half = self.font.size * TextLayout::LINE_SPACING / 2.0;
        let y = self.y();
        Bounds::new(x, x + CARET_THICKNESS, y + half, y - half)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Widget for Entry {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Entry"
    }

    fn children(&self) -> Vec<&dyn Widget> {
        vec![&self.frame]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Widget> {
        vec![&mut self.frame]
    }

    fn create(&mut self, renderer: &mut dyn Renderer) -> WidgetResult<()> {
        self.frame.create(renderer)?;
        self.loaded = Some(LoadedTextures {
            normal: renderer.load_texture(&self.textures.normal)?,
            hover: renderer.load_texture(&self.textures.hover)?,
            focus: renderer.load_texture(&self.textures.focus)?,
        });
        self.frame.mount();
        self.relayout(renderer);
        Ok(())
    }

    fn update_position(&mut self, center: Point) {
        self.frame.set_center(center);
    }

    fn event(&mut self, event: &WidgetEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        match event {
            WidgetEvent::Text(typed) => self.type_text(typed),
            WidgetEvent::TextMotion { motion, select } => {
                let sideways = matches!(motion, TextMotion::Left | TextMotion::Right);
                if !(sideways && ctx.any_key_held(&[Key::AltLeft, Key::AltRight])) {
                    self.motion(*motion, *select);
                }
            }
            WidgetEvent::Key { key, modifiers } => match key {
                Key::A if modifiers.control => self.select_all(),
                Key::ArrowLeft if modifiers.alt => self.walk_history(-1),
                Key::ArrowRight if modifiers.alt => self.walk_history(1),
                _ => {}
            },
            WidgetEvent::Press {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.press_at(*position, modifiers.shift),
            WidgetEvent::Drag { position, .. } => self.drag_to(*position),
            WidgetEvent::Focus(_) => {
                if self.text == self.default_text {
                    self.clear();
                }
                self.caret_visible = true;
                self.blink_elapsed = 0.0;
            }
            WidgetEvent::Update { delta } => self.refresh(ctx.has_focus(), *delta),
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, renderer: &mut dyn Renderer) {
        if self.layout_dirty || self.layout.is_none() {
            self.relayout(renderer);
        }
        if let Some(layout) = &self.layout
            && !self.text.is_empty()
        {
            let origin = self.text_origin();
            let half = layout.content_size.height / 2.0;
            let y = self.y();
            let bounds = Bounds::new(origin, origin + layout.content_size.width, y + half, y - half);
            renderer.draw_text(layout, bounds, self.color);
        }
        if self.base.has_focus() && self.caret_visible {
            renderer.stroke_rect(&Outline::new(self.caret_bounds(), self.color, CARET_THICKNESS));
        }
    }
}
