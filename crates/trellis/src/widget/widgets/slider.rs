//! Horizontal value slider.

use trellis_core::Signal;
use trellis_render::{Font, Point, Renderer};

use super::{Image, KNOB_HOVER_SCALE, KNOB_SCALE, Label, LabelColors, SLIDER_VELOCITY, assets};
use crate::error::WidgetResult;
use crate::widget::{DispatchContext, Key, Widget, WidgetBase, WidgetEvent};

/// Direction of the last glide, reported by [`Slider::slide_finished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideSide {
    Left,
    Right,
}

/// A bar with a knob that selects a value in `0..=size`.
///
/// Pressing or dragging sets a destination; the knob then glides there at
/// [`SLIDER_VELOCITY`] pixels per update, recomputing the value as it
/// moves. The label on the left shows the value.
pub struct Slider {
    base: WidgetBase,
    bar: Image,
    knob: Image,
    label: Label,
    size: f32,
    length: f32,
    padding: f32,
    digits: Option<u32>,
    value: f32,
    destination: Option<f32>,
    /// Emitted with the current value when a glide starts.
    pub slide_started: Signal<f32>,
    /// Emitted with the new value every time the knob moves.
    pub slide_moved: Signal<f32>,
    /// Emitted when the knob reaches its destination.
    pub slide_finished: Signal<SlideSide>,
}

impl Slider {
    pub const DEFAULT_SIZE: f32 = 100.0;
    pub const DEFAULT_LENGTH: f32 = 200.0;
    pub const DEFAULT_PADDING: f32 = 50.0;

    pub fn new(x: f32, y: f32) -> WidgetResult<Self> {
        Ok(Self {
            base: WidgetBase::new(x, y),
            bar: Image::new(assets::SLIDER_HORIZONTAL, x, y).with_width(Self::DEFAULT_LENGTH),
            knob: Image::new(assets::KNOB, x, y).with_scale(KNOB_SCALE),
            label: Label::new("0", x, y)?,
            size: Self::DEFAULT_SIZE,
            length: Self::DEFAULT_LENGTH,
            padding: Self::DEFAULT_PADDING,
            digits: None,
            value: 0.0,
            destination: None,
            slide_started: Signal::new(),
            slide_moved: Signal::new(),
            slide_finished: Signal::new(),
        })
    }

    /// Number of values; the value ranges over `0..=size`.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Bar length in pixels.
    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self.bar.set_width(Some(length));
        self
    }

    /// Gap between the bar's left edge and the label.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Decimal digits kept in the value; `None` rounds to whole numbers.
    pub fn with_round(mut self, digits: Option<u32>) -> Self {
        self.digits = digits;
        self
    }

    pub fn with_default(mut self, value: f32) -> Self {
        self.set_value(value);
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

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Clamp into `0..=size`, round, and snap the knob.
    pub fn set_value(&mut self, value: f32) {
        self.value = self.round(value.max(0.0).min(self.size));
        self.place_knob();
        self.label.set_text(self.format_value());
    }

    pub fn size_range(&self) -> f32 {
        self.size
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn destination(&self) -> Option<f32> {
        self.destination
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

    /// Leftmost and rightmost knob centers.
    pub fn knob_range(&self) -> (f32, f32) {
        let half = self.knob.width() / 2.0;
        (self.bar.left() + half, self.bar.right() - half)
    }

    /// Start a glide toward `x`, clamped to the knob range.
    pub fn update_knob(&mut self, x: f32) {
        let (min, max) = self.knob_range();
        self.destination = Some(x.max(min).min(max));
        self.slide_started.emit(self.value);
    }

    /// Recompute the value from the knob position.
    ///
    /// Does nothing when the knob range is empty.
    pub fn reposition_knob(&mut self) {
        let (min, max) = self.knob_range();
        let span = max - min;
        if span <= 0.0 {
            return;
        }
        let value = (self.knob.x() - min) / span * self.size;
        self.value = self.round(value.max(0.0).min(self.size));
        self.slide_moved.emit(self.value);
        self.label.set_text(self.format_value());
    }

    fn round(&self, value: f32) -> f32 {
        match self.digits {
            Some(digits) => {
                let factor = 10f32.powi(digits as i32);
                (value * factor).round() / factor
            }
            None => value.round(),
        }
    }

    fn format_value(&self) -> String {
        match self.digits {
            Some(digits) => format!("{:.*}", digits as usize, self.value),
            None => format!("{}", self.value as i64),
        }
    }

    fn place_knob(&mut self) {
        let (min, max) = self.knob_range();
        let x = if max > min && self.size > 0.0 {
            min + (max - min) * self.value / self.size
        } else {
            self.bar.x()
        };
        self.knob.set_x(x);
    }

    fn glide(&mut self) {
        let Some(destination) = self.destination else {
            return;
        };
        let dx = destination - self.knob.x();
        if dx.abs() <= SLIDER_VELOCITY {
            self.knob.set_x(destination);
            self.reposition_knob();
            self.destination = None;
            let side = if dx >= 0.0 {
                SlideSide::Right
            } else {
                SlideSide::Left
            };
            self.slide_finished.emit(side);
        } else {
            let x = self.knob.x() + SLIDER_VELOCITY * dx.signum();
            self.knob.set_x(x);
            self.reposition_knob();
        }
    }
}

impl Widget for Slider {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Slider"
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
        Ok(())
    }

    fn update_position(&mut self, center: Point) {
        self.bar.set_center(center);
        self.knob.set_y(center.y);
        self.place_knob();
        let label_x = self.bar.left() - self.padding;
        self.label.set_center(Point::new(label_x, center.y));
    }

    fn event(&mut self, event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        match event {
            WidgetEvent::Key {
                key: Key::ArrowRight,
                ..
            } => self.set_value(self.value + 1.0),
            WidgetEvent::Key {
                key: Key::ArrowLeft,
                ..
            } => self.set_value(self.value - 1.0),
            WidgetEvent::Scroll { scroll, .. } => self.set_value(self.value + scroll.y),
            WidgetEvent::Press { position, .. } | WidgetEvent::Drag { position, .. } => {
                self.update_knob(position.x);
            }
            WidgetEvent::Update { .. } => {
                self.glide();
                let scale = if self.knob.widget_base().is_hovered() {
                    KNOB_HOVER_SCALE
                } else {
                    KNOB_SCALE
                };
                self.knob.set_scale(scale);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use slotmap::SlotMap;
    use trellis_core::WidgetId;
    use trellis_render::RecordingRenderer;

    use super::*;
    use crate::widget::InputEvent;

    fn mounted(slider: Slider) -> Slider {
        let mut renderer = RecordingRenderer::new()
            .with_texture(assets::SLIDER_HORIZONTAL, 300.0, 20.0)
            .with_texture(assets::KNOB, 20.0, 20.0);
        let mut slider = slider;
        slider.create(&mut renderer).unwrap();
        slider.mount();
        slider
    }

    fn tick(slider: &mut Slider) {
        let mut ids: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let held = HashSet::new();
        let mut requests = Vec::new();
        let mut ctx = DispatchContext::new(ids.insert(()), true, true, &held, &mut requests);
        slider.handle_input(&InputEvent::update(0.016), &mut ctx).unwrap();
    }

    #[test]
    fn test_bar_length_sets_size() {
        let slider = mounted(Slider::new(100.0, 50.0).unwrap());
        assert_eq!(slider.width(), 200.0);
        assert_eq!(slider.height(), 20.0);
        assert_eq!(slider.bar().left(), 0.0);
        // 20px knob at 0.9 scale
        assert_eq!(slider.knob_range(), (9.0, 191.0));
        assert_eq!(slider.label().center(), Point::new(-50.0, 50.0));
    }

    #[test]
    fn test_value_is_clamped_and_snaps_knob() {
        let mut slider = mounted(Slider::new(100.0, 50.0).unwrap());
        slider.set_value(150.0);
        assert_eq!(slider.value(), 100.0);
        assert_eq!(slider.knob().x(), 191.0);

        slider.set_value(-3.0);
        assert_eq!(slider.value(), 0.0);
        assert_eq!(slider.knob().x(), 9.0);
        assert_eq!(slider.label().text(), "0");
    }

    #[test]
    fn test_rounding() {
        let mut slider = Slider::new(0.0, 0.0).unwrap().with_round(Some(1));
        slider.set_value(12.345);
        assert!((slider.value() - 12.3).abs() < 1e-4);
        assert_eq!(slider.label().text(), "12.3");

        let mut whole = Slider::new(0.0, 0.0).unwrap();
        whole.set_value(12.6);
        assert_eq!(whole.value(), 13.0);
        assert_eq!(whole.label().text(), "13");
    }

    #[test]
    fn test_default_applies_on_mount() {
        let slider = mounted(Slider::new(100.0, 50.0).unwrap().with_default(50.0));
        assert_eq!(slider.value(), 50.0);
        assert_eq!(slider.knob().x(), 100.0);
    }

    #[test]
    fn test_glide_reaches_destination() {
        let mut slider = mounted(Slider::new(100.0, 50.0).unwrap());
        let finished = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&finished);
        slider
            .slide_finished
            .connect(move |side| sink.lock().unwrap().push(*side));

        slider.update_knob(150.0);
        assert_eq!(slider.destination(), Some(150.0));
        for _ in 0..20 {
            tick(&mut slider);
        }

        assert_eq!(slider.destination(), None);
        assert_eq!(slider.knob().x(), 150.0);
        assert_eq!(*finished.lock().unwrap(), vec![SlideSide::Right]);
        // (150 - 9) / 182 * 100
        assert_eq!(slider.value(), 77.0);
    }

    #[test]
    fn test_destination_is_clamped() {
        let mut slider = mounted(Slider::new(100.0, 50.0).unwrap());
        slider.update_knob(-400.0);
        assert_eq!(slider.destination(), Some(9.0));
    }

    #[test]
    fn test_empty_range_is_ignored() {
        let mut slider = mounted(Slider::new(100.0, 50.0).unwrap().with_length(10.0));
        slider.set_value(40.0);
        assert_eq!(slider.knob().x(), 100.0);

        slider.reposition_knob();
        assert_eq!(slider.value(), 40.0);
    }
}
