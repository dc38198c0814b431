//! Integration tests for the application container: Tab traversal, focus
//! bookkeeping, deferred deletion, and handler isolation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use trellis::prelude::*;
use trellis::render::RecordingRenderer;
use trellis::widget::widgets::assets;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("trellis=debug")
        .with_test_writer()
        .try_init();
}

fn renderer() -> RecordingRenderer {
    let mut renderer = RecordingRenderer::new();
    for state in ["normal", "hover", "press", "disable"] {
        renderer.register_texture(assets::button("yellow", state), 120.0, 40.0);
    }
    renderer
}

fn app() -> Application<RecordingRenderer> {
    Application::new(ApplicationConfig::new("Focus"), renderer()).unwrap()
}

fn button(app: &mut Application<RecordingRenderer>, text: &str, x: f32) -> WidgetId {
    app.add(Button::new(text, x, 100.0).unwrap()).unwrap()
}

fn shift_tab() -> InputEvent {
    InputEvent::KeyPress {
        key: Key::Tab,
        modifiers: KeyboardModifiers::SHIFT,
    }
}

fn focused_flags(app: &Application<RecordingRenderer>) -> usize {
    app.widgets()
        .iter()
        .filter(|id| app.get(**id).is_some_and(|w| w.widget_base().has_focus()))
        .count()
}

/// A two-label group that deletes itself when pressed.
struct Dismissable {
    base: WidgetBase,
    title: Label,
    hint: Label,
}

impl Dismissable {
    fn new(x: f32, y: f32) -> Self {
        Self {
            base: WidgetBase::new(x, y),
            title: Label::new("Notice", x, y).unwrap(),
            hint: Label::new("click to close", x, y - 20.0).unwrap(),
        }
    }
}

impl Widget for Dismissable {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn intrinsic_size(&self) -> Size {
        Size::new(100.0, 50.0)
    }

    fn size(&self) -> Size {
        self.intrinsic_size()
    }

    fn children(&self) -> Vec<&dyn Widget> {
        vec![&self.title, &self.hint]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Widget> {
        vec![&mut self.title, &mut self.hint]
    }

    fn event(&mut self, event: &WidgetEvent, ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        if let WidgetEvent::Press { .. } = event {
            ctx.request_delete();
        }
        Ok(())
    }
}

/// A leaf whose update handler always fails.
struct Faulty {
    base: WidgetBase,
}

impl Widget for Faulty {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn event(&mut self, event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        match event {
            WidgetEvent::Update { .. } => {
                Err(WidgetError::InvalidOperation("update failed".to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// A leaf counting the updates it sees.
struct Ticker {
    base: WidgetBase,
    ticks: Arc<AtomicU32>,
}

impl Widget for Ticker {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn event(&mut self, event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> WidgetResult<()> {
        if let WidgetEvent::Update { .. } = event {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[test]
fn test_tab_wraps_forward() {
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let b = button(&mut app, "B", 300.0);
    let c = button(&mut app, "C", 500.0);
    assert_eq!(app.focus(), Some(c));

    app.dispatch(InputEvent::key_press(Key::Tab));
    assert_eq!(app.focus(), Some(a));
    app.dispatch(InputEvent::key_press(Key::Tab));
    assert_eq!(app.focus(), Some(b));
}

#[test]
fn test_shift_tab_wraps_backward() {
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let _b = button(&mut app, "B", 300.0);
    let c = button(&mut app, "C", 500.0);
    app.set_focus(a, FocusReason::Program).unwrap();

    app.dispatch(shift_tab());
    assert_eq!(app.focus(), Some(c));
}

#[test]
fn test_labels_stay_out_of_focus_order() {
    let mut app = app();
    let ok = button(&mut app, "Ok", 100.0);
    let caption = app.add(Label::new("Caption", 100.0, 200.0).unwrap()).unwrap();

    assert_eq!(app.focusable_widgets(), &[ok]);
    assert_eq!(app.widgets(), &[ok, caption]);
    assert_eq!(app.focus(), Some(ok));

    app.dispatch(InputEvent::key_press(Key::Tab));
    assert_eq!(app.focus(), Some(ok));
}

#[test]
fn test_tab_without_focusable_widgets_is_a_no_op() {
    let mut app = app();
    app.add(Label::new("Title", 100.0, 200.0).unwrap()).unwrap();
    app.add(Label::new("Subtitle", 100.0, 150.0).unwrap()).unwrap();
    assert!(app.focusable_widgets().is_empty());

    app.dispatch(InputEvent::key_press(Key::Tab));
    app.dispatch(shift_tab());
    app.on_key_press(Key::Tab, KeyboardModifiers::NONE);

    assert_eq!(app.focus(), None);
    assert_eq!(app.widgets().len(), 2);
}

#[test]
fn test_clear_focus_needs_two_focusable_widgets() {
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let b = button(&mut app, "B", 300.0);

    app.clear_focus(b).unwrap();
    assert_eq!(app.focus(), Some(a));

    assert!(app.delete(b).is_some());
    assert!(matches!(app.clear_focus(a), Err(WidgetError::InvalidOperation(_))));
    assert_eq!(app.focus(), Some(a));
}

#[test]
fn test_only_one_widget_holds_focus() {
    let mut app = app();
    for (index, text) in ["A", "B", "C", "D"].into_iter().enumerate() {
        button(&mut app, text, 100.0 + 200.0 * index as f32);
    }
    for _ in 0..6 {
        app.dispatch(InputEvent::key_press(Key::Tab));
        assert_eq!(focused_flags(&app), 1);
    }
    app.dispatch(shift_tab());
    assert_eq!(focused_flags(&app), 1);
}

#[test]
fn test_press_moves_focus() {
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let _b = button(&mut app, "B", 300.0);

    app.dispatch(InputEvent::press(100.0, 100.0));
    assert_eq!(app.focus(), Some(a));
}

#[test]
fn test_press_on_edge_misses() {
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let b = button(&mut app, "B", 300.0);

    let left_edge = app.get(a).map(|w| w.left()).unwrap();
    app.dispatch(InputEvent::press(left_edge, 100.0));
    assert_eq!(app.focus(), Some(b));
    assert!(!app.get(a).unwrap().check_collision(&Point::new(left_edge, 100.0)));
}

#[test]
fn test_edges_track_center() {
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let widget = app.get_mut(a).unwrap();

    assert_eq!((widget.left(), widget.right()), (40.0, 160.0));
    assert_eq!((widget.bottom(), widget.top()), (80.0, 120.0));

    widget.set_left(0.0);
    assert_eq!(widget.x(), 60.0);
    assert_eq!(widget.right() - widget.left(), widget.width());

    widget.set_top(200.0);
    assert_eq!(widget.y(), 180.0);
    assert_eq!(widget.top() - widget.bottom(), widget.height());
}

#[test]
fn test_point_arithmetic() {
    assert_eq!(Point::new(5.0, 3.0) + Point::new(2.0, 1.0), Point::new(7.0, 4.0));
    assert_eq!(Point::new(5.0, 3.0) - Point::new(2.0, 1.0), Point::new(3.0, 2.0));

    let mut moving = Point::new(5.0, 3.0);
    assert_eq!(&mut moving + Point::new(2.0, 1.0), (7.0, 4.0));
    assert_eq!(moving.position(), (7.0, 4.0));
}

#[test]
fn test_self_deletion_is_deferred_to_end_of_pass() {
    init_logging();
    let mut app = app();
    let a = button(&mut app, "A", 100.0);
    let notice = app.add(Dismissable::new(500.0, 300.0)).unwrap();
    assert_eq!(app.focus(), Some(notice));

    app.dispatch(InputEvent::press(500.0, 300.0));

    assert!(app.get(notice).is_none());
    assert_eq!(app.widgets(), &[a]);
    assert_eq!(app.focus(), Some(a));
}

#[test]
fn test_failing_handler_does_not_stop_broadcast() {
    init_logging();
    let mut app = app();
    let ticks = Arc::new(AtomicU32::new(0));
    app.add(Faulty {
        base: WidgetBase::new(0.0, 0.0).with_size(10.0, 10.0),
    })
    .unwrap();
    app.add(Ticker {
        base: WidgetBase::new(50.0, 50.0).with_size(10.0, 10.0),
        ticks: Arc::clone(&ticks),
    })
    .unwrap();

    app.dispatch(InputEvent::update(0.02));
    app.dispatch(InputEvent::update(0.02));

    assert_eq!(ticks.load(Ordering::SeqCst), 2);
    assert_eq!(app.get_fps(), 50.0);
}

#[test]
fn test_exit_clears_focus_order() {
    let mut app = app();
    button(&mut app, "A", 100.0);
    let caption = app.add(Label::new("Caption", 100.0, 200.0).unwrap()).unwrap();

    app.exit();
    assert!(app.focusable_widgets().is_empty());
    assert_eq!(app.focus(), None);
    assert!(!app.is_enabled());

    app.dispatch(InputEvent::update(0.02));
    assert!(app.get(caption).unwrap().widget_base().is_disabled());
}
