//! Tests for the widget system.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use slotmap::SlotMap;
    use trellis_core::WidgetId;
    use trellis_render::{Bounds, Color, DrawCommand, Outline, Point, RecordingRenderer, Renderer, Size};

    use crate::widget::{
        BBOX_COLOR, DispatchContext, FocusReason, InputEvent, Key, Request, Widget, WidgetBase,
        WidgetEvent, downcast_mut, downcast_ref,
    };

    /// A leaf widget with a fixed size that records its events.
    struct TestWidget {
        base: WidgetBase,
        color: Color,
        events: Vec<WidgetEvent>,
        moves: Vec<Point>,
    }

    impl TestWidget {
        fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
            Self {
                base: WidgetBase::new(x, y).with_size(width, height),
                color: Color::BLUE,
                events: Vec::new(),
                moves: Vec::new(),
            }
        }
    }

    impl Widget for TestWidget {
        fn widget_base(&self) -> &WidgetBase {
            &self.base
        }

        fn widget_base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn update_position(&mut self, center: Point) {
            self.moves.push(center);
        }

        fn event(&mut self, event: &WidgetEvent, _ctx: &mut DispatchContext<'_>) -> crate::WidgetResult<()> {
            self.events.push(event.clone());
            Ok(())
        }

        fn draw(&mut self, renderer: &mut dyn Renderer) {
            renderer.stroke_rect(&Outline::new(self.bounds(), self.color, 1.0));
        }
    }

    /// A focusable group of two leaves that keeps them on its center.
    struct TestGroup {
        base: WidgetBase,
        back: TestWidget,
        front: TestWidget,
    }

    impl TestGroup {
        fn new(x: f32, y: f32) -> Self {
            let mut front = TestWidget::new(x, y, 10.0, 10.0);
            front.color = Color::RED;
            Self {
                base: WidgetBase::new(x, y),
                back: TestWidget::new(x, y, 40.0, 20.0),
                front,
            }
        }
    }

    impl Widget for TestGroup {
        fn widget_base(&self) -> &WidgetBase {
            &self.base
        }

        fn widget_base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn children(&self) -> Vec<&dyn Widget> {
            vec![&self.back, &self.front]
        }

        fn children_mut(&mut self) -> Vec<&mut dyn Widget> {
            vec![&mut self.back, &mut self.front]
        }

        fn update_position(&mut self, center: Point) {
            self.back.set_center(center);
            self.front.set_center(center);
        }
    }

    struct Harness {
        id: WidgetId,
        held: HashSet<Key>,
        requests: Vec<Request>,
    }

    impl Harness {
        fn new() -> Self {
            let mut ids: SlotMap<WidgetId, ()> = SlotMap::with_key();
            Self {
                id: ids.insert(()),
                held: HashSet::new(),
                requests: Vec::new(),
            }
        }

        fn send(&mut self, widget: &mut dyn Widget, input: InputEvent, focused: bool, enabled: bool) {
            let mut ctx = DispatchContext::new(self.id, focused, enabled, &self.held, &mut self.requests);
            widget.handle_input(&input, &mut ctx).unwrap();
        }
    }

    #[test]
    fn test_widget_creation() {
        let widget = TestWidget::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(widget.center(), Point::new(10.0, 20.0));
        assert_eq!(widget.size(), Size::new(30.0, 40.0));
        assert!(!widget.is_mounted());
        assert!(!widget.is_group());
        assert!(!widget.widget_base().has_focus());
    }

    #[test]
    fn test_edges_follow_center() {
        let mut widget = TestWidget::new(50.0, 50.0, 20.0, 10.0);
        assert_eq!(
            widget.bounds(),
            Bounds::new(40.0, 60.0, 55.0, 45.0)
        );

        widget.set_left(0.0);
        assert_eq!(widget.left(), 0.0);
        assert_eq!(widget.x(), 10.0);
        assert_eq!(widget.right() - widget.left(), widget.width());

        widget.set_top(100.0);
        assert_eq!(widget.top(), 100.0);
        assert_eq!(widget.bottom(), 90.0);

        widget.set_right(-5.0);
        widget.set_bottom(-5.0);
        assert_eq!(widget.center(), Point::new(-15.0, 0.0));
    }

    #[test]
    fn test_group_size_is_first_child_size() {
        let group = TestGroup::new(0.0, 0.0);
        assert!(group.is_group());
        assert_eq!(group.size(), Size::new(40.0, 20.0));
        assert_eq!(group.left(), -20.0);
    }

    #[test]
    fn test_position_hook_waits_for_mount() {
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        widget.set_center(Point::new(5.0, 5.0));
        widget.set_x(7.0);
        assert!(widget.moves.is_empty());
        assert_eq!(widget.x(), 7.0);

        widget.mount();
        assert_eq!(widget.moves, vec![Point::new(7.0, 5.0)]);

        widget.set_y(1.0);
        assert_eq!(widget.moves.last(), Some(&Point::new(7.0, 1.0)));

        // Mounting again has nothing pending.
        widget.mount();
        assert_eq!(widget.moves.len(), 2);
    }

    #[test]
    fn test_group_moves_components_once_mounted() {
        let mut group = TestGroup::new(0.0, 0.0);
        group.back.mount();
        group.front.mount();

        group.set_center(Point::new(30.0, 30.0));
        assert_eq!(group.back.center(), Point::ZERO);

        group.mount();
        assert_eq!(group.back.center(), Point::new(30.0, 30.0));
        assert_eq!(group.front.center(), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_collision_is_strict() {
        let widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        assert!(widget.check_collision(&Point::new(4.9, -4.9)));
        assert!(!widget.check_collision(&Point::new(5.0, 0.0)));
        assert!(!widget.check_collision(&Point::new(0.0, -5.0)));
    }

    #[test]
    fn test_touching_widgets_collide() {
        let a = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        let b = TestWidget::new(10.0, 0.0, 10.0, 10.0);
        let c = TestWidget::new(30.0, 0.0, 10.0, 10.0);
        assert!(a.is_colliding(&b));
        assert!(!a.is_colliding(&c));
    }

    #[test]
    fn test_snap_to_point() {
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        let target = Point::new(3.0, 4.0);

        assert_eq!(widget.snap_to_point(target, 4.9, true), None);
        assert_eq!(widget.center(), Point::ZERO);

        assert_eq!(widget.snap_to_point(target, 5.0, false), Some(target));
        assert_eq!(widget.center(), Point::ZERO);

        widget.snap_to_point(target, 5.0, true);
        assert_eq!(widget.center(), target);
    }

    #[test]
    fn test_motion_sets_hover() {
        let mut harness = Harness::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);

        harness.send(&mut widget, InputEvent::motion(1.0, 1.0), false, true);
        assert!(widget.widget_base().is_hovered());
        assert!(matches!(widget.events[0], WidgetEvent::Hover { .. }));

        harness.send(&mut widget, InputEvent::motion(20.0, 1.0), false, true);
        assert!(!widget.widget_base().is_hovered());
        assert_eq!(widget.events.len(), 1);
    }

    #[test]
    fn test_press_requests_focus_for_groups_only() {
        let mut harness = Harness::new();
        let mut leaf = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        harness.send(&mut leaf, InputEvent::press(0.0, 0.0), false, true);
        assert!(leaf.widget_base().is_pressed());
        assert!(harness.requests.is_empty());

        let mut group = TestGroup::new(0.0, 0.0);
        harness.send(&mut group, InputEvent::press(0.0, 0.0), false, true);
        assert_eq!(harness.requests, vec![Request::Focus(harness.id, FocusReason::Mouse)]);

        // Components saw the press through a component context.
        assert!(group.front.widget_base().is_pressed());
        assert_eq!(group.front.events.len(), 1);
    }

    #[test]
    fn test_release_clears_press_and_drag() {
        let mut harness = Harness::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);

        harness.send(&mut widget, InputEvent::press(0.0, 0.0), false, true);
        // The drag left the widget but started inside it.
        harness.send(&mut widget, InputEvent::drag(50.0, 0.0), false, true);
        assert!(widget.widget_base().is_dragging());
        assert_eq!(widget.widget_base().last_press(), Point::ZERO);

        harness.send(&mut widget, InputEvent::release(50.0, 0.0), false, true);
        assert!(!widget.widget_base().is_pressed());
        assert!(!widget.widget_base().is_dragging());
    }

    #[test]
    fn test_keys_need_focus() {
        let mut harness = Harness::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);

        harness.send(&mut widget, InputEvent::key_press(Key::Space), false, true);
        harness.send(&mut widget, InputEvent::Text("a".into()), false, true);
        assert!(widget.events.is_empty());

        harness.send(&mut widget, InputEvent::key_press(Key::Space), true, true);
        harness.send(&mut widget, InputEvent::key_release(Key::Space), true, true);
        assert!(matches!(widget.events[0], WidgetEvent::Key { key: Key::Space, .. }));
        assert!(matches!(widget.events[1], WidgetEvent::Lift { key: Key::Space, .. }));
    }

    #[test]
    fn test_disabled_only_updates() {
        let mut harness = Harness::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        widget.widget_base_mut().set_disabled(true);

        harness.send(&mut widget, InputEvent::press(0.0, 0.0), true, true);
        harness.send(&mut widget, InputEvent::key_press(Key::Enter), true, true);
        assert!(widget.events.is_empty());
        assert!(!widget.widget_base().is_pressed());

        harness.send(&mut widget, InputEvent::update(0.016), true, true);
        assert_eq!(widget.events, vec![WidgetEvent::Update { delta: 0.016 }]);
        assert_eq!(widget.widget_base().frames(), 1);
    }

    #[test]
    fn test_disabled_application_disables_widgets() {
        let mut harness = Harness::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);

        harness.send(&mut widget, InputEvent::update(0.016), false, false);
        assert!(widget.widget_base().is_disabled());
    }

    #[test]
    fn test_deactivate_clears_hover() {
        let mut harness = Harness::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        harness.send(&mut widget, InputEvent::motion(0.0, 0.0), false, true);
        harness.send(&mut widget, InputEvent::press(0.0, 0.0), false, true);

        harness.send(&mut widget, InputEvent::Deactivate, false, true);
        assert!(!widget.widget_base().is_hovered());
        assert!(!widget.widget_base().is_pressed());
    }

    #[test]
    fn test_draw_tree_draws_components_first() {
        let mut renderer = RecordingRenderer::new();
        let mut group = TestGroup::new(0.0, 0.0);
        group.draw_tree(&mut renderer);

        let colors: Vec<Color> = renderer
            .pending()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Outline(outline) => Some(outline.color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::BLUE, Color::RED]);
    }

    #[test]
    fn test_bbox_is_cached_and_recentered() {
        let mut renderer = RecordingRenderer::new();
        let mut widget = TestWidget::new(0.0, 0.0, 10.0, 10.0);
        widget.draw_bbox(&mut renderer, 1.0, 2.0);
        assert!(widget.widget_base().rect().has_bbox());

        widget.set_center(Point::new(20.0, 0.0));
        widget.draw_bbox(&mut renderer, 3.0, 8.0);

        let DrawCommand::Outline(outline) = &renderer.pending()[1] else {
            panic!("expected an outline");
        };
        assert_eq!(outline.color, BBOX_COLOR);
        assert_eq!(outline.thickness, 1.0);
        assert_eq!(outline.bounds.center(), Point::new(20.0, 0.0));
        assert_eq!(outline.bounds.width(), 12.0);
    }

    #[test]
    fn test_downcast() {
        let mut boxed: Box<dyn Widget> = Box::new(TestWidget::new(0.0, 0.0, 1.0, 1.0));
        assert!(downcast_ref::<TestWidget>(boxed.as_ref()).is_some());
        assert!(downcast_ref::<TestGroup>(boxed.as_ref()).is_none());

        downcast_mut::<TestWidget>(boxed.as_mut()).unwrap().color = Color::RED;
        assert_eq!(downcast_ref::<TestWidget>(boxed.as_ref()).unwrap().color, Color::RED);
    }
}
