use egui::{Context, CursorIcon, Event, Modifiers, PointerButton, Pos2, Rect, Vec2};

use super::*;
use crate::tree_builder::{DndTreeBuilder, SimpleRenderTree};

#[derive(Default)]
struct Recorder {
    drag_ends: Vec<(Option<DndId>, Option<DndId>)>,
    hovers: usize,
    clicks: usize,
    right_clicks: usize,
    leaves: usize,
    clone_ghosts: Vec<(ElementId, Rect)>,
    template_ghosts: usize,
}

impl DndBehavior<u32> for Recorder {
    fn on_drag_end(&mut self, from: &DndInfo<u32>, to: &DndInfo<u32>) {
        self.drag_ends.push((from.dnd_id.clone(), to.dnd_id.clone()));
    }

    fn on_hover(
        &mut self,
        _is_dragging: bool,
        _data: &u32,
        _element: ElementId,
        _current_drag: Option<&DndInfo<u32>>,
        _event: &PointerEvent,
    ) {
        self.hovers += 1;
    }

    fn on_component_clicked(&mut self, _data: &u32, _dnd_id: &DndId) {
        self.clicks += 1;
    }

    fn on_mouse_right_click(&mut self, _info: &DndInfo<u32>, _event: &PointerEvent) {
        self.right_clicks += 1;
    }

    fn on_mouse_leave(&mut self) {
        self.leaves += 1;
    }

    fn ghost_ui(&mut self, ui: &mut egui::Ui, drag: &DndInfo<u32>) {
        ui.label(format!("{:?}", drag.data()));
        self.template_ghosts += 1;
    }

    fn paint_clone_ghost(&mut self, _painter: &egui::Painter, source: ElementId, rect: Rect) {
        self.clone_ghosts.push((source, rect));
    }
}

fn tree() -> (SimpleRenderTree<u32>, ElementId) {
    let mut b = DndTreeBuilder::new();
    let root = b.drag_root(Rect::from_min_size(Pos2::ZERO, Vec2::splat(400.0)));
    let a = b.element(root, Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(100.0, 50.0)));
    b.tag(a, "a", DndProps::new(1));
    let c = b.element(root, Rect::from_min_size(Pos2::new(200.0, 10.0), Vec2::new(100.0, 50.0)));
    b.tag(c, "c", DndProps::new(3));
    let tree = b.build();
    let a_el = tree.element_of(a).expect("a renders an element");
    (tree, a_el)
}

fn button(pos: Pos2, button: PointerButton, pressed: bool) -> Event {
    Event::PointerButton {
        pos,
        button,
        pressed,
        modifiers: Modifiers::NONE,
    }
}

fn begin_pass(ctx: &Context, time: f64, events: Vec<Event>) {
    let screen = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
    ctx.begin_pass(egui::RawInput {
        screen_rect: Some(screen),
        time: Some(time),
        events,
        ..Default::default()
    });
}

#[test]
fn egui_pointer_events_drive_a_full_drag() {
    let ctx = Context::default();
    let (tree, _) = tree();
    let mut layout = DndLayout::new();
    let mut rec = Recorder::default();

    let grab = Pos2::new(20.0, 20.0);
    begin_pass(
        &ctx,
        1.0,
        vec![Event::PointerMoved(grab), button(grab, PointerButton::Primary, true)],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();
    assert_eq!(layout.phase(), DragPhase::Pressed);
    assert_eq!(rec.hovers, 1, "entering `a` is reported as a hover");

    begin_pass(&ctx, 1.1, vec![Event::PointerMoved(Pos2::new(60.0, 20.0))]);
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let output = ctx.end_pass();
    assert!(layout.is_dragging());
    assert_eq!(output.platform_output.cursor_icon, CursorIcon::Move);

    let drop_at = Pos2::new(250.0, 30.0);
    begin_pass(
        &ctx,
        1.4,
        vec![
            Event::PointerMoved(drop_at),
            button(drop_at, PointerButton::Primary, false),
        ],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    assert_eq!(rec.drag_ends, vec![(Some("a".into()), Some("c".into()))]);
    assert_eq!(layout.phase(), DragPhase::Idle);
    assert_eq!(rec.hovers, 2);
}

#[test]
fn secondary_press_is_a_suppressed_context_menu() {
    let ctx = Context::default();
    let (tree, _) = tree();
    let mut layout = DndLayout::new();
    let mut rec = Recorder::default();

    let pos = Pos2::new(20.0, 20.0);
    begin_pass(&ctx, 1.0, vec![button(pos, PointerButton::Secondary, true)]);
    let response = layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    assert_eq!(response, EventResponse::SUPPRESS);
    assert_eq!(rec.right_clicks, 1);
    assert_eq!(layout.phase(), DragPhase::Idle);
}

#[test]
fn press_outside_the_root_is_not_forwarded() {
    let ctx = Context::default();
    let (tree, _) = tree();
    let mut layout = DndLayout::new();
    let mut rec = Recorder::default();

    let outside = Pos2::new(600.0, 20.0);
    begin_pass(&ctx, 1.0, vec![button(outside, PointerButton::Primary, true)]);
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();
    assert_eq!(layout.phase(), DragPhase::Idle);

    let inside = Pos2::new(20.0, 20.0);
    begin_pass(
        &ctx,
        1.05,
        vec![
            Event::PointerMoved(inside),
            button(inside, PointerButton::Primary, false),
        ],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    assert_eq!(rec.clicks, 0, "the root never saw the press");
    assert!(rec.drag_ends.is_empty());

    begin_pass(&ctx, 2.0, vec![button(outside, PointerButton::Secondary, true)]);
    let response = layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();
    assert_eq!(rec.right_clicks, 0);
    assert_eq!(response, EventResponse::default());
}

#[test]
fn release_outside_the_root_still_ends_the_drag() {
    let ctx = Context::default();
    let (tree, _) = tree();
    let mut layout = DndLayout::new();
    let mut rec = Recorder::default();

    let grab = Pos2::new(20.0, 20.0);
    begin_pass(
        &ctx,
        1.0,
        vec![Event::PointerMoved(grab), button(grab, PointerButton::Primary, true)],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    begin_pass(&ctx, 1.1, vec![Event::PointerMoved(Pos2::new(60.0, 20.0))]);
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();
    assert!(layout.is_dragging());

    // Captured pointer: the release arrives without a move event leaving the root.
    begin_pass(&ctx, 1.5, vec![button(Pos2::new(600.0, 20.0), PointerButton::Primary, false)]);
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    assert_eq!(layout.phase(), DragPhase::Idle);
    assert!(!layout.is_dragging());
    assert!(rec.drag_ends.is_empty(), "nothing tagged under the release");
}

#[test]
fn leaving_the_root_cancels_the_press() {
    let ctx = Context::default();
    let (tree, _) = tree();
    let mut layout = DndLayout::new();
    let mut rec = Recorder::default();

    let grab = Pos2::new(20.0, 20.0);
    begin_pass(
        &ctx,
        1.0,
        vec![Event::PointerMoved(grab), button(grab, PointerButton::Primary, true)],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    begin_pass(
        &ctx,
        1.1,
        vec![Event::PointerMoved(Pos2::new(600.0, 20.0)), Event::PointerGone],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    assert_eq!(rec.leaves, 1, "only the first exit counts");
    assert_eq!(layout.phase(), DragPhase::Idle);
}

#[test]
fn clone_ghost_is_painted_at_the_proxy_rect() {
    let ctx = Context::default();
    let (tree, a_el) = tree();
    let mut layout = DndLayout::new();
    let mut rec = Recorder::default();

    let grab = Pos2::new(20.0, 20.0);
    begin_pass(
        &ctx,
        1.0,
        vec![Event::PointerMoved(grab), button(grab, PointerButton::Primary, true)],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    layout.paint_ghost(&ctx, &mut rec);
    let _ = ctx.end_pass();
    assert!(rec.clone_ghosts.is_empty(), "nothing to paint before the drag");

    begin_pass(&ctx, 1.1, vec![Event::PointerMoved(Pos2::new(120.0, 220.0))]);
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    layout.paint_ghost(&ctx, &mut rec);
    let _ = ctx.end_pass();

    let expected = Rect::from_min_size(Pos2::new(110.0, 210.0), Vec2::new(100.0, 50.0));
    assert_eq!(rec.clone_ghosts, vec![(a_el, expected)]);
    assert_eq!(rec.template_ghosts, 0);
}

#[test]
fn template_ghost_runs_the_ghost_ui() {
    let ctx = Context::default();
    let (tree, _) = tree();
    let mut layout = DndLayout::new_with_options(DndLayoutOptions {
        custom_ghost: true,
        ..Default::default()
    });
    let mut rec = Recorder::default();

    let grab = Pos2::new(20.0, 20.0);
    begin_pass(
        &ctx,
        1.0,
        vec![Event::PointerMoved(grab), button(grab, PointerButton::Primary, true)],
    );
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    let _ = ctx.end_pass();

    begin_pass(&ctx, 1.1, vec![Event::PointerMoved(Pos2::new(50.0, 40.0))]);
    layout.handle_egui_input(&ctx, &tree, &mut rec);
    layout.paint_ghost(&ctx, &mut rec);
    let _ = ctx.end_pass();

    assert_eq!(rec.template_ghosts, 1);
    let proxy = layout.ghost_proxy().expect("dragging");
    assert_eq!(proxy.translation, Vec2::new(30.0, 20.0));
    assert!(rec.clone_ghosts.is_empty());
}
