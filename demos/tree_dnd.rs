#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, StrokeKind, Vec2};
use egui_tree_dnd::{
    DndBehavior, DndId, DndInfo, DndLayout, DndLayoutOptions, DndProps, DndTreeBuilder, ElementId,
    PointerEvent,
};

const CARD_SIZE: Vec2 = Vec2::new(180.0, 36.0);
const GAP: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Card(u32),
    Column(usize),
}

struct Column {
    title: &'static str,
    cards: Vec<u32>,
}

#[derive(Default)]
struct Behavior {
    /// Card labels by element, refreshed every frame for the clone ghost.
    labels: Vec<(ElementId, String)>,
    pending_move: Option<(u32, Target)>,
    status: String,
}

impl DndBehavior<Target> for Behavior {
    fn on_drag_end(&mut self, from: &DndInfo<Target>, to: &DndInfo<Target>) {
        if let (Some(Target::Card(card)), Some(target)) = (from.data(), to.data()) {
            self.pending_move = Some((*card, *target));
        }
    }

    fn on_hover(
        &mut self,
        is_dragging: bool,
        data: &Target,
        _element: ElementId,
        current_drag: Option<&DndInfo<Target>>,
        _event: &PointerEvent,
    ) {
        let Some(drag) = current_drag.filter(|_| is_dragging) else {
            return;
        };
        let from = drag.dnd_id.as_ref().map_or_else(String::new, ToString::to_string);
        self.status = format!("dragging {from} over {data:?}");
    }

    fn on_component_clicked(&mut self, _data: &Target, dnd_id: &DndId) {
        self.status = format!("clicked {dnd_id}");
    }

    fn on_mouse_right_click(&mut self, info: &DndInfo<Target>, _event: &PointerEvent) {
        self.status = match &info.dnd_id {
            Some(id) => format!("context menu on {id}"),
            None => "context menu on empty space".to_owned(),
        };
    }

    fn paint_clone_ghost(&mut self, painter: &egui::Painter, source: ElementId, rect: Rect) {
        painter.rect_filled(rect, 6.0, Color32::from_rgba_unmultiplied(90, 140, 220, 200));
        if let Some((_, label)) = self.labels.iter().find(|(el, _)| *el == source) {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(14.0),
                Color32::WHITE,
            );
        }
    }

    fn ghost_ui(&mut self, ui: &mut egui::Ui, drag: &DndInfo<Target>) {
        egui::Frame::popup(ui.style()).show(ui, |ui| {
            ui.label(format!("moving {:?}", drag.data()));
        });
    }
}

struct App {
    columns: Vec<Column>,
    layout: DndLayout<Target>,
    behavior: Behavior,
}

impl Default for App {
    fn default() -> Self {
        Self {
            columns: vec![
                Column {
                    title: "Todo",
                    cards: vec![1, 2, 3],
                },
                Column {
                    title: "Done",
                    cards: vec![4, 5],
                },
            ],
            layout: DndLayout::new_with_options(DndLayoutOptions {
                debug_event_log: true,
                ..Default::default()
            }),
            behavior: Behavior::default(),
        }
    }
}

impl App {
    fn apply_pending_move(&mut self) {
        let Some((card, target)) = self.behavior.pending_move.take() else {
            return;
        };
        if target == Target::Card(card) {
            return;
        }
        for column in &mut self.columns {
            column.cards.retain(|&c| c != card);
        }
        match target {
            Target::Card(before) => {
                for column in &mut self.columns {
                    if let Some(index) = column.cards.iter().position(|&c| c == before) {
                        column.cards.insert(index, card);
                        break;
                    }
                }
            }
            Target::Column(index) => {
                if let Some(column) = self.columns.get_mut(index) {
                    column.cards.push(card);
                }
            }
        }
        self.behavior.status = format!("moved hello{card}");
    }

    fn board_ui(&mut self, ui: &mut egui::Ui) {
        let root_rect = ui.available_rect_before_wrap();
        ui.allocate_rect(root_rect, egui::Sense::hover());

        let mut builder = DndTreeBuilder::new();
        let root = builder.drag_root(root_rect);
        let mut cards = Vec::new();
        let mut columns = Vec::new();
        self.behavior.labels.clear();

        for (ci, column) in self.columns.iter().enumerate() {
            let height = (column.cards.len() as f32 + 1.0) * (CARD_SIZE.y + GAP) + GAP;
            let min = root_rect.min + Vec2::new(GAP + ci as f32 * (CARD_SIZE.x + 3.0 * GAP), GAP);
            let column_rect = Rect::from_min_size(min, Vec2::new(CARD_SIZE.x + 2.0 * GAP, height));
            let column_node = builder.element(root, column_rect);
            builder.tag(column_node, column.title, DndProps::new(Target::Column(ci)).with_can_drag(false));
            columns.push((column_node, column_rect, column.title));

            for (i, &card) in column.cards.iter().enumerate() {
                let top = column_rect.min.y + (i as f32 + 1.0) * (CARD_SIZE.y + GAP);
                let rect = Rect::from_min_size(Pos2::new(column_rect.min.x + GAP, top), CARD_SIZE);
                // The tagged node is a fragment; the card box below it is what gets measured.
                let tagged = builder.fragment(column_node);
                builder.tag(tagged, format!("hello{card}"), DndProps::new(Target::Card(card)));
                let body = builder.element(tagged, rect);
                cards.push((body, rect, card));
            }
        }
        let tree = builder.build();

        for &(body, _, card) in &cards {
            if let Some(el) = tree.element_of(body) {
                self.behavior.labels.push((el, format!("hello{card}")));
            }
        }

        let response = self
            .layout
            .handle_egui_input(ui.ctx(), &tree, &mut self.behavior);
        if response.prevent_default {
            log::debug!("suppressed native context menu");
        }

        let painter = ui.painter();
        let style = self.layout.container_style();
        if let Some(fill) = style.fill {
            painter.rect_filled(root_rect, 0.0, fill);
        }
        for (_, rect, title) in &columns {
            painter.rect_filled(*rect, 8.0, ui.visuals().faint_bg_color);
            painter.text(
                rect.min + Vec2::new(GAP, GAP),
                Align2::LEFT_TOP,
                *title,
                FontId::proportional(16.0),
                ui.visuals().strong_text_color(),
            );
        }
        let dimmed = self.layout.dimmed_element();
        for (body, rect, card) in &cards {
            let opacity = match (dimmed, tree.element_of(*body)) {
                (Some((el, factor)), Some(this)) if el == this => factor,
                _ => 1.0,
            };
            let fill = ui.visuals().widgets.inactive.bg_fill.gamma_multiply(opacity);
            painter.rect_filled(*rect, 6.0, fill);
            painter.rect_stroke(
                *rect,
                6.0,
                Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color.gamma_multiply(opacity)),
                StrokeKind::Inside,
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                format!("hello{card}"),
                FontId::proportional(14.0),
                ui.visuals().text_color().gamma_multiply(opacity),
            );
        }

        self.layout.paint_ghost(ui.ctx(), &mut self.behavior);
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.layout.options.show_ghost_layer, "Ghost");
                ui.checkbox(&mut self.layout.options.custom_ghost, "Custom ghost");
                ui.separator();
                ui.label(self.behavior.status.as_str());
            });
        });

        egui::TopBottomPanel::bottom("debug").show(ctx, |ui| {
            ui.monospace(self.layout.debug_summary());
            egui::ScrollArea::vertical()
                .max_height(120.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in self.layout.debug_log_lines() {
                        ui.monospace(line);
                    }
                });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.board_ui(ui));

        self.apply_pending_move();
        if self.layout.is_dragging() {
            ctx.request_repaint();
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_title("egui_tree_dnd: board"),
        ..Default::default()
    };
    eframe::run_native(
        "egui_tree_dnd: board",
        options,
        Box::new(|_cc| Ok(Box::new(App::default()))),
    )
}
