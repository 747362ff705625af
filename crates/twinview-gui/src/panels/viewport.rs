use twinview_core::annotation::CommitOutcome;
use twinview_core::geometry::{Point, Size};
use twinview_core::pair::Side;
use twinview_core::scroll::ScrollAxis;

use crate::app::TwinviewApp;
use crate::convert::{to_local, to_screen};
use crate::states::PromptState;

const TITLE_HEIGHT: f32 = 20.0;
const SCROLLBAR_WIDTH: f32 = 12.0;
const PANE_GAP: f32 = 6.0;
const MIN_THUMB: f32 = 20.0;

/// Screen areas of one side's pane.
struct PaneLayout {
    title: egui::Rect,
    canvas: egui::Rect,
    h_track: egui::Rect,
    v_track: egui::Rect,
}

impl PaneLayout {
    fn new(rect: egui::Rect) -> Self {
        let title = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), TITLE_HEIGHT));
        let canvas = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.top() + TITLE_HEIGHT),
            egui::pos2(rect.right() - SCROLLBAR_WIDTH, rect.bottom() - SCROLLBAR_WIDTH),
        );
        let h_track = egui::Rect::from_min_max(
            egui::pos2(canvas.left(), canvas.bottom()),
            egui::pos2(canvas.right(), rect.bottom()),
        );
        let v_track = egui::Rect::from_min_max(
            egui::pos2(canvas.right(), canvas.top()),
            egui::pos2(rect.right(), canvas.bottom()),
        );
        Self { title, canvas, h_track, v_track }
    }
}

pub fn show(ctx: &egui::Context, app: &mut TwinviewApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        let half = (rect.width() - PANE_GAP).max(0.0) / 2.0;
        let left = egui::Rect::from_min_size(rect.min, egui::vec2(half, rect.height()));
        let right = egui::Rect::from_min_size(
            egui::pos2(rect.left() + half + PANE_GAP, rect.top()),
            egui::vec2(half, rect.height()),
        );
        let panes = [
            (Side::Original, PaneLayout::new(left)),
            (Side::Translated, PaneLayout::new(right)),
        ];

        for (side, layout) in &panes {
            let size = Size::new(f64::from(layout.canvas.width()), f64::from(layout.canvas.height()));
            app.workspace.pair_mut().set_viewport_size(*side, size);
        }

        let loaded = Side::ALL
            .iter()
            .all(|side| app.workspace.pair().viewport(*side).has_image());
        if app.ui_state.needs_fit && loaded {
            app.workspace.pair_mut().reset_views();
            app.ui_state.needs_fit = false;
        }

        for (side, layout) in &panes {
            handle_input(ui, app, *side, layout.canvas);
            draw_pane(ui, app, *side, layout);
            for axis in ScrollAxis::ALL {
                scrollbar(ui, app, *side, axis, layout);
            }
        }
    });
}

fn handle_input(ui: &egui::Ui, app: &mut TwinviewApp, side: Side, canvas: egui::Rect) {
    let response = ui.interact(canvas, ui.id().with(("canvas", side)), egui::Sense::click_and_drag());
    let origin = canvas.min;
    let pointer = response.interact_pointer_pos().map(|p| to_local(p, origin));

    if response.hovered() {
        let wheel = ui.input(|i| i.raw_scroll_delta.y);
        if wheel != 0.0 {
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                let step = app.workspace.config().zoom.wheel_step;
                let factor = if wheel > 0.0 { step } else { 1.0 / step };
                app.workspace.pair_mut().zoom_at_cursor(side, factor, to_local(pos, origin));
                app.ui_state.active_side = side;
            }
        }
    }

    let annotating = app.ui_state.annotation_mode && !app.ui_state.is_prompting();
    if annotating {
        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer {
                app.ui_state.active_side = side;
                if !app.workspace.pair_mut().begin_annotation(side, p) {
                    app.ui_state.add_log("Load an image pair before annotating".into());
                }
            }
        } else if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer {
                app.workspace.pair_mut().update_annotation(side, p);
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            // A non-finite end keeps the last tracked corner.
            let end = pointer.unwrap_or(Point::new(f64::NAN, f64::NAN));
            match app.workspace.pair_mut().finish_annotation(side, end) {
                CommitOutcome::Pending(_) => {
                    app.ui_state.prompt = Some(PromptState::new(side));
                }
                CommitOutcome::TooSmall => {
                    app.ui_state.add_log("Rectangle too small, ignored".into());
                }
                _ => {}
            }
        }
    }

    let pan_drag = response.dragged_by(egui::PointerButton::Middle)
        || (!app.ui_state.annotation_mode && response.dragged_by(egui::PointerButton::Primary));
    if pan_drag {
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            app.workspace
                .pair_mut()
                .pan(side, Point::new(f64::from(delta.x), f64::from(delta.y)));
        }
        app.ui_state.active_side = side;
    }

    if response.double_clicked() && !app.ui_state.annotation_mode {
        app.workspace.pair_mut().fit(side);
    }

    if response.clicked() {
        app.ui_state.active_side = side;
    }
}

fn draw_pane(ui: &egui::Ui, app: &TwinviewApp, side: Side, layout: &PaneLayout) {
    let viewport = app.workspace.pair().viewport(side);
    let canvas = layout.canvas;
    let painter = ui.painter_at(canvas);
    painter.rect_filled(canvas, 0.0, egui::Color32::from_gray(30));

    let title = format!(
        "{} ({} annotation{})",
        capitalize(&side.to_string()),
        viewport.annotations().len(),
        if viewport.annotations().len() == 1 { "" } else { "s" }
    );
    let title_color = if app.ui_state.active_side == side {
        ui.visuals().strong_text_color()
    } else {
        ui.visuals().weak_text_color()
    };
    ui.painter().text(
        layout.title.left_center() + egui::vec2(4.0, 0.0),
        egui::Align2::LEFT_CENTER,
        title,
        egui::FontId::proportional(14.0),
        title_color,
    );

    let Some(texture) = &app.textures.get(side).handle else {
        painter.text(
            canvas.center(),
            egui::Align2::CENTER_CENTER,
            "Open folders to begin",
            egui::FontId::proportional(18.0),
            egui::Color32::from_gray(100),
        );
        return;
    };

    let t = viewport.transform();
    let size = viewport.image_size();
    let img_rect = egui::Rect::from_min_size(
        to_screen(t.pan, canvas.min),
        egui::vec2((size.width * t.scale) as f32, (size.height * t.scale) as f32),
    );
    painter.image(
        texture.id(),
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    if let Some(draft) = viewport.draft_rect() {
        let a = to_screen(t.image_to_screen(draft.top_left()), canvas.min);
        let b = to_screen(t.image_to_screen(draft.bottom_right()), canvas.min);
        let [r, g, bl, al] = viewport.style().color;
        painter.rect_stroke(
            egui::Rect::from_two_pos(a, b),
            0.0,
            egui::Stroke::new(1.5, egui::Color32::from_rgba_unmultiplied(r, g, bl, al)),
            egui::StrokeKind::Middle,
        );
    }
}

fn scrollbar(ui: &egui::Ui, app: &mut TwinviewApp, side: Side, axis: ScrollAxis, layout: &PaneLayout) {
    let track = match axis {
        ScrollAxis::Horizontal => layout.h_track,
        ScrollAxis::Vertical => layout.v_track,
    };
    ui.painter().rect_filled(track, 0.0, egui::Color32::from_gray(40));

    let viewport = app.workspace.pair().viewport(side);
    let range = viewport.scroll_range(axis) as f32;
    if range <= 0.0 {
        return;
    }
    let position = viewport.scroll_position(axis) as f32;
    let (track_start, track_len, visible) = match axis {
        ScrollAxis::Horizontal => (track.left(), track.width(), layout.canvas.width()),
        ScrollAxis::Vertical => (track.top(), track.height(), layout.canvas.height()),
    };
    let thumb_len = (track_len * visible / (visible + range)).clamp(MIN_THUMB.min(track_len), track_len);
    let travel = (track_len - thumb_len).max(1.0);
    let thumb_start = track_start + travel * position / range;

    let response = ui.interact(track, ui.id().with(("scroll", side, axis)), egui::Sense::click_and_drag());
    if let Some(p) = response.interact_pointer_pos() {
        if response.dragged() || response.clicked() {
            let along = match axis {
                ScrollAxis::Horizontal => p.x,
                ScrollAxis::Vertical => p.y,
            };
            let fraction = ((along - track_start - thumb_len / 2.0) / travel).clamp(0.0, 1.0);
            app.workspace
                .pair_mut()
                .scroll_to(side, axis, f64::from(fraction * range));
            app.ui_state.active_side = side;
        }
    }

    let thumb = match axis {
        ScrollAxis::Horizontal => egui::Rect::from_min_size(
            egui::pos2(thumb_start, track.top() + 2.0),
            egui::vec2(thumb_len, track.height() - 4.0),
        ),
        ScrollAxis::Vertical => egui::Rect::from_min_size(
            egui::pos2(track.left() + 2.0, thumb_start),
            egui::vec2(track.width() - 4.0, thumb_len),
        ),
    };
    let gray = if response.hovered() || response.dragged() { 150 } else { 110 };
    ui.painter().rect_filled(thumb, 3.0, egui::Color32::from_gray(gray));
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
