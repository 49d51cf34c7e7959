use crate::SigilApp;
use crate::color::BrushColor;
use crate::document::session_duration_ms;
use crate::settings::{MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH, PALETTE, SymmetryMode};
use crate::util::time::duration_label;

pub fn control_panel(app: &mut SigilApp, ctx: &egui::Context) {
    egui::SidePanel::left("control_panel")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Sigil");
            ui.separator();

            let animating = app.canvas().is_animating();
            let drawing = app.canvas().state().is_drawing();
            let has_strokes = !app.canvas().document().is_empty();

            ui.add_enabled_ui(!animating, |ui| {
                brush_controls(app, ui);
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.add_enabled(has_strokes && !drawing, egui::Button::new("Cast")).clicked() {
                    app.cast();
                }
                if ui.add_enabled(has_strokes && !animating, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(has_strokes, egui::Button::new("Clear")).clicked() {
                    app.clear();
                }
            });

            ui.separator();

            let recording = app.video_export().is_some();
            if ui.add_enabled(has_strokes, egui::Button::new("Download image")).clicked() {
                app.export_still();
            }
            if ui
                .add_enabled(has_strokes && !recording, egui::Button::new("Record video"))
                .clicked()
            {
                app.export_video();
            }
            if let Some(handle) = app.video_export() {
                let progress = handle.progress();
                ui.add(
                    egui::ProgressBar::new(progress.fraction())
                        .text(format!("{} / {} frames", progress.frames_written, progress.estimated_frames)),
                );
            }
            if let Some(status) = app.status() {
                ui.label(status);
            }

            ui.separator();

            let strokes = app.canvas().document().strokes();
            ui.label(format!("Strokes: {}", strokes.len()));
            ui.label(format!("Duration: {}", duration_label(session_duration_ms(strokes))));
        });
}

fn brush_controls(app: &mut SigilApp, ui: &mut egui::Ui) {
    let brush = app.brush_mut();

    ui.label("Color");
    ui.horizontal_wrapped(|ui| {
        for (name, token) in PALETTE {
            let swatch = BrushColor::new(token).to_rgba().to_color32();
            let selected = brush.color.as_str() == token;
            let button = egui::Button::new("")
                .fill(swatch)
                .min_size(egui::vec2(22.0, 22.0))
                .stroke(if selected {
                    egui::Stroke::new(2.0, egui::Color32::WHITE)
                } else {
                    egui::Stroke::NONE
                });
            if ui.add(button).on_hover_text(name).clicked() {
                log::debug!("Brush color: {} ({})", name, token);
                brush.color = BrushColor::new(token);
            }
        }
    });

    let mut width = brush.width();
    if ui
        .add(egui::Slider::new(&mut width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).text("Width"))
        .changed()
    {
        brush.set_width(width);
    }

    ui.label("Symmetry");
    ui.horizontal(|ui| {
        for mode in SymmetryMode::ALL {
            ui.selectable_value(&mut brush.symmetry, mode, mode.count().to_string());
        }
    });
}
