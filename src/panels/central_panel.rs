use crate::SigilApp;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(5, 5, 8);
const PROMPT: &str = "Hold left click to draw";

pub fn central_panel(app: &mut SigilApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(BACKGROUND))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            app.run_canvas(ctx, &painter, canvas_rect);

            if app.canvas().shows_standby_prompt() {
                painter.text(
                    canvas_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    PROMPT,
                    egui::FontId::proportional(18.0),
                    egui::Color32::from_rgba_unmultiplied(255, 215, 0, 120),
                );
            }
        });
}
