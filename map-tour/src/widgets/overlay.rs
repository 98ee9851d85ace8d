use egui::{Align2, Color32, RichText};

/// Title card over the map that fades out as the tour starts.
pub fn title_overlay(ctx: &egui::Context, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }

    egui::Area::new("title_overlay".into())
        .anchor(Align2::CENTER_TOP, [0.0, 60.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            egui::Frame::none()
                .fill(Color32::from_black_alpha(160))
                .rounding(12.0)
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("London Bakery Crawl")
                                .strong()
                                .size(28.0)
                                .color(Color32::WHITE),
                        );
                        ui.label(
                            RichText::new("Seven stops, one afternoon")
                                .size(16.0)
                                .color(Color32::LIGHT_GRAY),
                        );
                    });
                });
        });
}

/// Shown instead of the tour on wide windows.
pub fn desktop_message(ctx: &egui::Context, max_mobile_width: f32) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.label(
                RichText::new("Best enjoyed on a phone")
                    .strong()
                    .size(26.0),
            );
            ui.add_space(10.0);
            ui.label(
                RichText::new(format!(
                    "Open the crawl on a mobile device, or narrow this window to {} px or less.",
                    max_mobile_width
                ))
                .size(16.0),
            );
        });
    });
}
