use egui::{include_image, Align2, Color32, FontId, Image, Rect, Vec2};
use walkers::Projector;

use crate::surface::Marker;

// Pin artwork size at scale 1; the tip sits on the coordinate.
const PIN_SIZE: Vec2 = Vec2::new(40.0, 50.0);

impl Marker {
    /// Draws the pin and returns whether it was clicked this frame.
    pub(super) fn draw(&self, ui: &mut egui::Ui, projector: &Projector) -> bool {
        let tip = projector.project(self.position).to_pos2();
        let size = PIN_SIZE * self.scale;

        // Grow from the tip so the pin keeps pointing at the bakery.
        let rect = Rect::from_min_size(tip - Vec2::new(size.x / 2.0, size.y), size);

        let response = ui.allocate_rect(rect, egui::Sense::click());

        let image = Image::new(include_image!("../../assets/bakery-pin.svg"))
            .fit_to_exact_size(size)
            .tint(if response.hovered() {
                Color32::from_gray(220)
            } else {
                Color32::WHITE
            });
        ui.put(rect, image);

        // Label centered in the round head of the pin.
        let head = rect.center_top() + Vec2::new(0.0, size.y * 0.4);
        ui.painter().text(
            head,
            Align2::CENTER_CENTER,
            &self.icon.label,
            FontId::proportional(16.0 * self.scale),
            Color32::WHITE,
        );

        response.clicked()
    }
}
