use egui::{Color32, RichText, Sense, Vec2};

use crate::{dialogs::DialogAction, page::PageState};

const ERROR_COLOR: Color32 = Color32::from_rgb(0xff, 0x6b, 0x35);
const BLOCK_ON: Color32 = Color32::from_rgb(0x0e, 0xa5, 0xe9);
const BLOCK_OFF: Color32 = Color32::from_gray(60);
const BLOCK_GAP: f32 = 2.0;
const BLOCK_HEIGHT: f32 = 10.0;

/// Bottom bar: status text, the segmented progress bar and its label.
/// Returns the action of the small chrome buttons, if one was pressed.
pub fn status_bar(
    ctx: &egui::Context,
    page: &PageState,
    block_count: usize,
) -> Option<DialogAction> {
    let mut action = None;

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        let color = if page.status.is_error {
            ERROR_COLOR
        } else {
            Color32::LIGHT_GRAY
        };
        ui.label(RichText::new(&page.status.text).size(14.0).color(color));

        ui.horizontal(|ui| {
            let label_width = 40.0;
            let available = (ui.available_width() - label_width).max(0.0);
            let blocks = block_count.max(1) as f32;
            let width = ((available - BLOCK_GAP * (blocks - 1.0)) / blocks).max(1.0);

            ui.spacing_mut().item_spacing.x = BLOCK_GAP;
            for i in 0..block_count {
                let size = Vec2::new(width, BLOCK_HEIGHT);
                let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
                let fill = if i < page.progress.filled_blocks {
                    BLOCK_ON
                } else {
                    BLOCK_OFF
                };
                ui.painter().rect_filled(rect, 2.0, fill);
            }
            ui.label(RichText::new(page.progress.label()).size(14.0).strong());
        });

        ui.horizontal(|ui| {
            if ui.small_button("Where we start").clicked() {
                action = Some(DialogAction::ShowStartingBakery);
            }
            if ui.small_button("Recommendations").clicked() {
                action = Some(DialogAction::ShowRecommendations);
            }
        });
        ui.add_space(4.0);
    });

    action
}
