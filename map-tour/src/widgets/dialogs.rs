use egui::{Align2, Color32, RichText};

use crate::{
    dialogs::{
        DialogAction, DialogManager, BAKERY_POPUP, FULLSCREEN_DIALOG, RECOMMENDATIONS_POPUP,
        STARTING_BAKERY_POPUP, WELCOME_DIALOG,
    },
    types::{PointOfInterest, BAKERIES},
};

const ACCENT: Color32 = Color32::from_rgb(0x0e, 0xa5, 0xe9);
const BUTTON_SIZE: [f32; 2] = [220.0, 40.0];

/// Draws every visible dialog and returns the buttons pressed this frame.
pub fn show_dialogs(ctx: &egui::Context, dialogs: &DialogManager) -> Vec<DialogAction> {
    let mut actions = Vec::new();

    if dialogs.is_visible(FULLSCREEN_DIALOG) {
        actions.extend(fullscreen(ctx));
    }
    if dialogs.is_visible(WELCOME_DIALOG) {
        actions.extend(welcome(ctx));
    }
    if dialogs.is_visible(BAKERY_POPUP) {
        if let Some(bakery) = dialogs.bakery() {
            actions.extend(bakery_popup(ctx, bakery));
        }
    }
    if dialogs.is_visible(RECOMMENDATIONS_POPUP) {
        actions.extend(recommendations(ctx));
    }
    if dialogs.is_visible(STARTING_BAKERY_POPUP) {
        actions.extend(starting_bakery(ctx));
    }

    actions
}

fn centered<'open>(title: &str) -> egui::Window<'open> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

fn wide_button(ui: &mut egui::Ui, text: &str) -> bool {
    ui.add_sized(BUTTON_SIZE, egui::Button::new(text).rounding(10.0))
        .clicked()
}

fn fullscreen(ctx: &egui::Context) -> Option<DialogAction> {
    let mut open = true;
    let mut action = None;

    centered("Go fullscreen?").open(&mut open).show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("The crawl works best with the whole screen to itself.").size(16.0),
            );
            ui.add_space(15.0);
            if wide_button(ui, "Enter fullscreen") {
                action = Some(DialogAction::EnterFullscreen);
            }
            ui.add_space(5.0);
            if wide_button(ui, "Skip") {
                action = Some(DialogAction::SkipFullscreen);
            }
        });
    });

    if !open {
        action = Some(DialogAction::CloseFullscreen);
    }
    action
}

fn welcome(ctx: &egui::Context) -> Option<DialogAction> {
    let mut open = true;
    let mut action = None;

    centered("Welcome").open(&mut open).show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("A bakery crawl across Hackney")
                    .strong()
                    .size(22.0)
                    .color(ACCENT),
            );
            ui.add_space(10.0);
            ui.label(
                RichText::new(
                    "Scroll down to fly from central London to the first stop. \
                     Tap a numbered pin to see what to order.",
                )
                .size(16.0),
            );
            ui.add_space(15.0);
            if wide_button(ui, "Start the journey") {
                action = Some(DialogAction::StartJourney);
            }
            ui.add_space(5.0);
            if wide_button(ui, "Move to recommendations") {
                action = Some(DialogAction::MoveToRecommendations);
            }
        });
    });

    if !open {
        action = Some(DialogAction::CloseWelcome);
    }
    action
}

fn bakery_popup(ctx: &egui::Context, bakery: &PointOfInterest) -> Option<DialogAction> {
    let mut open = true;
    let mut action = None;

    egui::Window::new(format!("#{} {}", bakery.number, bakery.name))
        .id(egui::Id::new(BAKERY_POPUP))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_BOTTOM, [0.0, -80.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.visuals_mut().override_text_color = Some(Color32::WHITE);
            ui.label(RichText::new(bakery.name).strong().size(20.0).color(ACCENT));
            ui.add_space(5.0);
            ui.label(RichText::new(bakery.recommendation).size(16.0));
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.hyperlink_to("Open in Google Maps", bakery.link);
                if ui.button("Close").clicked() {
                    action = Some(DialogAction::CloseBakeryPopup);
                }
            });
        });

    if !open {
        action = Some(DialogAction::CloseBakeryPopup);
    }
    action
}

fn recommendations(ctx: &egui::Context) -> Option<DialogAction> {
    let mut open = true;

    centered("Recommendations").open(&mut open).show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .max_height(400.0)
            .show(ui, |ui| {
                for bakery in BAKERIES.iter() {
                    ui.label(
                        RichText::new(format!("{}. {}", bakery.number, bakery.name))
                            .strong()
                            .size(16.0),
                    );
                    ui.label(bakery.recommendation);
                    ui.hyperlink_to("Map", bakery.link);
                    ui.separator();
                }
            });
    });

    (!open).then_some(DialogAction::CloseRecommendations)
}

fn starting_bakery(ctx: &egui::Context) -> Option<DialogAction> {
    let mut open = true;
    let first = &BAKERIES[0];

    centered("Where we start").open(&mut open).show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(first.name).strong().size(20.0).color(ACCENT));
            ui.label(RichText::new(first.recommendation).size(16.0));
            ui.hyperlink_to("Open in Google Maps", first.link);
        });
    });

    (!open).then_some(DialogAction::CloseStartingBakery)
}
