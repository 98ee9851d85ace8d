pub mod boundary;
pub mod config;
pub mod device;
pub mod dialogs;
mod map;
pub mod markers;
pub mod page;
mod plugins;
pub mod preload;
pub mod scroll;
pub mod surface;
pub mod timer;
pub mod types;
mod widgets;

use logger::Logger;

pub use config::{ConfigError, TourConfig};
pub use map::TourApp;

const WINDOW_TITLE: &str = "Bakery Crawl";
// A typical phone viewport, so the tour starts in its mobile layout.
const PHONE_SIZE: [f32; 2] = [390.0, 844.0];

pub fn run(config: TourConfig, logger: Logger) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(PHONE_SIZE)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(TourApp::new(cc.egui_ctx.clone(), config, logger)))),
    )
}
