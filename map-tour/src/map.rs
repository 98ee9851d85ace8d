use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use egui::Context;
use egui_extras::install_image_loaders;
use logger::{Color, Logger};
use walkers::{HttpOptions, HttpTiles};

use crate::{
    boundary::{self, AssetBase, AssetClient, AssetSource, BoundaryLoader},
    config::TourConfig,
    device::DeviceClass,
    dialogs::DialogManager,
    markers::MarkerLayer,
    page::{PageScroll, PageState},
    preload::Preloader,
    scroll::ScrollController,
    surface::WalkersSurface,
    types::BAKERIES,
    widgets,
};

const FRAME_TICK_MS: u64 = 16;

/// Everything that exists once the tour is running.
struct Tour {
    surface: WalkersSurface,
    page_scroll: PageScroll,
    page: PageState,
    controller: ScrollController,
    loader: BoundaryLoader,
    markers: MarkerLayer,
    dialogs: DialogManager,
    preloader: Preloader,
    block_count: usize,
}

impl Tour {
    /// Brings the tour up in order: dialogs, panes, the preload walk,
    /// boundary fetches, markers and finally the scroll controller.
    fn start(ctx: &Context, config: &TourConfig, logger: &Logger, now: Instant) -> Self {
        let mut dialogs = DialogManager::new(config.animation.dialog_delay(), logger.clone());
        dialogs.init(now, config.animation.fullscreen_dialog_delay());

        let tiles = HttpTiles::with_options(
            walkers::sources::OpenStreetMap,
            HttpOptions {
                cache: config.map.tile_cache.clone(),
                ..Default::default()
            },
            ctx.to_owned(),
        );
        let mut surface = WalkersSurface::new(Box::new(tiles), config.map.start, now);

        boundary::create_panes(&mut surface, &config.boundaries);

        let viewport = ctx.screen_rect().size();
        let mut preloader =
            Preloader::new(&config.preload, [viewport.x, viewport.y], logger.clone());
        preloader.schedule(now, config.animation.preload_delay());

        let source: Arc<dyn AssetSource> =
            Arc::new(AssetClient::new(AssetBase::parse(&config.asset_base)));
        let loader = BoundaryLoader::spawn(&config.boundaries, source, logger.clone());

        let markers = MarkerLayer::place(
            &mut surface,
            &BAKERIES,
            &config.markers.pane,
            config.markers.z_index,
            config.markers.scale_step,
            config.animation.reset_timeout(),
            logger.clone(),
        );

        let controller = ScrollController::new(config, logger.clone());

        let _ = logger.info("Bakery Crawl app initialized successfully", Color::Green, true);

        Self {
            surface,
            page_scroll: PageScroll::new(config.scroll.page_screens),
            page: PageState::default(),
            controller,
            loader,
            markers,
            dialogs,
            preloader,
            block_count: config.scroll.progress_block_count,
        }
    }

    fn update(&mut self, ctx: &Context, now: Instant) {
        self.surface.set_now(now);
        self.dialogs.tick(now);

        if let Some(action) = widgets::status_bar(ctx, &self.page, self.block_count) {
            self.dialogs.apply(action, now);
        }

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        let response = egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| self.surface.show(ui, now))
            .inner;

        widgets::title_overlay(ctx, self.page.overlay_opacity);

        for action in widgets::show_dialogs(ctx, &self.dialogs) {
            self.dialogs.apply(action, now);
        }
        if self.dialogs.take_fullscreen_request() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
        }

        // Wheel and drag both move the page; up on screen is down the page.
        let wheel = ctx.input(|input| input.smooth_scroll_delta.y);
        let drag = response.drag_delta().y;
        self.page_scroll.feed(
            -(wheel + drag) as f64,
            response.rect.height() as f64,
            self.dialogs.scroll_lock().is_disabled(),
        );

        self.controller
            .drain(&mut self.page_scroll, now, &mut self.surface, &mut self.page);
        self.controller.tick(now);
        self.loader
            .poll(&mut self.surface, &mut self.controller, &mut self.page);

        for id in self.surface.take_clicked_markers() {
            if let Some(bakery) = self.markers.activate(id, now, &mut self.surface) {
                self.dialogs.show_bakery(bakery);
            }
        }
        self.markers.tick(now, &mut self.surface);
        self.preloader.tick(now, &mut self.surface);

        if self.surface.is_animating(now) {
            ctx.request_repaint();
        } else if let Some(wait) = self.controller.guard_remaining(now) {
            // Wake up when the guard lifts so a held scroll gets through.
            ctx.request_repaint_after(wait);
        } else if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(FRAME_TICK_MS));
        }
    }

    fn is_busy(&self) -> bool {
        self.loader.is_pending()
            || self.markers.has_pending_reset()
            || self.dialogs.has_pending()
            || self.preloader.is_active()
    }
}

/// The tour window. Decides on the first frame whether this is a phone
/// sized window and only then starts the tour.
pub struct TourApp {
    config: TourConfig,
    logger: Logger,
    device: Option<DeviceClass>,
    tour: Option<Tour>,
}

impl TourApp {
    pub fn new(egui_ctx: Context, config: TourConfig, logger: Logger) -> Self {
        install_image_loaders(&egui_ctx);

        Self {
            config,
            logger,
            device: None,
            tour: None,
        }
    }
}

impl eframe::App for TourApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let max_width = self.config.device.max_mobile_width;

        let device = match self.device {
            Some(device) => device,
            None => {
                let width = ctx.screen_rect().width();
                let device = DeviceClass::classify(width, max_width);
                if !device.is_mobile() {
                    let _ = self.logger.info(
                        "Desktop detected - showing desktop message",
                        Color::Yellow,
                        true,
                    );
                }
                self.device = Some(device);
                device
            }
        };

        if !device.is_mobile() {
            widgets::desktop_message(ctx, max_width);
            return;
        }

        let tour = self
            .tour
            .get_or_insert_with(|| Tour::start(ctx, &self.config, &self.logger, now));
        tour.update(ctx, now);
    }
}
