use eframe::NativeOptions;
use egui::{vec2, Color32, Rect, RichText, Rounding, Sense, Stroke};
use log::{debug, info, warn};
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Project Modules
mod config;
mod device;
mod errors;
mod gallery;
mod media;
mod model;
mod player;
mod schedule;
mod state_manager;

use config::AppConfig;
use device::{DeviceController, DeviceEvent, DeviceState, FormFactor};
use gallery::VideoCard;
use model::{Category, CategoryFilter, Video};
use player::{PlayerAction, PlayerController};
use state_manager::{MetricCounter, PendingFetch, RevealState, ThumbnailCacheManager};

// --- Constants ---
const CONFIG_PATH: &str = "showreel.conf";
const INITIAL_WINDOW_WIDTH: f32 = 1280.0;
const INITIAL_WINDOW_HEIGHT: f32 = 800.0;
/// Repaint cadence while any animation is in flight (~30fps).
const ANIMATION_FRAME_INTERVAL: Duration = Duration::from_millis(1000 / 30);
/// Repaint cadence when idle; keeps debounce and hint timers ticking.
const IDLE_FRAME_INTERVAL: Duration = Duration::from_millis(200);
/// How long one card's entrance fade runs after its staggered delay.
const CARD_FADE_DURATION: Duration = Duration::from_millis(400);

/// Hero metrics shown above the device: (value text, label).
const HERO_METRICS: [(&str, &str); 3] = [
    ("150+", "Projects delivered"),
    ("40", "Brands served"),
    ("8 years", "Behind the lens"),
];

/// Filter bar entries, in presentation order.
fn filter_bar() -> impl Iterator<Item = CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
}

struct ShowreelApp {
    device: DeviceController,
    gallery: gallery::GalleryState,
    player: PlayerController,
    thumbnails: ThumbnailCacheManager,
    reveal: RevealState,
    metrics: Vec<(MetricCounter, &'static str)>,
    /// Card descriptors from the most recent gallery render.
    gallery_cards: Vec<VideoCard>,
    http_client: ReqwestClient,
}

impl ShowreelApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing ShowreelApp...");
        let now = Instant::now();

        let app_config = match config::load_config(CONFIG_PATH) {
            Ok(cfg) => {
                info!("Configuration loaded successfully: {:?}", cfg);
                cfg
            }
            Err(e) => {
                warn!("Using default configuration; could not load '{}': {}", CONFIG_PATH, e);
                AppConfig::default()
            }
        };

        let catalog = model::load_catalog_or_default(app_config.catalog_path.as_deref());
        let device = DeviceController::new(
            INITIAL_WINDOW_WIDTH,
            app_config.narrow_width_threshold,
            now,
        );
        let player = PlayerController::new(app_config.embed_base_url.clone());
        let metrics = HERO_METRICS
            .iter()
            .map(|(value, label)| (MetricCounter::new(value), *label))
            .collect();

        Self {
            device,
            gallery: gallery::GalleryState::new(catalog),
            player,
            thumbnails: ThumbnailCacheManager::new(),
            reveal: RevealState::new(),
            metrics,
            gallery_cards: Vec::new(),
            http_client: ReqwestClient::new(),
        }
    }

    /// Spawns fetch tasks for every visible thumbnail that is not cached,
    /// failed, or already in flight.
    fn request_visible_thumbnails(&self, ctx: &egui::Context) {
        let urls: Vec<String> = self
            .gallery
            .visible_videos()
            .iter()
            .map(|v| v.thumbnail_url.clone())
            .filter(|url| !url.is_empty() && self.thumbnails.needs_fetch(url))
            .collect();

        for url in urls {
            self.thumbnails.note_in_flight(&url);
            let client = self.http_client.clone();
            let pending = self.thumbnails.pending.clone();
            let ctx_clone = ctx.clone();
            debug!("Spawning task to fetch thumbnail: {}", url);
            tokio::spawn(async move {
                let result = media::fetch_thumbnail(&client, &url).await.map(Arc::new);
                pending
                    .lock()
                    .unwrap()
                    .insert(url, PendingFetch::Done(result));
                ctx_clone.request_repaint();
            });
        }
    }

    fn handle_device_events(
        &mut self,
        events: Vec<DeviceEvent>,
        now: Instant,
        ctx: &egui::Context,
    ) {
        for event in events {
            match event {
                DeviceEvent::RenderGallery => {
                    self.gallery_cards = self.gallery.render(now);
                    self.request_visible_thumbnails(ctx);
                }
                DeviceEvent::Opened => {
                    debug!("Device opening sequence completed");
                }
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context, now: Instant) {
        if !self.player.is_open() {
            return;
        }
        let watched = [
            egui::Key::Escape,
            egui::Key::F,
            egui::Key::Space,
            egui::Key::K,
            egui::Key::M,
            egui::Key::ArrowLeft,
            egui::Key::ArrowRight,
        ];
        for key in watched {
            if !ctx.input(|i| i.key_pressed(key)) {
                continue;
            }
            match self.player.handle_key(key, now) {
                PlayerAction::RequestFullscreen => {
                    let fullscreen =
                        ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
                }
                PlayerAction::Closed => debug!("Player closed via keyboard"),
                PlayerAction::Ignored => {}
            }
        }
    }

    /// Whether anything is still animating; drives the repaint cadence.
    fn is_animating(&self, now: Instant) -> bool {
        if self.device.state() == DeviceState::Opening
            || self.device.has_pending_phases()
            || self.player.has_pending_phases()
            || self.reveal.is_animating(now)
        {
            return true;
        }
        if self.metrics.iter().any(|(c, _)| c.is_animating(now)) {
            return true;
        }
        if let Some(rendered_at) = self.gallery.last_render() {
            let span = gallery::CARD_REVEAL_STAGGER * self.gallery_cards.len() as u32
                + CARD_FADE_DURATION;
            if now.duration_since(rendered_at) < span {
                return true;
            }
        }
        false
    }

    // --- Hero section ---

    fn draw_hero(&mut self, ui: &mut egui::Ui, now: Instant) {
        let probe = Rect::from_min_size(ui.cursor().min, vec2(1.0, 1.0));
        let alpha = self.reveal.progress("hero", ui.is_rect_visible(probe), now);
        if alpha > 0.0 {
            for (counter, _) in &mut self.metrics {
                counter.begin(now);
            }
        }

        ui.vertical_centered(|ui| {
            ui.add_space(32.0);
            ui.label(
                RichText::new("Film & Motion Showreel")
                    .size(34.0)
                    .strong()
                    .color(Color32::WHITE.gamma_multiply(alpha)),
            );
            ui.label(
                RichText::new("Direction, editing and motion design for brands.")
                    .size(16.0)
                    .color(Color32::from_gray(190).gamma_multiply(alpha)),
            );
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() * 0.5 - 180.0).max(0.0));
                for (counter, label) in &self.metrics {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(counter.display(now))
                                .size(24.0)
                                .strong()
                                .color(Color32::from_rgb(0, 194, 255).gamma_multiply(alpha)),
                        );
                        ui.label(
                            RichText::new(*label)
                                .size(12.0)
                                .color(Color32::from_gray(160).gamma_multiply(alpha)),
                        );
                    });
                    ui.add_space(24.0);
                }
            });
        });
    }

    fn draw_contact(&mut self, ui: &mut egui::Ui, now: Instant) {
        let probe = Rect::from_min_size(ui.cursor().min, vec2(1.0, 1.0));
        let alpha = self.reveal.progress("contact", ui.is_rect_visible(probe), now);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Have a project in mind?")
                    .size(22.0)
                    .strong()
                    .color(Color32::WHITE.gamma_multiply(alpha)),
            );
            ui.label(
                RichText::new("Let's talk about your next film.")
                    .color(Color32::from_gray(170).gamma_multiply(alpha)),
            );
        });
    }

    // --- Device section ---

    fn draw_device_section(&mut self, ui: &mut egui::Ui, now: Instant) {
        let device_size = match self.device.form_factor() {
            FormFactor::Desktop => vec2(560.0, 360.0),
            FormFactor::Narrow => vec2(240.0, 440.0),
        };
        let section_height = device_size.y + 60.0;
        let (section_rect, response) =
            ui.allocate_exact_size(vec2(ui.available_width(), section_height), Sense::click());

        if ui.is_rect_visible(section_rect) {
            self.device.notice_visible(now);
        }
        if response.clicked() {
            self.device.open(now);
        }

        let device_rect = Rect::from_center_size(section_rect.center(), device_size);
        let painter = ui.painter();

        // Frame: closed devices draw dimmer, the opening tilt/slide is
        // suggested by a brighter border once the frame phase has fired.
        let frame_stroke = if self.device.frame_open() {
            Stroke::new(2.0, Color32::from_rgb(0, 194, 255))
        } else {
            Stroke::new(1.5, Color32::from_gray(90))
        };
        painter.rect_filled(device_rect, Rounding::same(12.0), Color32::from_gray(25));
        painter.rect_stroke(device_rect, Rounding::same(12.0), frame_stroke);

        let screen_rect = device_rect.shrink(14.0);
        let brightness = self.device.screen_brightness();
        let screen_fill = if self.device.screen_on() {
            Color32::from_gray((12.0 + 28.0 * brightness) as u8)
        } else {
            Color32::from_gray(8)
        };
        painter.rect_filled(screen_rect, Rounding::same(6.0), screen_fill);

        if self.device.hint_visible() {
            painter.text(
                device_rect.center_bottom() + vec2(0.0, 28.0),
                egui::Align2::CENTER_CENTER,
                "Click to open",
                egui::FontId::proportional(14.0),
                Color32::from_gray(170),
            );
        }

        if self.device.screen_on() && self.device.state() == DeviceState::Open {
            let mut content_ui = ui.child_ui(
                screen_rect.shrink(8.0),
                egui::Layout::top_down(egui::Align::Min),
            );
            self.draw_screen_content(&mut content_ui, now);
        }
    }

    /// The content shown on the opened device screen: filter bar and the
    /// staggered card grid or feed.
    fn draw_screen_content(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            for filter in filter_bar() {
                let selected = self.gallery.active_filter() == filter;
                if ui.selectable_label(selected, filter.label()).clicked() && !selected {
                    self.gallery.set_filter(filter);
                    self.gallery_cards = self.gallery.render(now);
                    let ctx = ui.ctx().clone();
                    self.request_visible_thumbnails(&ctx);
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").clicked() {
                    self.device.close(now);
                }
            });
        });
        ui.separator();

        let rendered_at = match self.gallery.last_render() {
            Some(t) => t,
            None => return,
        };
        let card_size = match self.device.form_factor() {
            FormFactor::Desktop => vec2(160.0, 120.0),
            FormFactor::Narrow => vec2(ui.available_width() - 8.0, 140.0),
        };

        let cards = self.gallery_cards.clone();
        egui::ScrollArea::vertical()
            .id_source("screen_content")
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for card in &cards {
                        let elapsed = now.duration_since(rendered_at);
                        let alpha = if elapsed <= card.reveal_delay {
                            0.0
                        } else {
                            ((elapsed - card.reveal_delay).as_secs_f32()
                                / CARD_FADE_DURATION.as_secs_f32())
                            .clamp(0.0, 1.0)
                        };
                        self.draw_video_card(ui, card, card_size, alpha, now);
                    }
                });
            });
    }

    fn draw_video_card(
        &mut self,
        ui: &mut egui::Ui,
        card: &VideoCard,
        card_size: egui::Vec2,
        alpha: f32,
        now: Instant,
    ) {
        let video = match self.gallery.find(&card.video_id) {
            Some(v) => v.clone(),
            // A card whose id no longer resolves renders nothing and
            // cannot open the player.
            None => {
                warn!("Card references unknown video id '{}'", card.video_id);
                return;
            }
        };

        let (rect, response) = ui.allocate_exact_size(card_size, Sense::click());
        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter();
        painter.rect_filled(
            rect,
            Rounding::same(6.0),
            Color32::from_gray(38).gamma_multiply(alpha),
        );

        let thumb_rect = Rect::from_min_max(
            rect.min + vec2(4.0, 4.0),
            egui::pos2(rect.max.x - 4.0, rect.min.y + card_size.y * 0.55),
        );
        match self.thumbnails.image(&video.thumbnail_url) {
            Some(image) => {
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(
                    image.texture_id(ui.ctx()),
                    thumb_rect,
                    uv,
                    Color32::WHITE.gamma_multiply(alpha),
                );
            }
            None => {
                painter.rect_filled(
                    thumb_rect,
                    Rounding::same(4.0),
                    Color32::from_gray(55).gamma_multiply(alpha),
                );
            }
        }

        painter.text(
            egui::pos2(rect.min.x + 6.0, thumb_rect.max.y + 6.0),
            egui::Align2::LEFT_TOP,
            &video.title,
            egui::FontId::proportional(13.0),
            Color32::WHITE.gamma_multiply(alpha),
        );
        painter.text(
            egui::pos2(rect.min.x + 6.0, rect.max.y - 16.0),
            egui::Align2::LEFT_TOP,
            format!("{}  ·  {}", video.duration, video.category.label()),
            egui::FontId::proportional(11.0),
            Color32::from_gray(160).gamma_multiply(alpha),
        );

        if response.clicked() {
            self.player.open(video, now);
        }
    }

    // --- Player overlay ---

    fn draw_player_overlay(&mut self, ctx: &egui::Context, now: Instant) {
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("player_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (backdrop_rect, backdrop_response) =
                    ui.allocate_exact_size(screen.size(), Sense::click());
                ui.painter().rect_filled(
                    backdrop_rect,
                    Rounding::ZERO,
                    Color32::from_black_alpha(217),
                );

                let panel_size = vec2(screen.width().min(760.0) - 40.0, 440.0);
                let panel_rect = Rect::from_center_size(backdrop_rect.center(), panel_size);
                ui.painter()
                    .rect_filled(panel_rect, Rounding::same(10.0), Color32::from_gray(22));
                ui.painter().rect_stroke(
                    panel_rect,
                    Rounding::same(10.0),
                    Stroke::new(1.0, Color32::from_gray(70)),
                );

                let video = self.player.current_video().cloned();
                let embed = self.player.embed_source().map(str::to_owned);
                let mut content_ui = ui.child_ui(
                    panel_rect.shrink(18.0),
                    egui::Layout::top_down(egui::Align::Min),
                );
                if let Some(video) = video {
                    self.draw_player_panel(&mut content_ui, &video, embed.as_deref(), now);
                }

                // Clicking the backdrop outside the inner panel closes.
                if backdrop_response.clicked() {
                    if let Some(pos) = backdrop_response.interact_pointer_pos() {
                        if !panel_rect.contains(pos) {
                            self.player.close(now);
                        }
                    }
                }
            });
    }

    fn draw_player_panel(
        &mut self,
        ui: &mut egui::Ui,
        video: &Video,
        embed: Option<&str>,
        now: Instant,
    ) {
        ui.horizontal(|ui| {
            ui.heading(&video.title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕ Close").clicked() {
                    self.player.close(now);
                }
            });
        });
        ui.label(
            RichText::new(format!(
                "{}  ·  {}",
                video.category.label(),
                video.duration
            ))
            .color(Color32::from_gray(150)),
        );
        ui.add_space(8.0);

        let stage_height = ui.available_height() - 80.0;
        let stage_rect = Rect::from_min_size(
            ui.cursor().min,
            vec2(ui.available_width(), stage_height.max(120.0)),
        );
        ui.allocate_rect(stage_rect, Sense::hover());
        ui.painter()
            .rect_filled(stage_rect, Rounding::same(6.0), Color32::BLACK);
        if let Some(image) = self.thumbnails.image(&video.thumbnail_url) {
            let fitted = calculate_draw_rect(
                image.size_vec2().x,
                image.size_vec2().y,
                stage_rect,
            );
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter_image(ui, image, fitted, uv);
        }

        ui.add_space(8.0);
        ui.label(&video.description);
        if let Some(embed_url) = embed {
            ui.add_space(4.0);
            ui.hyperlink_to("▶ Play video", embed_url);
        }
    }
}

/// Paints a retained image into a rect with full tint.
fn painter_image(ui: &egui::Ui, image: &egui_extras::RetainedImage, rect: Rect, uv: Rect) {
    ui.painter()
        .image(image.texture_id(ui.ctx()), rect, uv, Color32::WHITE);
}

impl eframe::App for ShowreelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.device.observe_width(ctx.screen_rect().width(), now);
        let events = self.device.poll(now);
        self.handle_device_events(events, now, ctx);
        self.player.poll(now);
        self.thumbnails.drain_completed();
        self.handle_keys(ctx, now);

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(Color32::from_gray(12)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_source("page")
                    .show(ui, |ui| {
                        self.draw_hero(ui, now);
                        ui.add_space(24.0);
                        self.draw_device_section(ui, now);
                        ui.add_space(48.0);
                        self.draw_contact(ui, now);
                        ui.add_space(48.0);
                    });
            });

        if self.player.is_open() {
            self.draw_player_overlay(ctx, now);
        }

        if self.is_animating(now) {
            ctx.request_repaint_after(ANIMATION_FRAME_INTERVAL);
        } else {
            ctx.request_repaint_after(IDLE_FRAME_INTERVAL);
        }
    }
}

/// Fits media of the given dimensions into `available_rect`, preserving
/// aspect ratio and centering.
fn calculate_draw_rect(media_width: f32, media_height: f32, available_rect: Rect) -> Rect {
    let aspect_ratio = media_width / media_height;
    let mut draw_width = available_rect.width();
    let mut draw_height = available_rect.width() / aspect_ratio;
    if draw_height > available_rect.height() {
        draw_height = available_rect.height();
        draw_width = available_rect.height() * aspect_ratio;
    }
    Rect::from_center_size(available_rect.center(), vec2(draw_width, draw_height))
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    env_logger::init(); // Initialize logger
    info!("Starting showreel_rs application...");
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(vec2(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT))
            .with_title("Showreel"),
        ..Default::default()
    };
    eframe::run_native(
        "Showreel",
        options,
        Box::new(|cc| Box::new(ShowreelApp::new(cc))),
    )
}
