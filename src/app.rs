use crate::data::{DisplayStats, TelemetryEvent};
use crate::monitor;
use crate::overlay::OverlayState;
use crate::tray::{Tray, TrayCommand};
use crossbeam_channel::{bounded, Receiver};
use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ViewportCommand, WindowLevel};
use log::info;
use std::time::{Duration, Instant};

const TOPMOST_CHECK_INTERVAL: Duration = Duration::from_millis(500);
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

pub struct OverlayApp {
    receiver: Receiver<TelemetryEvent>,
    stats: DisplayStats,
    state: OverlayState,
    tray: Tray,
    about_open: bool,
    last_topmost_check: Instant,
}

impl OverlayApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (sender, receiver) = bounded(100);
        monitor::spawn_samplers(sender);

        let tray = Tray::new().expect("Failed to create tray icon");

        let mut style = (*cc.egui_ctx.style()).clone();
        style.visuals.dark_mode = true;
        style.visuals.override_text_color = Some(Color32::WHITE);
        cc.egui_ctx.set_style(style);

        info!("overlay started");

        Self {
            receiver,
            stats: DisplayStats::default(),
            state: OverlayState::default(),
            tray,
            about_open: false,
            last_topmost_check: Instant::now(),
        }
    }

    fn handle_tray(&mut self, ctx: &egui::Context) {
        for command in self.tray.poll() {
            match command {
                TrayCommand::ToggleWindow => {
                    let visible = self.state.toggle_visible();
                    ctx.send_viewport_cmd(ViewportCommand::Visible(visible));
                    if visible {
                        ctx.send_viewport_cmd(ViewportCommand::Focus);
                    }
                }
                TrayCommand::ToggleLock => {
                    let locked = self.state.toggle_lock();
                    self.tray.sync_lock_label(locked);
                }
                TrayCommand::ShowAbout => self.about_open = true,
                TrayCommand::Quit => {
                    // Hide before closing so the bar does not linger while
                    // the process tears down.
                    self.state.set_visible(false);
                    ctx.send_viewport_cmd(ViewportCommand::Visible(false));
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }
            }
        }
    }

    // Best-effort correction loop: between two checks another window can
    // still cover the bar.
    fn ensure_topmost(&mut self, ctx: &egui::Context) {
        if self.last_topmost_check.elapsed() < TOPMOST_CHECK_INTERVAL {
            return;
        }
        self.last_topmost_check = Instant::now();
        let focused = ctx.input(|i| i.viewport().focused.unwrap_or(false));
        if self.state.visible && !focused {
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop));
            ctx.send_viewport_cmd(ViewportCommand::Focus);
        }
    }

    fn handle_drag(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let Some(origin) = ctx.input(|i| i.viewport().outer_rect).map(|r| r.min) else {
            return;
        };
        if !self.state.dragging() {
            // Track wherever the window system actually put us.
            self.state.position = origin;
        }
        // Pointer positions are window-relative; the drag machine works in
        // screen coordinates.
        let cursor = response.interact_pointer_pos().map(|p| origin + p.to_vec2());
        if response.drag_started() {
            if let Some(cursor) = cursor {
                self.state.begin_drag(cursor);
            }
        } else if response.dragged() {
            if let Some(new_origin) = cursor.and_then(|c| self.state.update_drag(c)) {
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(new_origin));
            }
        } else if response.drag_stopped() {
            self.state.end_drag();
        }
    }

    fn show_about(&mut self, ctx: &egui::Context) {
        let close = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("about"),
            egui::ViewportBuilder::default()
                .with_title("Acerca de System Monitor Widget")
                .with_inner_size([380.0, 170.0])
                .with_resizable(false),
            |ctx, _class| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("System Monitor Widget");
                    ui.add_space(4.0);
                    ui.label("Muestra uso de CPU, GPU, VRAM y RAM en tiempo real.");
                    ui.horizontal(|ui| {
                        ui.label("Autor:");
                        ui.hyperlink_to("Xardax", "https://github.com/Xardax88");
                    });
                    ui.label("Licencia: MIT");
                    ui.horizontal(|ui| {
                        ui.label("GitHub:");
                        ui.hyperlink_to(
                            "Xardax88/SystemMonitor",
                            "https://github.com/Xardax88/SystemMonitor",
                        );
                    });
                });
                ctx.input(|i| i.viewport().close_requested())
            },
        );
        if close {
            self.about_open = false;
        }
    }
}

impl eframe::App for OverlayApp {
    // Transparent backdrop; only the rounded bar frame is painted.
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_tray(ctx);

        while let Ok(event) = self.receiver.try_recv() {
            self.stats.apply(event);
        }

        let bar = egui::Frame::new()
            .fill(Color32::from_black_alpha(100))
            .corner_radius(CornerRadius::same(10))
            .inner_margin(Margin::symmetric(10, 5));

        egui::CentralPanel::default().frame(bar).show(ctx, |ui| {
            let response = ui.interact(
                ui.max_rect(),
                egui::Id::new("overlay-drag"),
                egui::Sense::click_and_drag(),
            );
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 14.0;
                for text in [
                    self.stats.cpu_label(),
                    self.stats.gpu_label(),
                    self.stats.vram_label(),
                    self.stats.ram_label(),
                ] {
                    ui.label(RichText::new(text).strong().size(12.0));
                }
            });
            self.handle_drag(ctx, &response);
        });

        if self.about_open {
            self.show_about(ctx);
        }

        self.ensure_topmost(ctx);
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
