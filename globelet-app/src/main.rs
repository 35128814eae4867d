use globelet::{
    data::geojson::{decode_countries, decode_markers},
    rendering::{painter::PainterSurface, svg::SvgSurface},
    Color, EventSender, FrameStats, Globe, GlobeProfile, InputEvent, ScreenPoint,
};
use instant::Instant;

const USAGE: &str = "usage: globelet-app [--svg] [COUNTRIES.geojson] [MARKERS.json]";

struct Args {
    profile: GlobeProfile,
    countries: Option<String>,
    markers: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = Args {
        profile: GlobeProfile::Canvas,
        countries: None,
        markers: None,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--svg" => args.profile = GlobeProfile::Svg,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ if args.countries.is_none() => args.countries = Some(arg),
            _ if args.markers.is_none() => args.markers = Some(arg),
            _ => return Err(format!("unexpected argument '{}'\n{}", arg, USAGE).into()),
        }
    }
    Ok(args)
}

/// Standalone globe viewer application
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = parse_args()?;
    let countries = match &args.countries {
        Some(path) => decode_countries(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    let markers = match &args.markers {
        Some(path) => decode_markers(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    log::info!(
        "Loaded {} countries and {} markers",
        countries.len(),
        markers.len()
    );

    let (width, height) = globelet::constants::DEFAULT_SURFACE_SIZE;
    let globe = Globe::new(args.profile.resolve(), countries, markers, width, height);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Globelet - Globe Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "globelet-app",
        options,
        Box::new(|_cc| Box::new(GlobeletApp::new(globe))),
    )?;

    Ok(())
}

/// The main application struct
struct GlobeletApp {
    globe: Globe,
    sender: EventSender,
    surface_size: egui::Vec2,
    auto_rotate: bool,
    show_stats_panel: bool,
    last_stats: FrameStats,
    status: Option<String>,
}

impl GlobeletApp {
    fn new(globe: Globe) -> Self {
        Self {
            sender: globe.sender(),
            auto_rotate: globe.config().auto_rotate,
            globe,
            surface_size: egui::Vec2::ZERO,
            show_stats_panel: true,
            last_stats: FrameStats::default(),
            status: None,
        }
    }

    fn send(&self, event: InputEvent) {
        if let Err(e) = self.sender.send(event) {
            log::warn!("Dropped input event: {}", e);
        }
    }

    fn export_svg(&mut self) {
        let (width, height) = self.globe.size();
        let mut svg = SvgSurface::new(width, height);
        self.status = Some(match self.globe.render(&mut svg) {
            Ok(_) => match std::fs::write("globe.svg", svg.to_document()) {
                Ok(()) => "Wrote globe.svg".to_string(),
                Err(e) => format!("Export failed: {}", e),
            },
            Err(e) => format!("Export failed: {}", e),
        });
    }

    /// Forwards this frame's pointer and wheel input to the globe.
    fn collect_input(&mut self, ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) {
        let local = |pos: egui::Pos2| {
            let offset = pos - rect.min;
            ScreenPoint::new(offset.x as f64, offset.y as f64)
        };

        if rect.size() != self.surface_size {
            self.surface_size = rect.size();
            self.send(InputEvent::resize(rect.width() as f64, rect.height() as f64));
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.send(InputEvent::DragStart {
                    position: local(pos),
                });
            }
        }
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.send(InputEvent::drag(delta.x as f64, delta.y as f64));
            }
        }
        if response.drag_released() {
            self.send(InputEvent::DragEnd);
        }

        if response.hovered() {
            let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            if scroll != 0.0 {
                // egui scrolls up with positive deltas, the wheel model zooms in on negative ones
                self.send(InputEvent::Wheel {
                    delta: -scroll as f64,
                });
            }
            if pinch != 1.0 {
                self.send(InputEvent::zoom(self.globe.zoom_factor() * pinch as f64));
            }
        }

        match response.hover_pos() {
            Some(pos) if !response.dragged() => self.send(InputEvent::PointerMove {
                position: local(pos),
            }),
            None => self.send(InputEvent::PointerLeave),
            _ => {}
        }
    }
}

impl eframe::App for GlobeletApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_stats_panel, "Stats Panel");
                });
                if ui.checkbox(&mut self.auto_rotate, "Auto-rotate").changed() {
                    self.globe.set_auto_rotate(self.auto_rotate);
                }
                if ui.button("Export SVG").clicked() {
                    self.export_svg();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let state = self.globe.state();
                    ui.label(format!(
                        "Rotation: {:.2}, {:.2} | Scale: {:.1}",
                        state.rotation.lambda, state.rotation.phi, state.scale
                    ));
                });
            });
        });

        if self.show_stats_panel {
            egui::SidePanel::left("stats_panel").resizable(true).show(ctx, |ui| {
                ui.heading("Frame");
                ui.separator();
                ui.label(format!("Loop: {:?}", self.globe.loop_state()));
                ui.label(format!("Zoom: {:.2}x", self.globe.zoom_factor()));
                ui.label(format!("Paths: {}", self.last_stats.paths_drawn));
                ui.label(format!("Markers visible: {}", self.last_stats.markers_visible));
                ui.label(format!("Markers culled: {}", self.last_stats.markers_culled));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        }

        // Main globe area
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;

            self.collect_input(ui, &response, rect);
            self.globe.pump();
            self.globe.advance(Instant::now());

            for event in self.globe.drain_events() {
                log::trace!("{:?}", event);
            }

            let background = Color::rgb(0xff, 0xff, 0xff);
            let mut surface = PainterSurface::new(&painter, rect).with_background(background);
            match self.globe.render(&mut surface) {
                Ok(stats) => self.last_stats = stats,
                Err(e) => log::error!("Render failed: {}", e),
            }

            if let Some(country) = self.globe.hovered_country() {
                let label = country.label(&self.globe.config().style.flag_path);
                let text = match &label.flag_src {
                    Some(flag) => format!("{}\n{}", label.name, flag),
                    None => label.name,
                };
                response.on_hover_text_at_pointer(text);
            }
        });

        if self.globe.is_auto_rotating() {
            ctx.request_repaint_after(self.globe.config().tick_interval());
        }
    }
}
