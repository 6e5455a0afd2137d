/*!
 * Interactive viewer for wbi-scatter
 *
 * - Loads the dataset in the background and shows the first year
 * - Year selector re-filters and re-renders with the fixed axes
 * - Hovering a circle fades in a detail panel; leaving fades it out
 * - Open another CSV, or save the current chart as SVG/PNG
 *
 * Platform support: Windows, macOS, Linux
 */

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Stroke};
use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use wbi_scatter::labels::TextLabel;
use wbi_scatter::scale::{LinearScale, tick_format};
use wbi_scatter::tooltip::Tooltip;
use wbi_scatter::viz::{self, util::mark_stroke_width};
use wbi_scatter::{PlotConfig, Scene};

const TICKS: usize = 10;
const TICK_LEN: f32 = 6.0;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let mut config = PlotConfig::discover().unwrap_or_else(|e| {
        log::warn!("ignoring config: {e}");
        PlotConfig::default()
    });
    if let Some(path) = std::env::args().nth(1) {
        config.data_path = PathBuf::from(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width as f32 + 40.0, config.height as f32 + 90.0])
            .with_min_inner_size([400.0, 400.0])
            .with_title("Life Expectancy vs Fertility - wbi-scatter"),
        ..Default::default()
    };

    eframe::run_native(
        "wbi-scatter",
        options,
        Box::new(|_cc| Ok(Box::new(ScatterApp::new(config)))),
    )
}

/// Main application state
struct ScatterApp {
    config: PlotConfig,
    scene: Option<Scene>,
    tooltip: Tooltip,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background load
    load_receiver: Option<mpsc::Receiver<Result<Scene, String>>>,
}

impl ScatterApp {
    fn new(config: PlotConfig) -> Self {
        let mut app = Self {
            config,
            scene: None,
            tooltip: Tooltip::default(),
            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            load_receiver: None,
        };
        app.start_load();
        app
    }

    /// Load the dataset on a worker thread; the UI keeps running meanwhile.
    fn start_load(&mut self) {
        self.is_loading = true;
        self.error_message.clear();
        self.status_message = format!("Loading {} ...", self.config.data_path.display());

        let (sender, receiver) = mpsc::channel();
        self.load_receiver = Some(receiver);
        let config = self.config.clone();
        thread::spawn(move || {
            let result = Scene::load(config).map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    fn check_load_result(&mut self) {
        if let Some(receiver) = &self.load_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.load_receiver = None;

            match result {
                Ok(scene) => {
                    self.status_message = format!(
                        "{} rows, years {}-{}",
                        scene.dataset().len(),
                        scene.selector().first(),
                        scene.selector().last(),
                    );
                    self.error_message.clear();
                    self.tooltip = Tooltip::default();
                    self.scene = Some(scene);
                }
                Err(error) => {
                    // No retry: the user can pick another file.
                    self.error_message = format!("Failed to load data: {error}");
                    self.status_message.clear();
                    self.scene = None;
                }
            }
        }
    }

    fn save_chart(&mut self) {
        let Some(scene) = &self.scene else { return };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .add_filter("PNG", &["png"])
            .set_file_name(format!("scatter_{}.svg", scene.selected_year()))
            .save_file()
        else {
            return;
        };
        // The hovered country, if any, gets its detail panel in the file too.
        let highlight = self.tooltip.target().map(|k| k.location.clone());
        match viz::plot_scene(scene, &path, highlight.as_deref()) {
            Ok(()) => self.status_message = format!("Saved {}", path.display()),
            Err(err) => self.error_message = format!("Failed to save chart: {err}"),
        }
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        let mut open_clicked = false;
        let mut save_clicked = false;

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.is_loading, egui::Button::new("Open CSV…"))
                    .clicked()
                {
                    open_clicked = true;
                }

                if let Some(scene) = self.scene.as_mut() {
                    ui.label("Year:");
                    let mut selected = scene.selected_year();
                    egui::ComboBox::from_id_salt("year")
                        .selected_text(selected.to_string())
                        .show_ui(ui, |ui| {
                            for opt in scene.selector().options() {
                                ui.selectable_value(&mut selected, opt.value, opt.label);
                            }
                        });
                    if selected != scene.selected_year() {
                        change_year(scene, selected, &mut self.error_message);
                    }

                    if ui.button("Save chart…").clicked() {
                        save_clicked = true;
                    }
                }

                if self.is_loading {
                    ui.spinner();
                }
            });

            if !self.status_message.is_empty() {
                ui.colored_label(Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(Color32::RED, &self.error_message);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(scene) = self.scene.as_ref() else {
                if self.is_loading {
                    ui.label("Loading data...");
                }
                return;
            };
            let now = ui.input(|i| i.time);
            let cfg = scene.config();
            let size = egui::vec2(cfg.width as f32, cfg.height as f32);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let origin = response.rect.min;
            let to_screen = |x: f64, y: f64| origin + egui::vec2(x as f32, y as f32);

            painter.rect_filled(response.rect, 0.0, Color32::WHITE);

            let proj = scene.projections();
            draw_x_axis(&painter, &proj.x, proj.y.range.1, &to_screen);
            draw_y_axis(&painter, &proj.y, proj.x.range.0, &to_screen);
            for label in scene.axis_labels() {
                draw_label(&painter, label, &to_screen);
            }
            draw_label(&painter, scene.title(), &to_screen);

            let stroke_w = mark_stroke_width(cfg.width, cfg.height);
            let stroke = Stroke::new(stroke_w as f32, Color32::from_rgb(0x42, 0x86, 0xf4));
            for m in scene.marks().iter().filter(|m| m.is_drawable()) {
                painter.circle_stroke(to_screen(m.cx, m.cy), m.r as f32, stroke);
            }

            // Hover: hit-test in canvas coordinates.
            let hovered = response.hover_pos().and_then(|p| {
                let (x, y) = ((p.x - origin.x) as f64, (p.y - origin.y) as f64);
                scene
                    .marks()
                    .hit_test(x, y, stroke_w / 2.0)
                    .map(|m| (m, (x, y)))
            });
            match hovered {
                Some((mark, pointer)) => self.tooltip.hover(mark, pointer, &cfg.locale, now),
                None => self.tooltip.leave(now),
            }

            let opacity = self.tooltip.opacity(now);
            if opacity > 0.0 {
                let (ax, ay) = self.tooltip.anchor();
                egui::Area::new(egui::Id::new("detail-panel"))
                    .order(egui::Order::Tooltip)
                    .fixed_pos(to_screen(ax, ay))
                    .interactable(false)
                    .show(ctx, |ui| {
                        ui.set_opacity(opacity);
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            for line in self.tooltip.lines() {
                                ui.label(line);
                            }
                        });
                    });
            }
            if self.tooltip.is_animating(now) {
                ctx.request_repaint();
            }
        });

        if open_clicked
            && let Some(path) = rfd::FileDialog::new()
                .add_filter("CSV", &["csv"])
                .pick_file()
        {
            self.config.data_path = path;
            self.start_load();
        }
        if save_clicked {
            self.save_chart();
        }
    }
}

/// Re-target the scene after a combo selection. A successful change clears
/// any earlier error message.
fn change_year(scene: &mut Scene, year: i32, error_message: &mut String) {
    match scene.show_year(year) {
        Ok(_) => error_message.clear(),
        Err(err) => *error_message = err.to_string(),
    }
}

fn draw_x_axis(painter: &egui::Painter, scale: &LinearScale, y_px: f64, to_screen: &impl Fn(f64, f64) -> Pos2) {
    let black = Stroke::new(1.0, Color32::BLACK);
    painter.line_segment(
        [to_screen(scale.range.0, y_px), to_screen(scale.range.1, y_px)],
        black,
    );
    let step = scale.tick_step(TICKS);
    for t in scale.ticks(TICKS) {
        let p = to_screen(scale.apply(t), y_px);
        painter.line_segment([p, p + egui::vec2(0.0, TICK_LEN)], black);
        painter.text(
            p + egui::vec2(0.0, TICK_LEN + 2.0),
            Align2::CENTER_TOP,
            tick_format(t, step),
            FontId::proportional(10.0),
            Color32::BLACK,
        );
    }
}

fn draw_y_axis(painter: &egui::Painter, scale: &LinearScale, x_px: f64, to_screen: &impl Fn(f64, f64) -> Pos2) {
    let black = Stroke::new(1.0, Color32::BLACK);
    painter.line_segment(
        [to_screen(x_px, scale.range.0), to_screen(x_px, scale.range.1)],
        black,
    );
    let step = scale.tick_step(TICKS);
    for t in scale.ticks(TICKS) {
        let p = to_screen(x_px, scale.apply(t));
        painter.line_segment([p - egui::vec2(TICK_LEN, 0.0), p], black);
        painter.text(
            p - egui::vec2(TICK_LEN + 2.0, 0.0),
            Align2::RIGHT_CENTER,
            tick_format(t, step),
            FontId::proportional(10.0),
            Color32::BLACK,
        );
    }
}

/// Labels are anchored at their baseline start, like SVG text.
fn draw_label(painter: &egui::Painter, label: &TextLabel, to_screen: &impl Fn(f64, f64) -> Pos2) {
    let font = FontId::proportional(label.font_px() as f32);
    let anchor = to_screen(label.x, label.y);
    if label.vertical {
        let galley = painter.layout_no_wrap(label.text.clone(), font, Color32::BLACK);
        // Rotated a quarter turn counter-clockwise; the glyph tops face left.
        let pos = anchor - egui::vec2(galley.size().y, 0.0);
        painter.add(egui::epaint::TextShape::new(pos, galley, Color32::BLACK).with_angle(-FRAC_PI_2));
    } else {
        painter.text(anchor, Align2::LEFT_BOTTOM, &label.text, font, Color32::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use wbi_scatter::storage::load_reader;

    #[test]
    fn successful_year_change_clears_previous_error() {
        let csv = "time,fertility_rate,life_expectancy,pop_mlns,location\n\
                   1960,6.0,50.0,10,A\n\
                   1961,2.0,75.0,100,A\n";
        let ds = load_reader(csv.as_bytes(), Path::new("mem.csv")).unwrap();
        let mut scene = Scene::new(ds, PlotConfig::default()).unwrap();
        let mut error = String::new();

        change_year(&mut scene, 1990, &mut error);
        assert!(error.contains("1990"), "{error}");
        assert_eq!(scene.selected_year(), 1960);

        change_year(&mut scene, 1961, &mut error);
        assert!(error.is_empty(), "{error}");
        assert_eq!(scene.selected_year(), 1961);
    }
}
