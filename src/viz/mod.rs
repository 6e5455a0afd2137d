//! Visualization: render a [`Scene`] to **SVG** or **PNG**.
//!
//! - Bottom and left axes from a Plotters mesh over the projection domains
//! - Static axis labels and the per-year title
//! - One stroked circle per mark, sized by population
//! - Optional detail panel for one country (the static counterpart of hovering)
//!
//! Marks, labels and the panel are drawn in canvas pixels on the root area, so
//! what lands in the file is exactly what the projections computed.

pub mod text;
pub mod types;
pub mod util;

pub use types::ImageFormat;

use crate::labels::TextLabel;
use crate::marks::Mark;
use crate::scene::Scene;
use crate::tooltip::detail_lines;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontFamily, FontTransform};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};
use std::sync::Once;

use text::PanelLayout;
use types::{
    AXIS_TICKS, PANEL_FONT_PX, PANEL_LINE_PX, PANEL_MAX_W_PX, TICK_FONT_PX, TICK_LEN,
};
use util::{MARK_COLOR, PANEL_COLOR, mark_stroke_width};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Render the scene's current year to `out_path` (`.svg` → SVG, otherwise PNG).
/// `highlight` names a country whose detail panel is drawn next to its mark.
pub fn plot_scene<P: AsRef<Path>>(scene: &Scene, out_path: P, highlight: Option<&str>) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (scene.config().width, scene.config().height);

    match ImageFormat::from_path(out_path) {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
            draw_scene(root, scene, highlight)?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
            draw_scene(root, scene, highlight)?;
        }
    }
    log::info!(
        "wrote {} ({} marks, year {})",
        out_path.display(),
        scene.marks().len(),
        scene.selected_year()
    );
    Ok(())
}

/// Render the scene's current year to an SVG document in memory.
pub fn render_svg(scene: &Scene, highlight: Option<&str>) -> Result<String> {
    ensure_fonts_registered();
    let mut buf = String::new();
    {
        let size = (scene.config().width, scene.config().height);
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw_scene(root, scene, highlight)?;
    }
    Ok(buf)
}

/// Render every year of the selector into `out_dir` as `scatter_<year>.<ext>`,
/// re-targeting the scene year by year. The scene is left on the last year.
pub fn plot_all_years<P: AsRef<Path>>(
    scene: &mut Scene,
    out_dir: P,
    format: ImageFormat,
    highlight: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    let years = scene.selector().years();
    let mut written = Vec::with_capacity(scene.selector().len());
    for year in years {
        scene.show_year(year)?;
        let path = out_dir.join(format!("scatter_{year}.{}", format.extension()));
        // A highlighted country may be absent in some years; draw those frames without it.
        let hl = highlight.filter(|name| find_mark(scene, name).is_some());
        plot_scene(scene, &path, hl)?;
        written.push(path);
    }
    Ok(written)
}

fn find_mark<'a>(scene: &'a Scene, location: &str) -> Option<&'a Mark> {
    scene
        .marks()
        .iter()
        .find(|m| m.key.location.eq_ignore_ascii_case(location))
}

/// Helper that draws to any Plotters backend.
fn draw_scene<DB>(root: DrawingArea<DB, Shift>, scene: &Scene, highlight: Option<&str>) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    draw_axes(&root, scene)?;

    for label in scene.axis_labels() {
        draw_label(&root, label)?;
    }
    draw_label(&root, scene.title())?;

    let cfg = scene.config();
    let style = ShapeStyle {
        color: MARK_COLOR.to_rgba(),
        filled: false,
        stroke_width: mark_stroke_width(cfg.width, cfg.height).round().max(1.0) as u32,
    };
    for m in scene.marks().iter().filter(|m| m.is_drawable()) {
        root.draw(&Circle::new(
            (m.cx.round() as i32, m.cy.round() as i32),
            m.r.round() as u32,
            style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    if let Some(name) = highlight {
        let mark = find_mark(scene, name).ok_or_else(|| {
            anyhow!("no mark for `{}` in year {}", name, scene.selected_year())
        })?;
        draw_detail_panel(&root, mark, cfg.width, cfg.height, &cfg.locale)?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Bottom and left axes through a Plotters mesh. The label areas and margins
/// are the canvas margin, so the plot area is the rectangle the projections
/// map onto. The y domain `[max, ceiling]` runs downward in pixels, which is a
/// regular upward axis over `ceiling..max`.
fn draw_axes<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    let m = scene.config().margin;
    let proj = scene.projections();
    let (x_lo, x_hi) = proj.x.domain;
    let (y_top, y_bottom) = proj.y.domain;

    let mut chart = ChartBuilder::on(root)
        .margin_top(m)
        .margin_right(m)
        .set_label_area_size(LabelAreaPosition::Left, m)
        .set_label_area_size(LabelAreaPosition::Bottom, m)
        .build_cartesian_2d(x_lo..x_hi, y_bottom..y_top)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(AXIS_TICKS)
        .y_labels(AXIS_TICKS)
        .set_all_tick_mark_size(TICK_LEN)
        .axis_style(BLACK.stroke_width(1))
        .label_style((FontFamily::SansSerif, TICK_FONT_PX as f64).into_font())
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_label<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, label: &TextLabel) -> Result<()> {
    let mut font = (FontFamily::SansSerif, label.font_px()).into_font();
    if label.vertical {
        font = font.transform(FontTransform::Rotate270);
    }
    let style = TextStyle::from(font)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Bottom));
    root.draw(&Text::new(
        label.text.clone(),
        (label.x.round() as i32, label.y.round() as i32),
        style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// The detail panel for `mark`, placed above-right of it and kept on the canvas.
fn draw_detail_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    mark: &Mark,
    width: u32,
    height: u32,
    locale: &str,
) -> Result<()> {
    let anchor = (
        (mark.cx + mark.r).round() as i32 + 6,
        mark.cy.round() as i32 - 28,
    );
    let panel = PanelLayout::fit(
        &detail_lines(&mark.record, locale),
        PANEL_FONT_PX,
        PANEL_LINE_PX,
        PANEL_MAX_W_PX,
        anchor,
        (width, height),
    );
    let (x0, y0, pad) = (panel.x, panel.y, panel.padding);

    root.draw(&Rectangle::new(
        [(x0, y0), (x0 + panel.width, y0 + panel.height)],
        PANEL_COLOR.mix(0.9).filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let style = TextStyle::from((FontFamily::SansSerif, PANEL_FONT_PX as f64).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Top));
    for (i, line) in panel.lines.into_iter().enumerate() {
        root.draw(&Text::new(
            line,
            (x0 + pad, y0 + pad + i as i32 * PANEL_LINE_PX),
            style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
