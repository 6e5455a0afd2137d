use std::path::Path;
use tempfile::tempdir;
use wbi_scatter::storage::load_reader;
use wbi_scatter::viz::{self, ImageFormat};
use wbi_scatter::{PlotConfig, Scene};

fn sample_scene() -> Scene {
    let csv = "time,fertility_rate,life_expectancy,pop_mlns,location\n\
               1960,6.0,50.0,10,Germany\n\
               1960,2.0,75.0,100,Japan\n\
               1960,,60.0,5,Nowhere\n\
               1961,5.0,55.0,20,Germany\n";
    let ds = load_reader(csv.as_bytes(), Path::new("mem.csv")).unwrap();
    Scene::new(ds, PlotConfig::default()).unwrap()
}

#[test]
fn svg_has_one_circle_per_drawable_mark() {
    let scene = sample_scene();
    let svg = viz::render_svg(&scene, None).unwrap();
    let drawable = scene.marks().iter().filter(|m| m.is_drawable()).count();
    assert_eq!(drawable, 2);
    assert_eq!(svg.matches("<circle").count(), drawable);
    assert!(svg.contains("Life Expectancy vs Fertility (1960)"));
    assert!(svg.contains("Fertility"));
}

#[test]
fn highlight_draws_detail_panel_text() {
    let scene = sample_scene();
    let svg = viz::render_svg(&scene, Some("japan")).unwrap();
    assert!(svg.contains("Country: Japan"), "panel text missing");
    assert!(svg.contains("Population: 100,000,000"));
}

#[test]
fn unknown_highlight_is_an_error() {
    let scene = sample_scene();
    assert!(viz::render_svg(&scene, Some("Atlantis")).is_err());
}

#[test]
fn png_and_svg_files_are_written() {
    let scene = sample_scene();
    let dir = tempdir().unwrap();
    for name in ["chart.svg", "chart.png"] {
        let path = dir.path().join(name);
        viz::plot_scene(&scene, &path, None).unwrap();
        let meta = std::fs::metadata(&path).expect("file created");
        assert!(meta.len() > 0, "{name} has content");
    }
}

#[test]
fn all_years_writes_a_frame_per_year() {
    let mut scene = sample_scene();
    let dir = tempdir().unwrap();
    // Japan is absent in 1961; that frame is drawn without a panel.
    let written =
        viz::plot_all_years(&mut scene, dir.path(), ImageFormat::Svg, Some("Japan")).unwrap();
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("scatter_1960.svg").is_file());
    assert!(dir.path().join("scatter_1961.svg").is_file());
    assert_eq!(scene.selected_year(), 1961);
}

#[test]
fn axes_are_labelled_with_ticks() {
    let scene = sample_scene();
    let svg = viz::render_svg(&scene, None).unwrap();
    // Title and two axis labels, plus tick labels along both axes.
    let texts = svg.matches("<text").count();
    assert!(texts > 3 + 8, "only {texts} text elements");
    assert!(svg.contains("<line") || svg.contains("<polyline"), "axis lines missing");
}
