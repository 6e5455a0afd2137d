use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use wbi_scatter::marks::Mark;
use wbi_scatter::viz::{self, ImageFormat};
use wbi_scatter::{PlotConfig, Scene, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "wbi-scatter",
    version,
    about = "Plot fertility rate vs. life expectancy by year (point size = population)"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one year (or every year) to SVG/PNG.
    Render(RenderArgs),
    /// List the selectable years, one per line.
    Years(DataArgs),
    /// Print per-year summary statistics.
    Stats(DataArgs),
    /// Export one year's rows (CSV) or projected marks (JSON).
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Dataset CSV (default: config `data_path`, i.e. ./data/dataEveryYear.csv).
    #[arg(long)]
    data: Option<PathBuf>,
    /// JSON config file (default: per-user config if present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Year to render (default: config `initial_year`, else the first year).
    #[arg(short, long, conflicts_with = "all_years")]
    year: Option<String>,
    /// Render every year into the --out directory.
    #[arg(long, default_value_t = false)]
    all_years: bool,
    /// Output file (.svg or .png), or a directory with --all-years.
    #[arg(long)]
    out: PathBuf,
    /// Image format for --all-years frames.
    #[arg(long, value_enum, default_value_t = OutFormat::Svg)]
    format: OutFormat,
    /// Draw the detail panel for this country.
    #[arg(long)]
    highlight: Option<String>,
    /// Locale for thousands separators (en, de, fr, ...).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    data: DataArgs,
    #[arg(short, long)]
    year: String,
    /// Output path; `.json` writes projected marks, anything else CSV rows.
    #[arg(long)]
    out: PathBuf,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Years(args) => cmd_years(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_config(args: &DataArgs) -> Result<PlotConfig> {
    let mut cfg = match &args.config {
        Some(p) => PlotConfig::load(p).with_context(|| format!("reading config {}", p.display()))?,
        None => PlotConfig::discover()?,
    };
    if let Some(data) = &args.data {
        cfg.data_path = data.clone();
    }
    Ok(cfg)
}

fn load_scene(args: &DataArgs) -> Result<Scene> {
    let cfg = load_config(args)?;
    Ok(Scene::load(cfg)?)
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut cfg = load_config(&args.data)?;
    if let Some(locale) = &args.locale {
        cfg.locale = locale.clone();
    }
    let mut scene = Scene::load(cfg)?;
    let highlight = args.highlight.as_deref();

    if args.all_years {
        let format = match args.format {
            OutFormat::Svg => ImageFormat::Svg,
            OutFormat::Png => ImageFormat::Png,
        };
        let written = viz::plot_all_years(&mut scene, &args.out, format, highlight)?;
        eprintln!("Wrote {} charts to {}", written.len(), args.out.display());
        return Ok(());
    }

    if let Some(raw) = &args.year {
        scene.select_raw(raw)?;
    }
    viz::plot_scene(&scene, &args.out, highlight)?;
    eprintln!(
        "Wrote {} ({} points) to {}",
        scene.title().text,
        scene.marks().len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_years(args: DataArgs) -> Result<()> {
    let scene = load_scene(&args)?;
    for opt in scene.selector().options() {
        println!("{}", opt.label);
    }
    Ok(())
}

fn cmd_stats(args: DataArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    let ds = storage::load_csv(&cfg.data_path)?;
    for s in stats::year_summaries(&ds) {
        println!(
            "{}  count={} missing={}  fertility={} life_expectancy={} pop_mlns={}",
            s.year,
            s.count,
            s.missing,
            fmt_opt(s.mean_fertility),
            fmt_opt(s.mean_life_expectancy),
            fmt_opt(Some(s.total_pop_mlns))
        );
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let mut scene = load_scene(&args.data)?;
    scene.select_raw(&args.year)?;
    if is_json(&args.out) {
        let marks: Vec<Mark> = scene.marks().iter().cloned().collect();
        storage::save_json(&marks, &args.out)?;
    } else {
        storage::save_csv(&scene.view().records, &args.out)?;
    }
    eprintln!(
        "Saved {} rows for {} to {}",
        scene.view().len(),
        scene.selected_year(),
        args.out.display()
    );
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
