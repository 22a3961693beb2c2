use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rectbin_core::config::{
    Algorithm, AtlasConfig, FreeRectChoiceHeuristic, GuillotineSplitHeuristic,
    LevelChoiceHeuristic, MaxRectsHeuristic, SortOrder,
};
use rectbin_core::export::{to_json, to_json_hash};
use rectbin_core::layout::{Layout, pack_auto, pack_layout};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "rectbin",
    about = "Pack rectangle sizes into fixed-size bins",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a JSON/YAML list of `{ key, w, h }` items and export the layout as JSON
    Pack(PackArgs),
    /// Pack random sizes with every algorithm preset; prints time + occupancy
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file (.json, .yaml or .yml) holding a list of `{ key, w, h }`
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file; prints to stdout when omitted
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Config file (YAML or JSON `AtlasConfig`); flags below override it
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Metadata format: json (alias json-array) | json-hash
    #[arg(long, default_value = "json", value_parser = ["json", "json-array", "json-hash"], help_heading = "Input/Output")]
    format: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Input/Output")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after config file and flags) and exit
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    print_config: bool,

    // Layout
    /// Page width
    #[arg(long, help_heading = "Layout")]
    width: Option<u32>,
    /// Page height
    #[arg(long, help_heading = "Layout")]
    height: Option<u32>,
    /// Padding reserved to the right of and below each item
    #[arg(long, help_heading = "Layout")]
    padding: Option<u32>,
    /// Maximum number of pages
    #[arg(long, help_heading = "Layout")]
    max_pages: Option<usize>,
    /// Sort order: area_desc|max_side_desc|height_desc|width_desc|key_asc|none
    #[arg(long, help_heading = "Layout")]
    sort_order: Option<String>,

    // Algorithms
    /// Algorithm: skyline[:bl|mw] | maxrects[:baf|bssf|blsf|bl|cp] | guillotine[:choice[:split]] | auto
    #[arg(long, help_heading = "Algorithms")]
    algorithm: Option<String>,
    /// Skyline: disable the waste map
    #[arg(long, default_value_t = false, help_heading = "Algorithms")]
    no_waste_map: bool,
    /// Guillotine: skip the free-list merge after each placement
    #[arg(long, default_value_t = false, help_heading = "Algorithms")]
    no_merge: bool,
    /// Try the whole algorithm portfolio and keep the best layout
    #[arg(long, default_value_t = false, help_heading = "Auto/Portfolio")]
    auto: bool,
    /// Time budget for auto mode (ms)
    #[arg(long, help_heading = "Auto/Portfolio")]
    time_budget: Option<u64>,
    /// Evaluate auto candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Auto/Portfolio")]
    parallel: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of random items
    #[arg(long, default_value_t = 500)]
    count: usize,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Page width
    #[arg(long, default_value_t = 1024)]
    width: u32,
    /// Page height
    #[arg(long, default_value_t = 1024)]
    height: u32,
    /// Smallest item side
    #[arg(long, default_value_t = 4)]
    min_side: u32,
    /// Largest item side
    #[arg(long, default_value_t = 96)]
    max_side: u32,
}

/// One input item as read from the pack input file.
#[derive(Debug, Deserialize)]
struct InputItem {
    key: String,
    w: u32,
    h: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => read_structured::<AtlasConfig>(path)?,
        None => AtlasConfig::default(),
    };
    let auto = apply_overrides(&mut cfg, cli)?;
    cfg.validate().context("invalid configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let inputs: Vec<InputItem> = read_structured(&cli.input)?;
    info!(count = inputs.len(), "loaded input items");
    let items: Vec<(String, u32, u32)> = inputs.into_iter().map(|i| (i.key, i.w, i.h)).collect();

    let start = Instant::now();
    let layout = if auto {
        pack_auto(items, &cfg)
    } else {
        pack_layout(items, &cfg)
    }
    .context("packing failed")?;
    let dur = start.elapsed();

    let stats = layout.stats();
    info!(
        algorithm = %layout.algorithm.label(),
        time = %fmt_dur(dur),
        "{}",
        stats.summary()
    );

    let doc = match cli.format.as_str() {
        "json-hash" => to_json_hash(&layout),
        _ => to_json(&layout),
    };
    let text = serde_json::to_string_pretty(&doc)?;
    match &cli.out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote layout");
        }
        None => println!("{}", text),
    }

    if let Some(stats_path) = &cli.export_stats {
        let s = serde_json::to_string_pretty(&stats)?;
        fs::write(stats_path, s).with_context(|| format!("write {}", stats_path.display()))?;
    }
    Ok(())
}

/// Applies command-line flags on top of `cfg`. Returns true if auto mode was requested.
fn apply_overrides(cfg: &mut AtlasConfig, cli: &PackArgs) -> anyhow::Result<bool> {
    if let Some(v) = cli.width {
        cfg.page_width = v;
    }
    if let Some(v) = cli.height {
        cfg.page_height = v;
    }
    if let Some(v) = cli.padding {
        cfg.padding = v;
    }
    if cli.max_pages.is_some() {
        cfg.max_pages = cli.max_pages;
    }
    if let Some(v) = &cli.sort_order {
        cfg.sort_order = v
            .parse::<SortOrder>()
            .map_err(|_| anyhow!("unknown sort order: {}", v))?;
    }
    if cli.time_budget.is_some() {
        cfg.time_budget_ms = cli.time_budget;
    }
    if cli.parallel {
        cfg.parallel = true;
    }

    let mut auto = cli.auto;
    match cli.algorithm.as_deref() {
        Some(a) if a.eq_ignore_ascii_case("auto") => auto = true,
        Some(a) => {
            cfg.algorithm = a
                .parse::<Algorithm>()
                .map_err(|_| anyhow!("unknown algorithm: {}", a))?;
        }
        None => {}
    }
    match &mut cfg.algorithm {
        Algorithm::Skyline { use_waste_map, .. } if cli.no_waste_map => *use_waste_map = false,
        Algorithm::Guillotine { merge, .. } if cli.no_merge => *merge = false,
        _ => {}
    }
    if cfg.parallel && !cfg!(feature = "parallel") {
        warn!("--parallel has no effect: built without the `parallel` feature");
    }
    Ok(auto)
}

/// Reads a JSON or YAML document, picked by file extension (YAML when unknown).
fn read_structured<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))
    }
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    if b.min_side == 0 || b.min_side > b.max_side {
        anyhow::bail!("invalid side range {}..={}", b.min_side, b.max_side);
    }
    let mut rng = StdRng::seed_from_u64(b.seed);
    let items: Vec<(String, u32, u32)> = (0..b.count)
        .map(|i| {
            let w = rng.gen_range(b.min_side..=b.max_side);
            let h = rng.gen_range(b.min_side..=b.max_side);
            (format!("item_{}", i), w, h)
        })
        .collect();
    debug!(count = items.len(), seed = b.seed, "generated bench items");

    for algorithm in bench_presets() {
        let cfg = AtlasConfig::builder()
            .with_page_size(b.width, b.height)
            .algorithm(algorithm)
            .build();
        let start = Instant::now();
        let layout: Layout<String> = pack_layout(items.clone(), &cfg)
            .with_context(|| format!("pack with {}", algorithm.label()))?;
        let dur = start.elapsed();
        let stats = layout.stats();
        println!(
            "{:<48} pages={} occupancy={:.2}% time={}",
            algorithm.label(),
            stats.num_pages,
            stats.occupancy * 100.0,
            fmt_dur(dur)
        );
    }
    Ok(())
}

fn bench_presets() -> Vec<Algorithm> {
    let mut presets = vec![
        Algorithm::skyline(LevelChoiceHeuristic::BottomLeft, false),
        Algorithm::skyline(LevelChoiceHeuristic::BottomLeft, true),
        Algorithm::skyline(LevelChoiceHeuristic::MinWasteFit, false),
        Algorithm::skyline(LevelChoiceHeuristic::MinWasteFit, true),
    ];
    for h in [
        MaxRectsHeuristic::BestShortSideFit,
        MaxRectsHeuristic::BestLongSideFit,
        MaxRectsHeuristic::BestAreaFit,
        MaxRectsHeuristic::BottomLeft,
        MaxRectsHeuristic::ContactPoint,
    ] {
        presets.push(Algorithm::maxrects(h));
    }
    for (choice, split) in [
        (
            FreeRectChoiceHeuristic::BestAreaFit,
            GuillotineSplitHeuristic::ShorterLeftoverAxis,
        ),
        (
            FreeRectChoiceHeuristic::BestShortSideFit,
            GuillotineSplitHeuristic::MinimizeArea,
        ),
        (
            FreeRectChoiceHeuristic::BestLongSideFit,
            GuillotineSplitHeuristic::MaximizeArea,
        ),
    ] {
        presets.push(Algorithm::Guillotine {
            merge: true,
            choice,
            split,
        });
    }
    presets
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    // RUST_LOG wins over the flags when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
