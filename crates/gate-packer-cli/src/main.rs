use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use gate_packer_core::export::{stats_to_json, to_json};
use gate_packer_core::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "gate-packer",
    about = "Pack rectangular gates into a compact layout",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a gate list and write the layout
    Pack(PackArgs),
    /// Write a random gate list
    Generate(GenerateArgs),
    /// Time packing runs over a range of gate counts
    Bench(BenchArgs),
    /// Draw a layout as PNG
    Render(RenderArgs),
    /// Check a layout against its gate list and print stats
    Verify(VerifyArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Gate list (`name width height` per line)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Layout output file (stdout when omitted)
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,
    /// YAML config file path (overrides strategy-related options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Strategy
    /// Ordering: area-perimeter | perimeter | max-side | auto (or 1 | 2 | 3)
    #[arg(long, default_value = "area-perimeter", help_heading = "Strategy")]
    strategy: String,
    /// Skip candidate points that were already offered during the run
    #[arg(long, default_value_t = false, help_heading = "Strategy")]
    dedup_candidates: bool,
    /// Evaluate auto candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Strategy")]
    parallel: bool,

    // Export
    /// Also write the layout as JSON to this file
    #[arg(long, help_heading = "Export")]
    json: Option<PathBuf>,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Render the layout as PNG to this file
    #[arg(long, help_heading = "Export")]
    render: Option<PathBuf>,
    /// Longest side of the rendered image in pixels
    #[arg(long, default_value_t = 1024, help_heading = "Export")]
    render_size: u32,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct GenerateArgs {
    /// Output file (`-` for stdout)
    out: PathBuf,
    /// Number of gates
    #[arg(long, default_value_t = 100)]
    count: usize,
    /// Sides are drawn uniformly from 1..=max_side
    #[arg(long, default_value_t = 100)]
    max_side: u32,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Smallest gate count
    #[arg(long, default_value_t = 100)]
    from: usize,
    /// Largest gate count (inclusive)
    #[arg(long, default_value_t = 1000)]
    to: usize,
    #[arg(long, default_value_t = 100)]
    step: usize,
    /// Sides are drawn uniformly from 1..=max_side
    #[arg(long, default_value_t = 100)]
    max_side: u32,
    /// Runs per gate count; time and efficiency are averaged
    #[arg(long, default_value_t = 1)]
    trials: usize,
    /// Ordering: area-perimeter | perimeter | max-side | auto
    #[arg(long, default_value = "area-perimeter")]
    strategy: String,
    #[arg(long)]
    seed: Option<u64>,
    /// Write the result rows as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct RenderArgs {
    /// Gate list the layout was packed from
    input: PathBuf,
    /// Layout file written by `pack`
    layout: PathBuf,
    /// PNG output file
    #[arg(short, long, default_value = "layout.png")]
    output: PathBuf,
    /// Longest side of the image in pixels
    #[arg(long, default_value_t = 1024)]
    size: u32,
}

#[derive(Parser, Debug, Clone)]
struct VerifyArgs {
    /// Gate list the layout was packed from
    input: PathBuf,
    /// Layout file written by `pack`
    layout: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Generate(args) => run_generate(args),
        Commands::Bench(args) => run_bench(args, cli.progress && !cli.quiet),
        Commands::Render(args) => run_render(args),
        Commands::Verify(args) => run_verify(args),
    }
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let mut cfg = PackerConfig::builder()
        .strategy(parse_strategy(&cli.strategy)?)
        .dedup_candidates(cli.dedup_candidates)
        .parallel(cli.parallel)
        .build();

    if let Some(cfg_path) = &cli.config {
        let text = fs::read_to_string(cfg_path)
            .with_context(|| format!("read config {}", cfg_path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parse config {}", cfg_path.display()))?;
        cfg = y.into_packer_config(cfg)?;
    }

    if cli.print_config {
        let s = if cli.print_config_format.eq_ignore_ascii_case("yaml") {
            serde_yaml::to_string(&cfg)?
        } else {
            serde_json::to_string_pretty(&cfg)?
        };
        println!("{}", s);
        return Ok(());
    }

    let gates = load_gates(&cli.input)?;
    info!(count = gates.len(), "loaded gates");

    let start = Instant::now();
    let layout = gate_packer_core::pack_gates(gates, cfg)?;
    let elapsed = start.elapsed();
    let stats = layout.stats();
    info!(
        strategy = layout.strategy.map(|s| s.as_str()),
        width = stats.bounding_width,
        height = stats.bounding_height,
        efficiency = %format!("{:.2}%", stats.efficiency * 100.0),
        elapsed = %fmt_dur(elapsed),
        "packed"
    );

    if cli.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    let text = write_layout(&layout);
    match &cli.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
            info!(?path, "layout written");
        }
        None => print!("{}", text),
    }
    if let Some(path) = &cli.json {
        let s = serde_json::to_string_pretty(&to_json(&layout))?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "json written");
    }
    if let Some(path) = &cli.export_stats {
        let s = serde_json::to_string_pretty(&stats_to_json(&layout))?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "stats exported");
    }
    if let Some(path) = &cli.render {
        save_render(&layout, path, cli.render_size)?;
    }
    Ok(())
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    if args.max_side == 0 {
        anyhow::bail!("--max-side must be at least 1");
    }
    let mut rng = make_rng(args.seed);
    let gates = random_gates(&mut rng, args.count, args.max_side);
    let text = write_gates(&gates);
    if args.out.as_os_str() == "-" {
        std::io::stdout()
            .write_all(text.as_bytes())
            .context("write stdout")?;
    } else {
        fs::write(&args.out, text).with_context(|| format!("write {}", args.out.display()))?;
        info!(path = ?args.out, count = gates.len(), "gates written");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct BenchRow {
    gates: usize,
    efficiency: f64,
    avg_time_ms: f64,
    n2_ref_ms: f64,
    n3_ref_ms: f64,
}

fn run_bench(b: &BenchArgs, show_progress: bool) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    if b.step == 0 || b.trials == 0 || b.max_side == 0 {
        anyhow::bail!("--step, --trials and --max-side must be at least 1");
    }
    if b.from == 0 || b.from > b.to {
        anyhow::bail!("invalid range {}..={}", b.from, b.to);
    }
    let strategy = parse_strategy(&b.strategy)?;
    let cfg = PackerConfig::builder().strategy(strategy).build();
    let sizes: Vec<usize> = (b.from..=b.to).step_by(b.step).collect();
    let mut rng = make_rng(b.seed);

    let bar = if show_progress {
        let bar = ProgressBar::new((sizes.len() * b.trials) as u64);
        bar.set_style(ProgressStyle::with_template(
            "{spinner:.green} packing {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(bar)
    } else {
        None
    };

    let mut measured: Vec<(usize, f64, Duration)> = Vec::with_capacity(sizes.len());
    for &n in &sizes {
        if let Some(bar) = &bar {
            bar.set_message(format!("n={}", n));
        }
        let mut total_eff = 0.0;
        let mut total_time = Duration::ZERO;
        for _ in 0..b.trials {
            let gates = random_gates(&mut rng, n, b.max_side);
            let start = Instant::now();
            let layout = gate_packer_core::pack_gates(gates, cfg.clone())?;
            total_time += start.elapsed();
            total_eff += layout.efficiency();
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        let avg = total_time / b.trials as u32;
        debug!(gates = n, avg = %fmt_dur(avg), "bench step");
        measured.push((n, total_eff / b.trials as f64, avg));
    }
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let rows = reference_curves(&measured);
    println!(
        "{:>8} {:>11} {:>12} {:>12} {:>12}",
        "gates", "efficiency", "avg time", "n^2 ref", "n^3 ref"
    );
    for r in &rows {
        println!(
            "{:>8} {:>10.2}% {:>10.3}ms {:>10.3}ms {:>10.3}ms",
            r.gates,
            r.efficiency * 100.0,
            r.avg_time_ms,
            r.n2_ref_ms,
            r.n3_ref_ms
        );
    }
    if let Some(path) = &b.json {
        let s = serde_json::to_string_pretty(&rows)?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        info!(?path, "bench results written");
    }
    Ok(())
}

/// Scales `n^2` and `n^3` so each curve meets the largest measured time at the largest `n`.
fn reference_curves(measured: &[(usize, f64, Duration)]) -> Vec<BenchRow> {
    let max_n = measured.iter().map(|m| m.0).max().unwrap_or(1).max(1) as f64;
    let max_ms = measured
        .iter()
        .map(|m| m.2.as_secs_f64() * 1000.0)
        .fold(0.0, f64::max);
    measured
        .iter()
        .map(|&(n, efficiency, avg)| {
            let ratio = n as f64 / max_n;
            BenchRow {
                gates: n,
                efficiency,
                avg_time_ms: avg.as_secs_f64() * 1000.0,
                n2_ref_ms: max_ms * ratio.powi(2),
                n3_ref_ms: max_ms * ratio.powi(3),
            }
        })
        .collect()
}

fn run_render(args: &RenderArgs) -> anyhow::Result<()> {
    let gates = load_gates(&args.input)?;
    let layout = load_layout(&args.layout, &gates)?;
    save_render(&layout, &args.output, args.size)
}

fn run_verify(args: &VerifyArgs) -> anyhow::Result<()> {
    let gates = load_gates(&args.input)?;
    let layout = load_layout(&args.layout, &gates)?;
    layout
        .verify(&gates)
        .with_context(|| format!("verify {}", args.layout.display()))?;
    info!(gates = gates.len(), "layout is valid");
    println!("{}", layout.stats().summary());
    Ok(())
}

fn load_gates(path: &Path) -> anyhow::Result<Vec<Gate>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_gates(&text).with_context(|| format!("parse {}", path.display()))
}

fn load_layout(path: &Path, gates: &[Gate]) -> anyhow::Result<Layout> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_layout(&text, gates).with_context(|| format!("parse {}", path.display()))
}

fn save_render(layout: &Layout, path: &Path, size: u32) -> anyhow::Result<()> {
    let img = render::render_layout(layout, size);
    img.save(path)
        .with_context(|| format!("write {}", path.display()))?;
    info!(?path, width = img.width(), height = img.height(), "render written");
    Ok(())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn random_gates(rng: &mut StdRng, count: usize, max_side: u32) -> Vec<Gate> {
    (1..=count)
        .map(|i| {
            Gate::new(
                format!("g{}", i),
                rng.gen_range(1..=max_side),
                rng.gen_range(1..=max_side),
            )
        })
        .collect()
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
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_strategy(s: &str) -> anyhow::Result<Strategy> {
    match s.parse::<Strategy>() {
        Ok(v) => Ok(v),
        Err(()) => anyhow::bail!("unknown strategy: {}", s),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct YamlConfig {
    strategy: Option<String>,
    dedup_candidates: Option<bool>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.strategy {
            cfg.strategy = parse_strategy(&v)?;
        }
        if let Some(v) = self.dedup_candidates {
            cfg.dedup_candidates = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
