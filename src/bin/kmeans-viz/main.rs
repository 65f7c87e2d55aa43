mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kmeans_viz::{EmptyClusterPolicy, IterationMode, Palette, Session, SessionConfig, Settings};
use std::path::PathBuf;
use terminal::TerminalRenderer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// One assign/update step per frame
    Step,
    /// Whole convergence run within a single frame
    Run,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Centroids without samples stay where they are
    Keep,
    /// Centroids without samples become NaN
    Propagate,
}

/// Terminal visualization of k-means clustering.
#[derive(Parser, Debug)]
#[command(name = "kmeans-viz")]
#[command(about = "Watch k-means clustering converge, paced frame by frame")]
struct Args {
    /// TOML file with session settings. Command line options take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of clusters (k).
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Seed for sample generation and centroid placement.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    mode: Option<Mode>,

    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Number of frames to simulate.
    #[arg(short, long, default_value = "300")]
    frames: usize,

    /// Simulated frames per second.
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Sleep for each frame's duration instead of running as fast as possible.
    #[arg(long)]
    realtime: bool,

    /// Grid width in terminal columns.
    #[arg(long, default_value = "80")]
    cols: usize,

    /// Grid height in terminal rows.
    #[arg(long, default_value = "30")]
    rows: usize,
}

fn settings(args: &Args) -> Result<Settings<f64>> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(k) = args.clusters { settings.num_clusters = k; }
    if let Some(seed) = args.seed { settings.seed = Some(seed); }
    if let Some(mode) = args.mode {
        settings.iteration_mode = match mode {
            Mode::Step => IterationMode::StepPerTick,
            Mode::Run => IterationMode::RunToConvergence,
        };
    }
    if let Some(policy) = args.policy {
        settings.empty_cluster_policy = match policy {
            Policy::Keep => EmptyClusterPolicy::KeepPosition,
            Policy::Propagate => EmptyClusterPolicy::Propagate,
        };
    }
    Ok(settings)
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    let settings = settings(&args)?;
    let region = (settings.window_width, settings.window_height);

    let mut session = Session::new(SessionConfig::build().settings(settings).build())
        .context("creating clustering session")?;
    session.seed_reference_clusters().context("generating samples")?;

    let mut renderer = TerminalRenderer::new(std::io::stdout().lock(), region, (args.cols, args.rows),
        args.fps, args.realtime, args.frames);
    let frames = kmeans_viz::run(&mut session, &mut renderer, &Palette::default())?;

    info!(frames, presented = renderer.presented(), iterations = session.iterations(), "done");
    Ok(())
}
