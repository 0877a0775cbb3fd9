mod vessels;

use anyhow::{Context, Result, bail};
use clap::Parser;
use diffusion_core::{
    CellKind, ComparisonHarness, HarnessConfig, Lattice, Nondimensional, SourceMode, StepReport,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare explicit and ADI diffusion at a probe cell")]
struct Args {
    /// Grid width (cells)
    #[arg(long, default_value_t = 5)]
    width: usize,

    /// Grid height (cells)
    #[arg(long, default_value_t = 5)]
    height: usize,

    /// Physical length of the horizontal domain; spacing = domain / width
    #[arg(long, default_value_t = 1.0)]
    domain: f64,

    /// Diffusivity (length^2 per time unit)
    #[arg(long, default_value_t = 1e-2)]
    diffusivity: f64,

    /// Length of one timestep
    #[arg(long, default_value_t = 0.1)]
    timestep: f64,

    /// Use this dimensionless coefficient directly instead of deriving it
    #[arg(long)]
    coefficient: Option<f64>,

    /// Number of timesteps
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Concentration written at vessel sites
    #[arg(long, default_value_t = 1.0)]
    concentration: f64,

    /// Linear index of a vessel cell (repeatable)
    #[arg(long = "vessel", default_values_t = vec![12])]
    vessels: Vec<usize>,

    /// Extra vessels scattered at random over free cells
    #[arg(long, default_value_t = 0)]
    random_vessels: usize,

    /// RNG seed for random vessel placement
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Linear index of the probe cell
    #[arg(long, default_value_t = 1)]
    probe: usize,

    /// Re-assert vessel concentration after every step
    #[arg(long)]
    clamp_sources: bool,

    /// Output directory for steps.jsonl and summary.json
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct StepRow {
    step: usize,
    explicit: f64,
    adi: f64,
    error: f64,
    max_abs_difference: f64,
}

impl From<&StepReport> for StepRow {
    fn from(r: &StepReport) -> Self {
        StepRow {
            step: r.step,
            explicit: r.explicit,
            adi: r.adi,
            error: r.error,
            max_abs_difference: r.max_abs_difference,
        }
    }
}

#[derive(Serialize)]
struct SummaryRow {
    width: usize,
    height: usize,
    coefficient: f64,
    probe: usize,
    vessels: Vec<usize>,
    source_mode: &'static str,
    steps_completed: usize,
    final_error: f64,
    peak_abs_error: f64,
    explicit_mass: f64,
    adi_mass: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    if args.width == 0 || args.height == 0 {
        bail!("width and height must be >= 1");
    }

    let coefficient = match args.coefficient {
        Some(d) => d,
        None => Nondimensional {
            diffusivity: args.diffusivity,
            timestep: args.timestep,
            spacing: args.domain / args.width as f64,
        }
        .coefficient(),
    };
    info!(coefficient, "non-dimensional diffusion coefficient");

    // Vessel layout
    let mut lattice = Lattice::new(args.width, args.height)?;
    vessels::place_listed(&mut lattice, &args.vessels).context("placing --vessel sites")?;
    if args.random_vessels > 0 {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        let placed = vessels::place_random(&mut rng, &mut lattice, args.random_vessels)?;
        if placed < args.random_vessels {
            warn!(requested = args.random_vessels, placed, "grid ran out of free cells");
        }
    }
    let sites = lattice.sites(CellKind::Vessel);

    let source_mode = if args.clamp_sources {
        SourceMode::Clamped
    } else {
        SourceMode::Initial
    };

    let mut harness = ComparisonHarness::new(HarnessConfig {
        width: args.width,
        height: args.height,
        coefficient,
        steps: args.steps,
        concentration: args.concentration,
        probe: args.probe,
        source_mode,
    })
    .context("building comparison harness")?;
    harness.initialize(&sites)?;

    let probe_xy = harness.field_a().coords_of(args.probe)?;

    let mut steps_writer = match &args.out {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            Some(BufWriter::new(File::create(dir.join("steps.jsonl"))?))
        }
        None => None,
    };

    // Main loop
    let mut outcome = Ok(());
    for _ in 0..args.steps {
        let report = match harness.step() {
            Ok(r) => r,
            Err(e) => {
                outcome = Err(e);
                break;
            }
        };
        println!(
            "Error between models at site [{}, {}]: {}",
            probe_xy.0, probe_xy.1, report.error
        );
        if let Some(w) = steps_writer.as_mut() {
            serde_json::to_writer(&mut *w, &StepRow::from(&report))?;
            w.write_all(b"\n")?;
        }
    }

    if let Some(mut w) = steps_writer {
        w.flush()?;
    }

    let summary = harness.summary();
    if let Some(dir) = &args.out {
        let row = SummaryRow {
            width: args.width,
            height: args.height,
            coefficient,
            probe: args.probe,
            vessels: sites.iter().map(|s| s.y * args.width + s.x).collect(),
            source_mode: match source_mode {
                SourceMode::Initial => "initial",
                SourceMode::Clamped => "clamped",
            },
            steps_completed: summary.steps_completed,
            final_error: summary.final_error,
            peak_abs_error: summary.peak_abs_error,
            explicit_mass: summary.explicit_mass,
            adi_mass: summary.adi_mass,
        };
        let file = File::create(dir.join("summary.json"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &row)?;
        println!("Wrote run to: {}", dir.display());
    }

    outcome.with_context(|| format!("run halted after {} steps", summary.steps_completed))?;

    println!("Simulation finished!");
    println!(
        "Steps: {} (peak |error|={:.3e}, final error={:.3e})",
        summary.steps_completed, summary.peak_abs_error, summary.final_error
    );

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
