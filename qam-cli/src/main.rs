//! QAM - Quantum Associative Memory
//! Command-line driver: stores patterns, runs retrieval and extraction, prints the states

mod config;
mod filter;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::*;
use qam_memory::{AssociativeMemory, ControlQubit, expected_control_probability, position_angle};
use qam_state::StateReport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::QamConfig;
use filter::{filter_high_degree_terms, tally};

#[derive(Parser)]
#[command(name = "qam")]
#[command(author = "Silvano Neto <dev@silvanoneto.com>")]
#[command(version = "2026.10.19")]
#[command(about = "QAM - quantum associative memory simulator", long_about = None)]
struct Cli {
    /// Configuration file (qam.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for every measurement random source
    #[arg(long, global = true, env = "QAM_SEED")]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides shared by the commands that build a memory
#[derive(Args)]
struct MemoryArgs {
    /// Patterns to store, in order (e.g. 1,4)
    #[arg(short, long, value_delimiter = ',')]
    patterns: Vec<u64>,

    /// Width of the pattern and memory registers
    #[arg(short, long)]
    width: Option<usize>,

    /// Use a dedicated control qubit instead of u[0]
    #[arg(long)]
    dedicated_control: bool,

    /// Leading pattern/memory qubits left out of retrieval
    #[arg(long)]
    offset: Option<usize>,

    /// Number of sampled runs
    #[arg(short, long)]
    shots: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store patterns, retrieve each query and print the resulting states
    Run {
        #[command(flatten)]
        memory: MemoryArgs,

        /// Queries to retrieve (e.g. 4,2)
        #[arg(short, long, value_delimiter = ',')]
        queries: Vec<u64>,
    },

    /// Bernstein-Vazirani style extraction over repeated runs
    Extract {
        #[command(flatten)]
        memory: MemoryArgs,

        /// Keep only measured strings with at most this Hamming weight
        #[arg(short = 'd', long)]
        max_degree: Option<u32>,
    },

    /// Print the storage angle for every position of a pattern list
    Angles {
        /// Pattern list length
        #[arg(value_name = "LEN")]
        len: usize,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qam=info,qam_memory=warn,qam_state=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { ref memory, ref queries } => {
            let mut config = resolve_config(&cli, memory)?;
            if !queries.is_empty() {
                config.driver.queries = queries.clone();
            }
            run_command(&config, cli.seed, cli.json)
        }
        Commands::Extract { ref memory, max_degree } => {
            let mut config = resolve_config(&cli, memory)?;
            if max_degree.is_some() {
                config.driver.max_degree = max_degree;
            }
            extract_command(&config, cli.seed, cli.json)
        }
        Commands::Angles { len } => angles_command(len, cli.json),
    }
}

/// Arquivo de configuração com as flags da linha de comando por cima
fn resolve_config(cli: &Cli, args: &MemoryArgs) -> Result<QamConfig> {
    let mut config = QamConfig::load(cli.config.as_deref())?;

    if !args.patterns.is_empty() {
        config.driver.patterns = args.patterns.clone();
    }
    if let Some(width) = args.width {
        config.memory.pattern_width = width;
    }
    if args.dedicated_control {
        config.memory.wiring.control = ControlQubit::Dedicated;
    }
    if let Some(offset) = args.offset {
        config.memory.wiring.register_offset = offset;
    }
    if let Some(shots) = args.shots {
        config.driver.shots = shots;
    }
    if cli.seed.is_some() {
        config.memory.quantum.seed = cli.seed;
    }

    Ok(config)
}

fn sampling_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn label_bits(label: u64, width: usize) -> String {
    (0..width)
        .map(|k| if (label >> k) & 1 == 1 { '1' } else { '0' })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Run
// ============================================================================

#[derive(Serialize)]
struct JointRow {
    control: bool,
    label: u64,
    probability: f64,
}

#[derive(Serialize)]
struct RunReport {
    query: u64,
    initial: StateReport,
    storage: StateReport,
    retrieval: StateReport,
    control_probability: f64,
    /// Forma fechada; só definida para fiação sem offset
    expected_probability: Option<f64>,
    joint: Vec<JointRow>,
    shots: usize,
    control_ones: usize,
}

fn run_command(config: &QamConfig, seed: Option<u64>, json: bool) -> Result<()> {
    tracing::info!(
        patterns = ?config.driver.patterns,
        queries = ?config.driver.queries,
        "run"
    );

    let mut rng = sampling_rng(seed);
    let reports = config
        .driver
        .queries
        .iter()
        .map(|&query| run_query(config, query, &mut rng))
        .collect::<Result<Vec<_>>>()?;

    if json {
        return print_json(&reports);
    }
    let width = config.memory.pattern_width - config.memory.wiring.register_offset.min(config.memory.pattern_width);
    for report in &reports {
        print_run(report, width);
    }
    Ok(())
}

fn run_query(config: &QamConfig, query: u64, rng: &mut StdRng) -> Result<RunReport> {
    let patterns = &config.driver.patterns;
    let mut mem = AssociativeMemory::new(config.memory.clone()).context("failed to build memory")?;

    let initial = mem.report();
    mem.store(patterns).context("storage failed")?;
    let storage = mem.report();

    mem.load_query(query)
        .with_context(|| format!("failed to load query {}", query))?;
    mem.retrieve().context("retrieval failed")?;
    let retrieval = mem.report();
    let control_probability = mem.control_probability()?;

    let joint = mem
        .joint_probabilities()?
        .into_iter()
        .enumerate()
        .map(|(k, probability)| JointRow {
            control: k & 1 == 1,
            label: (k >> 1) as u64,
            probability,
        })
        .collect();

    let expected_probability = (config.memory.wiring.register_offset == 0)
        .then(|| expected_control_probability(patterns, query, config.memory.pattern_width));

    let shots = config.driver.shots;
    let mut control_ones = 0;
    for _ in 0..shots {
        let mut sample = AssociativeMemory::with_rng(config.memory.clone(), &mut *rng)?;
        sample.store(patterns)?;
        if sample.recall(query)? {
            control_ones += 1;
        }
        sample.into_processor()?;
    }

    tracing::info!(query, control_probability, control_ones, shots, "query done");

    Ok(RunReport {
        query,
        initial,
        storage,
        retrieval,
        control_probability,
        expected_probability,
        joint,
        shots,
        control_ones,
    })
}

fn print_run(report: &RunReport, width: usize) {
    println!("\n{} {}", "Query".green().bold(), report.query.to_string().cyan());

    for (title, state) in [
        ("Initial State", &report.initial),
        ("Storage Results", &report.storage),
        ("Retrieval Results", &report.retrieval),
    ] {
        println!("\n{}\n", title.bold());
        print!("{}", state);
    }

    println!("\n{}\n", "Control and Label Qubits:".bold());
    for row in &report.joint {
        println!(
            "c={} m=|{}⟩: {:.4}",
            u8::from(row.control),
            label_bits(row.label, width),
            row.probability
        );
    }

    println!();
    println!("{} {:.4}", "P(c = 1):".bold(), report.control_probability);
    if let Some(expected) = report.expected_probability {
        println!("{} {:.4}", "expected:".bold(), expected);
    }
    if report.shots > 0 {
        println!(
            "{} {}/{} ({:.4})",
            "sampled:".bold(),
            report.control_ones,
            report.shots,
            report.control_ones as f64 / report.shots as f64
        );
    }
}

// ============================================================================
// Extract
// ============================================================================

#[derive(Serialize)]
struct ExtractRow {
    #[serde(flatten)]
    outcome: filter::OutcomeCount,
    frequency: f64,
    exact: f64,
}

#[derive(Serialize)]
struct ExtractReport {
    patterns: Vec<u64>,
    shots: usize,
    kept: usize,
    max_degree: Option<u32>,
    outcomes: Vec<ExtractRow>,
}

fn extract_command(config: &QamConfig, seed: Option<u64>, json: bool) -> Result<()> {
    let patterns = &config.driver.patterns;

    let mut exact_mem = AssociativeMemory::new(config.memory.clone()).context("failed to build memory")?;
    exact_mem.store(patterns).context("storage failed")?;
    let exact = exact_mem.extraction_distribution().context("extraction failed")?;

    let mut rng = sampling_rng(seed);
    let mut shots = Vec::with_capacity(config.driver.shots);
    for _ in 0..config.driver.shots {
        let mut mem = AssociativeMemory::with_rng(config.memory.clone(), &mut rng)?;
        mem.store(patterns)?;
        shots.push(mem.extract()?);
        mem.into_processor()?;
    }

    let total = shots.len();
    let kept = match config.driver.max_degree {
        Some(max_degree) => filter_high_degree_terms(shots, max_degree),
        None => shots,
    };
    tracing::info!(total, kept = kept.len(), max_degree = ?config.driver.max_degree, "extraction shots");

    let outcomes = tally(&kept)
        .into_iter()
        .map(|outcome| ExtractRow {
            frequency: outcome.count as f64 / total.max(1) as f64,
            exact: exact.get(outcome.value as usize).copied().unwrap_or(0.0),
            outcome,
        })
        .collect();

    let report = ExtractReport {
        patterns: patterns.clone(),
        shots: total,
        kept: kept.len(),
        max_degree: config.driver.max_degree,
        outcomes,
    };

    if json {
        return print_json(&report);
    }

    println!(
        "\n{} patterns {:?}, kept {} of {} shots",
        "Extraction".green().bold(),
        report.patterns,
        report.kept,
        report.shots
    );
    println!("\n{}", "Bits | Count | Frequency | Exact".bold());
    println!("----------------------------------");
    for row in &report.outcomes {
        println!(
            "{} | {:5} | {:9.4} | {:.4}",
            row.outcome.bits.cyan(),
            row.outcome.count,
            row.frequency,
            row.exact
        );
    }
    Ok(())
}

// ============================================================================
// Angles
// ============================================================================

#[derive(Serialize)]
struct AngleRow {
    position: usize,
    j: usize,
    angle: f64,
    sin_half: f64,
    cos_half: f64,
}

fn angles_command(len: usize, json: bool) -> Result<()> {
    if len == 0 {
        bail!("pattern list length must be at least 1");
    }

    let rows = (1..=len)
        .map(|position| {
            let angle = position_angle(position, len)?;
            Ok(AngleRow {
                position,
                j: len + 1 - position,
                angle,
                sin_half: (angle / 2.0).sin(),
                cos_half: (angle / 2.0).cos(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        return print_json(&rows);
    }

    println!("{}", "  i |   j |   angle  | sin(θ/2) | cos(θ/2)".bold());
    println!("--------------------------------------------");
    for row in &rows {
        println!(
            "{:3} | {:3} | {:+.5} | {:+.5} | {:+.5}",
            row.position, row.j, row.angle, row.sin_half, row.cos_half
        );
    }
    Ok(())
}
