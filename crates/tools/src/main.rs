use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use stonepath_core::mapgen::generate_map;
use stonepath_core::reference::{lower_bound, reference_answer};
use stonepath_core::{
    AgentConfig, Handshake, RouteComposer, RouteReport, ScriptedWorld, VisionVariant, WorldMap,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one random map
    Generate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Run the agent on consecutive seeds and compare against the full-knowledge answer
    Check {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short = 'n', long, default_value_t = 100)]
        count: u64,
        /// Vision selector (1 or 2); alternates by seed when omitted
        #[arg(short, long)]
        variant: Option<u8>,
        #[arg(long)]
        json: bool,
    },
    /// Run the agent on a map file
    Run {
        /// Path to a whitespace-separated map fixture
        #[arg(short, long)]
        map: PathBuf,
        #[arg(short, long, default_value_t = 1)]
        variant: u8,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct CheckRecord {
    seed: u64,
    variant: u8,
    agent: i64,
    reference: i64,
    moves: usize,
    digest: String,
}

impl CheckRecord {
    fn agrees(&self) -> bool {
        self.agent == self.reference
    }
}

#[derive(Serialize)]
struct RunSummary<'a> {
    answer: i64,
    reference: i64,
    lower_bound: i64,
    report: &'a RouteReport,
}

fn parse_variant(selector: u8) -> Result<VisionVariant> {
    VisionVariant::from_selector(selector)
        .with_context(|| format!("Unknown vision variant {selector}, expected 1 or 2"))
}

fn as_answer(edges: Option<u32>) -> i64 {
    edges.map_or(-1, i64::from)
}

fn simulate(map: &WorldMap, variant: VisionVariant) -> Result<RouteReport> {
    let config = AgentConfig::with_grid_size(map.size());
    let mut world = ScriptedWorld::new(map.clone(), variant, config.start);
    let handshake = Handshake { variant, goal: map.goal() };
    RouteComposer::new(&mut world, &config, handshake)
        .run()
        .context("Simulated world refused the agent")
}

fn check_maps(seed: u64, count: u64, fixed: Option<VisionVariant>) -> Result<Vec<CheckRecord>> {
    let start = AgentConfig::default().start;
    let mut records = Vec::new();
    for offset in 0..count {
        let map_seed = seed.wrapping_add(offset);
        let map = generate_map(map_seed)
            .with_context(|| format!("No placement found for seed {map_seed}"))?;
        let variant = fixed.unwrap_or(if map_seed % 2 == 0 {
            VisionVariant::Near
        } else {
            VisionVariant::Far
        });
        let report =
            simulate(&map, variant).with_context(|| format!("Agent failed on seed {map_seed}"))?;
        records.push(CheckRecord {
            seed: map_seed,
            variant: variant.selector(),
            agent: report.answer(),
            reference: as_answer(reference_answer(&map, start)),
            moves: report.moves(),
            digest: format!("{:016x}", report.trace_digest()),
        });
    }
    Ok(records)
}

fn run_map(path: &Path, variant: VisionVariant) -> Result<(WorldMap, RouteReport)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file: {}", path.display()))?;
    let map = WorldMap::parse(&text)
        .with_context(|| format!("Failed to parse map file: {}", path.display()))?;
    let report = simulate(&map, variant)?;
    Ok((map, report))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match Args::parse().command {
        Command::Generate { seed } => {
            let map = generate_map(seed)
                .with_context(|| format!("No placement found for seed {seed}"))?;
            print!("{}", map.render());
        }
        Command::Check { seed, count, variant, json } => {
            let fixed = variant.map(parse_variant).transpose()?;
            let records = check_maps(seed, count, fixed)?;
            let mismatches: Vec<&CheckRecord> =
                records.iter().filter(|record| !record.agrees()).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &mismatches {
                    println!(
                        "Seed {} variant {}: agent {} reference {}",
                        record.seed, record.variant, record.agent, record.reference
                    );
                }
                println!("Checked {} maps, {} mismatches.", records.len(), mismatches.len());
            }
            if !mismatches.is_empty() {
                bail!(
                    "{} of {} maps disagreed with the reference",
                    mismatches.len(),
                    records.len()
                );
            }
        }
        Command::Run { map, variant, json } => {
            let (world, report) = run_map(&map, parse_variant(variant)?)?;
            let start = AgentConfig::default().start;
            let summary = RunSummary {
                answer: report.answer(),
                reference: as_answer(reference_answer(&world, start)),
                lower_bound: as_answer(lower_bound(&world, start)),
                report: &report,
            };
            info!(answer = summary.answer, reference = summary.reference, "map solved");
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", world.render());
                println!("Answer: {}", summary.answer);
                println!("Reference: {}", summary.reference);
                println!("Zone-free bound: {}", summary.lower_bound);
                println!("Moves: {}", report.moves());
                println!("Trace digest: {:016x}", report.trace_digest());
            }
        }
    }

    Ok(())
}
