//! `od-access`: run a closest-destination access analysis from CSV
//! snapshots.
//!
//! ```text
//! od-access --config analysis.toml \
//!           --nodes nodes.csv --edges edges.csv --od-table od.csv \
//!           --out-dir output/
//! ```
//!
//! Set `RUST_LOG=info` for per-scenario progress.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;

use od_analysis::{AnalysisBuilder, AnalysisObserver, ScenarioResult};
use od_core::AnalysisConfig;
use od_network::DijkstraRouter;
use od_output::{export, CsvWriter};
use od_table::{load_network_csv, load_od_table_csv, OdLabels};

#[derive(Parser, Debug)]
#[command(name = "od-access", version, about = "Closest-destination access under hazard disruption")]
struct Args {
    /// Analysis configuration (`.toml` or `.json`).
    #[arg(long)]
    config: PathBuf,

    /// Node snapshot: `node_id,lon,lat,od_id` plus one column per configured hazard.
    #[arg(long)]
    nodes: PathBuf,

    /// Edge snapshot: `from,to,length,time,bridge,geometry` plus one column per configured hazard.
    #[arg(long)]
    edges: PathBuf,

    /// Origin/destination table.
    #[arg(long)]
    od_table: PathBuf,

    /// Directory the output tables are written to; created if missing.
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Run only these hazard scenarios instead of the configured ones.
    #[arg(long, value_delimiter = ',')]
    hazards: Vec<String>,

    /// Write `output.db` instead of CSV files.
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    sqlite: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = AnalysisConfig::from_path(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;

    let hazards = if args.hazards.is_empty() { config.hazard_names.clone() } else { args.hazards.clone() };
    let network = load_network_csv(&args.nodes, &args.edges, &OdLabels::from_config(&config), &hazards)
        .context("loading network snapshot")?;
    info!(
        "network: {} nodes, {} roads, hazards {:?}",
        network.node_count(),
        network.road_count(),
        network.hazard_names
    );
    let table = load_od_table_csv(&args.od_table, &config, &network)
        .with_context(|| format!("loading OD table {}", args.od_table.display()))?;
    info!(
        "OD table: {} origins, {} destinations, {} categories",
        table.origins().len(),
        table.destinations().len(),
        table.categories().len()
    );

    let mut builder = AnalysisBuilder::new(config, network, table, DijkstraRouter);
    if !args.hazards.is_empty() {
        builder = builder.hazards(hazards);
    }
    let mut analysis = builder.build()?;
    analysis.run(&mut ProgressLog::default())?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    #[cfg(feature = "sqlite")]
    if args.sqlite {
        let mut writer = od_output::SqliteWriter::new(&args.out_dir)?;
        export(&analysis, &mut writer)?;
        info!("wrote {}", args.out_dir.join("output.db").display());
        return Ok(());
    }

    let mut writer = CsvWriter::new(&args.out_dir)?;
    export(&analysis, &mut writer)?;
    info!("wrote CSV tables to {}", args.out_dir.display());
    Ok(())
}

/// Logs wall-clock time per scenario.
#[derive(Default)]
struct ProgressLog {
    started: Option<Instant>,
}

impl AnalysisObserver for ProgressLog {
    fn on_scenario_start(&mut self, _scenario: &str) {
        self.started = Some(Instant::now());
    }

    fn on_scenario_end(&mut self, scenario: &str, results: &[ScenarioResult]) {
        let secs = self.started.take().map(|t| t.elapsed().as_secs_f64()).unwrap_or_default();
        let routed: usize = results.iter().map(|r| r.origins_routed).sum();
        info!("{scenario} finished in {secs:.2}s ({routed} origins routed)");
    }
}
