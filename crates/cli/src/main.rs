//! segreg CLI - spatial and non-spatial segregation measures

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use segreg_algorithms::segregation::{MeasureKind, Scope, Session};
use segreg_algorithms::spatial::{KernelKind, LocalityParams};
use segreg_core::io::{read_unit_table, write_result_table, write_summary, UnitTableSpec};
use segreg_core::{GroupCounts, UnitLayer};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "segreg")]
#[command(author, version, about = "Spatial and non-spatial segregation measures", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Columns to read from the unit table
#[derive(Args)]
struct TableArgs {
    /// Input unit table (delimited text with a header row)
    input: PathBuf,
    /// Unit identifier column
    #[arg(long, default_value = "id")]
    id: String,
    /// Centroid X column (projected coordinates)
    #[arg(long, default_value = "x")]
    x: String,
    /// Centroid Y column (projected coordinates)
    #[arg(long, default_value = "y")]
    y: String,
    /// Group count columns, comma-separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    groups: Vec<String>,
    /// Field delimiter of input and output tables
    #[arg(short, long, default_value = ",")]
    delimiter: char,
}

impl TableArgs {
    fn spec(&self) -> Result<UnitTableSpec> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!("Delimiter must be a single ASCII character: {:?}", self.delimiter);
        }
        Ok(UnitTableSpec {
            id_field: self.id.clone(),
            x_field: self.x.clone(),
            y_field: self.y.clone(),
            group_fields: self.groups.clone(),
            delimiter: self.delimiter as u8,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a unit table
    Info {
        #[command(flatten)]
        table: TableArgs,
    },
    /// Compute segregation measures and write the result table
    Run {
        #[command(flatten)]
        table: TableArgs,
        /// Kernel bandwidth; enables spatial mode when given
        #[arg(short, long)]
        bandwidth: Option<f64>,
        /// Kernel: gaussian, bisquare, moving-window
        #[arg(short, long, default_value = "gaussian")]
        kernel: String,
        /// Scan every unit even for compact kernels
        #[arg(long)]
        no_pruning: bool,
        /// Measures, comma-separated, or "all"
        #[arg(short, long, value_delimiter = ',', default_value = "all")]
        measures: Vec<String>,
        /// Output result table
        #[arg(short, long)]
        output: PathBuf,
        /// Output text summary of the global measures
        #[arg(short, long)]
        summary: Option<PathBuf>,
        /// Print the global measures as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_layer(table: &TableArgs) -> Result<UnitLayer> {
    let spec = table.spec()?;
    let pb = spinner("Reading unit table...");
    let layer = read_unit_table(&table.input, &spec).context("Failed to read unit table")?;
    pb.finish_and_clear();
    info!("Input: {} units, {} groups", layer.len(), layer.n_groups());
    Ok(layer)
}

fn parse_measures(names: &[String]) -> Result<Vec<MeasureKind>> {
    if names.iter().any(|n| n.trim().eq_ignore_ascii_case("all")) {
        return Ok(MeasureKind::ALL.to_vec());
    }
    let mut kinds = names
        .iter()
        .map(|n| n.parse::<MeasureKind>())
        .collect::<segreg_core::Result<Vec<_>>>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    kinds.sort();
    kinds.dedup();
    Ok(kinds)
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { table } => {
            let layer = read_layer(&table)?;
            let (min_x, min_y, max_x, max_y) = layer.bounds();
            let totals = layer.population().column_totals();

            println!("File: {}", table.input.display());
            println!("Units: {}", layer.len());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                min_x, min_y, max_x, max_y
            );
            if layer.looks_geographic() {
                println!("Coordinates look like longitude/latitude; use a projected layer");
            }
            println!("\nGroups:");
            for (name, total) in table.groups.iter().zip(totals.iter()) {
                println!("  {}: {}", name, total);
            }
            println!("  Total population: {}", totals.sum());
        }

        // ── Run ──────────────────────────────────────────────────────
        Commands::Run {
            table,
            bandwidth,
            kernel,
            no_pruning,
            measures,
            output,
            summary,
            json,
        } => {
            let kernel: KernelKind = kernel.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
            let measures = parse_measures(&measures)?;
            let delimiter = table.spec()?.delimiter;

            let layer = read_layer(&table)?;
            let start = Instant::now();
            let mut session = Session::new(layer);

            if let Some(bandwidth) = bandwidth {
                let pb = spinner("Estimating locality...");
                session
                    .estimate_locality_with(LocalityParams {
                        bandwidth,
                        kernel,
                        pruning: !no_pruning,
                    })
                    .context("Locality estimation failed")?;
                pb.finish_and_clear();
                info!("Locality: bandwidth {}, {} kernel", bandwidth, kernel);
            }

            let pb = spinner("Computing measures...");
            for &kind in &measures {
                session.compute_measure(kind, Scope::Global);
            }
            pb.finish_and_clear();

            let results = session
                .assemble_results()
                .context("Failed to assemble result table")?;
            let globals = session.summary();
            let elapsed = start.elapsed();

            let pb = spinner("Writing output...");
            write_result_table(&results, &output, delimiter)
                .context("Failed to write result table")?;
            if let Some(path) = &summary {
                write_summary(&globals, path).context("Failed to write summary")?;
            }
            pb.finish_and_clear();
            session.clear_measures();

            if json {
                println!("{}", serde_json::to_string_pretty(&globals)?);
            } else {
                print!("{}", globals);
            }
            done("Result table", &output, elapsed);
            if let Some(path) = &summary {
                println!("Summary saved to: {}", path.display());
            }
        }
    }

    Ok(())
}
