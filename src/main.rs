use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ultrank_tiering::snapshot::Tables;
use ultrank_tiering::tiering::{TieringConfig, TieringResult};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_SCORING: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score tournament snapshots against the tables
    Score {
        /// Tournament snapshot files or glob patterns (e.g. "events/*.yaml")
        #[arg(required = true)]
        paths: Vec<String>,

        /// Path to the table snapshot (overrides the config file)
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long, conflicts_with = "tsv")]
        json: bool,

        /// Print results as tab-separated values
        #[arg(long)]
        tsv: bool,

        /// Also write a JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate the table snapshot and report every problem found
    Check {
        /// Path to the table snapshot (overrides the config file)
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ultrank-tiering")]
#[command(about = "Tournament tiering for community ranking ladders", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ultrank-tiering/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "ultrank_tiering=debug");
    }
    sensible_env_logger::init!();

    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);
    let config = match ultrank_tiering::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate tiering config at startup
    let tiering = config.tiering.clone().unwrap_or_default();
    if let Err(errors) = ultrank_tiering::tiering::validate_tiering(&tiering) {
        eprintln!("Tiering config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Commands::Check { tables } => {
            let tables_path = config.tables_path(tables);
            let tables = load_tables_or_exit(&tables_path);
            println!(
                "Tables OK: {} region rules, {} players ({})",
                tables.regions.len(),
                tables.players.len(),
                tables_path.display()
            );
        }
        Commands::Score {
            paths,
            tables,
            json,
            tsv,
            output,
        } => {
            let tables = load_tables_or_exit(&config.tables_path(tables));

            let snapshot_paths = match ultrank_tiering::snapshot::expand_paths(&paths) {
                Ok(p) if p.is_empty() => {
                    eprintln!("No tournament snapshots matched {}", paths.join(" "));
                    std::process::exit(EXIT_SCORING);
                }
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Invalid path pattern: {:#}", e);
                    std::process::exit(EXIT_SCORING);
                }
            };

            if cli.verbose {
                eprintln!("Scoring {} tournament snapshots", snapshot_paths.len());
            }

            let outcomes: Vec<_> = snapshot_paths
                .par_iter()
                .map(|path| score_snapshot(path, &tables, &tiering))
                .collect();

            // Partial failure: report every broken snapshot, keep the rest
            let mut results = Vec::new();
            let mut failures = 0;
            for outcome in outcomes {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        eprintln!("Scoring failed: {:#}", e);
                        failures += 1;
                    }
                }
            }

            // Highest score first, slug as tie-breaker for stable output
            results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.slug.cmp(&b.slug)));

            if json {
                match ultrank_tiering::output::to_json(&results) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_SCORING);
                    }
                }
            } else if tsv {
                if !results.is_empty() {
                    println!("{}", ultrank_tiering::output::format_tsv(&results));
                }
            } else {
                let use_colors = ultrank_tiering::output::should_use_colors();
                if cli.verbose && !results.is_empty() {
                    for result in &results {
                        println!(
                            "{}",
                            ultrank_tiering::output::format_result_detail(result, use_colors)
                        );
                        println!();
                    }
                } else {
                    println!(
                        "{}",
                        ultrank_tiering::output::format_result_table(&results, use_colors)
                    );
                }
            }

            if let Some(report_path) = output {
                if let Err(e) = ultrank_tiering::output::write_json_report(&report_path, &results)
                {
                    eprintln!("Failed to write report: {:#}", e);
                    std::process::exit(EXIT_SCORING);
                }
                if cli.verbose {
                    eprintln!("Wrote report to {}", report_path.display());
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} tournaments in {:?}",
                    results.len(),
                    start_time.elapsed()
                );
            }

            if failures > 0 {
                std::process::exit(EXIT_SCORING);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load, validate and build the table snapshot, exiting on any problem.
fn load_tables_or_exit(path: &Path) -> Tables {
    let snapshot = match ultrank_tiering::snapshot::load_tables(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Tables error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = ultrank_tiering::snapshot::validate_tables(&snapshot) {
        eprintln!("Table errors in {}:", path.display());
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match snapshot.build() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Tables error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn score_snapshot(path: &Path, tables: &Tables, tiering: &TieringConfig) -> Result<TieringResult> {
    let snapshot = ultrank_tiering::snapshot::load_tournament(path)?;
    let context = snapshot.into_context();
    ultrank_tiering::calculate_tier(&context, &tables.regions, &tables.players, tiering)
        .with_context(|| format!("Failed to score {}", path.display()))
}
