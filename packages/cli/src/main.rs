#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the feedback map toolchain.
//!
//! Resolves coordinates to counties, aggregates and summarizes exported
//! feedback records, renders the county map to an SVG file, and starts
//! the API server.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use feedback_map_analytics::{aggregate_by_county, compute_stats};
use feedback_map_feedback_models::FeedbackRecord;
use feedback_map_feedback_models::departments::{DEPARTMENTS, search_departments};
use feedback_map_geography::resolver::CountyResolver;
use feedback_map_render::view::ZoomTransform;
use feedback_map_render::{RenderOptions, render_map};
use feedback_map_source::BoundarySource;
use feedback_map_source::boundaries::{CatalogBoundaries, FileBoundaries};

#[derive(Parser)]
#[command(name = "feedback_map", about = "Citizen feedback county map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the county nearest to a point
    Resolve {
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
    /// Per-county counts, issues, and colors for a JSON array of records
    Aggregate {
        /// Path to the records file
        records: PathBuf,
        /// Also list counties with no feedback
        #[arg(long)]
        all: bool,
    },
    /// Dashboard summary counts for a JSON array of records, as JSON
    Stats {
        /// Path to the records file
        records: PathBuf,
    },
    /// Render the county map for a JSON array of records to SVG
    Render {
        /// Path to the records file
        records: PathBuf,
        /// County boundary `GeoJSON`. Catalog centers are drawn if omitted.
        #[arg(long)]
        boundaries: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// County to highlight
        #[arg(long)]
        selected: Option<String>,
        /// County to draw as hovered, with its tooltip
        #[arg(long)]
        hovered: Option<String>,
        /// Drawing width
        #[arg(long, default_value = "800")]
        width: f64,
        /// Drawing height
        #[arg(long, default_value = "600")]
        height: f64,
        /// Zoom factor (1-8)
        #[arg(long, default_value = "1")]
        zoom: f64,
        /// Leave out county labels
        #[arg(long)]
        no_labels: bool,
    },
    /// List departments, optionally filtered by a search term
    Departments {
        /// Case-insensitive search text
        query: Option<String>,
    },
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { lat, lng } => match CountyResolver::default().nearest(lat, lng) {
            Some(entry) => println!("{} ({:03})", entry.name, entry.code),
            None => println!("No county: coordinates are missing or invalid"),
        },
        Commands::Aggregate { records, all } => {
            let records = read_records(&records).await?;
            let aggregation = aggregate_by_county(&records);

            println!("{:<20} {:>6}  {:<8} ISSUES", "COUNTY", "COUNT", "COLOR");
            println!("{}", "-".repeat(60));
            for county in aggregation.ranked() {
                if county.count == 0 && !all {
                    continue;
                }
                println!(
                    "{:<20} {:>6}  {:<8} {}",
                    county.name,
                    county.count,
                    county.color.to_hex(),
                    county.issues.join(", ")
                );
            }
            println!();
            println!(
                "{} records, {} without a county",
                records.len(),
                aggregation.unresolved
            );
        }
        Commands::Stats { records } => {
            let records = read_records(&records).await?;
            let stats = compute_stats(&records);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Render {
            records,
            boundaries,
            output,
            selected,
            hovered,
            width,
            height,
            zoom,
            no_labels,
        } => {
            let records = read_records(&records).await?;
            let boundaries = match boundaries {
                Some(path) => FileBoundaries::new(path).load().await?,
                None => CatalogBoundaries.load().await?,
            };
            let aggregation = aggregate_by_county(&records);

            let options = RenderOptions {
                width,
                height,
                selected,
                hovered,
                transform: ZoomTransform::new(zoom, 0.0, 0.0).constrain(width, height),
                labels: !no_labels,
                ..RenderOptions::default()
            };
            let map = render_map(&boundaries, &aggregation, &options)?;

            for skipped in &map.skipped {
                log::warn!("Left {} off the map: {}", skipped.name, skipped.error);
            }

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &map.svg).await?;
                    log::info!(
                        "Wrote {} counties to {}",
                        map.shapes.len(),
                        path.display()
                    );
                }
                None => println!("{}", map.svg),
            }
        }
        Commands::Departments { query } => {
            let departments = match query.as_deref() {
                Some(query) => search_departments(query),
                None => DEPARTMENTS.iter().collect(),
            };
            for department in departments {
                println!("{:<12} {}", department.id, department.name);
                for sub in department.sub_departments {
                    println!("  {:<10} {}", sub.id, sub.name);
                }
            }
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(feedback_map_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}

async fn read_records(path: &Path) -> Result<Vec<FeedbackRecord>, Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    let records: Vec<FeedbackRecord> = serde_json::from_str(&text)?;
    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
