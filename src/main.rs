use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod charts;
mod dashboard;
mod data;
mod models;
mod stats;

use dashboard::SliderValues;
use models::{CategoricalColumn, NumericColumn};

#[derive(Parser)]
#[command(name = "depression-dashboard")]
#[command(about = "Depression survey analysis dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one dashboard render pass and write the chart specs to stdout
    Render {
        /// Fallback CSV path, used when the sample connection is unavailable
        #[arg(long, default_value = "data/sample.csv")]
        data: PathBuf,
        #[arg(long)]
        min_cgpa: Option<f64>,
        #[arg(long)]
        min_age: Option<f64>,
        #[arg(long)]
        min_work_study_hours: Option<f64>,
        #[arg(long)]
        min_academic_pressure: Option<f64>,
    },
    /// Load the dataset and print a schema and coverage summary
    Validate {
        #[arg(long, default_value = "data/sample.csv")]
        data: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            data,
            min_cgpa,
            min_age,
            min_work_study_hours,
            min_academic_pressure,
        } => {
            let table = data::load(&data).await?;
            let inputs = SliderValues {
                min_cgpa,
                min_age,
                min_work_study_hours,
                min_academic_pressure,
            };
            let items = dashboard::render_pass(&table, &inputs);
            dashboard::write_items(&items, std::io::stdout().lock())?;
            println!();
        }
        Commands::Validate { data } => {
            let table = data::load(&data).await?;
            println!("Loaded {} survey rows.", table.len());

            println!("Numeric columns:");
            for column in NumericColumn::ALL {
                match table.numeric_range(column) {
                    Some((min, max)) => println!(
                        "- {}: {} values in [{min}, {max}]",
                        column.name(),
                        table.numeric_values(column).len()
                    ),
                    None => println!("- {}: no values", column.name()),
                }
            }

            println!("Categorical columns:");
            for column in [
                CategoricalColumn::Gender,
                CategoricalColumn::SleepDuration,
                CategoricalColumn::Degree,
                CategoricalColumn::DietaryHabits,
                CategoricalColumn::FamilyHistory,
                CategoricalColumn::SuicidalThoughts,
            ] {
                let categories: BTreeSet<&str> = table
                    .records()
                    .iter()
                    .filter_map(|record| column.value(record))
                    .collect();
                println!("- {}: {} distinct categories", column.name(), categories.len());
            }
        }
    }

    Ok(())
}
