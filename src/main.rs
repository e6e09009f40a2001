use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod dataset;
mod knowledge;
mod model;
mod models;
mod server;
mod tree;

use model::{ModelConfig, Predictor};
use models::{PredictionInput, FEATURE_NAMES};
use tree::TreeParams;

#[derive(Parser)]
#[command(name = "stress-check")]
#[command(about = "Study-stress classifier served over HTTP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct ModelArgs {
    /// Number of synthetic training rows
    #[arg(long, env = "STRESS_CHECK_SAMPLES", default_value_t = 400)]
    samples: usize,
    /// Seed for the synthetic dataset
    #[arg(long, env = "STRESS_CHECK_SEED", default_value_t = 42)]
    seed: u64,
    /// Maximum depth of the decision tree
    #[arg(long, env = "STRESS_CHECK_MAX_DEPTH", default_value_t = 4)]
    max_depth: u16,
    /// Seed for the decision tree's random state
    #[arg(long, env = "STRESS_CHECK_TREE_SEED", default_value_t = 7)]
    tree_seed: u64,
}

impl ModelArgs {
    fn config(self) -> ModelConfig {
        ModelConfig {
            samples: self.samples,
            seed: self.seed,
            tree: TreeParams {
                max_depth: self.max_depth,
                random_state: self.tree_seed,
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier and serve predictions over HTTP
    Serve {
        #[arg(long, env = "STRESS_CHECK_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Train the classifier and print a single prediction
    Predict {
        #[arg(long, allow_negative_numbers = true)]
        hours_studied: f64,
        #[arg(long, allow_negative_numbers = true)]
        sleep_hours: f64,
        #[arg(long)]
        mood: Option<String>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Write the synthetic training table as CSV
    ExportDataset {
        #[arg(long, default_value = "dataset.csv")]
        out: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Train the classifier and print its summary and feature importances
    Describe {
        #[command(flatten)]
        model: ModelArgs,
    },
}

fn train(config: &ModelConfig) -> anyhow::Result<Predictor> {
    let predictor = Predictor::train(config).context("failed to train stress classifier")?;
    let summary = predictor.summary();
    tracing::info!(
        samples = summary.samples,
        low = summary.class_counts[0],
        medium = summary.class_counts[1],
        high = summary.class_counts[2],
        depth = summary.depth,
        accuracy = summary.training_accuracy,
        "classifier trained"
    );
    Ok(predictor)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stress_check=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, model } => {
            let predictor = train(&model.config())?;
            server::serve(bind, Arc::new(predictor)).await?;
        }
        Commands::Predict {
            hours_studied,
            sleep_hours,
            mood,
            model,
        } => {
            let predictor = train(&model.config())?;
            let input = PredictionInput {
                hours_studied,
                sleep_hours,
                mood,
            };
            let output = predictor.predict(&input)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::ExportDataset { out, model } => {
            let records = dataset::generate(model.seed, model.samples);
            dataset::export_csv(&records, &out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Wrote {} rows to {}.", records.len(), out.display());
        }
        Commands::Describe { model } => {
            let predictor = train(&model.config())?;
            let summary = predictor.summary();
            println!("Samples: {}", summary.samples);
            println!(
                "Class counts: low {}, medium {}, high {}",
                summary.class_counts[0], summary.class_counts[1], summary.class_counts[2]
            );
            println!("Tree depth: {}", summary.depth);
            println!("Training accuracy: {:.3}", summary.training_accuracy);
            println!("Feature importances:");
            for (name, importance) in FEATURE_NAMES.iter().zip(&summary.feature_importances) {
                println!("- {name}: {importance:.3}");
            }
        }
    }

    Ok(())
}
