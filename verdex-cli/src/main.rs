// Copyright 2026 Verdex (https://github.com/verdex-eval/verdex)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Verdex CLI
//!
//! Command-line interface for evaluating LLM response datasets.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::Level;
use verdex_core::{columns, load_path, write_csv_path, Criterion};
use verdex_evals::{
    agreement, summarize, DatasetEvaluator, MetricRegistry, ThresholdResolver, SAFETY_METRIC,
};

#[derive(Parser)]
#[command(name = "verdex")]
#[command(about = "Verdex - scores LLM responses against human expectations", long_about = None)]
struct Cli {
    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a dataset and print a run summary
    Evaluate {
        /// Input dataset (.csv or .json)
        input: PathBuf,

        /// Comma-separated metric names (default: every built-in)
        #[arg(short, long)]
        metrics: Option<String>,

        /// Overall-verdict criterion: all-pass or any-pass
        #[arg(long)]
        criterion: Option<String>,

        /// Threshold override (repeatable)
        #[arg(long = "threshold", value_name = "NAME=VALUE")]
        thresholds: Vec<String>,

        /// Comma-separated sensitive keywords for the safety metric
        #[arg(short, long)]
        keywords: Option<String>,

        /// Write the annotated table to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run configuration file (TOML); flags win over file values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print reviewer-vs-automated agreement
        #[arg(long)]
        agreement: bool,
    },

    /// List the available metrics and their default thresholds
    Metrics,
}

/// Run configuration loadable from a TOML file.
#[derive(Debug, Default, Deserialize)]
struct RunConfig {
    metrics: Option<Vec<String>>,
    criterion: Option<String>,
    keywords: Option<Vec<String>>,
    #[serde(default)]
    thresholds: HashMap<String, f64>,
}

impl RunConfig {
    fn load(path: &PathBuf) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Evaluate {
            input,
            metrics,
            criterion,
            thresholds,
            keywords,
            output,
            config,
            agreement: with_agreement,
        } => {
            let file_config = match &config {
                Some(path) => RunConfig::load(path)?,
                None => RunConfig::default(),
            };

            let registry = MetricRegistry::with_builtins();

            let metric_names: Vec<String> = match metrics {
                Some(list) => split_list(&list),
                None => match file_config.metrics {
                    Some(from_file) if !from_file.is_empty() => from_file,
                    _ => registry.names().iter().map(|s| s.to_string()).collect(),
                },
            };

            let criterion = match criterion.or(file_config.criterion) {
                Some(raw) => raw.parse::<Criterion>()?,
                None => Criterion::default(),
            };

            let mut threshold_overrides = file_config.thresholds;
            for pair in &thresholds {
                let (name, value) = parse_threshold(pair)?;
                threshold_overrides.insert(name, value);
            }

            let sensitive_keywords = match keywords {
                Some(list) => split_list(&list),
                None => file_config.keywords.unwrap_or_default(),
            };

            let table = load_path(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;

            // Evaluating a dataset with no generated answers at all is
            // always a caller mistake; refuse up front.
            if table
                .records()
                .iter()
                .all(|record| record.output_text().is_none())
            {
                bail!(
                    "Column '{}' is empty for every row; generate responses before evaluating",
                    columns::LLM_OUTPUT
                );
            }

            let selected = registry.select(&metric_names)?;

            let annotated = DatasetEvaluator::with_registry(registry)
                .with_thresholds(threshold_overrides)
                .with_sensitive_keywords(sensitive_keywords)
                .with_criterion(criterion)
                .evaluate(&table, &metric_names)?;

            if let Some(path) = &output {
                write_csv_path(&annotated, path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.json {
                    println!("✓ Wrote annotated results to {}", path.display());
                }
            }

            let summary = summarize(&annotated, &selected);
            let report = with_agreement
                .then(|| {
                    agreement(
                        &annotated,
                        columns::REVIEWER_VERDICT,
                        columns::OVERALL_VERDICT,
                    )
                })
                .flatten();

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "summary": summary,
                        "agreement": report,
                        "output": output.as_ref().map(|p| p.display().to_string()),
                    }))?
                );
            } else {
                print!("{}", summary);
                if with_agreement {
                    match report {
                        Some(report) => println!("Reviewer agreement: {}", report),
                        None => println!("Reviewer agreement: not applicable (no comparable rows)"),
                    }
                }
            }
        }

        Commands::Metrics => {
            let registry = MetricRegistry::with_builtins();
            let resolver = ThresholdResolver::new();

            if cli.json {
                let listing: Vec<_> = registry
                    .names()
                    .iter()
                    .map(|name| {
                        serde_json::json!({
                            "name": name,
                            "threshold": resolver.resolve(name),
                            "pinned": *name == SAFETY_METRIC,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("Available metrics:");
                for name in registry.names() {
                    let pinned = if name == SAFETY_METRIC { " (pinned)" } else { "" };
                    println!("  {:<20} threshold {:.2}{}", name, resolver.resolve(name), pinned);
                }
            }
        }
    }

    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_threshold(raw: &str) -> Result<(String, f64)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid threshold override '{}', expected NAME=VALUE", raw))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid threshold override '{}', missing metric name", raw);
    }
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid threshold value in '{}'", raw))?;
    Ok((name.to_string(), value))
}
