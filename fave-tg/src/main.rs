//! fave-tg - TextGrid tool
//!
//! Inspects, normalizes and shifts TextGrid files, and assembles aligned
//! fragments into one TextGrid per recording.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fave_common::{Settings, TextGridCodec, TierReconciler};
use fave_tg::{AssemblyPipeline, Manifest};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for fave-tg
#[derive(Parser, Debug)]
#[command(name = "fave-tg")]
#[command(about = "TextGrid inspection and fragment assembly")]
#[command(version)]
struct Args {
    /// Settings file (overrides FAVE_CONFIG and the per-user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a TextGrid and print its structure
    Check { file: PathBuf },

    /// Rewrite a TextGrid in the long variant
    Normalize { input: PathBuf, output: PathBuf },

    /// Move every annotation by a fixed number of seconds
    Shift {
        input: PathBuf,
        output: PathBuf,
        /// Seconds to add (may be negative)
        #[arg(long, allow_hyphen_values = true)]
        by: f64,
    },

    /// Assemble the fragments listed in a manifest
    Assemble {
        manifest: PathBuf,
        /// Output TextGrid (defaults to the manifest's `output`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print a JSON report on stdout
        #[arg(long)]
        report: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "fave_tg=debug,fave_common=debug"
    } else {
        "fave_tg=info,fave_common=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings =
        Settings::resolve(args.config.as_deref()).context("Failed to load settings")?;
    let codec = TextGridCodec::new(settings.codec.clone());

    match args.command {
        Command::Check { file } => check(&codec, &settings, &file),
        Command::Normalize { input, output } => {
            let doc = read(&codec, &input)?;
            codec
                .write_file(&doc, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Normalized {} into {}", input.display(), output.display());
            Ok(())
        }
        Command::Shift { input, output, by } => {
            let mut doc = read(&codec, &input)?;
            doc.offset(by);
            codec
                .write_file(&doc, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Shifted {} by {} s into {}", input.display(), by, output.display());
            Ok(())
        }
        Command::Assemble {
            manifest,
            output,
            report,
        } => {
            let loaded = Manifest::load(&manifest)
                .await
                .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
            let output = loaded.output_path(output.as_deref())?;

            let pipeline = AssemblyPipeline::new(settings);
            let result = pipeline
                .run(&loaded, &output)
                .await
                .with_context(|| format!("Assembly of {} failed", manifest.display()))?;

            info!("{}", result.stats.display_string());
            if report {
                println!("{}", result.to_json()?);
            }
            Ok(())
        }
    }
}

fn read(codec: &TextGridCodec, path: &Path) -> Result<fave_common::Document> {
    codec
        .parse_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn check(codec: &TextGridCodec, settings: &Settings, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (doc, variant) = codec
        .parse_detailed(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    println!(
        "{}: {} variant, domain [{}, {}], {} tiers",
        path.display(),
        variant,
        doc.min(),
        doc.max(),
        doc.len()
    );

    // Overlaps are looked for on a copy; the file is not modified
    let reconciler = TierReconciler::new(settings.reconcile.clone());
    for tier in doc.iter() {
        let overlaps = reconciler.reconcile(&mut tier.clone()).len();
        println!(
            "  {} \"{}\" [{}, {}]: {} items, {} overlaps",
            tier.class_name(),
            tier.name(),
            tier.min(),
            tier.max(),
            tier.len(),
            overlaps
        );
    }
    Ok(())
}
