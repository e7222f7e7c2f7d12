//! # CLI Module
//!
//! Command-line interface for walnut measurement and pairing.
//!
//! ## Usage
//! ```bash
//! # Measure one walnut folder
//! walnut-pair measure walnuts/W001
//!
//! # Keep the segmentation steps next to the photos
//! walnut-pair measure walnuts/W001 --debug
//!
//! # Compare every walnut under one or more roots
//! walnut-pair compare walnuts/ --config pairing.json
//!
//! # JSON output
//! walnut-pair compare walnuts/ --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;
use walnut_pair::core::config::AlgorithmConfig;
use walnut_pair::core::measure::SixViewEstimator;
use walnut_pair::core::pipeline::{Pipeline, PipelineResult};
use walnut_pair::core::scanner::{ScanConfig, WalkDirScanner};
use walnut_pair::core::{ComparisonRecord, DimensionValue};
use walnut_pair::error::Result;
use walnut_pair::events::{CompareEvent, Event, EventChannel, MeasureEvent, PipelineEvent, ScanEvent};

/// Walnut Pair - Measure walnuts from six photos and find matching pairs
#[derive(Parser, Debug)]
#[command(name = "walnut-pair")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate the dimensions of one walnut
    Measure {
        /// Folder holding the six `<id>_<side>` photos
        object_dir: PathBuf,

        /// Save intermediate images under `_intermediate/`
        #[arg(long)]
        debug: bool,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: MeasureOutput,
    },

    /// Measure every walnut under the roots and compare all pairs
    Compare {
        /// Directories holding one folder per walnut
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Show at most this many pairs in pretty output
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Include hidden folders and files
        #[arg(long)]
        include_hidden: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MeasureOutput {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (one ranked pair per line)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Measure {
            object_dir,
            debug,
            config,
            output,
        } => run_measure(&object_dir, debug, config.as_deref(), output),
        Commands::Compare {
            roots,
            config,
            output,
            top,
            include_hidden,
            verbose,
        } => run_compare(roots, config.as_deref(), output, top, include_hidden, verbose),
    }
}

fn run_measure(object_dir: &Path, debug: bool, config_path: Option<&Path>, output: MeasureOutput) -> Result<()> {
    let mut config = AlgorithmConfig::resolve(config_path)?;
    config.measure.save_intermediate |= debug;

    let folder = WalkDirScanner::new(ScanConfig::default()).scan_object_dir(object_dir)?;
    let mut object = folder.load(config.camera)?;
    let estimator = SixViewEstimator::new(&config.measure, config.camera);
    let dimensions = object.estimate_dimensions(&estimator)?;

    match output {
        MeasureOutput::Pretty => {
            let term = Term::stdout();
            term.write_line(&format!(
                "{} {}",
                style("✓").green().bold(),
                style(object.id()).bold()
            ))
            .ok();
            print_dimensions(&term, &dimensions);
            if config.measure.save_intermediate {
                term.write_line(&format!(
                    "  {} {}",
                    style("Intermediate images:").dim(),
                    object_dir.join("_intermediate").display()
                ))
                .ok();
            }
        }
        MeasureOutput::Json => {
            let output = serde_json::json!({
                "id": object.id(),
                "path": folder.path,
                "dimensions": dimensions,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_dimensions(term: &Term, dimensions: &DimensionValue) {
    for (label, value) in [
        ("length", dimensions.length_mm()),
        ("width", dimensions.width_mm()),
        ("height", dimensions.height_mm()),
    ] {
        term.write_line(&format!("  {:<8} {} mm", label, style(format!("{:.2}", value)).cyan()))
            .ok();
    }
}

fn run_compare(
    roots: Vec<PathBuf>,
    config_path: Option<&Path>,
    output: OutputFormat,
    top: usize,
    include_hidden: bool,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let config = AlgorithmConfig::resolve(config_path)?;

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Walnut Pair").bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!("  mode: {}", style(config.comparison_mode).yellow()))
            .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .paths(roots)
        .config(config)
        .include_hidden(include_hidden)
        .build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Measure(MeasureEvent::Started { total_objects }) => {
                    pb.set_length(total_objects as u64);
                    pb.set_position(0);
                }
                Event::Measure(MeasureEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!("Measuring {}", p.current_id));
                    }
                }
                Event::Measure(MeasureEvent::Rejected { id, message }) if verbose => {
                    pb.println(format!("  {} {}: {}", style("✗").red(), id, message));
                }
                Event::Scan(ScanEvent::Error { path, message }) if verbose => {
                    pb.println(format!("  {} {}: {}", style("!").yellow(), path.display(), message));
                }
                Event::Compare(CompareEvent::Started { total_pairs }) => {
                    pb.set_length(total_pairs as u64);
                    pb.set_position(0);
                }
                Event::Compare(CompareEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let result = result?;

    // Output results
    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, top, verbose),
        OutputFormat::Json => print_json_results(&result)?,
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, top: usize, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!("{} Comparison Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} walnuts loaded in {:.1}s",
        style(result.objects.len()).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} measured successfully",
        style(result.measured().count()).cyan()
    ))
    .ok();
    term.write_line(&format!("  {} pairs compared", style(result.records.len()).cyan()))
        .ok();
    if !result.errors.is_empty() {
        term.write_line(&format!("  {} problems", style(result.errors.len()).yellow()))
            .ok();
    }
    term.write_line("").ok();

    if verbose {
        for object in result.measured() {
            if let Some(dimensions) = object.dimensions() {
                term.write_line(&format!(
                    "  {:<12} L {:.2}  W {:.2}  H {:.2} mm",
                    object.id(),
                    dimensions.length_mm(),
                    dimensions.width_mm(),
                    dimensions.height_mm()
                ))
                .ok();
            }
        }
        term.write_line("").ok();
    }

    let ranked = result.ranked();
    if ranked.is_empty() {
        term.write_line(&format!(
            "  {}",
            style("Fewer than two walnuts could be measured; nothing to pair.").dim()
        ))
        .ok();
    } else {
        term.write_line(&format!("{}", style("Best Matches:").bold().underlined()))
            .ok();
        term.write_line("").ok();

        for (i, record) in ranked.iter().take(top).enumerate() {
            term.write_line(&format!(
                "  {} {} ↔ {}  {}",
                style(format!("{:>2}.", i + 1)).bold(),
                record.object_a_id(),
                record.object_b_id(),
                style(format!("{:.3}", record.final_similarity())).green()
            ))
            .ok();
            term.write_line(&format!("      {}", style(score_breakdown(record)).dim()))
                .ok();
        }
        term.write_line("").ok();
    }

    if verbose {
        for error in &result.errors {
            term.write_line(&format!("  {} {}", style("!").yellow(), error)).ok();
        }
    }
}

fn score_breakdown(record: &ComparisonRecord) -> String {
    let mut parts = vec![format!(
        "ΔW {:.2}  ΔH {:.2}  ΔL {:.2} mm",
        record.width_diff_mm(),
        record.height_diff_mm(),
        record.length_diff_mm()
    )];
    if let Some(basic) = record.basic_similarity() {
        parts.push(format!("basic {:.3}", basic));
    }
    if let Some(advanced) = record.advanced_similarity() {
        parts.push(format!("advanced {:.3}", advanced));
    }
    parts.join("  |  ")
}

fn print_json_results(result: &PipelineResult) -> Result<()> {
    let output = serde_json::json!({
        "run_id": result.run_id,
        "duration_ms": result.duration_ms,
        "objects": result.objects.iter().map(|o| {
            serde_json::json!({
                "id": o.id(),
                "dimensions": o.dimensions(),
            })
        }).collect::<Vec<_>>(),
        "records": result.ranked(),
        "errors": result.errors,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_minimal_results(result: &PipelineResult) {
    for record in result.ranked() {
        println!(
            "{}\t{}\t{:.4}",
            record.object_a_id(),
            record.object_b_id(),
            record.final_similarity()
        );
    }
}
