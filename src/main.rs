use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use arc_categorize::bench::run_batch;
use arc_categorize::perception::grid::load_arc_task;
use arc_categorize::scoring::Explanation;
use arc_categorize::{Category, Classifier, ScoringConfig};

/// Rule-based ARC task categoriser
#[derive(Parser, Debug)]
#[command(name = "arc-categorize")]
#[command(about = "Assign ARC tasks to transformation categories")]
struct Args {
    /// Task file or directory of task files
    path: PathBuf,

    /// Scoring config (JSON)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Classify at most this many tasks from a directory
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Print every rule's per-pair outcome (single task) or per-task detail (directory)
    #[arg(long)]
    explain: bool,

    /// Write the result as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ScoringConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScoringConfig::default(),
    };
    let classifier = Classifier::with_config(config)?;

    let json = if args.path.is_dir() {
        let report = run_batch(&args.path, args.limit, &classifier)
            .with_context(|| format!("classifying {}", args.path.display()))?;
        if args.explain {
            report.print_detail();
        } else {
            report.print_summary();
        }
        serde_json::to_string_pretty(&report)?
    } else {
        let task = load_arc_task(&args.path)
            .with_context(|| format!("loading task {}", args.path.display()))?;
        let explanation = classifier.explain(&task);
        print_explanation(&explanation, args.explain);
        serde_json::to_string_pretty(&explanation)?
    };

    if let Some(path) = &args.report {
        std::fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
        println!("\nReport written to {}", path.display());
    }
    Ok(())
}

fn print_explanation(explanation: &Explanation, verbose: bool) {
    let result = &explanation.classification;
    println!("Task {} => {}", result.task_id, result.predicted);
    for category in Category::ALL {
        let marker = if category == result.predicted { "*" } else { " " };
        println!(" {} {:<12} {:.4}  (raw {:.6})", marker, category.name(),
            result.score(category), result.raw.get(&category).copied().unwrap_or(0.0));
    }
    if !verbose {
        return;
    }
    for trace in &explanation.categories {
        println!("\n--- {} ---", trace.category);
        for rule in &trace.rules {
            let passes: String = rule.passes.iter().map(|&p| if p { '+' } else { '.' }).collect();
            println!("  {:<34} [{}] prior={:.3} k={} score={:.6}",
                rule.name, passes, rule.prior, rule.complexity, rule.score);
        }
    }
}
