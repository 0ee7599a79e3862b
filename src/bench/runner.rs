// Batch classification runner.
// Loads every task in a directory, classifies it, and collects per-task
// predictions plus category counts into a serialisable report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::{Category, Result};
use crate::perception::grid::load_arc_task;
use crate::scoring::Classifier;

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total_tasks: usize,
    pub skipped: usize,
    pub elapsed_ms: u64,
    pub by_category: Vec<(Category, usize)>,
    pub per_task: Vec<TaskReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task_id: String,
    pub predicted: Category,
    pub scores: BTreeMap<Category, f64>,
    pub train_pairs: usize,
    pub elapsed_ms: u64,
}

/// Sorted `*.json` files under `dir`, truncated to `limit`.
pub fn task_files(dir: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    files.sort();
    if let Some(max) = limit {
        files.truncate(max);
    }
    Ok(files)
}

/// Classify every task in a directory. Files that fail to load are skipped.
pub fn run_batch(dir: &Path, limit: Option<usize>, classifier: &Classifier) -> Result<BatchReport> {
    let files = task_files(dir, limit)?;
    let total_start = Instant::now();
    let mut per_task = Vec::with_capacity(files.len());
    let mut skipped = 0;
    let mut counts: FxHashMap<Category, usize> = FxHashMap::default();

    for path in &files {
        let task = match load_arc_task(path) {
            Ok(t) => t,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping task");
                skipped += 1;
                continue;
            }
        };

        let start = Instant::now();
        let result = classifier.classify(&task);
        let elapsed = start.elapsed().as_millis() as u64;
        info!(task = %result.task_id, predicted = %result.predicted, elapsed_ms = elapsed, "classified");

        *counts.entry(result.predicted).or_default() += 1;
        per_task.push(TaskReport {
            task_id: result.task_id,
            predicted: result.predicted,
            scores: result.scores,
            train_pairs: task.train.len(),
            elapsed_ms: elapsed,
        });
    }

    let by_category = Category::ALL
        .iter()
        .map(|&c| (c, counts.get(&c).copied().unwrap_or(0)))
        .collect();

    Ok(BatchReport {
        total_tasks: per_task.len(),
        skipped,
        elapsed_ms: total_start.elapsed().as_millis() as u64,
        by_category,
        per_task,
    })
}

impl BatchReport {
    pub fn print_summary(&self) {
        println!("=== ARC Categorisation ===");
        println!("Tasks: {} | Skipped: {} | Time: {}ms", self.total_tasks, self.skipped, self.elapsed_ms);
        println!("\nBy category:");
        for (category, count) in &self.by_category {
            println!("  {}: {} ({:.1}%)", category, count,
                *count as f64 / self.total_tasks.max(1) as f64 * 100.0);
        }
    }

    pub fn print_detail(&self) {
        self.print_summary();
        println!("\nPer-task detail:");
        for t in &self.per_task {
            let best = t.scores.get(&t.predicted).copied().unwrap_or(0.0);
            println!("  {} | {} ({:.3}) pairs={} time={}ms",
                t.task_id, t.predicted, best, t.train_pairs, t.elapsed_ms);
        }
    }
}
