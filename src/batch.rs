//! Batch Processing Module
//!
//! Runs independent target-size searches over independent documents in
//! parallel. There is no shared mutable state between jobs; each one owns its
//! output path, so the fan-out is a plain `par_iter`. Within a single search
//! every render depends on the previous one's measured size, so no
//! parallelism exists inside a job.

use crate::errors::Result;
use crate::render::{GhostscriptRenderer, RenderParameters, Renderer};
use crate::search::{SearchOutcome, TargetSizeSearch};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// One document to compress: source and its private output path.
#[derive(Debug, Clone)]
pub struct CompressJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Re-render even when the output file already exists.
    pub overwrite: bool,
    /// Worker threads. Renders are subprocess-heavy, so the default stays
    /// well below the logical CPU count.
    pub threads: usize,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            threads: (num_cpus::get() / 2).clamp(1, 4),
            show_progress: true,
        }
    }
}

/// Per-job result inside a batch.
#[derive(Debug, Clone)]
pub enum JobStatus {
    /// Search converged within tolerance.
    Converged(SearchOutcome),
    /// Budget exhausted; output written with best-effort parameters.
    BestEffort(SearchOutcome),
    /// Output already existed and overwrite was off.
    Skipped,
    Failed(String),
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub converged: usize,
    pub best_effort: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    fn record(&mut self, input: &PathBuf, status: &JobStatus) {
        self.total += 1;
        match status {
            JobStatus::Converged(_) => self.converged += 1,
            JobStatus::BestEffort(_) => self.best_effort += 1,
            JobStatus::Skipped => self.skipped += 1,
            JobStatus::Failed(msg) => {
                self.failed += 1;
                self.errors.push((input.clone(), msg.clone()));
            }
        }
    }

    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

fn batch_progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("█▓░"),
    );
    pb.set_prefix("Compressing");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run a batch with a caller-supplied renderer factory. The factory is called
/// once per job so every job gets its own renderer and output artifact.
pub fn run_batch_with<R, F>(
    jobs: &[CompressJob],
    search: &TargetSizeSearch,
    initial: RenderParameters,
    config: &BatchConfig,
    make_renderer: F,
) -> Result<BatchSummary>
where
    R: Renderer,
    F: Fn(&CompressJob) -> Result<R> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build()
        .map_err(std::io::Error::other)?;

    let pb = batch_progress_bar(jobs.len() as u64, config.show_progress);

    let statuses: Vec<(PathBuf, JobStatus)> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let status = run_job(job, search, initial, config, &make_renderer);
                pb.inc(1);
                (job.input.clone(), status)
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut summary = BatchSummary::default();
    for (input, status) in &statuses {
        summary.record(input, status);
    }

    info!(
        total = summary.total,
        converged = summary.converged,
        best_effort = summary.best_effort,
        skipped = summary.skipped,
        failed = summary.failed,
        "Batch complete"
    );
    Ok(summary)
}

fn run_job<R, F>(
    job: &CompressJob,
    search: &TargetSizeSearch,
    initial: RenderParameters,
    config: &BatchConfig,
    make_renderer: &F,
) -> JobStatus
where
    R: Renderer,
    F: Fn(&CompressJob) -> Result<R> + Sync,
{
    if !config.overwrite && job.output.exists() {
        info!(input = ?job.input, output = ?job.output, "Output exists, skipping");
        return JobStatus::Skipped;
    }

    let mut renderer = match make_renderer(job) {
        Ok(renderer) => renderer,
        Err(e) => return JobStatus::Failed(e.to_string()),
    };

    match search.run(&mut renderer, &job.input, initial) {
        Ok(outcome) if outcome.converged => JobStatus::Converged(outcome),
        Ok(outcome) => {
            warn!(
                input = ?job.input,
                achieved = %outcome.achieved,
                "Best-effort result, target not reached"
            );
            JobStatus::BestEffort(outcome)
        }
        Err(e) => JobStatus::Failed(e.to_string()),
    }
}

/// Run a batch against Ghostscript, one renderer per job.
pub fn run_batch(
    jobs: &[CompressJob],
    search: &TargetSizeSearch,
    initial: RenderParameters,
    config: &BatchConfig,
) -> Result<BatchSummary> {
    run_batch_with(jobs, search, initial, config, |job| {
        GhostscriptRenderer::new(&job.output)
    })
}
