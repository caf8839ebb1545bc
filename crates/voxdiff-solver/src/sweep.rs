//! The diffusion-coefficient sweep controller.
//!
//! Candidates are embarrassingly parallel: each owns its concentration
//! field exclusively, and the configuration and phase mask are shared
//! read-only. Jobs flow through a crossbeam channel into a bounded worker
//! pool; there are no locks on the stepping hot path. A candidate that
//! fails is recorded with its typed reason and never aborts its siblings.

use std::thread;

use voxdiff_core::StepError;
use voxdiff_grid::PhaseMask;

use crate::config::SimulationConfig;
use crate::stepper::{TimeStepper, Trajectory};

/// The result of one candidate's run.
#[derive(Clone, Debug)]
pub struct CandidateOutcome {
    /// The candidate diffusion coefficient, m²/s.
    pub candidate: f64,
    /// The trajectory, or the typed reason the run failed.
    pub result: Result<Trajectory, StepError>,
}

/// All candidate outcomes of a sweep, ordered by candidate value.
///
/// Every requested candidate appears exactly once; a failure is an
/// outcome, not an omission.
#[derive(Clone, Debug)]
pub struct SweepReport {
    /// Per-candidate outcomes, ascending by candidate.
    pub outcomes: Vec<CandidateOutcome>,
}

impl SweepReport {
    /// Number of candidates that ran to completion.
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of candidates that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }
}

/// Runs one independent [`TimeStepper`] per sweep candidate.
#[derive(Clone, Debug)]
pub struct SweepController<'a> {
    config: &'a SimulationConfig,
    mask: &'a PhaseMask,
    workers: Option<usize>,
}

fn run_candidate(config: &SimulationConfig, mask: &PhaseMask, candidate: f64) -> CandidateOutcome {
    let result = TimeStepper::new(config, mask, candidate).and_then(TimeStepper::run);
    CandidateOutcome { candidate, result }
}

impl<'a> SweepController<'a> {
    /// Create a controller over a resolved configuration and phase mask.
    pub fn new(config: &'a SimulationConfig, mask: &'a PhaseMask) -> Self {
        Self {
            config,
            mask,
            workers: None,
        }
    }

    /// Set an explicit worker count instead of auto-detection.
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    /// Resolve the worker count, applying auto-detection if unset.
    ///
    /// Explicit values are clamped to `[1, 64]`; auto-detection uses
    /// `available_parallelism` clamped to `[1, 16]`. The pool never
    /// exceeds the candidate count.
    pub fn resolved_worker_count(&self) -> usize {
        match self.workers {
            Some(n) => n.clamp(1, 64),
            None => thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        }
    }

    /// Run every candidate sequentially on the calling thread.
    pub fn run_serial(&self) -> SweepReport {
        let outcomes = self
            .config
            .candidates()
            .into_iter()
            .map(|c| run_candidate(self.config, self.mask, c))
            .collect();
        SweepReport { outcomes }
    }

    /// Run every candidate over the worker pool.
    ///
    /// Falls back to [`run_serial`](Self::run_serial) when one worker (or
    /// one candidate) would make the pool pure overhead. Outcomes are
    /// reassembled in candidate order regardless of completion order.
    pub fn run(&self) -> SweepReport {
        let candidates = self.config.candidates();
        let workers = self.resolved_worker_count().min(candidates.len());
        if workers <= 1 {
            return self.run_serial();
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, f64)>();
        for job in candidates.iter().copied().enumerate() {
            // Cannot fail: the matching receiver outlives the sends.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let (out_tx, out_rx) = crossbeam_channel::unbounded::<(usize, CandidateOutcome)>();
        thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let out_tx = out_tx.clone();
                s.spawn(move || {
                    while let Ok((idx, candidate)) = job_rx.recv() {
                        let outcome = run_candidate(self.config, self.mask, candidate);
                        if out_tx.send((idx, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(out_tx);

        // The scope joined every worker, so each job produced exactly one
        // outcome; flatten cannot drop a candidate.
        let mut slots: Vec<Option<CandidateOutcome>> =
            candidates.iter().map(|_| None).collect();
        for (idx, outcome) in out_rx.iter() {
            slots[idx] = Some(outcome);
        }
        let outcomes: Vec<CandidateOutcome> = slots.into_iter().flatten().collect();
        debug_assert_eq!(outcomes.len(), candidates.len());
        SweepReport { outcomes }
    }
}
