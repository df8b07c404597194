//! The benchmark loop: bulk vs parallel fill/copy over escalating sizes
//!
//! Each pass allocates a fresh buffer pair, runs the configured number of
//! trials, averages them, writes a report block and decides whether to move
//! to the next size. Only pass 0 is checked against the bulk-never-slower
//! baseline.
//!
//! ```rust
//! use membench::{BenchConfig, MemoryBenchmark};
//!
//! let config = BenchConfig {
//!     base_size: 65_536,
//!     trials: 2,
//!     enforce_baseline: false,
//!     ..BenchConfig::default()
//! };
//! let mut bench = MemoryBenchmark::new(config).unwrap();
//! let outcome = bench.run(&mut std::io::sink()).unwrap();
//! assert_eq!(outcome.reports.len(), 1);
//! assert!(outcome.reports[0].means.bulk_set > 0);
//! ```

use std::hint::black_box;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::buffers::BufferPair;
use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::format::Grouped;
use crate::ops::{bulk_copy, bulk_set};
use crate::parallel::Executor;
use crate::report::SizeReport;
use crate::stats::Trials;
use crate::timing::time_ns;
use crate::workers::worker_count;

const POISON_SRC: u8 = 3;
const POISON_DEST: u8 = 255;
const BULK_SET_VALUE: u8 = 123;
const PARALLEL_SET_VALUE: u8 = 42;
const REPOISON_SRC: u8 = 6;
const REPOISON_DEST: u8 = 200;

/// Geometric size progression: test size is twice the base, the base grows by
/// the multiplier after every pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSchedule {
    base: u64,
    multiplier: u64,
    ceiling: u64,
}

impl SizeSchedule {
    pub fn new(base: u64, multiplier: u64, ceiling: u64) -> Self {
        Self {
            base,
            multiplier,
            ceiling,
        }
    }

    pub fn from_config(config: &BenchConfig) -> Self {
        Self::new(config.base_size, config.size_multiplier, config.ceiling)
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// Buffer size for the current pass
    pub fn test_size(&self) -> u64 {
        self.base.saturating_mul(2)
    }

    pub fn advance(&mut self) {
        self.base = self.base.saturating_mul(self.multiplier);
    }

    pub fn within_ceiling(&self) -> bool {
        self.base <= self.ceiling
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Performance run disabled, only the baseline pass ran
    SinglePass,
    /// Next base would exceed the size ceiling
    CeilingReached,
    /// The escalation rule no longer holds
    Crossover,
}

/// Everything a full run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchOutcome {
    pub reports: Vec<SizeReport>,
    pub stop: StopReason,
}

/// Hold `report` to the bulk-never-slower baseline if it is the first pass
pub fn check_pass(config: &BenchConfig, report: &SizeReport) -> Result<()> {
    if report.pass == 0 && config.enforce_baseline {
        report.check_baseline()?;
    }
    Ok(())
}

/// Decide whether the loop stops after `report`.
///
/// `schedule` must already be advanced past the pass that produced `report`.
/// Escalation continues while bulk still beats the parallel path, as combined
/// by the configured rule; once parallel has caught up the crossover is found.
pub fn next_step(
    config: &BenchConfig,
    schedule: &SizeSchedule,
    report: &SizeReport,
) -> Option<StopReason> {
    if !config.performance_run {
        return Some(StopReason::SinglePass);
    }
    if !schedule.within_ceiling() {
        return Some(StopReason::CeilingReached);
    }
    let keep_going = config
        .escalation
        .should_continue(report.bulk_set_faster(), report.bulk_copy_faster());
    if keep_going {
        None
    } else {
        Some(StopReason::Crossover)
    }
}

/// Bulk vs parallel memory fill/copy benchmark
#[derive(Debug)]
pub struct MemoryBenchmark {
    config: BenchConfig,
    executor: Executor,
    trials: Trials,
}

impl MemoryBenchmark {
    /// Validate `config` and build the worker pool outside any timed section
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let workers = config.workers.unwrap_or_else(worker_count);
        let executor = Executor::new(workers, config.backend)?;
        let trials = Trials::with_capacity(config.trials);
        Ok(Self {
            config,
            executor,
            trials,
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.executor.workers()
    }

    /// Series gathered by the most recent pass
    pub fn trials(&self) -> &Trials {
        &self.trials
    }

    /// Prepare buffers, run every trial for `size` bytes and aggregate
    pub fn measure(&mut self, pass: usize, size: u64) -> Result<SizeReport> {
        let len = usize::try_from(size).map_err(|_| Error::Allocation { size })?;
        let mut pair = BufferPair::new(len)?;

        self.trials.clear();
        for trial in 0..self.config.trials {
            self.run_trial(&mut pair)?;
            debug!(
                pass,
                trial,
                bulk_set_ns = self.trials.bulk_set[trial],
                parallel_set_ns = self.trials.parallel_set[trial],
                bulk_copy_ns = self.trials.bulk_copy[trial],
                parallel_copy_ns = self.trials.parallel_copy[trial],
                "trial complete"
            );
        }

        Ok(SizeReport {
            pass,
            size,
            workers: self.executor.workers(),
            trials: self.trials.len(),
            means: self.trials.means()?,
        })
    }

    fn run_trial(&mut self, pair: &mut BufferPair) -> Result<()> {
        pair.poison(POISON_SRC, POISON_DEST);

        let ((), bulk_set_ns) = time_ns(|| bulk_set(&mut pair.src, BULK_SET_VALUE));
        black_box(&pair.src);

        let executor = &self.executor;
        let (res, parallel_set_ns) = time_ns(|| executor.fill(&mut pair.src, PARALLEL_SET_VALUE));
        res?;
        black_box(&pair.src);

        let (dest, src) = pair.split();
        let (res, bulk_copy_ns) = time_ns(|| bulk_copy(dest, src));
        res?;
        black_box(&pair.dest);

        pair.poison(REPOISON_SRC, REPOISON_DEST);

        let (dest, src) = pair.split();
        let (res, parallel_copy_ns) = time_ns(|| executor.copy(dest, src));
        res?;
        black_box(&pair.dest);

        self.trials.bulk_set.push(bulk_set_ns);
        self.trials.parallel_set.push(parallel_set_ns);
        self.trials.bulk_copy.push(bulk_copy_ns);
        self.trials.parallel_copy.push(parallel_copy_ns);
        Ok(())
    }

    /// Run passes until the switch, the ceiling or the escalation rule stops
    /// the loop, writing each report block to `out`
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<BenchOutcome> {
        let mut schedule = SizeSchedule::from_config(&self.config);
        let mut reports = Vec::new();
        let mut pass = 0;

        let stop = loop {
            let size = schedule.test_size();
            info!(
                pass,
                size = %Grouped(size),
                workers = self.executor.workers(),
                "starting pass"
            );

            let report = self.measure(pass, size)?;
            out.write_all(report.render().as_bytes())?;
            out.flush()?;
            for warning in report.warnings() {
                warn!(pass, "{}", warning);
            }

            check_pass(&self.config, &report)?;

            schedule.advance();
            let step = next_step(&self.config, &schedule, &report);
            reports.push(report);
            pass += 1;

            if let Some(stop) = step {
                break stop;
            }
        };

        info!(passes = reports.len(), ?stop, "benchmark finished");
        Ok(BenchOutcome { reports, stop })
    }

    /// [`run`](Self::run) against stdout
    pub fn run_stdout(&mut self) -> Result<BenchOutcome> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.run(&mut lock)
    }
}
