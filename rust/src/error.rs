//! Error type for the benchmark harness

use thiserror::Error;

/// Errors raised while preparing, running or checking a benchmark pass
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot average an empty measurement series")]
    EmptySeries,

    #[error("buffer length mismatch: src {src} bytes, dest {dest} bytes")]
    LengthMismatch { src: usize, dest: usize },

    #[error("failed to allocate {size} byte buffer")]
    Allocation { size: u64 },

    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("a worker thread panicked")]
    WorkerPanicked,

    #[error("{op} baseline violated at {size} bytes: bulk {bulk} ns > parallel {parallel} ns")]
    BaselineViolated {
        size: u64,
        op: &'static str,
        bulk: u64,
        parallel: u64,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
