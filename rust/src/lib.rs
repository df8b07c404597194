//! # Membench
//!
//! Single-threaded bulk `memset`/`memcpy` against multithreaded element-wise
//! fill/copy, over a geometrically growing range of buffer sizes.
//!
//! ```rust
//! use membench::{average, pretty_num};
//!
//! let bulk_set_ns = [1_200_000, 1_250_000, 1_190_000];
//! let mean = average(&bulk_set_ns).unwrap();
//! assert_eq!(pretty_num(mean), "1,213,333");
//! ```
//!
//! The benchmark loop itself lives in `driver`, behind the default
//! `parallel` feature.

pub mod buffers;
pub mod config;
pub mod error;
pub mod format;
pub mod ops;
pub mod report;
pub mod stats;
pub mod timing;
pub mod workers;

#[cfg(feature = "parallel")]
pub mod driver;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use buffers::BufferPair;
pub use config::{BenchConfig, EscalationRule, DEFAULT_BASE_SIZE, SIZE_CEILING};
pub use error::{Error, Result};
pub use format::{pretty_num, Grouped};
pub use ops::{bulk_copy, bulk_set};
pub use report::SizeReport;
pub use stats::{average, Means, Trials};
pub use timing::{tick, time_ns, Nanos};
pub use workers::{worker_count, WorkerPolicy};

#[cfg(feature = "parallel")]
pub use driver::{check_pass, next_step, BenchOutcome, MemoryBenchmark, SizeSchedule, StopReason};
#[cfg(feature = "parallel")]
pub use parallel::{Backend, Executor};

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_test_writer()
        .try_init();
}
