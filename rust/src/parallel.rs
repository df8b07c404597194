//! Multithreaded element-wise fill and copy
//!
//! The region is split into one contiguous range per worker and every range is
//! handed to the pool as an independent task. All tasks are joined before a
//! call returns, so a timed section never overlaps the next one.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which threading primitive runs the range-partitioned tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Dedicated rayon pool with exactly `workers` threads, built once
    #[default]
    Rayon,
    /// Fresh crossbeam scoped threads per call, one per range
    Scoped,
}

impl std::str::FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rayon" => Ok(Backend::Rayon),
            "scoped" | "crossbeam" => Ok(Backend::Scoped),
            other => Err(Error::Config(format!("unknown backend '{}'", other))),
        }
    }
}

enum Kind {
    Serial,
    Rayon(rayon::ThreadPool),
    Scoped,
}

/// Bounded worker pool for the parallel variants
pub struct Executor {
    workers: usize,
    kind: Kind,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Kind::Serial => "serial",
            Kind::Rayon(_) => "rayon",
            Kind::Scoped => "scoped",
        };
        f.debug_struct("Executor")
            .field("workers", &self.workers)
            .field("kind", &kind)
            .finish()
    }
}

impl Executor {
    /// Build an executor with `workers` threads.
    ///
    /// Zero workers (e.g. a single-CPU host under the half-capacity policy)
    /// falls back to running the same element-wise loop on the calling thread.
    pub fn new(workers: usize, backend: Backend) -> Result<Self> {
        if workers == 0 {
            return Ok(Self::serial());
        }
        let kind = match backend {
            Backend::Rayon => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("membench-worker-{}", i))
                    .build()?;
                Kind::Rayon(pool)
            }
            Backend::Scoped => Kind::Scoped,
        };
        Ok(Self { workers, kind })
    }

    pub fn serial() -> Self {
        Self {
            workers: 0,
            kind: Kind::Serial,
        }
    }

    /// Configured worker count; 0 for the serial fallback
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_serial(&self) -> bool {
        matches!(self.kind, Kind::Serial)
    }

    fn chunk_len(&self, len: usize) -> usize {
        len.div_ceil(self.workers.max(1)).max(1)
    }

    /// Set every byte of `buf` to `value`, one range per worker
    pub fn fill(&self, buf: &mut [u8], value: u8) -> Result<()> {
        let chunk = self.chunk_len(buf.len());
        match &self.kind {
            Kind::Serial => fill_range(buf, value),
            Kind::Rayon(pool) => pool.install(|| {
                buf.par_chunks_mut(chunk)
                    .for_each(|range| fill_range(range, value))
            }),
            Kind::Scoped => crossbeam::scope(|s| {
                for range in buf.chunks_mut(chunk) {
                    s.spawn(move |_| fill_range(range, value));
                }
            })
            .map_err(|_| Error::WorkerPanicked)?,
        }
        Ok(())
    }

    /// Copy `src` into `dest` byte by byte, one range per worker
    pub fn copy(&self, dest: &mut [u8], src: &[u8]) -> Result<()> {
        if dest.len() != src.len() {
            return Err(Error::LengthMismatch {
                src: src.len(),
                dest: dest.len(),
            });
        }
        let chunk = self.chunk_len(dest.len());
        match &self.kind {
            Kind::Serial => copy_range(dest, src),
            Kind::Rayon(pool) => pool.install(|| {
                dest.par_chunks_mut(chunk)
                    .zip(src.par_chunks(chunk))
                    .for_each(|(d, s)| copy_range(d, s))
            }),
            Kind::Scoped => crossbeam::scope(|scope| {
                for (d, s) in dest.chunks_mut(chunk).zip(src.chunks(chunk)) {
                    scope.spawn(move |_| copy_range(d, s));
                }
            })
            .map_err(|_| Error::WorkerPanicked)?,
        }
        Ok(())
    }
}

#[inline]
fn fill_range(range: &mut [u8], value: u8) {
    for byte in range.iter_mut() {
        *byte = value;
    }
}

#[inline]
fn copy_range(dest: &mut [u8], src: &[u8]) {
    for (d, s) in dest.iter_mut().zip(src) {
        *d = *s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 256) as u8).collect()
    }

    #[test]
    fn test_zero_workers_is_serial() {
        let exec = Executor::new(0, Backend::Rayon).unwrap();
        assert!(exec.is_serial());
        assert_eq!(exec.workers(), 0);

        let mut buf = vec![0u8; 1001];
        exec.fill(&mut buf, 9).unwrap();
        assert!(buf.iter().all(|&b| b == 9));
    }

    #[test]
    fn test_fill_all_backends() {
        for backend in [Backend::Rayon, Backend::Scoped] {
            for workers in [1, 2, 3, 8] {
                let exec = Executor::new(workers, backend).unwrap();
                // Lengths that do not divide evenly across workers
                for len in [0, 1, 7, 4096, 100_003] {
                    let mut buf = vec![0xFFu8; len];
                    exec.fill(&mut buf, 42).unwrap();
                    assert!(
                        buf.iter().all(|&b| b == 42),
                        "{:?} workers={} len={}",
                        backend,
                        workers,
                        len
                    );
                }
            }
        }
    }

    #[test]
    fn test_copy_all_backends() {
        for backend in [Backend::Rayon, Backend::Scoped] {
            for workers in [1, 2, 5] {
                let exec = Executor::new(workers, backend).unwrap();
                for len in [0, 3, 65_536, 200_001] {
                    let src = pattern(len);
                    let mut dest = vec![0u8; len];
                    exec.copy(&mut dest, &src).unwrap();
                    assert_eq!(dest, src, "{:?} workers={} len={}", backend, workers, len);
                }
            }
        }
    }

    #[test]
    fn test_copy_length_mismatch() {
        let exec = Executor::new(2, Backend::Scoped).unwrap();
        let src = vec![1u8; 8];
        let mut dest = vec![0u8; 16];
        assert!(matches!(
            exec.copy(&mut dest, &src),
            Err(Error::LengthMismatch { src: 8, dest: 16 })
        ));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("rayon".parse::<Backend>().unwrap(), Backend::Rayon);
        assert_eq!(" Scoped ".parse::<Backend>().unwrap(), Backend::Scoped);
        assert_eq!("crossbeam".parse::<Backend>().unwrap(), Backend::Scoped);
        assert!("openmp".parse::<Backend>().is_err());
    }
}
