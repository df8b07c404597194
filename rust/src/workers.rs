//! How many workers the parallel path gets
//!
//! The parallel variants are deliberately given half of the host's logical
//! CPUs so the comparison reflects capacity that is realistically free.

/// Worker count derived from a host capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPolicy {
    capacity: usize,
}

impl WorkerPolicy {
    /// Policy for the current host (`num_cpus::get()` logical CPUs)
    pub fn host() -> Self {
        Self::from_capacity(num_cpus::get())
    }

    /// Policy for an arbitrary capacity, e.g. a simulated single-CPU host
    pub fn from_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Half the capacity, rounded down. Zero means run serially.
    pub fn workers(&self) -> usize {
        self.capacity >> 1
    }
}

/// Workers for the parallel path on this host
pub fn worker_count() -> usize {
    WorkerPolicy::host().workers()
}
