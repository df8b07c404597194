//! Source/destination buffer pair owned by one benchmark pass

use crate::error::{Error, Result};
use crate::ops::bulk_set;

/// Two equally sized, exclusively owned byte regions.
///
/// Allocated at the start of a pass and released when the pass drops it.
#[derive(Debug)]
pub struct BufferPair {
    pub src: Vec<u8>,
    pub dest: Vec<u8>,
}

impl BufferPair {
    /// Allocate both buffers, zero-filled.
    ///
    /// Uses fallible reservation so a size the host cannot back surfaces as
    /// `Error::Allocation` instead of aborting the process.
    pub fn new(size: usize) -> Result<Self> {
        Ok(Self {
            src: alloc_zeroed(size)?,
            dest: alloc_zeroed(size)?,
        })
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Fill src and dest with different patterns so the next timed operation
    /// cannot reuse what the previous one left in cache
    pub fn poison(&mut self, src_pattern: u8, dest_pattern: u8) {
        bulk_set(&mut self.src, src_pattern);
        bulk_set(&mut self.dest, dest_pattern);
    }

    /// Split into (dest, src) borrows for copy operations
    pub fn split(&mut self) -> (&mut [u8], &[u8]) {
        (&mut self.dest, &self.src)
    }
}

fn alloc_zeroed(size: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| Error::Allocation { size: size as u64 })?;
    buf.resize(size, 0);
    Ok(buf)
}
