//! Aggregation of trial measurements

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timing::Nanos;

/// Arithmetic mean of a measurement series, rounded down.
///
/// Each element is divided by the count before summing so large sums never
/// overflow. The per-element remainders are carried and folded in at the end,
/// which keeps the result equal to `floor(sum / len)` and therefore inside
/// `[min, max]`.
pub fn average(series: &[Nanos]) -> Result<Nanos> {
    if series.is_empty() {
        return Err(Error::EmptySeries);
    }
    let n = series.len() as u64;

    let mut avg: u64 = 0;
    let mut carry: u64 = 0;
    for &value in series {
        avg += value / n;
        carry += value % n;
        // Keep carry below n so it cannot overflow on long series
        avg += carry / n;
        carry %= n;
    }
    Ok(avg)
}

/// The four measurement series collected for one buffer size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trials {
    pub bulk_set: Vec<Nanos>,
    pub parallel_set: Vec<Nanos>,
    pub bulk_copy: Vec<Nanos>,
    pub parallel_copy: Vec<Nanos>,
}

/// Mean of each series in a [`Trials`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Means {
    pub bulk_set: Nanos,
    pub parallel_set: Nanos,
    pub bulk_copy: Nanos,
    pub parallel_copy: Nanos,
}

impl Trials {
    pub fn with_capacity(trials: usize) -> Self {
        Self {
            bulk_set: Vec::with_capacity(trials),
            parallel_set: Vec::with_capacity(trials),
            bulk_copy: Vec::with_capacity(trials),
            parallel_copy: Vec::with_capacity(trials),
        }
    }

    pub fn clear(&mut self) {
        self.bulk_set.clear();
        self.parallel_set.clear();
        self.bulk_copy.clear();
        self.parallel_copy.clear();
    }

    pub fn len(&self) -> usize {
        self.bulk_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bulk_set.is_empty()
    }

    pub fn means(&self) -> Result<Means> {
        Ok(Means {
            bulk_set: average(&self.bulk_set)?,
            parallel_set: average(&self.parallel_set)?,
            bulk_copy: average(&self.bulk_copy)?,
            parallel_copy: average(&self.parallel_copy)?,
        })
    }
}
