//! Per-size results and their human-readable rendering

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::Grouped;
use crate::stats::Means;
use crate::timing::Nanos;

const RULE: &str = "====================================";
const THIN_RULE: &str = "------------------------------------";

/// Aggregated measurements for one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    /// Zero-based pass index; pass 0 is the baseline pass
    pub pass: usize,
    /// Buffer size in bytes
    pub size: u64,
    pub workers: usize,
    pub trials: usize,
    pub means: Means,
}

impl SizeReport {
    /// Bulk memset took longer on average than the parallel fill
    pub fn bulk_set_slower(&self) -> bool {
        self.means.bulk_set > self.means.parallel_set
    }

    /// Bulk memcpy took longer on average than the parallel copy
    pub fn bulk_copy_slower(&self) -> bool {
        self.means.bulk_copy > self.means.parallel_copy
    }

    pub fn bulk_set_faster(&self) -> bool {
        self.means.bulk_set < self.means.parallel_set
    }

    pub fn bulk_copy_faster(&self) -> bool {
        self.means.bulk_copy < self.means.parallel_copy
    }

    /// Bulk operations must not be slower than the parallel ones
    pub fn check_baseline(&self) -> Result<()> {
        if self.bulk_set_slower() {
            return Err(Error::BaselineViolated {
                size: self.size,
                op: "memset",
                bulk: self.means.bulk_set,
                parallel: self.means.parallel_set,
            });
        }
        if self.bulk_copy_slower() {
            return Err(Error::BaselineViolated {
                size: self.size,
                op: "memcpy",
                bulk: self.means.bulk_copy,
                parallel: self.means.parallel_copy,
            });
        }
        Ok(())
    }

    /// Warning lines for every bulk operation that lost to its parallel counterpart
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.bulk_set_slower() {
            out.push(format!("<< MEMSET SLOWER FOR {} items >>", Grouped(self.size)));
        }
        if self.bulk_copy_slower() {
            out.push(format!("<< MEMCPY SLOWER FOR {} items >>", Grouped(self.size)));
        }
        out
    }

    /// Full text block for this pass. Pure: same report, same text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn timing_line(&self, f: &mut fmt::Formatter<'_>, label: &str, ns: Nanos) -> fmt::Result {
        write!(f, "{:<20}{} ns", label, Grouped(ns))?;
        if ns > 0 {
            write!(f, " ({:.2} bytes/ns)", self.size as f64 / ns as f64)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "Data size: {} (pass {}, {} workers, {} trials)",
            Grouped(self.size),
            self.pass,
            self.workers,
            self.trials
        )?;
        self.timing_line(f, "memset time:", self.means.bulk_set)?;
        self.timing_line(f, "parallel set time:", self.means.parallel_set)?;
        writeln!(f)?;
        self.timing_line(f, "memcpy time:", self.means.bulk_copy)?;
        self.timing_line(f, "parallel copy time:", self.means.parallel_copy)?;
        writeln!(f, "{}", THIN_RULE)?;
        for warning in self.warnings() {
            writeln!(f, "{}", warning)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(
        bulk_set: u64,
        parallel_set: u64,
        bulk_copy: u64,
        parallel_copy: u64,
    ) -> SizeReport {
        SizeReport {
            pass: 0,
            size: 200_000,
            workers: 4,
            trials: 5,
            means: Means {
                bulk_set,
                parallel_set,
                bulk_copy,
                parallel_copy,
            },
        }
    }

    #[test]
    fn test_render_contains_grouped_numbers() {
        let text = report(12_345, 67_890, 2_000, 1_234_567).render();
        assert!(text.contains("Data size: 200,000"));
        assert!(text.contains("memset time:        12,345 ns"));
        assert!(text.contains("parallel copy time: 1,234,567 ns"));
        assert!(!text.contains("SLOWER"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = report(500, 400, 300, 300);
        assert_eq!(r.render(), r.render());
    }

    #[test]
    fn test_warnings_when_bulk_slower() {
        let r = report(500, 400, 300, 100);
        assert_eq!(
            r.warnings(),
            vec![
                "<< MEMSET SLOWER FOR 200,000 items >>".to_string(),
                "<< MEMCPY SLOWER FOR 200,000 items >>".to_string(),
            ]
        );
        assert!(r.render().contains("<< MEMCPY SLOWER FOR 200,000 items >>"));
    }

    #[test]
    fn test_check_baseline() {
        assert!(report(100, 200, 100, 200).check_baseline().is_ok());
        // Ties satisfy the baseline
        assert!(report(100, 100, 100, 100).check_baseline().is_ok());

        let err = report(300, 200, 100, 200).check_baseline().unwrap_err();
        assert!(matches!(
            err,
            Error::BaselineViolated {
                op: "memset",
                bulk: 300,
                parallel: 200,
                ..
            }
        ));

        let err = report(100, 200, 900, 200).check_baseline().unwrap_err();
        assert!(matches!(err, Error::BaselineViolated { op: "memcpy", .. }));

        // Sizes past u32::MAX keep their exact value in the error
        let mut huge = report(300, 200, 100, 200);
        huge.size = 5_000_000_000;
        let err = huge.check_baseline().unwrap_err();
        assert!(matches!(err, Error::BaselineViolated { size: 5_000_000_000, .. }));
    }

    #[test]
    fn test_zero_mean_skips_throughput() {
        let text = report(0, 1, 1, 1).render();
        assert!(text.contains("memset time:        0 ns\n"));
    }

    #[test]
    fn test_json_shape() {
        let json = report(1, 2, 3, 4).to_json().unwrap();
        let back: SizeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.means.parallel_copy, 4);
        assert_eq!(back.size, 200_000);
    }
}
