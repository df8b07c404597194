//! Benchmark configuration
//!
//! Replaces a process-wide "performance run" switch with a value handed to
//! the benchmark when it is constructed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
#[cfg(feature = "parallel")]
use crate::parallel::Backend;

/// First base size; the first tested buffer is twice this
pub const DEFAULT_BASE_SIZE: u64 = 100_000;
/// Escalation stops once the base exceeds one billion bytes
pub const SIZE_CEILING: u64 = 1_000_000_000;
pub const DEFAULT_TRIALS: usize = 5;
pub const DEFAULT_MULTIPLIER: u64 = 10;

/// How the set-time and copy-time comparisons combine when deciding whether
/// to escalate to the next size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationRule {
    /// Continue while either bulk operation still beats its parallel counterpart
    #[default]
    AnyBulkFaster,
    /// Continue only while both bulk operations beat their parallel counterparts
    AllBulkFaster,
}

impl EscalationRule {
    pub fn should_continue(&self, set_bulk_faster: bool, copy_bulk_faster: bool) -> bool {
        match self {
            EscalationRule::AnyBulkFaster => set_bulk_faster || copy_bulk_faster,
            EscalationRule::AllBulkFaster => set_bulk_faster && copy_bulk_faster,
        }
    }
}

impl std::str::FromStr for EscalationRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "any_bulk_faster" => Ok(EscalationRule::AnyBulkFaster),
            "all" | "all_bulk_faster" => Ok(EscalationRule::AllBulkFaster),
            other => Err(Error::Config(format!("unknown escalation rule '{}'", other))),
        }
    }
}

/// Benchmark settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Escalate past the first size. Off by default: one pass only.
    pub performance_run: bool,
    pub base_size: u64,
    pub ceiling: u64,
    pub size_multiplier: u64,
    /// Timed trials per size
    pub trials: usize,
    /// Override for the half-capacity worker policy
    pub workers: Option<usize>,
    #[cfg(feature = "parallel")]
    pub backend: Backend,
    pub escalation: EscalationRule,
    /// Fail the first pass if a bulk operation is slower than its parallel one
    pub enforce_baseline: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            performance_run: false,
            base_size: DEFAULT_BASE_SIZE,
            ceiling: SIZE_CEILING,
            size_multiplier: DEFAULT_MULTIPLIER,
            trials: DEFAULT_TRIALS,
            workers: None,
            #[cfg(feature = "parallel")]
            backend: Backend::default(),
            escalation: EscalationRule::default(),
            enforce_baseline: true,
        }
    }
}

impl BenchConfig {
    /// Defaults overridden by `MEMBENCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("MEMBENCH_PERFORMANCE_RUN") {
            config.performance_run = parse_bool("MEMBENCH_PERFORMANCE_RUN", &v)?;
        }
        if let Some(v) = lookup("MEMBENCH_TRIALS") {
            config.trials = parse_num("MEMBENCH_TRIALS", &v)?;
        }
        if let Some(v) = lookup("MEMBENCH_WORKERS") {
            config.workers = Some(parse_num("MEMBENCH_WORKERS", &v)?);
        }
        #[cfg(feature = "parallel")]
        if let Some(v) = lookup("MEMBENCH_BACKEND") {
            config.backend = v.parse()?;
        }
        if let Some(v) = lookup("MEMBENCH_ESCALATION") {
            config.escalation = v.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::Config("trials must be at least 1".into()));
        }
        if self.base_size == 0 {
            return Err(Error::Config("base_size must be non-zero".into()));
        }
        if self.size_multiplier < 2 {
            return Err(Error::Config("size_multiplier must be at least 2".into()));
        }
        if self.base_size > self.ceiling {
            return Err(Error::Config(format!(
                "base_size {} exceeds ceiling {}",
                self.base_size, self.ceiling
            )));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!(
            "{}: expected a boolean, got '{}'",
            key, other
        ))),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{}: expected a number, got '{}'", key, value)))
}
