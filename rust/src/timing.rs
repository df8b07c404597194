//! Monotonic nanosecond clock used around every timed section

use std::sync::OnceLock;
use std::time::Instant;

/// Elapsed time in nanoseconds
pub type Nanos = u64;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Nanoseconds since the first call in this process.
///
/// Backed by `Instant`, so it never goes backwards. A u64 of nanoseconds
/// covers several centuries, so there is no wraparound within a run.
#[inline]
pub fn tick() -> Nanos {
    let epoch = *EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_nanos() as Nanos
}

/// Run `f` between two ticks and return its result with the elapsed time
#[inline]
pub fn time_ns<T>(f: impl FnOnce() -> T) -> (T, Nanos) {
    let start = tick();
    let out = f();
    let elapsed = tick().saturating_sub(start);
    (out, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_monotonic() {
        let mut last = tick();
        for _ in 0..10_000 {
            let now = tick();
            assert!(now >= last, "clock went backwards: {} < {}", now, last);
            last = now;
        }
    }

    #[test]
    fn test_time_ns_measures_sleep() {
        let (value, elapsed) = time_ns(|| {
            std::thread::sleep(std::time::Duration::from_millis(2));
            7
        });
        assert_eq!(value, 7);
        assert!(elapsed >= 2_000_000, "elapsed {} ns", elapsed);
    }
}
