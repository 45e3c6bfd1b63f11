//! Timing engine: run a kernel back-to-back and measure process CPU time.

use std::time::Duration;

use tracing::{trace, warn};

use crate::core::TimingSample;
use crate::kernel::Kernel;
use crate::workspace::Workspace;

/// Source of cumulative CPU time for the current process.
pub trait CpuClock {
    fn cpu_time(&self) -> Duration;
}

/// User + system CPU time of the whole process, including kernel worker
/// threads, read with `getrusage(RUSAGE_SELF)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCpuClock;

#[cfg(unix)]
fn timeval_to_duration(tv: libc::timeval) -> Duration {
    Duration::from_secs(tv.tv_sec as u64) + Duration::from_micros(tv.tv_usec as u64)
}

impl CpuClock for ProcessCpuClock {
    #[cfg(unix)]
    fn cpu_time(&self) -> Duration {
        // SAFETY: rusage is a plain-old-data struct; all-zero bytes are a valid value.
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        // SAFETY: RUSAGE_SELF writes into a stack-allocated struct we own.
        let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
        if ret != 0 {
            warn!(errno = ?std::io::Error::last_os_error(), "getrusage failed");
            return Duration::ZERO;
        }
        timeval_to_duration(usage.ru_utime) + timeval_to_duration(usage.ru_stime)
    }

    // No portable process CPU clock; fall back to monotonic wall time.
    #[cfg(not(unix))]
    fn cpu_time(&self) -> Duration {
        use std::sync::OnceLock;
        use std::time::Instant;
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        EPOCH.get_or_init(Instant::now).elapsed()
    }
}

/// Invoke `kernel` exactly `loops` times on the same workspace and return a
/// single sample covering all of them.
///
/// Later iterations see whatever earlier ones left in `ws`; this measures
/// steady-state repeated-call cost. The caller guarantees `loops >= 1`.
pub fn time_op(kernel: &dyn Kernel, ws: &mut Workspace, loops: u32, clock: &dyn CpuClock) -> TimingSample {
    let start = clock.cpu_time();
    for _ in 0..loops {
        kernel.run(ws);
    }
    let end = clock.cpu_time();

    let elapsed = end.saturating_sub(start);
    trace!(kernel = kernel.name(), loops, ?elapsed, "timed kernel");
    TimingSample {
        iterations: loops,
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    }
}
