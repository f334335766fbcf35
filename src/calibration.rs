//! Loop-repeat calibration.
//!
//! Finds how many kernel repetitions make one invocation last at least a
//! target duration. Three regimes drive the search:
//!
//! - **Unmeasurable** (run rounds to 0 ms): double the loop repeat.
//! - **Far from target** (target / elapsed ≥ 2): scale by the truncated ratio,
//!   landing close to the target in one step for linear kernels.
//! - **Near target** (ratio truncates to 1): add one repetition.
//!
//! The search assumes run time is non-decreasing and roughly linear in the
//! loop repeat. Kernels that violate this may need many rounds, so
//! [`CalibrationLimits`] can bound the search.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use roofline_core::{SampleInput, SampleRecord};

use crate::error::{SamplingError, SamplingResult};
use crate::kernel::Kernel;
use crate::measurement::ClockContext;

/// Bounds on the calibration search. Both `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibrationLimits {
    /// Maximum kernel invocations.
    pub max_rounds: Option<usize>,
    /// Maximum wall-clock time spent calibrating.
    pub time_budget: Option<Duration>,
}

impl CalibrationLimits {
    /// No bounds: calibration runs until the target is reached.
    pub const UNBOUNDED: Self = Self {
        max_rounds: None,
        time_budget: None,
    };
}

/// Outcome of a successful calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calibration {
    /// Calibrated loop repeat, already clamped to the floor.
    pub loop_repeat: u64,
    /// Duration of the last calibration run in milliseconds.
    pub elapsed_ms: u64,
    /// Kernel invocations performed.
    pub rounds: usize,
}

/// Set `input.loop_repeat` so one kernel run lasts at least `ms_dur`
/// milliseconds, never below `min_rep`.
///
/// Starts from a loop repeat of 1 and adjusts it after every run until a run
/// reaches the target. The returned `elapsed_ms` is the duration of that last
/// run. `input.loop_repeat` holds the clamped result on return, including
/// when a limit stops the search early.
///
/// # Errors
///
/// [`SamplingError::CalibrationRoundsExceeded`] or
/// [`SamplingError::CalibrationTimeout`] when a bound in `limits` is hit
/// before the target is reached, and [`SamplingError::CalibrationSaturated`]
/// when a run at `u64::MAX` repetitions still falls short of it.
pub fn autoset_loop_repeat<K>(
    kernel: &mut K,
    input: &mut SampleInput<'_>,
    ms_dur: u64,
    min_rep: u64,
    clock: &ClockContext,
    limits: &CalibrationLimits,
) -> SamplingResult<Calibration>
where
    K: Kernel + ?Sized,
{
    let started = Instant::now();
    let mut out = SampleRecord::new();
    let mut elapsed_ms = 0u64;
    let mut rounds = 0usize;

    input.loop_repeat = 1;

    while elapsed_ms < ms_dur {
        if let Some(max_rounds) = limits.max_rounds {
            if rounds >= max_rounds {
                input.loop_repeat = input.loop_repeat.max(min_rep);
                tracing::warn!(
                    rounds,
                    loop_repeat = input.loop_repeat,
                    elapsed_ms,
                    target_ms = ms_dur,
                    "calibration round limit reached"
                );
                return Err(SamplingError::CalibrationRoundsExceeded {
                    rounds,
                    target_ms: ms_dur,
                    loop_repeat: input.loop_repeat,
                    elapsed_ms,
                });
            }
        }
        if let Some(budget) = limits.time_budget {
            if started.elapsed() >= budget {
                input.loop_repeat = input.loop_repeat.max(min_rep);
                tracing::warn!(
                    rounds,
                    loop_repeat = input.loop_repeat,
                    elapsed_ms,
                    target_ms = ms_dur,
                    "calibration time budget exhausted"
                );
                return Err(SamplingError::CalibrationTimeout {
                    rounds,
                    budget_ms: budget.as_millis(),
                    loop_repeat: input.loop_repeat,
                    elapsed_ms,
                });
            }
        }

        out.clear();
        kernel.run(input, &mut out);
        rounds += 1;
        elapsed_ms = clock.cycles_to_ms(out.duration_cycles());

        tracing::debug!(
            round = rounds,
            loop_repeat = input.loop_repeat,
            elapsed_ms,
            "calibration run"
        );

        if elapsed_ms < ms_dur && input.loop_repeat == u64::MAX {
            tracing::warn!(
                rounds,
                elapsed_ms,
                target_ms = ms_dur,
                "calibration loop repeat saturated"
            );
            return Err(SamplingError::CalibrationSaturated {
                rounds,
                target_ms: ms_dur,
                elapsed_ms,
            });
        }

        input.loop_repeat = next_loop_repeat(input.loop_repeat, elapsed_ms, ms_dur);
    }

    input.loop_repeat = input.loop_repeat.max(min_rep);

    tracing::info!(
        loop_repeat = input.loop_repeat,
        elapsed_ms,
        rounds,
        "calibration converged"
    );

    Ok(Calibration {
        loop_repeat: input.loop_repeat,
        elapsed_ms,
        rounds,
    })
}

/// Loop repeat for the next round given the last run's duration.
///
/// Returns `current` unchanged once the target is met.
fn next_loop_repeat(current: u64, elapsed_ms: u64, target_ms: u64) -> u64 {
    if elapsed_ms == 0 {
        return current.saturating_mul(2);
    }
    if elapsed_ms >= target_ms {
        return current;
    }
    match target_ms / elapsed_ms {
        0 | 1 => current.saturating_add(1),
        multiplier => current.saturating_mul(multiplier),
    }
}
