//! Error types for calibration and repeated sampling.

use std::collections::TryReserveError;

/// Error returned when a configuration value is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("invalid configuration: {field} {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// What the field must satisfy.
        reason: &'static str,
    },

    /// An environment variable could not be parsed.
    #[error("environment variable {var}={value:?} is invalid: {reason}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value as read.
        value: String,
        /// Parse failure description.
        reason: String,
    },
}

/// Error returned by calibration or repeated sampling.
#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    /// The sampler was handed an invalid configuration.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// A batch of zero records was requested.
    #[error("repeated measurement requires at least one kernel run")]
    EmptyBatch,

    /// A kernel was asked to run zero repetitions.
    #[error("loop_repeat must be at least 1")]
    ZeroLoopRepeat,

    /// The measurement batch could not be allocated.
    ///
    /// Only returned under [`AllocationPolicy::Recoverable`](crate::AllocationPolicy::Recoverable);
    /// the default policy terminates the process instead.
    #[error("failed to allocate a batch of {requested} sample records")]
    BatchAllocation {
        /// Number of records requested.
        requested: usize,
        /// Underlying allocator error.
        #[source]
        source: TryReserveError,
    },

    /// Calibration ran its maximum number of kernel invocations without
    /// reaching the target duration.
    #[error(
        "calibration did not reach {target_ms} ms after {rounds} rounds \
         (loop_repeat={loop_repeat}, last run {elapsed_ms} ms)"
    )]
    CalibrationRoundsExceeded {
        /// Kernel invocations performed.
        rounds: usize,
        /// Requested duration.
        target_ms: u64,
        /// Loop repeat after the last adjustment, clamped to the floor.
        loop_repeat: u64,
        /// Duration of the last run.
        elapsed_ms: u64,
    },

    /// The loop repeat saturated at `u64::MAX` without reaching the target
    /// duration.
    #[error(
        "calibration did not reach {target_ms} ms with loop_repeat at u64::MAX \
         after {rounds} rounds (last run {elapsed_ms} ms)"
    )]
    CalibrationSaturated {
        /// Kernel invocations performed.
        rounds: usize,
        /// Requested duration.
        target_ms: u64,
        /// Duration of the last run.
        elapsed_ms: u64,
    },

    /// Calibration exhausted its wall-clock budget.
    #[error(
        "calibration exceeded its {budget_ms} ms budget after {rounds} rounds \
         (loop_repeat={loop_repeat}, last run {elapsed_ms} ms)"
    )]
    CalibrationTimeout {
        /// Kernel invocations performed.
        rounds: usize,
        /// Budget in milliseconds.
        budget_ms: u128,
        /// Loop repeat after the last adjustment, clamped to the floor.
        loop_repeat: u64,
        /// Duration of the last run.
        elapsed_ms: u64,
    },
}

/// Result type for sampling operations.
pub type SamplingResult<T> = Result<T, SamplingError>;
