//! Default sampling constants.

/// Default number of kernel invocations per repeated measurement.
pub const DEFAULT_REPEAT: usize = 16;

/// Default calibration target in milliseconds.
///
/// A single kernel invocation is scaled until it lasts at least this long.
pub const DEFAULT_MIN_DURATION_MS: u64 = 1;

/// Default floor for the calibrated loop repeat.
pub const DEFAULT_MIN_LOOP_REPEAT: u64 = 1;

/// Milliseconds per second, used for cycle to millisecond conversion.
pub const MS_PER_SEC: u64 = 1_000;
