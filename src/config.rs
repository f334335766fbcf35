//! Configuration for calibration and repeated sampling.

use std::time::Duration;

use roofline_core::constants::{DEFAULT_MIN_DURATION_MS, DEFAULT_MIN_LOOP_REPEAT, DEFAULT_REPEAT};
use roofline_core::Statistic;

use crate::calibration::CalibrationLimits;
use crate::error::ConfigError;

/// Environment variable overriding [`Config::repeat`].
pub const REPEAT_ENV: &str = "ROOFLINE_REPEAT";
/// Environment variable overriding [`Config::min_duration_ms`].
pub const MIN_DURATION_ENV: &str = "ROOFLINE_MIN_DURATION_MS";
/// Environment variable overriding [`Config::min_loop_repeat`].
pub const MIN_LOOP_REPEAT_ENV: &str = "ROOFLINE_MIN_LOOP_REPEAT";
/// Environment variable overriding [`Config::statistic`].
pub const STATISTIC_ENV: &str = "ROOFLINE_STATISTIC";

/// Default wall-clock budget for one calibration.
pub const DEFAULT_CALIBRATION_BUDGET: Duration = Duration::from_secs(60);

/// What to do when the measurement batch cannot be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationPolicy {
    /// Log and terminate the process through the global allocation error
    /// handler. A run without memory for its batch has no meaningful result.
    #[default]
    Abort,

    /// Return [`SamplingError::BatchAllocation`](crate::SamplingError::BatchAllocation).
    Recoverable,
}

/// Configuration options for [`Sampler`](crate::Sampler).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // =========================================================================
    // Repeated measurement
    // =========================================================================

    /// Kernel invocations per repeated measurement. Default: 16.
    pub repeat: usize,

    /// Strategy picking the representative record. Default: median.
    pub statistic: Statistic,

    /// Behavior when the batch cannot be allocated. Default: abort.
    pub allocation_policy: AllocationPolicy,

    // =========================================================================
    // Calibration
    // =========================================================================

    /// Minimum duration of one calibrated kernel run, in milliseconds.
    /// Default: 1.
    pub min_duration_ms: u64,

    /// Floor for the calibrated loop repeat. Default: 1.
    pub min_loop_repeat: u64,

    /// Maximum kernel invocations during calibration.
    ///
    /// `None` lets calibration run until the target is met. Default: None.
    pub max_calibration_rounds: Option<usize>,

    /// Wall-clock budget for calibration.
    ///
    /// `None` lets calibration run until the target is met. Default: 60 s.
    pub calibration_budget: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repeat: DEFAULT_REPEAT,
            statistic: Statistic::Median,
            allocation_policy: AllocationPolicy::Abort,

            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            min_loop_repeat: DEFAULT_MIN_LOOP_REPEAT,
            max_calibration_rounds: None,
            calibration_budget: Some(DEFAULT_CALIBRATION_BUDGET),
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quick configuration for development.
    ///
    /// - 8 repeats
    /// - 1 ms calibration target
    /// - 10 second calibration budget
    pub fn quick() -> Self {
        Self {
            repeat: 8,
            calibration_budget: Some(Duration::from_secs(10)),
            ..Default::default()
        }
    }

    /// Create a thorough configuration for stable measurements.
    ///
    /// - 32 repeats
    /// - 10 ms calibration target
    /// - 5 minute calibration budget
    pub fn thorough() -> Self {
        Self {
            repeat: 32,
            min_duration_ms: 10,
            calibration_budget: Some(Duration::from_secs(300)),
            ..Default::default()
        }
    }

    /// Defaults overridden by `ROOFLINE_*` environment variables.
    ///
    /// Reads `ROOFLINE_REPEAT`, `ROOFLINE_MIN_DURATION_MS`,
    /// `ROOFLINE_MIN_LOOP_REPEAT` and `ROOFLINE_STATISTIC`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) against an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(repeat) = parse_var::<usize, _>(&lookup, REPEAT_ENV)? {
            config.repeat = repeat;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, MIN_DURATION_ENV)? {
            config.min_duration_ms = ms;
        }
        if let Some(rep) = parse_var::<u64, _>(&lookup, MIN_LOOP_REPEAT_ENV)? {
            config.min_loop_repeat = rep;
        }
        if let Some(stat) = parse_var::<Statistic, _>(&lookup, STATISTIC_ENV)? {
            config.statistic = stat;
        }

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the number of kernel invocations per repeated measurement.
    pub fn repeat(mut self, repeat: usize) -> Self {
        assert!(repeat > 0, "repeat must be positive");
        self.repeat = repeat;
        self
    }

    /// Set the representative statistic.
    pub fn statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = statistic;
        self
    }

    /// Set the allocation failure policy.
    pub fn allocation_policy(mut self, policy: AllocationPolicy) -> Self {
        self.allocation_policy = policy;
        self
    }

    /// Set the calibration target in milliseconds.
    pub fn min_duration_ms(mut self, ms: u64) -> Self {
        assert!(ms > 0, "min_duration_ms must be positive");
        self.min_duration_ms = ms;
        self
    }

    /// Set the floor for the calibrated loop repeat.
    pub fn min_loop_repeat(mut self, floor: u64) -> Self {
        self.min_loop_repeat = floor;
        self
    }

    /// Cap the number of calibration rounds.
    pub fn max_calibration_rounds(mut self, rounds: usize) -> Self {
        assert!(rounds > 0, "max_calibration_rounds must be positive");
        self.max_calibration_rounds = Some(rounds);
        self
    }

    /// Set the calibration wall-clock budget.
    pub fn calibration_budget(mut self, budget: Duration) -> Self {
        self.calibration_budget = Some(budget);
        self
    }

    /// Remove both calibration bounds.
    ///
    /// A kernel whose duration never reaches the target will then keep
    /// calibration looping forever.
    pub fn unbounded_calibration(mut self) -> Self {
        self.max_calibration_rounds = None;
        self.calibration_budget = None;
        self
    }

    // =========================================================================
    // Resolution methods
    // =========================================================================

    /// Calibration bounds derived from this configuration.
    pub fn calibration_limits(&self) -> CalibrationLimits {
        CalibrationLimits {
            max_rounds: self.max_calibration_rounds,
            time_budget: self.calibration_budget,
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeat == 0 {
            return Err(ConfigError::InvalidValue {
                field: "repeat",
                reason: "must be positive",
            });
        }
        if self.min_duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_duration_ms",
                reason: "must be positive",
            });
        }
        if self.max_calibration_rounds == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_calibration_rounds",
                reason: "must be positive when set",
            });
        }
        Ok(())
    }
}

/// Look up `var` and parse it, `Ok(None)` when unset.
fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let parsed = raw.trim().parse::<T>();
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(ConfigError::InvalidEnv {
            var,
            reason: e.to_string(),
            value: raw,
        }),
    }
}
