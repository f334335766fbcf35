//! Explicit clock context for cycle to time conversion.

use serde::{Deserialize, Serialize};

use roofline_core::constants::MS_PER_SEC;

use super::timer::counter_frequency_hz;
use crate::error::ConfigError;

/// Environment variable overriding the detected counter frequency (Hz).
pub const CPU_FREQ_ENV: &str = "ROOFLINE_CPU_FREQ";

/// Read-only clock information consumed by the sampling engine.
///
/// Each sampler owns its own copy, so engines running on different threads
/// share nothing mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockContext {
    cpu_freq_hz: u64,
}

impl ClockContext {
    /// Create a context for a counter ticking at `cpu_freq_hz`.
    ///
    /// # Panics
    ///
    /// Panics if `cpu_freq_hz` is zero.
    pub fn new(cpu_freq_hz: u64) -> Self {
        assert!(cpu_freq_hz > 0, "cpu_freq_hz must be positive");
        Self { cpu_freq_hz }
    }

    /// Create a context from the detected frequency of the platform counter.
    pub fn detect() -> Self {
        Self::new(counter_frequency_hz())
    }

    /// Use `ROOFLINE_CPU_FREQ` if set, otherwise detect.
    pub fn from_env_or_detect() -> Result<Self, ConfigError> {
        Self::from_lookup_or_detect(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env_or_detect`](Self::from_env_or_detect) against an
    /// arbitrary variable lookup.
    pub fn from_lookup_or_detect<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(CPU_FREQ_ENV) else {
            return Ok(Self::detect());
        };

        let invalid = |reason: String| ConfigError::InvalidEnv {
            var: CPU_FREQ_ENV,
            value: raw.clone(),
            reason,
        };
        // Accept plain Hz as well as scientific notation such as 2.4e9.
        let hz = match raw.trim().parse::<u64>() {
            Ok(hz) => hz,
            Err(_) => match raw.trim().parse::<f64>() {
                Ok(hz) if hz.is_finite() && hz >= 1.0 && hz <= u64::MAX as f64 => hz as u64,
                Ok(_) => return Err(invalid("frequency out of range".to_string())),
                Err(e) => return Err(invalid(e.to_string())),
            },
        };
        if hz == 0 {
            return Err(invalid("frequency must be positive".to_string()));
        }
        Ok(Self::new(hz))
    }

    /// Counter frequency in Hz.
    #[inline]
    pub fn cpu_freq_hz(&self) -> u64 {
        self.cpu_freq_hz
    }

    /// Convert a cycle count to whole milliseconds, truncating.
    #[inline]
    pub fn cycles_to_ms(&self, cycles: u64) -> u64 {
        let ms = cycles as u128 * MS_PER_SEC as u128 / self.cpu_freq_hz as u128;
        ms.min(u64::MAX as u128) as u64
    }

    /// Convert a cycle count to nanoseconds.
    #[inline]
    pub fn cycles_to_ns(&self, cycles: u64) -> f64 {
        cycles as f64 * 1e9 / self.cpu_freq_hz as f64
    }
}
