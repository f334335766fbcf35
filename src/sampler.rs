//! Repeated measurement and reduction to a representative record.

use std::alloc::Layout;

use serde::{Deserialize, Serialize};

use roofline_core::{throughput_std_dev, SampleInput, SampleRecord, Statistic};

use crate::calibration::{autoset_loop_repeat, Calibration};
use crate::config::{AllocationPolicy, Config};
use crate::error::{SamplingError, SamplingResult};
use crate::kernel::Kernel;
use crate::measurement::ClockContext;

/// Representative measurement of a repeated batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchResult {
    /// Record picked by the statistic.
    pub sample: SampleRecord,
    /// Sample standard deviation of throughput across the whole batch.
    pub std_dev: f64,
    /// Loop repeat the batch was measured at.
    pub loop_repeat: u64,
    /// Number of kernel runs in the batch.
    pub repeat: usize,
}

/// Run `kernel` exactly `repeat` times at the fixed `input.loop_repeat` and
/// reduce the batch.
///
/// Each run gets a freshly cleared record. `statistic` picks the
/// representative record; the standard deviation covers every record in the
/// batch. The batch is dropped before returning.
///
/// # Errors
///
/// [`SamplingError::EmptyBatch`] if `repeat` is zero,
/// [`SamplingError::ZeroLoopRepeat`] if `input.loop_repeat` is zero, and
/// [`SamplingError::BatchAllocation`] if the batch cannot be allocated under
/// [`AllocationPolicy::Recoverable`]. Under [`AllocationPolicy::Abort`] an
/// allocation failure terminates the process.
pub fn repeat_bench<K>(
    kernel: &mut K,
    input: &mut SampleInput<'_>,
    statistic: Statistic,
    repeat: usize,
    policy: AllocationPolicy,
) -> SamplingResult<BenchResult>
where
    K: Kernel + ?Sized,
{
    if repeat == 0 {
        return Err(SamplingError::EmptyBatch);
    }
    if input.loop_repeat == 0 {
        return Err(SamplingError::ZeroLoopRepeat);
    }

    let mut samples = allocate_batch(repeat, policy)?;
    for _ in 0..repeat {
        let mut record = SampleRecord::new();
        kernel.run(input, &mut record);
        samples.push(record);
    }

    let std_dev = throughput_std_dev(&samples);
    let idx = statistic.select(&mut samples);
    let sample = samples[idx];

    tracing::debug!(
        %statistic,
        index = idx,
        repeat,
        loop_repeat = input.loop_repeat,
        throughput = sample.throughput(),
        std_dev,
        "batch reduced"
    );

    Ok(BenchResult {
        sample,
        std_dev,
        loop_repeat: input.loop_repeat,
        repeat,
    })
}

/// Reserve room for `n` records, applying the allocation policy on failure.
fn allocate_batch(n: usize, policy: AllocationPolicy) -> SamplingResult<Vec<SampleRecord>> {
    let mut samples = Vec::new();
    if let Err(source) = samples.try_reserve_exact(n) {
        match policy {
            AllocationPolicy::Abort => {
                tracing::error!(
                    requested = n,
                    "failed to allocate measurement batch, aborting"
                );
                let layout = Layout::array::<SampleRecord>(n)
                    .unwrap_or_else(|_| Layout::new::<SampleRecord>());
                std::alloc::handle_alloc_error(layout);
            }
            AllocationPolicy::Recoverable => {
                return Err(SamplingError::BatchAllocation {
                    requested: n,
                    source,
                });
            }
        }
    }
    Ok(samples)
}

/// Sampling engine bound to one configuration and clock.
///
/// A sampler holds no mutable state, so one instance per thread is the
/// intended way to measure in parallel.
///
/// # Example
///
/// ```
/// use roofline::{ClockContext, Config, LoadKernel, SampleInput, Sampler};
///
/// let sampler = Sampler::new(Config::quick(), ClockContext::detect());
/// let mut stream = vec![1.0f64; 4096];
/// let mut input = SampleInput::new(&mut stream);
///
/// let result = sampler.measure(&mut LoadKernel, &mut input).unwrap();
/// assert_eq!(result.repeat, 8);
/// assert!(result.loop_repeat >= 1);
/// assert_eq!(result.sample.bytes, result.loop_repeat * 4096 * 8);
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    config: Config,
    clock: ClockContext,
}

impl Sampler {
    /// Create a sampler.
    pub fn new(config: Config, clock: ClockContext) -> Self {
        Self { config, clock }
    }

    /// Create a sampler from `ROOFLINE_*` environment variables, detecting
    /// the clock unless `ROOFLINE_CPU_FREQ` is set.
    pub fn from_env() -> SamplingResult<Self> {
        let config = Config::from_env()?;
        let clock = ClockContext::from_env_or_detect()?;
        Ok(Self::new(config, clock))
    }

    /// The sampler's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The sampler's clock.
    pub fn clock(&self) -> &ClockContext {
        &self.clock
    }

    /// Calibrate `input.loop_repeat` against the configured target and floor.
    pub fn calibrate<K>(
        &self,
        kernel: &mut K,
        input: &mut SampleInput<'_>,
    ) -> SamplingResult<Calibration>
    where
        K: Kernel + ?Sized,
    {
        self.config.validate()?;
        autoset_loop_repeat(
            kernel,
            input,
            self.config.min_duration_ms,
            self.config.min_loop_repeat,
            &self.clock,
            &self.config.calibration_limits(),
        )
    }

    /// Run a repeated measurement at the current `input.loop_repeat`.
    pub fn repeat_bench<K>(
        &self,
        kernel: &mut K,
        input: &mut SampleInput<'_>,
        statistic: Statistic,
    ) -> SamplingResult<BenchResult>
    where
        K: Kernel + ?Sized,
    {
        self.config.validate()?;
        repeat_bench(
            kernel,
            input,
            statistic,
            self.config.repeat,
            self.config.allocation_policy,
        )
    }

    /// Calibrate, then run a repeated measurement with the configured statistic.
    pub fn measure<K>(
        &self,
        kernel: &mut K,
        input: &mut SampleInput<'_>,
    ) -> SamplingResult<BenchResult>
    where
        K: Kernel + ?Sized,
    {
        self.calibrate(kernel, input)?;
        self.repeat_bench(kernel, input, self.config.statistic)
    }
}
