//! Kernel input parameters and measurement records.

use serde::{Deserialize, Serialize};

/// Parameters of one kernel invocation.
///
/// The stream is owned by the caller. The sampling engine only adjusts
/// `loop_repeat`; it never allocates, resizes or frees the stream.
#[derive(Debug)]
pub struct SampleInput<'a> {
    /// Number of internal repetitions the kernel performs.
    ///
    /// Larger values make a run longer and easier to measure. Must be at
    /// least 1 when a kernel is invoked.
    pub loop_repeat: u64,

    /// Memory region the kernel streams over. Empty for compute kernels.
    pub stream: &'a mut [f64],
}

impl Default for SampleInput<'_> {
    /// No stream and a loop repeat of 1.
    fn default() -> Self {
        Self::without_stream()
    }
}

impl<'a> SampleInput<'a> {
    /// Create an input over `stream` with a loop repeat of 1.
    pub fn new(stream: &'a mut [f64]) -> Self {
        Self {
            loop_repeat: 1,
            stream,
        }
    }

    /// Create an input with no stream, for compute-bound kernels.
    pub fn without_stream() -> Self {
        Self {
            loop_repeat: 1,
            stream: &mut [],
        }
    }

    /// Size of the stream in bytes.
    #[inline]
    pub fn stream_size(&self) -> usize {
        core::mem::size_of_val(self.stream)
    }
}

/// One measurement produced by a single kernel invocation.
///
/// Timestamps are raw cycle-counter values. A record with
/// `ts_end == ts_start` is a valid degenerate measurement whose throughput
/// is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Counter value when the kernel started.
    pub ts_start: u64,
    /// Counter value when the kernel ended.
    pub ts_end: u64,
    /// Number of instructions retired by the kernel.
    pub instructions: u64,
    /// Number of bytes moved by the kernel.
    pub bytes: u64,
    /// Number of floating-point operations computed by the kernel.
    pub flops: u64,
}

impl SampleRecord {
    /// Create a zeroed record.
    pub const fn new() -> Self {
        Self {
            ts_start: 0,
            ts_end: 0,
            instructions: 0,
            bytes: 0,
            flops: 0,
        }
    }

    /// Create a record from its fields.
    pub const fn from_parts(
        ts_start: u64,
        ts_end: u64,
        instructions: u64,
        bytes: u64,
        flops: u64,
    ) -> Self {
        Self {
            ts_start,
            ts_end,
            instructions,
            bytes,
            flops,
        }
    }

    /// Zero every field.
    ///
    /// Called before each kernel invocation so a fresh measurement never
    /// sees counters from a previous run.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Whether every field is zero.
    #[inline]
    pub fn is_cleared(&self) -> bool {
        *self == Self::new()
    }

    /// Measured duration in cycles.
    ///
    /// Saturates to zero if the counter went backwards.
    #[inline]
    pub fn duration_cycles(&self) -> u64 {
        self.ts_end.saturating_sub(self.ts_start)
    }

    /// Instructions per cycle, or 0 when the measured duration is zero.
    #[inline]
    pub fn throughput(&self) -> f64 {
        match self.duration_cycles() {
            0 => 0.0,
            cycles => self.instructions as f64 / cycles as f64,
        }
    }

    /// Merge `other` into `self`.
    ///
    /// Work counters are summed (saturating). The merged time span runs from
    /// the earliest start to the latest end, so the merged throughput is the
    /// aggregate work over the union interval. A cleared record is the
    /// identity: accumulating into it copies `other`.
    pub fn accumulate(&mut self, other: &SampleRecord) {
        if self.is_cleared() {
            *self = *other;
            return;
        }
        if other.is_cleared() {
            return;
        }
        self.ts_start = self.ts_start.min(other.ts_start);
        self.ts_end = self.ts_end.max(other.ts_end);
        self.instructions = self.instructions.saturating_add(other.instructions);
        self.bytes = self.bytes.saturating_add(other.bytes);
        self.flops = self.flops.saturating_add(other.flops);
    }

    /// Return a new record combining `a` and `b` with [`accumulate`](Self::accumulate).
    pub fn merged(a: &SampleRecord, b: &SampleRecord) -> SampleRecord {
        let mut out = *a;
        out.accumulate(b);
        out
    }
}
