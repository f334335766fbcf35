//! Kernel abstraction consumed by the sampling engine.
//!
//! A kernel is anything that, given a [`SampleInput`], runs
//! `loop_repeat` repetitions of its work and fills in the timestamps and
//! work counters of a [`SampleRecord`]. The engine clears the record before
//! every call and never keeps references into either argument.
//!
//! Closures work directly, provided their argument types are spelled out:
//!
//! ```
//! use roofline::{Kernel, SampleInput, SampleRecord};
//!
//! let mut kernel = |input: &mut SampleInput<'_>, out: &mut SampleRecord| {
//!     out.ts_start = 0;
//!     out.ts_end = input.loop_repeat * 10;
//!     out.instructions = input.loop_repeat * 40;
//! };
//! let mut out = SampleRecord::new();
//! kernel.run(&mut SampleInput::without_stream(), &mut out);
//! assert_eq!(out.throughput(), 4.0);
//! ```

mod stream;

use roofline_core::{SampleInput, SampleRecord};

pub use stream::{FlopKernel, LoadKernel, StoreKernel};

/// A benchmark kernel.
pub trait Kernel {
    /// Run `input.loop_repeat` repetitions and record the measurement in `out`.
    ///
    /// Implementations must set `ts_start`, `ts_end` and the work counters.
    fn run(&mut self, input: &mut SampleInput<'_>, out: &mut SampleRecord);
}

impl<F> Kernel for F
where
    F: FnMut(&mut SampleInput<'_>, &mut SampleRecord),
{
    #[inline]
    fn run(&mut self, input: &mut SampleInput<'_>, out: &mut SampleRecord) {
        self(input, out)
    }
}
