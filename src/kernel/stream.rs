//! Reference streaming and compute kernels.
//!
//! These are plain scalar loops stamped with the platform cycle counter.
//! They exercise the engine end to end; tuned SIMD kernels live with the
//! caller.

use std::hint::black_box;
use std::mem::size_of;

use roofline_core::{SampleInput, SampleRecord};

use super::Kernel;
use crate::measurement::read_counter;

/// Reads every element of the stream once per repetition.
///
/// Counts one instruction and one add per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadKernel;

impl Kernel for LoadKernel {
    fn run(&mut self, input: &mut SampleInput<'_>, out: &mut SampleRecord) {
        let len = input.stream.len() as u64;
        let repeat = input.loop_repeat;
        let stream: &[f64] = &*input.stream;

        out.ts_start = read_counter();
        let mut acc = 0.0f64;
        for _ in 0..repeat {
            for &x in black_box(stream) {
                acc += x;
            }
        }
        black_box(acc);
        out.ts_end = read_counter();

        out.instructions = repeat.saturating_mul(len);
        out.flops = out.instructions;
        out.bytes = out.instructions.saturating_mul(size_of::<f64>() as u64);
    }
}

/// Overwrites every element of the stream once per repetition.
///
/// Counts one instruction per element and no flops.
#[derive(Debug, Clone, Copy)]
pub struct StoreKernel {
    /// Value written to every element.
    pub value: f64,
}

impl Default for StoreKernel {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl Kernel for StoreKernel {
    fn run(&mut self, input: &mut SampleInput<'_>, out: &mut SampleRecord) {
        let len = input.stream.len() as u64;
        let repeat = input.loop_repeat;
        let value = self.value;

        out.ts_start = read_counter();
        for _ in 0..repeat {
            for slot in black_box(&mut *input.stream).iter_mut() {
                *slot = value;
            }
        }
        black_box(&mut *input.stream);
        out.ts_end = read_counter();

        out.instructions = repeat.saturating_mul(len);
        out.flops = 0;
        out.bytes = out.instructions.saturating_mul(size_of::<f64>() as u64);
    }
}

/// Register-resident multiply-add chains, independent of the stream.
///
/// Each repetition runs `ops_per_repeat` multiply-adds (rounded down to a
/// multiple of the accumulator count, at least one round) spread over
/// independent accumulators; one multiply-add counts as one instruction and
/// two flops.
#[derive(Debug, Clone, Copy)]
pub struct FlopKernel {
    /// Multiply-adds per repetition.
    pub ops_per_repeat: u64,
}

/// Independent accumulator chains in [`FlopKernel`].
const FLOP_LANES: usize = 8;

impl Default for FlopKernel {
    fn default() -> Self {
        Self {
            ops_per_repeat: 1_024,
        }
    }
}

impl Kernel for FlopKernel {
    fn run(&mut self, input: &mut SampleInput<'_>, out: &mut SampleRecord) {
        let repeat = input.loop_repeat;
        let rounds = (self.ops_per_repeat / FLOP_LANES as u64).max(1);
        let a = black_box(0.999_999f64);
        let b = black_box(1e-9f64);
        let mut acc = [1.0f64; FLOP_LANES];

        out.ts_start = read_counter();
        for _ in 0..repeat {
            for _ in 0..rounds {
                for lane in acc.iter_mut() {
                    *lane = *lane * a + b;
                }
            }
        }
        black_box(acc);
        out.ts_end = read_counter();

        out.instructions = repeat.saturating_mul(rounds * FLOP_LANES as u64);
        out.flops = out.instructions.saturating_mul(2);
        out.bytes = 0;
    }
}
