//! Platform cycle counter and counter frequency detection.
//!
//! | Platform | Counter | Frequency source |
//! |----------|---------|------------------|
//! | x86_64   | `rdtsc` | sysfs `tsc_freq_khz`, else calibration against `Instant` |
//! | aarch64  | `cntvct_el0` | `CNTFRQ_EL0`, validated against `Instant` |
//! | other    | monotonic `Instant` nanoseconds | fixed 1 GHz |

use std::sync::OnceLock;
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use std::time::Duration;
use std::time::Instant;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use std::arch::asm;

/// Calibration rounds against the monotonic clock.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const CALIBRATION_SAMPLES: usize = 5;

/// Sleep per calibration round.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const CALIBRATION_SLEEP: Duration = Duration::from_millis(20);

/// Frequency of the `Instant`-based fallback counter.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const FALLBACK_FREQ_HZ: u64 = 1_000_000_000;

/// Read the raw cycle counter.
///
/// Values are only meaningful as differences taken on the same core.
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn read_counter() -> u64 {
    let lo: u32;
    let hi: u32;
    // SAFETY: rdtsc has no memory effects and is available on every x86_64 CPU.
    unsafe {
        asm!(
            "rdtsc",
            out("eax") lo,
            out("edx") hi,
            options(nostack, nomem)
        );
    }
    ((hi as u64) << 32) | (lo as u64)
}

/// Read the raw cycle counter.
///
/// Values are only meaningful as differences taken on the same core.
#[cfg(target_arch = "aarch64")]
#[inline]
pub fn read_counter() -> u64 {
    let cnt: u64;
    // SAFETY: cntvct_el0 is readable from EL0 on every supported OS.
    unsafe {
        asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

/// Read the raw cycle counter.
///
/// On this platform the counter is monotonic nanoseconds since first use.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
pub fn read_counter() -> u64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// Detect the frequency of [`read_counter`] in Hz.
///
/// The result is computed once per process and cached.
pub fn counter_frequency_hz() -> u64 {
    static FREQ: OnceLock<u64> = OnceLock::new();
    *FREQ.get_or_init(detect_frequency_hz)
}

#[cfg(target_arch = "x86_64")]
fn detect_frequency_hz() -> u64 {
    #[cfg(target_os = "linux")]
    if let Some(freq) = tsc_freq_from_sysfs() {
        tracing::debug!(freq_hz = freq, "TSC frequency from sysfs");
        return freq;
    }

    match calibrate_against_instant(is_reasonable_tsc_freq) {
        Some(freq) => {
            tracing::info!(
                "TSC frequency calibrated to {:.2} GHz",
                freq as f64 / 1_000_000_000.0
            );
            freq
        }
        None => {
            tracing::warn!("TSC calibration failed, assuming 3 GHz");
            3_000_000_000
        }
    }
}

#[cfg(target_arch = "aarch64")]
fn detect_frequency_hz() -> u64 {
    let cntfrq: u64;
    // SAFETY: CNTFRQ_EL0 is readable from EL0.
    unsafe {
        asm!("mrs {}, cntfrq_el0", out(reg) cntfrq, options(nostack, nomem));
    }

    let calibrated = calibrate_against_instant(is_reasonable_aarch64_freq);
    match calibrated {
        Some(cal) if is_reasonable_aarch64_freq(cntfrq) => {
            let ratio = cal as f64 / cntfrq as f64;
            if (0.9..=1.1).contains(&ratio) {
                cntfrq
            } else {
                tracing::warn!(
                    cntfrq_hz = cntfrq,
                    calibrated_hz = cal,
                    "CNTFRQ_EL0 disagrees with calibration, using calibrated frequency"
                );
                cal
            }
        }
        Some(cal) => {
            tracing::warn!(
                cntfrq_hz = cntfrq,
                "CNTFRQ_EL0 looks wrong, using calibrated frequency"
            );
            cal
        }
        None if is_reasonable_aarch64_freq(cntfrq) => cntfrq,
        None => {
            tracing::warn!("counter frequency detection failed, assuming 24 MHz");
            24_000_000
        }
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_frequency_hz() -> u64 {
    FALLBACK_FREQ_HZ
}

/// Linux: read `tsc_freq_khz` from sysfs when the kernel exposes it.
#[cfg(all(target_arch = "x86_64", target_os = "linux"))]
fn tsc_freq_from_sysfs() -> Option<u64> {
    let content = std::fs::read_to_string("/sys/devices/system/cpu/cpu0/tsc_freq_khz").ok()?;
    let khz = content.trim().parse::<u64>().ok()?;
    let freq = khz.checked_mul(1_000)?;
    is_reasonable_tsc_freq(freq).then_some(freq)
}

/// Check if a TSC frequency is reasonable (500 MHz to 10 GHz).
#[cfg(target_arch = "x86_64")]
#[inline]
fn is_reasonable_tsc_freq(freq: u64) -> bool {
    (500_000_000..=10_000_000_000).contains(&freq)
}

/// Check if an ARM64 counter frequency is reasonable (1 MHz to 10 GHz).
#[cfg(target_arch = "aarch64")]
#[inline]
fn is_reasonable_aarch64_freq(freq: u64) -> bool {
    (1_000_000..=10_000_000_000).contains(&freq)
}

/// Measure the counter against `Instant` across short sleeps and return the
/// median of the plausible estimates.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn calibrate_against_instant(plausible: fn(u64) -> bool) -> Option<u64> {
    let mut frequencies = Vec::with_capacity(CALIBRATION_SAMPLES);

    for _ in 0..CALIBRATION_SAMPLES {
        let start_cnt = read_counter();
        let start = Instant::now();
        std::thread::sleep(CALIBRATION_SLEEP);
        let end_cnt = read_counter();
        let elapsed_ns = start.elapsed().as_nanos();
        if elapsed_ns == 0 {
            continue;
        }

        let delta = end_cnt.wrapping_sub(start_cnt) as u128;
        let freq = (delta * 1_000_000_000 / elapsed_ns) as u64;
        if plausible(freq) {
            frequencies.push(freq);
        }
    }

    if frequencies.is_empty() {
        return None;
    }
    frequencies.sort_unstable();
    Some(frequencies[frequencies.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_counter_is_monotonic_over_sleep() {
        let a = read_counter();
        std::thread::sleep(Duration::from_millis(2));
        let b = read_counter();
        assert!(b > a, "counter did not advance: {} -> {}", a, b);
    }

    #[test]
    fn test_frequency_is_cached_and_nonzero() {
        let first = counter_frequency_hz();
        assert!(first > 0);
        assert_eq!(first, counter_frequency_hz());
    }
}
