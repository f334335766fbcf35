//! Configuration parsing and validation tests.

use std::collections::HashMap;
use std::time::Duration;

use roofline::{
    ClockContext, Config, ConfigError, Statistic, CPU_FREQ_ENV, MIN_DURATION_ENV,
    MIN_LOOP_REPEAT_ENV, REPEAT_ENV, STATISTIC_ENV,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn env_overrides_apply_on_top_of_defaults() {
    let config = Config::from_lookup(lookup(&[
        (REPEAT_ENV, "32"),
        (MIN_DURATION_ENV, " 5 "),
        (MIN_LOOP_REPEAT_ENV, "1024"),
        (STATISTIC_ENV, "max"),
    ]))
    .unwrap();

    assert_eq!(config.repeat, 32);
    assert_eq!(config.min_duration_ms, 5);
    assert_eq!(config.min_loop_repeat, 1024);
    assert_eq!(config.statistic, Statistic::Max);
    // Untouched fields keep their defaults
    assert_eq!(config.calibration_budget, Some(Duration::from_secs(60)));
}

#[test]
fn env_unparsable_number_is_rejected() {
    let err = Config::from_lookup(lookup(&[(REPEAT_ENV, "sixteen")]))
        .unwrap_err();
    match err {
        ConfigError::InvalidEnv { var, value, .. } => {
            assert_eq!(var, REPEAT_ENV);
            assert_eq!(value, "sixteen");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn env_unknown_statistic_is_rejected() {
    let err = Config::from_lookup(lookup(&[(STATISTIC_ENV, "mode")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidEnv {
            var: STATISTIC_ENV,
            ..
        }
    ));
    assert!(err.to_string().contains("mode"));
}

#[test]
fn env_zero_repeat_fails_validation() {
    let err = Config::from_lookup(lookup(&[(REPEAT_ENV, "0")]))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidValue {
            field: "repeat",
            reason: "must be positive"
        }
    );
}

#[test]
fn env_zero_duration_fails_validation() {
    let err = Config::from_lookup(lookup(&[(MIN_DURATION_ENV, "0")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "min_duration_ms",
            ..
        }
    ));
}

#[test]
fn clock_env_override() {
    let clock = ClockContext::from_lookup_or_detect(lookup(&[(CPU_FREQ_ENV, "3000000000")]))
        .unwrap();
    assert_eq!(clock.cpu_freq_hz(), 3_000_000_000);
    assert_eq!(clock.cycles_to_ms(3_000_000_000), 1_000);
}

#[test]
#[should_panic(expected = "min_duration_ms must be positive")]
fn builder_rejects_zero_duration() {
    Config::new().min_duration_ms(0);
}

#[test]
#[should_panic(expected = "max_calibration_rounds must be positive")]
fn builder_rejects_zero_rounds() {
    Config::new().max_calibration_rounds(0);
}
