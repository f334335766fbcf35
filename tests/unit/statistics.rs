//! Batch statistics through the public API.

use std::cmp::Ordering;

use roofline::{
    compare_throughput, mean_throughput, throughput_std_dev, SampleRecord, Statistic,
    ThroughputStats,
};

fn rec(instructions: u64, cycles: u64) -> SampleRecord {
    SampleRecord::from_parts(5_000, 5_000 + cycles, instructions, 0, 0)
}

#[test]
fn median_of_three_picks_middle_throughput() {
    let mut batch = [rec(100, 10), rec(200, 10), rec(150, 10)];
    let throughputs: Vec<f64> = batch.iter().map(SampleRecord::throughput).collect();
    assert_eq!(throughputs, [10.0, 20.0, 15.0]);

    let idx = Statistic::Median.select(&mut batch);
    assert_eq!(idx, 1);
    assert_eq!(batch[idx].instructions, 150);
    assert_eq!(batch[idx].throughput(), 15.0);
}

#[test]
fn median_index_for_even_and_odd_sizes() {
    for n in 1..=12u64 {
        // Descending input so the sort has work to do
        let mut batch: Vec<SampleRecord> = (0..n).rev().map(|i| rec(i * 10, 10)).collect();
        let idx = Statistic::Median.select(&mut batch);
        assert_eq!(idx, (n / 2) as usize, "n={n}");
        assert_eq!(batch[idx].instructions, (n / 2) * 10, "n={n}");
    }
}

#[test]
fn sixteen_identical_records_have_zero_dispersion() {
    let batch = vec![rec(123_456, 789); 16];
    assert_eq!(throughput_std_dev(&batch), 0.0);
}

#[test]
fn fewer_than_two_records_have_zero_dispersion() {
    assert_eq!(throughput_std_dev(&[]), 0.0);
    assert_eq!(throughput_std_dev(&[rec(10, 3)]), 0.0);
}

#[test]
fn degenerate_duration_is_zero_throughput() {
    let degenerate = rec(1_000, 0);
    assert_eq!(degenerate.throughput(), 0.0);
    assert_eq!(
        compare_throughput(&degenerate, &degenerate),
        Ordering::Equal
    );
    assert_eq!(
        compare_throughput(&degenerate, &rec(1, 100)),
        Ordering::Less
    );

    let sd = throughput_std_dev(&[degenerate, degenerate, rec(10, 10)]);
    assert!(sd.is_finite());
}

#[test]
fn max_and_min_bound_the_batch() {
    let batch = [rec(70, 10), rec(20, 10), rec(95, 10), rec(40, 10), rec(20, 10)];
    let max = Statistic::Max.select(&mut batch.clone());
    let min = Statistic::Min.select(&mut batch.clone());
    assert_eq!(max, 2);
    // Tie between index 1 and 4 resolves to the later record
    assert_eq!(min, 4);
}

#[test]
fn streaming_matches_batch() {
    let batch: Vec<SampleRecord> = (1..=20).map(|i| rec(i * i, 7)).collect();
    let mut stats = ThroughputStats::new();
    for record in &batch {
        stats.push(record);
    }
    assert_eq!(stats.count(), 20);
    assert!((stats.std_dev() - throughput_std_dev(&batch)).abs() < 1e-12);
    assert!((stats.mean() - mean_throughput(&batch)).abs() < 1e-9);
}

#[test]
fn accumulate_combines_parallel_records() {
    let a = SampleRecord::from_parts(1_000, 2_000, 4_000, 32_000, 0);
    let b = SampleRecord::from_parts(1_100, 2_100, 4_000, 32_000, 0);

    let mut total = SampleRecord::new();
    total.accumulate(&a);
    total.accumulate(&b);

    assert_eq!(total.ts_start, 1_000);
    assert_eq!(total.ts_end, 2_100);
    assert_eq!(total.instructions, 8_000);
    assert_eq!(total.bytes, 64_000);
    assert!((total.throughput() - 8_000.0 / 1_100.0).abs() < 1e-12);
}
