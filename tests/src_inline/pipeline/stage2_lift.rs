use super::*;

fn dataset(name: &str, labels: &[u8], scores: &[f64]) -> ScoredDataset {
    let labels = labels.iter().map(|&l| l == 1).collect::<Vec<_>>();
    align_columns(name, &labels, scores).unwrap()
}

fn assert_curve(curve: &LiftCurve, expected: &[f64]) {
    let got = curve.cumulative();
    assert_eq!(got.len(), expected.len());
    for (bin, (g, e)) in got.iter().zip(expected.iter()).enumerate() {
        assert!(
            (g - e).abs() < 1e-9,
            "bin {}: got {}, expected {}",
            bin + 1,
            g,
            e
        );
    }
}

fn baseline_values() -> Vec<f64> {
    vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
}

fn spread_profile() -> LiftProfile {
    LiftProfile {
        ties: TiePolicy::Spread,
        zero_positives: ZeroPositivePolicy::Fail,
    }
}

/// Deterministic pseudo-random stream for property checks.
fn lcg(seed: &mut u64) -> u64 {
    *seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *seed >> 33
}

#[test]
fn test_perfect_ranking() {
    let labels = [1u8, 1, 1, 1, 1, 0, 0, 0, 0, 0];
    let scores = labels.iter().map(|&l| l as f64).collect::<Vec<_>>();
    let curve = compute_lift(&dataset("perfect", &labels, &scores), &LiftProfile::default()).unwrap();
    assert_curve(
        &curve,
        &[0.2, 0.4, 0.6, 0.8, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    );
    assert_eq!(curve.rows.len(), N_BINS);
    assert_eq!(curve.rows[0].bin, 1);
    assert_eq!(curve.rows[9].bin, 10);
    assert!((curve.top_decile_lift() - 2.0).abs() < 1e-12);
    assert!((curve.rows[0].capture_fraction - 0.2).abs() < 1e-12);
    assert_eq!(curve.rows[0].model_name, "perfect");
}

#[test]
fn test_all_equal_scores_positives_first_follow_input_order() {
    let labels = [1u8, 1, 1, 1, 1, 0, 0, 0, 0, 0];
    let scores = vec![0.5; 10];
    let curve = compute_lift(&dataset("flat", &labels, &scores), &LiftProfile::default()).unwrap();
    assert_curve(
        &curve,
        &[0.2, 0.4, 0.6, 0.8, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    );
}

#[test]
fn test_all_equal_scores_positives_last_follow_input_order() {
    let labels = [0u8, 0, 0, 0, 0, 1, 1, 1, 1, 1];
    let scores = vec![0.5; 10];
    let curve = compute_lift(&dataset("flat", &labels, &scores), &LiftProfile::default()).unwrap();
    assert_curve(
        &curve,
        &[0.0, 0.0, 0.0, 0.0, 0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
    );
}

#[test]
fn test_all_equal_scores_interleaved_matches_baseline() {
    let labels = (0..20).map(|i| (i % 2 == 0) as u8).collect::<Vec<_>>();
    let scores = vec![0.5; 20];
    let curve = compute_lift(&dataset("flat", &labels, &scores), &LiftProfile::default()).unwrap();
    assert_curve(&curve, &baseline_values());
}

#[test]
fn test_spread_ties_match_baseline_in_either_order() {
    let scores = vec![0.5; 10];
    for labels in [
        [1u8, 1, 1, 1, 1, 0, 0, 0, 0, 0],
        [0u8, 0, 0, 0, 0, 1, 1, 1, 1, 1],
    ] {
        let curve = compute_lift(&dataset("flat", &labels, &scores), &spread_profile()).unwrap();
        assert_curve(&curve, &baseline_values());
        assert!(curve.rows.iter().all(|r| (r.positives - 0.5).abs() < 1e-12));
    }
}

#[test]
fn test_spread_shares_group_across_boundary() {
    let mut labels = vec![1u8, 1, 0, 0];
    let mut scores = vec![1.0, 0.5, 0.5, 0.5];
    labels.extend(std::iter::repeat_n(0u8, 16));
    scores.extend(std::iter::repeat_n(0.0, 16));
    let data = dataset("partial", &labels, &scores);

    let spread = compute_lift(&data, &spread_profile()).unwrap();
    assert!((spread.rows[0].positives - 4.0 / 3.0).abs() < 1e-12);
    assert!((spread.rows[1].positives - 2.0 / 3.0).abs() < 1e-12);
    assert!((spread.at_bin(1) - 2.0 / 3.0).abs() < 1e-12);
    assert!((spread.at_bin(2) - 1.0).abs() < 1e-12);

    let stable = compute_lift(&data, &LiftProfile::default()).unwrap();
    assert_eq!(stable.at_bin(1), 1.0);

    assert_eq!(boundary_ties(&data), 8);
}

#[test]
fn test_baseline_is_exact() {
    let curve = baseline_curve(891, 342);
    assert_eq!(curve.model_name, BASELINE_NAME);
    assert_eq!(curve.cumulative(), baseline_values());
    for row in &curve.rows {
        assert_eq!(row.cumulative_capture_fraction, row.bin as f64 / 10.0);
        assert_eq!(row.lift, 1.0);
    }
    assert!((curve.area() - 0.55).abs() < 1e-12);
}

#[test]
fn test_stable_tie_break_keeps_input_order() {
    let observations = vec![
        Observation { label: false, score: 0.2 },
        Observation { label: true, score: 0.7 },
        Observation { label: false, score: 0.7 },
        Observation { label: true, score: 0.7 },
        Observation { label: false, score: 0.9 },
    ];
    assert_eq!(rank_descending(&observations), vec![4, 1, 2, 3, 0]);
}

#[test]
fn test_negative_and_positive_zero_scores_tie() {
    let observations = vec![
        Observation { label: false, score: 0.0 },
        Observation { label: true, score: -0.0 },
    ];
    assert_eq!(rank_descending(&observations), vec![0, 1]);
}

#[test]
fn test_bin_sizes_remainder_goes_to_leading_bins() {
    assert_eq!(bin_sizes(100), [10; 10]);
    assert_eq!(bin_sizes(23), [3, 3, 3, 2, 2, 2, 2, 2, 2, 2]);
    assert_eq!(bin_sizes(7), [1, 1, 1, 1, 1, 1, 1, 0, 0, 0]);
    for n in [1usize, 9, 11, 179, 418, 891] {
        assert_eq!(bin_sizes(n).iter().sum::<usize>(), n);
    }
}

#[test]
fn test_small_population_leaves_trailing_bins_empty() {
    let curve = compute_lift(
        &dataset("tiny", &[0, 1, 0], &[0.1, 0.9, 0.2]),
        &LiftProfile::default(),
    )
    .unwrap();
    assert_curve(&curve, &[1.0; 10]);
    assert_eq!(curve.rows[3].n, 0);
    assert_eq!(curve.rows[9].positives, 0.0);
}

#[test]
fn test_all_positive_population() {
    let curve = compute_lift(
        &dataset("all", &[1, 1, 1, 1, 1], &[0.9, 0.8, 0.7, 0.6, 0.5]),
        &LiftProfile::default(),
    )
    .unwrap();
    assert_curve(
        &curve,
        &[0.2, 0.4, 0.6, 0.8, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    );
}

#[test]
fn test_zero_positives_fail_policy() {
    let err = compute_lift(
        &dataset("none", &[0, 0, 0], &[0.3, 0.2, 0.1]),
        &LiftProfile::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LiftError::DegenerateInput(_)));
}

#[test]
fn test_zero_positives_zero_fill_policy() {
    let profile = LiftProfile {
        ties: TiePolicy::InputOrder,
        zero_positives: ZeroPositivePolicy::ZeroFill,
    };
    let curve = compute_lift(&dataset("none", &[0, 0, 0], &[0.3, 0.2, 0.1]), &profile).unwrap();
    assert_eq!(curve.rows.len(), N_BINS);
    for row in &curve.rows {
        assert_eq!(row.cumulative_capture_fraction, 0.0);
        assert_eq!(row.capture_fraction, 0.0);
        assert_eq!(row.lift, 0.0);
        assert!(!row.lift.is_nan());
    }
}

#[test]
fn test_empty_population_is_invalid() {
    let err = compute_lift(&dataset("empty", &[], &[]), &LiftProfile::default()).unwrap_err();
    assert!(matches!(err, LiftError::InvalidInput(_)));
}

#[test]
fn test_nan_score_is_invalid() {
    let err = compute_lift(
        &dataset("nan", &[1, 0], &[f64::NAN, 0.1]),
        &LiftProfile::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LiftError::InvalidInput(_)));
}

#[test]
fn test_mismatched_lengths_are_invalid() {
    let err = align_columns("m", &[true, false], &[0.1]).unwrap_err();
    assert!(matches!(err, LiftError::InvalidInput(_)));
}

#[test]
fn test_random_populations_are_monotone_and_end_at_one() {
    let mut seed = 42u64;
    for n in [1usize, 9, 10, 37, 100, 179, 418] {
        let mut labels = Vec::with_capacity(n);
        let mut scores = Vec::with_capacity(n);
        for _ in 0..n {
            labels.push((lcg(&mut seed) % 3 == 0) as u8);
            scores.push((lcg(&mut seed) % 20) as f64 / 20.0);
        }
        labels[0] = 1;
        let data = dataset("random", &labels, &scores);
        for profile in [LiftProfile::default(), spread_profile()] {
            let curve = compute_lift(&data, &profile).unwrap();
            let values = curve.cumulative();
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "n={} {:?}", n, values);
            assert_eq!(values[N_BINS - 1], 1.0);
            assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let labels = [1u8, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0];
    let scores = [0.9, 0.1, 0.4, 0.4, 0.3, 0.8, 0.2, 0.4, 0.05, 0.6, 0.5, 0.4, 0.7];
    let data = dataset("m", &labels, &scores);
    for profile in [LiftProfile::default(), spread_profile()] {
        let a = compute_lift(&data, &profile).unwrap();
        let b = compute_lift(&data, &profile).unwrap();
        let bits = |c: &LiftCurve| {
            c.rows
                .iter()
                .map(|r| r.cumulative_capture_fraction.to_bits())
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a, b);
    }
}

#[test]
fn test_run_stage2_isolates_failures() {
    let labels = [1u8, 1, 0, 0, 0, 0, 0, 0, 0, 0];
    let good = dataset("good", &labels, &[0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1, 0.0]);
    let mut bad_scores = vec![0.5; 10];
    bad_scores[3] = f64::NAN;
    let bad = dataset("bad", &labels, &bad_scores);

    let out = run_stage2(&[bad, good], &LiftProfile::default());
    let names = out
        .table
        .curves
        .iter()
        .map(|c| c.model_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec![BASELINE_NAME, "good"]);
    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].model_name, "bad");
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.table.rows().count(), 2 * N_BINS);
    assert_eq!(out.table.curve(BASELINE_NAME).unwrap().rows[0].n, 1);
}

#[test]
fn test_run_stage2_all_negative_population_fails_every_model() {
    let labels = [0u8, 0, 0, 0];
    let a = dataset("a", &labels, &[0.1, 0.2, 0.3, 0.4]);
    let b = dataset("b", &labels, &[0.4, 0.3, 0.2, 0.1]);
    let out = run_stage2(&[a, b], &LiftProfile::default());
    assert_eq!(out.table.models().count(), 0);
    assert_eq!(out.failures.len(), 2);
    assert!(
        out.failures
            .iter()
            .all(|f| matches!(f.error, LiftError::DegenerateInput(_)))
    );
}
