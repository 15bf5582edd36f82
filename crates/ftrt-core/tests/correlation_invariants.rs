//! Property tests for correlation invariants
//!
//! - Coefficient stays within [-1, 1] and p-value within [0, 1]
//! - Pearson is invariant under positive affine transforms of either series
//! - Spearman is invariant under strictly monotone transforms
//! - Peaks are chronological and respect the minimum separation
//! - Reordering solar records sharing a timestamp does not change the result

use ftrt_core::stats::{p_value, pearson, spearman};
use ftrt_core::test_utils::{daily_ftrt, daily_solar, day};
use ftrt_core::{
    Aggregation, AnalysisParams, CorrelationAnalyzer, CorrelationError, PeakDetector,
    PeakThreshold, SolarRecord, WindowAlignment, WindowMatcher,
};
use proptest::prelude::*;

fn pairs_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (3usize..60).prop_flat_map(|n| {
        (
            prop::collection::vec(-1_000.0f64..1_000.0, n),
            prop::collection::vec(-1_000.0f64..1_000.0, n),
        )
    })
}

fn nondegenerate(x: &[f64]) -> bool {
    let first = x[0];
    x.iter().any(|v| (v - first).abs() > 1e-6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn coefficient_and_p_value_bounded((x, y) in pairs_strategy()) {
        prop_assume!(nondegenerate(&x) && nondegenerate(&y));

        let r = pearson(&x, &y).unwrap();
        prop_assert!((-1.0..=1.0).contains(&r), "r out of range: {}", r);

        let p = p_value(r, x.len()).unwrap();
        prop_assert!((0.0..=1.0).contains(&p), "p out of range: {}", p);

        let rho = spearman(&x, &y).unwrap();
        prop_assert!((-1.0..=1.0).contains(&rho));
    }

    #[test]
    fn pearson_affine_invariant(
        (x, y) in pairs_strategy(),
        scale in 0.01f64..100.0,
        shift in -500.0f64..500.0,
    ) {
        prop_assume!(nondegenerate(&x) && nondegenerate(&y));

        let r = pearson(&x, &y).unwrap();
        let y2: Vec<f64> = y.iter().map(|v| v * scale + shift).collect();
        let r2 = pearson(&x, &y2).unwrap();
        prop_assert!((r - r2).abs() < 1e-9, "r={} r2={}", r, r2);

        // Negative scale flips the sign
        let y3: Vec<f64> = y.iter().map(|v| -v * scale).collect();
        let r3 = pearson(&x, &y3).unwrap();
        prop_assert!((r + r3).abs() < 1e-9);
    }

    #[test]
    fn spearman_monotone_invariant((x, y) in pairs_strategy()) {
        prop_assume!(nondegenerate(&x) && nondegenerate(&y));

        let rho = spearman(&x, &y).unwrap();
        // Cube root preserves order over the whole real line
        let y2: Vec<f64> = y.iter().map(|v| v.cbrt()).collect();
        let rho2 = spearman(&x, &y2).unwrap();
        prop_assert!((rho - rho2).abs() < 1e-9);
    }

    #[test]
    fn peaks_chronological_and_separated(
        values in prop::collection::vec(0.0f64..100.0, 1..300),
        separation in 0.0f64..20.0,
    ) {
        let records = daily_ftrt(&values);
        let detector = PeakDetector::new(PeakThreshold::Percentile(50.0), separation);
        let peaks = detector.detect(&records).unwrap();

        for w in peaks.windows(2) {
            prop_assert!(w[0].index < w[1].index);
            let gap = (w[1].index - w[0].index) as f64;
            prop_assert!(gap >= separation, "gap {} < separation {}", gap, separation);
        }
        for p in &peaks {
            prop_assert!(p.prominence >= 0.0);
            prop_assert_eq!(p.value, values[p.index]);
        }
    }

    #[test]
    fn same_timestamp_reordering_is_harmless(
        base in prop::collection::vec(0.0f64..50.0, 60..120),
        extra in prop::collection::vec(0.0f64..50.0, 60..120),
    ) {
        let n = base.len().min(extra.len());
        let ftrt_values: Vec<f64> = (0..n)
            .map(|i| if i % 7 == 3 { 10.0 + base[i] } else { base[i] / 10.0 })
            .collect();
        let ftrt = daily_ftrt(&ftrt_values);

        // Two observations per day, in either order
        let forward: Vec<SolarRecord> = (0..n)
            .flat_map(|i| {
                [
                    SolarRecord::new(day(i as i64), base[i]),
                    SolarRecord::new(day(i as i64), extra[i]),
                ]
            })
            .collect();
        let mut swapped = forward.clone();
        for chunk in swapped.chunks_mut(2) {
            chunk.swap(0, 1);
        }

        let params = AnalysisParams {
            detector: PeakDetector::new(PeakThreshold::Absolute(10.0), 0.0),
            matcher: WindowMatcher::new(2, Aggregation::Sum, WindowAlignment::Symmetric).unwrap(),
            ..AnalysisParams::default()
        };
        let analyzer = CorrelationAnalyzer::with_config(params);

        match (analyzer.analyze(&ftrt, &forward), analyzer.analyze(&ftrt, &swapped)) {
            (Ok(a), Ok(b)) => {
                prop_assert!((a.coefficient - b.coefficient).abs() < 1e-9);
                prop_assert_eq!(a.n_pairs, b.n_pairs);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a.is_ok(), b.is_ok()),
        }
    }
}

#[test]
fn window_contents_follow_solar_series() {
    let ftrt = daily_ftrt(&[0.0, 5.0, 0.0, 0.0, 7.0, 0.0, 0.0, 9.0, 0.0]);
    let solar = daily_solar(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

    let params = AnalysisParams {
        detector: PeakDetector::new(PeakThreshold::Absolute(1.0), 0.0),
        matcher: WindowMatcher::new(1, Aggregation::Mean, WindowAlignment::Symmetric).unwrap(),
        ..AnalysisParams::default()
    };
    let report = CorrelationAnalyzer::with_config(params)
        .analyze(&ftrt, &solar)
        .unwrap();

    let activity: Vec<f64> = report.matches.iter().map(|m| m.activity).collect();
    assert_eq!(activity, vec![2.0, 5.0, 8.0]);
    assert!((report.coefficient - 1.0).abs() < 1e-12);
    assert_eq!(report.confidence_interval, None);
}

#[test]
fn single_peak_is_insufficient() {
    let ftrt = daily_ftrt(&[0.0, 3.0, 0.0]);
    let solar = daily_solar(&[1.0, 1.0, 1.0]);
    let result = CorrelationAnalyzer::new().analyze(&ftrt, &solar);
    assert!(matches!(
        result,
        Err(CorrelationError::InsufficientData { actual: 1, .. })
    ));
}
