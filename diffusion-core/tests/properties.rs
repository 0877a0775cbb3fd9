use approx::assert_relative_eq;
use diffusion_core::{
    ComparisonHarness, DiffusionError, DiffusionScheme, HarnessConfig, ScalarField, Site,
    adi_step, explicit_step,
};
use proptest::prelude::*;

fn field_from(w: usize, h: usize, values: &[f64]) -> ScalarField {
    let mut f = ScalarField::new(w, h).unwrap();
    for (i, &v) in values.iter().enumerate() {
        f.set_index(i, v).unwrap();
    }
    f.commit();
    f
}

fn spike(w: usize, h: usize) -> ScalarField {
    let mut f = ScalarField::new(w, h).unwrap();
    f.set((w / 2) as i64, (h / 2) as i64, 1.0).unwrap();
    f.commit();
    f
}

fn max_abs(f: &ScalarField) -> f64 {
    f.values().iter().fold(0.0, |m, v| m.max(v.abs()))
}

proptest! {
    #[test]
    fn set_commit_get_round_trip(
        (w, h, x, y, v) in (1usize..10, 1usize..10)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), 0..w, 0..h, -1e6f64..1e6))
    ) {
        let mut f = ScalarField::new(w, h).unwrap();
        f.set(x as i64, y as i64, v).unwrap();
        f.commit();
        prop_assert_eq!(f.get(x as i64, y as i64).unwrap(), v);
        prop_assert_eq!(f.get_index(y * w + x).unwrap(), v);
    }

    #[test]
    fn adi_is_bounded_and_conservative_for_any_coefficient(
        values in prop::collection::vec(0.0f64..1.0, 24),
        d in 0.0f64..500.0,
    ) {
        let mut f = field_from(6, 4, &values);
        let (max0, min0, mass0) = (f.max(), f.min(), f.total());

        adi_step(&mut f, d).unwrap();

        prop_assert!(f.max() <= max0 + 1e-12);
        prop_assert!(f.min() >= min0 - 1e-12);
        prop_assert!((f.total() - mass0).abs() <= 1e-9 * mass0.max(1.0));
    }

    #[test]
    fn explicit_is_conservative_below_stability_limit(
        values in prop::collection::vec(0.0f64..1.0, 20),
        d in 0.0f64..=0.25,
    ) {
        let mut f = field_from(5, 4, &values);
        let mass0 = f.total();
        let max0 = f.max();

        explicit_step(&mut f, d).unwrap();

        prop_assert!(f.max() <= max0 + 1e-12);
        prop_assert!((f.total() - mass0).abs() <= 1e-9 * mass0.max(1.0));
    }
}

#[test]
fn zero_coefficient_leaves_both_schemes_unchanged() {
    let values: Vec<f64> = (0..30).map(|i| (i as f64 * 0.37).sin().abs()).collect();
    for scheme in [DiffusionScheme::Explicit, DiffusionScheme::Adi] {
        let mut f = field_from(6, 5, &values);
        for _ in 0..25 {
            scheme.step(&mut f, 0.0).unwrap();
        }
        assert_eq!(f.values(), values.as_slice(), "{scheme} drifted at D = 0");
    }
}

#[test]
fn explicit_max_is_non_increasing_up_to_the_limit() {
    for d in [0.05, 0.125, 0.25] {
        let mut f = spike(7, 7);
        let mut prev = f.max();
        for _ in 0..200 {
            explicit_step(&mut f, d).unwrap();
            assert!(f.max() <= prev + 1e-12, "max grew at D = {d}");
            prev = f.max();
        }
    }
}

#[test]
fn explicit_diverges_above_the_limit() {
    let mut f = spike(5, 5);
    for _ in 0..60 {
        explicit_step(&mut f, 0.5).unwrap();
    }
    assert!(max_abs(&f) > 1e6, "expected blow-up, got {}", max_abs(&f));
}

#[test]
fn adi_max_is_non_increasing_above_the_explicit_limit() {
    for d in [0.3, 1.0, 10.0, 1000.0] {
        let mut f = spike(7, 5);
        let mut prev = f.max();
        for _ in 0..100 {
            adi_step(&mut f, d).unwrap();
            assert!(f.max() <= prev + 1e-12, "max grew at D = {d}");
            assert!(f.values().iter().all(|v| v.is_finite()));
            prev = f.max();
        }
        assert_relative_eq!(f.total(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn probe_difference_shrinks_with_coefficient() {
    let sites = [Site { x: 2, y: 2 }];
    let mut errors = Vec::new();
    for d in [0.02, 0.01, 0.005, 0.0025] {
        let mut h = ComparisonHarness::new(HarnessConfig {
            coefficient: d,
            steps: 20,
            ..HarnessConfig::default()
        })
        .unwrap();
        h.initialize(&sites).unwrap();
        h.run().unwrap();
        errors.push(h.summary().final_error.abs());
    }

    assert!(errors[0] > 0.0);
    for pair in errors.windows(2) {
        assert!(pair[1] < pair[0], "errors not shrinking: {errors:?}");
    }
}

#[test]
fn harness_rejects_fields_of_different_shape() {
    let err = ComparisonHarness::from_fields(
        HarnessConfig {
            width: 4,
            height: 4,
            ..HarnessConfig::default()
        },
        (DiffusionScheme::Explicit, ScalarField::new(4, 4).unwrap()),
        (DiffusionScheme::Adi, ScalarField::new(3, 4).unwrap()),
    )
    .unwrap_err();
    assert!(matches!(err, DiffusionError::DimensionMismatch { .. }));
}

#[test]
fn out_of_range_access_on_both_sides() {
    let f = ScalarField::new(5, 5).unwrap();
    assert!(matches!(f.get(-1, 0), Err(DiffusionError::OutOfRange { x: -1, .. })));
    assert!(matches!(f.get(5, 0), Err(DiffusionError::OutOfRange { x: 5, .. })));
}
