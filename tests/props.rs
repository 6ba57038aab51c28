use approx::assert_relative_eq;
use knn_dtw::dtw::{DtwConfig, LocalCost, dtw, dtw_distance};
use proptest::prelude::*;

fn series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 1..40)
}

proptest! {
    #[test]
    fn self_distance_is_zero(a in series()) {
        let d = dtw_distance(&a, &a, &DtwConfig::default()).unwrap();
        prop_assert_eq!(d, 0.0);
    }

    #[test]
    fn distance_is_symmetric(a in series(), b in series()) {
        let ab = dtw_distance(&a, &b, &DtwConfig::default()).unwrap();
        let ba = dtw_distance(&b, &a, &DtwConfig::default()).unwrap();
        assert_relative_eq!(ab, ba, epsilon = 1e-9, max_relative = 1e-12);
    }

    #[test]
    fn wider_window_never_costs_more(a in series(), b in series(), extra in 0usize..10) {
        let narrow = a.len().abs_diff(b.len());
        let d_narrow = dtw_distance(&a, &b, &DtwConfig::default().with_window(narrow)).unwrap();
        let d_wide = dtw_distance(&a, &b, &DtwConfig::default().with_window(narrow + extra)).unwrap();
        let d_free = dtw_distance(&a, &b, &DtwConfig::default()).unwrap();
        prop_assert!(d_wide <= d_narrow);
        prop_assert!(d_free <= d_wide);
    }

    #[test]
    fn full_window_equals_unconstrained(a in series(), b in series()) {
        let w = a.len().max(b.len());
        let windowed = dtw_distance(&a, &b, &DtwConfig::default().with_window(w)).unwrap();
        let free = dtw_distance(&a, &b, &DtwConfig::default()).unwrap();
        prop_assert_eq!(windowed, free);
    }

    #[test]
    fn zero_window_is_lockstep(pairs in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..40)) {
        let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let lockstep: f64 = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum();
        let d = dtw_distance(&a, &b, &DtwConfig::default().with_window(0)).unwrap();
        assert_relative_eq!(d, lockstep, epsilon = 1e-9, max_relative = 1e-12);
        let free = dtw_distance(&a, &b, &DtwConfig::default()).unwrap();
        prop_assert!(free <= d);
    }

    #[test]
    fn path_cost_matches_distance(a in series(), b in series()) {
        let config = DtwConfig::default().with_cost(LocalCost::Squared);
        let (distance, path) = dtw(&a, &b, &config).unwrap();
        let total: f64 = path.iter().map(|&(i, j)| config.cost.eval(a[i], b[j])).sum();
        assert_relative_eq!(total, distance, epsilon = 1e-6, max_relative = 1e-9);
        prop_assert!(path.len() >= a.len().max(b.len()));
        prop_assert!(path.len() < a.len() + b.len());
    }
}
