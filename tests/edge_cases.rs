//! Edge case tests for boundary conditions and unusual inputs.

use knn_dtw::dtw::{DtwConfig, cost_matrix, dtw, dtw_distance};
use knn_dtw::{Error, KnnDtw, KnnDtwConfig, metrics};
use ndarray::{Array2, array};

#[test]
fn dtw_empty_inputs() {
    let config = DtwConfig::default();
    assert!(matches!(dtw_distance(&[], &[], &config), Err(Error::EmptySeries)));
    assert!(matches!(dtw(&[1.0], &[], &config), Err(Error::EmptySeries)));
    assert!(matches!(cost_matrix(&[], &[1.0], &config), Err(Error::EmptySeries)));
}

#[test]
fn dtw_nan_input() {
    assert!(matches!(
        dtw_distance(&[f64::NAN], &[1.0], &DtwConfig::default()),
        Err(Error::NonFiniteSeries)
    ));
}

#[test]
fn dtw_single_column() {
    // One sample in `b`: every sample of `a` aligns to it
    let d = dtw_distance(&[1.0, 2.0, 3.0], &[2.0], &DtwConfig::default()).unwrap();
    assert_eq!(d, 2.0);
}

#[test]
fn zero_window_equal_lengths() {
    let d = dtw_distance(&[1.0, 5.0, 1.0], &[1.0, 1.0, 5.0], &DtwConfig::default().with_window(0))
        .unwrap();
    assert_eq!(d, 8.0);
}

#[test]
fn fit_rejects_empty_training_set() {
    let mut model = KnnDtw::<u8>::default();
    assert!(matches!(
        model.fit(Array2::zeros((0, 10)), Vec::new()),
        Err(Error::EmptySeries)
    ));
    assert!(matches!(
        model.fit(Array2::zeros((2, 0)), vec![1, 2]),
        Err(Error::EmptySeries)
    ));
    assert!(!model.is_fitted());
}

#[test]
fn fit_rejects_non_finite_rows() {
    let mut model = KnnDtw::<u8>::default();
    assert!(matches!(
        model.fit(array![[0.0, 1.0], [f64::INFINITY, 0.0]], vec![1, 2]),
        Err(Error::NonFiniteSeries)
    ));
}

#[test]
fn predict_rejects_empty_queries() {
    let mut model = KnnDtw::new(KnnDtwConfig::default().with_n_neighbors(1)).unwrap();
    model.fit(array![[0.0, 1.0]], vec![1u8]).unwrap();
    assert!(matches!(
        model.predict(&Array2::zeros((0, 2))),
        Err(Error::EmptySeries)
    ));
}

#[test]
fn condensed_distances_single_row() {
    let model = KnnDtw::<u8>::default();
    assert!(model.condensed_distances(&array![[1.0, 2.0]]).unwrap().is_empty());
}

#[test]
fn metrics_single_class() {
    let report = metrics::classification_report(&[3, 3, 3], &[3, 3, 3]).unwrap();
    assert_eq!(report.scores.len(), 1);
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.macro_avg.f1, 1.0);
}

#[cfg(feature = "display")]
#[test]
fn chart_single_point_series() {
    use knn_dtw::display::{LineChart, Series};

    let chart = LineChart::new("dot")
        .with_size(10, 10)
        .with_series(Series::new("p", vec![1.0], vec![1.0]));
    let pixels = chart.to_rgb().unwrap();
    assert_eq!(pixels.len(), 10 * 10 * 3);
    assert!(pixels.iter().any(|&v| v != 255));
}
