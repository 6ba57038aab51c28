//! KNN-DTW Classification Example
//!
//! Trains the classifier on a labelled set of series and prints a
//! classification report and confusion matrix for a held-out set.
//!
//! With no arguments a synthetic three-class set (sine, square, sawtooth with
//! shifted phases and deterministic noise) is used. Otherwise pass four text
//! files: `X_TRAIN Y_TRAIN X_TEST Y_TEST`, one series or label per line.
//!
//! `RUST_LOG=debug` shows distance matrix progress.

use knn_dtw::{KnnDtw, KnnDtwConfig, io, metrics};
use log::info;
use ndarray::Array2;
use std::f64::consts::PI;

const LENGTH: usize = 120;

fn wave(class: usize, phase: f64, seed: usize) -> Vec<f64> {
    (0..LENGTH)
        .map(|i| {
            let t = 2.0 * PI * 3.0 * i as f64 / LENGTH as f64 + phase;
            let clean = match class {
                0 => t.sin(),
                1 => t.sin().signum(),
                _ => (t / PI).rem_euclid(2.0) - 1.0,
            };
            // Deterministic noise in [-0.15, 0.15)
            let noise = ((i * 7919 + seed * 104_729) % 1000) as f64 / 1000.0 - 0.5;
            clean + 0.3 * noise
        })
        .collect()
}

fn synthetic(per_class: usize, seed: usize) -> knn_dtw::Result<(Array2<f64>, Vec<usize>)> {
    let mut data = Vec::with_capacity(3 * per_class * LENGTH);
    let mut labels = Vec::with_capacity(3 * per_class);
    for class in 0..3 {
        for n in 0..per_class {
            let phase = 0.4 * n as f64 / per_class as f64;
            data.extend(wave(class, phase, seed + class * per_class + n));
            labels.push(class + 1);
        }
    }
    let x = Array2::from_shape_vec((labels.len(), LENGTH), data).map_err(|e| {
        knn_dtw::Error::ShapeMismatch {
            expected: format!("{}x{}", labels.len(), LENGTH),
            got: e.to_string(),
        }
    })?;
    Ok((x, labels))
}

fn main() -> knn_dtw::Result<()> {
    env_logger::init();
    info!("KNN-DTW Classification Example");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (x_train, y_train, x_test, y_test) = if let [xtr, ytr, xte, yte] = args.as_slice() {
        info!("Loading dataset from {xtr}, {ytr}, {xte}, {yte}");
        (
            io::load_series_txt(xtr)?,
            io::load_labels_txt(ytr)?,
            io::load_series_txt(xte)?,
            io::load_labels_txt(yte)?,
        )
    } else {
        info!("Using synthetic sine/square/sawtooth dataset");
        let (x_train, y_train) = synthetic(10, 0)?;
        let (x_test, y_test) = synthetic(5, 500)?;
        (x_train, y_train, x_test, y_test)
    };

    info!(
        "Train: {} series, test: {} series",
        x_train.nrows(),
        x_test.nrows()
    );

    let config = KnnDtwConfig::default()
        .with_n_neighbors(1)
        .with_max_warping_window(10)
        .with_subsample_step(2);
    let mut model = KnnDtw::new(config)?;
    model.fit(x_train, y_train)?;

    let predictions = model.predict(&x_test)?;
    let predicted: Vec<usize> = predictions.iter().map(|p| p.label).collect();

    let report = metrics::classification_report(&y_test, &predicted)?;
    info!("Classification report:\n{report}");

    let cm = metrics::confusion_matrix(&y_test, &predicted)?;
    info!("Confusion matrix (rows: truth {:?}):\n{}", cm.labels, cm.counts);

    Ok(())
}
