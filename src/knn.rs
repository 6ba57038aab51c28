//! K-nearest-neighbour time series classification under DTW.
//!
//! Training series are stored one per row. Prediction computes the DTW
//! distance from each query to every training series, takes the
//! `n_neighbors` closest, and votes on the label.

use log::{debug, info};
use ndarray::{Array2, ArrayView1};
use std::collections::BTreeMap;

use crate::dtw::{self, DtwConfig, LocalCost};
use crate::{Error, Result};

/// Classifier parameters.
#[derive(Debug, Clone)]
pub struct KnnDtwConfig {
    /// Number of neighbours that vote on a label.
    pub n_neighbors: usize,
    /// Sakoe-Chiba band half-width used for every DTW evaluation.
    pub max_warping_window: usize,
    /// Keep every `subsample_step`-th sample before comparing series.
    pub subsample_step: usize,
    pub cost: LocalCost,
}

impl Default for KnnDtwConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 5,
            max_warping_window: 10_000,
            subsample_step: 1,
            cost: LocalCost::Absolute,
        }
    }
}

impl KnnDtwConfig {
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    pub fn with_max_warping_window(mut self, window: usize) -> Self {
        self.max_warping_window = window;
        self
    }

    pub fn with_subsample_step(mut self, step: usize) -> Self {
        self.subsample_step = step;
        self
    }

    pub fn with_cost(mut self, cost: LocalCost) -> Self {
        self.cost = cost;
        self
    }

    /// Check that the parameters describe a usable classifier.
    pub fn validate(&self) -> Result<()> {
        if self.n_neighbors == 0 {
            return Err(Error::InvalidParameter {
                name: "n_neighbors",
                value: self.n_neighbors.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.subsample_step == 0 {
            return Err(Error::InvalidParameter {
                name: "subsample_step",
                value: self.subsample_step.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn dtw_config(&self) -> DtwConfig {
        DtwConfig::default()
            .with_window(self.max_warping_window)
            .with_cost(self.cost)
    }
}

/// Predicted label with the fraction of neighbours that voted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction<L> {
    pub label: L,
    pub probability: f64,
}

#[derive(Debug, Clone)]
struct Training<L> {
    series: Vec<Vec<f64>>,
    labels: Vec<L>,
}

/// K-nearest-neighbour classifier with DTW as the distance.
///
/// # Example
/// ```
/// use knn_dtw::knn::{KnnDtw, KnnDtwConfig};
/// use ndarray::array;
///
/// let train = array![[0.0, 0.0, 1.0, 0.0], [0.0, 1.0, 0.0, 0.0], [5.0, 5.0, 4.0, 5.0]];
/// let mut model = KnnDtw::new(KnnDtwConfig::default().with_n_neighbors(1)).unwrap();
/// model.fit(train, vec!["low", "low", "high"]).unwrap();
///
/// let predictions = model.predict(&array![[5.0, 4.0, 5.0, 5.0]]).unwrap();
/// assert_eq!(predictions[0].label, "high");
/// assert_eq!(predictions[0].probability, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct KnnDtw<L> {
    config: KnnDtwConfig,
    training: Option<Training<L>>,
}

impl<L: Clone + Ord> Default for KnnDtw<L> {
    fn default() -> Self {
        Self {
            config: KnnDtwConfig::default(),
            training: None,
        }
    }
}

impl<L: Clone + Ord> KnnDtw<L> {
    /// Create an unfitted classifier.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if `config` fails validation.
    pub fn new(config: KnnDtwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            training: None,
        })
    }

    pub fn config(&self) -> &KnnDtwConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    /// DTW distance between two series under this classifier's window and cost.
    ///
    /// No subsampling is applied.
    pub fn dtw_distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        dtw::dtw_distance(a, b, &self.config.dtw_config())
    }

    /// Store the training set.
    ///
    /// # Arguments
    /// * `x` - Training series, one per row
    /// * `labels` - Class label of each row
    ///
    /// # Errors
    /// * [`Error::ShapeMismatch`] if the row and label counts differ
    /// * [`Error::EmptySeries`] / [`Error::NonFiniteSeries`] for unusable data
    pub fn fit(&mut self, x: Array2<f64>, labels: Vec<L>) -> Result<()> {
        if x.nrows() != labels.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} labels", x.nrows()),
                got: format!("{} labels", labels.len()),
            });
        }

        let series = self.subsample_rows(&x)?;
        info!(
            "fitted on {} series of {} samples (subsample step {})",
            series.len(),
            x.ncols(),
            self.config.subsample_step
        );
        self.training = Some(Training { series, labels });
        Ok(())
    }

    /// DTW distance between every row of `x` and every row of `y`.
    ///
    /// # Returns
    /// `x.nrows() x y.nrows()` matrix over the subsampled series
    pub fn distance_matrix(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
        let xs = self.subsample_rows(x)?;
        let ys = self.subsample_rows(y)?;
        self.pairwise(&xs, &ys)
    }

    /// Pairwise DTW distances of `x` against itself, upper triangle only.
    ///
    /// # Returns
    /// `n * (n - 1) / 2` distances ordered `(0,1), (0,2), ..., (1,2), ...`
    pub fn condensed_distances(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let xs = self.subsample_rows(x)?;
        let n = xs.len();
        let config = self.config.dtw_config();
        let total = n * n.saturating_sub(1) / 2;

        info!("computing {total} pairwise DTW distances");
        let mut condensed = Vec::with_capacity(total);
        for i in 0..n {
            for j in (i + 1)..n {
                condensed.push(dtw::dtw_distance(&xs[i], &xs[j], &config)?);
            }
            debug!("pairwise distances: {}/{} rows", i + 1, n);
        }
        Ok(condensed)
    }

    /// Classify each row of `x`.
    ///
    /// Neighbours are ordered by distance with ties kept in training order.
    /// Among the neighbours the most frequent label wins; equal counts
    /// resolve to the smallest label.
    ///
    /// # Errors
    /// * [`Error::NotFitted`] if `fit` was not called
    /// * [`Error::InvalidParameter`] if `n_neighbors` exceeds the training size
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<Prediction<L>>> {
        let training = self.training.as_ref().ok_or(Error::NotFitted)?;
        let k = self.config.n_neighbors;
        if k > training.labels.len() {
            return Err(Error::InvalidParameter {
                name: "n_neighbors",
                value: k.to_string(),
                reason: format!("training set has only {} series", training.labels.len()),
            });
        }

        let queries = self.subsample_rows(x)?;
        let dm = self.pairwise(&queries, &training.series)?;

        let predictions = dm
            .rows()
            .into_iter()
            .map(|row| vote(row, &training.labels, k))
            .collect();
        Ok(predictions)
    }

    fn subsample_rows(&self, x: &Array2<f64>) -> Result<Vec<Vec<f64>>> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(Error::EmptySeries);
        }
        let step = self.config.subsample_step;
        x.rows()
            .into_iter()
            .map(|row| -> Result<Vec<f64>> {
                let series: Vec<f64> = row.iter().step_by(step).copied().collect();
                dtw::valid_series(&series)?;
                Ok(series)
            })
            .collect()
    }

    fn pairwise(&self, xs: &[Vec<f64>], ys: &[Vec<f64>]) -> Result<Array2<f64>> {
        let config = self.config.dtw_config();
        let mut dm = Array2::<f64>::zeros((xs.len(), ys.len()));

        info!("computing {}x{} DTW distance matrix", xs.len(), ys.len());
        for (i, a) in xs.iter().enumerate() {
            for (j, b) in ys.iter().enumerate() {
                dm[(i, j)] = dtw::dtw_distance(a, b, &config)?;
            }
            debug!(
                "distance matrix: {}/{} rows ({:.0}%)",
                i + 1,
                xs.len(),
                100.0 * (i + 1) as f64 / xs.len() as f64
            );
        }
        Ok(dm)
    }
}

fn vote<L: Clone + Ord>(distances: ArrayView1<f64>, labels: &[L], k: usize) -> Prediction<L> {
    let mut order: Vec<usize> = (0..distances.len()).collect();
    order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));

    let mut counts: BTreeMap<&L, usize> = BTreeMap::new();
    for &idx in order.iter().take(k) {
        *counts.entry(&labels[idx]).or_insert(0) += 1;
    }

    // Ascending label order, so the first maximum is the smallest label
    let mut best: Option<(&L, usize)> = None;
    for (label, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((label, count));
        }
    }

    // k >= 1 and k <= labels.len(), so at least one vote was cast
    let (label, count) = best.unwrap_or((&labels[order[0]], 0));
    Prediction {
        label: label.clone(),
        probability: count as f64 / k as f64,
    }
}

/// Expand a condensed distance vector into a symmetric matrix.
///
/// # Errors
/// Returns [`Error::ShapeMismatch`] if `condensed.len() != n * (n - 1) / 2`.
///
/// # Example
/// ```
/// use knn_dtw::knn::squareform;
///
/// let dm = squareform(&[1.0, 2.0, 3.0], 3).unwrap();
/// assert_eq!(dm[(0, 2)], 2.0);
/// assert_eq!(dm[(2, 1)], 3.0);
/// assert_eq!(dm[(1, 1)], 0.0);
/// ```
pub fn squareform(condensed: &[f64], n: usize) -> Result<Array2<f64>> {
    let expected = n * n.saturating_sub(1) / 2;
    if condensed.len() != expected {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected} condensed distances for n={n}"),
            got: condensed.len().to_string(),
        });
    }

    let mut dm = Array2::<f64>::zeros((n, n));
    let mut values = condensed.iter();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(&d) = values.next() {
                dm[(i, j)] = d;
                dm[(j, i)] = d;
            }
        }
    }
    Ok(dm)
}
