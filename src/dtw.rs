//! Dynamic Time Warping distance between univariate time series.
//!
//! The accumulated cost matrix follows the classic recurrence
//! `C[i,j] = d(a_i, b_j) + min(C[i-1,j-1], C[i,j-1], C[i-1,j])`, with the
//! first row and column accumulated directly. An optional Sakoe-Chiba band
//! (`window`) restricts the interior cells to `|i - j| <= window`.

use ndarray::Array2;
use std::str::FromStr;

use crate::{Error, Result};

/// Point-wise cost between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalCost {
    /// `|x - y|`
    #[default]
    Absolute,
    /// `(x - y)^2`
    Squared,
}

impl LocalCost {
    /// Evaluate the cost between two samples.
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            LocalCost::Absolute => (x - y).abs(),
            LocalCost::Squared => {
                let d = x - y;
                d * d
            }
        }
    }
}

impl FromStr for LocalCost {
    type Err = Error;

    /// Parse a local cost from its name.
    fn from_str(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "absolute" | "abs" | "manhattan" => Ok(LocalCost::Absolute),
            "squared" | "sqeuclidean" => Ok(LocalCost::Squared),
            _ => Err(Error::InvalidParameter {
                name: "cost",
                value: name.to_string(),
                reason: "expected one of: absolute, squared".to_string(),
            }),
        }
    }
}

/// Parameters for a single DTW evaluation.
#[derive(Debug, Clone, Default)]
pub struct DtwConfig {
    /// Sakoe-Chiba band half-width. `None` leaves the alignment unconstrained.
    pub window: Option<usize>,
    pub cost: LocalCost,
}

impl DtwConfig {
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_cost(mut self, cost: LocalCost) -> Self {
        self.cost = cost;
        self
    }
}

/// Validate a time series for DTW.
///
/// # Errors
/// * [`Error::EmptySeries`] if `y` is empty
/// * [`Error::NonFiniteSeries`] if `y` contains NaN or infinite samples
///
/// # Example
/// ```
/// use knn_dtw::dtw::valid_series;
///
/// assert!(valid_series(&[0.0, 1.0, -1.0]).is_ok());
/// assert!(valid_series(&[]).is_err());
/// assert!(valid_series(&[0.0, f64::NAN]).is_err());
/// ```
pub fn valid_series(y: &[f64]) -> Result<()> {
    if y.is_empty() {
        return Err(Error::EmptySeries);
    }

    if !y.iter().all(|v| v.is_finite()) {
        return Err(Error::NonFiniteSeries);
    }

    Ok(())
}

fn validate_pair(a: &[f64], b: &[f64], config: &DtwConfig) -> Result<()> {
    valid_series(a)?;
    valid_series(b)?;

    if let Some(window) = config.window {
        // The last cell sits |M - N| off the diagonal. A single-sample series
        // ends on the first row or column, which is accumulated regardless.
        let single = a.len().min(b.len()) == 1;
        if !single && window < a.len().abs_diff(b.len()) {
            return Err(Error::WindowTooNarrow {
                window,
                len_a: a.len(),
                len_b: b.len(),
            });
        }
    }

    Ok(())
}

/// Interior column range `[lo, hi]` for row `i >= 1`, or `None` if empty.
#[inline]
fn band(i: usize, n: usize, window: Option<usize>) -> Option<(usize, usize)> {
    let (lo, hi) = match window {
        Some(w) => (i.saturating_sub(w).max(1), i.saturating_add(w).min(n - 1)),
        None => (1, n - 1),
    };
    (lo <= hi).then_some((lo, hi))
}

/// Compute the DTW distance between two time series.
///
/// Only two rows of the accumulated cost matrix are kept, so memory is
/// `O(b.len())`.
///
/// # Arguments
/// * `a` - First time series
/// * `b` - Second time series
/// * `config` - Warping window and local cost
///
/// # Returns
/// Accumulated cost of the optimal warping path
///
/// # Errors
/// * [`Error::EmptySeries`] / [`Error::NonFiniteSeries`] for invalid input
/// * [`Error::WindowTooNarrow`] if the window cannot reach the last sample pair
///
/// # Example
/// ```
/// use knn_dtw::dtw::{dtw_distance, DtwConfig};
///
/// let a = [0.0, 1.0, 2.0];
/// let b = [0.0, 2.0];
/// let distance = dtw_distance(&a, &b, &DtwConfig::default()).unwrap();
/// assert_eq!(distance, 1.0);
/// ```
pub fn dtw_distance(a: &[f64], b: &[f64], config: &DtwConfig) -> Result<f64> {
    validate_pair(a, b, config)?;

    let cost = config.cost;
    let n = b.len();

    let mut prev = vec![f64::INFINITY; n];
    let mut curr = vec![f64::INFINITY; n];

    prev[0] = cost.eval(a[0], b[0]);
    for j in 1..n {
        prev[j] = prev[j - 1] + cost.eval(a[0], b[j]);
    }

    for (i, &ai) in a.iter().enumerate().skip(1) {
        curr.fill(f64::INFINITY);
        curr[0] = prev[0] + cost.eval(ai, b[0]);

        if let Some((lo, hi)) = band(i, n, config.window) {
            for j in lo..=hi {
                let best = prev[j - 1].min(curr[j - 1]).min(prev[j]);
                curr[j] = cost.eval(ai, b[j]) + best;
            }
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    Ok(prev[n - 1])
}

/// Compute the full accumulated cost matrix.
///
/// # Returns
/// `a.len() x b.len()` matrix; cells outside the warping window are `+inf`.
///
/// # Example
/// ```
/// use knn_dtw::dtw::{cost_matrix, DtwConfig};
///
/// let cost = cost_matrix(&[1.0, 2.0, 3.0], &[1.0, 3.0], &DtwConfig::default()).unwrap();
/// assert_eq!(cost.shape(), &[3, 2]);
/// assert_eq!(cost[(0, 0)], 0.0);
/// ```
pub fn cost_matrix(a: &[f64], b: &[f64], config: &DtwConfig) -> Result<Array2<f64>> {
    validate_pair(a, b, config)?;

    let cost = config.cost;
    let (m, n) = (a.len(), b.len());
    let mut acc = Array2::<f64>::from_elem((m, n), f64::INFINITY);

    acc[(0, 0)] = cost.eval(a[0], b[0]);
    for i in 1..m {
        acc[(i, 0)] = acc[(i - 1, 0)] + cost.eval(a[i], b[0]);
    }
    for j in 1..n {
        acc[(0, j)] = acc[(0, j - 1)] + cost.eval(a[0], b[j]);
    }

    for i in 1..m {
        if let Some((lo, hi)) = band(i, n, config.window) {
            for j in lo..=hi {
                let best = acc[(i - 1, j - 1)]
                    .min(acc[(i, j - 1)])
                    .min(acc[(i - 1, j)]);
                acc[(i, j)] = cost.eval(a[i], b[j]) + best;
            }
        }
    }

    Ok(acc)
}

/// Backtrack the optimal warping path through an accumulated cost matrix.
///
/// Ties prefer the diagonal step, then the step from the left, then from above.
///
/// # Returns
/// Index pairs `(i, j)` from `(0, 0)` to the last cell; empty for an empty matrix.
pub fn backtrack(cost: &Array2<f64>) -> Vec<(usize, usize)> {
    let (m, n) = cost.dim();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let mut i = m - 1;
    let mut j = n - 1;
    let mut path = vec![(i, j)];

    while i > 0 || j > 0 {
        if i == 0 {
            j -= 1;
        } else if j == 0 {
            i -= 1;
        } else {
            let diag = cost[(i - 1, j - 1)];
            let left = cost[(i, j - 1)];
            let up = cost[(i - 1, j)];

            if diag <= left && diag <= up {
                i -= 1;
                j -= 1;
            } else if left <= up {
                j -= 1;
            } else {
                i -= 1;
            }
        }
        path.push((i, j));
    }

    path.reverse();
    path
}

/// Compute the DTW distance together with the optimal warping path.
///
/// # Example
/// ```
/// use knn_dtw::dtw::{dtw, DtwConfig};
///
/// let (distance, path) = dtw(&[1.0, 2.0, 3.0], &[1.0, 2.0, 2.0, 3.0], &DtwConfig::default()).unwrap();
/// assert_eq!(distance, 0.0);
/// assert_eq!(path.first(), Some(&(0, 0)));
/// assert_eq!(path.last(), Some(&(2, 3)));
/// ```
pub fn dtw(a: &[f64], b: &[f64], config: &DtwConfig) -> Result<(f64, Vec<(usize, usize)>)> {
    let acc = cost_matrix(a, b, config)?;
    let distance = acc[(a.len() - 1, b.len() - 1)];
    Ok((distance, backtrack(&acc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_cost_eval() {
        assert_eq!(LocalCost::Absolute.eval(1.0, 3.5), 2.5);
        assert_eq!(LocalCost::Squared.eval(1.0, 3.0), 4.0);
    }

    #[test]
    fn test_local_cost_from_str() {
        assert_eq!("ABS".parse::<LocalCost>().unwrap(), LocalCost::Absolute);
        assert_eq!("squared".parse::<LocalCost>().unwrap(), LocalCost::Squared);
        assert!(matches!(
            "cosine".parse::<LocalCost>(),
            Err(Error::InvalidParameter { name: "cost", .. })
        ));
    }

    #[test]
    fn test_hand_computed_distance() {
        // C = [[0, 2], [1, 1], [3, 1]]
        let d = dtw_distance(&[0.0, 1.0, 2.0], &[0.0, 2.0], &DtwConfig::default()).unwrap();
        assert_relative_eq!(d, 1.0);
    }

    #[test]
    fn test_window_constrains_alignment() {
        let a = [0.0, 1.0, 2.0, 3.0];
        let b = [1.0, 2.0, 3.0, 3.0];

        let diag = dtw_distance(&a, &b, &DtwConfig::default().with_window(0)).unwrap();
        let narrow = dtw_distance(&a, &b, &DtwConfig::default().with_window(1)).unwrap();
        let free = dtw_distance(&a, &b, &DtwConfig::default()).unwrap();

        assert_relative_eq!(diag, 3.0);
        assert_relative_eq!(narrow, 1.0);
        assert_relative_eq!(free, 1.0);
    }

    #[test]
    fn test_window_too_narrow() {
        let a = [0.0; 5];
        let b = [0.0; 2];
        let err = dtw_distance(&a, &b, &DtwConfig::default().with_window(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::WindowTooNarrow {
                window: 2,
                len_a: 5,
                len_b: 2
            }
        ));
        assert!(dtw_distance(&a, &b, &DtwConfig::default().with_window(3)).is_ok());
    }

    #[test]
    fn test_rolling_rows_match_full_matrix() {
        let a: Vec<f64> = (0..30).map(|i| (i as f64 * 0.3).sin()).collect();
        let b: Vec<f64> = (0..22).map(|i| (i as f64 * 0.4).cos()).collect();

        for window in [None, Some(8), Some(12), Some(40)] {
            let config = DtwConfig {
                window,
                cost: LocalCost::Squared,
            };
            let fast = dtw_distance(&a, &b, &config).unwrap();
            let acc = cost_matrix(&a, &b, &config).unwrap();
            assert_relative_eq!(fast, acc[(29, 21)], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cost_matrix_band_is_infinite() {
        let a = [0.0, 1.0, 2.0, 3.0];
        let acc = cost_matrix(&a, &a, &DtwConfig::default().with_window(1)).unwrap();
        assert!(acc[(3, 1)].is_infinite());
        assert!(acc[(1, 3)].is_infinite());
        // First row and column are always accumulated
        assert!(acc[(3, 0)].is_finite());
        assert!(acc[(0, 3)].is_finite());
    }

    #[test]
    fn test_path_steps() {
        let (distance, path) =
            dtw(&[1.0, 2.0, 3.0], &[1.0, 2.0, 2.0, 3.0], &DtwConfig::default()).unwrap();
        assert_eq!(distance, 0.0);
        assert_eq!(path, vec![(0, 0), (1, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_single_samples() {
        let (distance, path) = dtw(&[2.0], &[5.0], &DtwConfig::default()).unwrap();
        assert_eq!(distance, 3.0);
        assert_eq!(path, vec![(0, 0)]);

        // Single row: only the first row is accumulated
        let d = dtw_distance(&[1.0], &[1.0, 2.0, 4.0], &DtwConfig::default()).unwrap();
        assert_eq!(d, 4.0);
    }

    #[test]
    fn test_single_sample_ignores_window() {
        let config = DtwConfig::default().with_window(0);
        assert_eq!(dtw_distance(&[1.0], &[1.0, 2.0, 4.0], &config).unwrap(), 4.0);
        assert_eq!(dtw_distance(&[1.0, 2.0, 4.0], &[1.0], &config).unwrap(), 4.0);

        let (distance, path) = dtw(&[1.0], &[1.0, 2.0, 4.0], &config).unwrap();
        assert_eq!(distance, 4.0);
        assert_eq!(path, vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_invalid_input() {
        let config = DtwConfig::default();
        assert!(matches!(
            dtw_distance(&[], &[1.0], &config),
            Err(Error::EmptySeries)
        ));
        assert!(matches!(
            dtw_distance(&[1.0, f64::INFINITY], &[1.0], &config),
            Err(Error::NonFiniteSeries)
        ));
    }

    #[test]
    fn test_backtrack_empty() {
        let acc = Array2::<f64>::zeros((0, 0));
        assert!(backtrack(&acc).is_empty());
    }
}
