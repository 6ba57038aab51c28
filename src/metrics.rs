//! Classification scoring: accuracy, confusion matrix and per-label report.

use ndarray::Array2;
use std::collections::BTreeSet;
use std::fmt;

use crate::{Error, Result};

fn check_lengths<L>(truth: &[L], predicted: &[L]) -> Result<()> {
    if truth.len() != predicted.len() {
        return Err(Error::ShapeMismatch {
            expected: format!("{} predictions", truth.len()),
            got: format!("{} predictions", predicted.len()),
        });
    }
    if truth.is_empty() {
        return Err(Error::EmptySeries);
    }
    Ok(())
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Fraction of predictions equal to the true label.
///
/// # Example
/// ```
/// use knn_dtw::metrics::accuracy;
///
/// assert_eq!(accuracy(&[1, 2, 3, 4], &[1, 2, 0, 4]).unwrap(), 0.75);
/// ```
pub fn accuracy<L: PartialEq>(truth: &[L], predicted: &[L]) -> Result<f64> {
    check_lengths(truth, predicted)?;
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    Ok(ratio(correct, truth.len()))
}

/// Counts of (true label, predicted label) pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix<L> {
    /// Sorted union of the labels seen in either input.
    pub labels: Vec<L>,
    /// `counts[(t, p)]`: samples of class `labels[t]` predicted as `labels[p]`.
    pub counts: Array2<usize>,
}

impl<L: Ord> ConfusionMatrix<L> {
    fn index_of(&self, label: &L) -> Option<usize> {
        self.labels.binary_search(label).ok()
    }

    /// Number of samples of class `truth` predicted as `predicted`.
    pub fn count(&self, truth: &L, predicted: &L) -> usize {
        match (self.index_of(truth), self.index_of(predicted)) {
            (Some(t), Some(p)) => self.counts[(t, p)],
            _ => 0,
        }
    }
}

/// Build the confusion matrix of a set of predictions.
pub fn confusion_matrix<L: Clone + Ord>(
    truth: &[L],
    predicted: &[L],
) -> Result<ConfusionMatrix<L>> {
    check_lengths(truth, predicted)?;

    let labels: Vec<L> = truth
        .iter()
        .chain(predicted)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let n = labels.len();
    let mut matrix = ConfusionMatrix {
        labels,
        counts: Array2::zeros((n, n)),
    };
    for (t, p) in truth.iter().zip(predicted) {
        if let (Some(ti), Some(pi)) = (matrix.index_of(t), matrix.index_of(p)) {
            matrix.counts[(ti, pi)] += 1;
        }
    }
    Ok(matrix)
}

/// Precision, recall and F1 for one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore<L> {
    pub label: L,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of samples whose true label is `label`.
    pub support: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-label scores with overall accuracy and averages.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport<L> {
    pub scores: Vec<LabelScore<L>>,
    pub accuracy: f64,
    /// Unweighted mean over labels.
    pub macro_avg: Averages,
    /// Mean over labels weighted by support.
    pub weighted_avg: Averages,
    pub total: usize,
}

/// Score a set of predictions per label.
///
/// Precision or recall with a zero denominator is reported as `0.0`.
///
/// # Example
/// ```
/// use knn_dtw::metrics::classification_report;
///
/// let report = classification_report(&["a", "a", "b"], &["a", "b", "b"]).unwrap();
/// assert_eq!(report.scores[0].recall, 0.5);
/// assert_eq!(report.scores[1].precision, 0.5);
/// println!("{report}");
/// ```
pub fn classification_report<L: Clone + Ord>(
    truth: &[L],
    predicted: &[L],
) -> Result<ClassificationReport<L>> {
    let cm = confusion_matrix(truth, predicted)?;
    let total = truth.len();

    let scores: Vec<LabelScore<L>> = cm
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let tp = cm.counts[(i, i)];
            let support = cm.counts.row(i).sum();
            let predicted_as = cm.counts.column(i).sum();
            let precision = ratio(tp, predicted_as);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            LabelScore {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let n_labels = scores.len() as f64;
    let macro_avg = Averages {
        precision: scores.iter().map(|s| s.precision).sum::<f64>() / n_labels,
        recall: scores.iter().map(|s| s.recall).sum::<f64>() / n_labels,
        f1: scores.iter().map(|s| s.f1).sum::<f64>() / n_labels,
    };

    let weighted_avg = Averages {
        precision: weighted(&scores, total, |s| s.precision),
        recall: weighted(&scores, total, |s| s.recall),
        f1: weighted(&scores, total, |s| s.f1),
    };

    let correct = (0..cm.labels.len()).map(|i| cm.counts[(i, i)]).sum();

    Ok(ClassificationReport {
        accuracy: ratio(correct, total),
        scores,
        macro_avg,
        weighted_avg,
        total,
    })
}

fn weighted<L>(scores: &[LabelScore<L>], total: usize, f: impl Fn(&LabelScore<L>) -> f64) -> f64 {
    scores.iter().map(|s| f(s) * s.support as f64).sum::<f64>() / total as f64
}

impl<L: fmt::Display> fmt::Display for ClassificationReport<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.scores.iter().map(|s| s.label.to_string()).collect();
        let width = names
            .iter()
            .map(String::len)
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, s) in names.iter().zip(&self.scores) {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
                name, s.precision, s.recall, s.f1, s.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>9}",
            "accuracy", "", "", self.accuracy, self.total
        )?;
        for (name, avg) in [("macro avg", self.macro_avg), ("weighted avg", self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.total
            )?;
        }
        Ok(())
    }
}
