//! Signal generators and plain-text dataset loading.
//!
//! Datasets are stored one series per line as whitespace-separated numbers,
//! with labels in a companion file holding one integer per line.

use ndarray::Array2;
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Evenly spaced samples over `[start, stop]`, endpoints included.
///
/// # Example
/// ```
/// use knn_dtw::io::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Generate `amplitude * sin(t + phase)` at each time in `times`.
pub fn sine(times: &[f64], amplitude: f64, phase: f64) -> Vec<f64> {
    times
        .iter()
        .map(|&t| amplitude * (t + phase).sin())
        .collect()
}

/// Load a dataset of equal-length time series, one per line.
///
/// Blank lines are skipped.
///
/// # Errors
/// * [`Error::Io`] if the file cannot be read
/// * [`Error::Parse`] on a token that is not a number
/// * [`Error::ShapeMismatch`] if lines hold different numbers of samples
/// * [`Error::EmptySeries`] if the file holds no data
pub fn load_series_txt<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let text = fs::read_to_string(path)?;
    parse_series(&text)
}

/// Load integer class labels, one per line.
///
/// # Errors
/// * [`Error::Io`] if the file cannot be read
/// * [`Error::Parse`] on a line that is not a non-negative integer
pub fn load_labels_txt<P: AsRef<Path>>(path: P) -> Result<Vec<usize>> {
    let text = fs::read_to_string(path)?;
    parse_labels(&text)
}

fn parse_series(text: &str) -> Result<Array2<f64>> {
    let mut width: Option<usize> = None;
    let mut rows = 0usize;
    let mut data = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let before = data.len();
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| Error::Parse {
                line: idx + 1,
                token: token.to_string(),
            })?;
            data.push(value);
        }
        let count = data.len() - before;

        match width {
            None => width = Some(count),
            Some(w) if w != count => {
                return Err(Error::ShapeMismatch {
                    expected: format!("{w} values per line"),
                    got: format!("{count} values on line {}", idx + 1),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let width = width.ok_or(Error::EmptySeries)?;
    Array2::from_shape_vec((rows, width), data).map_err(|e| Error::ShapeMismatch {
        expected: format!("{rows}x{width}"),
        got: e.to_string(),
    })
}

fn parse_labels(text: &str) -> Result<Vec<usize>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let token = line.trim();
            // Labels are often written as floats ("1.0000000e+00")
            token
                .parse::<usize>()
                .ok()
                .or_else(|| {
                    token
                        .parse::<f64>()
                        .ok()
                        .filter(|v| {
                            *v >= 0.0 && v.fract() == 0.0 && *v < usize::MAX as f64
                        })
                        .map(|v| v as usize)
                })
                .ok_or_else(|| Error::Parse {
                    line: idx + 1,
                    token: token.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let t = linspace(0.0, 20.0, 1000);
        assert_eq!(t.len(), 1000);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[999], 20.0);
        assert_relative_eq!(t[1] - t[0], 20.0 / 999.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sine_amplitude_and_phase() {
        let t = [0.0, std::f64::consts::FRAC_PI_2];
        let y = sine(&t, 5.0, 0.0);
        assert_relative_eq!(y[0], 0.0);
        assert_relative_eq!(y[1], 5.0);

        let shifted = sine(&[0.0], 3.0, 1.0);
        assert_relative_eq!(shifted[0], 3.0 * 1.0f64.sin());
    }

    #[test]
    fn test_parse_series() {
        let data = parse_series("1 2 3\n\n  4.5 -1e1 6\n").unwrap();
        assert_eq!(data.dim(), (2, 3));
        assert_eq!(data[(1, 1)], -10.0);
    }

    #[test]
    fn test_parse_series_ragged() {
        assert!(matches!(
            parse_series("1 2 3\n4 5\n"),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_series_bad_token() {
        match parse_series("1 2\n3 x\n") {
            Err(Error::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_series_empty() {
        assert!(matches!(parse_series("\n \n"), Err(Error::EmptySeries)));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(parse_labels("1\n2\n\n3.0e+00\n").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            parse_labels("1\n-2\n"),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(parse_labels("1.5\n").is_err());
    }

    #[test]
    fn test_parse_labels_out_of_range() {
        assert!(matches!(
            parse_labels("0\n1e300\n"),
            Err(Error::Parse { line: 2, .. })
        ));
    }
}
