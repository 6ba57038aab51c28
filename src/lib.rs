//! Dynamic Time Warping distance and k-nearest-neighbour time series
//! classification for Rust.
//!
//! DTW aligns two time series non-linearly in time and reports the
//! accumulated point-wise cost of the best alignment. A Sakoe-Chiba warping
//! window bounds how far the alignment may stray from the diagonal. The
//! [`KnnDtw`] classifier labels a series by majority vote among its DTW
//! nearest neighbours in a training set.
//!
//! # Quick Start
//!
//! ```rust
//! use knn_dtw::{io, KnnDtw};
//!
//! // Two sine waves with different amplitude and phase
//! let time = io::linspace(0.0, 20.0, 1000);
//! let a = io::sine(&time, 5.0, 0.0);
//! let b = io::sine(&time, 3.0, 1.0);
//!
//! let model = KnnDtw::<u8>::default();
//! let distance = model.dtw_distance(&a, &b).unwrap();
//! assert!(distance > 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dtw`] | DTW distance, cost matrix, warping path, local costs |
//! | [`knn`] | `KnnDtw` classifier, distance matrices |
//! | [`metrics`] | Accuracy, confusion matrix, classification report |
//! | [`io`] | Signal generators and plain-text dataset loading |
//! | `display` | Line charts as PPM raster or SVG (feature `display`) |
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`.
//!
//! # Logging
//!
//! Distance matrix progress is reported through the [`log`] facade at
//! `debug` level, with `info` summaries. Install any logger (for example
//! `env_logger`) to see it.
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `display` | Line chart rendering (PPM raster, SVG via plotters) |

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod dtw;
pub mod io;
pub mod knn;
pub mod metrics;

#[cfg(feature = "display")]
pub mod display;

pub use dtw::{DtwConfig, LocalCost, dtw_distance};
pub use knn::{KnnDtw, KnnDtwConfig, Prediction};
