//! Line charts for time series.
//!
//! Enable with the `display` feature in Cargo.toml:
//!
//! ```toml
//! [dependencies]
//! knn-dtw = { version = "0.1", features = ["display"] }
//! ```
//!
//! Charts render either to an RGB raster (saved as PPM, no text) or to SVG
//! with a title, axis descriptions and a legend.

use plotters::prelude::*;
use std::io::Write;
use std::path::Path;

use crate::{Error, Result};

/// Matplotlib's `tab10` palette; series without an explicit colour cycle through it.
pub const TAB10: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
];

/// Smallest SVG size that leaves room for the caption, axis descriptions and legend.
pub const MIN_SVG_SIZE: (u32, u32) = (480, 240);

/// Largest raster buffer `to_rgb` will allocate, in bytes.
const MAX_RASTER_BYTES: usize = 1 << 30;

/// Chart title used for a DTW distance between series `A` and `B`.
///
/// # Example
/// ```
/// use knn_dtw::display::dtw_title;
///
/// assert_eq!(dtw_title(1234.5678), "DTW distance between A and B is 1234.57");
/// ```
pub fn dtw_title(distance: f64) -> String {
    format!("DTW distance between A and B is {distance:.2}")
}

/// One named line on a chart.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Option<(u8, u8, u8)>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            color: None,
        }
    }

    pub fn with_color(mut self, color: (u8, u8, u8)) -> Self {
        self.color = Some(color);
        self
    }
}

/// A 2D line chart with any number of series on shared axes.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub width: u32,
    pub height: u32,
}

impl Default for LineChart {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
            width: 1200,
            height: 400,
        }
    }
}

impl LineChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(Error::InvalidParameter {
                name: "series",
                value: "0".to_string(),
                reason: "chart needs at least one series".to_string(),
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidParameter {
                name: "size",
                value: format!("{}x{}", self.width, self.height),
                reason: "width and height must be positive".to_string(),
            });
        }
        raster_len(self.width as usize, self.height as usize)?;
        for s in &self.series {
            if s.x.len() != s.y.len() {
                return Err(Error::ShapeMismatch {
                    expected: format!("{} y values for series `{}`", s.x.len(), s.label),
                    got: s.y.len().to_string(),
                });
            }
            if s.x.is_empty() {
                return Err(Error::EmptySeries);
            }
            if !s.x.iter().chain(&s.y).all(|v| v.is_finite()) {
                return Err(Error::NonFiniteSeries);
            }
        }
        Ok(())
    }

    /// `(x_min, x_max, y_min, y_max)` over all series, never zero-width.
    fn bounds(&self) -> (f64, f64, f64, f64) {
        let (x_min, x_max) = extent(self.series.iter().flat_map(|s| s.x.iter().copied()));
        let (y_min, y_max) = extent(self.series.iter().flat_map(|s| s.y.iter().copied()));

        let widen = |lo: f64, hi: f64| {
            if hi - lo < 1e-10 {
                (lo - 0.5, hi + 0.5)
            } else {
                (lo, hi)
            }
        };
        let (x_min, x_max) = widen(x_min, x_max);
        let (y_min, y_max) = widen(y_min, y_max);
        (x_min, x_max, y_min, y_max)
    }

    fn color(&self, idx: usize) -> (u8, u8, u8) {
        self.series[idx].color.unwrap_or(TAB10[idx % TAB10.len()])
    }

    /// Render the chart as RGB pixels (`width * height * 3` bytes).
    ///
    /// # Example
    /// ```
    /// use knn_dtw::display::{LineChart, Series};
    ///
    /// let x: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
    /// let y: Vec<f64> = x.iter().map(|t| t.sin()).collect();
    /// let chart = LineChart::new("sine").with_size(200, 100).with_series(Series::new("A", x, y));
    /// let pixels = chart.to_rgb().unwrap();
    /// assert_eq!(pixels.len(), 200 * 100 * 3);
    /// ```
    pub fn to_rgb(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let width = self.width as usize;
        let height = self.height as usize;
        let (x_min, x_max, y_min, y_max) = self.bounds();

        let mut pixels = vec![255u8; raster_len(width, height)?];

        let to_pixel = |x: f64, y: f64| -> (i64, i64) {
            let col = (x - x_min) / (x_max - x_min) * (width - 1) as f64;
            // Row 0 is the top of the image
            let row = (1.0 - (y - y_min) / (y_max - y_min)) * (height - 1) as f64;
            (col.round() as i64, row.round() as i64)
        };

        if y_min < 0.0 && y_max > 0.0 {
            let (_, zero_row) = to_pixel(x_min, 0.0);
            draw_line(
                &mut pixels,
                width,
                height,
                (0, zero_row),
                (width as i64 - 1, zero_row),
                (210, 210, 210),
            );
        }

        for (idx, s) in self.series.iter().enumerate() {
            let color = self.color(idx);
            let points: Vec<(i64, i64)> =
                s.x.iter().zip(&s.y).map(|(&x, &y)| to_pixel(x, y)).collect();

            if let [only] = points.as_slice() {
                draw_line(&mut pixels, width, height, *only, *only, color);
            }
            for pair in points.windows(2) {
                draw_line(&mut pixels, width, height, pair[0], pair[1], color);
            }
        }

        Ok(pixels)
    }

    /// Save the raster rendering as a PPM image.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let pixels = self.to_rgb()?;
        save_ppm(path, self.width as usize, self.height as usize, &pixels)
    }

    /// Save the chart as SVG with caption, axis descriptions and legend.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if the size is below [`MIN_SVG_SIZE`], where
    /// the axis descriptions would not fit.
    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let (min_width, min_height) = MIN_SVG_SIZE;
        if self.width < min_width || self.height < min_height {
            return Err(Error::InvalidParameter {
                name: "size",
                value: format!("{}x{}", self.width, self.height),
                reason: format!("SVG charts need at least {min_width}x{min_height}"),
            });
        }
        let (x_min, x_max, y_min, y_max) = self.bounds();

        let root = SVGBackend::new(path.as_ref(), (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .axis_desc_style(("sans-serif", 16))
            .draw()
            .map_err(render_error)?;

        for (idx, s) in self.series.iter().enumerate() {
            let (r, g, b) = self.color(idx);
            let color = RGBColor(r, g, b);
            chart
                .draw_series(LineSeries::new(
                    s.x.iter().copied().zip(s.y.iter().copied()),
                    &color,
                ))
                .map_err(render_error)?
                .label(s.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Byte length of an RGB raster, bounded by `MAX_RASTER_BYTES`.
fn raster_len(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(3))
        .filter(|&len| len <= MAX_RASTER_BYTES)
        .ok_or_else(|| Error::InvalidParameter {
            name: "size",
            value: format!("{width}x{height}"),
            reason: format!("raster would exceed {MAX_RASTER_BYTES} bytes"),
        })
}

fn render_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

/// Bresenham line, clipped to the image.
fn draw_line(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    from: (i64, i64),
    to: (i64, i64),
    color: (u8, u8, u8),
) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            let idx = (y as usize * width + x as usize) * 3;
            pixels[idx] = color.0;
            pixels[idx + 1] = color.1;
            pixels[idx + 2] = color.2;
        }
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Save RGB pixel data as a binary PPM (P6) image.
///
/// # Arguments
/// * `path` - Output file path (should end in .ppm)
/// * `width` - Image width
/// * `height` - Image height
/// * `pixels` - RGB pixel data (width * height * 3 bytes)
pub fn save_ppm<P: AsRef<Path>>(path: P, width: usize, height: usize, pixels: &[u8]) -> Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(3))
        .ok_or_else(|| Error::InvalidParameter {
            name: "size",
            value: format!("{width}x{height}"),
            reason: "pixel count overflows".to_string(),
        })?;
    if pixels.len() != expected {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected} bytes"),
            got: format!("{} bytes", pixels.len()),
        });
    }

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "P6")?;
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;
    file.write_all(pixels)?;
    Ok(())
}
