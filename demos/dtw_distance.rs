//! DTW Distance Example
//!
//! Measures the DTW distance between two sine waves that differ in amplitude
//! and phase, then plots both with the distance in the chart title.
//!
//! Run with `cargo run --example dtw_distance --features display` to write
//! `dtw_distance.svg` and `dtw_distance.ppm`.

use knn_dtw::{KnnDtw, io};
use log::info;

fn main() -> knn_dtw::Result<()> {
    env_logger::init();
    info!("DTW Distance Example");

    let time = io::linspace(0.0, 20.0, 1000);
    let amplitude_a = io::sine(&time, 5.0, 0.0);
    let amplitude_b = io::sine(&time, 3.0, 1.0);

    let model = KnnDtw::<usize>::default();
    let distance = model.dtw_distance(&amplitude_a, &amplitude_b)?;
    info!("DTW distance between A and B is {:.2}", distance);

    #[cfg(feature = "display")]
    {
        use knn_dtw::display::{LineChart, Series, dtw_title};

        let chart = LineChart::new(dtw_title(distance))
            .with_labels("Time", "Amplitude")
            .with_size(1200, 400)
            .with_series(Series::new("A", time.clone(), amplitude_a))
            .with_series(Series::new("B", time, amplitude_b));

        chart.save_svg("dtw_distance.svg")?;
        chart.save_ppm("dtw_distance.ppm")?;
        info!("Chart saved to dtw_distance.svg and dtw_distance.ppm");
    }

    Ok(())
}
