//! Guidance parameter study: heading error × PN gain × flight time.
//!
//! Reproduces the classic engagement study (three values per axis, 27
//! runs), prints the metric table, and saves miss-distance and
//! intercept-angle curves as PNG plots.
//!
//! Run with:
//!   cargo run --example pursuit_sweep

use plotters::prelude::*;
use propnav::{run_sweep, Metrics, SweepConfig, SweepOutcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mach1 = 340.0;
    let config = SweepConfig {
        target_position: [3000.0, 1000.0],
        pursuer_position: [0.0, 1000.0],
        target_speed: 0.25 * mach1,
        pursuer_speed: 0.9 * mach1,
        target_heading: 10f64.to_radians(),
        heading_errors: vec![2f64.to_radians(), 7f64.to_radians(), 15f64.to_radians()],
        gains: vec![2.0, 3.0, 4.0],
        flight_times: vec![3.0, 10.0, 15.0],
        dt: 0.1,
        accel_limit: 50.0,
        target_accel: 0.0,
    };

    let outcomes = run_sweep(&config);

    println!("θ_HE (°)   N   t_f (s)   miss (m)   intercept angle (°)");
    for outcome in &outcomes {
        let p = &outcome.point;
        match &outcome.metrics {
            Ok(m) => println!(
                "{:7.0} {:3.0} {:9.0} {:10.2} {:17.2}{}",
                p.heading_error.to_degrees(),
                p.gain,
                p.flight_time,
                m.miss_distance,
                m.intercept_angle.to_degrees(),
                if m.truncated { "  (truncated)" } else { "" }
            ),
            Err(e) => println!(
                "{:7.0} {:3.0} {:9.0}   failed: {}",
                p.heading_error.to_degrees(),
                p.gain,
                p.flight_time,
                e
            ),
        }
    }

    std::fs::create_dir_all("outputs")?;
    plot_metric(
        "outputs/miss_distance.png",
        "Miss distance",
        "miss distance (m)",
        &config,
        &outcomes,
        |m| m.miss_distance,
    )?;
    plot_metric(
        "outputs/intercept_angle.png",
        "Intercept angle",
        "angle (deg)",
        &config,
        &outcomes,
        |m| m.intercept_angle.to_degrees(),
    )?;
    println!();
    println!("Plots saved to outputs/");

    Ok(())
}

/// One curve per (heading error, gain) pair, flight time on the x axis.
fn plot_metric(
    path: &str,
    title: &str,
    y_label: &str,
    config: &SweepConfig,
    outcomes: &[SweepOutcome],
    metric: impl Fn(&Metrics) -> f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let values: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| o.metrics.as_ref().ok())
        .map(&metric)
        .collect();
    let y_max = values.iter().cloned().fold(1.0, f64::max) * 1.1;
    let y_min = values.iter().cloned().fold(0.0, f64::min);
    let x_max = config
        .flight_times
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max)
        * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("time of flight (s)")
        .y_desc(y_label)
        .draw()?;

    let n_times = config.flight_times.len();
    for (series, chunk) in outcomes.chunks(n_times).enumerate() {
        let color = Palette99::pick(series).mix(1.0);
        let points: Vec<(f64, f64)> = chunk
            .iter()
            .filter_map(|o| o.metrics.as_ref().ok().map(|m| (o.point.flight_time, metric(m))))
            .collect();

        let label = format!(
            "θ_HE = {:.0}°, N = {:.0}",
            chunk[0].point.heading_error.to_degrees(),
            chunk[0].point.gain
        );
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;

    Ok(())
}
