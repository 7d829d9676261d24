//! Parameter sweep over heading error × PN gain × flight time.
//!
//! Drives one simulated engagement per parameter combination and tabulates
//! the intercept-quality metrics. Runs are independent and share no mutable
//! state, so the grid is evaluated in parallel with rayon. A failing
//! combination (degenerate geometry, infeasible guidance, too-short grid)
//! is recorded in its cell and never aborts the rest of the sweep.

use rayon::prelude::*;

use crate::guidance::PurePn;
use crate::intercept::simulate;
use crate::solver::PropagationError;
use crate::state::EngagementGeometry;

/// Uniform time grid \[0, `tf`) with step `dt`, endpoint excluded.
///
/// Sample times are computed as i·dt rather than by accumulation, so the
/// spacing does not drift over long runs. A non-positive `tf` or `dt`
/// yields an empty grid, which the propagation engine rejects as
/// [`PropagationError::InvalidTimeGrid`].
pub fn time_grid(tf: f64, dt: f64) -> Vec<f64> {
    if dt <= 0.0 || tf <= 0.0 {
        return Vec::new();
    }
    let mut time = Vec::with_capacity((tf / dt).ceil() as usize);
    let mut i = 0u64;
    loop {
        let t = i as f64 * dt;
        if t >= tf {
            break;
        }
        time.push(t);
        i += 1;
    }
    time
}

/// Sweep definition: fixed engagement geometry plus the three swept axes.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Initial target position (m).
    pub target_position: [f64; 2],
    /// Initial pursuer position (m).
    pub pursuer_position: [f64; 2],
    /// Initial target speed (m/s).
    pub target_speed: f64,
    /// Initial pursuer speed (m/s).
    pub pursuer_speed: f64,
    /// Initial target heading (rad).
    pub target_heading: f64,
    /// Heading-error bias values to sweep (rad). The pursuer's initial
    /// heading is set to the bias under test.
    pub heading_errors: Vec<f64>,
    /// PN gain values to sweep (dimensionless).
    pub gains: Vec<f64>,
    /// Flight times to sweep (s).
    pub flight_times: Vec<f64>,
    /// Integration step (s).
    pub dt: f64,
    /// Pursuer lateral acceleration limit (m/s²).
    pub accel_limit: f64,
    /// Target body-axis acceleration (m/s²); zero for a non-maneuvering
    /// target.
    pub target_accel: f64,
}

/// One parameter combination within a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Heading-error bias (rad).
    pub heading_error: f64,
    /// PN gain.
    pub gain: f64,
    /// Flight time (s).
    pub flight_time: f64,
}

/// Intercept-quality metrics for one completed run.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    /// Miss distance (m).
    pub miss_distance: f64,
    /// Intercept angle (rad): the reported lead-plus-bias angle with the
    /// swept heading-error bias added back, as tabulated in the study.
    pub intercept_angle: f64,
    /// Whether the closest approach fell on the final sample (the run may
    /// not have given the pursuer enough flight time).
    pub truncated: bool,
}

/// Result cell for one parameter combination.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// The parameter combination this cell belongs to.
    pub point: SweepPoint,
    /// Metrics, or the failure that stopped this combination.
    pub metrics: Result<Metrics, PropagationError>,
}

/// Run the full sweep grid.
///
/// Cells are returned in row-major order (heading error outermost, then
/// gain, then flight time), one outcome per combination, deterministically
/// ordered regardless of the parallel schedule.
pub fn run_sweep(config: &SweepConfig) -> Vec<SweepOutcome> {
    let mut points =
        Vec::with_capacity(config.heading_errors.len() * config.gains.len() * config.flight_times.len());
    for &heading_error in &config.heading_errors {
        for &gain in &config.gains {
            for &flight_time in &config.flight_times {
                points.push(SweepPoint {
                    heading_error,
                    gain,
                    flight_time,
                });
            }
        }
    }

    points
        .into_par_iter()
        .map(|point| SweepOutcome {
            metrics: run_point(config, &point),
            point,
        })
        .collect()
}

fn run_point(config: &SweepConfig, point: &SweepPoint) -> Result<Metrics, PropagationError> {
    let time = time_grid(point.flight_time, config.dt);
    let geometry = EngagementGeometry {
        target_position: config.target_position,
        pursuer_position: config.pursuer_position,
        target_speed: config.target_speed,
        pursuer_speed: config.pursuer_speed,
        target_heading: config.target_heading,
        pursuer_heading: point.heading_error,
    };
    let pn = PurePn::new(point.gain, point.heading_error, config.accel_limit)
        .with_target_accel(config.target_accel);

    let intercept = simulate(&pn, &geometry.initial_state(), &time)?;
    Ok(Metrics {
        miss_distance: intercept.miss_distance,
        intercept_angle: intercept.lead_angle_plus_heading_error + point.heading_error,
        truncated: intercept.is_truncated(),
    })
}
