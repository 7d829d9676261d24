//! Intercept extraction from an integrated engagement trajectory.
//!
//! The propagation engine produces one state per grid sample; this module
//! derives the pursuer-to-target distance series from it, locates the point
//! of closest approach, and reports the guidance lead angle at that point.
//!
//! Some input combinations leave the pursuer too little flight time to
//! reach the target; others intercept early and then overshoot for the rest
//! of the run. Taking the minimum of the whole distance series handles both,
//! and [`Intercept::is_truncated`] flags the first case for the caller.

use crate::guidance::lead_angle_plus_heading_error;
use crate::solver::{Dynamics, PropagationError, Rk4};
use crate::state::{separation, State, STATE_DIM};

/// Result of one simulated engagement. Immutable once returned.
#[derive(Debug, Clone)]
pub struct Intercept {
    /// Integrated trajectory, one state per time-grid sample.
    pub trajectory: Vec<State>,
    /// Minimum pursuer-to-target separation over the run (m).
    pub miss_distance: f64,
    /// Grid index of the first occurrence of the minimum separation.
    pub intercept_index: usize,
    /// Lead angle at the intercept point with the heading-error bias still
    /// included (rad); subtract the bias you supplied to isolate the
    /// guidance-induced component.
    pub lead_angle_plus_heading_error: f64,
}

impl Intercept {
    /// Whether the closest approach fell on the final sample, meaning the
    /// pursuer may simply have run out of flight time before converging.
    pub fn is_truncated(&self) -> bool {
        self.intercept_index + 1 == self.trajectory.len()
    }

    /// Lead angle at the intercept point (rad) with the given heading-error
    /// bias subtracted out.
    pub fn lead_angle(&self, heading_error: f64) -> f64 {
        self.lead_angle_plus_heading_error - heading_error
    }
}

/// Pursuer-to-target distance at every trajectory sample (m).
pub fn distance_series(trajectory: &[State]) -> Vec<f64> {
    trajectory.iter().map(separation).collect()
}

/// First minimum of a distance series: (index, value).
///
/// Ties are broken by the earliest time. The series must be non-empty and
/// free of NaN, which the propagation engine guarantees.
pub fn closest_approach(distances: &[f64]) -> (usize, f64) {
    let mut index = 0;
    let mut min = distances[0];
    for (i, &d) in distances.iter().enumerate().skip(1) {
        if d < min {
            index = i;
            min = d;
        }
    }
    (index, min)
}

/// Integrate an engagement over the time grid and extract the intercept.
///
/// Runs fixed-step RK4 on `sys` from `y0`, then post-processes the
/// trajectory: distance series, first-minimum miss distance, and the lead
/// angle recomputed from the stored state at the intercept index. Domain
/// failures inside the dynamics or the lead-angle recomputation are
/// propagated, never masked as NaN.
pub fn simulate<S: Dynamics<STATE_DIM>>(
    sys: &S,
    y0: &State,
    time: &[f64],
) -> Result<Intercept, PropagationError> {
    let mut solver = Rk4::new();
    let trajectory = solver.propagate(sys, y0, time)?;

    let distances = distance_series(&trajectory);
    let (intercept_index, miss_distance) = closest_approach(&distances);

    let lead = lead_angle_plus_heading_error(&trajectory[intercept_index]).map_err(|source| {
        PropagationError::Guidance {
            t: time[intercept_index],
            source,
        }
    })?;

    Ok(Intercept {
        trajectory,
        miss_distance,
        intercept_index,
        lead_angle_plus_heading_error: lead,
    })
}
