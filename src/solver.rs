//! Fixed-step classical Runge-Kutta 4 propagation.
//!
//! A 4-stage explicit RK4 integrator driven by a caller-supplied time grid.
//! There is no error estimation or step-size control: each interval of the
//! grid is taken in a single step of size Δt = tᵢ₊₁ − tᵢ, so the grid need
//! not be uniform but must be strictly increasing.
//!
//! Reference: Hairer, Nørsett & Wanner, "Solving Ordinary Differential
//! Equations I", Springer, §II.1.

use crate::guidance::GuidanceError;

/// Time-invariant system of ordinary differential equations: dy/dt = f(y).
///
/// The right-hand side receives only the state, never the time; a caller
/// needing time-dependent forcing must encode time as an extra state
/// component. Evaluation is fallible so that singular geometry inside the
/// model surfaces as an error instead of a silent NaN.
pub trait Dynamics<const N: usize> {
    /// Evaluate the right-hand side of the system.
    ///
    /// # Arguments
    /// * `y` - Current state vector
    /// * `dydt` - Output: derivative dy/dt
    fn rhs(&self, y: &[f64; N], dydt: &mut [f64; N]) -> Result<(), GuidanceError>;
}

/// Integration statistics for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Total number of right-hand-side evaluations.
    pub fn_evals: u64,
    /// Number of completed steps.
    pub steps: u64,
}

/// Errors that can occur during propagation.
#[derive(Debug, Clone)]
pub enum PropagationError {
    /// The time grid has fewer than two points, is not strictly
    /// increasing, or contains a non-finite value.
    InvalidTimeGrid {
        /// Description of the defect.
        message: String,
    },
    /// The dynamics model failed at a grid time.
    Guidance {
        /// Grid time of the step in which the failure occurred.
        t: f64,
        /// The underlying guidance failure.
        source: GuidanceError,
    },
    /// A non-finite state component was produced.
    NonFiniteState {
        /// Grid time at which the non-finite component appeared.
        t: f64,
    },
}

impl std::fmt::Display for PropagationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationError::InvalidTimeGrid { message } => {
                write!(f, "Invalid time grid: {}", message)
            }
            PropagationError::Guidance { t, source } => {
                write!(f, "Dynamics failed at t = {}: {}", t, source)
            }
            PropagationError::NonFiniteState { t } => {
                write!(f, "Non-finite state detected at t = {}", t)
            }
        }
    }
}

impl std::error::Error for PropagationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PropagationError::Guidance { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fixed-step RK4 integrator.
///
/// # Type Parameters
/// * `N` - Dimension of the state vector
///
/// Holds pre-allocated stage workspace and evaluation statistics; each call
/// to [`Rk4::propagate`] is otherwise independent, and the integrator keeps
/// no global state, so separate instances may run concurrently.
#[derive(Debug, Clone)]
pub struct Rk4<const N: usize> {
    /// Stage evaluations (pre-allocated workspace).
    k1: [f64; N],
    k2: [f64; N],
    k3: [f64; N],
    k4: [f64; N],
    y_stage: [f64; N],
    /// Integration statistics.
    pub stats: Stats,
}

impl<const N: usize> Default for Rk4<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Rk4<N> {
    /// Create a new RK4 integrator.
    pub fn new() -> Self {
        Self {
            k1: [0.0; N],
            k2: [0.0; N],
            k3: [0.0; N],
            k4: [0.0; N],
            y_stage: [0.0; N],
            stats: Stats::default(),
        }
    }

    /// Reset statistics.
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// Take a single RK4 step of size `h` from state `y`.
    ///
    /// ```text
    /// k1 = f(y)
    /// k2 = f(y + h·k1/2)
    /// k3 = f(y + h·k2/2)
    /// k4 = f(y + h·k3)
    /// y' = y + h·(k1 + 2k2 + 2k3 + k4)/6
    /// ```
    pub fn step<S: Dynamics<N>>(
        &mut self,
        sys: &S,
        y: &[f64; N],
        h: f64,
    ) -> Result<[f64; N], GuidanceError> {
        sys.rhs(y, &mut self.k1)?;

        for n in 0..N {
            self.y_stage[n] = y[n] + h * self.k1[n] / 2.0;
        }
        sys.rhs(&self.y_stage, &mut self.k2)?;

        for n in 0..N {
            self.y_stage[n] = y[n] + h * self.k2[n] / 2.0;
        }
        sys.rhs(&self.y_stage, &mut self.k3)?;

        for n in 0..N {
            self.y_stage[n] = y[n] + h * self.k3[n];
        }
        sys.rhs(&self.y_stage, &mut self.k4)?;

        let mut y_new = [0.0; N];
        for n in 0..N {
            y_new[n] =
                y[n] + h * (self.k1[n] + 2.0 * self.k2[n] + 2.0 * self.k3[n] + self.k4[n]) / 6.0;
        }

        self.stats.fn_evals += 4;
        self.stats.steps += 1;
        Ok(y_new)
    }

    /// Integrate the system over the whole time grid.
    ///
    /// Returns the trajectory: one state per grid sample, the first being
    /// `y0` itself. Failures inside the dynamics model are surfaced with
    /// the grid time at which they occurred; they are never retried.
    pub fn propagate<S: Dynamics<N>>(
        &mut self,
        sys: &S,
        y0: &[f64; N],
        time: &[f64],
    ) -> Result<Vec<[f64; N]>, PropagationError> {
        validate_grid(time)?;
        if !y0.iter().all(|v| v.is_finite()) {
            return Err(PropagationError::NonFiniteState { t: time[0] });
        }

        let mut trajectory = Vec::with_capacity(time.len());
        trajectory.push(*y0);

        for i in 0..time.len() - 1 {
            let h = time[i + 1] - time[i];
            let y = trajectory[i];
            let y_next = self
                .step(sys, &y, h)
                .map_err(|source| PropagationError::Guidance { t: time[i], source })?;
            if !y_next.iter().all(|v| v.is_finite()) {
                return Err(PropagationError::NonFiniteState { t: time[i + 1] });
            }
            trajectory.push(y_next);
        }

        Ok(trajectory)
    }
}

/// Check that the time grid has at least two points, strictly increases,
/// and is finite throughout.
pub fn validate_grid(time: &[f64]) -> Result<(), PropagationError> {
    if time.len() < 2 {
        return Err(PropagationError::InvalidTimeGrid {
            message: format!("need at least 2 grid points, got {}", time.len()),
        });
    }
    for (i, &t) in time.iter().enumerate() {
        if !t.is_finite() {
            return Err(PropagationError::InvalidTimeGrid {
                message: format!("time[{}] is not finite", i),
            });
        }
    }
    for i in 0..time.len() - 1 {
        if time[i + 1] <= time[i] {
            return Err(PropagationError::InvalidTimeGrid {
                message: format!(
                    "grid must be strictly increasing: time[{}] = {} >= time[{}] = {}",
                    i,
                    time[i],
                    i + 1,
                    time[i + 1]
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// f(y) = 0 for any state
    struct ZeroDerivative;

    impl Dynamics<4> for ZeroDerivative {
        fn rhs(&self, _y: &[f64; 4], dydt: &mut [f64; 4]) -> Result<(), GuidanceError> {
            dydt.fill(0.0);
            Ok(())
        }
    }

    /// Constant-velocity motion: state = [x, y, vx, vy]
    struct ConstantVelocity;

    impl Dynamics<4> for ConstantVelocity {
        fn rhs(&self, y: &[f64; 4], dydt: &mut [f64; 4]) -> Result<(), GuidanceError> {
            dydt[0] = y[2];
            dydt[1] = y[3];
            dydt[2] = 0.0;
            dydt[3] = 0.0;
            Ok(())
        }
    }

    /// Harmonic oscillator: y'' + ω²y = 0, state [y, y']
    struct HarmonicOscillator {
        omega: f64,
    }

    impl Dynamics<2> for HarmonicOscillator {
        fn rhs(&self, y: &[f64; 2], dydt: &mut [f64; 2]) -> Result<(), GuidanceError> {
            dydt[0] = y[1];
            dydt[1] = -self.omega * self.omega * y[0];
            Ok(())
        }
    }

    fn uniform_grid(tf: f64, h: f64) -> Vec<f64> {
        let steps = (tf / h).round() as usize;
        (0..=steps).map(|i| i as f64 * h).collect()
    }

    #[test]
    fn test_zero_derivative_invariance() {
        let y0 = [1.0, -2.0, 3.5, 0.25];
        let time = uniform_grid(5.0, 0.1);
        let mut solver = Rk4::new();

        let trajectory = solver.propagate(&ZeroDerivative, &y0, &time).unwrap();

        assert_eq!(trajectory.len(), time.len());
        for sample in &trajectory {
            assert_eq!(sample, &y0);
        }
    }

    #[test]
    fn test_constant_velocity_is_exact() {
        // RK4 reproduces linear dynamics exactly (up to roundoff)
        let y0 = [0.0, 100.0, 3.0, -1.5];
        let time = uniform_grid(10.0, 0.1);
        let mut solver = Rk4::new();

        let trajectory = solver.propagate(&ConstantVelocity, &y0, &time).unwrap();

        for (i, sample) in trajectory.iter().enumerate() {
            let t = time[i];
            assert_relative_eq!(sample[0], y0[0] + y0[2] * t, epsilon = 1e-12);
            assert_relative_eq!(sample[1], y0[1] + y0[3] * t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fourth_order_convergence() {
        // Halving the step must shrink the global error by roughly 2^4
        let sys = HarmonicOscillator { omega: 1.0 };
        let tf = 2.0 * std::f64::consts::PI;
        let y0 = [1.0, 0.0];

        // The rounded grid end need not land exactly on 2π, so compare
        // against the exact solution cos(t) at the actual final time.
        let error_at = |h: f64| {
            let time = uniform_grid(tf, h);
            let mut solver = Rk4::new();
            let trajectory = solver.propagate(&sys, &y0, &time).unwrap();
            let y_final = trajectory.last().unwrap();
            (y_final[0] - time.last().unwrap().cos()).abs()
        };

        let err_h = error_at(0.1);
        let err_h2 = error_at(0.05);
        let ratio = err_h / err_h2;

        println!(
            "err(h) = {:.3e}, err(h/2) = {:.3e}, ratio = {:.1}",
            err_h, err_h2, ratio
        );
        assert!(
            ratio > 10.0 && ratio < 25.0,
            "error ratio {:.1} outside the O(h^4) range [10, 25]",
            ratio
        );
    }

    #[test]
    fn test_nonuniform_grid() {
        // The engine uses the local interval, so a non-uniform grid is fine
        let y0 = [0.0, 0.0, 2.0, 1.0];
        let time = [0.0, 0.1, 0.35, 0.4, 1.0, 2.5];
        let mut solver = Rk4::new();

        let trajectory = solver.propagate(&ConstantVelocity, &y0, &time).unwrap();

        let last = trajectory.last().unwrap();
        assert_relative_eq!(last[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(last[1], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_stats_count_evaluations() {
        let y0 = [0.0, 0.0, 1.0, 1.0];
        let time = uniform_grid(1.0, 0.1);
        let mut solver = Rk4::new();
        solver.propagate(&ConstantVelocity, &y0, &time).unwrap();

        assert_eq!(solver.stats.steps, (time.len() - 1) as u64);
        assert_eq!(solver.stats.fn_evals, 4 * (time.len() - 1) as u64);
    }

    #[test]
    fn test_single_point_grid_rejected() {
        let mut solver = Rk4::new();
        let result = solver.propagate(&ZeroDerivative, &[0.0; 4], &[0.0]);
        assert!(matches!(
            result,
            Err(PropagationError::InvalidTimeGrid { .. })
        ));
    }

    #[test]
    fn test_non_increasing_grid_rejected() {
        let mut solver = Rk4::new();
        for bad in [&[0.0, 1.0, 1.0][..], &[0.0, 2.0, 1.0][..]] {
            let result = solver.propagate(&ZeroDerivative, &[0.0; 4], bad);
            assert!(
                matches!(result, Err(PropagationError::InvalidTimeGrid { .. })),
                "grid {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut solver = Rk4::new();
        let result = solver.propagate(&ZeroDerivative, &[0.0; 4], &[0.0, f64::NAN]);
        assert!(matches!(
            result,
            Err(PropagationError::InvalidTimeGrid { .. })
        ));
    }

    #[test]
    fn test_non_finite_initial_state_rejected() {
        let mut solver = Rk4::new();
        let result = solver.propagate(&ZeroDerivative, &[f64::NAN, 0.0, 0.0, 0.0], &[0.0, 1.0]);
        assert!(matches!(
            result,
            Err(PropagationError::NonFiniteState { .. })
        ));
    }

    #[test]
    fn test_dynamics_failure_carries_time() {
        // Fails once the state grows past a threshold
        struct FailsAbove(f64);
        impl Dynamics<1> for FailsAbove {
            fn rhs(&self, y: &[f64; 1], dydt: &mut [f64; 1]) -> Result<(), GuidanceError> {
                if y[0] > self.0 {
                    return Err(GuidanceError::GeometricSingularity);
                }
                dydt[0] = 1.0;
                Ok(())
            }
        }

        let time = uniform_grid(10.0, 1.0);
        let mut solver = Rk4::new();
        let result = solver.propagate(&FailsAbove(2.5), &[0.0], &time);

        match result {
            Err(PropagationError::Guidance { t, source }) => {
                assert_eq!(source, GuidanceError::GeometricSingularity);
                // y(t) = t crosses 2.5 during the step starting at t = 2
                assert_relative_eq!(t, 2.0);
            }
            other => panic!("expected Guidance error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_state_detected() {
        // Derivative that overflows to infinity in one step
        struct Exploding;
        impl Dynamics<1> for Exploding {
            fn rhs(&self, _y: &[f64; 1], dydt: &mut [f64; 1]) -> Result<(), GuidanceError> {
                dydt[0] = f64::MAX;
                Ok(())
            }
        }

        let mut solver = Rk4::new();
        let result = solver.propagate(&Exploding, &[0.0], &[0.0, 10.0]);
        assert!(matches!(
            result,
            Err(PropagationError::NonFiniteState { .. })
        ));
    }
}
