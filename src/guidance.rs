//! Pure proportional-navigation dynamics model.
//!
//! Given a nine-component engagement state, [`PurePn`] computes the state
//! derivative for a planar pursuit: the target flies under an optional
//! body-axis acceleration while the pursuer steers with a pure PN law,
//! commanding lateral acceleration proportional to the line-of-sight rate
//! and its own speed, saturated at a configurable limit.
//!
//! Assumptions carried by the model:
//! - masses are constant, so the equations are time-invariant
//! - gravity is the only external force on both vehicles
//! - no sensing or actuation dynamics; commands take effect instantaneously
//!
//! The geometry helpers ([`los_angle`], [`los_rate`], [`speed_ratio`],
//! [`lead_angle_plus_heading_error`]) are shared with the intercept
//! post-processing, which re-evaluates them at the closest-approach sample.
//!
//! # References
//! Zarchan, P. "Tactical and Strategic Missile Guidance", AIAA, ch. 2.

use crate::solver::Dynamics;
use crate::state::{
    pursuer_speed, target_speed, State, PURSUER_POS_X, PURSUER_POS_Y, PURSUER_VEL_X,
    PURSUER_VEL_Y, STATE_DIM, TARGET_HEADING, TARGET_POS_X, TARGET_POS_Y, TARGET_VEL_X,
    TARGET_VEL_Y,
};

/// Standard gravitational acceleration (m/s²), the flat-Earth default.
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Which vehicle a singular quantity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vehicle {
    /// The maneuvering target.
    Target,
    /// The guided pursuer.
    Pursuer,
}

/// Failures raised by the guidance geometry.
///
/// All of these are detected at the point of computation and surfaced as
/// errors rather than being allowed to flow downstream as NaN or infinity.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceError {
    /// Pursuer and target positions coincide, leaving the line of sight
    /// undefined. Mid-run this means the pursuer has closed to zero range;
    /// at the initial sample it is a degenerate setup.
    GeometricSingularity,
    /// One vehicle's speed is zero, leaving the velocity ratio or the
    /// target heading rate undefined.
    ZeroSpeedSingularity {
        /// Which vehicle's speed vanished.
        vehicle: Vehicle,
    },
    /// The lead-angle arcsine argument fell outside [-1, 1]: the requested
    /// gain / heading-error / velocity-ratio combination admits no real
    /// intercept geometry.
    InfeasibleGeometry {
        /// The offending arcsine argument.
        sine_ratio: f64,
    },
}

impl std::fmt::Display for GuidanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuidanceError::GeometricSingularity => {
                write!(f, "pursuer and target coincide; line of sight is undefined")
            }
            GuidanceError::ZeroSpeedSingularity { vehicle } => {
                let who = match vehicle {
                    Vehicle::Target => "target",
                    Vehicle::Pursuer => "pursuer",
                };
                write!(f, "{} speed is zero; velocity ratio is undefined", who)
            }
            GuidanceError::InfeasibleGeometry { sine_ratio } => {
                write!(
                    f,
                    "lead-angle arcsine argument {} outside [-1, 1]; no intercept solution",
                    sine_ratio
                )
            }
        }
    }
}

impl std::error::Error for GuidanceError {}

/// Line-of-sight angle from pursuer to target (rad).
///
/// Four-quadrant bearing of the relative position in the inertial frame.
pub fn los_angle(y: &State) -> Result<f64, GuidanceError> {
    let dx = y[TARGET_POS_X] - y[PURSUER_POS_X];
    let dy = y[TARGET_POS_Y] - y[PURSUER_POS_Y];
    if dx == 0.0 && dy == 0.0 {
        return Err(GuidanceError::GeometricSingularity);
    }
    Ok(dy.atan2(dx))
}

/// Line-of-sight angular rate (rad/s).
///
/// Cross product of relative position and relative velocity over the
/// squared range.
pub fn los_rate(y: &State) -> Result<f64, GuidanceError> {
    let dx = y[TARGET_POS_X] - y[PURSUER_POS_X];
    let dy = y[TARGET_POS_Y] - y[PURSUER_POS_Y];
    let range_sq = dx * dx + dy * dy;
    if range_sq == 0.0 {
        return Err(GuidanceError::GeometricSingularity);
    }
    let dvx = y[TARGET_VEL_X] - y[PURSUER_VEL_X];
    let dvy = y[TARGET_VEL_Y] - y[PURSUER_VEL_Y];
    Ok((dx * dvy - dy * dvx) / range_sq)
}

/// Pursuer-to-target speed ratio γ = |v_P| / |v_T|.
pub fn speed_ratio(y: &State) -> Result<f64, GuidanceError> {
    let v_t = target_speed(y);
    if v_t == 0.0 {
        return Err(GuidanceError::ZeroSpeedSingularity {
            vehicle: Vehicle::Target,
        });
    }
    let v_p = pursuer_speed(y);
    if v_p == 0.0 {
        return Err(GuidanceError::ZeroSpeedSingularity {
            vehicle: Vehicle::Pursuer,
        });
    }
    Ok(v_p / v_t)
}

/// Lead angle plus heading-error bias (rad): asin(sin(β + θ_LOS) / γ).
///
/// The heading-error bias is deliberately not subtracted here, so a caller
/// that knows the bias it supplied can isolate the guidance-induced lead
/// component by subtracting it.
pub fn lead_angle_plus_heading_error(y: &State) -> Result<f64, GuidanceError> {
    let theta_los = los_angle(y)?;
    let gamma = speed_ratio(y)?;
    let sine_ratio = (y[TARGET_HEADING] + theta_los).sin() / gamma;
    if !(-1.0..=1.0).contains(&sine_ratio) {
        return Err(GuidanceError::InfeasibleGeometry { sine_ratio });
    }
    Ok(sine_ratio.asin())
}

/// Intermediate guidance quantities for one derivative evaluation.
struct GuidanceTerms {
    /// Line-of-sight angle (rad).
    theta_los: f64,
    /// Lead angle with the heading-error bias subtracted (rad).
    theta_lead: f64,
    /// Commanded lateral acceleration after saturation (m/s²).
    accel: f64,
}

/// Pure proportional-navigation guidance parameters.
///
/// Bind one of these per parameter combination and hand it to the
/// propagation engine; the struct is `Copy` and holds no mutable state, so
/// concurrent runs may share it freely.
#[derive(Debug, Clone, Copy)]
pub struct PurePn {
    /// PN gain N (dimensionless, typically 2–5).
    pub gain: f64,
    /// Heading-error bias θ_HE (rad).
    pub heading_error: f64,
    /// Bound on the commanded lateral acceleration magnitude (m/s²).
    pub accel_limit: f64,
    /// Target acceleration magnitude along its body axis (m/s²).
    pub target_accel: f64,
    /// Gravitational acceleration (m/s²), applied to both vehicles'
    /// vertical velocity derivatives. Configurable so tests can disable it.
    pub gravity: f64,
}

impl PurePn {
    /// Guidance law with a non-maneuvering target and standard gravity.
    pub fn new(gain: f64, heading_error: f64, accel_limit: f64) -> Self {
        Self {
            gain,
            heading_error,
            accel_limit,
            target_accel: 0.0,
            gravity: STANDARD_GRAVITY,
        }
    }

    /// Set the target's body-axis acceleration (m/s²).
    pub fn with_target_accel(mut self, accel: f64) -> Self {
        self.target_accel = accel;
        self
    }

    /// Override the gravitational acceleration (m/s²).
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Commanded pursuer lateral acceleration (m/s²) for the given state,
    /// after saturation. Never exceeds `accel_limit` in magnitude.
    pub fn commanded_accel(&self, y: &State) -> Result<f64, GuidanceError> {
        Ok(self.guidance_terms(y)?.accel)
    }

    fn guidance_terms(&self, y: &State) -> Result<GuidanceTerms, GuidanceError> {
        let theta_los = los_angle(y)?;
        let theta_lead = lead_angle_plus_heading_error(y)? - self.heading_error;

        // Pure PN: acceleration proportional to closing speed and LOS rate
        let mut accel = self.gain * pursuer_speed(y) * los_rate(y)?;
        if accel.abs() > self.accel_limit {
            accel = accel.signum() * self.accel_limit;
        }

        Ok(GuidanceTerms {
            theta_los,
            theta_lead,
            accel,
        })
    }

    /// Evaluate the state derivative for the engagement.
    ///
    /// The commanded acceleration is applied perpendicular to the
    /// pursuit direction θ_LOS + θ_lead + θ_HE; gravity acts on both
    /// vertical velocity components.
    pub fn derivative(&self, y: &State, dydt: &mut State) -> Result<(), GuidanceError> {
        let v_t = target_speed(y);
        if v_t == 0.0 {
            return Err(GuidanceError::ZeroSpeedSingularity {
                vehicle: Vehicle::Target,
            });
        }
        let terms = self.guidance_terms(y)?;
        let pursuit_angle = terms.theta_los + terms.theta_lead + self.heading_error;

        dydt[TARGET_HEADING] = self.target_accel / v_t;
        dydt[TARGET_POS_X] = y[TARGET_VEL_X];
        dydt[TARGET_POS_Y] = y[TARGET_VEL_Y];
        dydt[PURSUER_POS_X] = y[PURSUER_VEL_X];
        dydt[PURSUER_POS_Y] = y[PURSUER_VEL_Y];
        dydt[TARGET_VEL_X] = self.target_accel * y[TARGET_HEADING].sin();
        dydt[TARGET_VEL_Y] = self.target_accel * y[TARGET_HEADING].cos() - self.gravity;
        dydt[PURSUER_VEL_X] = -terms.accel * pursuit_angle.sin();
        dydt[PURSUER_VEL_Y] = terms.accel * pursuit_angle.cos() - self.gravity;
        Ok(())
    }
}

impl Dynamics<STATE_DIM> for PurePn {
    fn rhs(&self, y: &State, dydt: &mut State) -> Result<(), GuidanceError> {
        self.derivative(y, dydt)
    }
}
