//! # propnav: Planar Proportional-Navigation Pursuit Simulation
//!
//! Numerical simulation of a planar engagement between a maneuvering target
//! and a pursuer flying a pure proportional-navigation (PN) guidance law,
//! with intercept-quality metrics extracted from the integrated trajectory.
//!
//! ## Features
//!
//! - Nine-state planar pursuit-evasion dynamics with embedded PN guidance
//!   and lateral acceleration saturation
//! - Fixed-step classical RK4 propagation over an arbitrary strictly
//!   increasing time grid
//! - Closest-approach extraction: miss distance, intercept index, and lead
//!   angle at the intercept point
//! - Explicit domain errors for singular geometry instead of silent NaN
//!   propagation
//! - Parallel parameter sweeps over heading error × gain × flight time
//!
//! ## State vector
//!
//! All quantities are referenced to a fixed inertial frame:
//!
//! | index | meaning |
//! |-------|---------|
//! | 0     | target heading angle (rad) |
//! | 1, 2  | target position x, y (m) |
//! | 3, 4  | pursuer position x, y (m) |
//! | 5, 6  | target velocity x, y (m/s) |
//! | 7, 8  | pursuer velocity x, y (m/s) |
//!
//! ## Basic Usage
//!
//! ```rust
//! use propnav::{simulate, time_grid, EngagementGeometry, PurePn};
//!
//! // Mach 0.9 pursuer against a Mach 0.25 target, 3 km apart
//! let geometry = EngagementGeometry {
//!     target_position: [3000.0, 1000.0],
//!     pursuer_position: [0.0, 1000.0],
//!     target_speed: 85.0,
//!     pursuer_speed: 306.0,
//!     target_heading: 10f64.to_radians(),
//!     pursuer_heading: 2f64.to_radians(),
//! };
//!
//! // PN gain 3, 2° heading-error bias, 50 m/s² acceleration limit
//! let pn = PurePn::new(3.0, 2f64.to_radians(), 50.0);
//!
//! let time = time_grid(10.0, 0.1);
//! let intercept = simulate(&pn, &geometry.initial_state(), &time).unwrap();
//!
//! println!("miss distance: {:.2} m", intercept.miss_distance);
//! println!("intercept at sample {}", intercept.intercept_index);
//! ```
//!
//! ## Failure semantics
//!
//! Singular geometry (coincident vehicles, a zero-speed vehicle, or a
//! lead-angle arcsine argument outside [-1, 1]) is detected at the point
//! of computation and surfaced as [`GuidanceError`], wrapped with the grid
//! time in [`PropagationError`]. A run is never retried internally; skip
//! or abort policy belongs to the caller (see [`sweep`]).
//!
//! ## References
//!
//! 1. Zarchan, P. "Tactical and Strategic Missile Guidance", AIAA
//!    Progress in Astronautics and Aeronautics.
//! 2. Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving Ordinary
//!    Differential Equations I: Nonstiff Problems". Springer.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod guidance;
pub mod intercept;
pub mod solver;
pub mod state;
pub mod sweep;

pub use guidance::{
    lead_angle_plus_heading_error, los_angle, los_rate, speed_ratio, GuidanceError, PurePn,
    Vehicle, STANDARD_GRAVITY,
};
pub use intercept::{closest_approach, distance_series, simulate, Intercept};
pub use solver::{validate_grid, Dynamics, PropagationError, Rk4, Stats};
pub use state::{separation, EngagementGeometry, State, STATE_DIM};
pub use sweep::{run_sweep, time_grid, Metrics, SweepConfig, SweepOutcome, SweepPoint};
