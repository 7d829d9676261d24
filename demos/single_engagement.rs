//! Single proportional-navigation engagement walkthrough.
//!
//! Simulates the reference scenario (Mach 0.9 pursuer, Mach 0.25 target,
//! 3 km apart) and prints the intercept metrics.
//!
//! Run with:
//!   cargo run --example single_engagement

use propnav::{simulate, time_grid, EngagementGeometry, PurePn};

fn main() {
    let heading_error = 2f64.to_radians();

    let geometry = EngagementGeometry {
        target_position: [3000.0, 1000.0],
        pursuer_position: [0.0, 1000.0],
        target_speed: 85.0,
        pursuer_speed: 306.0,
        target_heading: 10f64.to_radians(),
        pursuer_heading: heading_error,
    };
    let pn = PurePn::new(3.0, heading_error, 50.0);

    let dt = 0.1;
    let time = time_grid(15.0, dt);
    let intercept = simulate(&pn, &geometry.initial_state(), &time).unwrap();

    println!("Pure PN engagement (N = {}, θ_HE = 2°)", pn.gain);
    println!("  Initial separation: {:.1} m", geometry.separation());
    println!("  Samples:            {}", intercept.trajectory.len());
    println!();
    println!("  Miss distance:      {:.2} m", intercept.miss_distance);
    println!(
        "  Intercept at:       t = {:.1} s (sample {})",
        time[intercept.intercept_index],
        intercept.intercept_index
    );
    println!(
        "  Lead angle:         {:.2}°",
        intercept.lead_angle(heading_error).to_degrees()
    );
    if intercept.is_truncated() {
        println!("  Note: closest approach fell on the final sample;");
        println!("        the pursuer may have needed more flight time.");
    }
}
