//! Point-mass gravity with unit gravitational parameter

use glam::DVec2;

/// Velocity after one step of attraction toward `source`.
///
/// Coincident positions leave the velocity unchanged.
pub fn gravitational_kick(source: DVec2, body: DVec2, velocity: DVec2, dt: f64) -> DVec2 {
    let offset = source - body;
    let distance_cubed = offset.length_squared().powf(1.5);
    if distance_cubed > 0.0 {
        velocity + offset / distance_cubed * dt
    } else {
        velocity
    }
}
