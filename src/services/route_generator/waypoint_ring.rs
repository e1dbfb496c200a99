use crate::constants::{FULL_CIRCLE_DEGREES, KM_PER_DEGREE, MIN_RING_WAYPOINTS};
use crate::models::GeoPoint;
use std::f64::consts::TAU;

/// Generate an evenly spaced ring of waypoints around `center`.
///
/// `distance_km` is the circumference of the full circle, so the ring radius
/// is `distance_km / 2π`. Only `arc_degrees` of the circle are sampled,
/// starting due east and turning counter-clockwise, shifted by
/// `rotation_offset_deg`.
///
/// Callers must pass `distance_km > 0` and `arc_degrees` in `(0, 360]`.
pub fn generate_ring(
    center: &GeoPoint,
    distance_km: f64,
    arc_degrees: f64,
    rotation_offset_deg: f64,
) -> Vec<GeoPoint> {
    debug_assert!(distance_km > 0.0, "ring distance must be positive");
    debug_assert!(
        arc_degrees > 0.0 && arc_degrees <= FULL_CIRCLE_DEGREES,
        "arc span must be within (0, 360]"
    );

    let count = waypoint_count(distance_km, arc_degrees);
    let radius_km = distance_km / TAU;
    let angle_step = arc_degrees.to_radians() / count as f64;
    let rotation = rotation_offset_deg.to_radians();

    let ring: Vec<GeoPoint> = (0..count)
        .map(|i| {
            let angle = i as f64 * angle_step + rotation;
            offset_location(center, radius_km * angle.cos(), radius_km * angle.sin())
        })
        .collect();

    tracing::trace!(
        count = count,
        radius_km = %format!("{:.3}", radius_km),
        arc_degrees = arc_degrees,
        "Generated ring of {} waypoints",
        count
    );

    ring
}

/// Number of ring waypoints for a ring span and arc.
///
/// Longer rings get denser sampling; partial arcs are scaled down
/// proportionally but never below three points.
pub fn waypoint_count(distance_km: f64, arc_degrees: f64) -> usize {
    let full_circle = if distance_km < 2.0 {
        4
    } else if distance_km < 3.0 {
        6
    } else if distance_km < 8.0 {
        8
    } else if distance_km < 15.0 {
        10
    } else {
        (distance_km / 2.0) as usize + 3
    };

    let arc_factor = arc_degrees / FULL_CIRCLE_DEGREES;
    ((full_circle as f64 * arc_factor) as usize).max(MIN_RING_WAYPOINTS)
}

/// Shift `center` by a kilometer offset using a flat-earth approximation.
/// Not corrected near the poles.
fn offset_location(center: &GeoPoint, east_km: f64, north_km: f64) -> GeoPoint {
    let lat_offset = north_km / KM_PER_DEGREE;
    let lng_offset = east_km / (KM_PER_DEGREE * center.lat.to_radians().cos());

    GeoPoint {
        lat: center.lat + lat_offset,
        lng: center.lng + lng_offset,
    }
}
