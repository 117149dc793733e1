//! Rear-wheel-drive bicycle kinematics
//!
//! Advances a vehicle pose by one fixed timestep. When the front tire is
//! turned, the rear axle is swung around an instantaneous center of rotation
//! (ICR) whose distance is the turning radius `|wheelbase / tan(tire_angle)|`.
//! The vehicle center is then placed ahead of the new rear axle position
//! along the new heading.
//!
//! Angle convention: degrees everywhere, 0 = +x, 90 = up the raster.
//! Positive tire angles turn right.

use crate::consts::{FULL_TURN, HALF_TURN, STANDSTILL_EPSILON, UP_HEADING};
use crate::settings::VehicleGeometry;
use crate::{Vector2, heading_direction, normalize_heading, polar_to_cartesian};

use super::state::{TurnDirection, VehicleState};

/// Geometry of one turning step, exposed for inspection and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnArc {
    /// Distance from ICR to the rear axle midpoint
    pub radius: f64,
    /// Rear axle midpoint before the step (world)
    pub rear_axle: Vector2,
    /// Instantaneous center of rotation (world)
    pub icr: Vector2,
    /// Angle from ICR to rear axle before the step (degrees)
    pub start_angle: f64,
    /// Angle from ICR to rear axle after the step (degrees, unnormalized)
    pub end_angle: f64,
}

/// Advance the vehicle pose by one timestep.
///
/// Pure and deterministic. Speed and tire angle are carried over unchanged;
/// only position and heading move.
pub fn advance(state: &VehicleState, geometry: &VehicleGeometry, timestep: f64) -> VehicleState {
    let mut next = *state;

    // No travel means no sweep, whatever the tire angle
    if state.speed.abs() < STANDSTILL_EPSILON {
        return next;
    }

    match state.turn_direction() {
        TurnDirection::Straight => {
            log::trace!("straight step at heading {}", state.heading);
            next.position = state.position + heading_direction(state.heading) * (state.speed * timestep);
        }
        turn => {
            let arc = turn_arc(state, geometry, timestep, turn);
            log::trace!("{turn:?} step around icr {:?} radius {}", arc.icr, arc.radius);

            let new_rear_axle = arc.icr + polar_to_cartesian(arc.radius, arc.end_angle);

            let mut heading = arc.end_angle + UP_HEADING;
            if turn == TurnDirection::Right {
                heading -= HALF_TURN;
            }

            let (x_sign, y_sign) = center_offset_signs(arc.end_angle, turn);
            let (x_diff, y_diff) = slope_offset(heading, center_reach(geometry));

            next.heading = normalize_heading(heading);
            next.position = new_rear_axle + Vector2::new(x_diff * x_sign, y_diff * y_sign);
        }
    }

    // Keep the vehicle in the positive quadrant of the world
    next.position = next.position.max(Vector2::ZERO);
    next
}

/// Build the ICR construction for a turning step.
pub fn turn_arc(
    state: &VehicleState,
    geometry: &VehicleGeometry,
    timestep: f64,
    turn: TurnDirection,
) -> TurnArc {
    let radius = (geometry.wheelbase / state.tire_angle.to_radians().tan()).abs();
    let rear_axle = state.position + body_to_world(geometry.rear_axle_midpoint(), state.heading);

    // Direction (from the rear axle) in which the ICR lies
    let icr_angle = match turn {
        TurnDirection::Left => state.heading + HALF_TURN + state.tire_angle,
        _ => state.heading - HALF_TURN + state.tire_angle,
    };
    let offset = polar_to_cartesian(radius, icr_angle);
    let icr = rear_axle + offset;

    let start_angle = (-offset.y).atan2(-offset.x).to_degrees();
    let sweep = (state.speed * timestep / radius).to_degrees();
    let sweep = if turn == TurnDirection::Right { -sweep } else { sweep };

    TurnArc {
        radius,
        rear_axle,
        icr,
        start_angle,
        end_angle: start_angle + sweep,
    }
}

/// Signs of the rear-axle-to-center offset for a given angular position on
/// the turning circle. Any angle is accepted; the table is read in [0, 360).
pub fn center_offset_signs(angle_on_circle: f64, turn: TurnDirection) -> (f64, f64) {
    let angle_on_circle = normalize_heading(angle_on_circle);
    let turn_sign = turn.sign();
    let x_base = if angle_on_circle < HALF_TURN { 1.0 } else { -1.0 };
    let y_base = if angle_on_circle > UP_HEADING && angle_on_circle < FULL_TURN - UP_HEADING {
        1.0
    } else {
        -1.0
    };
    (x_base * turn_sign, y_base * turn_sign)
}

/// Unsigned (x, y) split of `reach` along a line of the given heading.
///
/// `hypot` keeps near-vertical slopes from overflowing.
fn slope_offset(heading: f64, reach: f64) -> (f64, f64) {
    let slope = heading.to_radians().tan();
    let x_diff = reach / slope.hypot(1.0);
    let y_diff = (slope * x_diff).abs();
    (x_diff, y_diff)
}

/// How far the center is placed ahead of the rear axle after a turning step
/// (half the rear axle setback).
#[inline]
fn center_reach(geometry: &VehicleGeometry) -> f64 {
    geometry.rear_axle_midpoint().y.abs() / 2.0
}

/// Rotate a body-frame offset (x right, y forward) into the world frame.
#[inline]
fn body_to_world(offset: Vector2, heading: f64) -> Vector2 {
    Vector2::from_angle((heading - UP_HEADING).to_radians()).rotate(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn state(x: f64, y: f64, heading: f64, speed: f64, tire_angle: f64) -> VehicleState {
        VehicleState {
            position: Vector2::new(x, y),
            heading,
            speed,
            tire_angle,
        }
    }

    #[test]
    fn test_straight_line_up() {
        let geometry = VehicleGeometry::default();
        let next = advance(&state(50.0, 50.0, 90.0, 10.0, 0.0), &geometry, 0.5);
        assert!((next.position.x - 50.0).abs() < EPS);
        assert!((next.position.y - 55.0).abs() < EPS);
        assert_eq!(next.heading, 90.0);
    }

    #[test]
    fn test_straight_line_diagonal() {
        let geometry = VehicleGeometry::default();
        let start = state(100.0, 100.0, 30.0, 20.0, 0.0);
        let next = advance(&start, &geometry, 0.25);
        let moved = next.position - start.position;
        assert!((moved.length() - 5.0).abs() < EPS);
        assert!((moved.y.atan2(moved.x).to_degrees() - 30.0).abs() < EPS);
        assert_eq!(next.heading, 30.0);
    }

    #[test]
    fn test_standstill_keeps_pose() {
        let geometry = VehicleGeometry::default();
        for tire in [-25.0, 0.0, 25.0] {
            let start = state(80.0, 60.0, 90.0, 0.0, tire);
            assert_eq!(advance(&start, &geometry, 0.1), start);
        }
    }

    #[test]
    fn test_turn_radius() {
        let geometry = VehicleGeometry::default();
        let arc = turn_arc(
            &state(100.0, 100.0, 90.0, 10.0, 45.0),
            &geometry,
            0.1,
            TurnDirection::Right,
        );
        assert!((arc.radius - geometry.wheelbase).abs() < EPS);
        // Rear axle sits behind the center when facing up
        assert!((arc.rear_axle - Vector2::new(100.0, 88.0)).length() < EPS);
        // The circle starts at the rear axle
        let on_circle = arc.icr + polar_to_cartesian(arc.radius, arc.start_angle);
        assert!((on_circle - arc.rear_axle).length() < EPS);
    }

    #[test]
    fn test_sweep_direction_follows_turn() {
        let geometry = VehicleGeometry::default();
        let right = turn_arc(&state(100.0, 100.0, 90.0, 10.0, 20.0), &geometry, 0.1, TurnDirection::Right);
        let left = turn_arc(&state(100.0, 100.0, 90.0, 10.0, -20.0), &geometry, 0.1, TurnDirection::Left);
        assert!(right.end_angle < right.start_angle);
        assert!(left.end_angle > left.start_angle);
    }

    #[test]
    fn test_right_turn_moves_right_left_turn_moves_left() {
        let geometry = VehicleGeometry::default();
        let right = advance(&state(500.0, 500.0, 90.0, 100.0, 30.0), &geometry, 0.1);
        let left = advance(&state(500.0, 500.0, 90.0, 100.0, -30.0), &geometry, 0.1);
        assert!(right.position.x > 500.0);
        assert!(left.position.x < 500.0);
    }

    #[test]
    fn test_center_offset_signs_right_turn() {
        // Lower half of the circle
        assert_eq!(center_offset_signs(100.0, TurnDirection::Right), (1.0, 1.0));
        assert_eq!(center_offset_signs(45.0, TurnDirection::Right), (1.0, -1.0));
        // Upper half of the circle
        assert_eq!(center_offset_signs(200.0, TurnDirection::Right), (-1.0, 1.0));
        assert_eq!(center_offset_signs(300.0, TurnDirection::Right), (-1.0, -1.0));
    }

    #[test]
    fn test_center_offset_signs_left_turn() {
        assert_eq!(center_offset_signs(100.0, TurnDirection::Left), (-1.0, -1.0));
        assert_eq!(center_offset_signs(45.0, TurnDirection::Left), (-1.0, 1.0));
        assert_eq!(center_offset_signs(200.0, TurnDirection::Left), (1.0, -1.0));
        assert_eq!(center_offset_signs(300.0, TurnDirection::Left), (1.0, 1.0));
    }

    #[test]
    fn test_center_offset_signs_negative_angles() {
        // atan2 plus the sweep lands below zero for many start headings
        assert_eq!(center_offset_signs(-11.3, TurnDirection::Right), (-1.0, -1.0));
        assert_eq!(center_offset_signs(-168.7, TurnDirection::Right), (-1.0, 1.0));
        assert_eq!(center_offset_signs(-11.3, TurnDirection::Left), (1.0, 1.0));
        assert_eq!(center_offset_signs(-168.7, TurnDirection::Left), (1.0, -1.0));
        assert_eq!(
            center_offset_signs(-11.3, TurnDirection::Right),
            center_offset_signs(348.7, TurnDirection::Right)
        );
    }

    #[test]
    fn test_center_stays_ahead_of_rear_axle() {
        let geometry = VehicleGeometry::default();
        for (heading, tire) in [(180.0, 20.0), (270.0, -20.0), (0.0, -20.0), (300.0, 20.0)] {
            let start = state(1000.0, 1000.0, heading, 100.0, tire);
            let turn = start.turn_direction();
            let arc = turn_arc(&start, &geometry, 0.1, turn);
            let next = advance(&start, &geometry, 0.1);
            let rear = arc.icr + polar_to_cartesian(arc.radius, arc.end_angle);
            let ahead = (next.position - rear).normalize();
            assert!((ahead.dot(heading_direction(next.heading)) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_turn_radius_uses_wheelbase_field() {
        // The wheelbase field wins over whatever the wheel positions imply
        let geometry = VehicleGeometry {
            wheelbase: 50.0,
            ..VehicleGeometry::default()
        };
        let start = state(500.0, 500.0, 90.0, 10.0, 45.0);
        let arc = turn_arc(&start, &geometry, 0.1, TurnDirection::Right);
        assert!((arc.radius - 50.0).abs() < EPS);
    }

    #[test]
    fn test_center_offset_signs_range_edges() {
        // 90 and 270 are outside the open (90, 270) band, 180 is not below 180
        assert_eq!(center_offset_signs(90.0, TurnDirection::Right), (1.0, -1.0));
        assert_eq!(center_offset_signs(270.0, TurnDirection::Right), (-1.0, -1.0));
        assert_eq!(center_offset_signs(180.0, TurnDirection::Right), (-1.0, 1.0));
    }

    #[test]
    fn test_near_vertical_slope_is_finite() {
        let (x, y) = slope_offset(90.0, 6.0);
        assert!(x.is_finite() && y.is_finite());
        assert!(x.abs() < 1e-9);
        assert!((y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_clamped_non_negative() {
        let geometry = VehicleGeometry::default();
        let next = advance(&state(1.0, 1.0, 270.0, 100.0, 0.0), &geometry, 1.0);
        assert_eq!(next.position.y, 0.0);
        let next = advance(&state(1.0, 1.0, 180.0, 100.0, 0.0), &geometry, 1.0);
        assert_eq!(next.position.x, 0.0);
    }

    #[test]
    fn test_body_to_world_rotation() {
        let rear = Vector2::new(0.0, -12.0);
        assert!((body_to_world(rear, 90.0) - rear).length() < EPS);
        // Facing +x, the rear axle lies toward -x
        assert!((body_to_world(rear, 0.0) - Vector2::new(-12.0, 0.0)).length() < EPS);
    }

    proptest! {
        #[test]
        fn prop_mirror_symmetry(
            heading in 0.0f64..360.0,
            angle in 1.0f64..29.0,
            speed in 1.0f64..300.0,
            timestep in 0.01f64..0.2,
        ) {
            let geometry = VehicleGeometry::default();
            let origin = Vector2::new(1000.0, 1000.0);
            let right = advance(&state(origin.x, origin.y, heading, speed, angle), &geometry, timestep);
            let left = advance(&state(origin.x, origin.y, heading, speed, -angle), &geometry, timestep);

            // Decompose along and across the initial heading axis
            let along = heading_direction(heading);
            let across = along.perp();
            let (r, l) = (right.position - origin, left.position - origin);
            prop_assert!((r.dot(along) - l.dot(along)).abs() < 1e-6);
            prop_assert!((r.dot(across) + l.dot(across)).abs() < 1e-6);

            // Headings mirror around the initial heading
            let skew = normalize_heading(left.heading + right.heading - 2.0 * heading);
            prop_assert!(skew.min(360.0 - skew) < 1e-6);
        }

        #[test]
        fn prop_center_points_along_heading(
            heading in 0.0f64..360.0,
            angle in 1.0f64..29.0,
            left in proptest::bool::ANY,
            speed in 1.0f64..300.0,
        ) {
            let geometry = VehicleGeometry::default();
            let tire = if left { -angle } else { angle };
            let start = state(1000.0, 1000.0, heading, speed, tire);
            let arc = turn_arc(&start, &geometry, 0.1, start.turn_direction());
            let next = advance(&start, &geometry, 0.1);

            let rear = arc.icr + polar_to_cartesian(arc.radius, arc.end_angle);
            let expected = heading_direction(next.heading) * center_reach(&geometry);
            prop_assert!((next.position - rear - expected).length() < 1e-6);
        }

        #[test]
        fn prop_heading_stays_normalized(
            heading in 0.0f64..360.0,
            speed in -300.0f64..300.0,
            tire in -29.0f64..29.0,
        ) {
            let geometry = VehicleGeometry::default();
            let next = advance(&state(2000.0, 2000.0, heading, speed, tire), &geometry, 0.1);
            prop_assert!(next.heading >= 0.0 && next.heading < 360.0);
            prop_assert!(next.position.x >= 0.0 && next.position.y >= 0.0);
        }

        #[test]
        fn prop_straight_line_distance(
            heading in 0.0f64..360.0,
            speed in 0.5f64..300.0,
            timestep in 0.01f64..0.5,
        ) {
            let geometry = VehicleGeometry::default();
            let start = state(5000.0, 5000.0, heading, speed, 0.0);
            let next = advance(&start, &geometry, timestep);
            prop_assert!(((next.position - start.position).length() - speed * timestep).abs() < 1e-6);
            prop_assert_eq!(next.heading, heading);
        }
    }
}
