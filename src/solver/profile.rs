//! Constraint-capped time parameterization
//!
//! Runs the standard forward/backward velocity profile pass over a sampled
//! course: velocities are capped per point by the global maximum and every
//! constraint, then limited by reachable acceleration from the start and
//! reachable deceleration into the end, and finally integrated into time
//! stamps.

use super::spline::CoursePoint;
use super::TimedState;
use crate::common::{Pose, EPSILON};
use crate::generator::constraint::Constraint;

// Floor applied to acceleration caps so a saturated constraint cannot stall
// the pass
const MIN_ACCELERATION: f64 = 1e-6;

/// Time-parameterize a course under the given limits
pub fn time_parameterize(
    course: &[CoursePoint],
    constraints: &[Constraint],
    start_velocity: f64,
    end_velocity: f64,
    max_velocity: f64,
    max_acceleration: f64,
) -> Vec<TimedState> {
    let n = course.len();
    if n == 0 {
        return Vec::new();
    }

    let poses: Vec<Pose> = course
        .iter()
        .map(|p| Pose::new(p.position.x, p.position.y, p.heading))
        .collect();

    // Per-point velocity ceiling from the global limit and every constraint
    let mut velocity = Vec::with_capacity(n);
    for (point, pose) in course.iter().zip(&poses) {
        let mut cap = max_velocity;
        for constraint in constraints {
            cap = cap.min(constraint.max_velocity(pose, point.curvature));
        }
        velocity.push(cap.max(0.0));
    }

    // Forward pass: limited by reachable acceleration from the start
    velocity[0] = velocity[0].min(start_velocity.abs());
    for i in 0..n - 1 {
        let ds = course[i + 1].distance - course[i].distance;
        let accel = acceleration_cap(
            constraints,
            &poses[i],
            course[i].curvature,
            velocity[i],
            max_acceleration,
        );
        let reachable = (velocity[i] * velocity[i] + 2.0 * accel * ds).sqrt();
        velocity[i + 1] = velocity[i + 1].min(reachable);
    }

    // Backward pass: limited by reachable deceleration into the end
    velocity[n - 1] = velocity[n - 1].min(end_velocity.abs());
    for i in (0..n - 1).rev() {
        let ds = course[i + 1].distance - course[i].distance;
        let decel = acceleration_cap(
            constraints,
            &poses[i + 1],
            course[i + 1].curvature,
            velocity[i + 1],
            max_acceleration,
        );
        let reachable = (velocity[i + 1] * velocity[i + 1] + 2.0 * decel * ds).sqrt();
        velocity[i] = velocity[i].min(reachable);
    }

    // Integrate time stamps over the profile
    let mut states = Vec::with_capacity(n);
    let mut time = 0.0;
    for i in 0..n {
        if i > 0 {
            let ds = course[i].distance - course[i - 1].distance;
            let average = (velocity[i - 1] + velocity[i]) / 2.0;
            let dt = if average < EPSILON {
                let accel = acceleration_cap(
                    constraints,
                    &poses[i - 1],
                    course[i - 1].curvature,
                    velocity[i - 1],
                    max_acceleration,
                );
                (2.0 * ds / accel).sqrt()
            } else {
                ds / average
            };
            time += dt;
        }
        states.push(TimedState {
            time,
            pose: poses[i],
            curvature: course[i].curvature,
            velocity: velocity[i],
        });
    }

    states
}

fn acceleration_cap(
    constraints: &[Constraint],
    pose: &Pose,
    curvature: f64,
    velocity: f64,
    max_acceleration: f64,
) -> f64 {
    let mut cap = max_acceleration;
    for constraint in constraints {
        cap = cap.min(constraint.max_acceleration(pose, curvature, velocity));
    }
    cap.max(MIN_ACCELERATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::spline::calc_course;

    fn straight_course() -> Vec<CoursePoint> {
        calc_course(
            &[Pose::new(0.0, 0.0, 0.0), Pose::new(5.0, 0.0, 0.0)],
            0.05,
            1.0,
        )
    }

    #[test]
    fn profile_is_trapezoidal_on_a_straight_line() {
        let course = straight_course();
        let states = time_parameterize(&course, &[], 0.0, 0.0, 2.0, 1.0);

        assert_eq!(states.len(), course.len());
        assert!(states[0].velocity.abs() < 1e-9);
        assert!(states.last().unwrap().velocity.abs() < 1e-9);

        let peak = states.iter().map(|s| s.velocity).fold(0.0, f64::max);
        assert!(peak > 1.9 && peak <= 2.0 + 1e-9);

        // Analytic duration: accelerate 2 s, cruise 0.5 s, decelerate 2 s
        let total = states.last().unwrap().time;
        assert!((total - 4.5).abs() < 0.1);
    }

    #[test]
    fn times_are_strictly_increasing() {
        let course = straight_course();
        let states = time_parameterize(&course, &[], 0.0, 0.0, 2.0, 1.0);

        for pair in states.windows(2) {
            assert!(pair[1].time > pair[0].time);
        }
    }

    #[test]
    fn nonzero_boundary_velocities_are_kept() {
        let course = straight_course();
        let states = time_parameterize(&course, &[], 1.0, 0.5, 2.0, 1.0);

        assert!((states[0].velocity - 1.0).abs() < 1e-9);
        assert!((states.last().unwrap().velocity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn constraint_caps_are_applied() {
        let course = straight_course();
        let constraints = vec![Constraint::VelocityLimitRegion {
            region: crate::common::Region::new(2.0, -1.0, 3.0, 1.0),
            max_velocity: 0.5,
        }];
        let states = time_parameterize(&course, &constraints, 0.0, 0.0, 2.0, 1.0);

        for state in &states {
            if state.pose.x >= 2.0 && state.pose.x <= 3.0 {
                assert!(state.velocity <= 0.5 + 1e-9);
            }
        }
    }
}
