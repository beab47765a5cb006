//! Trajectory solver boundary
//!
//! The solver turns an ordered point sequence plus a constraint list into a
//! time-parameterized trajectory. The trait is the seam for an external
//! geometry library; [`SplineSolver`] is the built-in implementation used by
//! the dashboard.

pub mod profile;
pub mod spline;

use crate::common::{normalize_angle, Pose, EPSILON};
use crate::error::{DashboardError, Result};
use crate::generator::constraint::Constraint;

/// A single time-stamped vehicle state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedState {
    /// Time offset from trajectory start in seconds
    pub time: f64,
    /// Vehicle pose at this time
    pub pose: Pose,
    /// Path curvature in 1/m
    pub curvature: f64,
    /// Signed velocity in m/s (negative when driving reversed)
    pub velocity: f64,
}

/// An immutable, replayable, time-parameterized state sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<TimedState>,
}

impl Trajectory {
    /// Create a trajectory from an ordered state list
    pub fn new(states: Vec<TimedState>) -> Self {
        Trajectory { states }
    }

    /// Total duration in seconds
    pub fn total_time(&self) -> f64 {
        self.states.last().map(|s| s.time).unwrap_or(0.0)
    }

    /// Number of stored states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the trajectory holds no states
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// First stored state
    pub fn first(&self) -> Option<&TimedState> {
        self.states.first()
    }

    /// Last stored state
    pub fn last(&self) -> Option<&TimedState> {
        self.states.last()
    }

    /// The full state sequence
    pub fn states(&self) -> &[TimedState] {
        &self.states
    }

    /// State at the given time offset, clamped to the trajectory bounds
    ///
    /// Interpolates linearly between stored states; headings blend along the
    /// shortest arc.
    pub fn sample(&self, time: f64) -> TimedState {
        let (first, last) = match (self.states.first(), self.states.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return TimedState {
                    time: 0.0,
                    pose: Pose::new(0.0, 0.0, 0.0),
                    curvature: 0.0,
                    velocity: 0.0,
                }
            }
        };

        let t = time.clamp(first.time, last.time);
        let index = self.states.partition_point(|s| s.time <= t);
        if index == 0 {
            return *first;
        }
        if index >= self.states.len() {
            return *last;
        }

        let before = &self.states[index - 1];
        let after = &self.states[index];
        let span = after.time - before.time;
        let alpha = if span < EPSILON {
            0.0
        } else {
            (t - before.time) / span
        };

        let heading = normalize_angle(
            before.pose.heading + normalize_angle(after.pose.heading - before.pose.heading) * alpha,
        );

        TimedState {
            time: t,
            pose: Pose::new(
                before.pose.x + (after.pose.x - before.pose.x) * alpha,
                before.pose.y + (after.pose.y - before.pose.y) * alpha,
                heading,
            ),
            curvature: before.curvature + (after.curvature - before.curvature) * alpha,
            velocity: before.velocity + (after.velocity - before.velocity) * alpha,
        }
    }
}

/// Inputs for one trajectory generation call
#[derive(Debug, Clone)]
pub struct TrajectoryRequest {
    /// Ordered point sequence to interpolate through (at least 2 entries)
    pub points: Vec<Pose>,
    /// Constraint list, consumed in order
    pub constraints: Vec<Constraint>,
    /// Velocity at the start of the trajectory in m/s
    pub start_velocity: f64,
    /// Velocity at the end of the trajectory in m/s
    pub end_velocity: f64,
    /// Maximum velocity in m/s
    pub max_velocity: f64,
    /// Maximum acceleration in m/s^2
    pub max_acceleration: f64,
    /// Drive the path backwards
    pub reversed: bool,
    /// Search for lower-curvature spline tangents
    pub optimize_splines: bool,
}

/// Seam for the trajectory generation library
pub trait TrajectorySolver: Send + Sync {
    /// Generate a trajectory, failing on degenerate input
    fn generate(&self, request: &TrajectoryRequest) -> Result<Trajectory>;
}

/// Built-in solver: Hermite spline course plus a constraint-capped
/// forward/backward velocity profile
pub struct SplineSolver {
    course_step: f64,
}

impl SplineSolver {
    /// Create a solver with the given course sampling step in meters
    pub fn new(course_step: f64) -> Self {
        SplineSolver { course_step }
    }
}

impl Default for SplineSolver {
    fn default() -> Self {
        SplineSolver { course_step: 0.05 }
    }
}

/// Tangent scales tried when curvature optimization is requested
const TANGENT_SCALES: [f64; 5] = [0.6, 0.8, 1.0, 1.25, 1.5];

impl TrajectorySolver for SplineSolver {
    fn generate(&self, request: &TrajectoryRequest) -> Result<Trajectory> {
        if request.points.len() < 2 {
            return Err(DashboardError::Solver(format!(
                "need at least 2 points, got {}",
                request.points.len()
            )));
        }
        if !(request.max_velocity > EPSILON) || !(request.max_acceleration > EPSILON) {
            return Err(DashboardError::Solver(
                "non-positive velocity or acceleration limit".to_string(),
            ));
        }

        let course = if request.optimize_splines {
            let mut best: Option<(f64, Vec<spline::CoursePoint>)> = None;
            for scale in TANGENT_SCALES {
                let candidate = spline::calc_course(&request.points, self.course_step, scale);
                let cost = spline::curvature_cost(&candidate);
                match &best {
                    Some((best_cost, _)) if cost >= *best_cost => {}
                    _ => best = Some((cost, candidate)),
                }
            }
            best.map(|(_, course)| course).unwrap_or_default()
        } else {
            spline::calc_course(&request.points, self.course_step, 1.0)
        };

        if course.len() < 2 {
            return Err(DashboardError::Solver(
                "degenerate geometry: course collapsed to fewer than 2 points".to_string(),
            ));
        }

        let mut states = profile::time_parameterize(
            &course,
            &request.constraints,
            request.start_velocity,
            request.end_velocity,
            request.max_velocity,
            request.max_acceleration,
        );

        if request.reversed {
            for state in &mut states {
                state.pose.heading = normalize_angle(state.pose.heading + std::f64::consts::PI);
                state.velocity = -state.velocity;
            }
        }

        Ok(Trajectory::new(states))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_request() -> TrajectoryRequest {
        TrajectoryRequest {
            points: vec![Pose::new(0.0, 0.0, 0.0), Pose::new(5.0, 0.0, 0.0)],
            constraints: vec![Constraint::CentripetalAcceleration { max: 1.0 }],
            start_velocity: 0.0,
            end_velocity: 0.0,
            max_velocity: 2.0,
            max_acceleration: 1.0,
            reversed: false,
            optimize_splines: false,
        }
    }

    #[test]
    fn straight_line_has_positive_duration() {
        let solver = SplineSolver::default();
        let trajectory = solver.generate(&straight_request()).unwrap();

        assert!(trajectory.total_time() > 0.0);
        let start = trajectory.sample(0.0);
        let end = trajectory.sample(trajectory.total_time());
        assert!(start.pose.distance(&Pose::new(0.0, 0.0, 0.0)) < 1e-6);
        assert!(end.pose.distance(&Pose::new(5.0, 0.0, 0.0)) < 1e-6);
    }

    #[test]
    fn velocity_limit_is_respected() {
        let solver = SplineSolver::default();
        let trajectory = solver.generate(&straight_request()).unwrap();

        for state in trajectory.states() {
            assert!(state.velocity <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn start_and_end_velocities_are_honored() {
        let solver = SplineSolver::default();
        let trajectory = solver.generate(&straight_request()).unwrap();

        assert!(trajectory.first().unwrap().velocity.abs() < 1e-9);
        assert!(trajectory.last().unwrap().velocity.abs() < 1e-9);
    }

    #[test]
    fn reversed_flips_heading_half_turn() {
        let solver = SplineSolver::default();
        let forward = solver.generate(&straight_request()).unwrap();

        let mut request = straight_request();
        request.reversed = true;
        let reversed = solver.generate(&request).unwrap();

        let delta = crate::common::normalize_angle(
            reversed.sample(0.0).pose.heading - forward.sample(0.0).pose.heading,
        );
        assert!((delta.abs() - std::f64::consts::PI).abs() < 1e-9);
        assert!(reversed.sample(reversed.total_time() / 2.0).velocity < 0.0);
    }

    #[test]
    fn fewer_than_two_points_is_an_error() {
        let solver = SplineSolver::default();
        let mut request = straight_request();
        request.points = vec![Pose::new(0.0, 0.0, 0.0)];
        assert!(solver.generate(&request).is_err());
    }

    #[test]
    fn coincident_points_are_an_error() {
        let solver = SplineSolver::default();
        let mut request = straight_request();
        request.points = vec![Pose::new(1.0, 1.0, 0.0), Pose::new(1.0, 1.0, 0.0)];
        assert!(solver.generate(&request).is_err());
    }

    #[test]
    fn sample_interpolates_between_states() {
        let trajectory = Trajectory::new(vec![
            TimedState {
                time: 0.0,
                pose: Pose::new(0.0, 0.0, 0.0),
                curvature: 0.0,
                velocity: 0.0,
            },
            TimedState {
                time: 1.0,
                pose: Pose::new(2.0, 0.0, 0.0),
                curvature: 0.0,
                velocity: 2.0,
            },
        ]);

        let mid = trajectory.sample(0.5);
        assert!((mid.pose.x - 1.0).abs() < 1e-12);
        assert!((mid.velocity - 1.0).abs() < 1e-12);

        // Out-of-range times clamp to the endpoints
        assert_eq!(trajectory.sample(-1.0), *trajectory.first().unwrap());
        assert_eq!(trajectory.sample(10.0), *trajectory.last().unwrap());
    }

    #[test]
    fn curved_path_is_slower_than_straight() {
        let solver = SplineSolver::default();
        let straight = solver.generate(&straight_request()).unwrap();

        let mut curved_request = straight_request();
        curved_request.points = vec![
            Pose::new(0.0, 0.0, 0.0),
            Pose::from_degrees(3.0, 2.0, 90.0),
        ];
        let curved = solver.generate(&curved_request).unwrap();

        // The curved course is longer and centripetally limited
        assert!(curved.total_time() > straight.total_time() * 0.5);
        let max_velocity = curved
            .states()
            .iter()
            .map(|s| s.velocity)
            .fold(0.0, f64::max);
        assert!(max_velocity <= 2.0 + 1e-9);
    }
}
