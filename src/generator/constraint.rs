//! Timing constraints applied during time parameterization
//!
//! Constraints are built fresh for every recompute and consumed positionally
//! by the solver. Each kind answers two queries: the velocity cap and the
//! acceleration cap at a given state, returning infinity when it does not
//! limit that state.

use crate::common::{Pose, Region, EPSILON};
use crate::config::RobotConfig;

/// Simplified differential-drive feedforward model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveModel {
    /// Distance between the wheel centers in meters
    pub track_width: f64,
    /// Velocity constant in volts per m/s
    pub kv: f64,
    /// Acceleration constant in volts per m/s^2
    pub ka: f64,
    /// Voltage needed to overcome static friction
    pub v_intercept: f64,
}

impl DriveModel {
    /// Build the model from the robot configuration
    pub fn from_config(config: &RobotConfig) -> Self {
        DriveModel {
            track_width: config.track_width,
            kv: config.kv,
            ka: config.ka,
            v_intercept: config.v_intercept,
        }
    }

    /// Ratio of outer-wheel speed to chassis speed while turning
    fn wheel_factor(&self, curvature: f64) -> f64 {
        1.0 + curvature.abs() * self.track_width / 2.0
    }
}

/// A limit applied during time parameterization
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Cap on lateral acceleration while turning
    CentripetalAcceleration { max: f64 },
    /// Velocity cap inside a rectangular field region
    VelocityLimitRegion { region: Region, max_velocity: f64 },
    /// Velocity cap within a radius of a field point
    VelocityLimitRadius {
        center: (f64, f64),
        radius: f64,
        max_velocity: f64,
    },
    /// Cap derived from the drivetrain's voltage budget
    DifferentialDriveDynamics { drive: DriveModel, max_voltage: f64 },
}

impl Constraint {
    /// Maximum velocity allowed at the given state, infinity if unconstrained
    pub fn max_velocity(&self, pose: &Pose, curvature: f64) -> f64 {
        match self {
            Constraint::CentripetalAcceleration { max } => {
                if curvature.abs() < EPSILON {
                    f64::INFINITY
                } else {
                    (max / curvature.abs()).sqrt()
                }
            }
            Constraint::VelocityLimitRegion {
                region,
                max_velocity,
            } => {
                if region.contains(pose.x, pose.y) {
                    *max_velocity
                } else {
                    f64::INFINITY
                }
            }
            Constraint::VelocityLimitRadius {
                center,
                radius,
                max_velocity,
            } => {
                let dx = pose.x - center.0;
                let dy = pose.y - center.1;
                if (dx * dx + dy * dy).sqrt() <= *radius {
                    *max_velocity
                } else {
                    f64::INFINITY
                }
            }
            Constraint::DifferentialDriveDynamics { drive, max_voltage } => {
                let budget = (max_voltage - drive.v_intercept).max(0.0);
                budget / drive.kv / drive.wheel_factor(curvature)
            }
        }
    }

    /// Maximum acceleration allowed at the given state, infinity if unconstrained
    pub fn max_acceleration(&self, _pose: &Pose, curvature: f64, velocity: f64) -> f64 {
        match self {
            Constraint::DifferentialDriveDynamics { drive, max_voltage } => {
                let factor = drive.wheel_factor(curvature);
                let wheel_velocity = velocity.abs() * factor;
                let headroom = (max_voltage - drive.v_intercept - drive.kv * wheel_velocity).max(0.0);
                headroom / drive.ka / factor
            }
            _ => f64::INFINITY,
        }
    }
}
