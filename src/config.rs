//! Configuration loading for the dashboard core

use crate::common::Region;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Robot physical parameters
#[derive(Clone, Debug, Deserialize)]
pub struct RobotConfig {
    /// Distance between the wheel centers in meters (default: 0.66)
    #[serde(default = "default_track_width")]
    pub track_width: f64,

    /// Robot footprint length in meters (default: 0.762)
    #[serde(default = "default_robot_length")]
    pub robot_length: f64,

    /// Robot footprint width in meters (default: 0.762)
    #[serde(default = "default_robot_width")]
    pub robot_width: f64,

    /// Velocity constant of the drivetrain in volts per m/s (default: 3.7)
    #[serde(default = "default_kv")]
    pub kv: f64,

    /// Acceleration constant of the drivetrain in volts per m/s^2 (default: 0.6)
    #[serde(default = "default_ka")]
    pub ka: f64,

    /// Voltage needed to overcome static friction (default: 1.1)
    #[serde(default = "default_v_intercept")]
    pub v_intercept: f64,

    /// Voltage budget for trajectory following (default: 10.0)
    #[serde(default = "default_max_voltage")]
    pub max_voltage: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            track_width: default_track_width(),
            robot_length: default_robot_length(),
            robot_width: default_robot_width(),
            kv: default_kv(),
            ka: default_ka(),
            v_intercept: default_v_intercept(),
            max_voltage: default_max_voltage(),
        }
    }
}

/// Field layout used by the path finder
#[derive(Clone, Debug, Deserialize)]
pub struct FieldConfig {
    /// Field extent along x in meters (default: 16.46)
    #[serde(default = "default_field_length")]
    pub length: f64,

    /// Field extent along y in meters (default: 8.23)
    #[serde(default = "default_field_width")]
    pub width: f64,

    /// Clearance kept around obstacles when path finding (default: 1.0668)
    #[serde(default = "default_clearance_radius")]
    pub clearance_radius: f64,

    /// Known obstacle regions on the field
    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<Region>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            length: default_field_length(),
            width: default_field_width(),
            clearance_radius: default_clearance_radius(),
            obstacles: default_obstacles(),
        }
    }
}

/// Trajectory generation defaults
#[derive(Clone, Debug, Deserialize)]
pub struct GeneratorConfig {
    /// Sampling step for visualization in seconds (default: 0.02)
    #[serde(default = "default_sample_step")]
    pub sample_step: f64,

    /// Grid resolution for the path finder in meters (default: 0.1)
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: f64,

    /// Default maximum velocity in m/s (default: 3.0)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,

    /// Default maximum acceleration in m/s^2 (default: 1.8)
    #[serde(default = "default_max_acceleration")]
    pub max_acceleration: f64,

    /// Default maximum centripetal acceleration in m/s^2 (default: 2.7)
    #[serde(default = "default_max_centripetal")]
    pub max_centripetal_acceleration: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            sample_step: default_sample_step(),
            grid_resolution: default_grid_resolution(),
            max_velocity: default_max_velocity(),
            max_acceleration: default_max_acceleration(),
            max_centripetal_acceleration: default_max_centripetal(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<DashboardConfig> {
        let contents = std::fs::read_to_string(path)?;
        let config: DashboardConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

fn default_track_width() -> f64 {
    0.66
}

fn default_robot_length() -> f64 {
    0.762
}

fn default_robot_width() -> f64 {
    0.762
}

fn default_kv() -> f64 {
    3.7
}

fn default_ka() -> f64 {
    0.6
}

fn default_v_intercept() -> f64 {
    1.1
}

fn default_max_voltage() -> f64 {
    10.0
}

fn default_field_length() -> f64 {
    16.46
}

fn default_field_width() -> f64 {
    8.23
}

fn default_clearance_radius() -> f64 {
    // 3.5 feet
    1.0668
}

fn default_obstacles() -> Vec<Region> {
    // Fixed field fixtures: the two switches and the center platform zone
    vec![
        Region::new(3.56, 2.16, 4.78, 6.07),
        Region::new(11.69, 2.16, 12.91, 6.07),
        Region::new(6.54, 1.80, 9.96, 6.46),
    ]
}

fn default_sample_step() -> f64 {
    0.02
}

fn default_grid_resolution() -> f64 {
    0.1
}

fn default_max_velocity() -> f64 {
    3.0
}

fn default_max_acceleration() -> f64 {
    1.8
}

fn default_max_centripetal() -> f64 {
    2.7
}
