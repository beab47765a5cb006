pub mod common;
pub mod config;
pub mod error;
pub mod generator;
pub mod pathfind;
pub mod solver;
pub mod store;

use crate::common::Pose;
use crate::config::DashboardConfig;
use crate::generator::constraint::DriveModel;
use crate::generator::sampler::TrajectorySampler;
use crate::generator::TrajectoryRegenerator;
use crate::pathfind::GridPathFinder;
use crate::solver::{SplineSolver, Trajectory};
use crate::store::{GenerationSettings, ParameterStore};
use std::sync::Arc;

/// Core pipeline for the trajectory dashboard
///
/// Owns the parameter store and the regenerator, wires the subscription and
/// runs the initial recompute so a freshly built core already publishes a
/// trajectory for the seed waypoints. One instance is constructed at
/// application start and dropped at exit; every consumer works through
/// handles obtained here.
pub struct DashboardCore {
    store: Arc<ParameterStore>,
    regenerator: Arc<TrajectoryRegenerator>,
    sampler: TrajectorySampler,
}

impl DashboardCore {
    /// Build the core from a configuration
    pub fn new(config: DashboardConfig) -> Self {
        let settings = GenerationSettings {
            start_velocity: 0.0,
            end_velocity: 0.0,
            max_velocity: config.generator.max_velocity,
            max_acceleration: config.generator.max_acceleration,
            max_centripetal_acceleration: config.generator.max_centripetal_acceleration,
            ..GenerationSettings::default()
        };
        let waypoints = vec![
            Pose::new(0.4572, 7.0104, 0.0),
            Pose::new(3.5052, 7.0104, 0.0),
        ];
        let store = Arc::new(ParameterStore::new(settings, waypoints));

        let finder = GridPathFinder::new(&config.field, config.generator.grid_resolution);
        let regenerator = Arc::new(TrajectoryRegenerator::new(
            Arc::new(SplineSolver::default()),
            Some(Arc::new(finder)),
            DriveModel::from_config(&config.robot),
            config.robot.max_voltage,
        ));
        store.subscribe(regenerator.clone());
        regenerator.recompute(&store);

        DashboardCore {
            store,
            regenerator,
            sampler: TrajectorySampler::new(config.generator.sample_step),
        }
    }

    /// Handle to the parameter store
    pub fn store(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.store)
    }

    /// Handle to the trajectory regenerator
    pub fn regenerator(&self) -> Arc<TrajectoryRegenerator> {
        Arc::clone(&self.regenerator)
    }

    /// The sampling driver configured for this core
    pub fn sampler(&self) -> TrajectorySampler {
        self.sampler
    }

    /// The currently published trajectory, if any
    pub fn current_trajectory(&self) -> Option<Arc<Trajectory>> {
        self.regenerator.current_trajectory()
    }
}

impl Default for DashboardCore {
    fn default() -> Self {
        DashboardCore::new(DashboardConfig::default())
    }
}
