//! Reactive trajectory regeneration
//!
//! The regenerator listens for parameter store changes and drives the full
//! pipeline: validate the settings snapshot, expand the waypoints through the
//! augmenter, assemble the constraint list and call the solver. The result is
//! published atomically; every failure along the way is absorbed here and the
//! previously published trajectory stays current.

pub mod augmenter;
pub mod constraint;
pub mod sampler;

use self::augmenter::PathAugmenter;
use self::constraint::{Constraint, DriveModel};
use crate::common::EPSILON;
use crate::pathfind::PathFinder;
use crate::solver::{Trajectory, TrajectoryRequest, TrajectorySolver};
use crate::store::{GenerationSettings, ParameterStore, StoreObserver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Recomputes and publishes the current trajectory on store changes
pub struct TrajectoryRegenerator {
    solver: Arc<dyn TrajectorySolver>,
    augmenter: PathAugmenter,
    drive: DriveModel,
    max_voltage: f64,
    trajectory: RwLock<Option<Arc<Trajectory>>>,
    computing: AtomicBool,
}

impl TrajectoryRegenerator {
    /// Create a regenerator with the given solver and optional path finder
    pub fn new(
        solver: Arc<dyn TrajectorySolver>,
        finder: Option<Arc<dyn PathFinder>>,
        drive: DriveModel,
        max_voltage: f64,
    ) -> Self {
        TrajectoryRegenerator {
            solver,
            augmenter: PathAugmenter::new(finder),
            drive,
            max_voltage,
            trajectory: RwLock::new(None),
            computing: AtomicBool::new(false),
        }
    }

    /// The currently published trajectory, if any
    ///
    /// Consumers keep their own handle; a later republish does not invalidate
    /// it, the trajectory itself is immutable.
    pub fn current_trajectory(&self) -> Option<Arc<Trajectory>> {
        self.trajectory.read().unwrap().clone()
    }

    /// Run one recompute cycle against the store's current state
    pub fn recompute(&self, store: &ParameterStore) {
        // A trigger raised by the recompute itself is skipped, not recursed
        if self.computing.swap(true, Ordering::SeqCst) {
            debug!("recompute already in flight, skipping re-entrant trigger");
            return;
        }
        self.run(store);
        self.computing.store(false, Ordering::SeqCst);
    }

    fn run(&self, store: &ParameterStore) {
        let settings = store.settings();
        let waypoints = store.waypoints();

        if waypoints.len() < 2 {
            debug!("{} waypoint(s), nothing to generate", waypoints.len());
            return;
        }
        if !settings_valid(&settings) {
            debug!("generation settings incomplete, keeping previous trajectory");
            return;
        }

        let points = self
            .augmenter
            .augment(&waypoints, settings.auto_path_finding);
        if points.len() < 2 {
            debug!("augmentation collapsed the path, keeping previous trajectory");
            return;
        }

        let request = TrajectoryRequest {
            points,
            constraints: vec![
                Constraint::DifferentialDriveDynamics {
                    drive: self.drive,
                    max_voltage: self.max_voltage,
                },
                Constraint::CentripetalAcceleration {
                    max: settings.max_centripetal_acceleration,
                },
            ],
            start_velocity: settings.start_velocity,
            end_velocity: settings.end_velocity,
            max_velocity: settings.max_velocity,
            max_acceleration: settings.max_acceleration,
            reversed: settings.reversed,
            optimize_splines: settings.optimize_splines,
        };

        match self.solver.generate(&request) {
            Ok(trajectory) => {
                debug!(
                    "published trajectory: {} states, {:.2} s",
                    trajectory.len(),
                    trajectory.total_time()
                );
                *self.trajectory.write().unwrap() = Some(Arc::new(trajectory));
            }
            Err(e) => {
                warn!("trajectory generation failed, keeping previous trajectory: {}", e);
            }
        }
    }
}

impl StoreObserver for TrajectoryRegenerator {
    fn on_store_changed(&self, store: &ParameterStore) {
        self.recompute(store);
    }
}

fn settings_valid(settings: &GenerationSettings) -> bool {
    !(settings.start_velocity.is_nan()
        || settings.end_velocity.is_nan()
        || settings.max_velocity.abs() < EPSILON
        || settings.max_acceleration.abs() < EPSILON
        || settings.max_centripetal_acceleration.abs() < EPSILON)
}
