//! Parameter store for the generation settings and the waypoint list
//!
//! The store is the only mutable shared state in the core. Every consumer
//! reads snapshots; mutation happens through explicit setters that notify
//! subscribed observers synchronously, in mutation order. Validation is not
//! done here, it belongs to the regenerator.

use crate::common::Pose;
use std::sync::{Arc, RwLock};

/// Trajectory generation settings edited through the dashboard
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Velocity at the start of the trajectory in m/s (NaN when unset)
    pub start_velocity: f64,
    /// Velocity at the end of the trajectory in m/s (NaN when unset)
    pub end_velocity: f64,
    /// Maximum velocity in m/s
    pub max_velocity: f64,
    /// Maximum acceleration in m/s^2
    pub max_acceleration: f64,
    /// Maximum centripetal acceleration in m/s^2
    pub max_centripetal_acceleration: f64,
    /// Drive the path backwards
    pub reversed: bool,
    /// Let the solver optimize spline curvature
    pub optimize_splines: bool,
    /// Fit cubic instead of quintic splines
    pub use_cubic_spline: bool,
    /// Insert obstacle-avoiding points between waypoint pairs
    pub auto_path_finding: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            start_velocity: 0.0,
            end_velocity: 0.0,
            max_velocity: 3.0,
            max_acceleration: 1.8,
            max_centripetal_acceleration: 2.7,
            reversed: false,
            optimize_splines: true,
            use_cubic_spline: false,
            auto_path_finding: false,
        }
    }
}

/// Observer notified after every store mutation that changed a value
pub trait StoreObserver: Send + Sync {
    /// Called synchronously after the mutation has been applied
    fn on_store_changed(&self, store: &ParameterStore);
}

struct StoreState {
    settings: GenerationSettings,
    waypoints: Vec<Pose>,
}

/// Shared store holding the generation settings and the ordered waypoints
pub struct ParameterStore {
    state: RwLock<StoreState>,
    observers: RwLock<Vec<Arc<dyn StoreObserver>>>,
}

impl ParameterStore {
    /// Create a new store with the given settings and waypoints
    pub fn new(settings: GenerationSettings, waypoints: Vec<Pose>) -> Self {
        ParameterStore {
            state: RwLock::new(StoreState {
                settings,
                waypoints,
            }),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer for change notifications
    pub fn subscribe(&self, observer: Arc<dyn StoreObserver>) {
        self.observers.write().unwrap().push(observer);
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> GenerationSettings {
        self.state.read().unwrap().settings.clone()
    }

    /// Snapshot of the current waypoint list
    pub fn waypoints(&self) -> Vec<Pose> {
        self.state.read().unwrap().waypoints.clone()
    }

    /// Number of waypoints currently in the store
    pub fn waypoint_count(&self) -> usize {
        self.state.read().unwrap().waypoints.len()
    }

    pub fn set_start_velocity(&self, value: f64) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.start_velocity == value {
                false
            } else {
                state.settings.start_velocity = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_end_velocity(&self, value: f64) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.end_velocity == value {
                false
            } else {
                state.settings.end_velocity = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_max_velocity(&self, value: f64) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.max_velocity == value {
                false
            } else {
                state.settings.max_velocity = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_max_acceleration(&self, value: f64) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.max_acceleration == value {
                false
            } else {
                state.settings.max_acceleration = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_max_centripetal_acceleration(&self, value: f64) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.max_centripetal_acceleration == value {
                false
            } else {
                state.settings.max_centripetal_acceleration = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_reversed(&self, value: bool) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.reversed == value {
                false
            } else {
                state.settings.reversed = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_optimize_splines(&self, value: bool) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.optimize_splines == value {
                false
            } else {
                state.settings.optimize_splines = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_use_cubic_spline(&self, value: bool) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.use_cubic_spline == value {
                false
            } else {
                state.settings.use_cubic_spline = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_auto_path_finding(&self, value: bool) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.settings.auto_path_finding == value {
                false
            } else {
                state.settings.auto_path_finding = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Replace the whole waypoint list
    pub fn set_waypoints(&self, waypoints: Vec<Pose>) {
        let changed = {
            let mut state = self.state.write().unwrap();
            if state.waypoints == waypoints {
                false
            } else {
                state.waypoints = waypoints;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Append a waypoint at the end of the list
    pub fn push_waypoint(&self, pose: Pose) {
        self.state.write().unwrap().waypoints.push(pose);
        self.notify();
    }

    /// Insert a waypoint at the given index
    pub fn insert_waypoint(&self, index: usize, pose: Pose) {
        {
            let mut state = self.state.write().unwrap();
            let index = index.min(state.waypoints.len());
            state.waypoints.insert(index, pose);
        }
        self.notify();
    }

    /// Remove the waypoint at the given index, if it exists
    pub fn remove_waypoint(&self, index: usize) -> Option<Pose> {
        let removed = {
            let mut state = self.state.write().unwrap();
            if index < state.waypoints.len() {
                Some(state.waypoints.remove(index))
            } else {
                None
            }
        };
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Replace the waypoint at the given index
    pub fn replace_waypoint(&self, index: usize, pose: Pose) {
        let changed = {
            let mut state = self.state.write().unwrap();
            match state.waypoints.get(index) {
                Some(existing) if *existing != pose => {
                    state.waypoints[index] = pose;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        // Snapshot the observer list so observers may subscribe re-entrantly
        let observers: Vec<Arc<dyn StoreObserver>> = self.observers.read().unwrap().clone();
        for observer in &observers {
            observer.on_store_changed(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingObserver {
        count: AtomicUsize,
    }

    impl CountingObserver {
        fn new() -> Arc<Self> {
            Arc::new(CountingObserver {
                count: AtomicUsize::new(0),
            })
        }

        fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl StoreObserver for CountingObserver {
        fn on_store_changed(&self, _store: &ParameterStore) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn setter_notifies_on_change() {
        let store = ParameterStore::new(GenerationSettings::default(), Vec::new());
        let observer = CountingObserver::new();
        store.subscribe(observer.clone());

        store.set_max_velocity(2.0);
        assert_eq!(observer.count(), 1);
        assert!((store.settings().max_velocity - 2.0).abs() < 1e-12);
    }

    #[test]
    fn setter_suppresses_unchanged_value() {
        let store = ParameterStore::new(GenerationSettings::default(), Vec::new());
        let observer = CountingObserver::new();
        store.subscribe(observer.clone());

        let current = store.settings().max_velocity;
        store.set_max_velocity(current);
        assert_eq!(observer.count(), 0);

        store.set_reversed(false);
        assert_eq!(observer.count(), 0);
        store.set_reversed(true);
        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn waypoint_mutations_notify() {
        let store = ParameterStore::new(GenerationSettings::default(), Vec::new());
        let observer = CountingObserver::new();
        store.subscribe(observer.clone());

        store.push_waypoint(Pose::new(0.0, 0.0, 0.0));
        store.push_waypoint(Pose::new(1.0, 0.0, 0.0));
        assert_eq!(observer.count(), 2);

        store.replace_waypoint(1, Pose::new(1.0, 0.0, 0.0));
        assert_eq!(observer.count(), 2);

        store.replace_waypoint(1, Pose::new(2.0, 0.0, 0.0));
        assert_eq!(observer.count(), 3);

        assert!(store.remove_waypoint(5).is_none());
        assert_eq!(observer.count(), 3);

        assert!(store.remove_waypoint(0).is_some());
        assert_eq!(observer.count(), 4);
        assert_eq!(store.waypoint_count(), 1);
    }

    #[test]
    fn observer_sees_applied_state() {
        struct CapturingObserver {
            seen: RwLock<Option<f64>>,
        }

        impl StoreObserver for CapturingObserver {
            fn on_store_changed(&self, store: &ParameterStore) {
                *self.seen.write().unwrap() = Some(store.settings().max_acceleration);
            }
        }

        let store = ParameterStore::new(GenerationSettings::default(), Vec::new());
        let observer = Arc::new(CapturingObserver {
            seen: RwLock::new(None),
        });
        store.subscribe(observer.clone());

        store.set_max_acceleration(1.25);
        assert_eq!(*observer.seen.read().unwrap(), Some(1.25));
    }
}
