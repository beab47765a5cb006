//! Waypoint augmentation with obstacle-avoiding intermediate points
//!
//! Expands the user-authored waypoint list into the effective point sequence
//! fed to the solver. Path finding runs pairwise over consecutive waypoints;
//! a pair the finder cannot bridge is used verbatim, so a failure never
//! escapes this module.

use crate::common::Pose;
use crate::pathfind::PathFinder;
use std::sync::Arc;
use tracing::debug;

/// Expands waypoint pairs through the configured path finder
pub struct PathAugmenter {
    finder: Option<Arc<dyn PathFinder>>,
}

impl PathAugmenter {
    /// Create an augmenter; without a finder the input always passes through
    pub fn new(finder: Option<Arc<dyn PathFinder>>) -> Self {
        PathAugmenter { finder }
    }

    /// Produce the effective point sequence for the solver
    ///
    /// With `auto_path_finding` off the input is returned unchanged,
    /// duplicates and all. With it on, every consecutive pair is expanded
    /// through the finder (falling back to the pair itself) and the merged
    /// result is deduplicated preserving first-seen order.
    pub fn augment(&self, waypoints: &[Pose], auto_path_finding: bool) -> Vec<Pose> {
        if !auto_path_finding {
            return waypoints.to_vec();
        }
        let finder = match &self.finder {
            Some(finder) => finder,
            None => {
                debug!("auto path finding requested but no path finder is configured");
                return waypoints.to_vec();
            }
        };

        let mut merged: Vec<Pose> = Vec::new();
        for pair in waypoints.windows(2) {
            match finder.find_path(&pair[0], &pair[1]) {
                Some(segment) if !segment.is_empty() => merged.extend(segment),
                _ => {
                    debug!(
                        "no path between ({:.2}, {:.2}) and ({:.2}, {:.2}), using the pair directly",
                        pair[0].x, pair[0].y, pair[1].x, pair[1].y
                    );
                    merged.push(pair[0]);
                    merged.push(pair[1]);
                }
            }
        }

        // Remove exact duplicates, keeping the first occurrence in order
        let mut result: Vec<Pose> = Vec::with_capacity(merged.len());
        for pose in merged {
            if !result.contains(&pose) {
                result.push(pose);
            }
        }
        result
    }
}
