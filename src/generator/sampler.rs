//! Fixed-step trajectory sampling for plotting and tooltips
//!
//! Walks a trajectory from start to end at a fixed time step, clipping the
//! final sample to the exact end time. The iterator is derived fresh from
//! the immutable trajectory on every call, so sampling is restartable and
//! side-effect free.

use crate::common::Pose;
use crate::solver::Trajectory;

/// Default sampling step in seconds
pub const DEFAULT_STEP: f64 = 0.02;

/// A single sampled point along a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Time offset from trajectory start in seconds
    pub time: f64,
    /// Interpolated pose at this time
    pub pose: Pose,
    /// Path curvature at this time in 1/m
    pub curvature: f64,
}

impl SamplePoint {
    /// Human-readable position and heading with two-decimal precision
    pub fn tooltip(&self) -> String {
        format!(
            "{:.2} meter, {:.2} meter, {:.2} degrees",
            self.pose.x,
            self.pose.y,
            self.pose.heading_degrees()
        )
    }
}

/// Fixed-step sampling driver
#[derive(Debug, Clone, Copy)]
pub struct TrajectorySampler {
    step: f64,
}

impl TrajectorySampler {
    /// Create a sampler with the given time step in seconds
    pub fn new(step: f64) -> Self {
        TrajectorySampler { step }
    }

    /// The configured time step
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Lazily sample the trajectory from start to end
    pub fn sample_points<'a>(&self, trajectory: &'a Trajectory) -> SampleIter<'a> {
        SampleIter {
            trajectory,
            step: self.step,
            end: trajectory.total_time(),
            index: 0,
            done: trajectory.is_empty(),
        }
    }
}

impl Default for TrajectorySampler {
    fn default() -> Self {
        TrajectorySampler { step: DEFAULT_STEP }
    }
}

/// Lazy iterator over fixed-step sample points
pub struct SampleIter<'a> {
    trajectory: &'a Trajectory,
    step: f64,
    end: f64,
    index: usize,
    done: bool,
}

impl Iterator for SampleIter<'_> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.done {
            return None;
        }
        let cursor = self.index as f64 * self.step;
        // The final step is clipped to the end time instead of overshooting
        let time = if cursor >= self.end {
            self.done = true;
            self.end
        } else {
            cursor
        };
        self.index += 1;

        let state = self.trajectory.sample(time);
        Some(SamplePoint {
            time,
            pose: state.pose,
            curvature: state.curvature,
        })
    }
}
