//! Obstacle-aware path finding between waypoint pairs
//!
//! The [`PathFinder`] trait is the seam the augmenter calls per consecutive
//! waypoint pair. "No path" is a representable outcome (`None`), never an
//! error; implementations absorb their internal failures into `None`.

use crate::common::{Pose, Region};
use crate::config::FieldConfig;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Seam for the obstacle-aware search between two poses
pub trait PathFinder: Send + Sync {
    /// Find an ordered pose sequence bridging start and end, or `None`
    fn find_path(&self, start: &Pose, end: &Pose) -> Option<Vec<Pose>>;
}

/// Grid-based A* path finder over the configured field obstacles
///
/// Obstacles are inflated by the clearance radius at construction. The
/// search runs over cell centers and the resulting path is shortcut with
/// line-of-sight checks before being converted back to poses.
pub struct GridPathFinder {
    field_length: f64,
    field_width: f64,
    resolution: f64,
    obstacles: Vec<Region>,
    max_iterations: usize,
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: (i32, i32),
    f_score: f64,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap on f_score
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl GridPathFinder {
    /// Create a path finder for the given field layout
    pub fn new(field: &FieldConfig, resolution: f64) -> Self {
        let obstacles = field
            .obstacles
            .iter()
            .map(|o| o.inflated(field.clearance_radius))
            .collect();
        GridPathFinder {
            field_length: field.length,
            field_width: field.width,
            resolution,
            obstacles,
            max_iterations: 100_000,
        }
    }

    fn is_blocked(&self, x: f64, y: f64) -> bool {
        if x < 0.0 || y < 0.0 || x > self.field_length || y > self.field_width {
            return true;
        }
        self.obstacles.iter().any(|o| o.contains(x, y))
    }

    fn cell_center(&self, cell: (i32, i32)) -> (f64, f64) {
        (
            (cell.0 as f64 + 0.5) * self.resolution,
            (cell.1 as f64 + 0.5) * self.resolution,
        )
    }

    fn world_to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x / self.resolution).floor() as i32,
            (y / self.resolution).floor() as i32,
        )
    }

    fn cell_blocked(&self, cell: (i32, i32)) -> bool {
        let (x, y) = self.cell_center(cell);
        self.is_blocked(x, y)
    }

    fn line_is_clear(&self, from: (f64, f64), to: (f64, f64)) -> bool {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let length = (dx * dx + dy * dy).sqrt();
        let steps = ((length / (self.resolution / 2.0)).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            if self.is_blocked(from.0 + dx * t, from.1 + dy * t) {
                return false;
            }
        }
        true
    }

    fn search(&self, start_cell: (i32, i32), goal_cell: (i32, i32)) -> Option<Vec<(i32, i32)>> {
        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
        let mut g_score: HashMap<(i32, i32), f64> = HashMap::new();

        g_score.insert(start_cell, 0.0);
        open.push(SearchNode {
            cell: start_cell,
            f_score: heuristic(start_cell, goal_cell),
        });

        let mut iterations = 0;
        while let Some(node) = open.pop() {
            iterations += 1;
            if iterations > self.max_iterations {
                return None;
            }

            if node.cell == goal_cell {
                let mut path = vec![node.cell];
                let mut current = node.cell;
                while let Some(&previous) = came_from.get(&current) {
                    path.push(previous);
                    current = previous;
                }
                path.reverse();
                return Some(path);
            }

            let current_g = g_score[&node.cell];
            for (dx, dy) in NEIGHBORS {
                let neighbor = (node.cell.0 + dx, node.cell.1 + dy);
                if self.cell_blocked(neighbor) {
                    continue;
                }
                let step = ((dx * dx + dy * dy) as f64).sqrt();
                let tentative = current_g + step;
                if tentative < *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                    came_from.insert(neighbor, node.cell);
                    g_score.insert(neighbor, tentative);
                    open.push(SearchNode {
                        cell: neighbor,
                        f_score: tentative + heuristic(neighbor, goal_cell),
                    });
                }
            }
        }

        None
    }

    /// Greedy line-of-sight shortcut pass over the waypoint list
    fn shortcut(&self, points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
        if points.len() <= 2 {
            return points;
        }
        let mut result = vec![points[0]];
        let mut anchor = 0;
        while anchor < points.len() - 1 {
            let mut best = anchor + 1;
            for candidate in (anchor + 1..points.len()).rev() {
                if self.line_is_clear(points[anchor], points[candidate]) {
                    best = candidate;
                    break;
                }
            }
            result.push(points[best]);
            anchor = best;
        }
        result
    }
}

impl PathFinder for GridPathFinder {
    fn find_path(&self, start: &Pose, end: &Pose) -> Option<Vec<Pose>> {
        if self.is_blocked(start.x, start.y) || self.is_blocked(end.x, end.y) {
            return None;
        }

        if self.line_is_clear(start.translation(), end.translation()) {
            return Some(vec![*start, *end]);
        }

        let start_cell = self.world_to_cell(start.x, start.y);
        let goal_cell = self.world_to_cell(end.x, end.y);
        let cells = self.search(start_cell, goal_cell)?;

        // Anchor the cell path on the exact endpoints before shortcutting
        let mut points: Vec<(f64, f64)> = Vec::with_capacity(cells.len() + 2);
        points.push(start.translation());
        points.extend(cells.into_iter().map(|c| self.cell_center(c)));
        points.push(end.translation());
        let points = self.shortcut(points);

        // Intermediate poses take the local travel direction as heading
        let mut path = Vec::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            if i == 0 {
                path.push(*start);
            } else if i == points.len() - 1 {
                path.push(*end);
            } else {
                let next = points[i + 1];
                let heading = (next.1 - point.1).atan2(next.0 - point.0);
                path.push(Pose::new(point.0, point.1, heading));
            }
        }
        Some(path)
    }
}

fn heuristic(cell: (i32, i32), goal: (i32, i32)) -> f64 {
    let dx = (goal.0 - cell.0) as f64;
    let dy = (goal.1 - cell.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_field() -> FieldConfig {
        FieldConfig {
            length: 10.0,
            width: 10.0,
            clearance_radius: 0.5,
            obstacles: Vec::new(),
        }
    }

    fn walled_field() -> FieldConfig {
        FieldConfig {
            length: 10.0,
            width: 10.0,
            clearance_radius: 0.5,
            // Wall across the middle with a gap near the top
            obstacles: vec![Region::new(4.5, 0.0, 5.5, 7.0)],
        }
    }

    #[test]
    fn clear_line_returns_the_pair() {
        let finder = GridPathFinder::new(&open_field(), 0.25);
        let start = Pose::new(1.0, 1.0, 0.0);
        let end = Pose::new(8.0, 1.0, 0.0);

        let path = finder.find_path(&start, &end).unwrap();
        assert_eq!(path, vec![start, end]);
    }

    #[test]
    fn blocked_line_routes_around_the_obstacle() {
        let finder = GridPathFinder::new(&walled_field(), 0.25);
        let start = Pose::new(1.0, 1.0, 0.0);
        let end = Pose::new(9.0, 1.0, 0.0);

        let path = finder.find_path(&start, &end).unwrap();
        assert!(path.len() > 2);
        assert_eq!(path[0], start);
        assert_eq!(*path.last().unwrap(), end);

        // Every leg of the returned path must be collision free
        for pair in path.windows(2) {
            assert!(finder.line_is_clear(pair[0].translation(), pair[1].translation()));
        }
    }

    #[test]
    fn endpoint_inside_obstacle_yields_none() {
        let finder = GridPathFinder::new(&walled_field(), 0.25);
        let start = Pose::new(1.0, 1.0, 0.0);
        let inside = Pose::new(5.0, 3.0, 0.0);

        assert!(finder.find_path(&start, &inside).is_none());
        assert!(finder.find_path(&inside, &start).is_none());
    }

    #[test]
    fn out_of_field_endpoint_yields_none() {
        let finder = GridPathFinder::new(&open_field(), 0.25);
        let start = Pose::new(1.0, 1.0, 0.0);
        let outside = Pose::new(20.0, 1.0, 0.0);

        assert!(finder.find_path(&start, &outside).is_none());
    }
}
