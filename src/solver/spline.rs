//! Hermite spline course generation
//!
//! Fits one cubic Hermite segment per consecutive point pair, using the pose
//! headings as tangent directions, and samples the result into a dense
//! course carrying position, heading, curvature and accumulated arc length.

use crate::common::{Pose, EPSILON};
use nalgebra::{Point2, Vector2};

/// One densely sampled point along the spline course
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoursePoint {
    pub position: Point2<f64>,
    /// Direction of travel in radians
    pub heading: f64,
    /// Signed curvature in 1/m
    pub curvature: f64,
    /// Arc length from the course start in meters
    pub distance: f64,
}

/// Sample a Hermite course through the points at roughly `step` meter spacing
///
/// `tangent_scale` scales the tangent magnitude relative to the chord length
/// of each segment; 1.0 is the neutral fit. Zero-length segments are skipped.
pub fn calc_course(points: &[Pose], step: f64, tangent_scale: f64) -> Vec<CoursePoint> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut course: Vec<CoursePoint> = Vec::new();
    let mut distance = 0.0;

    for pair in points.windows(2) {
        let (start, end) = (&pair[0], &pair[1]);
        let p0 = Point2::new(start.x, start.y);
        let p1 = Point2::new(end.x, end.y);
        let chord = (p1 - p0).norm();
        if chord < EPSILON {
            continue;
        }

        let magnitude = chord * tangent_scale;
        let m0 = Vector2::new(start.heading.cos(), start.heading.sin()) * magnitude;
        let m1 = Vector2::new(end.heading.cos(), end.heading.sin()) * magnitude;

        let subdivisions = ((chord / step).ceil() as usize).max(2);
        for i in 0..=subdivisions {
            let t = i as f64 / subdivisions as f64;
            let sampled = hermite(&p0, &m0, &p1, &m1, t);

            if let Some(previous) = course.last() {
                let ds = (sampled.position - previous.position).norm();
                if ds < EPSILON {
                    // Shared knot between consecutive segments
                    continue;
                }
                distance += ds;
            }
            course.push(CoursePoint {
                position: sampled.position,
                heading: sampled.heading,
                curvature: sampled.curvature,
                distance,
            });
        }
    }

    course
}

/// Integrated squared-curvature cost of a course, used to rank tangent scales
pub fn curvature_cost(course: &[CoursePoint]) -> f64 {
    let mut cost = 0.0;
    for pair in course.windows(2) {
        let ds = pair[1].distance - pair[0].distance;
        let k = (pair[0].curvature + pair[1].curvature) / 2.0;
        cost += k * k * ds;
    }
    cost
}

struct SampledPoint {
    position: Point2<f64>,
    heading: f64,
    curvature: f64,
}

fn hermite(
    p0: &Point2<f64>,
    m0: &Vector2<f64>,
    p1: &Point2<f64>,
    m1: &Vector2<f64>,
    t: f64,
) -> SampledPoint {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    let position = Point2::from(
        p0.coords * h00 + m0 * h10 + p1.coords * h01 + m1 * h11,
    );

    let dh00 = 6.0 * t2 - 6.0 * t;
    let dh10 = 3.0 * t2 - 4.0 * t + 1.0;
    let dh01 = -6.0 * t2 + 6.0 * t;
    let dh11 = 3.0 * t2 - 2.0 * t;
    let velocity = p0.coords * dh00 + m0 * dh10 + p1.coords * dh01 + m1 * dh11;

    let ddh00 = 12.0 * t - 6.0;
    let ddh10 = 6.0 * t - 4.0;
    let ddh01 = -12.0 * t + 6.0;
    let ddh11 = 6.0 * t - 2.0;
    let acceleration = p0.coords * ddh00 + m0 * ddh10 + p1.coords * ddh01 + m1 * ddh11;

    let speed = velocity.norm();
    let curvature = if speed < EPSILON {
        0.0
    } else {
        (velocity.x * acceleration.y - velocity.y * acceleration.x) / (speed * speed * speed)
    };

    SampledPoint {
        position,
        heading: velocity.y.atan2(velocity.x),
        curvature,
    }
}
