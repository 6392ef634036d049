//! Polygon approximation using the Ramer-Douglas-Peucker algorithm.
//!
//! Stroke complexity compares how many border points a contour has with
//! how many survive approximation at a tolerance proportional to its
//! perimeter. Smooth, simple strokes collapse to a handful of vertices;
//! tremulous or heavily retouched strokes keep many.

use crate::types::Point;

/// Approximate a closed contour with a polygon.
///
/// The ring is split at the point farthest from its first point and
/// each half is simplified as an open chain, so the result does not
/// depend on a chord between two adjacent ring points. The closing
/// point is not repeated in the output.
#[must_use = "returns the approximated polygon"]
pub fn approximate_closed(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let origin = points[0];
    let split = points
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, 0.0), |(best_i, best_d), (i, p)| {
            let d = p.distance_squared(origin);
            if d > best_d { (i, d) } else { (best_i, best_d) }
        })
        .0;
    if split == 0 {
        // Every point coincides with the origin.
        return vec![origin];
    }

    let first_half = &points[..=split];
    let mut second_half: Vec<Point> = points[split..].to_vec();
    second_half.push(origin);

    let mut polygon = keep_marked(first_half, &rdp_marks(first_half, tolerance));
    let tail = keep_marked(&second_half, &rdp_marks(&second_half, tolerance));
    // Skip the shared split point and the repeated origin.
    polygon.extend(tail.iter().skip(1).take(tail.len().saturating_sub(2)));
    polygon
}

fn rdp_marks(points: &[Point], tolerance: f64) -> Vec<bool> {
    let mut kept = vec![false; points.len()];
    if let Some(last) = kept.len().checked_sub(1) {
        kept[0] = true;
        kept[last] = true;
        rdp_recurse(points, 0, last, tolerance, &mut kept);
    }
    kept
}

fn keep_marked(points: &[Point], kept: &[bool]) -> Vec<Point> {
    points
        .iter()
        .zip(kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Recursive step of the Ramer-Douglas-Peucker algorithm.
///
/// Finds the point between `start` and `end` that is farthest from the
/// line through them. If that distance exceeds `tolerance`, the point is
/// kept and both sub-ranges are processed recursively.
fn rdp_recurse(points: &[Point], start: usize, end: usize, tolerance: f64, kept: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = start;

    for i in (start + 1)..end {
        let d = perpendicular_distance(points[i], points[start], points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        kept[max_idx] = true;
        rdp_recurse(points, start, max_idx, tolerance, kept);
        rdp_recurse(points, max_idx, end, tolerance, kept);
    }
}

/// Perpendicular distance from point `p` to the line defined by `a` and `b`.
///
/// When `a` and `b` coincide, returns the distance from `p` to `a`.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        return p.distance(a);
    }

    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length_sq.sqrt()
}
