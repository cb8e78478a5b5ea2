use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Whether the polygon winds counter-clockwise.
#[must_use]
pub fn is_counter_clockwise(points: &[Point2]) -> bool {
    signed_area_2d(points) > 0.0
}

/// Computes the normalized direction from point `a` to point `b`,
/// or `None` if the segment has zero length.
#[must_use]
pub fn direction(a: &Point2, b: &Point2) -> Option<Vector2> {
    let d = b - a;
    let len = (d.x * d.x + d.y * d.y).sqrt();
    if len < TOLERANCE {
        return None;
    }
    Some(Vector2::new(d.x / len, d.y / len))
}

/// Returns the left-pointing normal of a direction vector.
///
/// For a counter-clockwise polygon this is the inward edge normal.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}
