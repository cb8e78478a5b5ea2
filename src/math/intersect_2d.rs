use super::distance_2d::point_to_segment_dist;
use super::{Point2, Vector2, EPSILON, TOLERANCE};

/// Result of intersecting two rays in 2D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayRayIntersection {
    /// Rays meet at a single point; `t` and `u` are the ray parameters
    /// (distances when the directions are unit length).
    Point { point: Point2, t: f64, u: f64 },
    /// Rays lie on the same line.
    Collinear,
    /// Parallel but disjoint lines, or a crossing behind a ray origin.
    None,
}

/// Intersects two rays `a + t * da` and `b + u * db` for `t, u >= 0`.
///
/// Crossings slightly behind an origin (within [`EPSILON`]) are accepted to
/// tolerate vertices that have already drifted onto the meeting point.
#[must_use]
pub fn ray_ray_intersect_2d(
    a: &Point2,
    da: &Vector2,
    b: &Point2,
    db: &Vector2,
) -> RayRayIntersection {
    let cross = da.x * db.y - da.y * db.x;
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if cross.abs() < TOLERANCE {
        // Parallel: collinear when the offset between origins is also
        // parallel to the shared direction.
        let offset_cross = dx * da.y - dy * da.x;
        if offset_cross.abs() < EPSILON {
            return RayRayIntersection::Collinear;
        }
        return RayRayIntersection::None;
    }

    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;
    if t < -EPSILON || u < -EPSILON {
        return RayRayIntersection::None;
    }

    let t = t.max(0.0);
    let u = u.max(0.0);
    RayRayIntersection::Point {
        point: Point2::new(a.x + da.x * t, a.y + da.y * t),
        t,
        u,
    }
}

/// Intersects the ray `origin + t * dir` with the bounded segment `a`–`b`.
///
/// Returns `(intersection_point, t, u)` where `t >= 0` is the ray parameter
/// and `u` is the segment parameter clamped to `[0, 1]`.
#[must_use]
pub fn ray_segment_intersect_2d(
    origin: &Point2,
    dir: &Vector2,
    a: &Point2,
    b: &Point2,
) -> Option<(Point2, f64, f64)> {
    let db = Vector2::new(b.x - a.x, b.y - a.y);
    let cross = dir.x * db.y - dir.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = a.x - origin.x;
    let dy = a.y - origin.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * dir.y - dy * dir.x) / cross;

    if t >= -EPSILON && u >= -EPSILON && u <= 1.0 + EPSILON {
        let u = u.clamp(0.0, 1.0);
        Some((Point2::new(a.x + db.x * u, a.y + db.y * u), t.max(0.0), u))
    } else {
        None
    }
}

/// Whether point `p` lies on the bounded segment `a`–`b` within `eps`.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2, eps: f64) -> bool {
    point_to_segment_dist(p, a, b) < eps
}
