use tracing::{debug, warn};

use crate::error::{Diagnostic, PolygonError, Result};
use crate::math::intersect_2d::{point_on_segment, ray_ray_intersect_2d, RayRayIntersection};
use crate::math::polygon_2d::{direction, is_counter_clockwise, left_normal, signed_area_2d};
use crate::math::{Point2, EPSILON, TOLERANCE};

use super::builder::{SkeletonBuilder, StraightSkeleton};
use super::event::detect_events;
use super::plan::{Plan, Vertex};
use super::resolve::resolve_events;

/// A generated skeleton together with anything the generator had to work
/// around. An empty diagnostics list means the wavefront retired cleanly.
#[derive(Debug)]
pub struct GeneratedSkeleton {
    /// The roof facet polygons.
    pub skeleton: StraightSkeleton,
    /// Recoverable conditions encountered along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Computes straight skeletons of simple polygon footprints by shrinking
/// the boundary in lock step until every wavefront loop has retired.
#[derive(Debug, Clone)]
pub struct StraightSkeletonGenerator {
    points: Vec<Point2>,
}

impl StraightSkeletonGenerator {
    /// Creates a generator for the given footprint. The polygon is
    /// implicitly closed; either winding order is accepted.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Runs the wavefront to completion and assembles the facet polygons.
    ///
    /// Interior conditions the algorithm can recover from (a wavefront loop
    /// that cannot advance, the iteration budget running out) degrade to a
    /// partial skeleton and are reported in
    /// [`GeneratedSkeleton::diagnostics`] instead of failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError`] when the footprint has fewer than three
    /// vertices, coincident consecutive vertices, or zero area.
    pub fn generate(&self) -> Result<GeneratedSkeleton> {
        validate(&self.points)?;

        let mut points = self.points.clone();
        if !is_counter_clockwise(&points) {
            points.reverse();
        }

        // A triangle collapses straight to a point with no intermediate
        // event, so its skeleton is the single facet it already is.
        if points.len() == 3 {
            return Ok(GeneratedSkeleton {
                skeleton: StraightSkeleton {
                    polygons: vec![points],
                },
                diagnostics: Vec::new(),
            });
        }

        let budget = points.len() + 1;
        let mut builder = SkeletonBuilder::new(&points);
        let mut diagnostics = Vec::new();
        let mut plans = vec![Plan::from_polygon(&points)];

        for iteration in 0.. {
            if plans.is_empty() {
                break;
            }
            if iteration >= budget {
                warn!(budget, "iteration budget exceeded, emitting partial skeleton");
                diagnostics.push(Diagnostic::IterationBudgetExceeded { budget });
                break;
            }

            let mut distance = f64::INFINITY;
            let mut advancing = Vec::with_capacity(plans.len());
            for plan in plans {
                match min_offset(&plan) {
                    Some(candidate) => {
                        distance = distance.min(candidate);
                        advancing.push(plan);
                    }
                    None => {
                        warn!(
                            vertices = plan.len(),
                            "wavefront loop cannot advance, dropping it"
                        );
                        diagnostics.push(Diagnostic::UnresolvableOffset);
                    }
                }
            }
            if advancing.is_empty() {
                break;
            }
            debug!(iteration, distance, loops = advancing.len(), "advancing wavefront");

            let mut survivors = Vec::with_capacity(advancing.len());
            for mut plan in advancing {
                plan.offset(distance);
                let events = detect_events(&mut plan);
                diagnostics.extend(resolve_events(&mut plan, events, &mut builder));

                let severed = plan.split();
                for lp in std::iter::once(plan).chain(severed) {
                    match lp.len() {
                        0 => {}
                        1 => {
                            warn!("wavefront degenerated to a single vertex, dropping it");
                            diagnostics.push(Diagnostic::DegeneratePlan { vertices: 1 });
                        }
                        2 => retire_ridge(lp, &mut builder),
                        _ => survivors.push(lp),
                    }
                }
            }
            plans = survivors;
        }

        Ok(GeneratedSkeleton {
            skeleton: builder.finish(),
            diagnostics,
        })
    }
}

/// Convenience wrapper over [`StraightSkeletonGenerator`].
///
/// # Errors
///
/// Returns [`PolygonError`] for footprints that are not simple polygons;
/// see [`StraightSkeletonGenerator::generate`].
pub fn generate(points: Vec<Point2>) -> Result<GeneratedSkeleton> {
    StraightSkeletonGenerator::new(points).generate()
}

fn validate(points: &[Point2]) -> std::result::Result<(), PolygonError> {
    if points.len() < 3 {
        return Err(PolygonError::TooFewVertices {
            count: points.len(),
        });
    }
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        if (points[i] - points[j]).norm() < TOLERANCE {
            return Err(PolygonError::DuplicatePoint { index: j });
        }
    }
    if signed_area_2d(points).abs() < TOLERANCE {
        return Err(PolygonError::ZeroArea);
    }
    Ok(())
}

/// Retires a two-vertex remnant loop: the pair of back-to-back edges is a
/// finished ridge. Both vertices are emitted where they stand and each side
/// of the ridge is recorded on the facet it faces.
fn retire_ridge(mut plan: Plan, builder: &mut SkeletonBuilder) {
    let ids = plan.cycle_ids();
    let (a, b) = (ids[0], ids[1]);
    builder.emit_ridge(
        plan.vertex(a).next_polygon_index,
        plan.vertex(b).position,
        plan.vertex(a).position,
    );
    builder.emit_ridge(
        plan.vertex(b).next_polygon_index,
        plan.vertex(a).position,
        plan.vertex(b).position,
    );
    for id in ids {
        let vert = plan.remove(id);
        builder.emit(&vert);
    }
}

/// Smallest inward offset at which some wavefront vertex meets another
/// vertex or edge, or `None` when nothing ever meets (which a closed
/// wavefront only reaches through numerical degeneracy).
///
/// Candidates are adjacent bisector crossings (edge collapses) and reflex
/// vertices bearing down on non-adjacent edges (splits). Bisector ray
/// parameters are converted to edge offsets through `sin_half` so all
/// candidates compare in the same units.
fn min_offset(plan: &Plan) -> Option<f64> {
    let mut best: Option<f64> = None;
    let ids = plan.cycle_ids();

    for &id in &ids {
        let next_id = plan.next(id);
        if next_id == id {
            continue;
        }
        let v = plan.vertex(id);
        let w = plan.vertex(next_id);

        if v.sin_half > TOLERANCE && w.sin_half > TOLERANCE {
            match ray_ray_intersect_2d(&v.position, &v.bisector, &w.position, &w.bisector) {
                RayRayIntersection::Point { t, u, .. } => {
                    tighten(&mut best, (t * v.sin_half).min(u * w.sin_half));
                }
                RayRayIntersection::Collinear => {
                    // Head-on approach along a shared line.
                    let gap = w.position - v.position;
                    if gap.dot(&v.bisector) > 0.0 && gap.dot(&w.bisector) < 0.0 {
                        let d = gap.norm() * v.sin_half * w.sin_half
                            / (v.sin_half + w.sin_half);
                        tighten(&mut best, d);
                    }
                }
                RayRayIntersection::None => {}
            }
        }

        if v.reflex && v.sin_half > TOLERANCE {
            for &a_id in &ids {
                let b_id = plan.next(a_id);
                if a_id == id || b_id == id || b_id == a_id {
                    continue;
                }
                if let Some(candidate) = reflex_strike(plan.vertex(id), plan.vertex(a_id), plan.vertex(b_id)) {
                    tighten(&mut best, candidate);
                }
            }
        }
    }
    best
}

/// Offset at which reflex vertex `v` reaches the advancing edge `a`-`b`,
/// if it does so within the edge's surviving extent.
fn reflex_strike(v: &Vertex, a: &Vertex, b: &Vertex) -> Option<f64> {
    let dir = direction(&a.position, &b.position)?;
    let normal = left_normal(&dir);
    let depth = (v.position - a.position).dot(&normal);
    if depth < -EPSILON {
        return None;
    }
    // Per unit of edge offset the gap closes by 1 (the edge advancing)
    // minus the vertex's own motion along the edge normal.
    let closing = v.sin_half - v.bisector.dot(&normal);
    if closing < TOLERANCE {
        return None;
    }
    let t = depth.max(0.0) * v.sin_half / closing;

    let strike = v.position + v.bisector * (t / v.sin_half);
    let a_t = advanced(a, t);
    let b_t = advanced(b, t);
    if point_on_segment(&strike, &a_t, &b_t, EPSILON) {
        Some(t)
    } else {
        None
    }
}

fn advanced(v: &Vertex, distance: f64) -> Point2 {
    if v.sin_half > TOLERANCE {
        v.position + v.bisector * (distance / v.sin_half)
    } else {
        v.position
    }
}

fn tighten(best: &mut Option<f64>, candidate: f64) {
    if candidate.is_finite() && candidate > -EPSILON {
        let candidate = candidate.max(0.0);
        if best.is_none_or(|b| candidate < b) {
            *best = Some(candidate);
        }
    }
}
