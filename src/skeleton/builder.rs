use crate::math::{Point2, EPSILON};

use super::plan::Vertex;

/// The straight skeleton of a polygon footprint, as roof facet polygons.
///
/// Each facet is a closed counter-clockwise loop grown from one footprint
/// edge, listed in the order of the (normalized counter-clockwise) input
/// edges. Facets that degenerate to fewer than three distinct points are
/// omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct StraightSkeleton {
    /// One closed point loop per roof facet.
    pub polygons: Vec<Vec<Point2>>,
}

/// One boundary segment of a facet, directed the way that facet's loop
/// walks it.
#[derive(Debug, Clone, Copy)]
struct Arc {
    enter: Point2,
    exit: Point2,
    facet: usize,
}

/// Accumulates skeleton arcs as the wavefront retires vertices, then
/// stitches them into per-edge facet polygons.
///
/// A retired vertex traces an arc from its birth point to the point where
/// it met its event. The arc bounds the two facets the vertex travelled
/// between: the facet of the edge behind it walks the arc birth to death,
/// the facet of the edge ahead of it walks it death to birth. Ridge
/// remnants (wavefront loops reduced to a back-to-back edge pair) are
/// recorded as extra arcs, one per side.
#[derive(Debug)]
pub struct SkeletonBuilder {
    bases: Vec<(Point2, Point2)>,
    arcs: Vec<Arc>,
}

impl SkeletonBuilder {
    /// Prepares one facet per edge of the footprint polygon.
    #[must_use]
    pub fn new(points: &[Point2]) -> Self {
        let n = points.len();
        let bases = (0..n).map(|i| (points[i], points[(i + 1) % n])).collect();
        Self {
            bases,
            arcs: Vec::new(),
        }
    }

    /// Records the arc traced by a retired wavefront vertex, on both facets
    /// it bordered.
    pub fn emit(&mut self, vertex: &Vertex) {
        self.arcs.push(Arc {
            enter: vertex.birth,
            exit: vertex.position,
            facet: vertex.previous_polygon_index,
        });
        self.arcs.push(Arc {
            enter: vertex.position,
            exit: vertex.birth,
            facet: vertex.next_polygon_index,
        });
    }

    /// Records one side of a ridge remnant. The facet walks its ridge
    /// opposite to its base edge, so `enter` is the remnant vertex at the
    /// far end of the facet's offset edge and `exit` the near one.
    pub fn emit_ridge(&mut self, facet: usize, enter: Point2, exit: Point2) {
        self.arcs.push(Arc { enter, exit, facet });
    }

    /// Stitches the recorded arcs into facet polygons.
    ///
    /// Each facet starts with its base edge and repeatedly follows the
    /// unused arc entering at the walk's current point until the walk
    /// returns to the base's start (or no arc continues it, for partial
    /// results on degenerate inputs).
    #[must_use]
    pub fn finish(self) -> StraightSkeleton {
        let mut per_facet: Vec<Vec<Arc>> = vec![Vec::new(); self.bases.len()];
        for arc in self.arcs {
            per_facet[arc.facet].push(arc);
        }

        let mut polygons = Vec::with_capacity(self.bases.len());
        for (i, (start, end)) in self.bases.into_iter().enumerate() {
            let arcs = &per_facet[i];
            let mut used = vec![false; arcs.len()];
            let mut points = vec![start, end];
            let mut cursor = end;
            for _ in 0..arcs.len() {
                let Some(slot) = arcs
                    .iter()
                    .enumerate()
                    .position(|(j, arc)| !used[j] && (arc.enter - cursor).norm() < EPSILON)
                else {
                    break;
                };
                used[slot] = true;
                let exit = arcs[slot].exit;
                if (exit - cursor).norm() < EPSILON {
                    continue;
                }
                if (exit - start).norm() < EPSILON {
                    break;
                }
                cursor = exit;
                points.push(cursor);
            }

            let deduped = dedupe_loop(&points);
            if deduped.len() >= 3 {
                polygons.push(deduped);
            }
        }
        StraightSkeleton { polygons }
    }
}

fn dedupe_loop(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (p - last).norm() >= EPSILON) {
            out.push(*p);
        }
    }
    while out.len() > 1 {
        let first = out[0];
        let last = out[out.len() - 1];
        if (first - last).norm() < EPSILON {
            out.pop();
        } else {
            break;
        }
    }
    out
}
