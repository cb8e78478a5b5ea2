use std::collections::HashSet;

use slotmap::SlotMap;

use crate::math::polygon_2d::{direction, left_normal};
use crate::math::{Point2, Vector2, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a wavefront vertex within a plan.
    pub struct VertexId;
}

/// A node of the wavefront cycle.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Current location on the wavefront.
    pub position: Point2,
    /// Where the vertex entered the wavefront; together with the final
    /// position this spans the skeleton arc the vertex traces.
    pub birth: Point2,
    /// Unit direction the vertex travels as the wavefront advances.
    pub bisector: Vector2,
    /// Interior angle of the wavefront at this vertex.
    pub angle: f64,
    /// `sin(angle / 2)`: converts bisector travel into perpendicular
    /// edge advance.
    pub sin_half: f64,
    /// Interior angle exceeds π; the vertex can strike non-adjacent edges.
    pub reflex: bool,
    /// Original footprint edge flowing into this vertex.
    pub previous_polygon_index: usize,
    /// Original footprint edge flowing out of this vertex.
    pub next_polygon_index: usize,
    prev: VertexId,
    next: VertexId,
}

impl Vertex {
    /// Creates an unlinked vertex at `position` with the given edge
    /// provenance. Links and bisector data are filled in by the plan.
    #[must_use]
    pub fn new(
        position: Point2,
        previous_polygon_index: usize,
        next_polygon_index: usize,
    ) -> Self {
        Self {
            position,
            birth: position,
            bisector: Vector2::zeros(),
            angle: 0.0,
            sin_half: 0.0,
            reflex: false,
            previous_polygon_index,
            next_polygon_index,
            prev: VertexId::default(),
            next: VertexId::default(),
        }
    }
}

/// One active wavefront loop.
///
/// Owns its vertices in a slotmap arena; the cycle is stitched with
/// generational keys rather than references, so vertices can be inserted
/// and removed while a traversal holds keys (a removed key simply stops
/// resolving).
#[derive(Debug, Default)]
pub struct Plan {
    verts: SlotMap<VertexId, Vertex>,
    first: Option<VertexId>,
}

impl Plan {
    /// Builds the initial wavefront from a counter-clockwise footprint
    /// polygon. Vertex `i` joins original edges `i - 1` and `i`.
    #[must_use]
    pub fn from_polygon(points: &[Point2]) -> Self {
        let n = points.len();
        let mut verts = SlotMap::with_key();
        let ids: Vec<VertexId> = points
            .iter()
            .enumerate()
            .map(|(i, p)| verts.insert(Vertex::new(*p, (i + n - 1) % n, i)))
            .collect();
        link_ring(&mut verts, &ids);
        let mut plan = Self {
            verts,
            first: ids.first().copied(),
        };
        for &id in &ids {
            plan.recompute_vertex(id);
        }
        plan
    }

    /// Rebuilds a plan from vertices listed in cycle order, relinking them
    /// with fresh keys. Bisector data is carried over unchanged.
    #[must_use]
    pub fn from_ring(ring: Vec<Vertex>) -> Self {
        let mut verts = SlotMap::with_key();
        let ids: Vec<VertexId> = ring.into_iter().map(|v| verts.insert(v)).collect();
        link_ring(&mut verts, &ids);
        Self {
            verts,
            first: ids.first().copied(),
        }
    }

    /// Number of live vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    /// Whether the wavefront has fully collapsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Traversal anchor, if the plan is non-empty.
    #[must_use]
    pub fn first(&self) -> Option<VertexId> {
        self.first
    }

    /// Whether `id` is live in this plan.
    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        self.verts.contains_key(id)
    }

    /// Returns the vertex for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live in this plan.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.verts[id]
    }

    /// Successor of `id` in the cycle.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live in this plan.
    #[must_use]
    pub fn next(&self, id: VertexId) -> VertexId {
        self.verts[id].next
    }

    /// Predecessor of `id` in the cycle.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live in this plan.
    #[must_use]
    pub fn prev(&self, id: VertexId) -> VertexId {
        self.verts[id].prev
    }

    /// Lazy, restartable traversal of the cycle from [`Plan::first`].
    pub fn iter(&self) -> Cycle<'_> {
        Cycle {
            plan: self,
            start: self.first,
            cursor: self.first,
        }
    }

    /// Snapshot of the cycle's vertex ids in traversal order.
    #[must_use]
    pub fn cycle_ids(&self) -> Vec<VertexId> {
        self.iter().collect()
    }

    /// Splices `vertex` into the cycle between `anchor` and its successor.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` is not live in this plan.
    pub fn insert_after(&mut self, anchor: VertexId, mut vertex: Vertex) -> VertexId {
        let next = self.verts[anchor].next;
        vertex.prev = anchor;
        vertex.next = next;
        let id = self.verts.insert(vertex);
        self.verts[anchor].next = id;
        self.verts[next].prev = id;
        id
    }

    /// Inserts `vertex` with explicit neighbours, overriding their links.
    ///
    /// Unlike [`Plan::insert_after`], `prev` and `next` need not be
    /// adjacent: wiring junctions this way severs the cycle into disjoint
    /// loops, which [`Plan::split`] extracts afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `prev` or `next` is not live in this plan.
    pub fn wire_junction(&mut self, prev: VertexId, mut vertex: Vertex, next: VertexId) -> VertexId {
        vertex.prev = prev;
        vertex.next = next;
        let id = self.verts.insert(vertex);
        self.verts[prev].next = id;
        self.verts[next].prev = id;
        id
    }

    /// Unlinks a vertex, closing the gap between its neighbours.
    /// Removing one vertex of a 2-cycle leaves a self-looped singleton;
    /// removing that singleton empties the plan.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live in this plan.
    pub fn remove(&mut self, id: VertexId) -> Vertex {
        let vert = self
            .verts
            .remove(id)
            .unwrap_or_else(|| panic!("vertex {id:?} is not in the plan"));
        let (p, n) = (vert.prev, vert.next);
        if p != id {
            self.verts[p].next = n;
        }
        if n != id {
            self.verts[n].prev = p;
        }
        if self.first == Some(id) {
            self.first = if n != id {
                Some(n)
            } else {
                self.verts.keys().next()
            };
        }
        vert
    }

    /// Advances every wavefront edge inward by `distance`.
    ///
    /// Each vertex travels `distance / sin(angle / 2)` along its bisector so
    /// both edges it joins advance perpendicular by exactly `distance`.
    /// Bisectors are not touched; topology changes recompute them explicitly.
    pub fn offset(&mut self, distance: f64) {
        for vert in self.verts.values_mut() {
            if vert.sin_half > TOLERANCE {
                vert.position += vert.bisector * (distance / vert.sin_half);
            }
        }
    }

    /// Recomputes bisector, interior angle and reflexness of `id` from its
    /// current neighbours. Returns `false` when the local geometry is
    /// degenerate (zero-length edge or zero/full interior angle), in which
    /// case the vertex cannot advance.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live in this plan.
    pub fn recompute_vertex(&mut self, id: VertexId) -> bool {
        let (prev_pos, pos, next_pos) = {
            let v = &self.verts[id];
            (self.verts[v.prev].position, v.position, self.verts[v.next].position)
        };
        let (Some(d0), Some(d1)) = (direction(&prev_pos, &pos), direction(&pos, &next_pos))
        else {
            let v = &mut self.verts[id];
            v.bisector = Vector2::zeros();
            v.angle = 0.0;
            v.sin_half = 0.0;
            v.reflex = false;
            return false;
        };

        let cross = d0.x * d1.y - d0.y * d1.x;
        let dot = d0.dot(&d1);
        // Interior angle: π for a straight vertex, < π convex, > π reflex.
        let angle = std::f64::consts::PI - cross.atan2(dot);
        let reflex = cross < -TOLERANCE;
        let sum = left_normal(&d0) + left_normal(&d1);
        let bisector = if sum.norm() > TOLERANCE {
            sum.normalize()
        } else if reflex {
            // Needle vertex: the inward normals cancel.
            (d0 - d1).normalize()
        } else {
            (d1 - d0).normalize()
        };
        let sin_half = (angle * 0.5).sin().max(0.0);

        let v = &mut self.verts[id];
        v.bisector = bisector;
        v.angle = angle;
        v.reflex = reflex;
        v.sin_half = sin_half;
        sin_half > TOLERANCE
    }

    /// Extracts every loop not containing [`Plan::first`] into its own plan.
    ///
    /// After event resolution has rewired junctions the link structure may
    /// consist of several disjoint loops; this plan keeps the loop holding
    /// its anchor and returns the rest in discovery order.
    pub fn split(&mut self) -> Vec<Plan> {
        let mut plans = Vec::new();
        let Some(first) = self.first else {
            return plans;
        };

        let mut visited = HashSet::new();
        let mut cursor = first;
        loop {
            visited.insert(cursor);
            cursor = self.verts[cursor].next;
            if cursor == first {
                break;
            }
        }
        if visited.len() == self.verts.len() {
            return plans;
        }

        let keys: Vec<VertexId> = self.verts.keys().collect();
        for key in keys {
            if visited.contains(&key) || !self.verts.contains_key(key) {
                continue;
            }
            let mut ids = vec![key];
            let mut cursor = self.verts[key].next;
            while cursor != key {
                ids.push(cursor);
                cursor = self.verts[cursor].next;
            }
            let ring: Vec<Vertex> = ids.iter().filter_map(|&id| self.verts.remove(id)).collect();
            plans.push(Plan::from_ring(ring));
        }
        plans
    }
}

fn link_ring(verts: &mut SlotMap<VertexId, Vertex>, ids: &[VertexId]) {
    let n = ids.len();
    for (i, &id) in ids.iter().enumerate() {
        verts[id].prev = ids[(i + n - 1) % n];
        verts[id].next = ids[(i + 1) % n];
    }
}

/// Iterator over a plan's cycle, yielding vertex ids starting at `first`.
#[derive(Debug)]
pub struct Cycle<'a> {
    plan: &'a Plan,
    start: Option<VertexId>,
    cursor: Option<VertexId>,
}

impl Iterator for Cycle<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        let current = self.cursor?;
        let next = self.plan.verts[current].next;
        self.cursor = if Some(next) == self.start {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    fn l_shape() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn from_polygon_links_cycle() {
        let plan = Plan::from_polygon(&square());
        assert_eq!(plan.len(), 4);
        let ids = plan.cycle_ids();
        assert_eq!(ids.len(), 4);
        for &id in &ids {
            assert_eq!(plan.prev(plan.next(id)), id);
        }
    }

    #[test]
    fn from_polygon_edge_provenance() {
        let plan = Plan::from_polygon(&square());
        let ids = plan.cycle_ids();
        assert_eq!(plan.vertex(ids[0]).previous_polygon_index, 3);
        assert_eq!(plan.vertex(ids[0]).next_polygon_index, 0);
        assert_eq!(plan.vertex(ids[2]).previous_polygon_index, 1);
        assert_eq!(plan.vertex(ids[2]).next_polygon_index, 2);
    }

    #[test]
    fn square_corner_bisectors() {
        let plan = Plan::from_polygon(&square());
        let ids = plan.cycle_ids();
        let v0 = plan.vertex(ids[0]);
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        assert!((v0.bisector.x - inv_sqrt2).abs() < EPSILON);
        assert!((v0.bisector.y - inv_sqrt2).abs() < EPSILON);
        assert!((v0.sin_half - inv_sqrt2).abs() < EPSILON);
        assert!(!v0.reflex);
    }

    #[test]
    fn l_shape_reflex_corner() {
        let plan = Plan::from_polygon(&l_shape());
        let ids = plan.cycle_ids();
        let reflex = plan.vertex(ids[3]);
        assert!(reflex.reflex, "vertex (2,2) should be reflex");
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        assert!((reflex.bisector.x + inv_sqrt2).abs() < EPSILON);
        assert!((reflex.bisector.y + inv_sqrt2).abs() < EPSILON);
        // Interior angle 270°.
        assert!((reflex.angle - 1.5 * std::f64::consts::PI).abs() < EPSILON);
        for &id in &[ids[0], ids[1], ids[2], ids[4], ids[5]] {
            assert!(!plan.vertex(id).reflex);
        }
    }

    #[test]
    fn offset_moves_vertices_inward() {
        let mut plan = Plan::from_polygon(&square());
        plan.offset(0.5);
        let ids = plan.cycle_ids();
        let v0 = plan.vertex(ids[0]);
        assert!((v0.position.x - 0.5).abs() < EPSILON);
        assert!((v0.position.y - 0.5).abs() < EPSILON);
        let v2 = plan.vertex(ids[2]);
        assert!((v2.position.x - 1.5).abs() < EPSILON);
        assert!((v2.position.y - 1.5).abs() < EPSILON);
    }

    #[test]
    fn remove_closes_gap() {
        let mut plan = Plan::from_polygon(&square());
        let ids = plan.cycle_ids();
        plan.remove(ids[1]);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.next(ids[0]), ids[2]);
        assert_eq!(plan.prev(ids[2]), ids[0]);
    }

    #[test]
    fn remove_all_empties_plan() {
        let mut plan = Plan::from_polygon(&square());
        for id in plan.cycle_ids() {
            plan.remove(id);
        }
        assert!(plan.is_empty());
        assert!(plan.first().is_none());
    }

    #[test]
    fn insert_after_splices() {
        let mut plan = Plan::from_polygon(&square());
        let ids = plan.cycle_ids();
        let id = plan.insert_after(ids[0], Vertex::new(Point2::new(1.0, 0.0), 0, 0));
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.next(ids[0]), id);
        assert_eq!(plan.next(id), ids[1]);
        assert_eq!(plan.prev(ids[1]), id);
    }

    #[test]
    fn split_extracts_severed_loops() {
        // Sever a hexagon into two 3-loops with a pair of junctions.
        let hexagon: Vec<Point2> = (0..6)
            .map(|i| {
                let a = f64::from(i) * std::f64::consts::FRAC_PI_3;
                Point2::new(a.cos(), a.sin())
            })
            .collect();
        let mut plan = Plan::from_polygon(&hexagon);
        let ids = plan.cycle_ids();
        plan.remove(ids[2]);
        plan.remove(ids[5]);
        // Loops {v0, v1, j0} and {v3, v4, j1}.
        plan.wire_junction(ids[1], Vertex::new(Point2::new(0.0, 0.0), 0, 0), ids[0]);
        plan.wire_junction(ids[4], Vertex::new(Point2::new(0.0, 0.0), 0, 0), ids[3]);

        let extracted = plan.split();
        assert_eq!(extracted.len(), 1);
        assert_eq!(plan.len(), 3);
        assert_eq!(extracted[0].len(), 3);
        let ring = extracted[0].cycle_ids();
        for &id in &ring {
            assert_eq!(extracted[0].prev(extracted[0].next(id)), id);
        }
    }

    #[test]
    fn iter_visits_each_vertex_once() {
        let plan = Plan::from_polygon(&l_shape());
        assert_eq!(plan.iter().count(), 6);
    }
}
