use std::collections::HashMap;

use crate::error::Diagnostic;

use super::builder::SkeletonBuilder;
use super::event::IntersectionEvent;
use super::plan::{Plan, Vertex, VertexId};

/// Applies the detected events to the plan, retiring met vertices into the
/// skeleton builder and rewiring the wavefront around each event point.
///
/// Three shapes of event are handled:
/// - the whole wavefront meeting at one point retires the plan outright,
/// - a collapsed run of edges is merged into one replacement vertex,
/// - two or more runs meeting at a pinch point become junction vertices
///   whose links sever the cycle into disjoint loops (extracted later by
///   [`Plan::split`]).
///
/// Replacement vertices get their bisectors recomputed only after every
/// event on the plan has been applied, since a neighbour may itself be
/// retired by a simultaneous event. A replacement whose neighbourhood turns
/// out degenerate is reported as [`Diagnostic::InvalidBisector`].
pub fn resolve_events(
    plan: &mut Plan,
    events: Vec<IntersectionEvent>,
    builder: &mut SkeletonBuilder,
) -> Vec<Diagnostic> {
    let mut inserted: Vec<VertexId> = Vec::new();
    let mut diagnostics = Vec::new();

    for event in events {
        let member_count: usize = event.chains.iter().map(Vec::len).sum();
        if member_count == plan.len() {
            // The entire wavefront has met at this point.
            while let Some(id) = plan.first() {
                let vert = plan.remove(id);
                builder.emit(&vert);
            }
            continue;
        }

        // Merge each collapsed run into a single vertex at the event point.
        let mut heads: Vec<VertexId> = Vec::with_capacity(event.chains.len());
        for chain in &event.chains {
            if chain.len() == 1 {
                heads.push(chain[0]);
                continue;
            }
            let first = chain[0];
            let last = chain[chain.len() - 1];
            let anchor = plan.prev(first);
            let prev_idx = plan.vertex(first).previous_polygon_index;
            let next_idx = plan.vertex(last).next_polygon_index;
            for &id in chain {
                let vert = plan.remove(id);
                builder.emit(&vert);
            }
            let id = plan.insert_after(anchor, Vertex::new(event.position, prev_idx, next_idx));
            inserted.push(id);
            heads.push(id);
        }

        if heads.len() < 2 {
            continue;
        }

        // Junction: the wavefront pinches together here. Retire the heads
        // and bridge each one's successor side to the next head's
        // predecessor side, leaving one loop per wavefront region.
        let order = traversal_positions(plan, &heads);
        heads.sort_by_key(|id| order[id]);
        let k = heads.len();
        let around: Vec<(VertexId, VertexId)> =
            heads.iter().map(|&h| (plan.prev(h), plan.next(h))).collect();
        let removed: Vec<Vertex> = heads.iter().map(|&h| plan.remove(h)).collect();
        for vert in &removed {
            builder.emit(vert);
        }
        for i in 0..k {
            let donor = &removed[(i + 1) % k];
            let junction = Vertex::new(
                event.position,
                donor.previous_polygon_index,
                removed[i].next_polygon_index,
            );
            let id = plan.wire_junction(around[(i + 1) % k].0, junction, around[i].1);
            inserted.push(id);
        }
    }

    for id in inserted {
        if !plan.contains(id) {
            continue;
        }
        let next = plan.next(id);
        if next == id || plan.next(next) == id {
            // Remnant loop too small to advance; the caller retires it.
            continue;
        }
        if !plan.recompute_vertex(id) {
            diagnostics.push(Diagnostic::InvalidBisector);
        }
    }
    diagnostics
}

/// Traversal index of every vertex, covering loops the plan's anchor cannot
/// reach (a junction resolved earlier in the same pass may already have
/// severed the cycle).
fn traversal_positions(plan: &Plan, heads: &[VertexId]) -> HashMap<VertexId, usize> {
    let mut order: HashMap<VertexId, usize> = HashMap::new();
    for (i, id) in plan.iter().enumerate() {
        order.insert(id, i);
    }
    for &head in heads {
        if order.contains_key(&head) {
            continue;
        }
        let mut cursor = head;
        loop {
            let index = order.len();
            order.insert(cursor, index);
            cursor = plan.next(cursor);
            if cursor == head {
                break;
            }
        }
    }
    order
}
