use std::collections::HashSet;

use crate::math::intersect_2d::point_on_segment;
use crate::math::{Point2, EPSILON};

use super::plan::{Plan, Vertex, VertexId};

/// A point where the advancing wavefront becomes self-intersecting.
///
/// Each chain lists vertices that have arrived at the event point,
/// consecutive in cycle order. A single chain marks a collapsed run of
/// edges; two or more chains mark a junction where the wavefront pinches
/// together and must be severed into separate loops.
#[derive(Debug)]
pub struct IntersectionEvent {
    /// Location of the event.
    pub position: Point2,
    /// Runs of coincident vertices, each consecutive in cycle order.
    pub chains: Vec<Vec<VertexId>>,
}

fn coincident(a: &Point2, b: &Point2) -> bool {
    (a - b).norm() < EPSILON
}

/// Finds all wavefront events on an offset plan.
///
/// Expects the plan to have just been advanced to the offset distance where
/// the first events occur, so event participants are detected by coincidence
/// rather than prediction. Split events may splice new vertices into the
/// plan, which is why it is taken mutably.
pub fn detect_events(plan: &mut Plan) -> Vec<IntersectionEvent> {
    let mut events: Vec<IntersectionEvent> = Vec::new();
    let mut flagged: HashSet<VertexId> = HashSet::new();

    collect_collapse_events(plan, &mut flagged, &mut events);
    collect_edge_strikes(plan, &mut flagged, &mut events);
    collect_reflex_splits(plan, &mut flagged, &mut events);

    events
}

/// Gathers the run of unflagged vertices around `seed` that sit on
/// `position`, extending backwards then forwards through the cycle so a run
/// wrapping the traversal anchor still forms one chain.
fn gather_chain(
    plan: &Plan,
    flagged: &mut HashSet<VertexId>,
    seed: VertexId,
    position: &Point2,
) -> Vec<VertexId> {
    let mut chain = std::collections::VecDeque::new();
    chain.push_back(seed);
    flagged.insert(seed);

    let mut cursor = plan.prev(seed);
    while cursor != seed
        && !flagged.contains(&cursor)
        && coincident(&plan.vertex(cursor).position, position)
    {
        flagged.insert(cursor);
        chain.push_front(cursor);
        cursor = plan.prev(cursor);
    }
    let mut cursor = plan.next(seed);
    while !flagged.contains(&cursor) && coincident(&plan.vertex(cursor).position, position) {
        flagged.insert(cursor);
        chain.push_back(cursor);
        cursor = plan.next(cursor);
    }
    chain.into()
}

/// Pass 1: collapsed edges. A wavefront edge whose endpoints have met
/// starts an event; every other vertex resting on the same point joins it,
/// grouped into runs.
fn collect_collapse_events(
    plan: &Plan,
    flagged: &mut HashSet<VertexId>,
    events: &mut Vec<IntersectionEvent>,
) {
    let ids = plan.cycle_ids();
    for &id in &ids {
        if flagged.contains(&id) {
            continue;
        }
        let next = plan.next(id);
        if next == id {
            continue;
        }
        let position = plan.vertex(id).position;
        if !coincident(&position, &plan.vertex(next).position) {
            continue;
        }

        let mut chains = vec![gather_chain(plan, flagged, id, &position)];
        for &other in &ids {
            if !flagged.contains(&other) && coincident(&plan.vertex(other).position, &position) {
                chains.push(gather_chain(plan, flagged, other, &position));
            }
        }
        events.push(IntersectionEvent { position, chains });
    }
}

/// Pass 2: a collapse point may also land in the interior of an unrelated
/// wavefront edge. The edge is split there so the junction can rewire
/// through it. Vertices already resting on the point were picked up by
/// pass 1, so only mid-edge hits remain.
fn collect_edge_strikes(
    plan: &mut Plan,
    flagged: &mut HashSet<VertexId>,
    events: &mut [IntersectionEvent],
) {
    for event in events.iter_mut() {
        let members: HashSet<VertexId> = event.chains.iter().flatten().copied().collect();
        let ids = plan.cycle_ids();
        for &a in &ids {
            if !plan.contains(a) {
                continue;
            }
            let b = plan.next(a);
            if members.contains(&a) || members.contains(&b) {
                continue;
            }
            let (pa, pb) = (plan.vertex(a).position, plan.vertex(b).position);
            if !point_on_segment(&event.position, &pa, &pb, EPSILON)
                || coincident(&event.position, &pa)
                || coincident(&event.position, &pb)
            {
                continue;
            }
            let split = split_edge(plan, a, event.position);
            flagged.insert(split);
            event.chains.push(vec![split]);
        }
    }
}

/// Pass 3: a reflex vertex that has caught up with a non-adjacent edge
/// splits it. Depending on where it lands this either joins an existing
/// event, pairs up with the struck endpoint, or splices a fresh split
/// vertex into the struck edge.
fn collect_reflex_splits(
    plan: &mut Plan,
    flagged: &mut HashSet<VertexId>,
    events: &mut Vec<IntersectionEvent>,
) {
    let ids = plan.cycle_ids();
    for &v in &ids {
        if flagged.contains(&v) || !plan.contains(v) || !plan.vertex(v).reflex {
            continue;
        }
        let position = plan.vertex(v).position;

        let edges = plan.cycle_ids();
        for &a in &edges {
            if flagged.contains(&v) {
                break;
            }
            if !plan.contains(a) {
                continue;
            }
            let b = plan.next(a);
            if a == v || b == v {
                continue;
            }
            let (pa, pb) = (plan.vertex(a).position, plan.vertex(b).position);
            if !point_on_segment(&position, &pa, &pb, EPSILON) {
                continue;
            }

            let struck = if coincident(&position, &pa) {
                Some(a)
            } else if coincident(&position, &pb) {
                Some(b)
            } else {
                None
            };
            match struck {
                Some(endpoint) if !flagged.contains(&endpoint) => {
                    flagged.insert(v);
                    flagged.insert(endpoint);
                    events.push(IntersectionEvent {
                        position,
                        chains: vec![vec![v], vec![endpoint]],
                    });
                }
                Some(_) => {
                    // The struck endpoint already belongs to an event at
                    // this point; the reflex vertex joins it.
                    if let Some(event) = events
                        .iter_mut()
                        .find(|e| coincident(&e.position, &position))
                    {
                        flagged.insert(v);
                        event.chains.push(vec![v]);
                    }
                }
                None => {
                    let split = split_edge(plan, a, position);
                    flagged.insert(v);
                    flagged.insert(split);
                    events.push(IntersectionEvent {
                        position,
                        chains: vec![vec![v], vec![split]],
                    });
                }
            }
        }
    }
}

/// Splices a split vertex into the wavefront edge following `a`. Both of
/// its sides trace the original footprint edge the struck wavefront edge
/// was offset from.
fn split_edge(plan: &mut Plan, a: VertexId, position: Point2) -> VertexId {
    let edge = plan.vertex(a).next_polygon_index;
    plan.insert_after(a, Vertex::new(position, edge, edge))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offset_plan(points: &[Point2], distance: f64) -> Plan {
        let mut plan = Plan::from_polygon(points);
        plan.offset(distance);
        plan
    }

    // ── collapse events ──

    #[test]
    fn square_full_collapse_is_one_chain() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let mut plan = offset_plan(&square, 1.0);
        let events = detect_events(&mut plan);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].chains.len(), 1);
        assert_eq!(events[0].chains[0].len(), 4);
        assert!(coincident(&events[0].position, &Point2::new(1.0, 1.0)));
    }

    #[test]
    fn rectangle_has_two_collapse_events() {
        let rect = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let mut plan = offset_plan(&rect, 1.0);
        let events = detect_events(&mut plan);
        assert_eq!(events.len(), 2);
        for event in &events {
            assert_eq!(event.chains.len(), 1);
            assert_eq!(event.chains[0].len(), 2);
        }
        assert!(coincident(&events[0].position, &Point2::new(3.0, 1.0)));
        assert!(coincident(&events[1].position, &Point2::new(1.0, 1.0)));
    }

    #[test]
    fn no_events_before_first_collapse() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let mut plan = offset_plan(&square, 0.5);
        assert!(detect_events(&mut plan).is_empty());
    }

    // ── reflex split events ──

    #[test]
    fn l_shape_reflex_strikes_collapsed_corner() {
        let l_shape = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        let mut plan = offset_plan(&l_shape, 1.0);
        let events = detect_events(&mut plan);
        assert_eq!(events.len(), 3);

        // Two corner collapses plus the reflex vertex meeting the corner
        // vertex of the bottom-left square at (1, 1).
        let junction = events
            .iter()
            .find(|e| e.chains.len() == 2)
            .unwrap_or_else(|| panic!("expected a two-chain junction event"));
        assert!(coincident(&junction.position, &Point2::new(1.0, 1.0)));
        assert!(junction.chains.iter().all(|c| c.len() == 1));
        // No split vertex was spliced in.
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn dart_reflex_splits_edge_interior() {
        // Arrowhead: the reflex tip at (4, 2) travels straight down and
        // strikes the interior of the bottom edge.
        let dart = [
            Point2::new(0.0, 0.0),
            Point2::new(8.0, 0.0),
            Point2::new(8.0, 6.0),
            Point2::new(4.0, 2.0),
            Point2::new(0.0, 6.0),
        ];
        let strike = 2.0 / (1.0 + std::f64::consts::SQRT_2);
        let mut plan = offset_plan(&dart, strike);
        let events = detect_events(&mut plan);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].chains.len(), 2);
        assert!(coincident(&events[0].position, &Point2::new(4.0, strike)));
        // A split vertex was spliced into the struck edge.
        assert_eq!(plan.len(), 6);
        let split = events[0].chains[1][0];
        assert_eq!(plan.vertex(split).previous_polygon_index, 0);
        assert_eq!(plan.vertex(split).next_polygon_index, 0);
    }
}
