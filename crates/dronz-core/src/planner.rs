//! Heading-discretized best-first route search.
//!
//! The drone moves in fixed `MOVE_DISTANCE` steps along one of
//! `HEADING_COUNT` compass headings. Nodes are ranked by
//! `f = steps * MOVE_DISTANCE + distance(position, destination)`; with only 16
//! headings that straight-line estimate is not guaranteed admissible, so the
//! returned route is good rather than optimal.
//!
//! Two rules constrain candidate moves:
//! - no waypoint may lie inside a no-fly zone;
//! - once a node is inside the central area, moves leaving it are dropped.
//!   There is no matching rule forcing entry from outside.
//!
//! The frontier is throttled to `HEADING_COUNT` live entries: when an
//! expansion would overflow it, only that expansion's best candidate is kept.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::error::{PlannerError, PlannerResult};
use crate::geometry::{
    distance, distance_to_segment, is_close, is_in_region, project, Heading, CLOSE_THRESHOLD,
    HEADING_COUNT, MOVE_DISTANCE,
};
use crate::models::{Position, Region, POSITION_EPSILON};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlannerConfig {
    /// Upper bound on node expansions for one `plan` call.
    pub max_expansions: usize,
}

impl Default for RoutePlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions: 500_000,
        }
    }
}

/// One move of a planned flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneMove {
    pub previous: Position,
    pub current: Position,
    pub heading: Heading,
    /// 1-based index of this move from the start of the route.
    pub step: usize,
}

impl DroneMove {
    pub fn is_hover(&self) -> bool {
        self.heading == Heading::Hover
    }
}

/// A planned flight, in travel order, always ending with a hover move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub moves: Vec<DroneMove>,
    pub nodes_expanded: usize,
}

impl PlannedRoute {
    /// Where the route starts.
    pub fn origin(&self) -> Option<Position> {
        self.moves.first().map(|m| m.previous)
    }

    /// Where the route ends (the hover position).
    pub fn end(&self) -> Option<Position> {
        self.moves.last().map(|m| m.current)
    }

    /// Step index of the final move, hover included.
    pub fn step_count(&self) -> usize {
        self.moves.last().map(|m| m.step).unwrap_or(0)
    }

    /// Number of moves that actually displace the drone.
    pub fn flight_steps(&self) -> usize {
        self.moves.iter().filter(|m| !m.is_hover()).count()
    }

    /// Distance flown, in degrees.
    pub fn total_cost(&self) -> f64 {
        self.flight_steps() as f64 * MOVE_DISTANCE
    }

    /// The same flight flown backwards, ending with a hover at this route's origin.
    pub fn reversed(&self) -> PlannedRoute {
        let mut moves: Vec<DroneMove> = self
            .moves
            .iter()
            .rev()
            .filter(|m| !m.is_hover())
            .enumerate()
            .map(|(idx, m)| DroneMove {
                previous: m.current,
                current: m.previous,
                heading: m.heading.reversed(),
                step: idx + 1,
            })
            .collect();

        let last = moves.last().map(|m| m.current).or_else(|| self.end());
        if let Some(position) = last {
            moves.push(DroneMove {
                previous: position,
                current: position,
                heading: Heading::Hover,
                step: moves.len() + 1,
            });
        }

        PlannedRoute {
            moves,
            nodes_expanded: self.nodes_expanded,
        }
    }
}

/// Plans routes against a fixed central area and set of no-fly zones.
///
/// Holds no per-call state; one planner can serve concurrent `plan` calls.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    central_area: Option<Region>,
    no_fly_zones: Vec<Region>,
    config: RoutePlannerConfig,
}

impl RoutePlanner {
    /// Create a planner, rejecting malformed regions up front.
    pub fn new(central_area: Option<Region>, no_fly_zones: Vec<Region>) -> PlannerResult<Self> {
        if let Some(region) = &central_area {
            region.validate()?;
        }
        for region in &no_fly_zones {
            region.validate()?;
        }
        Ok(Self {
            central_area,
            no_fly_zones,
            config: RoutePlannerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: RoutePlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn central_area(&self) -> Option<&Region> {
        self.central_area.as_ref()
    }

    pub fn no_fly_zones(&self) -> &[Region] {
        &self.no_fly_zones
    }

    pub fn config(&self) -> &RoutePlannerConfig {
        &self.config
    }

    /// Plan a route from `start` until a node is close to `destination`.
    ///
    /// When `start` is already close, returns a single hover move without
    /// searching.
    pub fn plan(&self, start: Position, destination: Position) -> PlannerResult<PlannedRoute> {
        let mut search = Search::new(self, destination);
        let start_id = search.arena.push(
            SearchNode {
                position: start,
                heading: Heading::Hover,
                step: 0,
            },
            None,
        );

        if is_close(start, destination) {
            return Ok(reconstruct_path(&search.arena, start_id, 0));
        }
        if self.destination_unreachable(start, destination) {
            return Err(PlannerError::NoRouteFound { nodes_expanded: 0 });
        }

        search.visited.insert(start, start_id);
        for candidate in search.candidates(start_id) {
            search.enqueue(start_id, candidate);
        }
        search.run()
    }

    /// No waypoint after the start can ever be close to `destination`: it is
    /// buried in a no-fly zone, or the start is locked inside the central area
    /// and the destination lies beyond it.
    fn destination_unreachable(&self, start: Position, destination: Position) -> bool {
        let margin = CLOSE_THRESHOLD + POSITION_EPSILON;
        let clear_of_boundary = |region: &Region| {
            region
                .edges()
                .all(|(a, b)| distance_to_segment(destination, a, b) >= margin)
        };

        let buried = self
            .no_fly_zones
            .iter()
            .any(|zone| is_in_region(destination, zone) && clear_of_boundary(zone));
        let locked_out = self.central_area.as_ref().is_some_and(|central| {
            is_in_region(start, central)
                && !is_in_region(destination, central)
                && clear_of_boundary(central)
        });
        buried || locked_out
    }

    fn allows(&self, from: Position, to: Position) -> bool {
        if let Some(central) = &self.central_area {
            if is_in_region(from, central) && !is_in_region(to, central) {
                return false;
            }
        }
        !self
            .no_fly_zones
            .iter()
            .any(|zone| is_in_region(to, zone))
    }
}

/// Validate the regions and plan a single route.
pub fn plan(
    start: Position,
    destination: Position,
    central_area: Option<&Region>,
    no_fly_zones: &[Region],
) -> PlannerResult<PlannedRoute> {
    RoutePlanner::new(central_area.cloned(), no_fly_zones.to_vec())?.plan(start, destination)
}

// ==== Search internals ====

type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    position: Position,
    /// Heading used to arrive here; hover for the start node.
    heading: Heading,
    step: usize,
}

/// Nodes of one search, addressed by id, with their predecessor links.
#[derive(Debug, Default)]
struct NodeArena {
    nodes: Vec<SearchNode>,
    came_from: HashMap<NodeId, NodeId>,
}

impl NodeArena {
    fn push(&mut self, node: SearchNode, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.came_from.insert(id, parent);
        }
        id
    }

    fn get(&self, id: NodeId) -> SearchNode {
        self.nodes[id]
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f_score: FloatOrd,
    heading_rank: usize,
    seq: u64,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.heading_rank.cmp(&other.heading_rank))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Expanded positions, bucketed by epsilon-sized cells.
///
/// Lookups probe the neighbouring cells too, so two positions that differ by
/// float noise but straddle a cell border still match.
#[derive(Debug, Default)]
struct VisitedSet {
    cells: HashMap<(i64, i64), Vec<(Position, NodeId)>>,
}

impl VisitedSet {
    fn cell(p: Position) -> (i64, i64) {
        (
            (p.lng / POSITION_EPSILON).round() as i64,
            (p.lat / POSITION_EPSILON).round() as i64,
        )
    }

    fn find(&self, p: Position) -> Option<NodeId> {
        let (cx, cy) = Self::cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                if let Some((_, id)) = bucket.iter().find(|(q, _)| *q == p) {
                    return Some(*id);
                }
            }
        }
        None
    }

    fn contains(&self, p: Position) -> bool {
        self.find(p).is_some()
    }

    fn insert(&mut self, p: Position, id: NodeId) {
        if self.contains(p) {
            return;
        }
        self.cells.entry(Self::cell(p)).or_default().push((p, id));
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    node: SearchNode,
    f_score: f64,
}

struct Search<'a> {
    planner: &'a RoutePlanner,
    destination: Position,
    arena: NodeArena,
    visited: VisitedSet,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    seq: u64,
    nodes_expanded: usize,
}

impl<'a> Search<'a> {
    fn new(planner: &'a RoutePlanner, destination: Position) -> Self {
        Self {
            planner,
            destination,
            arena: NodeArena::default(),
            visited: VisitedSet::default(),
            frontier: BinaryHeap::new(),
            seq: 0,
            nodes_expanded: 0,
        }
    }

    fn run(mut self) -> PlannerResult<PlannedRoute> {
        let limit = self.planner.config.max_expansions;

        while let Some(Reverse(entry)) = self.frontier.pop() {
            let current = self.arena.get(entry.node);
            // Several frontier entries can reach the same spot before it is expanded.
            if self.visited.contains(current.position) {
                continue;
            }
            if self.nodes_expanded >= limit {
                return Err(PlannerError::SearchBudgetExceeded { limit });
            }
            self.nodes_expanded += 1;
            self.visited.insert(current.position, entry.node);

            if is_close(current.position, self.destination) {
                return Ok(reconstruct_path(&self.arena, entry.node, self.nodes_expanded));
            }

            let candidates = self.candidates(entry.node);
            if self.frontier.len() + candidates.len() > HEADING_COUNT {
                let best = candidates
                    .into_iter()
                    .min_by(|a, b| a.f_score.total_cmp(&b.f_score));
                if let Some(best) = best {
                    self.enqueue(entry.node, best);
                }
            } else {
                for candidate in candidates {
                    self.enqueue(entry.node, candidate);
                }
            }
        }

        Err(PlannerError::NoRouteFound {
            nodes_expanded: self.nodes_expanded,
        })
    }

    /// Valid neighbours of a node, in heading order.
    fn candidates(&self, id: NodeId) -> Vec<Candidate> {
        let current = self.arena.get(id);
        let step = current.step + 1;
        let g_score = step as f64 * MOVE_DISTANCE;

        Heading::compass()
            .filter_map(|heading| {
                let position = project(current.position, heading);
                if self.visited.contains(position)
                    || !self.planner.allows(current.position, position)
                {
                    return None;
                }
                Some(Candidate {
                    node: SearchNode {
                        position,
                        heading,
                        step,
                    },
                    f_score: g_score + distance(position, self.destination),
                })
            })
            .collect()
    }

    fn enqueue(&mut self, parent: NodeId, candidate: Candidate) {
        let node = self.arena.push(candidate.node, Some(parent));
        self.seq += 1;
        self.frontier.push(Reverse(FrontierEntry {
            f_score: FloatOrd(candidate.f_score),
            heading_rank: candidate.node.heading.index().unwrap_or(HEADING_COUNT),
            seq: self.seq,
            node,
        }));
    }
}

/// Turn the predecessor chain ending at `goal` into moves in travel order.
///
/// A terminal hover at the goal position, one step after it, closes the route.
fn reconstruct_path(arena: &NodeArena, goal: NodeId, nodes_expanded: usize) -> PlannedRoute {
    let goal_node = arena.get(goal);
    let terminal = SearchNode {
        position: goal_node.position,
        heading: Heading::Hover,
        step: goal_node.step + 1,
    };

    let mut chain = vec![goal_node];
    let mut cursor = goal;
    while let Some(&parent) = arena.came_from.get(&cursor) {
        chain.push(arena.get(parent));
        cursor = parent;
    }
    chain.reverse();
    chain.push(terminal);

    let moves = chain
        .windows(2)
        .map(|pair| DroneMove {
            previous: pair[0].position,
            current: pair[1].position,
            heading: pair[1].heading,
            step: pair[1].step,
        })
        .collect();

    PlannedRoute {
        moves,
        nodes_expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Position = Position::new(-3.192473, 55.942617);
    const EAST_GOAL: Position = Position::new(-3.184319, 55.942617);

    fn rect(name: &str, min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Region {
        Region::new(
            name,
            vec![
                Position::new(min_lng, min_lat),
                Position::new(max_lng, min_lat),
                Position::new(max_lng, max_lat),
                Position::new(min_lng, max_lat),
            ],
        )
    }

    fn assert_chained(route: &PlannedRoute, start: Position) {
        assert_eq!(route.origin(), Some(start));
        for pair in route.moves.windows(2) {
            assert_eq!(pair[0].current, pair[1].previous);
            assert_eq!(pair[0].step + 1, pair[1].step);
        }
        for m in &route.moves {
            assert_eq!(project(m.previous, m.heading), m.current);
        }
    }

    #[test]
    fn open_field_route_is_near_straight_line() {
        let route = plan(START, EAST_GOAL, None, &[]).unwrap();

        let straight = distance(START, EAST_GOAL);
        assert!((route.total_cost() - straight).abs() <= MOVE_DISTANCE);
        assert!(is_close(route.end().unwrap(), EAST_GOAL));
        assert_chained(&route, START);

        let last = route.moves.last().unwrap();
        assert!(last.is_hover());
        assert_eq!(last.previous, last.current);
        assert_eq!(route.step_count(), route.flight_steps() + 1);
    }

    #[test]
    fn open_field_route_flies_due_east() {
        let route = plan(START, EAST_GOAL, None, &[]).unwrap();
        assert!(route
            .moves
            .iter()
            .filter(|m| !m.is_hover())
            .all(|m| m.heading == Heading::Compass(4)));
    }

    #[test]
    fn planning_is_deterministic() {
        let wall = rect("wall", -3.1890, 55.9410, -3.1880, 55.9445);
        let planner = RoutePlanner::new(None, vec![wall]).unwrap();
        let first = planner.plan(START, EAST_GOAL).unwrap();
        let second = planner.plan(START, EAST_GOAL).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_fly_zone_forces_a_detour() {
        let direct = plan(START, EAST_GOAL, None, &[]).unwrap();

        let wall = rect("wall", -3.1890, 55.9410, -3.1880, 55.9445);
        let zones = vec![wall.clone()];
        let detour = plan(START, EAST_GOAL, None, &zones).unwrap();

        assert!(detour.flight_steps() > direct.flight_steps());
        assert!(is_close(detour.end().unwrap(), EAST_GOAL));
        assert!(detour.moves.iter().all(|m| !is_in_region(m.current, &wall)));
        assert_chained(&detour, START);
    }

    #[test]
    fn central_area_is_never_left_once_inside() {
        let central = rect("central", -3.1950, 55.9400, -3.1800, 55.9460);
        let route = plan(START, EAST_GOAL, Some(&central), &[]).unwrap();
        let (terminal, flight) = route.moves.split_last().unwrap();
        assert!(terminal.is_hover());
        assert!(flight.iter().all(|m| is_in_region(m.current, &central)));
    }

    #[test]
    fn central_area_keeps_route_inside_around_obstacle() {
        // The wall leaves a gap inside the central area and a wider one outside it.
        let central = rect("central", -3.1950, 55.9410, -3.1800, 55.9450);
        let wall = rect("wall", -3.1890, 55.9390, -3.1880, 55.9440);
        let route = plan(START, EAST_GOAL, Some(&central), &[wall.clone()]).unwrap();
        assert!(route
            .moves
            .iter()
            .all(|m| is_in_region(m.current, &central) && !is_in_region(m.current, &wall)));
    }

    #[test]
    fn central_area_rule_does_not_force_entry() {
        // Start outside the central area; reaching the goal outside it is fine.
        let central = rect("central", -3.1900, 55.9430, -3.1860, 55.9470);
        let route = plan(START, EAST_GOAL, Some(&central), &[]).unwrap();
        assert!(is_close(route.end().unwrap(), EAST_GOAL));
    }

    #[test]
    fn start_close_to_destination_hovers_without_searching() {
        let nearby = Position::new(START.lng + 0.00005, START.lat);
        let route = plan(START, nearby, None, &[]).unwrap();
        assert_eq!(route.moves.len(), 1);
        assert_eq!(route.nodes_expanded, 0);
        assert_eq!(route.step_count(), 1);
        let only = route.moves[0];
        assert!(only.is_hover());
        assert_eq!(only.previous, START);
        assert_eq!(only.current, START);
    }

    #[test]
    fn enclosed_destination_never_returns_a_route() {
        // A closed ring of four walls around the destination, no gap. Outside the
        // ring the reachable set is unbounded, so the budget usually trips first.
        let (lng, lat) = (EAST_GOAL.lng, EAST_GOAL.lat);
        let d = 0.0012;
        let t = 0.0004;
        let walls = vec![
            rect("north", lng - d, lat + d - t, lng + d, lat + d),
            rect("south", lng - d, lat - d, lng + d, lat - d + t),
            rect("west", lng - d, lat - d, lng - d + t, lat + d),
            rect("east", lng + d - t, lat - d, lng + d, lat + d),
        ];
        let start = Position::new(lng - 0.003, lat);
        let planner = RoutePlanner::new(None, walls)
            .unwrap()
            .with_config(RoutePlannerConfig {
                max_expansions: 20_000,
            });
        let err = planner.plan(start, EAST_GOAL).unwrap_err();
        assert!(
            matches!(
                err,
                PlannerError::NoRouteFound { .. } | PlannerError::SearchBudgetExceeded { .. }
            ),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn start_enclosed_by_no_fly_zone_exhausts_frontier() {
        // Every first move lands inside the zone, so the frontier is empty immediately.
        let cage = rect(
            "cage",
            START.lng - 0.001,
            START.lat - 0.001,
            START.lng + 0.001,
            START.lat + 0.001,
        );
        let err = plan(START, EAST_GOAL, None, &[cage]).unwrap_err();
        assert_eq!(err, PlannerError::NoRouteFound { nodes_expanded: 0 });
    }

    #[test]
    fn central_area_smaller_than_a_move_exhausts_frontier() {
        let pocket = rect(
            "pocket",
            START.lng - 0.00005,
            START.lat - 0.00005,
            START.lng + 0.00005,
            START.lat + 0.00005,
        );
        let err = plan(START, EAST_GOAL, Some(&pocket), &[]).unwrap_err();
        assert_eq!(err, PlannerError::NoRouteFound { nodes_expanded: 0 });
    }

    #[test]
    fn destination_buried_in_no_fly_zone_fails_without_search() {
        let (lng, lat) = (EAST_GOAL.lng, EAST_GOAL.lat);
        let block = rect("block", lng - 0.001, lat - 0.001, lng + 0.001, lat + 0.001);
        let err = plan(START, EAST_GOAL, None, &[block]).unwrap_err();
        assert_eq!(err, PlannerError::NoRouteFound { nodes_expanded: 0 });
    }

    #[test]
    fn destination_near_no_fly_edge_is_still_searched() {
        // Inside the zone but within reach of its western edge.
        let (lng, lat) = (EAST_GOAL.lng, EAST_GOAL.lat);
        let block = rect("block", lng - 0.00004, lat - 0.001, lng + 0.001, lat + 0.001);
        let route = plan(START, EAST_GOAL, None, &[block.clone()]).unwrap();
        assert!(is_close(route.end().unwrap(), EAST_GOAL));
        assert!(route.moves.iter().all(|m| !is_in_region(m.current, &block)));
    }

    #[test]
    fn destination_outside_central_area_is_unreachable_from_inside() {
        let central = rect(
            "central",
            START.lng - 0.001,
            START.lat - 0.001,
            START.lng + 0.001,
            START.lat + 0.001,
        );
        let err = plan(START, EAST_GOAL, Some(&central), &[]).unwrap_err();
        assert_eq!(err, PlannerError::NoRouteFound { nodes_expanded: 0 });
    }

    #[test]
    fn expansion_budget_is_enforced() {
        let planner = RoutePlanner::new(None, Vec::new())
            .unwrap()
            .with_config(RoutePlannerConfig { max_expansions: 5 });
        let err = planner.plan(START, EAST_GOAL).unwrap_err();
        assert_eq!(err, PlannerError::SearchBudgetExceeded { limit: 5 });
    }

    #[test]
    fn malformed_region_is_rejected_before_search() {
        let sliver = Region::new(
            "sliver",
            vec![Position::new(0.0, 0.0), Position::new(1.0, 0.0)],
        );
        let err = plan(START, EAST_GOAL, None, &[sliver]).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidRegion { .. }));
    }

    #[test]
    fn reversed_route_returns_to_origin() {
        let outbound = plan(START, EAST_GOAL, None, &[]).unwrap();
        let inbound = outbound.reversed();

        assert_eq!(inbound.flight_steps(), outbound.flight_steps());
        assert_eq!(inbound.origin(), outbound.end());
        assert_eq!(inbound.end(), Some(START));
        assert!(inbound.moves.last().unwrap().is_hover());
        assert_chained(&inbound, outbound.end().unwrap());
    }

    #[test]
    fn reversing_a_hover_only_route_keeps_the_hover() {
        let hover = plan(START, START, None, &[]).unwrap();
        let reversed = hover.reversed();
        assert_eq!(reversed.moves.len(), 1);
        assert!(reversed.moves[0].is_hover());
        assert_eq!(reversed.end(), Some(START));
    }

    #[test]
    fn visited_set_matches_noisy_positions() {
        let mut visited = VisitedSet::default();
        visited.insert(START, 7);
        let noisy = Position::new(START.lng + 3e-15, START.lat - 3e-15);
        assert_eq!(visited.find(noisy), Some(7));
        assert!(!visited.contains(project(START, Heading::Compass(0))));
    }

    #[test]
    fn frontier_orders_by_f_then_heading_then_insertion() {
        let entry = |f: f64, heading_rank: usize, seq: u64| FrontierEntry {
            f_score: FloatOrd(f),
            heading_rank,
            seq,
            node: 0,
        };
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(entry(2.0, 0, 1)));
        heap.push(Reverse(entry(1.0, 5, 2)));
        heap.push(Reverse(entry(1.0, 3, 4)));
        heap.push(Reverse(entry(1.0, 3, 3)));

        let order: Vec<(usize, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|Reverse(e)| (e.heading_rank, e.seq))
            .collect();
        assert_eq!(order, vec![(3, 3), (3, 4), (5, 2), (0, 1)]);
    }
}
