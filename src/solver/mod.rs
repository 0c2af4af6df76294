use std::time::{Duration, Instant};

use fxhash::FxHashSet;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use log::debug;

use crate::delivery_map::DeliveryMap;
use crate::error::SearchError;
use crate::FxIndexMap;

use self::frontier::{reverse_path, Frontier, NO_PARENT};

pub mod astar;
mod frontier;
pub mod greedy;

/// Straight-line distance from `p` to `goal`. Never larger than the cost of a 4-connected
/// route, as every step costs at least 1 and covers a distance of 1.
pub fn euclidean(p: &Point, goal: &Point) -> f64 {
    let dx = (goal.x - p.x) as f64;
    let dy = (goal.y - p.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// A found route: every cell from start to goal inclusive and the summed entry costs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<Point>,
    pub cost: u64,
}

impl Route {
    /// Number of moves, one less than the number of cells.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Result of a single search. `route` is [None] if the frontier ran empty before the goal was
/// reached; the statistics are filled in either way.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub route: Option<Route>,
    /// Number of nodes taken from the frontier, including stale duplicates.
    pub visited: usize,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.route.is_some()
    }

    pub fn path(&self) -> Option<&[Point]> {
        self.route.as_ref().map(|route| route.path.as_slice())
    }
}

/// A best-first route search over a [DeliveryMap]. Implementors only decide how the frontier is
/// ordered and whether a cheaper route to an already discovered cell replaces the old one; the
/// expansion loop is shared (see [best_first]).
pub trait RouteSolver {
    fn name(&self) -> &'static str;

    /// Frontier priority of a cell reached at accumulated `cost` whose heuristic estimate to
    /// the goal is `estimate`. Smaller is expanded first.
    fn priority(&self, cost: u64, estimate: f64) -> f64;

    /// Whether a strictly cheaper route to an already discovered cell replaces its parent.
    fn relaxes(&self) -> bool;

    /// Searches a route from `start` to `goal`. Both endpoints must be drivable cells of `map`,
    /// otherwise the request is rejected before any expansion.
    fn search(
        &self,
        map: &DeliveryMap,
        start: Point,
        goal: Point,
    ) -> Result<SearchOutcome, SearchError> {
        if !map.is_valid(start.x, start.y) {
            return Err(SearchError::InvalidStart(start));
        }
        if !map.is_valid(goal.x, goal.y) {
            return Err(SearchError::InvalidGoal(goal));
        }
        Ok(best_first(self, map, start, goal))
    }
}

/// The expansion loop shared by all solvers. Pops the frontier until the goal comes out (lazy
/// termination) or the frontier is exhausted. A popped cell enters the closed set; popping an
/// already closed cell again only counts as a visit. Neighbours outside the map, obstacles and
/// closed cells are skipped. A neighbour seen for the first time is always recorded and pushed,
/// one seen before only if the solver [relaxes](RouteSolver::relaxes) and the new cost is
/// strictly lower.
///
/// All search state lives in this call, so concurrent searches on one map do not interact.
pub fn best_first<S>(solver: &S, map: &DeliveryMap, start: Point, goal: Point) -> SearchOutcome
where
    S: RouteSolver + ?Sized,
{
    let started = Instant::now();
    let mut frontier = Frontier::default();
    // Discovered cells with (parent index, best known cost), indexed in discovery order.
    let mut parents: FxIndexMap<Point, (usize, u64)> = FxIndexMap::default();
    let mut closed: FxHashSet<Point> = FxHashSet::default();
    let mut visited = 0;

    parents.insert(start, (NO_PARENT, 0));
    frontier.push(0, solver.priority(0, euclidean(&start, &goal)));
    while let Some(index) = frontier.pop() {
        visited += 1;
        let Some((&current, &(_, cost))) = parents.get_index(index) else {
            continue;
        };
        if current == goal {
            let route = Route {
                path: reverse_path(&parents, index),
                cost,
            };
            debug!(
                "{}: route from {:?} to {:?} with {} steps at cost {}, {} nodes visited, {} queued",
                solver.name(),
                start,
                goal,
                route.steps(),
                cost,
                visited,
                frontier.len()
            );
            return SearchOutcome {
                route: Some(route),
                visited,
                elapsed: started.elapsed(),
            };
        }
        if !closed.insert(current) {
            continue;
        }
        for neighbour in map.neighbours(&current) {
            if closed.contains(&neighbour) {
                continue;
            }
            let new_cost = cost.saturating_add(u64::from(map.edge_cost(&current, &neighbour)));
            let n; // index of the neighbour
            match parents.entry(neighbour) {
                Vacant(e) => {
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if solver.relaxes() && new_cost < e.get().1 {
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            frontier.push(n, solver.priority(new_cost, euclidean(&neighbour, &goal)));
        }
    }
    debug!(
        "{}: {:?} is not reachable from {:?}, {} nodes visited ({} discovered)",
        solver.name(),
        goal,
        start,
        visited,
        parents.len()
    );
    SearchOutcome {
        route: None,
        visited,
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::astar::AstarSolver;

    #[test]
    fn euclidean_distance() {
        let goal = Point::new(3, 4);
        assert_eq!(euclidean(&Point::new(0, 0), &goal), 5.0);
        assert_eq!(euclidean(&goal, &goal), 0.0);
        assert_eq!(euclidean(&Point::new(4, 4), &goal), 1.0);
        assert_eq!(euclidean(&Point::new(1, 1), &Point::new(0, 0)), 2.0_f64.sqrt());
    }

    #[test]
    fn route_steps() {
        let route = Route {
            path: vec![Point::new(0, 0), Point::new(0, 1)],
            cost: 1,
        };
        assert_eq!(route.steps(), 1);
    }

    /// A solver that expands in pure discovery order, which makes the shared loop a plain
    /// breadth-first search.
    struct DiscoveryOrder;

    impl RouteSolver for DiscoveryOrder {
        fn name(&self) -> &'static str {
            "BFS"
        }
        fn priority(&self, _cost: u64, _estimate: f64) -> f64 {
            0.0
        }
        fn relaxes(&self) -> bool {
            false
        }
    }

    #[test]
    fn shared_loop_drives_custom_orderings() {
        let map: DeliveryMap = "...\n.#.\n...".parse().unwrap();
        let outcome = DiscoveryOrder
            .search(&map, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        assert_eq!(outcome.route.unwrap().steps(), 4);
        // Every drivable cell comes out of the frontier exactly once.
        assert_eq!(outcome.visited, 8);
    }

    #[test]
    fn rejects_blocked_or_outside_endpoints() {
        let map: DeliveryMap = "..\n.#".parse().unwrap();
        let inside = Point::new(0, 0);
        for solver in [&DiscoveryOrder as &dyn RouteSolver] {
            assert_eq!(
                solver.search(&map, Point::new(1, 1), inside).unwrap_err(),
                SearchError::InvalidStart(Point::new(1, 1))
            );
            assert_eq!(
                solver.search(&map, inside, Point::new(2, 0)).unwrap_err(),
                SearchError::InvalidGoal(Point::new(2, 0))
            );
            assert_eq!(
                solver.search(&map, inside, Point::new(0, -1)).unwrap_err(),
                SearchError::InvalidGoal(Point::new(0, -1))
            );
        }
    }

    #[test]
    fn stale_entries_count_as_visits() {
        // |S5#.|
        // |..#G|
        // The inflated estimate expands the weight 5 cell first, which queues (1, 1) at cost 6.
        // Expanding (0, 1) relaxes it to 2 and queues it again, so it is popped twice.
        let map: DeliveryMap = ".5#.\n..#.".parse().unwrap();
        let solver = AstarSolver {
            heuristic_factor: 5.0,
        };
        let (start, goal) = (Point::new(0, 0), Point::new(3, 0));
        assert!(map.unreachable(&start, &goal));
        let outcome = best_first(&solver, &map, start, goal);
        assert!(!outcome.found());
        // Four distinct cells, five pops.
        assert_eq!(outcome.visited, 5);
    }

    #[test]
    fn relaxed_route_keeps_the_cheaper_parent() {
        // |S5..|
        // |..55|
        let map: DeliveryMap = ".5..\n..55".parse().unwrap();
        let solver = AstarSolver {
            heuristic_factor: 2.0,
        };
        let outcome = best_first(&solver, &map, Point::new(0, 0), Point::new(3, 1));
        let route = outcome.route.as_ref().unwrap();
        assert_eq!(
            route.path,
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(3, 1)
            ]
        );
        assert_eq!(route.cost, 12);
        assert_eq!(map.path_cost(&route.path), 12);
        // More pops than the map has cells.
        assert_eq!(outcome.visited, 9);
        assert!(outcome.visited > map.width() * map.height());
    }
}
