use crate::solver::RouteSolver;

/// Greedy best-first search. Expands purely by the Euclidean estimate to the goal and keeps
/// the first parent found for every cell, even if a cheaper way to it is discovered later.
/// Usually visits few cells, but the route is neither shortest nor cheapest in general.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySolver;

impl RouteSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "GBFS"
    }

    fn priority(&self, _cost: u64, estimate: f64) -> f64 {
        estimate
    }

    fn relaxes(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use grid_util::point::Point;

    use super::*;
    use crate::delivery_map::DeliveryMap;
    use crate::solver::astar::AstarSolver;

    #[test]
    fn equal_start_goal() {
        let map = DeliveryMap::new(2, 2);
        let start = Point::new(1, 0);
        let outcome = GreedySolver.search(&map, start, start).unwrap();
        assert_eq!(outcome.path(), Some(&[start][..]));
        assert_eq!(outcome.visited, 1);
    }

    #[test]
    fn solve_simple_problem() {
        let map = DeliveryMap::new(3, 3);
        let outcome = GreedySolver
            .search(&map, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        let route = outcome.route.unwrap();
        assert_eq!(route.path.len(), 5);
        assert_eq!(route.cost, 4);
        assert_eq!(outcome.visited, 5);
    }

    #[test]
    fn ignores_traffic_cost() {
        let map: DeliveryMap = ".....\n..5..\n.....".parse().unwrap();
        let outcome = GreedySolver
            .search(&map, Point::new(0, 1), Point::new(4, 1))
            .unwrap();
        let route = outcome.route.unwrap();
        assert!(route.path.contains(&Point::new(2, 1)));
        assert_eq!(route.path.len(), 5);
        assert_eq!(route.cost, 8);
        assert_eq!(outcome.visited, 5);
    }

    /// The greedy choice runs into the pocket below the start and keeps the parents it found
    /// there, which makes the route four steps longer than the optimal one.
    #[test]
    fn keeps_first_discovered_parent() {
        //  ______
        // |......|
        // |......|
        // |S#..#G|
        // |..#.##|
        // |....#.|
        //  ______
        let map: DeliveryMap = "......\n......\n.#..#.\n..#.##\n....#.".parse().unwrap();
        let start = Point::new(0, 2);
        let goal = Point::new(5, 2);
        let greedy = GreedySolver.search(&map, start, goal).unwrap();
        let astar = AstarSolver::new().search(&map, start, goal).unwrap();
        let greedy_route = greedy.route.unwrap();
        let astar_route = astar.route.unwrap();
        assert_eq!(greedy_route.path.len(), 12);
        assert_eq!(greedy_route.cost, 11);
        assert_eq!(astar_route.path.len(), 8);
        assert!(greedy_route.cost > astar_route.cost);
        assert_eq!(greedy.visited, 12);
    }

    #[test]
    fn enclosed_goal_is_not_found() {
        let map: DeliveryMap = "....#.".parse().unwrap();
        let outcome = GreedySolver
            .search(&map, Point::new(0, 0), Point::new(5, 0))
            .unwrap();
        assert!(outcome.route.is_none());
        assert_eq!(outcome.visited, 4);
    }
}
