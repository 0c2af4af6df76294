use crate::solver::RouteSolver;

/// A* search. Expands by accumulated cost plus the Euclidean estimate to the goal and replaces
/// the parent of a discovered cell whenever a cheaper way to it turns up, so the returned route
/// has minimal total cost as long as `heuristic_factor` is at most 1.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    /// Scales the heuristic. Values above 1 trade optimality for fewer expansions.
    pub heuristic_factor: f64,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
        }
    }
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl RouteSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn priority(&self, cost: u64, estimate: f64) -> f64 {
        cost as f64 + estimate * self.heuristic_factor
    }

    fn relaxes(&self) -> bool {
        true
    }
}
