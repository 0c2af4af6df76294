//! # delivery_routing
//!
//! Route planning for food delivery on a grid city map. A [DeliveryMap] classifies every cell as
//! empty road, restaurant, customer, congested traffic or obstacle, and charges the traffic
//! weight of a cell for entering it. Two informed searches run over the map:
//!
//! - [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) ([AstarSolver]), which returns a
//!   cheapest route,
//! - [greedy best-first search](https://en.wikipedia.org/wiki/Best-first_search)
//!   ([GreedySolver]), which follows the heuristic only and usually expands far fewer cells
//!   but may return a longer or more expensive route.
//!
//! Both use the Euclidean distance to the goal as heuristic, move in the 4-neighbourhood and
//! report the number of expanded cells and the elapsed time next to the route.
//!
//! ```
//! use delivery_routing::{AstarSolver, DeliveryMap, Point, RouteSolver};
//!
//! let map: DeliveryMap = "R..\n.#.\n..C".parse().unwrap();
//! let outcome = AstarSolver::new()
//!     .search(&map, Point::new(0, 0), Point::new(2, 2))
//!     .unwrap();
//! assert_eq!(outcome.route.unwrap().cost, 4);
//! ```
pub mod delivery_map;
pub mod error;
pub mod generator;
pub mod solver;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

pub use crate::delivery_map::{CellKind, DeliveryMap};
pub use crate::error::{GenerateError, MapParseError, SearchError};
pub use crate::generator::MapGenerator;
pub use crate::solver::{
    astar::AstarSolver, greedy::GreedySolver, Route, RouteSolver, SearchOutcome,
};
pub use grid_util::point::Point;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Weight of a traffic cell placed without an explicit weight.
pub const DEFAULT_TRAFFIC_WEIGHT: u32 = 3;
/// Traffic is only meaningful if it costs more than an ordinary road cell.
pub const MIN_TRAFFIC_WEIGHT: u32 = 2;
/// Cost of entering a cell that carries no traffic.
pub const BASE_COST: u32 = 1;

/// Offsets of the 4-neighbourhood in expansion order: left, down, right, up.
pub(crate) const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
