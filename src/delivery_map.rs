use core::fmt;
use std::str::FromStr;

use grid_util::point::Point;
use itertools::Itertools;
use log::{info, warn};
use petgraph::unionfind::UnionFind;

use crate::error::MapParseError;
use crate::{FxIndexMap, BASE_COST, DEFAULT_TRAFFIC_WEIGHT, MIN_TRAFFIC_WEIGHT, NEIGHBOUR_OFFSETS};

/// Symbol marking a route cell in [DeliveryMap::render].
pub const PATH_SYMBOL: char = '+';

/// Classification of a single map cell. Every kind except [CellKind::Obstacle] can be driven
/// through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    #[default]
    Empty,
    Restaurant,
    Customer,
    Traffic,
    Obstacle,
}

impl CellKind {
    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Restaurant => 'R',
            CellKind::Customer => 'C',
            CellKind::Traffic => 'T',
            CellKind::Obstacle => '#',
        }
    }

    pub fn is_traversable(self) -> bool {
        self != CellKind::Obstacle
    }
}

/// [DeliveryMap] stores the classification of every cell of a `width` x `height` city grid
/// together with the weights of congested cells and the named restaurants and customers.
/// Like the grid it describes, it keeps track of 4-connected components of drivable cells in a
/// [UnionFind] structure so that reachability can be answered without searching.
///
/// A map is only read by the solvers, so one map can serve any number of searches, also from
/// several threads at once.
#[derive(Clone, Debug)]
pub struct DeliveryMap {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    traffic: FxIndexMap<Point, u32>,
    restaurants: FxIndexMap<String, Point>,
    customers: FxIndexMap<String, Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for DeliveryMap {
    fn default() -> DeliveryMap {
        DeliveryMap::new(0, 0)
    }
}

impl DeliveryMap {
    /// Creates a map of empty road cells.
    pub fn new(width: usize, height: usize) -> DeliveryMap {
        let mut map = DeliveryMap {
            width,
            height,
            cells: vec![CellKind::Empty; width * height],
            traffic: FxIndexMap::default(),
            restaurants: FxIndexMap::default(),
            customers: FxIndexMap::default(),
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        map.generate_components();
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn get_ix(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    /// The classification at `(x, y)`, or [None] outside the map.
    pub fn kind(&self, x: i32, y: i32) -> Option<CellKind> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.get_ix(x, y)])
        } else {
            None
        }
    }

    pub fn kind_at(&self, point: &Point) -> Option<CellKind> {
        self.kind(point.x, point.y)
    }

    /// True iff `(x, y)` lies on the map and is not an obstacle.
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        self.kind(x, y).is_some_and(CellKind::is_traversable)
    }

    /// Overwrites the classification of a cell, returning [false] if it lies outside the map.
    /// Traffic placed this way gets [DEFAULT_TRAFFIC_WEIGHT]; use
    /// [add_traffic](Self::add_traffic) for an explicit weight. Replacing a traffic cell drops its
    /// weight, replacing a named restaurant or customer drops its name.
    pub fn set_classification(&mut self, x: i32, y: i32, kind: CellKind) -> bool {
        match kind {
            CellKind::Traffic => self.add_traffic(x, y, DEFAULT_TRAFFIC_WEIGHT),
            _ => self.place(x, y, kind),
        }
    }

    /// Marks `(x, y)` as congested with the given entry cost. Fails for cells outside the map and
    /// for weights below [MIN_TRAFFIC_WEIGHT]. A cell holds at most one weight, so placing
    /// traffic twice keeps the last weight.
    pub fn add_traffic(&mut self, x: i32, y: i32, weight: u32) -> bool {
        if weight < MIN_TRAFFIC_WEIGHT {
            warn!(
                "Rejecting traffic weight {} at ({}, {}): below {}",
                weight, x, y, MIN_TRAFFIC_WEIGHT
            );
            return false;
        }
        if !self.place(x, y, CellKind::Traffic) {
            return false;
        }
        self.traffic.insert(Point::new(x, y), weight);
        true
    }

    pub fn add_restaurant(&mut self, name: impl Into<String>, x: i32, y: i32) -> bool {
        if !self.place(x, y, CellKind::Restaurant) {
            return false;
        }
        self.restaurants.insert(name.into(), Point::new(x, y));
        true
    }

    pub fn add_customer(&mut self, name: impl Into<String>, x: i32, y: i32) -> bool {
        if !self.place(x, y, CellKind::Customer) {
            return false;
        }
        self.customers.insert(name.into(), Point::new(x, y));
        true
    }

    pub fn add_obstacle(&mut self, x: i32, y: i32) -> bool {
        self.place(x, y, CellKind::Obstacle)
    }

    /// Writes a cell and keeps the side tables and components consistent with it. Blocking a
    /// cell may split a component, which flags the components as dirty; opening one only joins
    /// components.
    fn place(&mut self, x: i32, y: i32, kind: CellKind) -> bool {
        if !self.in_bounds(x, y) {
            warn!(
                "Ignoring {:?} at ({}, {}) outside the {}x{} map",
                kind, x, y, self.width, self.height
            );
            return false;
        }
        let p = Point::new(x, y);
        let p_ix = self.get_ix(x, y);
        let previous = self.cells[p_ix];
        match previous {
            CellKind::Traffic => {
                self.traffic.shift_remove(&p);
            }
            CellKind::Restaurant => self.restaurants.retain(|_, site| *site != p),
            CellKind::Customer => self.customers.retain(|_, site| *site != p),
            _ => {}
        }
        if kind == CellKind::Obstacle {
            if previous != CellKind::Obstacle {
                self.components_dirty = true;
            }
        } else {
            let joined = self
                .neighbours(&p)
                .map(|n| self.get_ix(n.x, n.y))
                .collect::<Vec<_>>();
            for n_ix in joined {
                self.components.union(p_ix, n_ix);
            }
        }
        self.cells[p_ix] = kind;
        true
    }

    /// Drivable cells of the 4-neighbourhood of `point`, in expansion order.
    pub fn neighbours(&self, point: &Point) -> impl Iterator<Item = Point> + '_ {
        let point = *point;
        NEIGHBOUR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(move |n| self.is_valid(n.x, n.y))
    }

    /// The cost of driving from `from` into the adjacent cell `to`. Only the destination
    /// matters: its traffic weight if it is congested, [BASE_COST] otherwise.
    pub fn edge_cost(&self, _from: &Point, to: &Point) -> u32 {
        self.traffic_weight(to).unwrap_or(BASE_COST)
    }

    pub fn traffic_weight(&self, point: &Point) -> Option<u32> {
        self.traffic.get(point).copied()
    }

    /// All congested cells with their weights, in placement order.
    pub fn traffic(&self) -> impl Iterator<Item = (Point, u32)> + '_ {
        self.traffic.iter().map(|(p, w)| (*p, *w))
    }

    pub fn restaurants(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.restaurants.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn customers(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.customers.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn restaurant(&self, name: &str) -> Option<Point> {
        self.restaurants.get(name).copied()
    }

    pub fn customer(&self, name: &str) -> Option<Point> {
        self.customers.get(name).copied()
    }

    /// Total cost of driving along `path`, i.e. the sum of [edge_cost](Self::edge_cost) over
    /// consecutive cells. The first cell is free. Summed in 64 bits, so no route over `u32`
    /// weights can overflow.
    pub fn path_cost(&self, path: &[Point]) -> u64 {
        path.iter()
            .tuple_windows()
            .fold(0, |total: u64, (from, to)| {
                total.saturating_add(u64::from(self.edge_cost(from, to)))
            })
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        if self.is_valid(point.x, point.y) {
            Some(self.components.find(self.get_ix(point.x, point.y)))
        } else {
            None
        }
    }

    /// Checks if start and goal are drivable and on the same component. The answer is only
    /// exact if the components are up to date, see [update](Self::update).
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.is_valid(start.x, start.y) && self.is_valid(goal.x, goal.y) {
            let start_ix = self.get_ix(start.x, start.y);
            let goal_ix = self.get_ix(goal.x, goal.y);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up drivable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        let w = self.width as i32;
        let h = self.height as i32;
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for y in 0..h {
            for x in 0..w {
                if !self.is_valid(x, y) {
                    continue;
                }
                let parent_ix = self.get_ix(x, y);
                for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                    if self.is_valid(nx, ny) {
                        let ix = self.get_ix(nx, ny);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }

    /// Renders the map with one row per line and cells separated by a space. Cells of `path`
    /// are marked with [PATH_SYMBOL], except restaurants and customers which keep their symbol.
    pub fn render(&self, path: Option<&[Point]>) -> String {
        if self.width == 0 {
            return String::new();
        }
        let mut symbols = self.cells.iter().map(|k| k.symbol()).collect::<Vec<char>>();
        for p in path.unwrap_or_default() {
            match self.kind_at(p) {
                Some(CellKind::Restaurant | CellKind::Customer) | None => {}
                Some(_) => symbols[self.get_ix(p.x, p.y)] = PATH_SYMBOL,
            }
        }
        symbols
            .chunks(self.width)
            .map(|row| row.iter().join(" "))
            .join("\n")
    }
}

impl fmt::Display for DeliveryMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.render(None))
    }
}

/// Parses the symbols written by [DeliveryMap::render]. Whitespace is ignored, a digit `2` to
/// `9` is traffic of that weight and a path marker reads as an empty cell. Restaurants and
/// customers are named `R1`, `R2`, ... and `C1`, `C2`, ... in row-major order.
impl FromStr for DeliveryMap {
    type Err = MapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<char>>())
            .filter(|row| !row.is_empty())
            .collect::<Vec<_>>();
        let width = rows.first().map(Vec::len).ok_or(MapParseError::Empty)?;
        let mut map = DeliveryMap::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &symbol) in row.iter().enumerate() {
                let (cx, cy) = (x as i32, y as i32);
                match symbol {
                    '.' | PATH_SYMBOL => {}
                    'R' => {
                        let name = format!("R{}", map.restaurants.len() + 1);
                        map.add_restaurant(name, cx, cy);
                    }
                    'C' => {
                        let name = format!("C{}", map.customers.len() + 1);
                        map.add_customer(name, cx, cy);
                    }
                    'T' => {
                        map.add_traffic(cx, cy, DEFAULT_TRAFFIC_WEIGHT);
                    }
                    '2'..='9' => {
                        map.add_traffic(cx, cy, symbol as u32 - '0' as u32);
                    }
                    '#' => {
                        map.add_obstacle(cx, cy);
                    }
                    _ => return Err(MapParseError::UnknownSymbol { symbol, x, y }),
                }
            }
        }
        map.generate_components();
        Ok(map)
    }
}
