use std::ops::RangeInclusive;

use grid_util::point::Point;
use itertools::Itertools;
use log::info;
use rand::Rng;

use crate::delivery_map::DeliveryMap;
use crate::error::GenerateError;
use crate::MIN_TRAFFIC_WEIGHT;

/// Settings for random city maps. Every site is placed on its own empty cell: first the
/// restaurants `R1..`, then the customers `C1..`, then traffic and finally obstacles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGenerator {
    pub restaurants: usize,
    pub customers: usize,
    pub traffic: usize,
    pub obstacles: usize,
    /// Range the weight of every traffic cell is drawn from.
    pub traffic_weights: RangeInclusive<u32>,
}

impl Default for MapGenerator {
    fn default() -> MapGenerator {
        MapGenerator {
            restaurants: 3,
            customers: 5,
            traffic: 8,
            obstacles: 10,
            traffic_weights: 2..=5,
        }
    }
}

impl MapGenerator {
    pub fn sites(&self) -> usize {
        self.restaurants + self.customers + self.traffic + self.obstacles
    }

    /// Generates a `width` x `height` map. The same generator and the same seeded `rng` always
    /// produce the same map. The components of the result are up to date.
    pub fn generate<R: Rng>(
        &self,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<DeliveryMap, GenerateError> {
        let (min, max) = (*self.traffic_weights.start(), *self.traffic_weights.end());
        if self.traffic > 0 && (self.traffic_weights.is_empty() || min < MIN_TRAFFIC_WEIGHT) {
            return Err(GenerateError::InvalidTrafficWeights { min, max });
        }
        let requested = self.sites();
        let available = width * height;
        if requested > available {
            return Err(GenerateError::NotEnoughSpace {
                requested,
                available,
            });
        }

        let mut map = DeliveryMap::new(width, height);
        let mut free = (0..height as i32)
            .cartesian_product(0..width as i32)
            .map(|(y, x)| Point::new(x, y))
            .collect::<Vec<Point>>();

        for i in 1..=self.restaurants {
            let p = take_free(&mut free, rng);
            map.add_restaurant(format!("R{}", i), p.x, p.y);
        }
        for i in 1..=self.customers {
            let p = take_free(&mut free, rng);
            map.add_customer(format!("C{}", i), p.x, p.y);
        }
        for _ in 0..self.traffic {
            let p = take_free(&mut free, rng);
            let weight = rng.gen_range(self.traffic_weights.clone());
            map.add_traffic(p.x, p.y, weight);
        }
        for _ in 0..self.obstacles {
            let p = take_free(&mut free, rng);
            map.add_obstacle(p.x, p.y);
        }
        map.update();
        info!(
            "Generated {}x{} map with {} restaurants, {} customers, {} traffic cells and {} obstacles",
            width, height, self.restaurants, self.customers, self.traffic, self.obstacles
        );
        Ok(map)
    }
}

/// Removes and returns a random cell of `free`, which must not be empty.
fn take_free<R: Rng>(free: &mut Vec<Point>, rng: &mut R) -> Point {
    free.swap_remove(rng.gen_range(0..free.len()))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::delivery_map::CellKind;

    fn count(map: &DeliveryMap, kind: CellKind) -> usize {
        (0..map.height() as i32)
            .cartesian_product(0..map.width() as i32)
            .filter(|&(y, x)| map.kind(x, y) == Some(kind))
            .count()
    }

    #[test]
    fn places_every_site_on_its_own_cell() {
        let mut rng = StdRng::seed_from_u64(0);
        let map = MapGenerator::default()
            .generate(15, 15, &mut rng)
            .unwrap();
        assert_eq!(count(&map, CellKind::Restaurant), 3);
        assert_eq!(count(&map, CellKind::Customer), 5);
        assert_eq!(count(&map, CellKind::Traffic), 8);
        assert_eq!(count(&map, CellKind::Obstacle), 10);
        assert_eq!(
            map.restaurants().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["R1", "R2", "R3"]
        );
        assert_eq!(map.customers().count(), 5);
        assert!(map.traffic().all(|(_, weight)| (2..=5).contains(&weight)));
        assert!(!map.components_dirty);
    }

    #[test]
    fn same_seed_same_map() {
        let generator = MapGenerator::default();
        let first = generator
            .generate(12, 9, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let second = generator
            .generate(12, 9, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(first.render(None), second.render(None));
        assert_eq!(
            first.traffic().collect::<Vec<_>>(),
            second.traffic().collect::<Vec<_>>()
        );
    }

    #[test]
    fn fills_a_map_exactly() {
        let generator = MapGenerator {
            restaurants: 1,
            customers: 1,
            traffic: 1,
            obstacles: 1,
            traffic_weights: 4..=4,
        };
        let map = generator
            .generate(2, 2, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(count(&map, CellKind::Empty), 0);
        assert_eq!(map.traffic().next().map(|(_, w)| w), Some(4));
    }

    #[test]
    fn rejects_overfull_maps() {
        let generator = MapGenerator::default();
        assert_eq!(
            generator
                .generate(5, 5, &mut StdRng::seed_from_u64(0))
                .unwrap_err(),
            GenerateError::NotEnoughSpace {
                requested: 26,
                available: 25
            }
        );
    }

    #[test]
    fn rejects_cheap_traffic() {
        let generator = MapGenerator {
            traffic_weights: 1..=3,
            ..MapGenerator::default()
        };
        assert_eq!(
            generator
                .generate(15, 15, &mut StdRng::seed_from_u64(0))
                .unwrap_err(),
            GenerateError::InvalidTrafficWeights { min: 1, max: 3 }
        );
    }
}
