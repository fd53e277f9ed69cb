use crate::config::PlannerConfig;
use crate::tour::Tour;
use crate::world::{Point, WorldModel};
use ordered_float::OrderedFloat;

pub trait ConstructionHeuristic {
    fn construct(&self, world: &WorldModel) -> Tour;
    fn name(&self) -> &str;
}

/// Nearest Neighbor Heuristic
///
/// Builds a closed tour from the depot by repeatedly moving to the nearest
/// unvisited point, then returns to the depot. Ties go to the lowest index.
/// This is a greedy construction: tours are usually good, never guaranteed
/// to be the shortest.
pub struct NearestNeighborHeuristic {
    /// Emission charged per unit of distance on every leg
    pub emission_factor: f64,
}

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        Self::with_config(&PlannerConfig::default())
    }

    pub fn with_config(config: &PlannerConfig) -> Self {
        NearestNeighborHeuristic {
            emission_factor: config.emission_factor,
        }
    }

    /// Closest unvisited point to `current`, scanning in index order.
    fn find_nearest(&self, points: &[Point], current: usize, visited: &[bool]) -> Option<(usize, f64)> {
        // min_by_key keeps the first of several equal minima
        (0..points.len())
            .filter(|&i| !visited[i])
            .map(|i| (i, points[current].distance_to(&points[i])))
            .min_by_key(|&(_, d)| OrderedFloat(d))
    }

    /// Plan a tour over raw points starting and ending at `depot`.
    ///
    /// Returns an empty tour when `depot` is not a valid index.
    pub fn plan_route(&self, points: &[Point], depot: usize) -> Tour {
        let start = std::time::Instant::now();

        if depot >= points.len() {
            log::warn!("depot {} is outside {} points, nothing to plan", depot, points.len());
            return Tour::new(Vec::new(), 0.0, 0.0, self.name());
        }

        let mut order = Vec::with_capacity(points.len());
        let mut visited = vec![false; points.len()];
        let mut total_distance = 0.0;
        let mut total_emission = 0.0;

        let mut current = depot;
        order.push(current);
        visited[current] = true;

        while order.len() < points.len() {
            let Some((next, dist)) = self.find_nearest(points, current, &visited) else {
                break;
            };
            log::debug!("leg {} -> {} ({:.2})", current, next, dist);
            order.push(next);
            visited[next] = true;
            total_distance += dist;
            total_emission += dist * self.emission_factor;
            current = next;
        }

        if order.len() > 1 {
            let closing = points[current].distance_to(&points[depot]);
            total_distance += closing;
            total_emission += closing * self.emission_factor;
        }

        let mut tour = Tour::new(order, total_distance, total_emission, self.name());
        tour.computation_time = start.elapsed().as_secs_f64();
        tour
    }
}

impl Default for NearestNeighborHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, world: &WorldModel) -> Tour {
        self.plan_route(&world.points, world.depot_id)
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn square_world() -> WorldModel {
        let points = vec![
            Point::new(0, "depot", 0.0, 0.0, true),
            Point::new(1, "a", 10.0, 0.0, false),
            Point::new(2, "b", 10.0, 10.0, false),
            Point::new(3, "c", 0.0, 10.0, false),
        ];
        WorldModel::from_parts("square", points, vec![]).unwrap()
    }

    #[test]
    fn test_square_tour() {
        let world = square_world();
        let tour = NearestNeighborHeuristic::new().construct(&world);

        assert_eq!(tour.order, vec![0, 1, 2, 3]);
        assert!((tour.total_distance - 40.0).abs() < 1e-9);
        assert!((tour.total_emission - 40.0 * 0.21).abs() < 1e-9);
        assert_eq!(tour.algorithm, "NearestNeighbor");
    }

    #[test]
    fn test_single_point_world() {
        let points = vec![Point::new(0, "depot", 5.0, 5.0, true)];
        let world = WorldModel::from_parts("alone", points, vec![]).unwrap();
        let tour = NearestNeighborHeuristic::new().construct(&world);

        assert_eq!(tour.order, vec![0]);
        assert_eq!(tour.total_distance, 0.0);
        assert_eq!(tour.total_emission, 0.0);
    }

    #[test]
    fn test_two_points_go_there_and_back() {
        let points = vec![
            Point::new(0, "depot", 0.0, 0.0, true),
            Point::new(1, "a", 3.0, 4.0, false),
        ];
        let world = WorldModel::from_parts("pair", points, vec![]).unwrap();
        let tour = NearestNeighborHeuristic::new().construct(&world);

        assert_eq!(tour.order, vec![0, 1]);
        assert!((tour.total_distance - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let points = vec![
            Point::new(0, "depot", 0.0, 0.0, true),
            Point::new(1, "west", -1.0, 0.0, false),
            Point::new(2, "east", 1.0, 0.0, false),
            Point::new(3, "north", 0.0, 1.0, false),
        ];
        let world = WorldModel::from_parts("cross", points, vec![]).unwrap();
        let tour = NearestNeighborHeuristic::new().construct(&world);

        // All three are 1 away from the depot; "west" is scanned first.
        assert_eq!(tour.order[1], 1);
        // From west: north is sqrt(2) away, east is 2 away.
        assert_eq!(tour.order, vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_non_zero_depot() {
        let points = vec![
            Point::new(0, "a", 0.0, 0.0, false),
            Point::new(1, "b", 10.0, 0.0, false),
            Point::new(2, "depot", 20.0, 0.0, true),
        ];
        let world = WorldModel::from_parts("line", points, vec![]).unwrap();
        let tour = NearestNeighborHeuristic::new().construct(&world);

        assert_eq!(tour.order, vec![2, 1, 0]);
        assert!((tour.total_distance - 40.0).abs() < 1e-9);
        assert!(tour.is_complete(&world));
    }

    #[test]
    fn test_generated_world_properties() {
        for seed in 0..10 {
            let config = WorldConfig { seed, point_count: 30, ..Default::default() };
            let world = WorldModel::generate_seeded(&config).unwrap();
            let nn = NearestNeighborHeuristic::new();
            let tour = nn.construct(&world);

            assert!(tour.is_complete(&world));
            assert!((tour.total_distance - tour.tour_length(&world.points)).abs() < 1e-6);
            assert!((tour.total_emission - tour.total_distance * 0.21).abs() < 1e-6);

            let again = nn.construct(&world);
            assert_eq!(tour.order, again.order);
            assert_eq!(tour.total_distance.to_bits(), again.total_distance.to_bits());
            assert_eq!(tour.total_emission.to_bits(), again.total_emission.to_bits());
        }
    }

    #[test]
    fn test_custom_emission_factor() {
        let world = square_world();
        let nn = NearestNeighborHeuristic::with_config(&PlannerConfig { emission_factor: 0.5 });
        let tour = nn.construct(&world);
        assert!((tour.total_emission - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_depot_yields_empty_tour() {
        let world = square_world();
        let tour = NearestNeighborHeuristic::new().plan_route(&world.points, 9);
        assert!(tour.is_empty());
        assert_eq!(tour.total_distance, 0.0);
    }
}
