//! Route and package selection for one world, side by side.

use serde::{Deserialize, Serialize};

use crate::heuristics::construction::ConstructionHeuristic;
use crate::selection::{PackageSelector, Selection};
use crate::tour::Tour;
use crate::world::WorldModel;

/// Output of both algorithms for the same world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPlan {
    pub world: String,
    pub tour: Tour,
    pub selection: Selection,
}

/// Run the route planner and the package selector on the same world.
///
/// The two share nothing but the read-only world, so they run on separate
/// rayon workers.
pub fn plan_deliveries<H>(
    world: &WorldModel,
    planner: &H,
    selector: &PackageSelector,
    capacity: usize,
) -> DeliveryPlan
where
    H: ConstructionHeuristic + Sync + ?Sized,
{
    let (tour, selection) = rayon::join(
        || planner.construct(world),
        || selector.select(&world.packages, capacity),
    );

    log::info!(
        "Planned '{}': distance {:.2}, emission {:.2}, package value {} ({} packages)",
        world.name,
        tour.total_distance,
        tour.total_emission,
        selection.optimal_value,
        selection.chosen_ids.len()
    );

    DeliveryPlan {
        world: world.name.clone(),
        tour,
        selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::heuristics::construction::NearestNeighborHeuristic;
    use crate::selection::optimal_selection;

    #[test]
    fn test_plan_matches_individual_runs() {
        let world = WorldModel::generate_seeded(&WorldConfig::default()).unwrap();
        let nn = NearestNeighborHeuristic::new();
        let plan = plan_deliveries(&world, &nn, &PackageSelector::new(), 50);

        let tour = nn.construct(&world);
        let selection = optimal_selection(&world.packages, 50);

        assert_eq!(plan.world, "Bengaluru");
        assert_eq!(plan.tour.order, tour.order);
        assert_eq!(plan.tour.total_distance, tour.total_distance);
        assert_eq!(plan.selection.optimal_value, selection.optimal_value);
        assert_eq!(plan.selection.chosen_ids, selection.chosen_ids);
    }

    #[test]
    fn test_plan_serializes_to_json() {
        let config = WorldConfig { point_count: 4, package_count: 3, ..Default::default() };
        let world = WorldModel::generate_seeded(&config).unwrap();
        let plan = plan_deliveries(&world, &NearestNeighborHeuristic::new(), &PackageSelector::new(), 10);

        let json = serde_json::to_string(&plan).unwrap();
        let back: DeliveryPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tour.order, plan.tour.order);
        assert_eq!(back.selection.chosen_ids, plan.selection.chosen_ids);
    }
}
