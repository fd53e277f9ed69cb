//! Delivery Planner Library
//!
//! Two independent optimisation routines over a synthetic delivery map:
//!
//! - a route planner that builds a closed tour from the depot with the
//!   nearest-neighbour heuristic and accounts for its distance and emission;
//! - a package selector that solves a 0/1 knapsack over the parcels, scoring
//!   each one by its value minus a carbon penalty, and reports which parcels
//!   to load.
//!
//! The route planner is a heuristic: its tours are not guaranteed to be the
//! shortest possible. The package selector is exact.
//!
//! # Example
//!
//! ```no_run
//! use delivery_planner::config::WorldConfig;
//! use delivery_planner::world::WorldModel;
//! use delivery_planner::{optimal_selection, plan_route};
//!
//! let world = WorldModel::generate_seeded(&WorldConfig::default()).unwrap();
//!
//! let tour = plan_route(&world);
//! println!("Distance: {:.2}, emission: {:.2}", tour.total_distance, tour.total_emission);
//!
//! let selection = optimal_selection(&world.packages, 50);
//! println!("Load {:?} worth {}", selection.chosen_ids, selection.optimal_value);
//! ```

pub mod error;
pub mod config;
pub mod distance;
pub mod world;
pub mod tour;
pub mod heuristics;
pub mod selection;
pub mod plan;
pub mod benchmark;

pub use error::ConfigError;
pub use world::{Package, Point, Route, WorldModel};
pub use tour::Tour;
pub use selection::{optimal_selection, optimal_value, Objective, PackageSelector, Selection};
pub use plan::{plan_deliveries, DeliveryPlan};

use heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};

/// Nearest-neighbour tour of `world` with the default emission factor.
pub fn plan_route(world: &WorldModel) -> Tour {
    NearestNeighborHeuristic::new().construct(world)
}
