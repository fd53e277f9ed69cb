//! Tour representation and checks.
//!
//! A tour lists every point once, depot first. The edge from the last point
//! back to the depot is implicit: it is never stored in `order` but is
//! always included in the totals.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::distance::distance;
use crate::world::{Point, WorldModel};

/// A closed visiting order with its cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// Point ids in visiting order, starting at the depot
    pub order: Vec<usize>,
    /// Sum of edge lengths, closing edge included
    pub total_distance: f64,
    /// Estimated emission for the whole loop
    pub total_emission: f64,
    /// Heuristic that produced this tour
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Tour {
    pub fn new(order: Vec<usize>, total_distance: f64, total_emission: f64, algorithm: &str) -> Self {
        Tour {
            order,
            total_distance,
            total_emission,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True when the tour starts at the depot and visits every point exactly once.
    pub fn is_complete(&self, world: &WorldModel) -> bool {
        if self.order.len() != world.num_points() || self.order.first() != Some(&world.depot_id) {
            return false;
        }

        let unique: HashSet<usize> = self.order.iter().copied().collect();
        unique.len() == world.num_points() && unique.iter().all(|&id| id < world.num_points())
    }

    /// Recompute the loop length from coordinates, closing edge included.
    pub fn tour_length(&self, points: &[Point]) -> f64 {
        if self.order.len() < 2 {
            return 0.0;
        }

        let legs: f64 = self
            .order
            .windows(2)
            .map(|w| distance(&points[w[0]], &points[w[1]]))
            .sum();

        legs + distance(&points[self.order[self.order.len() - 1]], &points[self.order[0]])
    }

    /// Consecutive `(from, to)` pairs, closing edge last.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        if self.order.len() < 2 {
            return Vec::new();
        }
        (0..self.order.len())
            .map(|i| (self.order[i], self.order[(i + 1) % self.order.len()]))
            .collect()
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour ({})", self.algorithm)?;
        writeln!(f, "  Distance: {:.2}", self.total_distance)?;
        writeln!(f, "  Emission: {:.2}", self.total_emission)?;
        writeln!(f, "  Time: {:.6}s", self.computation_time)?;
        writeln!(f, "  Order: {:?}", self.order)
    }
}
