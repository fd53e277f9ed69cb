//! Carbon-aware package selection.
//!
//! Picks the subset of packages that maximises total net value without the
//! summed weight exceeding the vehicle capacity. This is an exact 0/1
//! knapsack solved by dynamic programming over integer weights `0..=capacity`,
//! so the cost is `O(packages * capacity)` in time and, when the chosen set is
//! reconstructed, in memory as well.
//!
//! # Objective
//!
//! The canonical objective is `value - floor(carbon_footprint * 10)`
//! ([`Objective::NetValue`]). [`Objective::PriorityWeighted`] multiplies the
//! value by the package priority first; it must be requested explicitly.

use serde::{Deserialize, Serialize};

use crate::config::SelectorConfig;
use crate::world::Package;

/// Per-package score maximised by the selector
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// `value - floor(carbon_footprint * 10)`
    #[default]
    NetValue,
    /// `value * priority - floor(carbon_footprint * 10)`
    PriorityWeighted,
}

impl Objective {
    /// Score of a single package. May be negative.
    #[inline]
    pub fn net_value(&self, package: &Package) -> i64 {
        let worth = match self {
            Objective::NetValue => package.value as i64,
            Objective::PriorityWeighted => package.value as i64 * package.priority as i64,
        };
        worth - package.carbon_penalty()
    }
}

/// Packages chosen for one capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub capacity: usize,
    pub objective: Objective,
    /// Best achievable total net value
    pub optimal_value: i64,
    /// Ids of the chosen packages, in package order
    pub chosen_ids: Vec<usize>,
    pub total_weight: usize,
    /// Net value recomputed from the chosen packages; equals `optimal_value`
    pub total_net_value: i64,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.chosen_ids.is_empty()
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Selection ({:?}, capacity {})", self.objective, self.capacity)?;
        writeln!(f, "  Optimal value: {}", self.optimal_value)?;
        writeln!(f, "  Total weight: {}", self.total_weight)?;
        writeln!(f, "  Packages: {:?}", self.chosen_ids)
    }
}

/// 0/1 knapsack solver over packages
#[derive(Debug, Clone, Default)]
pub struct PackageSelector {
    pub objective: Objective,
}

impl PackageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objective(objective: Objective) -> Self {
        PackageSelector { objective }
    }

    pub fn with_config(config: &SelectorConfig) -> Self {
        Self::with_objective(config.objective)
    }

    /// Best total net value reachable within `capacity`.
    pub fn optimal_value(&self, packages: &[Package], capacity: usize) -> i64 {
        let capacity = effective_capacity(packages, capacity);
        let mut dp = vec![0i64; capacity + 1];

        for package in packages {
            let weight = package.weight as usize;
            if weight > capacity {
                continue;
            }
            let net = self.objective.net_value(package);
            // Descending weights: each package is used at most once
            for w in (weight..=capacity).rev() {
                let with = dp[w - weight] + net;
                if with > dp[w] {
                    dp[w] = with;
                }
            }
        }

        dp[capacity]
    }

    /// Best total net value together with the packages that achieve it.
    pub fn select(&self, packages: &[Package], capacity: usize) -> Selection {
        let start = std::time::Instant::now();
        let requested = capacity;
        let capacity = effective_capacity(packages, capacity);

        let mut dp = vec![0i64; capacity + 1];
        // keep[i][w]: package i improved the best value at weight w
        let mut keep = vec![vec![false; capacity + 1]; packages.len()];

        for (i, package) in packages.iter().enumerate() {
            let weight = package.weight as usize;
            if weight > capacity {
                continue;
            }
            let net = self.objective.net_value(package);
            for w in (weight..=capacity).rev() {
                let with = dp[w - weight] + net;
                if with > dp[w] {
                    dp[w] = with;
                    keep[i][w] = true;
                }
            }
        }

        log::debug!(
            "knapsack table: {} packages x {} weights, optimum {}",
            packages.len(),
            capacity + 1,
            dp[capacity]
        );

        let mut chosen_ids = Vec::new();
        let mut total_weight = 0usize;
        let mut total_net_value = 0i64;
        let mut remaining = capacity;

        for i in (0..packages.len()).rev() {
            if keep[i][remaining] {
                let package = &packages[i];
                chosen_ids.push(package.id);
                total_weight += package.weight as usize;
                total_net_value += self.objective.net_value(package);
                remaining -= package.weight as usize;
            }
        }
        chosen_ids.reverse();

        Selection {
            capacity: requested,
            objective: self.objective,
            optimal_value: dp[capacity],
            chosen_ids,
            total_weight,
            total_net_value,
            computation_time: start.elapsed().as_secs_f64(),
        }
    }
}

/// Table width actually needed: nothing changes past the combined package weight.
fn effective_capacity(packages: &[Package], capacity: usize) -> usize {
    let total_weight = packages
        .iter()
        .fold(0usize, |acc, p| acc.saturating_add(p.weight as usize));
    capacity.min(total_weight)
}

/// [`PackageSelector::optimal_value`] with the canonical objective.
pub fn optimal_value(packages: &[Package], capacity: usize) -> i64 {
    PackageSelector::new().optimal_value(packages, capacity)
}

/// [`PackageSelector::select`] with the canonical objective.
pub fn optimal_selection(packages: &[Package], capacity: usize) -> Selection {
    PackageSelector::new().select(packages, capacity)
}
