//! Run configuration.
//!
//! Every section has sensible defaults matching the reference delivery map
//! (12 points, 20 packages, 50 kg van, 0.21 kg CO2 per distance unit), so a
//! JSON file only needs to mention the fields it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::selection::Objective;

/// Default ceiling on the number of delivery points.
pub const MAX_POINTS: usize = 50;
/// Default ceiling on the number of packages.
pub const MAX_PACKAGES: usize = 100;

/// Parameters of the synthetic world generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Label shown in reports
    pub name: String,
    /// Number of points, depot included
    pub point_count: usize,
    pub package_count: usize,
    /// Index of the depot point
    pub depot_index: usize,
    /// Seed for the ChaCha generator used by `WorldModel::generate_seeded`
    pub seed: u64,
    /// Point names; the built-in gazetteer is used when absent
    pub names: Option<Vec<String>>,
    /// Upper bound on `point_count`, `None` for no limit
    pub max_points: Option<usize>,
    /// Upper bound on `package_count`, `None` for no limit
    pub max_packages: Option<usize>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            name: "Bengaluru".to_string(),
            point_count: 12,
            package_count: 20,
            depot_index: 0,
            seed: 42,
            names: None,
            max_points: Some(MAX_POINTS),
            max_packages: Some(MAX_PACKAGES),
        }
    }
}

impl WorldConfig {
    /// Check counts and depot index before anything is generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_count == 0 {
            return Err(ConfigError::ZeroPoints);
        }
        if let Some(max) = self.max_points {
            if self.point_count > max {
                return Err(ConfigError::TooManyPoints { count: self.point_count, max });
            }
        }
        if let Some(max) = self.max_packages {
            if self.package_count > max {
                return Err(ConfigError::TooManyPackages { count: self.package_count, max });
            }
        }
        if self.depot_index >= self.point_count {
            return Err(ConfigError::DepotOutOfRange {
                depot: self.depot_index,
                points: self.point_count,
            });
        }
        if self.package_count > 0 && self.point_count < 2 {
            return Err(ConfigError::NoDestinations { packages: self.package_count });
        }
        Ok(())
    }
}

/// Route planner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Emission charged per unit of travelled distance
    pub emission_factor: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig { emission_factor: 0.21 }
    }
}

/// Package selector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Weight budget of the vehicle
    pub capacity: usize,
    pub objective: Objective,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig { capacity: 50, objective: Objective::NetValue }
    }
}

/// Complete configuration, as read from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub planner: PlannerConfig,
    pub selector: SelectorConfig,
}

impl AppConfig {
    /// Load a configuration file; missing sections and fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.world.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_map() {
        let config = AppConfig::default();
        assert_eq!(config.world.point_count, 12);
        assert_eq!(config.world.package_count, 20);
        assert_eq!(config.selector.capacity, 50);
        assert_eq!(config.selector.objective, Objective::NetValue);
        assert!((config.planner.emission_factor - 0.21).abs() < 1e-12);
        assert!(config.world.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(
            r#"{ "world": { "point_count": 5, "seed": 7 }, "selector": { "objective": "priority_weighted" } }"#,
        )
        .unwrap();
        assert_eq!(config.world.point_count, 5);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.package_count, 20);
        assert_eq!(config.selector.capacity, 50);
        assert_eq!(config.selector.objective, Objective::PriorityWeighted);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = AppConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_failures() {
        let zero = WorldConfig { point_count: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroPoints)));

        let crowded = WorldConfig { point_count: 51, ..Default::default() };
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::TooManyPoints { count: 51, max: 50 })
        ));

        let heavy = WorldConfig { package_count: 101, ..Default::default() };
        assert!(matches!(heavy.validate(), Err(ConfigError::TooManyPackages { .. })));

        let depot = WorldConfig { depot_index: 12, ..Default::default() };
        assert!(matches!(depot.validate(), Err(ConfigError::DepotOutOfRange { depot: 12, points: 12 })));

        let lonely = WorldConfig { point_count: 1, package_count: 3, ..Default::default() };
        assert!(matches!(lonely.validate(), Err(ConfigError::NoDestinations { packages: 3 })));
    }

    #[test]
    fn test_ceilings_can_be_lifted() {
        let big = WorldConfig {
            point_count: 120,
            package_count: 400,
            max_points: None,
            max_packages: None,
            ..Default::default()
        };
        assert!(big.validate().is_ok());
    }

    #[test]
    fn test_single_depot_without_packages_is_valid() {
        let config = WorldConfig { point_count: 1, package_count: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
