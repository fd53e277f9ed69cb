//! Configuration errors raised while building a delivery world.

use thiserror::Error;

/// Everything that can go wrong before an algorithm runs.
///
/// The planner and the selector are total over a valid [`WorldModel`](crate::world::WorldModel),
/// so all failures are reported here, at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a world needs at least one point (the depot)")]
    ZeroPoints,
    #[error("{count} points requested but the limit is {max}")]
    TooManyPoints { count: usize, max: usize },
    #[error("{count} packages requested but the limit is {max}")]
    TooManyPackages { count: usize, max: usize },
    #[error("depot index {depot} is out of range for {points} points")]
    DepotOutOfRange { depot: usize, points: usize },
    #[error("{packages} packages need a non-depot destination but the world only has the depot")]
    NoDestinations { packages: usize },
    #[error("point at index {index} has id {id}; ids must match their position")]
    PointIdMismatch { index: usize, id: usize },
    #[error("package at index {index} has id {id}; ids must match their position")]
    PackageIdMismatch { index: usize, id: usize },
    #[error("expected exactly one depot, found {count}")]
    DepotCount { count: usize },
    #[error("package {package} targets point {destination}, which is missing or the depot")]
    InvalidDestination { package: usize, destination: usize },
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}
