//! The delivery world: points, packages and the complete route graph.
//!
//! A [`WorldModel`] is built once, either by the seeded generator or from
//! caller-supplied data, and is read-only afterwards. Point ids double as
//! indices into `points`, so algorithms can address points directly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::distance::distance;
use crate::error::ConfigError;

/// Default point names, depot first.
pub const GAZETTEER: [&str; 12] = [
    "Depot - Koramangala",
    "Electronic City",
    "Whitefield",
    "Banashankari",
    "Jayanagar",
    "Indiranagar",
    "HSR Layout",
    "BTM Layout",
    "Malleshwaram",
    "Rajajinagar",
    "Hebbal",
    "Marathahalli",
];

/// Lowest per-edge emission factor; also used for routes of caller-built worlds.
pub const BASE_EMISSION_FACTOR: f64 = 0.21;

const GRID_COLUMNS: usize = 4;
const GRID_ORIGIN: f64 = 100.0;
const GRID_DX: f64 = 180.0;
const GRID_DY: f64 = 150.0;
const GRID_JITTER: u32 = 50;

/// A delivery location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Identifier, equal to the point's index in the world
    pub id: usize,
    pub name: String,
    /// Geographic coordinates (informational only)
    pub lat: f64,
    pub lon: f64,
    /// Planar coordinates used for every distance
    pub x: f64,
    pub y: f64,
    pub is_depot: bool,
    /// Number of parcels shown at this stop (cosmetic)
    pub package_count: u32,
}

impl Point {
    pub fn new(id: usize, name: impl Into<String>, x: f64, y: f64, is_depot: bool) -> Self {
        Point {
            id,
            name: name.into(),
            lat: 0.0,
            lon: 0.0,
            x,
            y,
            is_depot,
            package_count: 0,
        }
    }

    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(self, other)
    }
}

/// A parcel waiting at the depot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: usize,
    /// Knapsack cost dimension
    pub weight: u32,
    /// Nominal worth
    pub value: u32,
    /// 1 (low) to 3 (high); only the priority-weighted objective reads it
    pub priority: u32,
    /// Emission estimate in abstract units
    pub carbon_footprint: f64,
    /// Non-depot point this package goes to
    pub destination_id: usize,
}

impl Package {
    pub fn new(
        id: usize,
        weight: u32,
        value: u32,
        priority: u32,
        carbon_footprint: f64,
        destination_id: usize,
    ) -> Self {
        Package { id, weight, value, priority, carbon_footprint, destination_id }
    }

    /// Penalty subtracted from the package's worth: `floor(carbon_footprint * 10)`.
    ///
    /// A product within a few ulps of an integer is treated as that integer, so
    /// a footprint such as `2.9` (stored as 2.8999...) still costs 29.
    pub fn carbon_penalty(&self) -> i64 {
        let scaled = self.carbon_footprint * 10.0;
        let nearest = scaled.round();
        if (scaled - nearest).abs() <= nearest.abs() * 4.0 * f64::EPSILON {
            nearest as i64
        } else {
            scaled.floor() as i64
        }
    }
}

/// An edge of the complete graph, stored once per unordered pair (`from < to`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    pub carbon_emission_factor: f64,
}

/// Points, packages and routes of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldModel {
    pub name: String,
    pub depot_id: usize,
    pub points: Vec<Point>,
    pub packages: Vec<Package>,
    /// Complete graph, `n * (n - 1) / 2` entries in `(from, to)` lexicographic order
    pub routes: Vec<Route>,
}

impl WorldModel {
    /// Generate a synthetic world from `config`, drawing every random quantity from `rng`.
    ///
    /// Points sit on a four-column grid with a small jitter; packages get random
    /// weight, value, priority, carbon footprint and a non-depot destination.
    pub fn generate<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;

        let n = config.point_count;
        let depot = config.depot_index;
        let names = config.names.as_deref();

        if let Some(names) = names {
            if names.len() < n {
                log::warn!(
                    "{} names supplied for {} points; the rest are numbered",
                    names.len(),
                    n
                );
            }
        }

        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let name = match names {
                Some(list) => list.get(i).cloned(),
                None => GAZETTEER.get(i).map(|s| s.to_string()),
            }
            .unwrap_or_else(|| format!("Location {}", i));

            let x = GRID_ORIGIN + (i % GRID_COLUMNS) as f64 * GRID_DX + rng.gen_range(0..GRID_JITTER) as f64;
            let y = GRID_ORIGIN + (i / GRID_COLUMNS) as f64 * GRID_DY + rng.gen_range(0..GRID_JITTER) as f64;

            let mut point = Point::new(i, name, x, y, i == depot);
            point.package_count = rng.gen_range(1..=5);
            points.push(point);
        }

        let mut packages = Vec::with_capacity(config.package_count);
        for id in 0..config.package_count {
            let weight = rng.gen_range(1..=10);
            let value = rng.gen_range(50..150);
            let priority = rng.gen_range(1..=3);
            let carbon_footprint = rng.gen_range(10..60u32) as f64 / 10.0;
            // Uniform over the n - 1 non-depot indices
            let slot = rng.gen_range(0..n - 1);
            let destination_id = if slot >= depot { slot + 1 } else { slot };
            packages.push(Package::new(id, weight, value, priority, carbon_footprint, destination_id));
        }

        let routes = Self::build_routes(&points, || {
            BASE_EMISSION_FACTOR + rng.gen_range(0..10u32) as f64 / 100.0
        });

        log::info!(
            "Generated world '{}': {} points, {} packages, {} routes",
            config.name,
            points.len(),
            packages.len(),
            routes.len()
        );

        Ok(WorldModel {
            name: config.name.clone(),
            depot_id: depot,
            points,
            packages,
            routes,
        })
    }

    /// Generate with a ChaCha8 generator seeded from `config.seed`.
    pub fn generate_seeded(config: &WorldConfig) -> Result<Self, ConfigError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::generate(config, &mut rng)
    }

    /// Build a world from data supplied by a caller.
    ///
    /// Requires `points[i].id == i`, `packages[i].id == i`, exactly one depot and
    /// packages that target existing non-depot points. Every route gets [`BASE_EMISSION_FACTOR`].
    pub fn from_parts(
        name: impl Into<String>,
        points: Vec<Point>,
        packages: Vec<Package>,
    ) -> Result<Self, ConfigError> {
        if points.is_empty() {
            return Err(ConfigError::ZeroPoints);
        }
        if let Some((index, point)) = points.iter().enumerate().find(|(i, p)| p.id != *i) {
            return Err(ConfigError::PointIdMismatch { index, id: point.id });
        }

        let depots: Vec<usize> = points.iter().filter(|p| p.is_depot).map(|p| p.id).collect();
        if depots.len() != 1 {
            return Err(ConfigError::DepotCount { count: depots.len() });
        }
        let depot_id = depots[0];

        if let Some((index, package)) = packages.iter().enumerate().find(|(i, p)| p.id != *i) {
            return Err(ConfigError::PackageIdMismatch { index, id: package.id });
        }
        for package in &packages {
            if package.destination_id >= points.len() || package.destination_id == depot_id {
                return Err(ConfigError::InvalidDestination {
                    package: package.id,
                    destination: package.destination_id,
                });
            }
        }

        let routes = Self::build_routes(&points, || BASE_EMISSION_FACTOR);

        Ok(WorldModel {
            name: name.into(),
            depot_id,
            points,
            packages,
            routes,
        })
    }

    fn build_routes(points: &[Point], mut emission_factor: impl FnMut() -> f64) -> Vec<Route> {
        let n = points.len();
        let mut routes = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                routes.push(Route {
                    from: i,
                    to: j,
                    distance: distance(&points[i], &points[j]),
                    carbon_emission_factor: emission_factor(),
                });
            }
        }
        routes
    }

    #[inline]
    pub fn depot(&self) -> &Point {
        &self.points[self.depot_id]
    }

    #[inline]
    pub fn point(&self, id: usize) -> Option<&Point> {
        self.points.get(id)
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_packages(&self) -> usize {
        self.packages.len()
    }

    /// Look up the stored route between two distinct points, in either direction.
    pub fn route(&self, a: usize, b: usize) -> Option<&Route> {
        let n = self.points.len();
        if a == b || a >= n || b >= n {
            return None;
        }
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        // Rows 0..i hold (n-1) + (n-2) + ... + (n-i) edges
        let offset = i * (2 * n - i - 1) / 2;
        self.routes.get(offset + (j - i - 1))
    }

    pub fn statistics(&self) -> WorldStatistics {
        let total_weight: u64 = self.packages.iter().map(|p| p.weight as u64).sum();
        let total_value: u64 = self.packages.iter().map(|p| p.value as u64).sum();
        let total_carbon: f64 = self.packages.iter().map(|p| p.carbon_footprint).sum();

        let (avg_distance, max_distance, avg_emission_factor) = if self.routes.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let count = self.routes.len() as f64;
            (
                self.routes.iter().map(|r| r.distance).sum::<f64>() / count,
                self.routes.iter().map(|r| r.distance).fold(0.0, f64::max),
                self.routes.iter().map(|r| r.carbon_emission_factor).sum::<f64>() / count,
            )
        };

        WorldStatistics {
            name: self.name.clone(),
            num_points: self.points.len(),
            num_packages: self.packages.len(),
            num_routes: self.routes.len(),
            depot: self.depot().name.clone(),
            total_weight,
            total_value,
            total_carbon,
            avg_distance,
            max_distance,
            avg_emission_factor,
        }
    }

    /// Write the full pairwise route table as CSV.
    pub fn write_routes_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for route in &self.routes {
            writer.serialize(route)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn export_routes_csv<P: AsRef<Path>>(&self, path: P) -> csv::Result<()> {
        let file = File::create(path)?;
        self.write_routes_csv(file)
    }
}

/// Summary numbers about a world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldStatistics {
    pub name: String,
    pub num_points: usize,
    pub num_packages: usize,
    pub num_routes: usize,
    pub depot: String,
    pub total_weight: u64,
    pub total_value: u64,
    pub total_carbon: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub avg_emission_factor: f64,
}

impl std::fmt::Display for WorldStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "World: {}", self.name)?;
        writeln!(f, "  Points: {} (depot: {})", self.num_points, self.depot)?;
        writeln!(f, "  Packages: {}", self.num_packages)?;
        writeln!(f, "  Routes: {}", self.num_routes)?;
        writeln!(f, "  Total package weight: {}", self.total_weight)?;
        writeln!(f, "  Total package value: {}", self.total_value)?;
        writeln!(f, "  Total carbon footprint: {:.1}", self.total_carbon)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)?;
        writeln!(f, "  Avg emission factor: {:.3}", self.avg_emission_factor)
    }
}
