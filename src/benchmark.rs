//! Benchmarking and experimentation.
//!
//! Runs the planner and the selector over many seeded worlds, collects
//! per-run results and summary statistics, and sweeps the selector over a
//! range of capacities. Results export to CSV.

use std::fs::File;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::{PlannerConfig, SelectorConfig, WorldConfig};
use crate::error::ConfigError;
use crate::heuristics::construction::NearestNeighborHeuristic;
use crate::plan::plan_deliveries;
use crate::selection::PackageSelector;
use crate::world::{Package, WorldModel};

/// Outcome of one seeded world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub seed: u64,
    pub num_points: usize,
    pub num_packages: usize,
    pub total_distance: f64,
    pub total_emission: f64,
    pub optimal_value: i64,
    pub num_chosen: usize,
    pub load_weight: usize,
    /// Wall time for planning and selection, in seconds
    pub time: f64,
}

/// Aggregates over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub num_runs: usize,
    pub avg_distance: f64,
    pub std_distance: f64,
    pub best_distance: f64,
    pub worst_distance: f64,
    pub avg_emission: f64,
    pub avg_value: f64,
    pub std_value: f64,
    pub best_value: i64,
    pub avg_load: f64,
    pub avg_time: f64,
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of worlds; seeds run from `world.seed` upwards
    pub num_runs: usize,
    pub world: WorldConfig,
    pub planner: PlannerConfig,
    pub selector: SelectorConfig,
    /// Spread runs over the rayon pool
    pub parallel: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 10,
            world: WorldConfig::default(),
            planner: PlannerConfig::default(),
            selector: SelectorConfig::default(),
            parallel: true,
            show_progress: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every seed, replacing previous results.
    pub fn run(&mut self) -> Result<(), ConfigError> {
        self.config.world.validate()?;

        let base = self.config.world.seed;
        let seeds: Vec<u64> = (0..self.config.num_runs as u64).map(|k| base.wrapping_add(k)).collect();

        log::info!(
            "Running benchmark: {} worlds of {} points / {} packages, capacity {}",
            seeds.len(),
            self.config.world.point_count,
            self.config.world.package_count,
            self.config.selector.capacity
        );

        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(seeds.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} worlds ({elapsed})") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let run_one = |&seed: &u64| {
            let result = self.run_single(seed);
            progress.inc(1);
            result
        };

        let mut results = if self.config.parallel {
            seeds.par_iter().map(run_one).collect::<Result<Vec<_>, _>>()?
        } else {
            seeds.iter().map(run_one).collect::<Result<Vec<_>, _>>()?
        };
        progress.finish_and_clear();

        results.sort_by_key(|r| r.seed);
        self.results = results;
        Ok(())
    }

    fn run_single(&self, seed: u64) -> Result<RunResult, ConfigError> {
        let world_config = WorldConfig { seed, ..self.config.world.clone() };
        let world = WorldModel::generate_seeded(&world_config)?;

        let planner = NearestNeighborHeuristic::with_config(&self.config.planner);
        let selector = PackageSelector::with_config(&self.config.selector);

        let start = std::time::Instant::now();
        let plan = plan_deliveries(&world, &planner, &selector, self.config.selector.capacity);
        let time = start.elapsed().as_secs_f64();

        Ok(RunResult {
            seed,
            num_points: world.num_points(),
            num_packages: world.num_packages(),
            total_distance: plan.tour.total_distance,
            total_emission: plan.tour.total_emission,
            optimal_value: plan.selection.optimal_value,
            num_chosen: plan.selection.chosen_ids.len(),
            load_weight: plan.selection.total_weight,
            time,
        })
    }

    /// Summary statistics, `None` before any run.
    pub fn compute_statistics(&self) -> Option<BenchmarkStatistics> {
        if self.results.is_empty() {
            return None;
        }

        let distances: Vec<f64> = self.results.iter().map(|r| r.total_distance).collect();
        let emissions: Vec<f64> = self.results.iter().map(|r| r.total_emission).collect();
        let values: Vec<f64> = self.results.iter().map(|r| r.optimal_value as f64).collect();
        let loads: Vec<f64> = self.results.iter().map(|r| r.load_weight as f64).collect();
        let times: Vec<f64> = self.results.iter().map(|r| r.time).collect();

        Some(BenchmarkStatistics {
            num_runs: self.results.len(),
            avg_distance: distances.iter().mean(),
            std_distance: distances.iter().population_std_dev(),
            best_distance: distances.iter().cloned().fold(f64::INFINITY, f64::min),
            worst_distance: distances.iter().cloned().fold(0.0, f64::max),
            avg_emission: emissions.iter().mean(),
            avg_value: values.iter().mean(),
            std_value: values.iter().population_std_dev(),
            best_value: self.results.iter().map(|r| r.optimal_value).fold(i64::MIN, i64::max),
            avg_load: loads.iter().mean(),
            avg_time: times.iter().mean(),
            total_time: times.iter().sum(),
        })
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export per-run results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> csv::Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     Delivery Planner Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        report.push_str(&format!(
            "World: {} points, {} packages | Capacity: {} | Objective: {:?}\n\n",
            self.config.world.point_count,
            self.config.world.package_count,
            self.config.selector.capacity,
            self.config.selector.objective
        ));

        let Some(stats) = self.compute_statistics() else {
            report.push_str("No runs recorded.\n");
            return report;
        };

        report.push_str(&format!("{:<20} {:>12} {:>12}\n", "Metric", "Mean", "Std"));
        report.push_str("-".repeat(46).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>12.2} {:>12.2}\n",
            "Distance", stats.avg_distance, stats.std_distance
        ));
        report.push_str(&format!("{:<20} {:>12.2} {:>12}\n", "Emission", stats.avg_emission, "-"));
        report.push_str(&format!(
            "{:<20} {:>12.2} {:>12.2}\n",
            "Package value", stats.avg_value, stats.std_value
        ));
        report.push_str(&format!("{:<20} {:>12.2} {:>12}\n", "Load weight", stats.avg_load, "-"));
        report.push_str("-".repeat(46).as_str());
        report.push('\n');

        report.push_str(&format!(
            "\nRuns: {} | Best distance: {:.2} | Worst distance: {:.2} | Best value: {}\n",
            stats.num_runs, stats.best_distance, stats.worst_distance, stats.best_value
        ));
        report.push_str(&format!(
            "Avg time: {:.6}s | Total time: {:.4}s\n",
            stats.avg_time, stats.total_time
        ));

        report
    }

    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

/// Selector outcome at one capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPoint {
    pub capacity: usize,
    pub optimal_value: i64,
    pub total_weight: usize,
    pub num_chosen: usize,
    pub time: f64,
}

/// Evaluate the selector at every capacity in `capacities`, in ascending order.
pub fn capacity_sweep(
    packages: &[Package],
    capacities: RangeInclusive<usize>,
    selector: &PackageSelector,
) -> Vec<SweepPoint> {
    let capacities: Vec<usize> = capacities.collect();
    log::debug!("Sweeping {} capacities over {} packages", capacities.len(), packages.len());

    capacities
        .par_iter()
        .map(|&capacity| {
            let selection = selector.select(packages, capacity);
            SweepPoint {
                capacity,
                optimal_value: selection.optimal_value,
                total_weight: selection.total_weight,
                num_chosen: selection.chosen_ids.len(),
                time: selection.computation_time,
            }
        })
        .collect()
}

pub fn write_sweep_csv<W: Write>(points: &[SweepPoint], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_sweep_csv<P: AsRef<Path>>(points: &[SweepPoint], path: P) -> csv::Result<()> {
    let file = File::create(path)?;
    write_sweep_csv(points, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::optimal_value;

    fn small_config(parallel: bool) -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs: 4,
            parallel,
            world: WorldConfig { point_count: 8, package_count: 10, seed: 100, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 10);
        assert!(config.parallel);
    }

    #[test]
    fn test_runs_one_result_per_seed() {
        let mut benchmark = Benchmark::new(small_config(true));
        benchmark.run().unwrap();

        let seeds: Vec<u64> = benchmark.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
        for result in benchmark.results() {
            assert_eq!(result.num_points, 8);
            assert_eq!(result.num_packages, 10);
            assert!(result.load_weight <= 50);
            assert!(result.total_distance > 0.0);
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let mut parallel = Benchmark::new(small_config(true));
        let mut sequential = Benchmark::new(small_config(false));
        parallel.run().unwrap();
        sequential.run().unwrap();

        for (a, b) in parallel.results().iter().zip(sequential.results()) {
            assert_eq!(a.seed, b.seed);
            assert_eq!(a.total_distance, b.total_distance);
            assert_eq!(a.optimal_value, b.optimal_value);
        }
    }

    #[test]
    fn test_seeds_wrap_at_u64_max() {
        let mut config = small_config(false);
        config.num_runs = 2;
        config.world.seed = u64::MAX;
        let mut benchmark = Benchmark::new(config);
        benchmark.run().unwrap();

        let seeds: Vec<u64> = benchmark.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![0, u64::MAX]);
    }

    #[test]
    fn test_invalid_world_is_reported() {
        let mut config = small_config(true);
        config.world.point_count = 0;
        let mut benchmark = Benchmark::new(config);
        assert!(matches!(benchmark.run(), Err(ConfigError::ZeroPoints)));
        assert!(benchmark.compute_statistics().is_none());
    }

    #[test]
    fn test_statistics_and_report() {
        let mut benchmark = Benchmark::new(small_config(true));
        benchmark.run().unwrap();
        let stats = benchmark.compute_statistics().unwrap();

        assert_eq!(stats.num_runs, 4);
        assert!(stats.best_distance <= stats.avg_distance + 1e-9);
        assert!(stats.avg_distance <= stats.worst_distance + 1e-9);
        assert!(stats.std_distance >= 0.0);

        let report = benchmark.generate_report();
        assert!(report.contains("Benchmark Report"));
        assert!(report.contains("Runs: 4"));
    }

    #[test]
    fn test_results_csv() {
        let mut benchmark = Benchmark::new(small_config(false));
        benchmark.run().unwrap();

        let mut buffer = Vec::new();
        benchmark.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("seed,num_points,num_packages,total_distance"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_capacity_sweep() {
        let world = WorldModel::generate_seeded(&WorldConfig::default()).unwrap();
        let points = capacity_sweep(&world.packages, 0..=60, &PackageSelector::new());

        assert_eq!(points.len(), 61);
        assert_eq!(points[0].optimal_value, 0);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.capacity, i);
            assert!(point.total_weight <= point.capacity);
            assert_eq!(point.optimal_value, optimal_value(&world.packages, i));
        }
        for pair in points.windows(2) {
            assert!(pair[1].optimal_value >= pair[0].optimal_value);
        }

        let mut buffer = Vec::new();
        write_sweep_csv(&points, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 62);
    }
}
