//! Delivery Planner - Command Line Interface
//!
//! Generates a delivery map, plans the van's loop and picks the parcels to load.

use clap::{Args, Parser, Subcommand, ValueEnum};
use delivery_planner::benchmark::{capacity_sweep, export_sweep_csv, Benchmark, BenchmarkConfig};
use delivery_planner::config::AppConfig;
use delivery_planner::heuristics::construction::*;
use delivery_planner::plan::plan_deliveries;
use delivery_planner::selection::PackageSelector;
use delivery_planner::world::WorldModel;

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Coordinate units per displayed kilometre
const KM_SCALE: f64 = 10.0;

#[derive(Parser)]
#[command(name = "delivery-planner")]
#[command(version = "1.0")]
#[command(about = "Nearest-neighbour delivery routing and carbon-aware package selection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a route and a package load for one world
    Plan {
        #[command(flatten)]
        world: WorldArgs,

        /// Write the plan as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Describe a generated world
    Analyze {
        #[command(flatten)]
        world: WorldArgs,

        /// Export the pairwise route table as CSV
        #[arg(long)]
        routes: Option<PathBuf>,
    },

    /// Evaluate the package selector over a range of capacities
    Sweep {
        #[command(flatten)]
        world: WorldArgs,

        /// Largest capacity to evaluate
        #[arg(long, default_value = "100")]
        max_capacity: usize,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plan many seeded worlds and summarise the results
    Benchmark {
        #[command(flatten)]
        world: WorldArgs,

        /// Number of worlds (seeds count up from --seed)
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Run worlds one after another
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Args)]
struct WorldArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of delivery points, depot included
    #[arg(long)]
    points: Option<usize>,

    /// Number of packages
    #[arg(long)]
    packages: Option<usize>,

    /// Index of the depot point
    #[arg(long)]
    depot: Option<usize>,

    /// Vehicle weight capacity
    #[arg(long)]
    capacity: Option<usize>,

    /// Package scoring
    #[arg(long, value_enum)]
    objective: Option<Objective>,

    /// Lift the point and package ceilings
    #[arg(long)]
    no_limits: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Objective {
    /// value - floor(carbon * 10)
    NetValue,
    /// value * priority - floor(carbon * 10)
    PriorityWeighted,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { world, output, verbose } => {
            plan(&world, output, verbose);
        }

        Commands::Analyze { world, routes } => {
            analyze(&world, routes);
        }

        Commands::Sweep { world, max_capacity, output } => {
            sweep(&world, max_capacity, output);
        }

        Commands::Benchmark { world, runs, output, sequential } => {
            run_benchmark(&world, runs, &output, sequential);
        }
    }
}

/// Merge the optional config file with command-line overrides.
fn load_config(args: &WorldArgs) -> AppConfig {
    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration from {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(points) = args.points {
        config.world.point_count = points;
    }
    if let Some(packages) = args.packages {
        config.world.package_count = packages;
    }
    if let Some(depot) = args.depot {
        config.world.depot_index = depot;
    }
    if let Some(capacity) = args.capacity {
        config.selector.capacity = capacity;
    }
    if let Some(objective) = args.objective {
        config.selector.objective = match objective {
            Objective::NetValue => delivery_planner::Objective::NetValue,
            Objective::PriorityWeighted => delivery_planner::Objective::PriorityWeighted,
        };
    }
    if args.no_limits {
        config.world.max_points = None;
        config.world.max_packages = None;
    }

    config
}

fn generate_world(config: &AppConfig) -> WorldModel {
    match WorldModel::generate_seeded(&config.world) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("Error generating world: {}", e);
            std::process::exit(1);
        }
    }
}

fn plan(args: &WorldArgs, output: Option<PathBuf>, verbose: bool) {
    let config = load_config(args);
    let world = generate_world(&config);

    if verbose {
        println!("{}", world.statistics());
        println!("Objective: {:?}", config.selector.objective);
    }

    let planner = NearestNeighborHeuristic::with_config(&config.planner);
    let selector = PackageSelector::with_config(&config.selector);

    let start = Instant::now();
    let plan = plan_deliveries(&world, &planner, &selector, config.selector.capacity);
    let elapsed = start.elapsed();

    println!("========== Results ==========");
    println!(
        "Route calculated! Distance: {:.1} km | Emissions: {:.2} kg CO2 | Package Value: {}",
        plan.tour.total_distance / KM_SCALE,
        plan.tour.total_emission / KM_SCALE,
        plan.selection.optimal_value
    );
    println!(
        "Packages: {} chosen, {}/{} kg loaded",
        plan.selection.chosen_ids.len(),
        plan.selection.total_weight,
        config.selector.capacity
    );
    println!("Time: {:.4}s", elapsed.as_secs_f64());

    if verbose {
        println!("\nRoute:");
        for (step, &id) in plan.tour.order.iter().enumerate() {
            println!("  {:>2}. {}", step + 1, world.points[id].name);
        }
        println!("  {:>2}. {} (return)", plan.tour.order.len() + 1, world.depot().name);

        println!("\nLoad:");
        println!(
            "  {:>4} {:>6} {:>6} {:>8} {:>7} {:>5}  Destination",
            "Id", "Weight", "Value", "Priority", "Carbon", "Net"
        );
        let chosen = world
            .packages
            .iter()
            .filter(|p| plan.selection.chosen_ids.contains(&p.id));
        for package in chosen {
            println!(
                "  {:>4} {:>6} {:>6} {:>8} {:>7.1} {:>5}  {}",
                package.id,
                package.weight,
                package.value,
                package.priority,
                package.carbon_footprint,
                selector.objective.net_value(package),
                world.points[package.destination_id].name
            );
        }
    }

    if let Some(out_path) = output {
        let json = match serde_json::to_string_pretty(&plan) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing plan: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&out_path, json) {
            eprintln!("Error writing {:?}: {}", out_path, e);
            std::process::exit(1);
        }
        println!("\nPlan saved to {:?}", out_path);
    }
}

fn analyze(args: &WorldArgs, routes: Option<PathBuf>) {
    let config = load_config(args);
    let world = generate_world(&config);

    println!("========== World Analysis ==========\n");
    println!("{}", world.statistics());

    println!("Points:");
    for point in &world.points {
        println!(
            "  {:>2} {:<22} ({:>6.1}, {:>6.1}) parcels: {}{}",
            point.id,
            point.name,
            point.x,
            point.y,
            point.package_count,
            if point.is_depot { " [depot]" } else { "" }
        );
    }

    let per_stop: Vec<usize> = (0..world.num_points())
        .map(|id| world.packages.iter().filter(|p| p.destination_id == id).count())
        .collect();
    let busiest = per_stop
        .iter()
        .enumerate()
        .max_by_key(|&(_, count)| *count)
        .map(|(id, count)| (world.points[id].name.as_str(), *count));
    if let Some((name, count)) = busiest {
        println!("\nBusiest destination: {} ({} packages)", name, count);
    }

    let tour = NearestNeighborHeuristic::with_config(&config.planner).construct(&world);
    println!("\nQuick Estimates:");
    println!(
        "  Nearest Neighbor loop: {:.1} km, {:.2} kg CO2",
        tour.total_distance / KM_SCALE,
        tour.total_emission / KM_SCALE
    );

    if let Some(path) = routes {
        match world.export_routes_csv(&path) {
            Ok(()) => println!("\nRoute table exported to {:?}", path),
            Err(e) => {
                eprintln!("Error exporting routes: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn sweep(args: &WorldArgs, max_capacity: usize, output: Option<PathBuf>) {
    let config = load_config(args);
    let world = generate_world(&config);
    let selector = PackageSelector::with_config(&config.selector);

    println!(
        "Sweeping capacities 0..={} over {} packages ({:?})...\n",
        max_capacity,
        world.num_packages(),
        selector.objective
    );

    let points = capacity_sweep(&world.packages, 0..=max_capacity, &selector);

    println!("{:>8} {:>10} {:>8} {:>8}", "Capacity", "Value", "Weight", "Chosen");
    println!("{}", "-".repeat(38));
    for point in &points {
        println!(
            "{:>8} {:>10} {:>8} {:>8}",
            point.capacity, point.optimal_value, point.total_weight, point.num_chosen
        );
    }

    if let Some(out_path) = output {
        if let Err(e) = export_sweep_csv(&points, &out_path) {
            eprintln!("Error exporting sweep: {}", e);
            std::process::exit(1);
        }
        println!("\nSweep exported to {:?}", out_path);
    }
}

fn run_benchmark(args: &WorldArgs, runs: usize, output: &Path, sequential: bool) {
    let config = load_config(args);

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Error creating output directory {:?}: {}", output, e);
        std::process::exit(1);
    }

    let bench_config = BenchmarkConfig {
        num_runs: runs,
        world: config.world,
        planner: config.planner,
        selector: config.selector,
        parallel: !sequential,
        show_progress: true,
    };

    let mut benchmark = Benchmark::new(bench_config);
    if let Err(e) = benchmark.run() {
        eprintln!("Benchmark failed: {}", e);
        std::process::exit(1);
    }

    let results_path = output.join("results.csv");
    if let Err(e) = benchmark.export_to_csv(&results_path) {
        eprintln!("Error exporting results: {}", e);
        std::process::exit(1);
    }
    println!("Results exported to {:?}", results_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    if let Err(e) = std::fs::write(&report_path, &report) {
        eprintln!("Error saving report: {}", e);
        std::process::exit(1);
    }
    println!("Report saved to {:?}", report_path);
}
