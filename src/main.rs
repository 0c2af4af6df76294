use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use delivery_routing::{
    AstarSolver, DeliveryMap, GreedySolver, MapGenerator, Point, RouteSolver, SearchOutcome,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::LevelFilter;

/// Plans a delivery from a restaurant to a customer with A* and greedy best-first search and
/// compares the two.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Load the map from this file instead of generating one
    #[arg(short, long)]
    map: Option<PathBuf>,

    #[arg(long, default_value_t = 15)]
    width: usize,

    #[arg(long, default_value_t = 15)]
    height: usize,

    /// Seed for the map generator (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 3)]
    restaurants: usize,

    #[arg(long, default_value_t = 5)]
    customers: usize,

    #[arg(long, default_value_t = 8)]
    traffic: usize,

    #[arg(long, default_value_t = 10)]
    obstacles: usize,

    /// Restaurant to start from (defaults to the first one)
    #[arg(long)]
    restaurant: Option<String>,

    /// Customer to deliver to (defaults to the first one)
    #[arg(long)]
    customer: Option<String>,

    #[arg(short, long)]
    debug: bool,
}

fn load_map(cli: &Cli) -> anyhow::Result<DeliveryMap> {
    if let Some(path) = &cli.map {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read map file {}", path.display()))?;
        return text
            .parse()
            .with_context(|| format!("could not parse map file {}", path.display()));
    }
    let generator = MapGenerator {
        restaurants: cli.restaurants,
        customers: cli.customers,
        traffic: cli.traffic,
        obstacles: cli.obstacles,
        ..MapGenerator::default()
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(generator.generate(cli.width, cli.height, &mut rng)?)
}

fn pick_site<'a>(
    mut sites: impl Iterator<Item = (&'a str, Point)>,
    wanted: Option<&str>,
    kind: &str,
) -> anyhow::Result<(String, Point)> {
    let site = match wanted {
        Some(name) => sites.find(|(site, _)| *site == name),
        None => sites.next(),
    };
    site.map(|(name, p)| (name.to_owned(), p))
        .ok_or_else(|| anyhow!("no {} {} on the map", kind, wanted.unwrap_or_default()))
}

fn report(map: &DeliveryMap, solver: &dyn RouteSolver, outcome: &SearchOutcome) {
    match &outcome.route {
        Some(route) => {
            println!(
                "{} found a route of {} cells at cost {}.",
                solver.name(),
                route.path.len(),
                route.cost
            );
            println!("Visited nodes: {}", outcome.visited);
            println!("Elapsed time: {:.2?}", outcome.elapsed);
            println!("\nMap with the {} route:", solver.name());
            println!("{}", map.render(Some(&route.path)));
        }
        None => {
            println!("{} found no route.", solver.name());
            println!("Visited nodes: {}", outcome.visited);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .init();

    let map = load_map(&cli)?;
    let (restaurant, start) = pick_site(map.restaurants(), cli.restaurant.as_deref(), "restaurant")?;
    let (customer, goal) = pick_site(map.customers(), cli.customer.as_deref(), "customer")?;
    if map.unreachable(&start, &goal) {
        info!("{} at {:?} cannot reach {} at {:?}", restaurant, start, customer, goal);
    }

    println!("Delivery from restaurant {} to customer {}", restaurant, customer);
    println!("Restaurant position: {:?}", start);
    println!("Customer position: {:?}", goal);
    println!("\nCity map:");
    println!("{}", map.render(None));

    let astar = AstarSolver::new();
    let greedy = GreedySolver;
    let mut outcomes = Vec::new();
    for solver in [&astar as &dyn RouteSolver, &greedy] {
        println!("\nSearching a route with {}...", solver.name());
        let outcome = solver.search(&map, start, goal)?;
        report(&map, solver, &outcome);
        outcomes.push((solver.name(), outcome));
    }

    println!("\nComparison:");
    for (name, outcome) in &outcomes {
        match &outcome.route {
            Some(route) => println!(
                "{:>5}: {} cells, cost {}, {} visited, {:.2?}",
                name,
                route.path.len(),
                route.cost,
                outcome.visited,
                outcome.elapsed
            ),
            None => println!(
                "{:>5}: no route, {} visited, {:.2?}",
                name, outcome.visited, outcome.elapsed
            ),
        }
    }
    Ok(())
}
