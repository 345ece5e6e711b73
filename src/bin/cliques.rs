use std::path::PathBuf;

use clap::Parser;
use multidigraph_distance::{io, logging};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;

/// Cliques of the graph formed by the mutual edges of a multigraph
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// adjacency matrix file
    #[clap(short, long, parse(from_os_str))]
    input: PathBuf,

    /// only the cliques with most vertices, then most edges
    #[clap(long)]
    maximum: bool,

    /// one greedy clique per vertex instead of all maximal cliques
    #[clap(long)]
    approximate: bool,

    /// random seed for --approximate
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// keep vertices without any edge
    #[clap(long)]
    keep_isolated: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging()?;
    let args = Args::parse();

    let g = io::read_matrix_file(&args.input, !args.keep_isolated)?;
    let mut rng = Xoshiro256StarStar::seed_from_u64(args.seed);
    let cliques = match (args.maximum, args.approximate) {
        (false, false) => g.maximal_cliques(),
        (true, false) => g.maximum_cliques()?,
        (false, true) => g.approximate_maximal_cliques(&mut rng),
        (true, true) => g.approximate_maximum_cliques(&mut rng)?,
    };
    info!(count = cliques.len(), "cliques found");

    for c in &cliques {
        let line: Vec<String> = c.iter().map(|v| v.to_string()).collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}
