use std::path::PathBuf;

use clap::Parser;
use multidigraph_distance::distance::distance;
use multidigraph_distance::{io, logging, CliqueStrategy, Norm};

/// Distance of two multigraphs by the size of their maximum common subgraph
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// adjacency matrix file of the first graph
    #[clap(short, long, parse(from_os_str))]
    first: PathBuf,

    /// adjacency matrix file of the second graph
    #[clap(short = 'S', long, parse(from_os_str))]
    second: PathBuf,

    /// norm of the (vertices, edges) sizes
    #[clap(short, long, arg_enum, default_value = "l1")]
    norm: Norm,

    /// greedy cliques on the edge product graph
    #[clap(long)]
    approximate: bool,

    /// random seed for --approximate
    #[clap(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging()?;
    let args = Args::parse();

    let g1 = io::read_matrix_file(&args.first, true)?;
    let g2 = io::read_matrix_file(&args.second, true)?;
    let strategy = if args.approximate {
        CliqueStrategy::Approximate { seed: args.seed }
    } else {
        CliqueStrategy::default()
    };

    match distance(&g1, &g2, args.norm, &strategy) {
        Some(d) => println!("{} {}", d.value, d.search_time.as_secs_f64()),
        None => println!("nan"),
    }
    Ok(())
}
