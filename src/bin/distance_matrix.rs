use std::path::PathBuf;

use clap::Parser;
use multidigraph_distance::distance::distance;
use multidigraph_distance::{io, logging, CliqueStrategy, Multigraph, Norm};
use rayon::prelude::*;
use tracing::info;

/// Pairwise distances of multigraphs, one row per input file
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// adjacency matrix files
    #[clap(required = true, parse(from_os_str))]
    files: Vec<PathBuf>,

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

    let graphs = args
        .files
        .iter()
        .map(|f| io::read_matrix_file(f, true))
        .collect::<Result<Vec<Multigraph>, _>>()?;
    let strategy = if args.approximate {
        CliqueStrategy::Approximate { seed: args.seed }
    } else {
        CliqueStrategy::default()
    };

    let n = graphs.len();
    let mat: Vec<Vec<Option<f64>>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| distance(&graphs[i], &graphs[j], args.norm, &strategy).map(|d| d.value))
                .collect()
        })
        .collect();
    info!(graphs = n, "distance matrix computed");

    for row in mat {
        let row: Vec<String> = row
            .into_iter()
            .map(|d| d.map_or_else(|| "nan".to_owned(), |d| d.to_string()))
            .collect();
        println!("{}", row.join(" "));
    }
    Ok(())
}
