use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use multidigraph_distance::{io, logging, maximum_common_subgraphs, CliqueStrategy};

/// Maximum common edge-subgraphs of two multigraphs
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// adjacency matrix file of the first graph
    #[clap(short, long, parse(from_os_str))]
    first: PathBuf,

    /// adjacency matrix file of the second graph
    #[clap(short = 'S', long, parse(from_os_str))]
    second: PathBuf,

    /// greedy cliques on the edge product graph
    #[clap(long)]
    approximate: bool,

    /// random seed for --approximate
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// write each result as <k>.dot into this directory
    #[clap(long, parse(from_os_str))]
    dot_dir: Option<PathBuf>,
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

    let search = maximum_common_subgraphs(&g1, &g2, &strategy);
    println!("clique search: {:?}", search.clique_time);
    let Some(subgraphs) = search.subgraphs else {
        println!("no common subgraph");
        return Ok(());
    };

    if let Some(dir) = &args.dot_dir {
        std::fs::create_dir_all(dir)?;
    }
    for (k, s) in subgraphs.iter().enumerate() {
        let (nnodes, nedges) = s.size();
        println!("# {k}: {nnodes} vertices, {nedges} edges");
        for c in s.correspondence() {
            println!("{} {} {}", c.local, c.first, c.second);
        }
        println!("{}", s.subgraph().adjacency());
        if let Some(dir) = &args.dot_dir {
            let mut out = BufWriter::new(File::create(dir.join(format!("{k}.dot")))?);
            io::write_dot(&mut out, s.subgraph())?;
        }
    }
    Ok(())
}
