use exact_td::exact::CardinalityEncoding;
use exact_td::graph::{BaseGraph, HashMapGraph};
use exact_td::io::{PaceReader, PaceWriter};
use exact_td::log::build_pace_logger_for_verbosity;
use exact_td::progress::WriterProgress;
use exact_td::Solver;
use log::{error, info};
use std::sync::Arc;
use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{stdin, stdout, BufReader};
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "exact-td-cli",
    about = "Computes minimum-width tree decompositions for a given input graph."
)]
struct Opt {
    /// Input file, using the graph format of the PACE challenge.
    /// `stdin` if not specified.
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Output file. `stdout` if not specified.
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Only compute upper bounds, refined by local search.
    #[structopt(short, long)]
    heuristic: bool,

    /// Solve connected components in parallel.
    #[structopt(short, long)]
    parallel: bool,

    /// Seed for all randomized heuristics.
    #[structopt(short, long)]
    seed: Option<u64>,

    /// Time budget in seconds for local search and for the exact solver.
    #[structopt(short, long)]
    timeout: Option<u64>,

    /// At-most-k encoding of the SAT solver: `binomial` or `sequential`.
    #[structopt(short, long, default_value = "sequential")]
    encoding: CardinalityEncoding,

    /// Verbosity, repeat for more output.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();
    build_pace_logger_for_verbosity(opt.verbose);

    #[cfg(feature = "handle-ctrlc")]
    exact_td::signals::initialize()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let graph: HashMapGraph = match opt.input.as_ref() {
        Some(path) => {
            let file = File::open(path)?;
            let reader = PaceReader(BufReader::new(file));
            HashMapGraph::try_from(reader)?
        }
        None => {
            let stdin = stdin();
            let reader = PaceReader(stdin.lock());
            HashMapGraph::try_from(reader)?
        }
    };
    info!(
        "read graph with {} vertices and {} edges",
        graph.order(),
        graph.size()
    );

    let timeout = opt.timeout.map(Duration::from_secs);
    let solver = if opt.heuristic {
        info!("running in heuristic mode");
        let status = WriterProgress::new(stdout());
        Solver::default_heuristic().progress(Some(Arc::new(status)))
    } else {
        info!("running in exact mode");
        Solver::default_exact()
    }
    .parallel(opt.parallel)
    .seed(opt.seed)
    .local_search_timeout(timeout)
    .exact_timeout(timeout)
    .cardinality_encoding(opt.encoding);

    let td = solver.solve(&graph).map_err(|e| {
        error!("{}", e);
        io::Error::from(e)
    })?;

    match opt.output {
        Some(path) => {
            let writer = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            PaceWriter::new(&td, &graph, writer).output()
        }
        None => {
            let writer = stdout();
            PaceWriter::new(&td, &graph, writer.lock()).output()
        }
    }
}
