//! Reads a ranking problem from stdin and writes the ranked testing indices
//! to stdout, one per line. Set `RUST_LOG` for diagnostics on stderr.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use cprank::builder::RankerBuilder;
use cprank::errors::RankResult;
use cprank::io::{read_problem, write_ranking};

use log::{error, info};

fn run() -> RankResult<()> {
    let ranker = RankerBuilder::new().build();
    let alignment = ranker.config().stride_alignment;

    let problem = read_problem(io::stdin().lock(), alignment)?;
    let ranking = ranker.rank_records(
        &problem.training[..],
        &problem.testing[..],
        &problem.similarities,
    )?;

    info!("Writing {} ranked indices", ranking.len());
    write_ranking(BufWriter::new(io::stdout().lock()), &ranking)
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
