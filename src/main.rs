use std::fs;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use satplan::{
    encoding::Encoding,
    parser,
    search::{parallel, Algorithm, LogObserver, SearchParams, Solution},
    Result,
};

/// Search a DIMACS CNF formula for a satisfying assignment with WalkSat or GSat.
#[derive(Parser, Debug)]
#[command(name = "satplan", version)]
struct Args {
    /// The input cnf file
    input: PathBuf,

    /// Which solver to use
    #[arg(short, long, value_enum, default_value_t = Algorithm::WalkSat)]
    solver: Algorithm,

    /// The probability of a random walk occurring
    #[arg(short, long, default_value_t = 0.44)]
    probability: f64,

    /// The max number of flips to allow before a restart occurs
    #[arg(long, default_value_t = 1000)]
    max_flips: usize,

    /// The number of times to restart with a random assignment
    #[arg(long, default_value_t = 10000)]
    max_restarts: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of workers racing over the restart budget
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,

    /// Apply unit propagation and pure literal elimination first
    #[arg(long)]
    simplify: bool,

    /// Write the formula handed to the solver to this file
    #[arg(short = 'c', long)]
    output_cnf: Option<PathBuf>,

    /// Variable names, one per line, in variable order
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// How many leading variables are actions (defaults to all names)
    #[arg(short, long, requires = "names")]
    actions: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{}", err);
        eprintln!("Error: {err}");
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let params = SearchParams::new(args.probability, args.max_flips, args.max_restarts)?;
    let pristine = parser::load_file(&args.input)?;
    info!(
        "{} variables, {} clauses",
        pristine.variable_count(),
        pristine.clause_count()
    );

    // simplification is destructive, keep the loaded formula for the final check
    let mut cnf = pristine.clone();
    if args.simplify {
        let consistent = cnf.resolve_unit_clauses() && cnf.resolve_pure_literals();
        info!(
            "simplified to {} variables, {} active clauses",
            cnf.variable_count(),
            cnf.active_clause_count()
        );
        if !consistent {
            warn!("simplification reached a conflict");
            parser::write_solution(&mut std::io::stdout(), &Solution::Unknown)?;
            return Ok(());
        }
    }

    if let Some(path) = &args.output_cnf {
        parser::save_file(&cnf, path)?;
    }

    let found = if args.threads > 1 {
        parallel::solve(&cnf, args.solver, params, Some(args.threads), args.seed)
    } else {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        args.solver
            .solve(&cnf, &params, &mut rng, &mut LogObserver::default())
    };

    let solution = match found {
        Some(mut model) => {
            model.apply_partial(cnf.assignment());
            if pristine.check_assignment(&model) {
                Solution::Sat { model }
            } else {
                error!("model does not satisfy the input formula");
                Solution::Unknown
            }
        }
        None => Solution::Unknown,
    };

    parser::write_solution(&mut std::io::stdout(), &solution)?;

    match (&solution, &args.names) {
        (Solution::Sat { model }, Some(path)) => {
            let names = fs::read_to_string(path)?;
            let encoding = Encoding::new(names.lines().map(str::trim).filter(|l| !l.is_empty()));
            let action_count = args.actions.unwrap_or(encoding.len());
            for action in encoding.extract_plan(model, action_count) {
                println!("{action}");
            }
        }
        (Solution::Unknown, Some(_)) => println!("no plan found"),
        _ => {}
    }
    Ok(())
}
