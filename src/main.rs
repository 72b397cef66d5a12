use std::time::Instant;

use clap::{Parser, ValueEnum};
use mazeplan::{
    Config, Metrics, MetricsSink, Solver,
    generators::generate_seeded,
    solvers::{MdpConfig, StepObserver, solve_maze},
};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverArg {
    Dfs,
    Bfs,
    Astar,
    Policy,
    Value,
    All,
}

impl SolverArg {
    fn solvers(self) -> Vec<Solver> {
        match self {
            SolverArg::Dfs => vec![Solver::Dfs],
            SolverArg::Bfs => vec![Solver::Bfs],
            SolverArg::Astar => vec![Solver::AStar],
            SolverArg::Policy => vec![Solver::PolicyIteration],
            SolverArg::Value => vec![Solver::ValueIteration],
            SolverArg::All => Solver::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of maze rows
    #[clap(short, long, default_value_t = Config::default().rows)]
    rows: usize,

    /// Number of maze columns
    #[clap(short, long, default_value_t = Config::default().cols)]
    cols: usize,

    /// Seed for maze generation (random when omitted)
    #[clap(short, long)]
    seed: Option<u64>,

    /// Discount factor for the MDP planners
    #[clap(long, default_value_t = Config::default().mdp.gamma)]
    gamma: f64,

    /// Convergence threshold for the MDP planners
    #[clap(long, default_value_t = Config::default().mdp.theta)]
    theta: f64,

    /// Sweep ceiling for the MDP planners
    #[clap(long, default_value_t = Config::default().mdp.max_sweeps)]
    max_sweeps: usize,

    /// Which solver to run
    #[clap(long, value_enum, default_value_t = SolverArg::All)]
    solver: SolverArg,

    /// Draw the maze with each solution path
    #[clap(long)]
    show: bool,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(writer)
        .init();

    let config = Config {
        rows: args.rows,
        cols: args.cols,
        seed: args.seed,
        mdp: MdpConfig {
            gamma: args.gamma,
            theta: args.theta,
            max_sweeps: args.max_sweeps,
        },
    };
    config.validate()?;

    let maze = generate_seeded(config.rows, config.cols, config.seed)?;
    tracing::info!(
        "Generated a {}x{} maze with {} passages",
        maze.rows(),
        maze.cols(),
        maze.open_passages()
    );
    if args.show {
        println!("{}", maze);
    }

    let horizon = config.mdp.horizon();
    if maze.len() > horizon && args.solver.solvers().iter().any(|s| s.is_mdp()) {
        tracing::warn!(
            "gamma {} and theta {} only separate cells within {} steps of the goal, \
             the MDP planners may not find a path through {} cells",
            config.mdp.gamma,
            config.mdp.theta,
            horizon,
            maze.len()
        );
    }

    let mut records: Vec<Metrics> = Vec::new();
    for solver in args.solver.solvers() {
        let started = Instant::now();
        match solve_maze(&maze, solver, &config.mdp, StepObserver::none()) {
            Ok(solution) => {
                let elapsed = started.elapsed();
                println!(
                    "{} time={:.3}ms",
                    solution.metrics,
                    elapsed.as_secs_f64() * 1000.0
                );
                if args.show {
                    println!("{}", maze.render_path(&solution.path));
                }
                records.record(&solution.metrics);
            }
            Err(err) => {
                tracing::warn!("{} failed: {}", solver, err);
                eprintln!("{}: {}", solver.id(), err);
            }
        }
    }

    if let Some(shortest) = records.iter().map(|m| m.steps_taken).min() {
        let optimal = records
            .iter()
            .filter(|m| m.steps_taken == shortest)
            .map(|m| m.algorithm.id())
            .collect::<Vec<_>>();
        tracing::info!("Shortest path has {} cells, found by {}", shortest, optimal.join(", "));
    }
    Ok(())
}
