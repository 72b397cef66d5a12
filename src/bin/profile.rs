use std::collections::HashMap;
use std::time::{Duration, Instant};

use clap::Parser;
use mazeplan::{
    Solver,
    generators::generate_seeded,
    solvers::{MdpConfig, StepObserver, solve_maze},
};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Time every solver over a batch of seeded mazes", long_about = None)]
struct Args {
    /// Number of mazes to generate and solve
    #[clap(default_value_t = 10)]
    iterations: u64,

    /// Side length of the square mazes
    #[clap(short, long, default_value_t = 12)]
    size: usize,

    /// Directory for the log file
    #[clap(long, default_value = "logs")]
    log_dir: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let file_appender = tracing_appender::rolling::never(&args.log_dir, "profile.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(writer)
        .init();

    let mdp = MdpConfig {
        max_sweeps: 10_000_000,
        ..MdpConfig::long_horizon()
    };
    if args.size * args.size > mdp.horizon() {
        tracing::warn!(
            "[profile] {}x{} mazes exceed the MDP horizon of {} steps",
            args.size,
            args.size,
            mdp.horizon()
        );
    }
    mdp.validate()?;

    let mut totals: HashMap<Solver, (Duration, usize)> = HashMap::new();
    let mut failures = 0usize;

    for seed in 0..args.iterations {
        let maze = generate_seeded(args.size, args.size, Some(seed))?;
        for solver in Solver::ALL {
            let started = Instant::now();
            let result = solve_maze(&maze, solver, &mdp, StepObserver::none());
            let elapsed = started.elapsed();
            match result {
                Ok(solution) => {
                    tracing::info!("[profile] seed {} {} in {:?}", seed, solution.metrics, elapsed);
                    let entry = totals.entry(solver).or_default();
                    entry.0 += elapsed;
                    entry.1 += 1;
                }
                Err(err) => {
                    tracing::warn!("[profile] seed {} {} failed: {}", seed, solver.id(), err);
                    failures += 1;
                }
            }
        }
    }

    for solver in Solver::ALL {
        match totals.get(&solver) {
            Some(&(total, runs)) if runs > 0 => {
                println!("{:<6} runs={} mean={:?}", solver.id(), runs, total / runs as u32)
            }
            _ => println!("{:<6} no successful runs", solver.id()),
        }
    }
    if failures > 0 {
        println!("{} runs failed, see {}/profile.log", failures, args.log_dir);
    }
    Ok(())
}
