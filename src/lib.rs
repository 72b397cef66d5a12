pub mod config;
pub mod error;
pub mod generators;
pub mod maze;
pub mod solvers;

pub use config::Config;
pub use error::{MazeError, SolveError};
pub use maze::{Action, Maze, State};
pub use solvers::{Metrics, MetricsSink, Solution, Solver, solve_maze};
