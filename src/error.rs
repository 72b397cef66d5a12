use thiserror::Error;

use crate::maze::State;
use crate::solvers::Solver;

/// Rejected configuration: maze dimensions or planner parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MazeError {
    #[error("invalid maze dimensions {rows}x{cols}: rows and columns must be at least 1")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("invalid discount factor {0}: must lie strictly between 0 and 1")]
    InvalidDiscount(f64),
    #[error("invalid convergence threshold {0}: must be a positive finite number")]
    InvalidThreshold(f64),
    #[error("the sweep limit must be at least 1")]
    InvalidSweepLimit,
}

/// Failure of a single solver run. The maze itself is never affected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("{algorithm}: frontier exhausted without reaching the goal")]
    NoPathFound { algorithm: Solver },
    #[error("{algorithm}: no convergence after {sweeps} sweeps")]
    NonConvergence { algorithm: Solver, sweeps: usize },
    #[error("policy has no action at {state:?} before reaching the terminal state")]
    PolicyDeadEnd { state: State },
    #[error("policy revisits {state:?} and never reaches the terminal state")]
    PolicyCycle { state: State },
}
