//! The maze as a finite deterministic Markov decision process.
//!
//! States are cells, actions are the legal moves out of a cell, every
//! transition yields a reward of -1 and the terminal cell has value 0 with no
//! outgoing transitions.

mod policy_iteration;
mod value_iteration;

use std::collections::HashSet;

pub use policy_iteration::policy_iteration;
pub use value_iteration::value_iteration;

use crate::error::{MazeError, SolveError};
use crate::maze::{Action, Grid, Maze, State};

/// Reward received for every transition.
pub const STEP_REWARD: f64 = -1.0;

/// Value of every state, row-major.
pub type ValueFunction = Grid<f64>;

/// Action committed to in every state. `None` at the terminal state.
pub type Policy = Grid<Option<Action>>;

/// Discounting and convergence parameters shared by both planners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MdpConfig {
    /// Discount factor, strictly between 0 and 1.
    pub gamma: f64,
    /// A sweep whose largest value change is below this ends a convergence loop.
    pub theta: f64,
    /// Upper bound on sweeps per run before giving up.
    pub max_sweeps: usize,
}

impl Default for MdpConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            theta: 1e-4,
            max_sweeps: 100_000,
        }
    }
}

impl MdpConfig {
    /// Slower discounting and a tighter threshold, for mazes with hundreds of cells.
    pub fn long_horizon() -> Self {
        Self {
            gamma: 0.99,
            theta: 1e-6,
            ..Self::default()
        }
    }

    /// Steps from the terminal state within which converged values still tell
    /// distances apart. Cells farther out than this share one value, so the
    /// greedy policy cannot find its way out of them.
    pub fn horizon(&self) -> usize {
        (self.theta.ln() / self.gamma.ln()).ceil() as usize
    }

    pub fn validate(&self) -> Result<(), MazeError> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(MazeError::InvalidDiscount(self.gamma));
        }
        if !(self.theta > 0.0 && self.theta.is_finite()) {
            return Err(MazeError::InvalidThreshold(self.theta));
        }
        if self.max_sweeps == 0 {
            return Err(MazeError::InvalidSweepLimit);
        }
        Ok(())
    }
}

/// Result of an MDP planner run.
#[derive(Debug, Clone, PartialEq)]
pub struct MdpOutcome {
    pub values: ValueFunction,
    pub policy: Policy,
    /// States visited by following the policy from the start.
    pub path: Vec<State>,
    /// Sweeps that changed the value function by at least theta.
    pub sweeps: usize,
    /// Policy improvement passes. Always 0 for value iteration.
    pub improvements: usize,
}

impl MdpOutcome {
    /// Outcome for a maze whose start is its terminal state: nothing to plan.
    fn trivial(maze: &Maze) -> Self {
        MdpOutcome {
            values: ValueFunction::new(maze.rows(), maze.cols(), 0.0),
            policy: Policy::new(maze.rows(), maze.cols(), None),
            path: vec![maze.start()],
            sweeps: 0,
            improvements: 0,
        }
    }
}

/// Q(s, a) for the deterministic move into `next`.
fn q_value(values: &ValueFunction, next: State, gamma: f64) -> f64 {
    STEP_REWARD + gamma * values[next]
}

/// The legal action with the highest Q-value and that value.
/// Ties go to the earliest action in [`Action::ALL`] order.
fn greedy_action(
    maze: &Maze,
    values: &ValueFunction,
    state: State,
    gamma: f64,
) -> Option<(Action, f64)> {
    maze.legal_actions(state)
        .map(|(action, next)| (action, q_value(values, next, gamma)))
        .fold(None, |best, (action, q)| match best {
            Some((_, best_q)) if q <= best_q => best,
            _ => Some((action, q)),
        })
}

/// Greedy policy with respect to `values`.
fn greedy_policy(maze: &Maze, values: &ValueFunction, gamma: f64) -> Policy {
    let terminal = maze.terminal();
    Policy::from_fn(maze.rows(), maze.cols(), |state| {
        if state == terminal {
            None
        } else {
            greedy_action(maze, values, state, gamma).map(|(action, _)| action)
        }
    })
}

/// Follows `policy` from the start state until the terminal state.
///
/// Fails if the policy has no action somewhere along the way, or leads back
/// into a state it already visited.
pub fn extract_policy_path(maze: &Maze, policy: &Policy) -> Result<Vec<State>, SolveError> {
    let terminal = maze.terminal();
    let mut state = maze.start();
    let mut path = vec![state];
    let mut seen = HashSet::from([state]);

    while state != terminal {
        let next = policy[state]
            .and_then(|action| action.apply(state))
            .filter(|&next| maze.is_in_bounds(next))
            .ok_or(SolveError::PolicyDeadEnd { state })?;
        if !seen.insert(next) {
            return Err(SolveError::PolicyCycle { state: next });
        }
        path.push(next);
        state = next;
    }
    Ok(path)
}
