use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::Sender;

mod astar;
mod bfs;
mod dfs;
pub mod mdp;

pub use astar::solve_astar;
pub use bfs::solve_bfs;
pub use dfs::solve_dfs;
pub use mdp::{MdpConfig, MdpOutcome, policy_iteration, value_iteration};

use crate::error::SolveError;
use crate::maze::{Maze, State};

/// The planning strategies that can be run against a maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Dfs,
    Bfs,
    AStar,
    PolicyIteration,
    ValueIteration,
}

impl Solver {
    pub const ALL: [Solver; 5] = [
        Solver::Dfs,
        Solver::Bfs,
        Solver::AStar,
        Solver::PolicyIteration,
        Solver::ValueIteration,
    ];

    /// Short identifier used in metrics records.
    pub fn id(self) -> &'static str {
        match self {
            Solver::Dfs => "DFS",
            Solver::Bfs => "BFS",
            Solver::AStar => "ASTAR",
            Solver::PolicyIteration => "POLICY",
            Solver::ValueIteration => "VALUE",
        }
    }

    /// Whether this solver plans over discounted values rather than searching.
    pub fn is_mdp(self) -> bool {
        matches!(self, Solver::PolicyIteration | Solver::ValueIteration)
    }

    /// What [`Metrics::primary`] counts for this solver.
    pub fn primary_label(self) -> &'static str {
        match self {
            Solver::Dfs | Solver::Bfs | Solver::AStar => "nodes_expanded",
            Solver::PolicyIteration => "policy_improvements",
            Solver::ValueIteration => "sweeps",
        }
    }

    /// What [`Metrics::secondary`] counts for this solver, if anything.
    pub fn secondary_label(self) -> Option<&'static str> {
        match self {
            Solver::Dfs | Solver::Bfs | Solver::AStar => Some("max_frontier_size"),
            Solver::PolicyIteration => Some("evaluation_sweeps"),
            Solver::ValueIteration => None,
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::PolicyIteration => write!(f, "Policy Iteration"),
            Solver::ValueIteration => write!(f, "Value Iteration"),
        }
    }
}

/// Uniform performance record produced by every solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub algorithm: Solver,
    pub rows: usize,
    pub cols: usize,
    /// Number of cells on the returned path, start and goal included.
    pub steps_taken: usize,
    /// Nodes expanded (search), sweeps (value iteration) or improvement passes (policy iteration).
    pub primary: usize,
    /// Max frontier size (search), 0 (value iteration) or total evaluation sweeps (policy iteration).
    pub secondary: usize,
}

impl Metrics {
    /// Maze dimensions as `"{rows}x{cols}"`.
    pub fn maze_size(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} {:>7} steps={} {}={}",
            self.algorithm.id(),
            self.maze_size(),
            self.steps_taken,
            self.algorithm.primary_label(),
            self.primary
        )?;
        // Value iteration has no second counter
        if let Some(label) = self.algorithm.secondary_label() {
            write!(f, " {}={}", label, self.secondary)?;
        }
        Ok(())
    }
}

/// Receives one [`Metrics`] record per completed run.
pub trait MetricsSink {
    fn record(&mut self, metrics: &Metrics);
}

impl MetricsSink for Vec<Metrics> {
    fn record(&mut self, metrics: &Metrics) {
        self.push(metrics.clone());
    }
}

/// A completed run: the path from start to goal and its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub path: Vec<State>,
    pub metrics: Metrics,
}

/// Result of a graph search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Vec<State>,
    pub nodes_expanded: usize,
    pub max_frontier_size: usize,
}

/// Discrete steps a solver reports while it runs, for animation.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverEvent {
    /// A state was popped from the frontier. `frontier` is what remains queued.
    Expanded {
        algorithm: Solver,
        current: State,
        frontier: Vec<State>,
    },
    /// A full sweep over the value function finished. `values` is row-major.
    Sweep {
        algorithm: Solver,
        sweep: usize,
        delta: f64,
        values: Vec<f64>,
    },
    PathFound {
        algorithm: Solver,
        path: Vec<State>,
    },
}

/// Optional sink for [`SolverEvent`]s. Events are only built when a sender is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepObserver<'a> {
    sender: Option<&'a Sender<SolverEvent>>,
}

impl<'a> StepObserver<'a> {
    pub fn new(sender: &'a Sender<SolverEvent>) -> Self {
        StepObserver {
            sender: Some(sender),
        }
    }

    pub fn none() -> Self {
        StepObserver { sender: None }
    }

    pub(crate) fn emit(&self, event: impl FnOnce() -> SolverEvent) {
        if let Some(sender) = self.sender {
            // A dropped receiver just means nobody is watching anymore
            let _ = sender.send(event());
        }
    }
}

/// Walks the predecessor map back from `goal` to `start`.
/// Returns `None` if the chain is broken before reaching `start`.
pub(crate) fn reconstruct_path(
    came_from: &HashMap<State, State>,
    start: State,
    goal: State,
) -> Option<Vec<State>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = *came_from.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Runs `solver` from the maze's start to its terminal state.
pub fn solve_maze(
    maze: &Maze,
    solver: Solver,
    mdp_config: &MdpConfig,
    observer: StepObserver<'_>,
) -> Result<Solution, SolveError> {
    let start = maze.start();
    let goal = maze.terminal();

    let (path, primary, secondary) = match solver {
        Solver::Dfs | Solver::Bfs | Solver::AStar => {
            let outcome = match solver {
                Solver::Dfs => solve_dfs(maze, start, goal, observer)?,
                Solver::Bfs => solve_bfs(maze, start, goal, observer)?,
                _ => solve_astar(maze, start, goal, observer)?,
            };
            (
                outcome.path,
                outcome.nodes_expanded,
                outcome.max_frontier_size,
            )
        }
        Solver::PolicyIteration => {
            let outcome = policy_iteration(maze, mdp_config, observer)?;
            (outcome.path, outcome.improvements, outcome.sweeps)
        }
        Solver::ValueIteration => {
            let outcome = value_iteration(maze, mdp_config, observer)?;
            (outcome.path, outcome.sweeps, 0)
        }
    };

    let metrics = Metrics {
        algorithm: solver,
        rows: maze.rows(),
        cols: maze.cols(),
        steps_taken: path.len(),
        primary,
        secondary,
    };
    tracing::debug!("[solver] {}", metrics);
    Ok(Solution { path, metrics })
}

/// Runs every solver on the same maze and hands each record to `sink`.
/// Stops at the first failing run.
pub fn compare_solvers(
    maze: &Maze,
    mdp_config: &MdpConfig,
    sink: &mut impl MetricsSink,
) -> Result<Vec<Solution>, SolveError> {
    Solver::ALL
        .into_iter()
        .map(|solver| {
            let solution = solve_maze(maze, solver, mdp_config, StepObserver::none())?;
            sink.record(&solution.metrics);
            Ok(solution)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::generators::{generate_maze, generate_seeded, tests::ZeroRng};

    fn run(maze: &Maze, solver: Solver) -> Solution {
        solve_maze(maze, solver, &MdpConfig::default(), StepObserver::none()).unwrap()
    }

    fn assert_valid_path(maze: &Maze, path: &[State]) {
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.terminal()));
        for pair in path.windows(2) {
            assert!(
                maze.successors(pair[0]).any(|s| s == pair[1]),
                "{:?} -> {:?} is not a legal move",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_reconstruct_path() {
        let came_from = HashMap::from([((0, 1), (0, 0)), ((1, 1), (0, 1))]);
        assert_eq!(
            reconstruct_path(&came_from, (0, 0), (1, 1)),
            Some(vec![(0, 0), (0, 1), (1, 1)])
        );
        assert_eq!(reconstruct_path(&came_from, (0, 0), (0, 0)), Some(vec![(0, 0)]));
        assert_eq!(reconstruct_path(&came_from, (0, 0), (2, 2)), None);
    }

    #[test]
    fn test_single_cell_maze() {
        let maze = generate_seeded(1, 1, Some(0)).unwrap();
        for solver in Solver::ALL {
            let solution = run(&maze, solver);
            assert_eq!(solution.path, vec![(0, 0)], "{}", solver);
            assert_eq!(solution.metrics.steps_taken, 1);
            assert_eq!(solution.metrics.primary, 0, "{}", solver);
            assert_eq!(solution.metrics.secondary, 0, "{}", solver);
        }
    }

    #[test]
    fn test_single_cell_maze_reports_its_path() {
        let maze = generate_seeded(1, 1, Some(0)).unwrap();
        for solver in Solver::ALL {
            let (tx, rx) = mpsc::channel();
            solve_maze(&maze, solver, &MdpConfig::default(), StepObserver::new(&tx)).unwrap();
            drop(tx);
            assert_eq!(
                rx.into_iter().collect::<Vec<_>>(),
                vec![SolverEvent::PathFound {
                    algorithm: solver,
                    path: vec![(0, 0)]
                }],
                "{}",
                solver
            );
        }
    }

    #[test]
    fn test_two_by_two_scripted_bfs_path() {
        let maze = generate_maze(2, 2, &mut ZeroRng).unwrap();
        let solution = run(&maze, Solver::Bfs);
        assert_eq!(solution.path, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(solution.metrics.steps_taken, 3);
    }

    #[test]
    fn test_all_solvers_find_the_shortest_path() {
        for seed in 0..8 {
            let maze = generate_seeded(6, 6, Some(seed)).unwrap();
            let bfs = run(&maze, Solver::Bfs);
            assert_valid_path(&maze, &bfs.path);
            for solver in Solver::ALL {
                let solution = run(&maze, solver);
                assert_valid_path(&maze, &solution.path);
                // Perfect mazes have a unique simple path, so every planner agrees with BFS
                assert_eq!(solution.path.len(), bfs.path.len(), "{} seed {}", solver, seed);
            }
        }
    }

    #[test]
    fn test_search_expansion_bounds() {
        for seed in 0..10 {
            let maze = generate_seeded(5, 5, Some(seed)).unwrap();
            let dfs = run(&maze, Solver::Dfs);
            let bfs = run(&maze, Solver::Bfs);
            let astar = run(&maze, Solver::AStar);

            assert!(dfs.path.len() >= bfs.path.len());
            assert_eq!(bfs.path.len(), astar.path.len());
            assert!(bfs.metrics.primary <= maze.len());
            assert!(astar.metrics.primary <= maze.len());
            assert!(astar.metrics.primary <= bfs.metrics.primary, "seed {}", seed);
        }
    }

    #[test]
    fn test_runs_are_deterministic_and_independent() {
        let maze = generate_seeded(9, 7, Some(11)).unwrap();
        let first = Solver::ALL.map(|s| run(&maze, s)).to_vec();
        // Same maze again, in reverse order, must give identical results
        let mut second = Solver::ALL
            .iter()
            .rev()
            .map(|&s| run(&maze, s))
            .collect::<Vec<_>>();
        second.reverse();
        assert_eq!(first, second);

        let regenerated = generate_seeded(9, 7, Some(11)).unwrap();
        let third = Solver::ALL.map(|s| run(&regenerated, s)).to_vec();
        assert_eq!(first, third);
        assert_eq!(maze, regenerated);
    }

    #[test]
    fn test_compare_solvers_records_every_run() {
        let maze = generate_seeded(4, 6, Some(5)).unwrap();
        let mut records: Vec<Metrics> = Vec::new();
        let solutions = compare_solvers(&maze, &MdpConfig::default(), &mut records).unwrap();
        assert_eq!(solutions.len(), Solver::ALL.len());
        assert_eq!(
            records.iter().map(|m| m.algorithm).collect::<Vec<_>>(),
            Solver::ALL.to_vec()
        );
        assert!(records.iter().all(|m| m.maze_size() == "4x6"));
        let value = &records[4];
        assert_eq!(value.secondary, 0);
    }

    #[test]
    fn test_observer_receives_events() {
        let maze = generate_seeded(4, 4, Some(2)).unwrap();
        let (tx, rx) = mpsc::channel();
        let solution =
            solve_maze(&maze, Solver::Bfs, &MdpConfig::default(), StepObserver::new(&tx)).unwrap();
        drop(tx);
        let events = rx.into_iter().collect::<Vec<_>>();
        let expansions = events
            .iter()
            .filter(|e| matches!(e, SolverEvent::Expanded { .. }))
            .count();
        assert_eq!(expansions, solution.metrics.primary);
        assert_eq!(
            events.last(),
            Some(&SolverEvent::PathFound {
                algorithm: Solver::Bfs,
                path: solution.path.clone()
            })
        );
    }

    #[test]
    fn test_solver_kinds() {
        let planners = Solver::ALL.into_iter().filter(|s| s.is_mdp()).collect::<Vec<_>>();
        assert_eq!(planners, vec![Solver::PolicyIteration, Solver::ValueIteration]);
        assert_eq!(Solver::ValueIteration.secondary_label(), None);
    }

    #[test]
    fn test_metrics_display() {
        let metrics = Metrics {
            algorithm: Solver::AStar,
            rows: 5,
            cols: 5,
            steps_taken: 9,
            primary: 12,
            secondary: 3,
        };
        assert_eq!(
            metrics.to_string(),
            "ASTAR      5x5 steps=9 nodes_expanded=12 max_frontier_size=3"
        );

        let metrics = Metrics {
            algorithm: Solver::ValueIteration,
            primary: 8,
            secondary: 0,
            ..metrics
        };
        assert_eq!(metrics.to_string(), "VALUE      5x5 steps=9 sweeps=8");

        let metrics = Metrics {
            algorithm: Solver::PolicyIteration,
            primary: 2,
            secondary: 11,
            ..metrics
        };
        assert_eq!(
            metrics.to_string(),
            "POLICY     5x5 steps=9 policy_improvements=2 evaluation_sweeps=11"
        );
    }
}
