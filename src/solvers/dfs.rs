use std::collections::{HashMap, HashSet};

use super::{SearchOutcome, Solver, SolverEvent, StepObserver, reconstruct_path};
use crate::error::SolveError;
use crate::maze::{Maze, State};

/// Depth-first search with a LIFO stack. Finds a path, not necessarily the shortest.
///
/// A neighbor is pushed only if it is neither expanded nor already waiting on
/// the stack, so each state enters the stack at most once.
pub fn solve_dfs(
    maze: &Maze,
    start: State,
    goal: State,
    observer: StepObserver<'_>,
) -> Result<SearchOutcome, SolveError> {
    if start == goal {
        observer.emit(|| SolverEvent::PathFound {
            algorithm: Solver::Dfs,
            path: vec![start],
        });
        return Ok(SearchOutcome {
            path: vec![start],
            nodes_expanded: 0,
            max_frontier_size: 0,
        });
    }

    let mut stack = vec![start];
    let mut on_stack = HashSet::from([start]);
    let mut visited = HashSet::new();
    let mut came_from = HashMap::new();

    let mut nodes_expanded = 0;
    let mut max_frontier_size = stack.len();

    while let Some(current) = stack.pop() {
        on_stack.remove(&current);
        nodes_expanded += 1;
        max_frontier_size = max_frontier_size.max(stack.len());
        visited.insert(current);
        tracing::trace!("[dfs] expanding {:?}", current);
        observer.emit(|| SolverEvent::Expanded {
            algorithm: Solver::Dfs,
            current,
            frontier: stack.clone(),
        });

        if current == goal {
            let path = reconstruct_path(&came_from, start, goal)
                .ok_or(SolveError::NoPathFound { algorithm: Solver::Dfs })?;
            tracing::debug!(
                "[dfs] goal reached: path length {}, {} expanded, max frontier {}",
                path.len(),
                nodes_expanded,
                max_frontier_size
            );
            observer.emit(|| SolverEvent::PathFound {
                algorithm: Solver::Dfs,
                path: path.clone(),
            });
            return Ok(SearchOutcome {
                path,
                nodes_expanded,
                max_frontier_size,
            });
        }

        for neighbor in maze.successors(current) {
            if !visited.contains(&neighbor) && on_stack.insert(neighbor) {
                came_from.insert(neighbor, current);
                stack.push(neighbor);
                max_frontier_size = max_frontier_size.max(stack.len());
            }
        }
    }

    tracing::debug!("[dfs] frontier exhausted after {} expansions", nodes_expanded);
    Err(SolveError::NoPathFound { algorithm: Solver::Dfs })
}
