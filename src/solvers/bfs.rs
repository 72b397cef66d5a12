use std::collections::{HashMap, HashSet, VecDeque};

use super::{SearchOutcome, Solver, SolverEvent, StepObserver, reconstruct_path};
use crate::error::SolveError;
use crate::maze::{Maze, State};

/// Breadth-first search with a FIFO queue.
/// Every move costs one, so the first path to the goal is a shortest one.
pub fn solve_bfs(
    maze: &Maze,
    start: State,
    goal: State,
    observer: StepObserver<'_>,
) -> Result<SearchOutcome, SolveError> {
    if start == goal {
        observer.emit(|| SolverEvent::PathFound {
            algorithm: Solver::Bfs,
            path: vec![start],
        });
        return Ok(SearchOutcome {
            path: vec![start],
            nodes_expanded: 0,
            max_frontier_size: 0,
        });
    }

    let mut queue = VecDeque::from([start]);
    // Marked on discovery, so nothing is enqueued twice
    let mut visited = HashSet::from([start]);
    let mut came_from = HashMap::new();

    let mut nodes_expanded = 0;
    let mut max_frontier_size = queue.len();

    while let Some(current) = queue.pop_front() {
        nodes_expanded += 1;
        max_frontier_size = max_frontier_size.max(queue.len());
        tracing::trace!("[bfs] expanding {:?}", current);
        observer.emit(|| SolverEvent::Expanded {
            algorithm: Solver::Bfs,
            current,
            frontier: queue.iter().copied().collect(),
        });

        if current == goal {
            let path = reconstruct_path(&came_from, start, goal)
                .ok_or(SolveError::NoPathFound { algorithm: Solver::Bfs })?;
            tracing::debug!(
                "[bfs] goal reached: path length {}, {} expanded, max frontier {}",
                path.len(),
                nodes_expanded,
                max_frontier_size
            );
            observer.emit(|| SolverEvent::PathFound {
                algorithm: Solver::Bfs,
                path: path.clone(),
            });
            return Ok(SearchOutcome {
                path,
                nodes_expanded,
                max_frontier_size,
            });
        }

        for neighbor in maze.successors(current) {
            if visited.insert(neighbor) {
                came_from.insert(neighbor, current);
                queue.push_back(neighbor);
                max_frontier_size = max_frontier_size.max(queue.len());
            }
        }
    }

    tracing::debug!("[bfs] frontier exhausted after {} expansions", nodes_expanded);
    Err(SolveError::NoPathFound { algorithm: Solver::Bfs })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 3x3 maze with every interior boundary open.
    fn open_grid() -> Maze {
        let mut maze = Maze::new(3, 3).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                if c + 1 < 3 {
                    maze.remove_wall((r, c), (r, c + 1));
                }
                if r + 1 < 3 {
                    maze.remove_wall((r, c), (r + 1, c));
                }
            }
        }
        maze
    }

    #[test]
    fn test_shortest_path_on_open_grid() {
        let maze = open_grid();
        let outcome = solve_bfs(&maze, (0, 0), (2, 2), StepObserver::none()).unwrap();
        assert_eq!(outcome.path.len(), 5);
        // Everything closer than the goal is expanded before it
        assert_eq!(outcome.nodes_expanded, 9);
    }

    #[test]
    fn test_partial_search() {
        let maze = open_grid();
        let outcome = solve_bfs(&maze, (0, 0), (0, 1), StepObserver::none()).unwrap();
        assert_eq!(outcome.path, vec![(0, 0), (0, 1)]);
        // (0,0) then its first discovered neighbor (0,1)
        assert_eq!(outcome.nodes_expanded, 2);
        assert_eq!(outcome.max_frontier_size, 2);
    }

    #[test]
    fn test_walled_off_goal() {
        let mut maze = Maze::new(1, 3).unwrap();
        maze.remove_wall((0, 0), (0, 1));
        assert_eq!(
            solve_bfs(&maze, (0, 0), (0, 2), StepObserver::none()),
            Err(SolveError::NoPathFound { algorithm: Solver::Bfs })
        );
    }
}
