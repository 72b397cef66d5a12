use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap, HashSet},
};

use super::{SearchOutcome, Solver, SolverEvent, StepObserver, reconstruct_path};
use crate::error::SolveError;
use crate::maze::{Maze, State, manhattan};

/// Entry of the A* open set.
/// Ordered by `f_cost`, then by insertion order so equal costs pop first-in first-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    /// Estimated total cost through this state: traveling cost + heuristic cost
    f_cost: usize,
    /// Monotonically increasing insertion counter
    order: u64,
    coord: State,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search with the Manhattan distance to `goal` as heuristic.
///
/// The heuristic never overestimates on a four-directional unit-cost grid,
/// so the returned path is a shortest one.
pub fn solve_astar(
    maze: &Maze,
    start: State,
    goal: State,
    observer: StepObserver<'_>,
) -> Result<SearchOutcome, SolveError> {
    if start == goal {
        observer.emit(|| SolverEvent::PathFound {
            algorithm: Solver::AStar,
            path: vec![start],
        });
        return Ok(SearchOutcome {
            path: vec![start],
            nodes_expanded: 0,
            max_frontier_size: 0,
        });
    }

    // Using Reverse to turn the max-heap into a min-heap
    let mut open_heap: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    let mut open_set = HashSet::from([start]);
    let mut order = 0u64;
    open_heap.push(Reverse(FrontierEntry {
        f_cost: manhattan(start, goal),
        order,
        coord: start,
    }));

    let mut g_costs = HashMap::from([(start, 0usize)]);
    let mut came_from = HashMap::new();
    let mut visited = HashSet::new();

    let mut nodes_expanded = 0;
    let mut max_frontier_size = open_set.len();

    while let Some(Reverse(entry)) = open_heap.pop() {
        let current = entry.coord;
        open_set.remove(&current);
        nodes_expanded += 1;
        max_frontier_size = max_frontier_size.max(open_set.len());
        visited.insert(current);
        tracing::trace!("[astar] expanding {:?} with f = {}", current, entry.f_cost);
        observer.emit(|| SolverEvent::Expanded {
            algorithm: Solver::AStar,
            current,
            frontier: open_heap.iter().map(|Reverse(e)| e.coord).collect(),
        });

        if current == goal {
            let path = reconstruct_path(&came_from, start, goal)
                .ok_or(SolveError::NoPathFound { algorithm: Solver::AStar })?;
            tracing::debug!(
                "[astar] goal reached: path length {}, {} expanded, max frontier {}",
                path.len(),
                nodes_expanded,
                max_frontier_size
            );
            observer.emit(|| SolverEvent::PathFound {
                algorithm: Solver::AStar,
                path: path.clone(),
            });
            return Ok(SearchOutcome {
                path,
                nodes_expanded,
                max_frontier_size,
            });
        }

        let new_cost = g_costs[&current] + 1; // Uniform cost for each step
        // Closed states are final under a consistent heuristic
        for neighbor in maze.successors(current).filter(|n| !visited.contains(n)) {
            // Only consider neigbors that we can reach with a lower cost
            let is_cheaper = match g_costs.get(&neighbor) {
                Some(&existing_cost) => new_cost < existing_cost,
                None => true,
            };
            if !is_cheaper {
                continue;
            }
            came_from.insert(neighbor, current);
            g_costs.insert(neighbor, new_cost);
            if open_set.insert(neighbor) {
                order += 1;
                open_heap.push(Reverse(FrontierEntry {
                    f_cost: new_cost + manhattan(neighbor, goal),
                    order,
                    coord: neighbor,
                }));
                max_frontier_size = max_frontier_size.max(open_set.len());
            }
        }
    }

    tracing::debug!("[astar] frontier exhausted after {} expansions", nodes_expanded);
    Err(SolveError::NoPathFound { algorithm: Solver::AStar })
}
