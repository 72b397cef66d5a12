use rand::Rng;

use crate::maze::{Maze, get_neighbors};

/// Carves a perfect maze with randomized depth-first search starting at the
/// top-left cell. Every cell ends up connected by exactly one path.
///
/// The maze is expected to be fully walled and unvisited on entry.
pub fn recursive_backtrack<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    let start = maze.start();
    maze.set_visited(start, true);

    // The stack holds the current carving frontier, top is the cell being extended
    let mut stack = vec![start];
    let mut carved = 0usize;

    while let Some(&cell) = stack.last() {
        let neighbors = get_neighbors(cell, maze)
            .filter(|&c| !maze[c].is_visited())
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            // Dead end, backtrack
            stack.pop();
            continue;
        }

        let neighbor = neighbors[rng.random_range(0..neighbors.len())];
        maze.remove_wall(cell, neighbor);
        maze.set_visited(neighbor, true);
        carved += 1;
        tracing::trace!("[generator] carved {:?} -> {:?}", cell, neighbor);
        stack.push(neighbor);
    }

    // Solvers keep their own bookkeeping, so the scratch flags must not leak out
    maze.reset_visited();
    tracing::debug!(
        "[generator] carved {} passages in a {}x{} maze",
        carved,
        maze.rows(),
        maze.cols()
    );
}
