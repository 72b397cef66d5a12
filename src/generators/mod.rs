use rand::{Rng, SeedableRng, rngs::StdRng};

mod recur_backtrack;

pub use recur_backtrack::recursive_backtrack;

use crate::{error::MazeError, maze::Maze};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Builds a `rows` x `cols` perfect maze, drawing every neighbor choice from `rng`.
pub fn generate_maze<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Maze, MazeError> {
    let mut maze = Maze::new(rows, cols)?;
    recursive_backtrack(&mut maze, rng);
    Ok(maze)
}

/// Same as [`generate_maze`] with a [`StdRng`] from [`get_rng`].
pub fn generate_seeded(rows: usize, cols: usize, seed: Option<u64>) -> Result<Maze, MazeError> {
    generate_maze(rows, cols, &mut get_rng(seed))
}
