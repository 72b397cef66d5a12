mod action;
pub mod cell;
pub mod grid;

use std::fmt;

pub use action::Action;
pub use cell::Cell;
pub use grid::Grid;

use crate::error::MazeError;

/// A position in the maze as (row, col).
pub type State = (usize, usize);

/// A rectangular grid of cells whose open boundaries form the passages of the maze.
///
/// Solvers only ever borrow a `Maze` immutably, so the same instance can be
/// shared by any number of back-to-back runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    cells: Grid<Cell>,
    rows: usize,
    cols: usize,
}

impl Maze {
    /// Creates a fully walled maze with the given dimensions.
    ///
    /// Returns [`MazeError::InvalidDimensions`] if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        Ok(Maze {
            cells: Grid::from_fn(rows, cols, Cell::new),
            rows,
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always false, a maze holds at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The fixed start state, the top-left cell.
    pub fn start(&self) -> State {
        (0, 0)
    }

    /// The fixed terminal state, the bottom-right cell.
    pub fn terminal(&self) -> State {
        (self.rows - 1, self.cols - 1)
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, state: State) -> bool {
        state.0 < self.rows && state.1 < self.cols
    }

    /// All states in row-major order.
    pub fn states(&self) -> impl Iterator<Item = State> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    /// Whether `action` is a legal move from `state`: the boundary is open and
    /// the target is inside the grid.
    pub fn is_open(&self, state: State, action: Action) -> bool {
        !self[state].has_wall(action)
            && action
                .apply(state)
                .is_some_and(|next| self.is_in_bounds(next))
    }

    /// Legal moves from `state` and the states they lead to, in [`Action::ALL`] order.
    ///
    /// This is the single definition of adjacency shared by every solver.
    pub fn legal_actions(&self, state: State) -> impl Iterator<Item = (Action, State)> + '_ {
        Action::ALL.into_iter().filter_map(move |action| {
            if self.is_open(state, action) {
                action.apply(state).map(|next| (action, next))
            } else {
                None
            }
        })
    }

    /// States reachable in one legal move from `state`.
    pub fn successors(&self, state: State) -> impl Iterator<Item = State> + '_ {
        self.legal_actions(state).map(|(_, next)| next)
    }

    /// Opens the boundary shared by two adjacent cells on both sides.
    ///
    /// Returns `true` if a wall was removed, `false` if the passage was already open.
    ///
    /// # Panics
    /// * If either coordinate is out of bounds
    /// * If the cells are not orthogonally adjacent
    pub fn remove_wall(&mut self, from: State, to: State) -> bool {
        if !self.is_in_bounds(from) || !self.is_in_bounds(to) {
            panic!("The given coordinate is out of bounds");
        }
        let Some(action) = Action::between(from, to) else {
            panic!("Cells {:?} and {:?} are not adjacent", from, to);
        };
        let was_wall = self.cells[from].has_wall(action);
        self.cells[from].open(action);
        self.cells[to].open(action.opposite());
        was_wall
    }

    /// Number of open boundaries between pairs of cells. Each passage counts once.
    pub fn open_passages(&self) -> usize {
        self.states()
            .map(|s| {
                [Action::Right, Action::Down]
                    .into_iter()
                    .filter(|&a| self.is_open(s, a))
                    .count()
            })
            .sum()
    }

    pub(crate) fn set_visited(&mut self, state: State, visited: bool) {
        self.cells[state].visited = visited;
    }

    pub(crate) fn reset_visited(&mut self) {
        self.cells.iter_mut().for_each(|cell| cell.visited = false);
    }

    /// Draws the maze with `path` marked, `S` at the start and `G` at the terminal.
    pub fn render_path(&self, path: &[State]) -> String {
        let on_path = {
            let mut marks = Grid::new(self.rows, self.cols, false);
            path.iter()
                .filter(|&&s| self.is_in_bounds(s))
                .for_each(|&s| marks[s] = true);
            marks
        };
        self.draw(|state| {
            if state == self.start() {
                'S'
            } else if state == self.terminal() {
                'G'
            } else if on_path[state] {
                '*'
            } else {
                ' '
            }
        })
    }

    fn draw(&self, mark: impl Fn(State) -> char) -> String {
        let mut out = String::new();
        out.push('+');
        (0..self.cols).for_each(|c| {
            out.push_str(if self[(0, c)].has_wall(Action::Up) { "---+" } else { "   +" });
        });
        out.push('\n');

        for r in 0..self.rows {
            out.push(if self[(r, 0)].has_wall(Action::Left) { '|' } else { ' ' });
            for c in 0..self.cols {
                out.push(' ');
                out.push(mark((r, c)));
                out.push(' ');
                out.push(if self[(r, c)].has_wall(Action::Right) { '|' } else { ' ' });
            }
            out.push('\n');

            out.push('+');
            for c in 0..self.cols {
                out.push_str(if self[(r, c)].has_wall(Action::Down) { "---+" } else { "   +" });
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.draw(|_| ' '))
    }
}

impl std::ops::Index<State> for Maze {
    type Output = Cell;

    fn index(&self, index: State) -> &Self::Output {
        &self.cells[index]
    }
}

/// Get neighbors of a cell, ignoring walls.
/// A neighbor is any in-bounds cell one step away in the cardinal directions,
/// listed in [`Action::ALL`] order.
pub fn get_neighbors(coord: State, maze: &Maze) -> impl Iterator<Item = State> + '_ {
    Action::ALL
        .into_iter()
        .filter_map(move |action| action.apply(coord))
        .filter(move |&c| maze.is_in_bounds(coord) && maze.is_in_bounds(c))
}

/// Manhattan distance between two states.
pub fn manhattan(a: State, b: State) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}
