use super::{Action, State};

/// A single maze cell with its four boundary flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Position of the cell as (row, col).
    pub position: State,
    /// Boundary flags in [`Action`] order: top, right, bottom, left. `true` means a wall.
    walls: [bool; 4],
    /// Scratch marker used while carving. Cleared once generation is done.
    pub(crate) visited: bool,
}

impl Cell {
    /// A fully walled, unvisited cell.
    pub fn new(position: State) -> Self {
        Cell {
            position,
            walls: [true; 4],
            visited: false,
        }
    }

    /// Whether the boundary crossed by `action` is a wall.
    pub fn has_wall(&self, action: Action) -> bool {
        self.walls[action.index()]
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub(crate) fn open(&mut self, action: Action) {
        self.walls[action.index()] = false;
    }
}
