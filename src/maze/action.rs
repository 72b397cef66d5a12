use std::fmt;

use super::State;

/// A unit move between orthogonally adjacent cells.
///
/// The declaration order (Up, Right, Down, Left) matches the order of a
/// cell's boundary flags and is the order every solver enumerates moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Index of the boundary flag this action crosses.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Right => Action::Left,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
        }
    }

    /// The state one step away in this direction, or `None` when that would
    /// leave the top or left edge. The upper bounds are left to the caller.
    pub fn apply(self, state: State) -> Option<State> {
        let (row, col) = state;
        match self {
            Action::Up => row.checked_sub(1).map(|r| (r, col)),
            Action::Right => col.checked_add(1).map(|c| (row, c)),
            Action::Down => row.checked_add(1).map(|r| (r, col)),
            Action::Left => col.checked_sub(1).map(|c| (row, c)),
        }
    }

    /// The action leading from `from` to the adjacent `to`, if they are adjacent.
    pub fn between(from: State, to: State) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.apply(from) == Some(to))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Action::Up => "U",
            Action::Right => "R",
            Action::Down => "D",
            Action::Left => "L",
        };
        write!(f, "{}", symbol)
    }
}
