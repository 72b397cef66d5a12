use super::State;

/// Row-major storage for one value per maze cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Box<[T]>,
    rows: usize,
    cols: usize,
}

impl<T: Clone> Grid<T> {
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        let data = vec![value; rows * cols].into_boxed_slice();
        Grid { data, rows, cols }
    }
}

impl<T> Grid<T> {
    /// Builds a grid by calling `f` for every state in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(State) -> T) -> Self {
        let data = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(&mut f)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Grid { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    fn ravel_index(&self, state: State) -> usize {
        let (row, col) = state;
        assert!(
            row < self.rows && col < self.cols,
            "state {:?} is out of bounds for a {}x{} grid",
            state,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl<T> std::ops::Index<State> for Grid<T> {
    type Output = T;

    fn index(&self, index: State) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl<T> std::ops::IndexMut<State> for Grid<T> {
    fn index_mut(&mut self, index: State) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.data[idx]
    }
}
