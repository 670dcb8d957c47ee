//! Rectangular integer grid fed to the classifier.

/// A zero-padded `rows x cols` grid of vocabulary ids, stored row-major.
///
/// Row `i` holds the ids of input string `i`; cells past the end of that
/// string hold [`Tensor::PADDING`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl Tensor {
    /// Id written into cells past the end of a row's string.
    pub const PADDING: i32 = 0;

    /// Create a grid filled with padding.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Self::PADDING; rows * cols],
        }
    }

    /// Pack ragged rows into a padded grid.
    ///
    /// Returns `None` when the longest row is empty, so that an all-empty batch
    /// never turns into a zero-width grid.
    pub fn from_rows(rows: &[Vec<i32>]) -> Option<Self> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if cols == 0 {
            return None;
        }

        let mut tensor = Self::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            let start = i * cols;
            tensor.data[start..start + row.len()].copy_from_slice(row);
        }
        Some(tensor)
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.rows()`.
    pub fn row(&self, index: usize) -> &[i32] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[i32]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Size of the backing buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<i32>()
    }
}

#[cfg(test)]
#[path = "tensor_tests.rs"]
mod tests;
