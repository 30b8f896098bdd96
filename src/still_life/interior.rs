//! Search region geometry and the symmetry group used to prune candidates
//!
//! Candidates live in the interior of the board, i.e. the board with a
//! 1-cell dead margin removed. Interior cells are numbered `i * cols + j`
//! with `(i, j)` relative to the interior's top-left corner.

use crate::error::{LifeError, LifeResult};

/// A non-identity symmetry of the interior rectangle.
///
/// The first three apply to any rectangle; the transpose family only to
/// squares, completing the 8-element dihedral group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    FlipVertical,
    FlipHorizontal,
    Rotate180,
    Transpose,
    TransposeFlipVertical,
    TransposeFlipHorizontal,
    TransposeRotate180,
}

const RECTANGLE_SYMMETRIES: [Symmetry; 3] = [
    Symmetry::FlipVertical,
    Symmetry::FlipHorizontal,
    Symmetry::Rotate180,
];

const SQUARE_SYMMETRIES: [Symmetry; 7] = [
    Symmetry::FlipVertical,
    Symmetry::FlipHorizontal,
    Symmetry::Rotate180,
    Symmetry::Transpose,
    Symmetry::TransposeFlipVertical,
    Symmetry::TransposeFlipHorizontal,
    Symmetry::TransposeRotate180,
];

impl Symmetry {
    /// Map interior coordinates `(i, j)` to their image
    #[inline]
    pub fn apply(self, rows: usize, cols: usize, i: usize, j: usize) -> (usize, usize) {
        let fi = rows - 1 - i;
        let fj = cols - 1 - j;
        match self {
            Symmetry::FlipVertical => (fi, j),
            Symmetry::FlipHorizontal => (i, fj),
            Symmetry::Rotate180 => (fi, fj),
            Symmetry::Transpose => (j, i),
            Symmetry::TransposeFlipVertical => (j, fi),
            Symmetry::TransposeFlipHorizontal => (fj, i),
            Symmetry::TransposeRotate180 => (fj, fi),
        }
    }

    pub fn is_transpose(self) -> bool {
        matches!(
            self,
            Symmetry::Transpose
                | Symmetry::TransposeFlipVertical
                | Symmetry::TransposeFlipHorizontal
                | Symmetry::TransposeRotate180
        )
    }
}

/// The `(rows - 2) x (cols - 2)` region a still-life candidate may occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interior {
    board_rows: usize,
    board_cols: usize,
    rows: usize,
    cols: usize,
}

impl Interior {
    pub fn new(board_rows: usize, board_cols: usize) -> LifeResult<Self> {
        let too_small = LifeError::BoardTooSmall {
            rows: board_rows,
            cols: board_cols,
        };
        let rows = board_rows.checked_sub(2).filter(|&r| r >= 1).ok_or(too_small.clone())?;
        let cols = board_cols.checked_sub(2).filter(|&c| c >= 1).ok_or(too_small)?;

        Ok(Self {
            board_rows,
            board_cols,
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

    pub fn board_rows(&self) -> usize {
        self.board_rows
    }

    pub fn board_cols(&self) -> usize {
        self.board_cols
    }

    /// Number of interior cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Shift an interior index past the margin into full-board encoding
    #[inline]
    pub fn to_board_index(&self, index: usize) -> usize {
        let (i, j) = self.coords(index);
        (i + 1) * self.board_cols + (j + 1)
    }

    /// Inverse of [`Interior::to_board_index`]; `None` for margin cells
    pub fn from_board_index(&self, board_index: usize) -> Option<usize> {
        let (r, c) = (board_index / self.board_cols, board_index % self.board_cols);
        if r == 0 || c == 0 || r > self.rows || c > self.cols {
            return None;
        }
        Some(self.index(r - 1, c - 1))
    }

    /// Whether a combination starting at `first` lies past the middle column.
    ///
    /// Combinations are visited in lexicographic order, so once this holds
    /// for the smallest element it holds for every remaining combination
    /// whose first cell is in the top row. Those are mirror images of
    /// patterns already seen, and the rest fail [`Interior::touches_origin`].
    #[inline]
    pub fn past_half_width(&self, first: usize) -> bool {
        let j0 = first % self.cols;
        j0 > self.cols - 1 - j0
    }

    /// First element value at which the search can stop, if any
    pub fn half_width_cutoff(&self) -> Option<usize> {
        (0..self.len()).find(|&first| self.past_half_width(first))
    }

    /// Whether the pattern has a cell in the top row and one in the left column.
    ///
    /// Any other pattern is a translate of one that does.
    pub fn touches_origin(&self, combination: &[usize]) -> bool {
        let mut top = false;
        let mut left = false;
        for &index in combination {
            let (i, j) = self.coords(index);
            top |= i == 0;
            left |= j == 0;
        }
        top && left
    }

    /// Symmetries that map this interior onto itself
    pub fn symmetries(&self) -> &'static [Symmetry] {
        if self.is_square() {
            &SQUARE_SYMMETRIES
        } else {
            &RECTANGLE_SYMMETRIES
        }
    }

    /// Write the sorted image of `combination` under `symmetry` into `out`
    pub fn image_into(&self, symmetry: Symmetry, combination: &[usize], out: &mut Vec<usize>) {
        out.clear();
        out.extend(combination.iter().map(|&index| {
            let (i, j) = self.coords(index);
            let (ti, tj) = symmetry.apply(self.rows, self.cols, i, j);
            self.index(ti, tj)
        }));
        out.sort_unstable();
    }

    /// Sorted image of `combination` under `symmetry`
    pub fn image(&self, symmetry: Symmetry, combination: &[usize]) -> Vec<usize> {
        let mut out = Vec::with_capacity(combination.len());
        self.image_into(symmetry, combination, &mut out);
        out
    }

    /// Whether a sorted combination is the lexicographically smallest member
    /// of its orbit. `scratch` is reused between calls.
    pub fn is_canonical(&self, combination: &[usize], scratch: &mut Vec<usize>) -> bool {
        self.symmetries().iter().all(|&symmetry| {
            self.image_into(symmetry, combination, scratch);
            combination <= scratch.as_slice()
        })
    }
}
