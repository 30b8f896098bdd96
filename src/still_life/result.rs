//! Still-life patterns reported by the search

use super::interior::Interior;
use crate::error::LifeResult;
use crate::game_of_life::{Grid, Pattern};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A still life found on a `rows x cols` board, in full-board cell indices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StillLife {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<usize>,
}

impl StillLife {
    pub fn new(rows: usize, cols: usize, mut cells: Vec<usize>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self { rows, cols, cells }
    }

    /// Treat a persisted pattern as a still-life candidate
    pub fn from_pattern(pattern: &Pattern) -> Self {
        Self::new(pattern.rows, pattern.cols, pattern.cells.clone())
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.len()
    }

    /// Live cells as `(row, col)` on the full board
    pub fn coords(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .map(|&idx| (idx / self.cols, idx % self.cols))
            .collect()
    }

    /// Height and width of the smallest rectangle holding every live cell
    pub fn extent(&self) -> (usize, usize) {
        let coords = self.coords();
        let span = |values: Vec<usize>| match (values.iter().min(), values.iter().max()) {
            (Some(lo), Some(hi)) => hi - lo + 1,
            _ => 0,
        };
        (
            span(coords.iter().map(|&(r, _)| r).collect()),
            span(coords.iter().map(|&(_, c)| c).collect()),
        )
    }

    /// Cells in interior numbering, or `None` if any cell sits on the margin
    pub fn interior_cells(&self) -> Option<Vec<usize>> {
        let interior = Interior::new(self.rows, self.cols).ok()?;
        self.cells
            .iter()
            .map(|&cell| interior.from_board_index(cell))
            .collect()
    }

    /// A fresh generation-1 grid holding the pattern
    pub fn to_grid(&self) -> LifeResult<Grid> {
        let mut grid = Grid::new(self.rows, self.cols)?;
        grid.load_from_indices(self.cells.iter().copied())?;
        Ok(grid)
    }

    pub fn to_pattern(&self) -> Pattern {
        Pattern {
            rows: self.rows,
            cols: self.cols,
            generation: 1,
            cells: self.cells.clone(),
        }
    }

    /// Identifier derived from the board size and cells. Only comparable
    /// within one build, since `DefaultHasher` may change between releases.
    pub fn id(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        format!("sl_{:016x}", hasher.finish())
    }
}

impl fmt::Display for StillLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", crate::game_of_life::io::format_index_tuple(&self.cells))?;
        for row in 0..self.rows {
            let line: Vec<&str> = (0..self.cols)
                .map(|col| {
                    if self.cells.binary_search(&(row * self.cols + col)).is_ok() {
                        "*"
                    } else {
                        "-"
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalises_cells() {
        let still = StillLife::new(4, 4, vec![10, 5, 9, 6, 5]);
        assert_eq!(still.cells, vec![5, 6, 9, 10]);
        assert_eq!(still.population(), 4);
    }

    #[test]
    fn test_extent() {
        let beehive = StillLife::new(5, 6, vec![8, 9, 13, 16, 20, 21]);
        assert_eq!(beehive.extent(), (3, 4));
        assert_eq!(StillLife::new(3, 3, vec![]).extent(), (0, 0));
    }

    #[test]
    fn test_conversions() {
        let block = StillLife::new(4, 4, vec![5, 6, 9, 10]);
        let grid = block.to_grid().unwrap();
        assert_eq!(grid.population(), 4);
        assert_eq!(grid.export_indices(), block.cells);

        let pattern = block.to_pattern();
        assert_eq!(pattern.generation, 1);
        assert_eq!(StillLife::from_pattern(&pattern), block);
    }

    #[test]
    fn test_interior_cells() {
        let tub = StillLife::new(5, 5, vec![7, 11, 13, 17]);
        assert_eq!(tub.interior_cells(), Some(vec![1, 3, 5, 7]));

        let corner_block = StillLife::new(6, 6, vec![0, 5, 30, 35]);
        assert_eq!(corner_block.interior_cells(), None);
    }

    #[test]
    fn test_id_is_deterministic() {
        let a = StillLife::new(4, 4, vec![5, 6, 9, 10]);
        let b = StillLife::new(4, 4, vec![10, 9, 6, 5]);
        let c = StillLife::new(4, 5, vec![5, 6, 9, 10]);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_display() {
        let block = StillLife::new(4, 4, vec![5, 6, 9, 10]);
        assert_eq!(
            block.to_string(),
            "(5, 6, 9, 10)\n- - - -\n- * * -\n- * * -\n- - - -\n"
        );
    }
}
