//! Toroidal Game of Life grid with an incrementally maintained population

use crate::error::{LifeError, LifeResult};
use rand::Rng;
use std::fmt;

/// A finite Game of Life board whose edges wrap around (a torus).
///
/// Cells are stored row-major and addressed by the fixed 1D encoding
/// `row * cols + col`, which is also the encoding used by
/// [`Grid::load_from_indices`], [`Grid::export_indices`] and the `.life`
/// pattern format. All mutation goes through the methods below so that
/// `population` always equals the number of live cells.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
    population: usize,
    generation: u64,
    // Scratch buffer reused by `advance`.
    neighbors: Vec<u8>,
}

impl Grid {
    /// Create an all-dead grid at generation 1
    pub fn new(rows: usize, cols: usize) -> LifeResult<Self> {
        let len = rows
            .checked_mul(cols)
            .filter(|&len| len > 0)
            .ok_or(LifeError::InvalidDimension { rows, cols })?;

        Ok(Self {
            rows,
            cols,
            cells: vec![false; len],
            population: 0,
            generation: 1,
            neighbors: vec![0; len],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells on the board
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.population
    }

    /// Generation number, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Restore the generation number of a persisted pattern
    pub fn set_generation(&mut self, generation: u64) -> LifeResult<()> {
        if generation == 0 {
            return Err(LifeError::InvalidGeneration(generation));
        }
        self.generation = generation;
        Ok(())
    }

    /// Read-only view of the cells in row-major order
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Convert 2D coordinates to the 1D cell index
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Convert a 1D cell index back to `(row, col)`
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    fn check_bounds(&self, row: usize, col: usize) -> LifeResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Get cell value at coordinates
    pub fn get(&self, row: usize, col: usize) -> LifeResult<bool> {
        self.check_bounds(row, col)?;
        Ok(self.cells[self.index(row, col)])
    }

    /// Set cell value at coordinates; population only moves when the cell changes
    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> LifeResult<()> {
        self.check_bounds(row, col)?;
        let idx = self.index(row, col);
        self.write(idx, alive);
        Ok(())
    }

    #[inline]
    fn write(&mut self, idx: usize, alive: bool) {
        let cell = &mut self.cells[idx];
        if *cell != alive {
            *cell = alive;
            if alive {
                self.population += 1;
            } else {
                self.population -= 1;
            }
        }
    }

    /// Kill every cell. The generation number is left alone.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.population = 0;
    }

    /// Make each cell alive independently with probability `density_percent / 100`
    pub fn randomize<R: Rng>(&mut self, density_percent: u8, rng: &mut R) -> LifeResult<()> {
        if density_percent > 100 {
            return Err(LifeError::InvalidDensity(density_percent));
        }

        let mut population = 0;
        for cell in self.cells.iter_mut() {
            *cell = rng.gen_range(1..=100u8) <= density_percent;
            if *cell {
                population += 1;
            }
        }
        self.population = population;
        Ok(())
    }

    /// Replace the board contents with the given live-cell indices.
    ///
    /// Every index is checked before the grid is touched, so on error the
    /// previous state is kept. Duplicate indices count once.
    pub fn load_from_indices<I>(&mut self, indices: I) -> LifeResult<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let len = self.len();
        let indices: Vec<usize> = indices.into_iter().collect();
        if let Some(&bad) = indices.iter().find(|&&idx| idx >= len) {
            return Err(LifeError::InvalidIndex {
                index: bad as i64,
                len,
            });
        }

        self.clear();
        for idx in indices {
            self.write(idx, true);
        }
        Ok(())
    }

    /// Live-cell indices in ascending order
    pub fn export_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, &alive)| alive.then_some(idx))
            .collect()
    }

    /// Get all living cell coordinates
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.export_indices()
            .into_iter()
            .map(|idx| self.coords(idx))
            .collect()
    }

    /// Count live cells by scanning the whole board
    pub fn recount(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Advance one generation under toroidal wraparound.
    ///
    /// Neighbor counts are scattered from the live cells of the current
    /// board into a separate buffer before any cell is rewritten, so the
    /// rule always sees the pre-advance snapshot. On boards narrower than
    /// 3 cells the 8 neighbor positions overlap and are counted with
    /// multiplicity.
    pub fn advance(&mut self) {
        let (rows, cols) = (self.rows, self.cols);
        self.neighbors.fill(0);

        for row in 0..rows {
            let up = (row + rows - 1) % rows;
            let down = (row + 1) % rows;
            for col in 0..cols {
                if !self.cells[row * cols + col] {
                    continue;
                }
                let left = (col + cols - 1) % cols;
                let right = (col + 1) % cols;
                for (i, r) in [up, row, down].into_iter().enumerate() {
                    for (j, c) in [left, col, right].into_iter().enumerate() {
                        if i != 1 || j != 1 {
                            self.neighbors[r * cols + c] += 1;
                        }
                    }
                }
            }
        }

        for idx in 0..self.cells.len() {
            let alive = self.cells[idx];
            let next = super::GameOfLifeRules::should_be_alive(alive, self.neighbors[idx]);
            if next != alive {
                self.write(idx, next);
            }
        }

        self.generation += 1;
    }

    /// Advance `generations` times
    pub fn advance_by(&mut self, generations: u64) {
        for _ in 0..generations {
            self.advance();
        }
    }

    /// Short description of the board
    pub fn summary(&self) -> String {
        format!(
            "Game of Life board of {} rows and {} columns having {} live cells.",
            self.rows, self.cols, self.population
        )
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for (col, &cell) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", if cell { '*' } else { '-' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Grid::new(0, 5).unwrap_err(),
            LifeError::InvalidDimension { rows: 0, cols: 5 }
        );
        // The cell count does not fit in a usize.
        assert_eq!(
            Grid::new(usize::MAX, 2).unwrap_err(),
            LifeError::InvalidDimension { rows: usize::MAX, cols: 2 }
        );
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn test_set_generation_rejects_zero() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_generation(7).unwrap();
        assert_eq!(grid.set_generation(0), Err(LifeError::InvalidGeneration(0)));
        assert_eq!(grid.generation(), 7);
    }

    #[test]
    fn test_set_cell_is_idempotent() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_cell(1, 2, true).unwrap();
        grid.set_cell(1, 2, true).unwrap();
        assert_eq!(grid.population(), 1);
        assert!(grid.get(1, 2).unwrap());

        grid.set_cell(1, 2, false).unwrap();
        grid.set_cell(1, 2, false).unwrap();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert!(matches!(
            grid.set_cell(3, 0, true),
            Err(LifeError::OutOfBounds { row: 3, col: 0, .. })
        ));
        assert!(grid.get(0, 3).is_err());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_index_round_trip() {
        let mut grid = Grid::new(5, 7).unwrap();
        let indices = vec![0, 6, 8, 20, 34];
        grid.load_from_indices(indices.iter().copied()).unwrap();
        assert_eq!(grid.export_indices(), indices);
        assert_eq!(grid.population(), 5);
        // row * cols + col
        assert!(grid.get(1, 1).unwrap());
        assert!(grid.get(4, 6).unwrap());
    }

    #[test]
    fn test_load_rejects_bad_index_without_mutating() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.load_from_indices([4]).unwrap();

        let err = grid.load_from_indices([0, 9]).unwrap_err();
        assert_eq!(err, LifeError::InvalidIndex { index: 9, len: 9 });
        assert_eq!(grid.export_indices(), vec![4]);
    }

    #[test]
    fn test_load_counts_distinct_indices() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.load_from_indices([2, 2, 5]).unwrap();
        assert_eq!(grid.population(), 2);
    }

    #[test]
    fn test_single_cell_dies() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_cell(2, 2, true).unwrap();
        grid.advance();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 2);
    }

    #[test]
    fn test_block_is_still_life_on_torus() {
        for size in [4, 5, 8] {
            let mut grid = Grid::new(size, size).unwrap();
            let block = [
                grid.index(1, 1),
                grid.index(1, 2),
                grid.index(2, 1),
                grid.index(2, 2),
            ];
            grid.load_from_indices(block).unwrap();
            grid.advance();
            assert_eq!(grid.export_indices(), block.to_vec());
        }
    }

    #[test]
    fn test_block_across_wrap_is_still_life() {
        let mut grid = Grid::new(6, 6).unwrap();
        for (r, c) in [(0, 0), (0, 5), (5, 0), (5, 5)] {
            grid.set_cell(r, c, true).unwrap();
        }
        let before = grid.export_indices();
        grid.advance();
        assert_eq!(grid.export_indices(), before);
    }

    #[test]
    fn test_wraparound_neighbors() {
        // On a 3x3 torus every cell neighbors every other cell: the three
        // live cells survive with 2 neighbors and every dead cell sees 3.
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_cell(0, 0, true).unwrap();
        grid.set_cell(0, 2, true).unwrap();
        grid.set_cell(2, 1, true).unwrap();
        grid.advance();
        assert_eq!(grid.population(), 9);
    }

    #[test]
    fn test_column_minus_one_wraps() {
        // A vertical blinker in column 0 turns horizontal across the seam.
        let mut grid = Grid::new(5, 5).unwrap();
        for r in 1..=3 {
            grid.set_cell(r, 0, true).unwrap();
        }
        grid.advance();
        assert_eq!(grid.living_cells(), vec![(2, 0), (2, 1), (2, 4)]);
    }

    #[test]
    fn test_empty_grid_advance() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.advance();
        grid.advance();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 3);
    }

    #[test]
    fn test_population_matches_recount() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(17, 23).unwrap();
        grid.randomize(35, &mut rng).unwrap();
        assert_eq!(grid.population(), grid.recount());

        for step in 0..30 {
            grid.advance();
            assert_eq!(grid.population(), grid.recount());
            grid.set_cell(step % 17, step % 23, step % 2 == 0).unwrap();
            assert_eq!(grid.population(), grid.recount());
        }

        grid.load_from_indices([1, 2, 3, 100]).unwrap();
        assert_eq!(grid.population(), grid.recount());
        assert_eq!(grid.generation(), 31);
    }

    #[test]
    fn test_randomize_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = Grid::new(6, 6).unwrap();
        grid.randomize(100, &mut rng).unwrap();
        assert_eq!(grid.population(), 36);
        grid.randomize(0, &mut rng).unwrap();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 1);
        assert_eq!(grid.randomize(101, &mut rng), Err(LifeError::InvalidDensity(101)));
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set_cell(0, 1, true).unwrap();
        grid.set_cell(1, 2, true).unwrap();
        assert_eq!(grid.to_string(), "- * -\n- - *\n");
        assert!(grid.summary().contains("2 rows and 3 columns having 2 live cells"));
    }
}
