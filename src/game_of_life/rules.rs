//! Conway's rule set and a pure reference evolution on the torus

use super::Grid;
use crate::error::LifeResult;
use rayon::prelude::*;

/// Game of Life rules engine
pub struct GameOfLifeRules;

impl GameOfLifeRules {
    /// B3/S23: a dead cell with 3 neighbors is born, a live cell with 2 or 3 survives
    #[inline]
    pub fn should_be_alive(current_state: bool, neighbor_count: u8) -> bool {
        matches!((current_state, neighbor_count), (true, 2) | (true, 3) | (false, 3))
    }

    /// Count live cells among the 8 toroidal neighbor positions of `(row, col)`
    pub fn neighbor_count(grid: &Grid, row: usize, col: usize) -> u8 {
        let (rows, cols) = (grid.rows(), grid.cols());
        let cells = grid.cells();
        let mut count = 0;

        for (i, dr) in [rows - 1, 0, 1].into_iter().enumerate() {
            for (j, dc) in [cols - 1, 0, 1].into_iter().enumerate() {
                if i == 1 && j == 1 {
                    continue;
                }
                let r = (row + dr) % rows;
                let c = (col + dc) % cols;
                if cells[r * cols + c] {
                    count += 1;
                }
            }
        }

        count
    }

    /// Compute the next generation without touching `current`.
    ///
    /// Gathers neighbor counts per cell in parallel. Slower than
    /// [`Grid::advance`] but shares no code with it, so the two can check
    /// each other.
    pub fn evolve(current: &Grid) -> LifeResult<Grid> {
        let cols = current.cols();
        let next_cells: Vec<usize> = (0..current.len())
            .into_par_iter()
            .filter(|&idx| {
                let (row, col) = (idx / cols, idx % cols);
                let neighbors = Self::neighbor_count(current, row, col);
                Self::should_be_alive(current.cells()[idx], neighbors)
            })
            .collect();

        let mut next = Grid::new(current.rows(), current.cols())?;
        next.load_from_indices(next_cells)?;
        next.set_generation(current.generation() + 1)?;
        Ok(next)
    }

    /// Whether one generation leaves the live-cell set unchanged
    pub fn is_still_life(grid: &Grid) -> LifeResult<bool> {
        let next = Self::evolve(grid)?;
        Ok(next.cells() == grid.cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows.len(), rows[0].len()).unwrap();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                grid.set_cell(r, c, ch == '1').unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_rule_logic() {
        assert!(GameOfLifeRules::should_be_alive(true, 2));
        assert!(GameOfLifeRules::should_be_alive(true, 3));
        assert!(GameOfLifeRules::should_be_alive(false, 3));
        assert!(!GameOfLifeRules::should_be_alive(true, 1));
        assert!(!GameOfLifeRules::should_be_alive(true, 4));
        assert!(!GameOfLifeRules::should_be_alive(false, 2));
        assert!(!GameOfLifeRules::should_be_alive(false, 8));
    }

    #[test]
    fn test_neighbor_count_wraps_columns() {
        let grid = grid_from_rows(&["101", "000", "000"]);
        // Column -1 of (0,0) is column 2.
        assert_eq!(GameOfLifeRules::neighbor_count(&grid, 0, 0), 1);
        assert_eq!(GameOfLifeRules::neighbor_count(&grid, 0, 2), 1);
        assert_eq!(GameOfLifeRules::neighbor_count(&grid, 2, 1), 2);
    }

    #[test]
    fn test_neighbor_count_full_ring() {
        let grid = grid_from_rows(&["11111", "11111", "11011", "11111", "11111"]);
        assert_eq!(GameOfLifeRules::neighbor_count(&grid, 2, 2), 8);
        assert_eq!(GameOfLifeRules::neighbor_count(&grid, 0, 0), 8);
        assert_eq!(GameOfLifeRules::neighbor_count(&grid, 1, 1), 7);
    }

    #[test]
    fn test_still_life_block() {
        let grid = grid_from_rows(&["0000", "0110", "0110", "0000"]);
        assert!(GameOfLifeRules::is_still_life(&grid).unwrap());
    }

    #[test]
    fn test_oscillator_blinker() {
        let grid = grid_from_rows(&["00000", "00000", "01110", "00000", "00000"]);
        let evolved = GameOfLifeRules::evolve(&grid).unwrap();
        let expected = grid_from_rows(&["00000", "00100", "00100", "00100", "00000"]);
        assert_eq!(evolved, expected);
        assert_eq!(evolved.generation(), 2);

        let evolved_twice = GameOfLifeRules::evolve(&evolved).unwrap();
        assert_eq!(evolved_twice, grid);
        assert!(!GameOfLifeRules::is_still_life(&grid).unwrap());
    }

    #[test]
    fn test_evolve_matches_advance() {
        let mut rng = StdRng::seed_from_u64(42);
        for (rows, cols) in [(1, 1), (1, 7), (2, 2), (3, 5), (12, 9), (20, 20)] {
            let mut grid = Grid::new(rows, cols).unwrap();
            grid.randomize(40, &mut rng).unwrap();
            for _ in 0..10 {
                let reference = GameOfLifeRules::evolve(&grid).unwrap();
                grid.advance();
                assert_eq!(grid, reference, "{}x{} diverged", rows, cols);
                assert_eq!(grid.population(), reference.population());
                assert_eq!(grid.generation(), reference.generation());
            }
        }
    }
}
