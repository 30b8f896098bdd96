//! Independent re-verification of still lifes

use super::StillLife;
use crate::error::LifeResult;
use crate::game_of_life::{GameOfLifeRules, Grid};
use std::fmt;

/// Dead rows and columns added on every side when re-embedding a pattern
pub const DEFAULT_PADDING: usize = 2;

/// Re-checks still lifes with the reference evolution rather than the
/// engine the search uses.
pub struct StillLifeValidator {
    padding: usize,
}

/// Result of validating one pattern
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// One generation on its own board leaves the pattern unchanged
    pub stable_on_board: bool,
    /// Still stable after moving it into a board padded with dead cells
    pub stable_when_embedded: bool,
    pub violations: Vec<RuleViolation>,
    pub error_message: Option<String>,
}

/// A cell whose state changes after one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub cell_position: (usize, usize),
    pub alive_before: bool,
    pub neighbor_count: u8,
    pub description: String,
}

impl Default for StillLifeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl StillLifeValidator {
    pub fn new(padding: usize) -> Self {
        Self { padding }
    }

    /// Validate a pattern on its own board and re-embedded in a larger one
    pub fn validate(&self, still_life: &StillLife) -> LifeResult<ValidationResult> {
        let grid = still_life.to_grid()?;
        let violations = Self::find_violations(&grid)?;
        let stable_on_board = violations.is_empty();

        let embedded = self.embed(still_life)?;
        let stable_when_embedded = Self::find_violations(&embedded)?.is_empty();

        let is_valid = stable_on_board && stable_when_embedded;
        let error_message = if !stable_on_board {
            Some(format!(
                "{} cell(s) change after one generation",
                violations.len()
            ))
        } else if !stable_when_embedded {
            Some("pattern is only stable because of wraparound at the board edge".to_string())
        } else {
            None
        };

        Ok(ValidationResult {
            is_valid,
            stable_on_board,
            stable_when_embedded,
            violations,
            error_message,
        })
    }

    fn embed(&self, still_life: &StillLife) -> LifeResult<Grid> {
        let rows = still_life.rows + 2 * self.padding;
        let cols = still_life.cols + 2 * self.padding;
        let mut grid = Grid::new(rows, cols)?;
        for (row, col) in still_life.coords() {
            grid.set_cell(row + self.padding, col + self.padding, true)?;
        }
        Ok(grid)
    }

    fn find_violations(grid: &Grid) -> LifeResult<Vec<RuleViolation>> {
        let next = GameOfLifeRules::evolve(grid)?;
        let mut violations = Vec::new();

        for (idx, (&before, &after)) in grid.cells().iter().zip(next.cells()).enumerate() {
            if before == after {
                continue;
            }
            let (row, col) = grid.coords(idx);
            let neighbor_count = GameOfLifeRules::neighbor_count(grid, row, col);
            let description = if before {
                format!("live cell with {} neighbors dies", neighbor_count)
            } else {
                format!("dead cell with {} neighbors is born", neighbor_count)
            };
            violations.push(RuleViolation {
                cell_position: (row, col),
                alive_before: before,
                neighbor_count,
                description,
            });
        }

        Ok(violations)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Stable on its board: {}", self.stable_on_board)?;
        writeln!(f, "  Stable when re-embedded: {}", self.stable_when_embedded)?;
        for violation in self.violations.iter().take(10) {
            writeln!(
                f,
                "  ({}, {}): {}",
                violation.cell_position.0, violation.cell_position.1, violation.description
            )?;
        }
        if self.violations.len() > 10 {
            writeln!(f, "  ... and {} more", self.violations.len() - 10)?;
        }
        Ok(())
    }
}
