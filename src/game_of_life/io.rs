//! `.life` pattern files
//!
//! A pattern file has three parts:
//!
//! ```text
//! <rows> <cols>
//! <generation>
//! (<idx0>, <idx1>, ..., <idxN>)
//! ```
//!
//! Indices use the grid encoding `row * cols + col`. The tuple is written
//! Python style (`()`, `(5,)`, `(1, 2, 3)`) and may span several lines.

use super::Grid;
use crate::error::{LifeError, LifeResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File extension used for saved patterns
pub const PATTERN_EXTENSION: &str = "life";

/// A serialisable snapshot of a board: size, generation and live cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub rows: usize,
    pub cols: usize,
    pub generation: u64,
    pub cells: Vec<usize>,
}

impl Pattern {
    /// Capture the live cells and generation of a grid
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            generation: grid.generation(),
            cells: grid.export_indices(),
        }
    }

    /// Build a generation-1 pattern from `(row, col)` coordinates
    pub fn from_coords(rows: usize, cols: usize, coords: &[(usize, usize)]) -> LifeResult<Self> {
        let mut grid = Grid::new(rows, cols)?;
        for &(row, col) in coords {
            grid.set_cell(row, col, true)?;
        }
        Ok(Self::from_grid(&grid))
    }

    /// Recreate the grid this pattern describes
    pub fn to_grid(&self) -> LifeResult<Grid> {
        let mut grid = Grid::new(self.rows, self.cols)?;
        grid.load_from_indices(self.cells.iter().copied())?;
        grid.set_generation(self.generation)?;
        Ok(grid)
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.len()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows, self.cols)?;
        writeln!(f, "{}", self.generation)?;
        write!(f, "{}", format_index_tuple(&self.cells))
    }
}

impl FromStr for Pattern {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pattern(s)
    }
}

/// Write indices as a Python tuple literal
pub fn format_index_tuple(indices: &[usize]) -> String {
    match indices {
        [] => "()".to_string(),
        [single] => format!("({},)", single),
        _ => {
            let body: Vec<String> = indices.iter().map(|idx| idx.to_string()).collect();
            format!("({})", body.join(", "))
        }
    }
}

/// Parse a parenthesised, comma separated index list.
///
/// Values are returned as written; range checks happen in [`parse_pattern`].
pub fn parse_index_tuple(text: &str) -> LifeResult<Vec<i64>> {
    let text = text.trim();
    let inner = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| {
            LifeError::MalformedPattern(format!("expected a parenthesised index list, found {:?}", text))
        })?;

    let mut parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.last().is_some_and(|last| last.is_empty()) {
        parts.pop();
    }

    parts
        .into_iter()
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| LifeError::MalformedPattern(format!("invalid cell index {:?}", part)))
        })
        .collect()
}

/// Parse the text of a `.life` file
pub fn parse_pattern(content: &str) -> LifeResult<Pattern> {
    let mut lines = content.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| LifeError::MalformedPattern("pattern is empty".to_string()))?;
    let dims: Vec<&str> = header.split_whitespace().collect();
    let [rows, cols] = dims.as_slice() else {
        return Err(LifeError::MalformedPattern(format!(
            "expected \"<rows> <cols>\", found {:?}",
            header
        )));
    };
    let rows = parse_number::<usize>(rows, "row count")?;
    let cols = parse_number::<usize>(cols, "column count")?;
    if rows == 0 || cols == 0 {
        return Err(LifeError::InvalidDimension { rows, cols });
    }

    let generation_line = lines
        .next()
        .ok_or_else(|| LifeError::MalformedPattern("missing generation line".to_string()))?;
    let generation = parse_number::<u64>(generation_line, "generation")?;
    if generation == 0 {
        return Err(LifeError::MalformedPattern("generation numbers start at 1".to_string()));
    }

    let tuple: Vec<&str> = lines.collect();
    if tuple.is_empty() {
        return Err(LifeError::MalformedPattern("missing cell index list".to_string()));
    }

    let len = rows.checked_mul(cols).ok_or_else(|| {
        LifeError::MalformedPattern(format!("a {}x{} board is too large", rows, cols))
    })?;
    let mut cells = Vec::new();
    for index in parse_index_tuple(&tuple.join(" "))? {
        if index < 0 || index as u64 >= len as u64 {
            return Err(LifeError::InvalidIndex { index, len });
        }
        cells.push(index as usize);
    }
    cells.sort_unstable();
    cells.dedup();

    Ok(Pattern {
        rows,
        cols,
        generation,
        cells,
    })
}

fn parse_number<T: FromStr>(text: &str, what: &str) -> LifeResult<T> {
    text.trim()
        .parse()
        .map_err(|_| LifeError::MalformedPattern(format!("invalid {}: {:?}", what, text)))
}

/// Load a pattern from a `.life` file
pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<Pattern> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read pattern file: {}", path.as_ref().display()))?;

    parse_pattern(&content)
        .with_context(|| format!("Failed to parse pattern from file: {}", path.as_ref().display()))
}

/// Save a pattern to a `.life` file
pub fn save_pattern_to_file<P: AsRef<Path>>(pattern: &Pattern, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, pattern.to_string())
        .with_context(|| format!("Failed to write pattern to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Load a pattern file straight into a grid, generation included
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let pattern = load_pattern_from_file(&path)?;
    pattern
        .to_grid()
        .with_context(|| format!("Invalid pattern in {}", path.as_ref().display()))
}

/// Save the current state of a grid
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    save_pattern_to_file(&Pattern::from_grid(grid), path)
}

/// Write a handful of well known patterns into `output_dir`
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples: [(&str, usize, usize, &[(usize, usize)]); 4] = [
        ("block", 4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]),
        ("beehive", 5, 6, &[(1, 2), (1, 3), (2, 1), (2, 4), (3, 2), (3, 3)]),
        ("blinker", 5, 5, &[(2, 1), (2, 2), (2, 3)]),
        ("glider", 8, 8, &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]),
    ];

    for (name, rows, cols, coords) in examples {
        let pattern = Pattern::from_coords(rows, cols, coords)
            .with_context(|| format!("Invalid example pattern {}", name))?;
        let path = dir.join(format!("{}.{}", name, PATTERN_EXTENSION));
        save_pattern_to_file(&pattern, &path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_pattern() {
        let content = "5 6\n12\n(7, 8, 13)\n";
        let pattern = parse_pattern(content).unwrap();

        assert_eq!(pattern.rows, 5);
        assert_eq!(pattern.cols, 6);
        assert_eq!(pattern.generation, 12);
        assert_eq!(pattern.cells, vec![7, 8, 13]);

        let grid = pattern.to_grid().unwrap();
        assert!(grid.get(1, 1).unwrap());
        assert!(grid.get(1, 2).unwrap());
        assert!(grid.get(2, 1).unwrap());
        assert_eq!(grid.population(), 3);
        assert_eq!(grid.generation(), 12);
    }

    #[test]
    fn test_tuple_formats() {
        assert_eq!(format_index_tuple(&[]), "()");
        assert_eq!(format_index_tuple(&[5]), "(5,)");
        assert_eq!(format_index_tuple(&[1, 2, 3]), "(1, 2, 3)");

        assert_eq!(parse_index_tuple("()").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_index_tuple("(5,)").unwrap(), vec![5]);
        assert_eq!(parse_index_tuple(" ( 1,2 ,\t3 ) ").unwrap(), vec![1, 2, 3]);
        assert!(parse_index_tuple("1, 2").is_err());
        assert!(parse_index_tuple("(1,,2)").is_err());
        assert!(parse_index_tuple("(a)").is_err());
    }

    #[test]
    fn test_tuple_may_span_lines() {
        let pattern = parse_pattern("3 3\n1\n(0,\n 4,\n 8)").unwrap();
        assert_eq!(pattern.cells, vec![0, 4, 8]);
    }

    #[test]
    fn test_round_trip_keeps_cells_and_generation() {
        let mut grid = Grid::new(6, 9).unwrap();
        for (r, c) in [(0, 0), (2, 5), (5, 8), (3, 3)] {
            grid.set_cell(r, c, true).unwrap();
        }
        grid.advance_by(4);

        let text = Pattern::from_grid(&grid).to_string();
        let restored = parse_pattern(&text).unwrap().to_grid().unwrap();

        assert_eq!(restored, grid);
        assert_eq!(restored.generation(), grid.generation());
        assert_eq!(restored.export_indices(), grid.export_indices());
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(parse_pattern(""), Err(LifeError::MalformedPattern(_))));
        assert!(matches!(parse_pattern("5\n1\n()"), Err(LifeError::MalformedPattern(_))));
        assert!(matches!(parse_pattern("5 x\n1\n()"), Err(LifeError::MalformedPattern(_))));
        assert!(matches!(parse_pattern("5 5\n1"), Err(LifeError::MalformedPattern(_))));
        assert!(matches!(parse_pattern("5 5\n0\n()"), Err(LifeError::MalformedPattern(_))));
        assert!(matches!(parse_pattern("5 5\n1\n[1, 2]"), Err(LifeError::MalformedPattern(_))));
        assert_eq!(
            parse_pattern("0 5\n1\n()"),
            Err(LifeError::InvalidDimension { rows: 0, cols: 5 })
        );
        assert_eq!(
            parse_pattern("2 2\n1\n(0, 4)"),
            Err(LifeError::InvalidIndex { index: 4, len: 4 })
        );
        assert_eq!(
            parse_pattern("2 2\n1\n(-1,)"),
            Err(LifeError::InvalidIndex { index: -1, len: 4 })
        );
    }

    #[test]
    fn test_oversized_board_is_malformed() {
        assert!(matches!(
            parse_pattern("4294967296 4294967296\n1\n(5,)"),
            Err(LifeError::MalformedPattern(_))
        ));
    }

    #[test]
    fn test_zero_generation_is_rejected_when_rebuilding() {
        let pattern = Pattern {
            rows: 4,
            cols: 4,
            generation: 0,
            cells: vec![5, 6, 9, 10],
        };
        assert_eq!(pattern.to_grid().unwrap_err(), LifeError::InvalidGeneration(0));
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/test.life");

        let mut grid = Grid::new(4, 5).unwrap();
        grid.load_from_indices([1, 7, 19]).unwrap();
        grid.set_generation(3).unwrap();

        save_grid_to_file(&grid, &file_path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&file_path).unwrap(),
            "4 5\n3\n(1, 7, 19)"
        );

        let loaded = load_grid_from_file(&file_path).unwrap();
        assert_eq!(loaded, grid);
        assert_eq!(loaded.generation(), 3);
    }

    #[test]
    fn test_create_example_patterns() {
        let temp_dir = tempdir().unwrap();
        create_example_patterns(temp_dir.path()).unwrap();

        for name in ["block", "beehive", "blinker", "glider"] {
            assert!(temp_dir.path().join(format!("{}.life", name)).exists());
        }

        let glider = load_pattern_from_file(temp_dir.path().join("glider.life")).unwrap();
        assert_eq!((glider.rows, glider.cols), (8, 8));
        assert_eq!(glider.population(), 5);

        let block = load_pattern_from_file(temp_dir.path().join("block.life")).unwrap();
        assert_eq!(block.cells, vec![5, 6, 9, 10]);
    }
}
