//! Game of Life core functionality

pub mod grid;
pub mod io;
pub mod rules;

pub use grid::Grid;
pub use io::{
    create_example_patterns, load_grid_from_file, load_pattern_from_file, save_grid_to_file,
    save_pattern_to_file, Pattern,
};
pub use rules::GameOfLifeRules;
