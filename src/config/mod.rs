//! Configuration management for simulation runs and still-life searches

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, OutputConfig, OutputFormat, SearchConfig, SimulationConfig,
    Settings,
};
