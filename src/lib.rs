//! Game of Life on a toroidal grid, plus an exhaustive still-life search
//!
//! The [`game_of_life`] module holds the grid engine and the `.life`
//! pattern format; [`still_life`] enumerates still lifes of a given size
//! on a board, visiting each shape once up to translation and the
//! symmetries of the board.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod still_life;
pub mod utils;

pub use config::Settings;
pub use error::{LifeError, LifeResult};
pub use game_of_life::{Grid, Pattern};
pub use still_life::{CancelToken, SearchStatistics, StillLife, StillLifeEnumerator};

use anyhow::Result;

/// Main entry point: run the still-life search described by `settings`
pub fn find_still_lifes(settings: &Settings) -> Result<(Vec<StillLife>, SearchStatistics)> {
    find_still_lifes_with_cancel(settings, CancelToken::new())
}

/// Like [`find_still_lifes`], stopping early once `cancel` is triggered
pub fn find_still_lifes_with_cancel(
    settings: &Settings,
    cancel: CancelToken,
) -> Result<(Vec<StillLife>, SearchStatistics)> {
    settings.validate_search()?;

    let enumerator = StillLifeEnumerator::new(
        settings.board.rows,
        settings.board.cols,
        settings.search.target_still_life_size,
    )?
    .with_cancel_token(cancel)
    .with_max_results(settings.search.max_results);

    Ok(if settings.search.parallel {
        enumerator.collect_parallel()
    } else {
        enumerator.collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_still_lifes() {
        let mut settings = Settings::default();
        settings.board.rows = 5;
        settings.board.cols = 5;
        settings.search.target_still_life_size = 4;

        let (found, stats) = find_still_lifes(&settings).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(stats.still_lifes_found, 2);

        settings.search.parallel = true;
        let (parallel, _) = find_still_lifes(&settings).unwrap();
        assert_eq!(parallel, found);
    }

    #[test]
    fn test_find_still_lifes_rejects_small_board() {
        let mut settings = Settings::default();
        settings.board.rows = 2;
        assert!(find_still_lifes(&settings).is_err());
    }
}
