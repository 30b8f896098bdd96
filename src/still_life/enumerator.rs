//! Exhaustive still-life search
//!
//! Candidates are `k`-combinations of interior cells visited in
//! lexicographic order. Each one passes three filters before it is
//! simulated: the half-width cutoff (which ends the whole search), the
//! translation filter and the symmetry filter. Survivors are loaded into
//! a scratch grid, advanced once and reported when nothing changed.

use super::interior::Interior;
use super::result::StillLife;
use crate::error::LifeResult;
use crate::game_of_life::Grid;
use itertools::{Combinations, Itertools};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking a running search to stop.
///
/// Clones observe the same flag. The search checks it before every
/// candidate, so a cancel takes effect within one candidate's work.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Counters describing how a search went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Combinations taken from the generator (excluding the one that hit the cutoff)
    pub combinations_examined: u64,
    /// Rejected because they do not touch the interior's top row and left column
    pub translations_skipped: u64,
    /// Rejected because a symmetric image sorts lower
    pub symmetric_skipped: u64,
    /// Candidates loaded into a grid and advanced
    pub simulated: u64,
    pub still_lifes_found: u64,
    pub cancelled: bool,
    /// The search ended at the half-width cutoff rather than by exhaustion
    pub halted_at_half_width: bool,
}

impl SearchStatistics {
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.combinations_examined += other.combinations_examined;
        self.translations_skipped += other.translations_skipped;
        self.symmetric_skipped += other.symmetric_skipped;
        self.simulated += other.simulated;
        self.still_lifes_found += other.still_lifes_found;
        self.cancelled |= other.cancelled;
        self.halted_at_half_width |= other.halted_at_half_width;
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Combinations examined: {}", self.combinations_examined)?;
        writeln!(f, "  Skipped as translations: {}", self.translations_skipped)?;
        writeln!(f, "  Skipped as symmetric images: {}", self.symmetric_skipped)?;
        writeln!(f, "  Simulated: {}", self.simulated)?;
        writeln!(f, "  Still lifes found: {}", self.still_lifes_found)?;
        if self.cancelled {
            writeln!(f, "  Search was cancelled")?;
        } else if self.halted_at_half_width {
            writeln!(f, "  Stopped at the half-width cutoff")?;
        }
        Ok(())
    }
}

/// Filters and simulates single candidates. Owns the scratch grid that is
/// reloaded for every candidate.
#[derive(Debug, Clone)]
struct CandidateExaminer {
    interior: Interior,
    scratch: Grid,
    board_cells: Vec<usize>,
    image: Vec<usize>,
}

impl CandidateExaminer {
    fn new(interior: Interior, scratch: Grid) -> Self {
        Self {
            interior,
            scratch,
            board_cells: Vec::new(),
            image: Vec::new(),
        }
    }

    fn examine(&mut self, combination: &[usize], stats: &mut SearchStatistics) -> Option<StillLife> {
        if !self.interior.touches_origin(combination) {
            stats.translations_skipped += 1;
            return None;
        }
        if !self.interior.is_canonical(combination, &mut self.image) {
            stats.symmetric_skipped += 1;
            return None;
        }

        self.board_cells.clear();
        self.board_cells
            .extend(combination.iter().map(|&idx| self.interior.to_board_index(idx)));

        let loaded = self.scratch.load_from_indices(self.board_cells.iter().copied());
        debug_assert!(loaded.is_ok(), "interior cell outside the board: {:?}", loaded);
        if let Err(err) = loaded {
            warn!("Skipping candidate {:?}: {}", combination, err);
            return None;
        }
        self.scratch.advance();
        stats.simulated += 1;

        // Both sides are ascending, so slice equality is set equality.
        if self.scratch.export_indices() == self.board_cells {
            stats.still_lifes_found += 1;
            Some(StillLife::new(
                self.interior.board_rows(),
                self.interior.board_cols(),
                self.board_cells.clone(),
            ))
        } else {
            None
        }
    }
}

/// Searches a `rows x cols` board for still lifes of exactly `size` cells.
///
/// Only the translate touching the interior's top row and left column is
/// considered, and only when it sorts lowest among its images under the
/// symmetries of the interior rectangle (8 for a square interior, 4
/// otherwise). A `size` of 0 reports nothing: the empty board is stable
/// but is not counted as a still life.
#[derive(Debug, Clone)]
pub struct StillLifeEnumerator {
    interior: Interior,
    size: usize,
    cancel: CancelToken,
    max_results: Option<usize>,
    template: Grid,
}

impl StillLifeEnumerator {
    pub fn new(rows: usize, cols: usize, size: usize) -> LifeResult<Self> {
        let interior = Interior::new(rows, cols)?;
        let template = Grid::new(rows, cols)?;

        Ok(Self {
            interior,
            size,
            cancel: CancelToken::new(),
            max_results: None,
            template,
        })
    }

    /// Share an existing cancel flag with this search
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Stop once this many still lifes have been reported
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn interior(&self) -> &Interior {
        &self.interior
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ask a running search to stop before its next candidate
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Lazily enumerate still lifes in lexicographic order of their
    /// interior combinations
    pub fn search(&self) -> StillLifeSearch {
        info!(
            "Searching {}x{} board ({}x{} interior) for still lifes of {} cells",
            self.interior.board_rows(),
            self.interior.board_cols(),
            self.interior.rows(),
            self.interior.cols(),
            self.size
        );

        let combinations = (self.size > 0).then(|| (0..self.interior.len()).combinations(self.size));

        StillLifeSearch {
            examiner: CandidateExaminer::new(self.interior, self.template.clone()),
            combinations,
            cancel: self.cancel.clone(),
            max_results: self.max_results,
            stats: SearchStatistics::default(),
            done: false,
        }
    }

    /// Run the search to completion, handing each still life to `sink`
    pub fn run<F>(&self, mut sink: F) -> SearchStatistics
    where
        F: FnMut(&StillLife),
    {
        let mut search = self.search();
        for still_life in search.by_ref() {
            sink(&still_life);
        }
        *search.statistics()
    }

    /// Run the search to completion and collect every still life
    pub fn collect(&self) -> (Vec<StillLife>, SearchStatistics) {
        let mut found = Vec::new();
        let stats = self.run(|still_life| found.push(still_life.clone()));
        (found, stats)
    }

    /// Same result set as [`StillLifeEnumerator::collect`], searched in
    /// parallel with one shard per smallest element.
    ///
    /// Shards are merged in order, so the results keep the sequential
    /// order. `max_results` truncates after the merge.
    pub fn collect_parallel(&self) -> (Vec<StillLife>, SearchStatistics) {
        let mut stats = SearchStatistics::default();
        if self.size == 0 {
            return (Vec::new(), stats);
        }

        let n = self.interior.len();
        let cutoff = self.interior.half_width_cutoff();
        let firsts: Vec<usize> = (0..cutoff.unwrap_or(n).min(n)).collect();
        // The sequential search only meets the cutoff if some combination starts there.
        stats.halted_at_half_width = cutoff.is_some_and(|c| n - c >= self.size);

        info!(
            "Searching {}x{} board for still lifes of {} cells across {} shards",
            self.interior.board_rows(),
            self.interior.board_cols(),
            self.size,
            firsts.len()
        );

        let shards: Vec<(Vec<StillLife>, SearchStatistics)> = firsts
            .par_iter()
            .map(|&first| self.search_shard(first))
            .collect();

        let mut found = Vec::new();
        for (shard_found, shard_stats) in shards {
            found.extend(shard_found);
            stats.merge(&shard_stats);
        }

        if let Some(max) = self.max_results {
            found.truncate(max);
            stats.still_lifes_found = found.len() as u64;
        }
        if stats.cancelled {
            warn!("Still-life search cancelled after {} candidates", stats.combinations_examined);
        }
        info!("Found {} still lifes", found.len());

        (found, stats)
    }

    fn search_shard(&self, first: usize) -> (Vec<StillLife>, SearchStatistics) {
        let mut examiner = CandidateExaminer::new(self.interior, self.template.clone());
        let mut stats = SearchStatistics::default();
        let mut found = Vec::new();
        let mut combination = Vec::with_capacity(self.size);

        for rest in (first + 1..self.interior.len()).combinations(self.size - 1) {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            combination.clear();
            combination.push(first);
            combination.extend(rest);

            stats.combinations_examined += 1;
            if let Some(still_life) = examiner.examine(&combination, &mut stats) {
                found.push(still_life);
            }
        }

        debug!(
            "Shard starting at cell {}: {} combinations, {} still lifes",
            first, stats.combinations_examined, stats.still_lifes_found
        );
        (found, stats)
    }
}

/// Outcome of examining one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    Found(StillLife),
    /// Filtered out or not still
    Rejected,
    Finished,
}

/// Iterator over the still lifes of one search.
///
/// [`StillLifeSearch::step`] exposes every candidate, so callers can report
/// progress between still lifes.
pub struct StillLifeSearch {
    examiner: CandidateExaminer,
    combinations: Option<Combinations<Range<usize>>>,
    cancel: CancelToken,
    max_results: Option<usize>,
    stats: SearchStatistics,
    done: bool,
}

impl StillLifeSearch {
    /// Counters so far; final once the iterator returned `None`
    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Examine the next candidate
    pub fn step(&mut self) -> SearchStep {
        if self.done {
            return SearchStep::Finished;
        }
        if self.cancel.is_cancelled() {
            self.stats.cancelled = true;
            self.finish();
            return SearchStep::Finished;
        }
        if self
            .max_results
            .is_some_and(|max| self.stats.still_lifes_found >= max as u64)
        {
            self.finish();
            return SearchStep::Finished;
        }

        let Some(combination) = self.combinations.as_mut().and_then(Iterator::next) else {
            self.finish();
            return SearchStep::Finished;
        };

        if self.examiner.interior.past_half_width(combination[0]) {
            self.stats.halted_at_half_width = true;
            self.finish();
            return SearchStep::Finished;
        }
        self.stats.combinations_examined += 1;

        match self.examiner.examine(&combination, &mut self.stats) {
            Some(still_life) => SearchStep::Found(still_life),
            None => SearchStep::Rejected,
        }
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if self.stats.cancelled {
            warn!(
                "Still-life search cancelled after {} candidates",
                self.stats.combinations_examined
            );
        }
        info!("Found {} still lifes", self.stats.still_lifes_found);
        debug!("{}", self.stats);
    }
}

impl Iterator for StillLifeSearch {
    type Item = StillLife;

    fn next(&mut self) -> Option<StillLife> {
        loop {
            match self.step() {
                SearchStep::Found(still_life) => return Some(still_life),
                SearchStep::Rejected => continue,
                SearchStep::Finished => return None,
            }
        }
    }
}
