//! Win evaluation
//!
//! Runs once every reel is at rest. Each pattern is matched left to right from
//! reel 0; the longest run sharing reel 0's symbol is looked up in the score
//! table as a whole. A run with no table entry scores nothing, even when a
//! shorter prefix of it would have (a full five-reel run is the usual case).
//! Only the single best-scoring pattern is reported; ties go to the earlier
//! pattern in catalog order.

use serde::{Deserialize, Serialize};

use crate::bank::SymbolGrid;
use crate::error::{ReelError, ReelResult};
use crate::paytable::{Pattern, PatternCatalog};
use crate::symbols::Symbol;

/// The best win of a spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    /// Symbol shared by the run
    pub symbol: Symbol,
    /// Reels in the run, counted from reel 0
    pub run_length: usize,
    /// Score from the combo table
    pub score: u32,
    /// Position of the pattern in the catalog
    pub pattern_index: usize,
    /// Pattern the run was found on
    pub pattern: Pattern,
}

impl WinResult {
    /// Winning cells as (reel, row)
    pub fn positions(&self) -> Vec<(usize, usize)> {
        self.pattern
            .rows()
            .iter()
            .take(self.run_length)
            .copied()
            .enumerate()
            .collect()
    }
}

/// Anchored run along one pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRun {
    pub symbol: Symbol,
    pub run_length: usize,
}

/// Length of the run starting at reel 0 along `pattern`
pub fn anchored_run<G: SymbolGrid + ?Sized>(grid: &G, pattern: &Pattern) -> ReelResult<PatternRun> {
    let rows = pattern.rows();
    let symbol = grid.symbol_at(0, rows[0])?;

    let mut run_length = 1;
    while run_length < rows.len() && grid.symbol_at(run_length, rows[run_length])? == symbol {
        run_length += 1;
    }

    Ok(PatternRun { symbol, run_length })
}

/// Scores a grid against a pattern catalog
#[derive(Debug, Clone, Copy)]
pub struct WinEvaluator<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> WinEvaluator<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Best win on `grid`, or `None`
    ///
    /// Fails if a reel is still moving or a pattern reaches past the grid.
    pub fn evaluate<G: SymbolGrid + ?Sized>(&self, grid: &G) -> ReelResult<Option<WinResult>> {
        if let Some(reel) = grid.reel_in_motion() {
            return Err(ReelError::ReelInMotion { reel });
        }

        let reel_count = grid.reel_count();
        let mut best: Option<WinResult> = None;

        for (index, pattern) in self.catalog.patterns().iter().enumerate() {
            if pattern.len() > reel_count {
                return Err(ReelError::PatternOutOfBounds {
                    pattern: index,
                    reason: format!("spans {} reels but the grid has {}", pattern.len(), reel_count),
                });
            }

            let run = anchored_run(grid, pattern)?;
            if run.run_length < 2 {
                continue;
            }

            let Some(score) = self.catalog.score(run.symbol, run.run_length) else {
                log::trace!(
                    "pattern {}: run of {} x{} has no table entry",
                    index,
                    run.symbol,
                    run.run_length
                );
                continue;
            };

            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(WinResult {
                    symbol: run.symbol,
                    run_length: run.run_length,
                    score,
                    pattern_index: index,
                    pattern: pattern.clone(),
                });
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::ComboEntry;

    fn grid(columns: &[[u8; 3]]) -> Vec<Vec<Symbol>> {
        columns
            .iter()
            .map(|col| col.iter().map(|&id| Symbol::new(id).unwrap()).collect())
            .collect()
    }

    #[test]
    fn test_three_watermelons_on_top_row() {
        let catalog = PatternCatalog::standard();
        let grid = grid(&[[1, 4, 5], [1, 6, 3], [1, 2, 4], [3, 5, 6], [2, 0, 5]]);

        let win = WinEvaluator::new(&catalog).evaluate(&grid).unwrap().unwrap();
        assert_eq!(win.symbol, Symbol::WATERMELON);
        assert_eq!(win.run_length, 3);
        assert_eq!(win.score, 30);
        assert_eq!(win.pattern_index, 0);
        assert_eq!(win.positions(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_no_anchored_run() {
        let catalog = PatternCatalog::standard();
        // Reel 0 never matches reel 1 on any pattern row pair
        let grid = grid(&[[0, 1, 2], [3, 4, 5], [0, 0, 0], [0, 0, 0], [0, 0, 0]]);
        assert_eq!(WinEvaluator::new(&catalog).evaluate(&grid).unwrap(), None);
    }

    #[test]
    fn test_run_must_start_at_reel_zero() {
        let catalog = PatternCatalog::standard();
        // Lemon, then four bells on row 1: not anchored
        let grid = grid(&[[2, 5, 3], [4, 0, 6], [6, 0, 4], [3, 0, 1], [1, 0, 2]]);
        assert_eq!(WinEvaluator::new(&catalog).evaluate(&grid).unwrap(), None);
    }

    #[test]
    fn test_full_run_of_five_scores_nothing() {
        let catalog = PatternCatalog::standard();
        let grid = grid(&[[3, 0, 5], [4, 0, 6], [6, 0, 4], [3, 0, 1], [1, 0, 2]]);
        assert_eq!(WinEvaluator::new(&catalog).evaluate(&grid).unwrap(), None);

        // Same grid with the last bell broken scores 100 for four
        let grid_four = self::grid(&[[3, 0, 5], [4, 0, 6], [6, 0, 4], [3, 0, 1], [1, 2, 2]]);
        let win = WinEvaluator::new(&catalog).evaluate(&grid_four).unwrap().unwrap();
        assert_eq!((win.symbol, win.run_length, win.score), (Symbol::BELL, 4, 100));
    }

    #[test]
    fn test_best_score_wins() {
        let catalog = PatternCatalog::standard();
        // Row 0: cherries x2 (2). Row 2: oranges x3 (15).
        let grid = grid(&[[6, 1, 4], [6, 3, 4], [5, 2, 4], [2, 1, 5], [0, 3, 3]]);
        let win = WinEvaluator::new(&catalog).evaluate(&grid).unwrap().unwrap();
        assert_eq!(win.pattern_index, 2);
        assert_eq!(win.score, 15);
    }

    #[test]
    fn test_tie_goes_to_earlier_pattern() {
        let catalog = PatternCatalog::standard();
        // Row 0 and the 0,2,0,2,0 zig-zag both give lemon x2 = 5
        let grid = grid(&[[5, 1, 2], [5, 3, 5], [2, 6, 0], [4, 4, 4], [3, 3, 3]]);
        let win = WinEvaluator::new(&catalog).evaluate(&grid).unwrap().unwrap();
        assert_eq!(win.score, 5);
        assert_eq!(win.pattern_index, 0);

        // Reversing catalog order flips the winner
        let mut reversed = catalog.patterns().to_vec();
        reversed.reverse();
        let catalog = PatternCatalog::new(reversed, catalog.combos().to_vec()).unwrap();
        let win = WinEvaluator::new(&catalog).evaluate(&grid).unwrap().unwrap();
        assert_eq!(win.pattern_index, 1);
        assert_eq!(win.pattern.rows(), &[0, 2, 0, 2, 0]);
    }

    #[test]
    fn test_missing_entry_is_not_a_win() {
        let patterns = vec![Pattern::straight(0, 3).unwrap()];
        let combos = vec![ComboEntry::new(Symbol::BELL, 3, 75)];
        let catalog = PatternCatalog::new(patterns, combos).unwrap();

        let grid = grid(&[[0, 1, 1], [0, 1, 1], [4, 1, 1]]);
        assert_eq!(WinEvaluator::new(&catalog).evaluate(&grid).unwrap(), None);
    }

    #[test]
    fn test_pattern_wider_than_grid() {
        let catalog = PatternCatalog::standard();
        let grid = grid(&[[0, 1, 2], [0, 1, 2]]);
        assert!(matches!(
            WinEvaluator::new(&catalog).evaluate(&grid),
            Err(ReelError::PatternOutOfBounds { pattern: 0, .. })
        ));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let catalog = PatternCatalog::standard();
        let grid = grid(&[[0, 1, 2], [0, 2, 1], [0, 1, 2], [5, 5, 5], [0, 0, 0]]);
        let evaluator = WinEvaluator::new(&catalog);
        let first = evaluator.evaluate(&grid).unwrap();
        for _ in 0..10 {
            assert_eq!(evaluator.evaluate(&grid).unwrap(), first);
        }
        assert_eq!(first.map(|w| w.score), Some(75));
    }
}
