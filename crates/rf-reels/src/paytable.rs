//! Winning patterns and the combo score table

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};
use crate::symbols::Symbol;

/// Shortest pattern the catalog accepts
pub const MIN_PATTERN_LEN: usize = 2;
/// Longest pattern the catalog accepts
pub const MAX_PATTERN_LEN: usize = 5;
/// Run lengths that may carry a score (1 and 5 never score)
pub const SCORABLE_RUNS: std::ops::RangeInclusive<u8> = 2..=4;

/// Row offsets, one per reel starting at reel 0
///
/// Matching is anchored at reel 0: a pattern broken at reel 0 never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Pattern {
    rows: Vec<usize>,
}

impl Pattern {
    /// Create a pattern from per-reel rows
    pub fn new(rows: Vec<usize>) -> ReelResult<Self> {
        if !(MIN_PATTERN_LEN..=MAX_PATTERN_LEN).contains(&rows.len()) {
            return Err(ReelError::InvalidPattern(format!(
                "length {} is outside {}..={}",
                rows.len(),
                MIN_PATTERN_LEN,
                MAX_PATTERN_LEN
            )));
        }
        Ok(Self { rows })
    }

    /// Same row on every reel
    pub fn straight(row: usize, reel_count: usize) -> ReelResult<Self> {
        Self::new(vec![row; reel_count])
    }

    /// Row offsets by reel
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Row on `reel`, if the pattern reaches that far
    pub fn row(&self, reel: usize) -> Option<usize> {
        self.rows.get(reel).copied()
    }

    /// Number of reels spanned
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true for a constructed pattern
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check the pattern against a bank of `reel_count` reels with `visible_rows` rows
    pub fn check_fits(&self, index: usize, reel_count: usize, visible_rows: usize) -> ReelResult<()> {
        if self.rows.len() > reel_count {
            return Err(ReelError::PatternOutOfBounds {
                pattern: index,
                reason: format!("spans {} reels but the bank has {}", self.rows.len(), reel_count),
            });
        }
        if let Some((reel, &row)) = self.rows.iter().enumerate().find(|(_, row)| **row >= visible_rows) {
            return Err(ReelError::PatternOutOfBounds {
                pattern: index,
                reason: format!("row {} on reel {} is not a visible row (0..{})", row, reel, visible_rows),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<usize>> for Pattern {
    type Error = ReelError;

    fn try_from(rows: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<Pattern> for Vec<usize> {
    fn from(pattern: Pattern) -> Self {
        pattern.rows
    }
}

/// Score for a run of `run_length` copies of `symbol` starting at reel 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboEntry {
    pub symbol: Symbol,
    pub run_length: u8,
    pub score: u32,
}

impl ComboEntry {
    pub fn new(symbol: Symbol, run_length: u8, score: u32) -> Self {
        Self {
            symbol,
            run_length,
            score,
        }
    }
}

/// Serialized catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub patterns: Vec<Pattern>,
    pub combos: Vec<ComboEntry>,
}

/// Score table rows: symbol id, then scores for runs of 2, 3 and 4
const STANDARD_SCORES: [(u8, [u32; 3]); 7] = [
    (0, [50, 75, 100]),
    (1, [20, 30, 60]),
    (2, [10, 20, 50]),
    (3, [10, 20, 40]),
    (4, [10, 15, 30]),
    (5, [5, 10, 20]),
    (6, [2, 5, 10]),
];

/// Static patterns plus the `(symbol, run length) -> score` table
///
/// Loaded once and never mutated. Pattern order matters: on equal scores the
/// earlier pattern wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDef", into = "CatalogDef")]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
    combos: Vec<ComboEntry>,
    scores: HashMap<(Symbol, u8), u32>,
}

impl PatternCatalog {
    /// Build a catalog, rejecting unscorable run lengths and duplicate entries
    pub fn new(patterns: Vec<Pattern>, combos: Vec<ComboEntry>) -> ReelResult<Self> {
        let mut scores = HashMap::with_capacity(combos.len());
        for entry in &combos {
            if !SCORABLE_RUNS.contains(&entry.run_length) {
                return Err(ReelError::InvalidCombo(format!(
                    "run length {} for {} is not scorable",
                    entry.run_length, entry.symbol
                )));
            }
            if scores
                .insert((entry.symbol, entry.run_length), entry.score)
                .is_some()
            {
                return Err(ReelError::DuplicateCombo {
                    symbol: entry.symbol.id(),
                    run_length: entry.run_length,
                });
            }
        }

        Ok(Self {
            patterns,
            combos,
            scores,
        })
    }

    /// Three straight rows and two zig-zags over five reels, with the standard score table
    pub fn standard() -> Self {
        let rows: [[usize; 5]; 5] = [
            [0, 0, 0, 0, 0],
            [1, 1, 1, 1, 1],
            [2, 2, 2, 2, 2],
            [0, 2, 0, 2, 0],
            [0, 1, 2, 1, 0],
        ];
        let patterns = rows
            .iter()
            .map(|r| Pattern { rows: r.to_vec() })
            .collect();

        let mut combos = Vec::with_capacity(STANDARD_SCORES.len() * 3);
        for (id, by_len) in STANDARD_SCORES {
            for (run_length, score) in (2u8..).zip(by_len) {
                combos.push(ComboEntry::new(Symbol::ALL[usize::from(id)], run_length, score));
            }
        }

        let scores = combos
            .iter()
            .map(|e| ((e.symbol, e.run_length), e.score))
            .collect();

        Self {
            patterns,
            combos,
            scores,
        }
    }

    /// Patterns in catalog order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Combo entries in load order
    pub fn combos(&self) -> &[ComboEntry] {
        &self.combos
    }

    /// Score for a run, `None` when the table has no entry (e.g. a run of 5)
    pub fn score(&self, symbol: Symbol, run_length: usize) -> Option<u32> {
        let run_length = u8::try_from(run_length).ok()?;
        self.scores.get(&(symbol, run_length)).copied()
    }

    /// Check every pattern against the bank shape
    pub fn check_fits(&self, reel_count: usize, visible_rows: usize) -> ReelResult<()> {
        self.patterns
            .iter()
            .enumerate()
            .try_for_each(|(index, pattern)| pattern.check_fits(index, reel_count, visible_rows))
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<CatalogDef> for PatternCatalog {
    type Error = ReelError;

    fn try_from(def: CatalogDef) -> Result<Self, Self::Error> {
        Self::new(def.patterns, def.combos)
    }
}

impl From<PatternCatalog> for CatalogDef {
    fn from(catalog: PatternCatalog) -> Self {
        Self {
            patterns: catalog.patterns,
            combos: catalog.combos,
        }
    }
}
