//! Symbol identifiers and the cyclic symbol stream each reel draws from

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};

/// A reel symbol (ids 0..=6)
///
/// Only equality matters to the scoring engine. The names are kept for
/// presentation and log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Symbol(u8);

impl Symbol {
    /// Highest valid symbol id
    pub const MAX_ID: u8 = 6;

    pub const BELL: Symbol = Symbol(0);
    pub const WATERMELON: Symbol = Symbol(1);
    pub const GRAPES: Symbol = Symbol(2);
    pub const BLUEBERRIES: Symbol = Symbol(3);
    pub const ORANGE: Symbol = Symbol(4);
    pub const LEMON: Symbol = Symbol(5);
    pub const CHERRIES: Symbol = Symbol(6);

    /// Every symbol, in id order
    pub const ALL: [Symbol; 7] = [
        Self::BELL,
        Self::WATERMELON,
        Self::GRAPES,
        Self::BLUEBERRIES,
        Self::ORANGE,
        Self::LEMON,
        Self::CHERRIES,
    ];

    /// Create a symbol from its id
    pub fn new(id: u8) -> ReelResult<Self> {
        if id > Self::MAX_ID {
            return Err(ReelError::UnknownSymbol(id));
        }
        Ok(Self(id))
    }

    /// Numeric id
    #[inline]
    pub fn id(self) -> u8 {
        self.0
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "Bell",
            1 => "Watermelon",
            2 => "Grapes",
            3 => "Blueberries",
            4 => "Orange",
            5 => "Lemon",
            _ => "Cherries",
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = ReelError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<Symbol> for u8 {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

/// Parse a list of raw ids into symbols
pub fn symbols_from_ids(ids: &[u8]) -> ReelResult<Vec<Symbol>> {
    ids.iter().map(|&id| Symbol::new(id)).collect()
}

/// Ordered, cyclic symbol stream owned by one reel
///
/// The symbols never change after construction; only the read cursor moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolSequence {
    symbols: Vec<Symbol>,
    cursor: usize,
}

impl SymbolSequence {
    /// Create a sequence with its cursor at the first symbol
    pub fn new(symbols: Vec<Symbol>) -> ReelResult<Self> {
        if symbols.is_empty() {
            return Err(ReelError::EmptySequence);
        }
        Ok(Self { symbols, cursor: 0 })
    }

    /// Sequence over a built-in, non-empty strip
    pub(crate) fn from_strip(strip: &[Symbol]) -> Self {
        debug_assert!(!strip.is_empty());
        Self {
            symbols: strip.to_vec(),
            cursor: 0,
        }
    }

    /// Create a sequence from raw ids
    pub fn from_ids(ids: &[u8]) -> ReelResult<Self> {
        Self::new(symbols_from_ids(ids)?)
    }

    /// Start reading at `cursor` (wrapped into range)
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor % self.symbols.len();
        self
    }

    /// Return the symbol under the cursor and advance, wrapping after the last element
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Symbol {
        let symbol = self.symbols[self.cursor];
        self.cursor += 1;
        if self.cursor >= self.symbols.len() {
            self.cursor = 0;
        }
        symbol
    }

    /// Symbol the next call to [`next`](Self::next) will return
    pub fn peek(&self) -> Symbol {
        self.symbols[self.cursor]
    }

    /// Current read position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewind to the first symbol
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Sequence length (always >= 1)
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Underlying symbols in order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl TryFrom<Vec<Symbol>> for SymbolSequence {
    type Error = ReelError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl From<SymbolSequence> for Vec<Symbol> {
    fn from(sequence: SymbolSequence) -> Self {
        sequence.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_range() {
        assert!(Symbol::new(0).is_ok());
        assert!(Symbol::new(6).is_ok());
        assert_eq!(Symbol::new(7), Err(ReelError::UnknownSymbol(7)));
        assert_eq!(Symbol::ALL.len(), 7);
        assert_eq!(Symbol::LEMON.name(), "Lemon");
    }

    #[test]
    fn test_symbol_serde_rejects_unknown() {
        let ok: Symbol = serde_json::from_str("3").unwrap();
        assert_eq!(ok, Symbol::BLUEBERRIES);
        assert!(serde_json::from_str::<Symbol>("9").is_err());
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert_eq!(SymbolSequence::new(Vec::new()), Err(ReelError::EmptySequence));
        assert!(serde_json::from_str::<SymbolSequence>("[]").is_err());
    }

    #[test]
    fn test_sequence_wraps() {
        let mut seq = SymbolSequence::from_ids(&[4, 0, 1]).unwrap();
        let drawn: Vec<u8> = (0..7).map(|_| seq.next().id()).collect();
        assert_eq!(drawn, vec![4, 0, 1, 4, 0, 1, 4]);
        assert_eq!(seq.cursor(), 1);
    }

    #[test]
    fn test_sequence_repeats_from_any_start() {
        let ids = [4, 0, 1, 6, 3, 5, 2, 3, 0, 0, 4, 2];
        for start in 0..ids.len() {
            let mut seq = SymbolSequence::from_ids(&ids).unwrap().with_cursor(start);
            let first: Vec<Symbol> = (0..ids.len()).map(|_| seq.next()).collect();
            let second: Vec<Symbol> = (0..ids.len()).map(|_| seq.next()).collect();
            assert_eq!(first, second);
            assert_eq!(seq.cursor(), start);
        }
    }

    #[test]
    fn test_peek_and_reset() {
        let mut seq = SymbolSequence::from_ids(&[2, 5]).unwrap();
        assert_eq!(seq.peek(), Symbol::GRAPES);
        seq.next();
        assert_eq!(seq.peek(), Symbol::LEMON);
        seq.reset();
        assert_eq!(seq.cursor(), 0);
    }
}
