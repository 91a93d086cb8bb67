//! Ordered reel collection and the grid read interface used by the evaluator

use crate::config::{MachineConfig, ReelGeometry};
use crate::error::{ReelError, ReelResult};
use crate::reel::{Reel, ReelTransition};
use crate::symbols::{Symbol, SymbolSequence};

/// Read access to a reels × rows symbol grid
pub trait SymbolGrid {
    /// Number of reels (columns)
    fn reel_count(&self) -> usize;

    /// Symbol on `row` of `reel`
    fn symbol_at(&self, reel: usize, row: usize) -> ReelResult<Symbol>;

    /// First reel that is not at rest, if any
    fn reel_in_motion(&self) -> Option<usize> {
        None
    }
}

/// Fixed grids, one `Vec` per reel listing rows top to bottom
impl SymbolGrid for [Vec<Symbol>] {
    fn reel_count(&self) -> usize {
        self.len()
    }

    fn symbol_at(&self, reel: usize, row: usize) -> ReelResult<Symbol> {
        let column = self.get(reel).ok_or(ReelError::ReelOutOfRange {
            reel,
            reels: self.len(),
        })?;
        column.get(row).copied().ok_or(ReelError::RowOutOfRange {
            row,
            slots: column.len(),
        })
    }
}

impl SymbolGrid for Vec<Vec<Symbol>> {
    fn reel_count(&self) -> usize {
        self.as_slice().reel_count()
    }

    fn symbol_at(&self, reel: usize, row: usize) -> ReelResult<Symbol> {
        self.as_slice().symbol_at(reel, row)
    }
}

/// Reels in left-to-right order
#[derive(Debug, Clone)]
pub struct ReelBank {
    reels: Vec<Reel>,
    geometry: ReelGeometry,
}

impl ReelBank {
    /// One reel per sequence, all sharing `geometry`
    pub fn new(sequences: Vec<SymbolSequence>, geometry: ReelGeometry) -> ReelResult<Self> {
        if sequences.is_empty() {
            return Err(ReelError::SequenceCount { min: 1, got: 0 });
        }

        let reels = sequences
            .into_iter()
            .enumerate()
            .map(|(index, sequence)| Reel::new(index, sequence, geometry))
            .collect::<ReelResult<Vec<_>>>()?;

        Ok(Self { reels, geometry })
    }

    /// Build from the sequences and geometry of a machine config
    pub fn from_config(config: &MachineConfig) -> ReelResult<Self> {
        Self::new(config.sequences.clone(), config.geometry)
    }

    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }

    pub fn reel(&self, index: usize) -> Option<&Reel> {
        self.reels.get(index)
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn geometry(&self) -> &ReelGeometry {
        &self.geometry
    }

    /// Start (or restart) a roll on one reel
    pub fn begin_roll(&mut self, reel: usize, duration_secs: f64) -> ReelResult<()> {
        let reels = self.reels.len();
        self.reels
            .get_mut(reel)
            .ok_or(ReelError::ReelOutOfRange { reel, reels })?
            .begin_roll(duration_secs)
    }

    /// Tick every reel, strictly left to right
    pub fn tick(&mut self, dt_secs: f64) -> Vec<ReelTransition> {
        self.reels.iter_mut().map(|reel| reel.tick(dt_secs)).collect()
    }

    pub fn all_idle(&self) -> bool {
        self.reels.iter().all(Reel::is_idle)
    }

    /// Visible rows of every reel, reels × rows
    pub fn visible_grid(&self) -> Vec<Vec<Symbol>> {
        self.reels.iter().map(Reel::visible_symbols).collect()
    }
}

impl SymbolGrid for ReelBank {
    fn reel_count(&self) -> usize {
        self.reels.len()
    }

    fn symbol_at(&self, reel: usize, row: usize) -> ReelResult<Symbol> {
        self.reels
            .get(reel)
            .ok_or(ReelError::ReelOutOfRange {
                reel,
                reels: self.reels.len(),
            })?
            .symbol_at(row)
    }

    fn reel_in_motion(&self) -> Option<usize> {
        self.reels.iter().position(|reel| !reel.is_idle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> ReelBank {
        ReelBank::from_config(&MachineConfig::standard()).unwrap()
    }

    #[test]
    fn test_bank_from_standard_config() {
        let bank = bank();
        assert_eq!(bank.len(), 5);
        assert!(bank.all_idle());
        assert_eq!(bank.reel_in_motion(), None);

        let grid = bank.visible_grid();
        let first: Vec<u8> = grid[0].iter().map(|s| s.id()).collect();
        assert_eq!(first, vec![4, 0, 1]);
        assert_eq!(bank.symbol_at(2, 1).unwrap(), Symbol::WATERMELON);
    }

    #[test]
    fn test_bank_bounds() {
        let bank = bank();
        assert_eq!(
            bank.symbol_at(5, 0),
            Err(ReelError::ReelOutOfRange { reel: 5, reels: 5 })
        );
        assert!(matches!(bank.symbol_at(0, 9), Err(ReelError::RowOutOfRange { .. })));

        let mut bank = bank;
        assert!(bank.begin_roll(7, 1.0).is_err());
    }

    #[test]
    fn test_empty_bank_rejected() {
        assert!(matches!(
            ReelBank::new(Vec::new(), ReelGeometry::standard()),
            Err(ReelError::SequenceCount { .. })
        ));
    }

    #[test]
    fn test_motion_tracking() {
        let mut bank = bank();
        bank.begin_roll(3, 0.1).unwrap();
        assert_eq!(bank.reel_in_motion(), Some(3));
        assert!(!bank.all_idle());

        let mut ticks = 0;
        while !bank.all_idle() {
            let transitions = bank.tick(0.016);
            assert_eq!(transitions.len(), 5);
            assert!(transitions
                .iter()
                .enumerate()
                .all(|(i, t)| i == 3 || *t == ReelTransition::Unchanged));
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(bank.reel_in_motion(), None);
    }

    #[test]
    fn test_fixed_grid() {
        let grid = vec![
            vec![Symbol::BELL, Symbol::LEMON],
            vec![Symbol::ORANGE, Symbol::GRAPES],
        ];
        assert_eq!(grid.reel_count(), 2);
        assert_eq!(grid.symbol_at(1, 1).unwrap(), Symbol::GRAPES);
        assert!(grid.symbol_at(2, 0).is_err());
        assert!(grid.symbol_at(0, 2).is_err());
    }
}
