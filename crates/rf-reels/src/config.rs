//! Machine configuration: reel geometry, spin timing and static game data

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};
use crate::paytable::PatternCatalog;
use crate::symbols::{Symbol, SymbolSequence};

/// Smallest slot buffer that keeps three rows fully visible plus one buffer slot above and below
pub const MIN_SLOTS: usize = 5;

/// Reel geometry shared by every reel in a bank
///
/// Offsets grow upwards. A slot at rest on visible row `r` sits at
/// `pitch - pitch * r`, so row 0 rests at `pitch` itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelGeometry {
    /// Slots in the circular buffer (K)
    pub slot_count: usize,
    /// Fully visible rows (V)
    pub visible_rows: usize,
    /// Row spacing, also the rest offset of the top visible row
    pub pitch: f64,
    /// Offset at which a slot leaves the top and reappears one buffer span lower
    pub wrap_threshold: f64,
    /// Scroll speed in offset units per second
    pub speed: f64,
}

impl ReelGeometry {
    /// Full rotations of the visible window per second at standard speed
    pub const ROTATIONS_PER_SEC: f64 = 8.0;

    /// Five slots, three visible rows, 212-unit pitch
    pub fn standard() -> Self {
        Self::with_pitch(MIN_SLOTS, 3, 212.0)
    }

    /// Geometry derived from a pitch: wrap span covers the whole buffer and speed
    /// is a whole number of window rotations per second
    pub fn with_pitch(slot_count: usize, visible_rows: usize, pitch: f64) -> Self {
        Self {
            slot_count,
            visible_rows,
            pitch,
            wrap_threshold: pitch * slot_count as f64 / 2.0,
            speed: pitch * visible_rows as f64 * Self::ROTATIONS_PER_SEC,
        }
    }

    /// Rest offset of the top visible row
    #[inline]
    pub fn rest_offset(&self) -> f64 {
        self.pitch
    }

    /// Rest offset of the slot `index` positions below the top pointer
    #[inline]
    pub fn grid_offset(&self, index: usize) -> f64 {
        self.pitch - self.pitch * index as f64
    }

    /// Largest distance a slot may travel in one integration sub-step
    ///
    /// Half of the smaller of one pitch and the gap between rest and wrap, so
    /// a single sub-step can neither skip a row nor jump past the wrap line.
    pub fn max_step_distance(&self) -> f64 {
        self.pitch.min(self.wrap_threshold - self.pitch) * 0.5
    }

    /// Seconds for one slot to travel the whole buffer and return to its start
    pub fn cycle_secs(&self) -> f64 {
        2.0 * self.wrap_threshold / self.speed
    }

    /// Check invariants
    pub fn validate(&self) -> ReelResult<()> {
        if self.visible_rows == 0 {
            return Err(ReelError::InvalidGeometry("at least one visible row is required".into()));
        }
        if self.slot_count < MIN_SLOTS || self.slot_count < self.visible_rows + 2 {
            return Err(ReelError::InvalidGeometry(format!(
                "{} slots cannot hold {} visible rows plus a buffer slot above and below (minimum {})",
                self.slot_count, self.visible_rows, MIN_SLOTS
            )));
        }
        if !self.pitch.is_finite() || self.pitch <= 0.0 {
            return Err(ReelError::InvalidGeometry(format!("pitch must be positive, got {}", self.pitch)));
        }
        if !self.wrap_threshold.is_finite() || self.wrap_threshold <= self.pitch {
            return Err(ReelError::InvalidGeometry(format!(
                "wrap threshold {} must lie above the rest offset {}",
                self.wrap_threshold, self.pitch
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ReelError::InvalidGeometry(format!("speed must be positive, got {}", self.speed)));
        }
        Ok(())
    }
}

impl Default for ReelGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Spin timing (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Shortest free-spin duration that may be drawn
    pub min_spin_secs: f64,
    /// Longest free-spin duration that may be drawn (inclusive)
    pub max_spin_secs: f64,
    /// Delay between consecutive reel starts
    pub stagger_secs: f64,
}

impl SpinTiming {
    /// Normal gameplay timing
    pub fn standard() -> Self {
        Self {
            min_spin_secs: 2.0,
            max_spin_secs: 4.0,
            stagger_secs: 0.2,
        }
    }

    /// Fixed duration, no randomness in the draw
    pub fn fixed(spin_secs: f64, stagger_secs: f64) -> Self {
        Self {
            min_spin_secs: spin_secs,
            max_spin_secs: spin_secs,
            stagger_secs,
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            min_spin_secs: self.min_spin_secs * factor,
            max_spin_secs: self.max_spin_secs * factor,
            stagger_secs: self.stagger_secs * factor,
        }
    }

    /// Time from the first reel start until the last reel stops spinning freely
    pub fn launch_window(&self, reel_count: usize, spin_secs: f64) -> f64 {
        self.stagger_secs * reel_count.saturating_sub(1) as f64 + spin_secs
    }

    /// Check invariants
    pub fn validate(&self) -> ReelResult<()> {
        let finite = self.min_spin_secs.is_finite()
            && self.max_spin_secs.is_finite()
            && self.stagger_secs.is_finite();
        if !finite || self.min_spin_secs < 0.0 || self.stagger_secs < 0.0 {
            return Err(ReelError::InvalidDuration(format!(
                "timing values must be finite and non-negative: {:?}",
                self
            )));
        }
        if self.min_spin_secs > self.max_spin_secs {
            return Err(ReelError::InvalidDuration(format!(
                "spin range {}..={} is empty",
                self.min_spin_secs, self.max_spin_secs
            )));
        }
        Ok(())
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::standard()
    }
}

/// Everything a machine needs at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// One symbol sequence per reel, left to right
    pub sequences: Vec<SymbolSequence>,
    #[serde(default)]
    pub geometry: ReelGeometry,
    #[serde(default)]
    pub timing: SpinTiming,
    #[serde(default)]
    pub catalog: PatternCatalog,
}

const B: Symbol = Symbol::BELL;
const W: Symbol = Symbol::WATERMELON;
const G: Symbol = Symbol::GRAPES;
const U: Symbol = Symbol::BLUEBERRIES;
const O: Symbol = Symbol::ORANGE;
const L: Symbol = Symbol::LEMON;
const C: Symbol = Symbol::CHERRIES;

/// Reel strips of the standard five-reel machine
const STANDARD_STRIPS: [&[Symbol]; 5] = [
    &[O, B, W, C, U, L, G, U, B, B, O, G],
    &[W, C, B, U, C, G, O, L, L, L, C, L, U, L, C],
    &[G, W, U, G, B, L, C, B, B, B, O, O, G],
    &[L, U, U, L, G, O, W, W, B, C, C, L, O, U, L],
    &[G, C, B, W, O, O, U, U, O, O, G, B, W, C],
];

impl MachineConfig {
    /// The standard five-reel machine
    pub fn standard() -> Self {
        let sequences = STANDARD_STRIPS
            .iter()
            .map(|strip| SymbolSequence::from_strip(strip))
            .collect();

        Self {
            sequences,
            geometry: ReelGeometry::standard(),
            timing: SpinTiming::standard(),
            catalog: PatternCatalog::standard(),
        }
    }

    /// Standard catalog, geometry and timing around custom reel sequences
    pub fn with_sequences(sequences: Vec<SymbolSequence>) -> Self {
        Self {
            sequences,
            ..Self::standard()
        }
    }

    /// Number of reels
    pub fn reel_count(&self) -> usize {
        self.sequences.len()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> ReelResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ReelError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml(yaml: &str) -> ReelResult<Self> {
        let config: Self = serde_yml::from_str(yaml).map_err(|e| ReelError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::Json(e.to_string()))
    }

    /// Check every invariant the machine relies on
    pub fn validate(&self) -> ReelResult<()> {
        if self.sequences.is_empty() {
            return Err(ReelError::SequenceCount { min: 1, got: 0 });
        }
        if self.sequences.iter().any(|s| s.is_empty()) {
            return Err(ReelError::EmptySequence);
        }
        self.geometry.validate()?;
        self.timing.validate()?;
        self.catalog
            .check_fits(self.sequences.len(), self.geometry.visible_rows)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_geometry() {
        let geometry = ReelGeometry::standard();
        assert_eq!(geometry.slot_count, 5);
        assert_eq!(geometry.visible_rows, 3);
        assert_eq!(geometry.rest_offset(), 212.0);
        assert_eq!(geometry.wrap_threshold, 530.0);
        assert_eq!(geometry.speed, 5088.0);
        assert_eq!(geometry.grid_offset(2), -212.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_geometry_rejects_small_buffers() {
        let mut geometry = ReelGeometry::standard();
        geometry.slot_count = 4;
        assert!(geometry.validate().is_err());

        let mut geometry = ReelGeometry::standard();
        geometry.visible_rows = 4;
        assert!(geometry.validate().is_err());

        let mut geometry = ReelGeometry::standard();
        geometry.wrap_threshold = geometry.pitch;
        assert!(geometry.validate().is_err());

        let mut geometry = ReelGeometry::standard();
        geometry.speed = f64::NAN;
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn test_timing_validation() {
        assert!(SpinTiming::standard().validate().is_ok());
        assert!(SpinTiming::fixed(0.0, 0.0).validate().is_ok());
        assert!(SpinTiming::fixed(-1.0, 0.2).validate().is_err());

        let inverted = SpinTiming {
            min_spin_secs: 3.0,
            max_spin_secs: 2.0,
            stagger_secs: 0.2,
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_launch_window() {
        let timing = SpinTiming::standard();
        let window = timing.launch_window(5, 3.0);
        assert!((window - 3.8).abs() < 1e-9);

        let turbo = timing.scaled(0.5);
        assert_eq!(turbo.max_spin_secs, 2.0);
    }

    #[test]
    fn test_standard_machine() {
        let config = MachineConfig::standard();
        assert_eq!(config.reel_count(), 5);
        assert_eq!(config.sequences[0].len(), 12);
        assert!(config.validate().is_ok());

        let strips: Vec<Vec<u8>> = config
            .sequences
            .iter()
            .map(|seq| seq.symbols().iter().map(|s| s.id()).collect())
            .collect();
        assert_eq!(
            strips,
            vec![
                vec![4, 0, 1, 6, 3, 5, 2, 3, 0, 0, 4, 2],
                vec![1, 6, 0, 3, 6, 2, 4, 5, 5, 5, 6, 5, 3, 5, 6],
                vec![2, 1, 3, 2, 0, 5, 6, 0, 0, 0, 4, 4, 2],
                vec![5, 3, 3, 5, 2, 4, 1, 1, 0, 6, 6, 5, 4, 3, 5],
                vec![2, 6, 0, 1, 4, 4, 3, 3, 4, 4, 2, 0, 1, 6],
            ]
        );
        assert!(config.sequences.iter().all(|seq| seq.cursor() == 0));
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults() {
        let json = MachineConfig::standard().to_json().unwrap();
        let back = MachineConfig::from_json(&json).unwrap();
        assert_eq!(back, MachineConfig::standard());

        let minimal = r#"{ "sequences": [[0, 1, 2], [0, 1, 2], [0, 1, 2], [0, 1, 2], [0, 1, 2]] }"#;
        let config = MachineConfig::from_json(minimal).unwrap();
        assert_eq!(config.geometry, ReelGeometry::standard());
        assert_eq!(config.catalog, PatternCatalog::standard());
    }

    #[test]
    fn test_pattern_beyond_bank_rejected() {
        let minimal = r#"{ "sequences": [[0, 1, 2], [0, 1, 2], [0, 1, 2]] }"#;
        assert!(matches!(
            MachineConfig::from_json(minimal),
            Err(ReelError::PatternOutOfBounds { pattern: 0, .. })
        ));
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
sequences:
  - [4, 0, 1]
  - [1, 6, 0]
catalog:
  patterns:
    - [0, 0]
    - [2, 1]
  combos:
    - { symbol: 4, run_length: 2, score: 10 }
timing:
  min_spin_secs: 1.0
  max_spin_secs: 1.5
  stagger_secs: 0.1
"#;
        let config = MachineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.reel_count(), 2);
        assert_eq!(config.catalog.patterns().len(), 2);
        assert_eq!(config.timing.stagger_secs, 0.1);

        let bad_symbol = "sequences:\n  - [4, 9]\n";
        assert!(matches!(MachineConfig::from_yaml(bad_symbol), Err(ReelError::Yaml(_))));
    }
}
