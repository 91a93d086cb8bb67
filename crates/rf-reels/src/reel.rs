//! Reel motion state machine
//!
//! A reel is a ring of K slots scrolling upwards through a window of V rows.
//!
//! ```text
//!  Idle ──begin_roll──> Spinning ──duration elapsed──> Settling ──top slot crosses rest──> Idle
//!                          ^                               │
//!                          └──────────begin_roll───────────┘  (supersedes the active roll)
//! ```
//!
//! While spinning, a slot that scrolls past the wrap line reappears at the
//! bottom carrying the next symbol of the reel's sequence. Settling keeps the
//! motion but freezes the symbol stream, and ends with a snap that puts every
//! slot back on the exact rest grid regardless of how uneven the ticks were.

use serde::{Deserialize, Serialize};

use crate::config::ReelGeometry;
use crate::error::{ReelError, ReelResult};
use crate::symbols::{Symbol, SymbolSequence};

/// One symbol holder in the reel's circular buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub symbol: Symbol,
    /// Vertical offset; grows as the reel scrolls up
    pub offset: f64,
}

/// Externally visible motion phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelPhase {
    /// At rest; `symbol_at` is stable
    Idle,
    /// Free-running scroll drawing new symbols on wrap
    Spinning,
    /// Scrolling onto the rest grid without drawing new symbols
    Settling,
}

/// Phase change produced by a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelTransition {
    Unchanged,
    /// Free spin finished, settling began
    Settling,
    /// Snapped onto the rest grid and went idle
    Stopped,
}

/// The active motion task. Replacing it is how a roll gets cancelled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Spinning { elapsed_secs: f64, duration_secs: f64 },
    Settling,
}

/// A single reel
#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    geometry: ReelGeometry,
    sequence: SymbolSequence,
    slots: Vec<Slot>,
    /// Slot showing visible row 0
    top: usize,
    motion: Motion,
    /// Number of rolls started so far
    rolls: u64,
}

impl Reel {
    /// Build an idle reel resting on the grid
    ///
    /// Slot `i` takes the `i`-th symbol drawn from the sequence, so a fresh reel
    /// shows the first rows of its strip.
    pub fn new(index: usize, mut sequence: SymbolSequence, geometry: ReelGeometry) -> ReelResult<Self> {
        geometry.validate()?;

        let slots = (0..geometry.slot_count)
            .map(|i| Slot {
                symbol: sequence.next(),
                offset: geometry.grid_offset(i),
            })
            .collect();

        Ok(Self {
            index,
            geometry,
            sequence,
            slots,
            top: 0,
            motion: Motion::Idle,
            rolls: 0,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MOTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a roll that spins freely for `duration_secs` and then settles
    ///
    /// An active roll is discarded; the new one starts from the current slot
    /// positions and sequence cursor.
    pub fn begin_roll(&mut self, duration_secs: f64) -> ReelResult<()> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(ReelError::InvalidDuration(format!(
                "reel {} cannot roll for {} seconds",
                self.index, duration_secs
            )));
        }

        if self.motion != Motion::Idle {
            log::debug!("reel {}: superseding active roll #{}", self.index, self.rolls);
        }

        self.rolls += 1;
        self.motion = Motion::Spinning {
            elapsed_secs: 0.0,
            duration_secs,
        };
        log::debug!(
            "reel {}: roll #{} spinning for {:.3}s",
            self.index,
            self.rolls,
            duration_secs
        );
        Ok(())
    }

    /// Advance by `dt_secs` of elapsed time. Idle reels do not move.
    ///
    /// Non-finite and negative deltas count as no time passing. Travel per
    /// tick is capped at one buffer cycle past the end of the free spin, so
    /// a tick after a long pause costs a bounded amount of work.
    pub fn tick(&mut self, dt_secs: f64) -> ReelTransition {
        let dt = sanitize_dt(dt_secs);
        let cycle = self.geometry.cycle_secs();

        match self.motion {
            Motion::Idle => ReelTransition::Unchanged,
            Motion::Spinning {
                elapsed_secs,
                duration_secs,
            } => {
                if elapsed_secs <= duration_secs {
                    self.motion = Motion::Spinning {
                        elapsed_secs: elapsed_secs + dt,
                        duration_secs,
                    };
                    self.scroll(dt.min(duration_secs - elapsed_secs + cycle));
                    ReelTransition::Unchanged
                } else {
                    self.motion = Motion::Settling;
                    log::debug!("reel {}: settling after {:.3}s", self.index, elapsed_secs);
                    if self.settle(dt.min(cycle)) {
                        ReelTransition::Stopped
                    } else {
                        ReelTransition::Settling
                    }
                }
            }
            Motion::Settling => {
                if self.settle(dt.min(cycle)) {
                    ReelTransition::Stopped
                } else {
                    ReelTransition::Unchanged
                }
            }
        }
    }

    /// Split a travel distance into sub-steps no longer than the geometry allows
    fn sub_steps(&self, dt: f64) -> (usize, f64) {
        let distance = self.geometry.speed * dt;
        let count = (distance / self.geometry.max_step_distance()).ceil().max(1.0) as usize;
        (count, distance / count as f64)
    }

    /// Free-spin motion: wrap with new symbols and track the top row
    fn scroll(&mut self, dt: f64) {
        let (count, step) = self.sub_steps(dt);
        let rest = self.geometry.rest_offset();

        for _ in 0..count {
            self.move_slots(step, true);
            if self.slots[self.top].offset > rest {
                self.top = (self.top + 1) % self.slots.len();
            }
        }
    }

    /// Settling motion. Returns true once the reel snapped and went idle.
    ///
    /// The first sub-step that carries the top slot past the rest offset ends
    /// the roll: every slot is snapped back onto the grid relative to the
    /// current top pointer and the rest of the tick is dropped.
    fn settle(&mut self, dt: f64) -> bool {
        let rest = self.geometry.rest_offset();
        if self.slots[self.top].offset == rest {
            self.snap();
            return true;
        }

        let (count, step) = self.sub_steps(dt);
        for _ in 0..count {
            self.move_slots(step, false);
            if self.slots[self.top].offset >= rest {
                self.snap();
                return true;
            }
        }
        false
    }

    /// Wrapping keeps the overshoot so the ring stays evenly spaced
    fn move_slots(&mut self, step: f64, draw_symbols: bool) {
        let wrap = self.geometry.wrap_threshold;
        for slot in self.slots.iter_mut() {
            slot.offset += step;
            if slot.offset >= wrap {
                slot.offset -= 2.0 * wrap;
                if draw_symbols {
                    slot.symbol = self.sequence.next();
                }
            }
        }
    }

    /// Put every slot on the exact rest grid and go idle
    fn snap(&mut self) {
        let k = self.slots.len();
        for i in 0..k {
            self.slots[(self.top + i) % k].offset = self.geometry.grid_offset(i);
        }
        self.motion = Motion::Idle;
        log::debug!(
            "reel {}: at rest, top slot {}, rows {:?}",
            self.index,
            self.top,
            self.visible_symbols()
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Symbol on `row`, counted from the top-most fully visible row
    ///
    /// Valid in every phase, stable only while idle.
    pub fn symbol_at(&self, row: usize) -> ReelResult<Symbol> {
        let k = self.slots.len();
        if row >= k {
            return Err(ReelError::RowOutOfRange { row, slots: k });
        }
        Ok(self.slots[(self.top + row) % k].symbol)
    }

    /// Symbols on the fully visible rows, top to bottom
    pub fn visible_symbols(&self) -> Vec<Symbol> {
        let k = self.slots.len();
        (0..self.geometry.visible_rows)
            .map(|row| self.slots[(self.top + row) % k].symbol)
            .collect()
    }

    pub fn phase(&self) -> ReelPhase {
        match self.motion {
            Motion::Idle => ReelPhase::Idle,
            Motion::Spinning { .. } => ReelPhase::Spinning,
            Motion::Settling => ReelPhase::Settling,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.motion == Motion::Idle
    }

    /// Seconds spent spinning freely in the active roll
    pub fn spin_elapsed(&self) -> Option<f64> {
        match self.motion {
            Motion::Spinning { elapsed_secs, .. } => Some(elapsed_secs),
            _ => None,
        }
    }

    /// Position of this reel in its bank
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Buffer index of the slot showing row 0
    pub fn top_pointer(&self) -> usize {
        self.top
    }

    pub fn sequence(&self) -> &SymbolSequence {
        &self.sequence
    }

    pub fn geometry(&self) -> &ReelGeometry {
        &self.geometry
    }

    /// Rolls started since construction
    pub fn roll_count(&self) -> u64 {
        self.rolls
    }
}

/// Elapsed time a tick may use: finite and non-negative
pub(crate) fn sanitize_dt(dt_secs: f64) -> f64 {
    if dt_secs.is_finite() {
        dt_secs.max(0.0)
    } else {
        0.0
    }
}
