//! SpinEvent: what the presentation layer is told about a spin
//!
//! Events are semantic moments ("reel 2 stopped"), not animation commands.
//! Per-frame slot positions for rendering travel separately through
//! [`SpinObserver::on_reel_frame`].

use serde::{Deserialize, Serialize};

use crate::evaluate::WinResult;
use crate::reel::Slot;
use crate::symbols::Symbol;

/// Spin lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinEvent {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted; every reel will spin freely for `duration_secs`
    SpinStart { duration_secs: f64 },

    /// Reel began its roll
    ReelStart {
        /// Which reel (0-indexed)
        reel_index: usize,
    },

    /// Reel stopped drawing symbols and is moving onto the rest grid
    ReelSettling { reel_index: usize },

    /// Reel is at rest
    ReelStop {
        reel_index: usize,
        /// Visible symbols, top to bottom
        symbols: Vec<Symbol>,
    },

    /// All reels at rest, scoring
    EvaluateWins,

    // ═══════════════════════════════════════════════════════════════════════
    // RESULT
    // ═══════════════════════════════════════════════════════════════════════
    /// Best win of the spin, with the cumulative score after adding it
    Win { result: WinResult, total_score: u64 },

    /// Nothing scored
    NoWin { total_score: u64 },

    /// Spin finished, input may be re-enabled
    SpinEnd,
}

impl SpinEvent {
    /// Snake case event name, matches the serialized `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            SpinEvent::SpinStart { .. } => "spin_start",
            SpinEvent::ReelStart { .. } => "reel_start",
            SpinEvent::ReelSettling { .. } => "reel_settling",
            SpinEvent::ReelStop { .. } => "reel_stop",
            SpinEvent::EvaluateWins => "evaluate_wins",
            SpinEvent::Win { .. } => "win",
            SpinEvent::NoWin { .. } => "no_win",
            SpinEvent::SpinEnd => "spin_end",
        }
    }

    /// Reel this event concerns, if any
    pub fn reel_index(&self) -> Option<usize> {
        match self {
            SpinEvent::ReelStart { reel_index }
            | SpinEvent::ReelSettling { reel_index }
            | SpinEvent::ReelStop { reel_index, .. } => Some(*reel_index),
            _ => None,
        }
    }
}

/// Presentation collaborator driven by the orchestrator
pub trait SpinObserver {
    /// Lifecycle event, in emission order
    fn on_event(&mut self, event: &SpinEvent);

    /// Slot positions of one reel after a tick, once per reel per tick
    fn on_reel_frame(&mut self, _reel_index: usize, _slots: &[Slot]) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SpinObserver for NullObserver {
    fn on_event(&mut self, _event: &SpinEvent) {}
}

/// Observer that keeps every event and the latest frame of each reel
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Vec<SpinEvent>,
    frame_count: u64,
    last_frames: Vec<Vec<Slot>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SpinEvent] {
        &self.events
    }

    /// Event names in order
    pub fn type_names(&self) -> Vec<&'static str> {
        self.events.iter().map(SpinEvent::type_name).collect()
    }

    /// Events of one kind
    pub fn events_named(&self, name: &str) -> Vec<&SpinEvent> {
        self.events.iter().filter(|e| e.type_name() == name).collect()
    }

    /// Reel frames received so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Latest slots reported for `reel_index`
    pub fn last_frame(&self, reel_index: usize) -> Option<&[Slot]> {
        self.last_frames
            .get(reel_index)
            .filter(|slots| !slots.is_empty())
            .map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.frame_count = 0;
        self.last_frames.clear();
    }
}

impl SpinObserver for EventRecorder {
    fn on_event(&mut self, event: &SpinEvent) {
        self.events.push(event.clone());
    }

    fn on_reel_frame(&mut self, reel_index: usize, slots: &[Slot]) {
        self.frame_count += 1;
        if self.last_frames.len() <= reel_index {
            self.last_frames.resize_with(reel_index + 1, Vec::new);
        }
        self.last_frames[reel_index] = slots.to_vec();
    }
}
