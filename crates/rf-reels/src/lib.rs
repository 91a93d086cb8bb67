//! # rf-reels: Reel motion and pattern scoring for a five-reel slot machine
//!
//! Tick-driven and single-threaded: the host calls `tick(dt)` once per frame
//! and everything (reel motion, stagger waits, spin waits) advances from
//! that. Given the same seed and the same tick deltas, a session replays
//! exactly.
//!
//! ## Features
//!
//! - **Reel State Machine**: Idle → Spinning → Settling → Idle with an exact snap to the rest grid
//! - **Symbol Sequences**: Per-reel cyclic strips feeding symbols in on wraparound
//! - **Pattern Scoring**: Reel-0 anchored runs along straight and zig-zag patterns
//! - **Orchestration**: Staggered reel starts, randomized spin duration, win reporting
//! - **Config**: JSON / YAML machine definitions with validation
//!
//! ## Architecture
//!
//! ```text
//! SpinOrchestrator
//!     │
//!     ├── ReelBank ─── Reel × N ─── SymbolSequence
//!     ├── PatternCatalog (patterns, (symbol, run) → score)
//!     └── SpinTiming (duration range, stagger)
//!           │
//!           v
//!     WinEvaluator → SpinOutcome + SpinEvent → SpinObserver
//! ```

pub mod bank;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod events;
pub mod orchestrator;
pub mod paytable;
pub mod reel;
pub mod symbols;

pub use bank::*;
pub use config::*;
pub use error::*;
pub use evaluate::*;
pub use events::*;
pub use orchestrator::*;
pub use paytable::*;
pub use reel::*;
pub use symbols::*;
