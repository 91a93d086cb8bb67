//! Spin Orchestrator: drives one spin from trigger to reported outcome
//!
//! ```text
//!  Ready ──spin()──> Staggering ──last reel started──> Spinning ──wait elapsed──> AwaitingRest
//!    ^                                                                                │
//!    └──────────────────── all reels idle: evaluate, report, SpinEnd ─────────────────┘
//! ```
//!
//! Every wait is an explicit countdown advanced by [`SpinOrchestrator::tick`],
//! so pausing the tick source pauses the spin. Reels are always ticked before
//! the stage clock, and a wait that completes on a tick starts the next one
//! from that tick's boundary.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::bank::ReelBank;
use crate::config::{MachineConfig, SpinTiming};
use crate::error::ReelResult;
use crate::evaluate::{WinEvaluator, WinResult};
use crate::events::{SpinEvent, SpinObserver};
use crate::paytable::PatternCatalog;
use crate::reel::{ReelTransition, sanitize_dt};
use crate::symbols::Symbol;

/// Where the orchestrator is within a spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SpinStage {
    /// No spin in progress, input enabled
    Ready,
    /// Waiting to start `next_reel`
    Staggering { next_reel: usize, remaining_secs: f64 },
    /// All reels started, waiting out the spin duration
    Spinning { remaining_secs: f64 },
    /// Wait over, evaluating as soon as every reel is idle
    AwaitingRest,
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_score: u64,
    pub best_score: u32,
    /// Spins replaced by a new trigger before they completed
    pub superseded: u64,
}

impl SessionStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// 1-based spin number in this session
    pub spin_index: u64,
    /// Free-spin duration every reel used
    pub duration_secs: f64,
    /// Best win, `None` if nothing scored
    pub win: Option<WinResult>,
    /// Cumulative score including this spin
    pub total_score: u64,
    /// Visible symbols at evaluation time, reels × rows
    pub grid: Vec<Vec<Symbol>>,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.win.is_some()
    }

    /// Score of this spin alone
    pub fn score(&self) -> u32 {
        self.win.as_ref().map_or(0, |w| w.score)
    }
}

/// Spin orchestrator
pub struct SpinOrchestrator {
    /// Reels, left to right
    bank: ReelBank,
    /// Patterns and score table
    catalog: PatternCatalog,
    /// Duration range and stagger
    timing: SpinTiming,
    /// Duration draw
    rng: ChaCha8Rng,
    stage: SpinStage,
    /// Duration of the current (or last) spin
    spin_duration: f64,
    spin_count: u64,
    total_score: u64,
    stats: SessionStats,
    last_outcome: Option<SpinOutcome>,
}

impl SpinOrchestrator {
    /// Create an orchestrator with an OS-seeded RNG
    pub fn new(config: MachineConfig) -> ReelResult<Self> {
        Self::build(config, ChaCha8Rng::from_os_rng())
    }

    /// Create an orchestrator with a reproducible duration draw
    pub fn with_seed(config: MachineConfig, seed: u64) -> ReelResult<Self> {
        Self::build(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(config: MachineConfig, rng: ChaCha8Rng) -> ReelResult<Self> {
        config.validate()?;
        let bank = ReelBank::from_config(&config)?;

        log::info!(
            "orchestrator ready: {} reels, {} patterns, spin {:.2}..={:.2}s, stagger {:.2}s",
            bank.len(),
            config.catalog.patterns().len(),
            config.timing.min_spin_secs,
            config.timing.max_spin_secs,
            config.timing.stagger_secs
        );

        Ok(Self {
            bank,
            catalog: config.catalog,
            timing: config.timing,
            rng,
            stage: SpinStage::Ready,
            spin_duration: 0.0,
            spin_count: 0,
            total_score: 0,
            stats: SessionStats::default(),
            last_outcome: None,
        })
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Trigger a spin and start reel 0. Returns the drawn duration.
    ///
    /// A spin already in progress is abandoned; its reels are taken over one
    /// by one as the new spin restarts them.
    pub fn spin(&mut self, observer: &mut dyn SpinObserver) -> ReelResult<f64> {
        if self.stage != SpinStage::Ready {
            log::warn!(
                "spin #{} superseded in stage {:?}",
                self.spin_count,
                self.stage
            );
            self.stats.superseded += 1;
        }

        let duration = self
            .rng
            .random_range(self.timing.min_spin_secs..=self.timing.max_spin_secs);
        self.spin_duration = duration;
        self.spin_count += 1;

        log::info!("spin #{} started, {:.3}s per reel", self.spin_count, duration);
        observer.on_event(&SpinEvent::SpinStart {
            duration_secs: duration,
        });

        self.start_reel(0, observer)?;
        self.stage = self.after_start(0);
        Ok(duration)
    }

    /// Advance reels and the stage clock by `dt_secs`
    ///
    /// Returns the outcome on the tick that completes a spin. Non-finite and
    /// negative deltas count as no time passing.
    pub fn tick(
        &mut self,
        dt_secs: f64,
        observer: &mut dyn SpinObserver,
    ) -> ReelResult<Option<SpinOutcome>> {
        let dt = sanitize_dt(dt_secs);

        let transitions = self.bank.tick(dt);
        for (reel_index, transition) in transitions.into_iter().enumerate() {
            let Some(reel) = self.bank.reel(reel_index) else {
                continue;
            };
            observer.on_reel_frame(reel_index, reel.slots());
            match transition {
                ReelTransition::Unchanged => {}
                ReelTransition::Settling => {
                    observer.on_event(&SpinEvent::ReelSettling { reel_index });
                }
                ReelTransition::Stopped => {
                    observer.on_event(&SpinEvent::ReelStop {
                        reel_index,
                        symbols: reel.visible_symbols(),
                    });
                }
            }
        }

        match self.stage {
            SpinStage::Ready => Ok(None),
            SpinStage::Staggering {
                next_reel,
                remaining_secs,
            } => {
                let remaining_secs = remaining_secs - dt;
                if remaining_secs <= 0.0 {
                    self.start_reel(next_reel, observer)?;
                    self.stage = self.after_start(next_reel);
                } else {
                    self.stage = SpinStage::Staggering {
                        next_reel,
                        remaining_secs,
                    };
                }
                Ok(None)
            }
            SpinStage::Spinning { remaining_secs } => {
                let remaining_secs = remaining_secs - dt;
                if remaining_secs <= 0.0 {
                    log::debug!("spin #{}: wait elapsed, awaiting rest", self.spin_count);
                    self.stage = SpinStage::AwaitingRest;
                    self.finish_if_rested(observer)
                } else {
                    self.stage = SpinStage::Spinning { remaining_secs };
                    Ok(None)
                }
            }
            SpinStage::AwaitingRest => self.finish_if_rested(observer),
        }
    }

    /// Tick at a fixed rate until the current spin completes
    ///
    /// Returns `None` if it has not completed after `max_ticks`.
    pub fn run_until_complete(
        &mut self,
        dt_secs: f64,
        max_ticks: usize,
        observer: &mut dyn SpinObserver,
    ) -> ReelResult<Option<SpinOutcome>> {
        for _ in 0..max_ticks {
            if let Some(outcome) = self.tick(dt_secs, observer)? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    fn start_reel(&mut self, reel_index: usize, observer: &mut dyn SpinObserver) -> ReelResult<()> {
        self.bank.begin_roll(reel_index, self.spin_duration)?;
        observer.on_event(&SpinEvent::ReelStart { reel_index });
        Ok(())
    }

    /// Stage following the start of `reel_index`
    fn after_start(&self, reel_index: usize) -> SpinStage {
        if reel_index + 1 < self.bank.len() {
            SpinStage::Staggering {
                next_reel: reel_index + 1,
                remaining_secs: self.timing.stagger_secs,
            }
        } else {
            SpinStage::Spinning {
                remaining_secs: self.spin_duration,
            }
        }
    }

    fn finish_if_rested(&mut self, observer: &mut dyn SpinObserver) -> ReelResult<Option<SpinOutcome>> {
        if !self.bank.all_idle() {
            return Ok(None);
        }

        observer.on_event(&SpinEvent::EvaluateWins);
        let win = WinEvaluator::new(&self.catalog).evaluate(&self.bank)?;

        self.stats.total_spins += 1;
        match &win {
            Some(result) => {
                self.total_score += u64::from(result.score);
                self.stats.wins += 1;
                self.stats.best_score = self.stats.best_score.max(result.score);
                log::info!(
                    "spin #{}: {} x{} on pattern {} scores {} (total {})",
                    self.spin_count,
                    result.symbol,
                    result.run_length,
                    result.pattern_index,
                    result.score,
                    self.total_score
                );
                observer.on_event(&SpinEvent::Win {
                    result: result.clone(),
                    total_score: self.total_score,
                });
            }
            None => {
                self.stats.losses += 1;
                log::info!("spin #{}: no win (total {})", self.spin_count, self.total_score);
                observer.on_event(&SpinEvent::NoWin {
                    total_score: self.total_score,
                });
            }
        }
        self.stats.total_score = self.total_score;

        let outcome = SpinOutcome {
            spin_index: self.spin_count,
            duration_secs: self.spin_duration,
            win,
            total_score: self.total_score,
            grid: self.bank.visible_grid(),
        };

        observer.on_event(&SpinEvent::SpinEnd);
        self.stage = SpinStage::Ready;
        self.last_outcome = Some(outcome.clone());
        Ok(Some(outcome))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn stage(&self) -> SpinStage {
        self.stage
    }

    /// Whether spin input should be enabled
    pub fn can_spin(&self) -> bool {
        self.stage == SpinStage::Ready
    }

    pub fn bank(&self) -> &ReelBank {
        &self.bank
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    /// Cumulative score over the session
    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    /// Duration drawn for the current (or last) spin
    pub fn spin_duration(&self) -> f64 {
        self.spin_duration
    }

    /// Clear session totals. Spin numbering continues, so a spin in flight
    /// still reports its own index.
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
        self.total_score = 0;
    }
}
