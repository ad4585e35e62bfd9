//! Pack lifecycle state machine.
//!
//! A pack moves through `Sealed -> Tearing -> Fanning -> Revealing -> Summary`.
//! User actions (`tear`, `reveal_card`, `reveal_all`, `open_another`) apply
//! immediately. The animation-bound transitions are scheduled as a
//! [`ScheduledTransition`] carrying a [`TransitionTicket`]; the owner fires
//! them with [`PackLifecycle::poll`] or [`PackLifecycle::fire`] once they are
//! due. A ticket is only honored while it is the pending one for the current
//! pack, so timers left over from a replaced or disposed pack are discarded.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::LifecycleTimings;
use crate::error::{PackError, Result};
use crate::models::PackResult;
use crate::reveal::RevealState;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Sealed,
    Tearing,
    Fanning,
    Revealing,
    Summary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sealed => "sealed",
            Stage::Tearing => "tearing",
            Stage::Fanning => "fanning",
            Stage::Revealing => "revealing",
            Stage::Summary => "summary",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Scheduled transitions
// ---------------------------------------------------------------------------

/// Identifies one scheduled transition of one pack.
///
/// `generation` changes every time a new pack replaces the old one;
/// `sequence` changes every time a transition is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket {
    pub generation: u64,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTransition {
    pub ticket: TransitionTicket,
    pub due: Instant,
    pub to: Stage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub from: Stage,
    pub to: Stage,
}

/// What a renderer reads to draw the current pack.
#[derive(Debug, Clone)]
pub struct LifecycleSnapshot {
    pub stage: Stage,
    pub pack: Arc<PackResult>,
    pub reveal: Arc<RevealState>,
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// PackLifecycle
// ---------------------------------------------------------------------------

/// Owns the live pack, its reveal state and the current stage.
#[derive(Debug)]
pub struct PackLifecycle {
    stage: Stage,
    pack: Arc<PackResult>,
    reveal: Arc<RevealState>,
    timings: LifecycleTimings,
    generation: u64,
    sequence: u64,
    pending: Option<ScheduledTransition>,
    disposed: bool,
}

impl PackLifecycle {
    /// Wrap a freshly generated pack, starting `Sealed`.
    pub fn new(pack: PackResult, timings: LifecycleTimings) -> Self {
        let reveal = RevealState::new(pack.len());
        Self {
            stage: Stage::Sealed,
            pack: Arc::new(pack),
            reveal: Arc::new(reveal),
            timings,
            generation: 0,
            sequence: 0,
            pending: None,
            disposed: false,
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pack(&self) -> &PackResult {
        &self.pack
    }

    pub fn reveal_state(&self) -> &RevealState {
        &self.reveal
    }

    pub fn timings(&self) -> &LifecycleTimings {
        &self.timings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The transition waiting to fire, if any.
    pub fn pending(&self) -> Option<&ScheduledTransition> {
        self.pending.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_complete(&self) -> bool {
        self.reveal.is_complete()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            stage: self.stage,
            pack: Arc::clone(&self.pack),
            reveal: Arc::clone(&self.reveal),
            generation: self.generation,
        }
    }

    // -- User actions ------------------------------------------------------

    /// Tear the pack open. Only honored once, from `Sealed`.
    pub fn tear(&mut self, now: Instant) -> bool {
        if self.disposed || self.stage != Stage::Sealed {
            tracing::debug!(stage = %self.stage, "tear ignored");
            return false;
        }
        self.set_stage(Stage::Tearing);
        self.schedule(now, self.timings.tear, Stage::Fanning);
        true
    }

    /// Flip one card face-up.
    ///
    /// Returns `Ok(true)` if the slot was newly revealed and `Ok(false)` if the
    /// call had no effect (already revealed, or the pack is not in
    /// `Revealing`). Revealing the last slot schedules `Summary`.
    pub fn reveal_card(&mut self, index: usize, now: Instant) -> Result<bool> {
        let next = self.reveal.reveal(index)?;
        if self.disposed || self.stage != Stage::Revealing || *self.reveal == next {
            return Ok(false);
        }

        self.reveal = Arc::new(next);
        if self.reveal.is_complete() && self.pending.is_none() {
            self.schedule(now, self.timings.reveal_settle, Stage::Summary);
        }
        Ok(true)
    }

    /// Flip every remaining card and schedule `Summary`.
    ///
    /// Ignored outside `Revealing` or once `Summary` is already scheduled.
    pub fn reveal_all(&mut self, now: Instant) -> bool {
        if self.disposed || self.stage != Stage::Revealing || self.pending.is_some() {
            tracing::debug!(stage = %self.stage, "reveal all ignored");
            return false;
        }
        self.reveal = Arc::new(self.reveal.reveal_all());
        self.schedule(now, self.timings.reveal_all_settle, Stage::Summary);
        true
    }

    /// Replace the finished pack with a new one and return to `Sealed`.
    ///
    /// Only honored from `Summary`. Any pending transition is cancelled and the
    /// old pack and reveal state are dropped.
    pub fn open_another(&mut self, pack: PackResult) -> bool {
        if self.disposed || self.stage != Stage::Summary {
            tracing::debug!(stage = %self.stage, "open another ignored");
            return false;
        }
        self.generation += 1;
        self.pending = None;
        self.reveal = Arc::new(RevealState::new(pack.len()));
        self.pack = Arc::new(pack);
        self.set_stage(Stage::Sealed);
        true
    }

    /// Tear down the lifecycle. Pending transitions are cancelled and every
    /// later action or ticket is ignored.
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!(generation = self.generation, "lifecycle disposed");
        }
        self.disposed = true;
        self.pending = None;
    }

    // -- Time-driven transitions ------------------------------------------

    /// Apply the transition identified by `ticket`.
    ///
    /// Fails with [`PackError::StaleTransition`] if the ticket is not the
    /// pending one: it was already fired, its pack was replaced, or the
    /// lifecycle was disposed.
    pub fn fire(&mut self, ticket: TransitionTicket) -> Result<StageChange> {
        match self.pending {
            Some(pending) if !self.disposed && pending.ticket == ticket => {
                self.pending = None;
                Ok(self.apply(pending))
            }
            _ => {
                let current = self.pending.map(|p| p.ticket);
                tracing::debug!(?ticket, ?current, "discarding stale transition");
                Err(PackError::StaleTransition { ticket, current })
            }
        }
    }

    /// Fire every transition due at or before `now`, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<StageChange> {
        let mut changes = Vec::new();
        while let Some(pending) = self.pending {
            if self.disposed || pending.due > now {
                break;
            }
            self.pending = None;
            changes.push(self.apply(pending));
        }
        changes
    }

    // -- Private helpers ---------------------------------------------------

    fn apply(&mut self, transition: ScheduledTransition) -> StageChange {
        let from = self.stage;
        self.set_stage(transition.to);

        // follow-up timers are measured from this one's due time, not from now
        match transition.to {
            Stage::Fanning => {
                let fan = self.timings.fan_duration(self.pack.len());
                self.schedule(transition.due, fan, Stage::Revealing);
            }
            Stage::Revealing if self.reveal.is_complete() => {
                self.schedule(transition.due, self.timings.reveal_settle, Stage::Summary);
            }
            _ => {}
        }

        StageChange {
            from,
            to: transition.to,
        }
    }

    /// Make `to` the pending transition, due `delay` after `from`. A delay the
    /// clock cannot represent is due immediately.
    fn schedule(&mut self, from: Instant, delay: Duration, to: Stage) {
        let due = from.checked_add(delay).unwrap_or_else(|| {
            tracing::warn!(?delay, %to, "transition delay overflows the clock, due now");
            from
        });
        self.sequence += 1;
        self.pending = Some(ScheduledTransition {
            ticket: TransitionTicket {
                generation: self.generation,
                sequence: self.sequence,
            },
            due,
            to,
        });
    }

    fn set_stage(&mut self, stage: Stage) {
        tracing::info!(
            generation = self.generation,
            from = %self.stage,
            to = %stage,
            "pack stage changed"
        );
        self.stage = stage;
    }
}
