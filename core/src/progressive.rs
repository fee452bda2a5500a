use alloc::vec;
use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Completed,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Completed => true,
        }
    }
}

/// Discrete, order-independent item unlocking over opaque content tokens.
///
/// The engine only tracks the revealed set; what the tokens mean (words,
/// gift boxes, memories) belongs to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveRevealEngine {
    revealed: Vec<bool>,
    session: RevealSession,
}

impl ProgressiveRevealEngine {
    /// An empty token list is normalized to a single token so the
    /// surrounding layer always has something renderable.
    pub fn new(total: usize) -> Self {
        Self {
            revealed: vec![false; total.max(1)],
            session: RevealSession::new(SessionConfig::default()),
        }
    }

    pub fn total(&self) -> usize {
        self.revealed.len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|&&revealed| revealed).count()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn all_revealed(&self) -> bool {
        self.revealed.iter().all(|&revealed| revealed)
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    /// Idempotent; the revealed subset only grows. Revealing the last
    /// token completes the session.
    pub fn reveal(&mut self, index: usize, now: DateTime<Utc>) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let Some(slot) = self.revealed.get_mut(index) else {
            return Err(EngineError::IndexOutOfBounds);
        };

        if self.session.is_completed() || *slot {
            return Ok(NoChange);
        }

        *slot = true;
        self.session.begin(now);

        let percent = self.revealed_count() as f32 * 100.0 / self.total() as f32;
        Ok(match self.session.update_progress(percent, now) {
            ProgressOutcome::Completed => Completed,
            _ => Revealed,
        })
    }

    pub fn reset(&mut self) {
        self.revealed.fill(false);
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    #[test]
    fn reveal_is_idempotent_and_order_free() {
        let mut engine = ProgressiveRevealEngine::new(4);

        assert_eq!(engine.reveal(2, t0()).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.reveal(2, t0()).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.reveal(0, t0()).unwrap(), RevealOutcome::Revealed);

        assert_eq!(engine.revealed_count(), 2);
        assert_eq!(engine.session().progress(), 50.0);
        assert_eq!(engine.session().state(), SessionState::InProgress);
    }

    #[test]
    fn revealing_every_token_completes_once() {
        let mut engine = ProgressiveRevealEngine::new(3);

        assert_eq!(engine.reveal(1, t0()).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.reveal(0, t0()).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.reveal(2, t0()).unwrap(), RevealOutcome::Completed);

        assert!(engine.all_revealed());
        assert!(engine.session().is_completed());
        assert_eq!(engine.reveal(0, t0()).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn out_of_bounds_token_is_rejected() {
        let mut engine = ProgressiveRevealEngine::new(2);

        assert_eq!(engine.reveal(2, t0()), Err(EngineError::IndexOutOfBounds));
    }

    #[test]
    fn empty_list_is_normalized_to_one_token() {
        let engine = ProgressiveRevealEngine::new(0);

        assert_eq!(engine.total(), 1);
    }

    #[test]
    fn reset_clears_the_revealed_set() {
        let mut engine = ProgressiveRevealEngine::new(2);

        engine.reveal(0, t0()).unwrap();
        engine.reveal(1, t0()).unwrap();
        assert!(engine.session().is_completed());

        engine.reset();

        assert_eq!(engine.revealed_count(), 0);
        assert_eq!(engine.session().state(), SessionState::NotStarted);
        assert_eq!(engine.reveal(0, t0()).unwrap(), RevealOutcome::Revealed);
    }
}
