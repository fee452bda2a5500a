use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Completed
/// - any state -> NotStarted (via `reset`)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl SessionState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub completion_threshold: f32,
}

impl SessionConfig {
    pub fn new(completion_threshold: f32) -> Self {
        let completion_threshold = if completion_threshold.is_finite() {
            completion_threshold.clamp(f32::EPSILON, 100.0)
        } else {
            100.0
        };
        Self {
            completion_threshold,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            completion_threshold: 100.0,
        }
    }
}

/// Outcome of pushing a progress value into a session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProgressOutcome {
    NoChange,
    Advanced,
    /// Returned exactly once, on the call that crosses the threshold.
    Completed,
}

impl ProgressOutcome {
    pub const fn has_update(self) -> bool {
        use ProgressOutcome::*;
        match self {
            NoChange => false,
            Advanced => true,
            Completed => true,
        }
    }

    pub const fn is_completion(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Immutable view handed to the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub progress: f32,
}

/// Completion/progress state machine shared by every mini-game engine.
///
/// Progress is monotonically non-decreasing until `reset`; completion is
/// edge-triggered through the returned [`ProgressOutcome`]. Callers supply
/// `now` so the machine stays deterministic under test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealSession {
    state: SessionState,
    progress: f32,
    completion_threshold: f32,
    generation: u32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl RevealSession {
    pub fn new(config: SessionConfig) -> Self {
        let config = SessionConfig::new(config.completion_threshold);
        Self {
            state: Default::default(),
            progress: 0.0,
            completion_threshold: config.completion_threshold,
            generation: 0,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Monotonic counter bumped on every `reset`. Deferred work scheduled
    /// against an older generation must be discarded by the caller.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_current(&self, generation: u32) -> bool {
        self.generation == generation
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            progress: self.progress,
        }
    }

    /// Marks the session in progress. Idempotent while already running,
    /// no-op once completed.
    pub fn begin(&mut self, now: DateTime<Utc>) {
        if self.state.is_initial() {
            log::debug!("session started at {}", now);
            self.state = SessionState::InProgress;
            self.started_at = Some(now);
        }
    }

    /// Accepts a new progress value, clamped to `[0, 100]`. Values below the
    /// current progress are ignored. Crossing the threshold completes the
    /// session, snaps progress to 100, and reports `Completed` exactly once.
    pub fn update_progress(&mut self, value: f32, now: DateTime<Utc>) -> ProgressOutcome {
        use ProgressOutcome::*;

        if self.state.is_completed() {
            return NoChange;
        }

        if !value.is_finite() {
            log::warn!("ignoring non-finite progress value");
            return NoChange;
        }

        let value = value.clamp(0.0, 100.0);
        if value < self.progress {
            log::trace!(
                "ignoring progress regression {} -> {}",
                self.progress,
                value
            );
            return NoChange;
        }

        if value >= self.completion_threshold {
            self.begin(now);
            self.progress = 100.0;
            self.state = SessionState::Completed;
            self.completed_at = Some(now);
            log::debug!("session completed at {}", now);
            return Completed;
        }

        if value > self.progress {
            self.begin(now);
            self.progress = value;
            Advanced
        } else {
            NoChange
        }
    }

    /// Returns to `NotStarted` from any state, clearing progress and
    /// timestamps and invalidating pending work via the generation counter.
    pub fn reset(&mut self) {
        self.state = SessionState::NotStarted;
        self.progress = 0.0;
        self.started_at = None;
        self.completed_at = None;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("session reset, generation {}", self.generation);
    }
}

impl Default for RevealSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    #[test]
    fn begin_is_idempotent_and_records_start_time() {
        let mut session = RevealSession::default();

        session.begin(t0());
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.started_at(), Some(t0()));

        let later = DateTime::<Utc>::from_timestamp_millis(5_000).unwrap();
        session.begin(later);
        assert_eq!(session.started_at(), Some(t0()));
    }

    #[test]
    fn progress_never_regresses() {
        let mut session = RevealSession::default();

        assert_eq!(
            session.update_progress(40.0, t0()),
            ProgressOutcome::Advanced
        );
        assert_eq!(
            session.update_progress(20.0, t0()),
            ProgressOutcome::NoChange
        );
        assert_eq!(session.progress(), 40.0);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut session = RevealSession::default();

        assert_eq!(
            session.update_progress(100.0, t0()),
            ProgressOutcome::Completed
        );
        assert_eq!(
            session.update_progress(100.0, t0()),
            ProgressOutcome::NoChange
        );
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.completed_at(), Some(t0()));
    }

    #[test]
    fn threshold_crossing_snaps_progress_to_full() {
        let mut session = RevealSession::new(SessionConfig::new(65.0));

        assert_eq!(
            session.update_progress(64.0, t0()),
            ProgressOutcome::Advanced
        );
        assert_eq!(
            session.update_progress(66.0, t0()),
            ProgressOutcome::Completed
        );
        assert_eq!(session.progress(), 100.0);
    }

    #[test]
    fn reset_from_completed_accepts_fresh_progress() {
        let mut session = RevealSession::default();
        let before = session.generation();

        session.update_progress(100.0, t0());
        session.reset();

        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.started_at(), None);
        assert_eq!(session.completed_at(), None);
        assert!(!session.is_current(before));
        assert_eq!(
            session.update_progress(50.0, t0()),
            ProgressOutcome::Advanced
        );
    }

    #[test]
    fn clamps_out_of_range_values() {
        let mut session = RevealSession::default();

        assert_eq!(
            session.update_progress(-10.0, t0()),
            ProgressOutcome::NoChange
        );
        assert_eq!(session.progress(), 0.0);
        assert_eq!(
            session.update_progress(250.0, t0()),
            ProgressOutcome::Completed
        );
        assert_eq!(session.progress(), 100.0);
    }
}
