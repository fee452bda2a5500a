use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Defaults match the shipped scratch cards: a 30px brush, a progress
/// sample every 6th stroke over every 20th pixel, completing at 65%
/// transparency.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchConfig {
    pub width: u32,
    pub height: u32,
    pub brush_radius: Px,
    pub sample_stride: usize,
    pub sample_cadence: u32,
    pub completion_threshold: f32,
}

impl ScratchConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    fn normalized(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            brush_radius: if self.brush_radius.is_finite() {
                self.brush_radius.max(1.0)
            } else {
                Self::default().brush_radius
            },
            sample_stride: self.sample_stride.max(1),
            sample_cadence: self.sample_cadence.max(1),
            completion_threshold: SessionConfig::new(self.completion_threshold)
                .completion_threshold,
        }
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            brush_radius: 30.0,
            sample_stride: 20,
            sample_cadence: 6,
            completion_threshold: 65.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScratchOutcome {
    NoChange,
    Erased,
    Completed,
}

impl ScratchOutcome {
    pub const fn has_update(self) -> bool {
        use ScratchOutcome::*;
        match self {
            NoChange => false,
            Erased => true,
            Completed => true,
        }
    }
}

/// Erase-to-reveal mechanic over an opaque overlay.
///
/// The engine owns the overlay model as an erased-mask; the rendering
/// layer mirrors each erase stroke onto its own canvas. Strokes are
/// O(radius^2); the strided alpha scan runs only every Nth stroke, so the
/// pointer-move hot path never walks the full surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchCanvasEngine {
    config: ScratchConfig,
    mask: Array2<bool>,
    erase_counter: u32,
    session: RevealSession,
}

impl ScratchCanvasEngine {
    pub fn new(config: ScratchConfig) -> Self {
        let config = config.normalized();
        Self {
            mask: Self::opaque_mask(&config),
            erase_counter: 0,
            session: RevealSession::new(SessionConfig::new(config.completion_threshold)),
            config,
        }
    }

    fn opaque_mask(config: &ScratchConfig) -> Array2<bool> {
        Array2::default((config.width as usize, config.height as usize))
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn is_erased_at(&self, x: u32, y: u32) -> bool {
        self.mask
            .get((x as usize, y as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Erases a disc with the configured brush radius.
    pub fn erase(&mut self, x: Px, y: Px, now: DateTime<Utc>) -> ScratchOutcome {
        self.erase_with_radius(x, y, self.config.brush_radius, now)
    }

    /// Erases a disc centered at `(x, y)`. Ignored once the layer is fully
    /// revealed. Every `sample_cadence`-th stroke triggers a progress
    /// sample.
    pub fn erase_with_radius(
        &mut self,
        x: Px,
        y: Px,
        radius: Px,
        now: DateTime<Utc>,
    ) -> ScratchOutcome {
        use ScratchOutcome::*;

        if self.session.is_completed() {
            return NoChange;
        }

        if !x.is_finite() || !y.is_finite() || !radius.is_finite() {
            return NoChange;
        }

        self.session.begin(now);
        self.clear_disc(x, y, radius.max(1.0));
        self.erase_counter = self.erase_counter.wrapping_add(1);

        if self.erase_counter % self.config.sample_cadence == 0
            && self.sample_progress(now).is_completion()
        {
            log::debug!("scratch layer revealed after {} strokes", self.erase_counter);
            return Completed;
        }

        Erased
    }

    fn clear_disc(&mut self, x: Px, y: Px, radius: Px) {
        let (w, h) = self.dimensions();
        let x0 = (x - radius).max(0.0) as usize;
        let y0 = (y - radius).max(0.0) as usize;
        let x1 = ((x + radius).min((w - 1) as Px)).max(0.0) as usize;
        let y1 = ((y + radius).min((h - 1) as Px)).max(0.0) as usize;
        let r2 = radius * radius;

        for cx in x0..=x1 {
            for cy in y0..=y1 {
                let dx = cx as Px - x;
                let dy = cy as Px - y;
                if dx * dx + dy * dy <= r2 {
                    self.mask[(cx, cy)] = true;
                }
            }
        }
    }

    /// Strided transparency estimate over the flattened mask, pushed into
    /// the session. Never scans every pixel.
    pub fn sample_progress(&mut self, now: DateTime<Utc>) -> ProgressOutcome {
        let stride = self.config.sample_stride;
        let mut samples: u32 = 0;
        let mut transparent: u32 = 0;

        for &erased in self.mask.iter().step_by(stride) {
            samples += 1;
            if erased {
                transparent += 1;
            }
        }

        let percent = (transparent as f32 * 100.0 / samples.max(1) as f32).min(100.0);
        log::trace!(
            "scratch sample: {}/{} transparent ({percent}%)",
            transparent,
            samples
        );
        self.session.update_progress(percent, now)
    }

    /// Reinitializes the overlay at new dimensions. Erased geometry cannot
    /// be remapped across sizes, so progress restarts from zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.mask = Self::opaque_mask(&self.config);
        self.erase_counter = 0;
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn engine(width: u32, height: u32) -> ScratchCanvasEngine {
        ScratchCanvasEngine::new(ScratchConfig::new(width, height))
    }

    #[test]
    fn fresh_layer_samples_near_zero() {
        let mut engine = engine(200, 100);

        engine.sample_progress(t0());

        assert!(engine.session().progress() <= 2.0);
    }

    #[test]
    fn erase_marks_disc_and_starts_session() {
        let mut engine = engine(100, 100);

        let outcome = engine.erase_with_radius(50.0, 50.0, 10.0, t0());

        assert_eq!(outcome, ScratchOutcome::Erased);
        assert_eq!(engine.session().state(), SessionState::InProgress);
        assert!(engine.is_erased_at(50, 50));
        assert!(engine.is_erased_at(55, 50));
        assert!(!engine.is_erased_at(70, 50));
    }

    #[test]
    fn full_erase_completes_and_locks_the_layer() {
        let mut engine = engine(40, 40);

        let mut completed = 0;
        for _ in 0..12 {
            if engine.erase_with_radius(20.0, 20.0, 60.0, t0()) == ScratchOutcome::Completed {
                completed += 1;
            }
        }

        assert_eq!(completed, 1);
        assert_eq!(engine.session().state(), SessionState::Completed);
        assert_eq!(engine.session().progress(), 100.0);
        assert_eq!(
            engine.erase_with_radius(20.0, 20.0, 60.0, t0()),
            ScratchOutcome::NoChange
        );
    }

    #[test]
    fn sampling_runs_on_cadence_not_per_stroke() {
        let mut engine = ScratchCanvasEngine::new(ScratchConfig {
            sample_cadence: 6,
            ..ScratchConfig::new(60, 60)
        });

        // five strokes over the whole surface: plenty erased, not yet sampled
        for _ in 0..5 {
            engine.erase_with_radius(30.0, 30.0, 90.0, t0());
        }
        assert_eq!(engine.session().progress(), 0.0);

        // the sixth stroke triggers the sample and completes
        assert_eq!(
            engine.erase_with_radius(30.0, 30.0, 90.0, t0()),
            ScratchOutcome::Completed
        );
    }

    #[test]
    fn resize_resets_progress_to_zero() {
        let mut engine = engine(50, 50);

        engine.erase_with_radius(25.0, 25.0, 80.0, t0());
        let before = engine.session().generation();
        engine.resize(120, 80);

        assert_eq!(engine.dimensions(), (120, 80));
        assert_eq!(engine.session().state(), SessionState::NotStarted);
        assert_eq!(engine.session().progress(), 0.0);
        assert!(!engine.session().is_current(before));
        assert!(!engine.is_erased_at(25, 25));
    }

    #[test]
    fn degenerate_dimensions_are_normalized() {
        let engine = engine(0, 0);

        assert_eq!(engine.dimensions(), (1, 1));
    }
}
