use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Item origin before any interaction.
    pub start: Vec2,
    /// Bounding-box extent of the draggable item.
    pub item_size: Vec2,
    /// Extent of the containing surface the item is clamped into.
    pub container: Vec2,
    /// Zone the item must be dropped into.
    pub target: Rect,
}

impl DragConfig {
    fn normalized(self) -> Self {
        let item_w = finite_or(self.item_size.0, 1.0).max(1.0);
        let item_h = finite_or(self.item_size.1, 1.0).max(1.0);
        Self {
            start: (finite_or(self.start.0, 0.0), finite_or(self.start.1, 0.0)),
            item_size: (item_w, item_h),
            container: (
                finite_or(self.container.0, item_w).max(item_w),
                finite_or(self.container.1, item_h).max(item_h),
            ),
            target: self.target.normalized(),
        }
    }
}

fn finite_or(value: Px, fallback: Px) -> Px {
    if value.is_finite() { value } else { fallback }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragOutcome {
    NoChange,
    Started,
    Moved,
    /// Drag ended outside the target zone; the item stays where released.
    Released,
    Snapped,
}

impl DragOutcome {
    pub const fn has_update(self) -> bool {
        use DragOutcome::*;
        match self {
            NoChange => false,
            Started => true,
            Moved => true,
            Released => true,
            Snapped => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
struct ActiveDrag {
    pointer_id: i32,
    /// Offset between the pointer and the item origin at grab time.
    offset: Vec2,
}

/// Pointer-drag placement with snap-to-target behavior.
///
/// One pointer may drag the item at a time; a second `begin_drag` while a
/// drag is active is ignored, beyond whatever pointer capture the platform
/// provides. A failed drop leaves the item where it was released; there is
/// no snap-back to the origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragSnapEngine {
    config: DragConfig,
    position: Vec2,
    drag: Option<ActiveDrag>,
    snapped: bool,
    session: RevealSession,
}

impl DragSnapEngine {
    pub fn new(config: DragConfig) -> Self {
        let config = config.normalized();
        Self {
            position: clamp_to(config.start, &config),
            config,
            drag: None,
            snapped: false,
            session: RevealSession::new(SessionConfig::default()),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn target(&self) -> Rect {
        self.config.target
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    /// Captures the pointer and records its offset from the item origin.
    /// Ignored while another pointer is dragging or once snapped.
    pub fn begin_drag(&mut self, pointer_id: i32, x: Px, y: Px, now: DateTime<Utc>) -> DragOutcome {
        use DragOutcome::*;

        if self.snapped || self.drag.is_some() {
            return NoChange;
        }

        if !x.is_finite() || !y.is_finite() {
            return NoChange;
        }

        self.session.begin(now);
        self.drag = Some(ActiveDrag {
            pointer_id,
            offset: (x - self.position.0, y - self.position.1),
        });
        log::trace!("drag started by pointer {}", pointer_id);
        Started
    }

    /// Moves the item to `pointer - offset`, clamped to the container.
    /// Events from other pointers are ignored.
    pub fn update_drag(&mut self, pointer_id: i32, x: Px, y: Px) -> DragOutcome {
        use DragOutcome::*;

        let Some(drag) = self.drag else {
            return NoChange;
        };
        if drag.pointer_id != pointer_id || self.snapped {
            return NoChange;
        }
        if !x.is_finite() || !y.is_finite() {
            return NoChange;
        }

        let next = clamp_to((x - drag.offset.0, y - drag.offset.1), &self.config);
        if next == self.position {
            return NoChange;
        }

        self.position = next;
        Moved
    }

    /// Ends the drag. If the item's bounding-box center lies strictly
    /// inside the target zone, the item is pinned to the zone's exact
    /// center and marked snapped, completing the session.
    pub fn end_drag(&mut self, pointer_id: i32, now: DateTime<Utc>) -> DragOutcome {
        use DragOutcome::*;

        match self.drag {
            Some(drag) if drag.pointer_id == pointer_id => {
                self.drag = None;
            }
            _ => return NoChange,
        }

        let (item_w, item_h) = self.config.item_size;
        let center = (
            self.position.0 + item_w / 2.0,
            self.position.1 + item_h / 2.0,
        );

        if self.config.target.contains(center) {
            let (zone_x, zone_y) = self.config.target.center();
            self.position = (zone_x - item_w / 2.0, zone_y - item_h / 2.0);
            self.snapped = true;
            self.session.update_progress(100.0, now);
            log::debug!("item snapped to target center");
            Snapped
        } else {
            Released
        }
    }

    /// Lost or cancelled pointer: drop the drag, keep the position.
    pub fn cancel_drag(&mut self) -> DragOutcome {
        if self.drag.take().is_some() {
            log::trace!("drag cancelled");
            DragOutcome::Released
        } else {
            DragOutcome::NoChange
        }
    }

    pub fn reset(&mut self) {
        self.position = clamp_to(self.config.start, &self.config);
        self.drag = None;
        self.snapped = false;
        self.session.reset();
    }
}

fn clamp_to((x, y): Vec2, config: &DragConfig) -> Vec2 {
    let max_x = (config.container.0 - config.item_size.0).max(0.0);
    let max_y = (config.container.1 - config.item_size.1).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}
