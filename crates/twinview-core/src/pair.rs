//! Two viewports bound by a bidirectional synchronizer.
//!
//! Input is routed to one side. After every input the pair drains that
//! side's notifications and mirrors them onto the other side inside a
//! [`crate::viewport::SyncScope`], so the mirrored change emits nothing.

use std::fmt;

use image::RgbaImage;
use tracing::debug;

use crate::annotation::{CommitOutcome, TextPrompt};
use crate::geometry::{Point, Size};
use crate::render::QualityMode;
use crate::scroll::{ScrollArea, ScrollAxis};
use crate::viewport::{SyncedViewport, ViewportEvent, ViewportSettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Original,
    Translated,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Original, Side::Translated];

    pub fn other(self) -> Side {
        match self {
            Side::Original => Side::Translated,
            Side::Translated => Side::Original,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Translated => write!(f, "translated"),
        }
    }
}

/// A notification raised by user input on one side.
#[derive(Clone, Debug, PartialEq)]
pub struct PairEvent {
    pub side: Side,
    pub event: ViewportEvent,
}

pub struct ViewportPair {
    original: SyncedViewport,
    translated: SyncedViewport,
    linked: bool,
    events: Vec<PairEvent>,
}

impl ViewportPair {
    pub fn new(original: ScrollArea, translated: ScrollArea, settings: ViewportSettings) -> Self {
        Self {
            original: SyncedViewport::new(original, settings),
            translated: SyncedViewport::new(translated, settings),
            linked: true,
            events: Vec::new(),
        }
    }

    pub fn viewport(&self, side: Side) -> &SyncedViewport {
        match side {
            Side::Original => &self.original,
            Side::Translated => &self.translated,
        }
    }

    /// Direct access to one side. Call [`Self::propagate`] afterwards to
    /// mirror whatever the change emitted.
    pub fn viewport_mut(&mut self, side: Side) -> &mut SyncedViewport {
        match side {
            Side::Original => &mut self.original,
            Side::Translated => &mut self.translated,
        }
    }

    /// (source, target) borrowed together.
    fn split_mut(&mut self, source: Side) -> (&mut SyncedViewport, &mut SyncedViewport) {
        match source {
            Side::Original => (&mut self.original, &mut self.translated),
            Side::Translated => (&mut self.translated, &mut self.original),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn set_linked(&mut self, linked: bool) {
        self.linked = linked;
    }

    /// Drain both outboxes, mirroring view changes onto the sibling, and
    /// queue every drained notification for the host.
    pub fn propagate(&mut self) {
        for side in Side::ALL {
            let linked = self.linked;
            let (source, target) = self.split_mut(side);
            let drained = source.take_events();
            if linked {
                for event in &drained {
                    mirror(event, target);
                }
            }
            self.events
                .extend(drained.into_iter().map(|event| PairEvent { side, event }));
        }
    }

    /// Notifications accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<PairEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Routed input
    // ------------------------------------------------------------------

    pub fn pan(&mut self, side: Side, delta: Point) {
        self.viewport_mut(side).pan(delta);
        self.propagate();
    }

    pub fn zoom_at_cursor(&mut self, side: Side, factor: f64, cursor: Point) -> f64 {
        let applied = self.viewport_mut(side).zoom_at_cursor(factor, cursor);
        self.propagate();
        applied
    }

    pub fn scroll_to(&mut self, side: Side, axis: ScrollAxis, value: f64) -> bool {
        let moved = self.viewport_mut(side).scroll_to(axis, value);
        self.propagate();
        moved
    }

    pub fn fit(&mut self, side: Side) {
        self.viewport_mut(side).fit();
        self.propagate();
    }

    /// Zoom both sides about their own centres without cross-notification.
    pub fn zoom_both(&mut self, factor: f64) {
        for side in Side::ALL {
            let mut scope = self.viewport_mut(side).begin_external_sync();
            scope.zoom_at_center(factor);
        }
    }

    /// Reset and fit both sides independently.
    pub fn reset_views(&mut self) {
        for side in Side::ALL {
            let mut scope = self.viewport_mut(side).begin_external_sync();
            scope.reset();
            scope.fit();
        }
    }

    pub fn set_viewport_size(&mut self, side: Side, visible: Size) {
        self.viewport_mut(side).set_viewport_size(visible);
    }

    pub fn set_quality_mode(&mut self, mode: QualityMode) {
        self.original.set_quality_mode(mode);
        self.translated.set_quality_mode(mode);
    }

    pub fn quality_mode(&self) -> QualityMode {
        self.original.quality_mode()
    }

    pub fn begin_annotation(&mut self, side: Side, start: Point) -> bool {
        self.viewport_mut(side).begin_annotation(start)
    }

    pub fn update_annotation(&mut self, side: Side, current: Point) {
        self.viewport_mut(side).update_annotation(current);
    }

    pub fn finish_annotation(&mut self, side: Side, end: Point) -> CommitOutcome {
        self.viewport_mut(side).finish_annotation(end)
    }

    pub fn resolve_annotation(&mut self, side: Side, text: Option<String>) -> CommitOutcome {
        let outcome = self.viewport_mut(side).resolve_annotation(text);
        self.propagate();
        outcome
    }

    pub fn commit_annotation(&mut self, side: Side, end: Point, prompt: &mut dyn TextPrompt) -> CommitOutcome {
        let outcome = self.viewport_mut(side).commit_annotation(end, prompt);
        self.propagate();
        outcome
    }

    pub fn cancel_annotation(&mut self, side: Side) {
        self.viewport_mut(side).cancel_annotation();
    }

    pub fn undo_last_annotation(&mut self, side: Side) -> bool {
        let undone = self.viewport_mut(side).undo_last_annotation();
        self.propagate();
        undone
    }

    /// Load a new pair of base images and fit both views.
    pub fn load(&mut self, original: RgbaImage, translated: RgbaImage) {
        self.original.load_image(original);
        self.translated.load_image(translated);
        self.reset_views();
        self.propagate();
    }

    pub fn clear(&mut self) {
        self.original.clear();
        self.translated.clear();
        self.propagate();
    }
}

/// Apply one source notification to the target viewport under a sync scope.
fn mirror(event: &ViewportEvent, target: &mut SyncedViewport) {
    match *event {
        ViewportEvent::TransformChanged {
            transform,
            scroll,
            image_size,
        } => {
            let mut scope = target.begin_external_sync();
            scope.apply_transform(transform);
            if scope.image_size() != image_size {
                for axis in ScrollAxis::ALL {
                    scope.apply_scroll_fraction(axis, scroll.get(axis));
                }
            }
            debug!(scale = transform.scale, "Mirrored transform");
        }
        ViewportEvent::ScrollChanged { axis, fraction } => {
            let mut scope = target.begin_external_sync();
            scope.apply_scroll_fraction(axis, fraction);
        }
        _ => {}
    }
}
