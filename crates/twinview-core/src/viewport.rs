//! A single pannable/zoomable canvas over one immutable base image.
//!
//! Change notifications are queued in an outbox and drained by whoever owns
//! the viewport (normally [`crate::pair::ViewportPair`]). While a
//! [`SyncScope`] is alive every notification is dropped at the source, so a
//! change applied on behalf of the sibling viewport never echoes back.

use std::ops::{Deref, DerefMut};

use image::RgbaImage;
use tracing::{debug, trace};

use crate::annotation::{Annotation, AnnotationLayer, CommitOutcome, DragState, TextPrompt};
use crate::consts::DEFAULT_MIN_ANNOTATION_SIZE;
use crate::geometry::{ImageRect, Point, Size};
use crate::render::{compose, OverlayStyle, QualityMode};
use crate::scroll::{ScrollArea, ScrollAxis, ScrollFraction};
use crate::transform::{Transform, ZoomLimits};

/// Per-viewport behavior knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSettings {
    pub limits: ZoomLimits,
    pub min_annotation_size: f64,
    pub style: OverlayStyle,
    pub quality: QualityMode,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            limits: ZoomLimits::default(),
            min_annotation_size: DEFAULT_MIN_ANNOTATION_SIZE,
            style: OverlayStyle::default(),
            quality: QualityMode::default(),
        }
    }
}

/// Notifications a viewport emits about itself.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportEvent {
    Loaded { width: u32, height: u32 },
    Cleared,
    TransformChanged {
        transform: Transform,
        scroll: ScrollFraction,
        image_size: Size,
    },
    ScrollChanged { axis: ScrollAxis, fraction: f64 },
    AnnotationAdded { index: usize, text: String },
    AnnotationUndone { remaining: usize },
}

pub struct SyncedViewport {
    base: Option<RgbaImage>,
    composed: Option<RgbaImage>,
    revision: u64,
    transform: Transform,
    limits: ZoomLimits,
    scroll: ScrollArea,
    layer: AnnotationLayer,
    drag: DragState,
    style: OverlayStyle,
    quality: QualityMode,
    syncing: bool,
    external_updates: usize,
    outbox: Vec<ViewportEvent>,
}

impl SyncedViewport {
    pub fn new(scroll: ScrollArea, settings: ViewportSettings) -> Self {
        Self {
            base: None,
            composed: None,
            revision: 0,
            transform: Transform::IDENTITY,
            limits: settings.limits,
            scroll,
            layer: AnnotationLayer::new(settings.min_annotation_size),
            drag: DragState::Idle,
            style: settings.style,
            quality: settings.quality,
            syncing: false,
            external_updates: 0,
            outbox: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Image
    // ------------------------------------------------------------------

    /// Replace the base image, clearing annotations and resetting the transform.
    pub fn load_image(&mut self, pixels: RgbaImage) {
        let (width, height) = pixels.dimensions();
        self.base = Some(pixels);
        self.layer.clear();
        self.drag = DragState::Idle;
        self.transform.reset();
        self.redraw();
        debug!(width, height, "Viewport image loaded");
        self.emit(ViewportEvent::Loaded { width, height });
    }

    /// Drop the base image (e.g. after a failed load).
    pub fn clear(&mut self) {
        self.base = None;
        self.layer.clear();
        self.drag = DragState::Idle;
        self.transform.reset();
        self.redraw();
        self.emit(ViewportEvent::Cleared);
    }

    pub fn has_image(&self) -> bool {
        self.base.is_some()
    }

    pub fn base(&self) -> Option<&RgbaImage> {
        self.base.as_ref()
    }

    /// Base image size, or zero when nothing is loaded.
    pub fn image_size(&self) -> Size {
        self.base
            .as_ref()
            .map(|img| Size::from_pixels(img.width(), img.height()))
            .unwrap_or_default()
    }

    /// Latest redraw output (base + committed annotations).
    pub fn composed(&self) -> Option<&RgbaImage> {
        self.composed.as_ref()
    }

    /// Incremented on every redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Recompose from the untouched base and the current annotation list.
    pub fn redraw(&mut self) {
        self.composed = self
            .base
            .as_ref()
            .map(|base| compose(base, self.layer.items(), &self.style, self.quality));
        self.revision += 1;
    }

    /// Base + annotations at native resolution, independent of zoom and pan.
    pub fn render_to_image(&self) -> Option<RgbaImage> {
        self.base
            .as_ref()
            .map(|base| compose(base, self.layer.items(), &self.style, self.quality))
    }

    pub fn quality_mode(&self) -> QualityMode {
        self.quality
    }

    pub fn set_quality_mode(&mut self, mode: QualityMode) {
        if self.quality != mode {
            self.quality = mode;
            self.redraw();
        }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    // ------------------------------------------------------------------
    // Transform and scrolling
    // ------------------------------------------------------------------

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn scroll_area(&self) -> ScrollArea {
        self.scroll
    }

    /// Resize the visible area. Does not notify.
    pub fn set_viewport_size(&mut self, visible: Size) {
        self.scroll.visible = visible;
    }

    pub fn scroll_fractions(&self) -> ScrollFraction {
        self.scroll.fractions(self.image_size(), &self.transform)
    }

    pub fn scroll_range(&self, axis: ScrollAxis) -> f64 {
        self.scroll.range(axis, self.image_size(), &self.transform)
    }

    pub fn scroll_position(&self, axis: ScrollAxis) -> f64 {
        self.scroll.position(axis, self.image_size(), &self.transform)
    }

    pub fn pan(&mut self, delta: Point) {
        if !delta.is_finite() {
            return;
        }
        self.transform.pan_by(delta);
        self.emit_transform();
    }

    /// Anchor-preserving zoom at `cursor` (viewport-local screen space).
    /// Returns the applied factor; 1.0 means nothing changed.
    pub fn zoom_at_cursor(&mut self, factor: f64, cursor: Point) -> f64 {
        let applied = self.transform.zoom(factor, cursor, &self.limits);
        if applied != 1.0 {
            self.emit_transform();
        }
        applied
    }

    /// Zoom anchored at the centre of the visible area.
    pub fn zoom_at_center(&mut self, factor: f64) -> f64 {
        let center = self.scroll.visible.center();
        self.zoom_at_cursor(factor, center)
    }

    pub fn reset(&mut self) {
        self.transform.reset();
        self.emit_transform();
    }

    /// Fit the whole image into the visible area.
    pub fn fit(&mut self) {
        let image = self.image_size();
        self.transform.fit_to_viewport(self.scroll.visible, image, &self.limits);
        self.emit_transform();
    }

    /// Scroll-bar interaction: jump to an absolute scroll value.
    pub fn scroll_to(&mut self, axis: ScrollAxis, value: f64) -> bool {
        let image = self.image_size();
        if !self.scroll.scroll_to(axis, value, image, &mut self.transform) {
            return false;
        }
        let fraction = self.scroll.fraction(axis, image, &self.transform);
        self.emit(ViewportEvent::ScrollChanged { axis, fraction });
        true
    }

    /// Overwrite the whole transform. The scale is kept inside this
    /// viewport's own limits.
    pub fn apply_transform(&mut self, transform: Transform) {
        self.transform = Transform {
            scale: self.limits.clamp(transform.scale),
            pan: transform.pan,
        };
        self.emit_transform();
    }

    /// Move to a fraction of this viewport's own scrollable range.
    pub fn apply_scroll_fraction(&mut self, axis: ScrollAxis, fraction: f64) -> bool {
        let image = self.image_size();
        if !self.scroll.apply_fraction(axis, fraction, image, &mut self.transform) {
            return false;
        }
        let fraction = self.scroll.fraction(axis, image, &self.transform);
        self.emit(ViewportEvent::ScrollChanged { axis, fraction });
        true
    }

    // ------------------------------------------------------------------
    // Annotation drawing
    // ------------------------------------------------------------------

    /// Start a drag at `start` (screen space). Ignored without an image.
    pub fn begin_annotation(&mut self, start: Point) -> bool {
        if self.base.is_none() || !start.is_finite() {
            return false;
        }
        let p = self.transform.screen_to_image(start);
        self.drag = DragState::Drawing { start: p, current: p };
        true
    }

    pub fn update_annotation(&mut self, current: Point) {
        if !current.is_finite() {
            return;
        }
        if let DragState::Drawing { start, .. } = self.drag {
            self.drag = DragState::Drawing {
                start,
                current: self.transform.screen_to_image(current),
            };
        }
    }

    /// End the drag at `end`. A large enough rectangle moves to the
    /// awaiting-text state and is returned as `Pending`.
    pub fn finish_annotation(&mut self, end: Point) -> CommitOutcome {
        let DragState::Drawing { start, current } = self.drag else {
            return CommitOutcome::NotDrawing;
        };
        let end = if end.is_finite() {
            self.transform.screen_to_image(end)
        } else {
            current
        };
        let rect = ImageRect::from_corners(start, end);
        if !self.layer.accepts(&rect) {
            self.drag = DragState::Idle;
            return CommitOutcome::TooSmall;
        }
        self.drag = DragState::AwaitingText { rect };
        CommitOutcome::Pending(rect)
    }

    /// Second half of a two-step commit: append the pending rectangle with
    /// `text`, or discard it when the text is missing or blank.
    pub fn resolve_annotation(&mut self, text: Option<String>) -> CommitOutcome {
        let DragState::AwaitingText { rect } = self.drag else {
            return CommitOutcome::NotDrawing;
        };
        self.drag = DragState::Idle;
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return CommitOutcome::Declined;
        };
        if !self.layer.push(rect, text.clone()) {
            return CommitOutcome::TooSmall;
        }
        let index = self.layer.len() - 1;
        self.redraw();
        self.emit(ViewportEvent::AnnotationAdded { index, text });
        CommitOutcome::Added { index }
    }

    /// End the drag and ask `prompt` for the annotation text synchronously.
    pub fn commit_annotation(&mut self, end: Point, prompt: &mut dyn TextPrompt) -> CommitOutcome {
        match self.finish_annotation(end) {
            CommitOutcome::Pending(rect) => {
                let text = prompt.prompt(&rect);
                self.resolve_annotation(text)
            }
            other => other,
        }
    }

    /// Abandon any drag or pending rectangle.
    pub fn cancel_annotation(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Live draft rectangle in image space.
    pub fn draft_rect(&self) -> Option<ImageRect> {
        self.drag.draft()
    }

    /// Remove the most recent annotation. Returns false when there was none.
    pub fn undo_last_annotation(&mut self) -> bool {
        if self.layer.pop().is_none() {
            return false;
        }
        self.redraw();
        let remaining = self.layer.len();
        self.emit(ViewportEvent::AnnotationUndone { remaining });
        true
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.layer.items()
    }

    /// Reinstate a previously taken annotation list without notifying.
    pub fn restore_annotations(&mut self, annotations: Vec<Annotation>) {
        self.layer.replace(annotations);
        self.redraw();
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Enter external-sync mode for the lifetime of the returned guard.
    pub fn begin_external_sync(&mut self) -> SyncScope<'_> {
        SyncScope::new(self)
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    /// Number of sync scopes entered on this viewport.
    pub fn external_updates(&self) -> usize {
        self.external_updates
    }

    pub fn take_events(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn emit_transform(&mut self) {
        let image_size = self.image_size();
        let event = ViewportEvent::TransformChanged {
            transform: self.transform,
            scroll: self.scroll.fractions(image_size, &self.transform),
            image_size,
        };
        self.emit(event);
    }

    fn emit(&mut self, event: ViewportEvent) {
        if self.syncing {
            trace!(?event, "Suppressed during external sync");
            return;
        }
        self.outbox.push(event);
    }
}

/// Scoped external-sync mode. Notifications are suppressed from creation
/// until drop, including on early return or unwinding.
pub struct SyncScope<'a> {
    viewport: &'a mut SyncedViewport,
}

impl<'a> SyncScope<'a> {
    fn new(viewport: &'a mut SyncedViewport) -> Self {
        viewport.syncing = true;
        viewport.external_updates += 1;
        Self { viewport }
    }
}

impl Deref for SyncScope<'_> {
    type Target = SyncedViewport;

    fn deref(&self) -> &SyncedViewport {
        self.viewport
    }
}

impl DerefMut for SyncScope<'_> {
    fn deref_mut(&mut self) -> &mut SyncedViewport {
        self.viewport
    }
}

impl Drop for SyncScope<'_> {
    fn drop(&mut self) {
        self.viewport.syncing = false;
    }
}
