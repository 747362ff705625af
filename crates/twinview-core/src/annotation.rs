use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MIN_ANNOTATION_SIZE;
use crate::geometry::{ImageRect, Point};

/// A committed defect marker in image-space coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub rect: ImageRect,
    pub text: String,
}

/// Ordered, append-only list of annotations (undo pops the tail).
#[derive(Clone, Debug)]
pub struct AnnotationLayer {
    items: Vec<Annotation>,
    min_size: f64,
}

impl Default for AnnotationLayer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ANNOTATION_SIZE)
    }
}

impl AnnotationLayer {
    pub fn new(min_size: f64) -> Self {
        Self {
            items: Vec::new(),
            min_size,
        }
    }

    /// Whether a rectangle is large enough to be recorded.
    pub fn accepts(&self, rect: &ImageRect) -> bool {
        rect.exceeds(self.min_size)
    }

    /// Append an annotation. Undersized rectangles and blank text are
    /// rejected without touching the layer.
    pub fn push(&mut self, rect: ImageRect, text: impl Into<String>) -> bool {
        let text = text.into();
        if !self.accepts(&rect) || text.trim().is_empty() {
            return false;
        }
        self.items.push(Annotation { rect, text });
        true
    }

    pub fn pop(&mut self) -> Option<Annotation> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the contents, dropping entries that violate the size invariant.
    pub fn replace(&mut self, items: Vec<Annotation>) {
        self.items = items
            .into_iter()
            .filter(|a| a.rect.exceeds(self.min_size) && !a.text.trim().is_empty())
            .collect();
    }

    pub fn items(&self) -> &[Annotation] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Drag-drawing state of a viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down. Both points are image space.
    Drawing { start: Point, current: Point },
    /// Drag finished with a valid rectangle; waiting for the text prompt.
    AwaitingText { rect: ImageRect },
}

impl DragState {
    /// Live draft rectangle, if any.
    pub fn draft(&self) -> Option<ImageRect> {
        match *self {
            Self::Idle => None,
            Self::Drawing { start, current } => Some(ImageRect::from_corners(start, current)),
            Self::AwaitingText { rect } => Some(rect),
        }
    }
}

/// Result of finishing an annotation drag.
#[derive(Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// Appended to the layer at this index.
    Added { index: usize },
    /// Width or height not above the minimum size.
    TooSmall,
    /// The prompt was declined or returned empty text.
    Declined,
    /// No drag was in progress.
    NotDrawing,
    /// A valid rectangle is waiting for text (two-step commit).
    Pending(ImageRect),
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { index } => write!(f, "Annotation #{} added", index + 1),
            Self::TooSmall => write!(f, "Selection too small, discarded"),
            Self::Declined => write!(f, "Annotation cancelled"),
            Self::NotDrawing => write!(f, "No annotation in progress"),
            Self::Pending(_) => write!(f, "Waiting for annotation text"),
        }
    }
}

/// Synchronous source of annotation text for a freshly drawn rectangle.
/// `None` (or empty text) discards the rectangle.
pub trait TextPrompt {
    fn prompt(&mut self, rect: &ImageRect) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut(&ImageRect) -> Option<String>,
{
    fn prompt(&mut self, rect: &ImageRect) -> Option<String> {
        self(rect)
    }
}
