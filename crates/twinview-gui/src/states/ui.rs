use std::path::PathBuf;

use twinview_core::pair::Side;

/// Pending annotation text entry for a rectangle drawn on `side`.
pub struct PromptState {
    pub side: Side,
    pub text: String,
    pub focused: bool,
}

impl PromptState {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            text: String::new(),
            focused: false,
        }
    }
}

/// Pending confirmation before replacing an existing reviewed image.
pub struct OverwriteState {
    pub dir: PathBuf,
    pub path: PathBuf,
}

/// Overall UI state.
pub struct UIState {
    /// Primary drag draws rectangles instead of panning.
    pub annotation_mode: bool,

    /// Side that last received input; target of undo.
    pub active_side: Side,

    pub prompt: Option<PromptState>,

    pub overwrite: Option<OverwriteState>,

    /// Fit both views once the canvases have a size.
    pub needs_fit: bool,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            annotation_mode: false,
            active_side: Side::Translated,
            prompt: None,
            overwrite: None,
            needs_fit: false,
            log_messages: Vec::new(),
        }
    }
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }
}
