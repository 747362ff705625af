mod ui;
mod viewport;

pub use ui::{OverwriteState, PromptState, UIState};
pub use viewport::ViewportTextures;
