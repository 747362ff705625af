use twinview_core::pair::Side;
use twinview_core::viewport::SyncedViewport;

use crate::convert::{composed_color_image, texture_options};

/// GPU copy of one viewport's composed image, re-uploaded when the
/// viewport redraws.
#[derive(Default)]
pub struct ViewportTexture {
    pub handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
}

impl ViewportTexture {
    pub fn sync(&mut self, ctx: &egui::Context, name: &str, viewport: &SyncedViewport) {
        let revision = viewport.revision();
        if self.revision == Some(revision) {
            return;
        }
        self.revision = Some(revision);
        self.handle = composed_color_image(viewport)
            .map(|image| ctx.load_texture(name, image, texture_options(viewport.quality_mode())));
    }
}

#[derive(Default)]
pub struct ViewportTextures {
    pub original: ViewportTexture,
    pub translated: ViewportTexture,
}

impl ViewportTextures {
    pub fn get(&self, side: Side) -> &ViewportTexture {
        match side {
            Side::Original => &self.original,
            Side::Translated => &self.translated,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut ViewportTexture {
        match side {
            Side::Original => &mut self.original,
            Side::Translated => &mut self.translated,
        }
    }
}
