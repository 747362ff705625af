//! A review run: session navigation driving a viewport pair, plus the
//! annotation stash, snapshots and batch export built on top of it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::annotation::Annotation;
use crate::config::ReviewConfig;
use crate::discovery::{discover_pairs, Discovery};
use crate::error::{Result, TwinviewError};
use crate::export::{export_pair, export_reviewed, CurrentExport, ExportLayout, ExportReport};
use crate::io::image_io::load_rgba;
use crate::pair::{PairEvent, Side, ViewportPair};
use crate::scroll::ScrollArea;
use crate::session::{ImagePair, Session};
use crate::snapshot::{save_snapshot, timestamp_now, SnapshotOutcome};
use crate::viewport::ViewportEvent;

/// Annotations of both sides of one pair, kept while the user looks at
/// other pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StashedAnnotations {
    pub original: Vec<Annotation>,
    pub translated: Vec<Annotation>,
}

impl StashedAnnotations {
    pub fn is_empty(&self) -> bool {
        self.original.is_empty() && self.translated.is_empty()
    }
}

/// What the host should surface after draining events.
#[derive(Debug)]
pub enum ReviewNotice {
    View(PairEvent),
    AutoSaved(SnapshotOutcome),
    AutoSaveFailed(String),
}

pub struct ReviewWorkspace {
    config: ReviewConfig,
    session: Session,
    pair: ViewportPair,
    original_dir: Option<PathBuf>,
    translated_dir: Option<PathBuf>,
    annotation_dir: Option<PathBuf>,
    stash: HashMap<String, StashedAnnotations>,
    /// Filename whose images currently sit in the viewports.
    loaded: Option<String>,
}

impl ReviewWorkspace {
    pub fn new(config: ReviewConfig) -> Result<Self> {
        config.validate()?;
        let settings = config.viewport_settings();
        Ok(Self {
            config,
            session: Session::default(),
            pair: ViewportPair::new(ScrollArea::default(), ScrollArea::default(), settings),
            original_dir: None,
            translated_dir: None,
            annotation_dir: None,
            stash: HashMap::new(),
            loaded: None,
        })
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Swap in a new config without touching the session. Flags, stashed
    /// annotations and the annotation folder carry over; the viewports are
    /// rebuilt with the new settings and the loaded pair is reloaded.
    pub fn set_config(&mut self, config: ReviewConfig) -> Result<()> {
        config.validate()?;
        self.stash_loaded();
        let mut pair = ViewportPair::new(
            self.pair.viewport(Side::Original).scroll_area(),
            self.pair.viewport(Side::Translated).scroll_area(),
            config.viewport_settings(),
        );
        pair.set_linked(self.pair.is_linked());
        self.pair = pair;
        self.config = config;
        if self.loaded.take().is_some() {
            self.load_current()?;
            self.pair.take_events();
        }
        info!("Config applied");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn pair(&self) -> &ViewportPair {
        &self.pair
    }

    pub fn pair_mut(&mut self) -> &mut ViewportPair {
        &mut self.pair
    }

    pub fn original_dir(&self) -> Option<&Path> {
        self.original_dir.as_deref()
    }

    pub fn translated_dir(&self) -> Option<&Path> {
        self.translated_dir.as_deref()
    }

    pub fn loaded_filename(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    // ------------------------------------------------------------------
    // Folders and navigation
    // ------------------------------------------------------------------

    /// Discover pairs and replace the session wholesale. Nothing is loaded
    /// yet; call [`Self::load_current`].
    pub fn open_folders(&mut self, original: &Path, translated: &Path) -> Result<Discovery> {
        let discovery = discover_pairs(original, translated, self.config.discovery.require_equal_dimensions)?;
        self.session = Session::new(discovery.pairs.clone());
        self.original_dir = Some(original.to_path_buf());
        self.translated_dir = Some(translated.to_path_buf());
        self.stash.clear();
        self.loaded = None;
        self.pair.clear();
        self.pair.take_events();
        Ok(discovery)
    }

    /// Replace the session with an explicit pair list.
    pub fn set_pairs(&mut self, pairs: Vec<ImagePair>) {
        self.session = Session::new(pairs);
        self.stash.clear();
        self.loaded = None;
        self.pair.clear();
        self.pair.take_events();
    }

    /// Load the session's current pair into the viewports, restoring any
    /// stashed annotations. On failure both viewports are cleared and the
    /// session index stays on the failed pair.
    pub fn load_current(&mut self) -> Result<()> {
        self.stash_loaded();
        let pair = self.session.current().cloned().ok_or(TwinviewError::NoCurrentPair)?;

        let (original, translated) = rayon::join(
            || load_rgba(&pair.original_path),
            || load_rgba(&pair.translated_path),
        );
        let (original, translated) = match (original, translated) {
            (Ok(o), Ok(t)) => (o, t),
            (Err(e), _) | (_, Err(e)) => {
                warn!(filename = %pair.filename, error = %e, "Failed to load pair");
                self.pair.clear();
                self.loaded = None;
                return Err(e);
            }
        };

        self.pair.load(original, translated);
        if let Some(stashed) = self.stash.get(&pair.filename) {
            self.pair
                .viewport_mut(Side::Original)
                .restore_annotations(stashed.original.clone());
            self.pair
                .viewport_mut(Side::Translated)
                .restore_annotations(stashed.translated.clone());
        }
        info!(filename = %pair.filename, "Loaded pair");
        self.loaded = Some(pair.filename);
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.session.select(index)?;
        self.load_current()
    }

    /// Returns false at the end of the list.
    pub fn next(&mut self) -> Result<bool> {
        if self.session.next().is_none() {
            return Ok(false);
        }
        self.load_current().map(|_| true)
    }

    pub fn prev(&mut self) -> Result<bool> {
        if self.session.prev().is_none() {
            return Ok(false);
        }
        self.load_current().map(|_| true)
    }

    pub fn set_needs_fix(&mut self, flagged: bool) -> Result<()> {
        let filename = self
            .session
            .current()
            .map(|p| p.filename.clone())
            .ok_or(TwinviewError::NoCurrentPair)?;
        self.session.set_needs_fix(&filename, flagged);
        Ok(())
    }

    pub fn current_needs_fix(&self) -> bool {
        self.session
            .current()
            .is_some_and(|p| self.session.is_flagged(&p.filename))
    }

    /// Stashed annotations of a pair that is not currently loaded.
    pub fn stashed(&self, filename: &str) -> Option<&StashedAnnotations> {
        self.stash.get(filename)
    }

    fn stash_loaded(&mut self) {
        let Some(filename) = self.loaded.clone() else {
            return;
        };
        let entry = StashedAnnotations {
            original: self.pair.viewport(Side::Original).annotations().to_vec(),
            translated: self.pair.viewport(Side::Translated).annotations().to_vec(),
        };
        if entry.is_empty() {
            self.stash.remove(&filename);
        } else {
            self.stash.insert(filename, entry);
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    pub fn set_annotation_dir(&mut self, dir: Option<PathBuf>) {
        self.annotation_dir = dir;
    }

    /// Explicit annotation folder, or `<parent of original>/<annotation_dir_name>`.
    pub fn annotation_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.annotation_dir {
            return Some(dir.clone());
        }
        let original = self.original_dir.as_ref()?;
        let parent = original.parent().unwrap_or(original);
        Some(parent.join(&self.config.export.annotation_dir_name))
    }

    /// Render the annotated sides of the current pair into the annotation folder.
    pub fn save_current_annotations(&self, text: Option<&str>) -> Result<SnapshotOutcome> {
        let filename = self.loaded.clone().ok_or(TwinviewError::NoCurrentPair)?;
        let render = |side: Side| {
            let viewport = self.pair.viewport(side);
            if viewport.annotations().is_empty() {
                None
            } else {
                viewport.render_to_image()
            }
        };
        let original = render(Side::Original);
        let translated = render(Side::Translated);
        if original.is_none() && translated.is_none() {
            return Ok(SnapshotOutcome::NothingToSave);
        }

        let dir = self.annotation_dir().ok_or(TwinviewError::NoCurrentPair)?;
        save_snapshot(
            &dir,
            &filename,
            original.as_ref(),
            translated.as_ref(),
            text,
            &timestamp_now(),
            self.config.export.jpeg_quality,
        )
    }

    /// Drain viewport notifications and run autosave for new annotations.
    pub fn process_events(&mut self) -> Vec<ReviewNotice> {
        let mut notices = Vec::new();
        for event in self.pair.take_events() {
            let autosave_text = match &event.event {
                ViewportEvent::AnnotationAdded { text, .. } if self.config.annotation.autosave => Some(text.clone()),
                _ => None,
            };
            notices.push(ReviewNotice::View(event));
            if let Some(text) = autosave_text {
                match self.save_current_annotations(Some(&text)) {
                    Ok(outcome) => notices.push(ReviewNotice::AutoSaved(outcome)),
                    Err(e) => {
                        warn!(error = %e, "Autosave failed");
                        notices.push(ReviewNotice::AutoSaveFailed(e.to_string()));
                    }
                }
            }
        }
        notices
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Export the translated side of the loaded pair, annotations included,
    /// as `reviewed_<filename>` in `dir`. An existing file is left alone
    /// unless `overwrite` is set.
    pub fn export_current(&self, dir: &Path, overwrite: bool) -> Result<CurrentExport> {
        let filename = self.loaded.as_deref().ok_or(TwinviewError::NoCurrentPair)?;
        let image = self
            .pair
            .viewport(Side::Translated)
            .render_to_image()
            .ok_or(TwinviewError::NoCurrentPair)?;
        let outcome = export_reviewed(dir, filename, &image, overwrite, self.config.export.jpeg_quality)?;
        if let CurrentExport::Saved(path) = &outcome {
            info!(path = %path.display(), "Exported reviewed image");
        }
        Ok(outcome)
    }

    /// Load, render and write every pair into `root`. Only failing to create
    /// the destination folders is fatal. The previously selected pair is
    /// reloaded afterwards.
    pub fn export_all(&mut self, root: &Path, mut progress: impl FnMut(usize, usize)) -> Result<ExportReport> {
        let layout = ExportLayout::prepare(root, &self.config.export.needs_fix_dir, &self.config.export.approved_dir)?;
        let previous = self.session.current_index();
        let total = self.session.len();
        let quality = self.config.export.jpeg_quality;
        let mut report = ExportReport::default();

        for index in 0..total {
            self.session.select(index)?;
            let filename = self.session.pairs()[index].filename.clone();
            let flagged = self.session.is_flagged(&filename);

            if let Err(e) = self.load_current() {
                if flagged {
                    report.needs_fix += 1;
                } else {
                    report.approved += 1;
                }
                for side in Side::ALL {
                    report.record_failure(&filename, side, e.to_string());
                }
            } else {
                let original = self.pair.viewport(Side::Original).render_to_image();
                let translated = self.pair.viewport(Side::Translated).render_to_image();
                export_pair(
                    &layout,
                    &filename,
                    flagged,
                    original.as_ref(),
                    translated.as_ref(),
                    quality,
                    &mut report,
                );
            }
            progress(index + 1, total);
        }
        self.pair.take_events();

        if let Some(index) = previous {
            self.session.select(index)?;
            if let Err(e) = self.load_current() {
                warn!(error = %e, "Could not reload the previously selected pair");
            }
            self.pair.take_events();
        }

        info!(
            exported = report.exported,
            failures = report.failures.len(),
            needs_fix = report.needs_fix,
            approved = report.approved,
            "Export finished"
        );
        Ok(report)
    }
}
