mod common;

use std::fs;
use std::path::Path;

use twinview_core::config::ReviewConfig;
use twinview_core::error::TwinviewError;
use twinview_core::export::CurrentExport;
use twinview_core::geometry::{ImageRect, Point};
use twinview_core::pair::Side;
use twinview_core::snapshot::SnapshotOutcome;
use twinview_core::viewport::ViewportEvent;
use twinview_core::workspace::{ReviewNotice, ReviewWorkspace};

use common::write_png;

struct Fixture {
    root: tempfile::TempDir,
}

impl Fixture {
    fn new(names: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("orig")).unwrap();
        fs::create_dir(root.path().join("trans")).unwrap();
        for name in names {
            write_png(&root.path().join("orig").join(name), 40, 30);
            write_png(&root.path().join("trans").join(name), 40, 30);
        }
        Self { root }
    }

    fn orig(&self) -> std::path::PathBuf {
        self.root.path().join("orig")
    }

    fn trans(&self) -> std::path::PathBuf {
        self.root.path().join("trans")
    }

    fn workspace(&self, autosave: bool) -> ReviewWorkspace {
        let mut config = ReviewConfig::default();
        config.annotation.autosave = autosave;
        let mut ws = ReviewWorkspace::new(config).unwrap();
        ws.open_folders(&self.orig(), &self.trans()).unwrap();
        ws.load_current().unwrap();
        ws.pair_mut().take_events();
        ws
    }
}

fn annotate(ws: &mut ReviewWorkspace, side: Side, text: &str) {
    let pair = ws.pair_mut();
    assert!(pair.begin_annotation(side, Point::new(5.0, 5.0)));
    let text = text.to_string();
    let mut prompt = move |_: &ImageRect| Some(text.clone());
    pair.commit_annotation(side, Point::new(30.0, 25.0), &mut prompt);
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_navigation_loads_pairs_in_order() {
    let fx = Fixture::new(&["a.png", "b.png", "c.png"]);
    let mut ws = fx.workspace(false);
    assert_eq!(ws.loaded_filename(), Some("a.png"));
    assert!(ws.next().unwrap());
    assert!(ws.next().unwrap());
    assert_eq!(ws.loaded_filename(), Some("c.png"));
    assert!(!ws.next().unwrap());
    assert!(ws.prev().unwrap());
    assert_eq!(ws.loaded_filename(), Some("b.png"));
    assert!(ws.pair().viewport(Side::Original).has_image());
}

#[test]
fn test_annotations_survive_navigation() {
    let fx = Fixture::new(&["a.png", "b.png"]);
    let mut ws = fx.workspace(false);
    annotate(&mut ws, Side::Translated, "kept");

    ws.next().unwrap();
    assert!(ws.pair().viewport(Side::Translated).annotations().is_empty());
    assert_eq!(ws.stashed("a.png").map(|s| s.translated.len()), Some(1));

    ws.prev().unwrap();
    let restored = ws.pair().viewport(Side::Translated).annotations();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].text, "kept");
}

#[test]
fn test_load_failure_clears_and_keeps_index() {
    let fx = Fixture::new(&["a.png", "c.png"]);
    fs::write(fx.orig().join("b.png"), b"broken").unwrap();
    write_png(&fx.trans().join("b.png"), 40, 30);

    let mut config = ReviewConfig::default();
    config.discovery.require_equal_dimensions = false;
    let mut ws = ReviewWorkspace::new(config).unwrap();
    ws.open_folders(&fx.orig(), &fx.trans()).unwrap();
    ws.load_current().unwrap();

    let err = ws.next().unwrap_err();
    assert!(matches!(err, TwinviewError::LoadFailed { .. }));
    assert_eq!(ws.session().current_index(), Some(1));
    assert!(!ws.pair().viewport(Side::Original).has_image());
    assert!(!ws.pair().viewport(Side::Translated).has_image());
    assert!(ws.loaded_filename().is_none());

    assert!(ws.next().unwrap());
    assert_eq!(ws.loaded_filename(), Some("c.png"));
}

#[test]
fn test_needs_fix_flag_follows_current_pair() {
    let fx = Fixture::new(&["a.png", "b.png"]);
    let mut ws = fx.workspace(false);
    ws.set_needs_fix(true).unwrap();
    assert!(ws.current_needs_fix());
    ws.next().unwrap();
    assert!(!ws.current_needs_fix());
    assert!(ws.session().is_flagged("a.png"));
}

#[test]
fn test_nothing_to_save_without_annotations() {
    let fx = Fixture::new(&["a.png"]);
    let ws = fx.workspace(false);
    assert_eq!(ws.save_current_annotations(None).unwrap(), SnapshotOutcome::NothingToSave);
    assert!(!fx.root.path().join("annotations").exists());
}

#[test]
fn test_snapshot_defaults_next_to_original_folder() {
    let fx = Fixture::new(&["page.png"]);
    let mut ws = fx.workspace(false);
    annotate(&mut ws, Side::Original, "typo");
    annotate(&mut ws, Side::Translated, "typo");

    let outcome = ws.save_current_annotations(Some("bad kerning")).unwrap();
    let SnapshotOutcome::Saved { paths } = outcome else {
        panic!("expected saved snapshot");
    };
    assert_eq!(paths.len(), 2);

    let dir = fx.root.path().join("annotations");
    let names = files_in(&dir);
    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("orig_page_annotated_bad_kerning_"));
    assert!(names[1].starts_with("page_annotated_bad_kerning_"));
    assert!(names.iter().all(|n| n.ends_with(".png")));
}

#[test]
fn test_snapshot_only_annotated_side() {
    let fx = Fixture::new(&["page.png"]);
    let snapshots = tempfile::tempdir().unwrap();
    let mut ws = fx.workspace(false);
    ws.set_annotation_dir(Some(snapshots.path().to_path_buf()));
    annotate(&mut ws, Side::Translated, "x");

    ws.save_current_annotations(None).unwrap();
    let names = files_in(snapshots.path());
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("page_annotated_"));
}

#[test]
fn test_autosave_on_annotation_added() {
    let fx = Fixture::new(&["page.png"]);
    let mut ws = fx.workspace(true);
    annotate(&mut ws, Side::Translated, "auto");

    let notices = ws.process_events();
    assert!(notices.iter().any(|n| matches!(
        n,
        ReviewNotice::View(e) if matches!(e.event, ViewportEvent::AnnotationAdded { .. })
    )));
    assert!(notices
        .iter()
        .any(|n| matches!(n, ReviewNotice::AutoSaved(SnapshotOutcome::Saved { .. }))));
    assert_eq!(files_in(&fx.root.path().join("annotations")).len(), 1);
}

#[test]
fn test_autosave_disabled() {
    let fx = Fixture::new(&["page.png"]);
    let mut ws = fx.workspace(false);
    annotate(&mut ws, Side::Translated, "manual");
    let notices = ws.process_events();
    assert_eq!(notices.len(), 1);
    assert!(!fx.root.path().join("annotations").exists());
}

#[test]
fn test_reopening_folders_replaces_session() {
    let fx = Fixture::new(&["a.png", "b.png"]);
    let mut ws = fx.workspace(false);
    annotate(&mut ws, Side::Original, "gone");
    ws.set_needs_fix(true).unwrap();

    ws.open_folders(&fx.orig(), &fx.trans()).unwrap();
    assert_eq!(ws.session().flagged_count(), 0);
    assert!(ws.loaded_filename().is_none());
    ws.load_current().unwrap();
    assert!(ws.pair().viewport(Side::Original).annotations().is_empty());
}

#[test]
fn test_select_out_of_range() {
    let fx = Fixture::new(&["a.png"]);
    let mut ws = fx.workspace(false);
    assert!(matches!(
        ws.select(5),
        Err(TwinviewError::PairIndexOutOfRange { index: 5, total: 1 })
    ));
    assert_eq!(ws.loaded_filename(), Some("a.png"));
}

#[test]
fn test_config_change_keeps_review_state() {
    let fx = Fixture::new(&["a.png", "b.png"]);
    let snapshots = tempfile::tempdir().unwrap();
    let mut ws = fx.workspace(false);
    ws.set_annotation_dir(Some(snapshots.path().to_path_buf()));
    ws.next().unwrap();
    ws.set_needs_fix(true).unwrap();
    annotate(&mut ws, Side::Translated, "still here");
    ws.pair_mut().set_linked(false);

    let mut config = ReviewConfig::default();
    config.zoom.max_scale = 4.0;
    ws.set_config(config).unwrap();

    assert_eq!(ws.config().zoom.max_scale, 4.0);
    assert_eq!(ws.pair().viewport(Side::Original).limits().max, 4.0);
    assert!(!ws.pair().is_linked());
    assert_eq!(ws.loaded_filename(), Some("b.png"));
    assert!(ws.session().is_flagged("b.png"));
    assert_eq!(ws.session().flagged_count(), 1);
    let kept = ws.pair().viewport(Side::Translated).annotations();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text, "still here");
    assert_eq!(ws.annotation_dir().as_deref(), Some(snapshots.path()));
}

#[test]
fn test_invalid_config_is_rejected_without_changes() {
    let fx = Fixture::new(&["a.png"]);
    let mut ws = fx.workspace(false);
    annotate(&mut ws, Side::Original, "kept");

    let mut config = ReviewConfig::default();
    config.zoom.min_scale = 0.0;
    assert!(ws.set_config(config).is_err());
    assert_eq!(ws.config(), &ReviewConfig::default());
    assert_eq!(ws.pair().viewport(Side::Original).annotations().len(), 1);
}

#[test]
fn test_export_current_writes_reviewed_image() {
    let fx = Fixture::new(&["page.png"]);
    let out = tempfile::tempdir().unwrap();
    let mut ws = fx.workspace(false);
    annotate(&mut ws, Side::Translated, "fix");

    let dest = out.path().join("reviewed");
    let outcome = ws.export_current(&dest, false).unwrap();
    let expected = dest.join("reviewed_page.png");
    assert_eq!(outcome, CurrentExport::Saved(expected.clone()));

    let written = image::open(&expected).unwrap().to_rgba8();
    let rendered = ws.pair().viewport(Side::Translated).render_to_image().unwrap();
    assert_eq!(written, rendered);
}

#[test]
fn test_export_current_asks_before_overwrite() {
    let fx = Fixture::new(&["page.png"]);
    let out = tempfile::tempdir().unwrap();
    let ws = fx.workspace(false);
    let target = out.path().join("reviewed_page.png");
    fs::write(&target, b"keep me").unwrap();

    let outcome = ws.export_current(out.path(), false).unwrap();
    assert_eq!(outcome, CurrentExport::AlreadyExists(target.clone()));
    assert_eq!(fs::read(&target).unwrap(), b"keep me");

    let outcome = ws.export_current(out.path(), true).unwrap();
    assert_eq!(outcome, CurrentExport::Saved(target.clone()));
    assert!(image::open(&target).is_ok());
}

#[test]
fn test_export_current_without_pair() {
    let out = tempfile::tempdir().unwrap();
    let ws = ReviewWorkspace::new(ReviewConfig::default()).unwrap();
    assert!(matches!(
        ws.export_current(out.path(), false),
        Err(TwinviewError::NoCurrentPair)
    ));
}
