mod common;

use std::fs;
use std::path::Path;

use twinview_core::config::ReviewConfig;
use twinview_core::error::TwinviewError;
use twinview_core::export::{export_pair, ExportLayout, ExportReport};
use twinview_core::geometry::{ImageRect, Point};
use twinview_core::io::image_io::{load_rgba, save_raster};
use twinview_core::pair::Side;
use twinview_core::workspace::ReviewWorkspace;

use common::{gradient_image, write_png};

fn folders(names: &[&str]) -> (tempfile::TempDir, tempfile::TempDir) {
    let orig = tempfile::tempdir().unwrap();
    let trans = tempfile::tempdir().unwrap();
    for name in names {
        write_png(&orig.path().join(name), 32, 24);
        write_png(&trans.path().join(name), 32, 24);
    }
    (orig, trans)
}

fn workspace(orig: &Path, trans: &Path) -> ReviewWorkspace {
    let mut config = ReviewConfig::default();
    config.annotation.autosave = false;
    let mut ws = ReviewWorkspace::new(config).unwrap();
    ws.open_folders(orig, trans).unwrap();
    ws.load_current().unwrap();
    ws
}

#[test]
fn test_export_routes_by_flag() {
    let (orig, trans) = folders(&["one.png", "two.png"]);
    let dest = tempfile::tempdir().unwrap();
    let mut ws = workspace(orig.path(), trans.path());
    ws.session_mut().set_needs_fix("one.png", true);

    let report = ws.export_all(dest.path(), |_, _| {}).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.exported, 2);
    assert_eq!(report.needs_fix, 1);
    assert_eq!(report.approved, 1);

    let needs_fix = dest.path().join("needs-fix");
    let approved = dest.path().join("approved");
    assert!(needs_fix.join("orig_one.png").is_file());
    assert!(needs_fix.join("one.png").is_file());
    assert!(approved.join("orig_two.png").is_file());
    assert!(approved.join("two.png").is_file());
    assert!(!approved.join("one.png").exists());
    assert!(!needs_fix.join("two.png").exists());
}

#[test]
fn test_export_restores_current_index_and_reports_progress() {
    let (orig, trans) = folders(&["a.png", "b.png", "c.png"]);
    let dest = tempfile::tempdir().unwrap();
    let mut ws = workspace(orig.path(), trans.path());
    ws.select(1).unwrap();

    let mut ticks = Vec::new();
    ws.export_all(dest.path(), |done, total| ticks.push((done, total))).unwrap();

    assert_eq!(ticks, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(ws.session().current_index(), Some(1));
    assert_eq!(ws.loaded_filename(), Some("b.png"));
}

#[test]
fn test_export_includes_annotations_at_native_resolution() {
    let (orig, trans) = folders(&["a.png", "b.png"]);
    let dest = tempfile::tempdir().unwrap();
    let mut ws = workspace(orig.path(), trans.path());

    let pair = ws.pair_mut();
    pair.zoom_at_cursor(Side::Translated, 2.0, Point::ZERO);
    pair.begin_annotation(Side::Translated, Point::new(4.0, 4.0));
    let mut prompt = |_: &ImageRect| Some("fix".to_string());
    pair.commit_annotation(Side::Translated, Point::new(40.0, 40.0), &mut prompt);
    let expected = pair.viewport(Side::Translated).render_to_image().unwrap();

    // Move away so the annotation only lives in the stash.
    ws.next().unwrap();
    ws.export_all(dest.path(), |_, _| {}).unwrap();

    let written = load_rgba(&dest.path().join("approved").join("a.png")).unwrap();
    assert_eq!(written.dimensions(), (32, 24));
    assert_eq!(written, expected);

    let untouched = load_rgba(&dest.path().join("approved").join("orig_a.png")).unwrap();
    assert_eq!(untouched, load_rgba(&orig.path().join("a.png")).unwrap());
}

#[test]
fn test_per_pair_failure_does_not_stop_batch() {
    let (orig, trans) = folders(&["a.png", "c.png"]);
    fs::write(orig.path().join("b.png"), b"garbage").unwrap();
    fs::write(trans.path().join("b.png"), b"garbage").unwrap();

    let mut config = ReviewConfig::default();
    config.discovery.require_equal_dimensions = false;
    let mut ws = ReviewWorkspace::new(config).unwrap();
    ws.open_folders(orig.path(), trans.path()).unwrap();
    assert_eq!(ws.session().len(), 3);

    let dest = tempfile::tempdir().unwrap();
    let report = ws.export_all(dest.path(), |_, _| {}).unwrap();
    assert_eq!(report.exported, 2);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|f| f.filename == "b.png"));
    assert!(dest.path().join("approved").join("c.png").is_file());
}

#[test]
fn test_folder_creation_failure_is_fatal() {
    let (orig, trans) = folders(&["a.png"]);
    let blocker = tempfile::tempdir().unwrap();
    let root = blocker.path().join("file-not-dir");
    fs::write(&root, b"x").unwrap();

    let mut ws = workspace(orig.path(), trans.path());
    let err = ws.export_all(&root, |_, _| {}).unwrap_err();
    assert!(matches!(err, TwinviewError::ExportFolder { .. }));
}

#[test]
fn test_export_pair_records_missing_side() {
    let dest = tempfile::tempdir().unwrap();
    let layout = ExportLayout::prepare(dest.path(), "needs-fix", "approved").unwrap();
    let img = gradient_image(4, 4);
    let mut report = ExportReport::default();

    export_pair(&layout, "x.png", true, Some(&img), None, 90, &mut report);
    assert_eq!(report.exported, 0);
    assert_eq!(report.needs_fix, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].side, Side::Translated);
    assert!(layout.needs_fix.join("orig_x.png").is_file());
}

#[test]
fn test_unsupported_extension_reported() {
    let dest = tempfile::tempdir().unwrap();
    let err = save_raster(&gradient_image(2, 2), &dest.path().join("x.tiff"), 90).unwrap_err();
    assert!(matches!(err, TwinviewError::UnsupportedFormat(_)));
}

#[test]
fn test_jpeg_and_bmp_are_flattened() {
    let dest = tempfile::tempdir().unwrap();
    let transparent = common::solid_image(4, 4, [0, 0, 0, 0]);
    for name in ["x.jpg", "x.bmp"] {
        let path = dest.path().join(name);
        save_raster(&transparent, &path, 90).unwrap();
        let back = load_rgba(&path).unwrap();
        let px = back.get_pixel(1, 1).0;
        assert!(px[0] > 240 && px[1] > 240 && px[2] > 240, "{name} not flattened: {px:?}");
        assert_eq!(px[3], 255);
    }
}
