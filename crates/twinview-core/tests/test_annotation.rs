mod common;

use image::Rgba;

use twinview_core::annotation::CommitOutcome;
use twinview_core::geometry::{ImageRect, Point};
use twinview_core::render::{compose, OverlayStyle, QualityMode};
use twinview_core::viewport::ViewportEvent;

use common::{draw, gradient_image, loaded_viewport};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

#[test]
fn test_threshold_exactly_five_is_discarded() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));
    let revision = vp.revision();

    assert_eq!(draw(&mut vp, (10.0, 10.0), (15.0, 40.0), "narrow"), CommitOutcome::TooSmall);
    assert_eq!(draw(&mut vp, (10.0, 10.0), (40.0, 15.0), "flat"), CommitOutcome::TooSmall);
    assert_eq!(draw(&mut vp, (10.0, 10.0), (15.0, 15.0), "tiny"), CommitOutcome::TooSmall);

    assert!(vp.annotations().is_empty());
    assert_eq!(vp.revision(), revision);
    assert!(vp.take_events().is_empty());
}

#[test]
fn test_threshold_six_is_recorded() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));
    assert_eq!(
        draw(&mut vp, (10.0, 10.0), (16.0, 16.0), "ok"),
        CommitOutcome::Added { index: 0 }
    );
    assert_eq!(vp.annotations().len(), 1);
    assert_eq!(
        vp.take_events(),
        vec![ViewportEvent::AnnotationAdded {
            index: 0,
            text: "ok".into()
        }]
    );
}

#[test]
fn test_threshold_in_image_space_when_zoomed() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));
    vp.zoom_at_cursor(4.0, Point::ZERO);
    // 20 screen px at scale 4 is 5 image px.
    assert_eq!(draw(&mut vp, (0.0, 0.0), (20.0, 40.0), "x"), CommitOutcome::TooSmall);
    assert_eq!(
        draw(&mut vp, (0.0, 0.0), (24.0, 40.0), "x"),
        CommitOutcome::Added { index: 0 }
    );
    let rect = vp.annotations()[0].rect;
    assert_eq!(rect, ImageRect::from_corners(Point::new(0.0, 0.0), Point::new(6.0, 10.0)));
}

#[test]
fn test_declined_or_empty_text_discards_draft() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));

    assert!(vp.begin_annotation(Point::new(10.0, 10.0)));
    let mut decline = |_: &ImageRect| -> Option<String> { None };
    assert_eq!(vp.commit_annotation(Point::new(50.0, 50.0), &mut decline), CommitOutcome::Declined);

    assert!(vp.begin_annotation(Point::new(10.0, 10.0)));
    let mut blank = |_: &ImageRect| Some("   ".to_string());
    assert_eq!(vp.commit_annotation(Point::new(50.0, 50.0), &mut blank), CommitOutcome::Declined);

    assert!(vp.annotations().is_empty());
    assert!(vp.draft_rect().is_none());
}

#[test]
fn test_prompt_not_called_for_small_drag() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));
    let mut calls = 0;
    let mut prompt = |_: &ImageRect| {
        calls += 1;
        Some("never".to_string())
    };
    vp.begin_annotation(Point::new(10.0, 10.0));
    assert_eq!(vp.commit_annotation(Point::new(12.0, 12.0), &mut prompt), CommitOutcome::TooSmall);
    assert_eq!(calls, 0);
}

#[test]
fn test_commit_without_drag() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));
    let mut prompt = |_: &ImageRect| Some("x".to_string());
    assert_eq!(vp.commit_annotation(Point::new(50.0, 50.0), &mut prompt), CommitOutcome::NotDrawing);
}

#[test]
fn test_undo_on_empty_layer() {
    let mut vp = loaded_viewport(64, 64, (100.0, 100.0));
    let before = vp.composed().cloned();
    let revision = vp.revision();

    assert!(!vp.undo_last_annotation());
    assert_eq!(vp.composed().cloned(), before);
    assert_eq!(vp.revision(), revision);
    assert!(vp.take_events().is_empty());
}

#[test]
fn test_commits_then_undos_restore_base_exactly() {
    let base = gradient_image(120, 90);
    let mut vp = common::viewport((300.0, 300.0));
    vp.load_image(base.clone());

    let rects = [
        ((5.0, 30.0), (60.0, 80.0)),
        ((40.0, 40.0), (110.0, 70.0)),
        ((0.0, 0.0), (119.0, 89.0)),
        ((70.2, 25.7), (90.9, 60.3)),
    ];
    for (i, (from, to)) in rects.iter().enumerate() {
        assert_eq!(draw(&mut vp, *from, *to, &format!("defect {i}")), CommitOutcome::Added { index: i });
    }
    assert_ne!(vp.composed(), Some(&base));

    for _ in 0..rects.len() {
        assert!(vp.undo_last_annotation());
    }
    assert!(!vp.undo_last_annotation());
    assert_eq!(vp.composed(), Some(&base));
    assert_eq!(vp.base(), Some(&base));
}

#[test]
fn test_undo_emits_remaining_count() {
    let mut vp = loaded_viewport(100, 100, (200.0, 200.0));
    draw(&mut vp, (10.0, 10.0), (40.0, 40.0), "a");
    draw(&mut vp, (50.0, 50.0), (90.0, 90.0), "b");
    vp.take_events();

    assert!(vp.undo_last_annotation());
    assert_eq!(vp.take_events(), vec![ViewportEvent::AnnotationUndone { remaining: 1 }]);
    assert_eq!(vp.annotations()[0].text, "a");
}

#[test]
fn test_render_independent_of_zoom_and_pan() {
    let mut vp = loaded_viewport(80, 80, (200.0, 200.0));
    draw(&mut vp, (10.0, 20.0), (50.0, 60.0), "zoom");
    let before = vp.render_to_image();

    vp.zoom_at_cursor(3.0, Point::new(40.0, 40.0));
    vp.pan(Point::new(-25.0, 13.0));
    assert_eq!(vp.render_to_image(), before);
    assert_eq!(vp.composed().cloned(), before);
}

#[test]
fn test_stroke_covers_edges_not_interior() {
    let base = gradient_image(60, 60);
    let rect = ImageRect::from_corners(Point::new(10.0, 30.0), Point::new(40.0, 50.0));
    let annotations = [twinview_core::annotation::Annotation {
        rect,
        text: String::new(),
    }];
    let out = compose(&base, &annotations, &OverlayStyle::default(), QualityMode::HighQuality);

    assert_eq!(*out.get_pixel(10, 40), RED);
    assert_eq!(*out.get_pixel(39, 40), RED);
    assert_eq!(*out.get_pixel(25, 30), RED);
    assert_eq!(*out.get_pixel(25, 40), *base.get_pixel(25, 40));
    assert_eq!(*out.get_pixel(2, 2), *base.get_pixel(2, 2));
}

#[test]
fn test_sharp_mode_has_no_partial_pixels() {
    let base = gradient_image(60, 60);
    let rect = ImageRect::from_corners(Point::new(10.0, 30.0), Point::new(40.0, 50.0));
    let annotations = [twinview_core::annotation::Annotation {
        rect,
        text: String::new(),
    }];
    let style = OverlayStyle::default();

    // Stroke 3 centred on x=10 spans 8.5..11.5; pixel 8 is half covered.
    let smooth = compose(&base, &annotations, &style, QualityMode::HighQuality);
    let edge = *smooth.get_pixel(8, 40);
    assert_ne!(edge, *base.get_pixel(8, 40));
    assert_ne!(edge, RED);

    let sharp = compose(&base, &annotations, &style, QualityMode::Sharp);
    for (x, y, px) in sharp.enumerate_pixels() {
        assert!(*px == RED || *px == *base.get_pixel(x, y), "partial pixel at {x},{y}");
    }
}

#[test]
fn test_label_drawn_above_rectangle() {
    let base = gradient_image(80, 80);
    let rect = ImageRect::from_corners(Point::new(10.0, 40.0), Point::new(60.0, 70.0));
    let annotations = [twinview_core::annotation::Annotation {
        rect,
        text: "A".into(),
    }];
    let out = compose(&base, &annotations, &OverlayStyle::default(), QualityMode::HighQuality);

    // Label box: x from 9, bottom edge 2 px above the stroke top (38).
    let label_red = (21..37)
        .flat_map(|y| (9..25).map(move |x| (x, y)))
        .filter(|&(x, y)| *out.get_pixel(x, y) == RED)
        .count();
    assert!(label_red > 0);

    let gap_red = (37..38)
        .flat_map(|y| (12..60).map(move |x| (x, y)))
        .filter(|&(x, y)| *out.get_pixel(x, y) == RED)
        .count();
    assert_eq!(gap_red, 0);
}

#[test]
fn test_label_clipped_at_image_border() {
    let base = gradient_image(40, 40);
    let rect = ImageRect::from_corners(Point::new(30.0, 2.0), Point::new(39.0, 20.0));
    let annotations = [twinview_core::annotation::Annotation {
        rect,
        text: "long label outside".into(),
    }];
    let out = compose(&base, &annotations, &OverlayStyle::default(), QualityMode::Smooth);
    assert_eq!(out.dimensions(), base.dimensions());
}

#[test]
fn test_quality_mode_never_touches_base() {
    let base = gradient_image(50, 50);
    let mut vp = common::viewport((100.0, 100.0));
    vp.load_image(base.clone());
    for mode in QualityMode::ALL {
        vp.set_quality_mode(*mode);
        assert_eq!(vp.base(), Some(&base));
        assert_eq!(vp.composed(), Some(&base));
    }
}
