use egui_stage::{
    compute_fit, plan_overlay, Metadata, OverlayKind, OverlayStyle, SettingsBreakpoints,
    SettingsFit, StagePlacement, ViewportClass, ViewportState,
};

fn published_metadata(w: f32, h: f32, pixel_ratio: f32) -> Metadata {
    let viewport = ViewportState::new(w, h, pixel_ratio);
    let mut meta = Metadata::new(Some("roundtrip".to_string()));
    meta.apply(
        compute_fit(&SettingsFit::default(), viewport),
        viewport,
        ViewportClass::of(viewport, &SettingsBreakpoints::default()),
    );
    meta.first_frame = false;
    meta
}

#[test]
fn test_serialize_deserialize_metadata() {
    let meta = published_metadata(1024., 768., 1.5);
    let json = serde_json::to_string(&meta).expect("serialize metadata");

    let meta2: Metadata = serde_json::from_str(&json).expect("deserialize metadata");

    assert_eq!(meta2.first_frame, meta.first_frame);
    assert_eq!(meta2.scale, meta.scale);
    assert_eq!(meta2.stage_rect, meta.stage_rect);
    assert_eq!(meta2.banner_top, meta.banner_top);
    assert_eq!(meta2.viewport, meta.viewport);
    assert_eq!(meta2.class, meta.class);
    assert_eq!(meta2.get_key(), meta.get_key());
}

#[test]
fn test_serialize_deserialize_placement() {
    let placement = compute_fit(
        &SettingsFit::default(),
        ViewportState::new(800., 450., 1.),
    );
    let json = serde_json::to_string(&placement).expect("serialize placement");
    let placement2: StagePlacement = serde_json::from_str(&json).expect("deserialize placement");
    assert_eq!(placement2, placement);
}

#[test]
fn test_serialize_deserialize_overlay_style() {
    let meta = published_metadata(300., 900., 1.);
    let style = plan_overlay(OverlayKind::VideoPanel, &meta, None).expect("video style");

    let json = serde_json::to_string(&style).expect("serialize style");
    let style2: OverlayStyle = serde_json::from_str(&json).expect("deserialize style");
    assert_eq!(style2, style);
}

#[test]
fn test_placement_survives_roundtrip_recompute() {
    // Published state deserialized elsewhere must agree with a fresh
    // recompute from the same snapshot.
    let meta = published_metadata(1600., 900., 1.);
    let json = serde_json::to_string(&meta).unwrap();
    let meta2: Metadata = serde_json::from_str(&json).unwrap();

    let fresh = compute_fit(&SettingsFit::default(), meta2.viewport);
    assert_eq!(fresh.scale, meta2.scale);
    assert_eq!(fresh.rect, meta2.stage_rect);
}
