use super::*;
use serde_json::json;

#[test]
fn default_state_has_three_tagged_formats() {
    let state = AppState::default();
    assert_eq!(state.active_aspect_ratio, AspectRatio::Square);
    for ratio in AspectRatio::ALL {
        let f = state.format(ratio);
        assert_eq!(f.aspect_ratio, ratio);
        assert!(f.background_media.is_none());
        assert_eq!(f.flyer_content, FlyerContent::default());
        assert_eq!(f.flyer_design, FlyerDesign::default());
    }
    assert!(state.is_consistent());
}

#[test]
fn persisted_shape_uses_camel_case_and_ratio_keys() {
    let mut state = AppState::default();
    state.apply_shared(|cur| SharedUpdate {
        background: Some(Some(BackgroundMedia::keyed("bg-media-1"))),
        ..SharedUpdate::from_state(cur)
    });

    let v = serde_json::to_value(&state).unwrap();
    assert_eq!(v["activeAspectRatio"], json!("1:1"));
    let sq = &v["flyerStates"]["1:1"];
    assert_eq!(sq["aspectRatio"], json!("1:1"));
    assert_eq!(sq["flyerContent"]["callToAction"], json!("GET MY FREE AUDIT"));
    assert_eq!(sq["flyerDesign"]["layoutStyle"], json!("headline-focus"));
    assert_eq!(sq["flyerDesign"]["ctaAnimation"], json!("pulse"));
    assert_eq!(sq["flyerDesign"]["colorPalette"]["overlayOpacity"], json!(0.8));
    assert_eq!(
        sq["backgroundMedia"],
        json!({"type": "image", "idbKey": "bg-media-1"})
    );
    assert!(v["flyerStates"]["9:16"].is_object());
    assert!(v["flyerStates"]["16:9"].is_object());
}

#[test]
fn null_background_serializes_as_null() {
    let v = serde_json::to_value(AppState::default()).unwrap();
    assert!(v["flyerStates"]["16:9"]["backgroundMedia"].is_null());
}

#[test]
fn font_names_use_display_spelling() {
    let pairing = FontPairing {
        headline_font: HeadlineFont::PlayfairDisplay,
        body_font: BodyFont::RobotoSlab,
    };
    let v = serde_json::to_value(pairing).unwrap();
    assert_eq!(
        v,
        json!({"headlineFont": "Playfair Display", "bodyFont": "Roboto Slab"})
    );
    assert_eq!(
        "playfair display".parse::<HeadlineFont>().unwrap(),
        HeadlineFont::PlayfairDisplay
    );
}

#[test]
fn apply_shared_writes_every_slot_from_the_active_one() {
    let mut state = AppState {
        active_aspect_ratio: AspectRatio::Landscape,
        ..AppState::default()
    };
    state.apply_shared(|cur| {
        let mut next = SharedUpdate::from_state(cur);
        next.flyer_content.headline = "NEW".to_string();
        next
    });
    for f in state.flyer_states.iter() {
        assert_eq!(f.flyer_content.headline, "NEW");
    }
    assert!(state.is_consistent());
}

#[test]
fn background_is_untouched_unless_provided() {
    let mut state = AppState::default();
    state.apply_shared(|cur| SharedUpdate {
        background: Some(Some(BackgroundMedia::inline("data:image/png;base64,AA=="))),
        ..SharedUpdate::from_state(cur)
    });
    state.apply_shared(SharedUpdate::from_state);
    for f in state.flyer_states.iter() {
        assert_eq!(
            f.background_media.as_ref().and_then(|b| b.url()),
            Some("data:image/png;base64,AA==")
        );
    }
}

#[test]
fn palette_edits_preserve_siblings() {
    let mut design = FlyerDesign::default();
    design
        .apply_palette(PaletteEdit::Color(ColorSlot::Accent, "#123456".to_string()))
        .unwrap();
    assert_eq!(design.color_palette.accent, "#123456");
    assert_eq!(design.color_palette.primary, "#FFD700");

    design.apply_palette(PaletteEdit::OverlayOpacity(1.5)).unwrap();
    assert_eq!(design.color_palette.overlay_opacity, 1.5);
    assert!(design.apply_palette(PaletteEdit::OverlayOpacity(f64::NAN)).is_err());
    assert_eq!(design.color_palette.overlay_opacity, 1.5);
}

#[test]
fn font_and_design_edits_touch_one_field() {
    let mut design = FlyerDesign::default();
    design.apply_font(FontEdit::Body(BodyFont::Lato));
    assert_eq!(design.font_pairing.body_font, BodyFont::Lato);
    assert_eq!(design.font_pairing.headline_font, HeadlineFont::Poppins);

    design.apply(DesignEdit::BadgeText(None));
    design.apply(DesignEdit::LayoutStyle(LayoutStyle::ImageDominantCtaBar));
    assert_eq!(design.badge_text, None);
    assert_eq!(design.layout_style, LayoutStyle::ImageDominantCtaBar);
    assert_eq!(design.cta_animation, CtaAnimation::Pulse);
}

#[test]
fn background_helpers_track_residency() {
    let keyed = BackgroundMedia::keyed("k");
    assert!(keyed.needs_reattach());
    let resolved = keyed.with_url("data:x;base64,");
    assert!(!resolved.needs_reattach());
    assert_eq!(resolved.blob_key(), Some("k"));
    assert_eq!(resolved.url(), Some("data:x;base64,"));
}

#[test]
fn enum_names_parse_case_insensitively() {
    assert_eq!("CALLTOACTION".parse::<ContentField>().unwrap(), ContentField::CallToAction);
    assert_eq!("overlayColor".parse::<ColorSlot>().unwrap(), ColorSlot::OverlayColor);
    assert_eq!(
        "urgent-offer-overlay".parse::<LayoutStyle>().unwrap(),
        LayoutStyle::UrgentOfferOverlay
    );
    assert_eq!("none".parse::<CtaAnimation>().unwrap(), CtaAnimation::Static);
    assert!("comic sans".parse::<BodyFont>().is_err());
    assert_eq!(LayoutStyle::ImageDominantCtaBar.to_string(), "image-dominant-cta-bar");
}
