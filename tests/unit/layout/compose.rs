use super::*;
use crate::scene::model::{ColorSlot, DesignEdit, PaletteEdit};

fn tree_for(design: &FlyerDesign, content: &FlyerContent) -> FlyerTree {
    compose(content, design, None, AspectRatio::Square)
}

#[test]
fn headline_focus_has_three_zones_spread_evenly() {
    let tree = tree_for(&FlyerDesign::default(), &FlyerContent::default());
    assert_eq!(tree.content.arrangement, Arrangement::SpaceAround);
    let roles: Vec<_> = tree.content.zones.iter().map(|z| z.role).collect();
    assert_eq!(roles, vec![ZoneRole::Header, ZoneRole::Body, ZoneRole::Footer]);
    assert!(tree.content.element(ElementRole::Badge).is_some());
    assert!(tree.content.element(ElementRole::CallToAction).is_some());
}

#[test]
fn urgent_overlay_pins_header_and_footer() {
    let mut design = FlyerDesign::default();
    design.apply(DesignEdit::LayoutStyle(LayoutStyle::UrgentOfferOverlay));
    let tree = tree_for(&design, &FlyerContent::default());
    assert_eq!(tree.content.arrangement, Arrangement::SpaceBetween);
    assert_eq!(tree.content.zones.len(), 3);
}

#[test]
fn badge_requires_badge_text_and_headline() {
    let design = FlyerDesign::default();
    let mut content = FlyerContent::default();
    content.headline.clear();
    let tree = tree_for(&design, &content);
    assert!(tree.content.element(ElementRole::Badge).is_none());
    assert!(tree.content.element(ElementRole::Hook).is_some());

    let mut design = FlyerDesign::default();
    design.apply(DesignEdit::BadgeText(Some(String::new())));
    let tree = tree_for(&design, &FlyerContent::default());
    assert!(tree.content.element(ElementRole::Badge).is_none());

    design.apply(DesignEdit::BadgeText(None));
    let tree = tree_for(&design, &FlyerContent::default());
    assert!(tree.content.element(ElementRole::Badge).is_none());
}

#[test]
fn footer_is_empty_without_call_to_action() {
    let mut content = FlyerContent::default();
    content.call_to_action.clear();
    let tree = tree_for(&FlyerDesign::default(), &content);
    let footer = tree.content.zone(ZoneRole::Footer).unwrap();
    assert!(footer.elements.is_empty());
}

#[test]
fn image_dominant_uses_a_single_blurred_bar() {
    let mut design = FlyerDesign::default();
    design.apply(DesignEdit::LayoutStyle(LayoutStyle::ImageDominantCtaBar));
    design
        .apply_palette(PaletteEdit::Color(ColorSlot::OverlayColor, "#102030".into()))
        .unwrap();
    let tree = tree_for(&design, &FlyerContent::default());

    assert_eq!(tree.content.arrangement, Arrangement::BottomBar);
    assert_eq!(tree.content.zones.len(), 1);
    let bar = &tree.content.zones[0];
    assert_eq!(bar.role, ZoneRole::CtaBar);
    let fill = bar.fill.unwrap();
    assert_eq!(fill.color.rgb, Rgb8::new(0x10, 0x20, 0x30));
    assert_eq!(fill.color.alpha, 0.8);
    assert_eq!(fill.blur_px, 4.0);
    let roles: Vec<_> = bar.elements.iter().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![ElementRole::Headline, ElementRole::Subheading, ElementRole::CallToAction]
    );
}

#[test]
fn cta_label_contrast_is_a_literal_white_check() {
    assert_eq!(cta_label_color("#FFFFFF"), Rgb8::BLACK);
    assert_eq!(cta_label_color("#ffffff"), Rgb8::WHITE);
    assert_eq!(cta_label_color("#000000"), Rgb8::WHITE);
}

#[test]
fn cta_emphasis_follows_animation() {
    let mut design = FlyerDesign::default();
    let tree = tree_for(&design, &FlyerContent::default());
    let chrome = tree.content.element(ElementRole::CallToAction).unwrap().chrome.clone().unwrap();
    assert_eq!(chrome.emphasis, Some(CtaEmphasis::Pulse));
    assert_eq!(chrome.href.as_deref(), Some("https://stellardigital.io"));

    design.apply(DesignEdit::CtaAnimation(CtaAnimation::Static));
    let tree = tree_for(&design, &FlyerContent::default());
    let chrome = tree.content.element(ElementRole::CallToAction).unwrap().chrome.clone().unwrap();
    assert_eq!(chrome.emphasis, Some(CtaEmphasis::HoverScale));
}

#[test]
fn overlay_opacity_is_clamped() {
    let mut high = FlyerDesign::default();
    high.apply_palette(PaletteEdit::OverlayOpacity(1.5)).unwrap();
    let mut one = FlyerDesign::default();
    one.apply_palette(PaletteEdit::OverlayOpacity(1.0)).unwrap();
    assert_eq!(overlay_gradient(&high), overlay_gradient(&one));

    let mut low = FlyerDesign::default();
    low.apply_palette(PaletteEdit::OverlayOpacity(-0.3)).unwrap();
    let mut zero = FlyerDesign::default();
    zero.apply_palette(PaletteEdit::OverlayOpacity(0.0)).unwrap();
    assert_eq!(overlay_gradient(&low), overlay_gradient(&zero));
}

#[test]
fn overlay_is_bottom_heavy() {
    let g = overlay_gradient(&FlyerDesign::default());
    let [bottom, middle, top] = g.stops;
    assert_eq!(bottom.offset, 0.2);
    assert!((bottom.color.alpha - 0.8).abs() < 1e-9);
    assert!((middle.color.alpha - 0.56).abs() < 1e-9);
    assert!((top.color.alpha - 0.16).abs() < 1e-9);
}

#[test]
fn unparseable_overlay_color_is_black() {
    let mut design = FlyerDesign::default();
    design
        .apply_palette(PaletteEdit::Color(ColorSlot::OverlayColor, "tomato".into()))
        .unwrap();
    assert_eq!(overlay_gradient(&design).stops[0].color.rgb, Rgb8::BLACK);
}

#[test]
fn placeholder_without_resident_payload() {
    let design = FlyerDesign::default();
    let content = FlyerContent::default();
    let keyed = BackgroundMedia::keyed("bg-media-1");
    let tree = compose(&content, &design, Some(&keyed), AspectRatio::Portrait);
    assert!(matches!(tree.background, BackgroundLayer::Placeholder { .. }));

    let inline = BackgroundMedia::inline("data:image/png;base64,AA==");
    let tree = compose(&content, &design, Some(&inline), AspectRatio::Portrait);
    assert_eq!(tree.background.image_url(), Some("data:image/png;base64,AA=="));
}

#[test]
fn type_scale_follows_aspect_ratio() {
    let content = FlyerContent::default();
    let design = FlyerDesign::default();
    let sq = compose(&content, &design, None, AspectRatio::Square);
    let wide = compose(&content, &design, None, AspectRatio::Landscape);
    let size = |t: &FlyerTree| t.content.element(ElementRole::Headline).unwrap().style.font_size;
    assert_eq!(size(&sq), 60.0);
    assert_eq!(size(&wide), 36.0);
    assert_eq!(wide.canvas, AspectRatio::Landscape.canvas());
}

#[test]
fn compose_is_pure() {
    let content = FlyerContent::default();
    let design = FlyerDesign::default();
    assert_eq!(
        compose(&content, &design, None, AspectRatio::Square),
        compose(&content, &design, None, AspectRatio::Square)
    );
}
