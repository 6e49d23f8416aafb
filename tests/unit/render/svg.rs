use super::*;
use crate::foundation::core::AspectRatio;
use crate::layout::compose::compose;
use crate::render::measure::measure;
use crate::scene::model::{
    BackgroundMedia, ContentField, DesignEdit, FlyerContent, FlyerDesign, LayoutStyle,
};

fn render(content: &FlyerContent, design: &FlyerDesign, bg: Option<&BackgroundMedia>) -> String {
    let tree = compose(content, design, bg, AspectRatio::Square);
    let layout = measure(&tree).unwrap();
    to_svg(&tree, &layout).unwrap()
}

#[test]
fn escapes_markup_in_user_text() {
    let mut content = FlyerContent::default();
    *content.field_mut(ContentField::Subheading) = "Fish & <Chips>".to_string();
    let svg = render(&content, &FlyerDesign::default(), None);
    assert!(svg.contains("Fish &amp; &lt;Chips&gt;"));
    assert!(!svg.contains("<Chips>"));
}

#[test]
fn placeholder_is_drawn_without_image() {
    let svg = render(&FlyerContent::default(), &FlyerDesign::default(), None);
    assert!(svg.contains("Upload an image"));
    assert!(!svg.contains("<image"));
}

#[test]
fn image_and_overlay_are_drawn_with_payload() {
    let bg = BackgroundMedia::inline("data:image/png;base64,AA==");
    let svg = render(&FlyerContent::default(), &FlyerDesign::default(), Some(&bg));
    assert!(svg.contains(r#"xlink:href="data:image/png;base64,AA==""#));
    assert!(svg.contains(r#"fill="url(#overlay)""#));
    assert!(!svg.contains("Upload an image"));
}

#[test]
fn cta_bar_blurs_a_clipped_copy_of_the_image() {
    let mut design = FlyerDesign::default();
    design.apply(DesignEdit::LayoutStyle(LayoutStyle::ImageDominantCtaBar));
    let bg = BackgroundMedia::inline("data:image/png;base64,AA==");
    let svg = render(&FlyerContent::default(), &design, Some(&bg));
    assert!(svg.contains(r#"<feGaussianBlur stdDeviation="4"/>"#));
    assert!(svg.contains(r#"filter="url(#bar-blur)""#));
    assert_eq!(svg.matches("<image").count(), 2);
}

#[test]
fn pulse_emphasis_is_tagged() {
    let svg = render(&FlyerContent::default(), &FlyerDesign::default(), None);
    assert!(svg.contains(r#"class="cta-pulse""#));
}

#[test]
fn control_characters_are_dropped_from_text() {
    assert_eq!(escape("BIG\u{1}SALE\u{1F}"), "BIGSALE");
    assert_eq!(escape("a\tb\nc"), "a\tb\nc");

    let mut content = FlyerContent::default();
    *content.field_mut(ContentField::Headline) = "BIG\u{1}SALE\u{0B}NOW".to_string();
    let svg = render(&content, &FlyerDesign::default(), None);
    assert!(!svg.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
    assert!(svg.contains("BIGSALE"));
}
