use super::*;
use crate::foundation::core::AspectRatio;
use crate::layout::compose::compose;
use crate::layout::tree::{ElementRole, ZoneRole};
use crate::scene::model::{DesignEdit, FlyerContent, FlyerDesign, LayoutStyle};

fn style(size: f32) -> TextStyle {
    TextStyle {
        font_family: "Inter",
        font_size: size,
        font_weight: 400,
        color: crate::assets::color::Rgb8::WHITE,
        transform: crate::layout::tree::TextTransform::None,
        letter_spacing: 0.0,
        line_height: 1.5,
        max_width: None,
        shadow: None,
    }
}

#[test]
fn wrap_breaks_on_whitespace() {
    // 10px font -> 5.5px per glyph -> 10 glyphs in 55px.
    let lines = wrap_text("hello big world", &style(10.0), Some(55.0));
    assert_eq!(lines, vec!["hello big", "world"]);
}

#[test]
fn wrap_splits_overlong_words() {
    let lines = wrap_text("abcdefghijklmnop", &style(10.0), Some(55.0));
    assert_eq!(lines, vec!["abcdefghij", "klmnop"]);
}

#[test]
fn wrap_without_limit_keeps_one_line() {
    let lines = wrap_text("one two three", &style(10.0), None);
    assert_eq!(lines, vec!["one two three"]);
    assert!(wrap_text("   ", &style(10.0), None).is_empty());
}

#[test]
fn every_element_fits_inside_the_canvas_width() {
    let content = FlyerContent::default();
    let design = FlyerDesign::default();
    for ratio in AspectRatio::ALL {
        let tree = compose(&content, &design, None, ratio);
        let layout = measure(&tree).unwrap();
        assert_eq!(layout.zones.len(), 3);
        for el in &layout.elements {
            assert!(el.rect.x0 >= -0.5, "{ratio}: {:?}", el.rect);
            assert!(el.rect.x1 <= tree.canvas.width as f64 + 0.5, "{ratio}: {:?}", el.rect);
            assert!(!el.lines.is_empty());
        }
    }
}

#[test]
fn zones_are_ordered_top_to_bottom() {
    let tree = compose(
        &FlyerContent::default(),
        &FlyerDesign::default(),
        None,
        AspectRatio::Portrait,
    );
    let layout = measure(&tree).unwrap();
    assert!(layout.zones[0].y1 <= layout.zones[1].y0 + 0.5);
    assert!(layout.zones[1].y1 <= layout.zones[2].y0 + 0.5);
}

#[test]
fn cta_bar_is_anchored_to_the_bottom() {
    let mut design = FlyerDesign::default();
    design.apply(DesignEdit::LayoutStyle(LayoutStyle::ImageDominantCtaBar));
    let tree = compose(&FlyerContent::default(), &design, None, AspectRatio::Landscape);
    assert_eq!(tree.content.zones[0].role, ZoneRole::CtaBar);
    let layout = measure(&tree).unwrap();
    let bar = layout.zones[0];
    assert!((bar.y1 - tree.canvas.height as f64).abs() < 0.5);
    assert!((bar.width() - tree.canvas.width as f64).abs() < 0.5);
    assert!(bar.y0 > 0.0);
}

#[test]
fn cta_box_includes_chrome_padding() {
    let tree = compose(
        &FlyerContent::default(),
        &FlyerDesign::default(),
        None,
        AspectRatio::Square,
    );
    let layout = measure(&tree).unwrap();
    let (zi, ei) = tree
        .content
        .zones
        .iter()
        .enumerate()
        .find_map(|(zi, z)| {
            z.elements
                .iter()
                .position(|e| e.role == ElementRole::CallToAction)
                .map(|ei| (zi, ei))
        })
        .unwrap();
    let placed = layout.element(zi, ei).unwrap();
    // one line at 20px * 1.4 plus 16px padding top and bottom
    assert!((placed.rect.height() - (28.0 + 32.0)).abs() < 0.5);
}
