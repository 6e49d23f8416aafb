//! Flexbox geometry for a [`FlyerTree`].
//!
//! Text is measured with a fixed advance per glyph rather than shaped. That keeps layout
//! deterministic and font-independent; the rasterizer centers each line on its box so small
//! advance errors do not shift the composition.

use taffy::prelude::{AvailableSpace, TaffyTree};
use taffy::style::{
    AlignItems, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage,
    LengthPercentageAuto, Style,
};

use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{FlyerError, FlyerResult};
use crate::layout::tree::{Arrangement, Element, FlyerTree, TextStyle, ZoneRole};

/// Average glyph advance as a fraction of the font size.
const ADVANCE_EM: f32 = 0.55;

/// Placed element: its border box and the wrapped lines to paint inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement {
    pub zone: usize,
    pub index: usize,
    pub rect: Rect,
    pub lines: Vec<String>,
}

/// Absolute geometry for every zone and element of a tree, in 1x canvas px.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub canvas: Canvas,
    pub zones: Vec<Rect>,
    pub elements: Vec<PlacedElement>,
}

impl BoxLayout {
    pub fn element(&self, zone: usize, index: usize) -> Option<&PlacedElement> {
        self.elements
            .iter()
            .find(|e| e.zone == zone && e.index == index)
    }
}

#[derive(Debug, Clone, Copy)]
struct LeafCtx {
    zone: usize,
    index: usize,
}

/// Lay out the content layer on the tree's canvas.
#[tracing::instrument(level = "debug", skip(tree), fields(ratio = %tree.aspect_ratio))]
pub fn measure(tree: &FlyerTree) -> FlyerResult<BoxLayout> {
    let mut taffy: TaffyTree<LeafCtx> = TaffyTree::new();
    let content = &tree.content;

    let mut zone_ids = Vec::with_capacity(content.zones.len());
    let mut leaf_ids = Vec::new();
    for (zi, zone) in content.zones.iter().enumerate() {
        let mut children = Vec::with_capacity(zone.elements.len());
        for (ei, el) in zone.elements.iter().enumerate() {
            let id = taffy
                .new_leaf_with_context(leaf_style(el), LeafCtx { zone: zi, index: ei })
                .map_err(layout_err)?;
            children.push(id);
            leaf_ids.push((zi, ei, id));
        }
        let style = Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            justify_content: Some(JustifyContent::Center),
            align_items: Some(AlignItems::Center),
            flex_shrink: if zone.role == ZoneRole::Body { 1.0 } else { 0.0 },
            padding: uniform(zone.padding),
            size: taffy::geometry::Size {
                width: Dimension::percent(1.0),
                height: Dimension::auto(),
            },
            ..Style::default()
        };
        zone_ids.push(taffy.new_with_children(style, &children).map_err(layout_err)?);
    }

    let justify = match content.arrangement {
        Arrangement::SpaceAround => JustifyContent::SpaceAround,
        Arrangement::SpaceBetween => JustifyContent::SpaceBetween,
        Arrangement::BottomBar => JustifyContent::FlexEnd,
    };
    let root = taffy
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                justify_content: Some(justify),
                align_items: Some(AlignItems::Stretch),
                padding: uniform(content.padding),
                size: taffy::geometry::Size {
                    width: Dimension::length(tree.canvas.width as f32),
                    height: Dimension::length(tree.canvas.height as f32),
                },
                ..Style::default()
            },
            &zone_ids,
        )
        .map_err(layout_err)?;

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(tree.canvas.width as f32),
        height: AvailableSpace::Definite(tree.canvas.height as f32),
    };
    taffy
        .compute_layout_with_measure(
            root,
            available,
            |known, avail, _id, ctx, _style| {
                let Some(ctx) = ctx else {
                    return taffy::geometry::Size::ZERO;
                };
                let el = &content.zones[ctx.zone].elements[ctx.index];
                let width_limit = known.width.or(match avail.width {
                    AvailableSpace::Definite(w) => Some(w),
                    AvailableSpace::MinContent => Some(0.0),
                    AvailableSpace::MaxContent => None,
                });
                let (w, h) = element_size(el, width_limit);
                taffy::geometry::Size {
                    width: known.width.unwrap_or(w),
                    height: known.height.unwrap_or(h),
                }
            },
        )
        .map_err(layout_err)?;

    let root_layout = taffy.layout(root).map_err(layout_err)?;
    let (ox, oy) = (root_layout.location.x, root_layout.location.y);

    let mut zones = Vec::with_capacity(zone_ids.len());
    let mut zone_origin = Vec::with_capacity(zone_ids.len());
    for &zid in &zone_ids {
        let l = taffy.layout(zid).map_err(layout_err)?;
        let (x, y) = (ox + l.location.x, oy + l.location.y);
        zones.push(rect(x, y, l.size.width, l.size.height));
        zone_origin.push((x, y));
    }

    let mut elements = Vec::with_capacity(leaf_ids.len());
    for (zi, ei, id) in leaf_ids {
        let l = taffy.layout(id).map_err(layout_err)?;
        let (zx, zy) = zone_origin[zi];
        let el = &content.zones[zi].elements[ei];
        let inner = l.size.width - chrome_padding(el).0 * 2.0;
        elements.push(PlacedElement {
            zone: zi,
            index: ei,
            rect: rect(zx + l.location.x, zy + l.location.y, l.size.width, l.size.height),
            lines: wrap_text(&el.display_text(), &el.style, Some(inner.max(0.0))),
        });
    }

    Ok(BoxLayout {
        canvas: tree.canvas,
        zones,
        elements,
    })
}

fn layout_err(e: taffy::TaffyError) -> FlyerError {
    FlyerError::export(format!("layout failed: {e}"))
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64)
}

fn uniform(px: f32) -> taffy::geometry::Rect<LengthPercentage> {
    taffy::geometry::Rect {
        left: LengthPercentage::length(px),
        right: LengthPercentage::length(px),
        top: LengthPercentage::length(px),
        bottom: LengthPercentage::length(px),
    }
}

fn leaf_style(el: &Element) -> Style {
    Style {
        flex_shrink: 0.0,
        margin: taffy::geometry::Rect {
            left: LengthPercentageAuto::length(0.0),
            right: LengthPercentageAuto::length(0.0),
            top: LengthPercentageAuto::length(el.margin_top),
            bottom: LengthPercentageAuto::length(0.0),
        },
        max_size: taffy::geometry::Size {
            width: el
                .style
                .max_width
                .map(Dimension::length)
                .unwrap_or(Dimension::percent(1.0)),
            height: Dimension::auto(),
        },
        ..Style::default()
    }
}

fn chrome_padding(el: &Element) -> (f32, f32) {
    el.chrome
        .as_ref()
        .map(|c| (c.padding_x, c.padding_y))
        .unwrap_or((0.0, 0.0))
}

/// Border-box size of an element when its outer width is capped at `width_limit`.
fn element_size(el: &Element, width_limit: Option<f32>) -> (f32, f32) {
    let (px, py) = chrome_padding(el);
    let inner_limit = width_limit.map(|w| (w - px * 2.0).max(0.0));
    let lines = wrap_text(&el.display_text(), &el.style, inner_limit);
    if lines.is_empty() {
        return (0.0, 0.0);
    }
    let text_w = lines
        .iter()
        .map(|l| line_width(l, &el.style))
        .fold(0.0f32, f32::max);
    let text_h = lines.len() as f32 * el.style.font_size * el.style.line_height;
    (text_w + px * 2.0, text_h + py * 2.0)
}

pub(crate) fn advance(style: &TextStyle) -> f32 {
    style.font_size * (ADVANCE_EM + style.letter_spacing)
}

pub(crate) fn line_width(line: &str, style: &TextStyle) -> f32 {
    line.chars().count() as f32 * advance(style)
}

/// Greedy word wrap. Words longer than a line are broken between characters.
pub(crate) fn wrap_text(text: &str, style: &TextStyle, max_width: Option<f32>) -> Vec<String> {
    let max_chars = match max_width {
        Some(w) => ((w / advance(style)).floor() as usize).max(1),
        None => usize::MAX,
    };

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            let sep = usize::from(line_len > 0);
            if line_len + sep + word.len() <= max_chars {
                if sep == 1 {
                    line.push(' ');
                }
                line.extend(word.iter());
                line_len += sep + word.len();
                continue;
            }
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            while word.len() > max_chars {
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            line_len = word.len();
            line = word.into_iter().collect();
        }
        if line_len > 0 {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/render/measure.rs"]
mod tests;
