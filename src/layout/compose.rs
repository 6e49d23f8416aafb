use crate::assets::color::{Rgb8, clamp_unit};
use crate::foundation::core::AspectRatio;
use crate::layout::preset::{TypeScale, spacing, type_scale};
use crate::layout::tree::{
    Arrangement, Backdrop, BackgroundLayer, BarFill, Chrome, ContentLayer, CtaEmphasis, Element,
    ElementRole, FlyerTree, GradientStop, OverlayGradient, TextShadow, TextStyle, TextTransform,
    Zone, ZoneRole,
};
use crate::scene::model::{
    BackgroundMedia, CtaAnimation, FlyerContent, FlyerDesign, FormatState, LayoutStyle,
};

const BADGE_FILL: Rgb8 = Rgb8::new(0xEF, 0x44, 0x44);
const PLACEHOLDER_LABEL: &str = "Upload an image";

/// Build the visual tree for one format.
///
/// Pure: the same inputs always produce the same tree. `background` is only read to decide
/// between the image layer and the upload placeholder.
pub fn compose(
    content: &FlyerContent,
    design: &FlyerDesign,
    background: Option<&BackgroundMedia>,
    ratio: AspectRatio,
) -> FlyerTree {
    let scale = type_scale(ratio);
    let palette = &design.color_palette;

    let background = match background.and_then(BackgroundMedia::url) {
        Some(url) => BackgroundLayer::Image {
            url: url.to_string(),
        },
        None => BackgroundLayer::Placeholder {
            label: PLACEHOLDER_LABEL.to_string(),
        },
    };

    let content_layer = match design.layout_style {
        LayoutStyle::ImageDominantCtaBar => bar_layout(content, design, scale),
        LayoutStyle::HeadlineFocus => zoned_layout(content, design, scale, Arrangement::SpaceAround),
        LayoutStyle::UrgentOfferOverlay => {
            zoned_layout(content, design, scale, Arrangement::SpaceBetween)
        }
    };

    FlyerTree {
        aspect_ratio: ratio,
        canvas: ratio.canvas(),
        backdrop: Backdrop {
            top: Rgb8::from_hex_or_black(&palette.background_from),
            bottom: Rgb8::from_hex_or_black(&palette.background_to),
        },
        background,
        overlay: overlay_gradient(design),
        content: content_layer,
    }
}

pub fn compose_format(state: &FormatState) -> FlyerTree {
    compose(
        &state.flyer_content,
        &state.flyer_design,
        state.background_media.as_ref(),
        state.aspect_ratio,
    )
}

/// Label color for the CTA: black on a pure-white `textLight`, white otherwise.
///
/// Deliberately a string comparison, not a luminance test; existing templates depend on it.
pub fn cta_label_color(text_light: &str) -> Rgb8 {
    if text_light == "#FFFFFF" {
        Rgb8::BLACK
    } else {
        Rgb8::WHITE
    }
}

pub fn overlay_gradient(design: &FlyerDesign) -> OverlayGradient {
    let palette = &design.color_palette;
    let rgb = Rgb8::from_hex_or_black(&palette.overlay_color);
    let opacity = clamp_unit(palette.overlay_opacity);
    OverlayGradient {
        stops: [
            GradientStop {
                offset: 0.2,
                color: rgb.with_alpha(opacity),
            },
            GradientStop {
                offset: 0.6,
                color: rgb.with_alpha(opacity * 0.7),
            },
            GradientStop {
                offset: 1.0,
                color: rgb.with_alpha(opacity * 0.2),
            },
        ],
    }
}

fn zoned_layout(
    content: &FlyerContent,
    design: &FlyerDesign,
    scale: &TypeScale,
    arrangement: Arrangement,
) -> ContentLayer {
    let fonts = &design.font_pairing;
    let palette = &design.color_palette;

    let mut header = Vec::with_capacity(2);
    let badge = design.badge_text.as_deref().filter(|b| !b.is_empty());
    if let Some(badge) = badge
        && !content.headline.is_empty()
    {
        header.push(Element {
            role: ElementRole::Badge,
            text: badge.to_string(),
            style: TextStyle {
                font_family: fonts.headline_font.family(),
                font_size: scale.badge,
                font_weight: 700,
                color: Rgb8::WHITE,
                transform: TextTransform::Uppercase,
                letter_spacing: 0.1,
                line_height: 1.5,
                max_width: None,
                shadow: None,
            },
            margin_top: 0.0,
            chrome: Some(Chrome {
                fill: BADGE_FILL,
                padding_x: scale.badge_padding.x,
                padding_y: scale.badge_padding.y,
                radius: spacing::BADGE_RADIUS,
                emphasis: None,
                href: None,
            }),
        });
    }
    header.push(Element {
        role: ElementRole::Hook,
        text: content.hook.clone(),
        style: TextStyle {
            font_family: fonts.body_font.family(),
            font_size: scale.hook,
            font_weight: 700,
            color: Rgb8::from_hex_or_black(&palette.secondary),
            transform: TextTransform::Uppercase,
            letter_spacing: 0.05,
            line_height: 1.4,
            max_width: None,
            shadow: Some(shadow(1.0, 3.0)),
        },
        margin_top: spacing::HOOK_TOP,
        chrome: None,
    });

    let body = vec![
        headline(content, design, scale, Some(shadow(2.0, 6.0))),
        Element {
            role: ElementRole::Subheading,
            text: content.subheading.clone(),
            style: TextStyle {
                max_width: Some(scale.subheading * spacing::PROSE_MAX_EM),
                ..subheading_style(design, scale)
            },
            margin_top: spacing::SUBHEADING_TOP,
            chrome: None,
        },
        Element {
            role: ElementRole::Offer,
            text: content.offer.clone(),
            style: TextStyle {
                font_family: fonts.body_font.family(),
                font_size: scale.offer,
                font_weight: 400,
                color: Rgb8::from_hex_or_black(&palette.text_light),
                transform: TextTransform::None,
                letter_spacing: 0.0,
                line_height: 1.625,
                max_width: Some(scale.offer * spacing::PROSE_MAX_EM),
                shadow: None,
            },
            margin_top: spacing::OFFER_TOP,
            chrome: None,
        },
    ];

    let mut footer = Vec::with_capacity(1);
    if !content.call_to_action.is_empty() {
        footer.push(cta(content, design, scale, 0.0));
    }

    ContentLayer {
        arrangement,
        padding: scale.container_padding,
        zones: vec![
            plain_zone(ZoneRole::Header, header),
            plain_zone(ZoneRole::Body, body),
            plain_zone(ZoneRole::Footer, footer),
        ],
    }
}

fn bar_layout(content: &FlyerContent, design: &FlyerDesign, scale: &TypeScale) -> ContentLayer {
    let overlay = Rgb8::from_hex_or_black(&design.color_palette.overlay_color);
    let elements = vec![
        headline(content, design, scale, None),
        Element {
            role: ElementRole::Subheading,
            text: content.subheading.clone(),
            style: subheading_style(design, scale),
            margin_top: spacing::BAR_SUBHEADING_TOP,
            chrome: None,
        },
        cta(content, design, scale, spacing::BAR_CTA_TOP),
    ];

    ContentLayer {
        arrangement: Arrangement::BottomBar,
        padding: 0.0,
        zones: vec![Zone {
            role: ZoneRole::CtaBar,
            fill: Some(BarFill {
                color: overlay.with_alpha(spacing::BAR_ALPHA),
                blur_px: spacing::BAR_BLUR_PX,
            }),
            padding: spacing::BAR_PADDING,
            elements,
        }],
    }
}

fn plain_zone(role: ZoneRole, elements: Vec<Element>) -> Zone {
    Zone {
        role,
        fill: None,
        padding: 0.0,
        elements,
    }
}

fn shadow(offset: f32, blur: f32) -> TextShadow {
    TextShadow {
        dx: offset,
        dy: offset,
        blur,
        color: Rgb8::BLACK.with_alpha(0.7),
    }
}

fn headline(
    content: &FlyerContent,
    design: &FlyerDesign,
    scale: &TypeScale,
    shadow: Option<TextShadow>,
) -> Element {
    Element {
        role: ElementRole::Headline,
        text: content.headline.clone(),
        style: TextStyle {
            font_family: design.font_pairing.headline_font.family(),
            font_size: scale.headline,
            font_weight: 900,
            color: Rgb8::from_hex_or_black(&design.color_palette.primary),
            transform: TextTransform::Uppercase,
            letter_spacing: 0.0,
            line_height: 1.25,
            max_width: None,
            shadow,
        },
        margin_top: 0.0,
        chrome: None,
    }
}

fn subheading_style(design: &FlyerDesign, scale: &TypeScale) -> TextStyle {
    TextStyle {
        font_family: design.font_pairing.body_font.family(),
        font_size: scale.subheading,
        font_weight: 700,
        color: Rgb8::from_hex_or_black(&design.color_palette.secondary),
        transform: TextTransform::None,
        letter_spacing: 0.0,
        line_height: 1.4,
        max_width: None,
        shadow: None,
    }
}

fn cta(content: &FlyerContent, design: &FlyerDesign, scale: &TypeScale, margin_top: f32) -> Element {
    let palette = &design.color_palette;
    let emphasis = match design.cta_animation {
        CtaAnimation::Pulse => CtaEmphasis::Pulse,
        CtaAnimation::Static => CtaEmphasis::HoverScale,
    };
    Element {
        role: ElementRole::CallToAction,
        text: content.call_to_action.clone(),
        style: TextStyle {
            font_family: design.font_pairing.headline_font.family(),
            font_size: scale.cta,
            font_weight: 900,
            color: cta_label_color(&palette.text_light),
            transform: TextTransform::Uppercase,
            letter_spacing: 0.0,
            line_height: 1.4,
            max_width: None,
            shadow: None,
        },
        margin_top,
        chrome: Some(Chrome {
            fill: Rgb8::from_hex_or_black(&palette.accent),
            padding_x: scale.cta_padding.x,
            padding_y: scale.cta_padding.y,
            radius: spacing::CTA_RADIUS,
            emphasis: Some(emphasis),
            href: Some(content.website_url.clone()),
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/compose.rs"]
mod tests;
