use crate::foundation::core::AspectRatio;

/// Padding of a boxed text element in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPadding {
    pub x: f32,
    pub y: f32,
}

/// Text sizes and spacing for one output shape.
///
/// Sizes are tuned so the same copy stays legible on a square post, a tall story, and a short
/// wide thumbnail. All values are CSS px at 1x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeScale {
    pub container_padding: f32,
    pub hook: f32,
    pub headline: f32,
    pub subheading: f32,
    pub offer: f32,
    pub cta: f32,
    pub cta_padding: BoxPadding,
    pub badge: f32,
    pub badge_padding: BoxPadding,
}

const SQUARE: TypeScale = TypeScale {
    container_padding: 32.0,
    hook: 24.0,
    headline: 60.0,
    subheading: 20.0,
    offer: 18.0,
    cta: 20.0,
    cta_padding: BoxPadding { x: 32.0, y: 16.0 },
    badge: 16.0,
    badge_padding: BoxPadding { x: 16.0, y: 6.0 },
};

const PORTRAIT: TypeScale = TypeScale {
    container_padding: 24.0,
    hook: 18.0,
    headline: 48.0,
    subheading: 18.0,
    offer: 16.0,
    cta: 18.0,
    cta_padding: BoxPadding { x: 20.0, y: 12.0 },
    badge: 14.0,
    badge_padding: BoxPadding { x: 12.0, y: 4.0 },
};

const LANDSCAPE: TypeScale = TypeScale {
    container_padding: 24.0,
    hook: 18.0,
    headline: 36.0,
    subheading: 16.0,
    offer: 14.0,
    cta: 16.0,
    cta_padding: BoxPadding { x: 20.0, y: 10.0 },
    badge: 14.0,
    badge_padding: BoxPadding { x: 10.0, y: 2.0 },
};

pub fn type_scale(ratio: AspectRatio) -> &'static TypeScale {
    match ratio {
        AspectRatio::Square => &SQUARE,
        AspectRatio::Portrait => &PORTRAIT,
        AspectRatio::Landscape => &LANDSCAPE,
    }
}

/// Fixed vertical rhythm shared by every preset.
pub(crate) mod spacing {
    pub const HOOK_TOP: f32 = 8.0;
    pub const SUBHEADING_TOP: f32 = 8.0;
    pub const OFFER_TOP: f32 = 20.0;
    pub const BAR_PADDING: f32 = 16.0;
    pub const BAR_SUBHEADING_TOP: f32 = 4.0;
    pub const BAR_CTA_TOP: f32 = 16.0;
    pub const BADGE_RADIUS: f32 = 6.0;
    pub const CTA_RADIUS: f32 = 8.0;
    pub const BAR_BLUR_PX: f32 = 4.0;
    pub const BAR_ALPHA: f64 = 0.8;
    /// `max-w-prose`, in em of the element's own font size.
    pub const PROSE_MAX_EM: f32 = 65.0 * 0.5;
}
