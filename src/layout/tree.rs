//! Visual tree produced by the compositor.
//!
//! The tree is a plain value: it carries resolved colors, fonts, and sizes but no geometry.
//! Geometry comes from [`crate::render::measure::measure`].

use crate::assets::color::{Rgb8, Rgba};
use crate::foundation::core::{AspectRatio, Canvas};

/// Complete visual description of one flyer at one aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyerTree {
    pub aspect_ratio: AspectRatio,
    pub canvas: Canvas,
    /// Vertical gradient painted beneath everything.
    pub backdrop: Backdrop,
    pub background: BackgroundLayer,
    pub overlay: OverlayGradient,
    pub content: ContentLayer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub top: Rgb8,
    pub bottom: Rgb8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundLayer {
    /// Cover-fit image from a resident payload.
    Image { url: String },
    /// Shown when no payload is resident, including keyed-but-unresolved media.
    Placeholder { label: String },
}

impl BackgroundLayer {
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { url } => Some(url),
            Self::Placeholder { .. } => None,
        }
    }
}

/// One stop of the overlay gradient. `offset` runs from the bottom edge (0) to the top (1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Overlay between the background image and the text, heaviest at the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGradient {
    pub stops: [GradientStop; 3],
}

/// Vertical distribution of the content zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Equal space around header, body, and footer.
    SpaceAround,
    /// Header and footer pinned to the edges, body in between.
    SpaceBetween,
    /// A single bar anchored to the bottom edge.
    BottomBar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentLayer {
    pub arrangement: Arrangement,
    pub padding: f32,
    pub zones: Vec<Zone>,
}

impl ContentLayer {
    pub fn zone(&self, role: ZoneRole) -> Option<&Zone> {
        self.zones.iter().find(|z| z.role == role)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.zones.iter().flat_map(|z| z.elements.iter())
    }

    pub fn element(&self, role: ElementRole) -> Option<&Element> {
        self.elements().find(|e| e.role == role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRole {
    Header,
    Body,
    Footer,
    CtaBar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub role: ZoneRole,
    /// Translucent, blurred fill behind the zone. Only the CTA bar has one.
    pub fill: Option<BarFill>,
    pub padding: f32,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFill {
    pub color: Rgba,
    pub blur_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Badge,
    Hook,
    Headline,
    Subheading,
    Offer,
    CallToAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    None,
    Uppercase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub dx: f32,
    pub dy: f32,
    pub blur: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: &'static str,
    pub font_size: f32,
    pub font_weight: u16,
    pub color: Rgb8,
    pub transform: TextTransform,
    /// Extra tracking in em.
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Wrap width cap in px, if narrower than the container.
    pub max_width: Option<f32>,
    pub shadow: Option<TextShadow>,
}

/// How the call-to-action draws attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaEmphasis {
    Pulse,
    HoverScale,
}

/// Filled box drawn behind a text element (badge pill, CTA button).
#[derive(Debug, Clone, PartialEq)]
pub struct Chrome {
    pub fill: Rgb8,
    pub padding_x: f32,
    pub padding_y: f32,
    pub radius: f32,
    pub emphasis: Option<CtaEmphasis>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub role: ElementRole,
    pub text: String,
    pub style: TextStyle,
    pub margin_top: f32,
    pub chrome: Option<Chrome>,
}

impl Element {
    /// Text as painted, after the style's transform.
    pub fn display_text(&self) -> String {
        match self.style.transform {
            TextTransform::None => self.text.clone(),
            TextTransform::Uppercase => self.text.to_uppercase(),
        }
    }
}
