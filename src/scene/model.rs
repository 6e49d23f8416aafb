use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::AspectRatio;
use crate::foundation::error::{FlyerError, FlyerResult};

/// The six free-text fields of a flyer. Nothing here is validated; values are substituted into
/// the visual tree verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerContent {
    pub hook: String,
    pub headline: String,
    pub subheading: String,
    pub offer: String,
    pub call_to_action: String,
    pub website_url: String,
}

impl Default for FlyerContent {
    fn default() -> Self {
        Self {
            hook: "TIRED OF BEING INVISIBLE?".to_string(),
            headline: "DOMINATE YOUR MARKET".to_string(),
            subheading: "With Stellar Digital's Expert Marketing".to_string(),
            offer: "Claim your FREE website SEO audit today & uncover hidden growth opportunities!"
                .to_string(),
            call_to_action: "GET MY FREE AUDIT".to_string(),
            website_url: "https://stellardigital.io".to_string(),
        }
    }
}

impl FlyerContent {
    pub fn get(&self, field: ContentField) -> &str {
        match field {
            ContentField::Hook => &self.hook,
            ContentField::Headline => &self.headline,
            ContentField::Subheading => &self.subheading,
            ContentField::Offer => &self.offer,
            ContentField::CallToAction => &self.call_to_action,
            ContentField::WebsiteUrl => &self.website_url,
        }
    }

    pub fn field_mut(&mut self, field: ContentField) -> &mut String {
        match field {
            ContentField::Hook => &mut self.hook,
            ContentField::Headline => &mut self.headline,
            ContentField::Subheading => &mut self.subheading,
            ContentField::Offer => &mut self.offer,
            ContentField::CallToAction => &mut self.call_to_action,
            ContentField::WebsiteUrl => &mut self.website_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentField {
    Hook,
    Headline,
    Subheading,
    Offer,
    CallToAction,
    WebsiteUrl,
}

impl ContentField {
    pub const ALL: [ContentField; 6] = [
        Self::Hook,
        Self::Headline,
        Self::Subheading,
        Self::Offer,
        Self::CallToAction,
        Self::WebsiteUrl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::Headline => "headline",
            Self::Subheading => "subheading",
            Self::Offer => "offer",
            Self::CallToAction => "callToAction",
            Self::WebsiteUrl => "websiteUrl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub background_from: String,
    pub background_to: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text_light: String,
    pub overlay_color: String,
    /// Stored as entered; clamped to `[0, 1]` only when rendering.
    pub overlay_opacity: f64,
}

impl ColorPalette {
    pub fn get(&self, slot: ColorSlot) -> &str {
        match slot {
            ColorSlot::BackgroundFrom => &self.background_from,
            ColorSlot::BackgroundTo => &self.background_to,
            ColorSlot::Primary => &self.primary,
            ColorSlot::Secondary => &self.secondary,
            ColorSlot::Accent => &self.accent,
            ColorSlot::TextLight => &self.text_light,
            ColorSlot::OverlayColor => &self.overlay_color,
        }
    }

    fn slot_mut(&mut self, slot: ColorSlot) -> &mut String {
        match slot {
            ColorSlot::BackgroundFrom => &mut self.background_from,
            ColorSlot::BackgroundTo => &mut self.background_to,
            ColorSlot::Primary => &mut self.primary,
            ColorSlot::Secondary => &mut self.secondary,
            ColorSlot::Accent => &mut self.accent,
            ColorSlot::TextLight => &mut self.text_light,
            ColorSlot::OverlayColor => &mut self.overlay_color,
        }
    }
}

/// The seven text-valued palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    BackgroundFrom,
    BackgroundTo,
    Primary,
    Secondary,
    Accent,
    TextLight,
    OverlayColor,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 7] = [
        Self::BackgroundFrom,
        Self::BackgroundTo,
        Self::Primary,
        Self::Secondary,
        Self::Accent,
        Self::TextLight,
        Self::OverlayColor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BackgroundFrom => "backgroundFrom",
            Self::BackgroundTo => "backgroundTo",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::TextLight => "textLight",
            Self::OverlayColor => "overlayColor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadlineFont {
    Poppins,
    Inter,
    Oswald,
    Anton,
    #[serde(rename = "Playfair Display")]
    PlayfairDisplay,
}

impl HeadlineFont {
    pub const ALL: [HeadlineFont; 5] = [
        Self::Poppins,
        Self::Inter,
        Self::Oswald,
        Self::Anton,
        Self::PlayfairDisplay,
    ];

    /// CSS family name.
    pub fn family(self) -> &'static str {
        match self {
            Self::Poppins => "Poppins",
            Self::Inter => "Inter",
            Self::Oswald => "Oswald",
            Self::Anton => "Anton",
            Self::PlayfairDisplay => "Playfair Display",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyFont {
    Inter,
    #[serde(rename = "Roboto Slab")]
    RobotoSlab,
    Lato,
}

impl BodyFont {
    pub const ALL: [BodyFont; 3] = [Self::Inter, Self::RobotoSlab, Self::Lato];

    /// CSS family name.
    pub fn family(self) -> &'static str {
        match self {
            Self::Inter => "Inter",
            Self::RobotoSlab => "Roboto Slab",
            Self::Lato => "Lato",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPairing {
    pub headline_font: HeadlineFont,
    pub body_font: BodyFont,
}

/// Selects the compositor algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStyle {
    HeadlineFocus,
    ImageDominantCtaBar,
    UrgentOfferOverlay,
}

impl LayoutStyle {
    pub const ALL: [LayoutStyle; 3] = [
        Self::HeadlineFocus,
        Self::ImageDominantCtaBar,
        Self::UrgentOfferOverlay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeadlineFocus => "headline-focus",
            Self::ImageDominantCtaBar => "image-dominant-cta-bar",
            Self::UrgentOfferOverlay => "urgent-offer-overlay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CtaAnimation {
    #[serde(rename = "none")]
    Static,
    #[serde(rename = "pulse")]
    Pulse,
}

impl CtaAnimation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "none",
            Self::Pulse => "pulse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerDesign {
    /// Display label only.
    pub theme_name: String,
    pub color_palette: ColorPalette,
    pub font_pairing: FontPairing,
    pub layout_style: LayoutStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    pub cta_animation: CtaAnimation,
}

impl Default for FlyerDesign {
    fn default() -> Self {
        Self {
            theme_name: "Headline Focus".to_string(),
            color_palette: ColorPalette {
                background_from: "#000000".to_string(),
                background_to: "#1C1C1C".to_string(),
                primary: "#FFD700".to_string(),
                secondary: "#FFFFFF".to_string(),
                accent: "#FF3B30".to_string(),
                text_light: "#FFFFFF".to_string(),
                overlay_color: "#000000".to_string(),
                overlay_opacity: 0.8,
            },
            font_pairing: FontPairing {
                headline_font: HeadlineFont::Poppins,
                body_font: BodyFont::Inter,
            },
            layout_style: LayoutStyle::HeadlineFocus,
            badge_text: Some("LIMITED TIME".to_string()),
            cta_animation: CtaAnimation::Pulse,
        }
    }
}

/// Top-level design edits (palette and fonts have their own edit types).
#[derive(Debug, Clone, PartialEq)]
pub enum DesignEdit {
    ThemeName(String),
    LayoutStyle(LayoutStyle),
    BadgeText(Option<String>),
    CtaAnimation(CtaAnimation),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteEdit {
    Color(ColorSlot, String),
    OverlayOpacity(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontEdit {
    Headline(HeadlineFont),
    Body(BodyFont),
}

impl FlyerDesign {
    pub fn apply(&mut self, edit: DesignEdit) {
        match edit {
            DesignEdit::ThemeName(name) => self.theme_name = name,
            DesignEdit::LayoutStyle(style) => self.layout_style = style,
            DesignEdit::BadgeText(text) => self.badge_text = text,
            DesignEdit::CtaAnimation(anim) => self.cta_animation = anim,
        }
    }

    /// Apply a palette edit. Non-finite opacities are rejected because they cannot be
    /// persisted as JSON numbers.
    pub fn apply_palette(&mut self, edit: PaletteEdit) -> FlyerResult<()> {
        match edit {
            PaletteEdit::Color(slot, value) => *self.color_palette.slot_mut(slot) = value,
            PaletteEdit::OverlayOpacity(v) => {
                if !v.is_finite() {
                    return Err(FlyerError::validation("overlayOpacity must be finite"));
                }
                self.color_palette.overlay_opacity = v;
            }
        }
        Ok(())
    }

    pub fn apply_font(&mut self, edit: FontEdit) {
        match edit {
            FontEdit::Headline(f) => self.font_pairing.headline_font = f,
            FontEdit::Body(f) => self.font_pairing.body_font = f,
        }
    }
}

/// Image source of a background.
///
/// `url` is the inline payload and, when present, authoritative. `idb_key` is the durable
/// blob-tier handle used when no payload is resident.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, rename = "idbKey", skip_serializing_if = "Option::is_none")]
    pub idb_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundMedia {
    Image(ImageMedia),
}

impl BackgroundMedia {
    /// An image with a resident payload and no durable key yet.
    pub fn inline(url: impl Into<String>) -> Self {
        Self::Image(ImageMedia {
            url: Some(url.into()),
            idb_key: None,
        })
    }

    /// A reference into the blob tier with no resident payload.
    pub fn keyed(key: impl Into<String>) -> Self {
        Self::Image(ImageMedia {
            url: None,
            idb_key: Some(key.into()),
        })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image(m) => m.url.as_deref(),
        }
    }

    pub fn blob_key(&self) -> Option<&str> {
        match self {
            Self::Image(m) => m.idb_key.as_deref(),
        }
    }

    /// Keyed but not yet reattached.
    pub fn needs_reattach(&self) -> bool {
        self.url().is_none() && self.blob_key().is_some()
    }

    /// Copy of `self` with `url` resident.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        match self {
            Self::Image(m) => Self::Image(ImageMedia {
                url: Some(url.into()),
                idb_key: m.idb_key.clone(),
            }),
        }
    }
}

/// Everything rendered for one aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatState {
    pub background_media: Option<BackgroundMedia>,
    pub flyer_content: FlyerContent,
    pub flyer_design: FlyerDesign,
    pub aspect_ratio: AspectRatio,
}

impl FormatState {
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            background_media: None,
            flyer_content: FlyerContent::default(),
            flyer_design: FlyerDesign::default(),
            aspect_ratio,
        }
    }
}

/// The fixed set of three formats. One field per ratio, so the set cannot grow or shrink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyerStates {
    #[serde(rename = "1:1")]
    square: FormatState,
    #[serde(rename = "9:16")]
    portrait: FormatState,
    #[serde(rename = "16:9")]
    landscape: FormatState,
}

impl Default for FlyerStates {
    fn default() -> Self {
        Self {
            square: FormatState::new(AspectRatio::Square),
            portrait: FormatState::new(AspectRatio::Portrait),
            landscape: FormatState::new(AspectRatio::Landscape),
        }
    }
}

impl FlyerStates {
    pub fn get(&self, ratio: AspectRatio) -> &FormatState {
        match ratio {
            AspectRatio::Square => &self.square,
            AspectRatio::Portrait => &self.portrait,
            AspectRatio::Landscape => &self.landscape,
        }
    }

    pub fn get_mut(&mut self, ratio: AspectRatio) -> &mut FormatState {
        match ratio {
            AspectRatio::Square => &mut self.square,
            AspectRatio::Portrait => &mut self.portrait,
            AspectRatio::Landscape => &mut self.landscape,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatState> {
        [&self.square, &self.portrait, &self.landscape].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FormatState> {
        [&mut self.square, &mut self.portrait, &mut self.landscape].into_iter()
    }
}

/// Result of a shared-state transformation: content and design always replace every format's
/// copy; the background only when `background` is `Some`.
#[derive(Debug, Clone)]
pub struct SharedUpdate {
    pub flyer_content: FlyerContent,
    pub flyer_design: FlyerDesign,
    pub background: Option<Option<BackgroundMedia>>,
}

impl SharedUpdate {
    /// Start from the current content/design of `state`, background untouched.
    pub fn from_state(state: &FormatState) -> Self {
        Self {
            flyer_content: state.flyer_content.clone(),
            flyer_design: state.flyer_design.clone(),
            background: None,
        }
    }
}

/// Aggregate editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub flyer_states: FlyerStates,
    pub active_aspect_ratio: AspectRatio,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            flyer_states: FlyerStates::default(),
            active_aspect_ratio: AspectRatio::Square,
        }
    }
}

impl AppState {
    pub fn active(&self) -> &FormatState {
        self.flyer_states.get(self.active_aspect_ratio)
    }

    pub fn format(&self, ratio: AspectRatio) -> &FormatState {
        self.flyer_states.get(ratio)
    }

    /// Run `f` against the active format and write its result into all three formats.
    pub fn apply_shared(&mut self, f: impl FnOnce(&FormatState) -> SharedUpdate) {
        let update = f(self.active());
        for state in self.flyer_states.iter_mut() {
            state.flyer_content = update.flyer_content.clone();
            state.flyer_design = update.flyer_design.clone();
            if let Some(background) = &update.background {
                state.background_media = background.clone();
            }
        }
    }

    /// `true` when content, design and background agree across all formats and each format's
    /// tag matches its slot.
    pub fn is_consistent(&self) -> bool {
        let a = self.active();
        AspectRatio::ALL.iter().all(|&r| {
            let s = self.flyer_states.get(r);
            s.aspect_ratio == r
                && s.flyer_content == a.flyer_content
                && s.flyer_design == a.flyer_design
                && s.background_media == a.background_media
        })
    }
}

macro_rules! impl_from_str {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?], |$v:ident| $name:expr) => {
        impl FromStr for $ty {
            type Err = FlyerError;

            fn from_str(s: &str) -> FlyerResult<Self> {
                let wanted = s.trim();
                for $v in [$($variant),+] {
                    if $name.eq_ignore_ascii_case(wanted) {
                        return Ok($v);
                    }
                }
                Err(FlyerError::validation(format!(concat!("unknown ", $what, " \"{}\""), wanted)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let $v = *self;
                f.write_str($name)
            }
        }
    };
}

impl_from_str!(ContentField, "content field", [
    ContentField::Hook,
    ContentField::Headline,
    ContentField::Subheading,
    ContentField::Offer,
    ContentField::CallToAction,
    ContentField::WebsiteUrl,
], |v| v.as_str());

impl_from_str!(ColorSlot, "palette color", [
    ColorSlot::BackgroundFrom,
    ColorSlot::BackgroundTo,
    ColorSlot::Primary,
    ColorSlot::Secondary,
    ColorSlot::Accent,
    ColorSlot::TextLight,
    ColorSlot::OverlayColor,
], |v| v.as_str());

impl_from_str!(HeadlineFont, "headline font", [
    HeadlineFont::Poppins,
    HeadlineFont::Inter,
    HeadlineFont::Oswald,
    HeadlineFont::Anton,
    HeadlineFont::PlayfairDisplay,
], |v| v.family());

impl_from_str!(BodyFont, "body font", [
    BodyFont::Inter,
    BodyFont::RobotoSlab,
    BodyFont::Lato,
], |v| v.family());

impl_from_str!(LayoutStyle, "layout style", [
    LayoutStyle::HeadlineFocus,
    LayoutStyle::ImageDominantCtaBar,
    LayoutStyle::UrgentOfferOverlay,
], |v| v.as_str());

impl_from_str!(CtaAnimation, "cta animation", [
    CtaAnimation::Static,
    CtaAnimation::Pulse,
], |v| v.as_str());

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
