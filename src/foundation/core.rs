use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{FlyerError, FlyerResult};

pub use kurbo::{Point, Rect, Size};

/// One of the three fixed output shapes a flyer is rendered into.
///
/// The serialized spelling (`"1:1"`, `"9:16"`, `"16:9"`) is also the key used in persisted
/// documents.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AspectRatio {
    /// Square post.
    #[serde(rename = "1:1")]
    Square,
    /// Tall story.
    #[serde(rename = "9:16")]
    Portrait,
    /// Wide thumbnail.
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// Every format, in display order.
    pub const ALL: [AspectRatio; 3] = [Self::Square, Self::Portrait, Self::Landscape];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
        }
    }

    /// Human-facing name of the placement this format targets.
    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "Instagram Post",
            Self::Portrait => "Instagram Story",
            Self::Landscape => "YouTube Thumbnail",
        }
    }

    /// Logical (1x) canvas the flyer is laid out on.
    ///
    /// The long edge is always 672 px, matching the editor preview width.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Square => Canvas {
                width: 672,
                height: 672,
            },
            Self::Portrait => Canvas {
                width: 378,
                height: 672,
            },
            Self::Landscape => Canvas {
                width: 672,
                height: 378,
            },
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = FlyerError;

    fn from_str(s: &str) -> FlyerResult<Self> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "9:16" => Ok(Self::Portrait),
            "16:9" => Ok(Self::Landscape),
            other => Err(FlyerError::validation(format!(
                "unknown aspect ratio \"{other}\" (expected 1:1, 9:16 or 16:9)"
            ))),
        }
    }
}

/// Output canvas dimensions in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Canvas as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Device pixel size after applying a density multiplier.
    pub fn scaled(self, pixel_ratio: f32) -> FlyerResult<(u32, u32)> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(FlyerError::validation(
                "pixel ratio must be finite and > 0",
            ));
        }
        let w = (self.width as f32 * pixel_ratio).round().max(1.0) as u32;
        let h = (self.height as f32 * pixel_ratio).round().max(1.0) as u32;
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
