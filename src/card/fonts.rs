//! Card typeface loading.
//!
//! The original design calls for an italic serif (the desire) and a light
//! sans (the affirmation). Explicit config paths win; otherwise we scan
//! well-known system locations.

use super::layout::TextMeasure;
use crate::config::FontConfig;
use crate::error::RenderError;
use rusttype::{Font, GlyphId, Scale};
use std::fs;
use std::path::Path;

const SERIF_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Italic.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif-Italic.ttf",
    "/System/Library/Fonts/Supplemental/Georgia Italic.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman Italic.ttf",
];

const SANS_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-ExtraLight.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// The two typefaces a card needs, loaded and parsed.
#[derive(Debug)]
pub struct FontSet {
    pub serif: Font<'static>,
    pub sans: Font<'static>,
}

impl FontSet {
    pub fn load(config: &FontConfig) -> Result<Self, RenderError> {
        Ok(Self {
            serif: load_face(config.serif.as_deref(), SERIF_CANDIDATES, "serif")?,
            sans: load_face(config.sans.as_deref(), SANS_CANDIDATES, "sans")?,
        })
    }

    /// Whether any usable pair of faces exists without explicit config.
    pub fn available() -> bool {
        Self::load(&FontConfig::default()).is_ok()
    }
}

fn load_face(
    configured: Option<&Path>,
    candidates: &[&str],
    role: &str,
) -> Result<Font<'static>, RenderError> {
    if let Some(path) = configured {
        return parse_font(path, role);
    }
    for candidate in candidates {
        let path = Path::new(candidate);
        if path.exists() {
            return parse_font(path, role);
        }
    }
    Err(RenderError::FontUnavailable(format!(
        "{role}: no configured path and no system candidate present"
    )))
}

fn parse_font(path: &Path, role: &str) -> Result<Font<'static>, RenderError> {
    let bytes = fs::read(path)
        .map_err(|e| RenderError::FontUnavailable(format!("{role}: {}: {e}", path.display())))?;
    Font::try_from_vec(bytes).ok_or_else(|| {
        RenderError::FontUnavailable(format!("{role}: {} did not parse", path.display()))
    })
}

/// A font pinned to a pixel size; the measuring context handed to the
/// word-wrapper.
pub struct ScaledFont<'f> {
    pub font: &'f Font<'static>,
    pub scale: Scale,
}

impl<'f> ScaledFont<'f> {
    pub fn new(font: &'f Font<'static>, px: f32) -> Self {
        Self {
            font,
            scale: Scale::uniform(px),
        }
    }
}

impl TextMeasure for ScaledFont<'_> {
    fn text_width(&self, text: &str) -> f32 {
        let mut width = 0.0;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let glyph = self.font.glyph(ch).scaled(self.scale);
            if let Some(prev) = last {
                width += self.font.pair_kerning(self.scale, prev, glyph.id());
            }
            last = Some(glyph.id());
            width += glyph.h_metrics().advance_width;
        }
        width
    }
}
