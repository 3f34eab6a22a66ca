use std::{collections::HashMap, path::Path};

use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use anyhow::{anyhow, Result};

/// Fonts available to a [`RasterSurface`](super::RasterSurface), keyed by family name.
///
/// Lookups are case-insensitive. When a family is missing the first font that
/// was registered is used instead.
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: HashMap<String, FontArc>,
    fallback: Option<String>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font from bytes (TTF/OTF format) under `family`.
    pub fn load_font_from_bytes(&mut self, family: &str, bytes: &[u8]) -> Result<()> {
        // FontArc needs owned data
        let font = FontArc::try_from_vec(bytes.to_vec())
            .map_err(|e| anyhow!("Failed to load font {family:?}: {e}"))?;
        self.insert(family, font);
        Ok(())
    }

    /// Register a font file under `family`.
    pub fn load_font_file<P: AsRef<Path>>(&mut self, family: &str, path: P) -> Result<()> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| anyhow!("Failed to read font file {:?}: {}", path.as_ref(), e))?;
        self.load_font_from_bytes(family, &bytes)
    }

    pub fn insert(&mut self, family: &str, font: FontArc) {
        let key = family.to_ascii_lowercase();
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        self.fonts.insert(key, font);
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&family.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Resolve a family, falling back to the first registered font.
    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        if let Some(font) = self.fonts.get(&family.to_ascii_lowercase()) {
            return Some(font);
        }
        let fallback = self.fallback.as_ref()?;
        log::warn!("Font family {family:?} not loaded, using {fallback:?}");
        self.fonts.get(fallback)
    }
}

/// Lay out a single line starting at the origin, baseline at y = 0.
///
/// Returns the positioned glyphs and the total advance width.
pub(crate) fn layout_line(font: &FontArc, size: f32, text: &str) -> (Vec<Glyph>, f32) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(caret, 0.0),
        });
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, caret)
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.fonts.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}
