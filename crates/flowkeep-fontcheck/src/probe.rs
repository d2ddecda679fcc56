// SPDX-License-Identifier: Apache-2.0

pub const TARGET_FONT: &str = "Kiwi Maru";
pub const DEFAULT_FALLBACK_FONT: &str = "Arial, sans-serif";
pub const DEFAULT_PROBE_SIZE_PX: u32 = 100;

/// Offscreen surface that rasterizes one glyph and returns its pixel buffer.
///
/// Implementations must clear the surface between calls and use a square of
/// `2 * size_px` on each side.
pub trait GlyphCanvas {
    fn render(&mut self, ch: char, font_stack: &str, size_px: u32) -> Vec<u8>;
}

/// Pixel-diff heuristic: a glyph that renders identically with and without
/// the target font in the stack was not provided by the target font.
///
/// Anti-aliasing and late font loading make this approximate, so callers only
/// use it to pick a display class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontProbe {
    pub target_font: String,
    pub fallback_font: String,
    pub size_px: u32,
}

impl Default for FontProbe {
    fn default() -> Self {
        Self {
            target_font: TARGET_FONT.to_string(),
            fallback_font: DEFAULT_FALLBACK_FONT.to_string(),
            size_px: DEFAULT_PROBE_SIZE_PX,
        }
    }
}

impl FontProbe {
    #[must_use]
    pub fn canvas_side_px(&self) -> u32 {
        self.size_px.saturating_mul(2)
    }

    #[must_use]
    pub fn target_stack(&self) -> String {
        format!("{}, {}", self.target_font, self.fallback_font)
    }

    pub fn is_char_supported(&self, canvas: &mut dyn GlyphCanvas, ch: char) -> bool {
        let fallback = canvas.render(ch, &self.fallback_font, self.size_px);
        let target = canvas.render(ch, &self.target_stack(), self.size_px);
        fallback != target
    }

    /// `false` for empty or whitespace-only text.
    pub fn is_text_supported(&self, canvas: &mut dyn GlyphCanvas, text: &str) -> bool {
        let mut tested = false;
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            tested = true;
            if !self.is_char_supported(canvas, ch) {
                return false;
            }
        }
        tested
    }
}
