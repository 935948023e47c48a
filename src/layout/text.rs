use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use std::sync::Mutex;

use crate::geometry::Size;

/// Measures rendered label text.
///
/// Box sizing depends on real text metrics, so the layout engine measures
/// every label before positioning anything. The trait is the seam between
/// the engine and the font stack; tests substitute a fixed-metric
/// implementation.
pub trait TextMeasure {
    /// Returns the tight bounding box of `text` rendered at `font_size`.
    fn measure(&self, text: &str, font_size: usize) -> Size;
}

/// Text measurement backed by cosmic-text.
///
/// Keeps a reusable FontSystem instance to avoid expensive recreation on
/// every measurement.
pub struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }
}

impl TextMeasure for TextMeasurer {
    fn measure(&self, text: &str, font_size: usize) -> Size {
        let mut font_system = self.font_system.lock().unwrap();

        // Convert font size from points to pixels (roughly 1.33x multiplier for standard DPI)
        let font_size_px = font_size as f32 * 1.33;
        let line_height = font_size_px * 1.2;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name("Arial"));

        // Unlimited buffer size so the text flows naturally on one line
        buffer.set_size(None, None);

        // Advanced shaping handles ligatures, kerning, etc.
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            // No fonts available: fall back to a width estimate
            max_width = text.len() as f32 * (font_size_px * 0.6);
            total_height = metrics.line_height;
        } else {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                // Rightmost glyph position bounds the run
                if let Some(last) = last {
                    let run_width = last.x + last.w;
                    max_width = max_width.max(run_width);
                }
                total_height += metrics.line_height;
            }
        }

        Size::new(max_width, total_height)
    }
}
