use crate::error::ConvertError;
use crate::grid::GlyphBlockSize;
use fontdue::{Font, FontSettings};
use std::collections::HashMap;

/// Capability interface for rendering single characters into pixel buffers
///
/// The matching core only ever needs two operations from the font backend:
/// measuring a glyph's advance width and painting a glyph into a block.
/// Keeping them behind a trait keeps the planner/matcher independent of the
/// rasterization library and lets tests substitute a synthetic backend.
pub trait GlyphRasterizer: Send + Sync {
    /// Horizontal advance of `ch` at `font_size`, rounded up to whole pixels
    fn advance_width(&self, ch: char, font_size: f32) -> u32;

    /// Render `ch` into a `block.width * block.height` intensity buffer
    ///
    /// White (255) background, black (0) glyph, baseline anchored at the
    /// bottom edge of the block, pen origin at column 0. Row-major order.
    fn rasterize(&self, ch: char, font_size: f32, block: GlyphBlockSize) -> Vec<u8>;
}

/// fontdue-backed rasterizer bound to one loaded font
///
/// fontdue rasterizes characters in isolation with no shaping pass, so
/// ligatures and contextual substitution never apply; every palette
/// character renders deterministically on its own.
pub struct FontdueRasterizer {
    font: Font,
}

impl FontdueRasterizer {
    /// Parse TTF/OTF bytes into a rasterizer
    ///
    /// # Returns
    /// [`ConvertError::Render`] when the bytes are not a usable font.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConvertError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| ConvertError::Render(format!("failed to parse font: {e}")))?;
        Ok(Self { font })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn advance_width(&self, ch: char, font_size: f32) -> u32 {
        let metrics = self.font.metrics(ch, font_size);
        metrics.advance_width.ceil().max(1.0) as u32
    }

    fn rasterize(&self, ch: char, font_size: f32, block: GlyphBlockSize) -> Vec<u8> {
        let (metrics, coverage) = self.font.rasterize(ch, font_size);
        let mut bitmap = vec![255u8; (block.width * block.height) as usize];

        // Baseline sits on the bottom edge of the block; descenders that
        // reach below it are clipped, matching a bottom-anchored text draw.
        let top = block.height as i32 - (metrics.height as i32 + metrics.ymin);

        for gy in 0..metrics.height {
            let dst_y = top + gy as i32;
            if dst_y < 0 || dst_y >= block.height as i32 {
                continue;
            }
            for gx in 0..metrics.width {
                let dst_x = metrics.xmin + gx as i32;
                if dst_x < 0 || dst_x >= block.width as i32 {
                    continue;
                }
                let cov = coverage[gy * metrics.width + gx];
                let idx = (dst_y as u32 * block.width + dst_x as u32) as usize;
                bitmap[idx] = bitmap[idx].min(255 - cov);
            }
        }

        bitmap
    }
}

/// Registry resolving font family names to rasterizers
///
/// The conversion request carries a family name as a plain string; the
/// embedding application decides which font data backs each name.
#[derive(Default)]
pub struct FontLibrary {
    families: HashMap<String, Box<dyn GlyphRasterizer>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rasterizer under a family name, replacing any previous one
    pub fn register(&mut self, family: impl Into<String>, rasterizer: Box<dyn GlyphRasterizer>) {
        self.families.insert(family.into(), rasterizer);
    }

    /// Parse font bytes and register them under a family name
    pub fn register_font_bytes(
        &mut self,
        family: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(), ConvertError> {
        let rasterizer = FontdueRasterizer::from_bytes(bytes)?;
        self.register(family, Box::new(rasterizer));
        Ok(())
    }

    /// Look up the rasterizer for a family name
    ///
    /// # Returns
    /// [`ConvertError::Render`] when no font is registered under the name.
    pub fn rasterizer_for(&self, family: &str) -> Result<&dyn GlyphRasterizer, ConvertError> {
        self.families
            .get(family)
            .map(|r| r.as_ref())
            .ok_or_else(|| ConvertError::Render(format!("no font registered for family {family:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRasterizer;

    impl GlyphRasterizer for StubRasterizer {
        fn advance_width(&self, _ch: char, font_size: f32) -> u32 {
            (font_size / 2.0).ceil().max(1.0) as u32
        }

        fn rasterize(&self, ch: char, _font_size: f32, block: GlyphBlockSize) -> Vec<u8> {
            vec![(ch as u32 % 256) as u8; (block.width * block.height) as usize]
        }
    }

    #[test]
    fn test_garbage_font_bytes_rejected() {
        let result = FontdueRasterizer::from_bytes(b"this is not a font");
        assert!(matches!(result, Err(ConvertError::Render(_))));
    }

    #[test]
    fn test_unknown_family_is_render_error() {
        let library = FontLibrary::new();
        assert!(matches!(
            library.rasterizer_for("monospace"),
            Err(ConvertError::Render(_))
        ));
    }

    #[test]
    fn test_registered_family_resolves() {
        let mut library = FontLibrary::new();
        library.register("stub", Box::new(StubRasterizer));

        let rasterizer = library.rasterizer_for("stub").unwrap();
        assert_eq!(rasterizer.advance_width('M', 16.0), 8);
    }

    #[test]
    fn test_register_replaces_existing_family() {
        struct WideStub;
        impl GlyphRasterizer for WideStub {
            fn advance_width(&self, _ch: char, _font_size: f32) -> u32 {
                99
            }
            fn rasterize(&self, _ch: char, _font_size: f32, block: GlyphBlockSize) -> Vec<u8> {
                vec![0; (block.width * block.height) as usize]
            }
        }

        let mut library = FontLibrary::new();
        library.register("stub", Box::new(StubRasterizer));
        library.register("stub", Box::new(WideStub));

        let rasterizer = library.rasterizer_for("stub").unwrap();
        assert_eq!(rasterizer.advance_width('M', 16.0), 99);
    }

    #[test]
    fn test_stub_bitmap_dimensions() {
        let block = GlyphBlockSize {
            width: 8,
            height: 16,
        };
        let bitmap = StubRasterizer.rasterize('A', 14.0, block);
        assert_eq!(bitmap.len(), 128);
        assert!(bitmap.iter().all(|&v| v == 65));
    }
}
