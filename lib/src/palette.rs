use crate::glyph::GlyphRasterizer;
use crate::grid::GlyphBlockSize;

/// One candidate character and its rendered appearance
///
/// The reference bitmap holds single-channel intensity samples sized
/// exactly to the glyph block; entries never mutate after construction.
pub struct PaletteEntry {
    pub ch: char,
    pub reference: Vec<u8>,
}

/// Rasterize every palette character into a reference bitmap
///
/// Iterates the palette string in order, one entry per character.
/// Duplicate characters are rasterized redundantly; the matcher's
/// first-occurrence tie-break makes deduplication unobservable either way.
///
/// The cache is built once per conversion and shared read-only across all
/// block comparisons. An empty palette is rejected upstream by parameter
/// validation.
///
/// # Arguments
/// * `palette` - Ordered candidate characters
/// * `font_size` - Font size in pixels
/// * `block` - Pixel dimensions of one character cell
/// * `rasterizer` - Font backend rendering the glyphs
pub fn build_palette(
    palette: &str,
    font_size: f32,
    block: GlyphBlockSize,
    rasterizer: &dyn GlyphRasterizer,
) -> Vec<PaletteEntry> {
    palette
        .chars()
        .map(|ch| PaletteEntry {
            ch,
            reference: rasterizer.rasterize(ch, font_size, block),
        })
        .collect()
}
