use crate::cancel::CancellationToken;
use crate::config::ConversionParams;
use crate::error::ConvertError;
use crate::glyph::FontLibrary;
use crate::grid::{self, GlyphBlockSize};
use crate::matcher::best_match;
use crate::palette::build_palette;
use image::{imageops, RgbaImage};
use log::debug;
use rayon::prelude::*;

/// Representative glyph used to fix the block width for the whole grid
///
/// A capital M is the widest common glyph; with a monospace font every
/// character shares its advance anyway. Proportional fonts will mis-measure
/// narrower glyphs, which is an accepted constraint of the font choice.
const MEASURE_CHAR: char = 'M';

/// Convert an image into a monospace-text approximation
///
/// Pipeline: validate parameters, decode the source, derive the glyph
/// block size from font metrics, plan the output grid from the image
/// aspect ratio, resample the whole image to the planned canvas, build
/// the palette's reference bitmaps once, then pick the best-matching
/// character per block. Rows are matched in parallel; the palette cache
/// is shared read-only and each row writes only its own buffer.
///
/// The cancellation token is observed between pipeline steps and once per
/// row. A cancelled run returns [`ConvertError::Cancelled`] and never a
/// partial result.
///
/// # Arguments
/// * `params` - The conversion request
/// * `fonts` - Registry resolving the request's font family
/// * `token` - Cooperative cancellation signal for this request
///
/// # Returns
/// The ASCII art: `rows` lines of `columns` characters, each line
/// (including the last) terminated by a newline.
pub fn convert(
    params: &ConversionParams,
    fonts: &FontLibrary,
    token: &CancellationToken,
) -> Result<String, ConvertError> {
    token.check()?;
    params.validate()?;

    token.check()?;
    let source = params.source.decode()?;

    token.check()?;
    let rasterizer = fonts.rasterizer_for(&params.font_family)?;
    let block = GlyphBlockSize {
        width: rasterizer
            .advance_width(MEASURE_CHAR, params.font_size)
            .max(1),
        height: ((params.font_size * params.leading).round() as u32).max(1),
    };

    token.check()?;
    let plan = grid::plan(source.width(), source.height(), params.line_count, block)?;
    debug!(
        "planned {}x{} grid ({}x{} px blocks, {}x{} px canvas)",
        plan.columns, plan.rows, block.width, block.height, plan.canvas_width, plan.canvas_height
    );

    token.check()?;
    // Whole-image resample to the planned canvas; blocks are then plain
    // sub-rectangles with no further scaling.
    let canvas = imageops::resize(
        &source,
        plan.canvas_width,
        plan.canvas_height,
        imageops::FilterType::Triangle,
    );

    token.check()?;
    let palette = build_palette(&params.palette, params.font_size, block, rasterizer);

    let rows: Vec<String> = (0..plan.rows)
        .into_par_iter()
        .map(|row| -> Result<String, ConvertError> {
            token.check()?;
            let mut line = String::with_capacity(plan.columns as usize + 1);
            let mut samples = vec![0u8; (block.width * block.height) as usize];
            for col in 0..plan.columns {
                extract_block(
                    &canvas,
                    col * block.width,
                    row * block.height,
                    block,
                    &mut samples,
                );
                line.push(best_match(&samples, &palette)?);
            }
            line.push('\n');
            Ok(line)
        })
        .collect::<Result<_, _>>()?;

    token.check()?;
    Ok(rows.concat())
}

/// Copy one block's red channel out of the canvas into a scratch buffer
///
/// The red channel stands in for luminance; glyph reference bitmaps are
/// grayscale, so a single channel is enough for the comparison.
fn extract_block(canvas: &RgbaImage, x0: u32, y0: u32, block: GlyphBlockSize, out: &mut [u8]) {
    let mut i = 0;
    for y in y0..y0 + block.height {
        for x in x0..x0 + block.width {
            out[i] = canvas.get_pixel(x, y)[0];
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageSource;
    use crate::glyph::GlyphRasterizer;
    use image::{DynamicImage, Rgba};
    use std::path::PathBuf;

    /// Synthetic backend: every glyph renders as a solid fill whose
    /// intensity is the character's code point, and advance width is half
    /// the font size.
    struct StubRasterizer;

    impl GlyphRasterizer for StubRasterizer {
        fn advance_width(&self, _ch: char, font_size: f32) -> u32 {
            (font_size / 2.0).ceil().max(1.0) as u32
        }

        fn rasterize(&self, ch: char, _font_size: f32, block: GlyphBlockSize) -> Vec<u8> {
            vec![(ch as u32 % 256) as u8; (block.width * block.height) as usize]
        }
    }

    fn stub_fonts() -> FontLibrary {
        let mut fonts = FontLibrary::new();
        fonts.register("stub", Box::new(StubRasterizer));
        fonts
    }

    fn params_for(image: DynamicImage) -> ConversionParams {
        ConversionParams {
            source: ImageSource::Decoded(image),
            line_count: 10,
            // 16px font, stub advance 8px, leading 1.0: 8x16 blocks
            font_size: 16.0,
            palette: "AB".to_string(),
            font_family: "stub".to_string(),
            leading: 1.0,
        }
    }

    #[test]
    fn test_output_grid_shape() {
        // 200x100 image, 10 lines, 8x16 blocks: round(10*16*2.0/8) = 40 cols
        let params = params_for(DynamicImage::new_rgba8(200, 100));
        let text = convert(&params, &stub_fonts(), &CancellationToken::new()).unwrap();

        let lines: Vec<&str> = text.split_terminator('\n').collect();
        assert_eq!(lines.len(), 10);
        for line in &lines {
            assert_eq!(line.chars().count(), 40);
        }
        // Every row, the last included, ends in a newline
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 10);
    }

    #[test]
    fn test_dark_image_picks_darkest_stub_glyph() {
        // Black canvas (red channel 0): ' ' (32) beats 'M' (77) everywhere
        let image = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            64,
            64,
            Rgba([0, 0, 0, 255]),
        ));
        let mut params = params_for(image);
        params.palette = "M ".to_string();
        params.line_count = 3;

        let text = convert(&params, &stub_fonts(), &CancellationToken::new()).unwrap();
        assert!(text.split_terminator('\n').all(|l| l.chars().all(|c| c == ' ')));
    }

    #[test]
    fn test_zero_line_count_fails_before_decode() {
        // A missing path would be an ImageDecode error; validation must
        // reject the request before the source is ever touched.
        let mut params = params_for(DynamicImage::new_rgba8(4, 4));
        params.source = ImageSource::Path(PathBuf::from("/no/such/image.png"));
        params.line_count = 0;

        assert!(matches!(
            convert(&params, &stub_fonts(), &CancellationToken::new()),
            Err(ConvertError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_palette_fails() {
        let mut params = params_for(DynamicImage::new_rgba8(4, 4));
        params.palette.clear();

        assert!(matches!(
            convert(&params, &stub_fonts(), &CancellationToken::new()),
            Err(ConvertError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unknown_font_family_fails() {
        let mut params = params_for(DynamicImage::new_rgba8(4, 4));
        params.font_family = "nope".to_string();

        assert!(matches!(
            convert(&params, &stub_fonts(), &CancellationToken::new()),
            Err(ConvertError::Render(_))
        ));
    }

    #[test]
    fn test_pre_cancelled_token_aborts() {
        let params = params_for(DynamicImage::new_rgba8(64, 64));
        let token = CancellationToken::new();
        token.cancel();

        assert!(matches!(
            convert(&params, &stub_fonts(), &token),
            Err(ConvertError::Cancelled)
        ));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let params = params_for(DynamicImage::new_rgba8(120, 90));
        let fonts = stub_fonts();
        let a = convert(&params, &fonts, &CancellationToken::new()).unwrap();
        let b = convert(&params, &fonts, &CancellationToken::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_block_reads_red_channel() {
        let mut canvas = image::RgbaImage::from_pixel(4, 4, Rgba([7, 200, 200, 255]));
        canvas.put_pixel(2, 2, Rgba([99, 0, 0, 255]));

        let block = GlyphBlockSize {
            width: 2,
            height: 2,
        };
        let mut out = [0u8; 4];
        extract_block(&canvas, 2, 2, block, &mut out);
        assert_eq!(out, [99, 7, 7, 7]);
    }
}
