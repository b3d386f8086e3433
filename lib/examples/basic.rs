/// Basic example: convert a synthetic test image to ASCII art
///
/// Usage: cargo run --example basic -- <font.ttf> [image]
///
/// Renders a white circle on a dark background (or the image you pass)
/// and prints the ASCII approximation to stdout.
use glyphmatch::{convert, CancellationToken, ConversionParams, FontLibrary, ImageSource};
use image::{DynamicImage, Rgba, RgbaImage};

fn main() {
    let mut args = std::env::args().skip(1);
    let font_path = args.next().expect("usage: basic <font.ttf> [image]");
    let image_path = args.next();

    let font_bytes = std::fs::read(&font_path).expect("failed to read font file");
    let mut fonts = FontLibrary::new();
    fonts
        .register_font_bytes("mono", &font_bytes)
        .expect("failed to parse font");

    let source = match image_path {
        Some(path) => ImageSource::Path(path.into()),
        None => ImageSource::Decoded(test_image()),
    };

    let mut params = ConversionParams::default_for(source, "mono");
    params.line_count = 24;

    match convert(&params, &fonts, &CancellationToken::new()) {
        Ok(text) => print!("{text}"),
        Err(err) => eprintln!("conversion failed: {err}"),
    }
}

/// A 256x256 white circle with a soft falloff on a dark background
fn test_image() -> DynamicImage {
    let size = 256u32;
    let mut img = RgbaImage::new(size, size);
    let center = size as f32 / 2.0;
    let radius = size as f32 / 3.0;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            let v = if dist < radius {
                255
            } else {
                // fade to black over 20px
                (255.0 * (1.0 - ((dist - radius) / 20.0).min(1.0))) as u8
            };
            img.put_pixel(x, y, Rgba([v, v, v, 255]));
        }
    }

    DynamicImage::ImageRgba8(img)
}
