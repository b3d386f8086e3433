use crate::error::ConvertError;
use image::{DynamicImage, RgbaImage};
use std::path::PathBuf;

/// Default character palette (mixed punctuation plus a few letters)
pub const DEFAULT_PALETTE: &str = "*+=-:.' \\|/_^~<>(){}[]EYMONeymon";

/// Default number of output lines
pub const DEFAULT_LINE_COUNT: u32 = 30;

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Default leading (line-height multiplier applied to the font size)
pub const DEFAULT_LEADING: f32 = 1.6;

/// An image reference resolvable to raw pixel data
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A file on disk, decoded with the `image` crate
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...) held in memory
    Memory(Vec<u8>),
    /// An already-decoded image supplied by the caller
    Decoded(DynamicImage),
}

impl ImageSource {
    /// Resolve the source into a pixel-addressable RGBA surface
    ///
    /// # Returns
    /// The decoded image, or [`ConvertError::ImageDecode`] when the source
    /// is unreadable, the format unsupported, or the image has zero pixels.
    pub fn decode(&self) -> Result<RgbaImage, ConvertError> {
        let rgba = match self {
            ImageSource::Path(path) => image::open(path)
                .map_err(|e| ConvertError::ImageDecode(e.to_string()))?
                .to_rgba8(),
            ImageSource::Memory(bytes) => image::load_from_memory(bytes)
                .map_err(|e| ConvertError::ImageDecode(e.to_string()))?
                .to_rgba8(),
            ImageSource::Decoded(img) => img.to_rgba8(),
        };

        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(ConvertError::ImageDecode(
                "image has zero pixel dimensions".to_string(),
            ));
        }

        Ok(rgba)
    }
}

/// Parameters for one conversion request
#[derive(Debug, Clone)]
pub struct ConversionParams {
    /// Where the input pixels come from
    pub source: ImageSource,
    /// Number of output text lines (must be > 0)
    pub line_count: u32,
    /// Font size in pixels used to rasterize palette glyphs
    pub font_size: f32,
    /// Ordered candidate characters (non-empty; repeats allowed)
    pub palette: String,
    /// Font family name, resolved through a [`crate::glyph::FontLibrary`]
    pub font_family: String,
    /// Line-height multiplier; block height = round(font_size * leading)
    pub leading: f32,
}

impl ConversionParams {
    /// Build params with the stock palette, line count, size, and leading
    pub fn default_for(source: ImageSource, font_family: impl Into<String>) -> Self {
        Self {
            source,
            line_count: DEFAULT_LINE_COUNT,
            font_size: DEFAULT_FONT_SIZE,
            palette: DEFAULT_PALETTE.to_string(),
            font_family: font_family.into(),
            leading: DEFAULT_LEADING,
        }
    }

    /// Validates the request parameters
    ///
    /// Runs before any image decode is attempted, so a bad request never
    /// touches the image source.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.line_count == 0 {
            return Err(ConvertError::InvalidParameter(
                "line_count must be greater than 0".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(ConvertError::InvalidParameter(
                "palette must not be empty".to_string(),
            ));
        }
        if !(self.font_size > 0.0 && self.font_size.is_finite()) {
            return Err(ConvertError::InvalidParameter(format!(
                "font_size must be a positive number, got {}",
                self.font_size
            )));
        }
        if !(self.leading > 0.0 && self.leading.is_finite()) {
            return Err(ConvertError::InvalidParameter(format!(
                "leading must be a positive number, got {}",
                self.leading
            )));
        }
        Ok(())
    }
}
