//! glyphmatch - image to ASCII art by glyph appearance matching
//!
//! Partitions an image into a grid of blocks sized to one rendered glyph,
//! rasterizes every palette character once, and replaces each block with
//! the character whose rendered bitmap has the lowest mean squared error
//! against the block's pixels.
//!
//! # Example
//! ```no_run
//! use glyphmatch::{convert, CancellationToken, ConversionParams, FontLibrary, ImageSource};
//!
//! let mut fonts = FontLibrary::new();
//! let font_bytes = std::fs::read("DejaVuSansMono.ttf").unwrap();
//! fonts.register_font_bytes("monospace", &font_bytes).unwrap();
//!
//! let params = ConversionParams::default_for(
//!     ImageSource::Path("photo.jpg".into()),
//!     "monospace",
//! );
//! let text = convert(&params, &fonts, &CancellationToken::new()).unwrap();
//! print!("{text}");
//! ```

pub mod cancel;
pub mod config;
pub mod convert;
pub mod error;
pub mod glyph;
pub mod grid;
pub mod matcher;
pub mod palette;
pub mod session;

// Re-export main types for convenience
pub use cancel::CancellationToken;
pub use config::{ConversionParams, ImageSource, DEFAULT_PALETTE};
pub use convert::convert;
pub use error::ConvertError;
pub use glyph::{FontLibrary, FontdueRasterizer, GlyphRasterizer};
pub use grid::{GlyphBlockSize, GridPlan};
pub use session::{ConversionMessage, ConversionSession};
