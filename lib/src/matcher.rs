use crate::error::ConvertError;
use crate::palette::PaletteEntry;

/// Mean squared error between two equally sized intensity buffers
///
/// # Arguments
/// * `a` - First sample buffer
/// * `b` - Second sample buffer (same length as `a`)
///
/// # Returns
/// Average of the per-sample squared differences
pub fn mean_squared_error(a: &[u8], b: &[u8]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let sum: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = i64::from(x) - i64::from(y);
            (diff * diff) as u64
        })
        .sum();
    sum as f64 / a.len() as f64
}

/// Pick the palette character whose reference bitmap best matches a block
///
/// Scans the palette in order with a strictly-less comparison, so ties
/// resolve to the earliest character in the palette string. Block and
/// reference bitmaps share the same block dimensions, so samples compare
/// position-by-position with no realignment.
///
/// This is the hot path of a conversion (every pixel of every block
/// against every palette glyph); the loop stays allocation-free.
///
/// # Arguments
/// * `block` - Single-channel samples of one image block
/// * `palette` - The shared reference bitmap cache
///
/// # Returns
/// The best-matching character, or [`ConvertError::InvalidParameter`] for
/// an empty palette (normally rejected upstream).
pub fn best_match(block: &[u8], palette: &[PaletteEntry]) -> Result<char, ConvertError> {
    let mut best_char = None;
    let mut min_mse = f64::INFINITY;

    for entry in palette {
        let mse = mean_squared_error(block, &entry.reference);
        if mse < min_mse {
            min_mse = mse;
            best_char = Some(entry.ch);
        }
    }

    best_char.ok_or_else(|| ConvertError::InvalidParameter("palette must not be empty".to_string()))
}
