use crate::error::ConvertError;

/// Pixel dimensions of one character cell
///
/// Derived once per conversion: height = round(font_size * leading),
/// width = ceil(advance width of the representative glyph).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBlockSize {
    pub width: u32,
    pub height: u32,
}

/// Output grid geometry and the canvas the image is resampled to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlan {
    /// Number of output text lines
    pub rows: u32,
    /// Characters per line
    pub columns: u32,
    /// Resample target width = columns * block width
    pub canvas_width: u32,
    /// Resample target height = rows * block height
    pub canvas_height: u32,
}

/// Compute the output grid for an image and a requested line count
///
/// Pure arithmetic: the column count follows from the image aspect ratio
/// so that the rendered text keeps the image's proportions at the glyph
/// block's width/height ratio. Degenerate aspect ratios are clamped so
/// the grid always has at least one column.
///
/// # Arguments
/// * `image_width` - Source image width in pixels
/// * `image_height` - Source image height in pixels
/// * `line_count` - Requested number of output lines
/// * `block` - Pixel dimensions of one character cell
///
/// # Returns
/// The grid plan, or [`ConvertError::InvalidParameter`] when the aspect
/// ratio is not finite (zero image height).
pub fn plan(
    image_width: u32,
    image_height: u32,
    line_count: u32,
    block: GlyphBlockSize,
) -> Result<GridPlan, ConvertError> {
    let aspect_ratio = f64::from(image_width) / f64::from(image_height);
    if !aspect_ratio.is_finite() {
        return Err(ConvertError::InvalidParameter(format!(
            "degenerate image aspect ratio for {image_width}x{image_height} image"
        )));
    }

    let canvas_height = line_count * block.height;
    let columns =
        ((f64::from(canvas_height) * aspect_ratio / f64::from(block.width)).round() as u32).max(1);

    Ok(GridPlan {
        rows: line_count,
        columns,
        canvas_width: columns * block.width,
        canvas_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: GlyphBlockSize = GlyphBlockSize {
        width: 8,
        height: 16,
    };

    #[test]
    fn test_plan_landscape_image() {
        // 2:1 aspect, 10 lines of 16px blocks: round(10*16*2/8) = 40 columns
        let plan = plan(200, 100, 10, BLOCK).unwrap();
        assert_eq!(plan.rows, 10);
        assert_eq!(plan.columns, 40);
        assert_eq!(plan.canvas_width, 320);
        assert_eq!(plan.canvas_height, 160);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = plan(1920, 1080, 30, BLOCK).unwrap();
        let b = plan(1920, 1080, 30, BLOCK).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_square_image() {
        let plan = plan(100, 100, 5, BLOCK).unwrap();
        // round(5*16*1.0/8) = 10
        assert_eq!(plan.columns, 10);
        assert_eq!(plan.canvas_width, 80);
    }

    #[test]
    fn test_plan_zero_height_rejected() {
        assert!(matches!(
            plan(100, 0, 10, BLOCK),
            Err(ConvertError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_plan_extreme_aspect_keeps_one_column() {
        // round(1*16*(1/1000)/8) would be 0; the plan clamps to 1
        let plan = plan(1, 1000, 1, BLOCK).unwrap();
        assert_eq!(plan.columns, 1);
        assert_eq!(plan.canvas_width, BLOCK.width);
    }
}
