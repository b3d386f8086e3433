use thiserror::Error;

/// Failure taxonomy for a conversion run
///
/// Every error is caught at the orchestrator boundary; callers receive
/// exactly one of these per request and never a partial result.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Caller-fixable parameter problem (non-positive line count, empty
    /// palette, degenerate image aspect ratio). Reported immediately,
    /// never retried.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The image source could not be resolved or decoded (unreadable
    /// source, unsupported format, zero-sized image).
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    /// Glyph rasterization is unavailable (unknown font family or
    /// unparseable font data). Fatal for the current invocation.
    #[error("glyph rendering unavailable: {0}")]
    Render(String),

    /// The run was superseded or aborted. Not a user-visible failure;
    /// callers discard the settlement instead of displaying it.
    #[error("conversion cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConvertError::InvalidParameter("line_count must be > 0".into());
        assert!(err.to_string().contains("line_count"));

        let err = ConvertError::Cancelled;
        assert_eq!(err.to_string(), "conversion cancelled");
    }
}
