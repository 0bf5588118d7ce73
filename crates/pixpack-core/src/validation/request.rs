use crate::constants::{fields, MAX_DIMENSION};
use crate::models::{BatchResizeParams, ResizeParams, ResizeTarget};

/// Structured request validation failure.
///
/// Each variant names the constraint that failed and carries enough context
/// (field, index, value) for a precise client message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingFile { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyFiles { field: &'static str },

    #[error("{field} must be a non-negative integer, got {value}")]
    NegativeDimension { field: &'static str, value: i64 },

    #[error(
        "resizeHeight and resizeWidth must both be zero (no resize) or both be positive, got height={height} width={width}"
    )]
    OneSidedResize { height: i64, width: i64 },

    #[error("{field} must have {expected} values (one per file), got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} at index {index} must be a positive integer, got {value}")]
    NonPositiveDimension {
        field: &'static str,
        index: usize,
        value: i64,
    },

    #[error("{field} value {value} exceeds the maximum of {max}")]
    DimensionTooLarge {
        field: &'static str,
        value: i64,
        max: u32,
    },

    #[error("{field} must be an integer, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

impl ValidationError {
    /// Machine-readable name of the violated constraint.
    pub fn constraint(&self) -> &'static str {
        match self {
            ValidationError::MissingFile { .. } => "file_required",
            ValidationError::EmptyFiles { .. } => "files_non_empty",
            ValidationError::NegativeDimension { .. } => "dimension_non_negative",
            ValidationError::OneSidedResize { .. } => "resize_both_or_neither",
            ValidationError::LengthMismatch { .. } => "resize_length_matches_files",
            ValidationError::NonPositiveDimension { .. } => "dimension_positive",
            ValidationError::DimensionTooLarge { .. } => "dimension_in_range",
            ValidationError::InvalidNumber { .. } => "integer_field",
        }
    }
}

/// Parse an integer form value.
pub fn parse_dimension(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Validate the single-image request.
///
/// Returns `Ok(None)` when both dimensions are zero, meaning the image passes through
/// without a resize.
pub fn validate_single_resize(
    file_present: bool,
    params: ResizeParams,
) -> Result<Option<ResizeTarget>, ValidationError> {
    if !file_present {
        return Err(ValidationError::MissingFile {
            field: fields::FILE,
        });
    }

    if params.height < 0 {
        return Err(ValidationError::NegativeDimension {
            field: fields::RESIZE_HEIGHT,
            value: params.height,
        });
    }
    if params.width < 0 {
        return Err(ValidationError::NegativeDimension {
            field: fields::RESIZE_WIDTH,
            value: params.width,
        });
    }

    if params.is_no_resize() {
        return Ok(None);
    }

    if params.height == 0 || params.width == 0 {
        return Err(ValidationError::OneSidedResize {
            height: params.height,
            width: params.width,
        });
    }

    check_max(fields::RESIZE_HEIGHT, params.height)?;
    check_max(fields::RESIZE_WIDTH, params.width)?;

    Ok(ResizeTarget::new(params.width, params.height))
}

/// Validate a multi-file request without per-item parameters.
pub fn validate_files(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::EmptyFiles {
            field: fields::FILES,
        });
    }
    Ok(())
}

/// Validate a multi-file request with index-aligned resize arrays.
///
/// Unlike the single-image request there is no passthrough sentinel: every entry
/// must be strictly positive.
pub fn validate_batch_resize(
    count: usize,
    params: &BatchResizeParams,
) -> Result<Vec<ResizeTarget>, ValidationError> {
    validate_files(count)?;

    if params.heights.len() != count {
        return Err(ValidationError::LengthMismatch {
            field: fields::HEIGHTS,
            expected: count,
            actual: params.heights.len(),
        });
    }
    if params.widths.len() != count {
        return Err(ValidationError::LengthMismatch {
            field: fields::WIDTHS,
            expected: count,
            actual: params.widths.len(),
        });
    }

    params
        .heights
        .iter()
        .zip(&params.widths)
        .enumerate()
        .map(|(index, (&height, &width))| {
            check_positive(fields::HEIGHTS, index, height)?;
            check_positive(fields::WIDTHS, index, width)?;
            check_max(fields::HEIGHTS, height)?;
            check_max(fields::WIDTHS, width)?;
            ResizeTarget::new(width, height).ok_or(ValidationError::NonPositiveDimension {
                field: fields::HEIGHTS,
                index,
                value: height,
            })
        })
        .collect()
}

fn check_positive(field: &'static str, index: usize, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveDimension {
            field,
            index,
            value,
        });
    }
    Ok(())
}

fn check_max(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value > i64::from(MAX_DIMENSION) {
        return Err(ValidationError::DimensionTooLarge {
            field,
            value,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}
