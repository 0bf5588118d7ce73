/// Validated resize target. Both axes are strictly positive.
///
/// Only the request validators construct these, so downstream code never has to
/// re-check for zero or negative dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget {
    width: u32,
    height: u32,
}

impl ResizeTarget {
    /// Returns `None` unless both dimensions are positive and fit in `u32`.
    pub fn new(width: i64, height: i64) -> Option<Self> {
        let width = u32::try_from(width).ok().filter(|w| *w > 0)?;
        let height = u32::try_from(height).ok().filter(|h| *h > 0)?;
        Some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Scalar resize parameters of the single-image endpoint, as sent by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeParams {
    pub height: i64,
    pub width: i64,
}

impl ResizeParams {
    pub fn is_no_resize(&self) -> bool {
        self.height == 0 && self.width == 0
    }
}

/// Per-item resize arrays of the batch endpoints, index-aligned with the uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResizeParams {
    pub heights: Vec<i64>,
    pub widths: Vec<i64>,
}
