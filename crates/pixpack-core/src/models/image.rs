use bytes::Bytes;
use std::fmt;

use crate::constants::{CONTENT_TYPE_JPEG, CONTENT_TYPE_PNG};

/// One uploaded image flowing through the pipeline.
///
/// Created by the materializer (one per accepted upload), replaced per index by the
/// orchestrator, and consumed by the archive writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub filename: String,
    /// Sniffed MIME type. Transforms that change the encoded format update it.
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageItem {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Replace the payload, keeping name and content type.
    pub fn with_bytes(self, bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            ..self
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Ordered set of MIME types a route accepts after sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedContentTypes(Vec<&'static str>);

impl AllowedContentTypes {
    pub fn new(types: &[&'static str]) -> Self {
        let mut unique: Vec<&'static str> = Vec::with_capacity(types.len());
        for ty in types {
            if !unique.contains(ty) {
                unique.push(ty);
            }
        }
        Self(unique)
    }

    pub fn png_only() -> Self {
        Self::new(&[CONTENT_TYPE_PNG])
    }

    pub fn png_or_jpeg() -> Self {
        Self::new(&[CONTENT_TYPE_PNG, CONTENT_TYPE_JPEG])
    }

    /// Compares the bare MIME type, ignoring parameters such as `charset`.
    pub fn contains(&self, content_type: &str) -> bool {
        let normalized = content_type
            .split(';')
            .next()
            .map(str::trim)
            .unwrap_or(content_type)
            .to_ascii_lowercase();
        self.0.iter().any(|allowed| *allowed == normalized)
    }

    pub fn as_slice(&self) -> &[&'static str] {
        &self.0
    }
}

impl fmt::Display for AllowedContentTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_content_types_contains() {
        let allowed = AllowedContentTypes::png_or_jpeg();
        assert!(allowed.contains("image/png"));
        assert!(allowed.contains("IMAGE/JPEG"));
        assert!(allowed.contains("image/jpeg; charset=binary"));
        assert!(!allowed.contains("image/gif"));
        assert!(!allowed.contains("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_allowed_content_types_dedup_preserves_order() {
        let allowed = AllowedContentTypes::new(&["image/jpeg", "image/png", "image/jpeg"]);
        assert_eq!(allowed.as_slice(), &["image/jpeg", "image/png"]);
        assert_eq!(allowed.to_string(), "image/jpeg, image/png");
    }

    #[test]
    fn test_image_item_with_bytes() {
        let item = ImageItem::new("a.png", "image/png", vec![1u8, 2, 3]);
        let replaced = item.with_bytes(vec![9u8]);
        assert_eq!(replaced.filename, "a.png");
        assert_eq!(replaced.content_type, "image/png");
        assert_eq!(replaced.len(), 1);
    }
}
