use thiserror::Error;

use super::types::{PacketType, TagType};

/// Errors returned by TZSP decoding.
///
/// # Examples
/// ```
/// use tzsp_core::{DecodeError, decode};
///
/// let err = decode(&[0x01, 0x00, 0x00]).unwrap_err();
/// assert!(matches!(err, DecodeError::HeaderTooShort { actual: 3 }));
/// assert!(err.to_string().contains("header too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("header too short: need 4 bytes, got {actual}")]
    HeaderTooShort { actual: usize },
    #[error("unsupported version: {version}")]
    UnsupportedVersion { version: u8 },
    #[error("unsupported packet type: {packet_type}")]
    UnsupportedPacketType { packet_type: PacketType },
    #[error("truncated tag {tag_type} at offset {offset}: need {needed} bytes, got {actual}")]
    TruncatedTag {
        tag_type: TagType,
        offset: usize,
        needed: usize,
        actual: usize,
    },
    #[error("packet truncated (no END tag) after {tags} tags")]
    MissingEndTag { tags: usize },
}
