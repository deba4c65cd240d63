pub const HEADER_LEN: usize = 4;

pub const VERSION_OFFSET: usize = 0;
pub const PACKET_TYPE_OFFSET: usize = 1;
pub const PROTOCOL_RANGE: std::ops::Range<usize> = 2..4;

pub const TAGS_OFFSET: usize = HEADER_LEN;

/// Bytes taken by a tag without length or data (`Padding`, `End`).
pub const BARE_TAG_LEN: usize = 1;
/// Type byte plus length byte of a length-prefixed tag.
pub const TAG_PREFIX_LEN: usize = 2;

pub const SUPPORTED_VERSION: u8 = 1;
