use super::error::DecodeError;
use super::layout;
use super::types::TagType;

/// Bounds-checked access to a TZSP datagram.
///
/// Header reads fail with `HeaderTooShort`; tag reads fail with
/// `TruncatedTag` carrying the offending tag and offset.
pub struct TzspReader<'a> {
    payload: &'a [u8],
}

impl<'a> TzspReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_header(&self) -> Result<(), DecodeError> {
        if self.payload.len() < layout::HEADER_LEN {
            return Err(DecodeError::HeaderTooShort {
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(DecodeError::HeaderTooShort {
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, DecodeError> {
        match self.payload.get(range) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(DecodeError::HeaderTooShort {
                actual: self.payload.len(),
            }),
        }
    }

    /// Tag type byte at `offset`; callers only ask for offsets inside the buffer.
    pub fn read_tag_type(&self, offset: usize) -> Option<TagType> {
        self.payload.get(offset).copied().map(TagType::from)
    }

    pub fn read_tag_len(&self, tag_type: TagType, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset + 1)
            .copied()
            .ok_or_else(|| self.truncated(tag_type, offset, layout::TAG_PREFIX_LEN))
    }

    pub fn read_tag_data(
        &self,
        tag_type: TagType,
        offset: usize,
        length: u8,
    ) -> Result<&'a [u8], DecodeError> {
        let start = offset + layout::TAG_PREFIX_LEN;
        let end = start + length as usize;
        self.payload
            .get(start..end)
            .ok_or_else(|| self.truncated(tag_type, offset, end - offset))
    }

    /// Everything from `offset` to the end of the buffer.
    pub fn tail(&self, offset: usize) -> &'a [u8] {
        self.payload.get(offset..).unwrap_or(&[])
    }

    fn truncated(&self, tag_type: TagType, offset: usize, needed: usize) -> DecodeError {
        DecodeError::TruncatedTag {
            tag_type,
            offset,
            needed,
            actual: self.payload.len().saturating_sub(offset),
        }
    }
}
