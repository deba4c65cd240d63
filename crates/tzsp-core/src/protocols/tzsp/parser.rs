use super::error::DecodeError;
use super::layout;
use super::packet::{Header, Packet, Tag};
use super::reader::TzspReader;
use super::types::{EncapsulatedProtocol, PacketType, TagType};

/// Decode one TZSP datagram.
///
/// Only version 1 `ReceivedTagList` packets are accepted. The returned tags
/// keep wire order and end with the first `End` tag; every byte after it is
/// the encapsulated frame.
///
/// # Examples
/// ```
/// use tzsp_core::{EncapsulatedProtocol, TagType, decode};
///
/// let bytes = [0x01, 0x00, 0x00, 0x01, 0x0a, 0x01, 0x02, 0x01, 0x01, 0x02, 0x03];
/// let packet = decode(&bytes)?;
/// assert_eq!(packet.header.protocol, EncapsulatedProtocol::Ethernet);
/// assert_eq!(packet.tags.len(), 2);
/// assert_eq!(packet.tags[1].tag_type, TagType::End);
/// assert_eq!(packet.trailing_data, vec![0x01, 0x02, 0x03]);
/// # Ok::<(), tzsp_core::DecodeError>(())
/// ```
///
/// # Errors
/// Returns `DecodeError` when the header is short or unsupported, a tag runs
/// past the end of the buffer, or no `End` tag is present.
pub fn decode(payload: &[u8]) -> Result<Packet, DecodeError> {
    let reader = TzspReader::new(payload);
    let header = parse_header(&reader)?;
    if header.version != layout::SUPPORTED_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            version: header.version,
        });
    }
    if header.packet_type != PacketType::ReceivedTagList {
        return Err(DecodeError::UnsupportedPacketType {
            packet_type: header.packet_type,
        });
    }

    let (tags, data_offset) = parse_tags(&reader, layout::TAGS_OFFSET)?;

    Ok(Packet {
        header,
        tags,
        trailing_data: reader.tail(data_offset).to_vec(),
    })
}

fn parse_header(reader: &TzspReader<'_>) -> Result<Header, DecodeError> {
    reader.require_header()?;
    let version = reader.read_u8(layout::VERSION_OFFSET)?;
    let packet_type = PacketType::from(reader.read_u8(layout::PACKET_TYPE_OFFSET)?);
    let protocol = EncapsulatedProtocol::from(reader.read_u16_be(layout::PROTOCOL_RANGE.clone())?);
    Ok(Header {
        version,
        packet_type,
        protocol,
    })
}

/// Parse tags from `offset` up to and including the first `End` tag.
///
/// Returns the tags and the offset of the first byte after `End`.
fn parse_tags(
    reader: &TzspReader<'_>,
    mut offset: usize,
) -> Result<(Vec<Tag>, usize), DecodeError> {
    let mut tags = Vec::new();
    while let Some(tag_type) = reader.read_tag_type(offset) {
        let (tag, consumed) = parse_tag(reader, tag_type, offset)?;
        offset += consumed;
        tags.push(tag);
        if tag_type == TagType::End {
            return Ok((tags, offset));
        }
    }
    Err(DecodeError::MissingEndTag { tags: tags.len() })
}

fn parse_tag(
    reader: &TzspReader<'_>,
    tag_type: TagType,
    offset: usize,
) -> Result<(Tag, usize), DecodeError> {
    if tag_type.is_bare() {
        return Ok((Tag::bare(tag_type), layout::BARE_TAG_LEN));
    }
    let length = reader.read_tag_len(tag_type, offset)?;
    let data = reader.read_tag_data(tag_type, offset, length)?;
    let tag = Tag {
        tag_type,
        length,
        data: data.to_vec(),
    };
    Ok((tag, layout::TAG_PREFIX_LEN + length as usize))
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::protocols::tzsp::error::DecodeError;
    use crate::protocols::tzsp::packet::Tag;
    use crate::protocols::tzsp::types::{EncapsulatedProtocol, PacketType, TagType};

    const HEADER: [u8; 4] = [0x01, 0x00, 0x00, 0x01];

    fn with_header(rest: &[u8]) -> Vec<u8> {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(rest);
        bytes
    }

    #[test]
    fn decode_valid_packet() {
        let packet = decode(&with_header(&[0x0a, 0x01, 0x02, 0x01, 0x01, 0x02, 0x03])).unwrap();
        assert_eq!(packet.header.version, 1);
        assert_eq!(packet.header.packet_type, PacketType::ReceivedTagList);
        assert_eq!(packet.header.protocol, EncapsulatedProtocol::Ethernet);
        assert_eq!(
            packet.tags,
            vec![
                Tag {
                    tag_type: TagType::RawRSSI,
                    length: 1,
                    data: vec![0x02],
                },
                Tag {
                    tag_type: TagType::End,
                    length: 0,
                    data: Vec::new(),
                },
            ]
        );
        assert_eq!(packet.trailing_data, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn decode_end_only_has_empty_trailing_data() {
        let packet = decode(&with_header(&[0x01])).unwrap();
        assert_eq!(packet.tags.len(), 1);
        assert!(packet.trailing_data.is_empty());
    }

    #[test]
    fn decode_short_header() {
        for len in 0..4 {
            let bytes = vec![0x01; len];
            assert_eq!(
                decode(&bytes).unwrap_err(),
                DecodeError::HeaderTooShort { actual: len }
            );
        }
    }

    #[test]
    fn version_checked_before_type() {
        let err = decode(&[0x02, 0x04, 0x00, 0x01, 0x01]).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedVersion { version: 2 });
    }

    #[test]
    fn header_checked_before_tags() {
        let err = decode(&[0x01, 0x04, 0x00, 0x01, 0x0a]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedPacketType {
                packet_type: PacketType::KeepAlive
            }
        );
    }

    #[test]
    fn truncated_tag_without_length() {
        let err = decode(&with_header(&[0x02])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedTag {
                tag_type: TagType::Unknown(0x02),
                offset: 4,
                ..
            }
        ));
    }

    #[test]
    fn truncated_tag_data() {
        let err = decode(&with_header(&[0x0a, 0x01])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedTag {
                tag_type: TagType::RawRSSI,
                needed: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_end_after_padding() {
        let err = decode(&with_header(&[0x00])).unwrap_err();
        assert_eq!(err, DecodeError::MissingEndTag { tags: 1 });
    }

    #[test]
    fn missing_end_with_no_tags() {
        let err = decode(&HEADER).unwrap_err();
        assert_eq!(err, DecodeError::MissingEndTag { tags: 0 });
    }

    #[test]
    fn first_end_wins() {
        let packet = decode(&with_header(&[0x00, 0x01, 0x0a, 0x01, 0x02, 0x01])).unwrap();
        let types: Vec<_> = packet.tags.iter().map(|t| t.tag_type).collect();
        assert_eq!(types, vec![TagType::Padding, TagType::End]);
        assert_eq!(packet.trailing_data, vec![0x0a, 0x01, 0x02, 0x01]);
    }

    #[test]
    fn zero_length_tag_with_prefix() {
        let packet = decode(&with_header(&[0x0c, 0x00, 0x01])).unwrap();
        assert_eq!(packet.tags[0].tag_type, TagType::DataRate);
        assert_eq!(packet.tags[0].length, 0);
        assert!(packet.tags[0].data.is_empty());
    }

    #[test]
    fn maximum_tag_length() {
        let mut rest = vec![0x3c, 0xff];
        rest.extend(std::iter::repeat_n(b'x', 255));
        rest.push(0x01);
        let packet = decode(&with_header(&rest)).unwrap();
        assert_eq!(packet.tags[0].length, 255);
        assert_eq!(packet.tags[0].data.len(), 255);
        assert!(packet.trailing_data.is_empty());
    }
}
