use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::types::{EncapsulatedProtocol, PacketType, TagType};
use super::value::TagValue;

/// Fixed 4-byte TZSP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub version: u8,
    #[serde(rename = "type")]
    pub packet_type: PacketType,
    #[serde(rename = "proto")]
    pub protocol: EncapsulatedProtocol,
}

/// One metadata tag in wire order.
///
/// `length` always equals `data.len()`; both are zero for `Padding` and `End`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub tag_type: TagType,
    pub length: u8,
    pub data: Vec<u8>,
}

impl Tag {
    pub(crate) fn bare(tag_type: TagType) -> Self {
        Self {
            tag_type,
            length: 0,
            data: Vec::new(),
        }
    }

    /// Interpreted value of a known metadata tag, when its length matches
    /// the documented encoding.
    ///
    /// # Examples
    /// ```
    /// use tzsp_core::{TagValue, decode};
    ///
    /// let packet = decode(&[0x01, 0x00, 0x00, 0x01, 0x0a, 0x01, 0xc4, 0x01]).unwrap();
    /// assert_eq!(packet.tags[0].value(), Some(TagValue::Signal(-60)));
    /// assert_eq!(packet.tags[1].value(), None);
    /// ```
    pub fn value(&self) -> Option<TagValue> {
        TagValue::interpret(self.tag_type, &self.data)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.value();
        let fields = if value.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("Tag", fields)?;
        state.serialize_field("type", &self.tag_type)?;
        state.serialize_field("length", &self.length)?;
        state.serialize_field("data", &self.data)?;
        match value {
            Some(value) => state.serialize_field("value", &value)?,
            None => state.skip_field("value")?,
        }
        state.end()
    }
}

/// Decoded TZSP packet: header, tags ending with `End`, encapsulated frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    pub header: Header,
    pub tags: Vec<Tag>,
    pub trailing_data: Vec<u8>,
}

impl Packet {
    /// First tag of the given type, if present.
    pub fn tag(&self, tag_type: TagType) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.tag_type == tag_type)
    }

    /// Tags carrying metadata, i.e. everything except `Padding` and `End`.
    pub fn metadata(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|tag| !tag.tag_type.is_bare())
    }
}

/// Multi-line diagnostic rendering: header, one line per tag, trailing bytes.
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version: {}, Type: {}, Proto: {}",
            self.header.version, self.header.packet_type, self.header.protocol
        )?;
        for tag in &self.tags {
            write!(
                f,
                "\n  - Type: {}, Len: {}, Data: {}",
                tag.tag_type,
                tag.length,
                ByteList(&tag.data)
            )?;
        }
        writeln!(f, "\n    Data: {}", ByteList(&self.trailing_data))
    }
}

struct ByteList<'a>(&'a [u8]);

impl fmt::Display for ByteList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, byte) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte}")?;
        }
        f.write_str("]")
    }
}
