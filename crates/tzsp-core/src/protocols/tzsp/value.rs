use std::fmt;

use serde::Serialize;

use super::types::TagType;

/// Interpreted payload of a known metadata tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagValue {
    /// RSSI or noise level, sign-extended to 16 bits.
    Signal(i16),
    Unsigned(u32),
    Flag(bool),
    Text(String),
}

impl TagValue {
    /// Returns `None` for bare or unknown tags and for lengths that do not
    /// match the tag's encoding.
    pub fn interpret(tag_type: TagType, data: &[u8]) -> Option<Self> {
        match tag_type {
            TagType::RawRSSI | TagType::SNR => match *data {
                [value] => Some(TagValue::Signal(i16::from(value as i8))),
                [hi, lo] => Some(TagValue::Signal(i16::from_be_bytes([hi, lo]))),
                _ => None,
            },
            TagType::DataRate | TagType::RXChannel => match *data {
                [value] => Some(TagValue::Unsigned(u32::from(value))),
                _ => None,
            },
            TagType::RXFrameLength => match *data {
                [hi, lo] => Some(TagValue::Unsigned(u32::from(u16::from_be_bytes([hi, lo])))),
                _ => None,
            },
            TagType::Timestamp | TagType::PacketCount => match *data {
                [a, b, c, d] => Some(TagValue::Unsigned(u32::from_be_bytes([a, b, c, d]))),
                _ => None,
            },
            TagType::ContentionFree | TagType::Decrypted | TagType::FCSError => match *data {
                [0] => Some(TagValue::Flag(false)),
                [1] => Some(TagValue::Flag(true)),
                _ => None,
            },
            TagType::WLANRadioHDRSerial => {
                let raw = String::from_utf8_lossy(data);
                Some(TagValue::Text(raw.trim_end_matches('\0').trim().to_string()))
            }
            TagType::Padding | TagType::End | TagType::Unknown(_) => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Signal(value) => write!(f, "{value}"),
            TagValue::Unsigned(value) => write!(f, "{value}"),
            TagValue::Flag(value) => write!(f, "{value}"),
            TagValue::Text(value) => f.write_str(value),
        }
    }
}
