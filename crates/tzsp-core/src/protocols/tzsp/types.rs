//! Header and tag enumerations.
//!
//! Every enumeration keeps an `Unknown` variant carrying the raw wire value,
//! so conversion from the wire never fails and displaying an unrecognized
//! value falls back to `<EnumName>(<value>)`.

use std::fmt;

use serde::{Serialize, Serializer};

/// TZSP packet type (header byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    ReceivedTagList,
    PacketForTransmit,
    Reserved,
    Configuration,
    KeepAlive,
    PortOpener,
    Unknown(u8),
}

impl PacketType {
    pub fn value(self) -> u8 {
        match self {
            PacketType::ReceivedTagList => 0,
            PacketType::PacketForTransmit => 1,
            PacketType::Reserved => 2,
            PacketType::Configuration => 3,
            PacketType::KeepAlive => 4,
            PacketType::PortOpener => 5,
            PacketType::Unknown(value) => value,
        }
    }
}

impl From<u8> for PacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => PacketType::ReceivedTagList,
            1 => PacketType::PacketForTransmit,
            2 => PacketType::Reserved,
            3 => PacketType::Configuration,
            4 => PacketType::KeepAlive,
            5 => PacketType::PortOpener,
            other => PacketType::Unknown(other),
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketType::ReceivedTagList => f.write_str("ReceivedTagList"),
            PacketType::PacketForTransmit => f.write_str("PacketForTransmit"),
            PacketType::Reserved => f.write_str("Reserved"),
            PacketType::Configuration => f.write_str("Configuration"),
            PacketType::KeepAlive => f.write_str("KeepAlive"),
            PacketType::PortOpener => f.write_str("PortOpener"),
            PacketType::Unknown(value) => write!(f, "PacketType({value})"),
        }
    }
}

/// Protocol of the encapsulated frame (header bytes 2-3, big-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncapsulatedProtocol {
    Ethernet,
    IEEE80211,
    PrismHeader,
    WLANAVS,
    Unknown(u16),
}

impl EncapsulatedProtocol {
    pub fn value(self) -> u16 {
        match self {
            EncapsulatedProtocol::Ethernet => 0x01,
            EncapsulatedProtocol::IEEE80211 => 0x12,
            EncapsulatedProtocol::PrismHeader => 0x77,
            EncapsulatedProtocol::WLANAVS => 0x7f,
            EncapsulatedProtocol::Unknown(value) => value,
        }
    }
}

impl From<u16> for EncapsulatedProtocol {
    fn from(value: u16) -> Self {
        match value {
            0x01 => EncapsulatedProtocol::Ethernet,
            0x12 => EncapsulatedProtocol::IEEE80211,
            0x77 => EncapsulatedProtocol::PrismHeader,
            0x7f => EncapsulatedProtocol::WLANAVS,
            other => EncapsulatedProtocol::Unknown(other),
        }
    }
}

impl fmt::Display for EncapsulatedProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncapsulatedProtocol::Ethernet => f.write_str("Ethernet"),
            EncapsulatedProtocol::IEEE80211 => f.write_str("IEEE80211"),
            EncapsulatedProtocol::PrismHeader => f.write_str("PrismHeader"),
            EncapsulatedProtocol::WLANAVS => f.write_str("WLANAVS"),
            EncapsulatedProtocol::Unknown(value) => write!(f, "EncapsulatedProtocol({value})"),
        }
    }
}

/// Tag type (first byte of every tag).
///
/// `Padding` and `End` carry neither length nor data. `End` is the only
/// mandatory tag; the encapsulated frame follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    Padding,
    End,
    /// Raw RSSI from the sensor, signed byte or signed short.
    RawRSSI,
    /// Raw noise from the sensor, signed byte or signed short.
    SNR,
    DataRate,
    /// Sensor MAC receive time, 4-byte unsigned.
    Timestamp,
    ContentionFree,
    Decrypted,
    /// 1 when the frame had an FCS error, 0 otherwise.
    FCSError,
    /// Channel the sensor was tuned to, not necessarily the transmit channel.
    RXChannel,
    /// Monotonic packet counter, 4-byte unsigned.
    PacketCount,
    /// Received length of the frame before any truncation, 2-byte unsigned.
    RXFrameLength,
    /// Vendor-specific sensor serial or identifier, variable length.
    WLANRadioHDRSerial,
    Unknown(u8),
}

impl TagType {
    pub fn value(self) -> u8 {
        match self {
            TagType::Padding => 0x00,
            TagType::End => 0x01,
            TagType::RawRSSI => 0x0a,
            TagType::SNR => 0x0b,
            TagType::DataRate => 0x0c,
            TagType::Timestamp => 0x0d,
            TagType::ContentionFree => 0x0f,
            TagType::Decrypted => 0x10,
            TagType::FCSError => 0x11,
            TagType::RXChannel => 0x12,
            TagType::PacketCount => 0x28,
            TagType::RXFrameLength => 0x29,
            TagType::WLANRadioHDRSerial => 0x3c,
            TagType::Unknown(value) => value,
        }
    }

    /// Whether the tag is a single byte on the wire.
    pub fn is_bare(self) -> bool {
        matches!(self, TagType::Padding | TagType::End)
    }
}

impl From<u8> for TagType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => TagType::Padding,
            0x01 => TagType::End,
            0x0a => TagType::RawRSSI,
            0x0b => TagType::SNR,
            0x0c => TagType::DataRate,
            0x0d => TagType::Timestamp,
            0x0f => TagType::ContentionFree,
            0x10 => TagType::Decrypted,
            0x11 => TagType::FCSError,
            0x12 => TagType::RXChannel,
            0x28 => TagType::PacketCount,
            0x29 => TagType::RXFrameLength,
            0x3c => TagType::WLANRadioHDRSerial,
            other => TagType::Unknown(other),
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagType::Padding => "Padding",
            TagType::End => "End",
            TagType::RawRSSI => "RawRSSI",
            TagType::SNR => "SNR",
            TagType::DataRate => "DataRate",
            TagType::Timestamp => "Timestamp",
            TagType::ContentionFree => "ContentionFree",
            TagType::Decrypted => "Decrypted",
            TagType::FCSError => "FCSError",
            TagType::RXChannel => "RXChannel",
            TagType::PacketCount => "PacketCount",
            TagType::RXFrameLength => "RXFrameLength",
            TagType::WLANRadioHDRSerial => "WLANRadioHDRSerial",
            TagType::Unknown(value) => return write!(f, "TagType({value})"),
        };
        f.write_str(name)
    }
}

impl Serialize for PacketType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for EncapsulatedProtocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for TagType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
