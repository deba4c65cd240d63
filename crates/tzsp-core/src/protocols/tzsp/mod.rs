//! TZSP (TaZmen Sniffer Protocol) decoding.
//!
//! A datagram is a 4-byte header (version, packet type, big-endian
//! encapsulated protocol), a tag stream terminated by an `End` tag, and the
//! encapsulated frame. Only version 1 `ReceivedTagList` packets are decoded;
//! every other header is rejected before the tag stream is touched.
//!
//! `Padding` and `End` tags are a single byte; every other tag, known or not,
//! is `type, length, data[length]`. Unknown tag types are kept structurally.
//! Padding may appear anywhere and the first `End` terminates the stream.
//!
//! Offsets live in `layout`, bounds-checked access in `reader`, decoding in
//! `parser`. The encapsulated frame is never interpreted.

pub mod error;
pub mod layout;
pub mod packet;
pub mod parser;
pub mod reader;
pub mod types;
pub mod value;

pub use error::DecodeError;
pub use packet::{Header, Packet, Tag};
pub use parser::decode;
pub use types::{EncapsulatedProtocol, PacketType, TagType};
pub use value::TagValue;
