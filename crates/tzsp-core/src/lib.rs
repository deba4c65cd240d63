//! TZSP core library: decoder, datagram sources and collector loop.
//!
//! TZSP (TaZmen Sniffer Protocol) carries frames captured by wireless sensors
//! over UDP, each prefixed by a header and a list of metadata tags. This
//! crate decodes those datagrams into owned `Packet` values:
//! sources (socket or capture file) -> collector (error policy) -> decoder.
//! Decoding is byte-oriented, pure and side-effect free; all I/O is isolated
//! in `source`, and the decision to skip or abort on a bad datagram lives in
//! `collector`.
//!
//! Invariants:
//! - A decoded packet is version 1, `ReceivedTagList`, and its tag list ends
//!   with exactly one `End` tag.
//! - Decoding the same bytes always yields the same packet or the same error.
//! - The encapsulated frame after `End` is returned untouched.
//!
//! # Examples
//! ```
//! use tzsp_core::{PacketType, decode};
//!
//! let packet = decode(&[0x01, 0x00, 0x00, 0x12, 0x12, 0x01, 0x06, 0x01, 0xaa])?;
//! assert_eq!(packet.header.packet_type, PacketType::ReceivedTagList);
//! print!("{packet}");
//! # Ok::<(), tzsp_core::DecodeError>(())
//! ```

mod collector;
mod protocols;
mod source;

pub use collector::{
    CollectError, CollectOptions, CollectSummary, DecodedDatagram, ErrorPolicy, collect,
};
pub use protocols::tzsp::{
    DecodeError, EncapsulatedProtocol, Header, Packet, PacketType, Tag, TagType, TagValue, decode,
};
pub use source::{
    CaptureDatagramSource, CaptureFrame, DEFAULT_LISTEN_ADDR, DEFAULT_TZSP_PORT, Datagram,
    DatagramSource, MAX_DATAGRAM_LEN, PcapFileSource, SourceError, UdpDatagramSource,
    ts_to_rfc3339,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn decoded_values_are_thread_safe() {
        assert_send_sync::<Packet>();
        assert_send_sync::<DecodeError>();
    }

    #[test]
    fn decode_from_multiple_threads() {
        let bytes = [0x01, 0x00, 0x00, 0x01, 0x0a, 0x01, 0x02, 0x01, 0x01, 0x02, 0x03];
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || decode(&bytes)))
            .collect();
        let expected = decode(&bytes).unwrap();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    }
}
