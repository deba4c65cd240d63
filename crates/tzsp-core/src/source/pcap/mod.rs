//! PCAP/PCAPNG capture sources.
//!
//! `PcapFileSource` reads raw link-layer frames from a capture file;
//! `CaptureDatagramSource` slices those frames down to the UDP payloads
//! addressed to the TZSP port so recorded sensor traffic can be replayed
//! through the same collector as a live socket.

pub mod datagrams;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod udp;

pub use datagrams::CaptureDatagramSource;
pub use parser::{CaptureFrame, PcapFileSource};
