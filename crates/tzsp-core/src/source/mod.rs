//! Datagram sources feeding the TZSP decoder.
//!
//! A source yields one UDP payload at a time, either from a bound socket or
//! from a capture file. `Ok(None)` ends the stream. Sources own all I/O; the
//! decoder only ever sees byte slices.

mod pcap;
mod socket;

pub use pcap::{CaptureDatagramSource, CaptureFrame, PcapFileSource};
pub use socket::UdpDatagramSource;

use std::net::SocketAddr;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Default UDP port TZSP sensors send to.
pub const DEFAULT_TZSP_PORT: u16 = 37008;
/// Default bind address of the live collector.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:37008";
/// Largest UDP payload; receive buffers are sized to it.
pub const MAX_DATAGRAM_LEN: usize = 65535;

/// One UDP payload with its receive context.
#[derive(Debug, Clone, PartialEq)]
pub struct Datagram {
    /// Seconds since the Unix epoch, when known.
    pub ts: Option<f64>,
    pub peer: Option<SocketAddr>,
    pub payload: Vec<u8>,
}

pub trait DatagramSource {
    fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}

/// Format a Unix timestamp in seconds as RFC3339.
///
/// # Examples
/// ```
/// use tzsp_core::ts_to_rfc3339;
///
/// assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
/// assert_eq!(ts_to_rfc3339(None), None);
/// ```
pub fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
