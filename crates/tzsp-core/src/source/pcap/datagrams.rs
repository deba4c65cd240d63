use std::path::Path;

use crate::source::{Datagram, DatagramSource, SourceError};

use super::parser::PcapFileSource;
use super::udp::parse_udp_datagram;

/// UDP payloads sent to one destination port, replayed from a capture file.
pub struct CaptureDatagramSource {
    frames: PcapFileSource,
    port: u16,
    frames_seen: u64,
}

impl CaptureDatagramSource {
    pub fn open(path: &Path, port: u16) -> Result<Self, SourceError> {
        Ok(Self::new(PcapFileSource::open(path)?, port))
    }

    pub fn new(frames: PcapFileSource, port: u16) -> Self {
        Self {
            frames,
            port,
            frames_seen: 0,
        }
    }

    /// Capture frames read so far, matching or not.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl DatagramSource for CaptureDatagramSource {
    fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError> {
        while let Some(frame) = self.frames.next_frame()? {
            self.frames_seen += 1;
            let udp = match parse_udp_datagram(frame.linktype, &frame.data) {
                Ok(Some(udp)) => udp,
                Ok(None) => {
                    tracing::debug!(
                        frame = self.frames_seen,
                        linktype = frame.linktype.0,
                        "skipping non-UDP frame"
                    );
                    continue;
                }
                Err(err) => {
                    tracing::debug!(frame = self.frames_seen, error = %err, "skipping frame");
                    continue;
                }
            };
            if udp.dst.port() != self.port {
                continue;
            }
            return Ok(Some(Datagram {
                ts: frame.ts,
                peer: Some(udp.src),
                payload: udp.payload.to_vec(),
            }));
        }
        Ok(None)
    }
}
