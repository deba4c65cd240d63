//! Decode loop over a datagram source.
//!
//! The collector owns the process-level decision the decoder leaves to its
//! caller: a datagram that fails to decode is either skipped (logged) or
//! aborts the run.

use std::net::SocketAddr;

use serde::Serialize;
use thiserror::Error;

use crate::protocols::tzsp::{DecodeError, Packet, decode};
use crate::source::{Datagram, DatagramSource, SourceError, ts_to_rfc3339};

/// What to do with a datagram that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the failure and continue with the next datagram.
    #[default]
    Skip,
    /// Stop and return the decode error.
    Abort,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    pub policy: ErrorPolicy,
    /// Stop after this many datagrams (decoded or not).
    pub limit: Option<u64>,
}

/// Successfully decoded datagram handed to the sink.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedDatagram {
    /// Zero-based position of the datagram in the source.
    pub index: u64,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_ts")]
    pub ts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<SocketAddr>,
    pub packet: Packet,
}

fn serialize_ts<S: serde::Serializer>(ts: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match ts_to_rfc3339(*ts) {
        Some(formatted) => serializer.serialize_str(&formatted),
        None => serializer.serialize_none(),
    }
}

/// Counters for one collector run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectSummary {
    pub datagrams_total: u64,
    pub decoded: u64,
    pub skipped: u64,
    /// RFC3339 timestamp of the first datagram (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last datagram (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("datagram {index}: {source}")]
    Decode { index: u64, source: DecodeError },
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read datagrams from `source`, decode each, and pass successes to `sink`.
///
/// # Examples
/// ```
/// use tzsp_core::{CollectOptions, Datagram, DatagramSource, SourceError, collect};
///
/// struct Replay(Vec<Vec<u8>>);
///
/// impl DatagramSource for Replay {
///     fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError> {
///         Ok(self.0.pop().map(|payload| Datagram { ts: None, peer: None, payload }))
///     }
/// }
///
/// let source = Replay(vec![vec![0x01, 0x00, 0x00, 0x01, 0x01], vec![0x02]]);
/// let mut packets = Vec::new();
/// let summary = collect(source, CollectOptions::default(), |decoded| {
///     packets.push(decoded.packet);
///     Ok(())
/// })?;
/// assert_eq!(summary.decoded, 1);
/// assert_eq!(summary.skipped, 1);
/// # Ok::<(), tzsp_core::CollectError>(())
/// ```
///
/// # Errors
/// Source and sink failures always abort; decode failures abort only under
/// `ErrorPolicy::Abort`.
pub fn collect<S, F>(
    mut source: S,
    options: CollectOptions,
    mut sink: F,
) -> Result<CollectSummary, CollectError>
where
    S: DatagramSource,
    F: FnMut(DecodedDatagram) -> std::io::Result<()>,
{
    let mut summary = CollectSummary::default();
    let mut first_ts = None;
    let mut last_ts = None;

    while options
        .limit
        .is_none_or(|limit| summary.datagrams_total < limit)
    {
        let Some(Datagram { ts, peer, payload }) = source.next_datagram()? else {
            break;
        };
        let index = summary.datagrams_total;
        summary.datagrams_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        match decode(&payload) {
            Ok(packet) => {
                tracing::trace!(index, len = payload.len(), tags = packet.tags.len(), "decoded datagram");
                summary.decoded += 1;
                sink(DecodedDatagram {
                    index,
                    ts,
                    peer,
                    packet,
                })?;
            }
            Err(source) if options.policy == ErrorPolicy::Abort => {
                return Err(CollectError::Decode { index, source });
            }
            Err(err) => {
                summary.skipped += 1;
                match peer {
                    Some(peer) => tracing::warn!(index, %peer, error = %err, "skipping datagram"),
                    None => tracing::warn!(index, error = %err, "skipping datagram"),
                }
            }
        }
    }

    summary.time_start = ts_to_rfc3339(first_ts);
    summary.time_end = ts_to_rfc3339(last_ts);
    Ok(summary)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}
