use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{Datagram, DatagramSource, MAX_DATAGRAM_LEN, SourceError};

/// Live collector socket: one TZSP datagram per `recv_from`.
///
/// Without an idle timeout the source blocks until the next datagram; with
/// one, a quiet period longer than the timeout ends the stream.
pub struct UdpDatagramSource {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpDatagramSource {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self, SourceError> {
        let socket = UdpSocket::bind(addr)?;
        tracing::info!(addr = %socket.local_addr()?, "listening for TZSP datagrams");
        Ok(Self {
            socket,
            buf: vec![0u8; MAX_DATAGRAM_LEN],
        })
    }

    pub fn with_idle_timeout(self, timeout: Option<Duration>) -> Result<Self, SourceError> {
        self.socket.set_read_timeout(timeout)?;
        Ok(self)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SourceError> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramSource for UdpDatagramSource {
    fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError> {
        match self.socket.recv_from(&mut self.buf) {
            Ok((len, peer)) => Ok(Some(Datagram {
                ts: now_seconds(),
                peer: Some(peer),
                payload: self.buf[..len].to_vec(),
            })),
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                tracing::debug!("idle timeout reached");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn now_seconds() -> Option<f64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|elapsed| elapsed.as_secs_f64())
}
