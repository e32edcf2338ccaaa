//! Datagram sinks used by the GELF transport.

#[cfg(any(test, feature = "test-util"))]
use std::collections::VecDeque;
use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    sync::Arc,
};

use parking_lot::Mutex;

use super::config::TransportConfig;

/// Destination for the datagrams of encoded messages.
///
/// `send_all` receives every datagram of one message. Implementations must
/// write them in order and must not interleave them with datagrams from
/// concurrent calls. The first failed write aborts the message.
pub trait DatagramSink: Send + Sync {
    fn send_all(&self, datagrams: &[Vec<u8>]) -> io::Result<()>;
}

impl<T: DatagramSink + ?Sized> DatagramSink for Arc<T> {
    fn send_all(&self, datagrams: &[Vec<u8>]) -> io::Result<()> {
        (**self).send_all(datagrams)
    }
}

impl<T: DatagramSink + ?Sized> DatagramSink for Box<T> {
    fn send_all(&self, datagrams: &[Vec<u8>]) -> io::Result<()> {
        (**self).send_all(datagrams)
    }
}

/// UDP socket connected to the configured collector.
#[derive(Debug)]
pub struct UdpSink {
    socket: Mutex<UdpSocket>,
    peer: SocketAddr,
}

impl UdpSink {
    /// Resolve the configured host and connect a socket bound to an
    /// ephemeral local port.
    pub fn connect(config: &TransportConfig) -> io::Result<Self> {
        let addrs: Vec<SocketAddr> = (config.host(), config.port()).to_socket_addrs()?.collect();
        let mut last_err = None;
        for addr in addrs {
            match connect_udp(addr) {
                Ok(socket) => {
                    socket.set_write_timeout(config.write_timeout())?;
                    return Ok(Self {
                        socket: Mutex::new(socket),
                        peer: addr,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("unable to resolve {}:{}", config.host(), config.port()),
            )
        }))
    }

    /// Address datagrams are sent to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

fn connect_udp(addr: SocketAddr) -> io::Result<UdpSocket> {
    let local: SocketAddr = match addr {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(local)?;
    socket.connect(addr)?;
    Ok(socket)
}

impl DatagramSink for UdpSink {
    fn send_all(&self, datagrams: &[Vec<u8>]) -> io::Result<()> {
        let socket = self.socket.lock();
        for datagram in datagrams {
            let written = socket.send(datagram)?;
            if written != datagram.len() {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("short datagram write: {written} of {} bytes", datagram.len()),
                ));
            }
        }
        Ok(())
    }
}

/// Messages a [`MemorySink`] keeps unless told otherwise.
#[cfg(any(test, feature = "test-util"))]
pub const MEMORY_SINK_RETAINED_MESSAGES: usize = 1024;

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
struct MemoryState {
    messages: VecDeque<Vec<Vec<u8>>>,
    accepted: usize,
}

/// Sink that keeps datagrams in memory, grouped per message.
///
/// Handy for inspecting exactly what would go on the wire. Only the most
/// recent `retained` messages are kept. `fail_after` makes the sink reject
/// writes once that many datagrams have been accepted in total.
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Debug)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
    retained: usize,
    fail_after: Option<usize>,
}

#[cfg(any(test, feature = "test-util"))]
impl Default for MemorySink {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            retained: MEMORY_SINK_RETAINED_MESSAGES,
            fail_after: None,
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that accepts `limit` datagrams and fails every write after that.
    pub fn failing_after(limit: usize) -> Self {
        Self {
            fail_after: Some(limit),
            ..Self::default()
        }
    }

    /// Keep only the newest `messages` messages; older ones are discarded.
    pub fn retaining(mut self, messages: usize) -> Self {
        self.retained = messages;
        self
    }

    /// Datagrams of the retained messages, one entry per message.
    pub fn messages(&self) -> Vec<Vec<Vec<u8>>> {
        self.state.lock().messages.iter().cloned().collect()
    }

    /// Datagrams of the retained messages, in write order.
    pub fn datagrams(&self) -> Vec<Vec<u8>> {
        self.state.lock().messages.iter().flatten().cloned().collect()
    }

    /// Datagrams accepted since creation, including discarded ones.
    pub fn accepted(&self) -> usize {
        self.state.lock().accepted
    }
}

#[cfg(any(test, feature = "test-util"))]
impl DatagramSink for MemorySink {
    fn send_all(&self, datagrams: &[Vec<u8>]) -> io::Result<()> {
        let mut state = self.state.lock();
        let allowed = self
            .fail_after
            .map_or(datagrams.len(), |limit| limit.saturating_sub(state.accepted));
        let taken = allowed.min(datagrams.len());
        if taken > 0 && self.retained > 0 {
            if state.messages.len() == self.retained {
                state.messages.pop_front();
            }
            state.messages.push_back(datagrams[..taken].to_vec());
        }
        state.accepted += taken;
        if taken < datagrams.len() {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "memory sink refused datagram",
            ));
        }
        Ok(())
    }
}
