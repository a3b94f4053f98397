//! Request/reply exchange over a connected UDP socket.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use log::debug;

use crate::errors::Error;
use crate::message::Message;
use crate::reply::Reply;
use crate::runtime::{self, AsyncUdpSocket, Instant, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

/// Size of the receive buffer for a single reply.
///
/// Replies seen from bulbs are well under this, but it is not a protocol
/// limit: anything longer is cut off and then fails to decode.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// A UDP socket dedicated to one light.
///
/// Each [`send_message`](Transport::send_message) is one datagram out and one
/// datagram back, with no retries. Calls are expected to be made one at a
/// time; concurrent calls may pick up each other's replies.
///
/// A reply that arrives after its call timed out stays queued on the socket
/// and is returned by the next call, which is then one reply behind.
pub struct Transport {
    socket: UdpSocket,
    timeout: Duration,
    label: String,
}

impl Transport {
    /// Bind an ephemeral local port and connect it to `addr`.
    pub async fn connect(addr: SocketAddr, timeout: Duration, label: &str) -> Result<Self> {
        let local: SocketAddr = match addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| Error::connection(addr, e))?;
        socket
            .connect(addr)
            .await
            .map_err(|e| Error::connection(addr, e))?;

        debug!("[{}] connected to {}", label, addr);

        Ok(Transport {
            socket,
            timeout,
            label: label.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name used to tag log lines for this light.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| Error::transport("inspect", e))
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.socket
            .peer_addr()
            .map_err(|e| Error::transport("inspect", e))
    }

    /// Send `msg` and wait for the reply.
    ///
    /// The send and the receive share one deadline of `timeout` from the
    /// start of the call.
    pub async fn send_message(&self, msg: &Message) -> Result<Reply> {
        let bytes = msg.encode()?;
        let start = Instant::now();

        let written = runtime::timeout(start.remaining(self.timeout), self.socket.send(&bytes))
            .await
            .map_err(|_| Error::timeout("send", self.timeout))?
            .map_err(|e| Error::transport("write to", e))?;

        debug!("[{}] written to udp connection: bytes={}", self.label, written);

        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        let read = runtime::timeout(
            start.remaining(self.timeout),
            self.socket.recv(&mut buffer),
        )
        .await
        .map_err(|_| Error::timeout("receive", self.timeout))?
        .map_err(|e| Error::transport("read from", e))?;

        let reply = Reply::decode(&buffer[..read])?;

        debug!("[{}] message received: {}", self.label, reply);

        Ok(reply)
    }
}
