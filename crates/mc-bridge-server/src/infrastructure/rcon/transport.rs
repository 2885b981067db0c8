//! Transport seam for the RCON client.
//!
//! The client never opens sockets directly; it asks a [`Connector`] for a
//! byte stream.  Production code uses [`TcpConnector`], tests use the
//! in-memory [`super::mock::MockConnector`].

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Opens byte streams to an RCON server.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The stream type produced by [`Connector::connect`].
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Connects to `addr` (`host:port`).
    async fn connect(&self, addr: &str) -> std::io::Result<Self::Stream>;
}

/// [`Connector`] backed by tokio TCP sockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: &str) -> std::io::Result<TcpStream> {
        let stream = TcpStream::connect(addr).await?;
        // Requests are tiny and strictly request/reply.
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
