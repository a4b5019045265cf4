//! Async NETLINK_ROUTE socket.

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::BytesMut;
use netlink_sys::{Socket, SocketAddr, protocols};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;

use super::error::{Error, Result};

/// Receive buffer size; an error ACK echoes the request, which is small here.
const RECV_BUF_SIZE: usize = 32768;

/// Non-blocking rtnetlink socket driven by the tokio reactor.
pub struct NetlinkSocket {
    fd: AsyncFd<Socket>,
    seq: AtomicU32,
    /// Port id the kernel bound us to.
    pid: u32,
}

impl NetlinkSocket {
    /// Open and bind a NETLINK_ROUTE socket.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)?;
        socket.set_non_blocking(true)?;

        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;

        // Kernel error strings; not available on old kernels.
        if let Err(e) = socket.set_ext_ack(true) {
            tracing::debug!(error = %e, "extended ACK unavailable");
        }

        Ok(Self {
            fd: AsyncFd::new(socket)?,
            seq: AtomicU32::new(1),
            pid: addr.port_number(),
        })
    }

    pub fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Send one complete message.
    pub async fn send(&self, msg: &[u8]) -> Result<()> {
        let sent = self
            .when_ready(Interest::WRITABLE, |socket| socket.send(msg, 0))
            .await?;
        if sent != msg.len() {
            return Err(Error::Truncated {
                expected: msg.len(),
                actual: sent,
            });
        }
        Ok(())
    }

    /// Receive one datagram.
    pub async fn recv_msg(&self) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(RECV_BUF_SIZE);
        self.when_ready(Interest::READABLE, |socket| {
            buf.clear();
            socket.recv(&mut buf, 0)
        })
        .await?;
        Ok(buf)
    }

    /// Retry `op` until it stops reporting `WouldBlock`.
    async fn when_ready<R>(
        &self,
        interest: Interest,
        mut op: impl FnMut(&Socket) -> io::Result<R>,
    ) -> io::Result<R> {
        loop {
            let mut guard = self.fd.ready(interest).await?;
            if let Ok(result) = guard.try_io(|fd| op(fd.get_ref())) {
                return result;
            }
        }
    }
}
