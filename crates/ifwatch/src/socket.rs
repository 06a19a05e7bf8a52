//! Blocking rtnetlink socket with poll-based readiness.

use std::io;
use std::os::unix::io::AsRawFd;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use netlink_sys::{protocols, Socket, SocketAddr};
use tracing::debug;

use crate::error::Result;

/// rtnetlink multicast groups this crate subscribes to.
pub mod rtnetlink_groups {
    /// Link state changes.
    pub const RTNLGRP_LINK: u32 = 1;
    /// IPv4 address changes.
    pub const RTNLGRP_IPV4_IFADDR: u32 = 5;
}

/// Receive buffer size. Large enough for a full dump chunk with stats64
/// blocks on every interface.
const RECV_BUF_LEN: usize = 65536;

/// A bound NETLINK_ROUTE socket.
///
/// All I/O is blocking; callers gate reads behind [`poll_read`] to bound
/// how long they wait.
///
/// [`poll_read`]: NetlinkSocket::poll_read
pub struct NetlinkSocket {
    socket: Socket,
    pid: u32,
}

impl NetlinkSocket {
    /// Open and bind a route socket, letting the kernel pick the port id.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)?;
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();
        debug!(pid, "bound rtnetlink socket");
        Ok(NetlinkSocket { socket, pid })
    }

    /// Port id the kernel assigned at bind time.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Join a multicast group.
    pub fn subscribe(&mut self, group: u32) -> Result<()> {
        self.socket.add_membership(group)?;
        debug!(group, "joined rtnetlink group");
        Ok(())
    }

    /// Send one request packet to the kernel.
    pub fn send(&self, packet: &[u8]) -> Result<()> {
        self.socket.send(packet, 0)?;
        Ok(())
    }

    /// Wait for the socket to become readable.
    ///
    /// Returns `Ok(true)` when data is waiting, `Ok(false)` on timeout.
    /// `None` waits forever. Interrupted waits retry with whatever time
    /// is left of the original budget.
    pub fn poll_read(&self, timeout: Option<Duration>) -> Result<bool> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut fds = [libc::pollfd {
            fd: self.socket.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        }];
        loop {
            let millis = match deadline {
                Some(d) => {
                    let left = d.saturating_duration_since(Instant::now());
                    i32::try_from(left.as_millis()).unwrap_or(i32::MAX)
                }
                None => -1,
            };
            // SAFETY: fds points at one valid pollfd for the call's duration.
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), 1, millis) };
            match rc {
                0 => return Ok(false),
                1 => return Ok(true),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() == io::ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }

    /// Receive one datagram. Blocks; call after `poll_read` says readable.
    pub fn recv(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(RECV_BUF_LEN);
        let len = self.socket.recv(&mut buf, 0)?;
        debug!(len, "received rtnetlink datagram");
        Ok(buf.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_read_honors_its_budget() {
        // Needs a route socket; skip where the environment forbids one.
        let Ok(socket) = NetlinkSocket::new() else {
            return;
        };
        let start = Instant::now();
        // No subscriptions and no request sent, so nothing is readable.
        let ready = socket.poll_read(Some(Duration::from_millis(20))).unwrap();
        assert!(!ready);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(15));
        assert!(elapsed < Duration::from_secs(2));
    }
}
