//! Socket bookkeeping for the modem's buffered data plane.
//!
//! The modem owns the actual TCP/TLS machinery; the host tracks one
//! [`Socket`] record per connect id so that API calls can be refused before
//! they reach the wire. State only ever moves forward
//! (`Allocated → Connecting → Connected → Disconnected → Closed`), except
//! that a failed connect puts the socket back to `Allocated` for a retry.

use no_std_net::IpAddr;

use crate::command::psn::types::ContextId;
use crate::command::ssl::types::SslContextId;

/// Socket registry errors.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidSocket,
    SocketSetFull,
    DuplicateSocket,
    /// Operation is not legal in the socket's current state.
    Illegal,
    /// Data transfer attempted before the connect settled.
    NotConnected,
    /// Data transfer attempted after the socket went away.
    Closed,
}

type Result<T> = core::result::Result<T, Error>;

/// Modem-side connect id, 0..=11 on this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketHandle(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketState {
    /// Registered, no connect attempted yet.
    Allocated,
    /// `AT+QIOPEN`/`AT+QSSLOPEN` accepted, waiting for the result URC.
    Connecting,
    Connected,
    /// The peer or the network closed it; only close+remove remains.
    Disconnected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    Tcp,
    UdpService,
    /// TLS over TCP through the given modem-side TLS context.
    Tls(SslContextId),
}

/// Whether remote addressing happens over v4 or v6 literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressFamily {
    V4,
    V6,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socket {
    pub handle: SocketHandle,
    pub context_id: ContextId,
    pub protocol: Protocol,
    pub remote_ip: IpAddr,
    pub remote_port: u16,
    /// Ignored by the modem for TLS sockets.
    pub local_port: u16,
    pub send_timeout_ms: u32,
    pub recv_timeout_ms: u32,
    state: SocketState,
}

impl Socket {
    pub fn new(
        handle: SocketHandle,
        context_id: ContextId,
        protocol: Protocol,
        remote_ip: IpAddr,
        remote_port: u16,
        local_port: u16,
    ) -> Self {
        Self {
            handle,
            context_id,
            protocol,
            remote_ip,
            remote_port,
            local_port,
            send_timeout_ms: crate::module_timing::timeout_ms::DATA_SEND,
            recv_timeout_ms: crate::module_timing::timeout_ms::DATA_READ,
            state: SocketState::Allocated,
        }
    }

    pub fn state(&self) -> SocketState {
        self.state
    }

    pub fn address_family(&self) -> AddressFamily {
        match self.remote_ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    /// A connect command went out.
    pub fn connect_initiated(&mut self) -> Result<()> {
        match self.state {
            SocketState::Allocated => {
                self.state = SocketState::Connecting;
                Ok(())
            }
            _ => Err(Error::Illegal),
        }
    }

    /// The connect command failed or timed out before the result URC; the
    /// socket is reusable.
    pub fn connect_aborted(&mut self) {
        if self.state == SocketState::Connecting {
            self.state = SocketState::Allocated;
        }
    }

    /// `+QIOPEN`/`+QSSLOPEN` URC verdict.
    pub fn connect_result(&mut self, connected: bool) {
        if self.state == SocketState::Connecting {
            self.state = if connected {
                SocketState::Connected
            } else {
                SocketState::Allocated
            };
        }
    }

    /// `+QIURC: "closed"` / `+QSSLURC: "closed"`.
    pub fn remote_closed(&mut self) {
        if matches!(self.state, SocketState::Connecting | SocketState::Connected) {
            self.state = SocketState::Disconnected;
        }
    }

    /// The host issued a close; terminal regardless of the previous state.
    pub fn closed(&mut self) {
        self.state = SocketState::Closed;
    }

    /// Send/receive/statistics gate.
    pub fn ensure_connected(&self) -> Result<()> {
        match self.state {
            SocketState::Connected => Ok(()),
            SocketState::Allocated | SocketState::Connecting => Err(Error::NotConnected),
            SocketState::Disconnected | SocketState::Closed => Err(Error::Closed),
        }
    }

    /// Whether a close command is worth sending at all.
    pub fn closeable(&self) -> bool {
        matches!(
            self.state,
            SocketState::Connecting | SocketState::Connected | SocketState::Disconnected
        )
    }
}

/// Fixed-capacity socket registry. Handles stay unique for as long as the
/// socket is registered.
pub struct SocketSet<const N: usize> {
    sockets: [Option<Socket>; N],
}

impl<const N: usize> Default for SocketSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SocketSet<N> {
    pub const fn new() -> Self {
        Self {
            sockets: [const { None }; N],
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.sockets.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, socket: Socket) -> Result<SocketHandle> {
        let handle = socket.handle;
        if self.get(handle).is_ok() {
            return Err(Error::DuplicateSocket);
        }
        let slot = self
            .sockets
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(Error::SocketSetFull)?;
        slot.replace(socket);
        Ok(handle)
    }

    pub fn get(&mut self, handle: SocketHandle) -> Result<&mut Socket> {
        self.sockets
            .iter_mut()
            .flatten()
            .find(|s| s.handle == handle)
            .ok_or(Error::InvalidSocket)
    }

    pub fn remove(&mut self, handle: SocketHandle) -> Result<Socket> {
        self.sockets
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.handle == handle))
            .and_then(Option::take)
            .ok_or(Error::InvalidSocket)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Socket> {
        self.sockets.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn socket(id: u8) -> Socket {
        Socket::new(
            SocketHandle(id),
            ContextId(1),
            Protocol::Tcp,
            IpAddr::from_str("10.0.0.1").unwrap(),
            4433,
            0,
        )
    }

    #[test]
    fn connect_happy_path() {
        let mut s = socket(0);
        assert_eq!(s.state(), SocketState::Allocated);
        assert!(s.ensure_connected().is_err());

        s.connect_initiated().unwrap();
        assert_eq!(s.state(), SocketState::Connecting);
        assert_eq!(s.ensure_connected(), Err(Error::NotConnected));

        s.connect_result(true);
        assert_eq!(s.state(), SocketState::Connected);
        assert!(s.ensure_connected().is_ok());
    }

    #[test]
    fn failed_connect_reverts_to_allocated() {
        let mut s = socket(0);
        s.connect_initiated().unwrap();
        s.connect_result(false);
        assert_eq!(s.state(), SocketState::Allocated);
        // And it may try again.
        s.connect_initiated().unwrap();
    }

    #[test]
    fn connect_requires_allocated() {
        let mut s = socket(0);
        s.connect_initiated().unwrap();
        assert_eq!(s.connect_initiated(), Err(Error::Illegal));
        s.connect_result(true);
        assert_eq!(s.connect_initiated(), Err(Error::Illegal));
    }

    #[test]
    fn remote_close_disconnects() {
        let mut s = socket(0);
        s.connect_initiated().unwrap();
        s.connect_result(true);
        s.remote_closed();
        assert_eq!(s.state(), SocketState::Disconnected);
        assert_eq!(s.ensure_connected(), Err(Error::Closed));
        assert!(s.closeable());

        s.closed();
        assert_eq!(s.state(), SocketState::Closed);
        assert!(!s.closeable());
    }

    #[test]
    fn late_open_urc_does_not_resurrect_a_closed_socket() {
        let mut s = socket(0);
        s.connect_initiated().unwrap();
        s.remote_closed();
        s.connect_result(true);
        assert_eq!(s.state(), SocketState::Disconnected);
    }

    #[test]
    fn address_family_follows_the_remote_ip() {
        let mut s = socket(0);
        assert_eq!(s.address_family(), AddressFamily::V4);
        s.remote_ip = IpAddr::from_str("fe80::1").unwrap();
        assert_eq!(s.address_family(), AddressFamily::V6);
    }

    #[test]
    fn set_rejects_duplicate_handles() {
        let mut set: SocketSet<4> = SocketSet::new();
        set.add(socket(1)).unwrap();
        assert_eq!(set.add(socket(1)), Err(Error::DuplicateSocket));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_capacity_is_enforced() {
        let mut set: SocketSet<2> = SocketSet::new();
        set.add(socket(0)).unwrap();
        set.add(socket(1)).unwrap();
        assert_eq!(set.add(socket(2)), Err(Error::SocketSetFull));
    }

    #[test]
    fn removed_handles_can_be_reused() {
        let mut set: SocketSet<2> = SocketSet::new();
        set.add(socket(1)).unwrap();
        set.remove(SocketHandle(1)).unwrap();
        assert!(set.get(SocketHandle(1)).is_err());
        set.add(socket(1)).unwrap();
        assert_eq!(set.len(), 1);
    }
}
