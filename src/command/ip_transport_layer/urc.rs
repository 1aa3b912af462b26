//! URC payloads for TCP/IP socket events
use crate::scanner::Scanner;

/// `+QIOPEN: <connect_id>,<err>` / `+QSSLOPEN: <connect_id>,<err>` — the
/// deferred result of a connect. `0` means established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketOpenResult {
    pub socket_id: u8,
    pub error: i32,
}

impl SocketOpenResult {
    pub fn is_connected(&self) -> bool {
        self.error == 0
    }

    pub(crate) fn parse(scan: &mut Scanner) -> Option<Self> {
        Some(Self {
            socket_id: scan.next_u8().ok()?,
            error: scan.next_i32().ok()?,
        })
    }
}
