//! Responses for TCP/IP commands
use heapless::Vec;

use super::types::MAX_RECV_DATA_LEN;

/// Payload returned by `AT+QIRD=<id>,<len>` / `AT+QSSLRECV=<id>,<len>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketData {
    pub data: Vec<u8, MAX_RECV_DATA_LEN>,
}

impl atat::AtatResp for SocketData {}

/// `+QIRD: <total>,<read>,<unread>` — the zero-length query variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketReceiveStats {
    pub total_received: u32,
    pub read: u32,
    pub unread: u32,
}

impl atat::AtatResp for SocketReceiveStats {}

/// `+QIGETERROR: <err>[,<description>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LastResultCode {
    pub code: u32,
}

impl atat::AtatResp for LastResultCode {}
