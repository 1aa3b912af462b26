//! ### TCP/IP application commands
//!
//! Data flows in buffered access mode only. Sending is a two-stage exchange:
//! `AT+QISEND=<id>,<len>` answers with the `"> "` prompt, the raw payload
//! follows as [`WriteData`] and the stage closes on `SEND OK`. Receiving is a
//! single `AT+QIRD=<id>,<len>` whose reply interleaves a text header with the
//! binary payload; the digester reunites them before [`ReadSocketData`]
//! parses.
pub mod responses;
pub mod types;
pub mod urc;

use core::fmt::Write;

use atat::atat_derive::AtatCmd;
use atat::{serde_at, AtatCmd, InternalError};
use heapless::Vec;

use crate::scanner::Scanner;

use super::{text_response, NoResponse};
use responses::{LastResultCode, SocketData, SocketReceiveStats};
use types::{AccessMode, SocketService};

/// Open a TCP or UDP socket `AT+QIOPEN`
///
/// The final result code only acknowledges the attempt; the connection state
/// lands later in the `+QIOPEN: <id>,<err>` URC.
#[derive(Clone)]
pub struct OpenSocket<'a> {
    pub context_id: u8,
    pub socket_id: u8,
    pub service: SocketService,
    pub remote_addr: &'a str,
    pub remote_port: u16,
    pub local_port: u16,
    pub access: AccessMode,
}

impl AtatCmd for OpenSocket<'_> {
    type Response = NoResponse;
    const MAX_LEN: usize = 128;
    const MAX_TIMEOUT_MS: u32 = 150_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ <OpenSocket as AtatCmd>::MAX_LEN }>::new();
        write!(
            out,
            "AT+QIOPEN={},{},\"{}\",\"{}\",{},{},{}\r\n",
            self.context_id,
            self.socket_id,
            self.service.as_str(),
            self.remote_addr,
            self.remote_port,
            self.local_port,
            self.access.value(),
        )
        .ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        resp.map(|_| NoResponse).map_err(atat::Error::from)
    }
}

/// Close a socket `AT+QICLOSE`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QICLOSE", NoResponse, timeout_ms = 10000)]
pub struct CloseSocket {
    #[at_arg(position = 0)]
    pub socket_id: u8,
}

/// First sending stage `AT+QISEND=<id>,<len>`
///
/// Resolves on the `"> "` prompt; the payload must follow as [`WriteData`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+QISEND", NoResponse, timeout_ms = 5000)]
pub struct StartSendData {
    #[at_arg(position = 0)]
    pub socket_id: u8,
    #[at_arg(position = 1)]
    pub length: usize,
}

/// Second sending stage: the raw payload, no prefix, no termination. The
/// exchange completes on `SEND OK`.
#[derive(Clone, AtatCmd)]
#[at_cmd(
    "",
    NoResponse,
    value_sep = false,
    cmd_prefix = "",
    termination = "",
    force_receive_state = true,
    timeout_ms = 120000
)]
pub struct WriteData<'a> {
    #[at_arg(position = 0)]
    pub buf: serde_at::ser::Bytes<'a>,
}

/// Read buffered data `AT+QIRD=<id>,<len>` with a non-zero length.
#[derive(Clone)]
pub struct ReadSocketData {
    pub socket_id: u8,
    pub length: usize,
}

impl AtatCmd for ReadSocketData {
    type Response = SocketData;
    const MAX_LEN: usize = 24;
    const MAX_TIMEOUT_MS: u32 = 10_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QIRD={},{}\r\n", self.socket_id, self.length).ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_data_block(resp, b"+QIRD: ")
    }
}

/// Read the receive counters `AT+QIRD=<id>,0`
#[derive(Clone)]
pub struct QueryReceiveStats {
    pub socket_id: u8,
}

impl AtatCmd for QueryReceiveStats {
    type Response = SocketReceiveStats;
    const MAX_LEN: usize = 16;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QIRD={},0\r\n", self.socket_id).ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_receive_stats(resp, "+QIRD:")
    }
}

/// Read the last TCP/IP stack error `AT+QIGETERROR`
#[derive(Clone)]
pub struct GetLastResultCode;

impl AtatCmd for GetLastResultCode {
    type Response = LastResultCode;
    const MAX_LEN: usize = 17;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QIGETERROR\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan =
            Scanner::after_prefix(line.trim(), "+QIGETERROR:").ok_or(atat::Error::Parse)?;
        Ok(LastResultCode {
            code: scan.next_u32().map_err(|_| atat::Error::Parse)?,
        })
    }
}

/// Shared body parser for the `+QIRD`/`+QSSLRECV` data shape:
/// `<prefix><len>\r\n<len raw bytes>`.
pub(crate) fn parse_data_block(
    resp: Result<&[u8], InternalError>,
    prefix: &[u8],
) -> Result<SocketData, atat::Error> {
    let body = resp.map_err(atat::Error::from)?;
    if !body.starts_with(prefix) {
        return Err(atat::Error::Parse);
    }
    let header_end = body
        .iter()
        .position(|c| matches!(c, b'\r' | b'\n'))
        .unwrap_or(body.len());
    let digits = &body[prefix.len()..header_end];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(atat::Error::Parse);
    }
    let mut length = 0usize;
    for d in digits {
        length = length * 10 + usize::from(d - b'0');
    }

    let payload = if length == 0 {
        &[]
    } else {
        let start = header_end + 2;
        body.get(start..start + length).ok_or(atat::Error::Parse)?
    };
    Ok(SocketData {
        data: Vec::from_slice(payload).map_err(|_| atat::Error::Parse)?,
    })
}

pub(crate) fn parse_receive_stats(
    resp: Result<&[u8], InternalError>,
    prefix: &str,
) -> Result<SocketReceiveStats, atat::Error> {
    let line = text_response(resp)?;
    let mut scan = Scanner::after_prefix(line.trim(), prefix).ok_or(atat::Error::Parse)?;
    Ok(SocketReceiveStats {
        total_received: scan.next_u32().map_err(|_| atat::Error::Parse)?,
        read: scan.next_u32().map_err(|_| atat::Error::Parse)?,
        unread: scan.next_u32().map_err(|_| atat::Error::Parse)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn open_tcp_socket() {
        let mut buf = [0u8; 128];
        let len = OpenSocket {
            context_id: 1,
            socket_id: 3,
            service: SocketService::Tcp,
            remote_addr: "93.184.216.34",
            remote_port: 443,
            local_port: 0,
            access: AccessMode::Buffer,
        }
        .write(&mut buf);
        assert_eq!(
            &buf[..len],
            b"AT+QIOPEN=1,3,\"TCP\",\"93.184.216.34\",443,0,0\r\n"
        );
    }

    #[test]
    fn open_udp_service_socket() {
        let mut buf = [0u8; 128];
        let len = OpenSocket {
            context_id: 1,
            socket_id: 0,
            service: SocketService::UdpService,
            remote_addr: "10.0.0.1",
            remote_port: 9,
            local_port: 5000,
            access: AccessMode::Buffer,
        }
        .write(&mut buf);
        assert_eq!(
            &buf[..len],
            b"AT+QIOPEN=1,0,\"UDP SERVICE\",\"10.0.0.1\",9,5000,0\r\n"
        );
    }

    #[test]
    fn send_stages() {
        let mut buf = [0u8; 32];
        let len = StartSendData {
            socket_id: 2,
            length: 4,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QISEND=2,4\r\n");

        let mut buf = [0u8; 1500];
        let len = WriteData {
            buf: serde_at::ser::Bytes(b"DEAD"),
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"DEAD");
    }

    #[test]
    fn read_parses_header_and_payload() {
        let resp = ReadSocketData {
            socket_id: 3,
            length: 1500,
        }
        .parse(Ok(b"+QIRD: 4\r\nDEAD"))
        .unwrap();
        assert_eq!(resp.data.as_slice(), b"DEAD");
    }

    #[test]
    fn read_zero_bytes() {
        let resp = ReadSocketData {
            socket_id: 3,
            length: 1500,
        }
        .parse(Ok(b"+QIRD: 0"))
        .unwrap();
        assert!(resp.data.is_empty());
    }

    #[test]
    fn read_payload_may_be_binary() {
        let resp = ReadSocketData {
            socket_id: 3,
            length: 1500,
        }
        .parse(Ok(b"+QIRD: 6\r\n\x00\x01OK\r\n"))
        .unwrap();
        assert_eq!(resp.data.as_slice(), b"\x00\x01OK\r\n");
    }

    #[test]
    fn read_length_mismatch_is_an_error() {
        assert!(ReadSocketData {
            socket_id: 3,
            length: 1500,
        }
        .parse(Ok(b"+QIRD: 9\r\nDEAD"))
        .is_err());
    }

    #[test]
    fn receive_stats() {
        let resp = QueryReceiveStats { socket_id: 3 }
            .parse(Ok(b"+QIRD: 7,4,3"))
            .unwrap();
        assert_eq!(resp.total_received, 7);
        assert_eq!(resp.read, 4);
        assert_eq!(resp.unread, 3);
    }

    #[test]
    fn last_result_code() {
        let resp = GetLastResultCode
            .parse(Ok(b"+QIGETERROR: 550,\"Unknown error\""))
            .unwrap();
        assert_eq!(resp.code, 550);
    }
}
