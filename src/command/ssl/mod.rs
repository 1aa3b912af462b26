//! ### SSL/TLS application commands
//!
//! TLS sockets mirror the plain TCP data plane: the same two-stage send and
//! the same inline-header read, with `+QSSLRECV:` framing instead of
//! `+QIRD:`. Certificates referenced by [`types::SslOption`] must first be
//! staged with the file commands.
pub mod types;

use core::fmt::Write;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};

use super::ip_transport_layer::responses::{SocketData, SocketReceiveStats};
use super::ip_transport_layer::{parse_data_block, parse_receive_stats};
use super::NoResponse;
use types::{SslContextId, SslOption, SslOptionValue};

/// Configure a TLS context slot `AT+QSSLCFG="<param>",<ctx>,<value>`
#[derive(Clone)]
pub struct SetSslOption<'a> {
    pub context: SslContextId,
    pub option: SslOption<'a>,
}

impl AtatCmd for SetSslOption<'_> {
    type Response = NoResponse;
    const MAX_LEN: usize = 128;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ <SetSslOption as AtatCmd>::MAX_LEN }>::new();
        write!(
            out,
            "AT+QSSLCFG=\"{}\",{}",
            self.option.param(),
            self.context.0
        )
        .ok();
        match self.option.value() {
            SslOptionValue::Numeric(v) => write!(out, ",{}", v).ok(),
            SslOptionValue::Hex(v) => write!(out, ",0X{:04X}", v).ok(),
            SslOptionValue::Text(s) => write!(out, ",\"{}\"", s).ok(),
        };
        out.push_str("\r\n").ok();
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

/// Open a TLS socket `AT+QSSLOPEN`
///
/// No local port parameter exists on the TLS path; the final result code
/// acknowledges the attempt and `+QSSLOPEN: <id>,<err>` settles it.
#[derive(Clone)]
pub struct OpenSslSocket<'a> {
    pub context_id: u8,
    pub ssl_context: SslContextId,
    pub socket_id: u8,
    pub remote_addr: &'a str,
    pub remote_port: u16,
    pub access: super::ip_transport_layer::types::AccessMode,
}

impl AtatCmd for OpenSslSocket<'_> {
    type Response = NoResponse;
    const MAX_LEN: usize = 128;
    const MAX_TIMEOUT_MS: u32 = 150_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ <OpenSslSocket as AtatCmd>::MAX_LEN }>::new();
        write!(
            out,
            "AT+QSSLOPEN={},{},{},\"{}\",{},{}\r\n",
            self.context_id,
            self.ssl_context.0,
            self.socket_id,
            self.remote_addr,
            self.remote_port,
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

/// Close a TLS socket `AT+QSSLCLOSE`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QSSLCLOSE", NoResponse, timeout_ms = 10000)]
pub struct CloseSslSocket {
    #[at_arg(position = 0)]
    pub socket_id: u8,
}

/// First TLS sending stage `AT+QSSLSEND=<id>,<len>`; the raw payload follows
/// as [`super::ip_transport_layer::WriteData`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+QSSLSEND", NoResponse, timeout_ms = 5000)]
pub struct StartSendSslData {
    #[at_arg(position = 0)]
    pub socket_id: u8,
    #[at_arg(position = 1)]
    pub length: usize,
}

/// Read buffered TLS data `AT+QSSLRECV=<id>,<len>` with a non-zero length.
#[derive(Clone)]
pub struct ReadSslData {
    pub socket_id: u8,
    pub length: usize,
}

impl AtatCmd for ReadSslData {
    type Response = SocketData;
    const MAX_LEN: usize = 28;
    const MAX_TIMEOUT_MS: u32 = 10_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QSSLRECV={},{}\r\n", self.socket_id, self.length).ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_data_block(resp, b"+QSSLRECV: ")
    }
}

/// Read the TLS receive counters `AT+QSSLRECV=<id>,0`
#[derive(Clone)]
pub struct QuerySslReceiveStats {
    pub socket_id: u8,
}

impl AtatCmd for QuerySslReceiveStats {
    type Response = SocketReceiveStats;
    const MAX_LEN: usize = 20;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QSSLRECV={},0\r\n", self.socket_id).ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_receive_stats(resp, "+QSSLRECV:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn ssl_option_value_styles() {
        let mut buf = [0u8; 128];

        let len = SetSslOption {
            context: SslContextId(0),
            option: SslOption::SslVersion(4),
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QSSLCFG=\"sslversion\",0,4\r\n");

        let len = SetSslOption {
            context: SslContextId(0),
            option: SslOption::CipherSuite(0xC02F),
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QSSLCFG=\"ciphersuite\",0,0XC02F\r\n");

        let len = SetSslOption {
            context: SslContextId(1),
            option: SslOption::CaCert("UFS:ca.pem"),
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QSSLCFG=\"cacert\",1,\"UFS:ca.pem\"\r\n");
    }

    #[test]
    fn open_ssl_socket_has_no_local_port() {
        let mut buf = [0u8; 128];
        let len = OpenSslSocket {
            context_id: 1,
            ssl_context: SslContextId(0),
            socket_id: 4,
            remote_addr: "example.com",
            remote_port: 8883,
            access: super::super::ip_transport_layer::types::AccessMode::Buffer,
        }
        .write(&mut buf);
        assert_eq!(
            &buf[..len],
            b"AT+QSSLOPEN=1,0,4,\"example.com\",8883,0\r\n"
        );
    }

    #[test]
    fn ssl_read_uses_its_own_prefix() {
        let resp = ReadSslData {
            socket_id: 4,
            length: 1500,
        }
        .parse(Ok(b"+QSSLRECV: 3\r\nxyz"))
        .unwrap();
        assert_eq!(resp.data.as_slice(), b"xyz");

        assert!(ReadSslData {
            socket_id: 4,
            length: 1500,
        }
        .parse(Ok(b"+QIRD: 3\r\nxyz"))
        .is_err());
    }

    #[test]
    fn ssl_receive_stats() {
        let resp = QuerySslReceiveStats { socket_id: 4 }
            .parse(Ok(b"+QSSLRECV: 10,10,0"))
            .unwrap();
        assert_eq!(resp.unread, 0);
    }
}
