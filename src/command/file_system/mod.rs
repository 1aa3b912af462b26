//! ### File commands
//!
//! Staging area for TLS certificates and other blobs on the modem flash.
//! Upload is a two-stage exchange like socket sends, except the go-ahead is
//! the `CONNECT` intermediate instead of the `"> "` prompt.
pub mod responses;

use core::fmt::Write;

use atat::atat_derive::AtatCmd;
use atat::{serde_at, AtatCmd, InternalError};

use crate::scanner::Scanner;

use super::{text_response, NoResponse};
use responses::{FileCrc, FileUploadResult};

/// First upload stage `AT+QFUPL="<name>",<size>`
///
/// Resolves on `CONNECT`; the raw file content follows as [`WriteFileData`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+QFUPL", NoResponse, timeout_ms = 5000)]
pub struct StartFileUpload<'a> {
    #[at_arg(position = 0, len = 80)]
    pub name: &'a str,
    #[at_arg(position = 1)]
    pub size: usize,
}

/// Second upload stage: the raw content. The exchange closes with
/// `+QFUPL: <size>,<checksum>` and `OK`.
#[derive(Clone)]
pub struct WriteFileData<'a> {
    pub buf: serde_at::ser::Bytes<'a>,
}

impl AtatCmd for WriteFileData<'_> {
    type Response = FileUploadResult;
    const MAX_LEN: usize = 8192;
    const MAX_TIMEOUT_MS: u32 = 60_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let data = self.buf.0;
        buf[..data.len()].copy_from_slice(data);
        data.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QFUPL:").ok_or(atat::Error::Parse)?;
        let uploaded_length = scan.next_u32().map_err(|_| atat::Error::Parse)? as usize;
        let checksum = scan.next_radix(16).map_err(|_| atat::Error::Parse)?;
        let checksum = u16::try_from(checksum).map_err(|_| atat::Error::Parse)?;
        Ok(FileUploadResult {
            uploaded_length,
            checksum,
        })
    }
}

/// Delete a file `AT+QFDEL="<name>"`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QFDEL", NoResponse, timeout_ms = 5000)]
pub struct DeleteFile<'a> {
    #[at_arg(position = 0, len = 80)]
    pub name: &'a str,
}

/// Checksum a stored file `AT+QFCRC="<name>"`
#[derive(Clone)]
pub struct GetFileCrc<'a> {
    pub name: &'a str,
}

impl AtatCmd for GetFileCrc<'_> {
    type Response = FileCrc;
    const MAX_LEN: usize = 96;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ <GetFileCrc as AtatCmd>::MAX_LEN }>::new();
        write!(out, "AT+QFCRC=\"{}\"\r\n", self.name).ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QFCRC:").ok_or(atat::Error::Parse)?;
        let crc32 = scan.next_radix(16).map_err(|_| atat::Error::Parse)?;
        let crc16 = scan.next_radix(16).map_err(|_| atat::Error::Parse)?;
        let crc16 = u16::try_from(crc16).map_err(|_| atat::Error::Parse)?;
        let crc16_ccitt = scan.next_radix(16).map_err(|_| atat::Error::Parse)?;
        let crc16_ccitt = u16::try_from(crc16_ccitt).map_err(|_| atat::Error::Parse)?;
        Ok(FileCrc {
            crc32,
            crc16,
            crc16_ccitt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn upload_stage_one() {
        let mut buf = [0u8; 96];
        let len = StartFileUpload {
            name: "ca.pem",
            size: 1024,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QFUPL=\"ca.pem\",1024\r\n");
    }

    #[test]
    fn upload_result_checksum_is_hex() {
        let resp = WriteFileData {
            buf: serde_at::ser::Bytes(b""),
        }
        .parse(Ok(b"+QFUPL: 1024,185A"))
        .unwrap();
        assert_eq!(resp.uploaded_length, 1024);
        assert_eq!(resp.checksum, 0x185A);
    }

    #[test]
    fn upload_result_checksum_must_fit_16_bits() {
        assert!(WriteFileData {
            buf: serde_at::ser::Bytes(b""),
        }
        .parse(Ok(b"+QFUPL: 1024,1185A"))
        .is_err());
    }

    #[test]
    fn delete_file() {
        let mut buf = [0u8; 96];
        let len = DeleteFile { name: "ca.pem" }.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QFDEL=\"ca.pem\"\r\n");
    }

    #[test]
    fn file_crc_fields_are_hex() {
        let resp = GetFileCrc { name: "ca.pem" }
            .parse(Ok(b"+QFCRC: 1C291CA3,5A5D,6C93"))
            .unwrap();
        assert_eq!(resp.crc32, 0x1C29_1CA3);
        assert_eq!(resp.crc16, 0x5A5D);
        assert_eq!(resp.crc16_ccitt, 0x6C93);
    }
}
