//! ### SIM related commands
//!
//! Identity reads used to characterise the inserted SIM: ICCID, IMSI and the
//! home-PLMN record out of the `EF_HPLMNwAcT` elementary file.
pub mod responses;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};

use crate::scanner::Scanner;

use super::text_response;
use responses::{Ccid, Hplmn, Imsi};

/// Show ICCID `AT+QCCID`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QCCID", Ccid)]
pub struct GetCcid;

/// Request international mobile subscriber identity `AT+CIMI`
///
/// The reply is a bare digit string with no `+CIMI:` prefix.
#[derive(Clone)]
pub struct GetImsi;

impl AtatCmd for GetImsi {
    type Response = Imsi;
    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CIMI\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?.trim();
        if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
            return Err(atat::Error::Parse);
        }
        Ok(Imsi {
            imsi: heapless::String::try_from(line).map_err(|_| atat::Error::Parse)?,
        })
    }
}

/// Read the home PLMN out of the SIM, `AT+CRSM=176,28514,0,0,0`
///
/// `176` is READ BINARY and `28514` the `EF_HPLMNwAcT` file id. The first
/// three payload octets are the PLMN in the usual nibble-swapped BCD; an `F`
/// in the third MNC position marks a two-digit MNC.
#[derive(Clone)]
pub struct GetHplmn;

impl AtatCmd for GetHplmn {
    type Response = Hplmn;
    const MAX_LEN: usize = 28;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CRSM=176,28514,0,0,0\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+CRSM:").ok_or(atat::Error::Parse)?;

        let sw1 = scan.next_u8().map_err(|_| atat::Error::Parse)?;
        let sw2 = scan.next_u8().map_err(|_| atat::Error::Parse)?;
        // 144/145/146 are the "normal ending" status words; 64 in sw2 flags a
        // SIM memory problem.
        if !matches!(sw1, 144 | 145 | 146) || sw2 == 64 {
            return Err(atat::Error::Parse);
        }

        let payload = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        parse_plmn_bcd(payload).ok_or(atat::Error::Parse)
    }
}

fn parse_plmn_bcd(payload: &str) -> Option<Hplmn> {
    let c = payload.as_bytes();
    if c.len() < 6 {
        return None;
    }
    let digit = |b: u8| -> Option<u8> { b.is_ascii_digit().then_some(b) };

    let mut mcc = heapless::String::new();
    for b in [c[1], c[0], c[3]] {
        mcc.push(digit(b)? as char).ok()?;
    }
    let mut mnc = heapless::String::new();
    for b in [c[5], c[4]] {
        mnc.push(digit(b)? as char).ok()?;
    }
    if c[2] != b'F' && c[2] != b'f' {
        mnc.push(digit(c[2])? as char).ok()?;
    }
    Some(Hplmn { mcc, mnc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn deserialize_ccid() {
        let resp: Ccid = atat::serde_at::from_slice(b"+QCCID: 89882280666027595366").unwrap();
        assert_eq!(resp.ccid.as_str(), "89882280666027595366");
    }

    #[test]
    fn imsi_is_a_bare_digit_string() {
        let resp = GetImsi.parse(Ok(b"460023210226023")).unwrap();
        assert_eq!(resp.imsi.as_str(), "460023210226023");

        assert!(GetImsi.parse(Ok(b"+CIMI: abc")).is_err());
    }

    #[test]
    fn hplmn_three_digit_mnc() {
        // MCC 310, MNC 410.
        let resp = GetHplmn.parse(Ok(b"+CRSM: 144,0,\"130014\"")).unwrap();
        assert_eq!(resp.mcc.as_str(), "310");
        assert_eq!(resp.mnc.as_str(), "410");
    }

    #[test]
    fn hplmn_two_digit_mnc() {
        // MCC 240, MNC 07 with the F filler nibble.
        let resp = GetHplmn.parse(Ok(b"+CRSM: 144,0,\"42F070\"")).unwrap();
        assert_eq!(resp.mcc.as_str(), "240");
        assert_eq!(resp.mnc.as_str(), "07");
    }

    #[test]
    fn hplmn_rejects_bad_status_words() {
        assert!(GetHplmn.parse(Ok(b"+CRSM: 106,0,\"130014\"")).is_err());
        assert!(GetHplmn.parse(Ok(b"+CRSM: 144,64,\"130014\"")).is_err());
    }
}
