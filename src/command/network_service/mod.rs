//! ### Network service commands
pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};
use heapless::String;

use crate::module_timing::timeout_ms;
use crate::scanner::Scanner;

use super::{text_response, NoResponse};
use responses::{EpsRegistrationStatus, NetworkInfo, Operator, OperatorSelection};
use types::{
    csq_ber, csq_rssi_to_dbm, qcsq_sinr_to_db, OperatorNameFormat, OperatorSelectionMode, RatAct,
    RegistrationStat, RegistrationUrcConfig, SignalInfo,
};

/// Read signal quality `AT+CSQ`
///
/// Only RSSI and RxQual come out of this; the LTE measurements need
/// [`GetExtendedSignalQuality`].
#[derive(Clone)]
pub struct GetSignalQuality;

impl AtatCmd for GetSignalQuality {
    type Response = SignalInfo;
    const MAX_LEN: usize = 10;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CSQ\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+CSQ:").ok_or(atat::Error::Parse)?;
        let rssi = scan.next_u32().map_err(|_| atat::Error::Parse)?;
        let ber = scan.next_u32().map_err(|_| atat::Error::Parse)?;
        Ok(SignalInfo {
            rssi: csq_rssi_to_dbm(rssi),
            ber: csq_ber(ber),
            ..Default::default()
        })
    }
}

/// Read extended signal quality `AT+QCSQ`
///
/// The reply is only usable while camped on eMTC or NB-IoT; any other
/// `<sysmode>` (`"NOSERVICE"`, `"GSM"`, ...) fails the parse.
#[derive(Clone)]
pub struct GetExtendedSignalQuality;

impl AtatCmd for GetExtendedSignalQuality {
    type Response = SignalInfo;
    const MAX_LEN: usize = 10;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QCSQ\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QCSQ:").ok_or(atat::Error::Parse)?;
        let sysmode = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        if sysmode != "eMTC" && sysmode != "NBIoT" {
            return Err(atat::Error::Parse);
        }
        let mut next = || scan.next_i32().map_err(|_| atat::Error::Parse);
        let rssi = next()?;
        let rsrp = next()?;
        let sinr = next()?;
        let rsrq = next()?;
        Ok(SignalInfo {
            rssi: i16::try_from(rssi).ok(),
            rsrp: i16::try_from(rsrp).ok(),
            sinr: qcsq_sinr_to_db(sinr),
            rsrq: i16::try_from(rsrq).ok(),
            ber: None,
            bars: None,
        })
    }
}

/// Select operator `AT+COPS=`
///
/// Also used with `SetFormatOnly` to pick the numeric operator format for
/// subsequent reads.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS", NoResponse, timeout_ms = 180000)]
pub struct SetOperatorSelection<'a> {
    #[at_arg(position = 0)]
    pub mode: OperatorSelectionMode,
    #[at_arg(position = 1)]
    pub format: Option<OperatorNameFormat>,
    #[at_arg(position = 2, len = 24)]
    pub operator: Option<&'a str>,
}

/// Read operator selection `AT+COPS?`
#[derive(Clone)]
pub struct GetOperatorSelection;

impl AtatCmd for GetOperatorSelection {
    type Response = OperatorSelection;
    const MAX_LEN: usize = 11;
    const MAX_TIMEOUT_MS: u32 = timeout_ms::OPERATOR_SELECTION;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+COPS?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+COPS:").ok_or(atat::Error::Parse)?;
        let mode = scan
            .next_u8()
            .ok()
            .and_then(OperatorSelectionMode::from_u8)
            .ok_or(atat::Error::Parse)?;

        let Some(format) = scan.next_token() else {
            return Ok(OperatorSelection {
                mode,
                operator: None,
                act: None,
            });
        };
        let operator = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let operator = match format {
            "0" | "1" => Operator::Name(
                String::try_from(operator).map_err(|_| atat::Error::Parse)?,
            ),
            "2" => split_plmn(operator).ok_or(atat::Error::Parse)?,
            // 3 means "format not present"; a read reply carrying it is
            // garbage.
            _ => return Err(atat::Error::Parse),
        };
        let act = scan.next_u8().ok().map(RatAct::from_u8);

        Ok(OperatorSelection {
            mode,
            operator: Some(operator),
            act,
        })
    }
}

fn split_plmn(oper: &str) -> Option<Operator> {
    if !(oper.len() == 5 || oper.len() == 6) || !oper.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Operator::Plmn {
        mcc: String::try_from(&oper[..3]).ok()?,
        mnc: String::try_from(&oper[3..]).ok()?,
    })
}

/// Read serving cell information `AT+QNWINFO`
#[derive(Clone)]
pub struct GetNetworkInfo;

impl AtatCmd for GetNetworkInfo {
    type Response = NetworkInfo;
    const MAX_LEN: usize = 13;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QNWINFO\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan =
            Scanner::after_prefix(line.trim(), "+QNWINFO:").ok_or(atat::Error::Parse)?;

        let act = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        if !act.eq_ignore_ascii_case("emtc") {
            return Err(atat::Error::Parse);
        }

        let oper = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let Some(Operator::Plmn { mcc, mnc }) = split_plmn(oper) else {
            return Err(atat::Error::Parse);
        };

        let band = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let band = band
            .strip_prefix("LTE")
            .map(str::trim_start)
            .and_then(|b| b.strip_prefix("BAND"))
            .map(str::trim)
            .and_then(|n| n.parse::<u8>().ok())
            .ok_or(atat::Error::Parse)?;

        let channel = scan.next_u32().map_err(|_| atat::Error::Parse)?;

        Ok(NetworkInfo {
            mcc,
            mnc,
            band,
            channel,
        })
    }
}

/// Configure `+CREG` URC reporting `AT+CREG=`
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG", NoResponse)]
pub struct SetNetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: RegistrationUrcConfig,
}

/// Configure `+CEREG` URC reporting `AT+CEREG=`
#[derive(Clone, AtatCmd)]
#[at_cmd("+CEREG", NoResponse)]
pub struct SetEpsNetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: RegistrationUrcConfig,
}

/// Read EPS registration status `AT+CEREG?`
#[derive(Clone)]
pub struct GetEpsNetworkRegistrationStatus;

impl AtatCmd for GetEpsNetworkRegistrationStatus {
    type Response = EpsRegistrationStatus;
    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CEREG?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+CEREG:").ok_or(atat::Error::Parse)?;
        // <n> is the URC mode we configured ourselves; skip it.
        scan.next_u8().map_err(|_| atat::Error::Parse)?;
        let stat = RegistrationStat::from_u8(scan.next_u8().map_err(|_| atat::Error::Parse)?);

        let tac = scan
            .next_token()
            .and_then(|t| u16::from_str_radix(t, 16).ok());
        let cell_id = scan
            .next_token()
            .and_then(|t| u32::from_str_radix(t, 16).ok());
        let act = scan.next_u8().ok().map(RatAct::from_u8);

        // Location fields are stale unless actually registered on LTE.
        let lte = act.is_some_and(RatAct::is_lte);
        let keep = stat.is_registered() && lte;
        Ok(EpsRegistrationStatus {
            stat,
            tac: tac.filter(|_| keep),
            cell_id: cell_id.filter(|_| keep),
            act,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn csq_maps_to_dbm() {
        let info = GetSignalQuality.parse(Ok(b"+CSQ: 18,99")).unwrap();
        assert_eq!(info.rssi, Some(-77));
        assert_eq!(info.ber, None);
        assert_eq!(info.rsrp, None);
        assert_eq!(info.bars, None);
    }

    #[test]
    fn qcsq_emtc_rescales_sinr() {
        let info = GetExtendedSignalQuality
            .parse(Ok(b"+QCSQ: \"eMTC\",-80,-95,125,-10"))
            .unwrap();
        assert_eq!(info.rssi, Some(-80));
        assert_eq!(info.rsrp, Some(-95));
        assert_eq!(info.sinr, Some(5));
        assert_eq!(info.rsrq, Some(-10));
        assert_eq!(info.ber, None);
        assert_eq!(info.bars, None);
    }

    #[test]
    fn qcsq_rejects_other_sysmodes() {
        assert!(GetExtendedSignalQuality
            .parse(Ok(b"+QCSQ: \"NOSERVICE\""))
            .is_err());
        assert!(GetExtendedSignalQuality
            .parse(Ok(b"+QCSQ: \"GSM\",-80"))
            .is_err());
    }

    #[test]
    fn cops_numeric_format_splits_plmn() {
        let resp = GetOperatorSelection
            .parse(Ok(b"+COPS: 0,2,\"310410\",8"))
            .unwrap();
        assert_eq!(resp.mode, OperatorSelectionMode::Automatic);
        match resp.operator {
            Some(Operator::Plmn { mcc, mnc }) => {
                assert_eq!(mcc.as_str(), "310");
                assert_eq!(mnc.as_str(), "410");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(resp.act, Some(RatAct::LteCatM1));
    }

    #[test]
    fn cops_deregistered_without_operator() {
        let resp = GetOperatorSelection.parse(Ok(b"+COPS: 2")).unwrap();
        assert_eq!(resp.mode, OperatorSelectionMode::Deregister);
        assert_eq!(resp.operator, None);
    }

    #[test]
    fn cops_rejects_format_not_present_on_read() {
        assert!(GetOperatorSelection
            .parse(Ok(b"+COPS: 0,3,\"foo\""))
            .is_err());
        assert!(GetOperatorSelection.parse(Ok(b"+COPS: 3")).is_err());
    }

    #[test]
    fn qnwinfo_parses_band_with_spaces() {
        let resp = GetNetworkInfo
            .parse(Ok(b"+QNWINFO: \"eMTC\",\"31026\",\"LTE BAND 12\",5110"))
            .unwrap();
        assert_eq!(resp.mcc.as_str(), "310");
        assert_eq!(resp.mnc.as_str(), "26");
        assert_eq!(resp.band, 12);
        assert_eq!(resp.channel, 5110);
    }

    #[test]
    fn qnwinfo_requires_emtc_service() {
        assert!(GetNetworkInfo
            .parse(Ok(b"+QNWINFO: \"NBIoT\",\"31026\",\"LTE BAND 12\",5110"))
            .is_err());
    }

    #[test]
    fn cereg_registered_keeps_location() {
        let resp = GetEpsNetworkRegistrationStatus
            .parse(Ok(b"+CEREG: 2,5,\"54DB\",\"0F6B0578\",8"))
            .unwrap();
        assert_eq!(resp.stat, RegistrationStat::RegisteredRoaming);
        assert_eq!(resp.tac, Some(0x54DB));
        assert_eq!(resp.cell_id, Some(0x0F6B_0578));
        assert_eq!(resp.act, Some(RatAct::LteCatM1));
    }

    #[test]
    fn cereg_searching_blanks_location() {
        let resp = GetEpsNetworkRegistrationStatus
            .parse(Ok(b"+CEREG: 2,2,\"54DB\",\"0F6B0578\",8"))
            .unwrap();
        assert_eq!(resp.stat, RegistrationStat::Searching);
        assert_eq!(resp.tac, None);
        assert_eq!(resp.cell_id, None);
    }

    #[test]
    fn cereg_minimal_reply() {
        let resp = GetEpsNetworkRegistrationStatus
            .parse(Ok(b"+CEREG: 2,0"))
            .unwrap();
        assert_eq!(resp.stat, RegistrationStat::NotRegistered);
        assert_eq!(resp.tac, None);
        assert_eq!(resp.cell_id, None);
        assert_eq!(resp.act, None);
    }
}
