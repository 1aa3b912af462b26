//! ### Extended configuration commands `AT+QCFG` / `AT+QURCCFG`
//!
//! One physical command, many unrelated knobs. Every knob gets its own typed
//! get/set pair here; the quoted selector token makes them too irregular for
//! derived (de)serialisation, so these are hand-written against the scanner.
pub mod responses;
pub mod types;

use core::fmt::Write;

use atat::{AtatCmd, InternalError};

use crate::bands::LteBandMask;
use crate::config::UrcPort;
use crate::scanner::Scanner;

use super::{text_response, NoResponse};
use responses::{
    BandConfiguration, BandPriorityConfiguration, IotOpModeConfiguration, Lwm2mConfiguration,
    NetworkOperatorConfiguration, ScanSequenceConfiguration, UrcPortConfiguration,
};
use types::{BandPriorityList, IotOpMode, NetworkOperatorMode, ScanSequence};

fn write_str(buf: &mut [u8], s: &str) -> usize {
    buf[..s.len()].copy_from_slice(s.as_bytes());
    s.len()
}

fn no_response(resp: Result<&[u8], InternalError>) -> Result<NoResponse, atat::Error> {
    resp.map(|_| NoResponse).map_err(atat::Error::from)
}

/// Read the band selection `AT+QCFG="band"`
#[derive(Clone)]
pub struct GetBandConfiguration;

impl AtatCmd for GetBandConfiguration {
    type Response = BandConfiguration;
    const MAX_LEN: usize = 18;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QCFG=\"band\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QCFG:").ok_or(atat::Error::Parse)?;
        if scan.expect_token().map_err(|_| atat::Error::Parse)? != "band" {
            return Err(atat::Error::Parse);
        }
        // GSM mask, meaningless on this module.
        scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let lte = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let lte_mask = LteBandMask::from_hex_str(lte).map_err(|_| atat::Error::Parse)?;
        Ok(BandConfiguration { lte_mask })
    }
}

/// Write the band selection `AT+QCFG="band",0,<lte>,0`
///
/// The GSM and NB-IoT masks are pinned to zero; this driver only ever runs
/// the radio in eMTC.
#[derive(Clone)]
pub struct SetBandConfiguration {
    pub lte_mask: LteBandMask,
}

impl AtatCmd for SetBandConfiguration {
    type Response = NoResponse;
    const MAX_LEN: usize = 56;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(
            out,
            "AT+QCFG=\"band\",0,0x{},0\r\n",
            self.lte_mask.to_hex_str()
        )
        .ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Read the RAT scan order `AT+QCFG="nwscanseq"`
#[derive(Clone)]
pub struct GetScanSequence;

impl AtatCmd for GetScanSequence {
    type Response = ScanSequenceConfiguration;
    const MAX_LEN: usize = 24;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QCFG=\"nwscanseq\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QCFG:").ok_or(atat::Error::Parse)?;
        if scan.expect_token().map_err(|_| atat::Error::Parse)? != "nwscanseq" {
            return Err(atat::Error::Parse);
        }
        let code = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let sequence = ScanSequence::from_code(code).ok_or(atat::Error::Parse)?;
        Ok(ScanSequenceConfiguration { sequence })
    }
}

/// Write the RAT scan order `AT+QCFG="nwscanseq",<code>,1`
///
/// Takes effect immediately; no reboot round-trip.
#[derive(Clone)]
pub struct SetScanSequence {
    pub sequence: ScanSequence,
}

impl AtatCmd for SetScanSequence {
    type Response = NoResponse;
    const MAX_LEN: usize = 32;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QCFG=\"nwscanseq\",{},1\r\n", self.sequence.as_code()).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Read the network category search mode `AT+QCFG="iotopmode"`
#[derive(Clone)]
pub struct GetIotOpMode;

impl AtatCmd for GetIotOpMode {
    type Response = IotOpModeConfiguration;
    const MAX_LEN: usize = 24;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QCFG=\"iotopmode\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QCFG:").ok_or(atat::Error::Parse)?;
        if scan.expect_token().map_err(|_| atat::Error::Parse)? != "iotopmode" {
            return Err(atat::Error::Parse);
        }
        let mode = scan
            .next_u8()
            .ok()
            .and_then(IotOpMode::from_value)
            .ok_or(atat::Error::Parse)?;
        Ok(IotOpModeConfiguration { mode })
    }
}

/// Write the network category search mode `AT+QCFG="iotopmode",<mode>,1`
#[derive(Clone)]
pub struct SetIotOpMode {
    pub mode: IotOpMode,
}

impl AtatCmd for SetIotOpMode {
    type Response = NoResponse;
    const MAX_LEN: usize = 26;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QCFG=\"iotopmode\",{},1\r\n", self.mode.value()).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Read the LwM2M client state `AT+QCFG="lwm2m"`
#[derive(Clone)]
pub struct GetLwm2m;

impl AtatCmd for GetLwm2m {
    type Response = Lwm2mConfiguration;
    const MAX_LEN: usize = 20;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QCFG=\"lwm2m\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QCFG:").ok_or(atat::Error::Parse)?;
        if scan.expect_token().map_err(|_| atat::Error::Parse)? != "lwm2m" {
            return Err(atat::Error::Parse);
        }
        let enabled = match scan.next_u8().map_err(|_| atat::Error::Parse)? {
            0 => false,
            1 => true,
            _ => return Err(atat::Error::Parse),
        };
        Ok(Lwm2mConfiguration { enabled })
    }
}

/// Enable/disable the built-in LwM2M client `AT+QCFG="lwm2m",<0|1>`
///
/// Some carrier SIMs ship with the client enabled, which silently overrides
/// the user APN; the enablement sequence forces it off.
#[derive(Clone)]
pub struct SetLwm2m {
    pub enabled: bool,
}

impl AtatCmd for SetLwm2m {
    type Response = NoResponse;
    const MAX_LEN: usize = 22;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QCFG=\"lwm2m\",{}\r\n", u8::from(self.enabled)).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Read the carrier profile `AT+QCFG="nwoper"`
#[derive(Clone)]
pub struct GetNetworkOperatorMode;

impl AtatCmd for GetNetworkOperatorMode {
    type Response = NetworkOperatorConfiguration;
    const MAX_LEN: usize = 21;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QCFG=\"nwoper\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?.trim();
        // Depending on the firmware revision the reply is
        // `+QCFG: "nwoper",<mode>[,"AUTO"]`, or the bare tail of it.
        let mut scan = match Scanner::after_prefix(line, "+QCFG:") {
            Some(scan) => scan,
            None => Scanner::new(line),
        };
        let first = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let mode_token = if first == "nwoper" {
            scan.expect_token().map_err(|_| atat::Error::Parse)?
        } else {
            first
        };
        let mode = NetworkOperatorMode::from_keyword(mode_token);
        let automatic = scan
            .next_token()
            .is_some_and(|t| t.eq_ignore_ascii_case("auto"));
        Ok(NetworkOperatorConfiguration { mode, automatic })
    }
}

/// Write the carrier profile `AT+QCFG="nwoper","<mode>"`
///
/// Callers must not pass [`NetworkOperatorMode::Unknown`].
#[derive(Clone)]
pub struct SetNetworkOperatorMode {
    pub mode: NetworkOperatorMode,
}

impl AtatCmd for SetNetworkOperatorMode {
    type Response = NoResponse;
    const MAX_LEN: usize = 30;

    fn write(&self, buf: &mut [u8]) -> usize {
        let keyword = self.mode.keyword().unwrap_or("DEFAULT");
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QCFG=\"nwoper\",\"{}\"\r\n", keyword).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Read the band scan priority `AT+QCFG="lte/bandprior"`
#[derive(Clone)]
pub struct GetBandPriority;

impl AtatCmd for GetBandPriority {
    type Response = BandPriorityConfiguration;
    const MAX_LEN: usize = 27;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QCFG=\"lte/bandprior\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QCFG:").ok_or(atat::Error::Parse)?;
        if scan.expect_token().map_err(|_| atat::Error::Parse)? != "lte/bandprior" {
            return Err(atat::Error::Parse);
        }
        let mut bands = BandPriorityList::new();
        while let Some(tok) = scan.next_token() {
            if tok.is_empty() {
                continue;
            }
            let band: u8 = tok.parse().map_err(|_| atat::Error::Parse)?;
            if bands.push(band).is_err() {
                // The module reported more entries than we track; the prefix
                // is still the priority order, so keep it.
                break;
            }
        }
        Ok(BandPriorityConfiguration { bands })
    }
}

/// Write the band scan priority `AT+QCFG="lte/bandprior",<b1>,...`
#[derive(Clone)]
pub struct SetBandPriority {
    pub bands: BandPriorityList,
}

impl AtatCmd for SetBandPriority {
    type Response = NoResponse;
    const MAX_LEN: usize = 90;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        out.push_str("AT+QCFG=\"lte/bandprior\"").ok();
        for band in self.bands.iter() {
            write!(out, ",{}", band).ok();
        }
        out.push_str("\r\n").ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Enable the PSM state URCs `AT+QCFG="psm/urc",<0|1>`
#[derive(Clone)]
pub struct SetPsmUrc {
    pub enabled: bool,
}

impl AtatCmd for SetPsmUrc {
    type Response = NoResponse;
    const MAX_LEN: usize = 24;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QCFG=\"psm/urc\",{}\r\n", u8::from(self.enabled)).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Ask for immediate PSM entry on RRC release `AT+QCFG="psm/enter",<0|1>`
#[derive(Clone)]
pub struct SetPsmEntry {
    pub enabled: bool,
}

impl AtatCmd for SetPsmEntry {
    type Response = NoResponse;
    const MAX_LEN: usize = 26;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QCFG=\"psm/enter\",{}\r\n", u8::from(self.enabled)).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

/// Read the URC output port `AT+QURCCFG="urcport"`
#[derive(Clone)]
pub struct GetUrcPort;

impl AtatCmd for GetUrcPort {
    type Response = UrcPortConfiguration;
    const MAX_LEN: usize = 24;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_str(buf, "AT+QURCCFG=\"urcport\"\r\n")
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan =
            Scanner::after_prefix(line.trim(), "+QURCCFG:").ok_or(atat::Error::Parse)?;
        if scan.expect_token().map_err(|_| atat::Error::Parse)? != "urcport" {
            return Err(atat::Error::Parse);
        }
        let port = match scan.expect_token().map_err(|_| atat::Error::Parse)? {
            "main" => Some(UrcPort::Main),
            "aux" => Some(UrcPort::Aux),
            "emux" => Some(UrcPort::Emux),
            _ => None,
        };
        Ok(UrcPortConfiguration { port })
    }
}

/// Write the URC output port `AT+QURCCFG="urcport","<port>"`
#[derive(Clone)]
pub struct SetUrcPort {
    pub port: UrcPort,
}

impl AtatCmd for SetUrcPort {
    type Response = NoResponse;
    const MAX_LEN: usize = 32;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QURCCFG=\"urcport\",\"{}\"\r\n", self.port.as_str()).ok();
        write_str(buf, &out)
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        no_response(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::types::Rat;
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn band_read_decodes_the_lte_mask() {
        let resp = GetBandConfiguration
            .parse(Ok(b"+QCFG: \"band\",0x3,0x2000000000f0e189f,0x2000000000f0e189f"))
            .unwrap();
        assert_eq!(resp.lte_mask, crate::bands::SUPPORTED_LTE_BANDS);
    }

    #[test]
    fn band_write_uses_canonical_hex() {
        let mut buf = [0u8; 64];
        let len = SetBandConfiguration {
            lte_mask: crate::bands::SUPPORTED_LTE_BANDS,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"band\",0,0x2000000000f0e189f,0\r\n");
    }

    #[test]
    fn scan_sequence_read_and_write() {
        let resp = GetScanSequence
            .parse(Ok(b"+QCFG: \"nwscanseq\",020301"))
            .unwrap();
        assert_eq!(
            resp.sequence,
            ScanSequence::new([Some(Rat::EMtc), Some(Rat::NbIot), Some(Rat::Gsm)])
        );

        let mut buf = [0u8; 32];
        let len = SetScanSequence {
            sequence: ScanSequence::EMTC_ONLY,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"nwscanseq\",02,1\r\n");
    }

    #[test]
    fn iotopmode_read_and_write() {
        let resp = GetIotOpMode.parse(Ok(b"+QCFG: \"iotopmode\",0")).unwrap();
        assert_eq!(resp.mode, IotOpMode::EMtc);
        assert!(GetIotOpMode.parse(Ok(b"+QCFG: \"iotopmode\",7")).is_err());

        let mut buf = [0u8; 32];
        let len = SetIotOpMode {
            mode: IotOpMode::EMtc,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"iotopmode\",0,1\r\n");
    }

    #[test]
    fn lwm2m_read_and_write() {
        let resp = GetLwm2m.parse(Ok(b"+QCFG: \"lwm2m\",1")).unwrap();
        assert!(resp.enabled);

        let mut buf = [0u8; 24];
        let len = SetLwm2m { enabled: false }.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"lwm2m\",0\r\n");
    }

    #[test]
    fn nwoper_read_tolerates_both_reply_shapes() {
        let resp = GetNetworkOperatorMode
            .parse(Ok(b"+QCFG: \"nwoper\",\"ATT\",\"AUTO\""))
            .unwrap();
        assert_eq!(resp.mode, NetworkOperatorMode::Att);
        assert!(resp.automatic);

        let resp = GetNetworkOperatorMode.parse(Ok(b"\"vzw\"")).unwrap();
        assert_eq!(resp.mode, NetworkOperatorMode::Vzw);
        assert!(!resp.automatic);

        let resp = GetNetworkOperatorMode.parse(Ok(b"\"CUSTOM\"")).unwrap();
        assert_eq!(resp.mode, NetworkOperatorMode::Unknown);
    }

    #[test]
    fn band_priority_read_accepts_empty() {
        let resp = GetBandPriority
            .parse(Ok(b"+QCFG: \"lte/bandprior\",3,20,28"))
            .unwrap();
        assert_eq!(resp.bands.as_slice(), &[3, 20, 28]);

        let resp = GetBandPriority.parse(Ok(b"+QCFG: \"lte/bandprior\"")).unwrap();
        assert!(resp.bands.is_empty());
    }

    #[test]
    fn band_priority_write() {
        let mut buf = [0u8; 90];
        let mut bands = BandPriorityList::new();
        for b in [12u8, 13, 2] {
            bands.push(b).unwrap();
        }
        let len = SetBandPriority { bands }.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"lte/bandprior\",12,13,2\r\n");
    }

    #[test]
    fn urcport_read_and_write() {
        let resp = GetUrcPort
            .parse(Ok(b"+QURCCFG: \"urcport\",\"main\""))
            .unwrap();
        assert_eq!(resp.port, Some(UrcPort::Main));

        let resp = GetUrcPort
            .parse(Ok(b"+QURCCFG: \"urcport\",\"usbmodem\""))
            .unwrap();
        assert_eq!(resp.port, None);

        let mut buf = [0u8; 32];
        let len = SetUrcPort {
            port: UrcPort::Emux,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QURCCFG=\"urcport\",\"emux\"\r\n");
    }

    #[test]
    fn psm_toggles() {
        let mut buf = [0u8; 32];
        let len = SetPsmUrc { enabled: true }.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"psm/urc\",1\r\n");

        let len = SetPsmEntry { enabled: true }.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QCFG=\"psm/enter\",1\r\n");
    }
}
