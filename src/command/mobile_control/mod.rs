//! ### Status control and power commands
pub mod responses;
pub mod types;

use core::fmt::Write;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};

use crate::scanner::Scanner;

use super::{text_response, NoResponse};
use responses::{ModemTemperatures, ModuleFunctionality, PsmConfig, PsmSettings};
use types::{Functionality, PowerDownMode, TimeZoneReportingMode};

/// Set phone functionality `AT+CFUN`
///
/// `SimOnly` (4) keeps the SIM powered with both RF paths off, which is the
/// state the enablement sequence parks the module in until the connection
/// manager asks for airtime.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CFUN", NoResponse, timeout_ms = 15000)]
pub struct SetModuleFunctionality {
    #[at_arg(position = 0)]
    pub fun: Functionality,
}

/// Read phone functionality `AT+CFUN?`
#[derive(Clone)]
pub struct GetModuleFunctionality;

impl AtatCmd for GetModuleFunctionality {
    type Response = ModuleFunctionality;
    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CFUN?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+CFUN:").ok_or(atat::Error::Parse)?;
        let fun = match scan.next_u8().map_err(|_| atat::Error::Parse)? {
            0 => Some(Functionality::Minimum),
            1 => Some(Functionality::Full),
            4 => Some(Functionality::SimOnly),
            _ => None,
        };
        Ok(ModuleFunctionality { fun })
    }
}

/// Power down the module `AT+QPOWD`
///
/// `Normal` waits for network detach; the prefix-less `POWERED DOWN` URC
/// confirms completion before the supply may be cut.
#[derive(Clone, AtatCmd)]
#[at_cmd("+QPOWD", NoResponse, timeout_ms = 40000)]
pub struct ModulePowerDown {
    #[at_arg(position = 0)]
    pub mode: PowerDownMode,
}

/// Read silicon temperatures `AT+QTEMP`
#[derive(Clone)]
pub struct GetModemTemperatures;

impl AtatCmd for GetModemTemperatures {
    type Response = ModemTemperatures;
    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QTEMP\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QTEMP:").ok_or(atat::Error::Parse)?;
        let mut next = || -> Result<i16, atat::Error> {
            scan.next_i32()
                .ok()
                .and_then(|v| i16::try_from(v).ok())
                .ok_or(atat::Error::Parse)
        };
        Ok(ModemTemperatures {
            pmic: next()?,
            xo: next()?,
            pa: next()?,
        })
    }
}

/// Configure time zone reporting `AT+CTZR`
#[derive(Clone, AtatCmd)]
#[at_cmd("+CTZR", NoResponse)]
pub struct SetTimeZoneReporting {
    #[at_arg(position = 0)]
    pub mode: TimeZoneReportingMode,
}

/// Write power saving mode settings `AT+QPSMS`
///
/// The periodic-RAU and GPRS-ready fields are GERAN leftovers the module
/// does not evaluate; they are emitted empty. TAU and active-time go out as
/// quoted 8-bit binary strings (3GPP TS 27.007 timer encoding), or empty when
/// zero, so `AT+QPSMS=1,,,"01000010",` requests PSM with only a TAU.
#[derive(Clone)]
pub struct SetPsmSettings {
    pub settings: PsmSettings,
}

impl AtatCmd for SetPsmSettings {
    type Response = NoResponse;
    const MAX_LEN: usize = 40;

    fn write(&self, buf: &mut [u8]) -> usize {
        let s = &self.settings;
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QPSMS={}", s.mode).ok();
        if s.periodic_tau != 0 || s.active_time != 0 {
            out.push_str(",,").ok();
            for timer in [s.periodic_tau, s.active_time] {
                out.push(',').ok();
                if timer != 0 {
                    write!(out, "\"{:08b}\"", timer as u8).ok();
                }
            }
        }
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

/// Read power saving mode settings `AT+QPSMS?`
///
/// The timer radix is firmware dependent (binary strings per the manual,
/// plain decimal on some revisions); the caller passes the radix it was
/// built for.
#[derive(Clone)]
pub struct GetPsmSettings {
    pub timer_radix: u32,
}

impl AtatCmd for GetPsmSettings {
    type Response = PsmSettings;
    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QPSMS?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QPSMS:").ok_or(atat::Error::Parse)?;
        let mode = scan.next_u8().map_err(|_| atat::Error::Parse)?;
        let mut timer = || -> Result<u32, atat::Error> {
            match scan.next_token() {
                None | Some("") => Ok(0),
                Some(tok) => {
                    u32::from_str_radix(tok, self.timer_radix).map_err(|_| atat::Error::Parse)
                }
            }
        };
        Ok(PsmSettings {
            mode,
            periodic_rau: timer()?,
            gprs_ready_timer: timer()?,
            periodic_tau: timer()?,
            active_time: timer()?,
        })
    }
}

/// Write PSM threshold configuration `AT+QPSMCFG`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QPSMCFG", NoResponse)]
pub struct SetPsmConfig {
    #[at_arg(position = 0)]
    pub threshold: u32,
    #[at_arg(position = 1)]
    pub version: u8,
}

/// Read PSM threshold configuration `AT+QPSMCFG?`
#[derive(Clone)]
pub struct GetPsmConfig;

impl AtatCmd for GetPsmConfig {
    type Response = PsmConfig;
    const MAX_LEN: usize = 14;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QPSMCFG?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan =
            Scanner::after_prefix(line.trim(), "+QPSMCFG:").ok_or(atat::Error::Parse)?;
        Ok(PsmConfig {
            threshold: scan.next_u32().map_err(|_| atat::Error::Parse)?,
            version: scan.next_u8().map_err(|_| atat::Error::Parse)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn cfun_sim_only() {
        let mut buf = [0u8; 16];
        let len = SetModuleFunctionality {
            fun: Functionality::SimOnly,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+CFUN=4\r\n");
    }

    #[test]
    fn cfun_read_maps_unknown_levels() {
        let resp = GetModuleFunctionality.parse(Ok(b"+CFUN: 4")).unwrap();
        assert_eq!(resp.fun, Some(Functionality::SimOnly));
        let resp = GetModuleFunctionality.parse(Ok(b"+CFUN: 7")).unwrap();
        assert_eq!(resp.fun, None);
    }

    #[test]
    fn psm_write_with_only_tau() {
        let mut buf = [0u8; 40];
        let len = SetPsmSettings {
            settings: PsmSettings {
                mode: 1,
                periodic_rau: 0,
                gprs_ready_timer: 0,
                periodic_tau: 0x42,
                active_time: 0,
            },
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QPSMS=1,,,\"01000010\",\r\n");
    }

    #[test]
    fn psm_write_mode_only_when_timers_are_zero() {
        let mut buf = [0u8; 40];
        let len = SetPsmSettings {
            settings: PsmSettings {
                mode: 0,
                periodic_rau: 0,
                gprs_ready_timer: 0,
                periodic_tau: 0,
                active_time: 0,
            },
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QPSMS=0\r\n");
    }

    #[test]
    fn psm_write_both_timers() {
        let mut buf = [0u8; 40];
        let len = SetPsmSettings {
            settings: PsmSettings {
                mode: 1,
                periodic_rau: 0,
                gprs_ready_timer: 0,
                periodic_tau: 0b0000_0100,
                active_time: 0b0000_0001,
            },
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QPSMS=1,,,\"00000100\",\"00000001\"\r\n");
    }

    #[test]
    fn psm_read_decimal_radix() {
        let resp = GetPsmSettings { timer_radix: 10 }
            .parse(Ok(b"+QPSMS: 1,,,\"66\",\"1\""))
            .unwrap();
        assert_eq!(resp.mode, 1);
        assert_eq!(resp.periodic_rau, 0);
        assert_eq!(resp.periodic_tau, 66);
        assert_eq!(resp.active_time, 1);
    }

    #[test]
    fn psm_read_binary_radix() {
        let resp = GetPsmSettings { timer_radix: 2 }
            .parse(Ok(b"+QPSMS: 1,,,\"01000010\",\"00000001\""))
            .unwrap();
        assert_eq!(resp.periodic_tau, 0x42);
        assert_eq!(resp.active_time, 1);
    }

    #[test]
    fn temperatures_are_signed() {
        let resp = GetModemTemperatures
            .parse(Ok(b"+QTEMP: -3,27,31"))
            .unwrap();
        assert_eq!(resp.pmic, -3);
        assert_eq!(resp.xo, 27);
        assert_eq!(resp.pa, 31);
    }

    #[test]
    fn psm_config_roundtrip() {
        let mut buf = [0u8; 32];
        let len = SetPsmConfig {
            threshold: 120,
            version: 2,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QPSMCFG=120,2\r\n");

        let resp = GetPsmConfig.parse(Ok(b"+QPSMCFG: 120,2")).unwrap();
        assert_eq!(resp.threshold, 120);
        assert_eq!(resp.version, 2);
    }
}
