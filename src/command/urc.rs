//! Unsolicited result code demultiplexer
//!
//! The digester (see [`crate::digest`]) decides *that* a line is a URC; this
//! module decides *which* one. Parsing is hand-rolled because the `+QIURC`
//! and `+QSSLURC` families multiplex several payload shapes behind a quoted
//! selector token.

use atat::AtatUrc;
use heapless::String;

use crate::scanner::Scanner;

use super::ip_transport_layer::urc::SocketOpenResult;
use super::network_service::urc::{RegistrationUpdate, SignalStrengthUpdate};
use super::psn::urc::{DnsResult, PdpDeactivated};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// `APP RDY` — the AT interpreter is up.
    AppReady,
    /// `RDY` — bare firmware prompt, precedes `APP RDY` on cold boot.
    ModuleReady,
    /// `NORMAL POWER DOWN` / `POWERED DOWN` after `AT+QPOWD`.
    PoweredDown,
    /// `PSM POWER DOWN` — the module entered power saving mode.
    PsmPowerDown,
    /// `+QPSMTIMER: <tau>,<active>` — timers granted by the network, seconds.
    PsmTimer { tau: u32, active: u32 },
    /// `+QIOPEN: <id>,<err>`
    SocketOpened(SocketOpenResult),
    /// `+QSSLOPEN: <id>,<err>`
    SslSocketOpened(SocketOpenResult),
    /// `+QIURC: "recv",<id>`
    SocketDataAvailable(u8),
    /// `+QIURC: "closed",<id>`
    SocketClosed(u8),
    /// `+QSSLURC: "recv",<id>`
    SslSocketDataAvailable(u8),
    /// `+QSSLURC: "closed",<id>`
    SslSocketClosed(u8),
    /// `+QIURC: "dnsgip",...`
    DnsResult(DnsResult),
    /// `+QIURC: "pdpdeact",<ctx>`
    PdpDeactivated(PdpDeactivated),
    /// `+QIND: "csq",<rssi>,<ber>`
    SignalStrength(SignalStrengthUpdate),
    /// `+CREG: ...`
    NetworkRegistration(RegistrationUpdate),
    /// `+CEREG: ...`
    EpsNetworkRegistration(RegistrationUpdate),
    /// `+CTZV: "<tz>"` / `+CTZE: "<tz>",<dst>[,"<time>"]`
    TimeZoneUpdate(String<40>),
}

impl AtatUrc for Urc {
    type Response = Urc;

    fn parse(resp: &[u8]) -> Option<Self> {
        let line = core::str::from_utf8(resp).ok()?.trim();

        match line {
            "APP RDY" => return Some(Urc::AppReady),
            "RDY" => return Some(Urc::ModuleReady),
            "NORMAL POWER DOWN" | "POWERED DOWN" => return Some(Urc::PoweredDown),
            "PSM POWER DOWN" => return Some(Urc::PsmPowerDown),
            _ => {}
        }

        if let Some(mut scan) = Scanner::after_prefix(line, "+QIURC:") {
            return match scan.next_token()? {
                "recv" => Some(Urc::SocketDataAvailable(scan.next_u8().ok()?)),
                "closed" => Some(Urc::SocketClosed(scan.next_u8().ok()?)),
                "dnsgip" => Some(Urc::DnsResult(DnsResult::parse(&mut scan)?)),
                "pdpdeact" => Some(Urc::PdpDeactivated(PdpDeactivated::parse(&mut scan)?)),
                _ => None,
            };
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+QSSLURC:") {
            return match scan.next_token()? {
                "recv" => Some(Urc::SslSocketDataAvailable(scan.next_u8().ok()?)),
                "closed" => Some(Urc::SslSocketClosed(scan.next_u8().ok()?)),
                _ => None,
            };
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+QIOPEN:") {
            return Some(Urc::SocketOpened(SocketOpenResult::parse(&mut scan)?));
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+QSSLOPEN:") {
            return Some(Urc::SslSocketOpened(SocketOpenResult::parse(&mut scan)?));
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+QIND:") {
            return match scan.next_token()? {
                "csq" => Some(Urc::SignalStrength(SignalStrengthUpdate::parse(&mut scan)?)),
                _ => None,
            };
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+QPSMTIMER:") {
            return Some(Urc::PsmTimer {
                tau: scan.next_u32().ok()?,
                active: scan.next_u32().ok()?,
            });
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+CEREG:") {
            return Some(Urc::EpsNetworkRegistration(RegistrationUpdate::parse(
                &mut scan,
            )?));
        }
        if let Some(mut scan) = Scanner::after_prefix(line, "+CREG:") {
            return Some(Urc::NetworkRegistration(RegistrationUpdate::parse(
                &mut scan,
            )?));
        }
        if let Some(scan) = Scanner::after_prefix(line, "+CTZV:")
            .or_else(|| Scanner::after_prefix(line, "+CTZE:"))
        {
            return Some(Urc::TimeZoneUpdate(
                String::try_from(scan.remainder().trim()).ok()?,
            ));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatUrc;
    use crate::command::network_service::types::{RatAct, RegistrationStat};

    fn parse(line: &[u8]) -> Option<Urc> {
        <Urc as AtatUrc>::parse(line)
    }

    #[test]
    fn flat_urcs() {
        assert_eq!(parse(b"APP RDY"), Some(Urc::AppReady));
        assert_eq!(parse(b"RDY"), Some(Urc::ModuleReady));
        assert_eq!(parse(b"NORMAL POWER DOWN"), Some(Urc::PoweredDown));
        assert_eq!(parse(b"PSM POWER DOWN"), Some(Urc::PsmPowerDown));
    }

    #[test]
    fn socket_lifecycle_urcs() {
        assert_eq!(
            parse(b"+QIOPEN: 3,0"),
            Some(Urc::SocketOpened(SocketOpenResult {
                socket_id: 3,
                error: 0
            }))
        );
        assert_eq!(
            parse(b"+QIOPEN: 3,566"),
            Some(Urc::SocketOpened(SocketOpenResult {
                socket_id: 3,
                error: 566
            }))
        );
        assert_eq!(parse(b"+QIURC: \"recv\",3"), Some(Urc::SocketDataAvailable(3)));
        assert_eq!(parse(b"+QIURC: \"closed\",3"), Some(Urc::SocketClosed(3)));
        assert_eq!(
            parse(b"+QSSLURC: \"closed\",4"),
            Some(Urc::SslSocketClosed(4))
        );
    }

    #[test]
    fn dns_urcs() {
        assert_eq!(
            parse(b"+QIURC: \"dnsgip\",0,1,120"),
            Some(Urc::DnsResult(DnsResult::Header {
                result: 0,
                ip_count: 1
            }))
        );
        match parse(b"+QIURC: \"dnsgip\",\"93.184.216.34\"") {
            Some(Urc::DnsResult(DnsResult::Address(ip))) => {
                assert_eq!(ip.as_str(), "93.184.216.34")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn registration_urcs() {
        match parse(b"+CEREG: 5,\"54DB\",\"0F6B0578\",8") {
            Some(Urc::EpsNetworkRegistration(reg)) => {
                assert_eq!(reg.stat, RegistrationStat::RegisteredRoaming);
                assert_eq!(reg.tac, Some(0x54DB));
                assert_eq!(reg.cell_id, Some(0x0F6B_0578));
                assert_eq!(reg.act, Some(RatAct::LteCatM1));
            }
            other => panic!("unexpected {:?}", other),
        }
        match parse(b"+CREG: 4") {
            Some(Urc::NetworkRegistration(reg)) => {
                assert_eq!(reg.stat, RegistrationStat::Unknown);
                assert_eq!(reg.tac, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn signal_and_psm_urcs() {
        match parse(b"+QIND: \"csq\",18,99") {
            Some(Urc::SignalStrength(s)) => {
                assert_eq!(s.rssi_dbm, Some(-77));
                assert_eq!(s.ber, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            parse(b"+QPSMTIMER: 3600,60"),
            Some(Urc::PsmTimer {
                tau: 3600,
                active: 60
            })
        );
    }

    #[test]
    fn pdp_deactivated() {
        match parse(b"+QIURC: \"pdpdeact\",1") {
            Some(Urc::PdpDeactivated(p)) => assert_eq!(p.context_id.0, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_lines_are_dropped() {
        assert_eq!(parse(b"+QIURC: \"incoming\",11,2223,\"10.0.0.1\",1234"), None);
        assert_eq!(parse(b"GARBAGE"), None);
    }
}
