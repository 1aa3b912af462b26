//! ### Packet domain commands
//!
//! PDP context configuration and activation plus the DNS configuration that
//! rides on an activated context. The `+QIDNSGIP` resolution result arrives
//! asynchronously as a `+QIURC: "dnsgip"` pair, see
//! [`dns`](crate::dns) for the rendezvous.
pub mod responses;
pub mod types;
pub mod urc;

use core::fmt::Write;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};
use heapless::String;

use crate::scanner::Scanner;

use super::{text_response, NoResponse};
use responses::{PdnConfig, PdnStatus, PdnStatusList};
use types::{AuthenticationType, ContextId, PdpAddressFamily, ProtocolType};

/// Configure a PDP context `AT+QICSGP`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QICSGP", NoResponse)]
pub struct SetPdnConfig<'a> {
    #[at_arg(position = 0)]
    pub context_id: ContextId,
    #[at_arg(position = 1)]
    pub context_type: ProtocolType,
    #[at_arg(position = 2, len = 64)]
    pub apn: &'a str,
    #[at_arg(position = 3, len = 32)]
    pub username: &'a str,
    #[at_arg(position = 4, len = 32)]
    pub password: &'a str,
    #[at_arg(position = 5)]
    pub auth: AuthenticationType,
}

/// Read a PDP context configuration `AT+QICSGP=<id>`
#[derive(Clone)]
pub struct GetPdnConfig {
    pub context_id: ContextId,
}

impl AtatCmd for GetPdnConfig {
    type Response = PdnConfig;
    const MAX_LEN: usize = 16;

    fn write(&self, buf: &mut [u8]) -> usize {
        let mut out = heapless::String::<{ Self::MAX_LEN }>::new();
        write!(out, "AT+QICSGP={}\r\n", self.context_id.0).ok();
        buf[..out.len()].copy_from_slice(out.as_bytes());
        out.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let mut scan = Scanner::after_prefix(line.trim(), "+QICSGP:").ok_or(atat::Error::Parse)?;
        let context_type = match scan.next_u8().map_err(|_| atat::Error::Parse)? {
            1 => ProtocolType::IPv4,
            2 => ProtocolType::IPv6,
            3 => ProtocolType::IPv4v6,
            _ => return Err(atat::Error::Parse),
        };
        let apn = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let username = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let password = scan.expect_token().map_err(|_| atat::Error::Parse)?;
        let auth = match scan.next_u8().map_err(|_| atat::Error::Parse)? {
            0 => Some(AuthenticationType::None),
            1 => Some(AuthenticationType::Pap),
            2 => Some(AuthenticationType::Chap),
            // 3 is "PAP or CHAP", which this driver refuses to model.
            3 => None,
            _ => return Err(atat::Error::Parse),
        };
        Ok(PdnConfig {
            context_type,
            apn: String::try_from(apn).map_err(|_| atat::Error::Parse)?,
            username: String::try_from(username).map_err(|_| atat::Error::Parse)?,
            password: String::try_from(password).map_err(|_| atat::Error::Parse)?,
            auth,
        })
    }
}

/// Activate a PDP context `AT+QIACT=<id>`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QIACT", NoResponse, timeout_ms = 150000)]
pub struct ActivatePdn {
    #[at_arg(position = 0)]
    pub context_id: ContextId,
}

/// Deactivate a PDP context `AT+QIDEACT=<id>`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QIDEACT", NoResponse, timeout_ms = 40000)]
pub struct DeactivatePdn {
    #[at_arg(position = 0)]
    pub context_id: ContextId,
}

/// List activated contexts `AT+QIACT?`
///
/// Rows parse independently; the first malformed row ends the sweep and
/// whatever parsed before it is returned. A dual-stack (`IPv4v6`) row counts
/// as malformed, the driver does not model it.
#[derive(Clone)]
pub struct GetPdnStatus;

impl AtatCmd for GetPdnStatus {
    type Response = PdnStatusList;
    const MAX_LEN: usize = 12;
    const MAX_TIMEOUT_MS: u32 = 150_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+QIACT?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let body = text_response(resp)?;
        let mut list = PdnStatusList::default();
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(row) = parse_status_row(line) else {
                break;
            };
            if list.contexts.push(row).is_err() {
                break;
            }
        }
        Ok(list)
    }
}

fn parse_status_row(line: &str) -> Option<PdnStatus> {
    let mut scan = Scanner::after_prefix(line, "+QIACT:")?;
    let context_id = ContextId(scan.next_u8().ok()?);
    if !context_id.is_valid() {
        return None;
    }
    let active = match scan.next_u8().ok()? {
        0 => false,
        1 => true,
        _ => return None,
    };
    let family = match scan.next_u8().ok()? {
        1 => PdpAddressFamily::IPv4,
        2 => PdpAddressFamily::IPv6,
        _ => return None,
    };
    let ip = String::try_from(scan.expect_token().ok()?).ok()?;
    Some(PdnStatus {
        context_id,
        active,
        family,
        ip,
    })
}

/// Configure DNS servers for a context `AT+QIDNSCFG`
#[derive(Clone, AtatCmd)]
#[at_cmd("+QIDNSCFG", NoResponse)]
pub struct SetDnsServers<'a> {
    #[at_arg(position = 0)]
    pub context_id: ContextId,
    #[at_arg(position = 1, len = 64)]
    pub primary: &'a str,
    #[at_arg(position = 2, len = 64)]
    pub secondary: Option<&'a str>,
}

/// Start a DNS resolution `AT+QIDNSGIP`
///
/// Replies `OK` immediately; the addresses arrive later via
/// `+QIURC: "dnsgip"`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+QIDNSGIP", NoResponse, timeout_ms = 60000)]
pub struct ResolveHostName<'a> {
    #[at_arg(position = 0)]
    pub context_id: ContextId,
    #[at_arg(position = 1, len = 128)]
    pub hostname: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn serialize_pdn_config() {
        let mut buf = [0u8; 192];
        let len = SetPdnConfig {
            context_id: ContextId(1),
            context_type: ProtocolType::IPv4,
            apn: "soracom.io",
            username: "sora",
            password: "sora",
            auth: AuthenticationType::Chap,
        }
        .write(&mut buf);
        assert_eq!(
            &buf[..len],
            b"AT+QICSGP=1,1,\"soracom.io\",\"sora\",\"sora\",2\r\n"
        );
    }

    #[test]
    fn pdn_config_read_maps_auth() {
        let resp = GetPdnConfig {
            context_id: ContextId(1),
        }
        .parse(Ok(b"+QICSGP: 1,\"soracom.io\",\"sora\",\"sora\",2"))
        .unwrap();
        assert_eq!(resp.context_type, ProtocolType::IPv4);
        assert_eq!(resp.apn.as_str(), "soracom.io");
        assert_eq!(resp.auth, Some(AuthenticationType::Chap));

        // "PAP or CHAP" parses but is flagged unsupported.
        let resp = GetPdnConfig {
            context_id: ContextId(1),
        }
        .parse(Ok(b"+QICSGP: 1,\"soracom.io\",\"\",\"\",3"))
        .unwrap();
        assert_eq!(resp.auth, None);
    }

    #[test]
    fn pdn_status_parses_rows() {
        let resp = GetPdnStatus
            .parse(Ok(
                b"+QIACT: 1,1,1,\"10.187.72.103\"\r\n+QIACT: 2,0,2,\"::1\"",
            ))
            .unwrap();
        assert_eq!(resp.contexts.len(), 2);
        assert_eq!(resp.contexts[0].context_id, ContextId(1));
        assert!(resp.contexts[0].active);
        assert_eq!(resp.contexts[0].family, PdpAddressFamily::IPv4);
        assert_eq!(resp.contexts[0].ip.as_str(), "10.187.72.103");
        assert!(!resp.contexts[1].active);
    }

    #[test]
    fn pdn_status_stops_at_first_bad_row_and_keeps_the_rest() {
        // Dual stack rows are not modelled; the sweep ends there.
        let resp = GetPdnStatus
            .parse(Ok(
                b"+QIACT: 1,1,1,\"10.0.0.2\"\r\n+QIACT: 2,1,3,\"10.0.0.3\"\r\n+QIACT: 3,1,1,\"10.0.0.4\"",
            ))
            .unwrap();
        assert_eq!(resp.contexts.len(), 1);
        assert_eq!(resp.contexts[0].context_id, ContextId(1));
    }

    #[test]
    fn pdn_status_rejects_out_of_range_context() {
        let resp = GetPdnStatus.parse(Ok(b"+QIACT: 17,1,1,\"10.0.0.2\"")).unwrap();
        assert!(resp.contexts.is_empty());
    }

    #[test]
    fn pdn_status_empty_reply() {
        let resp = GetPdnStatus.parse(Ok(b"")).unwrap();
        assert!(resp.contexts.is_empty());
    }

    #[test]
    fn serialize_dns_config_with_optional_secondary() {
        let mut buf = [0u8; 160];
        let len = SetDnsServers {
            context_id: ContextId(1),
            primary: "8.8.8.8",
            secondary: None,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QIDNSCFG=1,\"8.8.8.8\"\r\n");

        let len = SetDnsServers {
            context_id: ContextId(1),
            primary: "8.8.8.8",
            secondary: Some("1.1.1.1"),
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QIDNSCFG=1,\"8.8.8.8\",\"1.1.1.1\"\r\n");
    }

    #[test]
    fn serialize_dns_query() {
        let mut buf = [0u8; 160];
        let len = ResolveHostName {
            context_id: ContextId(1),
            hostname: "example.com",
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+QIDNSGIP=1,\"example.com\"\r\n");
    }
}
