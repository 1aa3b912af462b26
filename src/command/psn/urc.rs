//! URC payloads for packet domain events
use heapless::String;

use crate::scanner::Scanner;

use super::types::ContextId;

/// One `+QIURC: "dnsgip",...` line. The modem answers a `+QIDNSGIP` query
/// with a header (`<result>,<ip_count>[,<ttl>]`) followed by one line per
/// address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DnsResult {
    Header { result: u32, ip_count: u32 },
    Address(String<64>),
}

impl DnsResult {
    pub(crate) fn parse(scan: &mut Scanner) -> Option<Self> {
        let first = scan.next_token()?;
        if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) {
            let result = first.parse().ok()?;
            let ip_count = scan.next_u32().ok()?;
            Some(DnsResult::Header { result, ip_count })
        } else {
            Some(DnsResult::Address(String::try_from(first).ok()?))
        }
    }
}

/// `+QIURC: "pdpdeact",<context_id>` — the network tore the bearer down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdpDeactivated {
    pub context_id: ContextId,
}

impl PdpDeactivated {
    pub(crate) fn parse(scan: &mut Scanner) -> Option<Self> {
        Some(Self {
            context_id: ContextId(scan.next_u8().ok()?),
        })
    }
}
