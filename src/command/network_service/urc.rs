//! URC payloads for network service events
use crate::scanner::Scanner;

use super::types::{csq_ber, csq_rssi_to_dbm, RatAct, RegistrationStat};

/// `+CREG`/`+CEREG` URC body: `<stat>[,<tac>,<ci>[,<act>]]`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistrationUpdate {
    pub stat: RegistrationStat,
    pub tac: Option<u16>,
    pub cell_id: Option<u32>,
    pub act: Option<RatAct>,
}

impl RegistrationUpdate {
    pub(crate) fn parse(scan: &mut Scanner) -> Option<Self> {
        let stat = RegistrationStat::from_u8(scan.next_u8().ok()?);
        let tac = scan
            .next_token()
            .and_then(|t| u16::from_str_radix(t, 16).ok());
        let cell_id = scan
            .next_token()
            .and_then(|t| u32::from_str_radix(t, 16).ok());
        let act = scan.next_u8().ok().map(RatAct::from_u8);
        Some(Self {
            stat,
            tac,
            cell_id,
            act,
        })
    }
}

/// `+QIND: "csq",<rssi>,<ber>` — same raw units as `+CSQ`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalStrengthUpdate {
    pub rssi_dbm: Option<i16>,
    pub ber: Option<u8>,
}

impl SignalStrengthUpdate {
    pub(crate) fn parse(scan: &mut Scanner) -> Option<Self> {
        Some(Self {
            rssi_dbm: csq_rssi_to_dbm(scan.next_u32().ok()?),
            ber: csq_ber(scan.next_u32().ok()?),
        })
    }
}
