//! Argument and parameter types used by network service commands and responses

use atat::atat_derive::AtatEnum;

/// Signal measurements, each `None` when the modem does not report it or the
/// reported value is out of range.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalInfo {
    /// Received signal strength, dBm.
    pub rssi: Option<i16>,
    /// Reference signal received power, dBm.
    pub rsrp: Option<i16>,
    /// Reference signal received quality, dB.
    pub rsrq: Option<i16>,
    /// Signal to interference+noise ratio, dB.
    pub sinr: Option<i16>,
    /// RxQual bit error rate index, 0..=7.
    pub ber: Option<u8>,
    /// Display bars, 0..=5.
    pub bars: Option<u8>,
}

impl atat::AtatResp for SignalInfo {}

/// `+CSQ` <rssi> index to dBm. 0..=31 span -113..=-51 dBm in 2 dB steps; 99
/// is "not known or not detectable".
pub fn csq_rssi_to_dbm(raw: u32) -> Option<i16> {
    match raw {
        0..=31 => i16::try_from(-113 + 2 * raw as i32).ok(),
        _ => None,
    }
}

/// `+CSQ` <ber> RxQual index, 0..=7 valid.
pub fn csq_ber(raw: u32) -> Option<u8> {
    match raw {
        0..=7 => Some(raw as u8),
        _ => None,
    }
}

/// `+QCSQ` reports SINR as 0..=250, mapping linearly to -20..=30 dB.
pub fn qcsq_sinr_to_db(raw: i32) -> Option<i16> {
    match raw {
        0..=250 => Some((-20 + raw / 5) as i16),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorSelectionMode {
    Automatic = 0,
    Manual = 1,
    Deregister = 2,
    /// Only sets `<format>` for later reads; never reported by `+COPS?`.
    SetFormatOnly = 3,
    ManualFallbackAutomatic = 4,
}

impl OperatorSelectionMode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Automatic),
            1 => Some(Self::Manual),
            2 => Some(Self::Deregister),
            4 => Some(Self::ManualFallbackAutomatic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorNameFormat {
    Long = 0,
    Short = 1,
    Numeric = 2,
}

/// Registration state shared by `+CREG`/`+CEREG` reads and URCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStat {
    NotRegistered,
    RegisteredHome,
    Searching,
    Denied,
    Unknown,
    RegisteredRoaming,
}

impl RegistrationStat {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => RegistrationStat::NotRegistered,
            1 => RegistrationStat::RegisteredHome,
            2 => RegistrationStat::Searching,
            3 => RegistrationStat::Denied,
            5 => RegistrationStat::RegisteredRoaming,
            _ => RegistrationStat::Unknown,
        }
    }

    pub fn is_registered(self) -> bool {
        matches!(
            self,
            RegistrationStat::RegisteredHome | RegistrationStat::RegisteredRoaming
        )
    }
}

/// `<AcT>` values reported by the registration commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RatAct {
    Gsm,
    Lte,
    LteCatM1,
    LteNbS1,
    Unknown,
}

impl RatAct {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => RatAct::Gsm,
            7 => RatAct::Lte,
            8 => RatAct::LteCatM1,
            9 => RatAct::LteNbS1,
            _ => RatAct::Unknown,
        }
    }

    /// The cell-identity fields are only meaningful on an LTE serving cell.
    pub fn is_lte(self) -> bool {
        matches!(self, RatAct::Lte | RatAct::LteCatM1)
    }
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum RegistrationUrcConfig {
    /// 0 (default): URC disabled
    Disabled = 0,
    /// 1: `+CxREG: <stat>`
    Enabled = 1,
    /// 2: `+CxREG: <stat>[,<tac>,<ci>[,<act>]]`
    EnabledWithLocation = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csq_conversions() {
        assert_eq!(csq_rssi_to_dbm(0), Some(-113));
        assert_eq!(csq_rssi_to_dbm(18), Some(-77));
        assert_eq!(csq_rssi_to_dbm(31), Some(-51));
        assert_eq!(csq_rssi_to_dbm(99), None);

        assert_eq!(csq_ber(7), Some(7));
        assert_eq!(csq_ber(99), None);
    }

    #[test]
    fn sinr_rescale() {
        assert_eq!(qcsq_sinr_to_db(0), Some(-20));
        assert_eq!(qcsq_sinr_to_db(125), Some(5));
        assert_eq!(qcsq_sinr_to_db(250), Some(30));
        assert_eq!(qcsq_sinr_to_db(251), None);
        assert_eq!(qcsq_sinr_to_db(-1), None);
    }
}
