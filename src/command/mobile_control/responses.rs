//! Responses for status control and power commands
use super::types::Functionality;

/// `+CFUN: <fun>`. `None` for levels this driver does not model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleFunctionality {
    pub fun: Option<Functionality>,
}

impl atat::AtatResp for ModuleFunctionality {}

/// `+QTEMP: <pmic>,<xo>,<pa>`, degrees Celsius.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemTemperatures {
    pub pmic: i16,
    pub xo: i16,
    pub pa: i16,
}

impl atat::AtatResp for ModemTemperatures {}

/// Power saving mode negotiation parameters.
///
/// `periodic_rau` and `gprs_ready_timer` are carried for completeness; the
/// module neither reports nor accepts non-empty values for them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PsmSettings {
    pub mode: u8,
    pub periodic_rau: u32,
    pub gprs_ready_timer: u32,
    pub periodic_tau: u32,
    pub active_time: u32,
}

impl atat::AtatResp for PsmSettings {}

/// `+QPSMCFG: <threshold>,<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PsmConfig {
    /// Deep sleep entry threshold, seconds.
    pub threshold: u32,
    /// Negotiated PSM version bitmask.
    pub version: u8,
}

impl atat::AtatResp for PsmConfig {}
