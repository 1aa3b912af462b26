//! Responses for SIM related commands
use atat::atat_derive::AtatResp;
use heapless::String;

/// `+QCCID: <iccid>`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct Ccid {
    #[at_arg(position = 0)]
    pub ccid: String<22>,
}

/// Bare-line reply to `AT+CIMI`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Imsi {
    pub imsi: String<16>,
}

impl atat::AtatResp for Imsi {}

/// Home PLMN, decoded from `EF_HPLMNwAcT`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hplmn {
    pub mcc: String<3>,
    pub mnc: String<3>,
}

impl atat::AtatResp for Hplmn {}
