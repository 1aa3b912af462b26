//! Responses for device lock commands
use super::types::PinStatusCode;

/// `+CPIN: <code>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinStatus {
    pub code: PinStatusCode,
}

impl atat::AtatResp for PinStatus {}
