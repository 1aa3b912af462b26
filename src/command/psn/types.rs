//! Argument and parameter types used by packet domain commands and responses

use atat::atat_derive::{AtatEnum, AtatLen};
use serde::{Deserialize, Serialize};

/// PDP context identifier, 1..=16 on this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AtatLen)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u8);

pub const CONTEXT_ID_MIN: u8 = 1;
pub const CONTEXT_ID_MAX: u8 = 16;

impl ContextId {
    pub fn is_valid(self) -> bool {
        (CONTEXT_ID_MIN..=CONTEXT_ID_MAX).contains(&self.0)
    }
}

/// `<context_type>` of `AT+QICSGP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolType {
    IPv4 = 1,
    IPv6 = 2,
    IPv4v6 = 3,
}

/// PDP authentication. The module also knows a "PAP or CHAP" value 3; it is
/// deliberately unrepresentable here, the driver treats it as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuthenticationType {
    None = 0,
    Pap = 1,
    Chap = 2,
}

/// Address family of an activated context, out of `+QIACT?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdpAddressFamily {
    IPv4,
    IPv6,
}

/// Most contexts a `+QIACT?` sweep will report.
pub const MAX_PDP_CONTEXTS: usize = 16;
