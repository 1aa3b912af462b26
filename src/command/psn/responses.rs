//! Responses for packet domain commands
use heapless::{String, Vec};

use super::types::{
    AuthenticationType, ContextId, PdpAddressFamily, ProtocolType, MAX_PDP_CONTEXTS,
};

/// `+QICSGP: <context_type>,<apn>,<username>,<password>,<auth>`
///
/// `auth` is `None` when the module reports the "PAP or CHAP" combination,
/// which this driver does not support.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdnConfig {
    pub context_type: ProtocolType,
    pub apn: String<64>,
    pub username: String<32>,
    pub password: String<32>,
    pub auth: Option<AuthenticationType>,
}

impl atat::AtatResp for PdnConfig {}

/// One `+QIACT: <id>,<state>,<type>,"<ip>"` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdnStatus {
    pub context_id: ContextId,
    pub active: bool,
    pub family: PdpAddressFamily,
    pub ip: String<64>,
}

/// Everything `+QIACT?` reported before the first unparseable row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdnStatusList {
    pub contexts: Vec<PdnStatus, MAX_PDP_CONTEXTS>,
}

impl atat::AtatResp for PdnStatusList {}
