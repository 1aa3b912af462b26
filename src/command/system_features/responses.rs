//! Responses for extended configuration commands
use crate::bands::LteBandMask;
use crate::config::UrcPort;

use super::types::{BandPriorityList, IotOpMode, NetworkOperatorMode, ScanSequence};

/// `+QCFG: "band",<gsm>,<lte>,<nbiot>` — only the LTE-M mask is modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandConfiguration {
    pub lte_mask: LteBandMask,
}

impl atat::AtatResp for BandConfiguration {}

/// `+QCFG: "nwscanseq",<code>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSequenceConfiguration {
    pub sequence: ScanSequence,
}

impl atat::AtatResp for ScanSequenceConfiguration {}

/// `+QCFG: "iotopmode",<mode>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IotOpModeConfiguration {
    pub mode: IotOpMode,
}

impl atat::AtatResp for IotOpModeConfiguration {}

/// `+QCFG: "lwm2m",<0|1>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lwm2mConfiguration {
    pub enabled: bool,
}

impl atat::AtatResp for Lwm2mConfiguration {}

/// `+QCFG: "nwoper",<mode>[,"AUTO"]`, with or without its prefix depending on
/// the firmware revision.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkOperatorConfiguration {
    pub mode: NetworkOperatorMode,
    /// The trailing `"AUTO"` marker: the module picked the profile from the
    /// SIM rather than an explicit write.
    pub automatic: bool,
}

impl atat::AtatResp for NetworkOperatorConfiguration {}

/// `+QCFG: "lte/bandprior"[,<b1>...]`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandPriorityConfiguration {
    pub bands: BandPriorityList,
}

impl atat::AtatResp for BandPriorityConfiguration {}

/// `+QURCCFG: "urcport",<port>`. `None` for ports this driver does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UrcPortConfiguration {
    pub port: Option<UrcPort>,
}

impl atat::AtatResp for UrcPortConfiguration {}
