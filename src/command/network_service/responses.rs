//! Responses for network service commands
use heapless::String;

use super::types::{OperatorSelectionMode, RatAct, RegistrationStat};

/// Operator field of `+COPS?`, split per the reported `<format>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operator {
    /// `<format>` 2: the numeric PLMN, split into MCC and MNC.
    Plmn { mcc: String<3>, mnc: String<3> },
    /// `<format>` 0/1: the network name as reported.
    Name(String<24>),
}

/// `+COPS: <mode>[,<format>,<oper>[,<act>]]`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatorSelection {
    pub mode: OperatorSelectionMode,
    pub operator: Option<Operator>,
    pub act: Option<RatAct>,
}

impl atat::AtatResp for OperatorSelection {}

/// `+QNWINFO: <act>,<oper>,<band>,<channel>`, only ever populated while
/// camped on an eMTC cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkInfo {
    pub mcc: String<3>,
    pub mnc: String<3>,
    /// LTE band number out of the `"LTE BAND <n>"` string.
    pub band: u8,
    /// E-UTRA absolute radio frequency channel number.
    pub channel: u32,
}

impl atat::AtatResp for NetworkInfo {}

/// `+CEREG: <n>,<stat>[,<tac>,<ci>[,<act>]]`
///
/// `tac`/`cell_id` are only carried while registered on an LTE cell;
/// anything else reports `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EpsRegistrationStatus {
    pub stat: RegistrationStat,
    pub tac: Option<u16>,
    pub cell_id: Option<u32>,
    pub act: Option<RatAct>,
}

impl atat::AtatResp for EpsRegistrationStatus {}
