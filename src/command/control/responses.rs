//! Responses for V.24/V.25ter commands
use atat::atat_derive::AtatResp;

/// `+IFC: <dce_by_dte>,<dte_by_dce>`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct FlowControlReport {
    #[at_arg(position = 0)]
    pub dce_by_dte: u8,
    #[at_arg(position = 1)]
    pub dte_by_dce: u8,
}

/// `+IPR: <rate>`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct DataRate {
    #[at_arg(position = 0)]
    pub rate: u32,
}
