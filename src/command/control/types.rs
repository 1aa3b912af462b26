//! Argument and parameter types used by V.24/V.25ter commands and responses

use atat::atat_derive::AtatEnum;

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum Echo {
    /// 0: Echo off
    Off = 0,
    /// 1 (factory-programmed value): Echo on
    On = 1,
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum DtrFunction {
    /// 0: the module ignores the DTR circuit
    Ignore = 0,
    /// 1: ON-to-OFF transition enters online command state
    OnlineCommandState = 1,
    /// 2 (factory-programmed value): ON-to-OFF transition disconnects the call
    Disconnect = 2,
}

/// One direction of `AT+IFC`. XON/XOFF modes exist in the manual but are not
/// usable on this module together with the data plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
pub enum FlowControlValue {
    None = 0,
    RtsCts = 2,
}

/// Combined flow-control state of the UART, derived from the `+IFC?` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControlMode {
    None,
    RtsOnly,
    CtsOnly,
    RtsCts,
    Unknown,
}

impl FlowControlMode {
    pub fn from_pair(dce_by_dte: u8, dte_by_dce: u8) -> Self {
        match (dce_by_dte, dte_by_dce) {
            (0, 0) => FlowControlMode::None,
            (2, 0) => FlowControlMode::RtsOnly,
            (0, 2) => FlowControlMode::CtsOnly,
            (2, 2) => FlowControlMode::RtsCts,
            _ => FlowControlMode::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_control_mode_from_pair() {
        assert_eq!(FlowControlMode::from_pair(2, 2), FlowControlMode::RtsCts);
        assert_eq!(FlowControlMode::from_pair(2, 0), FlowControlMode::RtsOnly);
        assert_eq!(FlowControlMode::from_pair(0, 2), FlowControlMode::CtsOnly);
        assert_eq!(FlowControlMode::from_pair(0, 0), FlowControlMode::None);
        assert_eq!(FlowControlMode::from_pair(1, 1), FlowControlMode::Unknown);
    }
}
