//! ### V.24 control and V.25ter commands
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::{DataRate, FlowControlReport};
use types::{DtrFunction, Echo, FlowControlValue};

use super::NoResponse;

/// Set command echo mode `ATE`
///
/// Controls whether or not the module echoes characters received from the
/// host during command state.
#[derive(Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false)]
pub struct SetEcho {
    #[at_arg(position = 0)]
    pub enabled: Echo,
}

/// Set DTR function mode `AT&D`
///
/// The module ignores (or not) the DTR circuit. Behaviour on a DTR
/// ON-to-OFF transition is not used by this driver.
#[derive(Clone, AtatCmd)]
#[at_cmd("&D", NoResponse, value_sep = false)]
pub struct SetDtrFunction {
    #[at_arg(position = 0)]
    pub mode: DtrFunction,
}

/// Set UART flow control `AT+IFC`
///
/// Both directions are negotiated independently: `<dce_by_dte>` is the flow
/// the host applies to the module (RTS), `<dte_by_dce>` the flow the module
/// applies to the host (CTS).
#[derive(Clone, AtatCmd)]
#[at_cmd("+IFC", NoResponse)]
pub struct SetFlowControl {
    #[at_arg(position = 0)]
    pub dce_by_dte: FlowControlValue,
    #[at_arg(position = 1)]
    pub dte_by_dce: FlowControlValue,
}

/// Read UART flow control `AT+IFC?`
#[derive(Clone, AtatCmd)]
#[at_cmd("+IFC?", FlowControlReport)]
pub struct GetFlowControl;

/// Set UART baud rate `AT+IPR`
///
/// The new rate takes effect after the final result code; callers are
/// expected to reconfigure their own UART immediately after.
#[derive(Clone, AtatCmd)]
#[at_cmd("+IPR", NoResponse)]
pub struct SetDataRate {
    #[at_arg(position = 0)]
    pub rate: u32,
}

/// Read UART baud rate `AT+IPR?`
#[derive(Clone, AtatCmd)]
#[at_cmd("+IPR?", DataRate)]
pub struct GetDataRate;

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn echo_off_has_no_value_separator() {
        let mut buf = [0u8; 16];
        let len = SetEcho { enabled: Echo::Off }.write(&mut buf);
        assert_eq!(&buf[..len], b"ATE0\r\n");
    }

    #[test]
    fn dtr_ignored() {
        let mut buf = [0u8; 16];
        let len = SetDtrFunction {
            mode: DtrFunction::Ignore,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT&D0\r\n");
    }

    #[test]
    fn hardware_flow_control_both_directions() {
        let mut buf = [0u8; 16];
        let len = SetFlowControl {
            dce_by_dte: FlowControlValue::RtsCts,
            dte_by_dce: FlowControlValue::RtsCts,
        }
        .write(&mut buf);
        assert_eq!(&buf[..len], b"AT+IFC=2,2\r\n");
    }

    #[test]
    fn deserialize_flow_control_report() {
        let report: FlowControlReport = atat::serde_at::from_slice(b"+IFC: 2,2").unwrap();
        assert_eq!(
            report,
            FlowControlReport {
                dce_by_dte: 2,
                dte_by_dce: 2
            }
        );
    }
}
