use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::command::system_features::types::ScanSequence;

pub struct NoPin;

impl ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct ReverseOutputPin<P: OutputPin<Error = Infallible>>(pub P);

impl<P: OutputPin<Error = Infallible>> ErrorType for ReverseOutputPin<P> {
    type Error = Infallible;
}

impl<P: OutputPin<Error = Infallible>> OutputPin for ReverseOutputPin<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::Low => self.0.set_state(PinState::High),
            PinState::High => self.0.set_state(PinState::Low),
        }
    }
}

pub struct ReverseInputPin<P: InputPin<Error = Infallible>>(pub P);

impl<P: InputPin<Error = Infallible>> ErrorType for ReverseInputPin<P> {
    type Error = Infallible;
}

impl<P: InputPin<Error = Infallible>> InputPin for ReverseInputPin<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}

/// The serial port URCs are routed to while the module is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrcPort {
    Main,
    Aux,
    Emux,
}

impl UrcPort {
    pub const fn as_str(self) -> &'static str {
        match self {
            UrcPort::Main => "main",
            UrcPort::Aux => "aux",
            UrcPort::Emux => "emux",
        }
    }
}

/// Board-level configuration of the BG77x module.
///
/// `ResetPin` drives `RESET_N`, `PowerPin` drives `PWRKEY` and `StatusPin`
/// reads the `STATUS` output. Boards that hard-wire a line can plug in
/// [`NoPin`].
pub trait CellularConfig {
    type ResetPin: OutputPin;
    type PowerPin: OutputPin;
    type StatusPin: InputPin;

    /// Whether the UART towards the module runs RTS/CTS flow control.
    const FLOW_CONTROL: bool = true;

    /// Abort the enablement sequence right after a flow-control write, so the
    /// host can reconfigure its own UART before the remaining steps run.
    const SKIP_SETUP_AFTER_FLOW_CONTROL_CHANGE: bool = false;

    /// Serial port the module routes URCs to.
    const URC_PORT: UrcPort = if cfg!(feature = "urc-port-emux") {
        UrcPort::Emux
    } else {
        UrcPort::Main
    };

    /// Radio access technology scan order programmed during enablement.
    const SCAN_SEQUENCE: ScanSequence = ScanSequence::EMTC_ONLY;

    /// Radix of the `+QPSMS`/`+QPSMCFG` timer tokens in read replies. The AT
    /// manual documents 8-character binary strings, but some firmware
    /// revisions report plain decimal; pick per targeted firmware.
    const PSM_TIMER_RADIX: u32 = 10;

    /// Upper bound accepted by the file staging API.
    const MAX_FILE_SIZE: usize = 8192;

    fn reset_pin(&mut self) -> Option<&mut Self::ResetPin>;
    fn power_pin(&mut self) -> Option<&mut Self::PowerPin>;
    fn status_pin(&mut self) -> Option<&mut Self::StatusPin>;
}
