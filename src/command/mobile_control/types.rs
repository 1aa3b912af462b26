//! Argument and parameter types used by status control and power commands

use atat::atat_derive::AtatEnum;

/// `AT+CFUN` functionality levels supported by the BG77x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Functionality {
    /// 0: minimum functionality, SIM powered down
    Minimum = 0,
    /// 1 (factory-programmed value): full functionality
    Full = 1,
    /// 4: both RF paths off, SIM stays powered ("airplane mode")
    SimOnly = 4,
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum PowerDownMode {
    /// 0: power down immediately, without network detach
    Immediate = 0,
    /// 1 (default): normal power down, detach first
    Normal = 1,
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum TimeZoneReportingMode {
    /// 0 (default): reporting disabled
    Disabled = 0,
    /// 1: report time zone changes with `+CTZV`
    EnableTimeZone = 1,
    /// 2: report with extended `+CTZE`
    EnableTimeZoneExtended = 2,
}
