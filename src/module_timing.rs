use embassy_time::Duration;

/// Low time of `PWRKEY` to trigger module switch on from power off mode.
pub fn pwr_on_time() -> Duration {
    Duration::from_millis(600)
}

/// Low time of `PWRKEY` to trigger a graceful switch off.
pub fn pwr_off_time() -> Duration {
    Duration::from_millis(700)
}

/// Low time of `RESET_N` to trigger a module reset (reboot).
pub fn reset_time() -> Duration {
    Duration::from_millis(100)
}

/// Longest time between releasing `PWRKEY` and the `APP RDY` URC.
pub fn app_ready_time() -> Duration {
    Duration::from_secs(10)
}

/// Extra settling time after `APP RDY` before the module reliably accepts
/// commands. Empirical.
pub fn app_ready_settle_time() -> Duration {
    Duration::from_secs(5)
}

/// Command timeouts, in milliseconds, for operations the BG77x documents as
/// slower than the generic 5 s default. Used as `MAX_TIMEOUT_MS` on the
/// corresponding commands.
pub mod timeout_ms {
    /// Generic command round-trip.
    pub const DEFAULT: u32 = 5_000;
    /// `AT+QIACT` PDP context activation.
    pub const PDN_ACTIVATE: u32 = 150_000;
    /// `AT+QIDEACT` PDP context deactivation.
    pub const PDN_DEACTIVATE: u32 = 40_000;
    /// `AT+QIOPEN` TCP/UDP connect (result arrives as URC; this bounds the
    /// synchronous `OK`).
    pub const SOCKET_CONNECT: u32 = 150_000;
    /// `AT+QSSLOPEN` TLS connect.
    pub const TLS_SOCKET_CONNECT: u32 = 150_000;
    /// `AT+QICLOSE` / `AT+QSSLCLOSE` orderly disconnect.
    pub const SOCKET_DISCONNECT: u32 = 10_000;
    /// `AT+QIRD` / `AT+QSSLRECV` buffered read.
    pub const DATA_READ: u32 = 10_000;
    /// `AT+QISEND` / `AT+QSSLSEND` payload stage, through `SEND OK`.
    pub const DATA_SEND: u32 = 120_000;
    /// `AT+COPS` operator selection.
    pub const OPERATOR_SELECTION: u32 = 180_000;
    /// `AT+QIDNSGIP` synchronous `OK` (the result itself is a URC).
    pub const DNS_REQUEST: u32 = 60_000;
    /// `AT+QFUPL` file payload stage.
    pub const FILE_UPLOAD: u32 = 60_000;
    /// `AT+QPOWD` power down acknowledgement.
    pub const POWER_DOWN: u32 = 40_000;
}

/// How long a DNS resolution may sit between the `AT+QIDNSGIP` `OK` and the
/// `+QIURC: "dnsgip"` result.
pub fn dns_result_time() -> Duration {
    Duration::from_secs(60)
}
