//! Argument and parameter types used by TCP/IP commands and responses

/// Most bytes one `AT+QISEND`/`AT+QSSLSEND` stage may carry.
pub const MAX_SEND_DATA_LEN: usize = 1460;

/// Most bytes one `AT+QIRD`/`AT+QSSLRECV` read may return.
pub const MAX_RECV_DATA_LEN: usize = 1500;

/// `<service_type>` of `AT+QIOPEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketService {
    Tcp,
    UdpService,
}

impl SocketService {
    pub const fn as_str(self) -> &'static str {
        match self {
            SocketService::Tcp => "TCP",
            SocketService::UdpService => "UDP SERVICE",
        }
    }
}

/// `<access_mode>` of `AT+QIOPEN`/`AT+QSSLOPEN`. Only buffered access works
/// with this driver's data plane; direct-push and transparent modes would
/// bypass the read commands entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessMode {
    Buffer,
}

impl AccessMode {
    pub const fn value(self) -> u8 {
        match self {
            AccessMode::Buffer => 0,
        }
    }
}
