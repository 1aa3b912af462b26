use crate::socket;

/// Host-facing error taxonomy.
///
/// Lifecycle errors that C-style APIs signal through handle validation
/// (`InvalidHandle`, `LibraryNotOpen`, ...) are unrepresentable here: the
/// driver handle is a borrow-checked resource, so holding one proves the
/// driver is open.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The enablement sequence has not completed (or was short-circuited by a
    /// flow-control change and must be re-run).
    ModemNotReady,
    /// Caller-supplied value out of range, or an empty band mask after
    /// filtering against the supported set.
    BadParameter,
    /// An internal buffer was too small for the formatted command or the
    /// copied response.
    NoMemory,
    /// The command engine or the DNS rendezvous did not see the expected
    /// tokens in time.
    Timeout,
    /// Operation attempted on a socket past its `Disconnected` state.
    SocketClosed,
    /// Operation requires a `Connected` socket.
    SocketNotConnected,
    /// Formatter overflow, table-lookup miss or another "impossible"
    /// combination.
    InternalFailure,
    /// Option is known but not valid on this modem variant (e.g. a dual-stack
    /// `IPv4v6` PDP context, or the `PAP or CHAP` authentication setting).
    Unsupported,
    /// Operation forbidden in the current state (e.g. connect on an
    /// already-connecting socket).
    NotAllowed,
    /// File staging API failures.
    FileUploadFailure,
    FileAlreadyExists,
    FileNotFound,
    /// Socket registry errors.
    Socket(socket::Error),
    /// Command/response engine errors that carry no better mapping.
    Atat(atat::Error),
    /// Residual framer status not mapped above.
    Unknown,
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        match e {
            atat::Error::Timeout => Error::Timeout,
            atat::Error::Parse | atat::Error::InvalidResponse => Error::InternalFailure,
            other => Error::Atat(other),
        }
    }
}

impl From<socket::Error> for Error {
    fn from(e: socket::Error) -> Self {
        match e {
            socket::Error::NotConnected => Error::SocketNotConnected,
            socket::Error::Closed => Error::SocketClosed,
            socket::Error::Illegal => Error::NotAllowed,
            other => Error::Socket(other),
        }
    }
}
