//! AT Commands for the Quectel BG77x module family\
//! Following the BG77xA-GL AT Commands Manual and the TCP/IP, SSL and FILE
//! application notes.

pub mod control;
pub mod device_lock;
pub mod file_system;
pub mod general;
pub mod ip_transport_layer;
pub mod mobile_control;
pub mod network_service;
pub mod psn;
pub mod ssl;
pub mod system_features;
pub mod urc;

use atat::atat_derive::{AtatCmd, AtatResp};

pub use urc::Urc;

/// Unwraps a response body into `&str` for the hand-written parsers. Error
/// finals pass through untouched so the engine sees the modem's own verdict.
pub(crate) fn text_response<'a>(
    resp: Result<&'a [u8], atat::InternalError>,
) -> Result<&'a str, atat::Error> {
    let bytes = resp.map_err(atat::Error::from)?;
    core::str::from_utf8(bytes).map_err(|_| atat::Error::Parse)
}

#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct NoResponse;

/// Attention probe. `OK` is the whole conversation.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse, timeout_ms = 1000)]
pub struct AT;
