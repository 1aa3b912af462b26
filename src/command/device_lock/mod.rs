//! ### Device lock commands
pub mod responses;
pub mod types;

use atat::{AtatCmd, InternalError};

use super::text_response;
use responses::PinStatus;
use types::PinStatusCode;

/// Read the SIM lock state `AT+CPIN?`
///
/// The reply value is a bare keyword, possibly containing spaces
/// (`+CPIN: PH-SIM PIN`), so it is matched literally rather than
/// deserialised.
#[derive(Clone)]
pub struct GetPinStatus;

impl AtatCmd for GetPinStatus {
    type Response = PinStatus;
    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CPIN?\r\n";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let line = text_response(resp)?;
        let value = line
            .trim()
            .strip_prefix("+CPIN:")
            .ok_or(atat::Error::Parse)?
            .trim();
        Ok(PinStatus {
            code: PinStatusCode::from_keyword(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn ready_and_locked_states() {
        let resp = GetPinStatus.parse(Ok(b"+CPIN: READY")).unwrap();
        assert_eq!(resp.code, PinStatusCode::Ready);

        let resp = GetPinStatus.parse(Ok(b"+CPIN: SIM PIN")).unwrap();
        assert_eq!(resp.code, PinStatusCode::SimPin);

        let resp = GetPinStatus.parse(Ok(b"+CPIN: PH-NET PUK")).unwrap();
        assert_eq!(resp.code, PinStatusCode::PhNetPuk);
    }

    #[test]
    fn unrecognised_keyword_is_unknown_not_an_error() {
        let resp = GetPinStatus.parse(Ok(b"+CPIN: SOMETHING ELSE")).unwrap();
        assert_eq!(resp.code, PinStatusCode::Unknown);
    }

    #[test]
    fn missing_prefix_is_an_error() {
        assert!(GetPinStatus.parse(Ok(b"READY")).is_err());
    }
}
