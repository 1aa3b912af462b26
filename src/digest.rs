//! Line/byte classification for the BG77x AT dialect.
//!
//! [`Bg770Digester`] slots into `atat::Ingress` and decides, for every chunk
//! of inbound serial data, whether the bytes at the head of the buffer are a
//! URC, part of a command response, a binary payload announced by an inline
//! `+QIRD:`/`+QSSLRECV:` header, or the `"> "` prompt that precedes a raw
//! payload write. Binary payloads are length-delimited, never scanned, so
//! `\r\nOK\r\n` appearing inside socket data does not terminate anything.

use atat::digest::{DigestResult, Digester};
use atat::InternalError;

/// Final result codes that fail the in-flight command.
pub const ERROR_TOKENS: &[&[u8]] = &[
    b"ERROR",
    b"BUSY",
    b"NO ANSWER",
    b"NO CARRIER",
    b"NO DIALTONE",
    b"SEND FAIL",
];

/// Final result codes that complete the in-flight command.
pub const SUCCESS_TOKENS: &[&[u8]] = &[b"OK", b"SEND OK", b"CONNECT"];

/// URCs recognised by full-line match.
pub const FLAT_URCS: &[&[u8]] = &[
    b"APP RDY",
    b"NORMAL POWER DOWN",
    b"POWERED DOWN",
    b"PSM POWER DOWN",
    b"RDY",
];

/// URCs recognised by prefix. Must stay in sync with
/// [`Urc`](crate::command::Urc).
pub const URC_PREFIXES: &[&[u8]] = &[
    b"+QIURC:",
    b"+QSSLURC:",
    b"+QIOPEN:",
    b"+QSSLOPEN:",
    b"+QIND:",
    b"+QPSMTIMER:",
    b"+CREG:",
    b"+CEREG:",
    b"+CTZV:",
    b"+CTZE:",
];

/// Longest `+QIRD: <len>` header line including its terminator.
const QIRD_HEADER_WINDOW: usize = 14;
/// Longest `+QSSLRECV: <len>` header line including its terminator.
const QSSLRECV_HEADER_WINDOW: usize = 18;

#[derive(Debug, Default)]
pub struct Bg770Digester {}

impl Bg770Digester {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Digester for Bg770Digester {
    fn digest<'a>(&mut self, buf: &'a [u8]) -> (DigestResult<'a>, usize) {
        // Terminators left over from previously consumed units.
        let lead = buf
            .iter()
            .take_while(|c| matches!(**c, b'\r' | b'\n'))
            .count();
        if lead > 0 {
            return (DigestResult::None, lead);
        }
        if buf.is_empty() {
            return (DigestResult::None, 0);
        }

        // Send prompt. The modem emits exactly `"> "` with no terminator.
        if buf.starts_with(b"> ") {
            return (DigestResult::Prompt(b'>'), 2);
        }

        // Inline binary payloads.
        if let Some(res) = frame_binary(buf, b"+QIRD: ", QIRD_HEADER_WINDOW) {
            return res;
        }
        if let Some(res) = frame_binary(buf, b"+QSSLRECV: ", QSSLRECV_HEADER_WINDOW) {
            return res;
        }

        // Generic line scan: URC / echo / intermediate lines / final token.
        let mut pos = 0;
        let mut body_end = 0;
        let mut saw_body = false;
        loop {
            let Some(line) = take_line(buf, pos) else {
                // No complete line yet; hold everything.
                return (DigestResult::None, 0);
            };
            let content = &buf[line.start..line.end];

            if !saw_body {
                // Command echo, in case `ATE0` has not landed yet.
                if content.starts_with(b"AT") {
                    return (DigestResult::None, line.after);
                }
                if is_urc(content) {
                    return (DigestResult::Urc(content), line.after);
                }
            }

            if SUCCESS_TOKENS.iter().any(|t| *t == content) {
                return (
                    DigestResult::Response(Ok(&buf[..body_end])),
                    line.after,
                );
            }
            if ERROR_TOKENS.iter().any(|t| *t == content) {
                let err = if content == b"ERROR" {
                    InternalError::Error
                } else {
                    InternalError::Custom(content)
                };
                return (DigestResult::Response(Err(err)), line.after);
            }
            if content.starts_with(b"+CME ERROR:") || content.starts_with(b"+CMS ERROR:") {
                return (
                    DigestResult::Response(Err(InternalError::Custom(content))),
                    line.after,
                );
            }

            saw_body = true;
            body_end = line.end;
            pos = line.after;
        }
    }
}

struct Line {
    start: usize,
    end: usize,
    /// Index past the terminator run.
    after: usize,
}

/// Next complete line at or after `from`: leading terminators skipped,
/// content delimited by at least one `\r`/`\n`. `None` until the terminator
/// has arrived.
fn take_line(buf: &[u8], from: usize) -> Option<Line> {
    let mut start = from;
    while start < buf.len() && matches!(buf[start], b'\r' | b'\n') {
        start += 1;
    }
    let mut end = start;
    while end < buf.len() {
        if matches!(buf[end], b'\r' | b'\n') {
            let mut after = end;
            while after < buf.len() && matches!(buf[after], b'\r' | b'\n') {
                after += 1;
            }
            return Some(Line { start, end, after });
        }
        end += 1;
    }
    None
}

fn is_urc(line: &[u8]) -> bool {
    if FLAT_URCS.iter().any(|u| *u == line) {
        return true;
    }
    URC_PREFIXES.iter().any(|p| {
        line.starts_with(p)
            && if *p == b"+CREG:" || *p == b"+CEREG:" {
                !is_registration_read_reply(line, p.len())
            } else {
                true
            }
    })
}

/// `+CREG`/`+CEREG` lines are ambiguous between the URC and the `?` read
/// reply. The driver always configures `<n>=2`, so a read reply leads with
/// two bare numeric fields (`<n>,<stat>`) while the URC leads with one
/// (`<stat>`) followed by the quoted TAC, if anything.
fn is_registration_read_reply(line: &[u8], prefix_len: usize) -> bool {
    let mut bare_numeric = 0;
    for field in line[prefix_len..].split(|c| *c == b',') {
        let field = trim_ascii(field);
        if !field.is_empty() && field.iter().all(u8::is_ascii_digit) {
            bare_numeric += 1;
            if bare_numeric >= 2 {
                return true;
            }
        } else {
            break;
        }
    }
    false
}

fn trim_ascii(mut s: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = s {
        s = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = s {
        s = rest;
    }
    s
}

/// Frame a `+QIRD: <len>`/`+QSSLRECV: <len>` data block.
///
/// Returns `None` when the head of the buffer is not such a block (including
/// the three-field statistics variant, which is an ordinary text response).
/// Returns `Some((None, 0))` while the header, payload or trailing final
/// token are still in flight.
fn frame_binary<'a>(
    buf: &'a [u8],
    prefix: &[u8],
    window: usize,
) -> Option<(DigestResult<'a>, usize)> {
    if !buf.starts_with(prefix) {
        return None;
    }

    let win_len = buf.len().min(window);
    let Some(term) = buf[..win_len]
        .iter()
        .position(|c| matches!(c, b'\r' | b'\n'))
    else {
        if buf.len() < window {
            // Header may still be short of its terminator.
            return Some((DigestResult::None, 0));
        }
        // Too long for a data header; not ours.
        return None;
    };

    let fields = &buf[prefix.len()..term];
    if fields.is_empty() || !fields.iter().all(u8::is_ascii_digit) {
        // Statistics variant (`total,read,unread`) or junk: plain text line.
        return None;
    }
    let mut len = 0usize;
    for d in fields {
        len = len * 10 + usize::from(d - b'0');
    }

    // Header terminator must be the full `\r\n`.
    if buf.len() < term + 2 {
        return Some((DigestResult::None, 0));
    }
    if &buf[term..term + 2] != b"\r\n" {
        return Some((DigestResult::Response(Err(InternalError::Error)), term + 2));
    }

    let payload_start = term + 2;
    let payload_end = payload_start + len;
    if buf.len() < payload_end {
        return Some((DigestResult::None, 0));
    }

    // Trailing `\r\n` (absent for a zero-length read) and the final token.
    let mut p = payload_end;
    while p + 1 < buf.len() && buf[p] == b'\r' && buf[p + 1] == b'\n' {
        p += 2;
    }
    let Some(line) = take_line(buf, p) else {
        return Some((DigestResult::None, 0));
    };
    let content = &buf[line.start..line.end];
    if content == b"OK" {
        return Some((
            DigestResult::Response(Ok(&buf[..payload_end])),
            line.after,
        ));
    }
    if ERROR_TOKENS.iter().any(|t| *t == content)
        || content.starts_with(b"+CME ERROR:")
    {
        return Some((
            DigestResult::Response(Err(InternalError::Error)),
            line.after,
        ));
    }
    // Something other than the final token (typically a URC that raced in):
    // deliver the data block as-is and let later calls sort out the rest. The
    // then-orphaned `OK` is dropped by the ingress.
    Some((
        DigestResult::Response(Ok(&buf[..payload_end])),
        payload_end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urc(buf: &[u8]) -> (Option<&[u8]>, usize) {
        match Bg770Digester::new().digest(buf) {
            (DigestResult::Urc(u), n) => (Some(u), n),
            (_, n) => (None, n),
        }
    }

    #[test]
    fn echo_is_discarded() {
        let mut d = Bg770Digester::new();
        let buf = b"ATE0\r\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        assert!(matches!(res, DigestResult::None));
        assert_eq!(consumed, 7);

        let (res, consumed) = d.digest(&buf[consumed..]);
        assert!(matches!(res, DigestResult::Response(Ok(b""))));
        assert_eq!(consumed, 4);
    }

    #[test]
    fn single_line_response() {
        let mut d = Bg770Digester::new();
        let buf = b"+QCSQ: \"eMTC\",-80,-95,125,-10\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => {
                assert_eq!(body, b"+QCSQ: \"eMTC\",-80,-95,125,-10")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn multi_line_response_body_keeps_interior_terminators() {
        let mut d = Bg770Digester::new();
        let buf = b"+QIACT: 1,1,1,\"10.0.0.2\"\r\n+QIACT: 2,0,1,\"0.0.0.0\"\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => {
                assert_eq!(
                    body,
                    &b"+QIACT: 1,1,1,\"10.0.0.2\"\r\n+QIACT: 2,0,1,\"0.0.0.0\""[..]
                )
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn incomplete_input_is_held() {
        let mut d = Bg770Digester::new();
        assert!(matches!(d.digest(b"+QCSQ: \"eMTC\""), (DigestResult::None, 0)));
        assert!(matches!(
            d.digest(b"+QCSQ: \"eMTC\",-80,-95,125,-10\r\n"),
            (DigestResult::None, 0)
        ));
    }

    #[test]
    fn plain_error_final() {
        let mut d = Bg770Digester::new();
        let (res, consumed) = d.digest(b"ERROR\r\n");
        assert!(matches!(
            res,
            DigestResult::Response(Err(InternalError::Error))
        ));
        assert_eq!(consumed, 7);
    }

    #[test]
    fn cme_error_is_passed_through() {
        let mut d = Bg770Digester::new();
        let (res, _) = d.digest(b"+CME ERROR: 407\r\n");
        match res {
            DigestResult::Response(Err(InternalError::Custom(line))) => {
                assert_eq!(line, b"+CME ERROR: 407")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn send_fail_is_an_error_final() {
        let mut d = Bg770Digester::new();
        let (res, _) = d.digest(b"SEND FAIL\r\n");
        assert!(matches!(res, DigestResult::Response(Err(_))));
    }

    #[test]
    fn send_ok_is_a_success_final() {
        let mut d = Bg770Digester::new();
        let (res, consumed) = d.digest(b"SEND OK\r\n");
        assert!(matches!(res, DigestResult::Response(Ok(b""))));
        assert_eq!(consumed, 9);
    }

    #[test]
    fn flat_urcs_match_whole_lines() {
        for line in [&b"APP RDY\r\n"[..], b"RDY\r\n", b"PSM POWER DOWN\r\n"] {
            let (u, n) = urc(line);
            assert_eq!(u, Some(&line[..line.len() - 2]));
            assert_eq!(n, line.len());
        }
        // Not a URC, and not a final: held as a body line.
        assert!(matches!(
            Bg770Digester::new().digest(b"APP READY\r\n"),
            (DigestResult::None, 0)
        ));
    }

    #[test]
    fn prefixed_urc() {
        let (u, n) = urc(b"+QIURC: \"dnsgip\",0,1,120\r\n");
        assert_eq!(u, Some(&b"+QIURC: \"dnsgip\",0,1,120"[..]));
        assert_eq!(n, 26);
    }

    #[test]
    fn urc_between_commands_beats_body_classification() {
        let buf = b"+QIURC: \"closed\",3\r\n+QCSQ: \"eMTC\",-80,-95,125,-10\r\nOK\r\n";
        let mut d = Bg770Digester::new();
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Urc(u) => assert_eq!(u, b"+QIURC: \"closed\",3"),
            other => panic!("unexpected {:?}", other),
        }
        let (res, _) = d.digest(&buf[consumed..]);
        assert!(matches!(res, DigestResult::Response(Ok(_))));
    }

    #[test]
    fn cereg_urc_vs_read_reply() {
        // URC shape: one bare numeric field, then the quoted TAC.
        let (u, _) = urc(b"+CEREG: 5,\"54DB\",\"0F6B0578\",7\r\n");
        assert!(u.is_some());
        let (u, _) = urc(b"+CEREG: 4\r\n");
        assert!(u.is_some());

        // Read-reply shape: `<n>,<stat>` leads with two bare numerics.
        let mut d = Bg770Digester::new();
        let buf = b"+CEREG: 2,5,\"54DB\",\"0F6B0578\",7\r\nOK\r\n";
        let (res, _) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => {
                assert_eq!(body, &b"+CEREG: 2,5,\"54DB\",\"0F6B0578\",7"[..])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn prompt() {
        let mut d = Bg770Digester::new();
        let (res, consumed) = d.digest(b"> ");
        assert!(matches!(res, DigestResult::Prompt(b'>')));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn qird_data_block() {
        let mut d = Bg770Digester::new();
        let buf = b"+QIRD: 4\r\nDEAD\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => assert_eq!(body, b"+QIRD: 4\r\nDEAD"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn qird_payload_may_contain_final_tokens() {
        let mut d = Bg770Digester::new();
        let buf = b"+QIRD: 8\r\n\r\nOK\r\nAB\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => assert_eq!(body, b"+QIRD: 8\r\n\r\nOK\r\nAB"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn qird_zero_length_read() {
        let mut d = Bg770Digester::new();
        let buf = b"+QIRD: 0\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => assert_eq!(body, b"+QIRD: 0"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn qird_held_until_payload_and_final_arrive() {
        let mut d = Bg770Digester::new();
        assert!(matches!(d.digest(b"+QIRD: 4"), (DigestResult::None, 0)));
        assert!(matches!(d.digest(b"+QIRD: 4\r\nDE"), (DigestResult::None, 0)));
        assert!(matches!(
            d.digest(b"+QIRD: 4\r\nDEAD\r\n"),
            (DigestResult::None, 0)
        ));
    }

    #[test]
    fn qird_statistics_variant_is_a_text_response() {
        let mut d = Bg770Digester::new();
        let buf = b"+QIRD: 7,4,3\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => assert_eq!(body, b"+QIRD: 7,4,3"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn qsslrecv_data_block() {
        let mut d = Bg770Digester::new();
        let buf = b"+QSSLRECV: 3\r\nxyz\r\nOK\r\n";
        let (res, consumed) = d.digest(buf);
        match res {
            DigestResult::Response(Ok(body)) => assert_eq!(body, b"+QSSLRECV: 3\r\nxyz"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn leading_terminators_are_consumed_alone() {
        let mut d = Bg770Digester::new();
        assert!(matches!(d.digest(b"\r\n\r\nOK\r\n"), (DigestResult::None, 4)));
    }
}
