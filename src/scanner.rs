//! Field scanner for response lines that are too irregular for serde.
//!
//! A [`Scanner`] walks one response line, yielding comma-separated tokens with
//! surrounding whitespace and double-quotes stripped. It never allocates and
//! borrows straight from the ingress buffer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The expected token is absent.
    Missing,
    /// The token is present but not of the requested shape.
    Malformed,
}

pub struct Scanner<'a> {
    rest: &'a str,
    exhausted: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            rest: line,
            exhausted: line.is_empty(),
        }
    }

    /// Build a scanner from the portion of `line` after `prefix`, or `None`
    /// when the line does not carry that prefix.
    pub fn after_prefix(line: &'a str, prefix: &str) -> Option<Self> {
        line.strip_prefix(prefix).map(|r| Self::new(r.trim_start()))
    }

    /// Raw remainder of the line, separators included.
    pub fn remainder(&self) -> &'a str {
        self.rest
    }

    /// Next comma-separated token, trimmed and unquoted. An empty field
    /// yields `Some("")`; `None` marks the end of the line.
    pub fn next_token(&mut self) -> Option<&'a str> {
        if self.exhausted {
            return None;
        }
        let (tok, rest) = match self.rest.find(',') {
            Some(idx) => (&self.rest[..idx], Some(&self.rest[idx + 1..])),
            None => (self.rest, None),
        };
        match rest {
            Some(r) => self.rest = r,
            None => {
                self.rest = "";
                self.exhausted = true;
            }
        }
        let tok = tok.trim();
        Some(tok.strip_prefix('"').and_then(|t| t.strip_suffix('"')).unwrap_or(tok))
    }

    pub fn expect_token(&mut self) -> Result<&'a str, ScanError> {
        self.next_token().ok_or(ScanError::Missing)
    }

    pub fn next_u8(&mut self) -> Result<u8, ScanError> {
        self.next_radix(10).and_then(checked::<u8>)
    }

    pub fn next_u32(&mut self) -> Result<u32, ScanError> {
        self.next_radix(10)
    }

    pub fn next_i32(&mut self) -> Result<i32, ScanError> {
        let tok = self.expect_token()?;
        tok.parse::<i32>().map_err(|_| ScanError::Malformed)
    }

    /// Unsigned token in the given radix (10 for decimal fields, 16 for the
    /// hex TAC/cell-id/checksum fields, 2 for binary PSM timers).
    pub fn next_radix(&mut self, radix: u32) -> Result<u32, ScanError> {
        let tok = self.expect_token()?;
        u32::from_str_radix(tok, radix).map_err(|_| ScanError::Malformed)
    }
}

fn checked<T: TryFrom<u32>>(v: u32) -> Result<T, ScanError> {
    T::try_from(v).map_err(|_| ScanError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_trimmed_and_unquoted() {
        let mut s = Scanner::new(" \"eMTC\", -80 ,-95,125, -10");
        assert_eq!(s.next_token(), Some("eMTC"));
        assert_eq!(s.next_i32(), Ok(-80));
        assert_eq!(s.next_i32(), Ok(-95));
        assert_eq!(s.next_i32(), Ok(125));
        assert_eq!(s.next_i32(), Ok(-10));
        assert_eq!(s.next_token(), None);
    }

    #[test]
    fn empty_fields_are_yielded() {
        let mut s = Scanner::new("1,,3");
        assert_eq!(s.next_token(), Some("1"));
        assert_eq!(s.next_token(), Some(""));
        assert_eq!(s.next_token(), Some("3"));
        assert_eq!(s.next_token(), None);
    }

    #[test]
    fn prefix_stripping() {
        let mut s = Scanner::after_prefix("+QCSQ: \"NBIoT\",-90", "+QCSQ:").unwrap();
        assert_eq!(s.next_token(), Some("NBIoT"));
        assert_eq!(s.next_i32(), Ok(-90));

        assert!(Scanner::after_prefix("+CSQ: 18,99", "+QCSQ:").is_none());
    }

    #[test]
    fn radix_parses() {
        let mut s = Scanner::new("\"54DB\",\"0F6B0578\",01000010");
        assert_eq!(s.next_radix(16), Ok(0x54DB));
        assert_eq!(s.next_radix(16), Ok(0x0F6B_0578));
        assert_eq!(s.next_radix(2), Ok(0x42));
    }

    #[test]
    fn malformed_and_missing_are_distinct() {
        let mut s = Scanner::new("abc");
        assert_eq!(s.next_u32(), Err(ScanError::Malformed));
        assert_eq!(s.next_u32(), Err(ScanError::Missing));
    }

    #[test]
    fn range_checks() {
        let mut s = Scanner::new("300");
        assert_eq!(s.next_u8(), Err(ScanError::Malformed));
    }

    #[test]
    fn lone_quote_is_left_alone() {
        let mut s = Scanner::new("\"unterminated");
        assert_eq!(s.next_token(), Some("\"unterminated"));
    }
}
