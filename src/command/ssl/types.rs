//! Argument and parameter types used by SSL/TLS commands

/// Modem-side TLS configuration slot, 0..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SslContextId(pub u8);

/// One `AT+QSSLCFG` knob. Each variant carries its wire value; the parameter
/// keyword and the value style (decimal, `0X%04X` hex, quoted string) are a
/// fixed property of the option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SslOption<'a> {
    /// TLS protocol selection, 0..=4 (4 = negotiate).
    SslVersion(u8),
    /// IANA cipher suite id, e.g. `0XC02F`.
    CipherSuite(u16),
    /// Server certificate verification level, 0..=2.
    SecLevel(u8),
    /// CA certificate file path on the modem flash.
    CaCert(&'a str),
    /// Client certificate file path.
    ClientCert(&'a str),
    /// Client private key file path.
    ClientKey(&'a str),
    /// Tolerate certificate validity-time mismatches.
    IgnoreLocalTime(bool),
    /// Handshake deadline, seconds.
    NegotiateTime(u16),
    /// Server name indication on/off.
    Sni(bool),
}

pub(crate) enum SslOptionValue<'a> {
    Numeric(u32),
    Hex(u16),
    Text(&'a str),
}

impl<'a> SslOption<'a> {
    pub(crate) fn param(&self) -> &'static str {
        match self {
            SslOption::SslVersion(_) => "sslversion",
            SslOption::CipherSuite(_) => "ciphersuite",
            SslOption::SecLevel(_) => "seclevel",
            SslOption::CaCert(_) => "cacert",
            SslOption::ClientCert(_) => "clientcert",
            SslOption::ClientKey(_) => "clientkey",
            SslOption::IgnoreLocalTime(_) => "ignorelocaltime",
            SslOption::NegotiateTime(_) => "negotiatetime",
            SslOption::Sni(_) => "sni",
        }
    }

    pub(crate) fn value(&self) -> SslOptionValue<'a> {
        match *self {
            SslOption::SslVersion(v) => SslOptionValue::Numeric(v.into()),
            SslOption::CipherSuite(v) => SslOptionValue::Hex(v),
            SslOption::SecLevel(v) => SslOptionValue::Numeric(v.into()),
            SslOption::CaCert(s) => SslOptionValue::Text(s),
            SslOption::ClientCert(s) => SslOptionValue::Text(s),
            SslOption::ClientKey(s) => SslOptionValue::Text(s),
            SslOption::IgnoreLocalTime(b) => SslOptionValue::Numeric(b.into()),
            SslOption::NegotiateTime(v) => SslOptionValue::Numeric(v.into()),
            SslOption::Sni(b) => SslOptionValue::Numeric(b.into()),
        }
    }
}
