//! Argument and parameter types used by extended configuration commands

use heapless::{String, Vec};

/// Radio access technologies as they appear in the `nwscanseq` code string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rat {
    Automatic,
    Gsm,
    EMtc,
    NbIot,
}

impl Rat {
    pub const fn code(self) -> &'static str {
        match self {
            Rat::Automatic => "00",
            Rat::Gsm => "01",
            Rat::EMtc => "02",
            Rat::NbIot => "03",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "00" => Some(Rat::Automatic),
            "01" => Some(Rat::Gsm),
            "02" => Some(Rat::EMtc),
            "03" => Some(Rat::NbIot),
            _ => None,
        }
    }
}

/// Ordered RAT scan preference, up to three entries. An empty sequence means
/// "let the module decide".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSequence {
    pub rats: [Option<Rat>; 3],
}

impl ScanSequence {
    pub const EMTC_ONLY: Self = Self {
        rats: [Some(Rat::EMtc), None, None],
    };

    pub const fn new(rats: [Option<Rat>; 3]) -> Self {
        Self { rats }
    }

    /// The populated prefix, ignoring anything after the first gap.
    fn prefix(&self) -> Vec<Rat, 3> {
        let mut out = Vec::new();
        for rat in self.rats.iter() {
            match rat {
                Some(r) => out.push(*r).ok(),
                None => break,
            };
        }
        out
    }

    /// Two sequences are interchangeable when their populated prefixes are
    /// identical; the unset tail carries no meaning.
    pub fn matches(&self, other: &Self) -> bool {
        self.prefix() == other.prefix()
    }

    /// Wire form: concatenated two-digit codes, `"00"` when empty.
    pub fn as_code(&self) -> String<6> {
        let mut out = String::new();
        for rat in self.prefix() {
            out.push_str(rat.code()).ok();
        }
        if out.is_empty() {
            out.push_str("00").ok();
        }
        out
    }

    /// Parse the read-reply code string: an even number of digits, at most
    /// three pairs.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.len() % 2 != 0 || code.len() > 6 {
            return None;
        }
        let mut rats = [None; 3];
        for (i, chunk) in code.as_bytes().chunks(2).enumerate() {
            let chunk = core::str::from_utf8(chunk).ok()?;
            rats[i] = Some(Rat::from_code(chunk)?);
        }
        Some(Self { rats })
    }
}

/// `+QCFG="iotopmode"` network category search modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IotOpMode {
    EMtc,
    NbIot,
    Both,
}

impl IotOpMode {
    pub const fn value(self) -> u8 {
        match self {
            IotOpMode::EMtc => 0,
            IotOpMode::NbIot => 1,
            IotOpMode::Both => 2,
        }
    }

    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0 => Some(IotOpMode::EMtc),
            1 => Some(IotOpMode::NbIot),
            2 => Some(IotOpMode::Both),
            _ => None,
        }
    }
}

/// Carrier customisation profile, `+QCFG="nwoper"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkOperatorMode {
    Default,
    Att,
    Vzw,
    Unknown,
}

impl NetworkOperatorMode {
    pub fn from_keyword(value: &str) -> Self {
        if value.eq_ignore_ascii_case("default") {
            NetworkOperatorMode::Default
        } else if value.eq_ignore_ascii_case("att") {
            NetworkOperatorMode::Att
        } else if value.eq_ignore_ascii_case("vzw") {
            NetworkOperatorMode::Vzw
        } else {
            NetworkOperatorMode::Unknown
        }
    }

    /// Wire keyword for a write; `None` for [`Self::Unknown`].
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            NetworkOperatorMode::Default => Some("DEFAULT"),
            NetworkOperatorMode::Att => Some("ATT"),
            NetworkOperatorMode::Vzw => Some("VZW"),
            NetworkOperatorMode::Unknown => None,
        }
    }
}

/// Most entries `+QCFG="lte/bandprior"` accepts.
pub const BAND_PRIORITY_MAX: usize = 16;

pub type BandPriorityList = Vec<u8, BAND_PRIORITY_MAX>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_sequence_code_roundtrip() {
        let seq = ScanSequence::new([Some(Rat::EMtc), Some(Rat::NbIot), Some(Rat::Gsm)]);
        assert_eq!(seq.as_code().as_str(), "020301");
        assert_eq!(ScanSequence::from_code("020301"), Some(seq));

        let single = ScanSequence::EMTC_ONLY;
        assert_eq!(single.as_code().as_str(), "02");
        assert_eq!(ScanSequence::from_code("02"), Some(single));

        assert_eq!(ScanSequence::default().as_code().as_str(), "00");
    }

    #[test]
    fn scan_sequence_rejects_bad_codes() {
        assert_eq!(ScanSequence::from_code("0"), None);
        assert_eq!(ScanSequence::from_code("02030100"), None);
        assert_eq!(ScanSequence::from_code("09"), None);
    }

    #[test]
    fn prefix_equivalence_ignores_the_unset_tail() {
        let a = ScanSequence::new([Some(Rat::EMtc), None, None]);
        let b = ScanSequence::new([Some(Rat::EMtc), None, Some(Rat::Gsm)]);
        assert!(a.matches(&b));

        let c = ScanSequence::new([Some(Rat::EMtc), Some(Rat::Gsm), None]);
        assert!(!a.matches(&c));
        assert!(c.matches(&c));
    }
}
