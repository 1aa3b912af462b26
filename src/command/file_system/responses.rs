//! Responses for file commands

/// `+QFUPL: <upload_size>,<checksum>` — checksum is the 16-bit XOR over the
/// uploaded payload, reported as bare hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileUploadResult {
    pub uploaded_length: usize,
    pub checksum: u16,
}

impl atat::AtatResp for FileUploadResult {}

/// `+QFCRC: <crc32>,<crc16>,<crc16_ccitt>`, all hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileCrc {
    pub crc32: u32,
    pub crc16: u16,
    pub crc16_ccitt: u16,
}

impl atat::AtatResp for FileCrc {}
