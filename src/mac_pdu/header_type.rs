//! MAC Header Type (1 byte) -- ETSI TS 103 636-4 §6.3.2.

use crate::bitfield::{extract_bits, place_bits};
use crate::coded_enum;
use crate::enumeration::CodedEnum;

coded_enum! {
    /// Table 6.3.2-1: MAC security, i.e. whether/how the PDU body is ciphered.
    pub enum MacSecurity {
        NotUsed = 0,
        Used = 1,
        UsedWithIntegrity = 2,
        Reserved = 3,
    }
}

coded_enum! {
    /// Table 6.3.2-2: MAC Header Type tag selecting the common-header body variant.
    pub enum HeaderType {
        Data = 0x0,
        Beacon = 0x1,
        Unicast = 0x2,
        RdBroadcast = 0x3,
        MchEmpty = 0xf,
    }
}

/// The leading mandatory byte of every MAC PDU: `Version`(2) | `MacSecurity`(2) | `HeaderType`(4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacHeaderType {
    pub version: u32,
    pub mac_security: MacSecurity,
    pub header_type: HeaderType,
}

impl Default for MacSecurity {
    fn default() -> Self {
        MacSecurity::NotUsed
    }
}
impl Default for HeaderType {
    fn default() -> Self {
        HeaderType::Data
    }
}

impl MacHeaderType {
    pub const PACKED_SIZE: usize = 1;

    pub fn pack(&self) -> u8 {
        let byte = place_bits(0, self.version as u8, 7, 6);
        let byte = place_bits(byte, self.mac_security.to_coded_value().unwrap_or(0) as u8, 5, 4);
        place_bits(byte, self.header_type.to_coded_value().unwrap_or(0) as u8, 3, 0)
    }

    /// Returns `None` if `Version != 0` or the header-type tag is not one of the five defined
    /// values; the caller drops the PDU in either case.
    pub fn unpack(byte: u8) -> Option<Self> {
        let version = extract_bits(byte, 7, 6) as u32;
        if version != 0 {
            return None;
        }
        let mac_security = MacSecurity::from_coded_value(extract_bits(byte, 5, 4) as u32);
        let header_type = HeaderType::from_coded_value(extract_bits(byte, 3, 0) as u32);
        if !header_type.is_valid() {
            return None;
        }
        Some(MacHeaderType {
            version,
            mac_security,
            header_type,
        })
    }
}
