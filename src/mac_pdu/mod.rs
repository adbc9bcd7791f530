//! MAC PDU framing (§4.C, §4.E): the leading header byte, the common-header body variant, the
//! multiplexing header that precedes every MMIE, and the streaming decoder built on top of them.

pub mod common_header;
pub mod decoder;
pub mod header_type;
pub mod mux_header;

pub use common_header::CommonHeader;
pub use decoder::{DecodedMmie, DecoderStatus, PduDecoder};
pub use header_type::{HeaderType, MacHeaderType, MacSecurity};
pub use mux_header::{MuxHeader, MuxLength};

/// A fully decoded MAC PDU header: the leading type byte plus its common-header body. The MMIE
/// payload that follows is handled separately by [`PduDecoder`], since its length is unknown until
/// the common header has been parsed and the transport block size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacPduHeader {
    pub header_type: MacHeaderType,
    pub common_header: CommonHeader,
}

impl MacPduHeader {
    pub fn packed_size(&self) -> usize {
        MacHeaderType::PACKED_SIZE + self.common_header.packed_size()
    }

    pub fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.header_type.pack();
        self.common_header.pack(&mut dst[1..]);
    }

    /// Parses the leading type byte and dispatches to the matching common-header body. Returns
    /// `None` if `src` is too short or carries an invalid type/version, mirroring the "drop the
    /// PDU" contract used throughout this crate's wire-facing code.
    pub fn unpack(src: &[u8]) -> Option<Self> {
        if src.is_empty() {
            return None;
        }
        let header_type = MacHeaderType::unpack(src[0])?;
        let common_header = CommonHeader::unpack(header_type.header_type, &src[1..])?;
        Some(MacPduHeader {
            header_type,
            common_header,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mac_pdu::common_header::{DataHeader, SequenceField};

    #[test]
    fn header_round_trips_through_dispatch() {
        let h = MacPduHeader {
            header_type: MacHeaderType {
                version: 0,
                mac_security: MacSecurity::NotUsed,
                header_type: HeaderType::Data,
            },
            common_header: CommonHeader::Data(DataHeader {
                seq: SequenceField {
                    reset: false,
                    sequence_number: 7,
                },
            }),
        };
        let mut buf = vec![0u8; h.packed_size()];
        h.pack(&mut buf);
        assert_eq!(MacPduHeader::unpack(&buf), Some(h));
    }
}
