//! MAC Common Header (§6.3.3): the body variant selected by [`super::header_type::HeaderType`].

use crate::bitfield::{pack_lower, unpack_lower};
use crate::identity::network_id_to_24bit;

/// Reset + 12-bit sequence number + 3 reserved bits, packed into 2 bytes. Shared by the `Data`,
/// `RdBroadcast` and `Unicast` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceField {
    pub reset: bool,
    pub sequence_number: u32,
}

impl SequenceField {
    /// Layout: `Reset`(bit 15) | `SequenceNumber`(bits 14:3, 12 bits) | `Reserved`(bits 2:0).
    fn pack(&self, dst: &mut [u8]) {
        let value: u16 =
            ((self.reset as u16) << 15) | ((self.sequence_number as u16 & 0x0FFF) << 3);
        dst[0] = (value >> 8) as u8;
        dst[1] = (value & 0xFF) as u8;
    }

    fn unpack(src: &[u8]) -> Self {
        let value = u16::from_be_bytes([src[0], src[1]]);
        SequenceField {
            reset: (value >> 15) & 1 != 0,
            sequence_number: ((value >> 3) & 0x0FFF) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataHeader {
    pub seq: SequenceField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RdBroadcastHeader {
    pub seq: SequenceField,
    pub transmitter_address: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeaconHeader {
    pub network_id_24: u32,
    pub transmitter_address: u32,
}

impl BeaconHeader {
    pub fn set_network_id(&mut self, network_id: u32) {
        self.network_id_24 = network_id_to_24bit(network_id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnicastHeader {
    pub seq: SequenceField,
    pub receiver_address: u32,
    pub transmitter_address: u32,
}

/// Tagged union over the five common-header body layouts (§3: 0/2/6/7/10 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonHeader {
    Empty,
    Data(DataHeader),
    RdBroadcast(RdBroadcastHeader),
    Beacon(BeaconHeader),
    Unicast(UnicastHeader),
}

impl CommonHeader {
    pub fn packed_size(&self) -> usize {
        match self {
            CommonHeader::Empty => 0,
            CommonHeader::Data(_) => 2,
            CommonHeader::RdBroadcast(_) => 6,
            CommonHeader::Beacon(_) => 7,
            CommonHeader::Unicast(_) => 10,
        }
    }

    pub fn pack(&self, dst: &mut [u8]) {
        match self {
            CommonHeader::Empty => {}
            CommonHeader::Data(h) => h.seq.pack(&mut dst[0..2]),
            CommonHeader::RdBroadcast(h) => {
                h.seq.pack(&mut dst[0..2]);
                pack_lower(&mut dst[2..6], h.transmitter_address, 4);
            }
            CommonHeader::Beacon(h) => {
                pack_lower(&mut dst[0..3], h.network_id_24, 3);
                pack_lower(&mut dst[3..7], h.transmitter_address, 4);
            }
            CommonHeader::Unicast(h) => {
                h.seq.pack(&mut dst[0..2]);
                pack_lower(&mut dst[2..6], h.receiver_address, 4);
                pack_lower(&mut dst[6..10], h.transmitter_address, 4);
            }
        }
    }

    /// `header_type` selects which variant is expected; returns `None` if `src` is too short.
    pub fn unpack(header_type: super::header_type::HeaderType, src: &[u8]) -> Option<Self> {
        use super::header_type::HeaderType;
        Some(match header_type {
            HeaderType::MchEmpty => CommonHeader::Empty,
            HeaderType::Data => {
                if src.len() < 2 {
                    return None;
                }
                CommonHeader::Data(DataHeader {
                    seq: SequenceField::unpack(&src[0..2]),
                })
            }
            HeaderType::RdBroadcast => {
                if src.len() < 6 {
                    return None;
                }
                CommonHeader::RdBroadcast(RdBroadcastHeader {
                    seq: SequenceField::unpack(&src[0..2]),
                    transmitter_address: unpack_lower(&src[2..6], 4),
                })
            }
            HeaderType::Beacon => {
                if src.len() < 7 {
                    return None;
                }
                CommonHeader::Beacon(BeaconHeader {
                    network_id_24: unpack_lower(&src[0..3], 3),
                    transmitter_address: unpack_lower(&src[3..7], 4),
                })
            }
            HeaderType::Unicast => {
                if src.len() < 10 {
                    return None;
                }
                CommonHeader::Unicast(UnicastHeader {
                    seq: SequenceField::unpack(&src[0..2]),
                    receiver_address: unpack_lower(&src[2..6], 4),
                    transmitter_address: unpack_lower(&src[6..10], 4),
                })
            }
            HeaderType::NotDefined => return None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mac_pdu::header_type::HeaderType;

    #[test]
    fn data_round_trip() {
        let h = CommonHeader::Data(DataHeader {
            seq: SequenceField {
                reset: true,
                sequence_number: 0xABC,
            },
        });
        let mut buf = [0u8; 2];
        h.pack(&mut buf);
        assert_eq!(CommonHeader::unpack(HeaderType::Data, &buf), Some(h));
    }

    #[test]
    fn unicast_round_trip() {
        let h = CommonHeader::Unicast(UnicastHeader {
            seq: SequenceField {
                reset: false,
                sequence_number: 0x001,
            },
            receiver_address: 0x0000_01BD,
            transmitter_address: 0x0000_0457,
        });
        let mut buf = [0u8; 10];
        h.pack(&mut buf);
        assert_eq!(CommonHeader::unpack(HeaderType::Unicast, &buf), Some(h));
    }

    #[test]
    fn beacon_truncates_network_id_to_24_bits() {
        let mut b = BeaconHeader::default();
        b.set_network_id(0xFF00_0064);
        assert_eq!(b.network_id_24, 0x00_0064);
    }

    #[test]
    fn empty_has_zero_size() {
        assert_eq!(CommonHeader::Empty.packed_size(), 0);
    }
}
