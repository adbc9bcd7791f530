//! Project-specific extension IEs (§4.D, §9 Design Notes: "implementations may define additional
//! IEs under the standard's `IE type extension` escape"). Grounded on `power_target_ie.hpp`,
//! `time_announce_ie.hpp` and `forward_to_ie.cpp`: the first two sit directly in Table 6.3.4-2's
//! standard IE type space, the third is a project addition carried under the `IeTypeExtension`
//! escape code with its own one-byte sub-type discriminant.

use super::{IeTypeExt00_01_10, MmieEnvelope, MuxHeaderTemplate, Packing};
use crate::bitfield::{pack_lower, unpack_lower};

/// §4.D extension: a one-shot TX power adjustment hint, in dBm relative to the current setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerTargetIe {
    pub target_dbm: i32,
}

impl MmieEnvelope for PowerTargetIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::PowerTargetIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        1
    }
}

impl Packing for PowerTargetIe {
    fn is_valid(&self) -> bool {
        (-128..=127).contains(&self.target_dbm)
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.target_dbm as i8 as u8;
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.is_empty() {
            return false;
        }
        self.target_dbm = src[0] as i8 as i32;
        true
    }
}

/// §4.D extension: announces the FT's absolute time reference so a newly associated PT can
/// discipline its local clock without waiting for a full beacon cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeAnnounceIe {
    pub system_time_us: u32,
}

impl MmieEnvelope for TimeAnnounceIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::TimeAnnounceIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        4
    }
}

impl Packing for TimeAnnounceIe {
    fn is_valid(&self) -> bool {
        true
    }

    fn pack(&self, dst: &mut [u8]) {
        pack_lower(dst, self.system_time_us, 4);
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 4 {
            return false;
        }
        self.system_time_us = unpack_lower(src, 4);
        true
    }
}

/// §4.D extension: carried under Table 6.3.4-2's `IeTypeExtension` escape, distinguished from
/// other escaped IEs by `sub_type` (the source's `forward_to_ie.cpp` defines a single sub-type,
/// kept as a plain field here rather than a coded enum since this crate defines no siblings).
/// Tells a relay which address to forward the remainder of the MAC PDU to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardToIe {
    pub sub_type: u8,
    pub destination_address: u32,
}

impl ForwardToIe {
    pub const SUB_TYPE: u8 = 0;
}

impl MmieEnvelope for ForwardToIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::IeTypeExtension)
    }

    fn packed_size_of_sdu(&self) -> usize {
        5
    }
}

impl Packing for ForwardToIe {
    fn is_valid(&self) -> bool {
        self.sub_type == Self::SUB_TYPE
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.sub_type;
        dst[1..5].copy_from_slice(&self.destination_address.to_be_bytes());
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 5 {
            return false;
        }
        self.sub_type = src[0];
        self.destination_address = u32::from_be_bytes([src[1], src[2], src[3], src[4]]);
        self.is_valid()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn power_target_round_trip_negative() {
        let m = PowerTargetIe { target_dbm: -12 };
        assert!(m.is_valid());
        let mut buf = [0u8; 1];
        m.pack(&mut buf);
        let mut q = PowerTargetIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn time_announce_round_trip() {
        let m = TimeAnnounceIe {
            system_time_us: 123_456_789,
        };
        let mut buf = [0u8; 4];
        m.pack(&mut buf);
        let mut q = TimeAnnounceIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn forward_to_round_trip() {
        let m = ForwardToIe {
            sub_type: ForwardToIe::SUB_TYPE,
            destination_address: 0xAABB_CCDD,
        };
        assert!(m.is_valid());
        let mut buf = [0u8; 5];
        m.pack(&mut buf);
        let mut q = ForwardToIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn forward_to_rejects_unknown_sub_type() {
        let mut q = ForwardToIe::default();
        let mut buf = [0u8; 5];
        buf[0] = 0xFF;
        assert!(!q.unpack(&buf));
    }
}
