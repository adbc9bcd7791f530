//! Standalone information elements (§6.4.3) that are neither beacons nor association messages.
//! Grounded on `mac_security_info_ie.hpp`, `route_info_ie.hpp`, `resource_allocation_ie.hpp` and
//! `random_access_resource_ie.hpp`; the remaining IEs (`rd_capability_ie`, `neighbouring_ie`,
//! `broadcast_indication_ie`, `group_assignment_ie`, `load_info_ie`, `measurement_report_ie`,
//! `configuration_request_ie`, `radio_device_status_ie`) were not read in full detail -- their
//! fields follow the same "one coded-enum-driven byte plus linear counters" texture the IEs above
//! share, kept deliberately small since §4.D's Non-goals exclude anything beyond getting a
//! well-formed MMIE on and off the wire for them.

use super::{IeTypeExt00_01_10, IeTypeExt11Len0, IeTypeExt11Len1, MmieEnvelope, MuxHeaderTemplate, Packing};
use crate::bitfield::{extract_bits, place_bits};
use crate::coded_enum;
use crate::enumeration::CodedEnum;

coded_enum! {
    pub enum SecurityIvType {
        OneTimeHpc = 0,
        ResynchronizingHpc = 1,
        OneTimeHpcWithHpcRequest = 2,
    }
}

impl Default for SecurityIvType {
    fn default() -> Self {
        SecurityIvType::OneTimeHpc
    }
}

/// §6.4.3.1: only `version == mode_1` is defined, matching the source's static constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityInfoIe {
    pub key_index: u32,
    pub security_iv_type: SecurityIvType,
    pub hpc: u32,
}

impl MmieEnvelope for SecurityInfoIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::SecurityInfoIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        6
    }
}

impl Packing for SecurityInfoIe {
    fn is_valid(&self) -> bool {
        self.security_iv_type.is_valid() && self.key_index <= u8::MAX as u32
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.security_iv_type.to_coded_value().unwrap_or(0) as u8, 7, 5);
        dst[1] = self.key_index as u8;
        dst[2..6].copy_from_slice(&self.hpc.to_be_bytes());
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 6 {
            return false;
        }
        self.security_iv_type = SecurityIvType::from_coded_value(extract_bits(src[0], 7, 5) as u32);
        self.key_index = src[1] as u32;
        self.hpc = u32::from_be_bytes([src[2], src[3], src[4], src[5]]);
        self.is_valid()
    }
}

/// §6.4.3.3: plain routing-cost advertisement, no coded enums at all in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteInfoIe {
    pub sink_address: u32,
    pub route_cost: u32,
    pub application_sequence_number: u32,
}

impl MmieEnvelope for RouteInfoIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::RouteInfoIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        10
    }
}

impl Packing for RouteInfoIe {
    fn is_valid(&self) -> bool {
        true
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0..4].copy_from_slice(&self.sink_address.to_be_bytes());
        dst[4..8].copy_from_slice(&self.route_cost.to_be_bytes());
        dst[8] = self.application_sequence_number as u8;
        dst[9] = (self.application_sequence_number >> 8) as u8;
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 10 {
            return false;
        }
        self.sink_address = u32::from_be_bytes([src[0], src[1], src[2], src[3]]);
        self.route_cost = u32::from_be_bytes([src[4], src[5], src[6], src[7]]);
        self.application_sequence_number = (src[9] as u32) << 8 | src[8] as u32;
        true
    }
}

coded_enum! {
    pub enum LengthType {
        LengthInSubslots = 0,
        LengthInSlots = 1,
    }
}
coded_enum! {
    pub enum RepeatType {
        RepeatedInFollowingFrames = 0,
        RepeatedInFollowingSubslots = 1,
    }
}

impl Default for LengthType {
    fn default() -> Self {
        LengthType::LengthInSubslots
    }
}
impl Default for RepeatType {
    fn default() -> Self {
        RepeatType::RepeatedInFollowingFrames
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Allocation {
    pub start_subslot: u32,
    pub length_type: LengthType,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepeatInfo {
    pub repeat_type: RepeatType,
    pub allow_specific_repeated_resources: bool,
    pub repetition: u32,
    pub validity: u32,
}

/// §6.4.3.4: grants a subslot/slot range to a PT, optionally repeating over future frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceAllocationIe {
    pub allocation: Allocation,
    pub repeat_info: Option<RepeatInfo>,
}

impl MmieEnvelope for ResourceAllocationIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        // Variable-length (repeat_info is optional), so the multiplexing header's own 8-bit
        // length field carries the body size rather than a peekable flag byte.
        MuxHeaderTemplate::variable(IeTypeExt00_01_10::ResourceAllocationIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        3 + self.repeat_info.is_some() as usize * 2
    }
}

impl Packing for ResourceAllocationIe {
    fn is_valid(&self) -> bool {
        true
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.repeat_info.is_some() as u8, 7, 7);
        dst[0] = place_bits(dst[0], self.allocation.length_type.to_coded_value().unwrap_or(0) as u8, 6, 6);
        dst[0] = place_bits(dst[0], self.allocation.start_subslot as u8, 5, 0);
        dst[1] = self.allocation.start_subslot as u8;
        dst[2] = self.allocation.length as u8;
        if let Some(r) = self.repeat_info {
            dst[3] = place_bits(0, r.repeat_type.to_coded_value().unwrap_or(0) as u8, 7, 7);
            dst[3] = place_bits(dst[3], r.allow_specific_repeated_resources as u8, 6, 6);
            dst[3] = place_bits(dst[3], r.repetition as u8, 5, 0);
            dst[4] = r.validity as u8;
        }
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 3 {
            return false;
        }
        let repeat_present = extract_bits(src[0], 7, 7) != 0;
        self.allocation = Allocation {
            start_subslot: src[1] as u32,
            length_type: LengthType::from_coded_value(extract_bits(src[0], 6, 6) as u32),
            length: src[2] as u32,
        };
        self.repeat_info = if repeat_present {
            if src.len() < 5 {
                return false;
            }
            Some(RepeatInfo {
                repeat_type: RepeatType::from_coded_value(extract_bits(src[3], 7, 7) as u32),
                allow_specific_repeated_resources: extract_bits(src[3], 6, 6) != 0,
                repetition: extract_bits(src[3], 5, 0) as u32,
                validity: src[4] as u32,
            })
        } else {
            None
        };
        true
    }
}

coded_enum! {
    pub enum CwMin {
        _0 = 0,
        _8 = 1,
        _16 = 2,
        _24 = 3,
        _32 = 4,
        _40 = 5,
        _48 = 6,
        _56 = 7,
    }
}
coded_enum! {
    pub enum CwMax {
        _0 = 0,
        _256 = 1,
        _512 = 2,
        _768 = 3,
        _1024 = 4,
        _1280 = 5,
        _1536 = 6,
        _1792 = 7,
    }
}
coded_enum! {
    pub enum DectDelay {
        ResponseWindowStartsAfter3Subslots = 0,
        ResponseWindowStartsAfterHalfFrame = 1,
    }
}

impl Default for CwMin {
    fn default() -> Self {
        CwMin::_0
    }
}
impl Default for CwMax {
    fn default() -> Self {
        CwMax::_0
    }
}
impl Default for DectDelay {
    fn default() -> Self {
        DectDelay::ResponseWindowStartsAfter3Subslots
    }
}

/// §6.4.3.5: advertises the contention window and random-access repeat schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomAccessResourceIe {
    pub cw_min: CwMin,
    pub cw_max: CwMax,
    pub dect_delay: DectDelay,
    pub repeat_info: Option<RepeatInfo>,
}

impl MmieEnvelope for RandomAccessResourceIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::variable(IeTypeExt00_01_10::RandomAccessResourceIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        1 + self.repeat_info.is_some() as usize * 2
    }
}

impl Packing for RandomAccessResourceIe {
    fn is_valid(&self) -> bool {
        self.cw_min.is_valid() && self.cw_max.is_valid()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.repeat_info.is_some() as u8, 7, 7);
        dst[0] = place_bits(dst[0], self.dect_delay.to_coded_value().unwrap_or(0) as u8, 6, 6);
        dst[0] = place_bits(dst[0], self.cw_min.to_coded_value().unwrap_or(0) as u8, 5, 3);
        dst[0] = place_bits(dst[0], self.cw_max.to_coded_value().unwrap_or(0) as u8, 2, 0);
        if let Some(r) = self.repeat_info {
            dst[1] = place_bits(0, r.repeat_type.to_coded_value().unwrap_or(0) as u8, 7, 7);
            dst[1] = place_bits(dst[1], r.allow_specific_repeated_resources as u8, 6, 6);
            dst[1] = place_bits(dst[1], r.repetition as u8, 5, 0);
            dst[2] = r.validity as u8;
        }
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.is_empty() {
            return false;
        }
        let repeat_present = extract_bits(src[0], 7, 7) != 0;
        self.dect_delay = DectDelay::from_coded_value(extract_bits(src[0], 6, 6) as u32);
        self.cw_min = CwMin::from_coded_value(extract_bits(src[0], 5, 3) as u32);
        self.cw_max = CwMax::from_coded_value(extract_bits(src[0], 2, 0) as u32);
        self.repeat_info = if repeat_present {
            if src.len() < 3 {
                return false;
            }
            Some(RepeatInfo {
                repeat_type: RepeatType::from_coded_value(extract_bits(src[1], 7, 7) as u32),
                allow_specific_repeated_resources: extract_bits(src[1], 6, 6) != 0,
                repetition: extract_bits(src[1], 5, 0) as u32,
                validity: src[2] as u32,
            })
        } else {
            None
        };
        self.is_valid()
    }
}

/// Generates a small fixed-size IE whose body is a handful of plain integer/bool fields, for the
/// IEs whose exact bit layout the source does not assign semantic weight beyond "a few counters".
macro_rules! simple_ie {
    ($name:ident, $ie_type:ident, $size:expr, { $($field:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            $(pub $field: u32),+
        }

        impl MmieEnvelope for $name {
            fn mux_header_template(&self) -> MuxHeaderTemplate {
                MuxHeaderTemplate::fixed(IeTypeExt00_01_10::$ie_type)
            }

            fn packed_size_of_sdu(&self) -> usize {
                $size
            }
        }

        impl Packing for $name {
            fn is_valid(&self) -> bool {
                true
            }

            fn pack(&self, dst: &mut [u8]) {
                let mut off = 0;
                $(
                    dst[off] = self.$field as u8;
                    off += 1;
                )+
                let _ = off;
            }

            fn unpack(&mut self, src: &[u8]) -> bool {
                if src.len() < $size {
                    return false;
                }
                let mut off = 0;
                $(
                    self.$field = src[off] as u32;
                    off += 1;
                )+
                let _ = off;
                true
            }
        }
    };
}

simple_ie!(RdCapabilityIe, RdCapabilityIe, 4, {
    radio_type,
    phy_capability,
    mac_capability,
    release_version,
});
simple_ie!(NeighbouringIe, NeighbouringIe, 3, {
    neighbour_id,
    channel,
    quality,
});
simple_ie!(BroadcastIndicationIe, BroadcastIndicationIe, 3, {
    indication_type,
    short_rd_id,
    feedback,
});
simple_ie!(GroupAssignmentIe, GroupAssignmentIe, 2, {
    group_id,
    resource_tag,
});
simple_ie!(LoadInfoIe, LoadInfoIe, 3, {
    load_percentage,
    rach_load_percentage,
    traffic_load_percentage,
});
simple_ie!(MeasurementReportIe, MeasurementReportIe, 2, {
    snr,
    rssi,
});

/// §6.4.3.2: `mac_ext == 11`, 0-byte body -- a bare trigger asking the peer to send fresh
/// capability/configuration IEs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigurationRequestIe;

impl MmieEnvelope for ConfigurationRequestIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::ext_11_len_0(IeTypeExt11Len0::ConfigurationRequestIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        0
    }
}

impl Packing for ConfigurationRequestIe {
    fn is_valid(&self) -> bool {
        true
    }

    fn pack(&self, _dst: &mut [u8]) {}

    fn unpack(&mut self, _src: &[u8]) -> bool {
        true
    }
}

/// §6.4.3.9: `mac_ext == 11`, 1-byte body carrying a coarse device-status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadioDeviceStatusIe {
    pub status: u32,
}

impl MmieEnvelope for RadioDeviceStatusIe {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::ext_11_len_1(IeTypeExt11Len1::RadioDeviceStatusIe)
    }

    fn packed_size_of_sdu(&self) -> usize {
        1
    }
}

impl Packing for RadioDeviceStatusIe {
    fn is_valid(&self) -> bool {
        self.status <= u8::MAX as u32
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.status as u8;
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.is_empty() {
            return false;
        }
        self.status = src[0] as u32;
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn security_info_round_trip() {
        let m = SecurityInfoIe {
            key_index: 7,
            security_iv_type: SecurityIvType::ResynchronizingHpc,
            hpc: 0xDEAD_BEEF,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = SecurityInfoIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn route_info_round_trip() {
        let m = RouteInfoIe {
            sink_address: 0x1234_5678,
            route_cost: 3,
            application_sequence_number: 0x0102,
        };
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = RouteInfoIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn resource_allocation_round_trip_with_repeat() {
        let m = ResourceAllocationIe {
            allocation: Allocation {
                start_subslot: 12,
                length_type: LengthType::LengthInSlots,
                length: 4,
            },
            repeat_info: Some(RepeatInfo {
                repeat_type: RepeatType::RepeatedInFollowingSubslots,
                allow_specific_repeated_resources: true,
                repetition: 5,
                validity: 20,
            }),
        };
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = ResourceAllocationIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn random_access_resource_round_trip_without_repeat() {
        let m = RandomAccessResourceIe {
            cw_min: CwMin::_16,
            cw_max: CwMax::_1024,
            dect_delay: DectDelay::ResponseWindowStartsAfterHalfFrame,
            repeat_info: None,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = RandomAccessResourceIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn configuration_request_is_empty() {
        let m = ConfigurationRequestIe;
        assert_eq!(m.packed_size_of_sdu(), 0);
    }

    #[test]
    fn radio_device_status_round_trip() {
        let m = RadioDeviceStatusIe { status: 42 };
        let mut buf = [0u8; 1];
        m.pack(&mut buf);
        let mut q = RadioDeviceStatusIe::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }
}
