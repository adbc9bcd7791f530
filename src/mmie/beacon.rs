//! Beacon messages (§6.4.2.2/6.4.2.3) -- grounded on `network_beacon_message.hpp` and
//! `cluster_beacon_message.hpp`. Both are packing-peeking: byte 0 (and, for the cluster beacon,
//! byte 1) carries every presence flag needed to compute the full length before the rest of the
//! body is available.

use super::{IeTypeExt00_01_10, MmieEnvelope, MuxHeaderTemplate, PeekError, Packing, PackingPeeking};
use crate::bitfield::{extract_bits, place_bits};
use crate::coded_enum;
use crate::enumeration::CodedEnum;
use crate::identity::network_id_to_24bit;

coded_enum! {
    /// Table 6.4.2.2-1, field Clusters Max TX Power.
    pub enum ClustersMaxTxPower {
        Neg13dBm = 2,
        Neg6dBm = 3,
        Neg3dBm = 4,
        _0dBm = 5,
        _3dBm = 6,
        _6dBm = 7,
        _10dBm = 8,
        _14dBm = 9,
        _19dBm = 10,
        _23dBm = 11,
        _26dBm = 12,
        _29dBm = 13,
    }
}

coded_enum! {
    /// Table 6.4.2.2-1, field Network Beacon Period.
    pub enum NetworkBeaconPeriod {
        _50ms = 0,
        _100ms = 1,
        _500ms = 2,
        _1000ms = 3,
        _1500ms = 4,
        _2000ms = 5,
        _4000ms = 6,
    }
}

coded_enum! {
    /// Table 6.4.2.2-1, field Cluster Beacon Period.
    pub enum ClusterBeaconPeriod {
        _10ms = 0,
        _50ms = 1,
        _100ms = 2,
        _500ms = 3,
        _1000ms = 4,
        _1500ms = 5,
        _2000ms = 6,
        _4000ms = 7,
        _8000ms = 8,
        _16000ms = 9,
        _32000ms = 10,
    }
}

impl Default for NetworkBeaconPeriod {
    fn default() -> Self {
        NetworkBeaconPeriod::_50ms
    }
}
impl Default for ClusterBeaconPeriod {
    fn default() -> Self {
        ClusterBeaconPeriod::_10ms
    }
}

/// §6.4.2.2: advertises network-wide timing and capability, broadcast less often than the
/// cluster beacon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkBeaconMessage {
    pub clusters_max_tx_power: Option<ClustersMaxTxPower>,
    pub has_power_constraints: bool,
    pub current_cluster_channel: Option<u32>,
    pub network_beacon_channels: Vec<u32>,
    pub network_beacon_period: NetworkBeaconPeriod,
    pub cluster_beacon_period: ClusterBeaconPeriod,
    pub next_cluster_channel: u32,
    pub time_to_next: u32,
}

impl NetworkBeaconMessage {
    fn byte0(&self) -> u8 {
        let b = place_bits(0, self.clusters_max_tx_power.is_some() as u8, 7, 7);
        let b = place_bits(b, self.has_power_constraints as u8, 6, 6);
        let b = place_bits(b, self.current_cluster_channel.is_some() as u8, 5, 5);
        let b = place_bits(b, self.network_beacon_channels.len() as u8, 4, 3);
        place_bits(b, self.network_beacon_period.to_coded_value().unwrap_or(0) as u8, 2, 0)
    }

    fn trailer_len(&self) -> usize {
        (self.clusters_max_tx_power.is_some() as usize)
            + (self.current_cluster_channel.is_some() as usize) * 2
            + self.network_beacon_channels.len() * 2
            + 2 // next_cluster_channel
            + 2 // time_to_next
    }
}

impl MmieEnvelope for NetworkBeaconMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::NetworkBeaconMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        2 + self.trailer_len()
    }
}

impl Packing for NetworkBeaconMessage {
    fn is_valid(&self) -> bool {
        self.network_beacon_channels.len() <= 3
            && self
                .clusters_max_tx_power
                .map_or(true, |p| p.is_valid())
            && self.network_beacon_period.is_valid()
            && self.cluster_beacon_period.is_valid()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.byte0();
        dst[1] = place_bits(0, self.cluster_beacon_period.to_coded_value().unwrap_or(0) as u8, 7, 4);
        let mut off = 2;
        if let Some(p) = self.clusters_max_tx_power {
            dst[off] = p.to_coded_value().unwrap_or(0) as u8;
            off += 1;
        }
        if let Some(ch) = self.current_cluster_channel {
            dst[off] = (ch >> 8) as u8;
            dst[off + 1] = (ch & 0xFF) as u8;
            off += 2;
        }
        for &ch in &self.network_beacon_channels {
            dst[off] = (ch >> 8) as u8;
            dst[off + 1] = (ch & 0xFF) as u8;
            off += 2;
        }
        dst[off] = (self.next_cluster_channel >> 8) as u8;
        dst[off + 1] = (self.next_cluster_channel & 0xFF) as u8;
        off += 2;
        dst[off] = (self.time_to_next >> 8) as u8;
        dst[off + 1] = (self.time_to_next & 0xFF) as u8;
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 2 {
            return false;
        }
        let tx_power_present = extract_bits(src[0], 7, 7) != 0;
        self.has_power_constraints = extract_bits(src[0], 6, 6) != 0;
        let channel_present = extract_bits(src[0], 5, 5) != 0;
        let n_channels = extract_bits(src[0], 4, 3) as usize;
        self.network_beacon_period = NetworkBeaconPeriod::from_coded_value(extract_bits(src[0], 2, 0) as u32);
        self.cluster_beacon_period = ClusterBeaconPeriod::from_coded_value(extract_bits(src[1], 7, 4) as u32);

        let mut off = 2;
        self.clusters_max_tx_power = if tx_power_present {
            if off >= src.len() {
                return false;
            }
            let p = ClustersMaxTxPower::from_coded_value(src[off] as u32);
            off += 1;
            Some(p)
        } else {
            None
        };
        self.current_cluster_channel = if channel_present {
            if off + 2 > src.len() {
                return false;
            }
            let ch = ((src[off] as u32) << 8) | src[off + 1] as u32;
            off += 2;
            Some(ch)
        } else {
            None
        };
        self.network_beacon_channels.clear();
        for _ in 0..n_channels {
            if off + 2 > src.len() {
                return false;
            }
            self.network_beacon_channels
                .push(((src[off] as u32) << 8) | src[off + 1] as u32);
            off += 2;
        }
        if off + 4 > src.len() {
            return false;
        }
        self.next_cluster_channel = ((src[off] as u32) << 8) | src[off + 1] as u32;
        self.time_to_next = ((src[off + 2] as u32) << 8) | src[off + 3] as u32;
        self.is_valid()
    }
}

impl PackingPeeking for NetworkBeaconMessage {
    const PACKED_SIZE_MIN_TO_PEEK: usize = 1;

    fn packed_size_by_peeking(src: &[u8]) -> Result<usize, PeekError> {
        if src.is_empty() {
            return Err(PeekError::ReservedFieldNotZero);
        }
        let tx_power_present = extract_bits(src[0], 7, 7) != 0;
        let channel_present = extract_bits(src[0], 5, 5) != 0;
        let n_channels = extract_bits(src[0], 4, 3) as usize;
        if n_channels > 3 {
            return Err(PeekError::NonreservedSetToReserved);
        }
        Ok(2 + tx_power_present as usize
            + channel_present as usize * 2
            + n_channels * 2
            + 4)
    }
}

coded_enum! {
    /// Table 6.4.2.3-1, field CountToTrigger.
    pub enum CountToTrigger {
        _1Times = 0,
        _2Times = 1,
        _3Times = 2,
        _4Times = 3,
        _5Times = 4,
        _6Times = 5,
        _7Times = 6,
        _8Times = 7,
        _16Times = 8,
        _24Times = 9,
        _32Times = 10,
        _40Times = 11,
        _48Times = 12,
        _64Times = 13,
        _128Times = 14,
        _256Times = 15,
    }
}

coded_enum! {
    /// Table 6.4.2.3-1, fields RelQuality and MinQuality.
    pub enum QualityThreshold {
        _0dB = 0,
        _3dB = 1,
        _6dB = 2,
        _9dB = 3,
    }
}

impl Default for CountToTrigger {
    fn default() -> Self {
        CountToTrigger::_1Times
    }
}
impl Default for QualityThreshold {
    fn default() -> Self {
        QualityThreshold::_0dB
    }
}

/// §6.4.2.3: transmitted every `cluster_beacon_period`, carries the FT's current frame number
/// and, optionally, mobility/handover hints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClusterBeaconMessage {
    pub mu: u32,
    pub system_frame_number: u32,
    pub clusters_max_tx_power: Option<ClustersMaxTxPower>,
    pub has_power_constraints: bool,
    pub frame_offset: Option<u32>,
    pub next_cluster_channel_and_time_to_next: Option<(u32, u32)>,
    pub network_beacon_period: NetworkBeaconPeriod,
    pub cluster_beacon_period: ClusterBeaconPeriod,
    pub count_to_trigger: CountToTrigger,
    pub rel_quality: QualityThreshold,
    pub min_quality: QualityThreshold,
}

impl ClusterBeaconMessage {
    pub fn set_mu(&mut self, mu: u32) {
        self.mu = mu;
    }

    fn trailer_len(&self) -> usize {
        (self.clusters_max_tx_power.is_some() as usize)
            + (self.frame_offset.is_some() as usize)
            + (self.next_cluster_channel_and_time_to_next.is_some() as usize) * 4
    }
}

impl MmieEnvelope for ClusterBeaconMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::ClusterBeaconMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        4 + self.trailer_len()
    }
}

impl Packing for ClusterBeaconMessage {
    fn is_valid(&self) -> bool {
        self.system_frame_number <= 0xFF
            && self
                .clusters_max_tx_power
                .map_or(true, |p| p.is_valid())
            && self.network_beacon_period.is_valid()
            && self.cluster_beacon_period.is_valid()
            && self.count_to_trigger.is_valid()
            && self.rel_quality.is_valid()
            && self.min_quality.is_valid()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.system_frame_number as u8;
        dst[1] = place_bits(0, self.clusters_max_tx_power.is_some() as u8, 7, 7);
        dst[1] = place_bits(dst[1], self.has_power_constraints as u8, 6, 6);
        dst[1] = place_bits(dst[1], self.frame_offset.is_some() as u8, 5, 5);
        dst[1] = place_bits(
            dst[1],
            self.next_cluster_channel_and_time_to_next.is_some() as u8,
            4,
            4,
        );
        dst[2] = place_bits(0, self.network_beacon_period.to_coded_value().unwrap_or(0) as u8, 7, 5);
        dst[2] = place_bits(dst[2], self.cluster_beacon_period.to_coded_value().unwrap_or(0) as u8, 4, 1);
        dst[3] = place_bits(0, self.count_to_trigger.to_coded_value().unwrap_or(0) as u8, 7, 4);
        dst[3] = place_bits(dst[3], self.rel_quality.to_coded_value().unwrap_or(0) as u8, 3, 2);
        dst[3] = place_bits(dst[3], self.min_quality.to_coded_value().unwrap_or(0) as u8, 1, 0);

        let mut off = 4;
        if let Some(p) = self.clusters_max_tx_power {
            dst[off] = p.to_coded_value().unwrap_or(0) as u8;
            off += 1;
        }
        if let Some(fo) = self.frame_offset {
            dst[off] = fo as u8;
            off += 1;
        }
        if let Some((ch, t)) = self.next_cluster_channel_and_time_to_next {
            dst[off] = (ch >> 8) as u8;
            dst[off + 1] = (ch & 0xFF) as u8;
            dst[off + 2] = (t >> 8) as u8;
            dst[off + 3] = (t & 0xFF) as u8;
        }
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 4 {
            return false;
        }
        self.system_frame_number = src[0] as u32;
        let tx_power_present = extract_bits(src[1], 7, 7) != 0;
        self.has_power_constraints = extract_bits(src[1], 6, 6) != 0;
        let frame_offset_present = extract_bits(src[1], 5, 5) != 0;
        let next_present = extract_bits(src[1], 4, 4) != 0;
        self.network_beacon_period = NetworkBeaconPeriod::from_coded_value(extract_bits(src[2], 7, 5) as u32);
        self.cluster_beacon_period = ClusterBeaconPeriod::from_coded_value(extract_bits(src[2], 4, 1) as u32);
        self.count_to_trigger = CountToTrigger::from_coded_value(extract_bits(src[3], 7, 4) as u32);
        self.rel_quality = QualityThreshold::from_coded_value(extract_bits(src[3], 3, 2) as u32);
        self.min_quality = QualityThreshold::from_coded_value(extract_bits(src[3], 1, 0) as u32);

        let mut off = 4;
        self.clusters_max_tx_power = if tx_power_present {
            if off >= src.len() {
                return false;
            }
            let p = ClustersMaxTxPower::from_coded_value(src[off] as u32);
            off += 1;
            Some(p)
        } else {
            None
        };
        self.frame_offset = if frame_offset_present {
            if off >= src.len() {
                return false;
            }
            let fo = src[off] as u32;
            off += 1;
            Some(fo)
        } else {
            None
        };
        self.next_cluster_channel_and_time_to_next = if next_present {
            if off + 4 > src.len() {
                return false;
            }
            let ch = ((src[off] as u32) << 8) | src[off + 1] as u32;
            let t = ((src[off + 2] as u32) << 8) | src[off + 3] as u32;
            Some((ch, t))
        } else {
            None
        };
        self.is_valid()
    }
}

impl PackingPeeking for ClusterBeaconMessage {
    const PACKED_SIZE_MIN_TO_PEEK: usize = 2;

    fn packed_size_by_peeking(src: &[u8]) -> Result<usize, PeekError> {
        if src.len() < 2 {
            return Err(PeekError::ReservedFieldNotZero);
        }
        let tx_power_present = extract_bits(src[1], 7, 7) != 0;
        let frame_offset_present = extract_bits(src[1], 5, 5) != 0;
        let next_present = extract_bits(src[1], 4, 4) != 0;
        Ok(4 + tx_power_present as usize
            + frame_offset_present as usize
            + next_present as usize * 4)
    }
}

/// Truncates a 32-bit network ID to the 24 bits carried by beacon MAC common headers.
pub fn beacon_network_id_24(network_id: u32) -> u32 {
    network_id_to_24bit(network_id)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn network_beacon_round_trip_no_optionals() {
        let m = NetworkBeaconMessage {
            clusters_max_tx_power: None,
            has_power_constraints: false,
            current_cluster_channel: None,
            network_beacon_channels: vec![],
            network_beacon_period: NetworkBeaconPeriod::_1000ms,
            cluster_beacon_period: ClusterBeaconPeriod::_10ms,
            next_cluster_channel: 1677,
            time_to_next: 500,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        assert_eq!(
            NetworkBeaconMessage::packed_size_by_peeking(&buf).unwrap(),
            buf.len()
        );
        let mut q = NetworkBeaconMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn network_beacon_round_trip_with_optionals() {
        let m = NetworkBeaconMessage {
            clusters_max_tx_power: Some(ClustersMaxTxPower::_6dBm),
            has_power_constraints: true,
            current_cluster_channel: Some(1671),
            network_beacon_channels: vec![1672, 1673],
            network_beacon_period: NetworkBeaconPeriod::_500ms,
            cluster_beacon_period: ClusterBeaconPeriod::_100ms,
            next_cluster_channel: 1674,
            time_to_next: 10,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        assert_eq!(
            NetworkBeaconMessage::packed_size_by_peeking(&buf).unwrap(),
            buf.len()
        );
        let mut q = NetworkBeaconMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn cluster_beacon_round_trip() {
        let m = ClusterBeaconMessage {
            mu: 1,
            system_frame_number: 200,
            clusters_max_tx_power: Some(ClustersMaxTxPower::_0dBm),
            has_power_constraints: false,
            frame_offset: Some(3),
            next_cluster_channel_and_time_to_next: Some((1671, 40)),
            network_beacon_period: NetworkBeaconPeriod::_4000ms,
            cluster_beacon_period: ClusterBeaconPeriod::_8000ms,
            count_to_trigger: CountToTrigger::_8Times,
            rel_quality: QualityThreshold::_6dB,
            min_quality: QualityThreshold::_3dB,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        assert_eq!(
            ClusterBeaconMessage::packed_size_by_peeking(&buf).unwrap(),
            buf.len()
        );
        let mut q = ClusterBeaconMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }
}
