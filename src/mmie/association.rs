//! Association and reconfiguration lifecycle messages (§6.4.2.4-6). Grounded on
//! `association_request_message.hpp`, `association_response_message.hpp` and
//! `association_release_message.hpp`; reconfiguration mirrors the request/response shape of
//! association per §4.D's enumeration of MMIE variants.

use super::{IeTypeExt00_01_10, MmieEnvelope, MuxHeaderTemplate, PeekError, Packing, PackingPeeking};
use crate::bitfield::{extract_bits, place_bits};
use crate::coded_enum;
use crate::enumeration::CodedEnum;

coded_enum! {
    pub enum SetupCause {
        Initial = 0,
        NewSetOfFlowsRequested = 1,
        Mobility = 2,
        ErrorOccurred = 3,
        OwnOperatingChannelChanged = 4,
        OperatingModeChanged = 5,
        Other = 6,
    }
}

coded_enum! {
    pub enum MaxHarqRetransmissionDelay {
        _105us = 0,
        _130us = 1,
        _155us = 2,
        _180us = 3,
        _205us = 4,
        _230us = 5,
        _255us = 6,
        _280us = 7,
        _555us = 8,
        _1_105ms = 9,
        _2_105ms = 10,
        _4_105ms = 11,
        _6_105ms = 12,
        _8_105ms = 13,
        _10_105ms = 14,
        _500ms = 15,
    }
}

impl Default for SetupCause {
    fn default() -> Self {
        SetupCause::Initial
    }
}
impl Default for MaxHarqRetransmissionDelay {
    fn default() -> Self {
        MaxHarqRetransmissionDelay::_105us
    }
}

/// Table 6.3.4-2's `flow_id_t`, used by [`AssociationRequestMessage::flow_ids`] and
/// [`AssociationResponseMessage::flow_ids`] (a small set of the flow IDs a PT is requesting or an
/// FT is granting, distinct from the per-MMIE [`super::FlowId`] used by flowing MMIEs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowIdEntry(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FtConfiguration {
    pub network_beacon_period: u32,
    pub cluster_beacon_period: u32,
    pub next_cluster_channel: u32,
    pub time_to_next: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarqConfiguration {
    pub n_harq_processes: u32,
    pub max_harq_retransmission_delay: MaxHarqRetransmissionDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarqConfigurationTxRx {
    pub tx: HarqConfiguration,
    pub rx: HarqConfiguration,
}

/// §6.4.2.4: a PT's request to join an FT's cluster, or to change the flows/HARQ configuration
/// of an existing association.
#[derive(Debug, Clone, Default)]
pub struct AssociationRequestMessage {
    pub setup_cause: SetupCause,
    pub flow_ids: Vec<FlowIdEntry>,
    pub has_power_constraints: bool,
    pub ft_configuration: Option<FtConfiguration>,
    pub current_cluster_channel: Option<u32>,
    pub harq_configuration: HarqConfigurationTxRx,
}

impl AssociationRequestMessage {
    fn trailer_len(&self) -> usize {
        self.flow_ids.len()
            + self.ft_configuration.is_some() as usize * 6
            + self.current_cluster_channel.is_some() as usize * 2
            + 2 // harq_configuration tx+rx, 1 byte each
    }
}

impl MmieEnvelope for AssociationRequestMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::AssociationRequestMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        2 + self.trailer_len()
    }
}

impl Packing for AssociationRequestMessage {
    fn is_valid(&self) -> bool {
        self.setup_cause.is_valid() && self.flow_ids.len() <= 0x1F
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.setup_cause.to_coded_value().unwrap_or(0) as u8, 7, 5);
        dst[0] = place_bits(dst[0], self.has_power_constraints as u8, 4, 4);
        dst[0] = place_bits(dst[0], self.ft_configuration.is_some() as u8, 3, 3);
        dst[0] = place_bits(dst[0], self.current_cluster_channel.is_some() as u8, 2, 2);
        dst[1] = self.flow_ids.len() as u8;

        let mut off = 2;
        for f in &self.flow_ids {
            dst[off] = f.0 as u8;
            off += 1;
        }
        if let Some(ft) = self.ft_configuration {
            dst[off] = ft.network_beacon_period as u8;
            dst[off + 1] = ft.cluster_beacon_period as u8;
            dst[off + 2] = (ft.next_cluster_channel >> 8) as u8;
            dst[off + 3] = (ft.next_cluster_channel & 0xFF) as u8;
            dst[off + 4] = (ft.time_to_next >> 8) as u8;
            dst[off + 5] = (ft.time_to_next & 0xFF) as u8;
            off += 6;
        }
        if let Some(ch) = self.current_cluster_channel {
            dst[off] = (ch >> 8) as u8;
            dst[off + 1] = (ch & 0xFF) as u8;
            off += 2;
        }
        dst[off] = place_bits(0, self.harq_configuration.tx.n_harq_processes as u8, 7, 4);
        dst[off] = place_bits(
            dst[off],
            self.harq_configuration.tx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
            3,
            0,
        );
        dst[off + 1] = place_bits(0, self.harq_configuration.rx.n_harq_processes as u8, 7, 4);
        dst[off + 1] = place_bits(
            dst[off + 1],
            self.harq_configuration.rx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
            3,
            0,
        );
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 2 {
            return false;
        }
        self.setup_cause = SetupCause::from_coded_value(extract_bits(src[0], 7, 5) as u32);
        self.has_power_constraints = extract_bits(src[0], 4, 4) != 0;
        let ft_present = extract_bits(src[0], 3, 3) != 0;
        let channel_present = extract_bits(src[0], 2, 2) != 0;
        let n_flows = src[1] as usize;

        let mut off = 2;
        self.flow_ids.clear();
        for _ in 0..n_flows {
            if off >= src.len() {
                return false;
            }
            self.flow_ids.push(FlowIdEntry(src[off] as u32));
            off += 1;
        }
        self.ft_configuration = if ft_present {
            if off + 6 > src.len() {
                return false;
            }
            let ft = FtConfiguration {
                network_beacon_period: src[off] as u32,
                cluster_beacon_period: src[off + 1] as u32,
                next_cluster_channel: ((src[off + 2] as u32) << 8) | src[off + 3] as u32,
                time_to_next: ((src[off + 4] as u32) << 8) | src[off + 5] as u32,
            };
            off += 6;
            Some(ft)
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
        if off + 2 > src.len() {
            return false;
        }
        self.harq_configuration.tx = HarqConfiguration {
            n_harq_processes: extract_bits(src[off], 7, 4) as u32,
            max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                extract_bits(src[off], 3, 0) as u32,
            ),
        };
        self.harq_configuration.rx = HarqConfiguration {
            n_harq_processes: extract_bits(src[off + 1], 7, 4) as u32,
            max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                extract_bits(src[off + 1], 3, 0) as u32,
            ),
        };
        self.is_valid()
    }
}

impl PackingPeeking for AssociationRequestMessage {
    const PACKED_SIZE_MIN_TO_PEEK: usize = 2;

    fn packed_size_by_peeking(src: &[u8]) -> Result<usize, PeekError> {
        if src.len() < 2 {
            return Err(PeekError::ReservedFieldNotZero);
        }
        let ft_present = extract_bits(src[0], 3, 3) != 0;
        let channel_present = extract_bits(src[0], 2, 2) != 0;
        let n_flows = src[1] as usize;
        Ok(2 + n_flows + ft_present as usize * 6 + channel_present as usize * 2 + 2)
    }
}

coded_enum! {
    pub enum RejectCause {
        RadioCapacityNotSufficient = 0,
        HwCapacityNotSufficient = 1,
        ConflictingShortRdId = 2,
        AssociationRequestNotSecure = 3,
        Other = 4,
    }
}

coded_enum! {
    pub enum NofFlowsAccepted {
        None = 0,
        AsIncluded = 0b110,
        AsRequested = 0b111,
    }
}

impl Default for RejectCause {
    fn default() -> Self {
        RejectCause::Other
    }
}
impl Default for NofFlowsAccepted {
    fn default() -> Self {
        NofFlowsAccepted::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RejectInfo {
    pub reject_cause: RejectCause,
    /// Wait time before retry, in seconds (Table 6.4.2.5-1's `reject_time_t` is a linear 0..600s
    /// scale so it is kept as a plain integer rather than a second coded enum).
    pub reject_time_s: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupInfo {
    pub group_id: u32,
    pub resource_tag: u32,
}

/// §6.4.2.5: the FT's reply to an [`AssociationRequestMessage`].
#[derive(Debug, Clone, Default)]
pub struct AssociationResponseMessage {
    pub accepted: bool,
    pub reject_info: Option<RejectInfo>,
    pub harq_configuration: Option<HarqConfigurationTxRx>,
    pub nof_flows_accepted: NofFlowsAccepted,
    pub flow_ids: Vec<FlowIdEntry>,
    pub group_info: Option<GroupInfo>,
    pub tx_power: bool,
}

impl AssociationResponseMessage {
    fn trailer_len(&self) -> usize {
        self.reject_info.is_some() as usize * 2
            + self.harq_configuration.is_some() as usize * 2
            + self.flow_ids.len()
            + self.group_info.is_some() as usize * 2
    }
}

impl MmieEnvelope for AssociationResponseMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        // `flow_ids` trails to the end of the body with no separate count field, so its length
        // can only be recovered from the multiplexing header's own declared length, not peeked
        // from content alone -- unlike the request side, this is plain packing.
        MuxHeaderTemplate::variable(IeTypeExt00_01_10::AssociationResponseMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        1 + self.trailer_len()
    }
}

impl Packing for AssociationResponseMessage {
    fn is_valid(&self) -> bool {
        self.accepted != self.reject_info.is_some()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.accepted as u8, 7, 7);
        dst[0] = place_bits(dst[0], self.harq_configuration.is_some() as u8, 6, 6);
        dst[0] = place_bits(dst[0], self.nof_flows_accepted.to_coded_value().unwrap_or(0) as u8, 5, 3);
        dst[0] = place_bits(dst[0], self.group_info.is_some() as u8, 2, 2);
        dst[0] = place_bits(dst[0], self.tx_power as u8, 1, 1);

        let mut off = 1;
        if let Some(r) = self.reject_info {
            dst[off] = r.reject_cause.to_coded_value().unwrap_or(0) as u8;
            dst[off + 1] = r.reject_time_s as u8;
            off += 2;
        }
        if let Some(h) = self.harq_configuration {
            dst[off] = place_bits(0, h.tx.n_harq_processes as u8, 7, 4);
            dst[off] = place_bits(
                dst[off],
                h.tx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
                3,
                0,
            );
            dst[off + 1] = place_bits(0, h.rx.n_harq_processes as u8, 7, 4);
            dst[off + 1] = place_bits(
                dst[off + 1],
                h.rx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
                3,
                0,
            );
            off += 2;
        }
        for f in &self.flow_ids {
            dst[off] = f.0 as u8;
            off += 1;
        }
        if let Some(g) = self.group_info {
            dst[off] = g.group_id as u8;
            dst[off + 1] = g.resource_tag as u8;
        }
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.is_empty() {
            return false;
        }
        self.accepted = extract_bits(src[0], 7, 7) != 0;
        let harq_present = extract_bits(src[0], 6, 6) != 0;
        self.nof_flows_accepted = NofFlowsAccepted::from_coded_value(extract_bits(src[0], 5, 3) as u32);
        let group_present = extract_bits(src[0], 2, 2) != 0;
        self.tx_power = extract_bits(src[0], 1, 1) != 0;

        let mut off = 1;
        self.reject_info = if !self.accepted {
            if off + 2 > src.len() {
                return false;
            }
            let r = RejectInfo {
                reject_cause: RejectCause::from_coded_value(src[off] as u32),
                reject_time_s: src[off + 1] as u32,
            };
            off += 2;
            Some(r)
        } else {
            None
        };
        self.harq_configuration = if harq_present {
            if off + 2 > src.len() {
                return false;
            }
            let h = HarqConfigurationTxRx {
                tx: HarqConfiguration {
                    n_harq_processes: extract_bits(src[off], 7, 4) as u32,
                    max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                        extract_bits(src[off], 3, 0) as u32,
                    ),
                },
                rx: HarqConfiguration {
                    n_harq_processes: extract_bits(src[off + 1], 7, 4) as u32,
                    max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                        extract_bits(src[off + 1], 3, 0) as u32,
                    ),
                },
            };
            off += 2;
            Some(h)
        } else {
            None
        };
        let n_flows = match self.nof_flows_accepted {
            NofFlowsAccepted::None => 0,
            _ => (src.len() - off).saturating_sub(group_present as usize * 2),
        };
        self.flow_ids.clear();
        for _ in 0..n_flows {
            if off >= src.len() {
                return false;
            }
            self.flow_ids.push(FlowIdEntry(src[off] as u32));
            off += 1;
        }
        self.group_info = if group_present {
            if off + 2 > src.len() {
                return false;
            }
            Some(GroupInfo {
                group_id: src[off] as u32,
                resource_tag: src[off + 1] as u32,
            })
        } else {
            None
        };
        self.is_valid()
    }
}


coded_enum! {
    pub enum ReleaseCause {
        ConnectionTermination = 0,
        Mobility = 1,
        LongInactivity = 2,
        IncompatibleConfiguration = 3,
        NoSufficientHwMemoryResource = 4,
        NoSufficientRadioResources = 5,
        BadRadioQuality = 6,
        SecurityError = 7,
        OtherError = 8,
        OtherReason = 9,
    }
}

impl Default for ReleaseCause {
    fn default() -> Self {
        ReleaseCause::OtherReason
    }
}

/// §6.4.2.6: either side tearing down an association. Plain packing (fixed 1-byte body), not
/// packing-peeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssociationReleaseMessage {
    pub release_cause: ReleaseCause,
}

impl MmieEnvelope for AssociationReleaseMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::AssociationReleaseMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        1
    }
}

impl Packing for AssociationReleaseMessage {
    fn is_valid(&self) -> bool {
        self.release_cause.is_valid()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = self.release_cause.to_coded_value().unwrap_or(0) as u8;
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.is_empty() {
            return false;
        }
        self.release_cause = ReleaseCause::from_coded_value(src[0] as u32);
        self.is_valid()
    }
}

/// §4.D: reconfiguration mirrors association's request/response shape once a PT is already
/// attached, letting it renegotiate flows or HARQ parameters without a full release/re-associate
/// cycle. Reuses [`AssociationRequestMessage`]'s body layout under its own IE type.
#[derive(Debug, Clone, Default)]
pub struct ReconfigurationRequestMessage {
    pub setup_cause: SetupCause,
    pub flow_ids: Vec<FlowIdEntry>,
    pub has_power_constraints: bool,
    pub harq_configuration: HarqConfigurationTxRx,
}

impl MmieEnvelope for ReconfigurationRequestMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::fixed(IeTypeExt00_01_10::ReconfigurationRequestMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        2 + self.flow_ids.len() + 2
    }
}

impl Packing for ReconfigurationRequestMessage {
    fn is_valid(&self) -> bool {
        self.setup_cause.is_valid()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.setup_cause.to_coded_value().unwrap_or(0) as u8, 7, 5);
        dst[0] = place_bits(dst[0], self.has_power_constraints as u8, 4, 4);
        dst[1] = self.flow_ids.len() as u8;
        let mut off = 2;
        for f in &self.flow_ids {
            dst[off] = f.0 as u8;
            off += 1;
        }
        dst[off] = place_bits(0, self.harq_configuration.tx.n_harq_processes as u8, 7, 4);
        dst[off] = place_bits(
            dst[off],
            self.harq_configuration.tx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
            3,
            0,
        );
        dst[off + 1] = place_bits(0, self.harq_configuration.rx.n_harq_processes as u8, 7, 4);
        dst[off + 1] = place_bits(
            dst[off + 1],
            self.harq_configuration.rx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
            3,
            0,
        );
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.len() < 2 {
            return false;
        }
        self.setup_cause = SetupCause::from_coded_value(extract_bits(src[0], 7, 5) as u32);
        self.has_power_constraints = extract_bits(src[0], 4, 4) != 0;
        let n_flows = src[1] as usize;
        let mut off = 2;
        self.flow_ids.clear();
        for _ in 0..n_flows {
            if off >= src.len() {
                return false;
            }
            self.flow_ids.push(FlowIdEntry(src[off] as u32));
            off += 1;
        }
        if off + 2 > src.len() {
            return false;
        }
        self.harq_configuration.tx = HarqConfiguration {
            n_harq_processes: extract_bits(src[off], 7, 4) as u32,
            max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                extract_bits(src[off], 3, 0) as u32,
            ),
        };
        self.harq_configuration.rx = HarqConfiguration {
            n_harq_processes: extract_bits(src[off + 1], 7, 4) as u32,
            max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                extract_bits(src[off + 1], 3, 0) as u32,
            ),
        };
        self.is_valid()
    }
}

impl PackingPeeking for ReconfigurationRequestMessage {
    const PACKED_SIZE_MIN_TO_PEEK: usize = 2;

    fn packed_size_by_peeking(src: &[u8]) -> Result<usize, PeekError> {
        if src.len() < 2 {
            return Err(PeekError::ReservedFieldNotZero);
        }
        Ok(2 + src[1] as usize + 2)
    }
}

/// §4.D: the FT's reply to a [`ReconfigurationRequestMessage`], mirroring
/// [`AssociationResponseMessage`] minus the group/tx-power fields that only apply at initial
/// association.
#[derive(Debug, Clone, Default)]
pub struct ReconfigurationResponseMessage {
    pub accepted: bool,
    pub reject_info: Option<RejectInfo>,
    pub harq_configuration: Option<HarqConfigurationTxRx>,
    pub flow_ids: Vec<FlowIdEntry>,
}

impl MmieEnvelope for ReconfigurationResponseMessage {
    fn mux_header_template(&self) -> MuxHeaderTemplate {
        MuxHeaderTemplate::variable(IeTypeExt00_01_10::ReconfigurationResponseMessage)
    }

    fn packed_size_of_sdu(&self) -> usize {
        1 + self.reject_info.is_some() as usize * 2
            + self.harq_configuration.is_some() as usize * 2
            + self.flow_ids.len()
    }
}

impl Packing for ReconfigurationResponseMessage {
    fn is_valid(&self) -> bool {
        self.accepted != self.reject_info.is_some()
    }

    fn pack(&self, dst: &mut [u8]) {
        dst[0] = place_bits(0, self.accepted as u8, 7, 7);
        dst[0] = place_bits(dst[0], self.harq_configuration.is_some() as u8, 6, 6);
        let mut off = 1;
        if let Some(r) = self.reject_info {
            dst[off] = r.reject_cause.to_coded_value().unwrap_or(0) as u8;
            dst[off + 1] = r.reject_time_s as u8;
            off += 2;
        }
        if let Some(h) = self.harq_configuration {
            dst[off] = place_bits(0, h.tx.n_harq_processes as u8, 7, 4);
            dst[off] = place_bits(
                dst[off],
                h.tx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
                3,
                0,
            );
            dst[off + 1] = place_bits(0, h.rx.n_harq_processes as u8, 7, 4);
            dst[off + 1] = place_bits(
                dst[off + 1],
                h.rx.max_harq_retransmission_delay.to_coded_value().unwrap_or(0) as u8,
                3,
                0,
            );
            off += 2;
        }
        for f in &self.flow_ids {
            dst[off] = f.0 as u8;
            off += 1;
        }
    }

    fn unpack(&mut self, src: &[u8]) -> bool {
        if src.is_empty() {
            return false;
        }
        self.accepted = extract_bits(src[0], 7, 7) != 0;
        let harq_present = extract_bits(src[0], 6, 6) != 0;
        let mut off = 1;
        self.reject_info = if !self.accepted {
            if off + 2 > src.len() {
                return false;
            }
            let r = RejectInfo {
                reject_cause: RejectCause::from_coded_value(src[off] as u32),
                reject_time_s: src[off + 1] as u32,
            };
            off += 2;
            Some(r)
        } else {
            None
        };
        self.harq_configuration = if harq_present {
            if off + 2 > src.len() {
                return false;
            }
            let h = HarqConfigurationTxRx {
                tx: HarqConfiguration {
                    n_harq_processes: extract_bits(src[off], 7, 4) as u32,
                    max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                        extract_bits(src[off], 3, 0) as u32,
                    ),
                },
                rx: HarqConfiguration {
                    n_harq_processes: extract_bits(src[off + 1], 7, 4) as u32,
                    max_harq_retransmission_delay: MaxHarqRetransmissionDelay::from_coded_value(
                        extract_bits(src[off + 1], 3, 0) as u32,
                    ),
                },
            };
            off += 2;
            Some(h)
        } else {
            None
        };
        self.flow_ids.clear();
        while off < src.len() {
            self.flow_ids.push(FlowIdEntry(src[off] as u32));
            off += 1;
        }
        self.is_valid()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn association_request_round_trip() {
        let m = AssociationRequestMessage {
            setup_cause: SetupCause::Mobility,
            flow_ids: vec![FlowIdEntry(1), FlowIdEntry(2)],
            has_power_constraints: true,
            ft_configuration: Some(FtConfiguration {
                network_beacon_period: 3,
                cluster_beacon_period: 1,
                next_cluster_channel: 1671,
                time_to_next: 10,
            }),
            current_cluster_channel: Some(1672),
            harq_configuration: HarqConfigurationTxRx {
                tx: HarqConfiguration {
                    n_harq_processes: 4,
                    max_harq_retransmission_delay: MaxHarqRetransmissionDelay::_1_105ms,
                },
                rx: HarqConfiguration {
                    n_harq_processes: 2,
                    max_harq_retransmission_delay: MaxHarqRetransmissionDelay::_500ms,
                },
            },
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        assert_eq!(
            AssociationRequestMessage::packed_size_by_peeking(&buf).unwrap(),
            buf.len()
        );
        let mut q = AssociationRequestMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q.flow_ids, m.flow_ids);
        assert_eq!(q.harq_configuration, m.harq_configuration);
    }

    #[test]
    fn association_response_accept_round_trip() {
        let m = AssociationResponseMessage {
            accepted: true,
            reject_info: None,
            harq_configuration: Some(HarqConfigurationTxRx::default()),
            nof_flows_accepted: NofFlowsAccepted::AsRequested,
            flow_ids: vec![FlowIdEntry(1)],
            group_info: Some(GroupInfo {
                group_id: 9,
                resource_tag: 3,
            }),
            tx_power: true,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = AssociationResponseMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q.flow_ids, m.flow_ids);
        assert_eq!(q.group_info, m.group_info);
    }

    #[test]
    fn association_response_reject_round_trip() {
        let m = AssociationResponseMessage {
            accepted: false,
            reject_info: Some(RejectInfo {
                reject_cause: RejectCause::ConflictingShortRdId,
                reject_time_s: 30,
            }),
            harq_configuration: None,
            nof_flows_accepted: NofFlowsAccepted::None,
            flow_ids: vec![],
            group_info: None,
            tx_power: false,
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = AssociationResponseMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q.reject_info, m.reject_info);
    }

    #[test]
    fn association_release_round_trip() {
        let m = AssociationReleaseMessage {
            release_cause: ReleaseCause::BadRadioQuality,
        };
        let mut buf = [0u8; 1];
        m.pack(&mut buf);
        let mut q = AssociationReleaseMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q, m);
    }

    #[test]
    fn reconfiguration_request_round_trip() {
        let m = ReconfigurationRequestMessage {
            setup_cause: SetupCause::NewSetOfFlowsRequested,
            flow_ids: vec![FlowIdEntry(3)],
            has_power_constraints: false,
            harq_configuration: HarqConfigurationTxRx::default(),
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        assert_eq!(
            ReconfigurationRequestMessage::packed_size_by_peeking(&buf).unwrap(),
            buf.len()
        );
        let mut q = ReconfigurationRequestMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q.flow_ids, m.flow_ids);
    }

    #[test]
    fn reconfiguration_response_round_trip() {
        let m = ReconfigurationResponseMessage {
            accepted: true,
            reject_info: None,
            harq_configuration: None,
            flow_ids: vec![FlowIdEntry(1), FlowIdEntry(4)],
        };
        assert!(m.is_valid());
        let mut buf = vec![0u8; m.packed_size_of_sdu()];
        m.pack(&mut buf);
        let mut q = ReconfigurationResponseMessage::default();
        assert!(q.unpack(&buf));
        assert_eq!(q.flow_ids, m.flow_ids);
    }
}
