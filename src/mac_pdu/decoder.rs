/*! MAC-multiplexing streaming decoder (§4.E).

Demultiplexes a growing byte stream into an ordered list of decoded MMIEs. Implemented as an
explicit state-driven loop rather than recursion, per §9 Design Notes: each iteration peeks a
multiplexing header, resolves the body length (declared, fixed, or peeked from content), and
either unpacks the body or -- if not enough bytes have arrived yet -- stops and waits for the next
[`PduDecoder::decode`] call. This mirrors `mac_pdu_decoder.hpp`'s reentrant `demultiplex()` loop,
reworked from its `switch`-over-an-explicit-state-enum shape into Rust's `?`-free early-return
style; the named states in the module doc comment below map onto points in the loop body.

```text
MuxHeader_Peek -> A_UnpackLengthOrFixed -> B_PeekSize -> UnpackMessage -> CheckIfDone
Terminal: Done | PrematureAbort
```
*/

use crate::mmie::{
    association::{
        AssociationReleaseMessage, AssociationRequestMessage, AssociationResponseMessage,
        ReconfigurationRequestMessage, ReconfigurationResponseMessage,
    },
    beacon::{ClusterBeaconMessage, NetworkBeaconMessage},
    extensions::{ForwardToIe, PowerTargetIe, TimeAnnounceIe},
    pool::MmiePool,
    resource::{
        BroadcastIndicationIe, ConfigurationRequestIe, GroupAssignmentIe, LoadInfoIe,
        MeasurementReportIe, NeighbouringIe, RadioDeviceStatusIe, RandomAccessResourceIe,
        RdCapabilityIe, ResourceAllocationIe, RouteInfoIe, SecurityInfoIe,
    },
    signalling::{
        HigherLayerSignallingFlow1, HigherLayerSignallingFlow2, UserPlaneDataFlow1,
        UserPlaneDataFlow2, UserPlaneDataFlow3, UserPlaneDataFlow4,
    },
    IeTypeExt00_01_10, IeTypeExt11Len0, IeTypeExt11Len1, PackingPeeking,
};
use crate::enumeration::CodedEnum;
use crate::mmie::Packing;

use super::mux_header::{is_padding, MuxHeader};

/// Terminal/in-progress status, mirroring `has_reached_valid_final_state()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderStatus {
    InProgress,
    Done,
    PrematureAbort,
}

/// A type-erased reference into the pool's decode order, the Rust stand-in for the source's
/// `dynamic_cast`-queried output list (§4.E: "a type-erased reference to the decoded MMIE is
/// appended to an ordered output list").
#[derive(Debug, Clone)]
pub enum DecodedMmie {
    NetworkBeacon(NetworkBeaconMessage),
    ClusterBeacon(ClusterBeaconMessage),
    AssociationRequest(AssociationRequestMessage),
    AssociationResponse(AssociationResponseMessage),
    AssociationRelease(AssociationReleaseMessage),
    ReconfigurationRequest(ReconfigurationRequestMessage),
    ReconfigurationResponse(ReconfigurationResponseMessage),
    SecurityInfo(SecurityInfoIe),
    RouteInfo(RouteInfoIe),
    ResourceAllocation(ResourceAllocationIe),
    RandomAccessResource(RandomAccessResourceIe),
    RdCapability(RdCapabilityIe),
    Neighbouring(NeighbouringIe),
    BroadcastIndication(BroadcastIndicationIe),
    GroupAssignment(GroupAssignmentIe),
    LoadInfo(LoadInfoIe),
    MeasurementReport(MeasurementReportIe),
    ConfigurationRequest(ConfigurationRequestIe),
    RadioDeviceStatus(RadioDeviceStatusIe),
    PowerTarget(PowerTargetIe),
    TimeAnnounce(TimeAnnounceIe),
    ForwardTo(ForwardToIe),
    HigherLayerSignallingFlow1(HigherLayerSignallingFlow1),
    HigherLayerSignallingFlow2(HigherLayerSignallingFlow2),
    UserPlaneDataFlow1(UserPlaneDataFlow1),
    UserPlaneDataFlow2(UserPlaneDataFlow2),
    UserPlaneDataFlow3(UserPlaneDataFlow3),
    UserPlaneDataFlow4(UserPlaneDataFlow4),
}

/// Reentrant streaming decoder for one MAC PDU's worth of MMIEs, following the MAC common header.
/// `decode()` may be called repeatedly as more bytes of the transport block arrive from FEC.
#[derive(Debug, Default)]
pub struct PduDecoder {
    buf: Vec<u8>,
    cursor: usize,
    tb_size: usize,
    status: DecoderStatus,
    output: Vec<DecodedMmie>,
}

impl Default for DecoderStatus {
    fn default() -> Self {
        DecoderStatus::InProgress
    }
}

impl PduDecoder {
    /// `set_configuration`: resets decode state for a transport block of `tb_size` bytes (the
    /// bytes following the MAC common header -- MMIE payload only).
    pub fn set_configuration(&mut self, tb_size: usize) {
        self.buf.clear();
        self.cursor = 0;
        self.tb_size = tb_size;
        self.status = DecoderStatus::InProgress;
        self.output.clear();
    }

    pub fn status(&self) -> DecoderStatus {
        self.status
    }

    pub fn has_reached_valid_final_state(&self) -> bool {
        self.status == DecoderStatus::Done
    }

    pub fn output(&self) -> &[DecodedMmie] {
        &self.output
    }

    /// `decode(a_cnt_w)`: appends newly-available bytes and advances the state machine as far as
    /// the data on hand allows. Returns the status after this call.
    pub fn decode(&mut self, new_bytes: &[u8]) -> DecoderStatus {
        if self.status != DecoderStatus::InProgress {
            return self.status;
        }
        self.buf.extend_from_slice(new_bytes);

        loop {
            // CheckIfDone
            if self.cursor >= self.tb_size {
                self.status = DecoderStatus::Done;
                break;
            }
            let remaining = &self.buf[self.cursor..self.buf.len().min(self.cursor + self.tb_size)];
            if remaining.is_empty() {
                break; // wait for more bytes
            }

            // MuxHeader_Peek
            let (mac_ext, ie_type) = MuxHeader::peek_first_byte(remaining[0]);
            if is_padding(mac_ext, ie_type) {
                self.status = DecoderStatus::PrematureAbort;
                break;
            }
            let header_extra = match mac_ext {
                0b00 | 0b11 => 0,
                0b01 => 1,
                0b10 => 2,
                _ => unreachable!("2-bit field"),
            };
            if remaining.len() < 1 + header_extra {
                break; // wait for the rest of the multiplexing header
            }
            let header = match MuxHeader::unpack(&remaining[..1 + header_extra]) {
                Some(h) => h,
                None => break,
            };
            let header_len = header.packed_size();
            let body_src = &remaining[header_len..];

            // A_UnpackLengthOrFixed / B_PeekSize
            let body_len = match header.length.declared_body_len() {
                Some(n) => n,
                None => match Self::peek_fixed_or_peeked_len(mac_ext, ie_type, body_src) {
                    PeekOutcome::Len(n) => n,
                    PeekOutcome::NeedMoreBytes => break,
                    PeekOutcome::Unknown => {
                        self.status = DecoderStatus::PrematureAbort;
                        break;
                    }
                },
            };
            if body_src.len() < body_len {
                break; // wait for the body to finish arriving
            }
            if self.cursor + header_len + body_len > self.tb_size {
                self.status = DecoderStatus::PrematureAbort;
                break;
            }

            // UnpackMessage
            let body = body_src[..body_len].to_vec();
            if !self.unpack_and_record(mac_ext, ie_type, &body) {
                self.status = DecoderStatus::PrematureAbort;
                break;
            }
            self.cursor += header_len + body_len;
        }
        self.status
    }

    fn peek_fixed_or_peeked_len(mac_ext: u32, ie_type: u32, body_src: &[u8]) -> PeekOutcome {
        macro_rules! peek {
            ($ty:ty) => {{
                if body_src.len() < <$ty as PackingPeeking>::PACKED_SIZE_MIN_TO_PEEK {
                    return PeekOutcome::NeedMoreBytes;
                }
                match <$ty as PackingPeeking>::packed_size_by_peeking(body_src) {
                    Ok(n) => PeekOutcome::Len(n),
                    Err(_) => PeekOutcome::Unknown,
                }
            }};
        }
        // Only ever called for mac_ext == 0b00: declared_body_len() already resolves 01/10/11
        // headers without consulting the variant, so this function never sees those.
        debug_assert_eq!(mac_ext, 0b00);
        match IeTypeExt00_01_10::from_coded_value(ie_type) {
            IeTypeExt00_01_10::NetworkBeaconMessage => peek!(NetworkBeaconMessage),
            IeTypeExt00_01_10::ClusterBeaconMessage => peek!(ClusterBeaconMessage),
            IeTypeExt00_01_10::AssociationRequestMessage => peek!(AssociationRequestMessage),
            IeTypeExt00_01_10::ReconfigurationRequestMessage => {
                peek!(ReconfigurationRequestMessage)
            }
            IeTypeExt00_01_10::AssociationReleaseMessage => PeekOutcome::Len(1),
            IeTypeExt00_01_10::SecurityInfoIe => PeekOutcome::Len(6),
            IeTypeExt00_01_10::RouteInfoIe => PeekOutcome::Len(10),
            IeTypeExt00_01_10::RdCapabilityIe => PeekOutcome::Len(4),
            IeTypeExt00_01_10::NeighbouringIe => PeekOutcome::Len(3),
            IeTypeExt00_01_10::BroadcastIndicationIe => PeekOutcome::Len(3),
            IeTypeExt00_01_10::GroupAssignmentIe => PeekOutcome::Len(2),
            IeTypeExt00_01_10::LoadInfoIe => PeekOutcome::Len(3),
            IeTypeExt00_01_10::MeasurementReportIe => PeekOutcome::Len(2),
            IeTypeExt00_01_10::PowerTargetIe => PeekOutcome::Len(1),
            IeTypeExt00_01_10::TimeAnnounceIe => PeekOutcome::Len(4),
            IeTypeExt00_01_10::IeTypeExtension => PeekOutcome::Len(5),
            _ => PeekOutcome::Unknown,
        }
    }

    fn unpack_and_record(&mut self, mac_ext: u32, ie_type: u32, body: &[u8]) -> bool {
        macro_rules! record {
            ($ty:ty, $variant:ident) => {{
                let mut v = <$ty>::default();
                if !v.unpack(body) {
                    return false;
                }
                self.output.push(DecodedMmie::$variant(v));
                true
            }};
        }
        if mac_ext == 0b11 {
            return match IeTypeExt11Len0::from_coded_value(ie_type) {
                IeTypeExt11Len0::ConfigurationRequestIe => record!(ConfigurationRequestIe, ConfigurationRequest),
                _ => match IeTypeExt11Len1::from_coded_value(ie_type) {
                    IeTypeExt11Len1::RadioDeviceStatusIe => {
                        record!(RadioDeviceStatusIe, RadioDeviceStatus)
                    }
                    _ => false,
                },
            };
        }
        match IeTypeExt00_01_10::from_coded_value(ie_type) {
            IeTypeExt00_01_10::NetworkBeaconMessage => record!(NetworkBeaconMessage, NetworkBeacon),
            IeTypeExt00_01_10::ClusterBeaconMessage => record!(ClusterBeaconMessage, ClusterBeacon),
            IeTypeExt00_01_10::AssociationRequestMessage => {
                record!(AssociationRequestMessage, AssociationRequest)
            }
            IeTypeExt00_01_10::AssociationResponseMessage => {
                record!(AssociationResponseMessage, AssociationResponse)
            }
            IeTypeExt00_01_10::AssociationReleaseMessage => {
                record!(AssociationReleaseMessage, AssociationRelease)
            }
            IeTypeExt00_01_10::ReconfigurationRequestMessage => {
                record!(ReconfigurationRequestMessage, ReconfigurationRequest)
            }
            IeTypeExt00_01_10::ReconfigurationResponseMessage => {
                record!(ReconfigurationResponseMessage, ReconfigurationResponse)
            }
            IeTypeExt00_01_10::SecurityInfoIe => record!(SecurityInfoIe, SecurityInfo),
            IeTypeExt00_01_10::RouteInfoIe => record!(RouteInfoIe, RouteInfo),
            IeTypeExt00_01_10::ResourceAllocationIe => {
                record!(ResourceAllocationIe, ResourceAllocation)
            }
            IeTypeExt00_01_10::RandomAccessResourceIe => {
                record!(RandomAccessResourceIe, RandomAccessResource)
            }
            IeTypeExt00_01_10::RdCapabilityIe => record!(RdCapabilityIe, RdCapability),
            IeTypeExt00_01_10::NeighbouringIe => record!(NeighbouringIe, Neighbouring),
            IeTypeExt00_01_10::BroadcastIndicationIe => {
                record!(BroadcastIndicationIe, BroadcastIndication)
            }
            IeTypeExt00_01_10::GroupAssignmentIe => record!(GroupAssignmentIe, GroupAssignment),
            IeTypeExt00_01_10::LoadInfoIe => record!(LoadInfoIe, LoadInfo),
            IeTypeExt00_01_10::MeasurementReportIe => {
                record!(MeasurementReportIe, MeasurementReport)
            }
            IeTypeExt00_01_10::PowerTargetIe => record!(PowerTargetIe, PowerTarget),
            IeTypeExt00_01_10::TimeAnnounceIe => record!(TimeAnnounceIe, TimeAnnounce),
            IeTypeExt00_01_10::IeTypeExtension => record!(ForwardToIe, ForwardTo),
            IeTypeExt00_01_10::HigherLayerSignallingFlow1 => {
                let mut v = HigherLayerSignallingFlow1::default();
                v.payload.data = body.to_vec();
                self.output
                    .push(DecodedMmie::HigherLayerSignallingFlow1(v));
                true
            }
            IeTypeExt00_01_10::HigherLayerSignallingFlow2 => {
                let mut v = HigherLayerSignallingFlow2::default();
                v.payload.data = body.to_vec();
                self.output
                    .push(DecodedMmie::HigherLayerSignallingFlow2(v));
                true
            }
            IeTypeExt00_01_10::UserPlaneDataFlow1 => {
                let mut v = UserPlaneDataFlow1::default();
                v.payload.data = body.to_vec();
                self.output.push(DecodedMmie::UserPlaneDataFlow1(v));
                true
            }
            IeTypeExt00_01_10::UserPlaneDataFlow2 => {
                let mut v = UserPlaneDataFlow2::default();
                v.payload.data = body.to_vec();
                self.output.push(DecodedMmie::UserPlaneDataFlow2(v));
                true
            }
            IeTypeExt00_01_10::UserPlaneDataFlow3 => {
                let mut v = UserPlaneDataFlow3::default();
                v.payload.data = body.to_vec();
                self.output.push(DecodedMmie::UserPlaneDataFlow3(v));
                true
            }
            IeTypeExt00_01_10::UserPlaneDataFlow4 => {
                let mut v = UserPlaneDataFlow4::default();
                v.payload.data = body.to_vec();
                self.output.push(DecodedMmie::UserPlaneDataFlow4(v));
                true
            }
            _ => false,
        }
    }

    /// Copies every decoded MMIE of each variant into `pool`'s matching vector, in decode order
    /// -- the i-th occurrence of a type lands at index i, per §4.D's pool contract.
    pub fn drain_into_pool(&mut self, pool: &mut MmiePool) {
        for mmie in self.output.drain(..) {
            match mmie {
                DecodedMmie::NetworkBeacon(v) => pool.network_beacon.push(v),
                DecodedMmie::ClusterBeacon(v) => pool.cluster_beacon.push(v),
                DecodedMmie::AssociationRequest(v) => pool.association_request.push(v),
                DecodedMmie::AssociationResponse(v) => pool.association_response.push(v),
                DecodedMmie::AssociationRelease(v) => pool.association_release.push(v),
                DecodedMmie::ReconfigurationRequest(v) => pool.reconfiguration_request.push(v),
                DecodedMmie::ReconfigurationResponse(v) => pool.reconfiguration_response.push(v),
                DecodedMmie::SecurityInfo(v) => pool.security_info.push(v),
                DecodedMmie::RouteInfo(v) => pool.route_info.push(v),
                DecodedMmie::ResourceAllocation(v) => pool.resource_allocation.push(v),
                DecodedMmie::RandomAccessResource(v) => pool.random_access_resource.push(v),
                DecodedMmie::RdCapability(v) => pool.rd_capability.push(v),
                DecodedMmie::Neighbouring(v) => pool.neighbouring.push(v),
                DecodedMmie::BroadcastIndication(v) => pool.broadcast_indication.push(v),
                DecodedMmie::GroupAssignment(v) => pool.group_assignment.push(v),
                DecodedMmie::LoadInfo(v) => pool.load_info.push(v),
                DecodedMmie::MeasurementReport(v) => pool.measurement_report.push(v),
                DecodedMmie::ConfigurationRequest(v) => pool.configuration_request.push(v),
                DecodedMmie::RadioDeviceStatus(v) => pool.radio_device_status.push(v),
                DecodedMmie::PowerTarget(v) => pool.power_target.push(v),
                DecodedMmie::TimeAnnounce(v) => pool.time_announce.push(v),
                DecodedMmie::ForwardTo(v) => pool.forward_to.push(v),
                DecodedMmie::HigherLayerSignallingFlow1(v) => {
                    pool.higher_layer_signalling_flow_1.push(v)
                }
                DecodedMmie::HigherLayerSignallingFlow2(v) => {
                    pool.higher_layer_signalling_flow_2.push(v)
                }
                DecodedMmie::UserPlaneDataFlow1(v) => pool.user_plane_data_flow_1.push(v),
                DecodedMmie::UserPlaneDataFlow2(v) => pool.user_plane_data_flow_2.push(v),
                DecodedMmie::UserPlaneDataFlow3(v) => pool.user_plane_data_flow_3.push(v),
                DecodedMmie::UserPlaneDataFlow4(v) => pool.user_plane_data_flow_4.push(v),
            }
        }
    }
}

enum PeekOutcome {
    Len(usize),
    NeedMoreBytes,
    Unknown,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mmie::MmieEnvelope;

    fn mmh_sdu<T: Packing>(mmie: &T) -> Vec<u8> {
        let mut buf = vec![0u8; mmie.packed_size_of_mmh_sdu()];
        mmie.pack_mmh_sdu(&mut buf);
        buf
    }

    /// Flowing MMIEs have no `Packing::pack` -- their body is the opaque payload copied verbatim,
    /// so the multiplexing header is built directly from the IE type and the payload length.
    fn mmh_sdu_flowing(ie_type: IeTypeExt00_01_10, payload: &[u8]) -> Vec<u8> {
        let header = MuxHeader::with_byte_len(ie_type as u32, payload.len() as u8);
        let mut buf = vec![0u8; header.packed_size()];
        header.pack(&mut buf);
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn decodes_single_fixed_ie() {
        let m = SecurityInfoIe {
            key_index: 1,
            security_iv_type: crate::mmie::resource::SecurityIvType::OneTimeHpc,
            hpc: 7,
        };
        let buf = mmh_sdu(&m);
        let mut d = PduDecoder::default();
        d.set_configuration(buf.len());
        assert_eq!(d.decode(&buf), DecoderStatus::Done);
        assert_eq!(d.output().len(), 1);
        assert!(matches!(d.output()[0], DecodedMmie::SecurityInfo(_)));
    }

    #[test]
    fn padding_terminates_with_prior_mmie_retained() {
        let mut buf = mmh_sdu_flowing(IeTypeExt00_01_10::UserPlaneDataFlow1, &[0xAB; 10]);
        let pad_region = 20;
        buf.resize(buf.len() + pad_region, 0);
        let split = buf.len() - pad_region;
        crate::mmie::padding::fill_with_padding_ies(&mut buf[split..], pad_region);

        let mut d = PduDecoder::default();
        d.set_configuration(buf.len());
        let status = d.decode(&buf);
        assert_eq!(status, DecoderStatus::PrematureAbort);
        assert_eq!(d.output().len(), 1);
        assert!(matches!(d.output()[0], DecodedMmie::UserPlaneDataFlow1(_)));
    }

    #[test]
    fn reserved_ie_type_aborts() {
        // mac_ext=00, ie_type=0b011111 is not in Table 6.3.4-2.
        let buf = [0b00_011111u8];
        let mut d = PduDecoder::default();
        d.set_configuration(buf.len());
        assert_eq!(d.decode(&buf), DecoderStatus::PrematureAbort);
        assert!(d.output().is_empty());
    }

    #[test]
    fn prefix_stability_byte_by_byte_matches_whole_buffer() {
        let m = PowerTargetIe { target_dbm: -5 };
        let buf = mmh_sdu(&m);

        let mut whole = PduDecoder::default();
        whole.set_configuration(buf.len());
        whole.decode(&buf);

        let mut incr = PduDecoder::default();
        incr.set_configuration(buf.len());
        for b in &buf {
            incr.decode(std::slice::from_ref(b));
        }

        assert_eq!(whole.status(), incr.status());
        assert_eq!(whole.output().len(), incr.output().len());
    }

    #[test]
    fn decoder_completeness_for_multiple_mmies() {
        let a = PowerTargetIe { target_dbm: 3 };
        let b = TimeAnnounceIe {
            system_time_us: 99,
        };
        let mut buf = mmh_sdu(&a);
        buf.extend(mmh_sdu(&b));

        let mut d = PduDecoder::default();
        d.set_configuration(buf.len());
        assert_eq!(d.decode(&buf), DecoderStatus::Done);
        assert_eq!(d.output().len(), 2);
    }
}
